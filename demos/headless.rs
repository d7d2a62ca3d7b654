#[macro_use]
extern crate log;
extern crate env_logger;

extern crate touchbridge;

use std::thread::sleep;
use std::time::{Duration, Instant};

use touchbridge::cgmath::{Point2, Vector2};
use touchbridge::engine::TouchInputEngine;
use touchbridge::gui::{DeliveryResult, GuiRuntime};
use touchbridge::overlay::MarkerOverlay;
use touchbridge::settings::{Settings, DEFAULT_SETTINGS_PATH};

/// Stand-in for a real GUI runtime: accepts every synthesized event and
/// logs it, and records presses into the marker overlay.
struct LoggingRuntime {
    overlay: MarkerOverlay,
}

impl GuiRuntime for LoggingRuntime {
    fn surface_present(&self) -> bool {
        true
    }

    fn window_size(&self) -> Option<Vector2<u32>> {
        // Headless: let the engine fall back to the configured scale.
        None
    }

    fn element_at(&self, _pos: Point2<i32>) -> bool {
        false
    }

    fn press_element(&mut self, pos: Point2<i32>) -> DeliveryResult {
        info!("element press at ({0}, {1})", pos.x, pos.y);
        Ok(())
    }

    fn press(&mut self, pos: Point2<i32>) -> DeliveryResult {
        self.overlay.record(pos, Instant::now());
        info!("press at ({0}, {1})", pos.x, pos.y);
        Ok(())
    }

    fn drag(&mut self, pos: Point2<i32>, delta: Vector2<i32>) -> DeliveryResult {
        info!(
            "drag to ({0}, {1}) delta ({2}, {3})",
            pos.x, pos.y, delta.x, delta.y
        );
        Ok(())
    }

    fn release(&mut self, pos: Point2<i32>) -> DeliveryResult {
        info!("release at ({0}, {1})", pos.x, pos.y);
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let settings = Settings::load(&DEFAULT_SETTINGS_PATH);
    info!(
        "driving {0} at {1}x{2} with mode {3:?}",
        settings.touch_device_path,
        settings.screen_width,
        settings.screen_height,
        settings.mapping_mode
    );

    let mut runtime = LoggingRuntime {
        overlay: MarkerOverlay::new(settings.debug_markers_enabled),
    };
    let mut engine = TouchInputEngine::new(settings);
    engine.start();

    // Stand-in for the host application's tick loop.
    loop {
        engine.tick(&mut runtime);
        runtime.overlay.sweep(Instant::now());
        sleep(Duration::from_millis(16));
    }
}
