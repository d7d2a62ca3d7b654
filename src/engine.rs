use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cgmath::Point2;

use crate::gui::GuiRuntime;
use crate::input::contact::ContactState;
use crate::input::ev::DeviceContext;
use crate::input::PointerEvent;
use crate::mapping;
use crate::settings::Settings;

/// Upper bound on how long `reload` waits for the reader thread to observe
/// the stop signal before the replacement is started.
const RELOAD_STOP_WAIT: Duration = Duration::from_millis(500);
const RELOAD_STOP_POLL: Duration = Duration::from_millis(10);

/// Owns the touch pipeline: the background reader over the configured
/// device, the shared contact state and the queue of discrete pointer
/// events. The host integration layer constructs one engine, calls
/// `start`, and invokes `tick` from its own (single-threaded) loop.
pub struct TouchInputEngine {
    settings: Settings,
    contact: Arc<ContactState>,
    events_tx: Sender<PointerEvent>,
    events_rx: Receiver<PointerEvent>,
    reader: Option<DeviceContext>,
}

impl TouchInputEngine {
    pub fn new(settings: Settings) -> TouchInputEngine {
        let (events_tx, events_rx) = mpsc::channel();
        TouchInputEngine {
            settings,
            contact: Arc::new(ContactState::default()),
            events_tx,
            events_rx,
            reader: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether a contact is currently being tracked.
    pub fn is_touching(&self) -> bool {
        self.contact.is_active()
    }

    /// Latest raw sensor coordinate. Calibration callers sample this at
    /// the moment the user confirms a reference touch.
    pub fn touch_position(&self) -> Point2<i32> {
        self.contact.touch_position()
    }

    /// Spawn the background reader for the configured device.
    pub fn start(&mut self) {
        let ctx = DeviceContext::new(
            PathBuf::from(&self.settings.touch_device_path),
            Arc::clone(&self.contact),
            self.events_tx.clone(),
        );
        ctx.start();
        self.reader = Some(ctx);
    }

    /// Signal the reader to stop. Non-blocking; the loop observes the flag
    /// on its next iteration.
    pub fn stop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.stop();
        }
    }

    /// Stop the reader, wait briefly for it to wind down, swap in the new
    /// settings value and restart on a fresh thread. In-flight contact
    /// state is not preserved across the swap.
    pub fn reload(&mut self, new_settings: Settings) {
        info!("reloading touch input engine");
        if let Some(reader) = self.reader.take() {
            reader.stop();
            let deadline = Instant::now() + RELOAD_STOP_WAIT;
            while !reader.exited() && Instant::now() < deadline {
                thread::sleep(RELOAD_STOP_POLL);
            }
            if !reader.exited() {
                warn!("reader did not wind down in time, restarting anyway");
            }
        }
        self.settings = new_settings;
        self.start();
    }

    /// Host-tick callback: press/drag delivery for the active contact,
    /// then one drain of the queued discrete events. Delivery failures are
    /// logged per event and never interrupt the rest of the tick.
    pub fn tick(&mut self, runtime: &mut dyn GuiRuntime) {
        if !runtime.surface_present() {
            if self.contact.is_active() {
                // Nothing to release into; the contact is dropped and the
                // consumer is not informed. See DESIGN.md.
                debug!("surface gone while contact active, forcing idle");
                self.contact.force_idle();
            }
            return;
        }

        let scale = mapping::effective_display_scale(&self.settings, runtime.window_size());

        if self.contact.is_active() {
            let raw = self.contact.touch_position();
            let mapped = mapping::map_to_screen(raw, &self.settings, scale);

            if !self.contact.press_sent() {
                deliver_press(runtime, mapped);
                self.contact.record_press(raw, mapped);
                info!("press at ({0}, {1})", mapped.x, mapped.y);
            } else if raw != self.contact.drag_anchor() {
                let delta = mapped - self.contact.last_sent();
                if let Err(e) = runtime.drag(mapped, delta) {
                    error!("drag delivery failed: {0}", e);
                }
                self.contact.record_drag(raw, mapped);
                debug!(
                    "drag to ({0}, {1}) delta ({2}, {3})",
                    mapped.x, mapped.y, delta.x, delta.y
                );
            }
        }

        loop {
            match self.events_rx.try_recv() {
                Ok(event) => deliver_queued(runtime, event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }
}

/// Element-targeted press first; untargeted press when nothing claims the
/// point.
fn deliver_press(runtime: &mut dyn GuiRuntime, pos: Point2<i32>) {
    let result = if runtime.element_at(pos) {
        runtime.press_element(pos)
    } else {
        debug!(
            "no element at ({0}, {1}), delivering untargeted press",
            pos.x, pos.y
        );
        runtime.press(pos)
    };
    if let Err(e) = result {
        error!("press delivery failed: {0}", e);
    }
}

fn deliver_queued(runtime: &mut dyn GuiRuntime, event: PointerEvent) {
    match event {
        PointerEvent::Press { pos } => deliver_press(runtime, pos),
        PointerEvent::Release { pos } => {
            if let Err(e) = runtime.release(pos) {
                error!("release delivery failed: {0}", e);
            }
            info!("release at ({0}, {1})", pos.x, pos.y);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gui::{DeliveryError, DeliveryResult};
    use crate::input::contact;
    use crate::input::ecodes;
    use crate::input::raw::{EventKind, RawInputEvent};
    use cgmath::Vector2;

    #[derive(Debug, PartialEq)]
    enum Delivery {
        ElementPress(Point2<i32>),
        Press(Point2<i32>),
        Drag(Point2<i32>, Vector2<i32>),
        Release(Point2<i32>),
    }

    struct MockRuntime {
        surface: bool,
        window: Option<Vector2<u32>>,
        element_hit: bool,
        fail_release: bool,
        deliveries: Vec<Delivery>,
    }

    impl MockRuntime {
        fn new() -> MockRuntime {
            MockRuntime {
                surface: true,
                window: None,
                element_hit: true,
                fail_release: false,
                deliveries: Vec::new(),
            }
        }
    }

    impl GuiRuntime for MockRuntime {
        fn surface_present(&self) -> bool {
            self.surface
        }

        fn window_size(&self) -> Option<Vector2<u32>> {
            self.window
        }

        fn element_at(&self, _pos: Point2<i32>) -> bool {
            self.element_hit
        }

        fn press_element(&mut self, pos: Point2<i32>) -> DeliveryResult {
            self.deliveries.push(Delivery::ElementPress(pos));
            Ok(())
        }

        fn press(&mut self, pos: Point2<i32>) -> DeliveryResult {
            self.deliveries.push(Delivery::Press(pos));
            Ok(())
        }

        fn drag(&mut self, pos: Point2<i32>, delta: Vector2<i32>) -> DeliveryResult {
            self.deliveries.push(Delivery::Drag(pos, delta));
            Ok(())
        }

        fn release(&mut self, pos: Point2<i32>) -> DeliveryResult {
            self.deliveries.push(Delivery::Release(pos));
            if self.fail_release {
                Err(DeliveryError::new("element refused the release"))
            } else {
                Ok(())
            }
        }
    }

    fn test_engine() -> TouchInputEngine {
        let mut settings = Settings::default();
        settings.auto_detect_display_scale = false;
        settings.manual_display_scale = 1.0;
        TouchInputEngine::new(settings)
    }

    fn abs(code: u16, value: i32) -> RawInputEvent {
        RawInputEvent {
            kind: EventKind::AbsAxis,
            code,
            value,
        }
    }

    fn feed(engine: &TouchInputEngine, ev: RawInputEvent) {
        contact::feed(&engine.contact, &ev, &engine.events_tx);
    }

    fn begin_contact(engine: &TouchInputEngine, x: i32, y: i32) {
        feed(engine, abs(ecodes::ABS_MT_POSITION_X, x));
        feed(engine, abs(ecodes::ABS_MT_POSITION_Y, y));
        feed(engine, abs(ecodes::ABS_MT_TRACKING_ID, 5));
    }

    #[test]
    fn contact_start_delivers_one_press_at_the_mapped_position() {
        let mut engine = test_engine();
        let mut runtime = MockRuntime::new();

        begin_contact(&engine, 800, 1280);
        // Extra presence signals before the tick must not double the press.
        feed(&engine, abs(ecodes::ABS_MT_TRACKING_ID, 5));

        engine.tick(&mut runtime);
        engine.tick(&mut runtime);

        // Defaults resolve Auto to Rotate90: (1280/2559*2560, 799/1599*1600).
        assert_eq!(
            runtime.deliveries,
            vec![Delivery::ElementPress(Point2 { x: 1280, y: 799 })]
        );
    }

    #[test]
    fn press_falls_back_when_no_element_claims_the_point() {
        let mut engine = test_engine();
        let mut runtime = MockRuntime::new();
        runtime.element_hit = false;

        begin_contact(&engine, 800, 1280);
        engine.tick(&mut runtime);

        assert_eq!(
            runtime.deliveries,
            vec![Delivery::Press(Point2 { x: 1280, y: 799 })]
        );
    }

    #[test]
    fn movement_after_the_press_delivers_a_drag_with_delta() {
        let mut engine = test_engine();
        let mut runtime = MockRuntime::new();

        begin_contact(&engine, 800, 1280);
        engine.tick(&mut runtime);

        // No movement: no drag.
        engine.tick(&mut runtime);
        assert_eq!(runtime.deliveries.len(), 1);

        feed(&engine, abs(ecodes::ABS_MT_POSITION_Y, 1380));
        engine.tick(&mut runtime);

        // New y maps to 1380/2559*2560 = 1380; delta from (1280, 799).
        assert_eq!(
            runtime.deliveries[1],
            Delivery::Drag(Point2 { x: 1380, y: 799 }, Vector2 { x: 100, y: 0 })
        );

        // Unchanged position again: nothing further.
        engine.tick(&mut runtime);
        assert_eq!(runtime.deliveries.len(), 2);
    }

    #[test]
    fn lift_drains_exactly_one_release_at_the_last_sent_position() {
        let mut engine = test_engine();
        let mut runtime = MockRuntime::new();

        begin_contact(&engine, 800, 1280);
        engine.tick(&mut runtime);
        feed(&engine, abs(ecodes::ABS_MT_TRACKING_ID, -1));

        engine.tick(&mut runtime);
        engine.tick(&mut runtime);

        assert_eq!(
            runtime.deliveries,
            vec![
                Delivery::ElementPress(Point2 { x: 1280, y: 799 }),
                Delivery::Release(Point2 { x: 1280, y: 799 }),
            ]
        );
    }

    #[test]
    fn full_contact_cycle_repeats_cleanly() {
        let mut engine = test_engine();
        let mut runtime = MockRuntime::new();

        begin_contact(&engine, 800, 1280);
        engine.tick(&mut runtime);
        feed(&engine, abs(ecodes::ABS_MT_TRACKING_ID, -1));
        engine.tick(&mut runtime);

        begin_contact(&engine, 400, 640);
        engine.tick(&mut runtime);

        assert_eq!(runtime.deliveries.len(), 3);
        assert!(matches!(runtime.deliveries[2], Delivery::ElementPress(_)));
    }

    #[test]
    fn missing_surface_forces_idle_without_a_release() {
        let mut engine = test_engine();
        let mut runtime = MockRuntime::new();

        begin_contact(&engine, 800, 1280);
        engine.tick(&mut runtime);

        runtime.surface = false;
        engine.tick(&mut runtime);
        assert!(!engine.is_touching());

        runtime.surface = true;
        engine.tick(&mut runtime);

        // Press went out, but no release was ever synthesized.
        assert_eq!(
            runtime.deliveries,
            vec![Delivery::ElementPress(Point2 { x: 1280, y: 799 })]
        );

        // The next contact presses afresh.
        begin_contact(&engine, 800, 1280);
        engine.tick(&mut runtime);
        assert_eq!(runtime.deliveries.len(), 2);
    }

    #[test]
    fn rejected_delivery_does_not_stop_the_drain() {
        let mut engine = test_engine();
        let mut runtime = MockRuntime::new();
        runtime.fail_release = true;

        begin_contact(&engine, 800, 1280);
        engine.tick(&mut runtime);
        feed(&engine, abs(ecodes::ABS_MT_TRACKING_ID, -1));
        begin_contact(&engine, 400, 640);
        feed(&engine, abs(ecodes::ABS_MT_TRACKING_ID, -1));

        // Two queued releases; the first failing must not block the second.
        engine.tick(&mut runtime);
        let releases = runtime
            .deliveries
            .iter()
            .filter(|d| matches!(d, Delivery::Release(_)))
            .count();
        assert_eq!(releases, 2);
    }

    #[test]
    fn window_size_drives_the_effective_scale() {
        let mut settings = Settings::default();
        settings.auto_detect_display_scale = true;
        settings.manual_display_scale = 1.0;
        let mut engine = TouchInputEngine::new(settings);

        let mut runtime = MockRuntime::new();
        // Window at half the configured resolution: scale 2.0.
        runtime.window = Some(Vector2 { x: 1280, y: 800 });

        begin_contact(&engine, 800, 1280);
        engine.tick(&mut runtime);

        assert_eq!(
            runtime.deliveries,
            vec![Delivery::ElementPress(Point2 { x: 640, y: 399 })]
        );
    }

    #[test]
    fn reload_swaps_settings_and_restarts_the_reader() {
        let mut engine = test_engine();
        engine.start();
        assert!(engine.reader.is_some());

        let mut new_settings = Settings::default();
        new_settings.touch_device_path = "/dev/input/event7".to_owned();
        engine.reload(new_settings);

        assert_eq!(engine.settings().touch_device_path, "/dev/input/event7");
        let reader = engine.reader.as_ref().unwrap();
        assert!(reader.started());
        assert!(!reader.exit_requested());
        engine.stop();
    }
}
