/// Contains the two-point calibration that infers the mapping parameters
/// from observed touches
pub mod calibration;

use cgmath::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// The transform family applied to raw sensor coordinates. `Auto` is
/// resolved at use-time from the sensor and display orientation and never
/// reaches the transform table itself.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum MappingMode {
    Normal,
    Rotate90,
    Rotate180,
    Rotate270,
    Auto,
    Custom,
}

impl MappingMode {
    /// Resolve `Auto` against the configured bounds: a sensor taller than
    /// wide paired with a display wider than tall means the panel is
    /// mounted rotated relative to the display, and vice versa. Only ever
    /// yields `Normal`, `Rotate90` or `Rotate270`.
    pub fn resolve(self, settings: &Settings) -> MappingMode {
        match self {
            MappingMode::Auto => {
                if settings.touch_max_x < settings.touch_max_y
                    && settings.screen_width > settings.screen_height
                {
                    MappingMode::Rotate90
                } else if settings.touch_max_x > settings.touch_max_y
                    && settings.screen_width < settings.screen_height
                {
                    MappingMode::Rotate270
                } else {
                    MappingMode::Normal
                }
            }
            other => other,
        }
    }
}

/// Convert a raw sensor coordinate into the host display's coordinate
/// space. The result is clamped to
/// `[0, screen_width / scale - 1] x [0, screen_height / scale - 1]`.
pub fn map_to_screen(touch: Point2<i32>, settings: &Settings, scale: f64) -> Point2<i32> {
    let max_x = settings.touch_max_x as f64;
    let max_y = settings.touch_max_y as f64;
    let width = settings.screen_width as f64;
    let height = settings.screen_height as f64;
    let tx = touch.x as f64;
    let ty = touch.y as f64;

    let (screen_x, screen_y) = match settings.mapping_mode.resolve(settings) {
        MappingMode::Normal => (tx / max_x * width, ty / max_y * height),
        MappingMode::Rotate90 => (ty / max_y * width, (max_x - tx) / max_x * height),
        MappingMode::Rotate180 => {
            ((max_x - tx) / max_x * width, (max_y - ty) / max_y * height)
        }
        MappingMode::Rotate270 => ((max_y - ty) / max_y * width, tx / max_x * height),
        MappingMode::Custom => {
            let mut norm_x = tx / max_x;
            let mut norm_y = ty / max_y;
            if settings.invert_x {
                norm_x = 1.0 - norm_x;
            }
            if settings.invert_y {
                norm_y = 1.0 - norm_y;
            }
            if settings.swap_xy {
                (norm_y * width, norm_x * height)
            } else {
                (norm_x * width, norm_y * height)
            }
        }
        // resolve() never yields Auto
        MappingMode::Auto => unreachable!(),
    };

    let limit_x = (width / scale) as i32 - 1;
    let limit_y = (height / scale) as i32 - 1;
    Point2 {
        x: ((screen_x / scale) as i32).max(0).min(limit_x),
        y: ((screen_y / scale) as i32).max(0).min(limit_y),
    }
}

/// Ratio between the configured display resolution and the live rendering
/// surface, applied after coordinate mapping. When auto-detection is off
/// or the live window size is unavailable, the manually configured scale
/// is used instead; the fallback never surfaces an error.
pub fn effective_display_scale(settings: &Settings, window: Option<Vector2<u32>>) -> f64 {
    if !settings.auto_detect_display_scale {
        return settings.manual_display_scale;
    }

    match window {
        Some(size) if size.x > 0 && size.y > 0 => {
            let scale_x = settings.screen_width as f64 / f64::from(size.x);
            let scale_y = settings.screen_height as f64 / f64::from(size.y);
            (scale_x + scale_y) / 2.0
        }
        _ => {
            debug!(
                "live window size unavailable, using manual display scale {0}",
                settings.manual_display_scale
            );
            settings.manual_display_scale
        }
    }
}
