use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TouchBridgeError};
use crate::mapping::MappingMode;

lazy_static! {
    /// Default location of the persisted settings document.
    pub static ref DEFAULT_SETTINGS_PATH: PathBuf = match std::env::var_os("HOME") {
        Some(home) => Path::new(&home).join(".config").join("touchbridge.json"),
        None => PathBuf::from("touchbridge.json"),
    };
}

/// The settings record consumed by the mapper, the calibration and the
/// engine. Loaded once at startup; settings UIs edit a cloned draft and
/// feed the result to the engine's `reload`, which swaps the whole value.
///
/// Unknown or missing fields in the persisted document fall back to their
/// defaults, so documents from older versions keep loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Character device the touch records are read from.
    pub touch_device_path: String,

    /// Sensor bounds: the largest raw coordinate the panel reports per
    /// axis. The auto-detect flag is carried for callers that can query
    /// the device for these; the core only consumes the bounds.
    pub auto_detect_touch_bounds: bool,
    pub touch_max_x: i32,
    pub touch_max_y: i32,

    /// Display bounds, used as the mapping target (the live window size
    /// is still preferred for scale detection).
    pub auto_detect_screen_bounds: bool,
    pub screen_width: i32,
    pub screen_height: i32,

    pub mapping_mode: MappingMode,
    /// Swap axes (for rotated panels); only honored by `Custom`.
    pub swap_xy: bool,
    pub invert_x: bool,
    pub invert_y: bool,

    /// Derive the display scale from the live window; falls back to
    /// `manual_display_scale` when the window cannot be read.
    pub auto_detect_display_scale: bool,
    pub manual_display_scale: f64,

    /// Show fading markers where presses were synthesized.
    pub debug_markers_enabled: bool,
}

impl ::std::default::Default for Settings {
    fn default() -> Self {
        Settings {
            touch_device_path: "/dev/input/event6".to_owned(),
            auto_detect_touch_bounds: true,
            touch_max_x: 1599,
            touch_max_y: 2559,
            auto_detect_screen_bounds: true,
            screen_width: 2560,
            screen_height: 1600,
            mapping_mode: MappingMode::Auto,
            swap_xy: true,
            invert_x: false,
            invert_y: true,
            auto_detect_display_scale: true,
            manual_display_scale: 1.66,
            debug_markers_enabled: false,
        }
    }
}

impl Settings {
    /// Load the settings document, falling back to the built-in defaults
    /// when it is missing or unreadable. The fallback is persisted right
    /// away so the record on disk is never left undefined.
    pub fn load(path: &Path) -> Settings {
        match Settings::read_from(path) {
            Ok(settings) => {
                info!("loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("{0}; falling back to defaults", e);
                let settings = Settings::default();
                if let Err(e) = settings.save(path) {
                    error!("failed to persist default settings: {0}", e);
                }
                settings
            }
        }
    }

    fn read_from(path: &Path) -> Result<Settings> {
        let data = fs::read_to_string(path).map_err(|e| {
            TouchBridgeError::settings(format!("failed to read {:?}: {}", path, e))
        })?;
        serde_json::from_str(&data).map_err(|e| {
            TouchBridgeError::settings(format!("failed to parse {:?}: {}", path, e))
        })
    }

    /// Persist the record as a pretty-printed JSON document.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TouchBridgeError::settings(format!("failed to create {:?}: {}", parent, e))
            })?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| TouchBridgeError::settings(format!("failed to serialize: {}", e)))?;
        fs::write(path, data).map_err(|e| {
            TouchBridgeError::settings(format!("failed to write {:?}: {}", path, e))
        })?;
        info!("saved settings to {:?}", path);
        Ok(())
    }
}
