// Demo settings: compiled-in defaults, optionally overridden from localStorage.
use serde::{Deserialize, Serialize};

pub const CONFIG_STORAGE_KEY: &str = "runner_config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub background_url: String,
    pub sprite_url: String,
    pub jump_delay_ms: i32,
    pub initial_frame: i64,
    /// Vertical placement of the runner as a fraction of the surface height.
    pub frame_y_ratio: f64,
    pub gestures: GestureConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            background_url: "imgs/toronto.jpg".to_string(),
            sprite_url: "imgs/stickman.png".to_string(),
            jump_delay_ms: 500,
            initial_frame: 2,
            frame_y_ratio: 0.6,
            gestures: GestureConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub drag_min_distance: f64,
    pub tap_max_time_ms: f64,
    pub tap_max_distance: f64,
    pub double_tap_interval_ms: f64,
    pub double_tap_distance: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_min_distance: 10.0,
            tap_max_time_ms: 250.0,
            tap_max_distance: 10.0,
            double_tap_interval_ms: 300.0,
            double_tap_distance: 20.0,
        }
    }
}

impl DemoConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Defaults, with any override stored under `runner_config` applied on top.
    pub fn load() -> Self {
        if let Some(win) = web_sys::window() {
            if let Ok(Some(store)) = win.local_storage() {
                if let Ok(Some(raw)) = store.get_item(CONFIG_STORAGE_KEY) {
                    match Self::from_json(&raw) {
                        Ok(cfg) => {
                            log::info!("using config override from localStorage");
                            return cfg;
                        }
                        Err(e) => log::warn!("ignoring invalid {}: {}", CONFIG_STORAGE_KEY, e),
                    }
                }
            }
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = DemoConfig::from_json(r#"{"jump_delay_ms": 800, "gestures": {"drag_min_distance": 4}}"#)
            .unwrap();
        assert_eq!(cfg.jump_delay_ms, 800);
        assert_eq!(cfg.gestures.drag_min_distance, 4.0);
        assert_eq!(cfg.gestures.double_tap_interval_ms, 300.0);
        assert_eq!(cfg.sprite_url, "imgs/stickman.png");
        assert_eq!(cfg.initial_frame, 2);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(DemoConfig::from_json("{}").unwrap(), DemoConfig::default());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(DemoConfig::from_json("not json").is_err());
    }
}
