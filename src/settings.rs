//! Page-level settings
//!
//! Read once at start-up from an optional inline JSON element:
//!
//! ```html
//! <script type="application/json" id="anchor-back-config">
//!   { "max_entries": 50, "button_label": "Back" }
//! </script>
//! ```
//!
//! Nothing is persisted; missing fields take their defaults.

use serde::{Deserialize, Serialize};

/// How the location is restored when going back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationUpdate {
    /// `history.replaceState`: no `hashchange` fires
    #[default]
    ReplaceState,
    /// `location.hash = ..`: fires `hashchange`, so the tracker is told to skip it
    SetHash,
}

impl LocationUpdate {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationUpdate::ReplaceState => "replace_state",
            LocationUpdate::SetHash => "set_hash",
        }
    }

    /// Whether restoring the location is observed as a hash change
    pub fn fires_hashchange(&self) -> bool {
        matches!(self, LocationUpdate::SetHash)
    }
}

/// Scrolling animation used when restoring a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScrollMode {
    #[default]
    Smooth,
    Instant,
}

/// Back navigation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum navigation log length (0 = unbounded)
    pub max_entries: usize,

    // === Button ===
    /// Element id of the injected back button
    pub button_id: String,
    /// Button text
    pub button_label: String,

    // === Behaviour ===
    pub scroll: ScrollMode,
    pub location_update: LocationUpdate,

    /// `log` level name for the console logger
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_entries: 100,
            button_id: "back-nav-btn".to_string(),
            button_label: "\u{2190} Back".to_string(),
            scroll: ScrollMode::Smooth,
            location_update: LocationUpdate::ReplaceState,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Id of the inline JSON element settings are read from
    pub const CONFIG_ELEMENT_ID: &'static str = "anchor-back-config";

    /// Parse settings JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid anchor-back settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Configured log level, `Info` if the name isn't recognised
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Filter to apply once the logger is running
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level().to_level_filter()
    }

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => Self::from_json(&json),
            _ => Self::default(),
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
