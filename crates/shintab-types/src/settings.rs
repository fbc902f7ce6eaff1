use serde::{Deserialize, Serialize};

/// Clock display format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    /// 12-hour clock with AM/PM marker.
    #[serde(rename = "12h")]
    TwelveHour,
    /// 24-hour clock.
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
}

/// Dashboard configuration record.
///
/// Stored wholesale under the `settings` key of the configuration store.
/// Loading uses merge-on-read: defaults first, then whatever subset of
/// fields the stored record carries. A missing record or missing fields
/// are normal, never an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Background blur radius in pixels.
    pub blur: u32,
    /// Opacity of the dark overlay drawn above the background, 0.0..=1.0.
    pub overlay_opacity: f64,
    /// Background rotation interval in seconds; 0 disables rotation.
    pub rotate_interval_secs: u64,
    /// Pick a random background on page load instead of the first one.
    pub randomize: bool,
    /// Clock format.
    pub time_format: TimeFormat,
    /// Whether the quote widget is shown.
    pub show_quotes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blur: 0,
            overlay_opacity: 0.35,
            rotate_interval_secs: 0,
            randomize: true,
            time_format: TimeFormat::default(),
            show_quotes: true,
        }
    }
}

impl Settings {
    /// Apply the present fields of `patch` on top of `self`.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(blur) = patch.blur {
            self.blur = blur;
        }
        if let Some(overlay_opacity) = patch.overlay_opacity {
            self.overlay_opacity = overlay_opacity;
        }
        if let Some(rotate_interval_secs) = patch.rotate_interval_secs {
            self.rotate_interval_secs = rotate_interval_secs;
        }
        if let Some(randomize) = patch.randomize {
            self.randomize = randomize;
        }
        if let Some(time_format) = patch.time_format {
            self.time_format = time_format;
        }
        if let Some(show_quotes) = patch.show_quotes {
            self.show_quotes = show_quotes;
        }
    }

    /// Defaults merged with a partial stored record.
    pub fn merged(patch: SettingsPatch) -> Self {
        let mut settings = Self::default();
        settings.apply(patch);
        settings
    }
}

/// Partial settings record, as read back from the configuration store.
///
/// Every field is optional so that records written by older versions of
/// the dashboard (or hand-edited ones) still load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub blur: Option<u32>,
    pub overlay_opacity: Option<f64>,
    pub rotate_interval_secs: Option<u64>,
    pub randomize: Option<bool>,
    pub time_format: Option<TimeFormat>,
    pub show_quotes: Option<bool>,
}
