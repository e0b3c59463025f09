//! Application configuration: defaults, an optional TOML file, then
//! command-line overrides.
//!
//! ```toml
//! source      = "0"
//! detector    = "bridge:python3 hand_detect.py"
//! interval_ms = 1000
//! dry_run     = false
//!
//! [detector_config]
//! max_num_hands            = 2
//! min_detection_confidence = 0.7
//!
//! [keys]
//! hard_drop = "enter"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use gesture_keys::KeyBindings;
use hand_landmarks::DetectorConfig;

use crate::app::Mode;
use crate::detect::DetectorKind;
use crate::source::VideoSource;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub mode:            Mode,
    pub source:          VideoSource,
    pub detector:        DetectorKind,
    pub detector_config: DetectorConfig,
    /// Length of one gesture window in `play` mode.
    pub interval:        Duration,
    /// Overlay landmarks and connections on the preview.
    pub draw:            bool,
    /// Log key presses instead of sending them.
    pub dry_run:         bool,
    pub keys:            KeyBindings,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            mode:            Mode::default(),
            source:          VideoSource::default(),
            detector:        DetectorKind::default(),
            detector_config: DetectorConfig::default(),
            interval:        DEFAULT_INTERVAL,
            draw:            true,
            dry_run:         false,
            keys:            KeyBindings::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, then `file` if given, then `overrides`; validated.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut cfg = AppConfig::default();
        if let Some(path) = file {
            ConfigFile::load(path)?.apply_to(&mut cfg)?;
            log::info!("loaded configuration from {}", path.display());
        }
        overrides.apply_to(&mut cfg);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.detector_config.validate()?;
        if self.interval.is_zero() {
            return Err(anyhow!("gesture interval must be greater than zero"));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ConfigFile: every field optional
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub source:          Option<String>,
    pub detector:        Option<String>,
    pub detector_config: Option<DetectorConfig>,
    pub interval_ms:     Option<u64>,
    pub draw:            Option<bool>,
    pub dry_run:         Option<bool>,
    pub keys:            Option<KeyBindings>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("invalid config file '{}'", path.display()))
    }

    fn apply_to(self, cfg: &mut AppConfig) -> Result<()> {
        if let Some(source) = self.source {
            cfg.source = source.parse()?;
        }
        if let Some(detector) = self.detector {
            cfg.detector = detector.parse()?;
        }
        if let Some(dc) = self.detector_config {
            cfg.detector_config = dc;
        }
        if let Some(ms) = self.interval_ms {
            cfg.interval = Duration::from_millis(ms);
        }
        if let Some(draw) = self.draw {
            cfg.draw = draw;
        }
        if let Some(dry_run) = self.dry_run {
            cfg.dry_run = dry_run;
        }
        if let Some(keys) = self.keys {
            cfg.keys = keys;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Overrides: what the command line asked for
// ════════════════════════════════════════════════════════════════════════════

/// Command-line values.  `None`/`false` leaves the file or default alone.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub mode:                 Option<Mode>,
    pub source:               Option<VideoSource>,
    pub detector:             Option<DetectorKind>,
    pub max_hands:            Option<usize>,
    pub detection_confidence: Option<f32>,
    pub tracking_confidence:  Option<f32>,
    pub static_image_mode:    bool,
    pub interval_ms:          Option<u64>,
    pub dry_run:              bool,
    pub no_draw:              bool,
}

impl Overrides {
    fn apply_to(&self, cfg: &mut AppConfig) {
        if let Some(mode) = self.mode {
            cfg.mode = mode;
        }
        if let Some(source) = &self.source {
            cfg.source = source.clone();
        }
        if let Some(detector) = &self.detector {
            cfg.detector = detector.clone();
        }
        let dc = &mut cfg.detector_config;
        if let Some(n) = self.max_hands {
            dc.max_num_hands = n;
        }
        if let Some(c) = self.detection_confidence {
            dc.min_detection_confidence = c;
        }
        if let Some(c) = self.tracking_confidence {
            dc.min_tracking_confidence = c;
        }
        if self.static_image_mode {
            dc.static_image_mode = true;
        }
        if let Some(ms) = self.interval_ms {
            cfg.interval = Duration::from_millis(ms);
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.no_draw {
            cfg.draw = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use gesture_keys::KeyCode;

    use super::*;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = AppConfig::load(None, &Overrides::default()).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.interval, Duration::from_secs(1));
        assert_eq!(cfg.mode, Mode::Play);
        assert!(cfg.draw);
    }

    #[test]
    fn file_fills_in_a_subset() {
        let file = write_config(
            r#"
            detector    = "replay:hands.jsonl"
            interval_ms = 500

            [detector_config]
            max_num_hands = 1

            [keys]
            hard_drop = "enter"
            "#,
        );
        let cfg = AppConfig::load(Some(file.path()), &Overrides::default()).unwrap();
        assert_eq!(cfg.detector, DetectorKind::Replay("hands.jsonl".into()));
        assert_eq!(cfg.interval, Duration::from_millis(500));
        assert_eq!(cfg.detector_config.max_num_hands, 1);
        assert!((cfg.detector_config.min_detection_confidence - 0.7).abs() < f32::EPSILON);
        assert_eq!(cfg.keys.hard_drop, KeyCode::Enter);
        assert_eq!(cfg.keys.rotate, KeyCode::Up);
        assert_eq!(cfg.source, VideoSource::default());
    }

    #[test]
    fn command_line_beats_file() {
        let file = write_config("interval_ms = 500\ndry_run = false\nsource = \"2\"\n");
        let overrides = Overrides {
            interval_ms: Some(250),
            dry_run: true,
            source: Some(VideoSource::Camera(0)),
            no_draw: true,
            ..Overrides::default()
        };
        let cfg = AppConfig::load(Some(file.path()), &overrides).unwrap();
        assert_eq!(cfg.interval, Duration::from_millis(250));
        assert!(cfg.dry_run);
        assert!(!cfg.draw);
        assert_eq!(cfg.source, VideoSource::Camera(0));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_conf = Overrides { detection_confidence: Some(1.5), ..Overrides::default() };
        assert!(AppConfig::load(None, &bad_conf).is_err());

        let no_hands = Overrides { max_hands: Some(0), ..Overrides::default() };
        assert!(AppConfig::load(None, &no_hands).is_err());

        let zero = write_config("interval_ms = 0\n");
        assert!(AppConfig::load(Some(zero.path()), &Overrides::default()).is_err());
    }

    #[test]
    fn unknown_or_malformed_files_are_errors() {
        let typo = write_config("intervall_ms = 10\n");
        assert!(AppConfig::load(Some(typo.path()), &Overrides::default()).is_err());

        let bad_key = write_config("[keys]\nrotate = \"pageup\"\n");
        assert!(AppConfig::load(Some(bad_key.path()), &Overrides::default()).is_err());

        let missing = Path::new("/nonexistent/hand_control.toml");
        let err = AppConfig::load(Some(missing), &Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("hand_control.toml"));
    }
}
