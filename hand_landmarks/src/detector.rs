//! The detector seam.
//!
//! Anything that can locate hands in an RGB frame implements
//! [`HandDetector`].  The tracker never looks inside: it hands over the
//! frame and the [`DetectorConfig`], and gets back hands in the detector's
//! own order.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::frame::Frame;
use crate::landmark::NormalizedLandmark;

/// Which hand the detector believes it saw.  Informational only; the
/// controller uses list position, not this label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// One detected hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub landmarks: Vec<NormalizedLandmark>,
    #[serde(default)]
    pub handedness: Option<Handedness>,
    #[serde(default = "full_score")]
    pub score: f32,
}

fn full_score() -> f32 { 1.0 }

impl HandObservation {
    pub fn new(landmarks: Vec<NormalizedLandmark>) -> Self {
        HandObservation { landmarks, handedness: None, score: 1.0 }
    }
}

/// Settings forwarded to the detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub max_num_hands:            usize,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence:  f32,
    /// Treat every frame as unrelated (no tracking between frames).
    pub static_image_mode:        bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            max_num_hands:            2,
            min_detection_confidence: 0.7,
            min_tracking_confidence:  0.5,
            static_image_mode:        false,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_num_hands == 0 {
            return Err(anyhow!("max_num_hands must be at least 1"));
        }
        for (name, v) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence",  self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(anyhow!("{} must be within 0..=1, got {}", name, v));
            }
        }
        Ok(())
    }
}

/// A black-box hand/landmark detector.
pub trait HandDetector {
    /// Backend identifier, for logs.
    fn name(&self) -> &'static str;

    /// Find hands in an RGB frame.
    fn detect(&mut self, rgb: &Frame, config: &DetectorConfig) -> Result<Vec<HandObservation>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_thresholds() {
        let cfg = DetectorConfig::default();
        assert_eq!(cfg.max_num_hands, 2);
        assert!((cfg.min_detection_confidence - 0.7).abs() < f32::EPSILON);
        assert!(!cfg.static_image_mode);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cfg = DetectorConfig { max_num_hands: 0, ..DetectorConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = DetectorConfig { min_tracking_confidence: 1.5, ..DetectorConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn observation_defaults_from_json() {
        let hand: HandObservation =
            serde_json::from_str(r#"{"landmarks":[{"x":0.5,"y":0.5}]}"#).unwrap();
        assert_eq!(hand.score, 1.0);
        assert_eq!(hand.handedness, None);
        assert_eq!(hand.landmarks.len(), 1);
    }
}
