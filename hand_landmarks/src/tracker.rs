//! The landmark adapter between frames and the detector.

use anyhow::{Context, Result};

use crate::detector::{DetectorConfig, HandDetector, HandObservation};
use crate::draw::{draw_hand, fill_circle, MARK_COLOR};
use crate::frame::{Frame, PixelFormat};
use crate::landmark::Landmark;

const MARK_RADIUS: i32 = 6;

/// Wraps a [`HandDetector`] and remembers its most recent result.
pub struct HandTracker {
    detector: Box<dyn HandDetector>,
    config:   DetectorConfig,
    last:     Vec<HandObservation>,
}

impl HandTracker {
    pub fn new(detector: Box<dyn HandDetector>, config: DetectorConfig) -> Self {
        log::info!(
            "hand tracker using '{}' detector (max hands {}, detection {:.2}, tracking {:.2}, static {})",
            detector.name(),
            config.max_num_hands,
            config.min_detection_confidence,
            config.min_tracking_confidence,
            config.static_image_mode,
        );
        HandTracker { detector, config, last: Vec::new() }
    }

    pub fn config(&self) -> &DetectorConfig { &self.config }

    /// Run detection on `frame` and store the result.
    ///
    /// The detector always sees RGB.  The returned frame keeps the input's
    /// channel order and carries the skeleton overlay when `draw` is set.
    pub fn find_hands(&mut self, frame: &Frame, draw: bool) -> Result<Frame> {
        let rgb = frame.converted(PixelFormat::Rgb24);
        let mut hands = self
            .detector
            .detect(&rgb, &self.config)
            .with_context(|| format!("{} detector failed", self.detector.name()))?;
        hands.truncate(self.config.max_num_hands);
        self.last = hands;

        let mut out = rgb.converted(frame.format);
        if draw {
            for hand in &self.last {
                let points: Vec<(i32, i32)> = hand
                    .landmarks
                    .iter()
                    .map(|lm| lm.to_pixel(out.width, out.height))
                    .collect();
                draw_hand(&mut out, &points);
            }
        }
        Ok(out)
    }

    /// Pixel landmarks of hand `hand_index` from the last detection, scaled
    /// to `frame`.  A hand that was not detected yields an empty list.
    pub fn find_position(&self, hand_index: usize, frame: &mut Frame, draw: bool) -> Vec<Landmark> {
        let Some(hand) = self.last.get(hand_index) else {
            return Vec::new();
        };
        let lms: Vec<Landmark> = hand
            .landmarks
            .iter()
            .enumerate()
            .map(|(id, lm)| {
                let (x, y) = lm.to_pixel(frame.width, frame.height);
                Landmark::new(id, x, y)
            })
            .collect();
        if draw {
            for lm in &lms {
                fill_circle(frame, (lm.x, lm.y), MARK_RADIUS, MARK_COLOR);
            }
        }
        lms
    }

    /// Hands found by the last [`find_hands`](Self::find_hands).
    pub fn hands(&self) -> &[HandObservation] { &self.last }

    pub fn hand_count(&self) -> usize { self.last.len() }
}
