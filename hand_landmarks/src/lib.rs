//! # hand_landmarks
//!
//! The vision half of the hand controller: owned video [`Frame`]s, the
//! 21-point hand landmark model, a [`HandDetector`] seam for whatever
//! external library actually finds hands, and the [`HandTracker`] adapter
//! that turns its normalized output into pixel landmarks.
//!
//! Detection itself is never done here.  A detector takes an RGB frame and
//! returns zero or more [`HandObservation`]s, each 21 normalized points in
//! the MediaPipe order:
//!
//! ```text
//!          8   12  16  20        tips
//!          7   11  15  19
//!     4    6   10  14  18
//!     3    5 ── 9 ─13 ─17        knuckles
//!      2          /
//!       1        /
//!        0 ─────                 wrist
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use hand_landmarks::{DetectorConfig, Frame, HandTracker, HandDetector, HandObservation};
//! use hand_landmarks::fingers::{index_open, thumb_up};
//!
//! struct NoHands;
//! impl HandDetector for NoHands {
//!     fn name(&self) -> &'static str { "none" }
//!     fn detect(&mut self, _rgb: &Frame, _cfg: &DetectorConfig)
//!         -> anyhow::Result<Vec<HandObservation>> { Ok(Vec::new()) }
//! }
//!
//! let mut tracker = HandTracker::new(Box::new(NoHands), DetectorConfig::default());
//! let frame = Frame::blank(640, 480);
//! let mut shown = tracker.find_hands(&frame, true).unwrap();
//! let lms = tracker.find_position(0, &mut shown, false);
//! assert!(!index_open(&lms) && !thumb_up(&lms));
//! ```

pub mod detector;
pub mod draw;
pub mod fingers;
pub mod frame;
pub mod landmark;
pub mod tracker;

pub use detector::{DetectorConfig, HandDetector, HandObservation, Handedness};
pub use frame::{Frame, PixelFormat};
pub use landmark::{Landmark, NormalizedLandmark, HAND_CONNECTIONS, NUM_LANDMARKS, TIP_IDS};
pub use tracker::HandTracker;
