//! Simulated hands, driven from the visualizer's keyboard.

use std::sync::mpsc::{Receiver, TryRecvError};

use anyhow::Result;

use hand_landmarks::{
    DetectorConfig, Frame, HandDetector, HandObservation, Handedness, NormalizedLandmark,
    NUM_LANDMARKS,
};

// ════════════════════════════════════════════════════════════════════════════
// Input from the window
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    Toggle(SimKey),
}

/// Simulated key codes (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    LeftThumb,   // A
    LeftIndex,   // S
    RightIndex,  // K
    RightThumb,  // L
    Hands,       // H
    All,         // F
}

// ════════════════════════════════════════════════════════════════════════════
// Pose
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SimPose {
    visible:     bool,
    left_thumb:  bool,
    left_index:  bool,
    right_index: bool,
    right_thumb: bool,
}

impl Default for SimPose {
    fn default() -> Self {
        SimPose {
            visible:     true,
            left_thumb:  true,
            left_index:  true,
            right_index: true,
            right_thumb: true,
        }
    }
}

impl SimPose {
    fn apply(&mut self, key: SimKey) {
        match key {
            SimKey::LeftThumb  => self.left_thumb  = !self.left_thumb,
            SimKey::LeftIndex  => self.left_index  = !self.left_index,
            SimKey::RightIndex => self.right_index = !self.right_index,
            SimKey::RightThumb => self.right_thumb = !self.right_thumb,
            SimKey::Hands      => self.visible     = !self.visible,
            SimKey::All => {
                let all_up = self.left_thumb && self.left_index && self.right_index && self.right_thumb;
                let v = !all_up;
                self.left_thumb  = v;
                self.left_index  = v;
                self.right_index = v;
                self.right_thumb = v;
            }
        }
    }
}

/// Horizontal centres of hand 0 and hand 1.
const LEFT_CX:  f32 = 0.3;
const RIGHT_CX: f32 = 0.7;

const WRIST_Y: f32 = 0.85;
const MCP_Y:   f32 = 0.62;

/// 21 landmarks of an upright palm-facing hand centred on `cx`.
///
/// The non-index fingers follow the index finger so finger counts stay
/// meaningful.
fn hand_landmarks(cx: f32, thumb_up: bool, index_open: bool) -> Vec<NormalizedLandmark> {
    let mut lms = Vec::with_capacity(NUM_LANDMARKS);
    lms.push(NormalizedLandmark::new(cx, WRIST_Y));

    // thumb: cmc, mcp, ip, tip
    lms.push(NormalizedLandmark::new(cx + 0.04, 0.80));
    lms.push(NormalizedLandmark::new(cx + 0.07, 0.72));
    lms.push(NormalizedLandmark::new(cx + 0.08, 0.66));
    if thumb_up {
        lms.push(NormalizedLandmark::new(cx + 0.11, 0.60));
    } else {
        lms.push(NormalizedLandmark::new(cx + 0.05, 0.62));
    }

    // index, middle, ring, pinky: mcp, pip, dip, tip
    for dx in [0.03_f32, 0.0, -0.03, -0.06] {
        let x = cx + dx;
        lms.push(NormalizedLandmark::new(x, MCP_Y));
        lms.push(NormalizedLandmark::new(x, MCP_Y - 0.08));
        if index_open {
            lms.push(NormalizedLandmark::new(x, MCP_Y - 0.13));
            lms.push(NormalizedLandmark::new(x, MCP_Y - 0.18));
        } else {
            lms.push(NormalizedLandmark::new(x + 0.01, MCP_Y - 0.04));
            lms.push(NormalizedLandmark::new(x + 0.005, MCP_Y - 0.01));
        }
    }
    lms
}

// ════════════════════════════════════════════════════════════════════════════
// SimDetector
// ════════════════════════════════════════════════════════════════════════════

/// Detector that ignores the image and reports the hands the keyboard
/// describes.
pub struct SimDetector {
    rx:        Receiver<SimInput>,
    pose:      SimPose,
    connected: bool,
}

impl SimDetector {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimDetector { rx, pose: SimPose::default(), connected: true }
    }

    fn drain(&mut self) {
        while self.connected {
            match self.rx.try_recv() {
                Ok(SimInput::Toggle(key)) => {
                    self.pose.apply(key);
                    log::debug!("sim: {:?} → {:?}", key, self.pose);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("sim: input channel closed, pose frozen");
                    self.connected = false;
                }
            }
        }
    }
}

impl HandDetector for SimDetector {
    fn name(&self) -> &'static str { "sim" }

    fn detect(&mut self, _rgb: &Frame, config: &DetectorConfig) -> Result<Vec<HandObservation>> {
        self.drain();
        if !self.pose.visible {
            return Ok(Vec::new());
        }
        let p = self.pose;
        let hands = [
            (LEFT_CX,  p.left_thumb,  p.left_index,  Handedness::Left),
            (RIGHT_CX, p.right_thumb, p.right_index, Handedness::Right),
        ];
        Ok(hands
            .into_iter()
            .take(config.max_num_hands)
            .map(|(cx, thumb, index, side)| HandObservation {
                landmarks:  hand_landmarks(cx, thumb, index),
                handedness: Some(side),
                score:      1.0,
            })
            .collect())
    }
}
