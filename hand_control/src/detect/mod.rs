//! Detector backends and how they are chosen.
//!
//! All of them implement [`hand_landmarks::HandDetector`]:
//!
//! * [`SimDetector`]: synthetic hands toggled from the keyboard.
//! * [`ReplayDetector`]: one recorded detection per frame from a JSON-lines file.
//! * [`BridgeDetector`]: an external landmark model in a child process.
//!
//! Replay files and the bridge share one JSON shape per frame:
//!
//! ```text
//! {"hands":[{"handedness":"Left","score":0.93,"landmarks":[{"x":0.41,"y":0.62,"z":0.0}, ...21]}]}
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::Receiver;

use anyhow::{anyhow, Result};
use serde::Deserialize;

use hand_landmarks::{DetectorConfig, HandDetector, HandObservation, NUM_LANDMARKS};

pub mod bridge;
pub mod replay;
pub mod sim;

pub use bridge::BridgeDetector;
pub use replay::ReplayDetector;
pub use sim::{SimDetector, SimInput, SimKey};

/// Which backend to run, as given on the command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DetectorKind {
    #[default]
    Sim,
    Replay(PathBuf),
    Bridge(String),
}

impl DetectorKind {
    pub fn is_sim(&self) -> bool { matches!(self, DetectorKind::Sim) }
}

impl FromStr for DetectorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "sim" {
            return Ok(DetectorKind::Sim);
        }
        if let Some(path) = s.strip_prefix("replay:") {
            if path.is_empty() {
                return Err(anyhow!("replay detector needs a file: replay:PATH"));
            }
            return Ok(DetectorKind::Replay(PathBuf::from(path)));
        }
        if let Some(cmd) = s.strip_prefix("bridge:") {
            if cmd.trim().is_empty() {
                return Err(anyhow!("bridge detector needs a command: bridge:CMD"));
            }
            return Ok(DetectorKind::Bridge(cmd.trim().to_string()));
        }
        Err(anyhow!("unknown detector '{}' (expected sim, replay:PATH or bridge:CMD)", s))
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorKind::Sim         => f.write_str("sim"),
            DetectorKind::Replay(p)   => write!(f, "replay:{}", p.display()),
            DetectorKind::Bridge(cmd) => write!(f, "bridge:{}", cmd),
        }
    }
}

/// Build the detector.  `sim_rx` feeds the simulated hands and is only
/// used by [`DetectorKind::Sim`].
pub fn open_detector(
    kind: &DetectorKind,
    config: &DetectorConfig,
    sim_rx: Option<Receiver<SimInput>>,
) -> Result<Box<dyn HandDetector>> {
    Ok(match kind {
        DetectorKind::Sim => {
            let rx = sim_rx.ok_or_else(|| anyhow!("simulated hands need a window to read keys from"))?;
            Box::new(SimDetector::new(rx))
        }
        DetectorKind::Replay(path) => Box::new(ReplayDetector::open(path)?),
        DetectorKind::Bridge(cmd) => Box::new(BridgeDetector::spawn(cmd, config)?),
    })
}

/// One frame's worth of detector output on the wire.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DetectionRecord {
    #[serde(default)]
    pub hands: Vec<HandObservation>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DetectionRecord {
    /// Drop malformed and low-confidence hands, keeping detector order.
    pub fn into_hands(self, config: &DetectorConfig) -> Vec<HandObservation> {
        self.hands
            .into_iter()
            .filter(|hand| {
                if hand.landmarks.len() != NUM_LANDMARKS {
                    log::warn!(
                        "expected {} landmarks, got {}; hand skipped",
                        NUM_LANDMARKS,
                        hand.landmarks.len()
                    );
                    return false;
                }
                hand.score >= config.min_detection_confidence
            })
            .collect()
    }
}
