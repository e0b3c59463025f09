//! External landmark model in a child process.
//!
//! Protocol, all on the child's stdio:
//!
//! 1. the child prints `READY` once its model is loaded;
//! 2. per frame the parent writes `width`, `height`, `channels` as
//!    little-endian `u32`, then `width * height * channels` RGB bytes;
//! 3. the child answers with one JSON line (see [`super`]).
//!
//! Detector settings are passed as command-line flags when the child starts.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::{anyhow, bail, Context, Result};

use hand_landmarks::{DetectorConfig, Frame, HandDetector, HandObservation, PixelFormat};

use super::DetectionRecord;

pub struct BridgeDetector {
    command: String,
    process: Child,
    stdin:   ChildStdin,
    stdout:  BufReader<ChildStdout>,
}

impl BridgeDetector {
    /// Start `command` (split on whitespace) and wait for its handshake.
    pub fn spawn(command: &str, config: &DetectorConfig) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or_else(|| anyhow!("empty bridge command"))?;

        let mut cmd = Command::new(program);
        cmd.args(parts)
            .arg("--max-num-hands")
            .arg(config.max_num_hands.to_string())
            .arg("--min-detection-confidence")
            .arg(config.min_detection_confidence.to_string())
            .arg("--min-tracking-confidence")
            .arg(config.min_tracking_confidence.to_string());
        if config.static_image_mode {
            cmd.arg("--static-image-mode");
        }

        log::info!("BridgeDetector: starting '{}'", command);
        let mut process = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to start detector '{}'", command))?;

        let stdin = process.stdin.take().context("detector stdin unavailable")?;
        let stdout = process.stdout.take().context("detector stdout unavailable")?;
        let mut bridge = BridgeDetector {
            command: command.to_string(),
            process,
            stdin,
            stdout: BufReader::new(stdout),
        };

        let mut ready = String::new();
        bridge
            .stdout
            .read_line(&mut ready)
            .context("read detector handshake")?;
        if ready.trim() != "READY" {
            bail!("detector '{}' did not signal ready, got: {:?}", command, ready.trim());
        }
        log::info!("BridgeDetector: ready");
        Ok(bridge)
    }

    fn send_frame(&mut self, rgb: &Frame) -> Result<()> {
        let header = [rgb.width, rgb.height, 3u32];
        for v in header {
            self.stdin.write_all(&v.to_le_bytes())?;
        }
        self.stdin.write_all(rgb.pixels())?;
        self.stdin.flush()?;
        Ok(())
    }
}

impl HandDetector for BridgeDetector {
    fn name(&self) -> &'static str { "bridge" }

    fn detect(&mut self, rgb: &Frame, config: &DetectorConfig) -> Result<Vec<HandObservation>> {
        let rgb = rgb.converted(PixelFormat::Rgb24);
        self.send_frame(&rgb)
            .with_context(|| format!("send frame to detector '{}'", self.command))?;

        let mut response = String::new();
        let n = self
            .stdout
            .read_line(&mut response)
            .context("read detector response")?;
        if n == 0 {
            let status = self.process.try_wait().ok().flatten();
            bail!("detector '{}' exited ({:?})", self.command, status);
        }

        let record: DetectionRecord = serde_json::from_str(response.trim())
            .with_context(|| format!("bad detector response: {}", response.trim()))?;
        if let Some(msg) = &record.error {
            bail!("detector reported: {}", msg);
        }
        let hands = record.into_hands(config);
        log::trace!("BridgeDetector: {} hand(s)", hands.len());
        Ok(hands)
    }
}

impl Drop for BridgeDetector {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
