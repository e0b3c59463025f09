//! Recorded detections, one JSON line per frame.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use hand_landmarks::{DetectorConfig, Frame, HandDetector, HandObservation};

use super::DetectionRecord;

/// Plays back a detection file.  Blank lines are skipped; once the file
/// runs out every frame reports no hands.
pub struct ReplayDetector {
    lines:  Box<dyn BufRead>,
    line:   usize,
    frames: u64,
    ended:  bool,
}

impl ReplayDetector {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open detection file '{}'", path.display()))?;
        log::info!("ReplayDetector: reading {}", path.display());
        Ok(Self::from_reader(BufReader::new(file)))
    }

    pub fn from_reader<R: BufRead + 'static>(reader: R) -> Self {
        ReplayDetector { lines: Box::new(reader), line: 0, frames: 0, ended: false }
    }

    /// Frames answered from the file so far.
    pub fn frames(&self) -> u64 { self.frames }

    fn next_record(&mut self) -> Result<Option<DetectionRecord>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            let n = self
                .lines
                .read_line(&mut buf)
                .with_context(|| format!("read detection line {}", self.line + 1))?;
            if n == 0 {
                return Ok(None);
            }
            self.line += 1;
            if buf.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(buf.trim())
                .with_context(|| format!("bad detection record on line {}", self.line))?;
            return Ok(Some(record));
        }
    }
}

impl HandDetector for ReplayDetector {
    fn name(&self) -> &'static str { "replay" }

    fn detect(&mut self, _rgb: &Frame, config: &DetectorConfig) -> Result<Vec<HandObservation>> {
        if self.ended {
            return Ok(Vec::new());
        }
        match self.next_record()? {
            Some(record) => {
                if let Some(msg) = &record.error {
                    return Err(anyhow!("recorded detector error on line {}: {}", self.line, msg));
                }
                self.frames += 1;
                Ok(record.into_hands(config))
            }
            None => {
                log::info!("ReplayDetector: end of file after {} frames", self.frames);
                self.ended = true;
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    fn hand_json(score: f32) -> String {
        let pts: Vec<String> = (0..21).map(|i| format!("{{\"x\":0.{:02},\"y\":0.5}}", i)).collect();
        format!("{{\"score\":{},\"landmarks\":[{}]}}", score, pts.join(","))
    }

    fn frame() -> Frame { Frame::blank(4, 4) }

    #[test]
    fn replays_lines_in_order_then_goes_empty() {
        let data = format!(
            "{{\"hands\":[{}]}}\n\n{{\"hands\":[{},{}]}}\n",
            hand_json(0.9),
            hand_json(0.9),
            hand_json(0.8)
        );
        let mut det = ReplayDetector::from_reader(Cursor::new(data));
        let cfg = DetectorConfig::default();
        assert_eq!(det.detect(&frame(), &cfg).unwrap().len(), 1);
        assert_eq!(det.detect(&frame(), &cfg).unwrap().len(), 2);
        assert!(det.detect(&frame(), &cfg).unwrap().is_empty());
        assert!(det.detect(&frame(), &cfg).unwrap().is_empty());
        assert_eq!(det.frames(), 2);
    }

    #[test]
    fn low_confidence_hands_are_dropped() {
        let data = format!("{{\"hands\":[{},{}]}}\n", hand_json(0.2), hand_json(0.95));
        let mut det = ReplayDetector::from_reader(Cursor::new(data));
        let hands = det.detect(&frame(), &DetectorConfig::default()).unwrap();
        assert_eq!(hands.len(), 1);
        assert!((hands[0].score - 0.95).abs() < 1e-6);
    }

    #[test]
    fn malformed_line_is_an_error() {
        let mut det = ReplayDetector::from_reader(Cursor::new("{not json\n"));
        let err = det.detect(&frame(), &DetectorConfig::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 1"));
    }

    #[test]
    fn recorded_error_is_an_error() {
        let mut det = ReplayDetector::from_reader(Cursor::new("{\"error\":\"model crashed\"}\n"));
        let err = det.detect(&frame(), &DetectorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("model crashed"));
    }

    #[test]
    fn opens_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"hands\":[{}]}}", hand_json(1.0)).unwrap();
        let mut det = ReplayDetector::open(file.path()).unwrap();
        assert_eq!(det.detect(&frame(), &DetectorConfig::default()).unwrap().len(), 1);
        assert!(ReplayDetector::open(Path::new("/nonexistent/hands.jsonl")).is_err());
    }
}
