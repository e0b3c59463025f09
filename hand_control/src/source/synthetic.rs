//! Generated frames for simulation mode and tests.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use hand_landmarks::{Frame, PixelFormat};

use super::FrameSource;

const DEFAULT_FPS: u32 = 30;

/// Dark moving gradient, paced to a target frame rate.
pub struct SyntheticSource {
    width:       u32,
    height:      u32,
    target_fps:  u32,
    limit:       Option<u64>,
    frame_count: u64,
    next_due:    Option<Instant>,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32) -> Self {
        SyntheticSource {
            width,
            height,
            target_fps: DEFAULT_FPS,
            limit: None,
            frame_count: 0,
            next_due: None,
        }
    }

    /// `0` disables pacing.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Report exhaustion after `frames` frames.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    pub fn frames_captured(&self) -> u64 { self.frame_count }

    fn pace(&mut self) {
        if self.target_fps == 0 {
            return;
        }
        let period = Duration::from_secs(1) / self.target_fps;
        let now = Instant::now();
        if let Some(due) = self.next_due {
            if due > now {
                thread::sleep(due - now);
            }
        }
        self.next_due = Some(self.next_due.map_or(now, |d| d.max(now)) + period);
    }

    fn generate_pixels(&self) -> Vec<u8> {
        let (w, h) = (self.width as usize, self.height as usize);
        let shift = (self.frame_count % 64) as usize;
        let mut pixels = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                let v = (((x + shift) % w) * 48 / w + y * 24 / h) as u8;
                pixels.extend_from_slice(&[v / 2, v / 2 + 8, v + 16]);
            }
        }
        pixels
    }
}

impl FrameSource for SyntheticSource {
    fn describe(&self) -> String {
        format!("synthetic {}x{} @ {} fps", self.width, self.height, self.target_fps)
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.limit.is_some_and(|limit| self.frame_count >= limit) {
            return Ok(None);
        }
        self.pace();
        let pixels = self.generate_pixels();
        self.frame_count += 1;
        Ok(Some(Frame::new(pixels, self.width, self.height, PixelFormat::Rgb24)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_frames_of_requested_size() {
        let mut src = SyntheticSource::new(32, 24).with_fps(0);
        let f = src.next_frame().unwrap().unwrap();
        assert_eq!((f.width, f.height, f.format), (32, 24, PixelFormat::Rgb24));
        assert_eq!(f.pixels().len(), 32 * 24 * 3);
    }

    #[test]
    fn limit_exhausts_source() {
        let mut src = SyntheticSource::new(4, 4).with_fps(0).with_limit(2);
        assert!(src.next_frame().unwrap().is_some());
        assert!(src.next_frame().unwrap().is_some());
        assert!(src.next_frame().unwrap().is_none());
        assert_eq!(src.frames_captured(), 2);
    }

    #[test]
    fn frames_change_over_time() {
        let mut src = SyntheticSource::new(64, 2).with_fps(0);
        let a = src.next_frame().unwrap().unwrap();
        let b = src.next_frame().unwrap().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn pacing_spaces_frames() {
        let mut src = SyntheticSource::new(2, 2).with_fps(50);
        let start = Instant::now();
        for _ in 0..3 {
            src.next_frame().unwrap();
        }
        // first frame is immediate, the next two wait one period each
        assert!(start.elapsed() >= Duration::from_millis(38));
    }
}
