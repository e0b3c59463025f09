//! Frame sources.
//!
//! - Synthetic frames (`stub`, `stub://WxH`): always available
//! - Camera by device index (feature: v4l2)
//! - Local video files (feature: ffmpeg)
//!
//! A source is opened once.  `next_frame` returns `Ok(None)` when the
//! source is exhausted and `Err` when capture fails; either ends the loop.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use hand_landmarks::Frame;

pub mod convert;
#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;
pub mod synthetic;
#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use synthetic::SyntheticSource;

pub const DEFAULT_WIDTH:  u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

/// Anything that yields successive frames.
pub trait FrameSource {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;

    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Where frames come from, as given on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VideoSource {
    /// Generated frames of the given size.
    Synthetic { width: u32, height: u32 },
    /// Webcam index (`/dev/video<N>` on Linux).
    Camera(u32),
    /// Video file path.
    File(PathBuf),
}

impl Default for VideoSource {
    fn default() -> Self {
        VideoSource::Synthetic { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT }
    }
}

impl FromStr for VideoSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow!("empty video source"));
        }
        if s == "stub" {
            return Ok(VideoSource::default());
        }
        if let Some(dims) = s.strip_prefix("stub://") {
            let (w, h) = dims
                .split_once('x')
                .ok_or_else(|| anyhow!("expected stub://WIDTHxHEIGHT, got '{}'", s))?;
            let width: u32 = w.parse().with_context(|| format!("bad width in '{}'", s))?;
            let height: u32 = h.parse().with_context(|| format!("bad height in '{}'", s))?;
            if width == 0 || height == 0 {
                return Err(anyhow!("synthetic frame size must be non-zero"));
            }
            return Ok(VideoSource::Synthetic { width, height });
        }
        if let Ok(index) = s.parse::<u32>() {
            return Ok(VideoSource::Camera(index));
        }
        Ok(VideoSource::File(PathBuf::from(s)))
    }
}

impl fmt::Display for VideoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoSource::Synthetic { width, height } => write!(f, "stub://{}x{}", width, height),
            VideoSource::Camera(i) => write!(f, "{}", i),
            VideoSource::File(p)   => write!(f, "{}", p.display()),
        }
    }
}

/// Open `source`, failing early when its backend was not compiled in.
pub fn open_source(source: &VideoSource) -> Result<Box<dyn FrameSource>> {
    let opened: Box<dyn FrameSource> = match source {
        VideoSource::Synthetic { width, height } => {
            Box::new(SyntheticSource::new(*width, *height))
        }
        VideoSource::Camera(index) => open_camera(*index)?,
        VideoSource::File(path) => open_file(path)?,
    };
    log::info!("frame source: {}", opened.describe());
    Ok(opened)
}

#[cfg(feature = "v4l2")]
fn open_camera(index: u32) -> Result<Box<dyn FrameSource>> {
    let config = v4l2::V4l2Config {
        device: format!("/dev/video{}", index),
        ..v4l2::V4l2Config::default()
    };
    Ok(Box::new(v4l2::V4l2Source::open(config)?))
}

#[cfg(not(feature = "v4l2"))]
fn open_camera(index: u32) -> Result<Box<dyn FrameSource>> {
    Err(anyhow!(
        "camera {} requested but capture support is not built; rebuild with --features v4l2",
        index
    ))
}

#[cfg(feature = "ffmpeg")]
fn open_file(path: &std::path::Path) -> Result<Box<dyn FrameSource>> {
    Ok(Box::new(ffmpeg::FfmpegFileSource::open(path)?))
}

#[cfg(not(feature = "ffmpeg"))]
fn open_file(path: &std::path::Path) -> Result<Box<dyn FrameSource>> {
    Err(anyhow!(
        "video file '{}' requested but decoding support is not built; rebuild with --features ffmpeg",
        path.display()
    ))
}
