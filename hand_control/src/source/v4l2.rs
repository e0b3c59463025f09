//! V4L2 camera source.
//!
//! Opens `/dev/video<N>`, asks for RGB3 at the preferred size and accepts
//! whatever the driver settles on among RGB3, YUYV and MJPG.

use anyhow::{anyhow, Context, Result};
use ouroboros::self_referencing;

use hand_landmarks::{Frame, PixelFormat};

use super::convert::{to_rgb, CameraFormat};
use super::{FrameSource, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Configuration for a V4L2 source.
#[derive(Clone, Debug)]
pub struct V4l2Config {
    /// Device path (e.g., "/dev/video0")
    pub device: String,
    /// Requested frame rate; `0` leaves the driver default.
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for V4l2Config {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            target_fps: 30,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Wire {
    Raw(CameraFormat),
    Mjpg,
}

#[self_referencing]
struct DeviceState {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this, v4l::Device>,
}

pub struct V4l2Source {
    config: V4l2Config,
    state: DeviceState,
    wire: Wire,
    width: u32,
    height: u32,
    frame_count: u64,
}

impl V4l2Source {
    pub fn open(config: V4l2Config) -> Result<Self> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let mut device = v4l::Device::with_path(&config.device)
            .with_context(|| format!("open v4l2 device {}", config.device))?;
        let mut format = device.format().context("read v4l2 format")?;
        format.width = config.width;
        format.height = config.height;
        format.fourcc = v4l::FourCC::new(b"RGB3");

        let format = match device.set_format(&format) {
            Ok(format) => format,
            Err(err) => {
                log::warn!("V4l2Source: failed to set format on {}: {}", config.device, err);
                device.format().context("read v4l2 format after set failure")?
            }
        };

        let wire = match &format.fourcc.repr {
            b"RGB3" => Wire::Raw(CameraFormat::Rgb24),
            b"YUYV" => Wire::Raw(CameraFormat::Yuyv),
            b"MJPG" => Wire::Mjpg,
            other => {
                return Err(anyhow!(
                    "{} delivers unsupported pixel format {}",
                    config.device,
                    String::from_utf8_lossy(other)
                ))
            }
        };

        if config.target_fps > 0 {
            let params = v4l::video::capture::Parameters::with_fps(config.target_fps);
            if let Err(err) = device.set_params(&params) {
                log::warn!("V4l2Source: failed to set fps on {}: {}", config.device, err);
            }
        }

        let state = DeviceStateTryBuilder {
            device,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, 4)
                    .map_err(|err| anyhow::Error::new(err).context("create v4l2 buffer stream"))
            },
        }
        .try_build()?;

        log::info!(
            "V4l2Source: connected to {} ({}x{}, {:?})",
            config.device,
            format.width,
            format.height,
            wire
        );
        Ok(Self {
            width: format.width,
            height: format.height,
            config,
            state,
            wire,
            frame_count: 0,
        })
    }
}

impl FrameSource for V4l2Source {
    fn describe(&self) -> String {
        format!(
            "camera {} ({}x{}, {} frames)",
            self.config.device, self.width, self.height, self.frame_count
        )
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        use v4l::io::traits::CaptureStream;

        let (wire, width, height) = (self.wire, self.width, self.height);
        let (pixels, width, height) = self.state.with_stream_mut(|stream| -> Result<_> {
            let (buf, _meta) = stream.next().context("capture v4l2 frame")?;
            match wire {
                Wire::Raw(format) => Ok((to_rgb(buf, width, height, format)?, width, height)),
                Wire::Mjpg => {
                    let img = image::load_from_memory_with_format(buf, image::ImageFormat::Jpeg)
                        .context("decode MJPG frame")?
                        .to_rgb8();
                    let (w, h) = img.dimensions();
                    Ok((img.into_raw(), w, h))
                }
            }
        })?;

        self.frame_count += 1;
        Ok(Some(Frame::new(pixels, width, height, PixelFormat::Rgb24)?))
    }
}
