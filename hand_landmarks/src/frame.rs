//! Owned 8-bit, 3-channel video frames.

use anyhow::{anyhow, Result};

/// Channel order of a [`Frame`]'s interleaved pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb24,
    Bgr24,
}

/// One captured image, row-major, 3 bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width:  u32,
    pub height: u32,
    pub format: PixelFormat,
    pixels:     Vec<u8>,
}

impl Frame {
    /// Wrap a pixel buffer, checking its length against the dimensions.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))? as usize;
        if pixels.len() != expected {
            return Err(anyhow!(
                "frame length mismatch: expected {}, got {}",
                expected,
                pixels.len()
            ));
        }
        Ok(Frame { width, height, format, pixels })
    }

    /// A black RGB frame.
    pub fn blank(width: u32, height: u32) -> Self {
        Frame {
            width,
            height,
            format: PixelFormat::Rgb24,
            pixels: vec![0; (width as usize) * (height as usize) * 3],
        }
    }

    pub fn pixels(&self) -> &[u8] { &self.pixels }

    pub fn into_pixels(self) -> Vec<u8> { self.pixels }

    /// Copy of this frame in the requested channel order.
    pub fn converted(&self, format: PixelFormat) -> Frame {
        if self.format == format {
            return self.clone();
        }
        let mut pixels = self.pixels.clone();
        for px in pixels.chunks_exact_mut(3) {
            px.swap(0, 2);
        }
        Frame { width: self.width, height: self.height, format, pixels }
    }

    /// `(r, g, b)` at `(x, y)`, regardless of storage order.
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 3;
        let (a, b, c) = (self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]);
        Some(match self.format {
            PixelFormat::Rgb24 => (a, b, c),
            PixelFormat::Bgr24 => (c, b, a),
        })
    }

    /// Write an `(r, g, b)` colour; coordinates outside the frame are ignored.
    pub fn put_rgb(&mut self, x: i32, y: i32, rgb: (u8, u8, u8)) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 3;
        let (r, g, b) = rgb;
        let px = match self.format {
            PixelFormat::Rgb24 => [r, g, b],
            PixelFormat::Bgr24 => [b, g, r],
        };
        self.pixels[i..i + 3].copy_from_slice(&px);
    }

    /// Pack into `0x00RRGGBB` words, the layout `minifb` blits.
    pub fn to_argb(&self, out: &mut Vec<u32>) {
        out.clear();
        out.extend(self.pixels.chunks_exact(3).map(|px| {
            let (r, g, b) = match self.format {
                PixelFormat::Rgb24 => (px[0], px[1], px[2]),
                PixelFormat::Bgr24 => (px[2], px[1], px[0]),
            };
            ((r as u32) << 16) | ((g as u32) << 8) | b as u32
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_short_buffer() {
        assert!(Frame::new(vec![0; 5], 1, 2, PixelFormat::Rgb24).is_err());
        assert!(Frame::new(vec![0; 6], 1, 2, PixelFormat::Rgb24).is_ok());
    }

    #[test]
    fn converted_swaps_red_and_blue() {
        let bgr = Frame::new(vec![10, 20, 30], 1, 1, PixelFormat::Bgr24).unwrap();
        let rgb = bgr.converted(PixelFormat::Rgb24);
        assert_eq!(rgb.pixels(), &[30, 20, 10]);
        assert_eq!(rgb.rgb_at(0, 0), bgr.rgb_at(0, 0));
    }

    #[test]
    fn put_rgb_respects_storage_order() {
        let mut f = Frame::blank(2, 1).converted(PixelFormat::Bgr24);
        f.put_rgb(1, 0, (255, 0, 0));
        assert_eq!(&f.pixels()[3..6], &[0, 0, 255]);
        f.put_rgb(-1, 0, (1, 1, 1));
        f.put_rgb(2, 0, (1, 1, 1));
        assert_eq!(f.rgb_at(0, 0), Some((0, 0, 0)));
    }

    #[test]
    fn to_argb_packs_rgb() {
        let f = Frame::new(vec![0x12, 0x34, 0x56], 1, 1, PixelFormat::Rgb24).unwrap();
        let mut buf = Vec::new();
        f.to_argb(&mut buf);
        assert_eq!(buf, vec![0x0012_3456]);
    }
}
