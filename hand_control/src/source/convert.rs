//! Camera pixel layouts to packed RGB24.

use anyhow::{anyhow, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraFormat {
    Rgb24,
    /// Packed 4:2:2, `Y0 U Y1 V` per pixel pair.
    Yuyv,
}

pub fn to_rgb(pixels: &[u8], width: u32, height: u32, format: CameraFormat) -> Result<Vec<u8>> {
    match format {
        CameraFormat::Rgb24 => {
            let expected = plane_len(width, height, 3)?;
            // drivers may pad the buffer; only a short one is an error
            if pixels.len() < expected {
                return Err(anyhow!(
                    "RGB frame length mismatch: expected {}, got {}",
                    expected,
                    pixels.len()
                ));
            }
            Ok(pixels[..expected].to_vec())
        }
        CameraFormat::Yuyv => yuyv_to_rgb(pixels, width, height),
    }
}

fn plane_len(width: u32, height: u32, bytes_per_pixel: u32) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(bytes_per_pixel))
        .map(|v| v as usize)
        .ok_or_else(|| anyhow!("frame dimensions overflow"))
}

fn yuyv_to_rgb(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    if width % 2 != 0 {
        return Err(anyhow!("YUYV frame width must be even, got {}", width));
    }
    let expected = plane_len(width, height, 2)?;
    if pixels.len() < expected {
        return Err(anyhow!(
            "YUYV frame length mismatch: expected {}, got {}",
            expected,
            pixels.len()
        ));
    }

    let mut rgb = Vec::with_capacity(expected / 2 * 3);
    for quad in pixels[..expected].chunks_exact(4) {
        let u = quad[1] as f32 - 128.0;
        let v = quad[3] as f32 - 128.0;
        for &y in &[quad[0], quad[2]] {
            let y = y as f32;
            rgb.push(clamp_to_u8(y + 1.402_f32 * v));
            rgb.push(clamp_to_u8(y - 0.344_136_f32 * u - 0.714_136_f32 * v));
            rgb.push(clamp_to_u8(y + 1.772_f32 * u));
        }
    }
    Ok(rgb)
}

fn clamp_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuyv_neutral_chroma_is_gray() -> Result<()> {
        let yuyv = vec![100, 128, 200, 128];
        let rgb = to_rgb(&yuyv, 2, 1, CameraFormat::Yuyv)?;
        assert_eq!(rgb, vec![100, 100, 100, 200, 200, 200]);
        Ok(())
    }

    #[test]
    fn yuyv_red_chroma_raises_red() -> Result<()> {
        let rgb = to_rgb(&[128, 128, 128, 255], 2, 1, CameraFormat::Yuyv)?;
        assert!(rgb[0] > 250 && rgb[2] == 128);
        Ok(())
    }

    #[test]
    fn yuyv_rejects_odd_width_and_short_buffers() {
        assert!(to_rgb(&[0; 6], 3, 1, CameraFormat::Yuyv).is_err());
        assert!(to_rgb(&[0; 3], 2, 1, CameraFormat::Yuyv).is_err());
    }

    #[test]
    fn rgb_trims_padding() -> Result<()> {
        let rgb = to_rgb(&[1, 2, 3, 9, 9], 1, 1, CameraFormat::Rgb24)?;
        assert_eq!(rgb, vec![1, 2, 3]);
        assert!(to_rgb(&[1, 2], 1, 1, CameraFormat::Rgb24).is_err());
        Ok(())
    }
}
