//! 8-bit grayscale BMP output for previewing generated noise

use super::output::OutputMinMax;
use crate::core::error::{FastNoiseError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const FILE_HEADER_SIZE: u32 = 14;
const CORE_HEADER_SIZE: u32 = 12;
const PALETTE_SIZE: u32 = 256 * 3;
pub const IMAGE_DATA_OFFSET: u32 = FILE_HEADER_SIZE + CORE_HEADER_SIZE + PALETTE_SIZE;

/// 把噪声值线性映射到 0..=255
#[inline]
pub fn normalize_to_u8(value: f32, min_max: &OutputMinMax) -> u8 {
    let range = min_max.range();
    if !(range > 0.0) || !range.is_finite() {
        return 0;
    }
    let scaled = ((value - min_max.min) * (255.0 / range)).round();
    scaled.clamp(0.0, 255.0) as u8
}

/// 每行按 4 字节对齐
#[inline]
pub fn row_stride(width: u16) -> usize {
    (width as usize + 3) & !3
}

pub fn write_grayscale_bmp<W: Write>(
    writer: &mut W,
    width: u16,
    height: u16,
    noise: &[f32],
    min_max: &OutputMinMax,
) -> Result<()> {
    let pixel_count = width as usize * height as usize;
    if noise.len() < pixel_count {
        return Err(FastNoiseError::BufferTooSmall {
            required: pixel_count,
            actual: noise.len(),
        });
    }

    let stride = row_stride(width);
    let file_size = IMAGE_DATA_OFFSET + (stride * height as usize) as u32;

    // BITMAPFILEHEADER
    writer.write_all(b"BM")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?;
    writer.write_all(&IMAGE_DATA_OFFSET.to_le_bytes())?;

    // BITMAPCOREHEADER
    writer.write_all(&CORE_HEADER_SIZE.to_le_bytes())?;
    writer.write_all(&width.to_le_bytes())?;
    writer.write_all(&height.to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?; // color planes
    writer.write_all(&8u16.to_le_bytes())?; // bit depth

    // 灰度调色板 (B, G, R)
    for i in 0..=255u8 {
        writer.write_all(&[i, i, i])?;
    }

    let mut row = vec![0u8; stride];
    for y in 0..height as usize {
        let start = y * width as usize;
        for (pixel, &value) in row.iter_mut().zip(&noise[start..start + width as usize]) {
            *pixel = normalize_to_u8(value, min_max);
        }
        writer.write_all(&row)?;
    }

    Ok(())
}

pub fn save_grayscale_bmp(
    path: &Path,
    width: u16,
    height: u16,
    noise: &[f32],
    min_max: &OutputMinMax,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_grayscale_bmp(&mut writer, width, height, noise, min_max)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_to_u8() {
        let bounds = OutputMinMax::new(-1.0, 1.0);
        assert_eq!(normalize_to_u8(-1.0, &bounds), 0);
        assert_eq!(normalize_to_u8(1.0, &bounds), 255);
        assert_eq!(normalize_to_u8(0.0, &bounds), 128);
        assert_eq!(normalize_to_u8(5.0, &bounds), 255, "values above max clamp");
        assert_eq!(normalize_to_u8(-5.0, &bounds), 0, "values below min clamp");

        let flat = OutputMinMax::new(0.5, 0.5);
        assert_eq!(normalize_to_u8(0.5, &flat), 0);
        assert_eq!(normalize_to_u8(0.5, &OutputMinMax::default()), 0);
    }

    #[test]
    fn test_header_layout() -> anyhow::Result<()> {
        let noise = [0.0f32, 0.5, 1.0, 0.25, 0.75, 1.0];
        let mut bytes = Vec::new();
        write_grayscale_bmp(&mut bytes, 3, 2, &noise, &OutputMinMax::new(0.0, 1.0))?;

        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(IMAGE_DATA_OFFSET, 14 + 12 + 768);

        let file_size = u32::from_le_bytes(bytes[2..6].try_into()?);
        assert_eq!(file_size as usize, bytes.len());
        assert_eq!(file_size, IMAGE_DATA_OFFSET + 4 * 2, "rows of 3 pixels pad to 4 bytes");

        let data_offset = u32::from_le_bytes(bytes[10..14].try_into()?);
        assert_eq!(data_offset, IMAGE_DATA_OFFSET);

        assert_eq!(u32::from_le_bytes(bytes[14..18].try_into()?), 12);
        assert_eq!(u16::from_le_bytes(bytes[18..20].try_into()?), 3);
        assert_eq!(u16::from_le_bytes(bytes[20..22].try_into()?), 2);
        assert_eq!(u16::from_le_bytes(bytes[24..26].try_into()?), 8);

        // 调色板第 128 项
        let palette = 26 + 128 * 3;
        assert_eq!(&bytes[palette..palette + 3], &[128, 128, 128]);

        let data = &bytes[IMAGE_DATA_OFFSET as usize..];
        assert_eq!(data, &[0, 128, 255, 0, 64, 191, 255, 0]);
        Ok(())
    }

    #[test]
    fn test_rejects_short_input() {
        let mut bytes = Vec::new();
        let result = write_grayscale_bmp(&mut bytes, 4, 4, &[0.0; 15], &OutputMinMax::new(0.0, 1.0));
        assert!(matches!(result, Err(FastNoiseError::BufferTooSmall { required: 16, actual: 15 })));
        assert!(bytes.is_empty(), "nothing is written when the input is short");
    }

    #[test]
    fn test_save_to_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("preview.bmp");
        let noise: Vec<f32> = (0..16).map(|i| i as f32 / 15.0).collect();

        save_grayscale_bmp(&path, 4, 4, &noise, &OutputMinMax::from_values(&noise))?;

        let written = std::fs::read(&path)?;
        assert_eq!(written.len(), IMAGE_DATA_OFFSET as usize + 16);
        assert_eq!(written[IMAGE_DATA_OFFSET as usize], 0);
        assert_eq!(*written.last().unwrap(), 255);
        Ok(())
    }
}
