//! Banded parallel generation on top of the uniform grid generators
//!
//! 均匀网格上每个点的值只取决于坐标，所以把网格按行（3D 按层）切成若干段，
//! 每段用偏移后的起点单独生成，结果和一次性生成完全一致。

use super::node::{FastNoise, grid_len};
use super::output::OutputMinMax;
use crate::core::error::{FastNoiseError, Result};
use log::{Level, debug, log_enabled};
use rayon::prelude::*;
use std::time::Instant;

pub const DEFAULT_BAND_ROWS: usize = 64;

pub fn gen_uniform_grid_2d_par(
    node: &FastNoise,
    x_start: i32,
    y_start: i32,
    x_size: i32,
    y_size: i32,
    frequency: f32,
    seed: i32,
    band_rows: usize,
) -> Result<(Vec<f32>, OutputMinMax)> {
    if band_rows == 0 {
        return Err(FastNoiseError::InvalidArgument("band_rows must be greater than 0".to_string()));
    }

    let total = grid_len(&[x_size, y_size])?;
    let mut noise = vec![0f32; total];
    if total == 0 {
        return Ok((noise, OutputMinMax::default()));
    }

    check_axis_range("y", y_start, y_size)?;
    // total > 0，所以 y_size >= 1，限制之后 row_len * band_rows 不会超过 total
    let band_rows = band_rows.min(y_size as usize);

    let start_time = Instant::now();
    let row_len = x_size as usize;

    let band_bounds: Vec<OutputMinMax> = noise
        .par_chunks_mut(row_len * band_rows)
        .enumerate()
        .map(|(band_idx, band)| {
            let rows = (band.len() / row_len) as i32;
            let band_y = y_start + (band_idx * band_rows) as i32;
            node.gen_uniform_grid_2d(band, x_start, band_y, x_size, rows, frequency, seed)
        })
        .collect::<Result<_>>()?;

    let min_max = merge_all(&band_bounds);

    if log_enabled!(Level::Debug) {
        debug!(
            "Parallel 2D grid {}x{} in {} bands took {} ms",
            x_size,
            y_size,
            band_bounds.len(),
            start_time.elapsed().as_millis()
        );
    }

    Ok((noise, min_max))
}

pub fn gen_uniform_grid_3d_par(
    node: &FastNoise,
    x_start: i32,
    y_start: i32,
    z_start: i32,
    x_size: i32,
    y_size: i32,
    z_size: i32,
    frequency: f32,
    seed: i32,
    band_slices: usize,
) -> Result<(Vec<f32>, OutputMinMax)> {
    if band_slices == 0 {
        return Err(FastNoiseError::InvalidArgument("band_slices must be greater than 0".to_string()));
    }

    let total = grid_len(&[x_size, y_size, z_size])?;
    let mut noise = vec![0f32; total];
    if total == 0 {
        return Ok((noise, OutputMinMax::default()));
    }

    check_axis_range("z", z_start, z_size)?;
    let band_slices = band_slices.min(z_size as usize);

    let start_time = Instant::now();
    let slice_len = x_size as usize * y_size as usize;

    let band_bounds: Vec<OutputMinMax> = noise
        .par_chunks_mut(slice_len * band_slices)
        .enumerate()
        .map(|(band_idx, band)| {
            let slices = (band.len() / slice_len) as i32;
            let band_z = z_start + (band_idx * band_slices) as i32;
            node.gen_uniform_grid_3d(band, x_start, y_start, band_z, x_size, y_size, slices, frequency, seed)
        })
        .collect::<Result<_>>()?;

    let min_max = merge_all(&band_bounds);

    if log_enabled!(Level::Debug) {
        debug!(
            "Parallel 3D grid {}x{}x{} in {} bands took {} ms",
            x_size,
            y_size,
            z_size,
            band_bounds.len(),
            start_time.elapsed().as_millis()
        );
    }

    Ok((noise, min_max))
}

/// 切段时每段的起点都落在 [start, start + size - 1] 内，这里先确认最后一行不会溢出 i32
fn check_axis_range(axis: &str, start: i32, size: i32) -> Result<()> {
    start.checked_add(size - 1).map(|_| ()).ok_or_else(|| {
        FastNoiseError::InvalidArgument(format!("{} range {} + {} overflows i32", axis, start, size))
    })
}

fn merge_all(bounds: &[OutputMinMax]) -> OutputMinMax {
    bounds
        .iter()
        .fold(OutputMinMax::default(), |acc, band| acc.merged(band))
}
