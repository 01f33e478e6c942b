use rayon::prelude::*;

use crate::filters::clamp_coord;
use crate::foundation::error::{StyleError, StyleResult};

/// Normalized 1-D Gaussian kernel of length `2 * radius + 1`.
pub(crate) fn gaussian_kernel(radius: u32, sigma: f32) -> StyleResult<Vec<f32>> {
    if radius == 0 {
        return Ok(vec![1.0]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(StyleError::invalid_parameter("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(StyleError::transform("gaussian kernel sum is zero"));
    }
    Ok(weights.into_iter().map(|w| (w / sum) as f32).collect())
}

/// Separable Gaussian blur over a packed 3-channel f32 buffer.
pub(crate) fn blur_rgb_f32(
    src: &[f32],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> StyleResult<Vec<f32>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(3))
        .ok_or_else(|| StyleError::invalid_parameter("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(StyleError::invalid_parameter(
            "blur_rgb_f32 expects src matching width*height*3",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel(radius, sigma)?;
    let mut tmp = vec![0f32; expected_len];
    let mut out = vec![0f32; expected_len];

    horizontal_pass(src, &mut tmp, width, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn horizontal_pass(src: &[f32], dst: &mut [f32], width: u32, k: &[f32]) {
    let radius = (k.len() / 2) as i64;
    let row_len = width as usize * 3;
    dst.par_chunks_mut(row_len)
        .zip(src.par_chunks(row_len))
        .for_each(|(dst_row, src_row)| {
            for x in 0..width as i64 {
                let mut acc = [0f32; 3];
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = clamp_coord(x + ki as i64 - radius, width);
                    for c in 0..3 {
                        acc[c] += kw * src_row[sx * 3 + c];
                    }
                }
                let o = x as usize * 3;
                dst_row[o..o + 3].copy_from_slice(&acc);
            }
        });
}

fn vertical_pass(src: &[f32], dst: &mut [f32], width: u32, height: u32, k: &[f32]) {
    let radius = (k.len() / 2) as i64;
    let row_len = width as usize * 3;
    dst.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for x in 0..row_len {
                let mut acc = 0f32;
                for (ki, &kw) in k.iter().enumerate() {
                    let sy = clamp_coord(y as i64 + ki as i64 - radius, height);
                    acc += kw * src[sy * row_len + x];
                }
                dst_row[x] = acc;
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/filters/blur.rs"]
mod tests;
