use rayon::prelude::*;

use crate::filters::clamp_coord;
use crate::foundation::error::{StyleError, StyleResult};
use crate::foundation::math::clamp_u8;
use crate::frame::Frame;

/// Edge-preserving bilateral filter over a circular window of `diameter` pixels.
///
/// Range weights use the summed absolute channel difference, so flat regions are smoothed while
/// strong color steps survive.
pub(crate) fn bilateral_filter(
    src: &Frame,
    diameter: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> StyleResult<Frame> {
    if diameter == 0 {
        return Err(StyleError::invalid_parameter(
            "bilateral diameter must be >= 1",
        ));
    }
    if diameter > src.width || diameter > src.height {
        return Err(StyleError::invalid_parameter(format!(
            "bilateral diameter {diameter} exceeds frame {}x{}",
            src.width, src.height
        )));
    }
    for (name, s) in [("sigma_color", sigma_color), ("sigma_space", sigma_space)] {
        if !s.is_finite() || s <= 0.0 {
            return Err(StyleError::invalid_parameter(format!(
                "bilateral {name} must be finite and > 0"
            )));
        }
    }
    if diameter == 1 {
        return Ok(src.clone());
    }

    let r = i64::from(diameter / 2);
    let space_coeff = -0.5 / (f64::from(sigma_space) * f64::from(sigma_space));
    let mut offsets = Vec::<(i64, i64, f32)>::new();
    for dy in -r..=r {
        for dx in -r..=r {
            let d2 = (dx * dx + dy * dy) as f64;
            if d2.sqrt() > r as f64 {
                continue;
            }
            offsets.push((dx, dy, (d2 * space_coeff).exp() as f32));
        }
    }

    let color_coeff = -0.5 / (f64::from(sigma_color) * f64::from(sigma_color));
    let color_weights: Vec<f32> = (0..=255 * 3)
        .map(|d| {
            let d = f64::from(d);
            (d * d * color_coeff).exp() as f32
        })
        .collect();

    let row_len = src.width as usize * 3;
    let mut out = Frame::new(src.width, src.height);
    out.data
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..src.width as usize {
                let ci = y * row_len + x * 3;
                let center = &src.data[ci..ci + 3];
                let mut acc = [0f32; 3];
                let mut wsum = 0f32;
                for &(dx, dy, ws) in &offsets {
                    let sx = clamp_coord(x as i64 + dx, src.width);
                    let sy = clamp_coord(y as i64 + dy, src.height);
                    let si = sy * row_len + sx * 3;
                    let px = &src.data[si..si + 3];
                    let diff = px
                        .iter()
                        .zip(center)
                        .map(|(a, b)| usize::from(a.abs_diff(*b)))
                        .sum::<usize>();
                    let w = ws * color_weights[diff];
                    for c in 0..3 {
                        acc[c] += w * f32::from(px[c]);
                    }
                    wsum += w;
                }
                for c in 0..3 {
                    row[x * 3 + c] = clamp_u8(acc[c] / wsum);
                }
            }
        });
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/filters/bilateral.rs"]
mod tests;
