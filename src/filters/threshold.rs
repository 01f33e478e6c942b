use crate::filters::{GrayPlane, clamp_coord};
use crate::foundation::error::{StyleError, StyleResult};

/// Adaptive mean threshold.
///
/// Each output pixel is 255 when the source exceeds the mean of its `block_size` x `block_size`
/// neighbourhood minus `c`, otherwise 0.
pub(crate) fn adaptive_threshold_mean(
    src: &GrayPlane,
    block_size: u32,
    c: i32,
) -> StyleResult<GrayPlane> {
    if block_size < 3 || block_size.is_multiple_of(2) {
        return Err(StyleError::invalid_parameter(format!(
            "threshold block size must be odd and >= 3, got {block_size}"
        )));
    }
    if block_size > src.width || block_size > src.height {
        return Err(StyleError::invalid_parameter(format!(
            "threshold block size {block_size} exceeds frame {}x{}",
            src.width, src.height
        )));
    }

    let (w, h) = (src.width as usize, src.height as usize);
    let r = i64::from(block_size / 2);

    // Separable box sums with replicated borders.
    let mut row_sums = vec![0u32; w * h];
    for y in 0..h {
        let row = &src.data[y * w..(y + 1) * w];
        for x in 0..w {
            row_sums[y * w + x] = (-r..=r)
                .map(|dx| u32::from(row[clamp_coord(x as i64 + dx, src.width)]))
                .sum();
        }
    }

    let area = block_size * block_size;
    let mut out = GrayPlane::filled(src.width, src.height, 0);
    for y in 0..h {
        for x in 0..w {
            let sum: u32 = (-r..=r)
                .map(|dy| row_sums[clamp_coord(y as i64 + dy, src.height) * w + x])
                .sum();
            let mean = ((sum + area / 2) / area) as i32;
            let v = i32::from(src.data[y * w + x]);
            out.data[y * w + x] = if v > mean - c { 255 } else { 0 };
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/filters/threshold.rs"]
mod tests;
