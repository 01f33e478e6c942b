use rayon::prelude::*;

use crate::filters::GrayPlane;
use crate::foundation::error::{StyleError, StyleResult};

/// Median filter with a square, odd `aperture`.
///
/// An aperture of 1 returns a copy. Apertures wider or taller than the plane are rejected.
pub(crate) fn median_filter(src: &GrayPlane, aperture: u32) -> StyleResult<GrayPlane> {
    if aperture == 0 || aperture.is_multiple_of(2) {
        return Err(StyleError::invalid_parameter(format!(
            "median aperture must be odd and >= 1, got {aperture}"
        )));
    }
    if aperture > src.width || aperture > src.height {
        return Err(StyleError::invalid_parameter(format!(
            "median aperture {aperture} exceeds frame {}x{}",
            src.width, src.height
        )));
    }
    if aperture == 1 {
        return Ok(src.clone());
    }

    let r = i64::from(aperture / 2);
    let width = src.width as usize;
    let mut out = GrayPlane::filled(src.width, src.height, 0);
    out.data
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let mut window = Vec::with_capacity((aperture * aperture) as usize);
            for (x, dst) in row.iter_mut().enumerate() {
                window.clear();
                for dy in -r..=r {
                    for dx in -r..=r {
                        window.push(src.clamped(x as i64 + dx, y as i64 + dy));
                    }
                }
                let mid = window.len() / 2;
                let (_, m, _) = window.select_nth_unstable(mid);
                *dst = *m;
            }
        });
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/filters/median.rs"]
mod tests;
