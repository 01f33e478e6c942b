use serde::{Deserialize, Serialize};

use crate::filters::GrayPlane;
use crate::filters::bilateral::bilateral_filter;
use crate::filters::median::median_filter;
use crate::filters::threshold::adaptive_threshold_mean;
use crate::foundation::error::StyleResult;
use crate::frame::Frame;

/// Parameters for the cartoon transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartoonParams {
    /// Median filter aperture applied to luminance (odd).
    pub median_aperture: u32,
    /// Adaptive threshold neighbourhood (odd, >= 3).
    pub block_size: u32,
    /// Constant subtracted from the local mean before thresholding.
    pub threshold_c: i32,
    /// Bilateral filter window diameter.
    pub bilateral_diameter: u32,
    /// Bilateral range sigma.
    pub sigma_color: f32,
    /// Bilateral spatial sigma.
    pub sigma_space: f32,
}

impl Default for CartoonParams {
    fn default() -> Self {
        Self {
            median_aperture: 5,
            block_size: 9,
            threshold_c: 9,
            bilateral_diameter: 9,
            sigma_color: 250.0,
            sigma_space: 250.0,
        }
    }
}

/// Black outlines over flattened color regions.
///
/// Fails with `InvalidParameter` when any aperture does not fit the frame.
#[tracing::instrument(level = "trace", skip_all, fields(w = frame.width, h = frame.height))]
pub fn cartoon(frame: &Frame, params: &CartoonParams) -> StyleResult<Frame> {
    let gray = GrayPlane::luma(frame);
    let gray = median_filter(&gray, params.median_aperture)?;
    let edges = adaptive_threshold_mean(&gray, params.block_size, params.threshold_c)?;
    let mut out = bilateral_filter(
        frame,
        params.bilateral_diameter,
        params.sigma_color,
        params.sigma_space,
    )?;

    for (px, &m) in out.data.chunks_exact_mut(3).zip(&edges.data) {
        if m == 0 {
            px.fill(0);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/cartoon.rs"]
mod tests;
