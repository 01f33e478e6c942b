use serde::{Deserialize, Serialize};

use crate::filters::blur::blur_rgb_f32;
use crate::foundation::error::{StyleError, StyleResult};
use crate::foundation::math::clamp_u8;
use crate::frame::Frame;

/// Parameters for the pastel tone transform. Channel arrays are in RGB order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PastelParams {
    /// Per-channel multiplier.
    pub scale: [f32; 3],
    /// Per-channel offset added after scaling.
    pub offset: [f32; 3],
    /// Gaussian blur radius in pixels.
    pub blur_radius: u32,
    /// Gaussian blur sigma.
    pub blur_sigma: f32,
    /// Weight of the blurred copy in the blend (`0.0..=1.0`).
    pub mix: f32,
    /// Constant tint added after blending.
    pub tint: [f32; 3],
}

/// Named pastel tunings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PastelPreset {
    /// Gentle lift with a wide, soft bloom.
    Soft,
    /// Stronger lift with a tighter bloom.
    Vivid,
}

impl PastelPreset {
    /// Every preset, in declaration order.
    pub const ALL: [Self; 2] = [Self::Soft, Self::Vivid];

    /// Resolve the preset into concrete parameters.
    pub fn params(self) -> PastelParams {
        match self {
            Self::Soft => PastelParams {
                scale: [1.05, 1.03, 1.08],
                offset: [18.0, 14.0, 22.0],
                blur_radius: 7,
                blur_sigma: 3.0,
                mix: 0.35,
                tint: [8.0, 4.0, 12.0],
            },
            Self::Vivid => PastelParams {
                scale: [1.15, 1.10, 1.20],
                offset: [25.0, 20.0, 30.0],
                blur_radius: 5,
                blur_sigma: 2.0,
                mix: 0.25,
                tint: [12.0, 6.0, 16.0],
            },
        }
    }
}

impl Default for PastelParams {
    fn default() -> Self {
        PastelPreset::Soft.params()
    }
}

/// Linear per-channel lift, blended with a blurred copy, then tinted.
///
/// Arithmetic stays in `f32` until the final clamp, so the result is deterministic.
pub fn pastel(frame: &Frame, params: &PastelParams) -> StyleResult<Frame> {
    if !(0.0..=1.0).contains(&params.mix) {
        return Err(StyleError::invalid_parameter(format!(
            "pastel mix must be within 0..=1, got {}",
            params.mix
        )));
    }

    let boosted: Vec<f32> = frame
        .data
        .chunks_exact(3)
        .flat_map(|px| {
            [0, 1, 2].map(|c| f32::from(px[c]) * params.scale[c] + params.offset[c])
        })
        .collect();
    let blurred = blur_rgb_f32(
        &boosted,
        frame.width,
        frame.height,
        params.blur_radius,
        params.blur_sigma,
    )?;

    let keep = 1.0 - params.mix;
    let data = boosted
        .iter()
        .zip(&blurred)
        .enumerate()
        .map(|(i, (&b, &s))| clamp_u8(b * keep + s * params.mix + params.tint[i % 3]))
        .collect();
    Frame::from_raw(frame.width, frame.height, data)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/pastel.rs"]
mod tests;
