use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::foundation::core::FrameCtx;
use crate::foundation::error::{StyleError, StyleResult};
use crate::foundation::math::clamp_u8;
use crate::frame::Frame;

const GRAIN_SALT: u64 = 0x6772_6169_6e;

/// Radial vignette settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VignetteParams {
    /// Attenuation at the corners before clamping (`0.0` disables the falloff).
    pub strength: f32,
    /// Lowest allowed mask value, so corners never go fully black.
    pub floor: f32,
}

/// Film grain settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrainParams {
    /// Standard deviation of the additive noise, in 8-bit units.
    pub sigma: f32,
}

/// Parameters for the warm cinematic grade. Channel arrays are in RGB order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmParams {
    /// Per-channel multiplier; warm channels > 1, blue < 1.
    pub gain: [f32; 3],
    /// Per-channel offset added after the gain.
    pub offset: [f32; 3],
    /// Optional radial vignette.
    pub vignette: Option<VignetteParams>,
    /// Optional film grain.
    pub grain: Option<GrainParams>,
}

/// Named warm tunings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarmPreset {
    /// 1.08 red boost, light vignette and grain.
    Subtle,
    /// 1.30 red boost, deeper vignette and heavier grain.
    Cinematic,
}

impl WarmPreset {
    /// Every preset, in declaration order.
    pub const ALL: [Self; 2] = [Self::Subtle, Self::Cinematic];

    /// Resolve the preset into concrete parameters.
    pub fn params(self) -> WarmParams {
        match self {
            Self::Subtle => WarmParams {
                gain: [1.08, 1.02, 0.92],
                offset: [0.0, 0.0, 0.0],
                vignette: Some(VignetteParams {
                    strength: 0.35,
                    floor: 0.6,
                }),
                grain: Some(GrainParams { sigma: 3.0 }),
            },
            Self::Cinematic => WarmParams {
                gain: [1.30, 1.10, 0.85],
                offset: [0.0, 0.0, 0.0],
                vignette: Some(VignetteParams {
                    strength: 0.5,
                    floor: 0.45,
                }),
                grain: Some(GrainParams { sigma: 6.0 }),
            },
        }
    }
}

impl Default for WarmParams {
    fn default() -> Self {
        WarmPreset::Subtle.params()
    }
}

impl WarmParams {
    /// Same tuning with vignette and grain removed.
    pub fn color_only(&self) -> Self {
        Self {
            vignette: None,
            grain: None,
            ..self.clone()
        }
    }
}

/// Warm channel grade with optional vignette and film grain.
///
/// Grain is drawn from a generator seeded by `ctx`, so identical `(frame, ctx)` pairs give
/// identical output.
pub fn warm(frame: &Frame, params: &WarmParams, ctx: &FrameCtx) -> StyleResult<Frame> {
    if let Some(v) = params.vignette
        && (!v.strength.is_finite() || !(0.0..=1.0).contains(&v.floor))
    {
        return Err(StyleError::invalid_parameter(
            "vignette strength must be finite and floor within 0..=1",
        ));
    }
    if let Some(g) = params.grain
        && (!g.sigma.is_finite() || g.sigma < 0.0)
    {
        return Err(StyleError::invalid_parameter(
            "grain sigma must be finite and >= 0",
        ));
    }

    let mask = params
        .vignette
        .map(|v| vignette_mask(frame.width, frame.height, v));
    let mut rng = params
        .grain
        .filter(|g| g.sigma > 0.0)
        .map(|g| (g.sigma, StdRng::seed_from_u64(ctx.stage_seed(GRAIN_SALT))));

    let mut data = Vec::with_capacity(frame.data.len());
    for (i, px) in frame.data.chunks_exact(3).enumerate() {
        let m = mask.as_ref().map_or(1.0, |m| m[i]);
        let mut noise = [0f32; 3];
        if let Some((sigma, rng)) = rng.as_mut() {
            let (a, b) = gaussian_pair(rng);
            let (c, _) = gaussian_pair(rng);
            noise = [a * *sigma, b * *sigma, c * *sigma];
        }
        for c in 0..3 {
            let v = (f32::from(px[c]) * params.gain[c] + params.offset[c]) * m + noise[c];
            data.push(clamp_u8(v));
        }
    }
    Frame::from_raw(frame.width, frame.height, data)
}

/// Per-pixel radial mask: 1.0 at the centre, `1 - strength` at the corners, never below `floor`.
pub(crate) fn vignette_mask(width: u32, height: u32, v: VignetteParams) -> Vec<f32> {
    let cx = (width as f32 - 1.0) / 2.0;
    let cy = (height as f32 - 1.0) / 2.0;
    let max_d2 = cx * cx + cy * cy;
    let mut mask = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d2 = if max_d2 > 0.0 {
                (dx * dx + dy * dy) / max_d2
            } else {
                0.0
            };
            mask.push((1.0 - v.strength * d2).clamp(v.floor, 1.0));
        }
    }
    mask
}

// Box-Muller.
fn gaussian_pair(rng: &mut StdRng) -> (f32, f32) {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = std::f64::consts::TAU * u2;
    ((r * theta.cos()) as f32, (r * theta.sin()) as f32)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/warm.rs"]
mod tests;
