use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::foundation::core::FrameCtx;
use crate::foundation::error::{StyleError, StyleResult};
use crate::frame::Frame;

const RAIN_SALT: u64 = 0x7261_696e;

/// Parameters for the rain overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainParams {
    /// Drops per pixel; the drop count is `floor(width * height * density)`.
    pub density: f64,
    /// Shortest drop, in pixels.
    pub min_len: u32,
    /// Longest drop, in pixels.
    pub max_len: u32,
    /// Horizontal drift per pixel of fall (negative leans left).
    pub slant: f32,
    /// Drop color.
    pub color: [u8; 3],
    /// Drop opacity (`0.0..=1.0`).
    pub opacity: f32,
}

impl Default for RainParams {
    fn default() -> Self {
        Self {
            density: 0.0,
            min_len: 8,
            max_len: 20,
            slant: 0.15,
            color: [200, 200, 200],
            opacity: 0.7,
        }
    }
}

impl RainParams {
    /// Default drop shape at the given density.
    pub fn with_density(density: f64) -> Self {
        Self {
            density,
            ..Self::default()
        }
    }

    /// Number of drops drawn on a `width` x `height` frame.
    pub fn drop_count(&self, width: u32, height: u32) -> u64 {
        (f64::from(width) * f64::from(height) * self.density).floor() as u64
    }
}

/// Draw short slanted line segments on a copy of `frame`.
///
/// Drop positions come from a generator seeded by `ctx`. A density of zero returns an exact copy.
pub fn rain(frame: &Frame, params: &RainParams, ctx: &FrameCtx) -> StyleResult<Frame> {
    if !params.density.is_finite() || params.density < 0.0 {
        return Err(StyleError::invalid_parameter(
            "rain density must be finite and >= 0",
        ));
    }
    if params.min_len > params.max_len {
        return Err(StyleError::invalid_parameter(format!(
            "rain min_len {} exceeds max_len {}",
            params.min_len, params.max_len
        )));
    }
    if !(0.0..=1.0).contains(&params.opacity) || !params.slant.is_finite() {
        return Err(StyleError::invalid_parameter(
            "rain opacity must be within 0..=1 and slant finite",
        ));
    }

    let mut out = frame.clone();
    let drops = params.drop_count(frame.width, frame.height);
    if drops == 0 || params.opacity == 0.0 {
        return Ok(out);
    }

    let mut rng = StdRng::seed_from_u64(ctx.stage_seed(RAIN_SALT));
    for _ in 0..drops {
        let x = rng.gen_range(0..frame.width) as f32;
        let y = rng.gen_range(0..frame.height) as f32;
        let len = rng.gen_range(params.min_len..=params.max_len) as f32;
        draw_segment(
            &mut out,
            (x, y),
            (x + params.slant * len, y + len),
            params.color,
            params.opacity,
        );
    }
    Ok(out)
}

fn draw_segment(frame: &mut Frame, from: (f32, f32), to: (f32, f32), rgb: [u8; 3], alpha: f32) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
    let mut last = None;
    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let px = (from.0 + dx * t).round();
        let py = (from.1 + dy * t).round();
        if px < 0.0 || py < 0.0 || px >= frame.width as f32 || py >= frame.height as f32 {
            continue;
        }
        let (px, py) = (px as u32, py as u32);
        if last == Some((px, py)) {
            continue;
        }
        last = Some((px, py));
        let under = frame.pixel(px, py);
        let blended = [0, 1, 2].map(|c| {
            let v = f32::from(under[c]) * (1.0 - alpha) + f32::from(rgb[c]) * alpha;
            v.round().clamp(0.0, 255.0) as u8
        });
        frame.put_pixel(px, py, blended);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/rain.rs"]
mod tests;
