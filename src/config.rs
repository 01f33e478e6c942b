//! Run configuration: named tunings for every transform plus encoder settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::encode::ffmpeg::EncodeConfig;
use crate::foundation::error::{StyleError, StyleResult};
use crate::style::{RainDensity, Style};
use crate::transform::{
    CartoonParams, PastelParams, PastelPreset, RainParams, WarmParams, WarmPreset, WatermarkSpec,
};

/// Smallest styled output, in bytes, that counts as a real video.
pub const DEFAULT_MIN_OUTPUT_BYTES: u64 = 1000;

/// Drop densities for each rain level, plus the shared drop shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainPresets {
    /// Density used for [`RainDensity::Light`].
    pub light: f64,
    /// Density used for [`RainDensity::Medium`].
    pub medium: f64,
    /// Density used for [`RainDensity::Heavy`].
    pub heavy: f64,
    /// Drop length, slant and color. Its `density` field is ignored.
    pub drop: RainParams,
}

impl Default for RainPresets {
    fn default() -> Self {
        Self {
            light: 0.0005,
            medium: 0.0015,
            heavy: 0.003,
            drop: RainParams::default(),
        }
    }
}

impl RainPresets {
    /// Overlay parameters for `level`, or `None` when no rain is drawn.
    pub fn params(&self, level: RainDensity) -> Option<RainParams> {
        let density = match level {
            RainDensity::None => return None,
            RainDensity::Light => self.light,
            RainDensity::Medium => self.medium,
            RainDensity::Heavy => self.heavy,
        };
        Some(RainParams {
            density,
            ..self.drop.clone()
        })
    }
}

/// Every numeric tuning used by a run. Missing JSON fields fall back to [`Default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Cartoon filter apertures and sigmas.
    pub cartoon: CartoonParams,
    /// Pastel tuning.
    pub pastel: PastelParams,
    /// Warm tuning.
    pub warm: WarmParams,
    /// Rain levels.
    pub rain: RainPresets,
    /// Encoder settings for the styled output.
    pub encode: EncodeConfig,
    /// Minimum size of a successful output file.
    pub min_output_bytes: u64,
    /// Seed for the pseudo-random stages (grain, rain).
    pub seed: u64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            cartoon: CartoonParams::default(),
            pastel: PastelPreset::Soft.params(),
            warm: WarmPreset::Subtle.params(),
            rain: RainPresets::default(),
            encode: EncodeConfig::default(),
            min_output_bytes: DEFAULT_MIN_OUTPUT_BYTES,
            seed: 0,
        }
    }
}

impl StyleConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> StyleResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| StyleError::config(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: &Path) -> StyleResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StyleError::config(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Replace the pastel tuning with a named preset.
    pub fn with_pastel_preset(mut self, preset: PastelPreset) -> Self {
        self.pastel = preset.params();
        self
    }

    /// Replace the warm tuning with a named preset.
    pub fn with_warm_preset(mut self, preset: WarmPreset) -> Self {
        self.warm = preset.params();
        self
    }

    /// Reject values that no frame could satisfy.
    pub fn validate(&self) -> StyleResult<()> {
        for (name, d) in [
            ("light", self.rain.light),
            ("medium", self.rain.medium),
            ("heavy", self.rain.heavy),
        ] {
            if !d.is_finite() || d < 0.0 {
                return Err(StyleError::config(format!(
                    "rain.{name} density must be a finite value >= 0, got {d}"
                )));
            }
        }
        if self.rain.drop.min_len > self.rain.drop.max_len {
            return Err(StyleError::config(
                "rain.drop.min_len must not exceed rain.drop.max_len",
            ));
        }
        if !(0.0..=1.0).contains(&self.pastel.mix) {
            return Err(StyleError::config("pastel.mix must be within 0..=1"));
        }
        if let Some(v) = self.warm.vignette
            && !(0.0..=1.0).contains(&v.floor)
        {
            return Err(StyleError::config("warm.vignette.floor must be within 0..=1"));
        }
        if let Some(g) = self.warm.grain
            && !(g.sigma.is_finite() && g.sigma >= 0.0)
        {
            return Err(StyleError::config("warm.grain.sigma must be >= 0"));
        }
        Ok(())
    }
}

/// Everything one processing run needs, passed explicitly through the pipeline.
#[derive(Clone, Debug)]
pub struct RunRequest {
    /// Video to read.
    pub input: PathBuf,
    /// Styled video to write.
    pub output: PathBuf,
    /// Color style.
    pub style: Style,
    /// Rain overlay level.
    pub rain: RainDensity,
    /// Scrolling text burned in after encoding, written next to `output`.
    pub watermark: Option<WatermarkSpec>,
    /// Copy the input's audio track into the output.
    pub keep_audio: bool,
    /// Tunings.
    pub config: StyleConfig,
}

impl RunRequest {
    /// Request with default tunings, no rain and no watermark.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, style: Style) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            style,
            rain: RainDensity::None,
            watermark: None,
            keep_audio: true,
            config: StyleConfig::default(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
