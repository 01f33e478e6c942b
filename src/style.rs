//! Style selection and composition.
//!
//! [`Style`] and [`RainDensity`] are the two closed identifier sets a caller picks from.
//! [`compose`] turns a pair of them into a [`StyleChain`]: the color stage first, rain on top.

use serde::{Deserialize, Serialize};

use crate::config::StyleConfig;
use crate::foundation::core::{FrameCtx, FrameSize};
use crate::foundation::error::{StyleError, StyleResult};
use crate::frame::Frame;
use crate::transform::{
    CartoonParams, PastelParams, RainParams, WarmParams, cartoon, pastel, rain, warm,
};

fn normalize_id(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Color style applied to every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Frames pass through unchanged.
    #[default]
    None,
    /// Black outlines over flattened color.
    Cartoon,
    /// Lifted, softened pastel tones.
    Pastel,
    /// Warm grade with vignette and grain.
    Warm,
}

impl Style {
    /// Every style, in display order.
    pub const ALL: [Self; 4] = [Self::None, Self::Cartoon, Self::Pastel, Self::Warm];

    /// Canonical identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Cartoon => "cartoon",
            Self::Pastel => "pastel",
            Self::Warm => "warm",
        }
    }

    /// One-line description for listings.
    pub fn describe(self) -> &'static str {
        match self {
            Self::None => "no color styling",
            Self::Cartoon => "edge outlines over bilateral-smoothed color",
            Self::Pastel => "per-channel lift blended with a soft blur and tint",
            Self::Warm => "warm channel grade with radial vignette and film grain",
        }
    }

    /// Resolve an identifier. Case, spaces, `-` and `_` are ignored; unknown ids give
    /// [`Style::None`].
    pub fn from_id(id: &str) -> Self {
        match normalize_id(id).as_str() {
            "cartoon" | "cartoonify" | "toon" => Self::Cartoon,
            "pastel" | "pasteltone" | "pastelcolor" => Self::Pastel,
            "warm" | "warmcinematic" | "cinematic" | "warmtone" => Self::Warm,
            "" | "none" | "nostyle" | "original" => Self::None,
            _ => {
                tracing::debug!(id, "unknown style id, using identity");
                Self::None
            }
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Rain overlay level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainDensity {
    /// No rain.
    #[default]
    None,
    /// Sparse drizzle.
    Light,
    /// Steady rain.
    Medium,
    /// Downpour.
    Heavy,
}

impl RainDensity {
    /// Every level, lightest first.
    pub const ALL: [Self; 4] = [Self::None, Self::Light, Self::Medium, Self::Heavy];

    /// Canonical identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }

    /// Resolve an identifier with the same leniency as [`Style::from_id`].
    pub fn from_id(id: &str) -> Self {
        match normalize_id(id).as_str() {
            "light" | "lightrain" | "drizzle" => Self::Light,
            "medium" | "mediumrain" | "moderate" => Self::Medium,
            "heavy" | "heavyrain" | "storm" => Self::Heavy,
            "" | "none" | "norain" | "off" => Self::None,
            _ => {
                tracing::debug!(id, "unknown rain id, using no rain");
                Self::None
            }
        }
    }
}

impl std::fmt::Display for RainDensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Discriminant of a [`Stage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Cartoon outlines.
    Cartoon,
    /// Pastel tone.
    Pastel,
    /// Warm grade.
    Warm,
    /// Rain overlay.
    Rain,
}

impl StageKind {
    /// Color stages must precede overlays.
    pub fn is_color(self) -> bool {
        !matches!(self, Self::Rain)
    }

    /// Stage name used in logs and chain descriptions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cartoon => "cartoon",
            Self::Pastel => "pastel",
            Self::Warm => "warm",
            Self::Rain => "rain",
        }
    }
}

/// One per-frame transform with its parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Stage {
    /// See [`cartoon`].
    Cartoon(CartoonParams),
    /// See [`pastel`].
    Pastel(PastelParams),
    /// See [`warm`].
    Warm(WarmParams),
    /// See [`rain`].
    Rain(RainParams),
}

impl Stage {
    /// Which transform this stage runs.
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Cartoon(_) => StageKind::Cartoon,
            Self::Pastel(_) => StageKind::Pastel,
            Self::Warm(_) => StageKind::Warm,
            Self::Rain(_) => StageKind::Rain,
        }
    }

    /// Output size for an input of `input`. Every stage preserves dimensions.
    pub fn output_size(&self, input: FrameSize) -> FrameSize {
        input
    }

    /// Run the stage on one frame.
    pub fn apply(&self, frame: &Frame, ctx: &FrameCtx) -> StyleResult<Frame> {
        match self {
            Self::Cartoon(p) => cartoon(frame, p),
            Self::Pastel(p) => pastel(frame, p),
            Self::Warm(p) => warm(frame, p, ctx),
            Self::Rain(p) => rain(frame, p, ctx),
        }
    }
}

/// Ordered stages applied left to right.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleChain {
    stages: Vec<Stage>,
}

impl StyleChain {
    /// The identity chain.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Append a stage.
    ///
    /// A kind may appear only once, and no color stage may follow rain.
    pub fn push(&mut self, stage: Stage) -> StyleResult<()> {
        let kind = stage.kind();
        if self.stages.iter().any(|s| s.kind() == kind) {
            return Err(StyleError::invalid_parameter(format!(
                "stage '{}' is already in the chain",
                kind.name()
            )));
        }
        if kind.is_color() && self.stages.iter().any(|s| !s.kind().is_color()) {
            return Err(StyleError::invalid_parameter(format!(
                "color stage '{}' cannot run after an overlay",
                kind.name()
            )));
        }
        self.stages.push(stage);
        Ok(())
    }

    /// Builder form of [`StyleChain::push`].
    pub fn then(mut self, stage: Stage) -> StyleResult<Self> {
        self.push(stage)?;
        Ok(self)
    }

    /// Stages in application order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// `true` when no stage would touch a frame.
    pub fn is_identity(&self) -> bool {
        self.stages.is_empty()
    }

    /// Output size for an input of `input`.
    pub fn output_size(&self, input: FrameSize) -> FrameSize {
        self.stages
            .iter()
            .fold(input, |size, stage| stage.output_size(size))
    }

    /// Stage names joined with `+`, or `identity`.
    pub fn describe(&self) -> String {
        if self.stages.is_empty() {
            return "identity".to_string();
        }
        self.stages
            .iter()
            .map(|s| s.kind().name())
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Run every stage in order. The identity chain returns a copy of `frame`.
    pub fn apply(&self, frame: &Frame, ctx: &FrameCtx) -> StyleResult<Frame> {
        let Some((first, rest)) = self.stages.split_first() else {
            return Ok(frame.clone());
        };
        let mut out = first.apply(frame, ctx)?;
        for stage in rest {
            out = stage.apply(&out, ctx)?;
        }
        Ok(out)
    }
}

/// Color stage for `style` with tunings from `config`.
pub fn style_stage(style: Style, config: &StyleConfig) -> Option<Stage> {
    match style {
        Style::None => None,
        Style::Cartoon => Some(Stage::Cartoon(config.cartoon.clone())),
        Style::Pastel => Some(Stage::Pastel(config.pastel.clone())),
        Style::Warm => Some(Stage::Warm(config.warm.clone())),
    }
}

/// Build `rain ∘ style`: the color style runs first, rain is drawn over its result.
pub fn compose(style: Style, rain: RainDensity, config: &StyleConfig) -> StyleChain {
    let stages = style_stage(style, config)
        .into_iter()
        .chain(config.rain.params(rain).map(Stage::Rain))
        .collect();
    StyleChain { stages }
}

#[cfg(test)]
#[path = "../tests/unit/style.rs"]
mod tests;
