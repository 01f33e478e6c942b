use crate::foundation::error::{StyleError, StyleResult};

/// Zero-based position of a frame within a video stream.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rational frame rate (`num / den` frames per second).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator, always > 0 for a validated value.
    pub den: u32,
}

impl Fps {
    /// Build a validated frame rate. Both parts must be non-zero.
    pub fn new(num: u32, den: u32) -> StyleResult<Self> {
        if den == 0 {
            return Err(StyleError::invalid_source("fps denominator must be > 0"));
        }
        if num == 0 {
            return Err(StyleError::invalid_source("fps numerator must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of a single frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Presentation time of the first `frames` frames in seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Number of whole frames that fit into `secs`.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    /// Parse an ffmpeg-style ratio such as `30000/1001` or a plain integer rate.
    pub fn parse_ratio(s: &str) -> Option<Self> {
        let s = s.trim();
        let (num, den) = match s.split_once('/') {
            Some((a, b)) => (a.trim().parse::<u32>().ok()?, b.trim().parse::<u32>().ok()?),
            None => (s.parse::<u32>().ok()?, 1),
        };
        Self::new(num, den).ok()
    }
}

/// Pixel dimensions of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameSize {
    /// Create a size value. No validation is performed.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte length of a packed RGB8 buffer with this size, `None` on overflow.
    pub fn rgb_len(self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(3))
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Per-frame context handed to every transform.
///
/// Pseudo-random stages (rain, film grain) derive their generator from `seed` and `index`, so a
/// transform's output is a pure function of the input frame and this context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCtx {
    /// Position of the frame in the stream.
    pub index: FrameIndex,
    /// Stream frame rate.
    pub fps: Fps,
    /// Run-wide seed.
    pub seed: u64,
}

impl FrameCtx {
    /// Context for frame `index` of a stream at `fps`.
    pub fn new(index: FrameIndex, fps: Fps, seed: u64) -> Self {
        Self { index, fps, seed }
    }

    /// Presentation time of this frame in seconds.
    pub fn time_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.index.0)
    }

    /// Derive a generator seed for one stage of this frame.
    pub fn stage_seed(&self, salt: u64) -> u64 {
        crate::foundation::math::mix_seed(self.seed, self.index.0, salt)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
