//! Per-frame stylization transforms.
//!
//! Every transform takes the input frame by reference and returns a new frame of the same
//! dimensions; inputs are never modified. Watermarking is the exception: it runs once over the
//! encoded file (see [`watermark`]).

/// Edge-outlined cartoon look.
pub mod cartoon;
/// Pastel tone grade.
pub mod pastel;
/// Rain overlay.
pub mod rain;
/// Warm cinematic grade.
pub mod warm;
/// Post-encode scrolling text watermark.
pub mod watermark;

pub use cartoon::{CartoonParams, cartoon};
pub use pastel::{PastelParams, PastelPreset, pastel};
pub use rain::{RainParams, rain};
pub use warm::{GrainParams, VignetteParams, WarmParams, WarmPreset, warm};
pub use watermark::{WatermarkSpec, apply_watermark, drawtext_filter, watermarked_path};
