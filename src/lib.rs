//! framestyle applies per-frame visual styles to video.
//!
//! Frames are decoded one at a time from a [`FrameSource`], run through a [`StyleChain`] built
//! by [`compose`], and pushed into a [`FrameSink`]. The [`run_stream`] driver owns that loop;
//! [`process_video`] wires it to `ffmpeg` for file-to-file runs.
//!
//! - Transforms: cartoon, pastel, warm, rain (see [`transform`])
//! - Optional scrolling text watermark over the encoded result
//! - Progress readable from another thread through [`Progress`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod filters;
mod foundation;
mod frame;

pub mod config;
pub mod encode;
pub mod logging;
pub mod pipeline;
pub mod source;
pub mod style;
pub mod transform;

pub use crate::foundation::core::{Fps, FrameCtx, FrameIndex, FrameSize};
pub use crate::foundation::error::{ErrorKind, StyleError, StyleResult};
pub use crate::frame::Frame;

pub use crate::config::{RunRequest, StyleConfig};
pub use crate::encode::ffmpeg::{EncodeConfig, FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::pipeline::driver::{DriverOpts, RunStats, run_stream, verify_output};
pub use crate::pipeline::process::{ProcessingReport, process_video};
pub use crate::pipeline::progress::{Progress, ProgressSnapshot};
pub use crate::source::ffmpeg::FfmpegSource;
pub use crate::source::{FrameSource, SourceInfo, SyntheticSource, frames};
pub use crate::style::{RainDensity, Stage, StageKind, Style, StyleChain, compose};
