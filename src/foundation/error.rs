use std::path::PathBuf;

use crate::foundation::core::FrameIndex;

/// Convenience result type used across framestyle.
pub type StyleResult<T> = Result<T, StyleError>;

/// Top-level error taxonomy for sources, transforms, sinks and the streaming driver.
#[derive(thiserror::Error, Debug)]
pub enum StyleError {
    /// Unopenable input or unusable stream metadata (zero size, zero rate, zero frames).
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// Transform or stage parameters that do not fit the frame being processed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unexpected failure inside a transform.
    #[error("transform failure: {0}")]
    TransformFailure(String),

    /// Sink write/finalize failure or a non-zero encoder exit.
    #[error("encode failure: {0}")]
    EncodeFailure(String),

    /// The encoder reported success but left a missing or implausibly small file.
    #[error(
        "empty output: '{}' has {bytes} bytes (minimum {min_bytes})",
        path.display()
    )]
    EmptyOutput {
        /// Output file that failed the check.
        path: PathBuf,
        /// Observed size (0 when missing).
        bytes: u64,
        /// Configured lower bound.
        min_bytes: u64,
    },

    /// The post-encode watermark stage failed. The styled output is left untouched.
    #[error("watermark error: {0}")]
    Watermark(String),

    /// Invalid configuration or preset file.
    #[error("config error: {0}")]
    Config(String),

    /// A per-frame failure, tagged with the index of the frame that caused it.
    #[error("frame {frame}: {source}")]
    AtFrame {
        /// Index of the failing frame.
        frame: FrameIndex,
        /// Underlying failure.
        #[source]
        source: Box<StyleError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Flat classification of a [`StyleError`], looking through frame tagging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`StyleError::InvalidSource`].
    InvalidSource,
    /// See [`StyleError::InvalidParameter`].
    InvalidParameter,
    /// See [`StyleError::TransformFailure`].
    TransformFailure,
    /// See [`StyleError::EncodeFailure`].
    EncodeFailure,
    /// See [`StyleError::EmptyOutput`].
    EmptyOutput,
    /// See [`StyleError::Watermark`].
    Watermark,
    /// See [`StyleError::Config`].
    Config,
    /// See [`StyleError::Other`].
    Other,
}

impl StyleError {
    /// Build a [`StyleError::InvalidSource`] value.
    pub fn invalid_source(msg: impl Into<String>) -> Self {
        Self::InvalidSource(msg.into())
    }

    /// Build a [`StyleError::InvalidParameter`] value.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Build a [`StyleError::TransformFailure`] value.
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::TransformFailure(msg.into())
    }

    /// Build a [`StyleError::EncodeFailure`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::EncodeFailure(msg.into())
    }

    /// Build a [`StyleError::Watermark`] value.
    pub fn watermark(msg: impl Into<String>) -> Self {
        Self::Watermark(msg.into())
    }

    /// Build a [`StyleError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Tag this error with the frame it occurred on. Already-tagged errors keep their index.
    pub fn at_frame(self, frame: FrameIndex) -> Self {
        match self {
            Self::AtFrame { .. } => self,
            other => Self::AtFrame {
                frame,
                source: Box::new(other),
            },
        }
    }

    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSource(_) => ErrorKind::InvalidSource,
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::TransformFailure(_) => ErrorKind::TransformFailure,
            Self::EncodeFailure(_) => ErrorKind::EncodeFailure,
            Self::EmptyOutput { .. } => ErrorKind::EmptyOutput,
            Self::Watermark(_) => ErrorKind::Watermark,
            Self::Config(_) => ErrorKind::Config,
            Self::AtFrame { source, .. } => source.kind(),
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Frame index the failure is attributed to, if any.
    pub fn frame_index(&self) -> Option<FrameIndex> {
        match self {
            Self::AtFrame { frame, .. } => Some(*frame),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
