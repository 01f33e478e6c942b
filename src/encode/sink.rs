use std::path::{Path, PathBuf};

use crate::foundation::core::{Fps, FrameIndex, FrameSize};
use crate::foundation::error::{StyleError, StyleResult};
use crate::frame::Frame;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Container to copy the audio track from, if any.
    pub audio_from: Option<PathBuf>,
}

impl SinkConfig {
    /// Frame size carried by this configuration.
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }
}

/// Sink contract for consuming styled frames.
///
/// Ordering contract: `begin` once, then `push_frame` with strictly increasing indices, then
/// `end` once. On any failure the driver calls `abort` instead of `end`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StyleResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> StyleResult<()>;
    /// Flush and finalize. The output is only valid once this returns `Ok`.
    fn end(&mut self) -> StyleResult<()>;

    /// Discard anything written so far. Must be safe to call in any state.
    fn abort(&mut self) {}

    /// File produced by this sink, if it writes one.
    fn artifact(&self) -> Option<&Path> {
        None
    }
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Frame)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Frames received so far, in push order.
    pub fn frames(&self) -> &[(FrameIndex, Frame)] {
        &self.frames
    }

    /// `true` once `end` has succeeded.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StyleResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> StyleResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StyleError::encode("in-memory sink not started"))?;
        if frame.size() != cfg.size() {
            return Err(StyleError::encode(format!(
                "frame size mismatch: got {}, expected {}",
                frame.size(),
                cfg.size()
            )));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(StyleError::encode("in-memory sink received out-of-order frame"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> StyleResult<()> {
        if self.cfg.is_none() {
            return Err(StyleError::encode("in-memory sink not started"));
        }
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.frames.clear();
        self.finished = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
