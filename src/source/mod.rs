//! Frame producers.
//!
//! A [`FrameSource`] yields a finite, non-restartable sequence of frames that all share the size
//! reported by [`FrameSource::info`].

/// `ffprobe`/`ffmpeg` backed decoding.
pub mod ffmpeg;

use crate::foundation::core::{Fps, FrameSize};
use crate::foundation::error::StyleResult;
use crate::frame::Frame;

/// Static properties of a source, known before the first frame is read.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceInfo {
    /// Frame size of every produced frame.
    pub size: FrameSize,
    /// Source frame rate.
    pub fps: Fps,
    /// Number of frames the source claims to contain.
    pub frame_count: u64,
}

/// A finite stream of decoded frames.
pub trait FrameSource {
    /// Dimensions, frame rate and declared frame count.
    fn info(&self) -> SourceInfo;

    /// Read the next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> StyleResult<Option<Frame>>;
}

/// Lazy iterator over the remaining frames of a source.
pub struct Frames<'a> {
    source: &'a mut dyn FrameSource,
    done: bool,
}

impl Iterator for Frames<'_> {
    type Item = StyleResult<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.source.next_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Iterate over the frames left in `source`. Stops after the first error.
pub fn frames(source: &mut dyn FrameSource) -> Frames<'_> {
    Frames {
        source,
        done: false,
    }
}

type Generator = Box<dyn FnMut(u64) -> StyleResult<Frame> + Send>;

/// Source backed by a generator closure, called with each frame index in order.
pub struct SyntheticSource {
    info: SourceInfo,
    next: u64,
    generate: Generator,
}

impl SyntheticSource {
    /// Build a source producing `info.frame_count` frames from `generate`.
    pub fn new(
        info: SourceInfo,
        generate: impl FnMut(u64) -> StyleResult<Frame> + Send + 'static,
    ) -> Self {
        Self {
            info,
            next: 0,
            generate: Box::new(generate),
        }
    }

    /// Source repeating one solid color.
    pub fn solid(size: FrameSize, fps: Fps, frame_count: u64, rgb: [u8; 3]) -> Self {
        let info = SourceInfo {
            size,
            fps,
            frame_count,
        };
        Self::new(info, move |_| Ok(Frame::solid(size.width, size.height, rgb)))
    }
}

impl FrameSource for SyntheticSource {
    fn info(&self) -> SourceInfo {
        self.info
    }

    fn next_frame(&mut self) -> StyleResult<Option<Frame>> {
        if self.next >= self.info.frame_count {
            return Ok(None);
        }
        let frame = (self.generate)(self.next)?;
        self.next += 1;
        Ok(Some(frame))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/mod.rs"]
mod tests;
