use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::DEFAULT_MIN_OUTPUT_BYTES;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameCtx, FrameIndex, FrameSize};
use crate::foundation::error::{StyleError, StyleResult};
use crate::frame::Frame;
use crate::pipeline::progress::Progress;
use crate::source::{FrameSource, SourceInfo};
use crate::style::StyleChain;

/// Per-run driver settings.
#[derive(Clone, Debug)]
pub struct DriverOpts {
    /// Seed mixed into every [`FrameCtx`].
    pub seed: u64,
    /// Minimum byte size of the sink's artifact; `None` skips the check.
    pub min_output_bytes: Option<u64>,
    /// Container the sink should copy audio from.
    pub audio_from: Option<PathBuf>,
}

impl Default for DriverOpts {
    fn default() -> Self {
        Self {
            seed: 0,
            min_output_bytes: Some(DEFAULT_MIN_OUTPUT_BYTES),
            audio_from: None,
        }
    }
}

/// Counters from a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunStats {
    /// Frames written to the sink.
    pub frames: u64,
    /// Frames that had to be resized back to the source size.
    pub resized_frames: u64,
    /// Size of the sink's artifact, when it writes one.
    pub output_bytes: Option<u64>,
    /// Wall time from validation to finalize.
    pub elapsed: Duration,
}

/// Stream every frame of `source` through `chain` into `sink`.
///
/// Frames are pulled one at a time, so memory stays bounded by a handful of frames regardless
/// of video length. The source must declare non-zero dimensions and a non-zero frame count and
/// must then yield exactly that many frames: running short or having frames left over both fail
/// the run with `InvalidSource`. Any failure aborts the sink (which
/// discards partial output) and is returned with the frame index attached where one applies.
/// A run only succeeds after `sink.end()` returns `Ok` and the artifact, if any, passes
/// [`verify_output`].
#[tracing::instrument(level = "debug", skip_all, fields(chain = %chain.describe()))]
pub fn run_stream(
    source: &mut dyn FrameSource,
    chain: &StyleChain,
    sink: &mut dyn FrameSink,
    progress: &Progress,
    opts: &DriverOpts,
) -> StyleResult<RunStats> {
    let info = source.info();
    let total = validate_source(&info)?;

    match drive(source, info, total, chain, sink, progress, opts) {
        Ok(stats) => Ok(stats),
        Err(err) => {
            tracing::warn!(error = %err, "run failed, discarding sink output");
            sink.abort();
            Err(err)
        }
    }
}

fn validate_source(info: &SourceInfo) -> StyleResult<u32> {
    if info.size.is_empty() {
        return Err(StyleError::invalid_source(format!(
            "source dimensions must be non-zero, got {}",
            info.size
        )));
    }
    if info.fps.num == 0 || info.fps.den == 0 {
        return Err(StyleError::invalid_source("source frame rate must be non-zero"));
    }
    if info.frame_count == 0 {
        return Err(StyleError::invalid_source("source reports zero frames"));
    }
    u32::try_from(info.frame_count).map_err(|_| {
        StyleError::invalid_source(format!(
            "source frame count {} is too large",
            info.frame_count
        ))
    })
}

fn drive(
    source: &mut dyn FrameSource,
    info: SourceInfo,
    total: u32,
    chain: &StyleChain,
    sink: &mut dyn FrameSink,
    progress: &Progress,
    opts: &DriverOpts,
) -> StyleResult<RunStats> {
    let started = Instant::now();
    let size = info.size;
    progress.start(total);
    tracing::info!(
        size = %size,
        fps = info.fps.as_f64(),
        frames = total,
        "starting run"
    );

    let declared = chain.output_size(size);
    if declared != size {
        tracing::warn!(
            declared = %declared,
            source = %size,
            "chain changes frame size, output will be resized back"
        );
    }

    sink.begin(SinkConfig {
        width: size.width,
        height: size.height,
        fps: info.fps,
        audio_from: opts.audio_from.clone(),
    })?;

    let mut resized_frames = 0u64;
    for i in 0..total {
        let idx = FrameIndex(u64::from(i));

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                return Err(StyleError::invalid_source(format!(
                    "source ended after {i} of {total} frames"
                ))
                .at_frame(idx));
            }
            Err(err) => return Err(err.at_frame(idx)),
        };
        let frame = conform(frame, size, idx, "source", &mut resized_frames)?;

        let ctx = FrameCtx::new(idx, info.fps, opts.seed);
        let styled = apply_guarded(chain, &frame, &ctx).map_err(|e| e.at_frame(idx))?;
        drop(frame);
        let styled = conform(styled, size, idx, "transform", &mut resized_frames)?;

        sink.push_frame(idx, &styled).map_err(|e| e.at_frame(idx))?;
        progress.set_processed(i + 1);
    }

    let past_end = FrameIndex(u64::from(total));
    match source.next_frame() {
        Ok(None) => {}
        Ok(Some(_)) => {
            return Err(StyleError::invalid_source(format!(
                "source produced more than the {total} frames it declared"
            ))
            .at_frame(past_end));
        }
        Err(err) => return Err(err.at_frame(past_end)),
    }

    sink.end()?;

    let output_bytes = match (sink.artifact(), opts.min_output_bytes) {
        (Some(path), Some(min)) => Some(verify_output(path, min)?),
        (Some(path), None) => std::fs::metadata(path).ok().map(|m| m.len()),
        (None, _) => None,
    };

    let elapsed = started.elapsed();
    tracing::info!(
        frames = total,
        resized = resized_frames,
        bytes = output_bytes,
        elapsed_ms = elapsed.as_millis() as u64,
        "run complete"
    );
    Ok(RunStats {
        frames: u64::from(total),
        resized_frames,
        output_bytes,
        elapsed,
    })
}

fn apply_guarded(chain: &StyleChain, frame: &Frame, ctx: &FrameCtx) -> StyleResult<Frame> {
    match catch_unwind(AssertUnwindSafe(|| chain.apply(frame, ctx))) {
        Ok(res) => res,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "transform panicked".to_string());
            Err(StyleError::transform(msg))
        }
    }
}

fn conform(
    frame: Frame,
    size: FrameSize,
    idx: FrameIndex,
    origin: &str,
    resized: &mut u64,
) -> StyleResult<Frame> {
    if frame.size() == size {
        return Ok(frame);
    }
    tracing::warn!(
        frame = idx.0,
        origin,
        got = %frame.size(),
        expected = %size,
        "resizing non-conforming frame"
    );
    *resized += 1;
    if frame.size().is_empty() {
        return Err(StyleError::transform(format!(
            "{origin} produced an empty {} frame",
            frame.size()
        ))
        .at_frame(idx));
    }
    frame.resized(size).map_err(|e| e.at_frame(idx))
}

/// Check that `path` exists and holds at least `min_bytes`. Returns its size.
pub fn verify_output(path: &Path, min_bytes: u64) -> StyleResult<u64> {
    let bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    if bytes < min_bytes.max(1) {
        return Err(StyleError::EmptyOutput {
            path: path.to_path_buf(),
            bytes,
            min_bytes,
        });
    }
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/driver.rs"]
mod tests;
