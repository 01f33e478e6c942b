use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::RunRequest;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path, is_ffprobe_on_path};
use crate::foundation::error::{StyleError, StyleResult};
use crate::pipeline::driver::{DriverOpts, run_stream};
use crate::pipeline::progress::Progress;
use crate::source::FrameSource;
use crate::source::ffmpeg::FfmpegSource;
use crate::style::compose;
use crate::transform::{apply_watermark, watermarked_path};

/// Outcome of [`process_video`].
#[derive(Debug)]
pub struct ProcessingReport {
    /// Styled video. Valid whenever the report exists.
    pub output: PathBuf,
    /// Frames encoded.
    pub frames: u64,
    /// Frames resized back to the source size.
    pub resized_frames: u64,
    /// Size of `output`.
    pub output_bytes: u64,
    /// Stage list that was applied, e.g. `warm+rain`.
    pub chain: String,
    /// Result of the watermark stage, if one was requested.
    pub watermark: Option<StyleResult<PathBuf>>,
    /// Wall time for the whole request.
    pub elapsed: Duration,
}

impl ProcessingReport {
    /// The watermarked copy, when that stage ran and succeeded.
    pub fn watermarked_output(&self) -> Option<&Path> {
        match &self.watermark {
            Some(Ok(path)) => Some(path.as_path()),
            _ => None,
        }
    }

    /// The most finished artifact: the watermarked copy if present, else the styled video.
    pub fn final_output(&self) -> &Path {
        self.watermarked_output().unwrap_or(self.output.as_path())
    }
}

/// Decode `req.input`, style every frame, encode to `req.output`, then watermark if requested.
///
/// Errors before or during encoding fail the whole request and leave no output behind. A failing
/// watermark stage is recorded in [`ProcessingReport::watermark`] instead, since the styled
/// video is already complete at that point.
#[tracing::instrument(level = "info", skip_all, fields(input = %req.input.display(), style = %req.style, rain = %req.rain))]
pub fn process_video(req: &RunRequest, progress: &Progress) -> StyleResult<ProcessingReport> {
    let started = Instant::now();
    req.config.validate()?;
    if req.input == req.output {
        return Err(StyleError::invalid_parameter(
            "output path must differ from the input path",
        ));
    }
    if !is_ffprobe_on_path() {
        return Err(StyleError::invalid_source(
            "ffprobe is required to read videos, but was not found on PATH",
        ));
    }
    if !is_ffmpeg_on_path() {
        return Err(StyleError::encode(
            "ffmpeg is required for encoding, but was not found on PATH",
        ));
    }

    let mut source = FfmpegSource::open(&req.input)?;
    let has_audio = source.probe().has_audio;
    let chain = compose(req.style, req.rain, &req.config);
    tracing::debug!(chain = %chain.describe(), frames = source.info().frame_count, "composed");

    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: req.output.clone(),
        overwrite: true,
        encode: req.config.encode.clone(),
    });
    let opts = DriverOpts {
        seed: req.config.seed,
        min_output_bytes: Some(req.config.min_output_bytes),
        audio_from: (req.keep_audio && has_audio).then(|| req.input.clone()),
    };
    let stats = run_stream(&mut source, &chain, &mut sink, progress, &opts)?;
    drop(source);

    let watermark = req.watermark.as_ref().map(|spec| {
        let target = watermarked_path(&req.output);
        let res = apply_watermark(&req.output, &target, spec, &req.config.encode);
        if let Err(err) = &res {
            tracing::warn!(error = %err, "watermark failed, keeping styled output");
        }
        res
    });

    let report = ProcessingReport {
        output: req.output.clone(),
        frames: stats.frames,
        resized_frames: stats.resized_frames,
        output_bytes: stats.output_bytes.unwrap_or(0),
        chain: chain.describe(),
        watermark,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        output = %report.final_output().display(),
        frames = report.frames,
        bytes = report.output_bytes,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "video processed"
    );
    Ok(report)
}
