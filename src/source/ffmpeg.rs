use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use serde::Deserialize;

use crate::encode::ffmpeg::spawn_failure;
use crate::foundation::core::{Fps, FrameSize};
use crate::foundation::error::{StyleError, StyleResult};
use crate::frame::Frame;
use crate::source::{FrameSource, SourceInfo};

/// Result of probing a video container with `ffprobe`.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoProbe {
    /// Probed file.
    pub source_path: PathBuf,
    /// Dimensions, rate and frame count of the first video stream.
    pub info: SourceInfo,
    /// Container duration in seconds, `0.0` when unknown.
    pub duration_sec: f64,
    /// Whether the container carries at least one audio stream.
    pub has_audio: bool,
}

#[derive(Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    nb_read_frames: Option<String>,
    duration: Option<String>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Probe `source_path` for its first video stream.
///
/// The frame count comes from the stream's `nb_frames`. When the container does not record it,
/// a second `ffprobe -count_frames` pass decodes the stream to count frames exactly; only if
/// that pass yields nothing is the count estimated from the duration.
pub fn probe_video(source_path: &Path) -> StyleResult<VideoProbe> {
    if !source_path.is_file() {
        return Err(StyleError::invalid_source(format!(
            "'{}' does not exist or is not a file",
            source_path.display()
        )));
    }
    let stdout = run_ffprobe(source_path, &["-show_streams", "-show_format"])?;
    let mut probe = parse_probe_json(source_path, &stdout)?;
    if probe.info.frame_count > 0 {
        return Ok(probe);
    }

    let counted = run_ffprobe(
        source_path,
        &[
            "-count_frames",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=nb_read_frames",
        ],
    )
    .and_then(|json| parse_counted_frames(&json));
    match counted {
        Ok(Some(n)) => {
            tracing::debug!(frames = n, "frame count from -count_frames");
            probe.info.frame_count = n;
        }
        Ok(None) | Err(_) => {
            if let Err(err) = &counted {
                tracing::debug!(error = %err, "-count_frames pass failed");
            }
            let estimate = probe.info.fps.secs_to_frames_floor(probe.duration_sec);
            tracing::warn!(
                frames = estimate,
                duration_sec = probe.duration_sec,
                "frame count unknown, estimating from duration"
            );
            probe.info.frame_count = estimate;
        }
    }
    Ok(probe)
}

/// Parse the `nb_read_frames` value of an `ffprobe -count_frames` pass.
pub fn parse_counted_frames(json: &[u8]) -> StyleResult<Option<u64>> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| StyleError::invalid_source(format!("ffprobe json parse failed: {e}")))?;
    Ok(parsed
        .streams
        .first()
        .and_then(|s| s.nb_read_frames.as_deref())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|n| *n > 0))
}

fn run_ffprobe(source_path: &Path, extra: &[&str]) -> StyleResult<Vec<u8>> {
    let out = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json"])
        .args(extra)
        .arg(source_path)
        .output()
        .map_err(|e| StyleError::invalid_source(spawn_failure("ffprobe", &e)))?;
    if !out.status.success() {
        return Err(StyleError::invalid_source(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(out.stdout)
}

/// Parse `ffprobe -show_streams -show_format` JSON output.
///
/// `frame_count` is the stream's `nb_frames`, or `0` when the container does not record it.
/// The duration is never turned into a count here: a container duration also spans audio that
/// may outlast the video.
pub fn parse_probe_json(source_path: &Path, json: &[u8]) -> StyleResult<VideoProbe> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| StyleError::invalid_source(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            StyleError::invalid_source(format!(
                "no video stream found in '{}'",
                source_path.display()
            ))
        })?;

    let width = video.width.unwrap_or(0);
    let height = video.height.unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(StyleError::invalid_source(format!(
            "video stream has invalid dimensions {width}x{height}"
        )));
    }

    let fps = [video.r_frame_rate.as_deref(), video.avg_frame_rate.as_deref()]
        .into_iter()
        .flatten()
        .find_map(Fps::parse_ratio)
        .ok_or_else(|| StyleError::invalid_source("video stream has no usable frame rate"))?;

    let duration_sec = video
        .duration
        .as_deref()
        .or_else(|| parsed.format.as_ref().and_then(|f| f.duration.as_deref()))
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(0.0);

    let frame_count = video
        .nb_frames
        .as_deref()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(0);

    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoProbe {
        source_path: source_path.to_path_buf(),
        info: SourceInfo {
            size: FrameSize::new(width, height),
            fps,
            frame_count,
        },
        duration_sec,
        has_audio,
    })
}

/// Streams decoded `rgb24` frames out of a video file through an `ffmpeg` child process.
pub struct FfmpegSource {
    probe: VideoProbe,
    frame_len: usize,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    exhausted: bool,
}

impl FfmpegSource {
    /// Probe `path` and start decoding it.
    pub fn open(path: &Path) -> StyleResult<Self> {
        let probe = probe_video(path)?;
        let frame_len = probe
            .info
            .size
            .rgb_len()
            .ok_or_else(|| StyleError::invalid_source("frame size overflow"))?;

        tracing::debug!(
            path = %path.display(),
            size = %probe.info.size,
            fps = probe.info.fps.as_f64(),
            frames = probe.info.frame_count,
            "opened video source"
        );

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args([
                "-map",
                "0:v:0",
                "-an",
                "-fps_mode",
                "passthrough",
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgb24",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| StyleError::invalid_source(spawn_failure("ffmpeg", &e)))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| StyleError::invalid_source("failed to open ffmpeg stdout"))?;

        Ok(Self {
            probe,
            frame_len,
            child: Some(child),
            stdout: Some(stdout),
            exhausted: false,
        })
    }

    /// Probe data gathered when the source was opened.
    pub fn probe(&self) -> &VideoProbe {
        &self.probe
    }

    fn finish(&mut self) {
        self.exhausted = true;
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> SourceInfo {
        self.probe.info
    }

    fn next_frame(&mut self) -> StyleResult<Option<Frame>> {
        if self.exhausted {
            return Ok(None);
        }
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut buf = vec![0u8; self.frame_len];
        let mut filled = 0;
        while filled < buf.len() {
            match stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finish();
                    return Err(StyleError::invalid_source(format!(
                        "failed to read decoded frame: {e}"
                    )));
                }
            }
        }

        if filled == 0 {
            self.finish();
            return Ok(None);
        }
        if filled < buf.len() {
            self.finish();
            return Err(StyleError::invalid_source(format!(
                "truncated frame from decoder: got {filled} of {} bytes",
                buf.len()
            )));
        }

        let size = self.probe.info.size;
        Frame::from_raw(size.width, size.height, buf).map(Some)
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/ffmpeg.rs"]
mod tests;
