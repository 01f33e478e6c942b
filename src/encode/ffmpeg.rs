use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{StyleError, StyleResult};
use crate::frame::Frame;

/// Codec parameters handed to the external encoder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// ffmpeg video encoder name.
    pub video_codec: String,
    /// Encoder speed/quality preset.
    pub preset: String,
    /// Constant rate factor; encoder default when unset.
    pub crf: Option<u8>,
    /// Output pixel format.
    pub pix_fmt: String,
    /// Encoder used for the passed-through audio track.
    pub audio_codec: String,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "medium".to_string(),
            crf: None,
            pix_fmt: "yuv420p".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

impl EncodeConfig {
    /// Video codec arguments (`-c:v`, `-preset`, `-crf`, `-pix_fmt`).
    pub fn video_args(&self) -> Vec<String> {
        let mut args = vec![
            "-c:v".to_string(),
            self.video_codec.clone(),
            "-preset".to_string(),
            self.preset.clone(),
        ];
        if let Some(crf) = self.crf {
            args.push("-crf".to_string());
            args.push(crf.to_string());
        }
        args.push("-pix_fmt".to_string());
        args.push(self.pix_fmt.clone());
        args
    }

    /// Chroma-subsampled formats require even frame dimensions.
    pub fn needs_even_dimensions(&self) -> bool {
        matches!(
            self.pix_fmt.as_str(),
            "yuv420p" | "yuvj420p" | "yuv422p" | "yuvj422p" | "nv12" | "nv21"
        )
    }
}

/// Options for [`FfmpegSink`] output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output file path; the container is inferred from the extension.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Codec parameters.
    pub encode: EncodeConfig,
}

impl FfmpegSinkOpts {
    /// Create options for writing to `out_path` with default codec settings.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            encode: EncodeConfig::default(),
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw `rgb24` frames to its stdin.
///
/// Audio, when `SinkConfig.audio_from` is set, is copied from that container's first audio
/// stream. Odd frame sizes are padded down to even by the encoder's scale filter when the pixel
/// format needs it.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    spawned: bool,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
            spawned: false,
        }
    }

    fn join_stderr(&mut self) -> StyleResult<Vec<u8>> {
        match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| StyleError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| StyleError::encode(format!("ffmpeg stderr read failed: {e}"))),
            None => Ok(Vec::new()),
        }
    }
}

/// Full ffmpeg argument list for encoding `cfg` into `opts.out_path`.
pub fn encoder_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<String> {
    let mut args = vec![
        if opts.overwrite { "-y" } else { "-n" }.to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "-s".to_string(),
        format!("{}x{}", cfg.width, cfg.height),
    ];
    push_input_fps(&mut args, cfg.fps);
    args.extend(["-i".to_string(), "pipe:0".to_string()]);

    if let Some(audio) = &cfg.audio_from {
        args.extend(["-i".to_string(), audio.display().to_string()]);
        args.extend(
            ["-map", "0:v:0", "-map", "1:a:0?"]
                .into_iter()
                .map(String::from),
        );
    }

    args.extend(opts.encode.video_args());
    let odd = !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2);
    if odd && opts.encode.needs_even_dimensions() {
        args.extend([
            "-vf".to_string(),
            "scale=trunc(iw/2)*2:trunc(ih/2)*2".to_string(),
        ]);
    }

    if cfg.audio_from.is_some() {
        args.extend([
            "-c:a".to_string(),
            opts.encode.audio_codec.clone(),
            "-shortest".to_string(),
        ]);
    } else {
        args.push("-an".to_string());
    }
    args.extend(["-movflags".to_string(), "+faststart".to_string()]);
    args.push(opts.out_path.display().to_string());
    args
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> StyleResult<()> {
        if self.child.is_some() {
            return Err(StyleError::encode("ffmpeg sink already started"));
        }
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(StyleError::encode("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(StyleError::encode(
                "ffmpeg sink width/height must be non-zero",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)
            .map_err(|e| StyleError::encode(e.to_string()))?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(StyleError::encode(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let args = encoder_args(&cfg, &self.opts);
        tracing::debug!(args = ?args, "spawning ffmpeg encoder");
        let mut cmd = Command::new("ffmpeg");
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| StyleError::encode(spawn_failure("ffmpeg", &e)))?;
        self.spawned = true;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| StyleError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| StyleError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> StyleResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StyleError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(StyleError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(StyleError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(StyleError::encode("ffmpeg sink is already finalized"));
        };
        stdin.write_all(&frame.data).map_err(|e| {
            StyleError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> StyleResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| StyleError::encode("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            StyleError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = self.join_stderr()?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(StyleError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        let _ = self.join_stderr();
        self.cfg = None;
        if self.spawned && self.opts.out_path.exists() {
            match std::fs::remove_file(&self.opts.out_path) {
                Ok(()) => tracing::warn!(
                    path = %self.opts.out_path.display(),
                    "discarded partial encoder output"
                ),
                Err(err) => tracing::warn!(
                    error = %err,
                    path = %self.opts.out_path.display(),
                    "failed to remove partial encoder output"
                ),
            }
        }
    }

    fn artifact(&self) -> Option<&Path> {
        self.spawned.then_some(self.opts.out_path.as_path())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.abort();
        }
    }
}

fn push_input_fps(args: &mut Vec<String>, fps: Fps) {
    // For rawvideo input, `-r` goes before `-i`. Rational rates are passed as `num/den`.
    args.extend(["-r".to_string(), format!("{}/{}", fps.num, fps.den)]);
}

/// Message for a failed tool spawn; a missing binary is called out explicitly.
pub(crate) fn spawn_failure(tool: &str, err: &std::io::Error) -> String {
    if err.kind() == std::io::ErrorKind::NotFound {
        format!("{tool} was not found on PATH")
    } else {
        format!("failed to spawn {tool}: {err}")
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> StyleResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_on_path("ffprobe")
}

fn tool_on_path(name: &str) -> bool {
    Command::new(name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
