use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::encode::ffmpeg::{EncodeConfig, spawn_failure};
use crate::foundation::error::{StyleError, StyleResult};

/// Scrolling text watermark burned into an already encoded video.
///
/// The label runs right-to-left across the frame at `speed_px_per_sec`, `y_offset` pixels above
/// the bottom edge, wrapping around once it has fully left the frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkSpec {
    /// Label text. Rendered literally (no `%{}` expansion).
    pub text: String,
    /// Optional font file; when unset ffmpeg's default font lookup is used.
    pub font_file: Option<PathBuf>,
    /// Font size in pixels.
    pub font_size: u32,
    /// ffmpeg color spec, e.g. `white@0.6`.
    pub font_color: String,
    /// Distance between the text baseline box and the bottom edge.
    pub y_offset: u32,
    /// Horizontal scroll speed.
    pub speed_px_per_sec: f32,
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_file: None,
            font_size: 24,
            font_color: "white@0.6".to_string(),
            y_offset: 40,
            speed_px_per_sec: 120.0,
        }
    }
}

impl WatermarkSpec {
    /// Spec with default styling for `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn validate(&self) -> StyleResult<()> {
        if self.text.trim().is_empty() {
            return Err(StyleError::watermark("watermark text must be non-empty"));
        }
        if self.font_size == 0 {
            return Err(StyleError::watermark("watermark font_size must be > 0"));
        }
        if !self.speed_px_per_sec.is_finite() || self.speed_px_per_sec <= 0.0 {
            return Err(StyleError::watermark(
                "watermark speed must be finite and > 0",
            ));
        }
        if self.font_color.is_empty()
            || !self
                .font_color
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '#'))
        {
            return Err(StyleError::watermark(format!(
                "unsupported watermark color '{}'",
                self.font_color
            )));
        }
        if let Some(font) = &self.font_file {
            if !font.is_file() {
                return Err(StyleError::watermark(format!(
                    "font file '{}' not found",
                    font.display()
                )));
            }
            check_quotable(font)?;
        }
        Ok(())
    }
}

/// Build the `drawtext` filter for `spec`, reading the label from `text_file`.
pub fn drawtext_filter(spec: &WatermarkSpec, text_file: &Path) -> StyleResult<String> {
    spec.validate()?;
    check_quotable(text_file)?;

    let mut filter = format!(
        "drawtext=textfile='{}':expansion=none:fontsize={}:fontcolor={}:x=w-mod(t*{}\\,w+tw):y=h-th-{}",
        text_file.display(),
        spec.font_size,
        spec.font_color,
        spec.speed_px_per_sec,
        spec.y_offset,
    );
    if let Some(font) = &spec.font_file {
        filter.push_str(&format!(":fontfile='{}'", font.display()));
    }
    Ok(filter)
}

/// Default location for the watermarked copy of `output`: `<stem>_watermarked.<ext>`.
pub fn watermarked_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let ext = output
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_string());
    output.with_file_name(format!("{stem}_watermarked.{ext}"))
}

/// Burn the watermark into `input`, writing a new file at `output`.
///
/// `input` is never modified. On failure any partial `output` is removed and a
/// [`StyleError::Watermark`] is returned.
#[tracing::instrument(level = "debug", skip(spec, encode), fields(input = %input.display(), output = %output.display()))]
pub fn apply_watermark(
    input: &Path,
    output: &Path,
    spec: &WatermarkSpec,
    encode: &EncodeConfig,
) -> StyleResult<PathBuf> {
    spec.validate()?;
    if !input.is_file() {
        return Err(StyleError::watermark(format!(
            "watermark input '{}' does not exist",
            input.display()
        )));
    }
    if input == output {
        return Err(StyleError::watermark(
            "watermark output must differ from its input",
        ));
    }
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            StyleError::watermark(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let text_path = std::env::temp_dir().join(format!(
        "framestyle_watermark_{}_{}.txt",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ));
    std::fs::write(&text_path, spec.text.as_bytes())
        .map_err(|e| StyleError::watermark(format!("failed to write watermark text: {e}")))?;
    let _text_guard = TempFileGuard(Some(text_path.clone()));
    let filter = drawtext_filter(spec, &text_path)?;

    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-y", "-loglevel", "error", "-i"])
        .arg(input)
        .args(["-map", "0:v:0", "-map", "0:a?", "-vf", &filter])
        .args(encode.video_args())
        .args(["-c:a", "copy", "-movflags", "+faststart"])
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    tracing::debug!(filter = %filter, "running ffmpeg drawtext");
    let mut child = cmd
        .spawn()
        .map_err(|e| StyleError::watermark(spawn_failure("ffmpeg", &e)))?;
    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        let _ = pipe.read_to_string(&mut stderr);
    }
    let status = child
        .wait()
        .map_err(|e| StyleError::watermark(format!("failed to wait for ffmpeg: {e}")))?;

    if !status.success() {
        let _ = std::fs::remove_file(output);
        return Err(StyleError::watermark(format!(
            "ffmpeg drawtext exited with status {}: {}",
            status,
            stderr.trim()
        )));
    }
    Ok(output.to_path_buf())
}

fn check_quotable(path: &Path) -> StyleResult<()> {
    if path.to_string_lossy().contains('\'') {
        return Err(StyleError::watermark(format!(
            "path '{}' cannot contain a single quote",
            path.display()
        )));
    }
    Ok(())
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/watermark.rs"]
mod tests;
