//! Encoding sinks.
//!
//! Sinks consume styled frames in stream order; the streaming driver owns the call sequence.

/// `ffmpeg`-based sink (system `ffmpeg` binary).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
