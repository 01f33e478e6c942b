//! Source → chain → sink orchestration.

/// Frame-by-frame streaming driver.
pub mod driver;
/// File-to-file entry point.
pub mod process;
/// Cross-thread progress counter.
pub mod progress;
