use super::*;
use crate::foundation::core::Fps;
use crate::foundation::error::ErrorKind;
use crate::style::Stage;
use crate::transform::RainParams;

fn info(w: u32, h: u32, n: u64) -> SourceInfo {
    SourceInfo {
        size: FrameSize::new(w, h),
        fps: Fps::new(25, 1).unwrap(),
        frame_count: n,
    }
}

#[test]
fn validate_source_rejects_degenerate_streams() {
    assert!(validate_source(&info(0, 4, 1)).is_err());
    assert!(validate_source(&info(4, 0, 1)).is_err());
    assert!(validate_source(&info(4, 4, 0)).is_err());
    assert!(validate_source(&info(4, 4, u64::from(u32::MAX) + 1)).is_err());
    let mut bad_fps = info(4, 4, 1);
    bad_fps.fps = Fps { num: 0, den: 1 };
    assert_eq!(
        validate_source(&bad_fps).unwrap_err().kind(),
        ErrorKind::InvalidSource
    );
    assert_eq!(validate_source(&info(4, 4, 12)).unwrap(), 12);
}

#[test]
fn conform_resizes_and_counts() {
    let mut resized = 0;
    let same = conform(Frame::new(4, 4), FrameSize::new(4, 4), FrameIndex(0), "t", &mut resized)
        .unwrap();
    assert_eq!(same.size(), FrameSize::new(4, 4));
    assert_eq!(resized, 0);

    let fixed = conform(Frame::new(8, 2), FrameSize::new(4, 4), FrameIndex(1), "t", &mut resized)
        .unwrap();
    assert_eq!(fixed.size(), FrameSize::new(4, 4));
    assert_eq!(resized, 1);
}

#[test]
fn conform_rejects_empty_frames() {
    let mut resized = 0;
    let err = conform(Frame::new(0, 0), FrameSize::new(4, 4), FrameIndex(5), "t", &mut resized)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransformFailure);
    assert_eq!(err.frame_index(), Some(FrameIndex(5)));
}

#[test]
fn apply_guarded_passes_errors_through() {
    let chain = StyleChain::identity()
        .then(Stage::Rain(RainParams::with_density(-1.0)))
        .unwrap();
    let ctx = FrameCtx::new(FrameIndex(0), Fps::new(25, 1).unwrap(), 0);
    let err = apply_guarded(&chain, &Frame::new(4, 4), &ctx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn verify_output_checks_size() {
    let dir = std::env::temp_dir().join(format!("framestyle_verify_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let small = dir.join("small.mp4");
    let big = dir.join("big.mp4");
    std::fs::write(&small, [0u8; 10]).unwrap();
    std::fs::write(&big, vec![0u8; 2048]).unwrap();

    assert!(matches!(
        verify_output(&small, 1000),
        Err(StyleError::EmptyOutput { bytes: 10, .. })
    ));
    assert_eq!(verify_output(&big, 1000).unwrap(), 2048);
    assert!(matches!(
        verify_output(&dir.join("missing.mp4"), 1),
        Err(StyleError::EmptyOutput { bytes: 0, .. })
    ));
    // A zero threshold still rejects an empty file.
    std::fs::write(&small, []).unwrap();
    assert!(verify_output(&small, 0).is_err());

    std::fs::remove_dir_all(&dir).unwrap();
}
