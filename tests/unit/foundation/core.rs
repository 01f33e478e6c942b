use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frames_secs_roundtrip_floor() {
    let fps = Fps::new(30000, 1001).unwrap();
    let secs = fps.frames_to_secs(123);
    assert_eq!(fps.secs_to_frames_floor(secs), 123);
}

#[test]
fn fps_parses_ffmpeg_ratios() {
    assert_eq!(Fps::parse_ratio("30000/1001"), Some(Fps { num: 30000, den: 1001 }));
    assert_eq!(Fps::parse_ratio("25"), Some(Fps { num: 25, den: 1 }));
    assert_eq!(Fps::parse_ratio("0/0"), None);
    assert_eq!(Fps::parse_ratio("abc"), None);
}

#[test]
fn frame_size_rgb_len_and_emptiness() {
    assert_eq!(FrameSize::new(4, 3).rgb_len(), Some(36));
    assert!(FrameSize::new(0, 3).is_empty());
    assert!(!FrameSize::new(1, 1).is_empty());
}

#[test]
fn stage_seed_varies_with_index_and_salt() {
    let fps = Fps::new(30, 1).unwrap();
    let a = FrameCtx::new(FrameIndex(0), fps, 7);
    let b = FrameCtx::new(FrameIndex(1), fps, 7);
    assert_ne!(a.stage_seed(1), b.stage_seed(1));
    assert_ne!(a.stage_seed(1), a.stage_seed(2));
    assert_eq!(a.stage_seed(1), FrameCtx::new(FrameIndex(0), fps, 7).stage_seed(1));
}

#[test]
fn ctx_time_tracks_frame_rate() {
    let ctx = FrameCtx::new(FrameIndex(60), Fps::new(30, 1).unwrap(), 0);
    assert!((ctx.time_secs() - 2.0).abs() < 1e-9);
}
