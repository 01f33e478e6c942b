use super::*;
use crate::foundation::error::ErrorKind;

#[test]
fn filter_scrolls_with_time_at_fixed_offset() {
    let spec = WatermarkSpec {
        speed_px_per_sec: 80.0,
        y_offset: 32,
        ..WatermarkSpec::new("demo")
    };
    let f = drawtext_filter(&spec, Path::new("/tmp/label.txt")).unwrap();
    assert!(f.starts_with("drawtext=textfile='/tmp/label.txt'"));
    assert!(f.contains("expansion=none"));
    assert!(f.contains("x=w-mod(t*80\\,w+tw)"));
    assert!(f.contains("y=h-th-32"));
    assert!(!f.contains("fontfile"));
}

#[test]
fn empty_text_is_a_watermark_error() {
    let err = drawtext_filter(&WatermarkSpec::new("  "), Path::new("/tmp/x.txt")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Watermark);
}

#[test]
fn missing_font_is_a_watermark_error() {
    let spec = WatermarkSpec {
        font_file: Some(PathBuf::from("/definitely/not/here/font.ttf")),
        ..WatermarkSpec::new("demo")
    };
    let err = drawtext_filter(&spec, Path::new("/tmp/x.txt")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Watermark);
    assert!(err.to_string().contains("not found"));
}

#[test]
fn color_with_filter_syntax_is_rejected() {
    let spec = WatermarkSpec {
        font_color: "white:x=0".to_string(),
        ..WatermarkSpec::new("demo")
    };
    assert!(drawtext_filter(&spec, Path::new("/tmp/x.txt")).is_err());
}

#[test]
fn watermarked_path_keeps_directory_and_extension() {
    assert_eq!(
        watermarked_path(Path::new("/out/styled.mov")),
        PathBuf::from("/out/styled_watermarked.mov")
    );
    assert_eq!(
        watermarked_path(Path::new("styled")),
        PathBuf::from("styled_watermarked.mp4")
    );
}

#[test]
fn missing_input_leaves_nothing_behind() {
    let dir = std::env::temp_dir().join(format!("framestyle_wm_{}", std::process::id()));
    let out = dir.join("wm.mp4");
    let err = apply_watermark(
        &dir.join("missing.mp4"),
        &out,
        &WatermarkSpec::new("demo"),
        &EncodeConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Watermark);
    assert!(!out.exists());
}
