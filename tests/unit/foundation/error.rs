use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StyleError::invalid_source("x")
            .to_string()
            .contains("invalid source:")
    );
    assert!(
        StyleError::invalid_parameter("x")
            .to_string()
            .contains("invalid parameter:")
    );
    assert!(
        StyleError::transform("x")
            .to_string()
            .contains("transform failure:")
    );
    assert!(StyleError::encode("x").to_string().contains("encode failure:"));
    assert!(
        StyleError::watermark("x")
            .to_string()
            .contains("watermark error:")
    );
    assert!(StyleError::config("x").to_string().contains("config error:"));
}

#[test]
fn frame_tag_preserves_kind_and_index() {
    let err = StyleError::invalid_parameter("block too large").at_frame(FrameIndex(7));
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert_eq!(err.frame_index(), Some(FrameIndex(7)));
    assert!(err.to_string().starts_with("frame 7:"));
}

#[test]
fn frame_tag_is_not_nested_twice() {
    let err = StyleError::transform("boom")
        .at_frame(FrameIndex(3))
        .at_frame(FrameIndex(9));
    assert_eq!(err.frame_index(), Some(FrameIndex(3)));
}

#[test]
fn empty_output_reports_sizes() {
    let err = StyleError::EmptyOutput {
        path: PathBuf::from("out.mp4"),
        bytes: 12,
        min_bytes: 1000,
    };
    assert_eq!(err.kind(), ErrorKind::EmptyOutput);
    let msg = err.to_string();
    assert!(msg.contains("out.mp4"));
    assert!(msg.contains("12 bytes"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StyleError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Other);
}
