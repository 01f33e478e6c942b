use super::*;

fn cfg(w: u32, h: u32, audio: Option<&str>) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        fps: Fps::new(30000, 1001).unwrap(),
        audio_from: audio.map(PathBuf::from),
    }
}

#[test]
fn args_describe_rgb24_stdin_and_output() {
    let opts = FfmpegSinkOpts::new("/out/styled.mp4");
    let args = encoder_args(&cfg(64, 48, None), &opts);
    let joined = args.join(" ");
    assert!(joined.starts_with("-y -loglevel error -f rawvideo -pix_fmt rgb24 -s 64x48"));
    assert!(joined.contains("-r 30000/1001 -i pipe:0"));
    assert!(joined.contains("-c:v libx264 -preset medium -pix_fmt yuv420p"));
    assert!(joined.contains("-an"));
    assert!(!joined.contains("-vf"));
    assert_eq!(args.last().map(String::as_str), Some("/out/styled.mp4"));
}

#[test]
fn audio_passthrough_maps_optional_stream() {
    let opts = FfmpegSinkOpts::new("out.mp4");
    let joined = encoder_args(&cfg(64, 48, Some("in.mp4")), &opts).join(" ");
    assert!(joined.contains("-i in.mp4 -map 0:v:0 -map 1:a:0?"));
    assert!(joined.contains("-c:a aac -shortest"));
    assert!(!joined.contains("-an"));
}

#[test]
fn odd_dimensions_get_even_scale_filter() {
    let opts = FfmpegSinkOpts::new("out.mp4");
    let joined = encoder_args(&cfg(65, 47, None), &opts).join(" ");
    assert!(joined.contains("-vf scale=trunc(iw/2)*2:trunc(ih/2)*2"));

    let mut rgb = FfmpegSinkOpts::new("out.mkv");
    rgb.encode.pix_fmt = "rgb24".to_string();
    assert!(!encoder_args(&cfg(65, 47, None), &rgb).join(" ").contains("-vf"));
}

#[test]
fn crf_and_no_overwrite_are_forwarded() {
    let mut opts = FfmpegSinkOpts::new("out.mp4");
    opts.overwrite = false;
    opts.encode.crf = Some(20);
    let args = encoder_args(&cfg(2, 2, None), &opts);
    assert_eq!(args[0], "-n");
    assert!(args.join(" ").contains("-crf 20"));
}

#[test]
fn push_before_begin_is_an_encode_failure() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("never.mp4"));
    let err = sink
        .push_frame(FrameIndex(0), &Frame::new(2, 2))
        .unwrap_err();
    assert!(matches!(err, StyleError::EncodeFailure(_)));
    assert!(sink.artifact().is_none());
}

#[test]
fn zero_size_is_rejected_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("never.mp4"));
    assert!(sink.begin(cfg(0, 2, None)).is_err());
    assert!(sink.artifact().is_none());
}

#[test]
fn missing_binary_is_named_in_spawn_failure() {
    let not_found = std::io::Error::from(std::io::ErrorKind::NotFound);
    assert_eq!(
        spawn_failure("ffmpeg", &not_found),
        "ffmpeg was not found on PATH"
    );

    let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
    assert!(spawn_failure("ffprobe", &denied).starts_with("failed to spawn ffprobe: "));
}
