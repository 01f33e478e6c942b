use super::*;

#[test]
fn empty_document_yields_defaults() {
    let cfg = StyleConfig::from_json("{}").unwrap();
    assert_eq!(cfg, StyleConfig::default());
    assert_eq!(cfg.min_output_bytes, 1000);
    assert_eq!(cfg.encode.video_codec, "libx264");
}

#[test]
fn partial_document_overrides_only_named_fields() {
    let cfg = StyleConfig::from_json(
        r#"{"seed": 42, "rain": {"heavy": 0.01}, "encode": {"crf": 18}}"#,
    )
    .unwrap();
    assert_eq!(cfg.seed, 42);
    assert_eq!(cfg.rain.heavy, 0.01);
    assert_eq!(cfg.rain.light, RainPresets::default().light);
    assert_eq!(cfg.encode.crf, Some(18));
    assert_eq!(cfg.encode.preset, "medium");
}

#[test]
fn warm_presets_keep_both_observed_boosts() {
    assert_eq!(WarmPreset::Subtle.params().gain[0], 1.08);
    assert_eq!(WarmPreset::Cinematic.params().gain[0], 1.30);
    let cfg = StyleConfig::default().with_warm_preset(WarmPreset::Cinematic);
    assert_eq!(cfg.warm, WarmPreset::Cinematic.params());
}

#[test]
fn pastel_presets_are_distinct() {
    let soft = StyleConfig::default();
    let vivid = StyleConfig::default().with_pastel_preset(PastelPreset::Vivid);
    assert_ne!(soft.pastel, vivid.pastel);
}

#[test]
fn rain_levels_map_to_increasing_densities() {
    let presets = RainPresets::default();
    assert!(presets.params(RainDensity::None).is_none());
    let d: Vec<f64> = [RainDensity::Light, RainDensity::Medium, RainDensity::Heavy]
        .into_iter()
        .map(|l| presets.params(l).unwrap().density)
        .collect();
    assert!(d[0] < d[1] && d[1] < d[2]);
}

#[test]
fn negative_density_is_config_error() {
    let err = StyleConfig::from_json(r#"{"rain": {"light": -1.0}}"#).unwrap_err();
    assert!(matches!(err, StyleError::Config(_)));
}

#[test]
fn malformed_json_is_config_error() {
    assert!(matches!(
        StyleConfig::from_json("{seed: }"),
        Err(StyleError::Config(_))
    ));
}

#[test]
fn missing_file_is_config_error() {
    let err = StyleConfig::from_path(Path::new("/no/such/framestyle.json")).unwrap_err();
    assert!(matches!(err, StyleError::Config(_)));
}

#[test]
fn run_request_defaults() {
    let req = RunRequest::new("in.mp4", "out.mp4", Style::Warm);
    assert_eq!(req.rain, RainDensity::None);
    assert!(req.watermark.is_none());
    assert!(req.keep_audio);
}
