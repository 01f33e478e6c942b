use super::*;
use crate::foundation::core::{Fps, FrameIndex};

fn ctx(index: u64, seed: u64) -> FrameCtx {
    FrameCtx::new(FrameIndex(index), Fps::new(30, 1).unwrap(), seed)
}

#[test]
fn color_only_grade_warms_gray() {
    for preset in WarmPreset::ALL {
        let p = preset.params().color_only();
        let f = Frame::solid(8, 8, [128, 128, 128]);
        let out = warm(&f, &p, &ctx(0, 0)).unwrap();
        for px in out.pixels() {
            assert!(px[0] > 128, "{preset:?} red should rise");
            assert!(px[2] < 128, "{preset:?} blue should fall");
        }
    }
}

#[test]
fn subtle_and_cinematic_keep_their_tunings() {
    assert_eq!(WarmPreset::Subtle.params().gain[0], 1.08);
    assert_eq!(WarmPreset::Cinematic.params().gain[0], 1.30);
}

#[test]
fn vignette_is_one_at_center_and_floored_at_corners() {
    let v = VignetteParams {
        strength: 0.9,
        floor: 0.5,
    };
    let m = vignette_mask(5, 5, v);
    assert_eq!(m[2 * 5 + 2], 1.0);
    assert_eq!(m[0], 0.5);
    assert!(m.iter().all(|&x| (0.5..=1.0).contains(&x)));
}

#[test]
fn vignette_darkens_corners_more_than_center() {
    let p = WarmParams {
        grain: None,
        ..WarmPreset::Cinematic.params()
    };
    let f = Frame::solid(21, 21, [150, 150, 150]);
    let out = warm(&f, &p, &ctx(0, 0)).unwrap();
    assert!(out.pixel(0, 0)[0] < out.pixel(10, 10)[0]);
    assert!(out.pixel(0, 0)[0] > 0, "floor keeps corners above black");
}

#[test]
fn seeded_grain_is_reproducible_and_varies_per_frame() {
    let p = WarmPreset::Cinematic.params();
    let f = Frame::solid(16, 16, [120, 120, 120]);
    let a = warm(&f, &p, &ctx(3, 42)).unwrap();
    let b = warm(&f, &p, &ctx(3, 42)).unwrap();
    let c = warm(&f, &p, &ctx(4, 42)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn invalid_floor_is_rejected() {
    let p = WarmParams {
        vignette: Some(VignetteParams {
            strength: 0.5,
            floor: 1.5,
        }),
        ..WarmParams::default()
    };
    let f = Frame::solid(4, 4, [0, 0, 0]);
    assert!(matches!(
        warm(&f, &p, &ctx(0, 0)),
        Err(StyleError::InvalidParameter(_))
    ));
}
