use super::*;
use crate::foundation::core::{Fps, FrameIndex};

fn ctx(index: u64) -> FrameCtx {
    FrameCtx::new(FrameIndex(index), Fps::new(24, 1).unwrap(), 9)
}

#[test]
fn zero_density_is_identity() {
    let mut f = Frame::solid(40, 30, [12, 34, 56]);
    f.put_pixel(3, 3, [255, 0, 0]);
    let out = rain(&f, &RainParams::with_density(0.0), &ctx(0)).unwrap();
    assert_eq!(out, f);
}

#[test]
fn drop_count_floors_area_times_density() {
    let p = RainParams::with_density(0.001);
    assert_eq!(p.drop_count(640, 360), 230);
    assert_eq!(p.drop_count(10, 10), 0);
}

#[test]
fn drops_are_drawn_on_a_copy() {
    let f = Frame::solid(64, 64, [0, 0, 0]);
    let out = rain(&f, &RainParams::with_density(0.01), &ctx(0)).unwrap();
    assert_eq!(out.size(), f.size());
    assert!(out.pixels().any(|px| px != [0, 0, 0]));
    assert!(f.pixels().all(|px| px == [0, 0, 0]));
}

#[test]
fn drop_layout_is_seeded_per_frame() {
    let f = Frame::solid(48, 48, [20, 20, 20]);
    let p = RainParams::with_density(0.005);
    assert_eq!(rain(&f, &p, &ctx(1)).unwrap(), rain(&f, &p, &ctx(1)).unwrap());
    assert_ne!(rain(&f, &p, &ctx(1)).unwrap(), rain(&f, &p, &ctx(2)).unwrap());
}

#[test]
fn bad_lengths_are_rejected() {
    let f = Frame::solid(8, 8, [0, 0, 0]);
    let p = RainParams {
        min_len: 10,
        max_len: 2,
        ..RainParams::with_density(0.1)
    };
    assert!(matches!(rain(&f, &p, &ctx(0)), Err(StyleError::InvalidParameter(_))));
}
