use super::*;

fn gradient(w: u32, h: u32) -> Frame {
    let mut f = Frame::new(w, h);
    for y in 0..h {
        for x in 0..w {
            f.put_pixel(x, y, [(x * 7) as u8, (y * 11) as u8, ((x + y) * 5) as u8]);
        }
    }
    f
}

#[test]
fn flat_frame_matches_closed_form() {
    let p = PastelPreset::Soft.params();
    let f = Frame::solid(10, 10, [100, 100, 100]);
    let out = pastel(&f, &p).unwrap();
    let expect = [0, 1, 2].map(|c| clamp_u8(100.0 * p.scale[c] + p.offset[c] + p.tint[c]));
    assert!(out.pixels().all(|px| px == expect));
}

#[test]
fn repeated_calls_are_bit_identical() {
    let f = gradient(20, 14);
    for preset in PastelPreset::ALL {
        let p = preset.params();
        assert_eq!(pastel(&f, &p).unwrap(), pastel(&f, &p).unwrap());
    }
}

#[test]
fn bright_input_saturates_at_255() {
    let f = Frame::solid(6, 6, [250, 250, 250]);
    let out = pastel(&f, &PastelPreset::Vivid.params()).unwrap();
    assert!(out.pixels().all(|px| px == [255, 255, 255]));
}

#[test]
fn presets_differ() {
    let f = gradient(12, 12);
    let soft = pastel(&f, &PastelPreset::Soft.params()).unwrap();
    let vivid = pastel(&f, &PastelPreset::Vivid.params()).unwrap();
    assert_ne!(soft, vivid);
}

#[test]
fn mix_out_of_range_is_rejected() {
    let f = Frame::solid(4, 4, [0, 0, 0]);
    let p = PastelParams {
        mix: 1.5,
        ..PastelParams::default()
    };
    assert!(matches!(pastel(&f, &p), Err(StyleError::InvalidParameter(_))));
}
