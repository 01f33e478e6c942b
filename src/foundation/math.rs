/// Round and clamp a float channel value into `0..=255`.
pub(crate) fn clamp_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// BT.601 luma in 14-bit fixed point, matching common integer RGB->gray conversions.
pub(crate) fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let y = u32::from(r) * 4899 + u32::from(g) * 9617 + u32::from(b) * 1868 + 8192;
    (y >> 14).min(255) as u8
}

/// Mix a run seed, a frame index and a stage salt into one generator seed (splitmix64 finalizer).
pub(crate) fn mix_seed(seed: u64, index: u64, salt: u64) -> u64 {
    let mut z = seed
        .wrapping_add(index.wrapping_mul(0x9e37_79b9_7f4a_7c15))
        .wrapping_add(salt.wrapping_mul(0xd1b5_4a32_d192_ed03));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
