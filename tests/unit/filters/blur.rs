use super::*;

#[test]
fn kernel_is_normalized_and_symmetric() {
    let k = gaussian_kernel(3, 1.5).unwrap();
    assert_eq!(k.len(), 7);
    let sum: f32 = k.iter().sum();
    assert!((sum - 1.0).abs() < 1e-5);
    assert!((k[0] - k[6]).abs() < 1e-7);
    assert!(k[3] > k[2]);
}

#[test]
fn kernel_rejects_bad_sigma() {
    assert!(gaussian_kernel(2, 0.0).is_err());
    assert!(gaussian_kernel(2, f32::NAN).is_err());
}

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
    let out = blur_rgb_f32(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let src = [10.0f32, 20.0, 30.0].repeat((w * h) as usize);
    let out = blur_rgb_f32(&src, w, h, 3, 2.0).unwrap();
    for (a, b) in out.iter().zip(&src) {
        assert!((a - b).abs() < 1e-3);
    }
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0f32; (w * h * 3) as usize];
    let center = ((2 * w + 2) * 3) as usize;
    src[center] = 255.0;

    let out = blur_rgb_f32(&src, w, h, 2, 1.2).unwrap();
    let nonzero = out.chunks_exact(3).filter(|px| px[0] > 0.0).count();
    assert!(nonzero > 1);
    let sum: f32 = out.chunks_exact(3).map(|px| px[0]).sum();
    assert!((sum - 255.0).abs() < 0.5);
}

#[test]
fn blur_rejects_mismatched_buffer() {
    assert!(blur_rgb_f32(&[0.0; 5], 1, 2, 1, 1.0).is_err());
}
