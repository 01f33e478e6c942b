use super::*;

#[test]
fn flat_plane_with_positive_c_is_all_white() {
    let p = GrayPlane::filled(12, 10, 117);
    let out = adaptive_threshold_mean(&p, 9, 2).unwrap();
    assert!(out.data.iter().all(|&v| v == 255));
}

#[test]
fn flat_plane_with_zero_c_is_all_black() {
    let p = GrayPlane::filled(12, 10, 117);
    let out = adaptive_threshold_mean(&p, 9, 0).unwrap();
    assert!(out.data.iter().all(|&v| v == 0));
}

#[test]
fn dark_side_of_a_step_becomes_an_edge() {
    let mut p = GrayPlane::filled(10, 10, 20);
    for y in 0..10 {
        for x in 5..10 {
            p.data[y * 10 + x] = 220;
        }
    }
    let out = adaptive_threshold_mean(&p, 3, 2).unwrap();
    assert_eq!(out.data[4 * 10 + 4], 0, "dark pixel next to the step");
    assert_eq!(out.data[4 * 10 + 5], 255, "bright pixel next to the step");
    assert_eq!(out.data[4 * 10], 255, "flat dark region far from the step");
}

#[test]
fn block_size_must_fit_the_frame() {
    let p = GrayPlane::filled(8, 4, 0);
    assert!(matches!(
        adaptive_threshold_mean(&p, 5, 2),
        Err(StyleError::InvalidParameter(_))
    ));
    assert!(adaptive_threshold_mean(&p, 3, 2).is_ok());
}

#[test]
fn block_size_must_be_odd() {
    let p = GrayPlane::filled(8, 8, 0);
    assert!(adaptive_threshold_mean(&p, 4, 2).is_err());
    assert!(adaptive_threshold_mean(&p, 1, 2).is_err());
}
