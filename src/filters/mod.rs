//! CPU image kernels shared by the transforms.
//!
//! Kernels work on whole frames and sample outside the frame by clamping to the nearest edge
//! pixel. Work inside one frame may be split across rows with `rayon`; results never depend on
//! scheduling.

pub(crate) mod bilateral;
pub(crate) mod blur;
pub(crate) mod median;
pub(crate) mod threshold;

use crate::foundation::math::luma_u8;
use crate::frame::Frame;

/// Single-channel 8-bit plane (luminance, masks).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayPlane {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// One byte per pixel, row-major.
    pub data: Vec<u8>,
}

impl GrayPlane {
    /// Plane filled with `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// BT.601 luminance of `frame`.
    pub fn luma(frame: &Frame) -> Self {
        let data = frame
            .data
            .chunks_exact(3)
            .map(|px| luma_u8(px[0], px[1], px[2]))
            .collect();
        Self {
            width: frame.width,
            height: frame.height,
            data,
        }
    }

    /// Value at `(x, y)` with coordinates clamped into the plane.
    pub(crate) fn clamped(&self, x: i64, y: i64) -> u8 {
        let cx = x.clamp(0, i64::from(self.width) - 1) as usize;
        let cy = y.clamp(0, i64::from(self.height) - 1) as usize;
        self.data[cy * self.width as usize + cx]
    }
}

pub(crate) fn clamp_coord(v: i64, len: u32) -> usize {
    v.clamp(0, i64::from(len) - 1) as usize
}
