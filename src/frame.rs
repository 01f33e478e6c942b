use crate::foundation::core::FrameSize;
use crate::foundation::error::{StyleError, StyleResult};

/// One decoded video frame as packed RGB8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl Frame {
    /// A black frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self::solid(width, height, [0, 0, 0])
    }

    /// A frame filled with one color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgb.repeat(n),
        }
    }

    /// Wrap an existing RGB8 buffer, checking its length against the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> StyleResult<Self> {
        let expected = FrameSize::new(width, height)
            .rgb_len()
            .ok_or_else(|| StyleError::invalid_parameter("frame buffer size overflow"))?;
        if data.len() != expected {
            return Err(StyleError::invalid_parameter(format!(
                "frame buffer has {} bytes, expected {expected} for {width}x{height} rgb8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame dimensions.
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }

    /// Read one pixel. Panics when out of bounds, like slice indexing.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Write one pixel. Panics when out of bounds, like slice indexing.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.data.chunks_exact(3)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Copy into an `image` buffer.
    pub fn to_rgb_image(&self) -> StyleResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            StyleError::invalid_parameter("frame buffer does not match its dimensions")
        })
    }

    /// Take ownership of an `image` buffer.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Resample to `size` with a triangle filter. Returns a clone when the size already matches.
    pub fn resized(&self, size: FrameSize) -> StyleResult<Self> {
        if size == self.size() {
            return Ok(self.clone());
        }
        if size.is_empty() || self.size().is_empty() {
            return Err(StyleError::invalid_parameter(format!(
                "cannot resize {} frame to {size}",
                self.size()
            )));
        }
        let img = self.to_rgb_image()?;
        let out = image::imageops::resize(
            &img,
            size.width,
            size.height,
            image::imageops::FilterType::Triangle,
        );
        Ok(Self::from_rgb_image(out))
    }
}

#[cfg(test)]
#[path = "../tests/unit/frame/frame.rs"]
mod tests;
