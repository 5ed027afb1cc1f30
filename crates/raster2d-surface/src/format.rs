//! Pixel formats and the stride rule.

/// A pixel format understood by [`crate::image::ImageSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// 32bpp, premultiplied, A in bits 24..31 of the native-endian word.
    ARGB32,
    /// 32bpp container; R,G,B in the lower 24 bits, upper byte unused on
    /// input but must be written back as `0xFF` on output.
    RGB24,
    /// 8bpp coverage/alpha.
    A8,
    /// 1bpp, packed MSB-first within each byte.
    A1,
}

impl Format {
    /// Bits per pixel, before any stride rounding.
    pub fn bits_per_pixel(self) -> usize {
        match self {
            Format::ARGB32 | Format::RGB24 => 32,
            Format::A8 => 8,
            Format::A1 => 1,
        }
    }

    /// `stride = ceil(width * bpp / 32) * 4`, ensuring every row is 4-byte
    /// aligned regardless of format.
    pub fn stride_for_width(self, width: usize) -> usize {
        let bits = width * self.bits_per_pixel();
        ((bits + 31) / 32) * 4
    }
}

/// What a surface's pixels represent, independent of storage format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Content {
    Color,
    Alpha,
    ColorAlpha,
}

impl Content {
    /// The natural [`Format`] for `create_similar_image` when the caller
    /// doesn't otherwise constrain it.
    pub fn default_format(self) -> Format {
        match self {
            Content::Color => Format::RGB24,
            Content::Alpha => Format::A8,
            Content::ColorAlpha => Format::ARGB32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb32_stride_is_width_times_four() {
        assert_eq!(Format::ARGB32.stride_for_width(10), 40);
    }

    #[test]
    fn a1_stride_rounds_up_to_four_bytes() {
        // 10 pixels at 1bpp = 10 bits -> ceil(10/32)*4 = 4
        assert_eq!(Format::A1.stride_for_width(10), 4);
        // 100 pixels -> ceil(100/32)*4 = 16
        assert_eq!(Format::A1.stride_for_width(100), 16);
    }

    #[test]
    fn a8_stride_matches_width_when_already_aligned() {
        assert_eq!(Format::A8.stride_for_width(32), 32);
        assert_eq!(Format::A8.stride_for_width(33), 36);
    }
}
