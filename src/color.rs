//! Pixel formats and quantized color addresses.
//!
//! Photos arrive as 16-bit 5:6:5 RGB. Palette entries hold three 6-bit
//! channels, the width the display's palette registers accept. Object
//! images use one byte per pixel in 2:2:2 RGB, which is also the layout of
//! the 64 reserved display colors.

/// Pixel value in an object image that is never drawn.
pub const OBJ_CLR_TRANSP: u8 = 0x40;

/// Number of fine histogram buckets (4 bits per channel).
pub const FINE_BUCKETS: usize = 1 << 12;

/// Number of coarse histogram buckets (2 bits per channel).
pub const COARSE_BUCKETS: usize = 1 << 6;

/// A palette entry: red, green and blue, each in `0..=63`.
pub type Color6 = [u8; 3];

/// A 16-bit source pixel, `RRRRRGGG GGGBBBBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    /// Pack channels already reduced to 5, 6 and 5 bits. Higher bits are dropped.
    pub const fn from_channels(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u16 & 0x1F) << 11) | ((green as u16 & 0x3F) << 5) | (blue as u16 & 0x1F))
    }

    /// Truncate an 8-bit-per-channel color to 5:6:5.
    pub fn from_rgb8(color: rgb::RGB<u8>) -> Self {
        Self::from_channels(color.r >> 3, color.g >> 2, color.b >> 3)
    }

    /// 5-bit red channel.
    pub const fn red(self) -> u8 {
        (self.0 >> 11) as u8 & 0x1F
    }

    /// 6-bit green channel.
    pub const fn green(self) -> u8 {
        (self.0 >> 5) as u8 & 0x3F
    }

    /// 5-bit blue channel.
    pub const fn blue(self) -> u8 {
        self.0 as u8 & 0x1F
    }

    /// Fine histogram address: the top 4 bits of each channel.
    pub const fn fine_address(self) -> FineAddress {
        let p = self.0;
        FineAddress(((p >> 12) << 8) | (((p >> 7) & 0xF) << 4) | ((p >> 1) & 0xF))
    }

    /// Coarse histogram address: the top 2 bits of each channel.
    pub const fn coarse_address(self) -> CoarseAddress {
        let p = self.0;
        CoarseAddress((((p >> 14) << 4) | (((p >> 9) & 0x3) << 2) | ((p >> 3) & 0x3)) as u8)
    }

    /// The color this pixel would have in a palette entry.
    pub const fn to_color6(self) -> Color6 {
        [self.red() << 1, self.green(), self.blue() << 1]
    }

    pub fn to_rgb8(self) -> rgb::RGB<u8> {
        color6_to_rgb8(self.to_color6())
    }
}

impl From<u16> for Rgb565 {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<rgb::RGB<u8>> for Rgb565 {
    fn from(color: rgb::RGB<u8>) -> Self {
        Self::from_rgb8(color)
    }
}

/// Index of a fine bucket, `0..4096`, laid out as `rrrr gggg bbbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FineAddress(u16);

impl FineAddress {
    /// Returns `None` for values outside the 12-bit address space.
    pub const fn new(value: u16) -> Option<Self> {
        if (value as usize) < FINE_BUCKETS {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Drop the two low bits of every channel.
    pub const fn to_coarse(self) -> CoarseAddress {
        let f = self.0;
        CoarseAddress(((((f >> 10) & 0x3) << 4) | (((f >> 6) & 0x3) << 2) | ((f >> 2) & 0x3)) as u8)
    }
}

/// Index of a coarse bucket, `0..64`, laid out as `rr gg bb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoarseAddress(u8);

impl CoarseAddress {
    pub const fn new(value: u8) -> Option<Self> {
        if (value as usize) < COARSE_BUCKETS {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Widen a 6-bit channel to 8 bits by replicating its top bits.
pub const fn expand6(channel: u8) -> u8 {
    let c = channel & 0x3F;
    (c << 2) | (c >> 4)
}

pub fn color6_to_rgb8(color: Color6) -> rgb::RGB<u8> {
    rgb::RGB {
        r: expand6(color[0]),
        g: expand6(color[1]),
        b: expand6(color[2]),
    }
}

/// The 6-bit display color of a 2:2:2 object pixel.
///
/// Each 2-bit channel is spread evenly over `0..=63`. The transparency
/// sentinel and values above 63 have no color of their own; they map to
/// black.
pub const fn object_color(pixel: u8) -> Color6 {
    if pixel >= 64 {
        return [0, 0, 0];
    }
    [
        ((pixel >> 4) & 0x3) * 21,
        ((pixel >> 2) & 0x3) * 21,
        (pixel & 0x3) * 21,
    ]
}
