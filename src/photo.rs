use crate::color::{OBJ_CLR_TRANSP, color6_to_rgb8};
use crate::palette::PhotoPalette;

/// A quantized room photo: 192 optimized colors plus one display index per pixel.
///
/// Pixels are stored top row first, left to right, without padding. Every
/// index lies in `64..=255`.
#[derive(Debug, Clone)]
pub struct Photo {
    width: u16,
    height: u16,
    palette: PhotoPalette,
    pixels: Vec<u8>,
}

impl Photo {
    pub(crate) fn from_parts(width: u16, height: u16, palette: PhotoPalette, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            palette,
            pixels,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// The photo's 192 palette colors, shown at display indices `64..256`.
    pub fn palette(&self) -> &PhotoPalette {
        &self.palette
    }

    /// Display indices, row-major from the top-left corner.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Display index at `(x, y)`, or `None` outside the photo.
    pub fn index_at(&self, x: i64, y: i64) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Expand to 8-bit RGB through the photo palette.
    pub fn to_rgb8(&self) -> Vec<rgb::RGB<u8>> {
        self.pixels
            .iter()
            .map(|&index| color6_to_rgb8(self.palette.get(index).unwrap_or([0, 0, 0])))
            .collect()
    }
}

/// A sprite image in 2:2:2 RGB, one byte per pixel, top row first.
///
/// Pixels equal to [`OBJ_CLR_TRANSP`] are transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectImage {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
}

impl ObjectImage {
    /// Wrap already-decoded pixels. Returns `None` if the buffer length does
    /// not match the dimensions.
    pub fn from_pixels(width: u16, height: u16, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width as usize || y >= self.height as usize {
            return None;
        }
        Some(self.pixels[y * self.width as usize + x])
    }

    /// Whether `(x, y)` holds the transparency sentinel. `false` outside the image.
    pub fn is_transparent(&self, x: usize, y: usize) -> bool {
        self.pixel(x, y) == Some(OBJ_CLR_TRANSP)
    }
}
