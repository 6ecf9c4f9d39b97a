#![forbid(unsafe_code)]

//! Adaptive palette photos and scanline compositing for a 256-color
//! scrolling display.
//!
//! A room photo is decoded from 5:6:5 RGB into 192 photo-specific colors:
//! the 128 most frequent 4:4:4 color cells each get an averaged entry, and
//! everything else falls back to one of 64 averaged 2:2:2 cells. Display
//! indices `0..64` are left to object and UI colors.
//!
//! The [`Compositor`] then draws the viewport one line at a time, merging
//! the photo with object images from the caller's room model.

pub mod color;
pub mod compositor;
pub mod decode;
pub mod error;
pub mod histogram;
pub mod palette;
pub mod photo;
pub mod remap;

pub use color::{OBJ_CLR_TRANSP, Rgb565};
pub use compositor::{Compositor, Orientation, PaletteSink, Placed, Room, SceneObject, Viewport};
pub use decode::{open_object_image, open_photo, read_object_image, read_photo};
pub use error::DecodeError;
pub use palette::{DisplayPalette, PhotoPalette};
pub use photo::{ObjectImage, Photo};

/// Default maximum photo width in pixels.
pub const MAX_PHOTO_WIDTH: u16 = 1024;
/// Default maximum photo height in pixels.
pub const MAX_PHOTO_HEIGHT: u16 = 1024;
/// Default maximum object image width in pixels.
pub const MAX_OBJECT_WIDTH: u16 = 160;
/// Default maximum object image height in pixels.
pub const MAX_OBJECT_HEIGHT: u16 = 100;

/// Size limits applied when decoding.
#[derive(Debug, Clone)]
pub struct DecodeLimits {
    pub max_photo_width: u16,
    pub max_photo_height: u16,
    pub max_object_width: u16,
    pub max_object_height: u16,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_photo_width: MAX_PHOTO_WIDTH,
            max_photo_height: MAX_PHOTO_HEIGHT,
            max_object_width: MAX_OBJECT_WIDTH,
            max_object_height: MAX_OBJECT_HEIGHT,
        }
    }
}

impl DecodeLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_photo_size(mut self, width: u16, height: u16) -> Self {
        self.max_photo_width = width;
        self.max_photo_height = height;
        self
    }

    pub fn max_object_size(mut self, width: u16, height: u16) -> Self {
        self.max_object_width = width;
        self.max_object_height = height;
        self
    }
}

/// Quantize in-memory 5:6:5 pixels, stored top row first, into a photo.
///
/// Runs the same histogram, allocation and mapping steps as file decoding,
/// without a size limit beyond the `u16` dimensions.
pub fn quantize_photo(pixels: &[Rgb565], width: u16, height: u16) -> Result<Photo, DecodeError> {
    let w = width as usize;
    let h = height as usize;
    if pixels.len() != w * h {
        return Err(DecodeError::DimensionMismatch {
            len: pixels.len(),
            width: w,
            height: h,
        });
    }

    let hist = histogram::build_histogram(pixels.iter().copied());
    let allocation = palette::allocate(&hist);

    let mut indices = decode::alloc_pixels(pixels.len())?;
    if w > 0 {
        for (src, dst) in pixels.chunks_exact(w).zip(indices.chunks_exact_mut(w)) {
            remap::remap_row(src, &allocation.ranks, dst);
        }
    }

    Ok(Photo::from_parts(width, height, allocation.palette, indices))
}

/// Quantize 8-bit RGB pixels, stored top row first. Channels are truncated
/// to 5:6:5 first.
pub fn quantize_rgb8(pixels: &[rgb::RGB<u8>], width: u16, height: u16) -> Result<Photo, DecodeError> {
    let converted: Vec<Rgb565> = pixels.iter().map(|&p| Rgb565::from_rgb8(p)).collect();
    quantize_photo(&converted, width, height)
}
