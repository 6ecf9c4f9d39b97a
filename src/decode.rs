//! Photo and object image files.
//!
//! Both formats start with a 4-byte header, little-endian `u16` width then
//! `u16` height, followed by the pixels with the bottom row first. Photos use
//! 16-bit little-endian 5:6:5 pixels; object images use one 2:2:2 byte per
//! pixel.
//!
//! Photos are decoded in two passes over the same source: the first builds
//! the color histogram, the second seeks back to the first pixel and maps
//! every pixel to its palette index.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::DecodeLimits;
use crate::color::Rgb565;
use crate::error::DecodeError;
use crate::histogram::Histogram;
use crate::palette::allocate;
use crate::photo::{ObjectImage, Photo};
use crate::remap::{bottom_up_row, photo_index};

/// Size of the dimension header in bytes.
pub const HEADER_LEN: u64 = 4;

const PHOTO_PIXEL_BYTES: usize = 2;

/// Image dimensions as stored in a file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u16,
    pub height: u16,
}

impl Header {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Read the dimension header.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Header, DecodeError> {
    let mut buf = [0u8; HEADER_LEN as usize];
    let read = read_full(reader, &mut buf)?;
    if read < buf.len() {
        return Err(DecodeError::Truncated {
            expected: buf.len(),
            read,
        });
    }
    Ok(Header {
        width: u16::from_le_bytes([buf[0], buf[1]]),
        height: u16::from_le_bytes([buf[2], buf[3]]),
    })
}

/// Decode a photo from a seekable source positioned at its header.
pub fn read_photo<R: Read + Seek>(mut reader: R, limits: &DecodeLimits) -> Result<Photo, DecodeError> {
    let start = reader.stream_position()?;
    let header = read_header(&mut reader)?;
    check_limits(header, limits.max_photo_width, limits.max_photo_height)?;

    let width = header.width as usize;
    let height = header.height as usize;
    log::debug!("decoding {width}x{height} photo");

    let mut pixels = alloc_pixels(header.pixel_count())?;
    let mut raw = alloc_pixels(width * PHOTO_PIXEL_BYTES)?;
    let expected = header.pixel_count() * PHOTO_PIXEL_BYTES;

    let mut hist = Histogram::new();
    for k in 0..height {
        read_row(&mut reader, &mut raw, k, expected)?;
        for pixel in row_pixels(&raw) {
            hist.add(pixel);
        }
    }

    let allocation = allocate(&hist);

    reader.seek(SeekFrom::Start(start + HEADER_LEN))?;
    for k in 0..height {
        read_row(&mut reader, &mut raw, k, expected)?;
        let y = bottom_up_row(k, height);
        for (slot, pixel) in pixels[y * width..(y + 1) * width].iter_mut().zip(row_pixels(&raw)) {
            *slot = photo_index(pixel, &allocation.ranks);
        }
    }

    log::debug!(
        "decoded {width}x{height} photo: {} of {} fine colors kept precise",
        allocation.populated_precise(),
        hist.populated_fine(),
    );

    Ok(Photo::from_parts(
        header.width,
        header.height,
        allocation.palette,
        pixels,
    ))
}

/// Decode an object image from a source positioned at its header.
pub fn read_object_image<R: Read>(mut reader: R, limits: &DecodeLimits) -> Result<ObjectImage, DecodeError> {
    let header = read_header(&mut reader)?;
    check_limits(header, limits.max_object_width, limits.max_object_height)?;

    let width = header.width as usize;
    let height = header.height as usize;
    let mut pixels = alloc_pixels(header.pixel_count())?;
    let expected = header.pixel_count();

    for k in 0..height {
        let y = bottom_up_row(k, height);
        read_row(&mut reader, &mut pixels[y * width..(y + 1) * width], k, expected)?;
    }

    log::debug!("decoded {width}x{height} object image");
    ObjectImage::from_pixels(header.width, header.height, pixels).ok_or(DecodeError::DimensionMismatch {
        len: expected,
        width,
        height,
    })
}

/// Open and decode a photo file.
pub fn open_photo(path: impl AsRef<Path>, limits: &DecodeLimits) -> Result<Photo, DecodeError> {
    let path = path.as_ref();
    let file = open(path)?;
    read_photo(BufReader::new(file), limits).inspect_err(|e| {
        log::warn!("failed to decode photo {}: {e}", path.display());
    })
}

/// Open and decode an object image file.
pub fn open_object_image(path: impl AsRef<Path>, limits: &DecodeLimits) -> Result<ObjectImage, DecodeError> {
    let path = path.as_ref();
    let file = open(path)?;
    read_object_image(BufReader::new(file), limits).inspect_err(|e| {
        log::warn!("failed to decode object image {}: {e}", path.display());
    })
}

fn open(path: &Path) -> Result<File, DecodeError> {
    File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn check_limits(header: Header, max_width: u16, max_height: u16) -> Result<(), DecodeError> {
    if header.width > max_width || header.height > max_height {
        return Err(DecodeError::TooLarge {
            width: header.width,
            height: header.height,
            max_width,
            max_height,
        });
    }
    Ok(())
}

pub(crate) fn alloc_pixels(len: usize) -> Result<Vec<u8>, DecodeError> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|_| DecodeError::OutOfMemory { bytes: len })?;
    pixels.resize(len, 0);
    Ok(pixels)
}

/// Fill `buf` with row `k` of the pixel data, reporting a short read as truncation.
fn read_row<R: Read>(reader: &mut R, buf: &mut [u8], k: usize, expected: usize) -> Result<(), DecodeError> {
    let read = read_full(reader, buf)?;
    if read < buf.len() {
        return Err(DecodeError::Truncated {
            expected,
            read: k * buf.len() + read,
        });
    }
    Ok(())
}

fn row_pixels(raw: &[u8]) -> impl Iterator<Item = Rgb565> + '_ {
    raw.chunks_exact(PHOTO_PIXEL_BYTES)
        .map(|bytes| Rgb565(u16::from_le_bytes([bytes[0], bytes[1]])))
}

/// Like `read_exact`, but returns how much was read instead of failing on EOF.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
