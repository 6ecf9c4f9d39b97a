use crate::color::Rgb565;
use crate::palette::{COARSE_INDEX_BASE, PHOTO_INDEX_BASE, RankTable};

/// Display palette index for one source pixel.
///
/// Pixels whose fine bucket won a precise slot map to `64 + rank`; all
/// others fall back to `192 + coarse_address`.
pub fn photo_index(pixel: Rgb565, ranks: &RankTable) -> u8 {
    match ranks.precise_slot(pixel.fine_address()) {
        Some(slot) => PHOTO_INDEX_BASE + slot,
        None => COARSE_INDEX_BASE + pixel.coarse_address().index() as u8,
    }
}

/// Map one row of source pixels into a row of the photo's index buffer.
pub fn remap_row(pixels: &[Rgb565], ranks: &RankTable, out: &mut [u8]) {
    debug_assert_eq!(pixels.len(), out.len());
    for (slot, &pixel) in out.iter_mut().zip(pixels) {
        *slot = photo_index(pixel, ranks);
    }
}

/// Memory row that receives the `read`-th row of a bottom-to-top source.
pub fn bottom_up_row(read: usize, height: usize) -> usize {
    height - 1 - read
}
