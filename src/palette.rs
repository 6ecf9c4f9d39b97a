use crate::color::{COARSE_BUCKETS, Color6, FINE_BUCKETS, FineAddress, object_color};
use crate::histogram::{Bucket, Histogram, fold_into_coarse};

/// Palette slots given to the most frequent fine buckets.
pub const PRECISE_COLORS: usize = 128;

/// Total colors a photo contributes: 128 precise plus 64 coarse.
pub const PHOTO_COLORS: usize = PRECISE_COLORS + COARSE_BUCKETS;

/// Display palette indices below this are reserved for object and UI colors.
pub const PHOTO_INDEX_BASE: u8 = 64;

/// First display index of the coarse (fallback) colors.
pub const COARSE_INDEX_BASE: u8 = PHOTO_INDEX_BASE + PRECISE_COLORS as u8;

/// Size of the full display palette.
pub const DISPLAY_COLORS: usize = 256;

/// The 192 photo-specific colors, stored as 6-bit channels.
///
/// Slot `i` is shown at display index `64 + i`. Slots `0..128` hold the
/// precise colors in rank order, slots `128..192` the coarse colors in
/// coarse-address order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPalette {
    entries: [Color6; PHOTO_COLORS],
}

impl Default for PhotoPalette {
    fn default() -> Self {
        Self {
            entries: [[0; 3]; PHOTO_COLORS],
        }
    }
}

impl PhotoPalette {
    /// All 192 entries.
    pub fn entries(&self) -> &[Color6] {
        &self.entries
    }

    /// The 128 precise entries, rank order.
    pub fn precise(&self) -> &[Color6] {
        &self.entries[..PRECISE_COLORS]
    }

    /// The 64 coarse entries, coarse-address order.
    pub fn coarse(&self) -> &[Color6] {
        &self.entries[PRECISE_COLORS..]
    }

    /// Look up the color behind a display index, if it belongs to the photo.
    pub fn get(&self, display_index: u8) -> Option<Color6> {
        let slot = display_index.checked_sub(PHOTO_INDEX_BASE)? as usize;
        self.entries.get(slot).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A complete 256-entry display palette: 64 reserved colors then the photo's 192.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPalette {
    entries: [Color6; DISPLAY_COLORS],
}

impl DisplayPalette {
    /// Combine the default 2:2:2 object colors with a photo palette.
    pub fn new(photo: &PhotoPalette) -> Self {
        let mut reserved = [[0; 3]; PHOTO_INDEX_BASE as usize];
        for (i, slot) in reserved.iter_mut().enumerate() {
            *slot = object_color(i as u8);
        }
        Self::with_reserved(&reserved, photo)
    }

    /// Combine caller-chosen reserved colors with a photo palette.
    pub fn with_reserved(reserved: &[Color6; PHOTO_INDEX_BASE as usize], photo: &PhotoPalette) -> Self {
        let mut entries = [[0; 3]; DISPLAY_COLORS];
        entries[..PHOTO_INDEX_BASE as usize].copy_from_slice(reserved);
        entries[PHOTO_INDEX_BASE as usize..].copy_from_slice(photo.entries());
        Self { entries }
    }

    pub fn entries(&self) -> &[Color6] {
        &self.entries
    }

    pub fn get(&self, index: u8) -> Color6 {
        self.entries[index as usize]
    }
}

/// Maps each fine address to its position in the frequency-sorted bucket order.
#[derive(Debug, Clone)]
pub struct RankTable {
    /// Rank of every fine address.
    ranks: Vec<u16>,
    /// Population of the bucket at each precise rank.
    precise_counts: [u32; PRECISE_COLORS],
}

impl RankTable {
    pub fn rank(&self, address: FineAddress) -> u16 {
        self.ranks[address.index()]
    }

    /// The precise palette slot for a fine address, if its bucket was kept
    /// as a precise color and holds at least one pixel.
    pub fn precise_slot(&self, address: FineAddress) -> Option<u8> {
        let rank = self.rank(address) as usize;
        if rank < PRECISE_COLORS && self.precise_counts[rank] != 0 {
            Some(rank as u8)
        } else {
            None
        }
    }
}

/// Output of palette allocation.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub palette: PhotoPalette,
    pub ranks: RankTable,
    /// The 128 highest-population fine buckets, most frequent first.
    pub precise: Vec<Bucket>,
    /// Coarse buckets holding only the pixels of non-precise fine buckets.
    pub folded: Vec<Bucket>,
}

impl Allocation {
    /// Pixels represented by the precise colors.
    pub fn precise_pixels(&self) -> u64 {
        self.precise.iter().map(|b| b.count as u64).sum()
    }

    /// Pixels that fell back to a coarse color.
    pub fn folded_pixels(&self) -> u64 {
        self.folded.iter().map(|b| b.count as u64).sum()
    }

    /// Precise slots that hold a real color rather than black filler.
    pub fn populated_precise(&self) -> usize {
        self.precise.iter().filter(|b| !b.is_empty()).count()
    }

    pub fn populated_coarse(&self) -> usize {
        self.folded.iter().filter(|b| !b.is_empty()).count()
    }
}

/// Choose the photo palette from a populated histogram.
///
/// The 128 most populous fine buckets become precise colors. Every other
/// fine bucket is folded into its coarse parent, and the 64 coarse averages
/// fill the remaining slots. Zero-population precise buckets still take a
/// slot and render black.
pub fn allocate(hist: &Histogram) -> Allocation {
    let mut sorted: Vec<Bucket> = hist.fine().to_vec();
    // Stable: equal counts stay in ascending address order.
    sorted.sort_by(|a, b| b.count.cmp(&a.count));

    let mut ranks = vec![0u16; FINE_BUCKETS];
    for (rank, bucket) in sorted.iter().enumerate() {
        ranks[bucket.address as usize] = rank as u16;
    }

    let (precise, rest) = sorted.split_at(PRECISE_COLORS);
    let folded = fold_into_coarse(rest);

    let mut palette = PhotoPalette::default();
    for (slot, bucket) in palette.entries[..PRECISE_COLORS].iter_mut().zip(precise) {
        *slot = bucket.average();
    }
    for (slot, bucket) in palette.entries[PRECISE_COLORS..].iter_mut().zip(&folded) {
        *slot = bucket.average();
    }

    let mut precise_counts = [0u32; PRECISE_COLORS];
    for (count, bucket) in precise_counts.iter_mut().zip(precise) {
        *count = bucket.count;
    }

    let allocation = Allocation {
        palette,
        ranks: RankTable {
            ranks,
            precise_counts,
        },
        precise: precise.to_vec(),
        folded,
    };

    log::trace!(
        "palette allocated: {} precise colors ({} px), {} coarse colors ({} px)",
        allocation.populated_precise(),
        allocation.precise_pixels(),
        allocation.populated_coarse(),
        allocation.folded_pixels(),
    );

    allocation
}
