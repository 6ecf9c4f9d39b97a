use crate::color::{COARSE_BUCKETS, Color6, FINE_BUCKETS, FineAddress, Rgb565};

/// Accumulated population and channel sums for one quantized color address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bucket {
    /// The quantized address this bucket aggregates; doubles as its identifier.
    pub address: u16,
    /// Number of pixels in this bucket
    pub count: u32,
    /// Sum of 5-bit red values
    pub red_sum: u64,
    /// Sum of 6-bit green values
    pub green_sum: u64,
    /// Sum of 5-bit blue values
    pub blue_sum: u64,
}

impl Bucket {
    pub const fn empty(address: u16) -> Self {
        Self {
            address,
            count: 0,
            red_sum: 0,
            green_sum: 0,
            blue_sum: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn add_pixel(&mut self, pixel: Rgb565) {
        self.count += 1;
        self.red_sum += pixel.red() as u64;
        self.green_sum += pixel.green() as u64;
        self.blue_sum += pixel.blue() as u64;
    }

    /// Add another bucket's population and sums into this one, keeping this address.
    pub fn absorb(&mut self, other: &Bucket) {
        self.count += other.count;
        self.red_sum += other.red_sum;
        self.green_sum += other.green_sum;
        self.blue_sum += other.blue_sum;
    }

    /// Average color as a 6-bit palette entry, or black for an empty bucket.
    ///
    /// Red and blue come from 5-bit source channels and are shifted up one
    /// bit so all three channels share the 6-bit palette range.
    pub fn average(&self) -> Color6 {
        if self.count == 0 {
            return [0, 0, 0];
        }
        let n = self.count as u64;
        [
            ((self.red_sum / n) << 1) as u8,
            (self.green_sum / n) as u8,
            ((self.blue_sum / n) << 1) as u8,
        ]
    }
}

/// Two-level color histogram: 64 coarse buckets and 4096 fine buckets, both
/// indexed directly by address.
#[derive(Debug, Clone)]
pub struct Histogram {
    coarse: Vec<Bucket>,
    fine: Vec<Bucket>,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            coarse: (0..COARSE_BUCKETS as u16).map(Bucket::empty).collect(),
            fine: (0..FINE_BUCKETS as u16).map(Bucket::empty).collect(),
        }
    }

    /// Count one pixel into its coarse and fine buckets.
    pub fn add(&mut self, pixel: Rgb565) {
        self.fine[pixel.fine_address().index()].add_pixel(pixel);
        self.coarse[pixel.coarse_address().index()].add_pixel(pixel);
    }

    /// Coarse buckets, indexed by coarse address.
    pub fn coarse(&self) -> &[Bucket] {
        &self.coarse
    }

    /// Fine buckets, indexed by fine address.
    pub fn fine(&self) -> &[Bucket] {
        &self.fine
    }

    pub fn total_pixels(&self) -> u64 {
        self.fine.iter().map(|b| b.count as u64).sum()
    }

    /// Number of fine buckets holding at least one pixel.
    pub fn populated_fine(&self) -> usize {
        self.fine.iter().filter(|b| !b.is_empty()).count()
    }
}

/// Build a histogram from a stream of 5:6:5 pixels.
pub fn build_histogram<I>(pixels: I) -> Histogram
where
    I: IntoIterator<Item = Rgb565>,
{
    let mut hist = Histogram::new();
    for pixel in pixels {
        hist.add(pixel);
    }
    hist
}

/// Sum fine buckets into the coarse bucket each truncates to.
pub(crate) fn fold_into_coarse<'a, I>(fine: I) -> Vec<Bucket>
where
    I: IntoIterator<Item = &'a Bucket>,
{
    let mut coarse: Vec<Bucket> = (0..COARSE_BUCKETS as u16).map(Bucket::empty).collect();
    for bucket in fine {
        if bucket.is_empty() {
            continue;
        }
        if let Some(address) = FineAddress::new(bucket.address) {
            coarse[address.to_coarse().index()].absorb(bucket);
        }
    }
    coarse
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_color_one_bucket() {
        let pixel = Rgb565::from_channels(20, 40, 10);
        let hist = build_histogram(core::iter::repeat_n(pixel, 100));
        assert_eq!(hist.populated_fine(), 1);
        let bucket = hist.fine()[pixel.fine_address().index()];
        assert_eq!(bucket.count, 100);
        assert_eq!(bucket.red_sum, 2000);
        assert_eq!(bucket.green_sum, 4000);
        assert_eq!(bucket.blue_sum, 1000);
        assert_eq!(hist.coarse()[pixel.coarse_address().index()].count, 100);
    }

    #[test]
    fn sums_keep_full_precision() {
        // Same fine bucket, different low bits.
        let a = Rgb565::from_channels(0b10000, 0b100000, 0b10000);
        let b = Rgb565::from_channels(0b10001, 0b100011, 0b10001);
        assert_eq!(a.fine_address(), b.fine_address());

        let hist = build_histogram([a, b]);
        let bucket = hist.fine()[a.fine_address().index()];
        assert_eq!(bucket.count, 2);
        assert_eq!(bucket.red_sum, 16 + 17);
        assert_eq!(bucket.green_sum, 32 + 35);
        assert_eq!(bucket.average(), [32, 33, 32]);
    }

    #[test]
    fn distinct_colors_separate_buckets() {
        let hist = build_histogram([Rgb565(0x0000), Rgb565(0xFFFF)]);
        assert_eq!(hist.populated_fine(), 2);
        assert_eq!(hist.total_pixels(), 2);
    }

    #[test]
    fn empty_bucket_averages_to_black() {
        assert_eq!(Bucket::empty(7).average(), [0, 0, 0]);
    }

    #[test]
    fn coarse_occupancy_equals_truncated_fine_sums() {
        let pixels: Vec<Rgb565> = (0..5000u32)
            .map(|i| Rgb565(i.wrapping_mul(2654435761) as u16))
            .collect();
        let hist = build_histogram(pixels.iter().copied());
        let folded = fold_into_coarse(hist.fine());
        assert_eq!(folded, hist.coarse());
    }

    #[test]
    fn averages_stay_in_six_bit_range() {
        let hist = build_histogram((0..=u16::MAX).map(Rgb565));
        for bucket in hist.fine().iter().chain(hist.coarse()) {
            let [r, g, b] = bucket.average();
            assert!(r < 64 && g < 64 && b < 64, "bucket {} -> {:?}", bucket.address, [r, g, b]);
        }
    }
}
