use photopal::Rgb565;
use photopal::histogram::build_histogram;
use photopal::palette::{COARSE_INDEX_BASE, PRECISE_COLORS, allocate};

/// Squared error in 6-bit channel space between source pixels and their palette colors.
fn mean_squared_error(pixels: &[Rgb565], photo: &photopal::Photo) -> f64 {
    let total: u64 = pixels
        .iter()
        .zip(photo.pixels())
        .map(|(p, &idx)| {
            let want = p.to_color6();
            let got = photo.palette().get(idx).unwrap();
            want.iter()
                .zip(got.iter())
                .map(|(&a, &b)| {
                    let d = a as i64 - b as i64;
                    (d * d) as u64
                })
                .sum::<u64>()
        })
        .sum();
    total as f64 / pixels.len() as f64
}

/// `n` colors, each the only member of its fine bucket, low bits cleared.
fn distinct_fine_colors(n: usize) -> Vec<Rgb565> {
    (0..n)
        .map(|i| {
            let i = (i * 37) % 4096;
            Rgb565::from_channels(((i >> 8) as u8) << 1, (((i >> 4) & 0xF) as u8) << 2, ((i & 0xF) as u8) << 1)
        })
        .collect()
}

#[test]
fn few_colors_reconstruct_exactly() {
    let colors = distinct_fine_colors(PRECISE_COLORS);
    let pixels: Vec<Rgb565> = (0..32 * 32).map(|i| colors[(i * 7) % colors.len()]).collect();
    let photo = photopal::quantize_photo(&pixels, 32, 32).unwrap();

    for (p, &idx) in pixels.iter().zip(photo.pixels()) {
        assert!(idx < COARSE_INDEX_BASE, "{p:?} fell back to coarse index {idx}");
        assert_eq!(photo.palette().get(idx), Some(p.to_color6()));
    }
    assert_eq!(mean_squared_error(&pixels, &photo), 0.0);
}

#[test]
fn rank_zero_is_globally_most_frequent() {
    let colors = distinct_fine_colors(300);
    let mut pixels = Vec::new();
    for (i, &c) in colors.iter().enumerate() {
        let copies = if i == 211 { 500 } else { 1 + i % 5 };
        pixels.extend(std::iter::repeat_n(c, copies));
    }
    let result = allocate(&build_histogram(pixels.iter().copied()));
    assert_eq!(result.ranks.rank(colors[211].fine_address()), 0);
    assert_eq!(result.precise[0].count, 500);
}

#[test]
fn folding_conserves_pixels() {
    let pixels: Vec<Rgb565> = (0..20_000u32).map(|i| Rgb565((i.wrapping_mul(2654435761) >> 7) as u16)).collect();
    let hist = build_histogram(pixels.iter().copied());
    let result = allocate(&hist);
    assert_eq!(result.precise_pixels() + result.folded_pixels(), pixels.len() as u64);
}

#[test]
fn fallback_error_is_bounded() {
    // Noise across the whole color cube; most pixels land on coarse colors.
    let (width, height) = (128u16, 128u16);
    let pixels: Vec<Rgb565> = (0..width as u32 * height as u32)
        .map(|i| Rgb565(i.wrapping_mul(2654435761) as u16))
        .collect();
    let photo = photopal::quantize_photo(&pixels, width, height).unwrap();
    let mse = mean_squared_error(&pixels, &photo);
    // A coarse cell spans 16 levels per channel; a pixel's error against its
    // cell average cannot exceed three channels of 16^2.
    assert!(mse < 3.0 * 256.0, "mse {mse}");
    assert!(photo.pixels().iter().any(|&i| i >= COARSE_INDEX_BASE));
}
