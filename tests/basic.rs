use photopal::palette::{COARSE_INDEX_BASE, PHOTO_INDEX_BASE};
use photopal::{DecodeError, Rgb565};

fn gradient(width: usize, height: usize) -> Vec<Rgb565> {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 31 / width.max(1)) as u8;
            let g = (y * 63 / height.max(1)) as u8;
            let b = ((x + y) * 31 / (width + height).max(1)) as u8;
            pixels.push(Rgb565::from_channels(r, g, b));
        }
    }
    pixels
}

#[test]
fn smoke_test_gradient() {
    let (width, height) = (64u16, 48u16);
    let pixels = gradient(width as usize, height as usize);
    let photo = photopal::quantize_photo(&pixels, width, height).unwrap();

    assert_eq!(photo.width(), width);
    assert_eq!(photo.height(), height);
    assert_eq!(photo.pixels().len(), pixels.len());
    assert_eq!(photo.palette().len(), 192);

    for &idx in photo.pixels() {
        assert!(idx >= PHOTO_INDEX_BASE, "index {idx} is in the reserved range");
    }
}

#[test]
fn used_precise_slots_are_not_black() {
    // Green never drops below 4, so no pixel lands in the all-zero fine bucket.
    let pixels: Vec<Rgb565> = gradient(40, 40)
        .into_iter()
        .map(|p| Rgb565::from_channels(p.red(), p.green().max(4), p.blue()))
        .collect();
    let photo = photopal::quantize_photo(&pixels, 40, 40).unwrap();
    for &idx in photo.pixels() {
        assert_ne!(photo.palette().get(idx), Some([0, 0, 0]), "index {idx}");
    }
}

#[test]
fn single_color_two_by_two() {
    let p = Rgb565::from_channels(12, 34, 21);
    let photo = photopal::quantize_photo(&[p; 4], 2, 2).unwrap();
    assert_eq!(photo.pixels(), &[64, 64, 64, 64]);
    assert_eq!(photo.palette().precise()[0], [24, 34, 42]);
}

#[test]
fn dominant_color_takes_first_slot() {
    let common = Rgb565::from_channels(3, 50, 17);
    let mut pixels = gradient(16, 16);
    for p in pixels.iter_mut().step_by(2) {
        *p = common;
    }
    let photo = photopal::quantize_photo(&pixels, 16, 16).unwrap();
    assert_eq!(photo.pixels()[0], 64);
    assert_eq!(photo.palette().precise()[0], common.to_color6());
}

#[test]
fn many_colors_use_coarse_fallback() {
    // Every 5:6:5 value once: 4096 populated fine buckets, only 128 precise.
    let pixels: Vec<Rgb565> = (0..=u16::MAX).map(Rgb565).collect();
    let photo = photopal::quantize_photo(&pixels, 256, 256).unwrap();

    let coarse = photo.pixels().iter().filter(|&&i| i >= COARSE_INDEX_BASE).count();
    let precise = photo.pixels().len() - coarse;
    // Each fine bucket holds 16 pixels.
    assert_eq!(precise, 128 * 16);
    assert!(photo.palette().coarse().iter().all(|c| *c != [0, 0, 0]));
}

#[test]
fn rgb8_input_matches_rgb565_input() {
    let rgb: Vec<rgb::RGB<u8>> = (0..64u32)
        .map(|i| rgb::RGB {
            r: (i * 4) as u8,
            g: 255 - (i * 4) as u8,
            b: (i * 2) as u8,
        })
        .collect();
    let converted: Vec<Rgb565> = rgb.iter().map(|&p| Rgb565::from(p)).collect();
    let a = photopal::quantize_rgb8(&rgb, 8, 8).unwrap();
    let b = photopal::quantize_photo(&converted, 8, 8).unwrap();
    assert_eq!(a.pixels(), b.pixels());
    assert_eq!(a.palette(), b.palette());
}

#[test]
fn error_dimension_mismatch() {
    let pixels = vec![Rgb565(0); 10];
    assert!(matches!(
        photopal::quantize_photo(&pixels, 4, 4),
        Err(DecodeError::DimensionMismatch { len: 10, width: 4, height: 4 })
    ));
}

#[test]
fn empty_photo_is_allowed() {
    let photo = photopal::quantize_photo(&[], 0, 5).unwrap();
    assert_eq!(photo.height(), 5);
    assert!(photo.pixels().is_empty());
}
