use super::*;
use crate::edges::sobel_gradients;
use crate::image::ImageF32;

fn step_image(width: usize, height: usize, split_x: usize) -> ImageF32 {
    let mut img = ImageF32::new(width, height);
    for y in 0..height {
        for x in split_x..width {
            img.set(x, y, 1.0);
        }
    }
    img
}

fn bar_image(width: usize, height: usize, y0: usize, y1: usize) -> ImageF32 {
    let mut img = ImageF32::filled(width, height, 0.9);
    for y in y0..y1 {
        for x in 4..width - 4 {
            img.set(x, y, 0.1);
        }
    }
    img
}

#[test]
fn lsd_extractor_finds_vertical_segment() {
    let grad = sobel_gradients(&step_image(32, 32, 16));
    let segs = extract_segments(&grad, &LsdOptions::default());
    assert!(
        !segs.is_empty(),
        "expected at least one segment on a vertical edge"
    );
    let longest = segs
        .iter()
        .max_by(|a, b| a.length.total_cmp(&b.length))
        .expect("non-empty");
    assert!(
        (longest.orientation_deg - 90.0).abs() < 5.0,
        "expected vertical-oriented segment, got {}",
        longest.orientation_deg
    );
    assert!(
        longest.length >= 20.0,
        "expected a long segment, got len={}",
        longest.length
    );
}

#[test]
fn lsd_extractor_finds_both_bar_edges() {
    let grad = sobel_gradients(&bar_image(64, 40, 16, 24));
    let segs = extract_segments(&grad, &LsdOptions::default());
    let horizontal: Vec<_> = segs
        .iter()
        .filter(|s| s.orientation_deg < 10.0 || s.orientation_deg > 170.0)
        .filter(|s| s.length > 40.0)
        .collect();
    assert!(
        horizontal.len() >= 2,
        "expected top and bottom edges of the bar, got {:?}",
        segs
    );
}

#[test]
fn lsd_extractor_rejects_flat_image() {
    let grad = sobel_gradients(&ImageF32::new(16, 16));
    let segs = extract_segments(&grad, &LsdOptions::default());
    assert!(
        segs.is_empty(),
        "no segments should be detected in a flat image, got {:?}",
        segs
    );
}

#[test]
fn extraction_is_repeatable() {
    let grad = sobel_gradients(&bar_image(48, 48, 10, 18));
    let a = extract_segments(&grad, &LsdOptions::default());
    let b = extract_segments(&grad, &LsdOptions::default());
    assert_eq!(a, b);
}
