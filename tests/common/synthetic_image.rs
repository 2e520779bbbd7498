#![allow(dead_code)]

/// Interleaved RGB8 frame filled by a per-pixel gray function.
pub fn gray_frame(width: usize, height: usize, f: impl Fn(usize, usize) -> u8) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let v = f(x, y);
            img.extend_from_slice(&[v, v, v]);
        }
    }
    img
}

/// Flat light frame with no structure at all.
pub fn blank_rgb(width: usize, height: usize) -> Vec<u8> {
    gray_frame(width, height, |_, _| 200)
}

/// Concrete-gray slab with a darker recessed panel in the middle.
pub fn concrete_rgb(width: usize, height: usize) -> Vec<u8> {
    let (x0, x1) = (width / 4, 3 * width / 4);
    let (y0, y1) = (height / 4, 3 * height / 4);
    gray_frame(width, height, |x, y| {
        if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
            100
        } else {
            140
        }
    })
}

fn speckle(x: u32, y: u32) -> u32 {
    let v = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663);
    let v = (v ^ (v >> 13)).wrapping_mul(0x5bd1_e995);
    v ^ (v >> 15)
}

/// Coarse aggregate: 2x2 blocks of hashed grays in 110..=170, with no
/// straight edges long enough to read as members.
pub fn aggregate_rgb(width: usize, height: usize) -> Vec<u8> {
    gray_frame(width, height, |x, y| {
        110 + (speckle((x / 2) as u32, (y / 2) as u32) % 61) as u8
    })
}

pub const BEAM_ROWS: [usize; 4] = [40, 90, 140, 190];
pub const BEAM_THICKNESS: usize = 12;

/// 320x240 frame with four evenly spaced dark horizontal bars.
pub fn beams_rgb() -> (usize, usize, Vec<u8>) {
    let (w, h) = (320usize, 240usize);
    let data = gray_frame(w, h, |x, y| {
        let on_beam = (20..300).contains(&x)
            && BEAM_ROWS
                .iter()
                .any(|&t| (t..t + BEAM_THICKNESS).contains(&y));
        if on_beam {
            90
        } else {
            220
        }
    });
    (w, h, data)
}
