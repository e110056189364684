/// Generates a high-contrast RGBA checkerboard, tightly packed.
pub fn checkerboard_rgba(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = vec![0u8; width * height * 4];
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            let val = if sum & 1 == 0 { 32u8 } else { 220u8 };
            let k = (y * width + x) * 4;
            img[k..k + 4].copy_from_slice(&[val, val, val, 255]);
        }
    }
    img
}

/// Horizontal gray ramp from 0 to 255 across the width, as RGBA.
pub fn ramp_rgba(width: usize, height: usize) -> Vec<u8> {
    assert!(width > 1 && height > 0, "ramp needs at least two columns");
    let mut img = vec![0u8; width * height * 4];
    for y in 0..height {
        for x in 0..width {
            let val = (x * 255 / (width - 1)) as u8;
            let k = (y * width + x) * 4;
            img[k..k + 4].copy_from_slice(&[val, val, val, 255]);
        }
    }
    img
}
