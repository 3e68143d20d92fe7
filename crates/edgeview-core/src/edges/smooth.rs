//! Gaussian smoothing
//!
//! 5x5 binomial kernel, applied as two separable `[1, 4, 6, 4, 1] / 16`
//! passes. Accumulation is integer and the result is rounded once at the
//! end, so the output does not depend on float rounding.

use super::Plane;

const KERNEL: [u32; 5] = [1, 4, 6, 4, 1];
const HALF: isize = (KERNEL.len() / 2) as isize;
/// Sum of the 2D kernel (16 * 16)
const NORM_SHIFT: u32 = 8;

/// Smooth a Gray8 plane with border replication.
pub fn gaussian_5x5(src: &Plane<u8>) -> Plane<u8> {
    let (w, h) = (src.width(), src.height());

    // Horizontal pass: values up to 255 * 16.
    let mut rows = Vec::with_capacity(w * h);
    for y in 0..h as isize {
        for x in 0..w as isize {
            let acc: u32 = KERNEL
                .iter()
                .enumerate()
                .map(|(k, &kv)| kv * src.get_clamped(x + k as isize - HALF, y) as u32)
                .sum();
            rows.push(acc);
        }
    }
    let rows = Plane::from_vec(w, h, rows);

    // Vertical pass: values up to 255 * 256.
    let mut out = Vec::with_capacity(w * h);
    for y in 0..h as isize {
        for x in 0..w as isize {
            let acc: u32 = KERNEL
                .iter()
                .enumerate()
                .map(|(k, &kv)| kv * rows.get_clamped(x, y + k as isize - HALF))
                .sum();
            out.push(((acc + (1 << (NORM_SHIFT - 1))) >> NORM_SHIFT) as u8);
        }
    }
    Plane::from_vec(w, h, out)
}
