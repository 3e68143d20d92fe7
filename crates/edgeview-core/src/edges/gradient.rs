//! Sobel gradient estimation
//!
//! ```text
//!       [-1 0 1]          [-1 -2 -1]
//! Gx =  [-2 0 2]    Gy =  [ 0  0  0]
//!       [-1 0 1]          [ 1  2  1]
//! ```
//!
//! `gx` grows to the right and `gy` grows downward. Magnitude is the L2
//! norm; direction is quantized to one of four bins.

use super::Plane;

/// tan(22.5°) in Q15 fixed point
const TAN_22_5_Q15: i64 = 13573;

/// Gradient direction, quantized to 45° bins.
///
/// Angles are measured with y pointing down, so `Diagonal45` means the
/// gradient points toward the lower right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// 0°: intensity changes along x
    #[default]
    Horizontal,
    /// 45°
    Diagonal45,
    /// 90°: intensity changes along y
    Vertical,
    /// 135°
    Diagonal135,
}

impl Direction {
    /// Quantize a gradient vector. Bin boundaries are at 22.5° and 67.5°,
    /// compared exactly in fixed point.
    pub fn quantize(gx: i32, gy: i32) -> Self {
        let ax = (gx as i64).abs();
        let ay = (gy as i64).abs() << 15;
        let tan22 = ax * TAN_22_5_Q15;
        // tan(67.5°) = tan(22.5°) + 2
        let tan67 = tan22 + (ax << 16);

        if ay <= tan22 {
            Direction::Horizontal
        } else if ay > tan67 {
            Direction::Vertical
        } else if (gx < 0) == (gy < 0) {
            Direction::Diagonal45
        } else {
            Direction::Diagonal135
        }
    }

    /// Offsets of the two neighbours along the gradient line. Non-maximum
    /// suppression requires a strict win over the first and allows a tie
    /// with the second, so plateaus two pixels wide keep exactly one.
    pub fn neighbors(self) -> [(isize, isize); 2] {
        match self {
            Direction::Horizontal => [(-1, 0), (1, 0)],
            Direction::Diagonal45 => [(-1, -1), (1, 1)],
            Direction::Vertical => [(0, -1), (0, 1)],
            Direction::Diagonal135 => [(1, -1), (-1, 1)],
        }
    }
}

/// Per-pixel gradient magnitude and quantized direction
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub magnitude: Plane<f32>,
    pub direction: Plane<Direction>,
}

/// Sobel gradient with border replication.
pub fn sobel(src: &Plane<u8>) -> Gradient {
    let (w, h) = (src.width(), src.height());
    let mut magnitude = Vec::with_capacity(w * h);
    let mut direction = Vec::with_capacity(w * h);

    for y in 0..h as isize {
        for x in 0..w as isize {
            let p = |dx: isize, dy: isize| src.get_clamped(x + dx, y + dy) as i32;

            let gx = (p(1, -1) + 2 * p(1, 0) + p(1, 1)) - (p(-1, -1) + 2 * p(-1, 0) + p(-1, 1));
            let gy = (p(-1, 1) + 2 * p(0, 1) + p(1, 1)) - (p(-1, -1) + 2 * p(0, -1) + p(1, -1));

            let sq = (gx * gx + gy * gy) as f32;
            magnitude.push(sq.sqrt());
            direction.push(Direction::quantize(gx, gy));
        }
    }

    Gradient {
        magnitude: Plane::from_vec(w, h, magnitude),
        direction: Plane::from_vec(w, h, direction),
    }
}
