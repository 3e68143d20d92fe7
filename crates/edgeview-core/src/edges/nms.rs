//! Non-maximum suppression
//!
//! Thins gradient ridges to one pixel: a pixel keeps its magnitude only if
//! it is a peak along its own gradient direction. Neighbours outside the
//! frame count as zero.

use super::{Gradient, Plane};

/// Return magnitudes with every non-peak set to `0.0`.
pub fn suppress(grad: &Gradient) -> Plane<f32> {
    let mag = &grad.magnitude;
    let (w, h) = (mag.width(), mag.height());
    let mut out = Vec::with_capacity(w * h);

    for y in 0..h {
        for x in 0..w {
            let m = mag.get(x, y);
            let [(ax, ay), (bx, by)] = grad.direction.get(x, y).neighbors();
            let (xi, yi) = (x as isize, y as isize);
            let a = mag.get_checked(xi + ax, yi + ay).unwrap_or(0.0);
            let b = mag.get_checked(xi + bx, yi + by).unwrap_or(0.0);

            let peak = m > 0.0 && m > a && m >= b;
            out.push(if peak { m } else { 0.0 });
        }
    }

    Plane::from_vec(w, h, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::Direction;

    fn gradient(w: usize, h: usize, mag: Vec<f32>, dir: Direction) -> Gradient {
        Gradient {
            magnitude: Plane::from_vec(w, h, mag),
            direction: Plane::from_vec(w, h, vec![dir; w * h]),
        }
    }

    #[test]
    fn test_keeps_only_ridge() {
        let g = gradient(5, 1, vec![1.0, 3.0, 7.0, 3.0, 1.0], Direction::Horizontal);
        assert_eq!(suppress(&g).data(), &[0.0, 0.0, 7.0, 0.0, 0.0]);
    }

    #[test]
    fn test_plateau_keeps_one() {
        let g = gradient(4, 1, vec![1.0, 5.0, 5.0, 1.0], Direction::Horizontal);
        assert_eq!(suppress(&g).data(), &[0.0, 5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_direction_selects_neighbours() {
        // Column of strong values; a vertical gradient compares up/down,
        // so each pixel in the column ties with its neighbours.
        let mag = vec![
            0.0, 4.0, 0.0, //
            0.0, 4.0, 0.0, //
            0.0, 4.0, 0.0,
        ];
        let horizontal = suppress(&gradient(3, 3, mag.clone(), Direction::Horizontal));
        assert_eq!(horizontal.get(1, 1), 4.0);

        let vertical = suppress(&gradient(3, 3, mag, Direction::Vertical));
        assert_eq!(vertical.get(1, 1), 0.0);
        assert_eq!(vertical.get(1, 0), 4.0);
    }

    #[test]
    fn test_zero_never_survives() {
        let g = gradient(3, 1, vec![0.0; 3], Direction::Diagonal45);
        assert!(suppress(&g).data().iter().all(|&m| m == 0.0));
    }
}
