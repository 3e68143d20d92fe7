//! Two-threshold edge tracing
//!
//! Surviving pixels with magnitude `>= high` seed the edge set. Surviving
//! pixels with magnitude `>= low` join it when they touch (8-connectivity)
//! a pixel already in the set. Propagation runs until nothing more can be
//! added; the resulting set is the same whatever order the stack visits
//! pixels in.

use crate::config::EdgeThresholds;

use super::{Plane, BACKGROUND, EDGE};

const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Build the binary mask from thinned magnitudes.
pub fn trace(thinned: &Plane<f32>, thresholds: EdgeThresholds) -> Plane<u8> {
    let (w, h) = (thinned.width(), thinned.height());
    let low = thresholds.low() as f32;
    let high = thresholds.high() as f32;

    // Suppressed pixels are 0.0 and never qualify, whatever the thresholds.
    let candidate = |m: f32| m > 0.0 && m >= low;

    let mut mask = vec![BACKGROUND; w * h];
    let mut stack = Vec::new();

    for (i, &m) in thinned.data().iter().enumerate() {
        if m > 0.0 && m >= high {
            mask[i] = EDGE;
            stack.push(i);
        }
    }

    while let Some(i) = stack.pop() {
        let (x, y) = ((i % w) as isize, (i / w) as isize);
        for (dx, dy) in NEIGHBORS_8 {
            let (nx, ny) = (x + dx, y + dy);
            let Some(m) = thinned.get_checked(nx, ny) else {
                continue;
            };
            let j = ny as usize * w + nx as usize;
            if mask[j] == BACKGROUND && candidate(m) {
                mask[j] = EDGE;
                stack.push(j);
            }
        }
    }

    Plane::from_vec(w, h, mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds(low: u8, high: u8) -> EdgeThresholds {
        EdgeThresholds::new(low, high).unwrap()
    }

    #[test]
    fn test_strong_pixels_are_edges() {
        let p = Plane::from_vec(3, 1, vec![200.0, 0.0, 10.0]);
        assert_eq!(trace(&p, thresholds(50, 150)).data(), &[EDGE, 0, 0]);
    }

    #[test]
    fn test_weak_chain_promoted_from_strong() {
        let p = Plane::from_vec(5, 1, vec![160.0, 60.0, 60.0, 60.0, 0.0]);
        assert_eq!(
            trace(&p, thresholds(50, 150)).data(),
            &[EDGE, EDGE, EDGE, EDGE, 0]
        );
    }

    #[test]
    fn test_isolated_weak_chain_dropped() {
        let p = Plane::from_vec(5, 1, vec![60.0, 60.0, 0.0, 40.0, 160.0]);
        assert_eq!(trace(&p, thresholds(50, 150)).data(), &[0, 0, 0, 0, EDGE]);
    }

    #[test]
    fn test_diagonal_connectivity() {
        let p = Plane::from_vec(
            3,
            3,
            vec![
                200.0, 0.0, 0.0, //
                0.0, 80.0, 0.0, //
                0.0, 0.0, 80.0,
            ],
        );
        let mask = trace(&p, thresholds(50, 150));
        assert_eq!(mask.get(1, 1), EDGE);
        assert_eq!(mask.get(2, 2), EDGE);
    }

    #[test]
    fn test_equal_thresholds() {
        let p = Plane::from_vec(3, 1, vec![100.0, 99.0, 100.0]);
        assert_eq!(trace(&p, thresholds(100, 100)).data(), &[EDGE, 0, EDGE]);
    }
}
