//! Worst-case deviation measurement between a run of sample points and a
//! candidate cubic fit to them.

use crate::cubic::Cubic;
use crate::point::PointN;

/// Result of scanning a run against a candidate cubic.
pub struct Deviation {
    /// Largest squared distance found between a sample and the curve.
    pub max_sq_error: f64,
    /// Index (within the run) of the sample that produced it. Always in
    /// `[1, run.len() - 2]`, so it is always a valid interior split
    /// point: splitting there can never produce a zero-length half.
    pub worst_index: usize,
}

/// Scan the *interior* samples of `run` (indices `1..=n-2`) against
/// `curve` evaluated at the matching parameter in `u`, tracking the
/// worst squared deviation and the index it occurred at.
///
/// Interior-only scanning is deliberate, not an oversight: the
/// recursion's split point is always drawn from this result, and a
/// split must land strictly inside the run for both halves to be
/// non-degenerate. Endpoint deviation is definitionally ~0 since
/// `curve.p0 == run[0]` and `curve.p3 == run[n-1]` exactly, so excluding
/// them from the max-search does not understate the true worst error in
/// practice.
pub fn max_deviation(run: &[PointN], u: &[f64], curve: &Cubic) -> Deviation {
    let n = run.len();
    debug_assert_eq!(run.len(), u.len());
    debug_assert!(n >= 3, "interior scan requires at least 3 points");

    let mut max_sq_error = 0.0_f64;
    let mut worst_index = 1;

    for i in 1..=n - 2 {
        let q = curve.evaluate(u[i]);
        let sq = run[i].distance_squared(&q);
        if sq > max_sq_error {
            max_sq_error = sq;
            worst_index = i;
        }
    }

    Deviation {
        max_sq_error,
        worst_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameterization::{chord_length_parameterize, LengthCache};
    use crate::solver::fit_candidate;
    use crate::config::FitConfig;

    fn p(coords: &[f64]) -> PointN {
        PointN::from_slice(coords)
    }

    #[test]
    fn perfect_line_fit_has_near_zero_error() {
        let run = vec![p(&[0.0]), p(&[1.0]), p(&[2.0]), p(&[3.0])];
        let mut cache = LengthCache::new();
        let u = chord_length_parameterize(&run, &mut cache).unwrap();
        let t_l = p(&[1.0]);
        let t_r = p(&[-1.0]);
        let cfg = FitConfig::default();
        let curve = fit_candidate(&run, &u, &t_l, &t_r, 3, &cfg);

        let dev = max_deviation(&run, &u, &curve);
        assert!(dev.max_sq_error < 1e-20);
    }

    #[test]
    fn worst_index_is_always_interior() {
        let run = vec![p(&[0.0, 0.0]), p(&[1.0, 5.0]), p(&[2.0, -5.0]), p(&[3.0, 0.0])];
        let mut cache = LengthCache::new();
        let u = chord_length_parameterize(&run, &mut cache).unwrap();
        let t_l = p(&[1.0, 0.0]);
        let t_r = p(&[-1.0, 0.0]);
        let cfg = FitConfig::default();
        let curve = fit_candidate(&run, &u, &t_l, &t_r, 3, &cfg);

        let dev = max_deviation(&run, &u, &curve);
        assert!(dev.worst_index >= 1 && dev.worst_index <= run.len() - 2);
    }
}
