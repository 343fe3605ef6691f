//! Newton-Raphson refinement of a chord-length parameterization against a
//! fitted cubic.

use crate::cubic::Cubic;
use crate::point::PointN;

/// Attempt one Newton-Raphson step per sample, refining `u` against
/// `curve`.
///
/// `u[0]` and `u[n-1]` are left at `0.0`/`1.0` untouched — only interior
/// parameters move. Returns `None` (leaving the caller to keep the old
/// `u`) if any refined value is non-finite, or if the refined sequence
/// would violate the monotonic range `u'[0] >= 0` / `u'[n-1] <= 1` at the
/// boundary samples after sorting.
pub fn reparameterize(run: &[PointN], u: &[f64], curve: &Cubic) -> Option<Vec<f64>> {
    let n = run.len();
    debug_assert_eq!(run.len(), u.len());

    let mut refined = Vec::with_capacity(n);
    refined.push(0.0);

    for i in 1..n - 1 {
        let ui = u[i];
        let q = curve.evaluate(ui);
        let qd = curve.velocity(ui);
        let qdd = curve.acceleration(ui);

        let diff = &q - &run[i];
        let numerator = diff.dot(&qd);
        let denominator = qd.length_squared() + diff.dot(&qdd);

        let new_u = if denominator.abs() > f64::EPSILON {
            ui - numerator / denominator
        } else {
            ui
        };

        if !new_u.is_finite() {
            return None;
        }
        refined.push(new_u);
    }
    refined.push(1.0);

    refined.sort_by(|a, b| a.partial_cmp(b).expect("checked finite above"));
    if refined[0] < 0.0 || refined[n - 1] > 1.0 {
        return None;
    }

    Some(refined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FitConfig;
    use crate::parameterization::{chord_length_parameterize, LengthCache};
    use crate::solver::fit_candidate;

    fn p(coords: &[f64]) -> PointN {
        PointN::from_slice(coords)
    }

    #[test]
    fn perfect_line_reparameterization_is_a_fixed_point() {
        let run = vec![p(&[0.0]), p(&[1.0]), p(&[2.0]), p(&[3.0])];
        let mut cache = LengthCache::new();
        let u = chord_length_parameterize(&run, &mut cache).unwrap();
        let t_l = p(&[1.0]);
        let t_r = p(&[-1.0]);
        let cfg = FitConfig::default();
        let curve = fit_candidate(&run, &u, &t_l, &t_r, 3, &cfg);

        let refined = reparameterize(&run, &u, &curve).unwrap();
        for (a, b) in refined.iter().zip(u.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn endpoints_stay_pinned() {
        let run = vec![p(&[0.0, 0.0]), p(&[1.0, 1.0]), p(&[2.0, -1.0]), p(&[3.0, 0.0])];
        let mut cache = LengthCache::new();
        let u = chord_length_parameterize(&run, &mut cache).unwrap();
        let t_l = p(&[1.0, 0.0]);
        let t_r = p(&[-1.0, 0.0]);
        let cfg = FitConfig::default();
        let curve = fit_candidate(&run, &u, &t_l, &t_r, 3, &cfg);

        let refined = reparameterize(&run, &u, &curve).unwrap();
        assert_eq!(refined[0], 0.0);
        assert_eq!(*refined.last().unwrap(), 1.0);
    }
}
