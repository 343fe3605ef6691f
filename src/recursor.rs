//! Per-run fit-or-split recursion: the algorithmic core that ties the
//! parameterizer, solver, error evaluator, and reparameterizer together.

use crate::config::FitConfig;
use crate::cubic::Cubic;
use crate::deviation::max_deviation;
use crate::parameterization::{chord_length_parameterize, LengthCache};
use crate::point::PointN;
use crate::reparam::reparameterize;
use crate::solver::fit_candidate;

/// Fit `run` (sharing endpoints with its neighbors, per the corners
/// contract) with given endpoint tangents, appending one or more
/// [`Cubic`] segments to `out` in left-to-right order.
///
/// `error_threshold` is the caller's Euclidean tolerance; it is squared
/// once here rather than at every leaf comparison.
pub fn fit_recursive(
    run: &[PointN],
    t_l: &PointN,
    t_r: &PointN,
    error_threshold: f64,
    cache: &mut LengthCache,
    cfg: &FitConfig,
    out: &mut Vec<Cubic>,
) {
    let n = run.len();
    debug_assert!(n >= 2);

    if n == 2 {
        let alpha = run[0].distance(&run[1]) / 3.0;
        let mut p1 = run[0].clone();
        p1.scaled_add_assign(t_l, alpha);
        let mut p2 = run[1].clone();
        p2.scaled_add_assign(t_r, alpha);
        out.push(Cubic::new(run[0].clone(), p1, p2, run[1].clone(), 1));
        return;
    }

    let eps_sq = error_threshold * error_threshold;

    let Some(mut u) = chord_length_parameterize(run, cache) else {
        // All points coincide: nothing to fit but a degenerate span. Unlike
        // the driver's true single-point case, this run still spans
        // `n - 1` original samples and must keep its own endpoints (which
        // happen to coincide), not collapse to run[0] on both sides.
        out.push(Cubic::new(
            run[0].clone(),
            run[0].clone(),
            run[0].clone(),
            run[n - 1].clone(),
            n - 1,
        ));
        return;
    };

    let mut cubic = fit_candidate(run, &u, t_l, t_r, n - 1, cfg);
    let mut dev = max_deviation(run, &u, &cubic);

    if dev.max_sq_error < eps_sq {
        out.push(cubic);
        return;
    }

    for _ in 0..cfg.max_reparam_iterations {
        let Some(u_prime) = reparameterize(run, &u, &cubic) else {
            log::warn!(
                "Newton-Raphson reparameterization diverged on a run of {n} points; keeping the prior fit"
            );
            break;
        };
        let refit = fit_candidate(run, &u_prime, t_l, t_r, n - 1, cfg);
        let refit_dev = max_deviation(run, &u_prime, &refit);
        if refit_dev.max_sq_error < eps_sq {
            out.push(refit);
            return;
        }
        cubic = refit;
        dev = refit_dev;
        u = u_prime;
    }

    let mut split_idx = dev.worst_index;
    if run[split_idx - 1].approx_eq(&run[split_idx + 1], cfg.point_equality_epsilon)
        && split_idx < n - 2
    {
        log::trace!("split index {split_idx} sits on a duplicated neighbor pair; advancing");
        split_idx += 1;
    }

    let t_center = run[split_idx + 1].normalized_difference(&run[split_idx - 1]);

    log::trace!(
        "splitting run of {n} points at index {split_idx} (error {:.3e} over threshold {error_threshold:.3e})",
        dev.max_sq_error.sqrt()
    );

    let t_center_neg = (&t_center) * -1.0;
    fit_recursive(
        &run[..=split_idx],
        t_l,
        &t_center_neg,
        error_threshold,
        cache,
        cfg,
        out,
    );
    fit_recursive(
        &run[split_idx..],
        &t_center,
        t_r,
        error_threshold,
        cache,
        cfg,
        out,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(coords: &[f64]) -> PointN {
        PointN::from_slice(coords)
    }

    #[test]
    fn two_point_run_uses_linear_handles() {
        let run = vec![p(&[0.0, 0.0]), p(&[3.0, 0.0])];
        let t_l = p(&[1.0, 0.0]);
        let t_r = p(&[-1.0, 0.0]);
        let mut cache = LengthCache::new();
        let cfg = FitConfig::default();
        let mut out = Vec::new();
        fit_recursive(&run, &t_l, &t_r, 0.01, &mut cache, &cfg, &mut out);

        assert_eq!(out.len(), 1);
        assert!((out[0].p1.as_slice()[0] - 1.0).abs() < 1e-9);
        assert!((out[0].p2.as_slice()[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn all_coincident_run_keeps_its_own_endpoints_and_full_span() {
        // A run of more than two points whose chord length is numerically
        // zero (degenerate in the same way as a single-point input, but
        // covering several original samples). Both endpoints must stay
        // `run[0]`/`run[n-1]` (coincident here, but still the run's own
        // endpoints, not collapsed to run[0] on both sides), and the span
        // must account for all n-1 sample intervals so the driver's
        // orig_index doesn't under-count.
        let run = vec![
            p(&[5.0, 5.0]),
            p(&[5.0, 5.0]),
            p(&[5.0, 5.0]),
            p(&[5.0, 5.0]),
        ];
        let t_l = p(&[0.0, 0.0]);
        let t_r = p(&[0.0, 0.0]);
        let mut cache = LengthCache::new();
        let cfg = FitConfig::default();
        let mut out = Vec::new();
        fit_recursive(&run, &t_l, &t_r, 1e-6, &mut cache, &cfg, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].p0, run[0]);
        assert_eq!(out[0].p3, run[run.len() - 1]);
        assert_eq!(out[0].orig_span, run.len() - 1);
    }

    #[test]
    fn straight_line_fits_in_one_segment() {
        let run: Vec<PointN> = (0..20).map(|i| p(&[i as f64, 0.0])).collect();
        let t_l = p(&[1.0, 0.0]);
        let t_r = p(&[-1.0, 0.0]);
        let mut cache = LengthCache::new();
        let cfg = FitConfig::default();
        let mut out = Vec::new();
        fit_recursive(&run, &t_l, &t_r, 1e-6, &mut cache, &cfg, &mut out);

        assert_eq!(out.len(), 1);
    }

    #[test]
    fn sharp_zigzag_splits_into_multiple_segments() {
        let mut run = Vec::new();
        for i in 0..12 {
            let x = i as f64;
            let y = if i % 2 == 0 { 0.0 } else { 5.0 };
            run.push(p(&[x, y]));
        }
        let t_l = run[1].normalized_difference(&run[0]);
        let t_r = run[run.len() - 2].normalized_difference(&run[run.len() - 1]);
        let mut cache = LengthCache::new();
        let cfg = FitConfig::default();
        let mut out = Vec::new();
        fit_recursive(&run, &t_l, &t_r, 0.1, &mut cache, &cfg, &mut out);

        assert!(out.len() > 1);
        // Adjacent segments must share the split point exactly (C0 by identity).
        for pair in out.windows(2) {
            assert_eq!(pair[0].p3, pair[1].p0);
        }
    }

    #[test]
    fn duplicated_split_guard_advances_index() {
        // Zig-zag where points at split_idx-1 and split_idx+1 coincide.
        let run = vec![
            p(&[0.0, 0.0]),
            p(&[1.0, 0.0]),
            p(&[1.0, 0.0]),
            p(&[2.0, 5.0]),
            p(&[1.0, 0.0]),
            p(&[3.0, 0.0]),
        ];
        let t_l = p(&[1.0, 0.0]);
        let t_r = p(&[-1.0, 0.0]);
        let mut cache = LengthCache::new();
        let cfg = FitConfig::default();
        let mut out = Vec::new();
        // Should not panic on a zero-length tangent from the degenerate pair.
        fit_recursive(&run, &t_l, &t_r, 0.01, &mut cache, &cfg, &mut out);
        assert!(!out.is_empty());
    }
}
