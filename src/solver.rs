//! Least-squares solve for the two tangent-magnitude scalars (`alpha_l`,
//! `alpha_r`) that fix a cubic's handles given its endpoints, endpoint
//! tangent directions, and a parameterization of the sample points —
//! plus the weighted-centroid handle clamp that keeps runaway handles
//! from escaping the data.

use crate::config::FitConfig;
use crate::cubic::Cubic;
use crate::point::PointN;

fn b1(u: f64) -> f64 {
    let s = 1.0 - u;
    3.0 * u * s * s
}

fn b2(u: f64) -> f64 {
    let s = 1.0 - u;
    3.0 * u * u * s
}

/// `B0(u) + B1(u) = (1-u)^2 (1 + 2u)`
fn b0_plus_b1(u: f64) -> f64 {
    let s = 1.0 - u;
    s * s * (1.0 + 2.0 * u)
}

/// `B2(u) + B3(u) = u^2 (3 - 2u)`
fn b2_plus_b3(u: f64) -> f64 {
    u * u * (3.0 - 2.0 * u)
}

/// Fit a single candidate cubic to `run` given fixed endpoint tangents
/// `t_l`/`t_r` and a parameterization `u` of the same length as `run`.
///
/// `orig_span` is threaded straight through onto the returned [`Cubic`];
/// it plays no role in the fit itself.
pub fn fit_candidate(
    run: &[PointN],
    u: &[f64],
    t_l: &PointN,
    t_r: &PointN,
    orig_span: usize,
    cfg: &FitConfig,
) -> Cubic {
    debug_assert_eq!(run.len(), u.len());
    let n = run.len();
    let p0 = run[0].clone();
    let p3 = run[n - 1].clone();

    let mut c00 = 0.0;
    let mut c01 = 0.0;
    let mut c11 = 0.0;
    let mut x0 = 0.0;
    let mut x1 = 0.0;

    for i in 0..n {
        let ui = u[i];
        let a0 = t_l * b1(ui);
        let a1 = t_r * b2(ui);

        // tmp_i = P_i - P0*(B0+B1)(u_i) - P3*(B2+B3)(u_i)
        let mut tmp = run[i].clone();
        tmp.scaled_add_assign(&p0, -b0_plus_b1(ui));
        tmp.scaled_add_assign(&p3, -b2_plus_b3(ui));

        c00 += a0.dot(&a0);
        c01 += a0.dot(&a1);
        c11 += a1.dot(&a1);
        x0 += a0.dot(&tmp);
        x1 += a1.dot(&tmp);
    }

    let chord = p0.distance(&p3) / 3.0;
    let (alpha_l, alpha_r) = solve_alphas(c00, c01, c11, x0, x1, chord, cfg);

    let mut p1 = p0.clone();
    p1.scaled_add_assign(t_l, alpha_l);
    let mut p2 = p3.clone();
    p2.scaled_add_assign(t_r, alpha_r);

    let center = weighted_centroid(run);
    let r_max = clamp_radius(run, &center, cfg.clamp_scale);
    clamp_handles(&p0, &p3, t_l, t_r, &mut p1, &mut p2, &center, r_max, chord);

    Cubic::new(p0, p1, p2, p3, orig_span)
}

/// Solve the 2x2 symmetric normal-equation system by Cramer's rule, with
/// a near-singular nudge and a NaN/negative-alpha fallback to the
/// Wu/Barsky heuristic `alpha = |P3-P0|/3`.
fn solve_alphas(
    c00: f64,
    c01: f64,
    c11: f64,
    x0: f64,
    x1: f64,
    fallback_chord_third: f64,
    cfg: &FitConfig,
) -> (f64, f64) {
    let mut det_c = c00 * c11 - c01 * c01;
    if det_c.abs() < cfg.determinant_zero_epsilon {
        log::warn!("normal-equation matrix is near-singular (det={det_c:e}); nudging");
        det_c = c00 * c11 * cfg.determinant_nudge_factor;
    }

    let det_l = x0 * c11 - x1 * c01;
    let det_r = c00 * x1 - c01 * x0;

    let alpha_l = det_l / det_c;
    let alpha_r = det_r / det_c;

    // `!(alpha >= 0)` catches both negative values and NaN.
    if !(alpha_l >= 0.0) || !(alpha_r >= 0.0) {
        log::warn!("least-squares alpha invalid (alpha_l={alpha_l}, alpha_r={alpha_r}); falling back to chord heuristic");
        (fallback_chord_third, fallback_chord_third)
    } else {
        (alpha_l, alpha_r)
    }
}

/// Weighted centroid of `run`, weighting each point by the sum of its
/// incident chord lengths. The run is treated as a *cycle* for this
/// weighting only — the last point's "next" neighbor wraps to the
/// first — even though the curve itself is open. This preserves the
/// reference algorithm's handle-clamp behavior exactly; see DESIGN.md.
fn weighted_centroid(run: &[PointN]) -> PointN {
    let n = run.len();
    let dims = run[0].dims();
    if n == 1 {
        return run[0].clone();
    }

    let mut weights = vec![0.0; n];
    for i in 0..n {
        let next = (i + 1) % n;
        let d = run[i].distance(&run[next]);
        weights[i] += d;
        weights[next] += d;
    }

    let mut center = PointN::zeros(dims);
    let mut total_weight = 0.0;
    for i in 0..n {
        center.scaled_add_assign(&run[i], weights[i]);
        total_weight += weights[i];
    }

    if total_weight > f64::EPSILON {
        center * (1.0 / total_weight)
    } else {
        run[0].clone()
    }
}

/// `r_max = clamp_scale * max_i |P_i - center|`.
fn clamp_radius(run: &[PointN], center: &PointN, clamp_scale: f64) -> f64 {
    let max_dist = run
        .iter()
        .map(|p| p.distance(center))
        .fold(0.0_f64, f64::max);
    clamp_scale * max_dist
}

#[allow(clippy::too_many_arguments)]
fn clamp_handles(
    p0: &PointN,
    p3: &PointN,
    t_l: &PointN,
    t_r: &PointN,
    p1: &mut PointN,
    p2: &mut PointN,
    center: &PointN,
    r_max: f64,
    fallback_chord_third: f64,
) {
    let outside = |p: &PointN| p.distance(center) > r_max;
    if !outside(p1) && !outside(p2) {
        return;
    }

    log::warn!("fitted handle escaped the {r_max:.3e}-radius clamp sphere; retrying with chord heuristic");
    let mut retry_p1 = p0.clone();
    retry_p1.scaled_add_assign(t_l, fallback_chord_third);
    let mut retry_p2 = p3.clone();
    retry_p2.scaled_add_assign(t_r, fallback_chord_third);

    if !outside(&retry_p1) && !outside(&retry_p2) {
        *p1 = retry_p1;
        *p2 = retry_p2;
        return;
    }

    log::warn!("chord-heuristic handles still escape the clamp sphere; projecting radially");
    if outside(&retry_p1) {
        *p1 = project_onto_sphere(&retry_p1, center, r_max);
    } else {
        *p1 = retry_p1;
    }
    if outside(&retry_p2) {
        *p2 = project_onto_sphere(&retry_p2, center, r_max);
    } else {
        *p2 = retry_p2;
    }
}

fn project_onto_sphere(p: &PointN, center: &PointN, r_max: f64) -> PointN {
    let d = p.distance(center);
    if d <= f64::EPSILON {
        return p.clone();
    }
    let mut out = center.clone();
    out.scaled_add_assign(&(p - center), r_max / d);
    out
}
