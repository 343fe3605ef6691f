//! Top-level entry point: validates caller input, walks the corners array
//! into independent runs, invokes the recursor per run, and flattens the
//! resulting cubics into the knot-triple output layout.

use crate::config::FitConfig;
use crate::cubic::Cubic;
use crate::error::{FitError, FitResult};
use crate::parameterization::LengthCache;
use crate::point::PointN;
use crate::recursor::fit_recursive;

/// One output knot: the left handle, anchor, and right handle of a point
/// on the fitted curve. Two adjacent knots plus the anchor's outgoing
/// right handle and the next anchor's left handle together define one
/// cubic Bezier segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Knot {
    pub left_handle: PointN,
    pub anchor: PointN,
    pub right_handle: PointN,
}

/// The full result of a [`fit_curve`] call.
pub struct FitOutput {
    /// One knot per fitted segment boundary; `knots.len() == seg_count + 1`.
    pub knots: Vec<Knot>,
    /// Per-knot index into the original `points` slice.
    pub orig_index: Vec<usize>,
    /// Cumulative segment count at each caller-supplied corner, present
    /// only when the caller passed an explicit `corners` slice (not the
    /// default-derived `{0, points_len-1}`).
    pub corner_segment_map: Option<Vec<usize>>,
}

/// Fit a sequence of cubic Bezier segments to `points` within
/// `error_threshold` (Euclidean distance in the input's coordinate
/// space), optionally breaking at the supplied `corners`.
///
/// `points` is row-major: `points.len()` points, each of the same
/// dimensionality. `corners`, when given, must be strictly increasing
/// indices within `[0, points.len() - 1]` with at least two entries; when
/// omitted it defaults to `{0, points.len() - 1}` (no corner breaks).
pub fn fit_curve(
    points: &[PointN],
    error_threshold: f64,
    corners: Option<&[usize]>,
    cfg: &FitConfig,
) -> FitResult<FitOutput> {
    log::debug!(
        "fit_curve: {} points, corners={}, error_threshold={error_threshold:e}",
        points.len(),
        corners.map_or(2, <[usize]>::len)
    );

    if points.is_empty() {
        return Err(FitError::EmptyInput);
    }
    let dims = points[0].dims();
    if dims == 0 {
        return Err(FitError::ZeroDimensions { dims });
    }
    for (index, point) in points.iter().enumerate().skip(1) {
        if point.dims() != dims {
            return Err(FitError::MisshapenInput {
                index,
                actual_dims: point.dims(),
                expected_dims: dims,
            });
        }
    }

    if points.len() == 1 {
        let cubic = Cubic::degenerate(points[0].clone());
        let knots = flatten(&[cubic]);
        return Ok(FitOutput {
            knots,
            orig_index: vec![0, 0],
            corner_segment_map: None,
        });
    }

    let caller_supplied_corners = corners.is_some();
    let owned_default;
    let corners = match corners {
        Some(c) => {
            validate_corners(c, points.len())?;
            c
        }
        None => {
            owned_default = [0usize, points.len() - 1];
            &owned_default[..]
        }
    };

    let mut cache = LengthCache::new();
    let mut cubics: Vec<Cubic> = Vec::new();
    let mut corner_segment_map = caller_supplied_corners.then(|| vec![0usize; corners.len()]);

    for i in 1..corners.len() {
        let start = corners[i - 1];
        let end = corners[i];
        let run = &points[start..=end];

        let t_l = run[1].normalized_difference(&run[0]);
        let t_r = run[run.len() - 2].normalized_difference(&run[run.len() - 1]);

        fit_recursive(run, &t_l, &t_r, error_threshold, &mut cache, cfg, &mut cubics);

        if let Some(map) = corner_segment_map.as_mut() {
            map[i] = cubics.len();
        }
    }

    let knots = flatten(&cubics);
    let orig_index = build_orig_index(&cubics, corners[0]);

    Ok(FitOutput {
        knots,
        orig_index,
        corner_segment_map,
    })
}

fn validate_corners(corners: &[usize], points_len: usize) -> FitResult<()> {
    if corners.len() < 2 {
        return Err(FitError::TooFewCorners { len: corners.len() });
    }
    for (i, &value) in corners.iter().enumerate() {
        if value >= points_len {
            return Err(FitError::CornerOutOfRange {
                index: i,
                value,
                points_len,
            });
        }
        if i > 0 && value <= corners[i - 1] {
            return Err(FitError::NonMonotonicCorners {
                index: i,
                value,
                previous: corners[i - 1],
            });
        }
    }
    Ok(())
}

/// Walk a cubic list in geometric order forward, accumulating each
/// segment's `orig_span` into a running original-sample index. This
/// produces the same per-knot mapping as the reference's backward walk
/// from the list's tail, since both ultimately distribute the total span
/// `last_corner - first_corner` across the same ordered `orig_span`
/// sequence; the forward accumulation is just simpler to express without
/// a reversible list structure to walk.
fn build_orig_index(cubics: &[Cubic], first_index: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(cubics.len() + 1);
    let mut running = first_index;
    out.push(running);
    for c in cubics {
        running += c.orig_span;
        out.push(running);
    }
    out
}

/// Flatten cubics in geometric order into knot triples per the mirror
/// rule at the first and last knot.
fn flatten(cubics: &[Cubic]) -> Vec<Knot> {
    debug_assert!(!cubics.is_empty());
    let k = cubics.len();
    let mut knots = Vec::with_capacity(k + 1);

    let first = &cubics[0];
    knots.push(Knot {
        left_handle: first.p1.mirror_about(&first.p0),
        anchor: first.p0.clone(),
        right_handle: first.p1.clone(),
    });

    for i in 1..k {
        let prev = &cubics[i - 1];
        let cur = &cubics[i];
        knots.push(Knot {
            left_handle: prev.p2.clone(),
            anchor: cur.p0.clone(),
            right_handle: cur.p1.clone(),
        });
    }

    let last = &cubics[k - 1];
    knots.push(Knot {
        left_handle: last.p2.clone(),
        anchor: last.p3.clone(),
        right_handle: last.p2.mirror_about(&last.p3),
    });

    knots
}
