//! Chord-length parameterization of a point run, and the per-run chord
//! length cache the driver reuses across runs.

use crate::point::PointN;

/// Reusable scratch buffer of chord lengths between consecutive points in
/// a run, threaded through the driver so repeated fitting attempts on the
/// same run (and, with `ensure_capacity`, across runs) don't recompute
/// distances that have not changed.
///
/// Grows monotonically for the lifetime of a single top-level `fit_curve`
/// call; it is discarded along with every other intermediate buffer when
/// that call returns.
#[derive(Debug, Default)]
pub struct LengthCache {
    buf: Vec<f64>,
}

impl LengthCache {
    pub fn new() -> Self {
        LengthCache { buf: Vec::new() }
    }

    fn ensure_capacity(&mut self, n: usize) {
        if self.buf.len() < n {
            self.buf.resize(n, 0.0);
        }
    }

    /// Fills (and returns) the prefix `[0, run.len() - 1)` of the cache
    /// with the chord length between each consecutive pair of points in
    /// `run`. Reallocates only when `run` is longer than anything seen so
    /// far this invocation.
    pub fn chord_lengths(&mut self, run: &[PointN]) -> &[f64] {
        let n = run.len().saturating_sub(1);
        self.ensure_capacity(n);
        for i in 0..n {
            self.buf[i] = run[i].distance(&run[i + 1]);
        }
        &self.buf[..n]
    }
}

/// Chord-length parameterization: `u[0] = 0`, `u[n-1] = 1`, and every
/// interior `u[i]` is the cumulative chord length up to point `i`
/// normalized by the run's total length.
///
/// Returns `None` if the run's total chord length is numerically zero
/// (all points coincide) — callers must route that case around this
/// component rather than dividing by zero.
pub fn chord_length_parameterize(run: &[PointN], cache: &mut LengthCache) -> Option<Vec<f64>> {
    let n = run.len();
    debug_assert!(n >= 2);

    let lengths = cache.chord_lengths(run);
    let total: f64 = lengths.iter().sum();
    if total <= f64::EPSILON {
        return None;
    }

    let mut u = Vec::with_capacity(n);
    let mut acc = 0.0;
    u.push(0.0);
    for &len in lengths {
        acc += len;
        u.push(acc / total);
    }
    // Guard against floating-point drift so the last entry is exactly 1.0,
    // matching the invariant `u[n-1] = 1`.
    *u.last_mut().unwrap() = 1.0;
    Some(u)
}
