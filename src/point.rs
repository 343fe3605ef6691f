//! N-dimensional point value type and the elementwise arithmetic the rest
//! of the fitter is built on.
//!
//! Vector arithmetic (copy, add, subtract, scale, fused multiply-add, dot
//! product, length, normalization, epsilon-equality) operating on flat
//! `dims`-length double arrays. [`PointN`] is an owned, `Clone`-cheap
//! value type with inline storage for the common low-dimension case and
//! transparent heap spill for larger ones.

use smallvec::SmallVec;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// An n-dimensional point (or vector) of `f64` coordinates.
///
/// Stored inline up to 8 dimensions; higher-dimensional inputs spill to
/// the heap automatically via `SmallVec`.
#[derive(Clone, Debug, PartialEq)]
pub struct PointN(SmallVec<[f64; 8]>);

impl PointN {
    /// A point with all coordinates set to zero.
    pub fn zeros(dims: usize) -> Self {
        PointN(SmallVec::from_elem(0.0, dims))
    }

    /// Build a point from a coordinate slice.
    pub fn from_slice(coords: &[f64]) -> Self {
        PointN(SmallVec::from_slice(coords))
    }

    pub fn dims(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.0
    }

    /// Dot product. Panics (via the length mismatch asserted by the
    /// underlying iterator zip) if `self.dims() != other.dims()`.
    pub fn dot(&self, other: &PointN) -> f64 {
        debug_assert_eq!(self.dims(), other.dims());
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_squared(&self, other: &PointN) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    pub fn distance(&self, other: &PointN) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// `normalize(a - b)`: the unit vector pointing from `other` to
    /// `self`. Returns a zero vector if the two points coincide (within
    /// floating point noise), rather than producing NaNs.
    pub fn normalized_difference(&self, other: &PointN) -> PointN {
        let diff = self - other;
        let len = diff.length();
        if len > f64::EPSILON {
            diff * (1.0 / len)
        } else {
            PointN::zeros(self.dims())
        }
    }

    pub fn normalized(&self) -> PointN {
        let len = self.length();
        if len > f64::EPSILON {
            self * (1.0 / len)
        } else {
            self.clone()
        }
    }

    /// `self += other * scale`, in place.
    pub fn scaled_add_assign(&mut self, other: &PointN, scale: f64) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += b * scale;
        }
    }

    /// `a - b * scale`.
    pub fn sub_scaled(a: &PointN, b: &PointN, scale: f64) -> PointN {
        let mut out = a.clone();
        out.scaled_add_assign(b, -scale);
        out
    }

    /// `a + b * scale`.
    pub fn add_scaled(a: &PointN, b: &PointN, scale: f64) -> PointN {
        let mut out = a.clone();
        out.scaled_add_assign(b, scale);
        out
    }

    /// Reflects `self` across `anchor`: `2*anchor - self`.
    pub fn mirror_about(&self, anchor: &PointN) -> PointN {
        PointN::sub_scaled(&(anchor * 2.0), self, 1.0)
    }

    /// Equality within `epsilon` per the Euclidean distance between the
    /// two points.
    pub fn approx_eq(&self, other: &PointN, epsilon: f64) -> bool {
        self.distance_squared(other) <= epsilon * epsilon
    }
}

impl Index<usize> for PointN {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl IndexMut<usize> for PointN {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

impl Add for &PointN {
    type Output = PointN;
    fn add(self, rhs: &PointN) -> PointN {
        PointN(
            self.0
                .iter()
                .zip(rhs.0.iter())
                .map(|(a, b)| a + b)
                .collect(),
        )
    }
}

impl Sub for &PointN {
    type Output = PointN;
    fn sub(self, rhs: &PointN) -> PointN {
        PointN(
            self.0
                .iter()
                .zip(rhs.0.iter())
                .map(|(a, b)| a - b)
                .collect(),
        )
    }
}

impl Mul<f64> for &PointN {
    type Output = PointN;
    fn mul(self, rhs: f64) -> PointN {
        PointN(self.0.iter().map(|a| a * rhs).collect())
    }
}

impl Mul<f64> for PointN {
    type Output = PointN;
    fn mul(self, rhs: f64) -> PointN {
        &self * rhs
    }
}
