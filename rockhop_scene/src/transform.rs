// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2D affine transform used for node-local and cached global frames.

use core::ops::Mul;

use kurbo::{Affine, Point, Vec2};

use crate::error::SceneError;

/// Determinants with a magnitude below this are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// A 2D affine transform with value semantics.
///
/// The six coefficients `[a, b, c, d, e, f]` describe the matrix
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
///
/// which is the same layout [`kurbo::Affine`] uses, so conversions are free.
///
/// Composition is associative but not commutative. `current.concatenate(delta)`
/// applies `delta` first, in the space that `current` maps from; this is how a
/// node appends a translate/rotate/scale in its own pre-transformed frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform(Affine);

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The no-op transform.
    pub const IDENTITY: Self = Self(Affine::IDENTITY);

    /// Returns [`Transform::IDENTITY`].
    #[inline]
    #[must_use]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Creates a transform from the six coefficients `[a, b, c, d, e, f]`.
    #[inline]
    #[must_use]
    pub fn new(coeffs: [f64; 6]) -> Self {
        Self(Affine::new(coeffs))
    }

    /// A pure translation by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn translate(dx: f64, dy: f64) -> Self {
        Self(Affine::translate(Vec2::new(dx, dy)))
    }

    /// A rotation by `theta` radians about the point `(cx, cy)`.
    ///
    /// Positive angles rotate from the +x axis toward the +y axis, which is
    /// clockwise on a y-down canvas.
    #[must_use]
    pub fn rotate_about(theta: f64, cx: f64, cy: f64) -> Self {
        let center = Vec2::new(cx, cy);
        Self(Affine::translate(center) * Affine::rotate(theta) * Affine::translate(-center))
    }

    /// A non-uniform scale about the origin.
    #[inline]
    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self(Affine::scale_non_uniform(sx, sy))
    }

    /// Returns the coefficients `[a, b, c, d, e, f]`.
    #[inline]
    #[must_use]
    pub fn coeffs(self) -> [f64; 6] {
        self.0.as_coeffs()
    }

    /// Returns the underlying Kurbo affine.
    #[inline]
    #[must_use]
    pub const fn as_affine(self) -> Affine {
        self.0
    }

    /// Returns the determinant of the linear part.
    #[inline]
    #[must_use]
    pub fn determinant(self) -> f64 {
        self.0.determinant()
    }

    /// Matrix product `self * other`.
    #[inline]
    #[must_use]
    pub fn concatenate(self, other: Self) -> Self {
        Self(self.0 * other.0)
    }

    /// Returns the inverse transform.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::SingularTransform`] when the determinant is within
    /// [`SINGULAR_EPSILON`] of zero or is not finite.
    pub fn invert(self) -> Result<Self, SceneError> {
        let determinant = self.determinant();
        if !determinant.is_finite()
            || (-SINGULAR_EPSILON < determinant && determinant < SINGULAR_EPSILON)
        {
            return Err(SceneError::SingularTransform { determinant });
        }
        Ok(Self(self.0.inverse()))
    }

    /// Maps a point through this transform.
    #[inline]
    #[must_use]
    pub fn map_point(self, point: Point) -> Point {
        self.0 * point
    }

    /// Returns true when every coefficient is within `epsilon` of `other`'s.
    #[must_use]
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        self.coeffs()
            .iter()
            .zip(other.coeffs().iter())
            .all(|(a, b)| {
                let d = a - b;
                -epsilon <= d && d <= epsilon
            })
    }
}

impl From<Affine> for Transform {
    fn from(affine: Affine) -> Self {
        Self(affine)
    }
}

impl From<Transform> for Affine {
    fn from(transform: Transform) -> Self {
        transform.0
    }
}

impl Mul for Transform {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.concatenate(rhs)
    }
}

impl Mul<Point> for Transform {
    type Output = Point;

    #[inline]
    fn mul(self, rhs: Point) -> Point {
        self.map_point(rhs)
    }
}
