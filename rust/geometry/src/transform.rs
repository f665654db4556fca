// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transform matrices and models
//!
//! [`TransfoMatrix`] is the 3x4 affine matrix written into fitted coordinate
//! system definitions. [`TransfoModel`] is the general model a local
//! transform holds; only some models reduce to a matrix.

use nalgebra::{Matrix3x4, Matrix4, Point3};

use crate::error::{Error, Result};

/// Relative tolerance used for all cell comparisons
pub const EQ_EPSILON: f64 = 1.0e-12;

/// Compare two values with [`EQ_EPSILON`], scaled by magnitude above 1
#[inline]
pub fn eq_eps(a: f64, b: f64) -> bool {
    (a - b).abs() <= EQ_EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Check if a scale factor is 1 within [`EQ_EPSILON`]
#[inline]
pub fn eq_one_eps(value: f64) -> bool {
    eq_eps(value, 1.0)
}

/// 3x4 affine matrix: rotation/scale in the first three columns,
/// translation in the last
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransfoMatrix {
    m: Matrix3x4<f64>,
}

impl Default for TransfoMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransfoMatrix {
    pub const ROWS: usize = 3;
    pub const COLS: usize = 4;

    pub fn identity() -> Self {
        Self {
            m: Matrix3x4::identity(),
        }
    }

    /// Build from row-major cells
    pub fn from_rows(rows: [[f64; 4]; 3]) -> Self {
        let mut m = Matrix3x4::zeros();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                m[(r, c)] = *value;
            }
        }
        Self { m }
    }

    /// Axis-aligned scaling about the origin
    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        let mut matrix = Self::identity();
        matrix.m[(0, 0)] = sx;
        matrix.m[(1, 1)] = sy;
        matrix.m[(2, 2)] = sz;
        matrix
    }

    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        let mut matrix = Self::identity();
        matrix.m[(0, 3)] = tx;
        matrix.m[(1, 3)] = ty;
        matrix.m[(2, 3)] = tz;
        matrix
    }

    /// Get a cell; panics if out of range
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[(row, col)]
    }

    /// Set a cell; panics if out of range
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.m[(row, col)] = value;
    }

    #[inline]
    pub fn as_matrix(&self) -> &Matrix3x4<f64> {
        &self.m
    }

    pub fn is_identity(&self) -> bool {
        self.is_equivalent(&Self::identity())
    }

    /// Cell-wise comparison within [`EQ_EPSILON`]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| eq_eps(*a, *b))
    }

    /// Embed into a 4x4 homogeneous matrix
    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        let mut h = Matrix4::identity();
        for r in 0..Self::ROWS {
            for c in 0..Self::COLS {
                h[(r, c)] = self.m[(r, c)];
            }
        }
        h
    }

    /// Take the first three rows of a homogeneous matrix
    /// The caller is responsible for the last row being `[0, 0, 0, 1]`
    pub fn from_homogeneous(h: &Matrix4<f64>) -> Self {
        let mut m = Matrix3x4::zeros();
        for r in 0..Self::ROWS {
            for c in 0..Self::COLS {
                m[(r, c)] = h[(r, c)];
            }
        }
        Self { m }
    }

    pub fn try_inverse(&self) -> Option<Self> {
        self.to_homogeneous()
            .try_inverse()
            .map(|inverse| Self::from_homogeneous(&inverse))
    }

    /// Composition `self ∘ inner`: `inner` is applied first
    pub fn multiply(&self, inner: &Self) -> Self {
        Self::from_homogeneous(&(self.to_homogeneous() * inner.to_homogeneous()))
    }

    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let m = &self.m;
        Point3::new(
            m[(0, 0)] * point.x + m[(0, 1)] * point.y + m[(0, 2)] * point.z + m[(0, 3)],
            m[(1, 0)] * point.x + m[(1, 1)] * point.y + m[(1, 2)] * point.z + m[(1, 3)],
            m[(2, 0)] * point.x + m[(2, 1)] * point.y + m[(2, 2)] * point.z + m[(2, 3)],
        )
    }
}

/// Transform model held by a local transform
#[derive(Debug, Clone, PartialEq)]
pub enum TransfoModel {
    Identity,
    /// Affine model, always expressible as a [`TransfoMatrix`]
    Affine(TransfoMatrix),
    /// General projective model in homogeneous form
    Projective(Matrix4<f64>),
}

impl Default for TransfoModel {
    fn default() -> Self {
        TransfoModel::Identity
    }
}

impl TransfoModel {
    /// Create an affine model; fails for a singular matrix
    pub fn from_matrix(matrix: TransfoMatrix) -> Result<Self> {
        if matrix.is_identity() {
            return Ok(TransfoModel::Identity);
        }
        if matrix.try_inverse().is_none() {
            return Err(Error::SingularMatrix);
        }
        Ok(TransfoModel::Affine(matrix))
    }

    /// Create a projective model; fails for a singular matrix
    pub fn from_projective(h: Matrix4<f64>) -> Result<Self> {
        if h.try_inverse().is_none() {
            return Err(Error::SingularMatrix);
        }
        Ok(Self::from_homogeneous(h))
    }

    /// Axis-aligned scaling model
    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        let matrix = TransfoMatrix::scaling(sx, sy, sz);
        if matrix.is_identity() {
            TransfoModel::Identity
        } else {
            TransfoModel::Affine(matrix)
        }
    }

    /// Pick the simplest variant able to represent a homogeneous matrix
    fn from_homogeneous(h: Matrix4<f64>) -> Self {
        let affine = eq_eps(h[(3, 0)], 0.0)
            && eq_eps(h[(3, 1)], 0.0)
            && eq_eps(h[(3, 2)], 0.0)
            && eq_one_eps(h[(3, 3)]);

        if !affine {
            return TransfoModel::Projective(h);
        }

        let matrix = TransfoMatrix::from_homogeneous(&h);
        if matrix.is_identity() {
            TransfoModel::Identity
        } else {
            TransfoModel::Affine(matrix)
        }
    }

    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        match self {
            TransfoModel::Identity => Matrix4::identity(),
            TransfoModel::Affine(matrix) => matrix.to_homogeneous(),
            TransfoModel::Projective(h) => *h,
        }
    }

    pub fn is_identity(&self) -> bool {
        match self {
            TransfoModel::Identity => true,
            TransfoModel::Affine(matrix) => matrix.is_identity(),
            TransfoModel::Projective(h) => h
                .iter()
                .zip(Matrix4::<f64>::identity().iter())
                .all(|(a, b)| eq_eps(*a, *b)),
        }
    }

    /// Check if the model reduces to a 3x4 affine matrix
    pub fn is_convertible_to_matrix(&self) -> bool {
        match self {
            TransfoModel::Identity | TransfoModel::Affine(_) => true,
            TransfoModel::Projective(h) => !matches!(
                Self::from_homogeneous(*h),
                TransfoModel::Projective(_)
            ),
        }
    }

    pub fn convert_to_matrix(&self) -> Option<TransfoMatrix> {
        match self {
            TransfoModel::Identity => Some(TransfoMatrix::identity()),
            TransfoModel::Affine(matrix) => Some(*matrix),
            TransfoModel::Projective(h) => match Self::from_homogeneous(*h) {
                TransfoModel::Projective(_) => None,
                reduced => reduced.convert_to_matrix(),
            },
        }
    }

    pub fn try_inverse(&self) -> Option<Self> {
        match self {
            TransfoModel::Identity => Some(TransfoModel::Identity),
            _ => self
                .to_homogeneous()
                .try_inverse()
                .map(Self::from_homogeneous),
        }
    }

    /// Composition `outer ∘ inner`: `inner` is applied first
    pub fn combine(outer: &Self, inner: &Self) -> Self {
        match (outer, inner) {
            (TransfoModel::Identity, model) | (model, TransfoModel::Identity) => model.clone(),
            _ => Self::from_homogeneous(outer.to_homogeneous() * inner.to_homogeneous()),
        }
    }

    /// Cell-wise comparison of the homogeneous forms
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.to_homogeneous()
            .iter()
            .zip(other.to_homogeneous().iter())
            .all(|(a, b)| eq_eps(*a, *b))
    }

    /// Apply the model; `None` when a projective model sends the point to infinity
    pub fn transform_point(&self, point: &Point3<f64>) -> Option<Point3<f64>> {
        match self {
            TransfoModel::Identity => Some(*point),
            TransfoModel::Affine(matrix) => Some(matrix.transform_point(point)),
            TransfoModel::Projective(h) => {
                let v = h * point.to_homogeneous();
                if v.w.abs() <= EQ_EPSILON {
                    None
                } else {
                    Some(Point3::new(v.x / v.w, v.y / v.w, v.z / v.w))
                }
            }
        }
    }
}
