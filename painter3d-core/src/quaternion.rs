/// Quaternions backed by their 4x4 real matrix embedding
///
/// Multiplication is carried out as a matrix product of the
/// left-multiplication embeddings, so `M(p) · M(q) = M(p q)` and the product
/// is read back from the first column.
use std::fmt;

use crate::error::{GeometryError, Result, ShapeError};
use crate::matrix::Matrix;
use crate::vector::Vector;

/// `a + bi + cj + dk`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Quaternion {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    pub fn to_vector(&self) -> Vector {
        Vector::new(vec![self.a, self.b, self.c, self.d])
    }

    /// Vector part `(b, c, d)`
    pub fn to_vector3d(&self) -> Vector {
        Vector::xyz(self.b, self.c, self.d)
    }

    pub fn from_vector(vector: &Vector) -> Result<Self> {
        match vector.as_slice() {
            &[a, b, c, d] => Ok(Self::new(a, b, c, d)),
            other => Err(GeometryError::DimensionMismatch {
                left: 4,
                right: other.len(),
            }),
        }
    }

    /// `cos θ + sin θ (x i + y j + z k)`; with a unit vector and `θ` set to
    /// half a rotation angle this is the rotation quaternion.
    pub fn from_vector3d(vector: &Vector, theta: f64) -> Result<Self> {
        let (sin, cos) = theta.sin_cos();
        Ok(Self::new(
            cos,
            vector.x()? * sin,
            vector.y()? * sin,
            vector.z()? * sin,
        ))
    }

    /// Pure quaternion with a zero scalar part
    pub fn pure(vector: &Vector) -> Result<Self> {
        Ok(Self::new(0.0, vector.x()?, vector.y()?, vector.z()?))
    }

    /// Left-multiplication matrix of this quaternion
    pub fn to_matrix(&self) -> Matrix {
        let Quaternion { a, b, c, d } = *self;
        Matrix::from_rows_unchecked(vec![
            Vector::new(vec![a, -b, -c, -d]),
            Vector::new(vec![b, a, -d, c]),
            Vector::new(vec![c, d, a, -b]),
            Vector::new(vec![d, -c, b, a]),
        ])
    }

    /// Recover a quaternion from its embedding: `M(q) e0 = q`, so the first
    /// column holds the components.
    pub fn from_matrix(matrix: &Matrix) -> Result<Self> {
        if matrix.height() != 4 || matrix.width() != 4 {
            return Err(ShapeError::WrongSize {
                expected_rows: 4,
                expected_cols: 4,
                rows: matrix.height(),
                cols: matrix.width(),
            }
            .into());
        }
        Self::from_vector(matrix.transpose().row(0)?)
    }

    pub fn mult(&self, other: &Quaternion) -> Result<Quaternion> {
        Self::from_matrix(&self.to_matrix().matrix_product(&other.to_matrix())?)
    }

    pub fn add(&self, other: &Quaternion) -> Quaternion {
        Self::new(
            self.a + other.a,
            self.b + other.b,
            self.c + other.c,
            self.d + other.d,
        )
    }

    pub fn conjugate(&self) -> Quaternion {
        Self::new(self.a, -self.b, -self.c, -self.d)
    }

    pub fn norm(&self) -> f64 {
        self.to_vector().length()
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = |v: f64| if v < 0.0 { '-' } else { '+' };
        write!(
            f,
            "{} {} {}i {} {}j {} {}k",
            self.a,
            sign(self.b),
            self.b.abs(),
            sign(self.c),
            self.c.abs(),
            sign(self.d),
            self.d.abs()
        )
    }
}
