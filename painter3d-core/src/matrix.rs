/// Dense row-major matrices
///
/// One type covers rectangular and square matrices. Square-only operations
/// (determinant, minors, cofactors, adjugate, inverse) check the shape first
/// and return [`ShapeError::NotSquare`] for rectangular input.
///
/// Determinants use Laplace expansion along the first row, which is exact
/// in structure but factorial in cost; the scene code only ever inverts 3x3
/// camera bases.
use std::fmt;

use nalgebra::DMatrix;

use crate::error::{GeometryError, Result, ShapeError};
use crate::vector::Vector;

/// `|det|` below this is treated as zero by [`Matrix::inverse`]
pub const SINGULAR_EPSILON: f64 = 1e-10;

fn sign(index: usize) -> f64 {
    if index % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: Vec<Vector>,
}

impl Matrix {
    /// Build from row vectors. Rows must be non-empty and share one width.
    pub fn new(rows: Vec<Vector>) -> Result<Self> {
        let width = rows.first().map(Vector::len).unwrap_or(0);
        if width == 0 {
            return Err(ShapeError::Empty.into());
        }
        if let Some((row, v)) = rows.iter().enumerate().find(|(_, v)| v.len() != width) {
            return Err(ShapeError::RaggedRows {
                row,
                expected: width,
                actual: v.len(),
            }
            .into());
        }
        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(rows.into_iter().map(Vector::new).collect())
    }

    /// Caller guarantees the shape invariant
    pub(crate) fn from_rows_unchecked(rows: Vec<Vector>) -> Self {
        debug_assert!(!rows.is_empty() && rows.iter().all(|r| r.len() == rows[0].len()));
        Self { rows }
    }

    pub fn identity(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(ShapeError::Empty.into());
        }
        Ok(Self::from_rows_unchecked(
            (0..n)
                .map(|i| Vector::new((0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect()))
                .collect(),
        ))
    }

    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    pub fn rows(&self) -> &[Vector] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Result<&Vector> {
        self.rows.get(index).ok_or_else(|| {
            ShapeError::IndexOutOfRange {
                index,
                bound: self.height(),
            }
            .into()
        })
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.row(row)?.get(col).ok_or_else(|| {
            ShapeError::IndexOutOfRange {
                index: col,
                bound: self.width(),
            }
            .into()
        })
    }

    pub fn scale(&self, k: f64) -> Matrix {
        Self::from_rows_unchecked(self.rows.iter().map(|r| r.scale(k)).collect())
    }

    pub fn transpose(&self) -> Matrix {
        Self::from_rows_unchecked(
            (0..self.width())
                .map(|col| Vector::new(self.rows.iter().map(|r| r.as_slice()[col]).collect()))
                .collect(),
        )
    }

    /// Matrix-vector product: one dot product per row
    pub fn vector_product(&self, vector: &Vector) -> Result<Vector> {
        if vector.len() != self.width() {
            return Err(GeometryError::DimensionMismatch {
                left: self.width(),
                right: vector.len(),
            });
        }
        self.rows
            .iter()
            .map(|r| r.dot(vector))
            .collect::<Result<Vec<_>>>()
            .map(Vector::new)
    }

    pub fn matrix_product(&self, other: &Matrix) -> Result<Matrix> {
        if self.width() != other.height() {
            return Err(ShapeError::ProductMismatch {
                left_cols: self.width(),
                right_rows: other.height(),
            }
            .into());
        }

        let columns = other.transpose();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .rows
                    .iter()
                    .map(|col| row.dot(col))
                    .collect::<Result<Vec<_>>>()
                    .map(Vector::new)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_rows_unchecked(rows))
    }

    fn ensure_square(&self) -> Result<()> {
        if !self.is_square() {
            return Err(ShapeError::NotSquare {
                rows: self.height(),
                cols: self.width(),
            }
            .into());
        }
        Ok(())
    }

    pub fn determinant(&self) -> Result<f64> {
        self.ensure_square()?;
        Ok(self.expand_determinant())
    }

    fn expand_determinant(&self) -> f64 {
        if self.height() == 1 {
            return self.rows[0].as_slice()[0];
        }
        self.rows[0]
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, entry)| entry * sign(i) * self.minor(i, 0).expand_determinant())
            .sum()
    }

    /// Square matrix with column `col` and row `row` removed; `n >= 2`
    fn minor(&self, col: usize, row: usize) -> Matrix {
        Self::from_rows_unchecked(
            self.rows
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != row)
                .map(|(_, r)| {
                    Vector::new(
                        r.as_slice()
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| *i != col)
                            .map(|(_, v)| *v)
                            .collect(),
                    )
                })
                .collect(),
        )
    }

    /// The minor left after removing column `col` and row `row`
    pub fn submatrix(&self, col: usize, row: usize) -> Result<Matrix> {
        self.ensure_square()?;
        let n = self.height();
        if n == 1 {
            return Err(ShapeError::Empty.into());
        }
        for index in [col, row] {
            if index >= n {
                return Err(ShapeError::IndexOutOfRange { index, bound: n }.into());
            }
        }
        Ok(self.minor(col, row))
    }

    /// Matrix of signed minors; entry `(j, i)` is `(-1)^(i+j) det(minor(i, j))`.
    /// The cofactor matrix of a 1x1 matrix is `[1]`.
    pub fn cofactor(&self) -> Result<Matrix> {
        self.ensure_square()?;
        let n = self.height();
        if n == 1 {
            return Ok(Self::from_rows_unchecked(vec![Vector::new(vec![1.0])]));
        }
        Ok(Self::from_rows_unchecked(
            (0..n)
                .map(|j| {
                    Vector::new(
                        (0..n)
                            .map(|i| sign(i + j) * self.minor(i, j).expand_determinant())
                            .collect(),
                    )
                })
                .collect(),
        ))
    }

    pub fn adjugate(&self) -> Result<Matrix> {
        Ok(self.cofactor()?.transpose())
    }

    /// `adj(M) / det(M)`, refusing near-singular input
    pub fn inverse(&self) -> Result<Matrix> {
        let determinant = self.determinant()?;
        if determinant.abs() < SINGULAR_EPSILON {
            return Err(GeometryError::SingularMatrix { determinant });
        }
        Ok(self.adjugate()?.scale(1.0 / determinant))
    }

    pub fn approx_eq(&self, other: &Matrix, epsilon: f64) -> bool {
        self.height() == other.height()
            && self
                .rows
                .iter()
                .zip(&other.rows)
                .all(|(a, b)| a.approx_eq(b, epsilon))
    }

    pub fn from_dmatrix(matrix: &DMatrix<f64>) -> Result<Self> {
        Self::new(
            matrix
                .row_iter()
                .map(|r| Vector::new(r.iter().copied().collect()))
                .collect(),
        )
    }

    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.height(), self.width(), |r, c| {
            self.rows[r].as_slice()[c]
        })
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.rows.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", lines.join("\n"))
    }
}
