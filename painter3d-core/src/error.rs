/// Error types for the geometry core

use thiserror::Error;

/// Matrix shape violations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// A matrix needs at least one row and one column
    #[error("Matrix has no entries")]
    Empty,

    /// A row's width differs from the first row's
    #[error("Row {row} has width {actual}, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Square-only operation on a rectangular matrix
    #[error("Matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Left width and right height disagree in a product
    #[error("Cannot multiply: left has {left_cols} columns, right has {right_rows} rows")]
    ProductMismatch { left_cols: usize, right_rows: usize },

    /// The operation needs one exact size
    #[error("Expected a {expected_rows}x{expected_cols} matrix, got {rows}x{cols}")]
    WrongSize {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    /// Row or column index past the matrix bounds
    #[error("Index {index} out of range (bound: {bound})")]
    IndexOutOfRange { index: usize, bound: usize },
}

/// Errors raised by vector, matrix and scene operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The vector has too few components for the requested access
    #[error("Vector has {actual} components, at least {required} required")]
    Dimension { required: usize, actual: usize },

    /// Two operands of an elementwise operation differ in length
    #[error("Vector length mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// Inverse requested for a matrix whose determinant is (near) zero
    #[error("Matrix is singular (determinant {determinant:e})")]
    SingularMatrix { determinant: f64 },

    /// Matrix shape invariant violated
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// A face needs at least one vertex
    #[error("Face has no vertices")]
    EmptyFace,
}

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Failures while importing an STL mesh
#[derive(Debug, Error)]
pub enum StlError {
    #[error("Failed to read STL file: {0}")]
    Io(#[from] std::io::Error),

    /// Smaller than the 80-byte header plus the triangle count
    #[error("STL data too short: {len} bytes")]
    TooShort { len: usize },

    /// Fewer facets present than the header declares
    #[error("STL declares {declared} triangles but only {found} are present")]
    Truncated { declared: usize, found: usize },

    #[error("Failed to parse STL: {0}")]
    Parse(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
