/// Variable-length vectors with quaternion-based rotation
use std::fmt;

use nalgebra::Vector3;

use crate::error::{GeometryError, Result};
use crate::matrix::Matrix;
use crate::quaternion::Quaternion;

/// An ordered tuple of reals.
///
/// Dimension is not fixed by the type; operations that need a third
/// component (z access, rotation) check the length and fail with
/// [`GeometryError::Dimension`] instead of panicking.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    components: Vec<f64>,
}

impl Vector {
    pub fn new(components: Vec<f64>) -> Self {
        Self { components }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(vec![x, y, z])
    }

    pub fn zero(len: usize) -> Self {
        Self::new(vec![0.0; len])
    }

    pub fn unit_x() -> Self {
        Self::xyz(1.0, 0.0, 0.0)
    }

    pub fn unit_y() -> Self {
        Self::xyz(0.0, 1.0, 0.0)
    }

    pub fn unit_z() -> Self {
        Self::xyz(0.0, 0.0, 1.0)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.components
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.components.get(index).copied()
    }

    fn component(&self, index: usize) -> Result<f64> {
        self.get(index).ok_or(GeometryError::Dimension {
            required: index + 1,
            actual: self.len(),
        })
    }

    pub fn x(&self) -> Result<f64> {
        self.component(0)
    }

    pub fn y(&self) -> Result<f64> {
        self.component(1)
    }

    pub fn z(&self) -> Result<f64> {
        self.component(2)
    }

    pub fn set_z(&mut self, value: f64) -> Result<()> {
        let actual = self.len();
        let slot = self
            .components
            .get_mut(2)
            .ok_or(GeometryError::Dimension { required: 3, actual })?;
        *slot = value;
        Ok(())
    }

    fn ensure_same_len(&self, other: &Vector) -> Result<()> {
        if self.len() != other.len() {
            return Err(GeometryError::DimensionMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(())
    }

    /// Overwrite this vector with a copy of `other`
    pub fn assign(&mut self, other: &Vector) -> &mut Self {
        self.components.clone_from(&other.components);
        self
    }

    pub fn scale(&self, k: f64) -> Vector {
        Vector::new(self.components.iter().map(|c| c * k).collect())
    }

    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.ensure_same_len(other)?;
        Ok(Vector::new(
            self.components
                .iter()
                .zip(&other.components)
                .map(|(a, b)| a + b)
                .collect(),
        ))
    }

    pub fn sub(&self, other: &Vector) -> Result<Vector> {
        self.add(&other.scale(-1.0))
    }

    pub fn dot(&self, other: &Vector) -> Result<f64> {
        self.ensure_same_len(other)?;
        Ok(self
            .components
            .iter()
            .zip(&other.components)
            .map(|(a, b)| a * b)
            .sum())
    }

    /// Euclidean norm
    pub fn length(&self) -> f64 {
        self.components.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    /// Unit vector in the same direction. The zero vector is returned as is.
    pub fn normalized(&self) -> Vector {
        let length = self.length();
        if length == 0.0 {
            return self.clone();
        }
        self.scale(1.0 / length)
    }

    /// This vector rotated by `theta` radians about `axis` (right-handed).
    ///
    /// Computed as the vector part of `q · p · q*`, where `q` is the
    /// half-angle quaternion of the normalized axis and `p` the pure
    /// quaternion of this vector.
    pub fn rotation(&self, axis: &Vector, theta: f64) -> Result<Vector> {
        let axis = axis.normalized();
        let q1 = Quaternion::from_vector3d(&axis, theta / 2.0)?;
        let p = Quaternion::pure(self)?;
        let q2 = Quaternion::from_vector3d(&axis.scale(-1.0), theta / 2.0)?;

        Ok(q1.mult(&p)?.mult(&q2)?.to_vector3d())
    }

    pub fn rotation_x(&self, theta: f64) -> Result<Vector> {
        self.rotation(&Vector::unit_x(), theta)
    }

    pub fn rotation_y(&self, theta: f64) -> Result<Vector> {
        self.rotation(&Vector::unit_y(), theta)
    }

    pub fn rotation_z(&self, theta: f64) -> Result<Vector> {
        self.rotation(&Vector::unit_z(), theta)
    }

    pub fn rotate(&mut self, axis: &Vector, theta: f64) -> Result<&mut Self> {
        let rotated = self.rotation(axis, theta)?;
        Ok(self.assign(&rotated))
    }

    pub fn rotate_x(&mut self, theta: f64) -> Result<&mut Self> {
        self.rotate(&Vector::unit_x(), theta)
    }

    pub fn rotate_y(&mut self, theta: f64) -> Result<&mut Self> {
        self.rotate(&Vector::unit_y(), theta)
    }

    pub fn rotate_z(&mut self, theta: f64) -> Result<&mut Self> {
        self.rotate(&Vector::unit_z(), theta)
    }

    pub fn translate(&mut self, other: &Vector) -> Result<()> {
        self.ensure_same_len(other)?;
        for (c, d) in self.components.iter_mut().zip(&other.components) {
            *c += d;
        }
        Ok(())
    }

    /// Image of this vector under `matrix`
    pub fn transformation(&self, matrix: &Matrix) -> Result<Vector> {
        matrix.vector_product(self)
    }

    pub fn transform(&mut self, matrix: &Matrix) -> Result<()> {
        let image = self.transformation(matrix)?;
        self.assign(&image);
        Ok(())
    }

    /// Componentwise comparison within `epsilon`; vectors of different
    /// lengths are never equal.
    pub fn approx_eq(&self, other: &Vector, epsilon: f64) -> bool {
        self.len() == other.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    pub fn to_vector3(&self) -> Result<Vector3<f64>> {
        Ok(Vector3::new(self.x()?, self.y()?, self.z()?))
    }
}

/// Mean of a non-empty set of equal-length points
pub(crate) fn centroid<'a, I>(points: I) -> Option<Vector>
where
    I: IntoIterator<Item = &'a Vector>,
{
    let mut points = points.into_iter();
    let mut sum = points.next()?.clone();
    let mut count = 1.0;
    for point in points {
        for (acc, c) in sum.components.iter_mut().zip(&point.components) {
            *acc += c;
        }
        count += 1.0;
    }
    Some(sum.scale(1.0 / count))
}

impl From<Vec<f64>> for Vector {
    fn from(components: Vec<f64>) -> Self {
        Self::new(components)
    }
}

impl<const N: usize> From<[f64; N]> for Vector {
    fn from(components: [f64; N]) -> Self {
        Self::new(components.to_vec())
    }
}

impl From<Vector3<f64>> for Vector {
    fn from(v: Vector3<f64>) -> Self {
        Self::xyz(v.x, v.y, v.z)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "|{}|", parts.join(" "))
    }
}
