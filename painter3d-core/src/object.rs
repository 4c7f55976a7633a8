/// Position plus orientation frame
use crate::error::Result;
use crate::transform::Transform;
use crate::vector::Vector;

/// A position and an orthonormal `right`/`up`/`forward` frame.
///
/// Rotations turn the frame only; `center` is moved by translation alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub center: Vector,
    pub right: Vector,
    pub up: Vector,
    pub forward: Vector,
}

impl Object {
    /// Origin with the z-up world frame: right = x, forward = y, up = z
    pub fn new() -> Self {
        Self {
            center: Vector::zero(3),
            right: Vector::unit_x(),
            up: Vector::unit_z(),
            forward: Vector::unit_y(),
        }
    }

    pub fn with_frame(center: Vector, right: Vector, up: Vector, forward: Vector) -> Self {
        Self {
            center,
            right,
            up,
            forward,
        }
    }

    /// Largest deviation of the frame from orthonormality
    pub fn frame_error(&self) -> Result<f64> {
        let basis = [&self.right, &self.up, &self.forward];
        let mut worst: f64 = 0.0;
        for (i, a) in basis.iter().enumerate() {
            worst = worst.max((a.length() - 1.0).abs());
            for b in &basis[i + 1..] {
                worst = worst.max(a.dot(b)?.abs());
            }
        }
        Ok(worst)
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for Object {
    fn translate(&mut self, offset: &Vector) -> Result<()> {
        self.center.translate(offset)
    }

    fn rotate(&mut self, axis: &Vector, theta: f64) -> Result<()> {
        let right = self.right.rotation(axis, theta)?;
        let up = self.up.rotation(axis, theta)?;
        let forward = self.forward.rotation(axis, theta)?;
        self.right = right;
        self.up = up;
        self.forward = forward;
        Ok(())
    }
}
