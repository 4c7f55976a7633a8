/// Translation and rotation shared by every posed scene entity
use crate::error::Result;
use crate::vector::Vector;

/// In-place rigid motions. Implementors decide what "rotate" pivots
/// around (a face spins about its centroid, an object turns its frame).
pub trait Transform {
    fn translate(&mut self, offset: &Vector) -> Result<()>;

    /// Rotate by `theta` radians about `axis` (right-handed)
    fn rotate(&mut self, axis: &Vector, theta: f64) -> Result<()>;

    fn rotate_x(&mut self, theta: f64) -> Result<()> {
        self.rotate(&Vector::unit_x(), theta)
    }

    fn rotate_y(&mut self, theta: f64) -> Result<()> {
        self.rotate(&Vector::unit_y(), theta)
    }

    fn rotate_z(&mut self, theta: f64) -> Result<()> {
        self.rotate(&Vector::unit_z(), theta)
    }
}
