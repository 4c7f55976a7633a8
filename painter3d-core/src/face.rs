/// Colored polygons with a derived centroid
use crate::camera::CameraView;
use crate::color::Color;
use crate::error::{GeometryError, Result, ShapeError};
use crate::matrix::Matrix;
use crate::surface::Surface;
use crate::transform::Transform;
use crate::vector::{centroid, Vector};

/// An ordered loop of 3D vertices.
///
/// `center` is the vertex mean and is re-derived after every mutation, so it
/// can be read at any time without recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    vertices: Vec<Vector>,
    fill: Color,
    stroke: Color,
    center: Vector,
}

impl Face {
    /// Build a face from at least one 3-component vertex. Colors default to
    /// a red fill with a faint outline.
    pub fn new(vertices: Vec<Vector>) -> Result<Self> {
        if vertices.is_empty() {
            return Err(GeometryError::EmptyFace);
        }
        if let Some(v) = vertices.iter().find(|v| v.len() != 3) {
            return Err(GeometryError::Dimension {
                required: 3,
                actual: v.len(),
            });
        }

        let mut face = Self {
            vertices,
            fill: Color::RED,
            stroke: Color::FAINT_OUTLINE,
            center: Vector::zero(3),
        };
        face.find_center();
        Ok(face)
    }

    pub fn with_colors(mut self, fill: Color, stroke: Color) -> Self {
        self.fill = fill;
        self.stroke = stroke;
        self
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn vertices(&self) -> &[Vector] {
        &self.vertices
    }

    pub fn center(&self) -> &Vector {
        &self.center
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn stroke(&self) -> Color {
        self.stroke
    }

    /// Scale every vertex about the world origin
    pub fn scale(&mut self, k: f64) {
        for vertex in &mut self.vertices {
            let scaled = vertex.scale(k);
            vertex.assign(&scaled);
        }
        self.find_center();
    }

    /// Apply a 3x3 linear map about the face's own centroid
    pub fn transform(&mut self, matrix: &Matrix) -> Result<()> {
        if matrix.height() != 3 || matrix.width() != 3 {
            return Err(ShapeError::WrongSize {
                expected_rows: 3,
                expected_cols: 3,
                rows: matrix.height(),
                cols: matrix.width(),
            }
            .into());
        }

        let original_center = self.center.clone();
        self.translate(&original_center.scale(-1.0))?;
        for vertex in &mut self.vertices {
            vertex.transform(matrix)?;
        }
        self.translate(&original_center)?;

        self.find_center();
        Ok(())
    }

    fn find_center(&mut self) {
        if let Some(center) = centroid(&self.vertices) {
            self.center = center;
        }
    }

    fn check_operand(operand: &Vector) -> Result<()> {
        if operand.len() != 3 {
            return Err(GeometryError::DimensionMismatch {
                left: 3,
                right: operand.len(),
            });
        }
        Ok(())
    }

    /// Project every vertex through `view` and draw the closed, filled and
    /// outlined polygon
    pub fn render<S: Surface + ?Sized>(&self, view: &CameraView, surface: &mut S) -> Result<()> {
        let viewport = surface.viewport();
        let points = self
            .vertices
            .iter()
            .map(|v| view.project(v, &viewport))
            .collect::<Result<Vec<_>>>()?;

        surface.begin_path();
        for (x, y) in points {
            surface.line_to(x, y);
        }
        surface.close_path();
        surface.fill(self.fill);
        surface.stroke(self.stroke);
        Ok(())
    }
}

impl Transform for Face {
    fn translate(&mut self, offset: &Vector) -> Result<()> {
        Self::check_operand(offset)?;
        for vertex in &mut self.vertices {
            vertex.translate(offset)?;
        }
        self.find_center();
        Ok(())
    }

    /// Spin the face about its own centroid
    fn rotate(&mut self, axis: &Vector, theta: f64) -> Result<()> {
        Self::check_operand(axis)?;

        let original_center = self.center.clone();
        self.translate(&original_center.scale(-1.0))?;
        for vertex in &mut self.vertices {
            vertex.rotate(axis, theta)?;
        }
        self.translate(&original_center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn unit_square() -> Face {
        Face::new(vec![
            Vector::xyz(1.0, 1.0, 0.0),
            Vector::xyz(-1.0, 1.0, 0.0),
            Vector::xyz(-1.0, -1.0, 0.0),
            Vector::xyz(1.0, -1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_center_is_vertex_mean() {
        let face = Face::new(vec![
            Vector::xyz(0.0, 0.0, 0.0),
            Vector::xyz(3.0, 0.0, 0.0),
            Vector::xyz(0.0, 6.0, 3.0),
        ])
        .unwrap();
        assert!(face.center().approx_eq(&Vector::xyz(1.0, 2.0, 1.0), EPS));
        assert_eq!(face.fill(), Color::RED);
        assert_eq!(face.stroke(), Color::FAINT_OUTLINE);
    }

    #[test]
    fn test_invalid_vertices() {
        assert_eq!(Face::new(vec![]), Err(GeometryError::EmptyFace));
        assert!(matches!(
            Face::new(vec![Vector::new(vec![1.0, 2.0])]),
            Err(GeometryError::Dimension { required: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_translate_roundtrip() {
        let mut face = unit_square();
        let original = face.clone();
        let offset = Vector::xyz(0.5, -2.0, 7.25);

        face.translate(&offset).unwrap();
        assert!(face.center().approx_eq(&offset, EPS));
        face.translate(&offset.scale(-1.0)).unwrap();
        for (a, b) in face.vertices().iter().zip(original.vertices()) {
            assert!(a.approx_eq(b, EPS));
        }
    }

    #[test]
    fn test_bad_offset_leaves_face_untouched() {
        let mut face = unit_square();
        let original = face.clone();
        assert!(face.translate(&Vector::new(vec![1.0, 1.0])).is_err());
        assert!(face.rotate(&Vector::new(vec![1.0]), 1.0).is_err());
        assert_eq!(face, original);
    }

    #[test]
    fn test_rotate_about_own_center() {
        let mut face = unit_square();
        face.translate(&Vector::xyz(4.0, 0.0, 0.0)).unwrap();
        let center = face.center().clone();

        face.rotate_x(FRAC_PI_2).unwrap();
        assert!(face.center().approx_eq(&center, EPS));
        // The square now lies in the xz plane
        for vertex in face.vertices() {
            assert!(vertex.y().unwrap().abs() < EPS);
        }

        face.rotate(&Vector::xyz(1.0, 2.0, 3.0), 0.7).unwrap();
        assert!(face.center().approx_eq(&center, EPS));
    }

    #[test]
    fn test_scale_about_origin() {
        let mut face = unit_square();
        face.translate(&Vector::xyz(0.0, 0.0, 1.0)).unwrap();
        face.scale(2.0);
        assert!(face.center().approx_eq(&Vector::xyz(0.0, 0.0, 2.0), EPS));
        assert!(face.vertices()[0].approx_eq(&Vector::xyz(2.0, 2.0, 2.0), EPS));
    }

    #[test]
    fn test_transform_about_center() {
        let mut face = unit_square();
        face.translate(&Vector::xyz(0.0, 0.0, 5.0)).unwrap();
        let stretch = Matrix::from_rows(vec![
            vec![3.0, 0.0, 0.0],
            vec![0.0, 2.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();

        face.transform(&stretch).unwrap();
        assert!(face.center().approx_eq(&Vector::xyz(0.0, 0.0, 5.0), EPS));
        assert!(face.vertices()[0].approx_eq(&Vector::xyz(3.0, 2.0, 5.0), EPS));

        let flat = Matrix::from_rows(vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]).unwrap();
        assert!(face.transform(&flat).is_err());
    }
}
