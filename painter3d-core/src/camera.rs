/// Camera transform, perspective projection and painter's ordering
use std::f64::consts::FRAC_PI_4;

use log::debug;

use crate::error::Result;
use crate::matrix::Matrix;
use crate::object::Object;
use crate::renderable::{back_to_front, RenderStats, RenderableObject};
use crate::surface::{Surface, Viewport};
use crate::transform::Transform;
use crate::vector::Vector;

/// Vertices closer to the camera plane than this are projected as if they
/// sat exactly this far away
pub const MIN_VERTEX_DEPTH: f64 = 1e-9;

/// Camera-local coordinate mapping, computed once per frame.
///
/// Holds the inverse of the camera basis (columns right, up, forward) and
/// the camera position already expressed in that basis.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraView {
    inverse: Matrix,
    origin: Vector,
    view_angle: f64,
}

impl CameraView {
    pub fn view_angle(&self) -> f64 {
        self.view_angle
    }

    /// `point` relative to the camera position and orientation
    pub fn delta(&self, point: &Vector) -> Result<Vector> {
        self.inverse.vector_product(point)?.sub(&self.origin)
    }

    /// Camera-space z of `point`. Positive means in front of the camera.
    pub fn depth(&self, point: &Vector) -> Result<f64> {
        self.delta(point)?.z()
    }

    pub fn distance(&self, point: &Vector) -> Result<f64> {
        Ok(self.delta(point)?.length())
    }

    /// Perspective scale for a point at `depth`
    pub fn scale_factor(&self, depth: f64, viewport: &Viewport) -> f64 {
        let depth = if depth.abs() < MIN_VERTEX_DEPTH {
            MIN_VERTEX_DEPTH.copysign(depth)
        } else {
            depth
        };
        viewport.extent() / (2.0 * self.view_angle.tan() * depth)
    }

    /// Project `point` to centered, y-up surface coordinates
    pub fn project(&self, point: &Vector, viewport: &Viewport) -> Result<(f64, f64)> {
        let d = self.delta(point)?;
        let k = self.scale_factor(d.z()?, viewport).abs();
        Ok((d.x()? * k, d.y()? * k))
    }
}

/// A posed viewpoint that owns the top-level scene objects
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    object: Object,
    pub view_angle: f64,
    objects: Vec<RenderableObject>,
}

impl Camera {
    /// Camera at the origin in the default frame, looking along +y
    pub fn new() -> Self {
        Self::with_frame(Object::new())
    }

    pub fn with_frame(object: Object) -> Self {
        Self {
            object,
            view_angle: FRAC_PI_4,
            objects: Vec::new(),
        }
    }

    pub fn frame(&self) -> &Object {
        &self.object
    }

    pub fn center(&self) -> &Vector {
        &self.object.center
    }

    pub fn add_object(&mut self, object: RenderableObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[RenderableObject] {
        &self.objects
    }

    /// Invert the current basis. Fails with `SingularMatrix` when the frame
    /// has collapsed.
    pub fn view(&self) -> Result<CameraView> {
        let basis = Matrix::new(vec![
            self.object.right.clone(),
            self.object.up.clone(),
            self.object.forward.clone(),
        ])?
        .transpose();
        let inverse = basis.inverse()?;
        let origin = inverse.vector_product(&self.object.center)?;

        Ok(CameraView {
            inverse,
            origin,
            view_angle: self.view_angle,
        })
    }

    /// `point` in camera-local coordinates
    pub fn delta(&self, point: &Vector) -> Result<Vector> {
        self.view()?.delta(point)
    }

    /// Object indices from farthest to nearest
    pub fn object_order(&self, view: &CameraView) -> Result<Vec<usize>> {
        let distances = self
            .objects
            .iter()
            .map(|o| view.distance(o.center()))
            .collect::<Result<Vec<_>>>()?;
        Ok(back_to_front(&distances))
    }

    /// Draw every object back to front onto `surface`
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<RenderStats> {
        let view = self.view()?;
        let mut stats = RenderStats::default();
        for index in self.object_order(&view)? {
            stats += self.objects[index].render(&view, surface)?;
        }
        debug!(
            "rendered {} faces, culled {} ({} objects)",
            stats.drawn,
            stats.culled,
            self.objects.len()
        );
        Ok(stats)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for Camera {
    fn translate(&mut self, offset: &Vector) -> Result<()> {
        self.object.translate(offset)
    }

    fn rotate(&mut self, axis: &Vector, theta: f64) -> Result<()> {
        self.object.rotate(axis, theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::error::GeometryError;
    use crate::face::Face;
    use crate::surface::DrawList;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    /// Looking down +z from (0, 0, -10), y up
    fn z_camera() -> Camera {
        Camera::with_frame(Object::with_frame(
            Vector::xyz(0.0, 0.0, -10.0),
            Vector::unit_x(),
            Vector::unit_y(),
            Vector::unit_z(),
        ))
    }

    fn triangle_at(z: f64) -> Face {
        Face::new(vec![
            Vector::xyz(-1.0, -1.0, z),
            Vector::xyz(1.0, -1.0, z),
            Vector::xyz(0.0, 1.0, z),
        ])
        .unwrap()
    }

    #[test]
    fn test_delta_in_default_frame() {
        let mut camera = Camera::new();
        camera.translate(&Vector::xyz(1.0, 2.0, 3.0)).unwrap();
        let d = camera.delta(&Vector::xyz(1.0, 7.0, 3.0)).unwrap();
        // forward is +y, so the offset along y is the depth
        assert!(d.approx_eq(&Vector::xyz(0.0, 0.0, 5.0), EPS));
    }

    #[test]
    fn test_delta_follows_rotation() {
        let mut camera = Camera::new();
        camera.rotate_z(FRAC_PI_2).unwrap();
        // forward is now -x
        let d = camera.delta(&Vector::xyz(-4.0, 0.0, 0.0)).unwrap();
        assert!(d.approx_eq(&Vector::xyz(0.0, 0.0, 4.0), EPS));
        assert!(camera.center().approx_eq(&Vector::zero(3), EPS));
    }

    #[test]
    fn test_view_matches_delta() {
        let mut camera = z_camera();
        camera.rotate(&Vector::xyz(1.0, 1.0, 0.0), 0.3).unwrap();
        let view = camera.view().unwrap();
        let point = Vector::xyz(3.0, -2.0, 5.0);
        assert_eq!(view.delta(&point).unwrap(), camera.delta(&point).unwrap());
    }

    #[test]
    fn test_project_scales_by_depth() {
        let camera = z_camera();
        let view = camera.view().unwrap();
        let viewport = Viewport::new(300.0, 300.0);

        // tan(pi/4) = 1, so k = 300 / (2 * 8)
        let (x, y) = view.project(&Vector::xyz(2.0, 2.0, -2.0), &viewport).unwrap();
        assert!((x - 37.5).abs() < EPS);
        assert!((y - 37.5).abs() < EPS);

        let (x, y) = view.project(&Vector::xyz(2.0, -2.0, 2.0), &viewport).unwrap();
        assert!((x - 25.0).abs() < EPS);
        assert!((y + 25.0).abs() < EPS);
    }

    #[test]
    fn test_project_on_camera_plane_is_finite() {
        let camera = z_camera();
        let view = camera.view().unwrap();
        let (x, y) = view
            .project(&Vector::xyz(1.0, 1.0, -10.0), &Viewport::default())
            .unwrap();
        assert!(x.is_finite() && y.is_finite());
    }

    #[test]
    fn test_collapsed_frame_is_singular() {
        let camera = Camera::with_frame(Object::with_frame(
            Vector::zero(3),
            Vector::unit_x(),
            Vector::unit_x(),
            Vector::unit_z(),
        ));
        assert!(matches!(
            camera.view(),
            Err(GeometryError::SingularMatrix { .. })
        ));
        let mut list = DrawList::new(Viewport::default());
        assert!(camera.render(&mut list).is_err());
    }

    #[test]
    fn test_render_orders_objects_far_to_near() {
        let mut camera = z_camera();
        let near = RenderableObject::with_faces(vec![triangle_at(0.0).with_fill(Color::WHITE)]);
        let far = RenderableObject::with_faces(vec![triangle_at(20.0).with_fill(Color::BLACK)]);
        camera.add_object(near);
        camera.add_object(far);

        let view = camera.view().unwrap();
        assert_eq!(camera.object_order(&view).unwrap(), vec![1, 0]);

        let mut list = DrawList::new(Viewport::default());
        let stats = camera.render(&mut list).unwrap();
        assert_eq!(stats, RenderStats { drawn: 2, culled: 0 });
        let fills: Vec<_> = list.polygons().iter().map(|p| p.fill).collect();
        assert_eq!(fills, vec![Some(Color::BLACK), Some(Color::WHITE)]);
    }

    #[test]
    fn test_faces_behind_camera_are_culled() {
        let mut camera = z_camera();
        camera.add_object(RenderableObject::with_faces(vec![
            triangle_at(5.0),
            triangle_at(-10.0),
            triangle_at(-30.0),
        ]));

        let mut list = DrawList::new(Viewport::default());
        let stats = camera.render(&mut list).unwrap();
        assert_eq!(stats, RenderStats { drawn: 1, culled: 2 });
        assert_eq!(list.polygons().len(), 1);
    }
}
