/// Composite scene nodes
///
/// A [`RenderableObject`] owns faces and child nodes. Its `center` is the
/// blend of the face centroid mean and the child center mean, weighted by
/// how many of each it holds. A node with neither keeps the position of its
/// own frame, which translation and scaling move like any other point.
///
/// Rotation is rigid for the whole subtree: each face and each child spins
/// about its own center while that center orbits the node's `center`, which
/// together equal rotating every vertex about that one pivot.
use std::ops::AddAssign;

use log::trace;

use crate::camera::CameraView;
use crate::error::{GeometryError, Result};
use crate::face::Face;
use crate::object::Object;
use crate::surface::Surface;
use crate::transform::Transform;
use crate::vector::{centroid, Vector};

/// Face counts from one render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub culled: usize,
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, other: Self) {
        self.drawn += other.drawn;
        self.culled += other.culled;
    }
}

/// Indices of `keys` ordered from largest to smallest. Ties keep their
/// original order.
pub(crate) fn back_to_front(keys: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[b].total_cmp(&keys[a]));
    order
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderableObject {
    object: Object,
    faces: Vec<Face>,
    faces_center: Vector,
    children: Vec<RenderableObject>,
    children_center: Vector,
}

impl RenderableObject {
    pub fn new() -> Self {
        Self {
            object: Object::new(),
            faces: Vec::new(),
            faces_center: Vector::zero(3),
            children: Vec::new(),
            children_center: Vector::zero(3),
        }
    }

    pub fn with_faces(faces: Vec<Face>) -> Self {
        let mut node = Self::new();
        node.faces = faces;
        node.find_center();
        node
    }

    /// Position and orientation frame of this node
    pub fn frame(&self) -> &Object {
        &self.object
    }

    pub fn center(&self) -> &Vector {
        &self.object.center
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn faces_center(&self) -> &Vector {
        &self.faces_center
    }

    pub fn children(&self) -> &[RenderableObject] {
        &self.children
    }

    pub fn children_center(&self) -> &Vector {
        &self.children_center
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.children.is_empty()
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
        self.find_center();
    }

    pub fn add_child(&mut self, child: RenderableObject) {
        self.children.push(child);
        self.find_center();
    }

    /// Every face in this subtree, children first
    pub fn descendant_faces(&self) -> Vec<&Face> {
        let mut faces: Vec<&Face> = self
            .children
            .iter()
            .flat_map(|child| child.descendant_faces())
            .collect();
        faces.extend(self.faces.iter());
        faces
    }

    fn find_center(&mut self) {
        if let Some(center) = centroid(self.faces.iter().map(Face::center)) {
            self.faces_center = center;
        }
        if let Some(center) = centroid(self.children.iter().map(RenderableObject::center)) {
            self.children_center = center;
        }

        let faces = self.faces.len() as f64;
        let children = self.children.len() as f64;
        if faces + children == 0.0 {
            return;
        }
        let face_weight = faces / (faces + children);
        let child_weight = children / (faces + children);
        self.object.center = Vector::new(
            self.faces_center
                .as_slice()
                .iter()
                .zip(self.children_center.as_slice())
                .map(|(f, c)| f * face_weight + c * child_weight)
                .collect(),
        );
    }

    /// Offset that carries a point at `position` around `pivot`
    fn orbit(position: &Vector, pivot: &Vector, axis: &Vector, theta: f64) -> Result<Vector> {
        let arm = position.sub(pivot)?;
        arm.rotation(axis, theta)?.sub(&arm)
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

    /// Scale the subtree about the world origin. Child offsets scale with
    /// it, so a child at `c` ends up at `c * k`.
    pub fn scale(&mut self, k: f64) -> Result<()> {
        for face in &mut self.faces {
            face.scale(k);
        }

        for child in &mut self.children {
            let position = child.center().clone();
            child.translate(&position.scale(-1.0))?;
            child.scale(k)?;
            child.translate(&position.scale(k))?;
        }

        if self.is_empty() {
            self.object.center = self.object.center.scale(k);
        }
        self.find_center();
        Ok(())
    }

    /// Camera-space depth of every face centroid
    fn face_depths(&self, view: &CameraView) -> Result<Vec<f64>> {
        self.faces.iter().map(|f| view.depth(f.center())).collect()
    }

    /// Face indices from farthest to nearest by centroid depth
    pub fn face_order(&self, view: &CameraView) -> Result<Vec<usize>> {
        Ok(back_to_front(&self.face_depths(view)?))
    }

    /// Child indices from farthest to nearest by center distance
    pub fn child_order(&self, view: &CameraView) -> Result<Vec<usize>> {
        let distances = self
            .children
            .iter()
            .map(|c| view.distance(c.center()))
            .collect::<Result<Vec<_>>>()?;
        Ok(back_to_front(&distances))
    }

    /// Draw children (far to near), then this node's own faces
    pub fn render<S: Surface + ?Sized>(
        &self,
        view: &CameraView,
        surface: &mut S,
    ) -> Result<RenderStats> {
        let mut stats = RenderStats::default();
        for index in self.child_order(view)? {
            stats += self.children[index].render(view, surface)?;
        }
        stats += self.render_faces(view, surface)?;
        Ok(stats)
    }

    /// Draw own faces back to front, skipping any whose centroid is not in
    /// front of the camera
    pub fn render_faces<S: Surface + ?Sized>(
        &self,
        view: &CameraView,
        surface: &mut S,
    ) -> Result<RenderStats> {
        let depths = self.face_depths(view)?;
        let mut stats = RenderStats::default();

        for index in back_to_front(&depths) {
            trace!("face {} depth {:.3}", index, depths[index]);
            if depths[index] > 0.0 {
                self.faces[index].render(view, surface)?;
                stats.drawn += 1;
            } else {
                stats.culled += 1;
            }
        }
        Ok(stats)
    }
}

impl Default for RenderableObject {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for RenderableObject {
    fn translate(&mut self, offset: &Vector) -> Result<()> {
        Self::check_operand(offset)?;

        for face in &mut self.faces {
            face.translate(offset)?;
        }
        for child in &mut self.children {
            child.translate(offset)?;
        }

        if self.is_empty() {
            self.object.translate(offset)?;
        }
        self.find_center();
        Ok(())
    }

    fn rotate(&mut self, axis: &Vector, theta: f64) -> Result<()> {
        Self::check_operand(axis)?;
        let pivot = self.object.center.clone();

        for face in &mut self.faces {
            let offset = Self::orbit(face.center(), &pivot, axis, theta)?;
            face.rotate(axis, theta)?;
            face.translate(&offset)?;
        }
        for child in &mut self.children {
            let offset = Self::orbit(child.center(), &pivot, axis, theta)?;
            child.rotate(axis, theta)?;
            child.translate(&offset)?;
        }

        self.object.rotate(axis, theta)?;
        self.find_center();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn square_at(x: f64, y: f64, z: f64) -> Face {
        let mut face = Face::new(vec![
            Vector::xyz(0.5, 0.5, 0.0),
            Vector::xyz(-0.5, 0.5, 0.0),
            Vector::xyz(-0.5, -0.5, 0.0),
            Vector::xyz(0.5, -0.5, 0.0),
        ])
        .unwrap();
        face.translate(&Vector::xyz(x, y, z)).unwrap();
        face
    }

    /// Two faces on the root, one child with a face and a grandchild
    fn tree() -> RenderableObject {
        let mut grandchild = RenderableObject::with_faces(vec![square_at(0.0, 6.0, 1.0)]);
        grandchild.rotate_y(0.4).unwrap();

        let mut child = RenderableObject::with_faces(vec![square_at(4.0, 0.0, 0.0)]);
        child.add_child(grandchild);

        let mut root =
            RenderableObject::with_faces(vec![square_at(-2.0, 0.0, 0.0), square_at(2.0, 0.0, 0.0)]);
        root.add_child(child);
        root
    }

    fn all_vertices(node: &RenderableObject) -> Vec<Vector> {
        node.descendant_faces()
            .into_iter()
            .flat_map(|f| f.vertices().to_vec())
            .collect()
    }

    fn assert_same_points(a: &[Vector], b: &[Vector]) {
        assert_eq!(a.len(), b.len());
        for (p, q) in a.iter().zip(b) {
            assert!(p.approx_eq(q, EPS), "{} != {}", p, q);
        }
    }

    #[test]
    fn test_center_is_weighted_blend() {
        let mut node =
            RenderableObject::with_faces(vec![square_at(0.0, 0.0, 0.0), square_at(3.0, 0.0, 0.0)]);
        assert!(node.center().approx_eq(&Vector::xyz(1.5, 0.0, 0.0), EPS));

        node.add_child(RenderableObject::with_faces(vec![square_at(0.0, 9.0, 0.0)]));
        // (2 * (1.5, 0, 0) + 1 * (0, 9, 0)) / 3
        assert!(node.center().approx_eq(&Vector::xyz(1.0, 3.0, 0.0), EPS));
        assert!(node.faces_center().approx_eq(&Vector::xyz(1.5, 0.0, 0.0), EPS));
        assert!(node.children_center().approx_eq(&Vector::xyz(0.0, 9.0, 0.0), EPS));
    }

    #[test]
    fn test_empty_node_keeps_frame_position() {
        let mut node = RenderableObject::new();
        assert_eq!(node.center(), &Vector::zero(3));
        node.translate(&Vector::xyz(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(node.center(), &Vector::xyz(1.0, 2.0, 3.0));
        node.scale(2.0).unwrap();
        assert_eq!(node.center(), &Vector::xyz(2.0, 4.0, 6.0));
        assert!(node.center().as_slice().iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_translate_roundtrip_restores_subtree() {
        let mut root = tree();
        let original = root.clone();
        let offset = Vector::xyz(3.0, -1.5, 8.0);

        root.translate(&offset).unwrap();
        assert!(root
            .center()
            .approx_eq(&original.center().add(&offset).unwrap(), EPS));

        root.translate(&offset.scale(-1.0)).unwrap();
        assert_same_points(&all_vertices(&root), &all_vertices(&original));
        for (a, b) in root.children().iter().zip(original.children()) {
            assert!(a.center().approx_eq(b.center(), EPS));
            assert!(a.children()[0]
                .center()
                .approx_eq(b.children()[0].center(), EPS));
        }
    }

    #[test]
    fn test_rotation_is_rigid_about_pivot() {
        let mut node =
            RenderableObject::with_faces(vec![square_at(-2.0, 0.0, 1.0), square_at(2.0, 0.0, 1.0)]);
        let pivot = node.faces_center().clone();
        let before = all_vertices(&node);

        node.rotate_z(FRAC_PI_2).unwrap();

        let expected: Vec<Vector> = before
            .iter()
            .map(|v| {
                v.sub(&pivot)
                    .unwrap()
                    .rotation_z(FRAC_PI_2)
                    .unwrap()
                    .add(&pivot)
                    .unwrap()
            })
            .collect();
        assert_same_points(&all_vertices(&node), &expected);
        assert!(node.faces()[0]
            .center()
            .approx_eq(&Vector::xyz(0.0, -2.0, 1.0), EPS));
        assert!(node.faces_center().approx_eq(&pivot, EPS));
        assert!(node.frame().right.approx_eq(&Vector::unit_y(), EPS));
    }

    #[test]
    fn test_rotation_orbits_children_about_node_center() {
        let mut root = RenderableObject::with_faces(vec![square_at(0.0, 0.0, 0.0)]);
        root.add_child(RenderableObject::with_faces(vec![square_at(10.0, 0.0, 0.0)]));
        assert!(root.center().approx_eq(&Vector::xyz(5.0, 0.0, 0.0), EPS));

        root.rotate_z(PI).unwrap();

        assert!(root.faces()[0]
            .center()
            .approx_eq(&Vector::xyz(10.0, 0.0, 0.0), EPS));
        assert!(root.children()[0]
            .center()
            .approx_eq(&Vector::xyz(0.0, 0.0, 0.0), EPS));
        assert!(root.center().approx_eq(&Vector::xyz(5.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn test_rotation_moves_whole_tree_rigidly() {
        let mut root = tree();
        let original = root.clone();
        let pivot = original.center().clone();
        let axis = Vector::xyz(0.3, 1.0, -0.5);
        let theta = 0.8;

        root.rotate(&axis, theta).unwrap();

        let expected: Vec<Vector> = all_vertices(&original)
            .iter()
            .map(|v| {
                v.sub(&pivot)
                    .unwrap()
                    .rotation(&axis, theta)
                    .unwrap()
                    .add(&pivot)
                    .unwrap()
            })
            .collect();
        assert_same_points(&all_vertices(&root), &expected);
        assert!(root.center().approx_eq(&pivot, EPS));
    }

    #[test]
    fn test_rotation_turns_descendant_frames() {
        let mut root = tree();
        let original = root.clone();
        let axis = Vector::xyz(0.3, 1.0, -0.5);

        root.rotate(&axis, 0.8).unwrap();

        let child = &root.children()[0];
        let grandchild = &child.children()[0];
        let pairs = [
            (child.frame(), original.children()[0].frame()),
            (grandchild.frame(), original.children()[0].children()[0].frame()),
        ];
        for (turned, before) in pairs {
            for (v, w) in [
                (&turned.right, &before.right),
                (&turned.up, &before.up),
                (&turned.forward, &before.forward),
            ] {
                assert!(v.approx_eq(&w.rotation(&axis, 0.8).unwrap(), EPS));
            }
            assert!(turned.frame_error().unwrap() < EPS);
        }
    }

    #[test]
    fn test_rotation_roundtrip_restores_subtree() {
        let mut root = tree();
        let original = root.clone();
        let axis = Vector::xyz(0.3, 1.0, -0.5);

        root.rotate(&axis, 1.1).unwrap();
        assert!(root.center().approx_eq(original.center(), EPS));
        root.rotate(&axis, -1.1).unwrap();

        assert_same_points(&all_vertices(&root), &all_vertices(&original));
        assert!(root.frame().frame_error().unwrap() < EPS);
    }

    #[test]
    fn test_scale_moves_children_proportionally() {
        let mut root = RenderableObject::with_faces(vec![square_at(0.0, 0.0, 1.0)]);
        root.add_child(RenderableObject::with_faces(vec![square_at(3.0, 0.0, 0.0)]));

        root.scale(2.0).unwrap();

        let child = &root.children()[0];
        assert!(child.center().approx_eq(&Vector::xyz(6.0, 0.0, 0.0), EPS));
        assert!(child.faces()[0].vertices()[0].approx_eq(&Vector::xyz(7.0, 1.0, 0.0), EPS));
        assert!(root.faces()[0].center().approx_eq(&Vector::xyz(0.0, 0.0, 2.0), EPS));
        assert!(root.center().approx_eq(&Vector::xyz(3.0, 0.0, 1.0), EPS));
    }

    #[test]
    fn test_bad_operand_is_rejected() {
        let mut root = tree();
        let original = root.clone();
        assert!(root.translate(&Vector::new(vec![1.0, 2.0])).is_err());
        assert!(root.rotate(&Vector::new(vec![1.0, 2.0]), 0.5).is_err());
        assert_eq!(root, original);
    }

    #[test]
    fn test_back_to_front_is_descending_and_stable() {
        assert_eq!(back_to_front(&[1.0, 5.0, 3.0, 5.0]), vec![1, 3, 2, 0]);
        assert!(back_to_front(&[]).is_empty());
    }
}
