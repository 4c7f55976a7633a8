/// Procedural shape builders
///
/// Every builder is an ordinary client of the Face and RenderableObject
/// API. Shapes are centered on the world origin in the default z-up frame.
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::camera::Camera;
use crate::color::Color;
use crate::error::Result;
use crate::face::Face;
use crate::matrix::Matrix;
use crate::object::Object;
use crate::renderable::RenderableObject;
use crate::transform::Transform;
use crate::vector::Vector;

/// Flat rectangle in the xy plane spanning ±width along x and ±length
/// along y
pub fn rectangle(width: f64, length: f64) -> Result<Face> {
    let mut face = Face::new(vec![
        Vector::xyz(1.0, 1.0, 0.0),
        Vector::xyz(-1.0, 1.0, 0.0),
        Vector::xyz(-1.0, -1.0, 0.0),
        Vector::xyz(1.0, -1.0, 0.0),
    ])?;
    face.transform(&Matrix::from_rows(vec![
        vec![width, 0.0, 0.0],
        vec![0.0, length, 0.0],
        vec![0.0, 0.0, 1.0],
    ])?)?;
    Ok(face)
}

pub fn square(size: f64) -> Result<Face> {
    rectangle(size, size)
}

/// Regular `n`-gon in the xy plane
pub fn circle(radius: f64, n: usize) -> Result<Face> {
    let points = (0..n)
        .map(|i| {
            let angle = TAU * i as f64 / n as f64;
            Vector::xyz(angle.cos(), angle.sin(), 0.0)
        })
        .collect();
    let mut face = Face::new(points)?;
    face.scale(radius);
    Ok(face)
}

/// Extrude `face` by `height` above and below its plane, joining the two
/// caps with one quad per edge
pub fn prism(face: &Face, height: f64) -> Result<RenderableObject> {
    let mut top = face.clone();
    top.translate(&Vector::unit_z().scale(height))?;
    let mut bottom = face.clone();
    bottom.translate(&Vector::unit_z().scale(-height))?;

    let n = face.vertices().len();
    let mut sides = Vec::with_capacity(n);
    for i in 0..n {
        let j = (i + 1) % n;
        let side = Face::new(vec![
            top.vertices()[i].clone(),
            top.vertices()[j].clone(),
            bottom.vertices()[j].clone(),
            bottom.vertices()[i].clone(),
        ])?
        .with_colors(face.fill(), face.stroke());
        sides.push(side);
    }

    let mut faces = vec![top, bottom];
    faces.extend(sides);
    Ok(RenderableObject::with_faces(faces))
}

pub fn rectangular_prism(width: f64, length: f64, height: f64) -> Result<RenderableObject> {
    prism(&rectangle(width, length)?, height)
}

pub fn cylinder(radius: f64, height: f64, n: usize) -> Result<RenderableObject> {
    prism(&circle(radius, n)?, height)
}

/// Latitude/longitude tessellated sphere with `n` longitude bands
pub fn sphere(radius: f64, n: usize) -> Result<RenderableObject> {
    let step = TAU / n as f64;
    let point = |latitude: f64, longitude: f64| -> Result<Vector> {
        Vector::unit_x().rotation_y(latitude)?.rotation_z(longitude)
    };

    let mut faces = Vec::with_capacity(n * n.div_ceil(2));
    for i in 0..n {
        let longitude = step * i as f64;
        let next_longitude = step * (i + 1) as f64;

        for j in 0..n.div_ceil(2) {
            let latitude = -FRAC_PI_2 + step * j as f64;
            let next_latitude = -FRAC_PI_2 + step * (j + 1) as f64;

            faces.push(Face::new(vec![
                point(latitude, longitude)?,
                point(next_latitude, longitude)?,
                point(next_latitude, next_longitude)?,
                point(latitude, next_longitude)?,
            ])?);
        }
    }

    let mut node = RenderableObject::with_faces(faces);
    node.scale(radius)?;
    Ok(node)
}

/// Axis-aligned cube with half-extent `size` and one color per face
pub fn cube(size: f64) -> Result<RenderableObject> {
    let frame = Object::new();
    let sides = [
        (frame.forward.clone(), Some(Vector::unit_x()), "#ff0000"),
        (frame.up.clone(), None, "#00ff00"),
        (frame.right.clone(), Some(Vector::unit_y()), "#0000ff"),
        (frame.forward.scale(-1.0), Some(Vector::unit_x()), "#880000"),
        (frame.up.scale(-1.0), None, "#008800"),
        (frame.right.scale(-1.0), Some(Vector::unit_y()), "#000088"),
    ];

    let mut node = RenderableObject::new();
    for (offset, axis, hex) in sides {
        let fill = Color::hex(hex).unwrap_or_default();
        let mut face = square(1.0)?.with_fill(fill);
        face.translate(&offset)?;
        if let Some(axis) = axis {
            face.rotate(&axis, FRAC_PI_2)?;
        }
        node.add_face(face);
    }

    node.scale(size)?;
    Ok(node)
}

/// Two cubes seen from ten units behind a camera shifted along x
pub fn demo_scene() -> Result<Camera> {
    let mut camera = Camera::new();
    camera.translate(&Vector::xyz(5.0, 0.0, 0.0))?;
    let back = camera.frame().forward.scale(-10.0);
    camera.translate(&back)?;

    let mut small = cube(0.2)?;
    small.translate(&Vector::xyz(5.0, 0.0, 0.0))?;

    camera.add_object(cube(2.0)?);
    camera.add_object(small);
    Ok(camera)
}
