/// painter3d core library - scene geometry and painter's-algorithm rendering
///
/// This library holds the backend-independent part of the renderer: vector,
/// quaternion and matrix algebra, the face/object scene tree, the camera
/// transform with back-to-front ordering, and the `Surface` trait that
/// drawing backends implement.

pub mod camera;
pub mod color;
pub mod error;
pub mod face;
pub mod geometry;
pub mod input;
pub mod matrix;
pub mod object;
pub mod quaternion;
pub mod renderable;
pub mod stl;
pub mod surface;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use camera::{Camera, CameraView, MIN_VERTEX_DEPTH};
pub use color::Color;
pub use error::{GeometryError, Result, ShapeError, StlError};
pub use face::Face;
pub use input::{Action, ControlConfig, InputState};
pub use matrix::{Matrix, SINGULAR_EPSILON};
pub use object::Object;
pub use quaternion::Quaternion;
pub use renderable::{RenderStats, RenderableObject};
pub use surface::{DrawList, Polygon, Surface, Viewport};
pub use transform::Transform;
pub use vector::Vector;
