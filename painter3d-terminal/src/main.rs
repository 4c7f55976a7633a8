/// painter3d terminal demo
///
/// Renders the two-cube demo scene, or the STL file given as the first
/// argument. Logs go to stderr; set RUST_LOG and redirect stderr to a file
/// to keep them off the drawing area.
/// Controls:
///   - WASD: Move, R/F: Up/Down
///   - Arrow Keys: Pitch and yaw
///   - Q/ESC: Quit

use anyhow::Context;
use log::info;
use painter3d_core::{geometry, stl, Camera, RenderableObject, Transform};
use painter3d_terminal::{TerminalApp, TerminalConfig};

/// Camera backed away from `mesh` far enough to see all of it
fn frame_mesh(mesh: RenderableObject) -> anyhow::Result<Camera> {
    let mut radius: f64 = 1.0;
    for face in mesh.faces() {
        for vertex in face.vertices() {
            radius = radius.max(vertex.sub(mesh.center())?.length());
        }
    }

    let mut camera = Camera::new();
    camera.translate(mesh.center())?;
    let back = camera.frame().forward.scale(-3.0 * radius);
    camera.translate(&back)?;
    camera.add_object(mesh);
    Ok(camera)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let camera = match std::env::args().nth(1) {
        Some(path) => {
            let mesh = stl::load_stl(&path).with_context(|| format!("Failed to load {}", path))?;
            info!("Loaded {} triangles from {}", mesh.faces().len(), path);
            frame_mesh(mesh)?
        }
        None => geometry::demo_scene()?,
    };

    let mut app = TerminalApp::new(camera, TerminalConfig::default())
        .context("Failed to query terminal size")?;
    app.run().context("Terminal loop failed")?;

    println!("Thank you for using painter3d!");
    Ok(())
}
