/// Top-down minimap of the camera position and heading
use painter3d_core::{Color, Object, Result, Surface};

/// Side length of the minimap canvas in pixels
pub const MINIMAP_SIZE: u32 = 100;

/// Translucent backdrop painted under the axes every frame
pub const MINIMAP_BACKDROP: &str = "#00000022";

/// Pixels per world unit between the camera marker and its heading marker
const HEADING_SCALE: f64 = 10.0;

const MARKER_HALF: f64 = 2.5;
const HEADING_COLOR: Color = Color::rgb(0, 0, 255);

/// Camera and heading marker positions, looking down the z axis with one
/// pixel per world unit
pub fn marker_positions(frame: &Object) -> Result<[(f64, f64); 2]> {
    let (x, y) = (frame.center.x()?, frame.center.y()?);
    let heading = frame.forward.scale(HEADING_SCALE);
    Ok([(x, y), (x + heading.x()?, y + heading.y()?)])
}

/// Draw the x and y axes plus the camera and heading markers
pub fn draw<S: Surface + ?Sized>(surface: &mut S, frame: &Object) -> Result<()> {
    let viewport = surface.viewport();
    let (half_w, half_h) = (viewport.width / 2.0, viewport.height / 2.0);
    let axes = [((half_w, 0.0), (-half_w, 0.0)), ((0.0, half_h), (0.0, -half_h))];
    for ((x0, y0), (x1, y1)) in axes {
        surface.begin_path();
        surface.line_to(x0, y0);
        surface.line_to(x1, y1);
        surface.stroke(Color::WHITE);
    }

    let [camera, heading] = marker_positions(frame)?;
    for ((x, y), color) in [(camera, Color::RED), (heading, HEADING_COLOR)] {
        surface.begin_path();
        surface.line_to(x - MARKER_HALF, y - MARKER_HALF);
        surface.line_to(x + MARKER_HALF, y - MARKER_HALF);
        surface.line_to(x + MARKER_HALF, y + MARKER_HALF);
        surface.line_to(x - MARKER_HALF, y + MARKER_HALF);
        surface.close_path();
        surface.fill(color);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use painter3d_core::{DrawList, Transform, Vector, Viewport};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_markers_follow_camera_and_heading() {
        let mut frame = Object::new();
        frame.translate(&Vector::xyz(5.0, -10.0, 3.0)).unwrap();
        frame.rotate_z(FRAC_PI_2).unwrap();

        let [camera, heading] = marker_positions(&frame).unwrap();
        assert_eq!(camera, (5.0, -10.0));
        // Forward +y turned a quarter left points along -x
        assert!((heading.0 + 5.0).abs() < 1e-9);
        assert!((heading.1 + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_draw_paints_axes_then_markers() {
        let size = MINIMAP_SIZE as f64;
        let mut list = DrawList::new(Viewport::new(size, size));
        draw(&mut list, &Object::new()).unwrap();

        let polygons = list.polygons();
        assert_eq!(polygons.len(), 4);
        assert_eq!(polygons[0].points, vec![(50.0, 0.0), (-50.0, 0.0)]);
        assert_eq!(polygons[1].stroke, Some(Color::WHITE));

        assert_eq!(polygons[2].fill, Some(Color::RED));
        assert!(polygons[2].points.contains(&(-2.5, -2.5)));
        assert_eq!(polygons[3].fill, Some(HEADING_COLOR));
        assert!(polygons[3].points.contains(&(2.5, 12.5)));
    }
}
