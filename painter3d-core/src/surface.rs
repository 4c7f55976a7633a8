/// Drawing surface boundary
///
/// The renderer talks to a backend through path primitives only. Points are
/// in surface coordinates: origin at the viewport center, x to the right,
/// y up. Backends map them onto their own pixel or cell grid.
use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The extent the perspective scale is derived from
    pub fn extent(&self) -> f64 {
        self.width
    }

    /// Map a centered, y-up point to top-left, y-down coordinates.
    /// `y_scale` compensates for non-square pixels (terminal cells).
    pub fn to_screen(&self, x: f64, y: f64, y_scale: f64) -> (f64, f64) {
        (self.width / 2.0 + x, self.height / 2.0 - y * y_scale)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(300.0, 300.0)
    }
}

/// Path-based 2D drawing backend
pub trait Surface {
    fn viewport(&self) -> Viewport;

    fn begin_path(&mut self);

    fn line_to(&mut self, x: f64, y: f64);

    fn close_path(&mut self);

    /// Fill the current path
    fn fill(&mut self, color: Color);

    /// Outline the current path
    fn stroke(&mut self, color: Color);
}

/// One filled polygon as received by a surface
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<(f64, f64)>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
}

/// Surface that records polygons in draw order instead of rasterizing them
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    viewport: Viewport,
    path: Vec<(f64, f64)>,
    /// Whether the current path already produced a polygon
    painted: bool,
    polygons: Vec<Polygon>,
}

impl DrawList {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            path: Vec::new(),
            painted: false,
            polygons: Vec::new(),
        }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn clear(&mut self) {
        self.path.clear();
        self.painted = false;
        self.polygons.clear();
    }

    /// Attach a paint operation to the polygon built from the current path
    fn paint(&mut self, apply: impl FnOnce(&mut Polygon)) {
        if !self.painted {
            self.painted = true;
            self.polygons.push(Polygon {
                points: self.path.clone(),
                fill: None,
                stroke: None,
            });
        }
        if let Some(last) = self.polygons.last_mut() {
            apply(last);
        }
    }
}

impl Surface for DrawList {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.painted = false;
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.push((x, y));
        self.painted = false;
    }

    fn close_path(&mut self) {}

    fn fill(&mut self, color: Color) {
        self.paint(|p| p.fill = Some(color));
    }

    fn stroke(&mut self, color: Color) {
        self.paint(|p| p.stroke = Some(color));
    }
}
