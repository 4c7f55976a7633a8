/// painter3d Web - canvas 2D frontend compiled to WASM
///
/// Renders the demo scene onto an HTML canvas each time the page calls
/// `frame`, with keyboard state forwarded through `key_down`/`key_up`.
/// An optional second canvas shows a top-down minimap.

use painter3d_core::{
    geometry, Action, Camera, Color, ControlConfig, InputState, Surface, Viewport,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub mod minimap;

const SKY: &str = "#71c4f5";
const OVERLAY_FONT: &str = "14px monospace";

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("No element #{}", id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("#{} is not a canvas", id)))
}

/// `Surface` backed by a canvas 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    /// Whether the next `line_to` starts the path
    first_point: bool,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("Unexpected context type"))?;

        Ok(Self {
            canvas,
            context,
            first_point: true,
        })
    }

    /// Wipe the canvas, then paint it with `css`
    pub fn clear(&self, css: &str) {
        let (width, height) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.context.clear_rect(0.0, 0.0, width, height);
        self.context.set_fill_style_str(css);
        self.context.fill_rect(0.0, 0.0, width, height);
    }

    /// Draw overlay lines from the top-left corner
    pub fn text(&self, lines: &[String], color: Color) -> Result<(), JsValue> {
        self.context.set_font(OVERLAY_FONT);
        self.context.set_fill_style_str(&color.to_css());
        for (i, line) in lines.iter().enumerate() {
            self.context.fill_text(line, 8.0, 20.0 + 18.0 * i as f64)?;
        }
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
        self.first_point = true;
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.viewport().to_screen(x, y, 1.0);
        if self.first_point {
            self.context.move_to(x, y);
            self.first_point = false;
        } else {
            self.context.line_to(x, y);
        }
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    fn fill(&mut self, color: Color) {
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill();
    }

    fn stroke(&mut self, color: Color) {
        self.context.set_stroke_style_str(&color.to_css());
        self.context.stroke();
    }
}

/// Browser entry point holding the scene and held keys
#[wasm_bindgen]
pub struct WebRenderer {
    camera: Camera,
    surface: CanvasSurface,
    input: InputState,
    controls: ControlConfig,
    minimap: Option<CanvasSurface>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Attach to the canvas with id `canvas_id` and load the demo scene
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebRenderer, JsValue> {
        let canvas = canvas_by_id(canvas_id)?;
        let camera = geometry::demo_scene().map_err(to_js)?;
        log::info!(
            "Attached to #{} ({}x{}) with {} objects",
            canvas_id,
            canvas.width(),
            canvas.height(),
            camera.objects().len()
        );

        Ok(WebRenderer {
            camera,
            surface: CanvasSurface::new(canvas)?,
            input: InputState::new(),
            controls: ControlConfig::default(),
            minimap: None,
        })
    }

    /// Show a top-down minimap on the canvas with id `canvas_id`
    pub fn attach_minimap(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let canvas = canvas_by_id(canvas_id)?;
        canvas.set_width(minimap::MINIMAP_SIZE);
        canvas.set_height(minimap::MINIMAP_SIZE);
        self.minimap = Some(CanvasSurface::new(canvas)?);
        Ok(())
    }

    /// Record a key press. Returns whether the key steers the camera, so
    /// the page can suppress the browser default.
    pub fn key_down(&mut self, code: &str) -> bool {
        match Action::from_key_code(code) {
            Some(action) => {
                self.input.press(action);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(action) = Action::from_key_code(code) {
            self.input.release(action);
        }
    }

    /// Advance by `dt_ms` milliseconds and draw one frame
    pub fn frame(&mut self, dt_ms: f64) -> Result<(), JsValue> {
        self.input
            .poll(&mut self.camera, dt_ms / 1000.0, &self.controls)
            .map_err(to_js)?;

        self.surface.clear(SKY);
        if let Err(e) = self.camera.render(&mut self.surface) {
            log::error!("Dropping frame: {}", e);
            return Ok(());
        }

        let frame = self.camera.frame();
        if let Some(map) = &mut self.minimap {
            map.clear(minimap::MINIMAP_BACKDROP);
            minimap::draw(map, frame).map_err(to_js)?;
        }
        self.surface.text(
            &[
                format!("Position: {}", frame.center),
                format!("Forward: {}", frame.forward),
            ],
            Color::BLACK,
        )
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).map_err(to_js)?;
    Ok(())
}
