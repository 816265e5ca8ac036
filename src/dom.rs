use anyhow::{anyhow, Context};
use scene_core::{SceneError, Surface};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn canvas_by_id(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .with_context(|| format!("missing #{id}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| anyhow!("#{id} is not a canvas"))
}

/// 2D context, or `ContextUnavailable` when the browser refuses one.
pub fn context_2d(canvas: &web::HtmlCanvasElement) -> Result<web::CanvasRenderingContext2d, SceneError> {
    canvas
        .get_context("2d")
        .map_err(|e| SceneError::ContextUnavailable(format!("{e:?}")))?
        .ok_or_else(|| SceneError::ContextUnavailable("2d context not supported".into()))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|_| SceneError::ContextUnavailable("unexpected context type".into()))
}

/// Layout size of the canvas in CSS pixels.
pub fn css_size(canvas: &web::HtmlCanvasElement) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (rect.width(), rect.height())
}

pub fn device_pixel_ratio() -> f64 {
    web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

/// Match the canvas backing store to a committed surface. Setting the size
/// clears the canvas, so only touch it when it actually differs.
pub fn apply_backing_size(canvas: &web::HtmlCanvasElement, surface: &Surface) {
    let (width, height) = surface.backing_size();
    if canvas.width() != width {
        canvas.set_width(width);
    }
    if canvas.height() != height {
        canvas.set_height(height);
    }
}
