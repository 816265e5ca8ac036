use web_sys as web;

/// Pointer position in normalized canvas coordinates, clamped to `0..=1`.
#[inline]
pub fn pointer_canvas_uv(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> [f32; 2] {
    let rect = canvas.get_bounding_client_rect();
    uv_in_rect(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

/// Position inside a `w` x `h` box as `[u, v]`; the centre for an empty box.
#[inline]
pub fn uv_in_rect(x_css: f32, y_css: f32, w: f32, h: f32) -> [f32; 2] {
    if w > 0.0 && h > 0.0 {
        [(x_css / w).clamp(0.0, 1.0), (y_css / h).clamp(0.0, 1.0)]
    } else {
        [0.5, 0.5]
    }
}
