use crate::constants::{DASH_PATTERN, MONO_FAMILY, SANS_FAMILY};
use glam::Vec2;
use scene_core::{Canvas, Rgba, Surface, TextAlign, TextStyle};
use std::f64::consts::TAU;
use wasm_bindgen::JsValue;
use web_sys as web;

/// `Canvas` over a browser 2D context. Scenes draw in CSS pixels; the context
/// transform maps them onto the backing store.
pub struct Canvas2d {
    ctx: web::CanvasRenderingContext2d,
    dash: js_sys::Array,
    solid: js_sys::Array,
}

impl Canvas2d {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        let dash = DASH_PATTERN.iter().map(|d| JsValue::from_f64(*d)).collect();
        Self {
            ctx,
            dash,
            solid: js_sys::Array::new(),
        }
    }

    /// Reset per-frame context state. Resizing the canvas wipes the
    /// transform, so this runs before every render.
    pub fn begin_frame(&self, surface: &Surface) {
        let ratio = surface.pixel_ratio as f64;
        let _ = self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
        self.ctx.set_text_baseline("middle");
    }

    fn round_rect_path(&self, origin: Vec2, size: Vec2, radius: f32) {
        let (x, y, w, h) = (origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
        let r = (radius as f64).min(w / 2.0).min(h / 2.0).max(0.0);
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
        let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
        let _ = ctx.arc_to(x, y + h, x, y, r);
        let _ = ctx.arc_to(x, y, x + w, y, r);
        ctx.close_path();
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
    }
}

impl Canvas for Canvas2d {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_round_rect(&mut self, origin: Vec2, size: Vec2, radius: f32, color: Rgba) {
        self.round_rect_path(origin, size, radius);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_round_rect(&mut self, origin: Vec2, size: Vec2, radius: f32, color: Rgba, line_width: f32) {
        self.round_rect_path(origin, size, radius);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.circle_path(center, radius);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba, line_width: f32) {
        self.circle_path(center, radius);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn radial_glow(&mut self, center: Vec2, inner: f32, outer: f32, color: Rgba) {
        let (x, y) = (center.x as f64, center.y as f64);
        let Ok(gradient) = self
            .ctx
            .create_radial_gradient(x, y, inner.max(0.0) as f64, x, y, outer.max(inner) as f64)
        else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, &color.to_css());
        let _ = gradient.add_color_stop(1.0, &color.with_alpha(0.0).to_css());
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.circle_path(center, outer);
        self.ctx.fill();
    }

    fn stroke_polyline(&mut self, points: &[Vec2], color: Rgba, line_width: f32, dashed: bool) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            ctx.line_to(p.x as f64, p.y as f64);
        }
        ctx.set_stroke_style_str(&color.to_css());
        ctx.set_line_width(line_width as f64);
        if dashed {
            let _ = ctx.set_line_dash(&self.dash);
        }
        ctx.stroke();
        if dashed {
            let _ = ctx.set_line_dash(&self.solid);
        }
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: TextStyle, color: Rgba) {
        let family = if style.monospace { MONO_FAMILY } else { SANS_FAMILY };
        let weight = if style.bold { "bold " } else { "" };
        let px = style.size_px.round();
        self.ctx.set_font(&format!("{weight}{px}px {family}"));
        self.ctx.set_text_align(match style.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        self.ctx.set_fill_style_str(&color.to_css());
        let _ = self.ctx.fill_text(text, at.x as f64, at.y as f64);
    }
}
