//! Read-only "draw everything visible now" pass.
//!
//! The renderer never mutates scene state: it reads the surface snapshot,
//! layout, pool and statistics through a [`FrameView`] and issues calls on a
//! [`Canvas`]. Browser hosts implement `Canvas` over a 2D context; tests and
//! the headless runner record into a [`DrawList`].

use crate::camera::{Camera, Projected};
use crate::color::{Palette, Rgba};
use crate::constants::*;
use crate::easing::Path;
use crate::entity::{Entity, Lifecycle, Motion};
use crate::layout::{AnchorShape, Layout};
use crate::pool::EntityPool;
use crate::scene::SceneStats;
use crate::stage::StageMachine;
use crate::surface::Surface;
use glam::{Mat4, Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size_px: f32,
    pub bold: bool,
    pub monospace: bool,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn new(size_px: f32) -> Self {
        Self {
            size_px,
            bold: false,
            monospace: false,
            align: TextAlign::Center,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn monospace(mut self) -> Self {
        self.monospace = true;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// Drawing primitives a scene needs. Coordinates are CSS pixels; hosts map
/// them onto the backing store.
pub trait Canvas {
    fn clear(&mut self, width: f32, height: f32);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);
    fn fill_round_rect(&mut self, origin: Vec2, size: Vec2, radius: f32, color: Rgba);
    fn stroke_round_rect(&mut self, origin: Vec2, size: Vec2, radius: f32, color: Rgba, line_width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba, line_width: f32);
    /// Radial gradient from `color` at `inner` to transparent at `outer`.
    fn radial_glow(&mut self, center: Vec2, inner: f32, outer: f32, color: Rgba);
    fn stroke_polyline(&mut self, points: &[Vec2], color: Rgba, line_width: f32, dashed: bool);
    fn fill_text(&mut self, text: &str, at: Vec2, style: TextStyle, color: Rgba);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32 },
    FillRect { origin: Vec2, size: Vec2, color: Rgba },
    FillRoundRect { origin: Vec2, size: Vec2, radius: f32, color: Rgba },
    StrokeRoundRect { origin: Vec2, size: Vec2, radius: f32, color: Rgba, line_width: f32 },
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    StrokeCircle { center: Vec2, radius: f32, color: Rgba, line_width: f32 },
    RadialGlow { center: Vec2, inner: f32, outer: f32, color: Rgba },
    Polyline { points: Vec<Vec2>, color: Rgba, line_width: f32, dashed: bool },
    Text { text: String, at: Vec2, style: TextStyle, color: Rgba },
}

impl DrawCommand {
    /// All coordinates and sizes are finite.
    pub fn is_finite(&self) -> bool {
        match self {
            DrawCommand::Clear { width, height } => width.is_finite() && height.is_finite(),
            DrawCommand::FillRect { origin, size, .. } => origin.is_finite() && size.is_finite(),
            DrawCommand::FillRoundRect { origin, size, radius, .. }
            | DrawCommand::StrokeRoundRect { origin, size, radius, .. } => {
                origin.is_finite() && size.is_finite() && radius.is_finite()
            }
            DrawCommand::FillCircle { center, radius, .. }
            | DrawCommand::StrokeCircle { center, radius, .. } => center.is_finite() && radius.is_finite(),
            DrawCommand::RadialGlow { center, inner, outer, .. } => {
                center.is_finite() && inner.is_finite() && outer.is_finite()
            }
            DrawCommand::Polyline { points, .. } => points.iter().all(|p| p.is_finite()),
            DrawCommand::Text { at, .. } => at.is_finite(),
        }
    }
}

/// `Canvas` that records every call.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn all_finite(&self) -> bool {
        self.commands.iter().all(DrawCommand::is_finite)
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { origin, size, color });
    }
    fn fill_round_rect(&mut self, origin: Vec2, size: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillRoundRect {
            origin,
            size,
            radius,
            color,
        });
    }
    fn stroke_round_rect(&mut self, origin: Vec2, size: Vec2, radius: f32, color: Rgba, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRoundRect {
            origin,
            size,
            radius,
            color,
            line_width,
        });
    }
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba, line_width: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            line_width,
        });
    }
    fn radial_glow(&mut self, center: Vec2, inner: f32, outer: f32, color: Rgba) {
        self.commands.push(DrawCommand::RadialGlow {
            center,
            inner,
            outer,
            color,
        });
    }
    fn stroke_polyline(&mut self, points: &[Vec2], color: Rgba, line_width: f32, dashed: bool) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
            line_width,
            dashed,
        });
    }
    fn fill_text(&mut self, text: &str, at: Vec2, style: TextStyle, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            style,
            color,
        });
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Background {
    /// Wipe to transparent every frame.
    #[default]
    Clear,
    /// Opaque palette background.
    Solid,
    /// Translucent palette trail colour, leaving fading streaks.
    Trail,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Metric {
    /// `"<label>: <blocked count>"`.
    Blocked(String),
    /// `"<label>: <live population>"`.
    Population(String),
    /// `"<label>: <live authenticated entities>"`.
    Authenticated(String),
    /// Current stage name and progress.
    Stage,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneStyle {
    pub background: Background,
    /// Background grid spacing in pixels.
    pub grid: Option<f32>,
    pub title: Option<String>,
    pub metric: Option<Metric>,
}

/// 3D view state for scenes whose entities live in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub camera: Camera,
    /// Group rotation about Y (x component) and X (y component), radians.
    pub rotation: Vec2,
    /// Amplitude of the time-driven wave displacement, world units.
    pub wave: f32,
    /// Point radius in pixels at unit view depth.
    pub point_px: f32,
}

/// Everything the renderer may read for one frame.
pub struct FrameView<'a> {
    pub surface: &'a Surface,
    pub layout: &'a Layout,
    pub pool: &'a EntityPool,
    pub stage: Option<&'a StageMachine>,
    pub palette: &'a Palette,
    pub style: &'a SceneStyle,
    pub projection: Option<&'a Projection>,
    pub stats: &'a SceneStats,
    /// Scene time in seconds; drives pulses and colour phases.
    pub time: f64,
    pub show_overlay: bool,
}

pub fn render<C: Canvas + ?Sized>(canvas: &mut C, view: &FrameView<'_>) {
    draw_background(canvas, view);
    draw_connections(canvas, view);
    draw_anchors(canvas, view);
    match view.projection {
        Some(projection) => draw_projected_entities(canvas, view, projection),
        None => draw_entities(canvas, view),
    }
    if view.show_overlay {
        draw_overlay(canvas, view);
    }
}

fn current_stage(view: &FrameView<'_>) -> Option<usize> {
    view.stage.map(StageMachine::current_index)
}

fn draw_background<C: Canvas + ?Sized>(canvas: &mut C, view: &FrameView<'_>) {
    let size = view.surface.size();
    match view.style.background {
        Background::Clear => canvas.clear(size.x, size.y),
        Background::Solid => canvas.fill_rect(Vec2::ZERO, size, view.palette.background),
        Background::Trail => canvas.fill_rect(Vec2::ZERO, size, view.palette.trail),
    }
    if let Some(spacing) = view.style.grid.filter(|s| *s >= 2.0) {
        let mut x = 0.0;
        while x < size.x {
            canvas.stroke_polyline(&[Vec2::new(x, 0.0), Vec2::new(x, size.y)], view.palette.grid, 1.0, false);
            x += spacing;
        }
        let mut y = 0.0;
        while y < size.y {
            canvas.stroke_polyline(&[Vec2::new(0.0, y), Vec2::new(size.x, y)], view.palette.grid, 1.0, false);
            y += spacing;
        }
    }
}

fn path_points(path: &Path) -> Vec<Vec2> {
    match path {
        Path::Line { from, to } => vec![*from, *to],
        _ => path.polyline(PATH_SEGMENTS),
    }
}

fn draw_connections<C: Canvas + ?Sized>(canvas: &mut C, view: &FrameView<'_>) {
    let stage = current_stage(view);
    for conn in view.layout.connections() {
        let active = stage.map_or(true, |s| conn.stages.contains(s));
        let color = if active {
            conn.color.with_alpha(conn.color.a * 0.6)
        } else {
            view.palette.muted.with_alpha(0.2)
        };
        canvas.stroke_polyline(&path_points(&conn.path), color, 2.0, conn.dashed);
    }
}

fn draw_anchors<C: Canvas + ?Sized>(canvas: &mut C, view: &FrameView<'_>) {
    let stage = current_stage(view);
    let time = view.time as f32;
    for (i, anchor) in view.layout.anchors().iter().enumerate() {
        let active = stage.map_or(true, |s| anchor.stages.contains(s));
        let pulse = (time * 2.0 + i as f32).sin();
        let pos = anchor.position;
        match anchor.shape {
            AnchorShape::Label => {
                let (style, color) = if active && stage.is_some() {
                    (TextStyle::new(LABEL_FONT_PX + 2.0).bold(), anchor.color)
                } else {
                    (TextStyle::new(LABEL_FONT_PX), view.palette.muted)
                };
                if let Some(label) = &anchor.label {
                    canvas.fill_text(label, pos, style, color);
                }
                continue;
            }
            _ if !active => continue,
            AnchorShape::Dot { radius } => {
                canvas.fill_circle(pos, radius, anchor.color);
            }
            AnchorShape::Ring { radius, width } => {
                let r = (radius + pulse * SHIELD_PULSE_PX).max(1.0);
                canvas.stroke_circle(pos, r, anchor.color, width);
                canvas.radial_glow(pos, r * 0.8, r * 1.2, anchor.color.with_alpha(0.1));
            }
            AnchorShape::Box {
                width,
                height,
                corner,
            } => {
                let size = Vec2::new(width, height);
                canvas.fill_round_rect(pos - size / 2.0, size, corner, anchor.color);
                let halo = size + Vec2::splat(4.0 + pulse * 2.0);
                canvas.stroke_round_rect(pos - halo / 2.0, halo, corner, anchor.color.with_alpha(0.5), 1.0);
            }
        }
        if let Some(label) = &anchor.label {
            let at = match anchor.shape {
                AnchorShape::Box { .. } => pos,
                _ => pos + Vec2::new(0.0, anchor.shape.radius() + LABEL_FONT_PX + 4.0),
            };
            canvas.fill_text(label, at, TextStyle::new(LABEL_FONT_PX), view.palette.text);
        }
    }
}

/// Height-graded rain colour: green at the top, blue toward the bottom.
pub fn glyph_color(entity: &Entity, surface: &Surface) -> Rgba {
    let t = (entity.position.y / surface.height as f32).clamp(0.0, 1.0);
    let flicker = 0.8 + 0.2 * (0.5 + 0.5 * entity.phase.sin());
    Rgba::rgba(0, (255.0 - t * 100.0) as u8, (100.0 + t * 155.0) as u8, flicker)
}

fn draw_entities<C: Canvas + ?Sized>(canvas: &mut C, view: &FrameView<'_>) {
    for e in view.pool.iter().filter(|e| e.is_visible()) {
        let pos = e.xy();
        if let Some(glyph) = e.glyph {
            let mut buf = [0u8; 4];
            let style = TextStyle::new(e.size).monospace().align(TextAlign::Left);
            canvas.fill_text(glyph.encode_utf8(&mut buf), pos, style, glyph_color(e, view.surface));
            continue;
        }
        if let Motion::Orbit { center, .. } = &e.motion {
            draw_orbiter(canvas, e, center.truncate(), view.time as f32);
            continue;
        }
        canvas.fill_circle(pos, e.size, e.color);
        match e.lifecycle {
            Lifecycle::Blocked => {
                canvas.stroke_circle(pos, e.size + 5.0, Rgba::WHITE.with_alpha(0.8), 2.0);
            }
            Lifecycle::Active if e.phase_speed > 0.0 => {
                let halo = e.size * (1.6 + 0.4 * e.phase.sin());
                canvas.stroke_circle(pos, halo, e.color.with_alpha(0.3), 1.0);
            }
            _ => {}
        }
    }
}

/// Grey until authenticated, then tethered to its hub with a token running
/// along the tether.
fn draw_orbiter<C: Canvas + ?Sized>(canvas: &mut C, e: &Entity, hub: Vec2, time: f32) {
    let pos = e.xy();
    if e.lifecycle != Lifecycle::Authenticated {
        canvas.fill_circle(pos, e.size, Rgba::SILVER);
        return;
    }
    canvas.fill_circle(pos, e.size, e.color);
    canvas.stroke_polyline(&[pos, hub], e.color.with_alpha(0.3), 1.0, false);
    let t = (time * AUTH_TOKEN_RATE).fract();
    canvas.fill_circle(pos.lerp(hub, t), AUTH_TOKEN_RADIUS_PX, e.color);
}

fn draw_projected_entities<C: Canvas + ?Sized>(canvas: &mut C, view: &FrameView<'_>, projection: &Projection) {
    let view_projection = projection.camera.view_projection(view.surface)
        * Mat4::from_rotation_y(projection.rotation.x)
        * Mat4::from_rotation_x(projection.rotation.y);
    let time = view.time as f32;
    for e in view.pool.iter().filter(|e| e.is_visible()) {
        let p = e.position;
        let waved = Vec3::new(
            p.x + (time * 0.2 + p.z * 0.1).cos() * projection.wave,
            p.y + (time * 0.3 + p.x * 0.2).sin() * projection.wave,
            p.z,
        );
        let Some(Projected { screen, scale }) = Camera::project(&view_projection, view.surface, waved) else {
            continue;
        };
        let radius = (e.size * projection.point_px * scale).clamp(0.5, MAX_POINT_RADIUS_PX);
        let glow = 0.6 + 0.4 * (0.5 + 0.5 * e.phase.sin());
        canvas.fill_circle(screen, radius, e.color.with_alpha(glow));
    }
}

fn draw_overlay<C: Canvas + ?Sized>(canvas: &mut C, view: &FrameView<'_>) {
    let size = view.surface.size();
    if let Some(title) = &view.style.title {
        canvas.fill_text(
            title,
            Vec2::new(size.x / 2.0, 30.0),
            TextStyle::new(TITLE_FONT_PX).bold(),
            view.palette.primary.with_alpha(1.0),
        );
    }
    let metric_style = TextStyle::new(METRIC_FONT_PX).align(TextAlign::Left);
    match &view.style.metric {
        Some(Metric::Blocked(label)) => {
            let text = format!("{label}: {}", view.stats.blocked);
            canvas.fill_text(&text, Vec2::new(20.0, 30.0), metric_style, view.palette.text);
        }
        Some(Metric::Population(label)) => {
            let text = format!("{label}: {}", view.pool.len());
            canvas.fill_text(&text, Vec2::new(20.0, size.y - 20.0), metric_style, view.palette.text);
        }
        Some(Metric::Authenticated(label)) => {
            let live = view
                .pool
                .iter()
                .filter(|e| e.lifecycle == Lifecycle::Authenticated)
                .count();
            let text = format!("{label}: {live}");
            canvas.fill_text(&text, Vec2::new(20.0, size.y - 20.0), metric_style, view.palette.text);
        }
        Some(Metric::Stage) => {
            if let Some(stage) = view.stage {
                let text = format!(
                    "{} {:.0}%",
                    stage.current().name,
                    stage.progress() * 100.0
                );
                canvas.fill_text(&text, Vec2::new(20.0, size.y - 20.0), metric_style, view.palette.text);
            }
        }
        None => {}
    }
}
