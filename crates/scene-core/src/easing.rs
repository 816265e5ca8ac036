//! Stateless interpolation along curves between fixed points.
//!
//! All curve functions use the Bernstein form, so `t = 0` and `t = 1`
//! reproduce the first and last control points exactly. `t` is clamped to
//! `[0, 1]`; NaN is treated as 0.

use glam::{Vec2, Vec3};
use std::f32::consts::PI;
use std::ops::{Add, Mul};

/// Anything that can be weighted and summed: `Vec2` and `Vec3`.
pub trait Point: Copy + Add<Output = Self> + Mul<f32, Output = Self> {}

impl Point for Vec2 {}
impl Point for Vec3 {}

#[inline]
pub fn clamp_unit(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

#[inline]
pub fn lerp<P: Point>(a: P, b: P, t: f32) -> P {
    let t = clamp_unit(t);
    a * (1.0 - t) + b * t
}

#[inline]
pub fn quadratic_bezier<P: Point>(p0: P, p1: P, p2: P, t: f32) -> P {
    let t = clamp_unit(t);
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

#[inline]
pub fn cubic_bezier<P: Point>(p0: P, p1: P, p2: P, p3: P, t: f32) -> P {
    let t = clamp_unit(t);
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Scalar easing curves applied to a normalized progress value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    OutCubic,
    InOutSine,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = clamp_unit(t);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Easing::Linear => t,
            Easing::InQuad => t * t,
            Easing::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::OutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

/// A parametric 2D curve with exact endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Path {
    Line {
        from: Vec2,
        to: Vec2,
    },
    Quadratic {
        from: Vec2,
        ctrl: Vec2,
        to: Vec2,
    },
    Cubic {
        from: Vec2,
        c1: Vec2,
        c2: Vec2,
        to: Vec2,
    },
    /// Straight travel lifted by a half-sine arc of `height` pixels.
    Hop {
        from: Vec2,
        to: Vec2,
        height: f32,
    },
}

impl Path {
    /// Cubic whose control points sit at the vertical midpoint: leaves `from`
    /// heading down and enters `to` heading down.
    pub fn s_curve(from: Vec2, to: Vec2) -> Self {
        let mid_y = from.y + (to.y - from.y) / 2.0;
        Path::Cubic {
            from,
            c1: Vec2::new(from.x, mid_y),
            c2: Vec2::new(to.x, mid_y),
            to,
        }
    }

    /// Quadratic bowed sideways by `offset` pixels, perpendicular to the chord.
    pub fn bend(from: Vec2, to: Vec2, offset: f32) -> Self {
        let mid = (from + to) * 0.5;
        let normal = (to - from).perp().normalize_or_zero();
        Path::Quadratic {
            from,
            ctrl: mid + normal * offset,
            to,
        }
    }

    pub fn point_at(&self, t: f32) -> Vec2 {
        match *self {
            Path::Line { from, to } => lerp(from, to, t),
            Path::Quadratic { from, ctrl, to } => quadratic_bezier(from, ctrl, to, t),
            Path::Cubic { from, c1, c2, to } => cubic_bezier(from, c1, c2, to, t),
            Path::Hop { from, to, height } => {
                let t = clamp_unit(t);
                if t == 0.0 {
                    return from;
                }
                if t == 1.0 {
                    return to;
                }
                lerp(from, to, t) - Vec2::new(0.0, (t * PI).sin() * height)
            }
        }
    }

    pub fn start(&self) -> Vec2 {
        self.point_at(0.0)
    }

    pub fn end(&self) -> Vec2 {
        self.point_at(1.0)
    }

    /// `segments + 1` evenly spaced points, endpoints included.
    pub fn polyline(&self, segments: usize) -> Vec<Vec2> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }

    pub fn approx_length(&self, segments: usize) -> f32 {
        self.polyline(segments)
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }
}
