//! Declarative spawn and cull rules, turned into entity specs at runtime.

use crate::color::{Palette, Rgba};
use crate::config::Density;
use crate::easing::Easing;
use crate::entity::{Entity, EntitySpec, Lifecycle, Motion};
use crate::layout::Layout;
use crate::pool::EntityPool;
use crate::surface::Surface;
use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::{PI, TAU};

pub const GLYPHS: &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ{}[]<>/*-+?!@#$%^&()=";

/// Inclusive-exclusive range sampled uniformly; degenerate ranges return `lo`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span(pub f32, pub f32);

impl Span {
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.1 > self.0 {
            rng.gen_range(self.0..self.1)
        } else {
            self.0
        }
    }
}

pub fn random_glyph<R: Rng>(rng: &mut R) -> char {
    let n = GLYPHS.chars().count();
    GLYPHS.chars().nth(rng.gen_range(0..n)).unwrap_or('0')
}

/// What a spawned entity looks like and how it moves.
#[derive(Clone, Debug, PartialEq)]
pub enum Template {
    /// Falling character on a column grid; speed in px/s.
    Glyph { speed: Span, spacing: f32 },
    /// Enters from a random edge and seeks `target`.
    Threat {
        target: String,
        speed: Span,
        size: Span,
        max_strength: u8,
    },
    /// Point on a 3D spherical shell, coloured between primary and secondary.
    Star { radius: Span, size: Span },
    /// Loops along the least-populated connection.
    Packet { speed: Span, size: f32 },
    /// Dispatched along every connection active in the stage just entered,
    /// each `stagger` of a trip behind the previous one.
    Courier { stagger: f32, size: f32 },
    /// Circles `center` at a random distance and authenticates once it is
    /// `authenticate_after` seconds old.
    Orbiter {
        center: String,
        distance: Span,
        size: Span,
        /// Radians per second.
        angular_speed: Span,
        authenticate_after: Span,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PopulationTarget {
    Fixed(usize),
    /// One entity per `spacing` pixels of surface width.
    PerColumn { spacing: f32 },
    /// This many per layout connection.
    PerConnection(usize),
    /// Share of the pool cap, scaled again by density.
    FractionOfCap(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Schedule {
    /// Steady rate, scaled by density.
    Rate { per_sec: f32 },
    /// Top the pool up to a target each frame.
    Maintain(PopulationTarget),
    /// Fire when the stage machine enters a new stage.
    OnStageEnter,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRule {
    pub template: Template,
    pub schedule: Schedule,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CullRule {
    /// Outside the surface grown by `margin`.
    OffSurface { margin: f32 },
    /// Below the bottom edge by more than `margin`.
    PastBottom { margin: f32 },
    Arrived,
    /// Blocked for at least this many seconds.
    BlockedFor(f32),
    Expired,
}

impl CullRule {
    pub fn matches(&self, entity: &Entity, surface: &Surface) -> bool {
        match *self {
            CullRule::OffSurface { margin } => !surface.contains(entity.position, margin),
            CullRule::PastBottom { margin } => entity.position.y > surface.height as f32 + margin,
            CullRule::Arrived => entity.lifecycle == Lifecycle::Arrived,
            CullRule::BlockedFor(secs) => {
                entity.lifecycle == Lifecycle::Blocked && entity.settled_for >= secs
            }
            CullRule::Expired => entity.is_expired(),
        }
    }
}

/// Read-only view of the scene handed to templates.
pub struct SpawnContext<'a> {
    pub surface: &'a Surface,
    pub layout: &'a Layout,
    pub palette: &'a Palette,
    pub density: Density,
    pub pool: &'a EntityPool,
    /// Index of the stage just entered and its duration in seconds.
    pub stage: Option<(usize, f32)>,
}

impl PopulationTarget {
    pub fn resolve(&self, ctx: &SpawnContext<'_>) -> usize {
        match *self {
            PopulationTarget::Fixed(n) => n,
            PopulationTarget::PerColumn { spacing } => {
                (ctx.surface.width as f32 / spacing.max(1.0)).floor() as usize
            }
            PopulationTarget::PerConnection(n) => ctx.layout.connections().len() * n,
            PopulationTarget::FractionOfCap(f) => {
                (ctx.pool.capacity() as f32 * f * ctx.density.fill_fraction()).round() as usize
            }
        }
    }
}

impl Template {
    /// Build up to `count` specs. Couriers ignore `count` and emit one per active connection.
    pub fn instantiate<R: Rng>(&self, ctx: &SpawnContext<'_>, rng: &mut R, count: usize) -> Vec<EntitySpec> {
        match self {
            Template::Courier { stagger, size } => couriers(ctx, *stagger, *size),
            Template::Packet { speed, size } => {
                let mut load = connection_load(ctx);
                (0..count)
                    .filter_map(|_| {
                        let index = load.iter().enumerate().min_by_key(|(_, n)| **n).map(|(i, _)| i)?;
                        load[index] += 1;
                        Some(packet(ctx, rng, index, *speed, *size))
                    })
                    .collect()
            }
            _ => (0..count).filter_map(|_| self.one(ctx, rng)).collect(),
        }
    }

    fn one<R: Rng>(&self, ctx: &SpawnContext<'_>, rng: &mut R) -> Option<EntitySpec> {
        let size = ctx.surface.size();
        match self {
            Template::Glyph { speed, spacing } => {
                let columns = (size.x / spacing.max(1.0)).floor().max(1.0) as u32;
                let x = rng.gen_range(0..columns) as f32 * spacing;
                let y = -rng.gen::<f32>() * size.y * 0.5;
                let velocity = Vec3::new(0.0, speed.sample(rng), 0.0);
                Some(
                    EntitySpec::new(Vec3::new(x, y, 0.0), Motion::Drift { velocity })
                        .size(*spacing)
                        .glyph(random_glyph(rng))
                        .phase(rng.gen::<f32>() * TAU, 6.0),
                )
            }
            Template::Threat {
                target,
                speed,
                size: radius,
                max_strength,
            } => {
                let anchor = ctx.layout.index_of(target)?;
                let goal = ctx.layout.anchors()[anchor].position;
                let r = radius.sample(rng);
                let start = match rng.gen_range(0..4) {
                    0 => Vec2::new(rng.gen::<f32>() * size.x, -r),
                    1 => Vec2::new(size.x + r, rng.gen::<f32>() * size.y),
                    2 => Vec2::new(rng.gen::<f32>() * size.x, size.y + r),
                    _ => Vec2::new(-r, rng.gen::<f32>() * size.y),
                };
                // Most threats are stopped by the outer ring, a few get deeper.
                let strength = (0..*max_strength).take_while(|_| rng.gen_bool(0.35)).count() as u8;
                Some(
                    EntitySpec::new(
                        start.extend(0.0),
                        Motion::Seek {
                            target: goal.extend(0.0),
                            speed: speed.sample(rng),
                            anchor: Some(anchor),
                        },
                    )
                    .size(r)
                    .color(ctx.palette.alert)
                    .strength(strength),
                )
            }
            Template::Star { radius, size } => {
                let r = radius.sample(rng);
                let theta = rng.gen::<f32>() * TAU;
                let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
                let position = Vec3::new(
                    r * phi.sin() * theta.cos(),
                    r * phi.sin() * theta.sin() - 2.0,
                    r * phi.cos(),
                );
                let mix = rng.gen::<f32>();
                Some(
                    EntitySpec::new(position, Motion::Drift { velocity: Vec3::ZERO })
                        .size(size.sample(rng))
                        .color(ctx.palette.primary.mix(ctx.palette.secondary, mix))
                        .phase(rng.gen::<f32>() * TAU, 0.3),
                )
            }
            Template::Orbiter {
                center,
                distance,
                size,
                angular_speed,
                authenticate_after,
            } => {
                let anchor = ctx.layout.index_of(center)?;
                let hub = ctx.layout.anchors()[anchor].position.extend(0.0);
                let motion = Motion::Orbit {
                    center: hub,
                    radius: distance.sample(rng),
                    angle: rng.gen::<f32>() * TAU,
                    angular_speed: angular_speed.sample(rng),
                    anchor: Some(anchor),
                };
                Some(
                    EntitySpec::new(hub, motion)
                        .size(size.sample(rng))
                        .color(ctx.palette.secondary)
                        .authenticate_after(authenticate_after.sample(rng)),
                )
            }
            Template::Packet { .. } | Template::Courier { .. } => None,
        }
    }
}

fn connection_load(ctx: &SpawnContext<'_>) -> Vec<usize> {
    let mut load = vec![0usize; ctx.layout.connections().len()];
    for e in ctx.pool.iter() {
        if let Motion::Follow {
            connection: Some(c), ..
        } = e.motion
        {
            if let Some(n) = load.get_mut(c) {
                *n += 1;
            }
        }
    }
    load
}

fn packet<R: Rng>(ctx: &SpawnContext<'_>, rng: &mut R, index: usize, speed: Span, size: f32) -> EntitySpec {
    let conn = &ctx.layout.connections()[index];
    EntitySpec::new(
        conn.path.start().extend(0.0),
        Motion::Follow {
            path: conn.path,
            progress: rng.gen::<f32>(),
            speed: speed.sample(rng),
            easing: Easing::Linear,
            looping: true,
            connection: Some(index),
        },
    )
    .size(size)
    .color(conn.color.with_alpha(1.0))
    .phase(rng.gen::<f32>() * PI, 4.0)
}

fn couriers(ctx: &SpawnContext<'_>, stagger: f32, size: f32) -> Vec<EntitySpec> {
    let Some((stage, duration)) = ctx.stage else {
        return Vec::new();
    };
    let active: Vec<usize> = ctx
        .layout
        .connections()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.stages.contains(stage))
        .map(|(i, _)| i)
        .collect();
    if active.is_empty() {
        return Vec::new();
    }
    let stagger = stagger.max(0.0);
    // The last courier still lands before the stage ends.
    let speed = (1.0 + stagger * (active.len() - 1) as f32) / duration.max(f32::EPSILON);
    active
        .into_iter()
        .enumerate()
        .map(|(ordinal, index)| {
            let conn = &ctx.layout.connections()[index];
            EntitySpec::new(
                conn.path.start().extend(0.0),
                Motion::Follow {
                    path: conn.path,
                    progress: -(ordinal as f32) * stagger,
                    speed,
                    easing: Easing::InOutQuad,
                    looping: false,
                    connection: Some(index),
                },
            )
            .size(size)
            .color(blend_towards_white(conn.color))
        })
        .collect()
}

fn blend_towards_white(color: Rgba) -> Rgba {
    color.with_alpha(1.0).mix(Rgba::WHITE, 0.15)
}
