use crate::color::Rgba;
use crate::easing::{Easing, Path};
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

pub type EntityId = u64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Active,
    /// Stopped by an obstacle; frozen in place until culled.
    Blocked,
    /// Reached its target or the end of a non-looping path.
    Arrived,
    /// Passed its timed check-in; keeps moving.
    Authenticated,
}

impl Lifecycle {
    /// States in which motion keeps integrating.
    pub fn is_moving(&self) -> bool {
        matches!(self, Lifecycle::Active | Lifecycle::Authenticated)
    }
}

/// How an entity moves. Every variant integrates from elapsed seconds only.
#[derive(Clone, Debug, PartialEq)]
pub enum Motion {
    /// Constant velocity in pixels (or world units) per second.
    Drift { velocity: Vec3 },
    /// Straight-line pursuit of a point at `speed` units per second.
    Seek {
        target: Vec3,
        speed: f32,
        /// Layout anchor the target was taken from, re-read on relayout.
        anchor: Option<usize>,
    },
    /// Travel along a path; `progress` advances by `speed` per second and is
    /// shaped by `easing` before sampling the path. Negative progress holds
    /// the entity hidden at the start of the path.
    Follow {
        path: Path,
        progress: f32,
        speed: f32,
        easing: Easing,
        looping: bool,
        /// Layout connection the path came from, re-read on relayout.
        connection: Option<usize>,
    },
    /// Circular motion in the XY plane; `angular_speed` in radians per second.
    Orbit {
        center: Vec3,
        radius: f32,
        angle: f32,
        angular_speed: f32,
        /// Layout anchor the center was taken from, re-read on relayout.
        anchor: Option<usize>,
    },
}

/// Everything needed to create one entity; the pool assigns the id.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySpec {
    pub position: Vec3,
    pub motion: Motion,
    pub size: f32,
    pub color: Rgba,
    pub phase: f32,
    pub phase_speed: f32,
    pub glyph: Option<char>,
    pub lifetime: Option<f32>,
    /// Obstacles this entity can pass through before it is blocked.
    pub strength: u8,
    /// Age in seconds at which an active entity becomes authenticated.
    pub authenticate_after: Option<f32>,
}

impl EntitySpec {
    pub fn new(position: Vec3, motion: Motion) -> Self {
        Self {
            position,
            motion,
            size: 2.0,
            color: Rgba::WHITE,
            phase: 0.0,
            phase_speed: 0.0,
            glyph: None,
            lifetime: None,
            strength: 0,
            authenticate_after: None,
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn phase(mut self, phase: f32, phase_speed: f32) -> Self {
        self.phase = phase;
        self.phase_speed = phase_speed;
        self
    }

    pub fn glyph(mut self, glyph: char) -> Self {
        self.glyph = Some(glyph);
        self
    }

    pub fn lifetime(mut self, seconds: f32) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    pub fn strength(mut self, strength: u8) -> Self {
        self.strength = strength;
        self
    }

    pub fn authenticate_after(mut self, seconds: f32) -> Self {
        self.authenticate_after = Some(seconds);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec3,
    pub motion: Motion,
    pub size: f32,
    pub color: Rgba,
    pub phase: f32,
    pub phase_speed: f32,
    pub glyph: Option<char>,
    pub age: f32,
    pub lifetime: Option<f32>,
    pub lifecycle: Lifecycle,
    /// Seconds spent in the current non-active lifecycle state.
    pub settled_for: f32,
    pub strength: u8,
    pub authenticate_after: Option<f32>,
}

impl Entity {
    pub fn from_spec(id: EntityId, spec: EntitySpec) -> Self {
        let mut entity = Self {
            id,
            position: spec.position,
            motion: spec.motion,
            size: spec.size,
            color: spec.color,
            phase: spec.phase,
            phase_speed: spec.phase_speed,
            glyph: spec.glyph,
            age: 0.0,
            lifetime: spec.lifetime,
            lifecycle: Lifecycle::Active,
            settled_for: 0.0,
            strength: spec.strength,
            authenticate_after: spec.authenticate_after,
        };
        entity.place();
        entity
    }

    pub fn xy(&self) -> Vec2 {
        self.position.truncate()
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime.is_some_and(|l| self.age >= l)
    }

    /// False while a follower is still waiting at negative progress.
    pub fn is_visible(&self) -> bool {
        !matches!(self.motion, Motion::Follow { progress, .. } if progress < 0.0)
    }

    /// Active and old enough to pass its timed check-in.
    pub fn is_due_for_authentication(&self) -> bool {
        self.lifecycle == Lifecycle::Active && self.authenticate_after.is_some_and(|t| self.age >= t)
    }

    pub fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        if self.lifecycle != lifecycle {
            self.lifecycle = lifecycle;
            self.settled_for = 0.0;
        }
    }

    /// Advance by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.age += dt;
        self.phase += self.phase_speed * dt;
        if self.lifecycle != Lifecycle::Active {
            self.settled_for += dt;
        }
        if !self.lifecycle.is_moving() {
            return;
        }
        let mut arrived = false;
        match &mut self.motion {
            Motion::Drift { velocity } => {
                self.position += *velocity * dt;
            }
            Motion::Seek { target, speed, .. } => {
                let to_target = *target - self.position;
                let dist = to_target.length();
                let travel = *speed * dt;
                if dist <= travel {
                    self.position = *target;
                    arrived = true;
                } else {
                    self.position += to_target / dist * travel;
                }
            }
            Motion::Follow {
                progress,
                speed,
                looping,
                ..
            } => {
                *progress += *speed * dt;
                if *looping {
                    if *progress >= 1.0 {
                        *progress = progress.rem_euclid(1.0);
                    }
                } else if *progress >= 1.0 {
                    *progress = 1.0;
                    arrived = true;
                }
            }
            Motion::Orbit {
                angle,
                angular_speed,
                ..
            } => {
                *angle = (*angle + *angular_speed * dt).rem_euclid(TAU);
            }
        }
        self.place();
        if arrived {
            self.set_lifecycle(Lifecycle::Arrived);
        }
    }

    /// Derive position for motions whose position is a function of their state.
    fn place(&mut self) {
        match &self.motion {
            Motion::Follow {
                path, progress, easing, ..
            } => {
                self.position = path.point_at(easing.apply(*progress)).extend(self.position.z);
            }
            Motion::Orbit {
                center,
                radius,
                angle,
                ..
            } => {
                self.position = *center + Vec3::new(angle.cos(), angle.sin(), 0.0) * *radius;
            }
            Motion::Drift { .. } | Motion::Seek { .. } => {}
        }
    }

    /// Swap in a fresh path or target after the layout was rebuilt.
    pub fn rebind(&mut self, path_for: impl Fn(usize) -> Option<Path>, anchor_at: impl Fn(usize) -> Option<Vec2>) {
        match &mut self.motion {
            Motion::Follow {
                path,
                connection: Some(c),
                ..
            } => {
                if let Some(p) = path_for(*c) {
                    *path = p;
                }
            }
            Motion::Seek {
                target,
                anchor: Some(a),
                ..
            } => {
                if let Some(pos) = anchor_at(*a) {
                    *target = pos.extend(target.z);
                }
            }
            Motion::Orbit {
                center,
                anchor: Some(a),
                ..
            } => {
                if let Some(pos) = anchor_at(*a) {
                    *center = pos.extend(center.z);
                }
            }
            _ => {}
        }
        self.place();
    }
}
