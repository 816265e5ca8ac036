//! One self-contained animation instance.
//!
//! A [`Scene`] owns its clock, pool, surface manager, layout and random
//! source. Hosts call [`Scene::frame`] once per display refresh (or
//! [`Scene::step`] with a fixed delta) and forward resize and pointer events.
//! Per frame the order is strict: tick, surface snapshot and relayout, stage
//! advance, spawn, update, interactions, cull, render.

use crate::clock::FrameClock;
use crate::color::Palette;
use crate::config::{SceneConfig, SceneKind};
use crate::constants::*;
use crate::entity::{EntitySpec, Lifecycle, Motion};
use crate::error::SceneResult;
use crate::layout::{AnchorShape, Layout};
use crate::pool::EntityPool;
use crate::presets::{Interaction, SceneDef};
use crate::render::{self, Canvas, FrameView, Projection};
use crate::spawn::{random_glyph, Schedule, SpawnContext};
use crate::stage::{Stage, StageMachine};
use crate::surface::{Surface, SurfaceManager};
use glam::{Vec2, Vec3};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;
use std::time::Duration;

/// Running counters. Read-only to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub spawned: u64,
    pub culled: u64,
    /// Entities stopped by an obstacle.
    pub blocked: u64,
    /// Entities culled after reaching their target.
    pub arrived: u64,
    /// Entities that passed their timed check-in.
    pub authenticated: u64,
    /// Spawn requests lost to the population cap.
    pub dropped: u64,
    pub frames: u64,
    pub stage_cycles: u64,
}

pub struct Scene {
    config: SceneConfig,
    def: SceneDef,
    palette: Palette,
    clock: FrameClock,
    pool: EntityPool,
    surfaces: SurfaceManager,
    surface: Surface,
    layout: Layout,
    stages: Option<StageMachine>,
    rng: StdRng,
    /// Fractional spawns carried between frames, one slot per spawn rule.
    carry: Vec<f32>,
    pointer: Vec2,
    parallax: Vec2,
    projection: Option<Projection>,
    stats: SceneStats,
    running: bool,
}

impl Scene {
    /// Build a scene for a surface of `css_width` x `css_height` CSS pixels.
    pub fn new(config: SceneConfig, css_width: f64, css_height: f64, device_pixel_ratio: f64) -> SceneResult<Self> {
        config.validate()?;
        let palette = config.palette()?;
        let def = SceneDef::build(config.scene, &palette, config.density);
        let surface = Surface::from_css(css_width, css_height, device_pixel_ratio);
        let layout = Layout::build(&def.layout, &surface)?;
        let stages = if def.stages.is_empty() {
            None
        } else {
            Some(StageMachine::new(def.stages.iter().cloned())?)
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut scene = Self {
            pool: EntityPool::with_policy(config.particle_count, config.overflow),
            surfaces: SurfaceManager::new(surface, config.resize_debounce_sec()),
            carry: vec![0.0; def.spawns.len()],
            projection: def.projection.clone(),
            clock: FrameClock::new(),
            surface,
            layout,
            stages,
            rng,
            palette,
            def,
            config,
            pointer: Vec2::ZERO,
            parallax: Vec2::ZERO,
            stats: SceneStats::default(),
            running: true,
        };
        if let Some(first) = scene.stages.as_ref().map(|s| s.current_index()) {
            scene.spawn_entries(&[first]);
        }
        info!(
            "[scene] mounted {} at {}x{} @{} (cap {}, {:?} density)",
            scene.config.scene.name(),
            surface.width,
            surface.height,
            surface.pixel_ratio,
            scene.config.particle_count,
            scene.config.density
        );
        Ok(scene)
    }

    /// Forward a host size change. Committed at the start of a later frame.
    pub fn resize(&mut self, css_width: f64, css_height: f64, device_pixel_ratio: f64) -> bool {
        self.surfaces
            .request_resize(css_width, css_height, device_pixel_ratio, self.clock.scene_time())
    }

    /// Like [`resize`](Self::resize) but skips the debounce window: the new
    /// size is committed at the start of the next frame.
    pub fn resize_now(&mut self, css_width: f64, css_height: f64, device_pixel_ratio: f64) -> bool {
        self.resize(css_width, css_height, device_pixel_ratio) && self.surfaces.flush()
    }

    /// Pointer position in normalized surface coordinates (`0..=1` on both axes).
    pub fn set_pointer(&mut self, u: f32, v: f32) {
        if !u.is_finite() || !v.is_finite() {
            return;
        }
        self.pointer = Vec2::new(u.clamp(0.0, 1.0) * 2.0 - 1.0, v.clamp(0.0, 1.0) * 2.0 - 1.0);
    }

    /// Fixed-step update without drawing.
    pub fn step(&mut self, dt: Duration) {
        if !self.running {
            return;
        }
        let dt = self.clock.advance(dt);
        self.update(dt);
    }

    /// Tick the wall clock and update. Returns false once stopped.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let dt = self.clock.tick();
        self.update(dt);
        true
    }

    /// [`tick`](Self::tick), then draw.
    pub fn frame<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> bool {
        if !self.tick() {
            return false;
        }
        self.render(canvas);
        true
    }

    /// Draw the current state. Never mutates the scene.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let view = FrameView {
            surface: &self.surface,
            layout: &self.layout,
            pool: &self.pool,
            stage: self.stages.as_ref(),
            palette: &self.palette,
            style: &self.def.style,
            projection: self.projection.as_ref(),
            stats: &self.stats,
            time: self.clock.scene_time(),
            show_overlay: self.config.show_overlay,
        };
        render::render(canvas, &view);
    }

    /// Stop for good. Pending resizes are dropped and later calls are ignored.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.surfaces.shutdown();
        info!(
            "[scene] stopped {} after {} frames ({} live)",
            self.config.scene.name(),
            self.stats.frames,
            self.pool.len()
        );
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn kind(&self) -> SceneKind {
        self.config.scene
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Surface captured at the start of the latest frame.
    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    pub fn stage(&self) -> Option<&Stage> {
        self.stages.as_ref().map(StageMachine::current)
    }

    pub fn scene_time(&self) -> f64 {
        self.clock.scene_time()
    }

    pub fn parallax(&self) -> Vec2 {
        self.parallax
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// One step: commit resize, advance stages, spawn, move, interact, cull,
    /// then ease the pointer parallax.
    fn update(&mut self, dt: Duration) {
        let dt_sec = dt.as_secs_f32();

        let frame = self.surfaces.begin_frame(self.clock.scene_time());
        self.surface = frame.surface;
        if self.layout.is_stale(&self.surface) {
            self.relayout();
        }

        let mut entered: SmallVec<[usize; 2]> = SmallVec::new();
        if let Some(stages) = self.stages.as_mut() {
            entered.extend(stages.advance(dt_sec).into_iter().map(|t| t.to));
            self.stats.stage_cycles = stages.cycles();
        }

        self.spawn_scheduled(dt_sec);
        if !entered.is_empty() {
            self.spawn_entries(&entered);
        }
        self.flicker(dt_sec);
        self.pool.update(dt);
        self.interact();
        self.cull();
        self.ease_parallax(dt_sec);

        self.stats.frames = self.clock.frames();
        self.stats.dropped = self.pool.dropped();
    }

    fn relayout(&mut self) {
        match Layout::build(&self.def.layout, &self.surface) {
            Ok(layout) => {
                self.layout = layout;
                self.pool.rebind(&self.layout);
                info!(
                    "[scene] layout rebuilt for {}x{} (gen {})",
                    self.surface.width, self.surface.height, self.surface.generation
                );
            }
            Err(e) => warn!("[scene] keeping previous layout: {e}"),
        }
    }

    fn spawn_scheduled(&mut self, dt: f32) {
        let ctx = SpawnContext {
            surface: &self.surface,
            layout: &self.layout,
            palette: &self.palette,
            density: self.config.density,
            pool: &self.pool,
            stage: None,
        };
        let room = self.pool.capacity().saturating_sub(self.pool.len());
        let mut specs = Vec::new();
        for (rule, carry) in self.def.spawns.iter().zip(self.carry.iter_mut()) {
            let count = match rule.schedule {
                Schedule::Rate { per_sec } => {
                    *carry += per_sec * dt;
                    let whole = carry.floor();
                    *carry -= whole;
                    whole as usize
                }
                Schedule::Maintain(target) => target.resolve(&ctx).saturating_sub(ctx.pool.len()).min(room),
                Schedule::OnStageEnter => 0,
            };
            if count > 0 {
                specs.extend(rule.template.instantiate(&ctx, &mut self.rng, count));
            }
        }
        self.admit(specs);
    }

    fn spawn_entries(&mut self, entered: &[usize]) {
        let Some(stages) = self.stages.as_ref() else {
            return;
        };
        let mut specs = Vec::new();
        for &index in entered {
            let duration = stages.stages()[index].duration;
            let ctx = SpawnContext {
                surface: &self.surface,
                layout: &self.layout,
                palette: &self.palette,
                density: self.config.density,
                pool: &self.pool,
                stage: Some((index, duration)),
            };
            for rule in &self.def.spawns {
                if rule.schedule == Schedule::OnStageEnter {
                    specs.extend(rule.template.instantiate(&ctx, &mut self.rng, 1));
                }
            }
        }
        self.admit(specs);
    }

    fn admit(&mut self, specs: Vec<EntitySpec>) {
        for spec in specs {
            if self.pool.spawn(spec).is_some() {
                self.stats.spawned += 1;
            }
        }
    }

    fn flicker(&mut self, dt: f32) {
        if self.def.glyph_flicker <= 0.0 {
            return;
        }
        let chance = (self.def.glyph_flicker * dt).clamp(0.0, 1.0) as f64;
        for entity in self.pool.iter_mut() {
            if entity.glyph.is_some() && self.rng.gen_bool(chance) {
                entity.glyph = Some(random_glyph(&mut self.rng));
            }
        }
    }

    fn interact(&mut self) {
        if self.def.interaction == Interaction::Authenticate {
            self.authenticate();
            return;
        }
        let Interaction::Shields { core, rings } = &self.def.interaction else {
            return;
        };
        let Some(core_index) = self.layout.index_of(core) else {
            return;
        };
        let center = self.layout.anchors()[core_index].position;
        let radii: SmallVec<[f32; 4]> = rings
            .iter()
            .filter_map(|name| self.layout.anchor(name))
            .filter_map(|a| match a.shape {
                AnchorShape::Ring { radius, .. } => Some(radius),
                _ => None,
            })
            .collect();
        let mut blocked = 0;
        for entity in self.pool.iter_mut() {
            let seeking_core = matches!(entity.motion, Motion::Seek { anchor: Some(a), .. } if a == core_index);
            if !seeking_core || entity.lifecycle != Lifecycle::Active {
                continue;
            }
            let dist = entity.xy().distance(center);
            let crossed = radii.iter().filter(|r| dist < **r + entity.size).count();
            if crossed > entity.strength as usize {
                entity.set_lifecycle(Lifecycle::Blocked);
                blocked += 1;
            }
        }
        if blocked > 0 {
            debug!("[scene] {blocked} threat(s) blocked");
        }
        self.stats.blocked += blocked;
    }

    fn authenticate(&mut self) {
        let mut flipped = 0;
        for entity in self.pool.iter_mut().filter(|e| e.is_due_for_authentication()) {
            entity.set_lifecycle(Lifecycle::Authenticated);
            flipped += 1;
        }
        self.stats.authenticated += flipped;
    }

    fn cull(&mut self) {
        let rules = &self.def.culls;
        let surface = self.surface;
        let mut arrived = 0;
        let removed = self.pool.cull(|e| {
            let hit = rules.iter().any(|r| r.matches(e, &surface));
            if hit && e.lifecycle == Lifecycle::Arrived {
                arrived += 1;
            }
            hit
        });
        self.stats.culled += removed as u64;
        self.stats.arrived += arrived;
    }

    fn ease_parallax(&mut self, dt: f32) {
        let alpha = 1.0 - (-dt / PARALLAX_TAU_SEC).exp();
        self.parallax += (self.pointer - self.parallax) * alpha;
        if let (Some(projection), Some(base)) = (self.projection.as_mut(), self.def.projection.as_ref()) {
            projection.rotation = Vec2::new(self.parallax.x, self.parallax.y) * PARALLAX_ROTATION_RAD;
            projection.camera.eye = base.camera.eye
                + Vec3::new(self.parallax.x, -self.parallax.y, 0.0) * PARALLAX_CAMERA_SHIFT;
        }
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.stop();
    }
}
