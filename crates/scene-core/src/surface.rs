//! Drawing-surface dimensions and debounced resize handling.

use crate::constants::{MAX_DEVICE_PIXEL_RATIO, MAX_SURFACE_CSS_PX};
use glam::{Vec2, Vec3};

/// Drawing target size in CSS pixels, the unit every scene lays out and moves
/// in. The backing store is this size times `pixel_ratio`. `generation` bumps
/// on every committed change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
    pub generation: u64,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        let max = MAX_SURFACE_CSS_PX as u32;
        Self {
            width: width.clamp(1, max),
            height: height.clamp(1, max),
            pixel_ratio: 1.0,
            generation: 0,
        }
    }

    /// Surface for a CSS box at the given device pixel ratio.
    pub fn from_css(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            pixel_ratio: clamp_pixel_ratio(device_pixel_ratio),
            ..Self::new(css_extent(css_width), css_extent(css_height))
        }
    }

    /// Canvas backing-store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    pub fn min_extent(&self) -> f32 {
        self.width.min(self.height) as f32
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// True when `pos` lies within the surface grown by `margin` on every side.
    pub fn contains(&self, pos: Vec3, margin: f32) -> bool {
        pos.x >= -margin
            && pos.y >= -margin
            && pos.x <= self.width as f32 + margin
            && pos.y <= self.height as f32 + margin
    }

    pub fn same_size(&self, other: &Surface) -> bool {
        self.width == other.width && self.height == other.height
    }
}

fn css_extent(v: f64) -> u32 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, MAX_SURFACE_CSS_PX as f64).round() as u32
}

fn clamp_pixel_ratio(dpr: f64) -> f32 {
    if dpr.is_finite() && dpr > 0.0 {
        (dpr as f32).min(MAX_DEVICE_PIXEL_RATIO)
    } else {
        1.0
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingResize {
    surface: Surface,
    requested_at: f64,
}

/// Result of capturing the surface at the start of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSurface {
    pub surface: Surface,
    /// A resize was committed for this frame; cached layout must be rebuilt.
    pub resized: bool,
}

/// Single writer of the [`Surface`]. Resize requests are coalesced and only
/// committed at the start of a frame, after `debounce` seconds without a newer
/// request.
#[derive(Clone, Debug)]
pub struct SurfaceManager {
    current: Surface,
    pending: Option<PendingResize>,
    debounce: f64,
    torn_down: bool,
}

impl SurfaceManager {
    pub fn new(initial: Surface, debounce_sec: f64) -> Self {
        Self {
            current: initial,
            pending: None,
            debounce: debounce_sec.max(0.0),
            torn_down: false,
        }
    }

    pub fn current(&self) -> Surface {
        self.current
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Record a host size change. Ignored (returns false) after teardown.
    pub fn request_resize(&mut self, css_width: f64, css_height: f64, dpr: f64, now: f64) -> bool {
        if self.torn_down {
            return false;
        }
        let surface = Surface::from_css(css_width, css_height, dpr);
        self.pending = Some(PendingResize {
            surface,
            requested_at: now,
        });
        true
    }

    /// Snapshot the surface for this frame, committing a settled resize first.
    pub fn begin_frame(&mut self, now: f64) -> FrameSurface {
        let settled = self
            .pending
            .is_some_and(|p| now - p.requested_at >= self.debounce);
        let resized = settled && self.commit();
        FrameSurface {
            surface: self.current,
            resized,
        }
    }

    /// Commit any pending resize immediately, ignoring the debounce window.
    pub fn flush(&mut self) -> bool {
        !self.torn_down && self.commit()
    }

    /// Drop pending work and refuse further resizes.
    pub fn shutdown(&mut self) {
        self.torn_down = true;
        self.pending = None;
    }

    fn commit(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let next = pending.surface;
        if next.same_size(&self.current) && next.pixel_ratio == self.current.pixel_ratio {
            return false;
        }
        let generation = self.current.generation + 1;
        self.current = Surface { generation, ..next };
        log::debug!(
            "[surface] resized to {}x{} @{} (gen {})",
            self.current.width,
            self.current.height,
            self.current.pixel_ratio,
            generation
        );
        true
    }
}
