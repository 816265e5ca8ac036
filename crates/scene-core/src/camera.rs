//! Perspective projection of 3D entity positions onto the 2D surface.

use crate::surface::Surface;
use glam::{Mat4, Vec2, Vec3};

/// Right-handed camera with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy_radians: 70f32.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

/// Where a world-space point lands on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub screen: Vec2,
    /// Size multiplier: `1 / view depth`, like `gl_PointSize` attenuation.
    pub scale: f32,
}

impl Camera {
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self, surface: &Surface) -> Mat4 {
        self.projection_matrix(surface.aspect()) * self.view_matrix()
    }

    /// Project with a precomputed `view_projection`. `None` behind the camera.
    pub fn project(view_projection: &Mat4, surface: &Surface, world: Vec3) -> Option<Projected> {
        let clip = *view_projection * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }
        let size = surface.size();
        Some(Projected {
            screen: Vec2::new((ndc.x * 0.5 + 0.5) * size.x, (0.5 - ndc.y * 0.5) * size.y),
            scale: 1.0 / clip.w,
        })
    }
}
