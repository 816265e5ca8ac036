// Shared tuning constants for every scene and host.

// Frame pacing
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // caps the jump after a backgrounded tab resumes

// Population
pub const DEFAULT_PARTICLE_COUNT: usize = 2500;
pub const MAX_PARTICLE_COUNT: usize = 100_000;

// Surface
pub const MAX_DEVICE_PIXEL_RATIO: f32 = 2.0;
pub const MAX_SURFACE_CSS_PX: f32 = 8192.0; // larger boxes are clamped, backing stays under 16k
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u32 = 150;

// Density tiers
pub const LOW_DENSITY_SPACING_PX: f32 = 16.0;
pub const HIGH_DENSITY_SPACING_PX: f32 = 12.0;
pub const HIGH_DENSITY_RATE_MULTIPLIER: f32 = 2.0;
pub const LOW_DENSITY_FILL_FRACTION: f32 = 0.4; // share of the cap a static field fills at low density

// Pointer parallax
pub const PARALLAX_TAU_SEC: f32 = 0.5; // exponential easing time constant
pub const PARALLAX_ROTATION_RAD: f32 = 0.1; // group rotation at the surface edge
pub const PARALLAX_CAMERA_SHIFT: f32 = 0.2; // camera offset at the surface edge

// Rendering
pub const PATH_SEGMENTS: usize = 24; // polyline resolution for curved connections
pub const LABEL_FONT_PX: f32 = 12.0;
pub const TITLE_FONT_PX: f32 = 16.0;
pub const METRIC_FONT_PX: f32 = 14.0;
pub const MAX_POINT_RADIUS_PX: f32 = 8.0; // projected points right in front of the camera

// Security scene
pub const BLOCKED_LINGER_SEC: f32 = 0.3; // blocked threats stay visible this long
pub const SHIELD_PULSE_PX: f32 = 4.0;

// Identity scene
pub const IDENTITY_ORBITERS: usize = 20; // low density; doubled at high
pub const IDENTITY_SPOKE_PX: f32 = 110.0; // identity-type bubbles around the directory
pub const AUTH_TOKEN_RATE: f32 = 1.2; // token trips per second, orbiter to hub
pub const AUTH_TOKEN_RADIUS_PX: f32 = 3.0;
