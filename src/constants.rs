// Host-side DOM conventions

// Element shown instead of the canvas when a scene declines to start: `<canvas id>-fallback`
pub const FALLBACK_SUFFIX: &str = "-fallback";
pub const HIDDEN_CLASS: &str = "hidden";

// Canvas text
pub const SANS_FAMILY: &str = "Arial, sans-serif";
pub const MONO_FAMILY: &str = "'Fira Code', monospace";
pub const DASH_PATTERN: [f64; 2] = [6.0, 4.0];
