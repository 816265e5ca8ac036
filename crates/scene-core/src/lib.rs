//! Platform-independent real-time animation core.
//!
//! Nothing in this crate touches a browser API. A host (the WASM front-end or
//! the headless runner) owns the drawing target and the frame callback, and
//! drives a [`Scene`] once per display refresh:
//! clock tick, surface snapshot, entity update, then a read-only render pass
//! into any [`Canvas`] implementation.

pub mod camera;
pub mod clock;
pub mod color;
pub mod config;
pub mod constants;
pub mod easing;
pub mod entity;
pub mod error;
pub mod layout;
pub mod pool;
pub mod presets;
pub mod render;
pub mod scene;
pub mod spawn;
pub mod stage;
pub mod surface;

pub use camera::*;
pub use clock::*;
pub use color::*;
pub use config::*;
pub use constants::*;
pub use easing::*;
pub use entity::*;
pub use error::*;
pub use layout::*;
pub use pool::*;
pub use render::*;
pub use scene::*;
pub use spawn::*;
pub use stage::*;
pub use surface::*;
