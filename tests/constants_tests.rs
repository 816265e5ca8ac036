// Host-side tests for constants and their relationships.

use scene_core::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    assert!(MAX_FRAME_DT_SEC > 0.0 && MAX_FRAME_DT_SEC <= 0.25);
    assert!(DEFAULT_PARTICLE_COUNT > 0 && DEFAULT_PARTICLE_COUNT <= MAX_PARTICLE_COUNT);
    assert!(MAX_DEVICE_PIXEL_RATIO >= 1.0);
    assert!(PARALLAX_TAU_SEC > 0.0);
    assert!(BLOCKED_LINGER_SEC > 0.0);
    assert!(LOW_DENSITY_FILL_FRACTION > 0.0 && LOW_DENSITY_FILL_FRACTION <= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn high_density_is_denser_than_low() {
    assert!(HIGH_DENSITY_SPACING_PX < LOW_DENSITY_SPACING_PX);
    assert!(HIGH_DENSITY_RATE_MULTIPLIER > 1.0);
    assert!(Density::High.spacing() < Density::Low.spacing());
    assert!(Density::High.fill_fraction() > Density::Low.fill_fraction());
}

#[test]
fn default_config_uses_default_constants() {
    let config = SceneConfig::default();
    assert_eq!(config.particle_count, DEFAULT_PARTICLE_COUNT);
    assert_eq!(config.resize_debounce_ms, DEFAULT_RESIZE_DEBOUNCE_MS);
}
