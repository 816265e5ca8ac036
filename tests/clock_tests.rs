// Host-side tests for the frame clock.

use scene_core::FrameClock;
use std::time::{Duration, Instant};

#[test]
fn first_tick_is_zero() {
    let mut clock = FrameClock::new();
    assert_eq!(clock.tick_at(Instant::now()), Duration::ZERO);
    assert_eq!(clock.frames(), 1);
}

#[test]
fn tick_returns_wall_delta() {
    let mut clock = FrameClock::new();
    let t0 = Instant::now();
    clock.tick_at(t0);
    let dt = clock.tick_at(t0 + Duration::from_millis(16));
    assert_eq!(dt, Duration::from_millis(16));
}

#[test]
fn long_gaps_are_capped() {
    let mut clock = FrameClock::new();
    let t0 = Instant::now();
    clock.tick_at(t0);
    let dt = clock.tick_at(t0 + Duration::from_secs(5));
    assert_eq!(dt, clock.max_dt());
    assert!((clock.scene_time() - dt.as_secs_f64()).abs() < 1e-9);
}

#[test]
fn time_going_backwards_yields_zero() {
    let mut clock = FrameClock::new();
    let t0 = Instant::now() + Duration::from_secs(1);
    clock.tick_at(t0);
    assert_eq!(clock.tick_at(t0 - Duration::from_millis(10)), Duration::ZERO);
}

#[test]
fn scene_time_is_monotonic_sum_of_steps() {
    let mut clock = FrameClock::new();
    let mut last = clock.scene_time();
    for ms in [16u64, 0, 33, 250, 8] {
        clock.advance(Duration::from_millis(ms));
        assert!(clock.scene_time() >= last);
        last = clock.scene_time();
    }
    // 250ms was capped to 100ms
    assert!((clock.scene_time() - 0.157).abs() < 1e-6);
    assert_eq!(clock.frames(), 5);
}
