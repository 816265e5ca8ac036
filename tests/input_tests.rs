// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use input::*;

#[test]
fn uv_maps_corners_and_center() {
    assert_eq!(uv_in_rect(0.0, 0.0, 200.0, 100.0), [0.0, 0.0]);
    assert_eq!(uv_in_rect(200.0, 100.0, 200.0, 100.0), [1.0, 1.0]);
    assert_eq!(uv_in_rect(100.0, 50.0, 200.0, 100.0), [0.5, 0.5]);
}

#[test]
fn uv_clamps_outside_the_box() {
    assert_eq!(uv_in_rect(-40.0, 500.0, 200.0, 100.0), [0.0, 1.0]);
}

#[test]
fn uv_of_empty_box_is_center() {
    assert_eq!(uv_in_rect(10.0, 10.0, 0.0, 100.0), [0.5, 0.5]);
    assert_eq!(uv_in_rect(10.0, 10.0, 100.0, 0.0), [0.5, 0.5]);
}
