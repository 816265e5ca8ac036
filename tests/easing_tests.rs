// Host-side tests for interpolation and paths.
// Property-style checks use seeded random control points.

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene_core::*;

fn rand_vec2(rng: &mut StdRng) -> Vec2 {
    Vec2::new(rng.gen_range(-5000.0..5000.0), rng.gen_range(-5000.0..5000.0))
}

#[test]
fn bezier_endpoints_are_exact() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..1000 {
        let (a, b, c, d) = (
            rand_vec2(&mut rng),
            rand_vec2(&mut rng),
            rand_vec2(&mut rng),
            rand_vec2(&mut rng),
        );
        assert_eq!(lerp(a, d, 0.0), a);
        assert_eq!(lerp(a, d, 1.0), d);
        assert_eq!(quadratic_bezier(a, b, d, 0.0), a);
        assert_eq!(quadratic_bezier(a, b, d, 1.0), d);
        assert_eq!(cubic_bezier(a, b, c, d, 0.0), a);
        assert_eq!(cubic_bezier(a, b, c, d, 1.0), d);
    }
}

#[test]
fn bezier_endpoints_are_exact_in_3d() {
    let a = Vec3::new(1.5, -2.25, 9.0);
    let b = Vec3::new(-3.0, 4.0, 0.1);
    let c = Vec3::new(0.3, 0.3, 0.3);
    let d = Vec3::new(-7.0, 1e4, -1e-3);
    assert_eq!(cubic_bezier(a, b, c, d, 0.0), a);
    assert_eq!(cubic_bezier(a, b, c, d, 1.0), d);
}

#[test]
fn parameter_is_clamped_and_nan_safe() {
    let a = Vec2::new(0.0, 0.0);
    let b = Vec2::new(10.0, 20.0);
    assert_eq!(lerp(a, b, -1.0), a);
    assert_eq!(lerp(a, b, 2.0), b);
    assert_eq!(lerp(a, b, f32::NAN), a);
    assert_eq!(lerp(a, b, 0.5), Vec2::new(5.0, 10.0));
}

#[test]
fn paths_start_and_end_on_their_endpoints() {
    let from = Vec2::new(80.0, 80.0);
    let to = Vec2::new(640.0, 80.0);
    let paths = [
        Path::Line { from, to },
        Path::s_curve(from, Vec2::new(300.0, 400.0)),
        Path::bend(from, to, 30.0),
        Path::Hop { from, to, height: 50.0 },
    ];
    for path in paths {
        assert_eq!(path.start(), from);
        assert!(path.end().is_finite());
        let pts = path.polyline(PATH_SEGMENTS);
        assert_eq!(pts.len(), PATH_SEGMENTS + 1);
        assert_eq!(pts[0], path.start());
        assert_eq!(pts[PATH_SEGMENTS], path.end());
    }
}

#[test]
fn hop_arcs_above_the_chord() {
    let path = Path::Hop {
        from: Vec2::new(0.0, 100.0),
        to: Vec2::new(200.0, 100.0),
        height: 50.0,
    };
    let mid = path.point_at(0.5);
    assert!((mid.x - 100.0).abs() < 1e-3);
    assert!((mid.y - 50.0).abs() < 1e-3);
    assert_eq!(path.end(), Vec2::new(200.0, 100.0));
}

#[test]
fn s_curve_control_points_sit_at_mid_height() {
    let Path::Cubic { c1, c2, .. } = Path::s_curve(Vec2::new(100.0, 0.0), Vec2::new(300.0, 200.0)) else {
        panic!("s_curve must be cubic");
    };
    assert_eq!(c1, Vec2::new(100.0, 100.0));
    assert_eq!(c2, Vec2::new(300.0, 100.0));
}

#[test]
fn easing_curves_fix_endpoints_and_stay_in_range() {
    let curves = [
        Easing::Linear,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::OutCubic,
        Easing::InOutSine,
    ];
    for e in curves {
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(1.0), 1.0);
        for i in 0..=100 {
            let v = e.apply(i as f32 / 100.0);
            assert!((0.0..=1.0).contains(&v), "{e:?} at {i}: {v}");
        }
    }
}

#[test]
fn approx_length_of_line_matches_distance() {
    let path = Path::Line {
        from: Vec2::ZERO,
        to: Vec2::new(30.0, 40.0),
    };
    assert!((path.approx_length(8) - 50.0).abs() < 1e-3);
}
