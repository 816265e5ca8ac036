// End-to-end scene tests: fixed-step runs of every built-in scene.

use glam::Vec2;
use scene_core::*;
use std::time::Duration;

const STEP: Duration = Duration::from_millis(16);

fn config(scene: SceneKind) -> SceneConfig {
    SceneConfig {
        scene,
        seed: Some(1234),
        ..SceneConfig::default()
    }
}

fn run(scene: &mut Scene, frames: usize) {
    for _ in 0..frames {
        scene.step(STEP);
    }
}

#[test]
fn high_density_soak_stays_bounded_and_finite() {
    for kind in SceneKind::ALL {
        let cfg = SceneConfig {
            particle_count: 5000,
            density: Density::High,
            ..config(kind)
        };
        let mut scene = Scene::new(cfg, 1280.0, 720.0, 2.0).unwrap();
        let mut canvas = DrawList::new();
        for frame in 0..1000 {
            scene.step(STEP);
            let live = scene.pool().len();
            assert!(live <= 5000, "{kind:?} frame {frame}: {live} live");
            assert!(
                scene
                    .pool()
                    .iter()
                    .all(|e| e.position.is_finite() && e.phase.is_finite()),
                "{kind:?} frame {frame}: non-finite entity"
            );
            if frame % 50 == 0 {
                canvas.clear_commands();
                scene.render(&mut canvas);
                assert!(canvas.all_finite(), "{kind:?} frame {frame}: non-finite draw");
            }
        }
        assert_eq!(scene.stats().frames, 1000);
        assert!(scene.stats().spawned > 0, "{kind:?} never spawned");
    }
}

#[test]
fn stop_is_idempotent_and_final() {
    let mut scene = Scene::new(config(SceneKind::Matrix), 800.0, 600.0, 1.0).unwrap();
    run(&mut scene, 10);
    scene.stop();
    scene.stop();
    assert!(!scene.is_running());

    let frames = scene.stats().frames;
    scene.step(STEP);
    assert_eq!(scene.stats().frames, frames);
    assert!(!scene.tick());

    let mut canvas = DrawList::new();
    assert!(!scene.frame(&mut canvas));
    assert!(canvas.is_empty());
    assert!(!scene.resize(1024.0, 768.0, 1.0));
}

#[test]
fn resize_rebuilds_layout_before_the_next_frame() {
    let cfg = SceneConfig {
        resize_debounce_ms: 0,
        ..config(SceneKind::Security)
    };
    let mut scene = Scene::new(cfg, 800.0, 600.0, 1.0).unwrap();
    run(&mut scene, 5);
    assert_eq!(scene.layout().anchor("core").unwrap().position, Vec2::new(400.0, 300.0));

    assert!(scene.resize(1000.0, 500.0, 1.0));
    scene.step(STEP);
    assert_eq!(scene.surface().width, 1000);
    assert!(!scene.layout().is_stale(&scene.surface()));
    assert_eq!(scene.layout().anchor("core").unwrap().position, Vec2::new(500.0, 250.0));

    // Seeking threats were retargeted onto the moved core.
    for e in scene.pool().iter() {
        if let Motion::Seek { target, .. } = e.motion {
            assert_eq!(target.truncate(), Vec2::new(500.0, 250.0));
        }
    }
}

#[test]
fn debounced_resize_keeps_old_size_until_settled() {
    let mut scene = Scene::new(config(SceneKind::Dataflow), 800.0, 600.0, 1.0).unwrap();
    scene.resize(640.0, 480.0, 1.0);
    run(&mut scene, 3);
    assert_eq!(scene.surface().width, 800);
    run(&mut scene, 10);
    assert_eq!(scene.surface().width, 640);
    assert!(!scene.layout().is_stale(&scene.surface()));
}

#[test]
fn render_does_not_mutate_the_scene() {
    let mut scene = Scene::new(config(SceneKind::Security), 800.0, 600.0, 1.0).unwrap();
    run(&mut scene, 300);
    let stats = scene.stats();
    let positions: Vec<_> = scene.pool().iter().map(|e| e.position).collect();

    let mut first = DrawList::new();
    let mut second = DrawList::new();
    scene.render(&mut first);
    scene.render(&mut second);

    assert_eq!(first.commands(), second.commands());
    assert_eq!(scene.stats(), stats);
    let after: Vec<_> = scene.pool().iter().map(|e| e.position).collect();
    assert_eq!(positions, after);
}

#[test]
fn shields_block_threats() {
    let mut scene = Scene::new(config(SceneKind::Security), 800.0, 600.0, 1.0).unwrap();
    run(&mut scene, 1200);
    let stats = scene.stats();
    assert!(stats.blocked > 0);
    assert!(stats.culled > 0);
    let mut canvas = DrawList::new();
    scene.render(&mut canvas);
    let label = format!("Threats Blocked: {}", stats.blocked);
    assert!(canvas.texts().any(|t| t == label));
}

#[test]
fn pipeline_cycles_and_couriers_arrive() {
    let mut scene = Scene::new(config(SceneKind::Pipeline), 1024.0, 600.0, 1.0).unwrap();
    assert_eq!(scene.stage().map(|s| s.name.as_str()), Some("Build"));
    assert_eq!(scene.pool().len(), 1);
    run(&mut scene, 600);
    let stats = scene.stats();
    assert!(stats.stage_cycles >= 1);
    assert!(stats.arrived > 0);
    assert!(scene.pool().iter().all(|e| e.lifecycle != Lifecycle::Arrived));
}

#[test]
fn matrix_fills_one_glyph_per_column() {
    let mut scene = Scene::new(config(SceneKind::Matrix), 800.0, 600.0, 1.0).unwrap();
    run(&mut scene, 120);
    let columns = (800.0 / Density::Low.spacing()) as usize;
    assert_eq!(scene.pool().len(), columns);
    assert!(scene.pool().iter().all(|e| e.glyph.is_some()));
}

#[test]
fn starfield_fills_share_of_cap_by_density() {
    let mut low = Scene::new(config(SceneKind::Starfield), 800.0, 600.0, 1.0).unwrap();
    low.step(STEP);
    assert_eq!(low.pool().len(), 1000);

    let cfg = SceneConfig {
        density: Density::High,
        ..config(SceneKind::Starfield)
    };
    let mut high = Scene::new(cfg, 800.0, 600.0, 1.0).unwrap();
    high.step(STEP);
    assert_eq!(high.pool().len(), DEFAULT_PARTICLE_COUNT);
}

#[test]
fn parallax_easing_is_frame_rate_independent() {
    let mut coarse = Scene::new(config(SceneKind::Starfield), 800.0, 600.0, 1.0).unwrap();
    let mut fine = Scene::new(config(SceneKind::Starfield), 800.0, 600.0, 1.0).unwrap();
    coarse.set_pointer(1.0, 0.25);
    fine.set_pointer(1.0, 0.25);
    coarse.step(Duration::from_millis(100));
    for _ in 0..10 {
        fine.step(Duration::from_millis(10));
    }
    assert!(coarse.parallax().distance(fine.parallax()) < 1e-4);
    assert!(coarse.parallax().x > 0.0 && coarse.parallax().y < 0.0);

    run(&mut coarse, 300);
    let rotation = coarse.projection().unwrap().rotation;
    assert!((rotation.x - PARALLAX_ROTATION_RAD).abs() < 1e-3);
}

#[test]
fn invalid_config_declines_to_start() {
    let cfg = SceneConfig {
        particle_count: 0,
        ..SceneConfig::default()
    };
    assert!(Scene::new(cfg, 800.0, 600.0, 1.0).is_err());
}

#[test]
fn layout_and_motion_are_independent_of_pixel_ratio() {
    for kind in [SceneKind::Security, SceneKind::Matrix, SceneKind::Pipeline, SceneKind::Identity] {
        let mut sharp = Scene::new(config(kind), 800.0, 600.0, 2.0).unwrap();
        let mut plain = Scene::new(config(kind), 800.0, 600.0, 1.0).unwrap();
        assert_eq!(sharp.surface().backing_size(), (1600, 1200));
        assert_eq!((sharp.surface().width, sharp.surface().height), (800, 600));
        run(&mut sharp, 120);
        run(&mut plain, 120);
        let mut a = DrawList::new();
        let mut b = DrawList::new();
        sharp.render(&mut a);
        plain.render(&mut b);
        assert_eq!(a.commands(), b.commands(), "{kind:?}");
    }
}

#[test]
fn shield_rings_keep_their_share_of_the_surface_at_high_dpr() {
    let scene = Scene::new(config(SceneKind::Security), 800.0, 600.0, 2.0).unwrap();
    let ring = scene.layout().anchor("shield-3").unwrap().shape.radius();
    assert_eq!(ring / scene.surface().width as f32, 0.2);
}

#[test]
fn identity_orbiters_authenticate_over_time() {
    let mut scene = Scene::new(config(SceneKind::Identity), 800.0, 600.0, 1.0).unwrap();
    scene.step(STEP);
    assert_eq!(scene.pool().len(), IDENTITY_ORBITERS);
    let hub = scene.layout().anchor("directory").unwrap().position;

    // Every check-in is due within eight seconds.
    run(&mut scene, 600);
    assert_eq!(scene.pool().len(), IDENTITY_ORBITERS);
    assert!(scene.pool().iter().all(|e| e.lifecycle == Lifecycle::Authenticated));
    assert_eq!(scene.stats().authenticated, IDENTITY_ORBITERS as u64);
    for e in scene.pool().iter() {
        let d = e.xy().distance(hub);
        assert!((119.9..=200.1).contains(&d), "orbit distance {d}");
    }

    let mut canvas = DrawList::new();
    scene.render(&mut canvas);
    let label = format!("Users authenticated: {IDENTITY_ORBITERS}");
    assert!(canvas.texts().any(|t| t == label));
}

#[test]
fn identity_doubles_orbiters_at_high_density() {
    let cfg = SceneConfig {
        density: Density::High,
        ..config(SceneKind::Identity)
    };
    let mut scene = Scene::new(cfg, 800.0, 600.0, 1.0).unwrap();
    scene.step(STEP);
    assert_eq!(scene.pool().len(), IDENTITY_ORBITERS * 2);
}

#[test]
fn explicit_resize_skips_the_debounce_window() {
    let mut scene = Scene::new(config(SceneKind::Identity), 800.0, 600.0, 1.0).unwrap();
    run(&mut scene, 3);
    assert!(scene.resize_now(1000.0, 400.0, 1.0));
    assert_eq!(scene.surface().width, 800);

    scene.step(STEP);
    assert_eq!(scene.surface().width, 1000);
    let hub = Vec2::new(500.0, 200.0);
    assert_eq!(scene.layout().anchor("directory").unwrap().position, hub);
    for e in scene.pool().iter() {
        let Motion::Orbit { center, radius, .. } = e.motion else {
            panic!("expected orbit motion");
        };
        assert_eq!(center.truncate(), hub);
        assert!((e.xy().distance(hub) - radius).abs() < 1e-2);
    }
}
