// Host-side tests for the entity pool: cap, cull, frame-rate independence.

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene_core::*;
use std::time::Duration;

fn drifter(x: f32, vx: f32) -> EntitySpec {
    EntitySpec::new(
        Vec3::new(x, 0.0, 0.0),
        Motion::Drift {
            velocity: Vec3::new(vx, vx * 0.5, 0.0),
        },
    )
}

fn follower(progress: f32, speed: f32, looping: bool) -> EntitySpec {
    EntitySpec::new(
        Vec3::ZERO,
        Motion::Follow {
            path: Path::s_curve(Vec2::new(0.0, 0.0), Vec2::new(200.0, 300.0)),
            progress,
            speed,
            easing: Easing::Linear,
            looping,
            connection: None,
        },
    )
}

#[test]
fn spawning_beyond_cap_never_exceeds_it() {
    let mut rng = StdRng::seed_from_u64(3);
    for policy in [OverflowPolicy::DropNewest, OverflowPolicy::EvictOldest] {
        let cap = rng.gen_range(1..200);
        let mut pool = EntityPool::with_policy(cap, policy);
        for i in 0..(cap * 3) {
            pool.spawn(drifter(i as f32, 1.0));
            assert!(pool.len() <= cap);
        }
        assert_eq!(pool.len(), cap);
        assert_eq!(pool.dropped(), (cap * 2) as u64);
    }
}

#[test]
fn drop_newest_keeps_the_first_spawns() {
    let mut pool = EntityPool::with_policy(2, OverflowPolicy::DropNewest);
    let a = pool.spawn(drifter(0.0, 1.0));
    let b = pool.spawn(drifter(1.0, 1.0));
    assert!(pool.spawn(drifter(2.0, 1.0)).is_none());
    let ids: Vec<_> = pool.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![a.unwrap(), b.unwrap()]);
}

#[test]
fn evict_oldest_keeps_the_latest_spawns() {
    let mut pool = EntityPool::with_policy(2, OverflowPolicy::EvictOldest);
    pool.spawn(drifter(0.0, 1.0));
    let b = pool.spawn(drifter(1.0, 1.0)).unwrap();
    let c = pool.spawn(drifter(2.0, 1.0)).unwrap();
    let ids: Vec<_> = pool.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![b, c]);
}

#[test]
fn zero_capacity_drops_everything() {
    let mut pool = EntityPool::new(0);
    assert!(pool.spawn(drifter(0.0, 1.0)).is_none());
    assert!(pool.is_empty());
    assert_eq!(pool.dropped(), 1);
}

#[test]
fn shrinking_capacity_evicts_oldest() {
    let mut pool = EntityPool::new(10);
    for i in 0..10 {
        pool.spawn(drifter(i as f32, 1.0));
    }
    pool.set_capacity(4);
    assert_eq!(pool.len(), 4);
    assert_eq!(pool.iter().next().map(|e| e.id), Some(6));
}

#[test]
fn after_cull_no_entity_matches_predicate() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut pool = EntityPool::new(500);
    for _ in 0..500 {
        pool.spawn(drifter(rng.gen_range(-100.0..100.0), rng.gen_range(-50.0..50.0)));
    }
    pool.update(Duration::from_millis(500));
    let before = pool.len();
    let removed = pool.cull(|e| e.position.x < 0.0);
    assert_eq!(pool.len() + removed, before);
    assert!(pool.iter().all(|e| e.position.x >= 0.0));
}

#[test]
fn one_long_step_equals_many_short_steps() {
    let mut coarse = EntityPool::new(64);
    let mut fine = EntityPool::new(64);
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..32 {
        let x = rng.gen_range(0.0..500.0);
        let v = rng.gen_range(-300.0..300.0);
        coarse.spawn(drifter(x, v));
        fine.spawn(drifter(x, v));
    }
    coarse.update(Duration::from_millis(100));
    for _ in 0..10 {
        fine.update(Duration::from_millis(10));
    }
    for (a, b) in coarse.iter().zip(fine.iter()) {
        assert!(a.position.distance(b.position) < 1e-3, "{:?} vs {:?}", a.position, b.position);
        assert!((a.age - b.age).abs() < 1e-5);
    }
}

#[test]
fn followers_are_frame_rate_independent() {
    let mut coarse = EntityPool::new(4);
    let mut fine = EntityPool::new(4);
    coarse.spawn(follower(0.1, 0.5, false));
    fine.spawn(follower(0.1, 0.5, false));
    coarse.update(Duration::from_millis(100));
    for _ in 0..10 {
        fine.update(Duration::from_millis(10));
    }
    let (a, b) = (coarse.iter().next().unwrap(), fine.iter().next().unwrap());
    assert!(a.position.distance(b.position) < 1e-3);
}

#[test]
fn non_looping_follower_arrives_at_path_end() {
    let mut pool = EntityPool::new(1);
    pool.spawn(follower(0.0, 1.0, false));
    pool.update(Duration::from_millis(1500));
    let e = pool.iter().next().unwrap();
    assert_eq!(e.lifecycle, Lifecycle::Arrived);
    assert_eq!(e.xy(), Vec2::new(200.0, 300.0));
}

#[test]
fn looping_follower_wraps_and_stays_active() {
    let mut pool = EntityPool::new(1);
    pool.spawn(follower(0.9, 0.5, true));
    pool.update(Duration::from_millis(400));
    let e = pool.iter().next().unwrap();
    assert_eq!(e.lifecycle, Lifecycle::Active);
    let Motion::Follow { progress, .. } = e.motion else {
        panic!("expected follow motion");
    };
    assert!((progress - 0.1).abs() < 1e-4);
}

#[test]
fn waiting_follower_is_hidden_at_path_start() {
    let mut pool = EntityPool::new(1);
    pool.spawn(follower(-0.5, 1.0, false));
    let e = pool.iter().next().unwrap();
    assert!(!e.is_visible());
    assert_eq!(e.xy(), Vec2::ZERO);
    pool.update(Duration::from_millis(600));
    assert!(pool.iter().next().unwrap().is_visible());
}

#[test]
fn seek_stops_on_target() {
    let mut pool = EntityPool::new(1);
    pool.spawn(EntitySpec::new(
        Vec3::new(0.0, 0.0, 0.0),
        Motion::Seek {
            target: Vec3::new(30.0, 40.0, 0.0),
            speed: 100.0,
            anchor: None,
        },
    ));
    pool.update(Duration::from_millis(250));
    let e = pool.iter().next().unwrap();
    assert!((e.position.length() - 25.0).abs() < 1e-3);
    pool.update(Duration::from_millis(500));
    let e = pool.iter().next().unwrap();
    assert_eq!(e.position, Vec3::new(30.0, 40.0, 0.0));
    assert_eq!(e.lifecycle, Lifecycle::Arrived);
}

#[test]
fn blocked_entities_freeze_but_keep_aging() {
    let mut pool = EntityPool::new(1);
    pool.spawn(drifter(0.0, 100.0));
    for e in pool.iter_mut() {
        e.set_lifecycle(Lifecycle::Blocked);
    }
    pool.update(Duration::from_millis(200));
    let e = pool.iter().next().unwrap();
    assert_eq!(e.position, Vec3::ZERO);
    assert!((e.settled_for - 0.2).abs() < 1e-5);
    assert!(CullRule::BlockedFor(0.15).matches(e, &Surface::new(100, 100)));
}

fn orbiter(angular_speed: f32) -> EntitySpec {
    EntitySpec::new(
        Vec3::ZERO,
        Motion::Orbit {
            center: Vec3::new(100.0, 100.0, 0.0),
            radius: 50.0,
            angle: 0.0,
            angular_speed,
            anchor: None,
        },
    )
}

#[test]
fn orbit_is_frame_rate_independent() {
    let mut coarse = EntityPool::new(1);
    let mut fine = EntityPool::new(1);
    coarse.spawn(orbiter(0.9));
    fine.spawn(orbiter(0.9));
    for _ in 0..10 {
        coarse.update(Duration::from_millis(100));
    }
    for _ in 0..100 {
        fine.update(Duration::from_millis(10));
    }
    let a = coarse.iter().next().unwrap().xy();
    let b = fine.iter().next().unwrap().xy();
    assert!(a.distance(b) < 1e-3);
    let expected = Vec2::new(100.0 + 50.0 * 0.9f32.cos(), 100.0 + 50.0 * 0.9f32.sin());
    assert!(a.distance(expected) < 1e-3);
}

#[test]
fn orbiter_starts_on_its_circle() {
    let mut pool = EntityPool::new(1);
    pool.spawn(orbiter(1.0));
    assert_eq!(pool.iter().next().unwrap().xy(), Vec2::new(150.0, 100.0));
}

#[test]
fn timed_check_in_keeps_orbiters_moving() {
    let mut pool = EntityPool::new(1);
    pool.spawn(orbiter(1.0).authenticate_after(0.5));
    pool.update(Duration::from_millis(400));
    assert!(!pool.iter().next().unwrap().is_due_for_authentication());

    pool.update(Duration::from_millis(200));
    let e = pool.iter_mut().next().unwrap();
    assert!(e.is_due_for_authentication());
    e.set_lifecycle(Lifecycle::Authenticated);
    let before = e.position;

    pool.update(Duration::from_millis(100));
    let e = pool.iter().next().unwrap();
    assert_ne!(e.position, before);
    assert!(!e.is_due_for_authentication());
    assert!((e.settled_for - 0.1).abs() < 1e-5);
}

#[test]
fn eased_follower_keeps_exact_endpoints() {
    let path = Path::Line {
        from: Vec2::ZERO,
        to: Vec2::new(100.0, 0.0),
    };
    let eased = |progress| {
        EntitySpec::new(
            Vec3::ZERO,
            Motion::Follow {
                path,
                progress,
                speed: 1.0,
                easing: Easing::InOutQuad,
                looping: false,
                connection: None,
            },
        )
    };
    let mut pool = EntityPool::new(3);
    pool.spawn(eased(0.0));
    pool.spawn(eased(0.25));
    pool.spawn(eased(0.999));
    pool.update(Duration::from_millis(10));
    let xs: Vec<f32> = pool.iter().map(|e| e.position.x).collect();
    // In-out easing lags at the start.
    assert!(xs[0] < 1.0);
    assert!(xs[1] < 26.0);
    assert_eq!(xs[2], 100.0);
    assert_eq!(pool.iter().nth(2).unwrap().lifecycle, Lifecycle::Arrived);
}
