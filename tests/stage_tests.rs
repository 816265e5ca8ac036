// Host-side tests for the cyclic stage machine.

use scene_core::*;

fn build_ship_run() -> StageMachine {
    StageMachine::new([Stage::new("Build", 1.0), Stage::new("Ship", 2.0), Stage::new("Run", 1.0)]).unwrap()
}

#[test]
fn advances_one_way_and_wraps() {
    let mut m = build_ship_run();
    assert_eq!(m.current().name, "Build");
    let t = m.advance(1.0);
    assert_eq!(t.len(), 1);
    assert_eq!((t[0].from, t[0].to, t[0].wrapped), (0, 1, false));
    assert!(m.advance(1.5).is_empty());
    m.advance(0.5);
    assert_eq!(m.current().name, "Run");
    let t = m.advance(1.0);
    assert!(t[0].wrapped);
    assert_eq!(m.current_index(), 0);
    assert_eq!(m.cycles(), 1);
}

#[test]
fn large_steps_take_every_transition_in_order() {
    let mut m = build_ship_run();
    let t = m.advance(4.5);
    let path: Vec<_> = t.iter().map(|t| t.to).collect();
    assert_eq!(path, vec![1, 2, 0]);
    assert_eq!(m.current_index(), 0);
    assert!((m.progress() - 0.5).abs() < 1e-5);
}

#[test]
fn non_positive_and_non_finite_steps_are_ignored() {
    let mut m = build_ship_run();
    assert!(m.advance(0.0).is_empty());
    assert!(m.advance(-3.0).is_empty());
    assert!(m.advance(f32::INFINITY).is_empty());
    assert!(m.advance(f32::NAN).is_empty());
    assert_eq!(m.progress(), 0.0);
}

#[test]
fn invalid_stage_lists_are_rejected() {
    assert!(StageMachine::new(Vec::<Stage>::new()).is_err());
    assert!(StageMachine::new([Stage::new("Zero", 0.0)]).is_err());
    assert!(StageMachine::new([Stage::new("Nan", f32::NAN)]).is_err());
    assert!(StageMachine::new((0..33).map(|i| Stage::new(format!("s{i}"), 1.0))).is_err());
}

#[test]
fn huge_steps_walk_at_most_one_cycle() {
    let mut m = StageMachine::new([Stage::new("a", 2.5), Stage::new("b", 2.5)]).unwrap();
    let t = m.advance(1.0e8);
    assert!(t.len() <= 2 * m.stages().len());
    assert_eq!(t.last().map(|t| t.to), Some(m.current_index()));
    assert_eq!(m.cycles(), 20_000_000);
    assert!(m.progress() < 1.0);

    // Still usable with normal steps afterwards.
    let t = m.advance(2.5);
    assert_eq!(t.len(), 1);
}

#[test]
fn skipped_cycles_are_counted_from_mid_stage() {
    let mut m = build_ship_run();
    m.advance(1.5);
    assert_eq!(m.current().name, "Ship");
    // 0.5s into Ship, then ten full cycles and 1.6s more lands in Run.
    m.advance(41.6);
    assert_eq!(m.cycles(), 10);
    assert_eq!(m.current().name, "Run");
}
