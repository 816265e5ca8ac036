// Host-side tests for layout resolution and connections.

use glam::Vec2;
use scene_core::*;

fn anchor(name: &str, x: Coord, y: Coord) -> AnchorSpec {
    AnchorSpec::new(name, x, y, AnchorShape::Dot { radius: 10.0 }, Rgba::WHITE)
}

#[test]
fn coords_resolve_against_extent() {
    assert_eq!(Coord::Px(12.0).resolve(500.0), 12.0);
    assert_eq!(Coord::Fraction(0.25).resolve(400.0), 100.0);
    assert_eq!(Coord::FromEnd(80.0).resolve(1000.0), 920.0);
    assert_eq!(Coord::Centered(-10.0).resolve(200.0), 90.0);
}

#[test]
fn stage_masks_select_stages() {
    let only = StageMask::only(1);
    assert!(only.contains(1) && !only.contains(0) && !only.contains(2));
    let later = StageMask::from_stage(2);
    assert!(!later.contains(1) && later.contains(2) && later.contains(5));
    let some = StageMask::from_stages(&[0, 3]);
    assert!(some.contains(0) && some.contains(3) && !some.contains(2));
    assert!(StageMask::ALL.contains(31));
    assert!(!StageMask::only(40).contains(40));
}

#[test]
fn connections_follow_their_anchors() {
    let spec = LayoutSpec {
        anchors: vec![
            anchor("a", Coord::Px(100.0), Coord::Px(100.0)),
            anchor("b", Coord::Px(100.0), Coord::Px(300.0)),
        ],
        connections: vec![ConnectionSpec::new("a", "b", Curve::SCurve, Rgba::WHITE)],
        reference_extent: None,
    };
    let layout = Layout::build(&spec, &Surface::new(800, 600)).unwrap();
    let conn = layout.connection(0).unwrap();
    assert_eq!((conn.from, conn.to), (0, 1));
    assert_eq!(conn.path.start(), Vec2::new(100.0, 100.0));
    assert_eq!(conn.path.end(), Vec2::new(100.0, 300.0));
}

#[test]
fn inset_trims_both_ends() {
    let spec = LayoutSpec {
        anchors: vec![
            anchor("a", Coord::Px(0.0), Coord::Px(0.0)),
            anchor("b", Coord::Px(100.0), Coord::Px(0.0)),
        ],
        connections: vec![ConnectionSpec::new("a", "b", Curve::Straight, Rgba::WHITE).inset(10.0)],
        reference_extent: None,
    };
    let layout = Layout::build(&spec, &Surface::new(800, 600)).unwrap();
    let path = layout.connection(0).unwrap().path;
    assert_eq!(path.start(), Vec2::new(10.0, 0.0));
    assert_eq!(path.end(), Vec2::new(90.0, 0.0));
}

#[test]
fn relative_anchors_offset_from_their_base() {
    let spec = LayoutSpec {
        anchors: vec![
            anchor("hub", Coord::Centered(0.0), Coord::Px(250.0)),
            anchor("pod", Coord::Px(-50.0), Coord::Px(40.0)).relative_to("hub"),
        ],
        ..LayoutSpec::default()
    };
    let layout = Layout::build(&spec, &Surface::new(1000, 600)).unwrap();
    assert_eq!(layout.anchor("pod").unwrap().position, Vec2::new(450.0, 290.0));
}

#[test]
fn reference_extent_scales_shapes() {
    let spec = LayoutSpec {
        anchors: vec![anchor("a", Coord::Centered(0.0), Coord::Centered(0.0))],
        connections: Vec::new(),
        reference_extent: Some(600.0),
    };
    let layout = Layout::build(&spec, &Surface::new(2000, 300)).unwrap();
    assert_eq!(layout.scale(), 0.5);
    assert_eq!(layout.anchor("a").unwrap().shape.radius(), 5.0);
}

#[test]
fn unknown_anchor_is_an_error() {
    let spec = LayoutSpec {
        anchors: vec![anchor("a", Coord::Px(0.0), Coord::Px(0.0))],
        connections: vec![ConnectionSpec::new("a", "missing", Curve::Straight, Rgba::WHITE)],
        reference_extent: None,
    };
    let err = Layout::build(&spec, &Surface::new(100, 100)).unwrap_err();
    assert!(matches!(err, SceneError::UnknownAnchor(name) if name == "missing"));
}

#[test]
fn layout_remembers_its_surface_generation() {
    let spec = LayoutSpec::default();
    let surface = Surface {
        generation: 3,
        ..Surface::new(100, 100)
    };
    let layout = Layout::build(&spec, &surface).unwrap();
    assert_eq!(layout.generation(), 3);
    assert!(!layout.is_stale(&surface));
    assert!(layout.is_stale(&Surface::new(100, 100)));
}
