//! Declarative definitions for the built-in scenes.
//!
//! A scene is data: a layout, a style, optional stages, spawn and cull rules,
//! and at most one interaction. [`Scene`](crate::scene::Scene) runs any of them
//! with the same update loop.

use crate::camera::Camera;
use crate::color::Palette;
use crate::config::{Density, SceneKind};
use crate::constants::*;
use crate::layout::{AnchorShape, AnchorSpec, ConnectionSpec, Coord, Curve, LayoutSpec, StageMask};
use crate::render::{Background, Metric, Projection, SceneStyle};
use crate::spawn::{CullRule, PopulationTarget, Schedule, Span, SpawnRule, Template};
use crate::stage::Stage;
use glam::Vec2;
use smallvec::{smallvec, SmallVec};
use std::f32::consts::TAU;

/// Rule applied between update and cull.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    None,
    /// Entities seeking `core` are blocked by the rings around it. An entity
    /// inside more rings than its strength stops where it is.
    Shields { core: String, rings: SmallVec<[String; 4]> },
    /// Active entities past their check-in age become authenticated.
    Authenticate,
}

#[derive(Clone, Debug)]
pub struct SceneDef {
    pub kind: SceneKind,
    pub layout: LayoutSpec,
    pub style: SceneStyle,
    /// Empty for scenes without a stage cycle.
    pub stages: Vec<Stage>,
    pub spawns: Vec<SpawnRule>,
    pub culls: SmallVec<[CullRule; 4]>,
    pub interaction: Interaction,
    pub projection: Option<Projection>,
    /// Chance per second that a glyph switches character.
    pub glyph_flicker: f32,
}

impl SceneDef {
    pub fn build(kind: SceneKind, palette: &Palette, density: Density) -> Self {
        match kind {
            SceneKind::Matrix => matrix(palette, density),
            SceneKind::Security => security(palette, density),
            SceneKind::Dataflow => dataflow(palette, density),
            SceneKind::Pipeline => pipeline(palette),
            SceneKind::Starfield => starfield(),
            SceneKind::Identity => identity(palette, density),
        }
    }

    fn empty(kind: SceneKind) -> Self {
        Self {
            kind,
            layout: LayoutSpec::default(),
            style: SceneStyle::default(),
            stages: Vec::new(),
            spawns: Vec::new(),
            culls: SmallVec::new(),
            interaction: Interaction::None,
            projection: None,
            glyph_flicker: 0.0,
        }
    }
}

fn matrix(_palette: &Palette, density: Density) -> SceneDef {
    let spacing = density.spacing();
    SceneDef {
        style: SceneStyle {
            background: Background::Trail,
            ..SceneStyle::default()
        },
        spawns: vec![SpawnRule {
            template: Template::Glyph {
                speed: Span(60.0, 180.0),
                spacing,
            },
            schedule: Schedule::Maintain(PopulationTarget::PerColumn { spacing }),
        }],
        culls: smallvec![CullRule::PastBottom { margin: spacing }],
        glyph_flicker: 0.6,
        ..SceneDef::empty(SceneKind::Matrix)
    }
}

fn security(palette: &Palette, density: Density) -> SceneDef {
    let center = |name: &str, shape| AnchorSpec::new(name, Coord::Centered(0.0), Coord::Centered(0.0), shape, palette.primary);
    let mut anchors = vec![AnchorSpec {
        color: palette.secondary,
        ..center("core", AnchorShape::Dot { radius: 40.0 }).label("Protected")
    }];
    let mut rings = SmallVec::new();
    for (i, radius) in [80.0, 120.0, 160.0].into_iter().enumerate() {
        let name = format!("shield-{}", i + 1);
        anchors.push(center(name.as_str(), AnchorShape::Ring { radius, width: 2.0 }));
        rings.push(name);
    }
    SceneDef {
        layout: LayoutSpec {
            anchors,
            ..LayoutSpec::default()
        },
        style: SceneStyle {
            background: Background::Solid,
            title: Some("Zero Trust Security".into()),
            metric: Some(Metric::Blocked("Threats Blocked".into())),
            ..SceneStyle::default()
        },
        spawns: vec![SpawnRule {
            template: Template::Threat {
                target: "core".into(),
                speed: Span(30.0, 90.0),
                size: Span(4.0, 7.0),
                max_strength: 3,
            },
            schedule: Schedule::Rate {
                per_sec: 3.0 * density.rate_multiplier(),
            },
        }],
        culls: smallvec![
            CullRule::BlockedFor(BLOCKED_LINGER_SEC),
            CullRule::Arrived,
            CullRule::OffSurface { margin: 50.0 },
        ],
        interaction: Interaction::Shields {
            core: "core".into(),
            rings,
        },
        ..SceneDef::empty(SceneKind::Security)
    }
}

fn dataflow(palette: &Palette, density: Density) -> SceneDef {
    let node = |name: &str, x: f32, y: f32, w: f32, label: &str, color| {
        AnchorSpec::new(
            name,
            Coord::Fraction(x),
            Coord::Fraction(y),
            AnchorShape::Box {
                width: w,
                height: 36.0,
                corner: 6.0,
            },
            color,
        )
        .label(label)
    };
    let mut anchors = Vec::new();
    let mut connections = Vec::new();
    for (i, x) in [0.2, 0.5, 0.8].into_iter().enumerate() {
        let name = format!("app-{}", i + 1);
        let title = format!("App Server {}", i + 1);
        anchors.push(node(name.as_str(), x, 0.12, 110.0, title.as_str(), palette.series_color(i)));
        connections.push(ConnectionSpec::new(name, "pool", Curve::SCurve, palette.series_color(i)).inset(18.0));
    }
    anchors.push(node("pool", 0.5, 0.38, 160.0, "Connection Pool", palette.accent));
    anchors.push(node("primary", 0.5, 0.62, 140.0, "Primary DB", palette.primary));
    connections.push(ConnectionSpec::new("pool", "primary", Curve::SCurve, palette.accent).inset(18.0));
    for (i, x) in [0.3, 0.7].into_iter().enumerate() {
        let name = format!("replica-{}", i + 1);
        anchors.push(node(name.as_str(), x, 0.86, 120.0, "Read Replica", palette.secondary));
        connections.push(
            ConnectionSpec::new("primary", name, Curve::SCurve, palette.secondary)
                .dashed()
                .inset(18.0),
        );
    }
    let per_connection = match density {
        Density::Low => 3,
        Density::High => 6,
    };
    SceneDef {
        layout: LayoutSpec {
            anchors,
            connections,
            reference_extent: Some(600.0),
        },
        style: SceneStyle {
            background: Background::Solid,
            grid: Some(density.spacing() * 2.5),
            title: Some("Database Architecture".into()),
            metric: Some(Metric::Population("Queries in flight".into())),
        },
        spawns: vec![SpawnRule {
            template: Template::Packet {
                speed: Span(0.42, 0.72),
                size: 4.0,
            },
            schedule: Schedule::Maintain(PopulationTarget::PerConnection(per_connection)),
        }],
        culls: smallvec![CullRule::OffSurface { margin: 100.0 }],
        ..SceneDef::empty(SceneKind::Dataflow)
    }
}

fn pipeline(palette: &Palette) -> SceneDef {
    const BUILD: usize = 0;
    const SHIP: usize = 1;
    const RUN: usize = 2;
    let label = |name: &str, x: Coord, text: &str, stage: usize| {
        AnchorSpec::new(name, x, Coord::Px(40.0), AnchorShape::Label, palette.accent)
            .label(text)
            .stages(StageMask::only(stage))
    };
    let block = |name: &str, x: Coord, y: f32, text: &str| {
        AnchorSpec::new(
            name,
            x,
            Coord::Px(y),
            AnchorShape::Box {
                width: 90.0,
                height: 40.0,
                corner: 6.0,
            },
            palette.primary,
        )
        .label(text)
    };
    let mut anchors = vec![
        label("build-label", Coord::Px(80.0), "Build", BUILD),
        label("ship-label", Coord::Centered(0.0), "Ship", SHIP),
        label("run-label", Coord::FromEnd(80.0), "Run", RUN),
        block("source", Coord::Px(80.0), 220.0, "Source"),
        block("image", Coord::Px(80.0), 110.0, "Image"),
        block("registry", Coord::Centered(0.0), 110.0, "Registry"),
        AnchorSpec::new(
            "cluster",
            Coord::Centered(0.0),
            Coord::Px(280.0),
            AnchorShape::Ring {
                radius: 100.0,
                width: 2.0,
            },
            palette.secondary,
        )
        .label("Cluster")
        .stages(StageMask::from_stage(RUN)),
    ];
    let mut connections = vec![
        ConnectionSpec::new("source", "image", Curve::Straight, palette.primary)
            .inset(24.0)
            .stages(StageMask::only(BUILD)),
        ConnectionSpec::new("image", "registry", Curve::Hop { height: 50.0 }, palette.accent)
            .inset(48.0)
            .stages(StageMask::only(SHIP)),
    ];
    let pods = [Vec2::new(-50.0, -40.0), Vec2::new(50.0, -40.0), Vec2::new(-50.0, 40.0), Vec2::new(50.0, 40.0)];
    for (i, offset) in pods.into_iter().enumerate() {
        let name = format!("pod-{}", i + 1);
        anchors.push(
            AnchorSpec::new(
                name.clone(),
                Coord::Px(offset.x),
                Coord::Px(offset.y),
                AnchorShape::Box {
                    width: 30.0,
                    height: 30.0,
                    corner: 4.0,
                },
                palette.series_color(i),
            )
            .relative_to("cluster")
            .stages(StageMask::only(RUN)),
        );
        connections.push(
            ConnectionSpec::new("registry", name, Curve::Bend { offset: 30.0 }, palette.secondary)
                .dashed()
                .inset(20.0)
                .stages(StageMask::only(RUN)),
        );
    }
    SceneDef {
        layout: LayoutSpec {
            anchors,
            connections,
            reference_extent: None,
        },
        style: SceneStyle {
            background: Background::Solid,
            title: Some("Container Pipeline".into()),
            metric: Some(Metric::Stage),
            ..SceneStyle::default()
        },
        stages: vec![Stage::new("Build", 2.5), Stage::new("Ship", 2.5), Stage::new("Run", 2.5)],
        spawns: vec![SpawnRule {
            template: Template::Courier {
                stagger: 0.15,
                size: 6.0,
            },
            schedule: Schedule::OnStageEnter,
        }],
        culls: smallvec![CullRule::Arrived],
        ..SceneDef::empty(SceneKind::Pipeline)
    }
}

fn starfield() -> SceneDef {
    SceneDef {
        spawns: vec![SpawnRule {
            template: Template::Star {
                radius: Span(5.0, 15.0),
                size: Span(0.6, 1.4),
            },
            schedule: Schedule::Maintain(PopulationTarget::FractionOfCap(1.0)),
        }],
        projection: Some(Projection {
            camera: Camera::default(),
            rotation: Vec2::ZERO,
            wave: 0.2,
            point_px: 3.0,
        }),
        ..SceneDef::empty(SceneKind::Starfield)
    }
}

fn identity(palette: &Palette, density: Density) -> SceneDef {
    let mut anchors = vec![AnchorSpec::new(
        "directory",
        Coord::Centered(0.0),
        Coord::Centered(0.0),
        AnchorShape::Dot { radius: 70.0 },
        palette.primary,
    )
    .label("Directory")];
    let mut connections = Vec::new();
    let kinds = ["Users", "Groups", "Apps", "Devices", "Roles"];
    for (i, label) in kinds.into_iter().enumerate() {
        let angle = i as f32 * TAU / kinds.len() as f32;
        let name = label.to_ascii_lowercase();
        let color = palette.series_color(i);
        anchors.push(
            AnchorSpec::new(
                name.as_str(),
                Coord::Centered(angle.cos() * IDENTITY_SPOKE_PX),
                Coord::Centered(angle.sin() * IDENTITY_SPOKE_PX),
                AnchorShape::Dot { radius: 25.0 },
                color,
            )
            .label(label),
        );
        connections.push(ConnectionSpec::new("directory", name, Curve::Straight, color.with_alpha(0.5)));
    }
    let orbiters = (IDENTITY_ORBITERS as f32 * density.rate_multiplier()).round() as usize;
    SceneDef {
        layout: LayoutSpec {
            anchors,
            connections,
            reference_extent: None,
        },
        style: SceneStyle {
            background: Background::Solid,
            grid: Some(30.0),
            title: Some("Identity Directory".into()),
            metric: Some(Metric::Authenticated("Users authenticated".into())),
        },
        spawns: vec![SpawnRule {
            template: Template::Orbiter {
                center: "directory".into(),
                distance: Span(120.0, 200.0),
                size: Span(5.0, 10.0),
                angular_speed: Span(0.3, 0.9),
                authenticate_after: Span(0.0, 8.0),
            },
            schedule: Schedule::Maintain(PopulationTarget::Fixed(orbiters)),
        }],
        interaction: Interaction::Authenticate,
        ..SceneDef::empty(SceneKind::Identity)
    }
}
