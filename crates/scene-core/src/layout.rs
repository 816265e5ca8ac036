//! Static scene layout: named anchors and the connections between them.
//!
//! Anchors are declared against abstract coordinates and resolved wholesale
//! against a [`Surface`]. A built [`Layout`] remembers the surface generation it
//! was resolved for, so a scene can tell when it has gone stale.

use crate::color::Rgba;
use crate::easing::Path;
use crate::error::{SceneError, SceneResult};
use crate::surface::Surface;
use fnv::FnvHashMap;
use glam::Vec2;

/// One axis of an anchor position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Coord {
    /// Pixels from the leading edge.
    Px(f32),
    /// Fraction of the axis extent.
    Fraction(f32),
    /// Pixels back from the trailing edge.
    FromEnd(f32),
    /// Pixels offset from the axis midpoint.
    Centered(f32),
}

impl Coord {
    pub fn resolve(self, extent: f32) -> f32 {
        match self {
            Coord::Px(v) => v,
            Coord::Fraction(f) => extent * f,
            Coord::FromEnd(v) => extent - v,
            Coord::Centered(v) => extent / 2.0 + v,
        }
    }
}

/// Set of stages an item is shown in; bit `i` is stage `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageMask(pub u32);

impl StageMask {
    pub const ALL: StageMask = StageMask(u32::MAX);

    pub fn only(stage: usize) -> Self {
        StageMask(1u32.checked_shl(stage as u32).unwrap_or(0))
    }

    pub fn from_stages(stages: &[usize]) -> Self {
        StageMask(stages.iter().fold(0, |m, s| m | Self::only(*s).0))
    }

    /// From stage `first` to the last stage.
    pub fn from_stage(first: usize) -> Self {
        StageMask(u32::MAX.checked_shl(first as u32).unwrap_or(0))
    }

    pub fn contains(&self, stage: usize) -> bool {
        self.0 & Self::only(stage).0 != 0
    }
}

impl Default for StageMask {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnchorShape {
    Dot { radius: f32 },
    Ring { radius: f32, width: f32 },
    Box { width: f32, height: f32, corner: f32 },
    /// Text only.
    Label,
}

impl AnchorShape {
    fn scaled(self, k: f32) -> Self {
        match self {
            AnchorShape::Dot { radius } => AnchorShape::Dot { radius: radius * k },
            AnchorShape::Ring { radius, width } => AnchorShape::Ring {
                radius: radius * k,
                width,
            },
            AnchorShape::Box {
                width,
                height,
                corner,
            } => AnchorShape::Box {
                width: width * k,
                height: height * k,
                corner,
            },
            AnchorShape::Label => AnchorShape::Label,
        }
    }

    /// Distance from the anchor centre to its edge; zero for labels.
    pub fn radius(&self) -> f32 {
        match *self {
            AnchorShape::Dot { radius } | AnchorShape::Ring { radius, .. } => radius,
            AnchorShape::Box { width, height, .. } => width.min(height) / 2.0,
            AnchorShape::Label => 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnchorSpec {
    pub name: String,
    pub x: Coord,
    pub y: Coord,
    pub shape: AnchorShape,
    pub color: Rgba,
    pub label: Option<String>,
    pub stages: StageMask,
    /// Resolved relative to another anchor's position instead of the surface.
    pub relative_to: Option<String>,
}

impl AnchorSpec {
    pub fn new(name: impl Into<String>, x: Coord, y: Coord, shape: AnchorShape, color: Rgba) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            shape,
            color,
            label: None,
            stages: StageMask::ALL,
            relative_to: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn stages(mut self, stages: StageMask) -> Self {
        self.stages = stages;
        self
    }

    /// Treat `x`/`y` as pixel offsets from `anchor` (which must be declared earlier).
    pub fn relative_to(mut self, anchor: impl Into<String>) -> Self {
        self.relative_to = Some(anchor.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    Straight,
    /// Half-sine arc lifted by `height` pixels.
    Hop { height: f32 },
    /// Vertical S-shaped cubic.
    SCurve,
    /// Quadratic bowed sideways by `offset` pixels.
    Bend { offset: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionSpec {
    pub from: String,
    pub to: String,
    pub curve: Curve,
    pub color: Rgba,
    pub dashed: bool,
    pub stages: StageMask,
    /// Trim this many pixels off each end so lines stop at anchor edges.
    pub inset: f32,
}

impl ConnectionSpec {
    pub fn new(from: impl Into<String>, to: impl Into<String>, curve: Curve, color: Rgba) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            curve,
            color,
            dashed: false,
            stages: StageMask::ALL,
            inset: 0.0,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn stages(mut self, stages: StageMask) -> Self {
        self.stages = stages;
        self
    }

    pub fn inset(mut self, inset: f32) -> Self {
        self.inset = inset;
        self
    }
}

/// Declarative layout for a scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutSpec {
    pub anchors: Vec<AnchorSpec>,
    pub connections: Vec<ConnectionSpec>,
    /// When set, anchor sizes scale with `min(width, height) / reference_extent`.
    pub reference_extent: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
    pub name: String,
    pub position: Vec2,
    pub shape: AnchorShape,
    pub color: Rgba,
    pub label: Option<String>,
    pub stages: StageMask,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
    pub from: usize,
    pub to: usize,
    pub path: Path,
    pub color: Rgba,
    pub dashed: bool,
    pub stages: StageMask,
}

#[derive(Clone, Debug)]
pub struct Layout {
    anchors: Vec<Anchor>,
    connections: Vec<Connection>,
    by_name: FnvHashMap<String, usize>,
    generation: u64,
    scale: f32,
}

impl Layout {
    pub fn build(spec: &LayoutSpec, surface: &Surface) -> SceneResult<Self> {
        let scale = spec
            .reference_extent
            .filter(|r| *r > 0.0)
            .map(|r| (surface.min_extent() / r).clamp(0.25, 4.0))
            .unwrap_or(1.0);
        let size = surface.size();
        let mut anchors: Vec<Anchor> = Vec::with_capacity(spec.anchors.len());
        let mut by_name = FnvHashMap::default();
        for a in &spec.anchors {
            let position = match &a.relative_to {
                Some(base) => {
                    let base = by_name
                        .get(base)
                        .map(|i: &usize| anchors[*i].position)
                        .ok_or_else(|| SceneError::UnknownAnchor(base.clone()))?;
                    base + Vec2::new(a.x.resolve(0.0), a.y.resolve(0.0)) * scale
                }
                None => Vec2::new(a.x.resolve(size.x), a.y.resolve(size.y)),
            };
            by_name.insert(a.name.clone(), anchors.len());
            anchors.push(Anchor {
                name: a.name.clone(),
                position,
                shape: a.shape.scaled(scale),
                color: a.color,
                label: a.label.clone(),
                stages: a.stages,
            });
        }
        let lookup = |name: &String| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| SceneError::UnknownAnchor(name.clone()))
        };
        let connections = spec
            .connections
            .iter()
            .map(|c| {
                let from = lookup(&c.from)?;
                let to = lookup(&c.to)?;
                let path = connection_path(
                    anchors[from].position,
                    anchors[to].position,
                    c.curve,
                    c.inset * scale,
                    scale,
                );
                Ok(Connection {
                    from,
                    to,
                    path,
                    color: c.color,
                    dashed: c.dashed,
                    stages: c.stages,
                })
            })
            .collect::<SceneResult<Vec<_>>>()?;
        Ok(Self {
            anchors,
            connections,
            by_name,
            generation: surface.generation,
            scale,
        })
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn anchor(&self, name: &str) -> Option<&Anchor> {
        self.index_of(name).map(|i| &self.anchors[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn connection(&self, index: usize) -> Option<&Connection> {
        self.connections.get(index)
    }

    /// Surface generation this layout was resolved against.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_stale(&self, surface: &Surface) -> bool {
        self.generation != surface.generation
    }
}

fn connection_path(from: Vec2, to: Vec2, curve: Curve, inset: f32, scale: f32) -> Path {
    let (from, to) = if inset > 0.0 && from.distance(to) > 2.0 * inset {
        let dir = (to - from).normalize_or_zero();
        (from + dir * inset, to - dir * inset)
    } else {
        (from, to)
    };
    match curve {
        Curve::Straight => Path::Line { from, to },
        Curve::Hop { height } => Path::Hop {
            from,
            to,
            height: height * scale,
        },
        Curve::SCurve => Path::s_curve(from, to),
        Curve::Bend { offset } => Path::bend(from, to, offset * scale),
    }
}
