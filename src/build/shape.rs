use std::fmt;
use std::str::FromStr;

use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::error::ChartError;
use crate::sim::Rgba;

/// What a drop on empty space produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Glyph,
    /// Two-bar outcome chart.
    Data,
    /// Plank and fulcrum carrying an outcome chart.
    Scale,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Rectangle,
        ShapeKind::Glyph,
        ShapeKind::Data,
        ShapeKind::Scale,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Glyph => "glyph",
            Self::Data => "data",
            Self::Scale => "scale",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShapeKind {
    type Err = ChartError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(value))
            .ok_or_else(|| ChartError::InvalidShapeKind(value.to_owned()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphFont {
    Didot,
    Baskerville,
    Chalkduster,
    Courier,
    Menlo,
}

impl GlyphFont {
    pub const ALL: [GlyphFont; 5] = [
        GlyphFont::Didot,
        GlyphFont::Baskerville,
        GlyphFont::Chalkduster,
        GlyphFont::Courier,
        GlyphFont::Menlo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Didot => "Didot",
            Self::Baskerville => "Baskerville",
            Self::Chalkduster => "Chalkduster",
            Self::Courier => "Courier",
            Self::Menlo => "Menlo",
        }
    }

    pub fn is_monospace(self) -> bool {
        matches!(self, Self::Courier | Self::Menlo)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Rectangle,
    Glyph,
    ChartBar,
    Plank,
    Fulcrum,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsParams {
    pub density: f32,
    pub linear_damping: f32,
    pub is_static: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CollisionProxy {
    /// Local points, counter-clockwise.
    Polygon(Vec<Vec2>),
    Circle { radius: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsBody {
    pub proxy: CollisionProxy,
    pub params: PhysicsParams,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlyphLabel {
    pub text: String,
    pub font: GlyphFont,
    pub font_size: f32,
}

/// A body ready to hand to the host engine.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyDescriptor {
    pub kind: BodyKind,
    pub position: Pos2,
    pub size: Vec2,
    pub fill: Rgba,
    pub stroke: Rgba,
    /// Local outline for path-based bodies; empty for glyphs.
    pub outline: Vec<Vec2>,
    pub physics: Option<PhysicsBody>,
    pub z_position: f32,
    pub label: Option<GlyphLabel>,
}

impl BodyDescriptor {
    pub fn has_physics(&self) -> bool {
        self.physics.is_some()
    }

    /// Bounds relative to `position`.
    pub fn local_bounds(&self) -> Rect {
        if self.outline.is_empty() {
            return Rect::from_center_size(Pos2::ZERO, self.size);
        }

        let mut min = pos2(f32::INFINITY, f32::INFINITY);
        let mut max = pos2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in &self.outline {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }
        Rect::from_min_max(min, max)
    }

    /// Radius of the circle around `position` that encloses the body.
    pub fn bounding_radius(&self) -> f32 {
        match self.physics.as_ref().map(|body| &body.proxy) {
            Some(CollisionProxy::Circle { radius }) => *radius,
            _ => {
                let bounds = self.local_bounds();
                [
                    bounds.left_top(),
                    bounds.right_top(),
                    bounds.left_bottom(),
                    bounds.right_bottom(),
                ]
                .into_iter()
                .map(|corner| corner.to_vec2().length())
                .fold(0.0, f32::max)
            }
        }
    }
}

/// Box path anchored at its bottom centre, as the host draws bars and blocks.
pub(crate) fn bottom_anchored_box(size: Vec2) -> Vec<Vec2> {
    let half = (size.x / 2.0).trunc();
    vec![
        vec2(-half, size.y),
        vec2(half, size.y),
        vec2(half, 0.0),
        vec2(-half, 0.0),
    ]
}

pub(crate) fn centered_box(size: Vec2) -> Vec<Vec2> {
    let half = size / 2.0;
    vec![
        vec2(-half.x, -half.y),
        vec2(half.x, -half.y),
        vec2(half.x, half.y),
        vec2(-half.x, half.y),
    ]
}
