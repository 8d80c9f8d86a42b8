use std::fmt;
use std::str::FromStr;

use eframe::egui::{Pos2, Vec2, vec2};
use tracing::trace;

use crate::engine::{BodyId, HostEngine};
use crate::error::{ChartError, Result};

use super::shape::BodyDescriptor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinStyle {
    Pin,
    Spring,
    Limit,
    Fixed,
    Sliding,
}

impl JoinStyle {
    pub const ALL: [JoinStyle; 5] = [
        JoinStyle::Pin,
        JoinStyle::Spring,
        JoinStyle::Limit,
        JoinStyle::Fixed,
        JoinStyle::Sliding,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pin => "pin",
            Self::Spring => "spring",
            Self::Limit => "limit",
            Self::Fixed => "fixed",
            Self::Sliding => "sliding",
        }
    }
}

impl fmt::Display for JoinStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JoinStyle {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.label().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown join style `{value}`"))
    }
}

/// Axis the sliding joint allows travel along.
pub const SLIDING_AXIS: Vec2 = vec2(1.0, 1.0);

/// A body already handed to the engine, with the descriptor it was built from.
#[derive(Clone, Debug)]
pub struct PlacedBody {
    pub id: BodyId,
    pub descriptor: BodyDescriptor,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointSpec {
    pub style: JoinStyle,
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// World-space anchors at the moment the joint was made.
    pub anchor_a: Pos2,
    pub anchor_b: Pos2,
    pub axis: Vec2,
}

pub struct JointBinder;

impl JointBinder {
    pub fn bind(
        body_a: &PlacedBody,
        body_b: &PlacedBody,
        style: JoinStyle,
        anchor_offset: Vec2,
    ) -> Result<JointSpec> {
        for body in [body_a, body_b] {
            if !body.descriptor.has_physics() {
                return Err(ChartError::MissingPhysicsBody(body.id.to_string()));
            }
        }

        let position_a = body_a.descriptor.position;
        let position_b = body_b.descriptor.position;
        let anchor_a = position_a + anchor_offset;
        let anchor_b = match style {
            JoinStyle::Pin | JoinStyle::Fixed | JoinStyle::Sliding => anchor_a,
            JoinStyle::Spring => position_b - anchor_offset,
            JoinStyle::Limit => position_b,
        };

        Ok(JointSpec {
            style,
            body_a: body_a.id,
            body_b: body_b.id,
            anchor_a,
            anchor_b,
            axis: SLIDING_AXIS,
        })
    }

    /// Hands the joint to the engine, which owns it from here on.
    pub fn attach<E: HostEngine + ?Sized>(engine: &mut E, spec: JointSpec) {
        trace!(style = %spec.style, a = %spec.body_a, b = %spec.body_b, "joint attached");
        engine.add_joint(spec);
    }

    pub fn bind_and_attach<E: HostEngine + ?Sized>(
        engine: &mut E,
        body_a: &PlacedBody,
        body_b: &PlacedBody,
        style: JoinStyle,
    ) -> Result<JointSpec> {
        let spec = Self::bind(body_a, body_b, style, Vec2::ZERO)?;
        Self::attach(engine, spec);
        Ok(spec)
    }
}
