//! The host side of the orchestration layer: the contract the renderers and
//! gestures talk to, and the small in-process scene that implements it.

use std::fmt;

use eframe::egui::{Pos2, Vec2};

use crate::build::{BodyDescriptor, BodyKind, JointSpec};

mod scene;
mod step;

pub use scene::{Scene, SceneBody, SceneJoint};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Two bodies started touching.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub point: Pos2,
    pub impulse: f32,
}

/// What the orchestration layer needs from a 2D physics/render host.
pub trait HostEngine {
    /// Creates the node (shape or label, with its physics proxy if any). The
    /// body is not simulated or drawn until [`HostEngine::add_to_scene`].
    fn create_body(&mut self, descriptor: &BodyDescriptor) -> BodyId;

    fn add_to_scene(&mut self, body: BodyId);

    /// Removes the body and every joint attached to it.
    fn remove_from_scene(&mut self, body: BodyId) -> bool;

    fn add_joint(&mut self, joint: JointSpec);

    /// Bodies under `point`, front-most first.
    fn hit_test(&self, point: Pos2) -> Vec<BodyId>;

    fn body_position(&self, body: BodyId) -> Option<Pos2>;

    fn set_body_position(&mut self, body: BodyId, position: Pos2);

    fn z_position(&self, body: BodyId) -> Option<f32>;

    fn body_kind(&self, body: BodyId) -> Option<BodyKind>;

    /// `impulse` is in newton-seconds, as the host's physics world measures it.
    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2);

    /// Advances the world by `dt` seconds and reports bodies that started
    /// touching.
    fn step(&mut self, dt: f32) -> Vec<Contact>;

    /// Removes every body and joint.
    fn clear(&mut self);
}
