use std::collections::HashSet;

use eframe::egui::{Pos2, Rect, Vec2, pos2};
use tracing::debug;

use crate::build::{BodyDescriptor, BodyKind, CollisionProxy, JoinStyle, JointSpec};

use super::step::{StepScratch, step_bodies};
use super::{BodyId, Contact, HostEngine};

const MIN_MASS: f32 = 0.05;
/// Area is measured in points; this keeps masses near 1 for default-sized bodies.
const AREA_TO_MASS: f32 = 1.0 / 600.0;
/// Impulses arrive in the host's physical units; positions are in points.
pub(super) const POINTS_PER_METER: f32 = 150.0;

#[derive(Clone, Debug)]
pub struct SceneBody {
    pub id: BodyId,
    pub descriptor: BodyDescriptor,
    pub position: Pos2,
    pub velocity: Vec2,
    pub in_scene: bool,
    pub(super) mass: f32,
}

impl SceneBody {
    pub fn is_dynamic(&self) -> bool {
        self.descriptor
            .physics
            .as_ref()
            .is_some_and(|body| !body.params.is_static)
    }

    pub fn has_physics(&self) -> bool {
        self.descriptor.physics.is_some()
    }

    pub fn linear_damping(&self) -> f32 {
        self.descriptor
            .physics
            .as_ref()
            .map_or(0.0, |body| body.params.linear_damping)
    }

    /// Drawn extent, used for hit testing and painting.
    pub fn world_bounds(&self) -> Rect {
        self.descriptor
            .local_bounds()
            .translate(self.position.to_vec2())
    }

    /// Extent of the collision proxy: a circle's enclosing square or the
    /// polygon's box. Decorative bodies fall back to the drawn extent.
    pub fn collision_bounds(&self) -> Rect {
        match self.descriptor.physics.as_ref().map(|body| &body.proxy) {
            Some(CollisionProxy::Circle { radius }) => {
                Rect::from_center_size(self.position, Vec2::splat(2.0 * radius))
            }
            Some(CollisionProxy::Polygon(points)) if !points.is_empty() => {
                let mut bounds = Rect::NOTHING;
                for point in points {
                    bounds.extend_with(self.position + *point);
                }
                bounds
            }
            _ => self.world_bounds(),
        }
    }
}

/// A joint with its anchors stored relative to each body, so it follows them.
#[derive(Clone, Copy, Debug)]
pub struct SceneJoint {
    pub spec: JointSpec,
    pub(super) local_a: Vec2,
    pub(super) local_b: Vec2,
    pub(super) rest_length: f32,
}

/// In-process host: keeps bodies and joints, answers hit tests and advances a
/// simple gravity/damping/constraint step.
pub struct Scene {
    pub(super) bodies: Vec<SceneBody>,
    pub(super) joints: Vec<SceneJoint>,
    pub(super) bounds: Rect,
    pub(super) gravity: Vec2,
    pub(super) touching: HashSet<(BodyId, BodyId)>,
    pub(super) scratch: StepScratch,
    next_id: u64,
}

impl Scene {
    pub const GRAVITY: Vec2 = Vec2::new(0.0, -980.0);

    /// `side` is the edge length of the square world, with its corner at the origin.
    pub fn new(side: f32) -> Self {
        Self {
            bodies: Vec::new(),
            joints: Vec::new(),
            bounds: Rect::from_min_max(Pos2::ZERO, pos2(side, side)),
            gravity: Self::GRAVITY,
            touching: HashSet::new(),
            scratch: StepScratch::default(),
            next_id: 1,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Bodies currently in the scene, oldest first (drawing order).
    pub fn bodies(&self) -> impl Iterator<Item = &SceneBody> {
        self.bodies.iter().filter(|body| body.in_scene)
    }

    pub fn body(&self, id: BodyId) -> Option<&SceneBody> {
        self.bodies.iter().find(|body| body.id == id)
    }

    pub fn joints(&self) -> &[SceneJoint] {
        &self.joints
    }

    pub fn body_count(&self) -> usize {
        self.bodies().count()
    }

    /// World anchors of a joint as the bodies sit now.
    pub fn joint_anchors(&self, joint: &SceneJoint) -> Option<(Pos2, Pos2)> {
        let a = self.body(joint.spec.body_a)?;
        let b = self.body(joint.spec.body_b)?;
        Some((a.position + joint.local_a, b.position + joint.local_b))
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut SceneBody> {
        self.bodies.iter_mut().find(|body| body.id == id)
    }
}

impl HostEngine for Scene {
    fn create_body(&mut self, descriptor: &BodyDescriptor) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        let mass = mass_of(descriptor);
        self.bodies.push(SceneBody {
            id,
            descriptor: descriptor.clone(),
            position: descriptor.position,
            velocity: Vec2::ZERO,
            in_scene: false,
            mass,
        });
        id
    }

    fn add_to_scene(&mut self, body: BodyId) {
        if let Some(body) = self.body_mut(body) {
            body.in_scene = true;
        }
    }

    fn remove_from_scene(&mut self, body: BodyId) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|candidate| candidate.id != body);
        if self.bodies.len() == before {
            return false;
        }

        self.joints
            .retain(|joint| joint.spec.body_a != body && joint.spec.body_b != body);
        self.touching.retain(|(a, b)| *a != body && *b != body);
        debug!(%body, "body removed from scene");
        true
    }

    fn add_joint(&mut self, joint: JointSpec) {
        let (Some(a), Some(b)) = (self.body(joint.body_a), self.body(joint.body_b)) else {
            return;
        };

        let local_a = joint.anchor_a - a.position;
        let local_b = joint.anchor_b - b.position;
        let rest_length = match joint.style {
            JoinStyle::Spring | JoinStyle::Limit => joint.anchor_a.distance(joint.anchor_b),
            JoinStyle::Pin | JoinStyle::Fixed | JoinStyle::Sliding => 0.0,
        };

        self.joints.push(SceneJoint {
            spec: joint,
            local_a,
            local_b,
            rest_length,
        });
    }

    fn hit_test(&self, point: Pos2) -> Vec<BodyId> {
        let mut hits = self
            .bodies
            .iter()
            .enumerate()
            .filter(|(_, body)| body.in_scene && body.world_bounds().contains(point))
            .map(|(order, body)| (body.descriptor.z_position, order, body.id))
            .collect::<Vec<_>>();

        hits.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        hits.into_iter().map(|(_, _, id)| id).collect()
    }

    fn body_position(&self, body: BodyId) -> Option<Pos2> {
        self.body(body).map(|body| body.position)
    }

    fn set_body_position(&mut self, body: BodyId, position: Pos2) {
        if let Some(body) = self.body_mut(body) {
            body.position = position;
            body.velocity = Vec2::ZERO;
        }
    }

    fn z_position(&self, body: BodyId) -> Option<f32> {
        self.body(body).map(|body| body.descriptor.z_position)
    }

    fn body_kind(&self, body: BodyId) -> Option<BodyKind> {
        self.body(body).map(|body| body.descriptor.kind)
    }

    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2) {
        if let Some(body) = self.body_mut(body)
            && body.is_dynamic()
        {
            body.velocity += impulse * POINTS_PER_METER / body.mass;
        }
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        step_bodies(self, dt)
    }

    fn clear(&mut self) {
        debug!(bodies = self.bodies.len(), joints = self.joints.len(), "scene cleared");
        self.bodies.clear();
        self.joints.clear();
        self.touching.clear();
    }
}

fn mass_of(descriptor: &BodyDescriptor) -> f32 {
    let Some(physics) = descriptor.physics.as_ref() else {
        return MIN_MASS;
    };

    let area = match &physics.proxy {
        CollisionProxy::Circle { radius } => std::f32::consts::PI * radius * radius,
        CollisionProxy::Polygon(points) => polygon_area(points),
    };
    (area * AREA_TO_MASS * physics.params.density).max(MIN_MASS)
}

fn polygon_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for (index, point) in points.iter().enumerate() {
        let next = points[(index + 1) % points.len()];
        twice_area += point.x * next.y - next.x * point.y;
    }
    (twice_area / 2.0).abs()
}
