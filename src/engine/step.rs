use std::collections::{HashMap, HashSet};

use eframe::egui::{Rect, Vec2};

use crate::build::JoinStyle;

use super::scene::{POINTS_PER_METER, Scene};
use super::{BodyId, Contact};

const MAX_TIME_STEP: f32 = 1.0 / 20.0;
const JOINT_ITERATIONS: usize = 4;
const SPRING_STIFFNESS: f32 = 0.2;
const OVERLAP_CORRECTION: f32 = 0.8;
const RESTITUTION: f32 = 0.2;
const MAX_SPEED: f32 = 4_000.0;
const MIN_SLEEP_SPEED_SQ: f32 = 0.5 * 0.5;

/// Buffers reused between steps.
#[derive(Debug, Default)]
pub(crate) struct StepScratch {
    active: Vec<usize>,
    bounds: Vec<Rect>,
    /// Positions in `active`, sorted by the left edge of their bounds.
    sweep: Vec<usize>,
    index_of: HashMap<BodyId, usize>,
    touching: HashSet<(BodyId, BodyId)>,
}

pub(super) fn step_bodies(scene: &mut Scene, dt: f32) -> Vec<Contact> {
    let dt = dt.clamp(0.0, MAX_TIME_STEP);
    if dt <= 0.0 {
        return Vec::new();
    }

    integrate(scene, dt);
    index_bodies(scene);
    for _ in 0..JOINT_ITERATIONS {
        solve_joints(scene);
    }
    let contacts = resolve_overlaps(scene);
    clamp_to_bounds(scene);
    contacts
}

fn inverse_mass(scene: &Scene, index: usize) -> f32 {
    let body = &scene.bodies[index];
    if body.in_scene && body.is_dynamic() {
        1.0 / body.mass
    } else {
        0.0
    }
}

fn integrate(scene: &mut Scene, dt: f32) {
    let gravity = scene.gravity;
    for body in scene.bodies.iter_mut().filter(|body| body.in_scene) {
        if !body.is_dynamic() {
            body.velocity = Vec2::ZERO;
            continue;
        }

        let damping_factor = (1.0 - body.linear_damping() * dt).clamp(0.0, 1.0);
        let mut velocity = (body.velocity + gravity * dt) * damping_factor;
        let speed_sq = velocity.length_sq();
        if speed_sq > MAX_SPEED * MAX_SPEED {
            velocity *= MAX_SPEED / speed_sq.sqrt();
        }

        body.velocity = velocity;
        body.position += velocity * dt;
    }
}

/// Body ids to their slot in `scene.bodies`, rebuilt once per step.
fn index_bodies(scene: &mut Scene) {
    let index_of = &mut scene.scratch.index_of;
    index_of.clear();
    for (index, body) in scene.bodies.iter().enumerate() {
        index_of.insert(body.id, index);
    }
}

fn solve_joints(scene: &mut Scene) {
    for joint_index in 0..scene.joints.len() {
        let joint = scene.joints[joint_index];
        let index_of = &scene.scratch.index_of;
        let (Some(&a), Some(&b)) = (
            index_of.get(&joint.spec.body_a),
            index_of.get(&joint.spec.body_b),
        ) else {
            continue;
        };

        let weight_a = inverse_mass(scene, a);
        let weight_b = inverse_mass(scene, b);
        let total = weight_a + weight_b;
        if total <= 0.0 {
            continue;
        }

        let anchor_a = scene.bodies[a].position + joint.local_a;
        let anchor_b = scene.bodies[b].position + joint.local_b;
        let delta = anchor_b - anchor_a;
        let error = match joint.spec.style {
            JoinStyle::Pin | JoinStyle::Fixed => delta,
            JoinStyle::Sliding => {
                let axis = joint.spec.axis.normalized();
                delta - axis * delta.dot(axis)
            }
            JoinStyle::Limit => stretch_beyond(delta, joint.rest_length),
            JoinStyle::Spring => {
                let length = delta.length();
                if length <= f32::EPSILON {
                    Vec2::ZERO
                } else {
                    delta * ((length - joint.rest_length) / length) * SPRING_STIFFNESS
                }
            }
        };

        if error.length_sq() <= f32::EPSILON {
            continue;
        }
        scene.bodies[a].position += error * (weight_a / total);
        scene.bodies[b].position -= error * (weight_b / total);
    }
}

fn stretch_beyond(delta: Vec2, limit: f32) -> Vec2 {
    let length = delta.length();
    if length <= limit || length <= f32::EPSILON {
        Vec2::ZERO
    } else {
        delta * ((length - limit) / length)
    }
}

fn resolve_overlaps(scene: &mut Scene) -> Vec<Contact> {
    let mut scratch = std::mem::take(&mut scene.scratch);
    scratch.active.clear();
    scratch.bounds.clear();
    scratch.sweep.clear();
    scratch.touching.clear();

    for (index, body) in scene.bodies.iter().enumerate() {
        if body.in_scene && body.has_physics() {
            scratch.active.push(index);
            scratch.bounds.push(body.collision_bounds());
        }
    }

    // Sweep along x: once a candidate starts past the right edge, so does
    // every later one.
    scratch.sweep.extend(0..scratch.active.len());
    let bounds = &scratch.bounds;
    scratch
        .sweep
        .sort_by(|a, b| bounds[*a].min.x.total_cmp(&bounds[*b].min.x));

    let mut contacts = Vec::new();
    for (rank, &first) in scratch.sweep.iter().enumerate() {
        for &second in &scratch.sweep[rank + 1..] {
            if scratch.bounds[second].min.x > scratch.bounds[first].max.x {
                break;
            }
            let overlap = scratch.bounds[first].intersect(scratch.bounds[second]);
            if overlap.width() < 0.0 || overlap.height() < 0.0 {
                continue;
            }

            let (a, b) = (scratch.active[first], scratch.active[second]);

            let key = ordered_pair(scene.bodies[a].id, scene.bodies[b].id);
            scratch.touching.insert(key);

            let impulse = separate(scene, a, b, scratch.bounds[first], scratch.bounds[second]);
            if !scene.touching.contains(&key) {
                contacts.push(Contact {
                    body_a: scene.bodies[a].id,
                    body_b: scene.bodies[b].id,
                    point: overlap.center(),
                    impulse,
                });
            }
        }
    }

    std::mem::swap(&mut scene.touching, &mut scratch.touching);
    scene.scratch = scratch;
    contacts
}

/// Pushes two bodies whose collision bounds overlap apart along the shallower
/// axis and removes their approaching velocity. Returns the impulse in host units.
fn separate(scene: &mut Scene, a: usize, b: usize, bounds_a: Rect, bounds_b: Rect) -> f32 {
    let weight_a = inverse_mass(scene, a);
    let weight_b = inverse_mass(scene, b);
    let total = weight_a + weight_b;
    if total <= 0.0 {
        return 0.0;
    }

    let overlap = bounds_a.intersect(bounds_b);
    let between = bounds_b.center() - bounds_a.center();
    let normal = if overlap.width() < overlap.height() {
        Vec2::new(if between.x < 0.0 { -1.0 } else { 1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if between.y < 0.0 { -1.0 } else { 1.0 })
    };
    let depth = overlap.width().min(overlap.height()) * OVERLAP_CORRECTION;

    scene.bodies[a].position -= normal * depth * (weight_a / total);
    scene.bodies[b].position += normal * depth * (weight_b / total);

    let approaching = (scene.bodies[b].velocity - scene.bodies[a].velocity).dot(normal);
    if approaching >= 0.0 {
        return 0.0;
    }

    let impulse = -(1.0 + RESTITUTION) * approaching / total;
    scene.bodies[a].velocity -= normal * impulse * weight_a;
    scene.bodies[b].velocity += normal * impulse * weight_b;
    impulse / POINTS_PER_METER
}

fn clamp_to_bounds(scene: &mut Scene) {
    let world = scene.bounds;
    for body in scene
        .bodies
        .iter_mut()
        .filter(|body| body.in_scene && body.is_dynamic())
    {
        let bounds = body.collision_bounds();
        let mut shift = Vec2::ZERO;
        if bounds.min.x < world.min.x {
            shift.x = world.min.x - bounds.min.x;
        } else if bounds.max.x > world.max.x {
            shift.x = world.max.x - bounds.max.x;
        }
        if bounds.min.y < world.min.y {
            shift.y = world.min.y - bounds.min.y;
        } else if bounds.max.y > world.max.y {
            shift.y = world.max.y - bounds.max.y;
        }

        if shift.x != 0.0 {
            body.velocity.x = 0.0;
        }
        if shift.y != 0.0 {
            body.velocity.y = 0.0;
        }
        body.position += shift;

        if body.velocity.length_sq() < MIN_SLEEP_SPEED_SQ {
            body.velocity = Vec2::ZERO;
        }
    }
}

fn ordered_pair(a: BodyId, b: BodyId) -> (BodyId, BodyId) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn limit_only_pulls_past_its_length() {
        assert_eq!(stretch_beyond(vec2(3.0, 4.0), 10.0), Vec2::ZERO);
        let pulled = stretch_beyond(vec2(6.0, 8.0), 5.0);
        approx::assert_relative_eq!(pulled.x, 3.0);
        approx::assert_relative_eq!(pulled.y, 4.0);
    }

    #[test]
    fn pairs_are_order_independent() {
        assert_eq!(
            ordered_pair(BodyId(9), BodyId(2)),
            ordered_pair(BodyId(2), BodyId(9))
        );
    }

    #[test]
    fn sweep_finds_every_pair_under_a_wide_body() {
        use crate::build::FeatureNodeFactory;
        use crate::data::Dataset;
        use crate::engine::HostEngine;
        use crate::sim::{Rgb, SimulationState};

        let mut scene = Scene::new(2000.0);
        scene.set_gravity(Vec2::ZERO);
        let dataset = Dataset::empty();
        let mut state = SimulationState::default();
        state.set_screen_size(428.0, 428.0);

        let mut spawn = |state: &SimulationState, x: f32| {
            let descriptor = FeatureNodeFactory::new(state, &dataset).build_rectangle(
                1.0,
                Rgb::new(0.5, 0.5, 0.5),
                pos2(x, 100.0),
                true,
            );
            let id = scene.create_body(&descriptor);
            scene.add_to_scene(id);
            id
        };
        let left = spawn(&state, 50.0);
        let right = spawn(&state, 250.0);
        let far = spawn(&state, 600.0);
        state.box_width = 70.0;
        let wide = spawn(&state, 150.0);

        let contacts = step_bodies(&mut scene, 1.0 / 60.0);
        let mut pairs = contacts
            .iter()
            .map(|contact| ordered_pair(contact.body_a, contact.body_b))
            .collect::<Vec<_>>();
        pairs.sort();
        assert_eq!(pairs, vec![ordered_pair(left, wide), ordered_pair(right, wide)]);
        assert!(!pairs.iter().any(|(a, b)| *a == far || *b == far));
    }

    #[test]
    fn zero_time_step_changes_nothing() {
        let mut scene = Scene::new(100.0);
        assert!(step_bodies(&mut scene, 0.0).is_empty());
        assert_eq!(scene.bounds().max, pos2(100.0, 100.0));
    }
}
