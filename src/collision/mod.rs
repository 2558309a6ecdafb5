//! Pairwise body-body contact detection and response.
//!
//! Detection is a plain AABB overlap test over every unordered pair, and
//! each contact is resolved exactly once per frame with a single impulse
//! plus a positional push. Light interpenetration resolves cleanly; stacked
//! or high-energy contacts are a known limitation of the single-pass design.

use glam::Vec2;

use crate::{
    config::SimSettings,
    core::body::Body,
    utils::{
        arena::{Arena, Handle},
        math::direction_between,
    },
};

/// Axis-aligned bounding box from a body's center and extents.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_body(body: &Body) -> Self {
        let half = body.half_extents();
        Self {
            min: body.position - half,
            max: body.position + half,
        }
    }

    /// Per-axis overlap amounts after expanding both boxes by `tolerance`.
    /// Both components positive means the boxes are in contact.
    pub fn overlap(&self, other: &Aabb, tolerance: f32) -> Vec2 {
        Vec2::new(
            (self.max.x.min(other.max.x) - self.min.x.max(other.min.x)) + tolerance,
            (self.max.y.min(other.max.y) - self.min.y.max(other.min.y)) + tolerance,
        )
    }
}

/// Detects and resolves every eligible contact among the registered bodies.
pub fn resolve_pairs(bodies: &mut Arena<Body>, order: &[Handle], settings: &SimSettings) {
    for i in 0..order.len() {
        for j in (i + 1)..order.len() {
            let Some((body_a, body_b)) = bodies.get2_mut(order[i], order[j]) else {
                continue;
            };
            resolve_pair(body_a, body_b, settings.collision_tolerance);
        }
    }
}

fn resolve_pair(body_a: &mut Body, body_b: &mut Body, tolerance: f32) {
    if body_a.is_sleeping && body_b.is_sleeping {
        return;
    }
    if !body_a.is_dynamic() && !body_b.is_dynamic() {
        return;
    }
    if !body_a.can_collide_with(body_b) {
        return;
    }

    let overlap = Aabb::from_body(body_a).overlap(&Aabb::from_body(body_b), tolerance);
    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return;
    }

    // Contact always wakes both sides, even if resolution bails out below.
    body_a.wake();
    body_b.wake();

    let Some(normal) = direction_between(body_a.position, body_b.position) else {
        // Coincident centers: no usable normal, skip this pair for the frame.
        return;
    };

    apply_impulse(body_a, body_b, normal);
    separate(body_a, body_b, overlap, tolerance);
}

fn apply_impulse(body_a: &mut Body, body_b: &mut Body, normal: Vec2) {
    let inv_a = body_a.inverse_mass();
    let inv_b = body_b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return;
    }

    let relative = body_b.velocity - body_a.velocity;
    let along_normal = relative.dot(normal);
    if along_normal > 0.0 {
        // Already separating.
        return;
    }

    let restitution = body_a.restitution.min(body_b.restitution);
    let magnitude = -(1.0 + restitution) * along_normal / inv_sum;

    body_a.velocity -= normal * (magnitude * inv_a);
    body_b.velocity += normal * (magnitude * inv_b);
}

/// Pushes the pair apart along the axis of least penetration. The push is
/// split evenly between two dynamic bodies and lands entirely on the
/// dynamic side otherwise.
fn separate(body_a: &mut Body, body_b: &mut Body, overlap: Vec2, tolerance: f32) {
    let depth = overlap.min_element() - tolerance;
    if depth <= 0.0 {
        return;
    }

    let axis = if overlap.x < overlap.y {
        let side = if body_b.position.x >= body_a.position.x {
            1.0
        } else {
            -1.0
        };
        Vec2::new(side, 0.0)
    } else {
        let side = if body_b.position.y >= body_a.position.y {
            1.0
        } else {
            -1.0
        };
        Vec2::new(0.0, side)
    };

    let (share_a, share_b) = match (body_a.is_dynamic(), body_b.is_dynamic()) {
        (true, true) => (0.5, 0.5),
        (true, false) => (1.0, 0.0),
        (false, true) => (0.0, 1.0),
        (false, false) => return,
    };

    body_a.position -= axis * (depth * share_a);
    body_b.position += axis * (depth * share_b);
}
