//! Single-pass joint constraint corrections.
//!
//! Joints are damped correction springs, not exact constraints: each frame
//! applies one correction per joint, in creation order, after integration
//! and collision response. Conflicting joints on the same bodies are
//! therefore order-dependent. Static and kinematic sides never receive
//! corrections.

use glam::Vec2;

use crate::{
    core::{body::Body, joint::Joint},
    utils::{
        arena::{Arena, Handle},
        math::direction_between,
    },
};

/// Applies every joint once, in insertion order.
pub fn solve_joints(bodies: &mut Arena<Body>, joints: &[Joint], dt: f32) {
    for joint in joints {
        let (handle_a, handle_b) = joint.bodies();
        let Some((body_a, body_b)) = bodies.get2_mut(handle_a, handle_b) else {
            continue;
        };

        match joint {
            Joint::Distance {
                rest_length,
                stiffness,
                ..
            } => solve_distance(body_a, body_b, *rest_length, *stiffness),
            Joint::Spring {
                rest_length,
                stiffness,
                damping,
                ..
            } => solve_spring(body_a, body_b, *rest_length, *stiffness, *damping, dt),
            Joint::Pivot {
                anchor_a,
                anchor_b,
                stiffness,
                ..
            } => solve_pivot(body_a, body_b, *anchor_a, *anchor_b, *stiffness),
            Joint::Weld {
                rest_offset,
                stiffness,
                ..
            } => solve_weld(body_a, body_b, *rest_offset, *stiffness),
        }
    }
}

fn solve_distance(body_a: &mut Body, body_b: &mut Body, rest_length: f32, stiffness: f32) {
    let Some(normal) = direction_between(body_a.position, body_b.position) else {
        return;
    };
    let distance = body_a.position.distance(body_b.position);
    let error = distance - rest_length;
    if error.abs() < 1e-6 {
        return;
    }

    let inv_a = body_a.inverse_mass();
    let inv_b = body_b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return;
    }

    // Each side absorbs a share of the correction proportional to its own
    // inverse mass, so a heavy body barely moves against a light one.
    let correction = error * stiffness;
    body_a.position += normal * (correction * (inv_a / inv_sum));
    body_b.position -= normal * (correction * (inv_b / inv_sum));
}

fn solve_spring(
    body_a: &mut Body,
    body_b: &mut Body,
    rest_length: f32,
    stiffness: f32,
    damping: f32,
    dt: f32,
) {
    let Some(normal) = direction_between(body_a.position, body_b.position) else {
        return;
    };
    let extension = body_a.position.distance(body_b.position) - rest_length;

    // Hooke force integrated into velocity this frame, not into position.
    let force = stiffness * extension;
    body_a.velocity += normal * (force * body_a.inverse_mass() * dt);
    body_b.velocity -= normal * (force * body_b.inverse_mass() * dt);

    let relative = body_b.velocity - body_a.velocity;
    if body_a.is_dynamic() {
        body_a.velocity += relative * damping;
    }
    if body_b.is_dynamic() {
        body_b.velocity -= relative * damping;
    }
}

fn solve_pivot(
    body_a: &mut Body,
    body_b: &mut Body,
    anchor_a: Vec2,
    anchor_b: Vec2,
    stiffness: f32,
) {
    // Simplified hinge: the dynamic side is pulled toward the pivot offset.
    // No angular limits or motors.
    if body_b.is_dynamic() {
        let target = body_a.position + anchor_a - anchor_b;
        body_b.position += (target - body_b.position) * stiffness;
    } else if body_a.is_dynamic() {
        let target = body_b.position + anchor_b - anchor_a;
        body_a.position += (target - body_a.position) * stiffness;
    }
}

fn solve_weld(body_a: &mut Body, body_b: &mut Body, rest_offset: Vec2, stiffness: f32) {
    match (body_a.is_dynamic(), body_b.is_dynamic()) {
        // Against an immovable side the dynamic body snaps rigid.
        (true, false) => {
            body_a.position = body_b.position - rest_offset;
            body_a.velocity = Vec2::ZERO;
            body_a.angular_velocity = 0.0;
        }
        (false, true) => {
            body_b.position = body_a.position + rest_offset;
            body_b.velocity = Vec2::ZERO;
            body_b.angular_velocity = 0.0;
        }
        // Two dynamic bodies correct toward the captured offset and share
        // one velocity to emulate rigidity.
        (true, true) => {
            let error = (body_b.position - body_a.position) - rest_offset;
            body_a.position += error * (0.5 * stiffness);
            body_b.position -= error * (0.5 * stiffness);

            let mean = (body_a.velocity + body_b.velocity) * 0.5;
            body_a.velocity = mean;
            body_b.velocity = mean;
        }
        (false, false) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::body::BodyKind;
    use crate::core::material::Material;

    fn pair(ax: f32, bx: f32) -> (Arena<Body>, Handle, Handle) {
        let mut bodies = Arena::new();
        let mut a = Body::new(10.0, 10.0, Material::default());
        a.position = Vec2::new(ax, 0.0);
        let mut b = Body::new(10.0, 10.0, Material::default());
        b.position = Vec2::new(bx, 0.0);
        let ha = bodies.insert(a);
        let hb = bodies.insert(b);
        (bodies, ha, hb)
    }

    #[test]
    fn full_stiffness_distance_corrects_in_one_pass() {
        let (mut bodies, ha, hb) = pair(0.0, 150.0);
        let joint = Joint::Distance {
            body_a: ha,
            body_b: hb,
            rest_length: 100.0,
            stiffness: 1.0,
        };

        solve_joints(&mut bodies, &[joint], 1.0 / 30.0);

        let distance = bodies
            .get(ha)
            .unwrap()
            .position
            .distance(bodies.get(hb).unwrap().position);
        assert!((distance - 100.0).abs() < 1e-3);
    }

    #[test]
    fn distance_leaves_static_side_in_place() {
        let (mut bodies, ha, hb) = pair(0.0, 150.0);
        bodies.get_mut(ha).unwrap().kind = BodyKind::Static;
        let joint = Joint::Distance {
            body_a: ha,
            body_b: hb,
            rest_length: 100.0,
            stiffness: 1.0,
        };

        solve_joints(&mut bodies, &[joint], 1.0 / 30.0);

        assert_eq!(bodies.get(ha).unwrap().position, Vec2::ZERO);
        assert!((bodies.get(hb).unwrap().position.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn weld_snaps_dynamic_side_to_static_anchor() {
        let (mut bodies, ha, hb) = pair(0.0, 120.0);
        bodies.get_mut(ha).unwrap().kind = BodyKind::Static;
        bodies.get_mut(hb).unwrap().velocity = Vec2::new(50.0, -20.0);
        let joint = Joint::Weld {
            body_a: ha,
            body_b: hb,
            rest_offset: Vec2::new(100.0, 0.0),
            stiffness: 1.0,
        };

        solve_joints(&mut bodies, &[joint], 1.0 / 30.0);

        let b = bodies.get(hb).unwrap();
        assert_eq!(b.position, Vec2::new(100.0, 0.0));
        assert_eq!(b.velocity, Vec2::ZERO);
    }

    #[test]
    fn weld_averages_velocities_of_two_dynamic_bodies() {
        let (mut bodies, ha, hb) = pair(0.0, 100.0);
        bodies.get_mut(ha).unwrap().velocity = Vec2::new(10.0, 0.0);
        bodies.get_mut(hb).unwrap().velocity = Vec2::new(-4.0, 6.0);
        let joint = Joint::Weld {
            body_a: ha,
            body_b: hb,
            rest_offset: Vec2::new(100.0, 0.0),
            stiffness: 1.0,
        };

        solve_joints(&mut bodies, &[joint], 1.0 / 30.0);

        let mean = Vec2::new(3.0, 3.0);
        assert_eq!(bodies.get(ha).unwrap().velocity, mean);
        assert_eq!(bodies.get(hb).unwrap().velocity, mean);
    }

    #[test]
    fn pivot_pulls_follower_toward_anchor() {
        let (mut bodies, ha, hb) = pair(0.0, 80.0);
        bodies.get_mut(ha).unwrap().kind = BodyKind::Static;
        let joint = Joint::Pivot {
            body_a: ha,
            body_b: hb,
            anchor_a: Vec2::new(0.0, 50.0),
            anchor_b: Vec2::ZERO,
            stiffness: 0.5,
        };

        let before = bodies.get(hb).unwrap().position;
        solve_joints(&mut bodies, &[joint], 1.0 / 30.0);
        let after = bodies.get(hb).unwrap().position;

        let target = Vec2::new(0.0, 50.0);
        assert!(after.distance(target) < before.distance(target));
    }
}
