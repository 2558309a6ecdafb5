//! Optional field effects: magnetism and buoyancy.
//!
//! Field accelerations are computed against a snapshot of positions taken
//! at the start of the frame, never against bodies already moved this
//! frame, so the result is independent of body processing order.

use glam::Vec2;

use crate::{
    config::MAGNET_MIN_DISTANCE,
    core::body::{Body, BuoyancyState, MagnetismState},
    utils::arena::{Arena, Handle},
};

/// Frame-start view of every body relevant to field effects.
#[derive(Debug, Default)]
pub struct FieldSnapshot {
    /// Per registered body: position and, for enabled magnets, the
    /// polarity-signed strength.
    sources: Vec<(Vec2, Option<f32>)>,
}

impl FieldSnapshot {
    pub fn capture(bodies: &Arena<Body>, order: &[Handle]) -> Self {
        let sources = order
            .iter()
            .map(|handle| match bodies.get(*handle) {
                Some(body) => {
                    let magnet = body
                        .magnetism
                        .filter(|m| m.enabled)
                        .map(|m| m.polarity.sign() * m.strength);
                    (body.position, magnet)
                }
                None => (Vec2::ZERO, None),
            })
            .collect();
        Self { sources }
    }

    /// Total magnetic acceleration on the body at `index`, summed over every
    /// other enabled magnet. Opposite poles attract, like poles repel, with
    /// inverse-square falloff clamped at close range.
    pub fn magnetism_accel(&self, index: usize, magnet: &MagnetismState) -> Vec2 {
        let (own_position, _) = self.sources[index];
        let own_signed = magnet.polarity.sign() * magnet.strength;

        let mut accel = Vec2::ZERO;
        for (other_index, (other_position, other_signed)) in self.sources.iter().enumerate() {
            if other_index == index {
                continue;
            }
            let Some(other_signed) = other_signed else {
                continue;
            };

            let delta = *other_position - own_position;
            let dist_sq = delta
                .length_squared()
                .max(MAGNET_MIN_DISTANCE * MAGNET_MIN_DISTANCE);
            let len = delta.length();
            if len < 1e-6 {
                continue;
            }
            let dir = delta / len;

            // Like-pole product is positive, which pushes away from the
            // other magnet; opposite poles pull toward it.
            accel += dir * (-(own_signed * other_signed) / dist_sq);
        }
        accel
    }
}

/// Applies buoyant lift and medium drag to one body.
pub fn apply_buoyancy(body: &mut Body, effect: &BuoyancyState, gravity_accel: Vec2, dt: f32) {
    body.acceleration -= gravity_accel * effect.density;
    let drag = (1.0 - effect.drag_factor * dt).clamp(0.0, 1.0);
    body.velocity *= drag;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::body::Polarity;
    use crate::core::material::Material;

    fn magnet_body(x: f32, polarity: Polarity) -> Body {
        let mut body = Body::new(10.0, 10.0, Material::default());
        body.position = Vec2::new(x, 0.0);
        body.magnetism = Some(MagnetismState {
            enabled: true,
            polarity,
            strength: 1000.0,
        });
        body
    }

    #[test]
    fn opposite_poles_attract_like_poles_repel() {
        let mut bodies = Arena::new();
        let a = bodies.insert(magnet_body(0.0, Polarity::North));
        let b = bodies.insert(magnet_body(100.0, Polarity::South));
        let order = vec![a, b];

        let snapshot = FieldSnapshot::capture(&bodies, &order);
        let magnet = bodies.get(a).unwrap().magnetism.unwrap();
        let accel = snapshot.magnetism_accel(0, &magnet);
        assert!(accel.x > 0.0, "north should be pulled toward south");

        let mut bodies = Arena::new();
        let a = bodies.insert(magnet_body(0.0, Polarity::North));
        let b = bodies.insert(magnet_body(100.0, Polarity::North));
        let order = vec![a, b];

        let snapshot = FieldSnapshot::capture(&bodies, &order);
        let magnet = bodies.get(a).unwrap().magnetism.unwrap();
        let accel = snapshot.magnetism_accel(0, &magnet);
        assert!(accel.x < 0.0, "like poles should repel");
    }

    #[test]
    fn buoyancy_counteracts_gravity_and_drags() {
        let mut body = Body::new(10.0, 10.0, Material::default());
        body.velocity = Vec2::new(50.0, 0.0);
        let effect = BuoyancyState {
            enabled: true,
            density: 1.0,
            drag_factor: 0.5,
        };

        apply_buoyancy(&mut body, &effect, Vec2::new(0.0, 980.0), 1.0 / 30.0);

        assert!(body.acceleration.y < 0.0, "lift opposes gravity (Y-down)");
        assert!(body.velocity.x < 50.0, "drag slows the body");
    }
}
