//! Per-body, per-frame integration.
//!
//! One call advances one body by the fixed timestep, in a strict order:
//! gravity, field effects, semi-implicit Euler with multiplicative damping,
//! floor contact, sleep bookkeeping, force clear. Forces never persist
//! across frames.

use glam::Vec2;

use crate::{
    config::{
        SimSettings, FRICTION_GAIN, GROUNDED_ANGULAR_DAMP, GROUNDING_THRESHOLD, IMPACT_JITTER,
        SLEEP_ANGULAR_THRESHOLD, SLEEP_LINEAR_THRESHOLD, SLEEP_TIMEOUT,
    },
    core::body::{Body, BodyKind},
    utils::rng::JitterRng,
};

use super::fields::{self, FieldSnapshot};

/// Steps bodies forward in time with a fixed timestep.
#[derive(Debug, Clone)]
pub struct Integrator {
    pub dt: f32,
}

impl Integrator {
    pub fn new(dt: f32) -> Self {
        Self { dt }
    }

    /// Advances one body by one timestep. `index` is the body's registration
    /// index, used to exclude it from its own field snapshot.
    pub fn step_body(
        &self,
        body: &mut Body,
        index: usize,
        snapshot: &FieldSnapshot,
        settings: &SimSettings,
        rng: &mut JitterRng,
    ) {
        let dt = self.dt;

        match body.kind {
            BodyKind::Static => return,
            BodyKind::Kinematic => {
                // Externally driven: translate but take no forces.
                body.position += body.velocity * dt;
                if !body.fixed_rotation {
                    body.rotation += body.angular_velocity * dt;
                }
                return;
            }
            BodyKind::Dynamic => {}
        }

        if body.is_sleeping {
            // Frozen until a contact wakes it; the pose still gets sampled.
            return;
        }

        let gravity_scale = body.gravity_scale * settings.gravity_scale;
        if !body.is_grounded && gravity_scale > 0.0 {
            body.acceleration += settings.gravity * gravity_scale;
        }

        if let Some(magnet) = body.magnetism.filter(|m| m.enabled) {
            body.acceleration += snapshot.magnetism_accel(index, &magnet);
        }
        if let Some(effect) = body.buoyancy.filter(|b| b.enabled) {
            fields::apply_buoyancy(body, &effect, settings.gravity * gravity_scale, dt);
        }

        // Semi-implicit Euler: velocity first, then position from the new
        // velocity. Damping combines the global and per-body factors.
        body.velocity += body.acceleration * dt;
        body.angular_velocity += body.angular_acceleration * dt;
        body.velocity *= settings.damping * body.linear_damping;
        body.angular_velocity *= settings.damping * body.angular_damping;
        body.position += body.velocity * dt;
        if !body.fixed_rotation {
            body.rotation += body.angular_velocity * dt;
        }

        self.resolve_floor(body, settings, rng);

        if settings.enable_sleeping {
            update_sleep(body, dt);
        }

        body.acceleration = Vec2::ZERO;
        body.angular_acceleration = 0.0;
    }

    fn resolve_floor(&self, body: &mut Body, settings: &SimSettings, rng: &mut JitterRng) {
        if body.bottom_edge() < settings.floor_y - settings.collision_tolerance {
            body.is_grounded = false;
            return;
        }

        body.position.y = settings.floor_y - body.height * 0.5;

        if body.velocity.y > 0.0 {
            let impact_speed = body.velocity.y;
            body.velocity.y = -impact_speed * (body.restitution * settings.bounce);
            if !body.fixed_rotation {
                body.angular_velocity += rng.range(-0.5, 0.5) * impact_speed * IMPACT_JITTER;
            }
        }

        if body.velocity.y.abs() < GROUNDING_THRESHOLD {
            body.velocity.y = 0.0;
            body.is_grounded = true;
            body.velocity.x *= 1.0 - body.friction * FRICTION_GAIN;
            body.angular_velocity *= GROUNDED_ANGULAR_DAMP;
        } else {
            body.is_grounded = false;
        }
    }
}

fn update_sleep(body: &mut Body, dt: f32) {
    let still = body.velocity.length() < SLEEP_LINEAR_THRESHOLD
        && body.angular_velocity.abs() < SLEEP_ANGULAR_THRESHOLD;

    if still {
        body.sleep_timer += dt;
        if body.sleep_timer > SLEEP_TIMEOUT {
            body.is_sleeping = true;
            body.velocity = Vec2::ZERO;
            body.angular_velocity = 0.0;
        }
    } else {
        body.sleep_timer = 0.0;
        body.is_sleeping = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::Material;

    fn setup() -> (Integrator, SimSettings, JitterRng, FieldSnapshot) {
        let settings = SimSettings::default();
        let integrator = Integrator::new(settings.timestep());
        (
            integrator,
            settings,
            JitterRng::new(1),
            FieldSnapshot::default(),
        )
    }

    #[test]
    fn gravity_accelerates_downward() {
        let (integrator, settings, mut rng, snapshot) = setup();
        let mut body = Body::new(100.0, 100.0, Material::default());

        integrator.step_body(&mut body, 0, &snapshot, &settings, &mut rng);

        assert!(body.velocity.y > 0.0);
        assert!(body.position.y > 0.0);
        assert_eq!(body.acceleration, Vec2::ZERO, "forces cleared each frame");
    }

    #[test]
    fn static_and_sleeping_bodies_do_not_move() {
        let (integrator, settings, mut rng, snapshot) = setup();

        let mut fixed = Body::new(100.0, 100.0, Material::default());
        fixed.kind = BodyKind::Static;
        integrator.step_body(&mut fixed, 0, &snapshot, &settings, &mut rng);
        assert_eq!(fixed.position, Vec2::ZERO);

        let mut asleep = Body::new(100.0, 100.0, Material::default());
        asleep.is_sleeping = true;
        integrator.step_body(&mut asleep, 0, &snapshot, &settings, &mut rng);
        assert_eq!(asleep.position, Vec2::ZERO);
        assert_eq!(asleep.velocity, Vec2::ZERO);
    }

    #[test]
    fn kinematic_bodies_translate_without_forces() {
        let (integrator, settings, mut rng, snapshot) = setup();
        let mut body = Body::new(100.0, 100.0, Material::default());
        body.kind = BodyKind::Kinematic;
        body.velocity = Vec2::new(30.0, 0.0);

        integrator.step_body(&mut body, 0, &snapshot, &settings, &mut rng);

        assert!(body.position.x > 0.0);
        assert_eq!(body.position.y, 0.0, "gravity must not apply");
        assert_eq!(body.velocity, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn floor_clamps_and_grounds_slow_bodies() {
        let (integrator, mut settings, mut rng, snapshot) = setup();
        settings.floor_y = 100.0;
        settings.gravity = Vec2::ZERO;

        let mut body = Body::new(20.0, 20.0, Material::default());
        body.position = Vec2::new(0.0, 95.0);
        body.velocity = Vec2::new(0.0, 2.0);

        integrator.step_body(&mut body, 0, &snapshot, &settings, &mut rng);

        assert!(body.bottom_edge() <= settings.floor_y + 1e-3);
        assert!(body.is_grounded);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn fixed_rotation_suppresses_impact_jitter() {
        let (integrator, mut settings, mut rng, snapshot) = setup();
        settings.floor_y = 100.0;

        let mut body = Body::new(20.0, 20.0, Material::rubber());
        body.fixed_rotation = true;
        body.position = Vec2::new(0.0, 89.0);
        body.velocity = Vec2::new(0.0, 400.0);

        integrator.step_body(&mut body, 0, &snapshot, &settings, &mut rng);

        assert_eq!(body.angular_velocity, 0.0);
        assert_eq!(body.rotation, 0.0);
        assert!(body.velocity.y < 0.0, "fast impact should bounce");
    }

    #[test]
    fn stillness_accumulates_into_sleep() {
        let (integrator, mut settings, mut rng, snapshot) = setup();
        settings.floor_y = 10.0;
        settings.gravity = Vec2::ZERO;

        let mut body = Body::new(20.0, 20.0, Material::default());
        body.position = Vec2::new(0.0, 0.0);

        let mut slept_at = None;
        for frame in 0..60 {
            integrator.step_body(&mut body, 0, &snapshot, &settings, &mut rng);
            if body.is_sleeping {
                slept_at = Some(frame);
                break;
            }
        }
        let frame = slept_at.expect("a still body should fall asleep");
        assert!(frame as f32 / settings.frame_rate >= SLEEP_TIMEOUT);
    }
}
