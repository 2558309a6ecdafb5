use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::MIN_MASS;

use super::material::Material;

/// How a body participates in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyKind {
    /// Integrates forces and responds to contacts.
    #[default]
    Dynamic,
    /// Never moves; contributes infinite mass to contacts.
    Static,
    /// Moves only when driven externally; immovable for everyone else.
    Kinematic,
}

/// Magnetic pole orientation. Opposite poles attract, like poles repel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    North,
    South,
}

impl Polarity {
    pub fn sign(self) -> f32 {
        match self {
            Polarity::North => 1.0,
            Polarity::South => -1.0,
        }
    }
}

/// Per-body magnetism effect state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MagnetismState {
    pub enabled: bool,
    pub polarity: Polarity,
    pub strength: f32,
}

/// Per-body buoyancy effect state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuoyancyState {
    pub enabled: bool,
    /// Density of the displaced medium relative to the gravity field.
    pub density: f32,
    /// Per-second multiplicative velocity drag.
    pub drag_factor: f32,
}

/// One simulated object: a box with kinematic state and response coefficients.
#[derive(Debug, Clone)]
pub struct Body {
    pub kind: BodyKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub rotation: f32,
    pub angular_velocity: f32,
    pub angular_acceleration: f32,
    pub mass: f32,
    pub width: f32,
    pub height: f32,
    pub restitution: f32,
    pub friction: f32,
    pub gravity_scale: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub fixed_rotation: bool,
    pub is_grounded: bool,
    pub is_sleeping: bool,
    pub sleep_timer: f32,
    pub collision_group: u32,
    pub collides_with: u32,
    pub magnetism: Option<MagnetismState>,
    pub buoyancy: Option<BuoyancyState>,
}

impl Body {
    /// Creates a dynamic body of the given extents with coefficients taken
    /// from a material. Mass is derived from area and clamped so degenerate
    /// extents can never produce a zero or negative mass.
    pub fn new(width: f32, height: f32, material: Material) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            rotation: 0.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            mass: derive_mass(width, height, material.density),
            width,
            height,
            restitution: material.restitution,
            friction: material.friction,
            gravity_scale: 1.0,
            linear_damping: 1.0,
            angular_damping: 1.0,
            fixed_rotation: false,
            is_grounded: false,
            is_sleeping: false,
            sleep_timer: 0.0,
            collision_group: 1,
            collides_with: u32::MAX,
            magnetism: None,
            buoyancy: None,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    /// Inverse mass as used by the impulse solver. Static and kinematic
    /// bodies act as infinite mass.
    pub fn inverse_mass(&self) -> f32 {
        if self.is_dynamic() {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// World-space Y of the body's bottom edge.
    pub fn bottom_edge(&self) -> f32 {
        self.position.y + self.height * 0.5
    }

    /// Clears sleep state, e.g. when a contact disturbs the body.
    pub fn wake(&mut self) {
        self.is_sleeping = false;
        self.sleep_timer = 0.0;
    }

    /// Whether this body's group/mask pair permits contact with `other`.
    pub fn can_collide_with(&self, other: &Body) -> bool {
        (self.collision_group & other.collides_with) != 0
            && (other.collision_group & self.collides_with) != 0
    }
}

/// Mass from area and density, clamped to a positive floor.
pub fn derive_mass(width: f32, height: f32, density: f32) -> f32 {
    (width * height * density).max(MIN_MASS)
}
