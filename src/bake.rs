//! Plain-data interfaces between the host application and the kernel.
//!
//! The host extracts seeds from its own document model, feeds them in one
//! by one, and later receives the trajectories back through a
//! [`KeyframeSink`]. Both directions are per-body operations so a failure
//! on one object never takes down the rest.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    config::SimSettings,
    core::{
        body::{Body, BodyKind, BuoyancyState, MagnetismState},
        material::Material,
    },
    sim::{Trajectory, TrajectorySample},
    utils::math::clamp01,
};

/// Initial state of one host object entering the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySeed {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: BodyKind,
    /// Material preset name; falls back to the settings-level default.
    pub material: Option<String>,
    pub restitution: Option<f32>,
    pub friction: Option<f32>,
    #[serde(alias = "gravityScale")]
    pub gravity_scale: Option<f32>,
    #[serde(alias = "fixedRotation")]
    pub fixed_rotation: Option<bool>,
    #[serde(alias = "collisionGroup")]
    pub collision_group: Option<u32>,
    #[serde(alias = "collidesWith")]
    pub collides_with: Option<u32>,
    pub magnetism: Option<MagnetismState>,
    pub buoyancy: Option<BuoyancyState>,
}

impl Default for BodySeed {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            width: 100.0,
            height: 100.0,
            kind: BodyKind::Dynamic,
            material: None,
            restitution: None,
            friction: None,
            gravity_scale: None,
            fixed_rotation: None,
            collision_group: None,
            collides_with: None,
            magnetism: None,
            buoyancy: None,
        }
    }
}

impl BodySeed {
    /// Resolves the seed against the run settings into a simulated body.
    ///
    /// Coefficients resolve as: explicit per-seed override, else the named
    /// material preset, else the settings-level defaults on the `default`
    /// preset. Extents are scaled into scene units before mass derivation.
    pub fn build(&self, settings: &SimSettings) -> Body {
        let name = self.material.as_deref().unwrap_or(&settings.material);
        let mut preset = Material::resolve(name);
        if self.material.is_none() {
            if let Some(friction) = settings.friction {
                preset.friction = friction;
            }
        }

        let width = (self.width * self.scale.x).abs();
        let height = (self.height * self.scale.y).abs();

        let mut body = Body::new(width, height, preset);
        body.kind = self.kind;
        body.position = self.position;
        body.rotation = self.rotation;
        if let Some(restitution) = self.restitution {
            body.restitution = clamp01(restitution);
        }
        if let Some(friction) = self.friction {
            body.friction = clamp01(friction);
        }
        body.gravity_scale = self.gravity_scale.unwrap_or(1.0).max(0.0);
        body.fixed_rotation = self.fixed_rotation.unwrap_or(false) || settings.fixed_rotation;
        body.collision_group = self.collision_group.unwrap_or(settings.collision_group);
        if let Some(mask) = self.collides_with {
            body.collides_with = mask;
        }
        body.magnetism = self.magnetism;
        body.buoyancy = self.buoyancy;
        body
    }
}

/// Requested joint flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointKind {
    Distance,
    Spring,
    Pivot,
    Weld,
}

/// Host request to connect two registered bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointSpec {
    #[serde(alias = "bodyIndexA")]
    pub body_a: usize,
    #[serde(alias = "bodyIndexB")]
    pub body_b: usize,
    #[serde(alias = "jointType")]
    pub kind: JointKind,
    #[serde(default)]
    pub stiffness: Option<f32>,
    #[serde(default)]
    pub damping: Option<f32>,
    #[serde(default, alias = "targetDistance")]
    pub target_distance: Option<f32>,
    #[serde(default, alias = "anchorA")]
    pub anchor_a: Option<Vec2>,
    #[serde(default, alias = "anchorB")]
    pub anchor_b: Option<Vec2>,
}

impl JointSpec {
    pub fn new(body_a: usize, body_b: usize, kind: JointKind) -> Self {
        Self {
            body_a,
            body_b,
            kind,
            stiffness: None,
            damping: None,
            target_distance: None,
            anchor_a: None,
            anchor_b: None,
        }
    }
}

/// Receiver for baked keyframes, implemented by the host adapter.
pub trait KeyframeSink {
    type Error: std::fmt::Display;

    /// Writes one pose sample for the body at registration index `body`.
    fn write_sample(
        &mut self,
        body: usize,
        sample: &TrajectorySample,
    ) -> std::result::Result<(), Self::Error>;
}

/// Feeds every trajectory into the sink, isolating failures per body: a
/// body whose write fails is skipped with a warning and the rest proceed.
/// Returns the number of bodies written completely.
pub fn bake<S: KeyframeSink>(trajectories: &[Trajectory], sink: &mut S) -> usize {
    let mut written = 0;
    'bodies: for (index, trajectory) in trajectories.iter().enumerate() {
        for sample in trajectory {
            if let Err(err) = sink.write_sample(index, sample) {
                log::warn!("keyframe write failed for body {index}, skipping: {err}");
                continue 'bodies;
            }
        }
        written += 1;
    }
    written
}
