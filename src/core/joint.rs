use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::utils::arena::Handle;

/// A constraint between two distinct bodies.
///
/// Each variant carries only the fields its solver pass reads, so invalid
/// combinations (a pivot with a rest length, a distance joint with anchors)
/// cannot be represented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Joint {
    /// Keeps the center distance at `rest_length` via positional correction.
    Distance {
        body_a: Handle,
        body_b: Handle,
        rest_length: f32,
        stiffness: f32,
    },
    /// Hooke spring integrated into velocities, with relative-velocity damping.
    Spring {
        body_a: Handle,
        body_b: Handle,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    },
    /// Simplified hinge: drives one body toward a fixed offset from the
    /// other's anchor.
    Pivot {
        body_a: Handle,
        body_b: Handle,
        anchor_a: Vec2,
        anchor_b: Vec2,
        stiffness: f32,
    },
    /// Rigid coupling: holds the relative offset captured at creation.
    Weld {
        body_a: Handle,
        body_b: Handle,
        rest_offset: Vec2,
        stiffness: f32,
    },
}

impl Joint {
    /// The two bodies this joint connects.
    pub fn bodies(&self) -> (Handle, Handle) {
        match self {
            Joint::Distance { body_a, body_b, .. }
            | Joint::Spring { body_a, body_b, .. }
            | Joint::Pivot { body_a, body_b, .. }
            | Joint::Weld { body_a, body_b, .. } => (*body_a, *body_b),
        }
    }
}
