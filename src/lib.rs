//! Animbake – 2D rigid-body physics baking for animation.
//!
//! This crate turns a set of seeded objects into a time-stepped rigid-body
//! simulation and records one pose per body per frame, ready to be written
//! back into a host document as keyframes. The kernel is deliberately
//! simple: single-pass collision response, damped-spring joints, a flat
//! floor, and per-body sleeping — tuned for short baked clips rather than
//! interactive accuracy.

pub mod bake;
pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod sim;
pub mod utils;

pub use glam::Vec2;

pub use bake::{bake, BodySeed, JointKind, JointSpec, KeyframeSink};
pub use config::SimSettings;
pub use self::core::{
    body::{Body, BodyKind, BuoyancyState, MagnetismState, Polarity},
    joint::Joint,
    material::Material,
};
pub use error::{Result, SimError};
pub use sim::{SimState, Simulation, Trajectory, TrajectorySample};

/// High-level convenience wrapper for the seed → simulate → bake pipeline.
pub struct BakeSession {
    sim: Simulation,
}

impl BakeSession {
    /// Creates a session with validated settings.
    pub fn new(settings: SimSettings) -> Result<Self> {
        Ok(Self {
            sim: Simulation::new(settings)?,
        })
    }

    /// Seeds one host object as a body and returns its registration index.
    pub fn add_body(&mut self, seed: &BodySeed) -> usize {
        let body = seed.build(self.sim.settings());
        self.sim.add_body(body)
    }

    /// Connects two seeded bodies.
    pub fn add_joint(&mut self, spec: &JointSpec) -> Result<()> {
        self.sim.add_joint(spec)
    }

    /// Runs the full simulation synchronously.
    pub fn run(&mut self) -> Result<()> {
        self.sim.run()
    }

    /// Writes the recorded trajectories into the host's sink, returning the
    /// number of bodies baked successfully.
    pub fn bake_into<S: KeyframeSink>(&self, sink: &mut S) -> usize {
        bake(self.sim.trajectories(), sink)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }
}
