//! The simulation orchestrator.
//!
//! A [`Simulation`] owns the body and joint collections for one run,
//! advances them frame by frame, and records every body's pose into a
//! trajectory buffer. The whole run happens synchronously inside
//! [`Simulation::run`]; downstream baking wants the complete trajectories
//! at once, so there is no streaming output.

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    bake::{JointKind, JointSpec},
    collision,
    config::SimSettings,
    core::{body::Body, joint::Joint},
    dynamics::{fields::FieldSnapshot, integrator::Integrator, joints},
    error::{Result, SimError},
    utils::{
        arena::{Arena, Handle},
        logging::ScopedTimer,
        rng::JitterRng,
    },
};

/// Lifecycle of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    /// Bodies and joints may be registered; no trajectory data yet.
    Idle,
    /// The frame loop is executing.
    Running,
    /// Trajectory buffers are populated and readable.
    Completed,
    /// The last run was rejected before touching the trajectories.
    Failed,
}

/// One recorded pose, the unit of baked output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub position: Vec2,
    pub rotation: f32,
    /// Host-timeline time of this sample.
    pub time: f32,
    pub is_sleeping: bool,
}

/// Per-body recorded pose sequence, one sample per frame.
pub type Trajectory = Vec<TrajectorySample>;

/// Owns all simulation state for one run.
pub struct Simulation {
    settings: SimSettings,
    bodies: Arena<Body>,
    /// Registration order; index into this is the public body index.
    order: Vec<Handle>,
    joints: Vec<Joint>,
    trajectories: Vec<Trajectory>,
    state: SimState,
    rng: JitterRng,
}

impl Simulation {
    /// Creates a simulation from validated settings.
    pub fn new(settings: SimSettings) -> Result<Self> {
        settings.validate()?;
        let rng = JitterRng::new(settings.seed);
        Ok(Self {
            settings,
            bodies: Arena::new(),
            order: Vec::new(),
            joints: Vec::new(),
            trajectories: Vec::new(),
            state: SimState::Idle,
            rng,
        })
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    /// Registers a body and returns its stable registration index.
    pub fn add_body(&mut self, body: Body) -> usize {
        let handle = self.bodies.insert(body);
        self.order.push(handle);
        self.order.len() - 1
    }

    pub fn body_count(&self) -> usize {
        self.order.len()
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(*self.order.get(index)?)
    }

    pub fn body_mut(&mut self, index: usize) -> Option<&mut Body> {
        let handle = *self.order.get(index)?;
        self.bodies.get_mut(handle)
    }

    /// Creates a joint between two registered bodies. Indices are validated
    /// here; a malformed spec is rejected rather than silently ignored.
    pub fn add_joint(&mut self, spec: &JointSpec) -> Result<()> {
        let count = self.order.len();
        for index in [spec.body_a, spec.body_b] {
            if index >= count {
                return Err(SimError::InvalidJointIndex { index, count });
            }
        }
        if spec.body_a == spec.body_b {
            return Err(SimError::JointBodiesEqual(spec.body_a));
        }

        let handle_a = self.order[spec.body_a];
        let handle_b = self.order[spec.body_b];
        let (Some(body_a), Some(body_b)) = (self.bodies.get(handle_a), self.bodies.get(handle_b))
        else {
            return Err(SimError::StaleBody);
        };

        // Rest quantities default to the current configuration so a joint
        // holds whatever pose the animator set up.
        let current_distance = body_a.position.distance(body_b.position);
        let current_offset = body_b.position - body_a.position;
        let rest_length = spec.target_distance.unwrap_or(current_distance);

        let joint = match spec.kind {
            JointKind::Distance => Joint::Distance {
                body_a: handle_a,
                body_b: handle_b,
                rest_length,
                stiffness: spec.stiffness.unwrap_or(0.5),
            },
            JointKind::Spring => Joint::Spring {
                body_a: handle_a,
                body_b: handle_b,
                rest_length,
                stiffness: spec.stiffness.unwrap_or(0.5),
                damping: spec.damping.unwrap_or(0.1),
            },
            JointKind::Pivot => Joint::Pivot {
                body_a: handle_a,
                body_b: handle_b,
                anchor_a: spec.anchor_a.unwrap_or(current_offset * 0.5),
                anchor_b: spec.anchor_b.unwrap_or(-current_offset * 0.5),
                stiffness: spec.stiffness.unwrap_or(0.5),
            },
            JointKind::Weld => Joint::Weld {
                body_a: handle_a,
                body_b: handle_b,
                rest_offset: current_offset,
                stiffness: spec.stiffness.unwrap_or(1.0),
            },
        };
        self.joints.push(joint);
        Ok(())
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Runs the whole frame loop to completion and fills the trajectory
    /// buffers, one sample per body per frame.
    pub fn run(&mut self) -> Result<()> {
        if self.order.is_empty() {
            self.state = SimState::Failed;
            return Err(SimError::NoBodies);
        }

        let frames = self.settings.frame_count();
        let integrator = Integrator::new(self.settings.timestep());
        debug!(
            "baking {} bodies, {} joints over {} frames",
            self.order.len(),
            self.joints.len(),
            frames
        );

        self.state = SimState::Running;
        self.trajectories = self
            .order
            .iter()
            .map(|_| Trajectory::with_capacity(frames))
            .collect();

        for frame in 0..frames {
            self.step_frame(&integrator);

            let time = self.settings.start_time + frame as f32 / self.settings.frame_rate;
            for (trajectory, handle) in self.trajectories.iter_mut().zip(self.order.iter()) {
                if let Some(body) = self.bodies.get(*handle) {
                    trajectory.push(TrajectorySample {
                        position: body.position,
                        rotation: body.rotation,
                        time,
                        is_sleeping: body.is_sleeping,
                    });
                }
            }
        }

        self.state = SimState::Completed;
        Ok(())
    }

    /// Recorded output, ordered by body registration.
    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    /// Clears bodies, joints and trajectories and invalidates every handle
    /// captured so far.
    pub fn reset(&mut self) {
        self.bodies.clear();
        self.order.clear();
        self.joints.clear();
        self.trajectories.clear();
        self.rng = JitterRng::new(self.settings.seed);
        self.state = SimState::Idle;
    }

    fn step_frame(&mut self, integrator: &Integrator) {
        // Field effects must see positions from before this frame's moves.
        let snapshot = FieldSnapshot::capture(&self.bodies, &self.order);

        {
            let _timer = ScopedTimer::new("integrate");
            for (index, handle) in self.order.iter().enumerate() {
                if let Some(body) = self.bodies.get_mut(*handle) {
                    integrator.step_body(body, index, &snapshot, &self.settings, &mut self.rng);
                }
            }
        }

        if self.settings.enable_inter_body_collision {
            let _timer = ScopedTimer::new("collision");
            collision::resolve_pairs(&mut self.bodies, &self.order, &self.settings);
        }

        {
            let _timer = ScopedTimer::new("joints");
            joints::solve_joints(&mut self.bodies, &self.joints, integrator.dt);
        }
    }
}
