//! Time-stepped physics simulators. Each one owns its state and step function.

pub mod body;
pub mod circular;
pub mod collision;
pub mod kinematics;
pub mod nbody;
pub mod rope;

pub use body::{Body, TrailPoint};
pub use circular::{CircularMotionSim, CircularParams};
pub use collision::{Cart, CollisionTrack, TrackParams, resolve_collision, wall_bounce};
pub use kinematics::{FreefallParams, FreefallSim, ProjectileParams, ProjectileSim};
pub use nbody::{GravityParams, GravitySim, Integrator};
pub use rope::{RopeParams, RopePoint, RopeSim, Stick};
