//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - State changes only through `update(dt)` and parameter writes
//! - Same inputs, same outputs (no clocks, no RNG)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod integrator;
pub mod mirror;
pub mod params;
pub mod pendulum;
pub mod registry;
pub mod simulation;
pub mod snapshot;
pub mod spring;
pub mod wave;

pub use clock::SimulationClock;
pub use collision::{CollisionState, Impact, TwoBodyCollision, resolve_collision};
pub use integrator::{OdeState, rk4_step};
pub use mirror::{MirrorKind, MirrorReflection, MirrorTrace};
pub use params::{ParamSpec, ParameterSet};
pub use pendulum::{DoublePendulum, SimplePendulum};
pub use registry::{Phenomenon, PhenomenonKind, catalogue, construct, construct_kind};
pub use simulation::{Simulate, Simulation};
pub use snapshot::{Marker, MarkerKind, Polyline, Readout, RenderSnapshot, Segment, Stroke};
pub use spring::SpringOscillator;
pub use wave::{ImpulseWaveform, PulseKind, StandingWave, StringWave, sinc};
