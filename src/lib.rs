//! Physics Demos - simulation kernel for interactive physics demonstrations
//!
//! Core modules:
//! - `sim`: Deterministic simulation variants (pendulums, waves, collisions, mirrors)
//! - `settings`: Host-facing configuration (viewport, frame clamp, trail length)
//! - `error`: Kernel error type
//!
//! Windowing, widgets and drawing are left to the host. Every variant exposes
//! a [`sim::RenderSnapshot`] made of plain points, segments and readouts.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{KernelError, Result};
pub use settings::{Settings, Viewport};
pub use sim::{PhenomenonKind, Simulation, SimulationClock};

use glam::DVec2;

/// Kernel configuration constants
pub mod consts {
    /// Gravitational acceleration (m/s²)
    pub const G: f64 = 9.81;

    /// Upper bound on a single frame delta handed to any variant (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Double pendulum: semi-implicit Euler step clamp (seconds)
    pub const DOUBLE_PENDULUM_MAX_DT: f64 = 0.016;
    /// Double pendulum: per-tick time-scale multiplier
    pub const DOUBLE_PENDULUM_TIME_SCALE: f64 = 2.0;
    /// Double pendulum: per-tick velocity damping multiplier
    pub const DOUBLE_PENDULUM_VELOCITY_DAMPING: f64 = 0.9999;
    /// Trail points kept for the second bob
    pub const TRAIL_LENGTH: usize = 50;

    /// Default viewport (px)
    pub const VIEWPORT_WIDTH: f64 = 700.0;
    pub const VIEWPORT_HEIGHT: f64 = 400.0;

    /// Collision: body radius scale (px per kg^(1/3))
    pub const BODY_RADIUS_SCALE: f64 = 20.0;
    /// Collision: screen pixels per metre of travel
    pub const PIXELS_PER_METER: f64 = 50.0;
    /// Smallest mass a collision body or pendulum bob may carry
    pub const MIN_MASS: f64 = 1e-6;

    /// String wave: wavelength per sqrt(N) of tension (px)
    pub const WAVELENGTH_PER_SQRT_TENSION: f64 = 50.0;
    /// Impulse: pixels per unit of pulse width
    pub const PULSE_WIDTH_SCALE: f64 = 100.0;

    /// Spring: initial displacement from rest (m)
    pub const SPRING_INITIAL_DISPLACEMENT: f64 = 0.5;

    /// Mirror: radius of curvature at curvature = 1 (px)
    pub const MIRROR_BASE_RADIUS: f64 = 300.0;
    /// Mirror: half-width of the ray bundle at the mirror (px)
    pub const MIRROR_HALF_APERTURE: f64 = 120.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Point at `length` along a pendulum rod hanging from `pivot`.
///
/// Angle 0 hangs straight down; screen y grows downward.
#[inline]
pub fn pendulum_point(pivot: DVec2, length: f64, theta: f64) -> DVec2 {
    pivot + DVec2::new(length * theta.sin(), length * theta.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pendulum_point_hangs_down_at_zero() {
        let p = pendulum_point(DVec2::new(10.0, 10.0), 5.0, 0.0);
        assert!((p.x - 10.0).abs() < 1e-12);
        assert!((p.y - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, std::f64::consts::FRAC_PI_2);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
    }
}
