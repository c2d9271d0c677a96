//! Two-body collisions on a 1-D track
//!
//! Bodies slide along a horizontal track between two walls. Positions are
//! in viewport pixels, velocities in m/s; radii are visual sizes that also
//! drive the contact test.

use glam::DVec2;

use super::params::{self, ParameterSet};
use super::simulation::Simulate;
use super::snapshot::{MarkerKind, RenderSnapshot};
use crate::consts::*;
use crate::settings::{Settings, Viewport};

/// Length of the drawn velocity arrow per m/s (px)
const ARROW_SCALE: f64 = 8.0;

/// Visual radius of a body, `20·m^(1/3)`
#[inline]
pub fn body_radius(mass: f64) -> f64 {
    BODY_RADIUS_SCALE * mass.cbrt()
}

#[inline]
pub fn kinetic_energy(mass: f64, velocity: f64) -> f64 {
    0.5 * mass * velocity * velocity
}

/// Post-collision velocities for restitution `k` (clamped to `[0, 1]`).
///
/// `k = 1` uses the elastic exchange formulas, `k = 0` gives both bodies the
/// centre-of-mass velocity, anything in between blends the two:
/// `v' = v_cm − k·(v − v_cm)`. Momentum is conserved for every `k`.
pub fn resolve_collision(m1: f64, v1: f64, m2: f64, v2: f64, restitution: f64) -> (f64, f64) {
    let k = restitution.clamp(0.0, 1.0);
    let total = m1 + m2;
    let v_cm = (m1 * v1 + m2 * v2) / total;

    if k == 0.0 {
        (v_cm, v_cm)
    } else if k == 1.0 {
        (
            ((m1 - m2) * v1 + 2.0 * m2 * v2) / total,
            ((m2 - m1) * v2 + 2.0 * m1 * v1) / total,
        )
    } else {
        (v_cm - k * (v1 - v_cm), v_cm - k * (v2 - v_cm))
    }
}

/// Mutable simulation state, separate from the tunable configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionState {
    pub x1: f64,
    pub x2: f64,
    pub v1: f64,
    pub v2: f64,
}

/// Collision event from the last tick (not kept across ticks)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Velocities before resolution
    pub before: (f64, f64),
    /// Velocities after resolution
    pub after: (f64, f64),
    /// Penetration depth that was split between the bodies (px)
    pub overlap: f64,
}

#[derive(Debug, Clone)]
pub struct TwoBodyCollision {
    pub mass1: f64,
    pub mass2: f64,
    pub restitution: f64,
    /// Initial conditions, applied on construction and reset
    pub initial: CollisionState,
    state: CollisionState,
    last_impact: Option<Impact>,
    viewport: Viewport,
}

impl TwoBodyCollision {
    pub fn new(params: &ParameterSet, settings: &Settings) -> Self {
        let initial = CollisionState {
            x1: params.value("x1"),
            x2: params.value("x2"),
            v1: params.value("velocity1"),
            v2: params.value("velocity2"),
        };
        Self {
            mass1: params.value("mass1").max(MIN_MASS),
            mass2: params.value("mass2").max(MIN_MASS),
            restitution: params.value("restitution"),
            initial,
            state: initial,
            last_impact: None,
            viewport: settings.viewport,
        }
    }

    pub fn state(&self) -> CollisionState {
        self.state
    }

    /// Overwrite the live state (host drag, test setup)
    pub fn set_state(&mut self, state: CollisionState) {
        self.state = state;
    }

    pub fn last_impact(&self) -> Option<Impact> {
        self.last_impact
    }

    pub fn radii(&self) -> (f64, f64) {
        (body_radius(self.mass1), body_radius(self.mass2))
    }

    pub fn momentum(&self) -> f64 {
        self.mass1 * self.state.v1 + self.mass2 * self.state.v2
    }

    pub fn kinetic_energy(&self) -> f64 {
        kinetic_energy(self.mass1, self.state.v1) + kinetic_energy(self.mass2, self.state.v2)
    }

    /// Advance one tick; returns the impact if one was resolved
    pub fn step(&mut self, dt: f64) -> Option<Impact> {
        let travel = dt * PIXELS_PER_METER;
        let (r1, r2) = self.radii();
        let s = &mut self.state;

        // +1 when body 2 sits to the right of body 1; gaps are measured in
        // that order so a predicted crossing reads as negative
        let dir = if s.x2 >= s.x1 { 1.0 } else { -1.0 };
        let next1 = s.x1 + s.v1 * travel;
        let next2 = s.x2 + s.v2 * travel;
        let contact = r1 + r2;

        // only converging contact counts; separating bodies are left alone
        let mut impact = None;
        if dir * (next2 - next1) < contact && dir * (s.v1 - s.v2) > 0.0 {
            let before = (s.v1, s.v2);
            let (v1, v2) = resolve_collision(self.mass1, s.v1, self.mass2, s.v2, self.restitution);
            s.v1 = v1;
            s.v2 = v2;

            let overlap = (contact - dir * (s.x2 - s.x1)).max(0.0);
            if overlap > 0.0 {
                s.x1 -= dir * overlap / 2.0;
                s.x2 += dir * overlap / 2.0;
            }

            impact = Some(Impact {
                before,
                after: (v1, v2),
                overlap,
            });
            log::debug!(
                "Collision: v=({:.3}, {:.3}) -> ({:.3}, {:.3}), overlap {:.3}",
                before.0,
                before.1,
                v1,
                v2,
                overlap
            );
        }

        s.x1 += s.v1 * travel;
        s.x2 += s.v2 * travel;

        let width = self.viewport.width;
        reflect_off_walls(&mut s.x1, &mut s.v1, r1, width);
        reflect_off_walls(&mut s.x2, &mut s.v2, r2, width);

        impact
    }
}

/// Clamp a body inside `[r, width − r]`, pointing its velocity back inward
fn reflect_off_walls(x: &mut f64, v: &mut f64, radius: f64, width: f64) {
    if *x < radius {
        *x = radius;
        *v = v.abs();
    } else if *x > width - radius {
        *x = width - radius;
        *v = -v.abs();
    }
}

impl Simulate for TwoBodyCollision {
    fn update(&mut self, dt: f64) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        self.last_impact = self.step(dt.min(MAX_FRAME_DT));
    }

    fn update_parameter(&mut self, name: &str, value: f64) -> bool {
        match name {
            "mass1" => self.mass1 = value.max(MIN_MASS),
            "mass2" => self.mass2 = value.max(MIN_MASS),
            "restitution" => self.restitution = value,
            // initial conditions also seed the live state
            "velocity1" => {
                self.initial.v1 = value;
                self.state.v1 = value;
            }
            "velocity2" => {
                self.initial.v2 = value;
                self.state.v2 = value;
            }
            "x1" => {
                self.initial.x1 = value;
                self.state.x1 = value;
            }
            "x2" => {
                self.initial.x2 = value;
                self.state.x2 = value;
            }
            _ => return false,
        }
        true
    }

    fn parameters(&self) -> ParameterSet {
        let mut set = ParameterSet::from_specs(params::COLLISIONS);
        set.set("mass1", self.mass1);
        set.set("mass2", self.mass2);
        set.set("velocity1", self.initial.v1);
        set.set("velocity2", self.initial.v2);
        set.set("restitution", self.restitution);
        set.set("x1", self.initial.x1);
        set.set("x2", self.initial.x2);
        set
    }

    fn reset(&mut self) {
        self.state = self.initial;
        self.last_impact = None;
    }

    fn sample(&self) -> RenderSnapshot {
        let (r1, r2) = self.radii();
        let track_y = self.viewport.mid_y();
        let floor = track_y + r1.max(r2);
        let p1 = DVec2::new(self.state.x1, track_y);
        let p2 = DVec2::new(self.state.x2, track_y);

        let mut snap = RenderSnapshot::new();
        snap.line(DVec2::new(0.0, floor), DVec2::new(self.viewport.width, floor))
            .marker(p1, r1, MarkerKind::Body)
            .marker(p2, r2, MarkerKind::Body)
            .line(p1, p1 + DVec2::new(self.state.v1 * ARROW_SCALE, 0.0))
            .line(p2, p2 + DVec2::new(self.state.v2 * ARROW_SCALE, 0.0))
            .readout("x1", self.state.x1)
            .readout("x2", self.state.x2)
            .readout("velocity1", self.state.v1)
            .readout("velocity2", self.state.v2)
            .readout("kineticEnergy1", kinetic_energy(self.mass1, self.state.v1))
            .readout("kineticEnergy2", kinetic_energy(self.mass2, self.state.v2))
            .readout("kineticEnergy", self.kinetic_energy())
            .readout("momentum", self.momentum())
            .readout("collided", if self.last_impact.is_some() { 1.0 } else { 0.0 });
        snap
    }
}
