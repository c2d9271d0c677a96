//! Damped spring oscillator
//!
//! `m·x'' + k·x + b·x' = 0`, integrated with RK4. The mass slides
//! horizontally from a wall anchor on the left.

use glam::DVec2;

use super::integrator::rk4_step;
use super::params::ParameterSet;
use super::simulation::Simulate;
use super::snapshot::{MarkerKind, RenderSnapshot, Stroke};
use crate::consts::*;
use crate::settings::{Settings, Viewport};

/// Zig-zag turns drawn between anchor and mass
const COIL_TURNS: usize = 12;

#[derive(Debug, Clone)]
pub struct SpringOscillator {
    /// Spring constant k (N/m)
    pub spring_constant: f64,
    /// Mass (kg)
    pub mass: f64,
    /// Damping coefficient b (kg/s)
    pub damping: f64,
    /// Displacement from rest (m)
    x: f64,
    /// Velocity (m/s)
    v: f64,
    viewport: Viewport,
}

impl SpringOscillator {
    pub fn new(params: &ParameterSet, settings: &Settings) -> Self {
        Self {
            spring_constant: params.value("springConstant"),
            mass: params.value("mass").max(MIN_MASS),
            damping: params.value("damping"),
            x: SPRING_INITIAL_DISPLACEMENT,
            v: 0.0,
            viewport: settings.viewport,
        }
    }

    pub fn displacement(&self) -> f64 {
        self.x
    }

    pub fn velocity(&self) -> f64 {
        self.v
    }

    /// `[x', v']` for state `[x, v]`
    pub fn derivative(&self, state: &[f64; 2]) -> [f64; 2] {
        let [x, v] = *state;
        [v, -(self.spring_constant * x + self.damping * v) / self.mass]
    }

    /// Kinetic plus elastic energy (J)
    pub fn energy(&self) -> f64 {
        0.5 * self.mass * self.v * self.v + 0.5 * self.spring_constant * self.x * self.x
    }

    /// Undamped angular frequency √(k/m)
    pub fn natural_frequency(&self) -> f64 {
        (self.spring_constant / self.mass).sqrt()
    }

    fn anchor(&self) -> DVec2 {
        DVec2::new(self.viewport.width * 0.1, self.viewport.mid_y())
    }

    fn rest_length(&self) -> f64 {
        self.viewport.width * 0.4
    }

    fn pixels_per_meter(&self) -> f64 {
        self.viewport.width * 0.3
    }

    fn coil(&self, anchor: DVec2, end: DVec2) -> Vec<DVec2> {
        let amplitude = self.viewport.height * 0.04;
        let mut points = Vec::with_capacity(COIL_TURNS * 2 + 2);
        points.push(anchor);
        for i in 0..COIL_TURNS * 2 {
            let t = (i as f64 + 0.5) / (COIL_TURNS * 2) as f64;
            let side = if i % 2 == 0 { -1.0 } else { 1.0 };
            points.push(anchor.lerp(end, t) + DVec2::new(0.0, side * amplitude));
        }
        points.push(end);
        points
    }
}

impl Simulate for SpringOscillator {
    fn update(&mut self, dt: f64) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        let h = dt.min(MAX_FRAME_DT);
        let [x, v] = rk4_step(&[self.x, self.v], h, |s| self.derivative(s));
        self.x = x;
        self.v = v;
    }

    fn update_parameter(&mut self, name: &str, value: f64) -> bool {
        match name {
            "springConstant" => self.spring_constant = value,
            "mass" => self.mass = value.max(MIN_MASS),
            "damping" => self.damping = value,
            _ => return false,
        }
        true
    }

    fn parameters(&self) -> ParameterSet {
        let mut set = ParameterSet::from_specs(super::params::SPRING_OSCILLATOR);
        set.set("springConstant", self.spring_constant);
        set.set("mass", self.mass);
        set.set("damping", self.damping);
        set
    }

    fn reset(&mut self) {
        self.x = SPRING_INITIAL_DISPLACEMENT;
        self.v = 0.0;
    }

    fn sample(&self) -> RenderSnapshot {
        let anchor = self.anchor();
        let mass_pos = anchor + DVec2::new(self.rest_length() + self.x * self.pixels_per_meter(), 0.0);
        let wall_half = self.viewport.height * 0.15;

        let mut snap = RenderSnapshot::new();
        snap.line(
            anchor - DVec2::new(0.0, wall_half),
            anchor + DVec2::new(0.0, wall_half),
        )
        .polyline(self.coil(anchor, mass_pos), Stroke::Solid)
        .dashed(
            anchor + DVec2::new(self.rest_length(), -wall_half),
            anchor + DVec2::new(self.rest_length(), wall_half),
        )
        .marker(anchor, 4.0, MarkerKind::Anchor)
        .marker(mass_pos, 15.0 * self.mass.cbrt(), MarkerKind::Mass)
        .readout("displacement", self.x)
        .readout("velocity", self.v)
        .readout("energy", self.energy());
        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::registry::PhenomenonKind;

    fn spring(k: f64, m: f64, b: f64) -> SpringOscillator {
        let mut params = ParameterSet::defaults(PhenomenonKind::SpringOscillator);
        params.set("springConstant", k);
        params.set("mass", m);
        params.set("damping", b);
        SpringOscillator::new(&params, &Settings::default())
    }

    #[test]
    fn test_undamped_energy_is_conserved() {
        let mut s = spring(50.0, 1.0, 0.0);
        let e0 = s.energy();
        for _ in 0..1000 {
            s.update(0.005);
        }
        assert!((s.energy() - e0).abs() / e0 < 1e-6);
    }

    #[test]
    fn test_undamped_period() {
        let mut s = spring(50.0, 2.0, 0.0);
        let period = std::f64::consts::TAU / s.natural_frequency();
        let h = 0.001;
        let steps = (period / h).round() as usize;
        for _ in 0..steps {
            s.update(h);
        }
        assert!((s.displacement() - SPRING_INITIAL_DISPLACEMENT).abs() < 1e-3);
    }

    #[test]
    fn test_damping_decays_amplitude() {
        let mut s = spring(50.0, 1.0, 1.0);
        let e0 = s.energy();
        for _ in 0..1000 {
            s.update(0.01);
        }
        assert!(s.energy() < e0 * 0.01);
    }

    #[test]
    fn test_zero_mass_is_clamped() {
        let mut s = spring(50.0, 1.0, 0.1);
        s.update_parameter("mass", 0.0);
        assert!(s.mass > 0.0);
        assert!(!s.update_parameter("length", 1.0));
    }

    #[test]
    fn test_snapshot_places_mass_at_displacement() {
        let s = spring(50.0, 1.0, 0.1);
        let snap = s.sample();
        let mass = snap.markers_of(MarkerKind::Mass).next().unwrap();
        let expected_x = 70.0 + 280.0 + SPRING_INITIAL_DISPLACEMENT * 210.0;
        assert!((mass.pos.x - expected_x).abs() < 1e-9);
        let coil = &snap.polylines[0];
        assert_eq!(coil.points.len(), COIL_TURNS * 2 + 2);
        assert_eq!(*coil.points.last().unwrap(), mass.pos);
    }
}
