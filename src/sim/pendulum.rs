//! Simple and double pendulum
//!
//! Angles are measured from the downward vertical, in radians. Screen layout
//! hangs the pivot near the top of the viewport with y growing downward.

use glam::DVec2;

use super::integrator::rk4_step;
use super::params::ParameterSet;
use super::simulation::Simulate;
use super::snapshot::{MarkerKind, RenderSnapshot, Stroke};
use crate::consts::*;
use crate::pendulum_point;
use crate::settings::{Settings, Viewport};

/// Simple pendulum with linear velocity damping, integrated by RK4
#[derive(Debug, Clone)]
pub struct SimplePendulum {
    /// Rod length (m)
    pub length: f64,
    /// Initial angle (degrees), only applied on reset
    pub initial_angle: f64,
    /// Damping coefficient (1/s)
    pub damping: f64,
    theta: f64,
    omega: f64,
    viewport: Viewport,
}

impl SimplePendulum {
    pub fn new(params: &ParameterSet, settings: &Settings) -> Self {
        let mut pendulum = Self {
            length: params.value("length"),
            initial_angle: params.value("angle"),
            damping: params.value("damping"),
            theta: 0.0,
            omega: 0.0,
            viewport: settings.viewport,
        };
        pendulum.reset_angle(pendulum.initial_angle);
        pendulum
    }

    /// Hard reset: θ from degrees, ω = 0
    pub fn reset_angle(&mut self, degrees: f64) {
        self.initial_angle = degrees;
        self.theta = degrees.to_radians();
        self.omega = 0.0;
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// `[θ', ω']` for state `[θ, ω]`
    pub fn derivative(&self, state: &[f64; 2]) -> [f64; 2] {
        let [theta, omega] = *state;
        [omega, -G / self.length * theta.sin() - self.damping * omega]
    }

    /// Mechanical energy per unit bob mass (J/kg), zero at rest hanging down
    pub fn energy(&self) -> f64 {
        let v = self.length * self.omega;
        0.5 * v * v + G * self.length * (1.0 - self.theta.cos())
    }

    fn pivot(&self) -> DVec2 {
        DVec2::new(self.viewport.width / 2.0, self.viewport.height / 3.0)
    }

    fn pixels_per_meter(&self) -> f64 {
        self.viewport.height / 3.0
    }
}

impl Simulate for SimplePendulum {
    fn update(&mut self, dt: f64) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        let h = dt.min(MAX_FRAME_DT);
        let [theta, omega] = rk4_step(&[self.theta, self.omega], h, |s| self.derivative(s));
        self.theta = theta;
        self.omega = omega;
    }

    fn update_parameter(&mut self, name: &str, value: f64) -> bool {
        match name {
            "length" => self.length = value,
            "damping" => self.damping = value,
            "angle" => self.reset_angle(value),
            _ => return false,
        }
        true
    }

    fn parameters(&self) -> ParameterSet {
        let mut set = ParameterSet::from_specs(super::params::SIMPLE_PENDULUM);
        set.set("length", self.length);
        set.set("angle", self.initial_angle);
        set.set("damping", self.damping);
        set
    }

    fn reset(&mut self) {
        self.reset_angle(self.initial_angle);
    }

    fn sample(&self) -> RenderSnapshot {
        let pivot = self.pivot();
        let bob = pendulum_point(pivot, self.length * self.pixels_per_meter(), self.theta);

        let mut snap = RenderSnapshot::new();
        snap.line(pivot, bob)
            .marker(pivot, 5.0, MarkerKind::Pivot)
            .marker(bob, 15.0, MarkerKind::Bob)
            .readout("angle", self.theta.to_degrees())
            .readout("angularVelocity", self.omega)
            .readout("energy", self.energy());
        snap
    }
}

/// Below this the double pendulum denominator is treated as singular
const DEN_EPSILON: f64 = 1e-12;

/// Double pendulum, semi-implicit Euler with empirical stabilisers
#[derive(Debug, Clone)]
pub struct DoublePendulum {
    pub length1: f64,
    pub length2: f64,
    pub mass1: f64,
    pub mass2: f64,
    pub gravity: f64,
    /// Initial angles (degrees), applied on reset
    pub initial_angle1: f64,
    pub initial_angle2: f64,
    theta1: f64,
    omega1: f64,
    theta2: f64,
    omega2: f64,
    /// Second bob screen positions (newest first)
    trail: Vec<DVec2>,
    trail_length: usize,
    viewport: Viewport,
}

impl DoublePendulum {
    pub fn new(params: &ParameterSet, settings: &Settings) -> Self {
        let mut pendulum = Self {
            length1: params.value("length1"),
            length2: params.value("length2"),
            mass1: params.value("mass1").max(MIN_MASS),
            mass2: params.value("mass2").max(MIN_MASS),
            gravity: params.value("gravity"),
            initial_angle1: params.value("angle1"),
            initial_angle2: params.value("angle2"),
            theta1: 0.0,
            omega1: 0.0,
            theta2: 0.0,
            omega2: 0.0,
            trail: Vec::with_capacity(settings.trail_length),
            trail_length: settings.trail_length,
            viewport: settings.viewport,
        };
        pendulum.reset();
        pendulum
    }

    /// `(θ1, ω1, θ2, ω2)`
    pub fn state(&self) -> (f64, f64, f64, f64) {
        (self.theta1, self.omega1, self.theta2, self.omega2)
    }

    /// Trail of the second bob, newest first
    pub fn trail(&self) -> &[DVec2] {
        &self.trail
    }

    /// Angular accelerations `(ω1', ω2')`, or `None` when the system is
    /// singular or the result is not finite
    pub fn accelerations(&self) -> Option<(f64, f64)> {
        let (m1, m2) = (self.mass1, self.mass2);
        let (l1, l2) = (self.length1, self.length2);
        let g = self.gravity;
        let (t1, t2) = (self.theta1, self.theta2);
        let (w1, w2) = (self.omega1, self.omega2);
        let delta = t1 - t2;

        // parameter writes keep den ≥ 2·MIN_MASS; the public mass fields can
        // still be zeroed directly
        let den = 2.0 * m1 + m2 - m2 * (2.0 * t1 - 2.0 * t2).cos();
        if den.abs() < DEN_EPSILON {
            return None;
        }

        let a1 = (-g * (2.0 * m1 + m2) * t1.sin()
            - m2 * g * (t1 - 2.0 * t2).sin()
            - 2.0 * delta.sin() * m2 * (w2 * w2 * l2 + w1 * w1 * l1 * delta.cos()))
            / (l1 * den);
        let a2 = (2.0
            * delta.sin()
            * (w1 * w1 * l1 * (m1 + m2) + g * (m1 + m2) * t1.cos() + w2 * w2 * l2 * m2 * delta.cos()))
            / (l2 * den);

        (a1.is_finite() && a2.is_finite()).then_some((a1, a2))
    }

    /// Kinetic plus potential energy (J), potential zero at the pivot
    pub fn energy(&self) -> f64 {
        let (m1, m2) = (self.mass1, self.mass2);
        let (l1, l2) = (self.length1, self.length2);
        let (w1, w2) = (self.omega1, self.omega2);
        let delta = self.theta1 - self.theta2;

        let kinetic = 0.5 * m1 * l1 * l1 * w1 * w1
            + 0.5 * m2 * (l1 * l1 * w1 * w1 + l2 * l2 * w2 * w2 + 2.0 * l1 * l2 * w1 * w2 * delta.cos());
        let potential = -(m1 + m2) * self.gravity * l1 * self.theta1.cos()
            - m2 * self.gravity * l2 * self.theta2.cos();
        kinetic + potential
    }

    fn pivot(&self) -> DVec2 {
        DVec2::new(self.viewport.width / 2.0, self.viewport.height / 4.0)
    }

    fn pixels_per_meter(&self) -> f64 {
        self.viewport.height / 5.0
    }

    fn bobs(&self) -> (DVec2, DVec2) {
        let scale = self.pixels_per_meter();
        let bob1 = pendulum_point(self.pivot(), self.length1 * scale, self.theta1);
        let bob2 = pendulum_point(bob1, self.length2 * scale, self.theta2);
        (bob1, bob2)
    }

    /// Record the second bob; non-finite points never enter the trail
    fn record_trail(&mut self) {
        let (_, bob2) = self.bobs();
        if !bob2.is_finite() {
            log::warn!("Double pendulum produced a non-finite bob position, trail point skipped");
            return;
        }
        self.trail.insert(0, bob2);
        if self.trail.len() > self.trail_length {
            self.trail.pop();
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

impl Simulate for DoublePendulum {
    fn update(&mut self, dt: f64) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        let h = dt.min(DOUBLE_PENDULUM_MAX_DT) * DOUBLE_PENDULUM_TIME_SCALE;

        let (a1, a2) = self.accelerations().unwrap_or_else(|| {
            log::warn!("Double pendulum singular at θ1={} θ2={}, holding velocities", self.theta1, self.theta2);
            (0.0, 0.0)
        });

        let omega1 = (self.omega1 + a1 * h) * DOUBLE_PENDULUM_VELOCITY_DAMPING;
        let omega2 = (self.omega2 + a2 * h) * DOUBLE_PENDULUM_VELOCITY_DAMPING;
        let theta1 = self.theta1 + (self.omega1 + a1 * h) * h;
        let theta2 = self.theta2 + (self.omega2 + a2 * h) * h;

        if [omega1, omega2, theta1, theta2].iter().all(|v| v.is_finite()) {
            self.omega1 = omega1;
            self.omega2 = omega2;
            self.theta1 = theta1;
            self.theta2 = theta2;
        } else {
            log::warn!("Double pendulum state diverged, stopping bobs in place");
            self.omega1 = 0.0;
            self.omega2 = 0.0;
        }

        self.record_trail();
    }

    fn update_parameter(&mut self, name: &str, value: f64) -> bool {
        match name {
            "length1" => self.length1 = value,
            "length2" => self.length2 = value,
            "mass1" => self.mass1 = value.max(MIN_MASS),
            "mass2" => self.mass2 = value.max(MIN_MASS),
            "gravity" => self.gravity = value,
            "angle1" => {
                self.initial_angle1 = value;
                self.reset();
            }
            "angle2" => {
                self.initial_angle2 = value;
                self.reset();
            }
            _ => return false,
        }
        true
    }

    fn parameters(&self) -> ParameterSet {
        let mut set = ParameterSet::from_specs(super::params::DOUBLE_PENDULUM);
        set.set("length1", self.length1);
        set.set("length2", self.length2);
        set.set("angle1", self.initial_angle1);
        set.set("angle2", self.initial_angle2);
        set.set("mass1", self.mass1);
        set.set("mass2", self.mass2);
        set.set("gravity", self.gravity);
        set
    }

    fn reset(&mut self) {
        self.theta1 = self.initial_angle1.to_radians();
        self.theta2 = self.initial_angle2.to_radians();
        self.omega1 = 0.0;
        self.omega2 = 0.0;
        self.clear_trail();
    }

    fn sample(&self) -> RenderSnapshot {
        let pivot = self.pivot();
        let (bob1, bob2) = self.bobs();

        let mut snap = RenderSnapshot::new();
        if self.trail.len() >= 2 {
            snap.polyline(self.trail.clone(), Stroke::Solid);
        }
        snap.line(pivot, bob1)
            .line(bob1, bob2)
            .marker(pivot, 5.0, MarkerKind::Pivot)
            .marker(bob1, 10.0 * self.mass1.cbrt(), MarkerKind::Bob)
            .marker(bob2, 10.0 * self.mass2.cbrt(), MarkerKind::Bob)
            .readout("angle1", self.theta1.to_degrees())
            .readout("angle2", self.theta2.to_degrees())
            .readout("energy", self.energy());
        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::registry::PhenomenonKind;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    fn simple(length: f64, angle: f64, damping: f64) -> SimplePendulum {
        let mut params = ParameterSet::defaults(PhenomenonKind::SimplePendulum);
        params.set("length", length);
        params.set("angle", angle);
        params.set("damping", damping);
        SimplePendulum::new(&params, &Settings::default())
    }

    fn double() -> DoublePendulum {
        DoublePendulum::new(
            &ParameterSet::defaults(PhenomenonKind::DoublePendulum),
            &Settings::default(),
        )
    }

    #[test]
    fn test_simple_pendulum_starts_at_rest() {
        let p = simple(1.0, 45.0, 0.1);
        assert_eq!(p.theta(), 45.0_f64.to_radians());
        assert_eq!(p.omega(), 0.0);
    }

    #[test]
    fn test_period_returns_close_to_start() {
        let mut p = simple(1.0, 45.0, 0.0);
        let theta0 = 45.0_f64.to_radians();
        let period = std::f64::consts::TAU * (1.0 / G).sqrt();
        let h = 0.001;
        let steps = (period / h).round() as usize;
        for _ in 0..steps {
            p.update(h);
        }
        // The 45° nonlinear period is ~4% longer than the small-angle one, so
        // the bob is slightly short of its turning point.
        assert!((p.theta() - theta0).abs() / theta0 < 0.05, "theta {}", p.theta());
        assert!(p.theta() > 0.9 * theta0);
    }

    #[test]
    fn test_reset_semantics() {
        let mut p = simple(1.0, 45.0, 0.1);
        for _ in 0..100 {
            p.update(0.016);
        }
        assert!(p.omega() != 0.0);

        p.update_parameter("angle", 30.0);
        assert_eq!(p.omega(), 0.0);
        assert_eq!(p.theta(), 30.0_f64.to_radians());

        p.update(0.0);
        assert_eq!(p.omega(), 0.0);
        assert_eq!(p.theta(), 30.0_f64.to_radians());
    }

    #[test]
    fn test_rk4_determinism() {
        let mut rng = Pcg32::seed_from_u64(7);
        let dts: Vec<f64> = (0..500).map(|_| rng.random_range(0.001..0.05)).collect();

        let mut a = simple(1.3, 70.0, 0.2);
        let mut b = simple(1.3, 70.0, 0.2);
        for &dt in &dts {
            a.update(dt);
            b.update(dt);
            assert_eq!(a.theta().to_bits(), b.theta().to_bits());
            assert_eq!(a.omega().to_bits(), b.omega().to_bits());
        }
    }

    #[test]
    fn test_damping_drains_energy() {
        let mut p = simple(1.0, 45.0, 0.5);
        let e0 = p.energy();
        for _ in 0..500 {
            p.update(0.01);
        }
        assert!(p.energy() < e0 * 0.5);
    }

    #[test]
    fn test_length_edit_is_live() {
        let mut p = simple(1.0, 45.0, 0.0);
        p.update(0.1);
        let theta = p.theta();
        p.update_parameter("length", 2.0);
        assert_eq!(p.theta(), theta);
        assert_eq!(p.length, 2.0);
        assert!(!p.update_parameter("mass", 1.0));
    }

    #[test]
    fn test_simple_snapshot_geometry() {
        let p = simple(1.0, 0.0, 0.0);
        let snap = p.sample();
        let bob = snap.markers_of(MarkerKind::Bob).next().unwrap();
        // hanging straight below the pivot, one length away
        assert!((bob.pos.x - 350.0).abs() < 1e-9);
        assert!((bob.pos.y - (400.0 / 3.0 + 400.0 / 3.0)).abs() < 1e-9);
        assert_eq!(snap.value("energy"), Some(0.0));
    }

    #[test]
    fn test_double_pendulum_trail_is_bounded() {
        let mut p = double();
        for _ in 0..200 {
            p.update(0.016);
        }
        assert_eq!(p.trail().len(), TRAIL_LENGTH);
        assert_eq!(p.trail()[0], p.bobs().1);
    }

    #[test]
    fn test_double_pendulum_dt_is_clamped() {
        let mut a = double();
        let mut b = double();
        a.update(1.0);
        b.update(DOUBLE_PENDULUM_MAX_DT);
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_double_pendulum_single_step_matches_equations() {
        let mut p = double();
        let (a1, a2) = p.accelerations().unwrap();
        let (t1, _, t2, _) = p.state();
        let h = 0.01 * DOUBLE_PENDULUM_TIME_SCALE;
        p.update(0.01);
        let (nt1, nw1, nt2, nw2) = p.state();
        assert!((nw1 - a1 * h * DOUBLE_PENDULUM_VELOCITY_DAMPING).abs() < 1e-12);
        assert!((nw2 - a2 * h * DOUBLE_PENDULUM_VELOCITY_DAMPING).abs() < 1e-12);
        assert!((nt1 - (t1 + a1 * h * h)).abs() < 1e-12);
        assert!((nt2 - (t2 + a2 * h * h)).abs() < 1e-12);
    }

    #[test]
    fn test_double_pendulum_length_edit_keeps_state() {
        let mut p = double();
        for _ in 0..10 {
            p.update(0.016);
        }
        let before = p.state();
        p.update_parameter("length2", 1.5);
        p.update_parameter("gravity", 3.0);
        assert_eq!(p.state(), before);
    }

    #[test]
    fn test_double_pendulum_angle_edit_resets() {
        let mut p = double();
        for _ in 0..10 {
            p.update(0.016);
        }
        p.update_parameter("angle1", 90.0);
        let (t1, w1, t2, w2) = p.state();
        assert_eq!(t1, 90.0_f64.to_radians());
        assert_eq!(t2, 45.0_f64.to_radians());
        assert_eq!((w1, w2), (0.0, 0.0));
        assert!(p.trail().is_empty());
    }

    #[test]
    fn test_double_pendulum_singular_den_holds_velocities() {
        let mut p = double();
        for _ in 0..10 {
            p.update(0.016);
        }
        p.mass1 = 0.0;
        p.mass2 = 0.0;
        assert_eq!(p.accelerations(), None);

        let (t1, w1, t2, w2) = p.state();
        let h = DOUBLE_PENDULUM_MAX_DT * DOUBLE_PENDULUM_TIME_SCALE;
        p.update(0.016);
        let (nt1, nw1, nt2, nw2) = p.state();
        assert_eq!(nw1, w1 * DOUBLE_PENDULUM_VELOCITY_DAMPING);
        assert_eq!(nw2, w2 * DOUBLE_PENDULUM_VELOCITY_DAMPING);
        assert_eq!(nt1, t1 + w1 * h);
        assert_eq!(nt2, t2 + w2 * h);
    }

    #[test]
    fn test_double_pendulum_zero_length_is_guarded() {
        let mut p = double();
        p.update_parameter("length1", 0.0);
        assert_eq!(p.accelerations(), None);
        for _ in 0..100 {
            p.update(0.016);
        }
        let (t1, w1, t2, w2) = p.state();
        // released from rest with no usable acceleration: nothing moves
        assert_eq!((w1, w2), (0.0, 0.0));
        assert_eq!((t1, t2), (45.0_f64.to_radians(), 45.0_f64.to_radians()));
        assert_eq!(p.trail().len(), TRAIL_LENGTH);
        assert!(p.trail().iter().all(|pt| pt.is_finite()));
    }

    #[test]
    fn test_double_pendulum_nan_length_keeps_trail_clean() {
        let mut p = double();
        p.update_parameter("length1", f64::NAN);
        for _ in 0..100 {
            p.update(0.016);
        }
        let (t1, w1, t2, w2) = p.state();
        assert!([t1, w1, t2, w2].iter().all(|v| v.is_finite()));
        assert!(p.trail().is_empty());
    }

    #[test]
    fn test_double_pendulum_degenerate_mass_stays_finite() {
        let mut p = double();
        p.update_parameter("mass1", 0.0);
        p.update_parameter("angle1", 90.0);
        p.update_parameter("angle2", 0.0);
        for _ in 0..2000 {
            p.update(0.016);
        }
        assert!(p.trail().iter().all(|pt| pt.is_finite()));
        assert!(p.sample().geometry_is_finite());
    }
}
