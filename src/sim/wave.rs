//! Closed-form wave samplers
//!
//! String, standing and impulse waves are evaluated directly from `(x, t)`;
//! the only state is the accumulated simulation time. Displacements are in
//! amplitude units; samplers scale them to pixels for the snapshot.

use std::f64::consts::{PI, TAU};

use glam::DVec2;

use super::params::{self, ParameterSet, whole};
use super::simulation::Simulate;
use super::snapshot::{MarkerKind, RenderSnapshot, Stroke};
use crate::consts::*;
use crate::settings::{Settings, Viewport};

/// Most sample steps in one sweep
const MAX_SAMPLES: usize = 4096;

/// Horizontal sweep across the viewport shared by all wave samplers
#[derive(Debug, Clone, Copy)]
struct Sweep {
    viewport: Viewport,
    spacing: f64,
}

impl Sweep {
    fn new(settings: &Settings) -> Self {
        Self {
            viewport: settings.viewport,
            spacing: settings.sample_spacing,
        }
    }

    /// Pixels per amplitude unit
    fn gain(&self) -> f64 {
        self.viewport.height / 4.0
    }

    /// Sample `displacement` from x = 0 to x = width inclusive, evenly
    /// spaced at roughly `spacing` and never more than [`MAX_SAMPLES`] steps
    fn trace(&self, displacement: impl Fn(f64) -> f64) -> Vec<DVec2> {
        let width = self.viewport.width;
        if !width.is_finite() || width <= 0.0 {
            return Vec::new();
        }
        // saturating cast: zero spacing gives usize::MAX, NaN gives 0
        let count = ((width / self.spacing).ceil() as usize).clamp(1, MAX_SAMPLES);
        let mid = self.viewport.mid_y();
        let gain = self.gain();
        (0..=count)
            .map(|i| {
                let x = width * i as f64 / count as f64;
                DVec2::new(x, mid - gain * displacement(x))
            })
            .collect()
    }
}

/// Advance accumulated time by a clamped frame delta
#[inline]
fn accumulate(t: &mut f64, dt: f64) {
    if dt.is_nan() || dt <= 0.0 {
        return;
    }
    *t += dt.min(MAX_FRAME_DT);
}

/// Travelling sine wave on a string
#[derive(Debug, Clone)]
pub struct StringWave {
    pub tension: f64,
    pub amplitude: f64,
    pub frequency: f64,
    t: f64,
    sweep: Sweep,
}

impl StringWave {
    pub fn new(params: &ParameterSet, settings: &Settings) -> Self {
        Self {
            tension: params.value("tension"),
            amplitude: params.value("amplitude"),
            frequency: params.value("frequency"),
            t: 0.0,
            sweep: Sweep::new(settings),
        }
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    /// `λ = 50·√T` (pixels)
    pub fn wavelength(&self) -> f64 {
        WAVELENGTH_PER_SQRT_TENSION * self.tension.sqrt()
    }

    /// `y(x, t) = A·sin(2π(x/λ − f·t))`; a slack string carries no wave
    pub fn displacement(&self, x: f64, t: f64) -> f64 {
        let wavelength = self.wavelength();
        if wavelength.is_nan() || wavelength <= 0.0 {
            return 0.0;
        }
        self.amplitude * (TAU * (x / wavelength - self.frequency * t)).sin()
    }
}

impl Simulate for StringWave {
    fn update(&mut self, dt: f64) {
        accumulate(&mut self.t, dt);
    }

    fn update_parameter(&mut self, name: &str, value: f64) -> bool {
        match name {
            "tension" => self.tension = value,
            "amplitude" => self.amplitude = value,
            "frequency" => self.frequency = value,
            _ => return false,
        }
        true
    }

    fn parameters(&self) -> ParameterSet {
        let mut set = ParameterSet::from_specs(params::STRING_WAVE);
        set.set("tension", self.tension);
        set.set("amplitude", self.amplitude);
        set.set("frequency", self.frequency);
        set
    }

    fn reset(&mut self) {
        self.t = 0.0;
    }

    fn sample(&self) -> RenderSnapshot {
        let mid = self.sweep.viewport.mid_y();
        let width = self.sweep.viewport.width;

        let mut snap = RenderSnapshot::new();
        snap.dashed(DVec2::new(0.0, mid), DVec2::new(width, mid))
            .polyline(self.sweep.trace(|x| self.displacement(x, self.t)), Stroke::Solid)
            .readout("wavelength", self.wavelength())
            .readout("time", self.t);
        snap
    }
}

/// Node count ceiling
const MAX_NODES: i64 = 1000;

/// Standing wave fixed at both viewport edges
#[derive(Debug, Clone)]
pub struct StandingWave {
    pub speed: f64,
    pub nodes: f64,
    pub amplitude: f64,
    t: f64,
    sweep: Sweep,
}

impl StandingWave {
    pub fn new(params: &ParameterSet, settings: &Settings) -> Self {
        Self {
            speed: params.value("speed"),
            nodes: params.value("nodes"),
            amplitude: params.value("amplitude"),
            t: 0.0,
            sweep: Sweep::new(settings),
        }
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    /// Node count as used by the formulas (whole number, at least one)
    pub fn node_count(&self) -> i64 {
        whole(self.nodes, 1, MAX_NODES)
    }

    /// `k = nodes·π / width`
    pub fn wavenumber(&self) -> f64 {
        self.node_count() as f64 * PI / self.sweep.viewport.width
    }

    /// `ω = k·speed`
    pub fn angular_frequency(&self) -> f64 {
        self.wavenumber() * self.speed
    }

    /// `y(x, t) = A·sin(kx)·cos(ωt)`
    pub fn displacement(&self, x: f64, t: f64) -> f64 {
        self.amplitude * (self.wavenumber() * x).sin() * (self.angular_frequency() * t).cos()
    }

    /// Node x positions `i·width/nodes`, `i` in `0..=nodes`
    pub fn node_positions(&self) -> Vec<f64> {
        let n = self.node_count();
        let width = self.sweep.viewport.width;
        (0..=n).map(|i| i as f64 * width / n as f64).collect()
    }
}

impl Simulate for StandingWave {
    fn update(&mut self, dt: f64) {
        accumulate(&mut self.t, dt);
    }

    fn update_parameter(&mut self, name: &str, value: f64) -> bool {
        match name {
            "speed" => self.speed = value,
            "nodes" => self.nodes = value,
            "amplitude" => self.amplitude = value,
            _ => return false,
        }
        true
    }

    fn parameters(&self) -> ParameterSet {
        let mut set = ParameterSet::from_specs(params::STANDING_WAVES);
        set.set("speed", self.speed);
        set.set("nodes", self.nodes);
        set.set("amplitude", self.amplitude);
        set
    }

    fn reset(&mut self) {
        self.t = 0.0;
    }

    fn sample(&self) -> RenderSnapshot {
        let mid = self.sweep.viewport.mid_y();
        let k = self.wavenumber();

        let mut snap = RenderSnapshot::new();
        snap.polyline(
            self.sweep.trace(|x| self.amplitude * (k * x).sin()),
            Stroke::Dashed,
        )
        .polyline(
            self.sweep.trace(|x| -self.amplitude * (k * x).sin()),
            Stroke::Dashed,
        )
        .polyline(self.sweep.trace(|x| self.displacement(x, self.t)), Stroke::Solid);
        for x in self.node_positions() {
            snap.marker(DVec2::new(x, mid), 4.0, MarkerKind::Node);
        }
        snap.readout("nodes", self.node_count() as f64)
            .readout("time", self.t);
        snap
    }
}

/// Pulse shape selected by the `type` knob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseKind {
    Gaussian,
    Rectangular,
    Triangular,
    Sinc,
}

impl PulseKind {
    /// Out-of-range indices snap to the nearest valid kind
    pub fn from_index(index: f64) -> Self {
        match whole(index, 0, 3) {
            0 => PulseKind::Gaussian,
            1 => PulseKind::Rectangular,
            2 => PulseKind::Triangular,
            _ => PulseKind::Sinc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PulseKind::Gaussian => "gaussian",
            PulseKind::Rectangular => "rectangular",
            PulseKind::Triangular => "triangular",
            PulseKind::Sinc => "sinc",
        }
    }

    /// Unit-height kernel evaluated at normalised offset `tau`
    pub fn kernel(&self, tau: f64) -> f64 {
        // every kernel decays to zero far from the centre
        if !tau.is_finite() {
            return 0.0;
        }
        match self {
            PulseKind::Gaussian => (-tau * tau / 2.0).exp(),
            PulseKind::Rectangular => {
                if tau.abs() <= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            PulseKind::Triangular => (1.0 - tau.abs()).max(0.0),
            PulseKind::Sinc => sinc(tau),
        }
    }
}

/// Normalised sinc, `sin(πτ)/(πτ)` with the removable singularity filled in
#[inline]
pub fn sinc(tau: f64) -> f64 {
    if tau == 0.0 {
        return 1.0;
    }
    let x = PI * tau;
    x.sin() / x
}

/// Pulse travelling left to right, wrapping once it leaves the viewport
#[derive(Debug, Clone)]
pub struct ImpulseWaveform {
    /// Raw `type` knob; see [`PulseKind::from_index`]
    pub kind: f64,
    pub amplitude: f64,
    pub width: f64,
    pub speed: f64,
    t: f64,
    sweep: Sweep,
}

impl ImpulseWaveform {
    pub fn new(params: &ParameterSet, settings: &Settings) -> Self {
        Self {
            kind: params.value("type"),
            amplitude: params.value("amplitude"),
            width: params.value("width"),
            speed: params.value("speed"),
            t: 0.0,
            sweep: Sweep::new(settings),
        }
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn pulse_kind(&self) -> PulseKind {
        PulseKind::from_index(self.kind)
    }

    /// `t0(t) = (t·speed) mod (1.5·W) − 0.25·W` for viewport width W
    pub fn center(&self, t: f64) -> f64 {
        let span = self.sweep.viewport.width;
        (t * self.speed).rem_euclid(1.5 * span) - 0.25 * span
    }

    /// `A·kernel((x − t0)/(width·scale))`
    pub fn displacement(&self, x: f64, t: f64) -> f64 {
        let tau = (x - self.center(t)) / (self.width * PULSE_WIDTH_SCALE);
        self.amplitude * self.pulse_kind().kernel(tau)
    }
}

impl Simulate for ImpulseWaveform {
    fn update(&mut self, dt: f64) {
        accumulate(&mut self.t, dt);
    }

    fn update_parameter(&mut self, name: &str, value: f64) -> bool {
        match name {
            "type" => self.kind = value,
            "amplitude" => self.amplitude = value,
            "width" => self.width = value,
            "speed" => self.speed = value,
            _ => return false,
        }
        true
    }

    fn parameters(&self) -> ParameterSet {
        let mut set = ParameterSet::from_specs(params::IMPULSE_TYPES);
        set.set("type", self.kind);
        set.set("amplitude", self.amplitude);
        set.set("width", self.width);
        set.set("speed", self.speed);
        set
    }

    fn reset(&mut self) {
        self.t = 0.0;
    }

    fn sample(&self) -> RenderSnapshot {
        let mid = self.sweep.viewport.mid_y();
        let width = self.sweep.viewport.width;
        let center = self.center(self.t);

        let mut snap = RenderSnapshot::new();
        snap.dashed(DVec2::new(0.0, mid), DVec2::new(width, mid))
            .polyline(self.sweep.trace(|x| self.displacement(x, self.t)), Stroke::Solid);
        if (0.0..=width).contains(&center) {
            let peak = mid - self.sweep.gain() * self.amplitude;
            snap.dashed(DVec2::new(center, mid), DVec2::new(center, peak));
        }
        snap.readout("type", whole(self.kind, 0, 3) as f64)
            .readout("center", center)
            .readout("time", self.t);
        snap
    }
}
