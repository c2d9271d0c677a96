//! Parameter tables and parameter sets
//!
//! Each phenomenon has a static table of knobs (name, range, default). A
//! [`ParameterSet`] is the name → value view of a variant's current knobs;
//! the variants themselves hold the values in typed fields.

use std::collections::BTreeMap;

use serde::Serialize;

use super::registry::PhenomenonKind;
use crate::consts::{MIN_MASS, VIEWPORT_WIDTH};

/// One entry of a phenomenon's default table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Key used by `update_parameter`
    pub name: &'static str,
    /// Human-readable label for host controls
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Host control should snap to whole numbers
    pub integer: bool,
}

const fn knob(name: &'static str, label: &'static str, min: f64, max: f64, default: f64) -> ParamSpec {
    ParamSpec {
        name,
        label,
        min,
        max,
        default,
        integer: false,
    }
}

const fn step(name: &'static str, label: &'static str, min: f64, max: f64, default: f64) -> ParamSpec {
    ParamSpec {
        name,
        label,
        min,
        max,
        default,
        integer: true,
    }
}

pub const SIMPLE_PENDULUM: &[ParamSpec] = &[
    knob("length", "Length (m)", 0.1, 2.0, 1.0),
    knob("angle", "Initial angle (deg)", -180.0, 180.0, 45.0),
    knob("damping", "Damping", 0.0, 1.0, 0.1),
];

pub const DOUBLE_PENDULUM: &[ParamSpec] = &[
    knob("length1", "Length 1 (m)", 0.1, 2.0, 1.0),
    knob("length2", "Length 2 (m)", 0.1, 2.0, 1.0),
    knob("angle1", "Angle 1 (deg)", -180.0, 180.0, 45.0),
    knob("angle2", "Angle 2 (deg)", -180.0, 180.0, 45.0),
    knob("mass1", "Mass 1 (kg)", MIN_MASS, f64::INFINITY, 1.0),
    knob("mass2", "Mass 2 (kg)", MIN_MASS, f64::INFINITY, 1.0),
    knob("gravity", "Gravity (m/s²)", 0.0, 20.0, crate::consts::G),
];

pub const STRING_WAVE: &[ParamSpec] = &[
    knob("tension", "Tension (N)", 0.0, 100.0, 50.0),
    knob("amplitude", "Amplitude", 0.0, 1.0, 0.5),
    knob("frequency", "Frequency (Hz)", 0.0, 10.0, 1.0),
];

pub const SPRING_OSCILLATOR: &[ParamSpec] = &[
    knob("springConstant", "Spring constant (N/m)", 0.0, 100.0, 50.0),
    knob("mass", "Mass (kg)", 0.1, 10.0, 1.0),
    knob("damping", "Damping", 0.0, 1.0, 0.1),
];

pub const STANDING_WAVES: &[ParamSpec] = &[
    knob("speed", "Wave speed (m/s)", 0.0, 10.0, 5.0),
    step("nodes", "Node count", 1.0, 10.0, 3.0),
    knob("amplitude", "Amplitude", 0.0, 1.0, 0.5),
];

pub const IMPULSE_TYPES: &[ParamSpec] = &[
    step("type", "Pulse type (0 gauss, 1 square, 2 triangle, 3 sinc)", 0.0, 3.0, 0.0),
    knob("amplitude", "Amplitude", 0.0, 2.0, 1.0),
    knob("width", "Width", 0.1, 2.0, 0.5),
    knob("speed", "Speed", 0.0, 10.0, 5.0),
];

pub const COLLISIONS: &[ParamSpec] = &[
    knob("mass1", "Mass 1 (kg)", 0.1, 10.0, 1.0),
    knob("mass2", "Mass 2 (kg)", 0.1, 10.0, 1.0),
    knob("velocity1", "Velocity 1 (m/s)", -10.0, 10.0, 5.0),
    knob("velocity2", "Velocity 2 (m/s)", -10.0, 10.0, -5.0),
    knob("restitution", "Restitution", 0.0, 1.0, 1.0),
    knob("x1", "Start position 1 (px)", 0.0, VIEWPORT_WIDTH, 200.0),
    knob("x2", "Start position 2 (px)", 0.0, VIEWPORT_WIDTH, 400.0),
];

pub const MIRROR_REFLECTION: &[ParamSpec] = &[
    step("mirrorType", "Mirror type (0 flat, 1 concave, 2 convex)", 0.0, 2.0, 0.0),
    knob("curvature", "Curvature", 0.1, 2.0, 1.0),
    knob("angle", "Angle of incidence (deg)", -80.0, 80.0, 30.0),
    step("rays", "Ray count", 1.0, 10.0, 3.0),
];

/// Default table for a phenomenon
pub fn specs(kind: PhenomenonKind) -> &'static [ParamSpec] {
    match kind {
        PhenomenonKind::SimplePendulum => SIMPLE_PENDULUM,
        PhenomenonKind::DoublePendulum => DOUBLE_PENDULUM,
        PhenomenonKind::StringWave => STRING_WAVE,
        PhenomenonKind::SpringOscillator => SPRING_OSCILLATOR,
        PhenomenonKind::StandingWaves => STANDING_WAVES,
        PhenomenonKind::ImpulseTypes => IMPULSE_TYPES,
        PhenomenonKind::Collisions => COLLISIONS,
        PhenomenonKind::MirrorReflection => MIRROR_REFLECTION,
    }
}

/// Name → value view of a variant's knobs (closed namespace per phenomenon)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSet {
    values: BTreeMap<&'static str, f64>,
}

impl ParameterSet {
    /// Parameter set populated from a phenomenon's default table
    pub fn defaults(kind: PhenomenonKind) -> Self {
        Self::from_specs(specs(kind))
    }

    pub fn from_specs(specs: &[ParamSpec]) -> Self {
        Self {
            values: specs.iter().map(|s| (s.name, s.default)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value of a key the caller knows is in the table
    pub fn value(&self, name: &str) -> f64 {
        debug_assert!(self.values.contains_key(name), "unknown parameter {name}");
        self.get(name).unwrap_or(f64::NAN)
    }

    /// Overwrite an existing key; unknown names are left out
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Round an integer-valued knob, keeping it inside `[min, max]`
#[inline]
pub fn whole(value: f64, min: i64, max: i64) -> i64 {
    if value.is_nan() {
        return min;
    }
    (value.round() as i64).clamp(min, max)
}
