//! Common variant interface and the closed set of phenomena

use super::collision::TwoBodyCollision;
use super::mirror::MirrorReflection;
use super::params::ParameterSet;
use super::pendulum::{DoublePendulum, SimplePendulum};
use super::registry::PhenomenonKind;
use super::snapshot::RenderSnapshot;
use super::spring::SpringOscillator;
use super::wave::{ImpulseWaveform, StandingWave, StringWave};

/// Behaviour shared by every phenomenon
pub trait Simulate {
    /// Advance by `dt` seconds. Never fails; degenerate input degrades silently.
    fn update(&mut self, dt: f64);

    /// Write one knob. Returns false (and changes nothing) for names outside
    /// the phenomenon's table.
    fn update_parameter(&mut self, name: &str, value: f64) -> bool;

    /// Current knob values
    fn parameters(&self) -> ParameterSet;

    /// Rebuild the dynamic state from the current knobs
    fn reset(&mut self);

    /// Read-only render view of the current state
    fn sample(&self) -> RenderSnapshot;
}

/// One running phenomenon
#[derive(Debug, Clone)]
pub enum Simulation {
    SimplePendulum(SimplePendulum),
    DoublePendulum(DoublePendulum),
    SpringOscillator(SpringOscillator),
    StringWave(StringWave),
    StandingWave(StandingWave),
    ImpulseWaveform(ImpulseWaveform),
    TwoBodyCollision(TwoBodyCollision),
    MirrorReflection(MirrorReflection),
}

macro_rules! dispatch {
    ($self:expr, $sim:ident => $body:expr) => {
        match $self {
            Simulation::SimplePendulum($sim) => $body,
            Simulation::DoublePendulum($sim) => $body,
            Simulation::SpringOscillator($sim) => $body,
            Simulation::StringWave($sim) => $body,
            Simulation::StandingWave($sim) => $body,
            Simulation::ImpulseWaveform($sim) => $body,
            Simulation::TwoBodyCollision($sim) => $body,
            Simulation::MirrorReflection($sim) => $body,
        }
    };
}

impl Simulation {
    pub fn kind(&self) -> PhenomenonKind {
        match self {
            Simulation::SimplePendulum(_) => PhenomenonKind::SimplePendulum,
            Simulation::DoublePendulum(_) => PhenomenonKind::DoublePendulum,
            Simulation::SpringOscillator(_) => PhenomenonKind::SpringOscillator,
            Simulation::StringWave(_) => PhenomenonKind::StringWave,
            Simulation::StandingWave(_) => PhenomenonKind::StandingWaves,
            Simulation::ImpulseWaveform(_) => PhenomenonKind::ImpulseTypes,
            Simulation::TwoBodyCollision(_) => PhenomenonKind::Collisions,
            Simulation::MirrorReflection(_) => PhenomenonKind::MirrorReflection,
        }
    }

    pub fn id(&self) -> &'static str {
        self.kind().id()
    }
}

impl Simulate for Simulation {
    fn update(&mut self, dt: f64) {
        dispatch!(self, sim => sim.update(dt))
    }

    fn update_parameter(&mut self, name: &str, value: f64) -> bool {
        let accepted = dispatch!(self, sim => sim.update_parameter(name, value));
        if accepted {
            log::debug!("{}: {} = {}", self.id(), name, value);
        } else {
            log::warn!("{}: ignoring unknown parameter '{}'", self.id(), name);
        }
        accepted
    }

    fn parameters(&self) -> ParameterSet {
        dispatch!(self, sim => sim.parameters())
    }

    fn reset(&mut self) {
        dispatch!(self, sim => sim.reset())
    }

    fn sample(&self) -> RenderSnapshot {
        dispatch!(self, sim => sim.sample())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::params::specs;
    use crate::sim::registry::construct_kind;

    #[test]
    fn test_parameters_match_default_tables() {
        let settings = Settings::default();
        for kind in PhenomenonKind::ALL {
            let sim = construct_kind(kind, &settings);
            assert_eq!(sim.kind(), kind);
            let params = sim.parameters();
            let table = specs(kind);
            assert_eq!(params.len(), table.len(), "{}", kind.id());
            for spec in table {
                assert_eq!(params.get(spec.name), Some(spec.default), "{}.{}", kind.id(), spec.name);
            }
        }
    }

    #[test]
    fn test_unknown_parameter_is_ignored() {
        let settings = Settings::default();
        for kind in PhenomenonKind::ALL {
            let mut sim = construct_kind(kind, &settings);
            let before = sim.parameters();
            assert!(!sim.update_parameter("bogus", 3.0));
            assert_eq!(sim.parameters(), before);
        }
    }

    #[test]
    fn test_parameter_write_is_visible() {
        let settings = Settings::default();
        for kind in PhenomenonKind::ALL {
            let mut sim = construct_kind(kind, &settings);
            let spec = specs(kind)[0];
            let value = (spec.min + spec.default) / 2.0;
            assert!(sim.update_parameter(spec.name, value));
            assert_eq!(sim.parameters().get(spec.name), Some(value), "{}", kind.id());
        }
    }

    #[test]
    fn test_every_variant_samples_finite_geometry() {
        let settings = Settings::default();
        for kind in PhenomenonKind::ALL {
            let mut sim = construct_kind(kind, &settings);
            for _ in 0..120 {
                sim.update(1.0 / 60.0);
            }
            assert!(sim.sample().geometry_is_finite(), "{}", kind.id());
        }
    }

    #[test]
    fn test_reset_restores_initial_snapshot() {
        let settings = Settings::default();
        for kind in PhenomenonKind::ALL {
            let mut sim = construct_kind(kind, &settings);
            let initial = sim.sample();
            for _ in 0..30 {
                sim.update(1.0 / 60.0);
            }
            sim.reset();
            assert_eq!(sim.sample(), initial, "{}", kind.id());
        }
    }
}
