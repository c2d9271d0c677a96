//! Phenomenon catalogue and variant construction

use serde::Serialize;

use super::collision::TwoBodyCollision;
use super::mirror::MirrorReflection;
use super::params::{ParamSpec, ParameterSet, specs};
use super::pendulum::{DoublePendulum, SimplePendulum};
use super::simulation::Simulation;
use super::spring::SpringOscillator;
use super::wave::{ImpulseWaveform, StandingWave, StringWave};
use crate::error::{KernelError, Result};
use crate::settings::Settings;

/// Identifier of a phenomenon in the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PhenomenonKind {
    SimplePendulum,
    DoublePendulum,
    StringWave,
    SpringOscillator,
    StandingWaves,
    ImpulseTypes,
    Collisions,
    MirrorReflection,
}

impl PhenomenonKind {
    /// Catalogue order
    pub const ALL: [PhenomenonKind; 8] = [
        PhenomenonKind::SimplePendulum,
        PhenomenonKind::DoublePendulum,
        PhenomenonKind::StringWave,
        PhenomenonKind::SpringOscillator,
        PhenomenonKind::StandingWaves,
        PhenomenonKind::ImpulseTypes,
        PhenomenonKind::Collisions,
        PhenomenonKind::MirrorReflection,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PhenomenonKind::SimplePendulum => "simple-pendulum",
            PhenomenonKind::DoublePendulum => "double-pendulum",
            PhenomenonKind::StringWave => "string-wave",
            PhenomenonKind::SpringOscillator => "spring-oscillator",
            PhenomenonKind::StandingWaves => "standing-waves",
            PhenomenonKind::ImpulseTypes => "impulse-types",
            PhenomenonKind::Collisions => "collisions",
            PhenomenonKind::MirrorReflection => "mirror-reflection",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PhenomenonKind::SimplePendulum => "Simple Pendulum",
            PhenomenonKind::DoublePendulum => "Double Pendulum",
            PhenomenonKind::StringWave => "String Wave",
            PhenomenonKind::SpringOscillator => "Spring Oscillator",
            PhenomenonKind::StandingWaves => "Standing Waves",
            PhenomenonKind::ImpulseTypes => "Impulse Types",
            PhenomenonKind::Collisions => "Collisions",
            PhenomenonKind::MirrorReflection => "Mirror Reflection",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Knob table for this phenomenon
    pub fn specs(&self) -> &'static [ParamSpec] {
        specs(*self)
    }
}

/// Catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Phenomenon {
    pub id: &'static str,
    pub display_name: &'static str,
}

/// All phenomena, in display order
pub fn catalogue() -> Vec<Phenomenon> {
    PhenomenonKind::ALL
        .iter()
        .map(|kind| Phenomenon {
            id: kind.id(),
            display_name: kind.display_name(),
        })
        .collect()
}

/// Build the variant for `id` at its default parameters
pub fn construct(id: &str, settings: &Settings) -> Result<Simulation> {
    let kind = PhenomenonKind::from_id(id).ok_or_else(|| KernelError::UnknownPhenomenon(id.to_string()))?;
    Ok(construct_kind(kind, settings))
}

pub fn construct_kind(kind: PhenomenonKind, settings: &Settings) -> Simulation {
    let params = ParameterSet::defaults(kind);
    log::info!("Constructing {} ({} parameters)", kind.id(), params.len());
    match kind {
        PhenomenonKind::SimplePendulum => Simulation::SimplePendulum(SimplePendulum::new(&params, settings)),
        PhenomenonKind::DoublePendulum => Simulation::DoublePendulum(DoublePendulum::new(&params, settings)),
        PhenomenonKind::StringWave => Simulation::StringWave(StringWave::new(&params, settings)),
        PhenomenonKind::SpringOscillator => {
            Simulation::SpringOscillator(SpringOscillator::new(&params, settings))
        }
        PhenomenonKind::StandingWaves => Simulation::StandingWave(StandingWave::new(&params, settings)),
        PhenomenonKind::ImpulseTypes => Simulation::ImpulseWaveform(ImpulseWaveform::new(&params, settings)),
        PhenomenonKind::Collisions => Simulation::TwoBodyCollision(TwoBodyCollision::new(&params, settings)),
        PhenomenonKind::MirrorReflection => {
            Simulation::MirrorReflection(MirrorReflection::new(&params, settings))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for kind in PhenomenonKind::ALL {
            assert_eq!(PhenomenonKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(PhenomenonKind::from_id("Simple-Pendulum"), None);
    }

    #[test]
    fn test_unknown_phenomenon_is_an_error() {
        let err = construct("tidal-wave", &Settings::default()).unwrap_err();
        assert!(matches!(err, KernelError::UnknownPhenomenon(ref id) if id == "tidal-wave"));
    }

    #[test]
    fn test_construct_by_id() {
        let sim = construct("collisions", &Settings::default()).unwrap();
        assert_eq!(sim.kind(), PhenomenonKind::Collisions);
        assert_eq!(sim.id(), "collisions");
    }

    #[test]
    fn test_catalogue_order() {
        let ids: Vec<_> = catalogue().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 8);
        assert_eq!(ids[0], "simple-pendulum");
        assert_eq!(ids[7], "mirror-reflection");
    }
}
