//! Frame clock
//!
//! Turns host frame timestamps into clamped deltas and ticks a variant once
//! per frame.

use super::simulation::Simulate;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct SimulationClock {
    max_dt: f64,
    last_timestamp: Option<f64>,
    elapsed: f64,
    ticks: u64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl SimulationClock {
    pub fn new(max_dt: f64) -> Self {
        Self {
            max_dt,
            last_timestamp: None,
            elapsed: 0.0,
            ticks: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.max_frame_dt)
    }

    /// Clamp a raw delta into `[0, max_dt]`; NaN becomes 0
    pub fn clamp(&self, dt: f64) -> f64 {
        if dt.is_nan() || dt <= 0.0 {
            0.0
        } else {
            dt.min(self.max_dt)
        }
    }

    /// Tick `sim` by `dt` (clamped). Returns the delta actually applied.
    pub fn step<S: Simulate + ?Sized>(&mut self, sim: &mut S, dt: f64) -> f64 {
        let dt = self.clamp(dt);
        sim.update(dt);
        self.elapsed += dt;
        self.ticks += 1;
        dt
    }

    /// Tick from a host timestamp (seconds). The first frame after
    /// construction or [`restart`](Self::restart) only records the timestamp.
    pub fn frame<S: Simulate + ?Sized>(&mut self, sim: &mut S, timestamp: f64) -> Option<f64> {
        let last = self.last_timestamp.replace(timestamp)?;
        Some(self.step(sim, timestamp - last))
    }

    /// Forget the last timestamp and zero the counters
    pub fn restart(&mut self) {
        self.last_timestamp = None;
        self.elapsed = 0.0;
        self.ticks = 0;
    }

    /// Simulated seconds handed out so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn max_dt(&self) -> f64 {
        self.max_dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::params::ParameterSet;
    use crate::sim::snapshot::RenderSnapshot;

    /// Records every delta it receives
    #[derive(Default)]
    struct Recorder {
        deltas: Vec<f64>,
    }

    impl Simulate for Recorder {
        fn update(&mut self, dt: f64) {
            self.deltas.push(dt);
        }

        fn update_parameter(&mut self, _name: &str, _value: f64) -> bool {
            false
        }

        fn parameters(&self) -> ParameterSet {
            ParameterSet::from_specs(&[])
        }

        fn reset(&mut self) {
            self.deltas.clear();
        }

        fn sample(&self) -> RenderSnapshot {
            RenderSnapshot::new()
        }
    }

    #[test]
    fn test_first_frame_only_primes() {
        let mut clock = SimulationClock::new(0.1);
        let mut sim = Recorder::default();
        assert_eq!(clock.frame(&mut sim, 12.0), None);
        assert!(sim.deltas.is_empty());
        assert_eq!(clock.frame(&mut sim, 12.016), Some(12.016 - 12.0));
        assert_eq!(sim.deltas.len(), 1);
        assert_eq!(clock.ticks(), 1);
    }

    #[test]
    fn test_long_pause_is_clamped() {
        let mut clock = SimulationClock::new(0.1);
        let mut sim = Recorder::default();
        clock.frame(&mut sim, 0.0);
        assert_eq!(clock.frame(&mut sim, 5.0), Some(0.1));
        assert_eq!(sim.deltas, vec![0.1]);
    }

    #[test]
    fn test_backwards_timestamp_gives_zero() {
        let mut clock = SimulationClock::new(0.1);
        let mut sim = Recorder::default();
        clock.frame(&mut sim, 3.0);
        assert_eq!(clock.frame(&mut sim, 2.0), Some(0.0));
        assert_eq!(clock.step(&mut sim, f64::NAN), 0.0);
    }

    #[test]
    fn test_restart_reprimes() {
        let mut clock = SimulationClock::default();
        let mut sim = Recorder::default();
        clock.step(&mut sim, 0.05);
        clock.step(&mut sim, 0.05);
        assert!((clock.elapsed() - 0.1).abs() < 1e-12);
        clock.restart();
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.frame(&mut sim, 1.0), None);
    }

    #[test]
    fn test_drives_dyn_variant() {
        let mut sim: Box<dyn Simulate> = Box::new(Recorder::default());
        let mut clock = SimulationClock::new(0.1);
        clock.step(sim.as_mut(), 0.02);
        assert_eq!(clock.ticks(), 1);
    }
}
