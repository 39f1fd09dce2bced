//! Engine state and the entropy wave step.
//!
//! One step evaluates the damped oscillation
//!
//! ```text
//! wave    = sin(2π·t / cycle) · e^(-t)
//! entropy = -(wave · ln(|wave| + ε))      ε = 1e-10
//! density = density · (1 + 0.05·wave)
//! ```
//!
//! The step never consults the proxies.

use std::f64::consts::PI;

use serde::Serialize;

use crate::error::{Result, WaveError};

/// Default number of density components.
pub const DEFAULT_DIMENSION: usize = 5;
/// Default oscillation cycle length.
pub const DEFAULT_CYCLE: f64 = 4.0;
/// Additive guard inside the entropy logarithm.
pub const ENTROPY_EPSILON: f64 = 1e-10;
/// Multiplicative density gain per unit wave amplitude.
pub const DENSITY_GAIN: f64 = 0.05;

/// Damped oscillation amplitude at time `t`.
pub fn wave_amplitude(t: f64, cycle: f64) -> f64 {
    (2.0 * PI * t / cycle).sin() * (-t).exp()
}

/// Entropy derived from a wave amplitude.
pub fn wave_entropy(wave: f64) -> f64 {
    -(wave * (wave.abs() + ENTROPY_EPSILON).ln())
}

/// Density vector plus running entropy.
///
/// `density.len() == dimension` holds for the life of the value; the fields
/// are private so only the step can rescale them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveState {
    dimension: usize,
    density: Vec<f64>,
    entropy: f64,
}

impl Default for WaveState {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            density: vec![1.0; DEFAULT_DIMENSION],
            entropy: 0.0,
        }
    }
}

impl WaveState {
    /// Fresh state: every density component at 1.0, entropy 0.0.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(WaveError::InvalidParameter {
                name: "dimension",
                value: 0.0,
            });
        }
        Ok(Self {
            dimension,
            density: vec![1.0; dimension],
            entropy: 0.0,
        })
    }

    /// Number of density components.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Current density vector.
    pub fn density(&self) -> &[f64] {
        &self.density
    }

    /// Entropy from the most recent step.
    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    /// Advance one wave step, updating entropy and density in place.
    ///
    /// Returns the wave amplitude that drove the update.
    pub fn step(&mut self, t: f64, cycle: f64) -> Result<f64> {
        if !t.is_finite() {
            return Err(WaveError::InvalidParameter {
                name: "t",
                value: t,
            });
        }
        if !(cycle.is_finite() && cycle > 0.0) {
            return Err(WaveError::InvalidParameter {
                name: "cycle",
                value: cycle,
            });
        }

        let wave = wave_amplitude(t, cycle);
        self.entropy = wave_entropy(wave);
        let scale = 1.0 + DENSITY_GAIN * wave;
        for d in &mut self.density {
            *d *= scale;
        }
        log::debug!(
            "wave step t={t:.3} wave={wave:.6} entropy={:.6}",
            self.entropy
        );
        Ok(wave)
    }
}
