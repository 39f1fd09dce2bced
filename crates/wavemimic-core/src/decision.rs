//! Entropy-gated decision report.
//!
//! The report carries a density delta, a fixed volatility and a bounded
//! "border" value. Below [`BORDER_THRESHOLD`] the border is the Laplace
//! transform of `f(s) = sin(2πs)·e^(-s)` evaluated with the transform variable
//! set to the entropy itself; at or above it the border saturates to
//! [`BORDER_FALLBACK`] without consulting any estimator.

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

use crate::error::{Result, WaveError};

/// Baseline density delta.
pub const BASE_DENSITY_DELTA: f64 = 0.02;
/// Extra delta applied below [`REBUILD_THRESHOLD`].
pub const REBUILD_BONUS: f64 = 0.02;
/// Fixed volatility reported with every decision.
pub const VOLATILITY: f64 = -0.15;
/// Entropy below which the border is estimated.
pub const BORDER_THRESHOLD: f64 = 2.0;
/// Entropy below which the rebuild bonus applies.
pub const REBUILD_THRESHOLD: f64 = 1.0;
/// Border reported at or above [`BORDER_THRESHOLD`].
pub const BORDER_FALLBACK: f64 = 0.02;

const OMEGA: f64 = 2.0 * PI;

/// Maps an entropy value to a bounded border scalar.
pub trait BorderEstimator {
    fn estimate(&self, entropy: f64) -> Result<f64>;
}

/// Closed-form Laplace transform `2π / ((p + 1)² + 4π²)` evaluated at
/// `p = entropy`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LaplaceBorder;

impl LaplaceBorder {
    pub fn value(p: f64) -> f64 {
        let shifted = p + 1.0;
        OMEGA / (shifted * shifted + OMEGA * OMEGA)
    }
}

impl BorderEstimator for LaplaceBorder {
    fn estimate(&self, entropy: f64) -> Result<f64> {
        Ok(Self::value(entropy))
    }
}

/// Composite Simpson integration of `∫₀^∞ sin(2πt)·e^(-(1+p)t) dt`.
///
/// The integral is truncated after `horizon` e-folds of the decay `1 + p`.
/// Points where the decay rate falls below `min_decay` are rejected as
/// divergent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureBorder {
    pub steps_per_unit: usize,
    pub horizon: f64,
    pub min_decay: f64,
}

impl Default for QuadratureBorder {
    fn default() -> Self {
        Self {
            steps_per_unit: 256,
            horizon: 36.0,
            min_decay: 1e-2,
        }
    }
}

impl BorderEstimator for QuadratureBorder {
    fn estimate(&self, entropy: f64) -> Result<f64> {
        let decay = 1.0 + entropy;
        if !decay.is_finite() || decay < self.min_decay {
            return Err(WaveError::DivergentTransform { at: entropy });
        }
        let upper = self.horizon / decay;
        // Simpson needs an even panel count.
        let mut n = ((upper * self.steps_per_unit as f64).ceil() as usize).max(2);
        if n % 2 == 1 {
            n += 1;
        }
        let h = upper / n as f64;
        let f = |t: f64| (OMEGA * t).sin() * (-decay * t).exp();

        let mut acc = f(0.0) + f(upper);
        for k in 1..n {
            let w = if k % 2 == 1 { 4.0 } else { 2.0 };
            acc += w * f(k as f64 * h);
        }
        Ok(acc * h / 3.0)
    }
}

/// Outcome of one decision call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrispReport {
    pub label: String,
    pub density_delta: f64,
    pub volatility: f64,
    pub border: f64,
    pub entropy: f64,
}

impl fmt::Display for CrispReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Crisp {}: Density +{}, Volatility {}; Border: {:.2} (5D Entropy {:.2})",
            self.label, self.density_delta, self.volatility, self.border, self.entropy
        )
    }
}

/// Decision report using the closed-form [`LaplaceBorder`].
pub fn crispr_proxy(label: &str, entropy: f64) -> CrispReport {
    let density_delta = density_delta(entropy);
    let border = if entropy < BORDER_THRESHOLD {
        LaplaceBorder::value(entropy)
    } else {
        BORDER_FALLBACK
    };
    CrispReport {
        label: label.to_string(),
        density_delta,
        volatility: VOLATILITY,
        border,
        entropy,
    }
}

/// Decision report with a caller-chosen border estimator.
///
/// The estimator runs only when `entropy < BORDER_THRESHOLD`.
pub fn crispr_proxy_with(
    estimator: &dyn BorderEstimator,
    label: &str,
    entropy: f64,
) -> Result<CrispReport> {
    let border = if entropy < BORDER_THRESHOLD {
        estimator.estimate(entropy)?
    } else {
        BORDER_FALLBACK
    };
    Ok(CrispReport {
        label: label.to_string(),
        density_delta: density_delta(entropy),
        volatility: VOLATILITY,
        border,
        entropy,
    })
}

fn density_delta(entropy: f64) -> f64 {
    if entropy < REBUILD_THRESHOLD {
        BASE_DENSITY_DELTA + REBUILD_BONUS
    } else {
        BASE_DENSITY_DELTA
    }
}
