//! The simulation engine: one [`WaveState`] plus its own proxy caches.

use nalgebra::DMatrix;

use crate::decision::{CrispReport, crispr_proxy};
use crate::error::Result;
use crate::proxy::{ProxyCacheStats, ProxyCaches};
use crate::recon::{Reconstruction, reconstruct};
use crate::state::{DEFAULT_DIMENSION, WaveState};

/// Entropy-wave engine.
///
/// Proxy caches are owned per engine: two engines never observe each other's
/// entries. All mutating methods take `&mut self`; share an engine across
/// threads by wrapping it in a `Mutex`.
#[derive(Debug, Clone, Default)]
pub struct WaveEngine {
    state: WaveState,
    caches: ProxyCaches,
}

impl WaveEngine {
    /// Engine with `dimension` density components (must be positive).
    pub fn new(dimension: usize) -> Result<Self> {
        Ok(Self {
            state: WaveState::new(dimension)?,
            caches: ProxyCaches::default(),
        })
    }

    /// Borrow the underlying state.
    pub fn state(&self) -> &WaveState {
        &self.state
    }

    /// Number of density components.
    pub fn dimension(&self) -> usize {
        self.state.dimension()
    }

    /// Current density vector.
    pub fn density(&self) -> &[f64] {
        self.state.density()
    }

    /// Entropy from the most recent wave step.
    pub fn entropy(&self) -> f64 {
        self.state.entropy()
    }

    /// Hit/miss counters of the three proxy caches.
    pub fn cache_stats(&self) -> ProxyCacheStats {
        self.caches.stats()
    }

    /// Drop every cached proxy result.
    pub fn clear_caches(&mut self) {
        self.caches.clear();
    }

    /// Memoized rank-3 reconstruction of `states ⊗ alphas`.
    pub fn superposition_proxy(&mut self, states: &[f64], alphas: &[f64]) -> Result<DMatrix<f64>> {
        self.caches.superposition(states, alphas)
    }

    /// Memoized mean diagonal of `exp(-barrier · dt)`.
    pub fn tunneling_proxy(&mut self, barrier: &DMatrix<f64>, dt: f64) -> Result<f64> {
        self.caches.tunneling(barrier, dt)
    }

    /// Memoized `trace(a · bᵗ)`.
    pub fn entanglement_proxy(&mut self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<f64> {
        self.caches.entanglement(a, b)
    }

    /// One wave step; returns the new entropy and density.
    pub fn entropy_wave_step(&mut self, t: f64, cycle: f64) -> Result<(f64, &[f64])> {
        self.state.step(t, cycle)?;
        Ok((self.state.entropy(), self.state.density()))
    }

    /// Run the reconstruction loop for `iterations` steps.
    pub fn fractal_recon(&mut self, iterations: usize) -> Result<Reconstruction> {
        reconstruct(&mut self.state, &mut self.caches, iterations)
    }

    /// Decision report for `label` at `entropy`. Does not touch engine state.
    pub fn crispr_proxy(label: &str, entropy: f64) -> CrispReport {
        crispr_proxy(label, entropy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recon::DEFAULT_ITERATIONS;
    use crate::state::DEFAULT_CYCLE;

    #[test]
    fn default_dimension_is_five() {
        let engine = WaveEngine::default();
        assert_eq!(engine.dimension(), DEFAULT_DIMENSION);
        assert_eq!(engine.density().len(), 5);
        assert_eq!(engine.entropy(), 0.0);
    }

    #[test]
    fn step_updates_state() {
        let mut engine = WaveEngine::new(3).unwrap();
        let (entropy, density) = engine.entropy_wave_step(0.4, DEFAULT_CYCLE).unwrap();
        let density = density.to_vec();
        assert_eq!(entropy, engine.entropy());
        assert_eq!(density, engine.density());
        assert!(density.iter().all(|&d| d > 1.0));
    }

    #[test]
    fn caches_are_per_engine() {
        let mut a = WaveEngine::default();
        let mut b = WaveEngine::default();
        let barrier = DMatrix::<f64>::identity(2, 2);
        a.tunneling_proxy(&barrier, 0.1).unwrap();
        b.tunneling_proxy(&barrier, 0.1).unwrap();
        assert_eq!(a.cache_stats().tunneling.misses, 1);
        assert_eq!(b.cache_stats().tunneling.misses, 1);
        assert_eq!(b.cache_stats().tunneling.hits, 0);
    }

    #[test]
    fn recon_runs_on_engine_state() {
        let mut engine = WaveEngine::default();
        let recon = engine.fractal_recon(DEFAULT_ITERATIONS).unwrap();
        assert_eq!(recon.final_entropy, engine.entropy());
        // Snapshots carry the proxy blend; the engine density does not.
        let blend = crate::recon::PROXY_BLEND * recon.steps[DEFAULT_ITERATIONS - 1].combined;
        let last = recon.trace.last().unwrap();
        assert_ne!(last.as_slice(), engine.density());
        for (snap, &d) in last.iter().zip(engine.density()) {
            assert!((snap - (d + blend)).abs() < 1e-15);
        }
    }

    #[test]
    fn clear_caches_forces_recompute() {
        let mut engine = WaveEngine::default();
        engine.superposition_proxy(&[1.0], &[1.0]).unwrap();
        engine.clear_caches();
        engine.superposition_proxy(&[1.0], &[1.0]).unwrap();
        assert_eq!(engine.cache_stats().superposition.misses, 2);
    }
}
