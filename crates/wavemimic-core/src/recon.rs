//! Iterative reconstruction: wave step, proxy fold, trace append.
//!
//! Each iteration `i` of `n` runs the wave step at `t = i / n`, evaluates the
//! three proxies on fixed sample arguments, averages
//! `[mean(superposition), tunneling, entanglement]` into `combined`, and
//! records a snapshot of the density with `0.01 · combined` added to every
//! component. The blend lives only in the snapshot; the engine's density is
//! changed by the wave step alone.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{Result, WaveError};
use crate::proxy::{DEFAULT_DT, ProxyCaches};
use crate::state::{DEFAULT_CYCLE, WaveState};

/// Default number of reconstruction iterations.
pub const DEFAULT_ITERATIONS: usize = 5;
/// Weight of the combined proxy output added to each recorded snapshot.
pub const PROXY_BLEND: f64 = 0.01;

/// Sample `states` fed to the superposition proxy.
pub const SAMPLE_STATES: [f64; 2] = [1.0, 0.5];
/// Sample `alphas` fed to the superposition proxy.
pub const SAMPLE_ALPHAS: [f64; 2] = [0.7, 0.3];
/// Diagonal of the sample tunneling barrier.
pub const SAMPLE_BARRIER_DIAGONAL: [f64; 2] = [1.0, 2.0];

/// Per-iteration diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub iteration: usize,
    pub t: f64,
    pub wave: f64,
    pub entropy: f64,
    pub superposition_mean: f64,
    pub tunneling: f64,
    pub entanglement: f64,
    pub combined: f64,
}

/// Statistics over the per-snapshot density means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceSummary {
    pub snapshots: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Result of one reconstruction run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconstruction {
    /// Density snapshots: the initial state followed by one per iteration.
    pub trace: Vec<Vec<f64>>,
    /// Entropy produced by the last wave step.
    pub final_entropy: f64,
    pub steps: Vec<StepRecord>,
}

impl Reconstruction {
    /// Arithmetic mean of each snapshot, in trace order.
    pub fn snapshot_means(&self) -> Vec<f64> {
        use statrs::statistics::Statistics;
        self.trace.iter().map(|snap| snap.iter().mean()).collect()
    }

    pub fn summary(&self) -> TraceSummary {
        use statrs::statistics::Statistics;
        let means = self.snapshot_means();
        TraceSummary {
            snapshots: means.len(),
            mean: means.iter().mean(),
            std_dev: means.iter().population_std_dev(),
            min: means.iter().copied().fold(f64::INFINITY, f64::min),
            max: means.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Hex SHA-256 over the bit patterns of every snapshot value and the
    /// final entropy. Bit-identical runs share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut h = Sha256::new();
        for snap in &self.trace {
            h.update((snap.len() as u64).to_le_bytes());
            for v in snap {
                h.update(v.to_bits().to_le_bytes());
            }
        }
        h.update(self.final_entropy.to_bits().to_le_bytes());
        let digest: [u8; 32] = h.finalize().into();
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Run `iterations` reconstruction steps against `state`, memoizing proxy
/// calls in `caches`.
pub fn reconstruct(
    state: &mut WaveState,
    caches: &mut ProxyCaches,
    iterations: usize,
) -> Result<Reconstruction> {
    if iterations == 0 {
        return Err(WaveError::NoIterations);
    }

    let barrier = DMatrix::from_diagonal(&DVector::from_column_slice(&SAMPLE_BARRIER_DIAGONAL));

    let mut trace = Vec::with_capacity(iterations + 1);
    trace.push(state.density().to_vec());
    let mut steps = Vec::with_capacity(iterations);

    for i in 0..iterations {
        let t = i as f64 / iterations as f64;
        let wave = state.step(t, DEFAULT_CYCLE)?;

        let sup = caches.superposition(&SAMPLE_STATES, &SAMPLE_ALPHAS)?;
        let tunnel = caches.tunneling(&barrier, DEFAULT_DT)?;
        let entangle = caches.entanglement(&sup, &sup.transpose())?;

        let superposition_mean = sup.mean();
        let combined = (superposition_mean + tunnel + entangle) / 3.0;
        let blend = PROXY_BLEND * combined;
        trace.push(state.density().iter().map(|d| d + blend).collect());

        log::debug!(
            "recon iteration {i}: t={t:.3} entropy={:.6} combined={combined:.6}",
            state.entropy()
        );
        steps.push(StepRecord {
            iteration: i,
            t,
            wave,
            entropy: state.entropy(),
            superposition_mean,
            tunneling: tunnel,
            entanglement: entangle,
            combined,
        });
    }

    Ok(Reconstruction {
        trace,
        final_entropy: state.entropy(),
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(iterations: usize) -> Reconstruction {
        let mut state = WaveState::default();
        let mut caches = ProxyCaches::default();
        reconstruct(&mut state, &mut caches, iterations).unwrap()
    }

    #[test]
    fn trace_has_initial_plus_one_per_iteration() {
        let recon = run(5);
        assert_eq!(recon.trace.len(), 6);
        assert_eq!(recon.steps.len(), 5);
        assert_eq!(recon.trace[0], vec![1.0; 5]);
        assert!(recon.trace.iter().all(|snap| snap.len() == 5));
    }

    #[test]
    fn final_entropy_is_last_step_entropy() {
        let recon = run(5);
        let last = recon.steps.last().unwrap();
        assert_eq!(recon.final_entropy.to_bits(), last.entropy.to_bits());
        assert!((recon.final_entropy - 0.363_314_338_894_493_66).abs() < 1e-9);
    }

    #[test]
    fn combined_blend_matches_reference() {
        let recon = run(5);
        // mean(S) = 0.375, tunneling ≈ 0.86178, trace(S·S) = 0.7225
        for step in &recon.steps {
            assert!((step.superposition_mean - 0.375).abs() < 1e-12);
            assert!((step.entanglement - 0.7225).abs() < 1e-12);
            assert!((step.combined - 0.653_094_695_185_656_9).abs() < 1e-9);
        }
    }

    #[test]
    fn snapshot_means_match_reference() {
        let expected = [
            1.0,
            1.006_530_946_951_856_6,
            1.019_181_032_777_781_5,
            1.039_130_454_017_498_6,
            1.062_054_056_732_652_4,
            1.084_607_273_319_353,
        ];
        let means = run(5).snapshot_means();
        assert_eq!(means.len(), expected.len());
        for (got, want) in means.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} vs {want}");
        }
    }

    #[test]
    fn blend_stays_out_of_state_density() {
        let mut state = WaveState::default();
        let mut caches = ProxyCaches::default();
        let recon = reconstruct(&mut state, &mut caches, 5).unwrap();

        // Only the wave steps touch the state: product of (1 + 0.05·wave).
        for &d in state.density() {
            assert!((d - 1.078_076_326_367_496_4).abs() < 1e-12);
        }
        let blend = PROXY_BLEND * recon.steps[4].combined;
        for (snap, &d) in recon.trace[5].iter().zip(state.density()) {
            assert!((snap - (d + blend)).abs() < 1e-15);
        }
    }

    #[test]
    fn proxies_hit_cache_after_first_iteration() {
        let mut state = WaveState::default();
        let mut caches = ProxyCaches::default();
        reconstruct(&mut state, &mut caches, 5).unwrap();
        let stats = caches.stats();
        assert_eq!(stats.superposition.misses, 1);
        assert_eq!(stats.superposition.hits, 4);
        assert_eq!(stats.tunneling.misses, 1);
        assert_eq!(stats.tunneling.hits, 4);
        assert_eq!(stats.entanglement.misses, 1);
        assert_eq!(stats.entanglement.hits, 4);
    }

    #[test]
    fn zero_iterations_rejected() {
        let mut state = WaveState::default();
        let mut caches = ProxyCaches::default();
        assert_eq!(
            reconstruct(&mut state, &mut caches, 0),
            Err(WaveError::NoIterations)
        );
        assert_eq!(state, WaveState::default());
    }

    #[test]
    fn summary_spans_snapshot_means() {
        let recon = run(5);
        let summary = recon.summary();
        assert_eq!(summary.snapshots, 6);
        assert_eq!(summary.min, 1.0);
        assert!((summary.max - 1.084_607_273_319_353).abs() < 1e-9);
        assert!(summary.mean > summary.min && summary.mean < summary.max);
        assert!(summary.std_dev > 0.0);
    }

    #[test]
    fn fingerprint_is_stable_and_sensitive() {
        let a = run(5);
        let b = run(5);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
        assert_ne!(a.fingerprint(), run(4).fingerprint());
    }
}
