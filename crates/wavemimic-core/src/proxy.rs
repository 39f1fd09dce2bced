//! The three proxy computations and their memo caches.
//!
//! - **Superposition**: outer product `states ⊗ alphas`, decomposed by SVD and
//!   rebuilt from at most the top [`SUPERPOSITION_RANK`] singular triplets.
//! - **Tunneling**: mean diagonal of `exp(-barrier · dt)`.
//! - **Entanglement**: `trace(A · Bᵗ)`, the Frobenius inner product of `A`
//!   and `B` when their shapes agree.
//!
//! The free functions are pure. [`ProxyCaches`] wraps each of them in its own
//! [`ProxyCache`] so repeated calls with identical arguments reuse the stored
//! result.

use std::cmp::Ordering;

use nalgebra::DMatrix;
use serde::Serialize;

use crate::cache::{CacheStats, MatrixKey, PROXY_CACHE_CAPACITY, ProxyCache, scalar_bits};
use crate::error::{Result, WaveError};

/// Maximum number of singular triplets kept by the superposition proxy.
pub const SUPERPOSITION_RANK: usize = 3;

/// Default tunneling time step.
pub const DEFAULT_DT: f64 = 0.1;

// ---------------------------------------------------------------------------
// Pure computations
// ---------------------------------------------------------------------------

/// Rank-truncated reconstruction of the outer product `states ⊗ alphas`.
///
/// Keeps the largest `min(3, number of singular values)` singular values, so a
/// product of rank ≤ 3 is reproduced up to rounding.
pub fn superposition(states: &[f64], alphas: &[f64]) -> Result<DMatrix<f64>> {
    if states.is_empty() || alphas.is_empty() {
        return Err(WaveError::EmptyInput {
            op: "superposition",
        });
    }
    let outer = DMatrix::from_fn(states.len(), alphas.len(), |i, j| states[i] * alphas[j]);
    let (rows, cols) = outer.shape();

    let svd = outer.svd(true, true);
    let u = svd.u.ok_or(WaveError::Decomposition {
        op: "superposition",
    })?;
    let v_t = svd.v_t.ok_or(WaveError::Decomposition {
        op: "superposition",
    })?;
    let sigma = svd.singular_values;

    let mut order: Vec<usize> = (0..sigma.len()).collect();
    order.sort_by(|&a, &b| sigma[b].partial_cmp(&sigma[a]).unwrap_or(Ordering::Equal));

    let mut recon = DMatrix::zeros(rows, cols);
    for &k in order.iter().take(SUPERPOSITION_RANK) {
        recon += (u.column(k) * v_t.row(k)) * sigma[k];
    }
    Ok(recon)
}

/// Mean diagonal entry of the matrix exponential `exp(-barrier · dt)`.
pub fn tunneling(barrier: &DMatrix<f64>, dt: f64) -> Result<f64> {
    if !barrier.is_square() {
        return Err(WaveError::NotSquare {
            rows: barrier.nrows(),
            cols: barrier.ncols(),
        });
    }
    if barrier.is_empty() {
        return Err(WaveError::EmptyInput { op: "tunneling" });
    }
    if !dt.is_finite() {
        return Err(WaveError::InvalidParameter {
            name: "dt",
            value: dt,
        });
    }
    let propagator = (barrier * -dt).exp();
    Ok(propagator.diagonal().mean())
}

/// `trace(A · Bᵗ)`.
///
/// Requires `A` and `B` to have the same number of columns. For non-square
/// products the trace runs over the leading diagonal, `min(rows_a, rows_b)`
/// terms long.
pub fn entanglement(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<f64> {
    if a.ncols() != b.ncols() {
        return Err(WaveError::ShapeMismatch {
            op: "entanglement",
            left: a.shape(),
            right: b.shape(),
        });
    }
    let n = a.nrows().min(b.nrows());
    Ok((0..n).map(|i| a.row(i).dot(&b.row(i))).sum())
}

// ---------------------------------------------------------------------------
// Memoized wrappers
// ---------------------------------------------------------------------------

type SuperpositionKey = (MatrixKey, MatrixKey);
type TunnelingKey = (MatrixKey, u64);
type EntanglementKey = (MatrixKey, MatrixKey);

/// Snapshot of all three proxy caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProxyCacheStats {
    pub superposition: CacheStats,
    pub tunneling: CacheStats,
    pub entanglement: CacheStats,
}

/// One independent LRU cache per proxy.
#[derive(Debug, Clone)]
pub struct ProxyCaches {
    superposition: ProxyCache<SuperpositionKey, DMatrix<f64>>,
    tunneling: ProxyCache<TunnelingKey, f64>,
    entanglement: ProxyCache<EntanglementKey, f64>,
}

impl Default for ProxyCaches {
    fn default() -> Self {
        Self::with_capacity(PROXY_CACHE_CAPACITY)
    }
}

impl ProxyCaches {
    /// Three empty caches, each holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            superposition: ProxyCache::new("superposition", capacity),
            tunneling: ProxyCache::new("tunneling", capacity),
            entanglement: ProxyCache::new("entanglement", capacity),
        }
    }

    /// Memoized [`superposition`].
    pub fn superposition(&mut self, states: &[f64], alphas: &[f64]) -> Result<DMatrix<f64>> {
        let key = (MatrixKey::from_slice(states), MatrixKey::from_slice(alphas));
        self.superposition
            .get_or_try_insert_with(key, || superposition(states, alphas))
    }

    /// Memoized [`tunneling`], keyed on the barrier and `dt`.
    pub fn tunneling(&mut self, barrier: &DMatrix<f64>, dt: f64) -> Result<f64> {
        let key = (MatrixKey::from_matrix(barrier), scalar_bits(dt));
        self.tunneling
            .get_or_try_insert_with(key, || tunneling(barrier, dt))
    }

    /// Memoized [`entanglement`].
    pub fn entanglement(&mut self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<f64> {
        let key = (MatrixKey::from_matrix(a), MatrixKey::from_matrix(b));
        self.entanglement
            .get_or_try_insert_with(key, || entanglement(a, b))
    }

    /// Counters of all three caches.
    pub fn stats(&self) -> ProxyCacheStats {
        ProxyCacheStats {
            superposition: self.superposition.stats(),
            tunneling: self.tunneling.stats(),
            entanglement: self.entanglement.stats(),
        }
    }

    /// Drop every cached entry. Counters are kept.
    pub fn clear(&mut self) {
        self.superposition.clear();
        self.tunneling.clear();
        self.entanglement.clear();
    }
}
