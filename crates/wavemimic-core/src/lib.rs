//! # wavemimic-core
//!
//! **A small, deterministic entropy-wave simulation.**
//!
//! The engine keeps a density vector and a scalar entropy, evolves them
//! through a damped oscillation, and folds three memoized linear-algebra
//! proxies into every step.
//!
//! ## Quick Start
//!
//! ```
//! use wavemimic_core::{WaveEngine, crispr_proxy};
//!
//! let mut engine = WaveEngine::default();
//! let recon = engine.fractal_recon(5).unwrap();
//! assert_eq!(recon.trace.len(), 6);
//!
//! let report = crispr_proxy("R1b-S498", recon.final_entropy);
//! println!("{report}");
//! ```
//!
//! ## Architecture
//!
//! Reconstruction loop → wave step → (superposition, tunneling,
//! entanglement) → fold into density → trace → final entropy → decision.
//!
//! - **Proxies** ([`proxy`]): rank-3 SVD reconstruction of an outer product,
//!   mean diagonal of a matrix exponential, and `trace(A·Bᵗ)`. Each has its
//!   own 128-entry LRU cache ([`cache`]) keyed on exact bit patterns.
//! - **State** ([`state`]): density vector + entropy, updated in place.
//! - **Reconstruction** ([`recon`]): the iterative loop and its trace.
//! - **Decision** ([`decision`]): entropy-gated report with a Laplace border
//!   estimator.
//!
//! No randomness is used anywhere; identical inputs give bit-identical
//! outputs.

pub mod cache;
pub mod decision;
pub mod engine;
pub mod error;
pub mod proxy;
pub mod recon;
pub mod state;

pub use cache::{CacheStats, MatrixKey, PROXY_CACHE_CAPACITY, ProxyCache};
pub use decision::{
    BASE_DENSITY_DELTA, BORDER_FALLBACK, BORDER_THRESHOLD, BorderEstimator, CrispReport,
    LaplaceBorder, QuadratureBorder, REBUILD_BONUS, REBUILD_THRESHOLD, VOLATILITY, crispr_proxy,
    crispr_proxy_with,
};
pub use engine::WaveEngine;
pub use error::{Result, WaveError};
pub use proxy::{
    DEFAULT_DT, ProxyCacheStats, ProxyCaches, SUPERPOSITION_RANK, entanglement, superposition,
    tunneling,
};
pub use recon::{
    DEFAULT_ITERATIONS, PROXY_BLEND, Reconstruction, StepRecord, TraceSummary, reconstruct,
};
pub use state::{
    DEFAULT_CYCLE, DEFAULT_DIMENSION, DENSITY_GAIN, ENTROPY_EPSILON, WaveState, wave_amplitude,
    wave_entropy,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
