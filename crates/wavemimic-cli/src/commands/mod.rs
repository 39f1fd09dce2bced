pub mod border;
pub mod crisp;
pub mod run;

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use wavemimic_core::{BorderEstimator, LaplaceBorder, QuadratureBorder, WaveError};

/// Label used when the caller does not supply one.
pub const DEFAULT_LABEL: &str = "R1b-S498";

/// Failure of a CLI command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Engine(#[from] WaveError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CommandResult = Result<(), CommandError>;

/// Parse a border estimator name into an estimator.
pub fn parse_border_method(s: &str) -> Box<dyn BorderEstimator> {
    match s {
        "closed" | "laplace" => Box::new(LaplaceBorder),
        "quadrature" | "simpson" | "numeric" => Box::new(QuadratureBorder::default()),
        _ => {
            log::warn!("Unknown border method '{s}', using closed form");
            Box::new(LaplaceBorder)
        }
    }
}

/// Serialize `value` as pretty JSON to `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> CommandResult {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    log::info!("wrote {}", path.display());
    Ok(())
}
