//! Error type shared by every fallible engine operation.

use thiserror::Error;

/// Failures raised by the proxies, the wave step, the reconstruction loop and
/// the border estimators.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WaveError {
    /// The tunneling barrier must be a square matrix.
    #[error("barrier must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Operand shapes are incompatible for the requested product.
    #[error("{op}: incompatible shapes {left:?} and {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A vector or matrix argument has no elements.
    #[error("{op}: input is empty")]
    EmptyInput { op: &'static str },

    /// A scalar argument is outside its valid domain.
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A reconstruction with zero iterations has no final entropy.
    #[error("reconstruction requires at least one iteration")]
    NoIterations,

    /// The singular value decomposition did not yield singular vectors.
    #[error("{op}: decomposition did not produce singular vectors")]
    Decomposition { op: &'static str },

    /// The integral transform does not converge at this point.
    #[error("transform diverges at p = {at}")]
    DivergentTransform { at: f64 },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_square() {
        let err = WaveError::NotSquare { rows: 2, cols: 3 };
        assert_eq!(err.to_string(), "barrier must be square, got 2x3");
    }

    #[test]
    fn display_shape_mismatch() {
        let err = WaveError::ShapeMismatch {
            op: "entanglement",
            left: (2, 3),
            right: (2, 2),
        };
        assert_eq!(
            err.to_string(),
            "entanglement: incompatible shapes (2, 3) and (2, 2)"
        );
    }
}
