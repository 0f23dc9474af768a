//! Error types for corpus generation.
//!
//! Errors fall into two groups: redraw signals that the generation loop
//! absorbs (`UnsolvableScenario`, `ValidationRejection`), and outcomes that
//! are recorded and reported without aborting an assembly run.

use thiserror::Error;

use crate::corpus::CellShortfall;
use crate::task::{Category, Difficulty};
use crate::validation::RejectionReason;

/// Main error type for spatial task generation.
///
/// # Examples
///
/// ```
/// use spatial_eval::error::SpatialError;
///
/// let err = SpatialError::unsolvable("no path between endpoints");
/// assert!(err.is_redraw());
/// assert!(err.to_string().contains("no path"));
/// ```
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Scenario has no single well-defined answer (no path, zero-area
    /// polygon, tie, infeasible coverage, exhausted search budget).
    #[error("Unsolvable scenario: {reason}")]
    UnsolvableScenario {
        /// What made the scenario degenerate
        reason: String,
    },

    /// Task was refused by the schema/uniqueness validator.
    #[error("Validation rejected {task_id}: {reason}")]
    ValidationRejection {
        /// Offending task identifier
        task_id: String,
        /// Reason code
        reason: RejectionReason,
    },

    /// Generator exhausted its attempt bound without producing a task.
    #[error("Generation failed for {category}/{tier} after {attempts} attempts")]
    GenerationFailure {
        /// Category being generated
        category: Category,
        /// Difficulty tier being generated
        tier: Difficulty,
        /// Number of attempts made
        attempts: usize,
    },

    /// One or more cells finished under their target count.
    #[error("Corpus incomplete: {} cell(s) below target", cells.len())]
    CorpusIncomplete {
        /// Under-filled cells
        cells: Vec<CellShortfall>,
    },

    /// Invalid configuration or parameter value.
    #[error("Invalid parameter: {param}={value} ({constraint})")]
    InvalidParameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// I/O error while reading or writing corpus files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SpatialError {
    /// Build an `UnsolvableScenario` error.
    #[must_use]
    pub fn unsolvable(reason: impl Into<String>) -> Self {
        Self::UnsolvableScenario {
            reason: reason.into(),
        }
    }

    /// Build an `InvalidParameter` error.
    #[must_use]
    pub fn invalid_parameter(
        param: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Whether the generation loop should discard the draw and try again.
    #[must_use]
    pub fn is_redraw(&self) -> bool {
        matches!(
            self,
            Self::UnsolvableScenario { .. } | Self::ValidationRejection { .. }
        )
    }
}

impl From<serde_json::Error> for SpatialError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, SpatialError>;
