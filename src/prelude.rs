//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use spatial_eval::prelude::*;
//! ```

pub use crate::assembly::{AssemblyConfig, AssemblyReport, CorpusAssembler};
pub use crate::corpus::{load_corpus, load_dataset, write_corpus, Corpus, CorpusSummary, DatasetFilter, OutputFormat};
pub use crate::error::{Result, SpatialError};
pub use crate::task::{AnswerType, Category, Difficulty, Family, GroundTruth, Scenario, Task};
pub use crate::validation::{TaskValidator, UniquenessRegistry, ValidationResult};
