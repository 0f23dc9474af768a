//! Assembly run configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::andon::AndonConfig;
use crate::categories::DEFAULT_MAX_ATTEMPTS;
use crate::corpus::OutputFormat;
use crate::error::{Result, SpatialError};
use crate::task::{Category, Difficulty};

/// Base seed of a default run.
pub const DEFAULT_SEED: u64 = 42;

/// Tasks requested per category/tier cell (12 x 3 x 167 ≈ 6,000 tasks).
pub const DEFAULT_TASKS_PER_CELL: usize = 167;

/// Redraws a cell may spend before it gives up.
pub const DEFAULT_CELL_RETRY_BUDGET: usize = 500;

/// Configuration for a [`CorpusAssembler`](super::CorpusAssembler) run.
///
/// # Example
///
/// ```
/// use spatial_eval::assembly::AssemblyConfig;
/// use spatial_eval::task::{Category, Difficulty};
///
/// let config = AssemblyConfig::default()
///     .with_seed(7)
///     .with_tasks_per_cell(10)
///     .with_categories(vec![Category::NavigationPathfinding])
///     .with_tiers(vec![Difficulty::Hard]);
///
/// assert_eq!(config.cells(), vec![(Category::NavigationPathfinding, Difficulty::Hard)]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Base seed every task seed is derived from.
    pub seed: u64,
    /// Accepted tasks wanted per cell.
    pub tasks_per_cell: usize,
    /// Generator attempts per task draw.
    pub max_attempts: usize,
    /// Redraws (rejections and generation failures) allowed per cell.
    pub cell_retry_budget: usize,
    pub categories: Vec<Category>,
    pub tiers: Vec<Difficulty>,
    /// Run cells on the rayon pool when the `parallel` feature is enabled.
    pub parallel: bool,
    /// Re-solve every scenario during validation.
    pub reverify: bool,
    /// Write each cell here as soon as it finishes.
    pub checkpoint_dir: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub andon: AndonConfig,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            tasks_per_cell: DEFAULT_TASKS_PER_CELL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cell_retry_budget: DEFAULT_CELL_RETRY_BUDGET,
            categories: Category::all().to_vec(),
            tiers: Difficulty::all().to_vec(),
            parallel: true,
            reverify: true,
            checkpoint_dir: None,
            output_format: OutputFormat::default(),
            andon: AndonConfig::default(),
        }
    }
}

impl AssemblyConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the per-cell target (at least 1).
    #[must_use]
    pub fn with_tasks_per_cell(mut self, count: usize) -> Self {
        self.tasks_per_cell = count.max(1);
        self
    }

    /// Set generator attempts per draw (at least 1).
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub fn with_cell_retry_budget(mut self, budget: usize) -> Self {
        self.cell_retry_budget = budget;
        self
    }

    #[must_use]
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    #[must_use]
    pub fn with_tiers(mut self, tiers: Vec<Difficulty>) -> Self {
        self.tiers = tiers;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn with_reverify(mut self, reverify: bool) -> Self {
        self.reverify = reverify;
        self
    }

    #[must_use]
    pub fn with_checkpoint_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.checkpoint_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_andon(mut self, andon: AndonConfig) -> Self {
        self.andon = andon;
        self
    }

    /// Category/tier cells in configured order, categories outermost.
    #[must_use]
    pub fn cells(&self) -> Vec<(Category, Difficulty)> {
        self.categories
            .iter()
            .flat_map(|&c| self.tiers.iter().map(move |&t| (c, t)))
            .collect()
    }

    /// Total tasks a complete run produces.
    #[must_use]
    pub fn target_total(&self) -> usize {
        self.categories.len() * self.tiers.len() * self.tasks_per_cell
    }

    /// Reject values a file-loaded config can carry but the builders cannot.
    pub fn validate(&self) -> Result<()> {
        if self.tasks_per_cell == 0 {
            return Err(SpatialError::invalid_parameter("tasks_per_cell", 0, "must be >= 1"));
        }
        if self.max_attempts == 0 {
            return Err(SpatialError::invalid_parameter("max_attempts", 0, "must be >= 1"));
        }
        if self.categories.is_empty() {
            return Err(SpatialError::invalid_parameter("categories", "[]", "must not be empty"));
        }
        if self.tiers.is_empty() {
            return Err(SpatialError::invalid_parameter("tiers", "[]", "must not be empty"));
        }
        let unique: HashSet<_> = self.categories.iter().collect();
        if unique.len() != self.categories.len() {
            return Err(SpatialError::invalid_parameter(
                "categories",
                format!("{:?}", self.categories),
                "must not repeat",
            ));
        }
        let unique: HashSet<_> = self.tiers.iter().collect();
        if unique.len() != self.tiers.len() {
            return Err(SpatialError::invalid_parameter(
                "tiers",
                format!("{:?}", self.tiers),
                "must not repeat",
            ));
        }
        Ok(())
    }

    /// Load and validate a JSON config; absent fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
