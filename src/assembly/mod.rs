//! Dataset assembly across the category × tier matrix.
//!
//! Each cell runs its own bounded retry state machine
//!
//! ```text
//! Pending -> Generating -> Accepted            (target reached)
//!               |   ^
//!               v   |
//!               Retry ------> Failed           (budget spent or cancelled)
//! ```
//!
//! with a cell-owned [`UniquenessRegistry`]. Cells share nothing while they
//! run; outputs are merged once at the end in configured cell order, so a
//! parallel run produces exactly the corpus a sequential run does.
//!
//! # Example
//!
//! ```
//! use spatial_eval::assembly::{AssemblyConfig, CorpusAssembler};
//! use spatial_eval::task::{Category, Difficulty};
//!
//! let config = AssemblyConfig::default()
//!     .with_tasks_per_cell(3)
//!     .with_categories(vec![Category::DistanceComputation])
//!     .with_tiers(vec![Difficulty::Easy, Difficulty::Hard]);
//!
//! let report = CorpusAssembler::new(config).run().unwrap();
//! assert_eq!(report.corpus().task_count(), 6);
//! assert!(report.partial_corpus_warning().is_none());
//! ```

pub mod andon;
mod config;

pub use andon::{AndonConfig, AndonEvent, AndonHandler, AndonSeverity, DefaultAndon, TestAndon};
pub use config::{
    AssemblyConfig, DEFAULT_CELL_RETRY_BUDGET, DEFAULT_SEED, DEFAULT_TASKS_PER_CELL,
};

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::categories::generate_task;
use crate::corpus::store::write_cell;
use crate::corpus::{CellShortfall, Corpus, CorpusSummary};
use crate::error::{Result, SpatialError};
use crate::seed::task_seed;
use crate::task::{Category, Difficulty, Task};
use crate::validation::{TaskValidator, UniquenessRegistry, ValidationResult};

/// State of one cell's generation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    /// Not started.
    Pending,
    /// Drawing the next task.
    Generating,
    /// Target count reached.
    Accepted,
    /// Last draw was rejected or failed; a fresh draw follows.
    Retry,
    /// Retry budget exhausted or run cancelled before the target.
    Failed,
}

impl CellState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Failed)
    }
}

/// Shared flag that abandons remaining cell work.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-cell outcome and counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellReport {
    pub category: Category,
    pub difficulty: Difficulty,
    pub state: CellState,
    pub accepted: usize,
    pub target: usize,
    /// Redraws spent (rejections plus generation failures).
    pub retries: usize,
    /// Task slots whose generator exhausted its attempts.
    pub generation_failures: usize,
    /// Validator rejections by reason code.
    pub rejections: BTreeMap<&'static str, usize>,
}

impl CellReport {
    fn new(category: Category, difficulty: Difficulty, target: usize) -> Self {
        Self {
            category,
            difficulty,
            state: CellState::Pending,
            accepted: 0,
            target,
            retries: 0,
            generation_failures: 0,
            rejections: BTreeMap::new(),
        }
    }

    /// Rejected draws over all validated draws.
    #[must_use]
    pub fn rejection_rate(&self) -> f32 {
        let rejected: usize = self.rejections.values().sum();
        let validated = rejected + self.accepted;
        if validated == 0 {
            0.0
        } else {
            rejected as f32 / validated as f32
        }
    }

    #[must_use]
    pub fn shortfall(&self) -> Option<CellShortfall> {
        (self.accepted < self.target).then_some(CellShortfall {
            category: self.category,
            difficulty: self.difficulty,
            accepted: self.accepted,
            target: self.target,
        })
    }
}

/// One finished cell before merging.
struct CellOutput {
    report: CellReport,
    tasks: Vec<Task>,
    registry: UniquenessRegistry,
}

/// Result of an assembly run.
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    corpus: Corpus,
    cells: Vec<CellReport>,
    cancelled: bool,
}

impl AssemblyReport {
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    #[must_use]
    pub fn into_corpus(self) -> Corpus {
        self.corpus
    }

    #[must_use]
    pub fn cells(&self) -> &[CellReport] {
        &self.cells
    }

    #[must_use]
    pub fn cell(&self, category: Category, difficulty: Difficulty) -> Option<&CellReport> {
        self.cells
            .iter()
            .find(|c| c.category == category && c.difficulty == difficulty)
    }

    /// Whether the run was cancelled before every cell finished.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    #[must_use]
    pub fn shortfalls(&self) -> Vec<CellShortfall> {
        self.cells.iter().filter_map(CellReport::shortfall).collect()
    }

    /// Summary including under-filled cells.
    #[must_use]
    pub fn summary(&self) -> CorpusSummary {
        CorpusSummary::from_tasks(self.corpus.tasks(), self.shortfalls())
    }

    /// `CorpusIncomplete` listing under-filled cells, if any.
    #[must_use]
    pub fn partial_corpus_warning(&self) -> Option<SpatialError> {
        let cells = self.shortfalls();
        (!cells.is_empty()).then_some(SpatialError::CorpusIncomplete { cells })
    }

    /// The corpus, or `CorpusIncomplete` when any cell is short.
    pub fn into_complete(self) -> Result<Corpus> {
        match self.partial_corpus_warning() {
            Some(err) => Err(err),
            None => Ok(self.corpus),
        }
    }
}

/// Drives generation, validation and merging for a whole corpus.
pub struct CorpusAssembler {
    config: AssemblyConfig,
    validator: TaskValidator,
    andon: Arc<dyn AndonHandler>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for CorpusAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusAssembler")
            .field("config", &self.config)
            .field("validator", &self.validator)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl CorpusAssembler {
    #[must_use]
    pub fn new(config: AssemblyConfig) -> Self {
        let validator = TaskValidator::new().with_reverify(config.reverify);
        Self {
            config,
            validator,
            andon: Arc::new(DefaultAndon::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Route Andon events to `handler`.
    #[must_use]
    pub fn with_andon(mut self, handler: Arc<dyn AndonHandler>) -> Self {
        self.andon = handler;
        self
    }

    /// Share an external cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run every configured cell and merge the results.
    ///
    /// Only an invalid configuration fails the run; cell failures are
    /// reported through [`AssemblyReport::shortfalls`].
    pub fn run(&self) -> Result<AssemblyReport> {
        self.config.validate()?;
        let cells = self.config.cells();
        info!(
            cells = cells.len(),
            target = self.config.target_total(),
            seed = self.config.seed,
            "assembling corpus"
        );

        let outputs = self.run_cells(&cells);
        let report = self.merge(outputs);

        info!(
            tasks = report.corpus.task_count(),
            short_cells = report.shortfalls().len(),
            cancelled = report.cancelled,
            "corpus assembled"
        );
        Ok(report)
    }

    #[cfg(feature = "parallel")]
    fn run_cells(&self, cells: &[(Category, Difficulty)]) -> Vec<CellOutput> {
        if self.config.parallel {
            cells
                .par_iter()
                .map(|&(category, tier)| self.run_cell(category, tier))
                .collect()
        } else {
            cells
                .iter()
                .map(|&(category, tier)| self.run_cell(category, tier))
                .collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn run_cells(&self, cells: &[(Category, Difficulty)]) -> Vec<CellOutput> {
        cells
            .iter()
            .map(|&(category, tier)| self.run_cell(category, tier))
            .collect()
    }

    fn run_cell(&self, category: Category, tier: Difficulty) -> CellOutput {
        let target = self.config.tasks_per_cell;
        let mut report = CellReport::new(category, tier, target);
        let mut registry = UniquenessRegistry::new();
        let mut tasks = Vec::with_capacity(target);
        let mut redraw: u32 = 0;

        while !report.state.is_terminal() {
            report.state = match report.state {
                CellState::Pending => CellState::Generating,
                CellState::Generating if self.cancel.is_cancelled() => CellState::Failed,
                CellState::Generating => {
                    let index = tasks.len();
                    let seed = task_seed(self.config.seed, category, tier, index, redraw);
                    match generate_task(category, tier, index, seed, self.config.max_attempts) {
                        Ok(task) => match self.validator.admit(&task, &mut registry) {
                            ValidationResult::Accepted => {
                                tasks.push(task);
                                report.accepted = tasks.len();
                                redraw = 0;
                                if tasks.len() >= target {
                                    CellState::Accepted
                                } else {
                                    CellState::Generating
                                }
                            }
                            ValidationResult::Rejected(reason) => {
                                debug!(%category, %tier, index, redraw, %reason, "task rejected");
                                *report.rejections.entry(reason.code()).or_default() += 1;
                                CellState::Retry
                            }
                        },
                        Err(err) => {
                            report.generation_failures += 1;
                            self.raise(AndonEvent::GenerationFailure {
                                category,
                                difficulty: tier,
                                index,
                                message: err.to_string(),
                            });
                            CellState::Retry
                        }
                    }
                }
                CellState::Retry => {
                    report.retries += 1;
                    redraw = redraw.wrapping_add(1);
                    if report.retries > self.config.cell_retry_budget {
                        CellState::Failed
                    } else {
                        CellState::Generating
                    }
                }
                terminal @ (CellState::Accepted | CellState::Failed) => terminal,
            };
        }

        self.finish_cell(&report, &tasks);
        CellOutput {
            report,
            tasks,
            registry,
        }
    }

    fn finish_cell(&self, report: &CellReport, tasks: &[Task]) {
        let (category, tier) = (report.category, report.difficulty);
        let rate = report.rejection_rate();
        if self.config.andon.exceeds_rejection_threshold(rate) {
            self.raise(AndonEvent::HighRejectionRate {
                category,
                difficulty: tier,
                rate,
                threshold: self.config.andon.rejection_threshold,
            });
        }
        if report.accepted < report.target {
            warn!(
                %category,
                %tier,
                accepted = report.accepted,
                target = report.target,
                "cell under target"
            );
            self.raise(AndonEvent::CellUnderTarget {
                category,
                difficulty: tier,
                accepted: report.accepted,
                target: report.target,
            });
        } else {
            info!(%category, %tier, accepted = report.accepted, retries = report.retries, "cell complete");
        }

        if let Some(dir) = &self.config.checkpoint_dir {
            if let Err(err) = write_cell(dir, category, tier, tasks, self.config.output_format) {
                warn!(%category, %tier, error = %err, "checkpoint write failed");
            }
        }
    }

    fn raise(&self, event: AndonEvent) {
        if !self.config.andon.enabled {
            return;
        }
        self.andon.on_event(&event);
        if self.andon.should_halt(&event) {
            warn!(%event, "andon halt requested, cancelling remaining cells");
            self.cancel.cancel();
        }
    }

    fn merge(&self, outputs: Vec<CellOutput>) -> AssemblyReport {
        let mut registry = UniquenessRegistry::new();
        let mut tasks = Vec::with_capacity(self.config.target_total());
        let mut cells = Vec::with_capacity(outputs.len());
        for output in outputs {
            let clashes = registry.merge(output.registry);
            if !clashes.is_empty() {
                warn!(?clashes, "task ids repeated across cells");
            }
            tasks.extend(output.tasks);
            cells.push(output.report);
        }
        AssemblyReport {
            corpus: Corpus::new(tasks),
            cells,
            cancelled: self.cancel.is_cancelled(),
        }
    }
}
