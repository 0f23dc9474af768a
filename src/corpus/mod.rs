//! Assembled task corpus and its derived summary.
//!
//! The task list is the source of truth; [`CorpusSummary`] is derived from
//! it once and [`Corpus::reverify`] re-solves every stored scenario.

pub mod store;

pub use store::{load_corpus, load_dataset, load_summary, write_corpus, DatasetFilter, OutputFormat};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::task::{AnswerType, Category, Difficulty, Family, Task};

/// Cell that finished below its target count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellShortfall {
    pub category: Category,
    pub difficulty: Difficulty,
    pub accepted: usize,
    pub target: usize,
}

impl CellShortfall {
    #[must_use]
    pub fn missing(&self) -> usize {
        self.target.saturating_sub(self.accepted)
    }
}

impl std::fmt::Display for CellShortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}: {}/{}",
            self.category, self.difficulty, self.accepted, self.target
        )
    }
}

/// Aggregate counts, written as `dataset_summary.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub total_tasks: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_difficulty: BTreeMap<Difficulty, usize>,
    pub by_family: BTreeMap<Family, usize>,
    pub by_answer_type: BTreeMap<AnswerType, usize>,
    /// Per category, per tier.
    pub by_cell: BTreeMap<Category, BTreeMap<Difficulty, usize>>,
    /// Cells that did not reach their target.
    #[serde(default)]
    pub failed_cells: Vec<CellShortfall>,
}

impl CorpusSummary {
    /// Count `tasks`, attaching the given shortfalls.
    #[must_use]
    pub fn from_tasks(tasks: &[Task], failed_cells: Vec<CellShortfall>) -> Self {
        let mut summary = Self {
            total_tasks: tasks.len(),
            failed_cells,
            ..Self::default()
        };
        for task in tasks {
            *summary.by_category.entry(task.category()).or_default() += 1;
            *summary.by_difficulty.entry(task.difficulty()).or_default() += 1;
            *summary.by_family.entry(task.category().family()).or_default() += 1;
            *summary.by_answer_type.entry(task.answer_type()).or_default() += 1;
            *summary
                .by_cell
                .entry(task.category())
                .or_default()
                .entry(task.difficulty())
                .or_default() += 1;
        }
        summary
    }

    #[must_use]
    pub fn cell_count(&self, category: Category, difficulty: Difficulty) -> usize {
        self.by_cell
            .get(&category)
            .and_then(|tiers| tiers.get(&difficulty))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_cells.is_empty()
    }
}

/// Outcome of re-solving every stored scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReverifyReport {
    /// Tasks re-solved.
    pub checked: usize,
    /// Ids whose fresh answer differs from the stored one.
    pub exact_mismatches: Vec<String>,
    /// Ids whose fresh answer is outside the answer-matching tolerance.
    pub tolerance_mismatches: Vec<String>,
    /// Ids whose scenario no longer solves, with the error.
    pub errors: Vec<(String, String)>,
}

impl ReverifyReport {
    /// Every stored answer was reproduced exactly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.exact_mismatches.is_empty() && self.errors.is_empty()
    }
}

/// Ordered collection of accepted tasks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    tasks: Vec<Task>,
}

impl Corpus {
    #[must_use]
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Tasks of one category/tier cell, in corpus order.
    pub fn cell(&self, category: Category, difficulty: Difficulty) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(move |t| t.category() == category && t.difficulty() == difficulty)
    }

    #[must_use]
    pub fn find(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.task_id() == task_id)
    }

    /// Counts with no shortfalls attached.
    #[must_use]
    pub fn summary(&self) -> CorpusSummary {
        CorpusSummary::from_tasks(&self.tasks, Vec::new())
    }

    /// Re-run every task's solver on its stored scenario.
    #[must_use]
    pub fn reverify(&self) -> ReverifyReport {
        let mut report = ReverifyReport::default();
        for task in &self.tasks {
            report.checked += 1;
            match task.resolve() {
                Ok(fresh) => {
                    if &fresh != task.ground_truth() {
                        report.exact_mismatches.push(task.task_id().to_string());
                    }
                    if !fresh.matches(task.ground_truth()) {
                        report.tolerance_mismatches.push(task.task_id().to_string());
                    }
                }
                Err(err) => report
                    .errors
                    .push((task.task_id().to_string(), err.to_string())),
            }
        }
        report
    }

    /// Tasks whose stored answer has the given type.
    pub fn with_answer_type(&self, answer_type: AnswerType) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(move |t| t.ground_truth().answer_type() == answer_type)
    }
}

impl FromIterator<Task> for Corpus {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Corpus {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

#[cfg(test)]
mod tests;
