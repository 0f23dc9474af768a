//! Schema and uniqueness validation for generated tasks.
//!
//! [`TaskValidator`] checks a single task against the corpus schema:
//! well-formed id, consistent category and answer type, finite answers,
//! in-bounds scenario fields, a prompt rendered from the stored scenario,
//! walkable path answers and, when enabled, a
//! fresh re-solve of the scenario. [`UniquenessRegistry`] tracks ids and
//! prompts already accepted in a cell so duplicates are refused.
//!
//! Validation never mutates a task; it only reports a [`RejectionReason`].

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::task::{AnswerType, Category, Difficulty, GroundTruth, Scenario, Task};

/// Why a task was refused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Another accepted task already uses this id.
    DuplicateTaskId,
    /// Byte-identical prompt already accepted in the same category/tier.
    DuplicatePrompt,
    /// Id does not follow `{CODE}-{tier}-{index:04}`.
    MalformedTaskId,
    /// Id, task category and scenario category disagree.
    CategoryMismatch,
    /// Ground truth does not have the declared answer type.
    AnswerTypeMismatch,
    /// A scenario field violates its declared bound.
    ScenarioOutOfBounds(String),
    /// Re-solving the scenario does not reproduce the stored answer.
    GroundTruthMismatch,
    /// Prompt is empty or whitespace.
    EmptyPrompt,
    /// Prompt is not the one the stored scenario renders.
    PromptMismatch,
    /// Numerical answer is NaN or infinite.
    NonFiniteAnswer,
    /// Sequence answer is not a walkable path between the route endpoints.
    InvalidSequence,
}

impl RejectionReason {
    /// Stable snake_case reason code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateTaskId => "duplicate_task_id",
            Self::DuplicatePrompt => "duplicate_prompt",
            Self::MalformedTaskId => "malformed_task_id",
            Self::CategoryMismatch => "category_mismatch",
            Self::AnswerTypeMismatch => "answer_type_mismatch",
            Self::ScenarioOutOfBounds(_) => "scenario_out_of_bounds",
            Self::GroundTruthMismatch => "ground_truth_mismatch",
            Self::EmptyPrompt => "empty_prompt",
            Self::PromptMismatch => "prompt_mismatch",
            Self::NonFiniteAnswer => "non_finite_answer",
            Self::InvalidSequence => "invalid_sequence",
        }
    }

    /// Uniqueness failures can be cured by a fresh draw; schema failures
    /// point at a generator defect.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateTaskId | Self::DuplicatePrompt)
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScenarioOutOfBounds(detail) => write!(f, "{}: {detail}", self.code()),
            other => f.write_str(other.code()),
        }
    }
}

/// Result of validating one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Task passed every check.
    Accepted,
    /// Task was refused.
    Rejected(RejectionReason),
}

impl ValidationResult {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    #[must_use]
    pub fn rejection_reason(&self) -> Option<&RejectionReason> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "Accepted"),
            Self::Rejected(reason) => write!(f, "Rejected: {reason}"),
        }
    }
}

/// Ids and prompts already accepted.
///
/// Each assembly cell owns one registry; registries are merged once when
/// cell outputs are combined. Prompt uniqueness is scoped to a
/// category/tier, id uniqueness is global.
#[derive(Debug, Clone, Default)]
pub struct UniquenessRegistry {
    task_ids: HashSet<String>,
    prompts: HashMap<(Category, Difficulty), HashSet<String>>,
}

impl UniquenessRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Duplicate check without recording.
    #[must_use]
    pub fn check(&self, task: &Task) -> ValidationResult {
        if self.task_ids.contains(task.task_id()) {
            return ValidationResult::Rejected(RejectionReason::DuplicateTaskId);
        }
        let seen = self
            .prompts
            .get(&(task.category(), task.difficulty()))
            .is_some_and(|p| p.contains(task.prompt()));
        if seen {
            return ValidationResult::Rejected(RejectionReason::DuplicatePrompt);
        }
        ValidationResult::Accepted
    }

    /// Record the task's id and prompt.
    pub fn record(&mut self, task: &Task) {
        self.task_ids.insert(task.task_id().to_string());
        self.prompts
            .entry((task.category(), task.difficulty()))
            .or_default()
            .insert(task.prompt().to_string());
    }

    /// Number of recorded ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    /// Fold another registry into this one, returning the ids present in
    /// both.
    pub fn merge(&mut self, other: UniquenessRegistry) -> Vec<String> {
        let mut clashes: Vec<String> = other
            .task_ids
            .iter()
            .filter(|id| self.task_ids.contains(*id))
            .cloned()
            .collect();
        clashes.sort();
        self.task_ids.extend(other.task_ids);
        for (cell, prompts) in other.prompts {
            self.prompts.entry(cell).or_default().extend(prompts);
        }
        clashes
    }
}

/// Schema validator for generated tasks.
///
/// # Example
///
/// ```
/// use spatial_eval::task::{Category, Difficulty};
/// use spatial_eval::validation::{TaskValidator, UniquenessRegistry};
///
/// let task = Category::DistanceComputation.generate(Difficulty::Easy, 0, 42).unwrap();
/// let validator = TaskValidator::new().with_reverify(true);
/// let mut registry = UniquenessRegistry::new();
///
/// assert!(validator.admit(&task, &mut registry).is_accepted());
/// // the same task again is a duplicate
/// assert!(validator.admit(&task, &mut registry).is_rejected());
/// ```
#[derive(Debug, Clone)]
pub struct TaskValidator {
    reverify: bool,
}

impl Default for TaskValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskValidator {
    /// Validator that re-solves every scenario.
    #[must_use]
    pub fn new() -> Self {
        Self { reverify: true }
    }

    /// Enable or disable re-solving the scenario during validation.
    #[must_use]
    pub fn with_reverify(mut self, reverify: bool) -> Self {
        self.reverify = reverify;
        self
    }

    #[must_use]
    pub fn reverify(&self) -> bool {
        self.reverify
    }

    /// Schema checks for a single task, ignoring uniqueness.
    #[must_use]
    pub fn validate(&self, task: &Task) -> ValidationResult {
        match self.schema_violation(task) {
            Some(reason) => ValidationResult::Rejected(reason),
            None => ValidationResult::Accepted,
        }
    }

    fn schema_violation(&self, task: &Task) -> Option<RejectionReason> {
        let Some((category, difficulty, _)) = Task::parse_id(task.task_id()) else {
            return Some(RejectionReason::MalformedTaskId);
        };
        if category != task.category()
            || difficulty != task.difficulty()
            || task.scenario().category() != task.category()
        {
            return Some(RejectionReason::CategoryMismatch);
        }
        if task.prompt().trim().is_empty() {
            return Some(RejectionReason::EmptyPrompt);
        }
        let truth = task.ground_truth();
        if truth.answer_type() != task.answer_type()
            || task.scenario().answer_type() != task.answer_type()
        {
            return Some(RejectionReason::AnswerTypeMismatch);
        }
        if !truth.is_finite() {
            return Some(RejectionReason::NonFiniteAnswer);
        }
        if let Err(detail) = task.scenario().check_bounds() {
            return Some(RejectionReason::ScenarioOutOfBounds(detail));
        }
        if task.prompt() != task.scenario().prompt() {
            return Some(RejectionReason::PromptMismatch);
        }
        if task.answer_type() == AnswerType::Sequence && !is_walkable(task.scenario(), truth) {
            return Some(RejectionReason::InvalidSequence);
        }
        if self.reverify && !matches!(task.resolve(), Ok(fresh) if &fresh == truth) {
            return Some(RejectionReason::GroundTruthMismatch);
        }
        None
    }

    /// Full validation against `registry`, recording the task on success.
    pub fn admit(&self, task: &Task, registry: &mut UniquenessRegistry) -> ValidationResult {
        let result = match registry.check(task) {
            ValidationResult::Accepted => self.validate(task),
            rejected => rejected,
        };
        if result.is_accepted() {
            registry.record(task);
        }
        result
    }

    /// Validate a batch against a fresh registry.
    ///
    /// Returns `(accepted, rejected, reasons)`.
    #[must_use]
    pub fn validate_batch(&self, tasks: &[Task]) -> (usize, usize, Vec<RejectionReason>) {
        let mut registry = UniquenessRegistry::new();
        let mut accepted = 0;
        let mut reasons = Vec::new();
        for task in tasks {
            match self.admit(task, &mut registry) {
                ValidationResult::Accepted => accepted += 1,
                ValidationResult::Rejected(reason) => reasons.push(reason),
            }
        }
        (accepted, reasons.len(), reasons)
    }
}

/// Sequence answers are paths on the scenario's route grid.
fn is_walkable(scenario: &Scenario, truth: &GroundTruth) -> bool {
    let (Scenario::NavigationPathfinding(nav), Some(path)) = (scenario, truth.as_sequence()) else {
        return false;
    };
    let route = nav.route();
    route
        .grid()
        .is_valid_path(path, route.start_pos, route.end_pos)
}

#[cfg(test)]
mod tests;

#[cfg(test)]
mod tests_admission_contract;
