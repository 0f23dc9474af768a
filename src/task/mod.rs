//! Task data model.
//!
//! A [`Task`] bundles a rendered prompt with the [`Scenario`] it was
//! rendered from and the solver's answer for that scenario. Tasks are only
//! built by the generator (see [`crate::categories::generate_task`]) or
//! deserialized from a stored corpus; there is no mutation path.

mod category;
mod scenario;

pub use category::{Category, Family};
pub use scenario::Scenario;

use crate::error::{Result, SpatialError};
use crate::graph::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relative tolerance for numerical answers.
pub const NUMERIC_RELATIVE_TOLERANCE: f64 = 0.01;

/// Absolute tolerance for numerical answers.
pub const NUMERIC_ABSOLUTE_TOLERANCE: f64 = 0.01;

/// Difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Tiers in ascending order of complexity.
    #[must_use]
    pub fn all() -> &'static [Difficulty] {
        &[Self::Easy, Self::Medium, Self::Hard]
    }

    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|d| d.name() == s)
            .ok_or_else(|| SpatialError::invalid_parameter("difficulty", s, "easy|medium|hard"))
    }
}

/// Declared shape of a task's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerType {
    /// Label or short string, compared case-insensitively.
    Exact,
    /// Real number, compared within tolerance.
    Numerical,
    /// Grid path, checked for adjacency and obstacle avoidance.
    Sequence,
    /// True/false.
    Boolean,
}

impl AnswerType {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Numerical => "numerical",
            Self::Sequence => "sequence",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for AnswerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed ground-truth value.
///
/// Serialized untagged: a JSON bool, number, array of `[row, col]` cells or
/// string respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroundTruth {
    Boolean(bool),
    Numerical(f64),
    Sequence(Vec<Cell>),
    Exact(String),
}

impl GroundTruth {
    /// Answer type this value satisfies.
    #[must_use]
    pub fn answer_type(&self) -> AnswerType {
        match self {
            Self::Boolean(_) => AnswerType::Boolean,
            Self::Numerical(_) => AnswerType::Numerical,
            Self::Sequence(_) => AnswerType::Sequence,
            Self::Exact(_) => AnswerType::Exact,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Numerical(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Cell]> {
        match self {
            Self::Sequence(cells) => Some(cells),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Exact(s) => Some(s),
            _ => None,
        }
    }

    /// Answer-equivalence rule shared with scoring harnesses.
    ///
    /// Numbers match within 1% relative or 0.01 absolute, whichever is
    /// looser; exact strings match case-insensitively after trimming;
    /// booleans and sequences must be equal.
    #[must_use]
    pub fn matches(&self, other: &GroundTruth) -> bool {
        match (self, other) {
            (Self::Numerical(a), Self::Numerical(b)) => numeric_match(*a, *b),
            (Self::Exact(a), Self::Exact(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            _ => false,
        }
    }

    /// All contained numbers are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Numerical(v) => v.is_finite(),
            _ => true,
        }
    }
}

fn numeric_match(actual: f64, expected: f64) -> bool {
    let tolerance = (expected.abs() * NUMERIC_RELATIVE_TOLERANCE).max(NUMERIC_ABSOLUTE_TOLERANCE);
    (actual - expected).abs() <= tolerance
}

impl fmt::Display for GroundTruth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Numerical(v) => write!(f, "{}", crate::geometry::format_number(*v)),
            Self::Sequence(cells) => {
                let parts: Vec<String> = cells.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Exact(s) => f.write_str(s),
        }
    }
}

/// One corpus entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    task_id: String,
    category: Category,
    difficulty: Difficulty,
    prompt: String,
    ground_truth: GroundTruth,
    answer_type: AnswerType,
    metadata: Scenario,
}

impl Task {
    pub(crate) fn new(
        task_id: String,
        difficulty: Difficulty,
        prompt: String,
        ground_truth: GroundTruth,
        metadata: Scenario,
    ) -> Self {
        Self {
            task_id,
            category: metadata.category(),
            difficulty,
            prompt,
            answer_type: metadata.answer_type(),
            ground_truth,
            metadata,
        }
    }

    /// Canonical id `{CODE}-{tier}-{index:04}`.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatial_eval::task::{Category, Difficulty, Task};
    ///
    /// let id = Task::format_id(Category::NavigationPathfinding, Difficulty::Hard, 7);
    /// assert_eq!(id, "NP-hard-0007");
    /// assert_eq!(
    ///     Task::parse_id(&id),
    ///     Some((Category::NavigationPathfinding, Difficulty::Hard, 7))
    /// );
    /// ```
    #[must_use]
    pub fn format_id(category: Category, difficulty: Difficulty, index: usize) -> String {
        format!("{}-{}-{index:04}", category.code(), difficulty.name())
    }

    /// Inverse of [`Task::format_id`].
    #[must_use]
    pub fn parse_id(id: &str) -> Option<(Category, Difficulty, usize)> {
        let mut parts = id.splitn(3, '-');
        let category = Category::from_code(parts.next()?)?;
        let difficulty = parts.next()?.parse().ok()?;
        let digits = parts.next()?;
        if digits.len() < 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some((category, difficulty, digits.parse().ok()?))
    }

    #[must_use]
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn ground_truth(&self) -> &GroundTruth {
        &self.ground_truth
    }

    #[must_use]
    pub fn answer_type(&self) -> AnswerType {
        self.answer_type
    }

    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.metadata
    }

    /// Re-run the paired solver on the stored scenario.
    pub fn resolve(&self) -> Result<GroundTruth> {
        self.metadata.solve()
    }

    /// Stored ground truth equals a fresh solve of the scenario.
    pub fn reverify(&self) -> Result<bool> {
        Ok(self.resolve()? == self.ground_truth)
    }
}
