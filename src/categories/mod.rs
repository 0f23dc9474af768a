//! Category generators and their paired solvers.
//!
//! Each submodule owns one category's scenario type and implements
//! [`SpatialScenario`] for it: sampling a structurally valid scenario for a
//! tier, solving it deterministically, and rendering its prompt. The
//! generation loop in [`generate_task`] ties those together and redraws on
//! unsolvable scenarios until an attempt bound is hit.

pub mod allocation;
pub mod coordinate;
pub mod distance;
pub mod geometric;
pub mod geospatial;
pub mod navigation;
pub mod network;
pub mod pattern;
pub mod placement;
pub mod temporal;
pub mod topology;
pub mod visibility;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::difficulty::{DifficultyController, GenerationParameters};
use crate::error::{Result, SpatialError};
use crate::geometry::{Point, Polygon};
use crate::seed::attempt_seed;
use crate::task::{AnswerType, Category, Difficulty, GroundTruth, Scenario, Task};

/// Random stream used for all scenario sampling.
pub type TaskRng = ChaCha8Rng;

/// Default bound on generator attempts per task.
pub const DEFAULT_MAX_ATTEMPTS: usize = 20;

/// Largest coordinate magnitude a planar scenario may declare.
pub const MAX_COORDINATE: f64 = 1_000.0;

/// Interface shared by every category's scenario type.
pub trait SpatialScenario: Sized {
    /// Draw a structurally valid scenario for `tier`.
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self>;

    /// Compute the ground truth, or `UnsolvableScenario` when the scenario
    /// has no single well-defined answer.
    fn solve(&self) -> Result<GroundTruth>;

    /// Answer type of [`SpatialScenario::solve`]'s output.
    fn answer_type(&self) -> AnswerType;

    /// Natural-language prompt rendered from the scenario fields.
    fn prompt(&self) -> String;

    /// Task kind within the category, e.g. `"quadrant_identification"`.
    fn kind(&self) -> &'static str;

    /// Check declared field bounds; `Err` carries the violated bound.
    fn check_bounds(&self) -> std::result::Result<(), String>;
}

/// Generate one task, redrawing unsolvable scenarios.
///
/// Attempt `k` draws from a stream seeded by `(seed, k)`, so the result is a
/// pure function of the arguments.
///
/// # Errors
///
/// `GenerationFailure` when every attempt produced an unsolvable scenario.
pub fn generate_task(
    category: Category,
    tier: Difficulty,
    index: usize,
    seed: u64,
    max_attempts: usize,
) -> Result<Task> {
    let params = DifficultyController::parameters(category, tier);

    for attempt in 0..max_attempts {
        let mut rng = TaskRng::seed_from_u64(attempt_seed(seed, attempt));
        let drawn = Scenario::sample(category, tier, &params, &mut rng)
            .and_then(|scenario| scenario.solve().map(|truth| (scenario, truth)));

        match drawn {
            Ok((scenario, truth)) => {
                let prompt = scenario.prompt();
                return Ok(Task::new(
                    Task::format_id(category, tier, index),
                    tier,
                    prompt,
                    truth,
                    scenario,
                ));
            }
            Err(err) if err.is_redraw() => {
                trace!(%category, %tier, index, attempt, error = %err, "redrawing scenario");
            }
            Err(err) => return Err(err),
        }
    }

    Err(SpatialError::GenerationFailure {
        category,
        tier,
        attempts: max_attempts,
    })
}

impl Category {
    /// Generate the task for slot `index` of this category at `tier`.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatial_eval::task::{Category, Difficulty};
    ///
    /// let task = Category::CoordinateUnderstanding.generate(Difficulty::Easy, 1, 42).unwrap();
    /// assert_eq!(task.task_id(), "CU-easy-0001");
    /// assert!(task.reverify().unwrap());
    /// ```
    pub fn generate(&self, tier: Difficulty, index: usize, seed: u64) -> Result<Task> {
        generate_task(*self, tier, index, seed, DEFAULT_MAX_ATTEMPTS)
    }
}

// ---------------------------------------------------------------------------
// Sampling helpers
// ---------------------------------------------------------------------------

pub(crate) fn int_in(rng: &mut TaskRng, lo: i64, hi: i64) -> f64 {
    rng.gen_range(lo..=hi) as f64
}

pub(crate) fn sample_point(rng: &mut TaskRng, lo: i64, hi: i64) -> Point {
    Point::new(int_in(rng, lo, hi), int_in(rng, lo, hi))
}

/// Up to `n` distinct integer points in `[lo, hi]²`.
pub(crate) fn distinct_points(rng: &mut TaskRng, n: usize, lo: i64, hi: i64) -> Result<Vec<Point>> {
    let mut points: Vec<Point> = Vec::with_capacity(n);
    let mut tries = 0;
    while points.len() < n {
        tries += 1;
        if tries > n * 50 {
            return Err(SpatialError::unsolvable("could not place distinct points"));
        }
        let p = sample_point(rng, lo, hi);
        if !points.contains(&p) {
            points.push(p);
        }
    }
    Ok(points)
}

pub(crate) fn pick<T: Copy>(rng: &mut TaskRng, items: &[T]) -> Result<T> {
    if items.is_empty() {
        return Err(SpatialError::unsolvable("nothing to choose from"));
    }
    Ok(items[rng.gen_range(0..items.len())])
}

/// Count in `[lo, hi]`, collapsing to `hi` when the range is inverted.
pub(crate) fn count_in(rng: &mut TaskRng, lo: usize, hi: usize) -> usize {
    if lo >= hi {
        hi
    } else {
        rng.gen_range(lo..=hi)
    }
}

/// Star-shaped polygon around `center`: one vertex per angular sector,
/// rounded to integer coordinates.
pub(crate) fn sample_star_polygon(
    rng: &mut TaskRng,
    center: Point,
    min_radius: u32,
    max_radius: u32,
    vertices: usize,
) -> Polygon {
    let n = vertices.max(3);
    let sector = 360 / n as u32;
    let jitter = sector.saturating_sub(10).max(1);
    let mut points = Vec::with_capacity(n);
    for i in 0..n as u32 {
        let degrees = f64::from(i * sector + rng.gen_range(0..jitter));
        let radius = f64::from(rng.gen_range(min_radius..=max_radius));
        let (sin, cos) = degrees.to_radians().sin_cos();
        points.push(Point::new(
            (center.x + radius * cos).round(),
            (center.y + radius * sin).round(),
        ));
    }
    Polygon::new(points)
}

/// `A`, `B`, ... labels.
pub(crate) fn letter_labels(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let letter = char::from(b'A' + (i % 26) as u8);
            if i < 26 {
                letter.to_string()
            } else {
                format!("{letter}{}", i / 26)
            }
        })
        .collect()
}

pub(crate) fn join_display<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn check_point(p: Point, field: &str) -> std::result::Result<(), String> {
    if !p.is_finite() || p.x.abs() > MAX_COORDINATE || p.y.abs() > MAX_COORDINATE {
        return Err(format!("{field} {p} outside ±{MAX_COORDINATE}"));
    }
    Ok(())
}

pub(crate) fn check_positive(v: f64, field: &str) -> std::result::Result<(), String> {
    if !(v.is_finite() && v > 0.0 && v <= MAX_COORDINATE) {
        return Err(format!("{field}={v} must be in (0, {MAX_COORDINATE}]"));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
