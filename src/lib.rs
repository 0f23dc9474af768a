//! Spatial-eval: procedurally generated spatial-reasoning tasks with
//! solver-verified ground truth.
//!
//! Every task is built from a randomized scenario and answered by a
//! deterministic solver that can be re-run on the stored scenario at any
//! time, so no answer in the corpus is hand-labeled or trusted blindly.
//!
//! # Quick Start
//!
//! ```
//! use spatial_eval::prelude::*;
//!
//! // One task
//! let task = Category::NavigationPathfinding
//!     .generate(Difficulty::Medium, 0, 42)
//!     .unwrap();
//! assert_eq!(task.answer_type(), AnswerType::Sequence);
//! assert!(task.reverify().unwrap());
//!
//! // A small corpus
//! let config = AssemblyConfig::default()
//!     .with_tasks_per_cell(2)
//!     .with_categories(vec![Category::GeometricReasoning]);
//! let report = CorpusAssembler::new(config).run().unwrap();
//! assert_eq!(report.corpus().task_count(), 6);
//! ```
//!
//! # Modules
//!
//! - [`geometry`]: points, rectangles, polygons, segments, distances
//! - [`graph`]: CSR graphs, BFS/Dijkstra/A* and obstacle grids
//! - [`task`]: task data model, categories and ground-truth matching
//! - [`categories`]: the twelve scenario generators and solvers
//! - [`difficulty`]: `(category, tier)` to generation parameters
//! - [`validation`]: schema and uniqueness checks
//! - [`assembly`]: per-cell retry loops, andon alerts, merging
//! - [`corpus`]: corpus summary, re-verification and on-disk layout
//! - [`seed`]: deterministic seed derivation

pub mod assembly;
pub mod categories;
pub mod corpus;
pub mod difficulty;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod prelude;
pub mod seed;
pub mod task;
pub mod validation;

pub use error::{Result, SpatialError};
pub use task::{AnswerType, Category, Difficulty, GroundTruth, Task};
