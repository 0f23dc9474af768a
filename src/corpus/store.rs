//! On-disk corpus layout.
//!
//! ```text
//! <root>/
//!   dataset_summary.json
//!   <category>/<difficulty>/tasks.json    (JSON array)
//!   <category>/<difficulty>/tasks.jsonl   (JSON Lines)
//! ```
//!
//! Field names and enum spellings in these files are a stable contract with
//! downstream scoring harnesses.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{Corpus, CorpusSummary};
use crate::error::{Result, SpatialError};
use crate::task::{Category, Difficulty, Family, Task};

/// Summary artifact file name.
pub const SUMMARY_FILE: &str = "dataset_summary.json";

/// Encoding of per-cell task files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One pretty-printed JSON array per cell.
    #[default]
    JsonArray,
    /// One task object per line.
    JsonLines,
}

impl OutputFormat {
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::JsonArray => "tasks.json",
            Self::JsonLines => "tasks.jsonl",
        }
    }
}

/// Directory holding one category/tier cell.
#[must_use]
pub fn cell_dir(root: &Path, category: Category, difficulty: Difficulty) -> PathBuf {
    root.join(category.name()).join(difficulty.name())
}

/// Write one cell's tasks, replacing any previous file.
pub fn write_cell(
    root: &Path,
    category: Category,
    difficulty: Difficulty,
    tasks: &[Task],
    format: OutputFormat,
) -> Result<PathBuf> {
    let dir = cell_dir(root, category, difficulty);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format.file_name());
    let mut writer = BufWriter::new(File::create(&path)?);
    match format {
        OutputFormat::JsonArray => serde_json::to_writer_pretty(&mut writer, tasks)?,
        OutputFormat::JsonLines => {
            for task in tasks {
                serde_json::to_writer(&mut writer, task)?;
                writer.write_all(b"\n")?;
            }
        }
    }
    writer.flush()?;
    debug!(path = %path.display(), tasks = tasks.len(), "wrote cell");
    Ok(path)
}

/// Write every non-empty cell of `corpus` plus the summary artifact.
pub fn write_corpus(
    root: &Path,
    corpus: &Corpus,
    summary: &CorpusSummary,
    format: OutputFormat,
) -> Result<()> {
    fs::create_dir_all(root)?;
    for &category in Category::all() {
        for &difficulty in Difficulty::all() {
            let tasks: Vec<Task> = corpus.cell(category, difficulty).cloned().collect();
            if !tasks.is_empty() {
                write_cell(root, category, difficulty, &tasks, format)?;
            }
        }
    }
    let mut writer = BufWriter::new(File::create(root.join(SUMMARY_FILE))?);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.flush()?;
    Ok(())
}

/// Read a task file, choosing the decoder from its extension.
pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    let reader = BufReader::new(File::open(path)?);
    if path.extension().is_some_and(|ext| ext == "jsonl") {
        let mut tasks = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                tasks.push(serde_json::from_str(&line)?);
            }
        }
        Ok(tasks)
    } else {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Which cells [`load_dataset`] reads. Empty lists mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetFilter {
    categories: Vec<Category>,
    difficulties: Vec<Difficulty>,
    families: Vec<Family>,
}

impl DatasetFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulties.push(difficulty);
        self
    }

    #[must_use]
    pub fn with_family(mut self, family: Family) -> Self {
        self.families.push(family);
        self
    }

    #[must_use]
    pub fn matches(&self, category: Category, difficulty: Difficulty) -> bool {
        (self.categories.is_empty() || self.categories.contains(&category))
            && (self.difficulties.is_empty() || self.difficulties.contains(&difficulty))
            && (self.families.is_empty() || self.families.contains(&category.family()))
    }
}

/// Load the cells selected by `filter`, in category then tier order.
///
/// Missing cells are skipped. A cell holding both encodings reads the JSON
/// array.
pub fn load_dataset(root: &Path, filter: &DatasetFilter) -> Result<Corpus> {
    if !root.is_dir() {
        return Err(SpatialError::invalid_parameter(
            "root",
            root.display(),
            "corpus directory must exist",
        ));
    }
    let mut tasks = Vec::new();
    for &category in Category::all() {
        for &difficulty in Difficulty::all() {
            if !filter.matches(category, difficulty) {
                continue;
            }
            let dir = cell_dir(root, category, difficulty);
            let file = [OutputFormat::JsonArray, OutputFormat::JsonLines]
                .iter()
                .map(|f| dir.join(f.file_name()))
                .find(|p| p.is_file());
            if let Some(path) = file {
                tasks.extend(read_tasks(&path)?);
            }
        }
    }
    Ok(Corpus::new(tasks))
}

/// Load every cell under `root`.
pub fn load_corpus(root: &Path) -> Result<Corpus> {
    load_dataset(root, &DatasetFilter::new())
}

/// Read `dataset_summary.json`.
pub fn load_summary(root: &Path) -> Result<CorpusSummary> {
    let reader = BufReader::new(File::open(root.join(SUMMARY_FILE))?);
    Ok(serde_json::from_reader(reader)?)
}
