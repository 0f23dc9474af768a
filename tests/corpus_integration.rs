//! End-to-end corpus assembly, persistence and reloading.

use std::collections::HashSet;
use std::sync::Arc;

use spatial_eval::assembly::{CellState, TestAndon};
use spatial_eval::corpus::store::SUMMARY_FILE;
use spatial_eval::corpus::load_summary;
use spatial_eval::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Fixtures
// ============================================================================

fn full_matrix(tasks_per_cell: usize) -> AssemblyConfig {
    AssemblyConfig::default().with_tasks_per_cell(tasks_per_cell)
}

// ============================================================================
// Assembly
// ============================================================================

#[test]
fn every_cell_of_the_matrix_fills() {
    let andon = Arc::new(TestAndon::new());
    let report = CorpusAssembler::new(full_matrix(3))
        .with_andon(andon.clone())
        .run()
        .unwrap();

    assert_eq!(report.corpus().task_count(), 12 * 3 * 3);
    assert!(report.cells().iter().all(|c| c.state == CellState::Accepted));
    assert_eq!(andon.count_under_target(), 0);

    let summary = report.summary();
    for &category in Category::all() {
        for &tier in Difficulty::all() {
            assert_eq!(summary.cell_count(category, tier), 3, "{category}/{tier}");
        }
    }
}

#[test]
fn ids_and_prompts_are_unique_per_cell() {
    let report = CorpusAssembler::new(full_matrix(5)).run().unwrap();

    let mut ids = HashSet::new();
    let mut prompts = HashSet::new();
    for task in report.corpus().iter() {
        assert!(ids.insert(task.task_id().to_string()), "{}", task.task_id());
        assert!(
            prompts.insert((task.category(), task.difficulty(), task.prompt().to_string())),
            "duplicate prompt in {}",
            task.task_id()
        );
    }
}

#[test]
fn sequence_answers_walk_the_grid() {
    let config = full_matrix(6).with_categories(vec![Category::NavigationPathfinding]);
    let report = CorpusAssembler::new(config).run().unwrap();

    let mut checked = 0;
    for task in report.corpus().with_answer_type(AnswerType::Sequence) {
        let Scenario::NavigationPathfinding(nav) = task.scenario() else {
            panic!("sequence answer outside navigation: {}", task.task_id());
        };
        let route = nav.route();
        let path = task.ground_truth().as_sequence().unwrap();
        assert!(route.grid().is_valid_path(path, route.start_pos, route.end_pos));
        checked += 1;
    }
    assert_eq!(checked, 12, "medium and hard navigation tasks return paths");
}

#[test]
fn parallel_and_sequential_runs_are_identical() {
    let parallel = CorpusAssembler::new(full_matrix(2).with_parallel(true))
        .run()
        .unwrap();
    let sequential = CorpusAssembler::new(full_matrix(2).with_parallel(false))
        .run()
        .unwrap();
    assert_eq!(parallel.corpus(), sequential.corpus());
}

#[test]
fn reverification_reproduces_every_answer() {
    let report = CorpusAssembler::new(full_matrix(4).with_reverify(false))
        .run()
        .unwrap();
    let check = report.corpus().reverify();
    assert_eq!(check.checked, 12 * 3 * 4);
    assert!(check.is_clean(), "{check:?}");
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn written_corpus_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let report = CorpusAssembler::new(full_matrix(2)).run().unwrap();
    write_corpus(
        dir.path(),
        report.corpus(),
        &report.summary(),
        OutputFormat::JsonArray,
    )
    .unwrap();

    assert!(dir.path().join(SUMMARY_FILE).is_file());
    for &category in Category::all() {
        for &tier in Difficulty::all() {
            let file = dir
                .path()
                .join(category.name())
                .join(tier.name())
                .join("tasks.json");
            assert!(file.is_file(), "{}", file.display());
        }
    }

    let loaded = load_corpus(dir.path()).unwrap();
    assert_eq!(&loaded, report.corpus());
    assert!(loaded.reverify().is_clean());

    let summary = load_summary(dir.path()).unwrap();
    assert_eq!(summary.total_tasks, 72);
    assert!(summary.failed_cells.is_empty());
}

#[test]
fn stored_json_follows_the_field_contract() {
    let dir = TempDir::new().unwrap();
    let report = CorpusAssembler::new(
        full_matrix(1)
            .with_categories(vec![Category::TopologicalReasoning])
            .with_tiers(vec![Difficulty::Hard]),
    )
    .run()
    .unwrap();
    write_corpus(dir.path(), report.corpus(), &report.summary(), OutputFormat::JsonArray).unwrap();

    let text = std::fs::read_to_string(
        dir.path()
            .join("topological_reasoning")
            .join("hard")
            .join("tasks.json"),
    )
    .unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    let task = &json[0];
    for field in ["task_id", "category", "difficulty", "prompt", "ground_truth", "answer_type", "metadata"] {
        assert!(task.get(field).is_some(), "missing {field}");
    }
    assert_eq!(task["task_id"], "TR-hard-0000");
    assert_eq!(task["category"], "topological_reasoning");
    assert_eq!(task["difficulty"], "hard");
    assert_eq!(task["answer_type"], "boolean");
    assert!(task["ground_truth"].is_boolean());
    assert_eq!(task["metadata"]["kind"], "region_connectivity");
}

#[test]
fn json_lines_and_filters() {
    let dir = TempDir::new().unwrap();
    let report = CorpusAssembler::new(full_matrix(2)).run().unwrap();
    write_corpus(dir.path(), report.corpus(), &report.summary(), OutputFormat::JsonLines).unwrap();

    let foundational =
        load_dataset(dir.path(), &DatasetFilter::new().with_family(Family::Foundational)).unwrap();
    assert_eq!(foundational.task_count(), 4 * 3 * 2);
    assert!(foundational
        .iter()
        .all(|t| t.category().family() == Family::Foundational));

    let hard_network = load_dataset(
        dir.path(),
        &DatasetFilter::new()
            .with_category(Category::NetworkInfrastructure)
            .with_difficulty(Difficulty::Hard),
    )
    .unwrap();
    let ids: Vec<&str> = hard_network.iter().map(Task::task_id).collect();
    assert_eq!(ids, vec!["NI-hard-0000", "NI-hard-0001"]);
}

#[test]
fn checkpointed_cells_survive_without_final_write() {
    let dir = TempDir::new().unwrap();
    let config = full_matrix(2)
        .with_categories(vec![Category::ViewpointVisibility, Category::PatternRecognition])
        .with_checkpoint_dir(dir.path())
        .with_output_format(OutputFormat::JsonLines);
    let report = CorpusAssembler::new(config).run().unwrap();

    assert!(dir
        .path()
        .join("viewpoint_visibility/hard/tasks.jsonl")
        .is_file());
    let loaded = load_corpus(dir.path()).unwrap();
    assert_eq!(&loaded, report.corpus());
}
