use super::store::{cell_dir, read_tasks, write_cell, SUMMARY_FILE};
use super::*;
use tempfile::TempDir;

fn sample_corpus() -> Corpus {
    let cells = [
        (Category::CoordinateUnderstanding, Difficulty::Easy),
        (Category::NavigationPathfinding, Difficulty::Medium),
        (Category::ResourceAllocation, Difficulty::Hard),
    ];
    cells
        .iter()
        .flat_map(|&(category, tier)| {
            (0..3).map(move |i| category.generate(tier, i, 42 + i as u64).unwrap())
        })
        .collect()
}

fn tampered(task: &Task, truth: serde_json::Value) -> Task {
    let mut value = serde_json::to_value(task).unwrap();
    value["ground_truth"] = truth;
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_summary_counts() {
    let corpus = sample_corpus();
    let summary = corpus.summary();

    assert_eq!(summary.total_tasks, 9);
    assert_eq!(summary.by_category[&Category::NavigationPathfinding], 3);
    assert_eq!(summary.by_difficulty[&Difficulty::Hard], 3);
    assert_eq!(summary.by_family[&Family::Foundational], 3);
    assert_eq!(summary.by_family[&Family::CorePlanning], 3);
    assert_eq!(summary.by_family[&Family::Advanced], 3);
    assert_eq!(
        summary.cell_count(Category::CoordinateUnderstanding, Difficulty::Easy),
        3
    );
    assert_eq!(
        summary.cell_count(Category::CoordinateUnderstanding, Difficulty::Hard),
        0
    );
    assert_eq!(summary.by_answer_type.values().sum::<usize>(), 9);
    assert!(summary.is_complete());
}

#[test]
fn test_summary_json_uses_names() {
    let summary = CorpusSummary::from_tasks(
        sample_corpus().tasks(),
        vec![CellShortfall {
            category: Category::ResourceAllocation,
            difficulty: Difficulty::Hard,
            accepted: 3,
            target: 5,
        }],
    );
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["total_tasks"], 9);
    assert_eq!(json["by_cell"]["navigation_pathfinding"]["medium"], 3);
    assert_eq!(json["failed_cells"][0]["category"], "resource_allocation");
    assert!(!summary.is_complete());

    let back: CorpusSummary = serde_json::from_value(json).unwrap();
    assert_eq!(back, summary);
}

#[test]
fn test_shortfall_missing_and_display() {
    let s = CellShortfall {
        category: Category::PatternRecognition,
        difficulty: Difficulty::Medium,
        accepted: 7,
        target: 10,
    };
    assert_eq!(s.missing(), 3);
    assert_eq!(s.to_string(), "pattern_recognition/medium: 7/10");
}

#[test]
fn test_reverify_clean_corpus() {
    let report = sample_corpus().reverify();
    assert_eq!(report.checked, 9);
    assert!(report.is_clean(), "{report:?}");
    assert!(report.tolerance_mismatches.is_empty());
}

#[test]
fn test_reverify_flags_tampered_answers() {
    let mut tasks = sample_corpus().into_tasks();
    let exact_id = tasks[0].task_id().to_string();
    tasks[0] = tampered(&tasks[0], serde_json::json!("not a quadrant"));

    let numeric = Category::DistanceComputation
        .generate(Difficulty::Easy, 0, 1)
        .unwrap();
    let value = numeric.ground_truth().as_f64().unwrap();
    // off by far less than the tolerance
    tasks.push(tampered(&numeric, serde_json::json!(value + 0.001)));

    let report = Corpus::new(tasks).reverify();
    assert!(!report.is_clean());
    assert_eq!(report.exact_mismatches.len(), 2);
    assert_eq!(report.tolerance_mismatches, vec![exact_id]);
}

#[test]
fn test_cell_and_find() {
    let corpus = sample_corpus();
    let ids: Vec<&str> = corpus
        .cell(Category::NavigationPathfinding, Difficulty::Medium)
        .map(Task::task_id)
        .collect();
    assert_eq!(ids, vec!["NP-medium-0000", "NP-medium-0001", "NP-medium-0002"]);
    assert!(corpus.find("RAO-hard-0002").is_some());
    assert!(corpus.find("RAO-hard-0003").is_none());
}

#[test]
fn test_write_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let corpus = sample_corpus();
    write_corpus(dir.path(), &corpus, &corpus.summary(), OutputFormat::JsonArray).unwrap();

    assert!(dir.path().join(SUMMARY_FILE).is_file());
    assert!(dir
        .path()
        .join("navigation_pathfinding/medium/tasks.json")
        .is_file());

    let loaded = load_corpus(dir.path()).unwrap();
    assert_eq!(loaded, corpus);
    assert_eq!(load_summary(dir.path()).unwrap(), corpus.summary());
}

#[test]
fn test_json_lines_round_trip() {
    let dir = TempDir::new().unwrap();
    let corpus = sample_corpus();
    let tasks: Vec<Task> = corpus
        .cell(Category::ResourceAllocation, Difficulty::Hard)
        .cloned()
        .collect();
    let path = write_cell(
        dir.path(),
        Category::ResourceAllocation,
        Difficulty::Hard,
        &tasks,
        OutputFormat::JsonLines,
    )
    .unwrap();

    assert!(path.ends_with("resource_allocation/hard/tasks.jsonl"));
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert_eq!(read_tasks(&path).unwrap(), tasks);
    assert_eq!(load_corpus(dir.path()).unwrap().tasks(), tasks.as_slice());
}

#[test]
fn test_filtered_load() {
    let dir = TempDir::new().unwrap();
    let corpus = sample_corpus();
    write_corpus(dir.path(), &corpus, &corpus.summary(), OutputFormat::JsonArray).unwrap();

    let advanced = load_dataset(dir.path(), &DatasetFilter::new().with_family(Family::Advanced)).unwrap();
    assert_eq!(advanced.task_count(), 3);
    assert!(advanced
        .iter()
        .all(|t| t.category() == Category::ResourceAllocation));

    let filter = DatasetFilter::new()
        .with_category(Category::CoordinateUnderstanding)
        .with_difficulty(Difficulty::Hard);
    assert!(load_dataset(dir.path(), &filter).unwrap().is_empty());
}

#[test]
fn test_filter_matching() {
    let filter = DatasetFilter::new()
        .with_family(Family::CorePlanning)
        .with_difficulty(Difficulty::Easy);
    assert!(filter.matches(Category::NetworkInfrastructure, Difficulty::Easy));
    assert!(!filter.matches(Category::NetworkInfrastructure, Difficulty::Medium));
    assert!(!filter.matches(Category::GeometricReasoning, Difficulty::Easy));
    assert!(DatasetFilter::new().matches(Category::RealEstateGeospatial, Difficulty::Hard));
}

#[test]
fn test_load_missing_root_is_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        load_corpus(&missing),
        Err(crate::error::SpatialError::InvalidParameter { .. })
    ));
    assert!(matches!(
        load_summary(dir.path()),
        Err(crate::error::SpatialError::Io(_))
    ));
}

#[test]
fn test_cell_dir_layout() {
    let root = std::path::Path::new("/data");
    assert_eq!(
        cell_dir(root, Category::ViewpointVisibility, Difficulty::Medium),
        std::path::PathBuf::from("/data/viewpoint_visibility/medium")
    );
}
