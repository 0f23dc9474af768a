use super::*;
use crate::categories::coordinate::CoordinateScenario;
use crate::categories::distance::DistanceScenario;
use crate::categories::navigation::{GridRoute, NavigationScenario};
use crate::geometry::{DistanceMetric, Point};
use crate::graph::{Cell, SearchAlgorithm};
use serde_json::{json, Value};

fn quadrant_task() -> Task {
    let scenario = Scenario::CoordinateUnderstanding(CoordinateScenario::QuadrantIdentification {
        point: Point::new(3.0, -4.0),
    });
    let truth = scenario.solve().unwrap();
    Task::new(
        Task::format_id(Category::CoordinateUnderstanding, Difficulty::Easy, 1),
        Difficulty::Easy,
        scenario.prompt(),
        truth,
        scenario,
    )
}

fn path_task() -> Task {
    let scenario = Scenario::NavigationPathfinding(NavigationScenario::ShortestPath(GridRoute {
        grid_size: 4,
        obstacles: vec![Cell::new(0, 2), Cell::new(1, 1), Cell::new(3, 2)],
        start_pos: Cell::new(0, 0),
        end_pos: Cell::new(3, 3),
        algorithm: SearchAlgorithm::AStar,
    }));
    let truth = scenario.solve().unwrap();
    Task::new(
        Task::format_id(Category::NavigationPathfinding, Difficulty::Medium, 0),
        Difficulty::Medium,
        scenario.prompt(),
        truth,
        scenario,
    )
}

/// Serialize, apply `edit` to the JSON, and read the task back.
fn tampered(task: &Task, edit: impl FnOnce(&mut Value)) -> Task {
    let mut value = serde_json::to_value(task).unwrap();
    edit(&mut value);
    serde_json::from_value(value).unwrap()
}

fn rejection(task: &Task) -> Option<RejectionReason> {
    TaskValidator::new().validate(task).rejection_reason().cloned()
}

#[test]
fn test_generated_tasks_are_accepted() {
    assert_eq!(rejection(&quadrant_task()), None);
    assert_eq!(rejection(&path_task()), None);
}

#[test]
fn test_malformed_id() {
    let task = tampered(&quadrant_task(), |v| v["task_id"] = json!("CU-easy-1"));
    assert_eq!(rejection(&task), Some(RejectionReason::MalformedTaskId));
}

#[test]
fn test_id_category_mismatch() {
    let task = tampered(&quadrant_task(), |v| v["task_id"] = json!("GR-easy-0001"));
    assert_eq!(rejection(&task), Some(RejectionReason::CategoryMismatch));

    let task = tampered(&quadrant_task(), |v| v["category"] = json!("geometric_reasoning"));
    assert_eq!(rejection(&task), Some(RejectionReason::CategoryMismatch));
}

#[test]
fn test_empty_prompt() {
    let task = tampered(&quadrant_task(), |v| v["prompt"] = json!("   "));
    assert_eq!(rejection(&task), Some(RejectionReason::EmptyPrompt));
}

#[test]
fn test_prompt_must_match_scenario() {
    let task = tampered(&quadrant_task(), |v| {
        v["prompt"] = json!("In which quadrant is the point (3, 4)? Answer I, II, III or IV.");
    });
    assert_eq!(rejection(&task), Some(RejectionReason::PromptMismatch));

    // scenario edited, prompt left stale
    let task = tampered(&quadrant_task(), |v| v["metadata"]["point"] = json!([-3.0, -4.0]));
    assert_eq!(rejection(&task), Some(RejectionReason::PromptMismatch));
    assert_eq!(RejectionReason::PromptMismatch.to_string(), "prompt_mismatch");
}

#[test]
fn test_oversized_scenarios_are_out_of_bounds() {
    use crate::categories::allocation::AllocationScenario;
    use crate::categories::placement::PlacementScenario;
    use crate::geometry::Rect;

    let facility = Scenario::ResourceAllocation(AllocationScenario::FacilityLocation {
        candidates: (0..200).map(|i| Point::new(f64::from(i % 20), f64::from(i / 20))).collect(),
        demand: vec![Point::new(1.0, 1.0), Point::new(5.0, 5.0)],
        facilities: 100,
        coverage_radius: 6.0,
    });
    let placement = Scenario::ConstraintBasedPlacement(PlacementScenario::PlacementFeasibility {
        room_size: 10,
        object_count: 3,
        min_separation: 3.0,
        keep_out: vec![Rect::new(1.0, 1.0, 2.0, 2.0)],
        search_budget: usize::MAX,
    });

    for (category, scenario, truth) in [
        (Category::ResourceAllocation, facility, GroundTruth::Numerical(1.0)),
        (Category::ConstraintBasedPlacement, placement, GroundTruth::Boolean(true)),
    ] {
        let task = Task::new(
            Task::format_id(category, Difficulty::Hard, 0),
            Difficulty::Hard,
            scenario.prompt(),
            truth,
            scenario,
        );
        let reason = rejection(&task).unwrap();
        assert!(
            matches!(reason, RejectionReason::ScenarioOutOfBounds(_)),
            "{}: {reason}",
            task.task_id()
        );
    }
}

#[test]
fn test_answer_type_mismatch() {
    let task = tampered(&quadrant_task(), |v| v["answer_type"] = json!("numerical"));
    assert_eq!(rejection(&task), Some(RejectionReason::AnswerTypeMismatch));

    let task = tampered(&quadrant_task(), |v| v["ground_truth"] = json!(true));
    assert_eq!(rejection(&task), Some(RejectionReason::AnswerTypeMismatch));
}

#[test]
fn test_non_finite_answer() {
    let scenario = Scenario::DistanceComputation(DistanceScenario::PairwiseDistance {
        from: Point::new(1.0, 1.0),
        to: Point::new(5.0, 4.0),
        metric: DistanceMetric::Manhattan,
    });
    let task = Task::new(
        Task::format_id(Category::DistanceComputation, Difficulty::Easy, 0),
        Difficulty::Easy,
        scenario.prompt(),
        GroundTruth::Numerical(f64::NAN),
        scenario,
    );
    assert_eq!(rejection(&task), Some(RejectionReason::NonFiniteAnswer));
}

#[test]
fn test_scenario_out_of_bounds() {
    let task = tampered(&quadrant_task(), |v| {
        v["metadata"]["point"] = json!([5000.0, -4.0]);
    });
    let reason = rejection(&task).unwrap();
    assert!(matches!(reason, RejectionReason::ScenarioOutOfBounds(_)));
    assert!(reason.to_string().starts_with("scenario_out_of_bounds: "));
}

#[test]
fn test_invalid_sequence() {
    // skip a cell: no longer a sequence of adjacent steps
    let task = tampered(&path_task(), |v| {
        v["ground_truth"].as_array_mut().unwrap().remove(1);
    });
    assert_eq!(rejection(&task), Some(RejectionReason::InvalidSequence));

    // walk through an obstacle
    let task = tampered(&path_task(), |v| {
        v["ground_truth"] = json!([[0, 0], [0, 1], [1, 1], [2, 1], [2, 2], [2, 3], [3, 3]]);
    });
    assert_eq!(rejection(&task), Some(RejectionReason::InvalidSequence));
}

#[test]
fn test_ground_truth_mismatch_only_when_reverifying() {
    let task = tampered(&quadrant_task(), |v| v["ground_truth"] = json!("I"));
    assert_eq!(rejection(&task), Some(RejectionReason::GroundTruthMismatch));

    let lenient = TaskValidator::new().with_reverify(false);
    assert!(!lenient.reverify());
    assert!(lenient.validate(&task).is_accepted());
}

#[test]
fn test_admit_rejects_duplicate_id() {
    let validator = TaskValidator::new();
    let mut registry = UniquenessRegistry::new();
    let task = quadrant_task();

    assert!(validator.admit(&task, &mut registry).is_accepted());
    assert_eq!(
        validator.admit(&task, &mut registry),
        ValidationResult::Rejected(RejectionReason::DuplicateTaskId)
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_admit_rejects_duplicate_prompt() {
    let validator = TaskValidator::new();
    let mut registry = UniquenessRegistry::new();
    let first = quadrant_task();
    let second = tampered(&first, |v| v["task_id"] = json!("CU-easy-0002"));

    assert!(validator.admit(&first, &mut registry).is_accepted());
    let result = validator.admit(&second, &mut registry);
    assert_eq!(result.rejection_reason(), Some(&RejectionReason::DuplicatePrompt));
    assert!(result.rejection_reason().unwrap().is_duplicate());
}

#[test]
fn test_prompt_uniqueness_is_scoped_to_cell() {
    let mut registry = UniquenessRegistry::new();
    let first = quadrant_task();
    registry.record(&first);

    let other_tier = tampered(&first, |v| {
        v["task_id"] = json!("CU-medium-0001");
        v["difficulty"] = json!("medium");
    });
    assert!(registry.check(&other_tier).is_accepted());
}

#[test]
fn test_rejected_task_is_not_recorded() {
    let validator = TaskValidator::new();
    let mut registry = UniquenessRegistry::new();
    let bad = tampered(&quadrant_task(), |v| v["prompt"] = json!(""));

    assert!(validator.admit(&bad, &mut registry).is_rejected());
    assert!(registry.is_empty());
}

#[test]
fn test_registry_merge_reports_clashes() {
    let mut a = UniquenessRegistry::new();
    let mut b = UniquenessRegistry::new();
    a.record(&quadrant_task());
    b.record(&quadrant_task());
    b.record(&path_task());

    let clashes = a.merge(b);
    assert_eq!(clashes, vec!["CU-easy-0001".to_string()]);
    assert_eq!(a.len(), 2);
    assert!(a.check(&path_task()).is_rejected());
}

#[test]
fn test_validate_batch_counts() {
    let tasks = vec![quadrant_task(), path_task(), quadrant_task()];
    let (accepted, rejected, reasons) = TaskValidator::new().validate_batch(&tasks);
    assert_eq!(accepted, 2);
    assert_eq!(rejected, 1);
    assert_eq!(reasons, vec![RejectionReason::DuplicateTaskId]);
}

#[test]
fn test_result_display() {
    assert_eq!(ValidationResult::Accepted.to_string(), "Accepted");
    assert_eq!(
        ValidationResult::Rejected(RejectionReason::InvalidSequence).to_string(),
        "Rejected: invalid_sequence"
    );
}

#[test]
fn test_reason_serializes_as_code() {
    let json = serde_json::to_value(RejectionReason::DuplicatePrompt).unwrap();
    assert_eq!(json, json!("duplicate_prompt"));
}
