// =========================================================================
// FALSIFY-VA: admission contract for the uniqueness registry
//
// Assembly trusts the registry to keep ids and prompts unique inside a
// cell and to leave tasks untouched, so these properties are pinned here.
// =========================================================================

use super::*;

fn generated(category: Category, tier: Difficulty, count: usize) -> Vec<Task> {
    (0..count)
        .filter_map(|i| category.generate(tier, i, 1_000 + i as u64).ok())
        .collect()
}

/// FALSIFY-VA-001: admitting a task never changes it
#[test]
fn falsify_va_001_validation_does_not_mutate() {
    let validator = TaskValidator::new();
    let mut registry = UniquenessRegistry::new();
    for task in generated(Category::ViewpointVisibility, Difficulty::Hard, 5) {
        let before = task.clone();
        let _ = validator.admit(&task, &mut registry);
        assert_eq!(task, before, "FALSIFIED VA-001: {} changed", task.task_id());
    }
}

/// FALSIFY-VA-002: after admission no two recorded tasks share an id or a
/// prompt within their cell
#[test]
fn falsify_va_002_admitted_set_is_unique() {
    let validator = TaskValidator::new().with_reverify(false);
    let mut registry = UniquenessRegistry::new();
    let mut tasks = generated(Category::CoordinateUnderstanding, Difficulty::Easy, 40);
    let resubmitted = tasks.clone();
    tasks.extend(resubmitted);

    let admitted: Vec<&Task> = tasks
        .iter()
        .filter(|t| validator.admit(t, &mut registry).is_accepted())
        .collect();

    let mut ids = HashSet::new();
    let mut prompts = HashSet::new();
    for task in &admitted {
        assert!(
            ids.insert(task.task_id()),
            "FALSIFIED VA-002: id {} admitted twice",
            task.task_id()
        );
        assert!(
            prompts.insert(task.prompt()),
            "FALSIFIED VA-002: prompt of {} admitted twice",
            task.task_id()
        );
    }
    assert_eq!(
        registry.len(),
        admitted.len(),
        "FALSIFIED VA-002: registry holds {} ids for {} admitted tasks",
        registry.len(),
        admitted.len()
    );
}

/// FALSIFY-VA-003: a rejected task leaves the registry unchanged
#[test]
fn falsify_va_003_rejection_is_not_recorded() {
    let validator = TaskValidator::new();
    let mut registry = UniquenessRegistry::new();
    let tasks = generated(Category::DistanceComputation, Difficulty::Medium, 3);
    let first = &tasks[0];

    assert!(validator.admit(first, &mut registry).is_accepted());
    let verdict = validator.admit(first, &mut registry);
    assert_eq!(
        verdict.rejection_reason(),
        Some(&RejectionReason::DuplicateTaskId),
        "FALSIFIED VA-003: resubmission verdict {verdict}"
    );
    assert_eq!(registry.len(), 1, "FALSIFIED VA-003: rejection was recorded");
}

/// FALSIFY-VA-004: merging disjoint cell registries reports no clashes
#[test]
fn falsify_va_004_disjoint_cells_merge_cleanly() {
    let validator = TaskValidator::new().with_reverify(false);
    let mut merged = UniquenessRegistry::new();
    for &tier in Difficulty::all() {
        let mut cell = UniquenessRegistry::new();
        for task in generated(Category::PatternRecognition, tier, 6) {
            let _ = validator.admit(&task, &mut cell);
        }
        let clashes = merged.merge(cell);
        assert!(
            clashes.is_empty(),
            "FALSIFIED VA-004: {tier} clashed on {clashes:?}"
        );
    }
}
