use super::*;
use crate::seed::task_seed;

fn generate(category: Category, tier: Difficulty, index: usize) -> Task {
    let seed = task_seed(42, category, tier, index, 0);
    generate_task(category, tier, index, seed, DEFAULT_MAX_ATTEMPTS)
        .unwrap_or_else(|e| panic!("{category}/{tier}#{index}: {e}"))
}

#[test]
fn test_every_cell_generates_consistent_tasks() {
    for &category in Category::all() {
        for &tier in Difficulty::all() {
            for index in 0..5 {
                let task = generate(category, tier, index);
                assert_eq!(task.category(), category);
                assert_eq!(task.difficulty(), tier);
                assert_eq!(task.ground_truth().answer_type(), task.answer_type());
                assert!(!task.prompt().trim().is_empty());
                assert!(task.ground_truth().is_finite());
                assert_eq!(task.scenario().check_bounds(), Ok(()), "{}", task.task_id());
                assert!(task.reverify().unwrap(), "{}", task.task_id());
            }
        }
    }
}

#[test]
fn test_generation_is_deterministic() {
    for &category in Category::all() {
        let a = generate(category, Difficulty::Hard, 3);
        let b = generate(category, Difficulty::Hard, 3);
        assert_eq!(a, b);
    }
}

#[test]
fn test_different_seeds_vary_prompts() {
    let category = Category::NavigationPathfinding;
    let prompts: std::collections::HashSet<String> = (0..10)
        .map(|i| generate(category, Difficulty::Medium, i).prompt().to_string())
        .collect();
    assert!(prompts.len() > 5);
}

#[test]
fn test_prompt_is_rendered_from_scenario() {
    let task = generate(Category::DistanceComputation, Difficulty::Easy, 0);
    assert_eq!(task.prompt(), task.scenario().prompt());
}

#[test]
fn test_tier_kinds() {
    let kind = |c, t| generate(c, t, 0).scenario().kind();
    assert_eq!(
        kind(Category::CoordinateUnderstanding, Difficulty::Easy),
        "quadrant_identification"
    );
    assert_eq!(kind(Category::CoordinateUnderstanding, Difficulty::Hard), "rotation");
    assert_eq!(kind(Category::GeometricReasoning, Difficulty::Hard), "polygon_area");
    assert_eq!(
        kind(Category::NavigationPathfinding, Difficulty::Easy),
        "shortest_path_length"
    );
    assert_eq!(kind(Category::PatternRecognition, Difficulty::Hard), "cluster_count");
}

#[test]
fn test_zero_attempts_is_generation_failure() {
    let err = generate_task(Category::CoordinateUnderstanding, Difficulty::Easy, 0, 1, 0)
        .unwrap_err();
    assert!(matches!(err, SpatialError::GenerationFailure { attempts: 0, .. }));
    assert!(!err.is_redraw());
}

#[test]
fn test_category_generate_uses_default_attempts() {
    let task = Category::TemporalSpatialReasoning
        .generate(Difficulty::Medium, 9, 1234)
        .unwrap();
    assert_eq!(task.task_id(), "TSR-medium-0009");
}

#[test]
fn test_letter_labels() {
    assert_eq!(letter_labels(3), vec!["A", "B", "C"]);
    assert_eq!(letter_labels(28)[26], "A1");
}

#[test]
fn test_count_in_collapses_inverted_range() {
    let mut rng = TaskRng::seed_from_u64(1);
    assert_eq!(count_in(&mut rng, 5, 3), 3);
    for _ in 0..20 {
        assert!((2..=4).contains(&count_in(&mut rng, 2, 4)));
    }
}

#[test]
fn test_distinct_points_are_distinct() {
    let mut rng = TaskRng::seed_from_u64(6);
    let pts = distinct_points(&mut rng, 9, 0, 2).unwrap();
    for (i, p) in pts.iter().enumerate() {
        assert!(!pts[..i].contains(p));
    }
    assert!(distinct_points(&mut rng, 10, 0, 2).is_err());
}

#[test]
fn test_check_point_bounds() {
    assert!(check_point(Point::new(1000.0, -1000.0), "p").is_ok());
    assert!(check_point(Point::new(1000.5, 0.0), "p").is_err());
    assert!(check_point(Point::new(f64::NAN, 0.0), "p").is_err());
    assert!(check_positive(0.0, "r").is_err());
}
