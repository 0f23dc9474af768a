//! Reference scenarios with hand-checked answers.

use spatial_eval::categories::allocation::{optimal_sites, service_distance, AllocationScenario};
use spatial_eval::categories::coordinate::CoordinateScenario;
use spatial_eval::categories::distance::DistanceScenario;
use spatial_eval::categories::navigation::{GridRoute, NavigationScenario};
use spatial_eval::categories::network::NetworkScenario;
use spatial_eval::geometry::{DistanceMetric, Point};
use spatial_eval::graph::{Cell, Graph, SearchAlgorithm};
use spatial_eval::prelude::*;

fn ring_with_tail() -> Vec<(u32, u32)> {
    vec![(1, 2), (2, 3), (3, 4), (4, 1), (3, 5), (5, 6), (6, 7)]
}

#[test]
fn quadrant_of_three_minus_four_is_iv() {
    let scenario = Scenario::CoordinateUnderstanding(CoordinateScenario::QuadrantIdentification {
        point: Point::new(3.0, -4.0),
    });
    assert_eq!(scenario.kind(), "quadrant_identification");
    assert_eq!(scenario.answer_type(), AnswerType::Exact);
    assert_eq!(scenario.solve().unwrap(), GroundTruth::Exact("IV".to_string()));
}

#[test]
fn four_by_four_grid_path() {
    let route = GridRoute {
        grid_size: 4,
        obstacles: vec![Cell::new(0, 2), Cell::new(1, 1), Cell::new(3, 2)],
        start_pos: Cell::new(0, 0),
        end_pos: Cell::new(3, 3),
        algorithm: SearchAlgorithm::AStar,
    };
    let grid = route.grid();
    let scenario = Scenario::NavigationPathfinding(NavigationScenario::ShortestPath(route.clone()));

    let truth = scenario.solve().unwrap();
    let path = truth.as_sequence().unwrap();
    assert_eq!(path.len(), 7);
    assert_eq!(path.first(), Some(&route.start_pos));
    assert_eq!(path.last(), Some(&route.end_pos));
    assert!(path.iter().all(|c| !route.obstacles.contains(c)));
    assert!(path.windows(2).all(|w| w[0].is_adjacent(w[1])));
    assert!(grid.is_valid_path(path, route.start_pos, route.end_pos));

    let length = Scenario::NavigationPathfinding(NavigationScenario::ShortestPathLength(route));
    assert_eq!(length.solve().unwrap(), GroundTruth::Numerical(6.0));
}

#[test]
fn manhattan_distance_one_one_to_five_four() {
    let scenario = Scenario::DistanceComputation(DistanceScenario::PairwiseDistance {
        from: Point::new(1.0, 1.0),
        to: Point::new(5.0, 4.0),
        metric: DistanceMetric::Manhattan,
    });
    assert_eq!(scenario.solve().unwrap(), GroundTruth::Numerical(7.0));

    let euclidean = Scenario::DistanceComputation(DistanceScenario::PairwiseDistance {
        from: Point::new(1.0, 1.0),
        to: Point::new(5.0, 4.0),
        metric: DistanceMetric::Euclidean,
    });
    assert_eq!(euclidean.solve().unwrap(), GroundTruth::Numerical(5.0));
}

#[test]
fn removing_link_three_five_matches_fresh_reachability() {
    let links = ring_with_tail();
    let scenario = Scenario::NetworkInfrastructure(NetworkScenario::LinkFailure {
        node_count: 7,
        links: links.clone(),
        failed_links: vec![(3, 5)],
        source: 1,
        target: 7,
    });

    let reduced: Vec<(usize, usize)> = links
        .iter()
        .filter(|&&l| l != (3, 5))
        .map(|&(a, b)| (a as usize - 1, b as usize - 1))
        .collect();
    let fresh = Graph::with_nodes(7, &reduced, false).is_reachable(0, 6);

    assert!(!fresh);
    assert_eq!(scenario.solve().unwrap(), GroundTruth::Boolean(fresh));

    let intact = Scenario::NetworkInfrastructure(NetworkScenario::Connectivity {
        node_count: 7,
        links,
        source: 1,
        target: 7,
    });
    assert_eq!(intact.solve().unwrap(), GroundTruth::Boolean(true));
}

#[test]
fn asserted_full_coverage_is_real() {
    let candidates = vec![
        Point::new(2.0, 2.0),
        Point::new(8.0, 2.0),
        Point::new(5.0, 8.0),
        Point::new(9.0, 9.0),
    ];
    let demand = vec![
        Point::new(1.0, 1.0),
        Point::new(3.0, 3.0),
        Point::new(8.0, 1.0),
        Point::new(9.0, 3.0),
        Point::new(5.0, 9.0),
    ];
    let radius = 3.0;
    let scenario = Scenario::ResourceAllocation(AllocationScenario::FacilityLocation {
        candidates: candidates.clone(),
        demand: demand.clone(),
        facilities: 3,
        coverage_radius: radius,
    });

    let truth = scenario.solve().unwrap();
    let (chosen, cost) = optimal_sites(&candidates, &demand, 3).unwrap();
    let sites: Vec<Point> = chosen.iter().map(|&i| candidates[i]).collect();
    for d in &demand {
        let nearest = sites
            .iter()
            .map(|s| s.distance_to(*d))
            .fold(f64::INFINITY, f64::min);
        assert!(nearest <= radius, "{d} is {nearest} from its nearest site");
    }
    assert_eq!(service_distance(&sites, &demand), cost);
    assert!(truth.matches(&GroundTruth::Numerical(cost)));

    // two sites cannot cover all three clusters
    let infeasible = Scenario::ResourceAllocation(AllocationScenario::FacilityLocation {
        candidates,
        demand,
        facilities: 2,
        coverage_radius: radius,
    });
    assert!(infeasible.solve().unwrap_err().is_redraw());
}
