// =========================================================================
// FALSIFY-GS: search contract for graph and grid routing
//
// Every routed answer in the corpus comes from these searches, so the
// contract pins optimality, determinism and failure semantics.
// =========================================================================

use super::*;

/// FALSIFY-GS-001: Dijkstra finds the cheaper multi-hop route
#[test]
fn falsify_gs_001_dijkstra_shortest_path() {
    let g = Graph::from_weighted_edges(&[(0, 1, 1.0), (1, 2, 2.0), (0, 2, 5.0)], false);
    let (path, dist) = g.dijkstra(0, 2).expect("path should exist");

    assert_eq!(
        path,
        vec![0, 1, 2],
        "FALSIFIED GS-001: path={path:?}, expected [0, 1, 2]"
    );
    assert!(
        (dist - 3.0).abs() < 1e-9,
        "FALSIFIED GS-001: distance={dist}, expected 3.0"
    );
}

/// FALSIFY-GS-002: unreachable target yields None, never a partial path
#[test]
fn falsify_gs_002_unreachable() {
    let g = Graph::with_weighted_nodes(3, &[(0, 1, 1.0)], false);
    let result = g.dijkstra(0, 2);
    assert!(
        result.is_none(),
        "FALSIFIED GS-002: expected None for unreachable node, got {result:?}"
    );
}

/// FALSIFY-GS-003: A* with Manhattan heuristic is optimal on grids
#[test]
fn falsify_gs_003_grid_a_star_optimal() {
    let obstacles: Vec<Cell> = (0..7).map(|r| Cell::new(r, 3)).collect();
    let grid = Grid::new(8, &obstacles);
    let start = Cell::new(0, 0);
    let end = Cell::new(0, 7);

    let a = find_path(&grid, start, end, SearchAlgorithm::AStar).expect("gap at row 7");
    let b = find_path(&grid, start, end, SearchAlgorithm::Bfs).expect("gap at row 7");

    assert_eq!(
        a.cost, b.cost,
        "FALSIFIED GS-003: A* cost {} != BFS cost {}",
        a.cost, b.cost
    );
    assert_eq!(a.cost, 21, "FALSIFIED GS-003: detour cost {}", a.cost);
    assert!(grid.is_valid_path(&a.cells, start, end));
}

/// FALSIFY-GS-004: repeated searches return the identical path
#[test]
fn falsify_gs_004_deterministic_tie_break() {
    let grid = Grid::new(5, &[Cell::new(2, 2)]);
    let start = Cell::new(0, 0);
    let end = Cell::new(4, 4);
    for &alg in SearchAlgorithm::all() {
        let first = find_path(&grid, start, end, alg).expect("open grid");
        for _ in 0..5 {
            let again = find_path(&grid, start, end, alg).expect("open grid");
            assert_eq!(
                first, again,
                "FALSIFIED GS-004: {alg:?} produced different paths"
            );
        }
    }
}

/// FALSIFY-GS-005: removing a bridge edge disconnects exactly its sides
#[test]
fn falsify_gs_005_bridge_removal() {
    let g = Graph::from_edges(&[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)], false);
    let cut = g.without_edges(&[(2, 3)]);
    let reach = cut.reachable_from(0);
    assert_eq!(
        reach,
        vec![true, true, true, false, false],
        "FALSIFIED GS-005: reach={reach:?}"
    );
}
