//! Benchmarks for task generation and corpus assembly.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spatial_eval::graph::{find_path, Cell, Grid, SearchAlgorithm};
use spatial_eval::prelude::*;

fn bench_generate_task(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_task");

    for &category in Category::all() {
        group.bench_with_input(BenchmarkId::from_parameter(category.code()), &category, |b, &category| {
            let mut index = 0usize;
            b.iter(|| {
                index += 1;
                category.generate(black_box(Difficulty::Hard), index, black_box(index as u64))
            });
        });
    }

    group.finish();
}

fn bench_grid_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_search");

    for size in [8usize, 16, 32].iter() {
        // Diagonal wall with a gap at the far edge
        let obstacles: Vec<Cell> = (1..*size - 1).map(|i| Cell::new(i, *size - 1 - i)).collect();
        let grid = Grid::new(*size, &obstacles);
        let end = Cell::new(*size - 1, *size - 1);

        for &algorithm in SearchAlgorithm::all() {
            group.bench_with_input(
                BenchmarkId::new(format!("{algorithm:?}"), size),
                size,
                |b, _| b.iter(|| find_path(black_box(&grid), Cell::new(0, 0), end, algorithm)),
            );
        }
    }

    group.finish();
}

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");
    group.sample_size(10);

    for per_cell in [2usize, 8].iter() {
        let config = AssemblyConfig::default().with_tasks_per_cell(*per_cell);
        group.bench_with_input(BenchmarkId::from_parameter(per_cell), per_cell, |b, _| {
            b.iter(|| CorpusAssembler::new(config.clone()).run().unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate_task, bench_grid_search, bench_assembly);
criterion_main!(benches);
