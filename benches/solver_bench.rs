//! Criterion benchmarks for u-csp solvers.
//!
//! Compares the four solvers on the bundled four-variable scenario and on
//! seeded random instances of growing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_csp::model::VcSet;
use u_csp::solver::{
    BacktrackSolver, GenerateTestSolver, NetworkBacktrackSolver, NetworkGenerateTestSolver,
    Solution, Solver, SolverConfig,
};

// ===========================================================================
// Instances
// ===========================================================================

fn scenario() -> VcSet {
    let mut set = VcSet::new();
    for (id, value) in [("A", 1i64), ("B", 3), ("C", 2), ("D", 0)] {
        set.add_bounded_variable(id, value, 0, 5, 1).unwrap();
    }
    set.add_constraint("c0", "A*B=12", &["A", "B"], |s, ids| {
        Ok(s.value::<i64>(&ids[0])? * s.value::<i64>(&ids[1])? == 12)
    })
    .unwrap();
    set.add_constraint("c1", "B+C<5", &["B", "C"], |s, ids| {
        Ok(s.value::<i64>(&ids[0])? + s.value::<i64>(&ids[1])? < 5)
    })
    .unwrap();
    set.add_constraint("c2", "A-D=2", &["A", "D"], |s, ids| {
        Ok(s.value::<i64>(&ids[0])? - s.value::<i64>(&ids[1])? == 2)
    })
    .unwrap();
    set.add_constraint("c3", "A*C=4", &["A", "C"], |s, ids| {
        Ok(s.value::<i64>(&ids[0])? * s.value::<i64>(&ids[1])? == 4)
    })
    .unwrap();
    set
}

/// A chain `v0 < v1 + d0`, `v1 < v2 + d1`, ... over random ranges.
fn random_chain(n: usize, seed: u64) -> VcSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut set = VcSet::new();
    for i in 0..n {
        let low = rng.random_range(0..3i64);
        let high = low + rng.random_range(2..5i64);
        set.add_bounded_variable(format!("v{i}"), low, low, high, 1).unwrap();
    }
    for i in 0..n - 1 {
        let slack = rng.random_range(-1..2i64);
        let (a, b) = (format!("v{i}"), format!("v{}", i + 1));
        set.add_constraint(
            format!("c{i}"),
            format!("{a}<{b}+{slack}"),
            &[a.as_str(), b.as_str()],
            move |s, ids| Ok(s.value::<i64>(&ids[0])? < s.value::<i64>(&ids[1])? + slack),
        )
        .unwrap();
    }
    set
}

fn run(solver: &mut dyn Solver, set: &mut VcSet) -> usize {
    let mut solution = Solution::new();
    solver.solve(set, &mut solution).unwrap();
    solution.len()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_scenario(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario");
    let mut set = scenario();

    group.bench_function("generate_test", |b| {
        b.iter(|| black_box(run(&mut GenerateTestSolver::new(), &mut set)))
    });
    group.bench_function("backtrack", |b| {
        b.iter(|| black_box(run(&mut BacktrackSolver::new(), &mut set)))
    });
    group.bench_function("network_generate_test", |b| {
        b.iter(|| black_box(run(&mut NetworkGenerateTestSolver::new(), &mut set)))
    });
    group.bench_function("network_backtrack", |b| {
        b.iter(|| black_box(run(&mut NetworkBacktrackSolver::new(), &mut set)))
    });
    group.finish();
}

fn bench_random_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_chain");
    group.sample_size(10);

    for &n in &[4, 6, 8] {
        let mut set = random_chain(n, 42);
        group.bench_with_input(BenchmarkId::new("generate_test", n), &n, |b, _| {
            b.iter(|| black_box(run(&mut GenerateTestSolver::new(), &mut set)))
        });
        group.bench_with_input(BenchmarkId::new("backtrack_all", n), &n, |b, _| {
            b.iter(|| {
                let mut solver = BacktrackSolver::with_config(SolverConfig::exhaustive());
                black_box(run(&mut solver, &mut set))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scenario, bench_random_chain);
criterion_main!(benches);
