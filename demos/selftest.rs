//! Self-test: solves A*B=12, B+C<5, A-D=2, A*C=4 over 0..=5 with every
//! solver and prints the outcome.
//!
//! Run with `cargo run --example selftest`.

use u_csp::model::VcSet;
use u_csp::network::BinaryNetwork;
use u_csp::solver::{
    BacktrackSolver, GenerateTestSolver, NetworkBacktrackSolver, NetworkGenerateTestSolver,
    Solution, Solver,
};

fn build() -> u_csp::Result<VcSet> {
    let mut set = VcSet::new();
    set.add_bounded_variable("A", 1i64, 0, 5, 1)?;
    set.add_bounded_variable("B", 3i64, 0, 5, 1)?;
    set.add_bounded_variable("C", 2i64, 0, 5, 1)?;
    set.add_bounded_variable("D", 0i64, 0, 5, 1)?;

    set.add_constraint("c0", "A*B=12", &["A", "B"], |s, ids| {
        Ok(s.value::<i64>(&ids[0])? * s.value::<i64>(&ids[1])? == 12)
    })?;
    set.add_constraint("c1", "B+C<5", &["B", "C"], |s, ids| {
        Ok(s.value::<i64>(&ids[0])? + s.value::<i64>(&ids[1])? < 5)
    })?;
    set.add_constraint("c2", "A-D=2", &["A", "D"], |s, ids| {
        Ok(s.value::<i64>(&ids[0])? - s.value::<i64>(&ids[1])? == 2)
    })?;
    set.add_constraint("c3", "A*C=4", &["A", "C"], |s, ids| {
        Ok(s.value::<i64>(&ids[0])? * s.value::<i64>(&ids[1])? == 4)
    })?;
    Ok(set)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut set = build()?;
    println!("{set}");
    println!("initial check: {}", set.check()?);

    let network = BinaryNetwork::build(&set);
    println!("{}", network.display(&set));

    let mut solvers: Vec<(&str, Box<dyn Solver>)> = vec![
        ("generate-and-test", Box::new(GenerateTestSolver::new())),
        ("backtracking", Box::new(BacktrackSolver::new())),
        ("network generate-and-test", Box::new(NetworkGenerateTestSolver::new())),
        ("network backtracking", Box::new(NetworkBacktrackSolver::new())),
    ];
    for (name, solver) in &mut solvers {
        let mut solution = Solution::new();
        let found = solver.solve(&mut set, &mut solution)?;
        println!(
            "{name}: found = {found}, checks = {}, solutions = {}",
            solver.num_checks(),
            solver.num_solutions()
        );
        print!("{solution}");
    }

    println!("after solving: {}", set.check()?);
    Ok(())
}
