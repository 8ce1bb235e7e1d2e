#![allow(non_snake_case)]

use conix::{algebra::*, solver::*};

#[test]
fn test_mixed_conic_feasible() {
    // solves a problem with a mix of symmetric and asymmetric
    // cones.   This exercises the barrier methods and unit
    // initializations of the symmetric cones

    let n = 3;
    let P = CscMatrix::<f64>::identity(3);
    let c = vec![1., 1., 1.];

    // put a 3 dimensional vector into the composition of multiple
    // cones, all with b = 0 on the RHS
    let cones = vec![
        ZeroConeT(3),
        NonnegativeConeT(3),
        SecondOrderConeT(3),
        PowerConeT(0.5),
        ExponentialConeT(),
    ];

    // A = 5 stacked copies of I
    let A = CscMatrix::new(
        5 * n,
        n,
        vec![0, 5, 10, 15],
        vec![0, 3, 6, 9, 12, 1, 4, 7, 10, 13, 2, 5, 8, 11, 14],
        vec![1.; 15],
    );

    let b = vec![0.; 5 * n];

    let settings = DefaultSettings::default();
    let mut solver = DefaultSolver::new(&P, &c, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!(f64::abs(solver.info.cost_primal - 0.) <= 1e-8);
}
