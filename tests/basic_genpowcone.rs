#![allow(non_snake_case)]

use conix::{algebra::*, solver::*};

#[test]
fn test_genpowcone() {
    // solve the same problem as the power cone test, but with
    // each three dimensional power cone expressed as a
    // generalized power cone with two dimensional base
    // max z1 + z2
    // s.t. (x1, y, z1) in K_genpow([0.6, 0.4], 1)
    //      (x2, y2, z2) in K_genpow([0.1, 0.9], 1)
    //      x1 + 2y + 3x2 == 3
    //      y2 == 1

    // x = (x1, y, z1, x2, y2, z2)

    let n = 6;
    let P = CscMatrix::<f64>::zeros(n, n);
    let c = vec![0., 0., -1., 0., 0., -1.];

    let A = CscMatrix::from(&[
        [-1., 0., 0., 0., 0., 0.],
        [0., -1., 0., 0., 0., 0.],
        [0., 0., -1., 0., 0., 0.],
        [0., 0., 0., -1., 0., 0.],
        [0., 0., 0., 0., -1., 0.],
        [0., 0., 0., 0., 0., -1.],
        [1., 2., 0., 3., 0., 0.],
        [0., 0., 0., 0., 1., 0.],
    ]);
    let b = vec![0., 0., 0., 0., 0., 0., 3., 1.];

    let cones = vec![
        GenPowerConeT(vec![0.6, 0.4], 1),
        GenPowerConeT(vec![0.1, 0.9], 1),
        ZeroConeT(2),
    ];

    let settings = DefaultSettings::default();
    let mut solver = DefaultSolver::new(&P, &c, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);

    let refobj = -1.8458;
    assert!(f64::abs(solver.info.cost_primal - refobj) <= 1e-3);
}
