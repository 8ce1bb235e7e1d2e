#![allow(non_snake_case)]

#[cfg(feature = "serde")]
#[test]
fn test_json_io() {
    use conix::{algebra::*, solver::*};
    use std::io::{Seek, SeekFrom};

    let P = CscMatrix {
        m: 1,
        n: 1,
        colptr: vec![0, 1],
        rowval: vec![0],
        nzval: vec![2.0],
    };
    let q = [1.0];
    let A = CscMatrix {
        m: 1,
        n: 1,
        colptr: vec![0, 1],
        rowval: vec![0],
        nzval: vec![-1.0],
    };
    let b = [-2.0];
    let cones = vec![SupportedConeT::NonnegativeConeT(1)];

    let settings = DefaultSettingsBuilder::default().build().unwrap();

    let mut solver = DefaultSolver::<f64>::new(&P, &q, &A, &b, &cones, settings).unwrap();
    solver.solve();

    // write the problem to a file
    let mut file = tempfile::tempfile().unwrap();
    solver.write_to_file(&mut file).unwrap();

    // read the problem from the file
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut solver2 = DefaultSolver::<f64>::read_from_file(&mut file).unwrap();
    solver2.solve();
    assert!(solver.solution.x.dist(&solver2.solution.x) <= 1e-8);

    // read the problem again, this time with a tighter iteration limit
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut solver3 = DefaultSolver::<f64>::read_from_file(&mut file).unwrap();
    solver3.settings.max_iter = 1;
    solver3.solve();
    assert_eq!(solver3.solution.status, SolverStatus::MaxIterations);
}
