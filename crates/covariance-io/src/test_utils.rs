//! Shared fixtures for unit and integration tests.

use crate::crs::CrsMatrix;
use crate::options::SolverOptions;

/// Small well formed Jacobian file: 3x4 matrix, 6 non-zeros, points 0 1 2 fixed.
pub const SAMPLE_JACOBIAN_TEXT: &str = "0.001 2 9 5 10
0 1 2
3 4 6
0 2 4 6
0 1 0 2 1 2
1.0 2.0 3.0 4.0 5.0 6.0
";

/// Matrix encoded by [`SAMPLE_JACOBIAN_TEXT`].
pub fn sample_jacobian() -> CrsMatrix {
    CrsMatrix {
        num_rows: 3,
        num_cols: 4,
        rows: vec![0, 2, 4, 6],
        cols: vec![0, 1, 0, 2, 1, 2],
        values: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    }
}

/// Options encoded by [`SAMPLE_JACOBIAN_TEXT`] for the given algorithm.
pub fn sample_options(algorithm: i32) -> SolverOptions {
    SolverOptions {
        lambda: 0.001,
        num_cams: 2,
        cam_params: 9,
        num_points: 5,
        num_obs: 10,
        pts2fix: Some([0, 1, 2]),
        ..SolverOptions::new(algorithm)
    }
}
