//! Covariance-estimation options read alongside the Jacobian.
//!
//! Only the problem sizes, the damping factor and the fixed points come from
//! the file. The remaining fields are fixed defaults or caller supplied.

use serde::{Deserialize, Serialize};

use crate::error::{JacobianIoError, Result};

/// Algorithm selector used when the caller does not pick one.
pub const DEFAULT_ALGORITHM: i32 = 2;
/// Threshold below which singular values are treated as zero.
pub const DEFAULT_EPSILON: f64 = 1e-10;
/// Number of smallest singular values removed for the gauge freedom of a
/// 3D reconstruction (rotation, translation, scale).
pub const DEFAULT_SVD_REMOVE_N: usize = 7;
/// `max_iter_te` value meaning "no iteration cap".
pub const UNBOUNDED_ITERATIONS: i32 = -1;

/// Options for the downstream covariance computation.
///
/// # Example
///
/// ```
/// use covariance_io::{SolverOptions, DEFAULT_EPSILON};
///
/// let opts = SolverOptions::new(3);
/// assert_eq!(opts.algorithm, 3);
/// assert_eq!(opts.epsilon, DEFAULT_EPSILON);
/// assert!(opts.pts2fix.is_none());
/// assert_eq!(opts.iteration_cap(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Damping factor the Jacobian was evaluated with.
    pub lambda: f64,
    pub num_cams: usize,
    /// Parameters per camera.
    pub cam_params: usize,
    pub num_points: usize,
    pub num_obs: usize,
    /// Covariance algorithm selector, never read from the file.
    pub algorithm: i32,
    pub epsilon: f64,
    pub svd_remove_n: usize,
    /// Iteration cap for the Taylor expansion, `-1` for unbounded.
    pub max_iter_te: i32,
    /// Indices of the three points fixed to remove the gauge freedom.
    #[serde(default)]
    pub pts2fix: Option<[usize; 3]>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self::new(DEFAULT_ALGORITHM)
    }
}

impl SolverOptions {
    /// Empty problem with the derived defaults and the given algorithm.
    pub fn new(algorithm: i32) -> Self {
        Self {
            lambda: 0.0,
            num_cams: 0,
            cam_params: 0,
            num_points: 0,
            num_obs: 0,
            algorithm,
            epsilon: DEFAULT_EPSILON,
            svd_remove_n: DEFAULT_SVD_REMOVE_N,
            max_iter_te: UNBOUNDED_ITERATIONS,
            pts2fix: None,
        }
    }

    /// Iteration cap, `None` when unbounded.
    pub fn iteration_cap(&self) -> Option<usize> {
        usize::try_from(self.max_iter_te).ok()
    }

    /// Returns `true` if point `idx` is one of the fixed points.
    pub fn is_point_fixed(&self, idx: usize) -> bool {
        self.pts2fix.is_some_and(|pts| pts.contains(&idx))
    }

    /// Fixed points as written in the file, `-1 -1 -1` when absent.
    ///
    /// Fails for indices the file cannot represent.
    pub fn fixed_point_triple(&self) -> Result<[i64; 3]> {
        let Some(pts) = self.pts2fix else {
            return Ok([-1; 3]);
        };
        let mut out = [0i64; 3];
        for (slot, &p) in out.iter_mut().zip(pts.iter()) {
            *slot = i64::try_from(p).map_err(|_| {
                JacobianIoError::InvalidOptions(format!("fixed point index {p} exceeds i64"))
            })?;
        }
        Ok(out)
    }
}

/// Fixed points from the three raw file values.
///
/// All or nothing: a single negative (or unrepresentable) entry discards the
/// whole triple.
pub fn fixed_points_from_triple(raw: [i64; 3]) -> Option<[usize; 3]> {
    let mut out = [0usize; 3];
    for (slot, &p) in out.iter_mut().zip(raw.iter()) {
        *slot = usize::try_from(p).ok()?;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fixed() {
        let opts = SolverOptions::default();
        assert_eq!(opts.algorithm, DEFAULT_ALGORITHM);
        assert_eq!(opts.epsilon, 1e-10);
        assert_eq!(opts.svd_remove_n, 7);
        assert_eq!(opts.max_iter_te, -1);
        assert_eq!(opts.iteration_cap(), None);
    }

    #[test]
    fn iteration_cap_for_positive_limit() {
        let opts = SolverOptions {
            max_iter_te: 25,
            ..SolverOptions::default()
        };
        assert_eq!(opts.iteration_cap(), Some(25));
    }

    #[test]
    fn triple_is_all_or_nothing() {
        assert_eq!(fixed_points_from_triple([0, 1, 2]), Some([0, 1, 2]));
        assert_eq!(fixed_points_from_triple([-1, 5, 2]), None);
        assert_eq!(fixed_points_from_triple([4, -1, 2]), None);
        assert_eq!(fixed_points_from_triple([4, 5, -7]), None);
        assert_eq!(fixed_points_from_triple([-1, -1, -1]), None);
        assert_eq!(fixed_points_from_triple([i64::MIN, 0, 1]), None);
        assert_eq!(
            fixed_points_from_triple([i64::MAX, 0, 1]),
            usize::try_from(i64::MAX).ok().map(|p| [p, 0, 1])
        );
    }

    #[test]
    fn fixed_point_queries() -> Result<()> {
        let mut opts = SolverOptions::default();
        assert!(!opts.is_point_fixed(0));
        assert_eq!(opts.fixed_point_triple()?, [-1, -1, -1]);

        opts.pts2fix = Some([3, 8, 9]);
        assert!(opts.is_point_fixed(8));
        assert!(!opts.is_point_fixed(4));
        assert_eq!(opts.fixed_point_triple()?, [3, 8, 9]);
        Ok(())
    }

    #[test]
    fn oversized_fixed_point_is_not_wrapped() {
        let opts = SolverOptions {
            pts2fix: Some([0, usize::MAX, 2]),
            ..SolverOptions::default()
        };
        let err = opts.fixed_point_triple().unwrap_err();
        assert!(matches!(err, JacobianIoError::InvalidOptions(_)), "{err}");
    }

    #[test]
    fn missing_pts2fix_deserializes_as_none() {
        let json = r#"{
            "lambda": 0.5, "num_cams": 1, "cam_params": 9, "num_points": 4,
            "num_obs": 4, "algorithm": 1, "epsilon": 1e-10, "svd_remove_n": 7,
            "max_iter_te": -1
        }"#;
        let opts: SolverOptions = serde_json::from_str(json).unwrap();
        assert!(opts.pts2fix.is_none());
        assert_eq!(opts.cam_params, 9);
    }
}
