//! Text writer producing files the loader reads back.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::crs::CrsMatrix;
use crate::error::{JacobianIoError, Result};
use crate::options::SolverOptions;

/// Write `jacobian` and the file-backed part of `options`, one stage per line.
///
/// Floats use the shortest representation that parses back to the same bits.
/// `algorithm`, `epsilon`, `svd_remove_n` and `max_iter_te` are not part of
/// the format and are not written.
pub fn write_jacobian<W: Write>(
    sink: W,
    jacobian: &CrsMatrix,
    options: &SolverOptions,
) -> Result<()> {
    jacobian.validate()?;
    let fixed = options.fixed_point_triple()?;
    let mut out = BufWriter::new(sink);
    write_all(&mut out, jacobian, options, &fixed)
        .and_then(|_| out.flush())
        .map_err(|e| JacobianIoError::io("failed to write jacobian", e))
}

/// Create (or truncate) `path` and write the Jacobian into it.
pub fn write_jacobian_path<P: AsRef<Path>>(
    path: P,
    jacobian: &CrsMatrix,
    options: &SolverOptions,
) -> Result<()> {
    let path = path.as_ref();
    jacobian.validate()?;
    options.fixed_point_triple()?;
    let file = File::create(path)
        .map_err(|e| JacobianIoError::io(format!("failed to create {}", path.display()), e))?;
    write_jacobian(file, jacobian, options)
}

fn write_all<W: Write>(
    out: &mut W,
    jacobian: &CrsMatrix,
    options: &SolverOptions,
    fixed: &[i64; 3],
) -> std::io::Result<()> {
    writeln!(
        out,
        "{} {} {} {} {}",
        options.lambda, options.num_cams, options.cam_params, options.num_points, options.num_obs
    )?;
    write_line(out, fixed)?;
    writeln!(
        out,
        "{} {} {}",
        jacobian.num_rows,
        jacobian.num_cols,
        jacobian.nnz()
    )?;
    write_line(out, &jacobian.rows)?;
    write_line(out, &jacobian.cols)?;
    write_line(out, &jacobian.values)
}

fn write_line<W: Write, T: Display>(out: &mut W, items: &[T]) -> std::io::Result<()> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_all(b" ")?;
        }
        write!(out, "{item}")?;
    }
    out.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_jacobian;
    use crate::test_utils::{sample_jacobian, sample_options};

    #[test]
    fn writes_one_stage_per_line() -> Result<()> {
        let mut buf = Vec::new();
        write_jacobian(&mut buf, &sample_jacobian(), &sample_options(2))?;
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "0.001 2 9 5 10\n0 1 2\n3 4 6\n0 2 4 6\n0 1 0 2 1 2\n1 2 3 4 5 6\n"
        );
        Ok(())
    }

    #[test]
    fn absent_fixed_points_written_as_negative() -> Result<()> {
        let opts = SolverOptions {
            pts2fix: None,
            ..sample_options(2)
        };
        let mut buf = Vec::new();
        write_jacobian(&mut buf, &sample_jacobian(), &opts)?;
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().nth(1), Some("-1 -1 -1"));
        Ok(())
    }

    #[test]
    fn awkward_floats_survive_reload() -> Result<()> {
        let mut jac = sample_jacobian();
        jac.values = vec![0.1 + 0.2, -1e-300, 6.02214076e23, f64::MIN_POSITIVE, 1.0 / 3.0, -0.0];
        let opts = SolverOptions {
            lambda: 1e-7,
            ..sample_options(4)
        };

        let mut buf = Vec::new();
        write_jacobian(&mut buf, &jac, &opts)?;
        let (back_jac, back_opts) = load_jacobian(buf.as_slice(), 4)?;
        assert_eq!(back_jac, jac);
        assert_eq!(back_opts, opts);
        for (a, b) in back_jac.values.iter().zip(&jac.values) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        Ok(())
    }

    #[test]
    fn refuses_inconsistent_matrix() {
        let mut jac = sample_jacobian();
        jac.cols.pop();
        let mut buf = Vec::new();
        let err = write_jacobian(&mut buf, &jac, &sample_options(2)).unwrap_err();
        assert!(matches!(err, JacobianIoError::InvalidStructure(_)));
        assert!(buf.is_empty());
    }

    #[test]
    fn refuses_unrepresentable_fixed_point() {
        let opts = SolverOptions {
            pts2fix: Some([1, 2, usize::MAX]),
            ..sample_options(2)
        };
        let mut buf = Vec::new();
        let err = write_jacobian(&mut buf, &sample_jacobian(), &opts).unwrap_err();
        assert!(matches!(err, JacobianIoError::InvalidOptions(_)), "{err}");
        assert!(buf.is_empty());
    }
}
