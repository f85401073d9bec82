//! Positional loader for Jacobian files.
//!
//! File layout, whitespace and newline insensitive:
//! ```text
//! <lambda> <numCams> <camParams> <numPoints> <numObs>
//! <fixPt0> <fixPt1> <fixPt2>
//! <num_rows> <num_cols> <numJ>
//! <rows[0]> ... <rows[num_rows]>
//! <cols[0]> ... <cols[numJ-1]>
//! <values[0]> ... <values[numJ-1]>
//! ```
//! Fields are read strictly in this order. The first missing or malformed
//! token aborts the load with a [`JacobianIoError::Format`] naming its stage.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::error;

use crate::crs::CrsMatrix;
use crate::error::{JacobianIoError, ParseStage, Result};
use crate::options::{fixed_points_from_triple, SolverOptions, DEFAULT_ALGORITHM};
use crate::tokens::TokenReader;

/// Reads a Jacobian and its solver options from a text stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JacobianLoader {
    /// Algorithm selector stored in the returned options.
    pub algorithm: i32,
    /// Run [`CrsMatrix::validate`] after parsing.
    pub validate: bool,
}

impl Default for JacobianLoader {
    fn default() -> Self {
        Self::new(DEFAULT_ALGORITHM)
    }
}

impl JacobianLoader {
    pub fn new(algorithm: i32) -> Self {
        Self {
            algorithm,
            validate: false,
        }
    }

    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Parse a complete Jacobian file from `source`.
    pub fn load<R: Read>(&self, source: R) -> Result<(CrsMatrix, SolverOptions)> {
        let mut tokens = TokenReader::new(BufReader::new(source));
        if let Err(err) = tokens.ensure_readable() {
            error!("the input jacobian stream is not readable: {err}");
            return Err(err);
        }

        let mut options = SolverOptions::new(self.algorithm);
        read_header(&mut tokens, &mut options)?;

        let fixed: Vec<i64> = tokens.fields(ParseStage::FixedPoints, 3)?;
        options.pts2fix = fixed_points_from_triple([fixed[0], fixed[1], fixed[2]]);

        let jacobian = read_matrix(&mut tokens)?;
        tokens.expect_end()?;

        if self.validate {
            jacobian.validate()?;
        }

        Ok((jacobian, options))
    }

    /// Open `path` and parse it.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<(CrsMatrix, SolverOptions)> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            error!("the input jacobian file {} cannot be opened: {e}", path.display());
            JacobianIoError::io(format!("failed to open {}", path.display()), e)
        })?;
        self.load(file)
    }
}

/// Parse a Jacobian from `source` tagging the options with `algorithm`.
pub fn load_jacobian<R: Read>(source: R, algorithm: i32) -> Result<(CrsMatrix, SolverOptions)> {
    JacobianLoader::new(algorithm).load(source)
}

fn read_header<R: std::io::BufRead>(
    tokens: &mut TokenReader<R>,
    options: &mut SolverOptions,
) -> Result<()> {
    const FIELDS: usize = 5;
    let stage = ParseStage::Header;
    options.lambda = tokens.field(stage, 0, FIELDS)?;
    options.num_cams = tokens.field(stage, 1, FIELDS)?;
    options.cam_params = tokens.field(stage, 2, FIELDS)?;
    options.num_points = tokens.field(stage, 3, FIELDS)?;
    options.num_obs = tokens.field(stage, 4, FIELDS)?;
    Ok(())
}

fn read_matrix<R: std::io::BufRead>(tokens: &mut TokenReader<R>) -> Result<CrsMatrix> {
    let dims: Vec<usize> = tokens.fields(ParseStage::Dimensions, 3)?;
    let (num_rows, num_cols, nnz) = (dims[0], dims[1], dims[2]);

    let num_offsets = num_rows.checked_add(1).ok_or_else(|| JacobianIoError::Format {
        stage: ParseStage::Dimensions,
        index: 0,
        expected: 3,
        found: Some(num_rows.to_string()),
    })?;
    let rows = tokens.fields(ParseStage::RowOffsets, num_offsets)?;
    let cols = tokens.fields(ParseStage::ColumnIndices, nnz)?;
    let values = tokens.fields(ParseStage::Values, nnz)?;

    Ok(CrsMatrix {
        num_rows,
        num_cols,
        rows,
        cols,
        values,
    })
}
