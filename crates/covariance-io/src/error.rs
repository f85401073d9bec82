use std::fmt;

use thiserror::Error;

/// Section of the Jacobian file a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    /// `lambda numCams camParams numPoints numObs`.
    Header,
    /// The three fixed point indices.
    FixedPoints,
    /// `num_rows num_cols numJ`.
    Dimensions,
    /// `num_rows + 1` row offsets.
    RowOffsets,
    /// `numJ` column indices.
    ColumnIndices,
    /// `numJ` non-zero values.
    Values,
    /// Anything after the last value.
    Trailing,
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseStage::Header => "header",
            ParseStage::FixedPoints => "fixed points",
            ParseStage::Dimensions => "matrix dimensions",
            ParseStage::RowOffsets => "row offsets",
            ParseStage::ColumnIndices => "column indices",
            ParseStage::Values => "values",
            ParseStage::Trailing => "end of input",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum JacobianIoError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage}: field {index} of {expected}: {}", describe_token(.found))]
    Format {
        stage: ParseStage,
        /// Zero-based position of the offending field within its stage.
        index: usize,
        /// Number of fields the stage expects.
        expected: usize,
        /// The offending token, `None` on premature end of input.
        found: Option<String>,
    },
    #[error("invalid CRS structure: {0}")]
    InvalidStructure(String),
    #[error("invalid solver options: {0}")]
    InvalidOptions(String),
}

fn describe_token(found: &Option<String>) -> String {
    match found {
        Some(token) => format!("unexpected token `{token}`"),
        None => "unexpected end of input".to_string(),
    }
}

impl JacobianIoError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns `true` for errors raised by the underlying stream or file.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns `true` for missing or malformed tokens.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// Stage of the offending token for format errors.
    pub fn stage(&self) -> Option<ParseStage> {
        match self {
            Self::Format { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T, E = JacobianIoError> = std::result::Result<T, E>;
