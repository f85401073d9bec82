//! Reading precomputed bundle-adjustment Jacobians for covariance estimation.
//!
//! A Jacobian file stores the problem sizes, an optional triple of fixed
//! points and a sparse Jacobian in Compressed Row Storage. This crate parses
//! such files into:
//!
//! - [`CrsMatrix`]: the sparse Jacobian with its row offsets, column indices
//!   and values;
//! - [`SolverOptions`]: the problem sizes plus the covariance solver defaults.
//!
//! Parsing is strict and positional. A missing or malformed field fails with
//! [`JacobianIoError::Format`] naming the section it belongs to; an unreadable
//! source fails with [`JacobianIoError::Io`].
//!
//! # Modules
//!
//! - \[`crs`\]: CRS matrix type, structural checks and dense view.
//! - \[`options`\]: solver options and their fixed defaults.
//! - \[`loader`\]: the file grammar.
//! - \[`writer`\]: the matching text writer.
//! - \[`scene`\]: pipeline state and the [`SceneIo`] adapter trait.
//!
//! # Example
//!
//! ```
//! use covariance_io::load_jacobian;
//!
//! let text = "0.001 2 9 5 10\n0 1 2\n3 4 6\n0 2 4 6\n0 1 0 2 1 2\n1.0 2.0 3.0 4.0 5.0 6.0";
//! let (jacobian, options) = load_jacobian(text.as_bytes(), 2).unwrap();
//! assert_eq!(jacobian.rows, vec![0, 2, 4, 6]);
//! assert_eq!(jacobian.nnz(), 6);
//! assert_eq!(options.pts2fix, Some([0, 1, 2]));
//! assert_eq!(options.algorithm, 2);
//! ```

/// Compressed Row Storage sparse matrix.
mod crs;
/// Error type shared by the loader and the writer.
mod error;
/// Positional Jacobian file loader.
mod loader;
/// Covariance solver options.
mod options;
/// Scene state and storage adapters.
mod scene;
/// Fixtures shared by unit and integration tests.
///
/// Public so integration tests can use it; not meant for production use.
pub mod test_utils;
/// Whitespace tokenizer used by the loader.
pub mod tokens;
/// Text writer for Jacobian files.
mod writer;

pub use crs::*;
pub use error::*;
pub use loader::*;
pub use options::*;
pub use scene::*;
pub use writer::*;
