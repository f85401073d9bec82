//! Scene state shared with the covariance pipeline and the I/O adapters
//! that fill it from disk.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crs::CrsMatrix;
use crate::error::Result;
use crate::loader::JacobianLoader;
use crate::options::{SolverOptions, DEFAULT_ALGORITHM};
use crate::writer::write_jacobian_path;

/// Kind of input an adapter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// Precomputed sparse Jacobian with covariance options.
    Jacobian,
}

/// Pipeline state consumed by the covariance computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub jacobian: CrsMatrix,
    pub options: SolverOptions,
}

/// Adapter that moves a [`Scene`] to and from storage.
pub trait SceneIo {
    /// Kind of data this adapter reads and writes.
    fn data_type(&self) -> DataType;

    /// Fill `scene` from `path`. On error `scene` is left untouched.
    fn read(&self, path: &Path, scene: &mut Scene) -> Result<()>;

    /// Store `scene` at `path`.
    fn write(&self, path: &Path, scene: &Scene) -> Result<()>;
}

/// [`SceneIo`] for the positional Jacobian text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JacobianIo {
    loader: JacobianLoader,
}

impl Default for JacobianIo {
    fn default() -> Self {
        Self::with_algorithm(DEFAULT_ALGORITHM)
    }
}

impl JacobianIo {
    pub fn with_algorithm(algorithm: i32) -> Self {
        Self {
            loader: JacobianLoader::new(algorithm),
        }
    }

    pub fn with_loader(loader: JacobianLoader) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &JacobianLoader {
        &self.loader
    }
}

impl SceneIo for JacobianIo {
    fn data_type(&self) -> DataType {
        DataType::Jacobian
    }

    fn read(&self, path: &Path, scene: &mut Scene) -> Result<()> {
        let (jacobian, options) = self.loader.load_path(path)?;
        scene.jacobian = jacobian;
        scene.options = options;
        Ok(())
    }

    fn write(&self, path: &Path, scene: &Scene) -> Result<()> {
        write_jacobian_path(path, &scene.jacobian, &scene.options)
    }
}
