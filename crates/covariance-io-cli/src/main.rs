use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use covariance_io::{write_jacobian_path, CrsMatrix, JacobianLoader, SolverOptions, DEFAULT_ALGORITHM};
use log::info;
use serde::Serialize;

/// Inspect a Jacobian file used for covariance estimation.
#[derive(Debug, Parser)]
#[command(author, version, about = "Load a sparse Jacobian file and print a JSON summary")]
struct Args {
    /// Path to the Jacobian text file.
    #[arg(long)]
    input: PathBuf,

    /// Covariance algorithm selector stored in the options.
    #[arg(long, default_value_t = DEFAULT_ALGORITHM)]
    algorithm: i32,

    /// Check CRS invariants after parsing.
    #[arg(long)]
    validate: bool,

    /// Optional path for a normalized copy of the input.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct JacobianSummary {
    num_rows: usize,
    num_cols: usize,
    nnz: usize,
    options: SolverOptions,
}

impl JacobianSummary {
    fn new(jacobian: &CrsMatrix, options: SolverOptions) -> Self {
        Self {
            num_rows: jacobian.num_rows,
            num_cols: jacobian.num_cols,
            nnz: jacobian.nnz(),
            options,
        }
    }
}

fn summarize_file(
    input: &Path,
    algorithm: i32,
    validate: bool,
    output: Option<&Path>,
) -> Result<String> {
    let (jacobian, options) = JacobianLoader::new(algorithm)
        .with_validation(validate)
        .load_path(input)
        .with_context(|| format!("failed to load {}", input.display()))?;

    if let Some(out) = output {
        write_jacobian_path(out, &jacobian, &options)
            .with_context(|| format!("failed to write {}", out.display()))?;
        info!("wrote normalized jacobian to {}", out.display());
    }

    let summary = JacobianSummary::new(&jacobian, options);
    Ok(serde_json::to_string_pretty(&summary)?)
}

fn main() {
    env_logger::init();
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let json = summarize_file(
        &args.input,
        args.algorithm,
        args.validate,
        args.output.as_deref(),
    )?;
    println!("{json}");
    Ok(())
}
