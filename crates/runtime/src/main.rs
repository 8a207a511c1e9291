#![deny(clippy::all, clippy::pedantic)]

//! # fill_runner
//!
//! Builds a dims tensor, a scalar value tensor and a pre-shaped output
//! tensor, then drives the fill kernel through prepare and invoke. The
//! output shape defaults to the requested dims, standing in for a memory
//! planner that committed the right shape; pass `--output-shape` to commit
//! a different one.

mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kernels::{DType, FillKernel, KernelRunner};
use scenario::Scenario;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fill_runner", version, about = "Run the fill kernel on statically shaped tensors")]
struct Args {
    /// Requested output shape, comma separated. Omit for a scalar output.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    dims: Vec<i64>,

    /// Integer type the dims tensor is stored as (i8, i16, i32, i64).
    #[arg(long, default_value = "i32")]
    dims_type: DType,

    /// Fill value, parsed as `--dtype`.
    #[arg(long, allow_hyphen_values = true, required_unless_present = "scenario")]
    value: Option<String>,

    /// Element type of the value and output tensors.
    #[arg(long, default_value = "f32")]
    dtype: DType,

    /// Shape committed for the output tensor, comma separated.
    #[arg(long, value_delimiter = ',')]
    output_shape: Option<Vec<usize>>,

    /// JSON scenario file; replaces all other tensor flags.
    #[arg(long)]
    scenario: Option<PathBuf>,
}

impl Args {
    fn into_scenario(self) -> Result<Scenario> {
        match self.scenario {
            Some(path) => Scenario::load(&path),
            None => Ok(Scenario {
                dims: self.dims,
                dims_type: self.dims_type.to_string(),
                value: serde_json::Value::String(self.value.unwrap_or_default()),
                dtype: self.dtype.to_string(),
                output_shape: self.output_shape,
            }),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let scenario = Args::parse().into_scenario()?;
    tracing::info!(?scenario, "Running fill scenario.");

    let mut tensors = scenario.tensors()?;
    let mut runner = KernelRunner::new(
        FillKernel::new(),
        &mut tensors,
        &[Scenario::DIMS, Scenario::VALUE],
        &[Scenario::OUTPUT],
    )
    .context("binding tensors to the fill kernel")?;

    runner.init_and_prepare()?;
    runner.invoke()?;
    tracing::info!("Fill completed.");

    let output = runner
        .tensor(Scenario::OUTPUT)
        .context("output tensor missing after invoke")?;
    println!("{}", scenario::output_json(output)?);
    Ok(())
}
