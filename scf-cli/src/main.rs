use std::{fs::File, path::PathBuf, time::Instant};

use anyhow::Context;
use clap::Parser;
use nalgebra::Vector3;
use scf_core::{
    config::CalculationConfig,
    scf::{self, ScfSolution},
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// A JSON document describing molecule, basis, integration and
    /// convergence setup
    input: PathBuf,

    /// Also print the density, Fock and coefficient matrices
    #[arg(long, short)]
    matrices: bool,

    /// Sample the electron density on an N x N x N grid over the
    /// integration domain and write it as JSON
    #[arg(long, value_name = "N")]
    density_grid: Option<usize>,

    /// Where to write the density grid (requires --density-grid)
    #[arg(long, requires = "density_grid", value_name = "PATH")]
    density_output: Option<PathBuf>,
}

#[derive(Serialize)]
struct DensityGrid {
    points: Vec<[f64; 3]>,
    values: Vec<f64>,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();

    log::info!("preparing input data");
    let file = File::open(&args.input)
        .with_context(|| format!("opening input {}", args.input.display()))?;
    let config: CalculationConfig =
        serde_json::from_reader(file).context("parsing calculation input")?;

    // the density grid spans the same cube the quadrature samples
    let scf_core::config::IntegrationConfig::MonteCarlo { boundaries: domain, .. } =
        &config.integration_config;
    let domain = *domain;

    let start = Instant::now();
    let solution = scf::calculate(config.into_problem());

    println!(
        "SCF finished after {} iterations and {:0.2?}",
        solution.iterations(),
        start.elapsed()
    );
    println!("orbital energies: {:1.6}", solution.orbital_energies());

    if args.matrices {
        println!("density matrix: {:1.6}", solution.density_matrix());
        println!("fock matrix: {:1.6}", solution.fock_matrix());
        println!("coefficient matrix: {:1.6}", solution.coefficient_matrix());
    }

    if let Some(resolution) = args.density_grid {
        let grid = sample_density_grid(&solution, domain, resolution);
        let output = args
            .density_output
            .unwrap_or_else(|| args.input.with_extension("density.json"));

        serde_json::to_writer(
            File::create(&output).with_context(|| format!("creating {}", output.display()))?,
            &grid,
        )?;
        println!("wrote {} density samples to {}", grid.values.len(), output.display());
    }

    Ok(())
}

fn sample_density_grid(
    solution: &ScfSolution,
    (lower, upper): (f64, f64),
    resolution: usize,
) -> DensityGrid {
    let step = (upper - lower) / (resolution.max(2) - 1) as f64;

    let mut points = Vec::with_capacity(resolution.pow(3));
    for i in 0..resolution {
        for j in 0..resolution {
            for k in 0..resolution {
                points.push([
                    lower + i as f64 * step,
                    lower + j as f64 * step,
                    lower + k as f64 * step,
                ]);
            }
        }
    }

    let values = solution.electron_density(
        &points
            .iter()
            .map(|&[x, y, z]| Vector3::new(x, y, z))
            .collect::<Vec<_>>(),
    );

    DensityGrid { points, values }
}
