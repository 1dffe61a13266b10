//! Numera command-line interface.
//!
//! Run numerical jobs from TOML configuration files:
//! ```sh
//! numera run job.toml
//! numera validate job.toml
//! numera functions
//! numera spline --x 0,1,2,3 --y 1,2,0,1 --at 0.5,1.5,2.5
//! ```

mod catalog;
mod config;
mod runner;

use anyhow::Context;
use clap::{Parser, Subcommand};
use numera_interp::CubicSpline;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "numera")]
#[command(about = "Numera: natural cubic splines and classical numerical methods")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every job in a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without running any job.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// List the built-in functions and ODE systems.
    Functions,
    /// Fit a natural cubic spline and evaluate it at the given points.
    Spline {
        /// Node abscissas, strictly increasing.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        x: Vec<f64>,
        /// Node ordinates.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        y: Vec<f64>,
        /// Query points.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        at: Vec<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Numera");
            println!("======");
            let job = config::load_config(&config)?;
            println!("Configuration: {} ({} jobs)", config.display(), job.job_count());

            let result = runner::run_jobs(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_csv {
                runner::write_csv(&result, &out_dir)?;
            }

            if job.output.save_json {
                runner::write_json(&result, &out_dir.join("summary.json"))?;
            }

            println!("Run complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            runner::validate(&job)?;
            println!(
                "Configuration is valid: {} ({} jobs)",
                config.display(),
                job.job_count()
            );
            Ok(())
        }
        Commands::Functions => {
            println!("Scalar functions (integrands):");
            for f in catalog::INTEGRANDS {
                println!("  {:<18} {}", f.name, f.formula);
            }
            println!();
            println!("Scalar functions (root targets):");
            for f in catalog::ROOT_FUNCTIONS {
                println!("  {:<18} {}", f.name, f.formula);
            }
            println!();
            println!("ODE systems:");
            for s in catalog::ODE_SYSTEMS {
                let exact = if s.exact.is_some() { "exact solution" } else { "" };
                println!("  {:<18} {:<32} {}", s.name, s.formula, exact);
            }
            println!();
            println!("Any [[interpolation]] name may also be used as an integrand or root target.");
            Ok(())
        }
        Commands::Spline { x, y, at } => {
            let spline = CubicSpline::new(x, y).context("Cannot build spline")?;
            let values = spline.evaluate_many(&at);
            println!("{:>14} {:>18} {:>18} {:>18}", "x", "S(x)", "S'(x)", "S''(x)");
            for (&q, v) in at.iter().zip(values) {
                println!(
                    "{:>14.6} {:>18.10} {:>18.10} {:>18.10}",
                    q,
                    v,
                    spline.derivative(q),
                    spline.second_derivative(q)
                );
            }
            Ok(())
        }
    }
}
