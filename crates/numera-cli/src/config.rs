//! TOML configuration deserialisation for numera jobs.

use numera_core::OdeMethod;
use serde::Deserialize;

/// Top-level job file. Every section is optional and may repeat.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub interpolation: Vec<InterpolationConfig>,
    #[serde(default)]
    pub quadrature: Vec<QuadratureConfig>,
    #[serde(default)]
    pub ode: Vec<OdeConfig>,
    #[serde(default)]
    pub root: Vec<RootConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl JobConfig {
    /// Total number of jobs across all sections.
    pub fn job_count(&self) -> usize {
        self.interpolation.len() + self.quadrature.len() + self.ode.len() + self.root.len()
    }
}

/// Interpolation scheme selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMethod {
    Spline,
    Lagrange,
    Newton,
}

fn default_interpolation_method() -> InterpolationMethod {
    InterpolationMethod::Spline
}

/// Node data plus the points at which to evaluate.
#[derive(Debug, Deserialize)]
pub struct InterpolationConfig {
    pub name: String,
    #[serde(default = "default_interpolation_method")]
    pub method: InterpolationMethod,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Evaluation points. Optional when the interpolant only serves as an
    /// integrand or root target.
    pub query: Option<QuerySpec>,
}

/// Query specification: either a range or explicit list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QuerySpec {
    Range { range: [f64; 2], points: usize },
    List { values: Vec<f64> },
}

impl QuerySpec {
    /// Expand into the list of abscissas.
    pub fn points(&self) -> Vec<f64> {
        match self {
            QuerySpec::Range { range, points } => {
                let [start, end] = *range;
                (0..*points)
                    .map(|i| start + (end - start) * i as f64 / (*points - 1).max(1) as f64)
                    .collect()
            }
            QuerySpec::List { values } => values.clone(),
        }
    }
}

/// Quadrature rule selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuadratureRule {
    Trapezoid,
    Simpson,
    SimpsonAdaptive,
    Gauss2,
    Gauss3,
    GaussLegendre,
}

/// A definite integral of a named function.
#[derive(Debug, Deserialize)]
pub struct QuadratureConfig {
    pub name: String,
    /// Built-in function or the name of an `[[interpolation]]` entry.
    pub integrand: String,
    pub interval: [f64; 2],
    pub rule: QuadratureRule,
    /// Subintervals for the composite rules; starting count for adaptive Simpson.
    #[serde(default = "default_subintervals")]
    pub subintervals: usize,
    /// Gauss-Legendre order.
    #[serde(default = "default_gauss_points")]
    pub points: usize,
    #[serde(default = "default_quadrature_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Known value of the integral, reported alongside the error.
    pub exact: Option<f64>,
}

fn default_subintervals() -> usize {
    1000
}
fn default_gauss_points() -> usize {
    5
}
fn default_quadrature_tolerance() -> f64 {
    1e-6
}
fn default_max_iterations() -> usize {
    20
}

/// An initial value problem for a built-in system.
#[derive(Debug, Deserialize)]
pub struct OdeConfig {
    pub name: String,
    pub system: String,
    pub method: OdeMethod,
    #[serde(default)]
    pub x0: f64,
    pub y0: Vec<f64>,
    pub step: f64,
    pub steps: usize,
}

/// A bracketed root search.
#[derive(Debug, Deserialize)]
pub struct RootConfig {
    pub name: String,
    /// Built-in function or the name of an `[[interpolation]]` entry.
    pub function: String,
    pub bracket: [f64; 2],
    #[serde(default = "default_root_tolerance")]
    pub tolerance: f64,
}

fn default_root_tolerance() -> f64 {
    1e-4
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save per-job CSV files (default: true).
    #[serde(default = "default_true")]
    pub save_csv: bool,
    /// Whether to also save a JSON summary (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_csv: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Parse a job configuration from TOML text.
pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    Ok(config)
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid job file {}", path.display()))
}
