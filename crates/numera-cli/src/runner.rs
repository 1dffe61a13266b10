//! Job runner: builds interpolants, resolves function names and dispatches
//! every job to the numerical routines.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use numera_core::ode::{integrate_system, OdeMethod, Trajectory};
use numera_core::quadrature::{self, AdaptiveSimpson};
use numera_core::roots::{bisection, RootEstimate};
use numera_interp::{CubicSpline, Interpolant, LagrangePolynomial, NewtonPolynomial};

use crate::catalog::{self, ScalarFunction};
use crate::config::{
    InterpolationConfig, InterpolationMethod, JobConfig, OdeConfig, QuadratureConfig,
    QuadratureRule, RootConfig,
};

/// Results from a full run, serialisable as the JSON summary.
#[derive(Debug, Default, Serialize)]
pub struct RunOutput {
    pub interpolation: Vec<InterpolationOutput>,
    pub quadrature: Vec<QuadratureOutput>,
    pub ode: Vec<OdeOutput>,
    pub root: Vec<RootOutput>,
}

#[derive(Debug, Serialize)]
pub struct InterpolationOutput {
    pub name: String,
    pub method: String,
    pub queries: Vec<f64>,
    pub values: Vec<f64>,
    /// Piece coefficients, present for splines only.
    pub spline: Option<CubicSpline>,
}

#[derive(Debug, Serialize)]
pub struct QuadratureOutput {
    pub name: String,
    pub integrand: String,
    pub rule: String,
    pub interval: [f64; 2],
    pub value: f64,
    /// Subintervals or Gauss points actually used.
    pub nodes: usize,
    pub exact: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct OdeOutput {
    pub name: String,
    pub system: String,
    pub method: OdeMethod,
    pub trajectory: Trajectory,
    /// Closed-form solution at every sample, when the system has one.
    pub exact: Option<Vec<Vec<f64>>>,
}

#[derive(Debug, Serialize)]
pub struct RootOutput {
    pub name: String,
    pub function: String,
    pub bracket: [f64; 2],
    #[serde(flatten)]
    pub estimate: RootEstimate,
}

/// A built interpolant, keeping the concrete type for output.
enum Built {
    Spline(CubicSpline),
    Lagrange(LagrangePolynomial),
    Newton(NewtonPolynomial),
}

impl Built {
    fn as_interpolant(&self) -> &dyn Interpolant {
        match self {
            Built::Spline(s) => s,
            Built::Lagrange(p) => p,
            Built::Newton(p) => p,
        }
    }
}

/// A function a quadrature or root job can be pointed at.
enum Target<'a> {
    Builtin(&'static ScalarFunction),
    Interpolated(&'a dyn Interpolant),
}

impl Target<'_> {
    fn eval(&self, x: f64) -> f64 {
        match self {
            Target::Builtin(f) => (f.eval)(x),
            Target::Interpolated(i) => i.value_at(x),
        }
    }
}

fn build_interpolant(cfg: &InterpolationConfig) -> Result<Built> {
    let (x, y) = (cfg.x.clone(), cfg.y.clone());
    let built = match cfg.method {
        InterpolationMethod::Spline => CubicSpline::new(x, y).map(Built::Spline),
        InterpolationMethod::Lagrange => LagrangePolynomial::new(x, y).map(Built::Lagrange),
        InterpolationMethod::Newton => NewtonPolynomial::new(x, y).map(Built::Newton),
    };
    built.with_context(|| format!("Interpolation '{}'", cfg.name))
}

fn build_all(job: &JobConfig) -> Result<Vec<(&str, Built)>> {
    let mut built: Vec<(&str, Built)> = Vec::with_capacity(job.interpolation.len());
    for cfg in &job.interpolation {
        if built.iter().any(|(name, _)| *name == cfg.name) {
            anyhow::bail!("Duplicate interpolation name '{}'", cfg.name);
        }
        built.push((cfg.name.as_str(), build_interpolant(cfg)?));
    }
    Ok(built)
}

/// Resolve a function name against the catalog, then the job's interpolants.
fn resolve_function<'a>(name: &str, interpolants: &'a [(&str, Built)]) -> Result<Target<'a>> {
    if let Some(f) = catalog::scalar_function(name) {
        return Ok(Target::Builtin(f));
    }
    if let Some((_, built)) = interpolants.iter().find(|(n, _)| *n == name) {
        return Ok(Target::Interpolated(built.as_interpolant()));
    }
    let builtins: Vec<&str> = catalog::INTEGRANDS
        .iter()
        .chain(catalog::ROOT_FUNCTIONS)
        .map(|f| f.name)
        .collect();
    anyhow::bail!(
        "Unknown function '{}'. Valid built-ins: {}, or the name of an [[interpolation]] entry",
        name,
        builtins.join(", ")
    )
}

fn resolve_system(cfg: &OdeConfig) -> Result<&'static catalog::OdeSystem> {
    let system = catalog::ode_system(&cfg.system).with_context(|| {
        let names: Vec<&str> = catalog::ODE_SYSTEMS.iter().map(|s| s.name).collect();
        format!(
            "ODE '{}': unknown system '{}'. Valid systems: {}",
            cfg.name,
            cfg.system,
            names.join(", ")
        )
    })?;
    if cfg.y0.len() != system.dimension {
        anyhow::bail!(
            "ODE '{}': system '{}' has {} equations but y0 has {} values",
            cfg.name,
            system.name,
            system.dimension,
            cfg.y0.len()
        );
    }
    Ok(system)
}

/// Job names end up in output file names and CSV rows, so they are limited to
/// ASCII letters, digits, `_`, `-` and non-leading `.`.
fn check_job_name(kind: &str, name: &str) -> Result<()> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
    if name.is_empty() || name.starts_with('.') || !name.chars().all(allowed) {
        anyhow::bail!(
            "{} name '{}' is not usable as a file name: use letters, digits, '_', '-' or '.'",
            kind,
            name
        );
    }
    Ok(())
}

fn check_job_names(job: &JobConfig) -> Result<()> {
    let names = job
        .interpolation
        .iter()
        .map(|c| ("Interpolation", c.name.as_str()))
        .chain(job.quadrature.iter().map(|c| ("Quadrature", c.name.as_str())))
        .chain(job.ode.iter().map(|c| ("ODE", c.name.as_str())))
        .chain(job.root.iter().map(|c| ("Root", c.name.as_str())));
    for (kind, name) in names {
        check_job_name(kind, name)?;
    }
    Ok(())
}

/// Check that every job can be built and every name resolves.
pub fn validate(job: &JobConfig) -> Result<()> {
    check_job_names(job)?;
    let interpolants = build_all(job)?;
    for cfg in &job.quadrature {
        resolve_function(&cfg.integrand, &interpolants)
            .with_context(|| format!("Quadrature '{}'", cfg.name))?;
    }
    for cfg in &job.root {
        resolve_function(&cfg.function, &interpolants)
            .with_context(|| format!("Root '{}'", cfg.name))?;
    }
    for cfg in &job.ode {
        resolve_system(cfg)?;
    }
    Ok(())
}

/// Run every job in the configuration.
pub fn run_jobs(job: &JobConfig) -> Result<RunOutput> {
    check_job_names(job)?;
    let interpolants = build_all(job)?;
    let mut output = RunOutput::default();

    for (cfg, (_, built)) in job.interpolation.iter().zip(&interpolants) {
        let result = run_interpolation(cfg, built);
        println!(
            "  [interpolation] {}: {} over {} nodes, {} queries",
            cfg.name,
            built.as_interpolant().name(),
            cfg.x.len(),
            result.queries.len()
        );
        output.interpolation.push(result);
    }

    for cfg in &job.quadrature {
        let target = resolve_function(&cfg.integrand, &interpolants)
            .with_context(|| format!("Quadrature '{}'", cfg.name))?;
        let result = run_quadrature(cfg, &target)?;
        match result.exact {
            Some(exact) => println!(
                "  [quadrature] {}: {} = {:.10} (error {:.2e})",
                cfg.name,
                result.rule,
                result.value,
                (result.value - exact).abs()
            ),
            None => println!("  [quadrature] {}: {} = {:.10}", cfg.name, result.rule, result.value),
        }
        output.quadrature.push(result);
    }

    for cfg in &job.ode {
        let result = run_ode(cfg)?;
        if let Some((x, y)) = result.trajectory.last() {
            println!(
                "  [ode] {}: {} with {} steps, y({:.4}) = {:?}",
                cfg.name,
                cfg.method.name(),
                cfg.steps,
                x,
                y
            );
        }
        output.ode.push(result);
    }

    for cfg in &job.root {
        let target = resolve_function(&cfg.function, &interpolants)
            .with_context(|| format!("Root '{}'", cfg.name))?;
        let estimate = bisection(|x| target.eval(x), cfg.bracket[0], cfg.bracket[1], cfg.tolerance)
            .with_context(|| format!("Root '{}'", cfg.name))?;
        println!(
            "  [root] {}: x = {:.6} after {} iterations",
            cfg.name, estimate.root, estimate.iterations
        );
        output.root.push(RootOutput {
            name: cfg.name.clone(),
            function: cfg.function.clone(),
            bracket: cfg.bracket,
            estimate,
        });
    }

    log::info!("completed {} jobs", job.job_count());
    Ok(output)
}

fn run_interpolation(cfg: &InterpolationConfig, built: &Built) -> InterpolationOutput {
    let queries = cfg.query.as_ref().map(|q| q.points()).unwrap_or_default();
    let values = match built {
        Built::Spline(s) => s.par_evaluate_many(&queries),
        other => other.as_interpolant().values_at(&queries),
    };
    let method = match cfg.method {
        InterpolationMethod::Spline => "spline",
        InterpolationMethod::Lagrange => "lagrange",
        InterpolationMethod::Newton => "newton",
    };
    InterpolationOutput {
        name: cfg.name.clone(),
        method: method.into(),
        queries,
        values,
        spline: match built {
            Built::Spline(s) => Some(s.clone()),
            _ => None,
        },
    }
}

fn run_quadrature(cfg: &QuadratureConfig, target: &Target<'_>) -> Result<QuadratureOutput> {
    let f = |x: f64| target.eval(x);
    let [a, b] = cfg.interval;
    let context = || format!("Quadrature '{}'", cfg.name);

    let (rule, value, nodes) = match cfg.rule {
        QuadratureRule::Trapezoid => (
            "trapezoid",
            quadrature::trapezoid(f, a, b, cfg.subintervals).with_context(context)?,
            cfg.subintervals,
        ),
        QuadratureRule::Simpson => (
            "simpson",
            quadrature::simpson(f, a, b, cfg.subintervals).with_context(context)?,
            cfg.subintervals + cfg.subintervals % 2,
        ),
        QuadratureRule::SimpsonAdaptive => {
            let settings = AdaptiveSimpson {
                initial_subintervals: cfg.subintervals,
                tolerance: cfg.tolerance,
                max_iterations: cfg.max_iterations,
            };
            let est = quadrature::simpson_adaptive(f, a, b, &settings).with_context(context)?;
            ("simpson_adaptive", est.value, est.subintervals)
        }
        QuadratureRule::Gauss2 => ("gauss2", quadrature::gauss2(f, a, b).with_context(context)?, 2),
        QuadratureRule::Gauss3 => ("gauss3", quadrature::gauss3(f, a, b).with_context(context)?, 3),
        QuadratureRule::GaussLegendre => (
            "gauss_legendre",
            quadrature::gauss_legendre(f, a, b, cfg.points).with_context(context)?,
            cfg.points,
        ),
    };

    Ok(QuadratureOutput {
        name: cfg.name.clone(),
        integrand: cfg.integrand.clone(),
        rule: rule.into(),
        interval: cfg.interval,
        value,
        nodes,
        exact: cfg.exact,
    })
}

fn run_ode(cfg: &OdeConfig) -> Result<OdeOutput> {
    let system = resolve_system(cfg)?;
    let trajectory = integrate_system(system.rhs, cfg.method, cfg.x0, &cfg.y0, cfg.step, cfg.steps)
        .with_context(|| format!("ODE '{}'", cfg.name))?;
    let exact = system
        .exact
        .map(|exact| trajectory.xs.iter().map(|&x| exact(cfg.x0, &cfg.y0, x)).collect());

    Ok(OdeOutput {
        name: cfg.name.clone(),
        system: cfg.system.clone(),
        method: cfg.method,
        trajectory,
        exact,
    })
}

fn create_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))
}

/// Write one CSV per interpolation and ODE job plus quadrature and root
/// summaries. Returns the paths written.
pub fn write_csv(output: &RunOutput, dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    use std::io::Write;

    let mut written = Vec::new();

    for interp in &output.interpolation {
        let path = dir.join(format!("interpolation_{}.csv", interp.name));
        let mut file = create_file(&path)?;
        writeln!(file, "# numera {} interpolation '{}'", interp.method, interp.name)?;
        writeln!(file, "x,value")?;
        for (x, v) in interp.queries.iter().zip(&interp.values) {
            writeln!(file, "{:.10},{:.10e}", x, v)?;
        }
        written.push(path);
    }

    if !output.quadrature.is_empty() {
        let path = dir.join("quadrature.csv");
        let mut file = create_file(&path)?;
        writeln!(file, "name,integrand,rule,a,b,nodes,value,abs_error")?;
        for q in &output.quadrature {
            let error = q
                .exact
                .map(|e| format!("{:.6e}", (q.value - e).abs()))
                .unwrap_or_default();
            writeln!(
                file,
                "{},{},{},{},{},{},{:.12e},{}",
                q.name, q.integrand, q.rule, q.interval[0], q.interval[1], q.nodes, q.value, error
            )?;
        }
        written.push(path);
    }

    for ode in &output.ode {
        let path = dir.join(format!("ode_{}.csv", ode.name));
        let mut file = create_file(&path)?;
        let dim = ode.trajectory.ys.first().map_or(0, Vec::len);

        writeln!(file, "# numera {} solution of '{}'", ode.method.name(), ode.system)?;
        let mut header = vec!["x".to_string()];
        header.extend((1..=dim).map(|k| format!("y{k}")));
        if ode.exact.is_some() {
            header.extend((1..=dim).map(|k| format!("y{k}_exact")));
        }
        writeln!(file, "{}", header.join(","))?;

        for (k, (x, y)) in ode.trajectory.xs.iter().zip(&ode.trajectory.ys).enumerate() {
            let mut row = vec![format!("{:.6}", x)];
            row.extend(y.iter().map(|v| format!("{:.10e}", v)));
            if let Some(exact) = &ode.exact {
                row.extend(exact[k].iter().map(|v| format!("{:.10e}", v)));
            }
            writeln!(file, "{}", row.join(","))?;
        }
        written.push(path);
    }

    if !output.root.is_empty() {
        let path = dir.join("roots.csv");
        let mut file = create_file(&path)?;
        writeln!(file, "name,function,a,b,root,iterations")?;
        for r in &output.root {
            writeln!(
                file,
                "{},{},{},{},{:.12},{}",
                r.name, r.function, r.bracket[0], r.bracket[1], r.estimate.root, r.estimate.iterations
            )?;
        }
        written.push(path);
    }

    for path in &written {
        println!("Written: {}", path.display());
    }
    Ok(written)
}

/// Write the full run summary as pretty-printed JSON.
pub fn write_json(output: &RunOutput, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    let mut file = create_file(path)?;
    std::io::Write::write_all(&mut file, json.as_bytes())?;

    println!("Summary (JSON) written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use approx::assert_relative_eq;

    const JOB: &str = r#"
        [[interpolation]]
        name = "reference"
        x = [0.0, 1.0, 2.0, 3.0]
        y = [1.0, 2.0, 0.0, 1.0]
        query = { values = [0.0, 1.5, 3.0] }

        [[interpolation]]
        name = "table"
        method = "newton"
        x = [1.25, 1.30, 1.35, 1.40, 1.45, 1.50]
        y = [1.60, 1.71, 1.81, 1.88, 1.94, 1.98]
        query = { values = [1.30, 1.45] }

        [[quadrature]]
        name = "sine"
        integrand = "sin"
        interval = [0.0, 3.141592653589793]
        rule = "simpson_adaptive"
        tolerance = 1e-8
        exact = 2.0

        [[quadrature]]
        name = "spline_area"
        integrand = "reference"
        interval = [0.0, 3.0]
        rule = "simpson"
        subintervals = 6

        [[ode]]
        name = "oscillator"
        system = "harmonic"
        method = "rk4"
        y0 = [1.0, 0.0]
        step = 0.1
        steps = 20

        [[root]]
        name = "slide"
        function = "x_sin_x_minus_1"
        bracket = [1.0, 2.0]
        tolerance = 1e-6
    "#;

    #[test]
    fn test_run_all_jobs() {
        let job = parse_config(JOB).unwrap();
        validate(&job).unwrap();
        let out = run_jobs(&job).unwrap();

        assert_relative_eq!(out.interpolation[0].values[1], 1.0, epsilon = 1e-9);
        assert!(out.interpolation[0].spline.is_some());
        assert!(out.interpolation[1].spline.is_none());
        assert_relative_eq!(out.interpolation[1].values[0], 1.71, epsilon = 1e-9);

        assert_relative_eq!(out.quadrature[0].value, 2.0, epsilon = 1e-8);
        // Piecewise integral of the reference spline: 1.75 + 1.0 + 0.25
        assert_relative_eq!(out.quadrature[1].value, 3.0, epsilon = 1e-12);

        let ode = &out.ode[0];
        assert_eq!(ode.trajectory.len(), 21);
        let exact = ode.exact.as_ref().unwrap();
        assert_relative_eq!(ode.trajectory.ys[20][0], exact[20][0], epsilon = 1e-5);

        assert!((out.root[0].estimate.root - 1.114157).abs() < 1e-5);
    }

    #[test]
    fn test_unknown_function_rejected() {
        let job = parse_config(
            r#"
            [[root]]
            name = "r"
            function = "tan"
            bracket = [1.0, 2.0]
            "#,
        )
        .unwrap();
        let err = validate(&job).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown function 'tan'"));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let job = parse_config(
            r#"
            [[ode]]
            name = "o"
            system = "harmonic"
            method = "euler"
            y0 = [1.0]
            step = 0.1
            steps = 5
            "#,
        )
        .unwrap();
        assert!(validate(&job).is_err());
    }

    #[test]
    fn test_bad_nodes_surface_interp_error() {
        let job = parse_config(
            r#"
            [[interpolation]]
            name = "bad"
            x = [1.0, 1.0, 2.0]
            y = [0.0, 0.0, 0.0]
            "#,
        )
        .unwrap();
        let err = validate(&job).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Interpolation 'bad'") && msg.contains("strictly increasing"), "{msg}");
    }

    #[test]
    fn test_path_like_names_rejected() {
        for name in ["../escape", "sub/dir", "..", ".hidden", "a,b", ""] {
            let job = parse_config(&format!(
                r#"
                [[ode]]
                name = "{name}"
                system = "decay"
                method = "euler"
                y0 = [1.0]
                step = 0.1
                steps = 2
                "#
            ))
            .unwrap();
            let err = validate(&job).unwrap_err();
            assert!(err.to_string().contains("not usable as a file name"), "{name}: {err}");
            assert!(run_jobs(&job).is_err());
        }

        let job = parse_config(
            r#"
            [[interpolation]]
            name = "run-1.v2_final"
            x = [0.0, 1.0]
            y = [0.0, 1.0]
            "#,
        )
        .unwrap();
        validate(&job).unwrap();
    }

    #[test]
    fn test_duplicate_interpolation_names_rejected() {
        let job = parse_config(
            r#"
            [[interpolation]]
            name = "a"
            x = [0.0, 1.0]
            y = [0.0, 1.0]

            [[interpolation]]
            name = "a"
            x = [0.0, 1.0]
            y = [1.0, 0.0]
            "#,
        )
        .unwrap();
        assert!(validate(&job).is_err());
    }

    #[test]
    fn test_outputs_written() {
        let job = parse_config(JOB).unwrap();
        let out = run_jobs(&job).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let written = write_csv(&out, dir.path()).unwrap();
        assert_eq!(written.len(), 5);

        let ode_csv = std::fs::read_to_string(dir.path().join("ode_oscillator.csv")).unwrap();
        let header = ode_csv.lines().nth(1).unwrap();
        assert_eq!(header, "x,y1,y2,y1_exact,y2_exact");
        assert_eq!(ode_csv.lines().count(), 2 + 21);

        let json_path = dir.path().join("nested").join("summary.json");
        write_json(&out, &json_path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["root"][0]["name"], "slide");
        assert!(value["root"][0]["iterations"].as_u64().unwrap() > 0);
        assert_eq!(value["ode"][0]["method"], "rk4");
    }
}
