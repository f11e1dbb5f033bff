use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use slqe::api::{process, process_expression, DefaultLatex, ReferenceGlyphs, SolveOutput};

mod config;
mod input;
mod provenance;

use config::RunCfg;

#[derive(Parser)]
#[command(name = "slqe")]
#[command(about = "Solve handwritten polynomial equations from symbol detections")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Assemble and solve a detection file (.csv or .json)
    Solve {
        #[arg(long)]
        input: PathBuf,
        /// Also write the result here, with a provenance sidecar
        #[arg(long)]
        out: Option<PathBuf>,
        /// JSON overrides with optional `geometry` and `solver` sections
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Normalize and solve a typed expression such as `2x^2-3(x+1)=0`
    Expr {
        expr: String,
        #[arg(long)]
        epsilon: Option<f64>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Solve { input, out, config } => solve(&input, out.as_deref(), config.as_deref()),
        Action::Expr {
            expr,
            epsilon,
            config,
        } => expr_cmd(&expr, epsilon, config.as_deref()),
        Action::Report => report(),
    }
}

fn print(result: &SolveOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

fn solve(input: &Path, out: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let cfg = RunCfg::load(config)?;
    let detections = input::load_detections(input)?;
    tracing::info!(input = %input.display(), detections = detections.len(), "solve");
    let result = process(
        &detections,
        &cfg.geometry,
        &cfg.solver,
        &ReferenceGlyphs,
        &DefaultLatex,
    );
    tracing::info!(
        valid = result.valid,
        expression = %result.expression,
        message = %result.message,
        "solved"
    );
    print(&result)?;

    if let Some(out) = out {
        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        fs::write(out, serde_json::to_vec_pretty(&result)?)
            .with_context(|| format!("writing {}", out.display()))?;
        let payload = provenance::Payload::new(serde_json::to_value(cfg)?)
            .with_input(input.to_string_lossy());
        let sidecar = provenance::write_sidecar(out, payload)?;
        tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "written");
    }
    Ok(())
}

fn expr_cmd(expr: &str, epsilon: Option<f64>, config: Option<&Path>) -> Result<()> {
    let mut cfg = RunCfg::load(config)?;
    if let Some(eps) = epsilon {
        anyhow::ensure!(eps > 0.0 && eps < 1.0, "epsilon must lie in (0, 1), got {eps}");
        cfg.solver.epsilon = eps;
    }
    let result = process_expression(expr, &cfg.solver, &DefaultLatex);
    print(&result)
}

fn report() -> Result<()> {
    let block = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "slqe_version": slqe::VERSION,
        "defaults": RunCfg::default(),
    });
    println!("{}", serde_json::to_string_pretty(&block)?);
    Ok(())
}
