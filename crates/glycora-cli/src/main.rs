//! The `glycora` binary: load a config bundle (schema + artifact + rules),
//! validate it, and score patients. Diagnostics go to stderr via tracing;
//! stdout carries only the JSON result.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use eyre::{Result, WrapErr};

use glycora_core::assessment::{AssessmentResult, ScoreResponse};
use glycora_core::input::PatientInput;
use glycora_pipeline::{AssessmentContext, AssessmentPipeline};

#[derive(Debug, Parser)]
#[command(
    name = "glycora",
    version,
    about = "Diabetes risk scoring from the command line"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one patient, or an array of patients, against a config bundle.
    Assess {
        #[command(flatten)]
        bundle: BundleArgs,
        /// Patient JSON: a field→value object, or an array of them.
        /// Pass '-' to read stdin.
        input: PathBuf,
        /// Emit full assessment records (audit vector, ids) instead of the
        /// flat response shape.
        #[arg(long)]
        full: bool,
    },
    /// Load and cross-check a config bundle, then exit. Nonzero on any
    /// validation failure.
    Validate {
        #[command(flatten)]
        bundle: BundleArgs,
    },
}

#[derive(Debug, Args)]
struct BundleArgs {
    /// Feature schema document.
    #[arg(long)]
    schema: PathBuf,
    /// Trained model artifact.
    #[arg(long)]
    artifact: PathBuf,
    /// Recommendation rule configuration.
    #[arg(long)]
    rules: PathBuf,
}

impl BundleArgs {
    fn load(&self) -> Result<AssessmentContext> {
        let schema = read_file(&self.schema)?;
        let artifact = read_file(&self.artifact)?;
        let rules = read_file(&self.rules)?;
        AssessmentContext::init(&schema, &artifact, &rules).wrap_err("config bundle rejected")
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))
}

fn read_input(path: &Path) -> Result<String> {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .wrap_err("failed to read stdin")?;
        Ok(buf)
    } else {
        read_file(path)
    }
}

fn render(result: &AssessmentResult, full: bool) -> Result<serde_json::Value> {
    let value = if full {
        serde_json::to_value(result)?
    } else {
        serde_json::to_value(ScoreResponse::from(result))?
    };
    Ok(value)
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Validate { bundle } => {
            let ctx = bundle.load()?;
            println!("ok");
            ctx.unload();
        }
        Command::Assess {
            bundle,
            input,
            full,
        } => {
            let ctx = bundle.load()?;
            let text = read_input(&input)?;
            let value: serde_json::Value =
                serde_json::from_str(&text).wrap_err("patient input is not valid JSON")?;

            let pipeline = AssessmentPipeline::new(&ctx);
            let output = match value {
                serde_json::Value::Array(items) => {
                    let mut results = Vec::with_capacity(items.len());
                    for (index, item) in items.into_iter().enumerate() {
                        let patient: PatientInput = serde_json::from_value(item)
                            .wrap_err_with(|| format!("patient #{index} is not a field→value object"))?;
                        let result = pipeline
                            .assess(&patient)
                            .wrap_err_with(|| format!("patient #{index}"))?;
                        results.push(render(&result, full)?);
                    }
                    serde_json::Value::Array(results)
                }
                item => {
                    let patient: PatientInput = serde_json::from_value(item)
                        .wrap_err("patient input is not a field→value object")?;
                    let result = pipeline.assess(&patient)?;
                    render(&result, full)?
                }
            };

            println!("{}", serde_json::to_string_pretty(&output)?);
            ctx.unload();
        }
    }

    Ok(())
}
