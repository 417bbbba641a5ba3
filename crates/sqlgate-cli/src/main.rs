//! SQLGate CLI
//!
//! Renders conditional SQL templates from the command line: reads a template
//! file and a JSON parameter file, runs the preprocessor, and prints the
//! resulting SQL (or the full result, parameters included, as JSON).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use sqlgate_core::{Config, ParamMap};
use sqlgate_engine::{TemplateProcessor, PRAGMA_ENABLE_INJECT};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// SQLGate - conditional SQL template preprocessing
#[derive(Parser)]
#[command(name = "sqlgate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: sqlgate.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a template and print the resulting SQL
    Render {
        /// Path to the template file
        template: PathBuf,

        /// JSON file holding the parameter mapping (an object)
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Keep whitespace-only lines instead of collapsing them
        #[arg(long)]
        keep_blank_lines: bool,

        /// Print the full result (sql + final parameters) as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("sqlgate.toml").exists() {
        Config::from_file(Path::new("sqlgate.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    match cli.command {
        Commands::Render {
            template,
            params,
            keep_blank_lines,
            json,
        } => render_command(
            &config,
            &template,
            params.as_deref(),
            keep_blank_lines,
            json,
            cli.verbose,
        ),
    }
}

fn render_command(
    config: &Config,
    template_path: &Path,
    params_path: Option<&Path>,
    keep_blank_lines: bool,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let template = std::fs::read_to_string(template_path)
        .with_context(|| format!("failed to read template {}", template_path.display()))?;

    let params = match params_path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read parameters {}", path.display()))?;
            parse_params(&contents)
                .with_context(|| format!("failed to parse parameters {}", path.display()))?
        }
        None => ParamMap::new(),
    };

    if verbose {
        eprintln!(
            "{} {} parameters against {}",
            "Rendering".cyan(),
            params.len(),
            template_path.display()
        );
        if template.contains(PRAGMA_ENABLE_INJECT) {
            eprintln!(
                "{}",
                "Injection pragma present: -- =key -- directives are active".yellow()
            );
        }
    }

    let collapse = config.render.collapse_blank_lines && !keep_blank_lines;
    tracing::debug!(
        template = %template_path.display(),
        collapse_blank_lines = collapse,
        "rendering template"
    );
    let processor = TemplateProcessor::new(collapse);
    let result = processor.process(&template, &params)?;

    if verbose {
        let minted = result.params.len() - params.len();
        if minted > 0 {
            eprintln!("{} {} expansion sub-key(s)", "Registered".cyan(), minted);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.sql);
    }
    Ok(())
}

/// Parse a parameter mapping from JSON text. The top level must be an object;
/// values may be null, scalar or arrays.
fn parse_params(contents: &str) -> Result<ParamMap> {
    let params: ParamMap = serde_json::from_str(contents)?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn parses_mixed_parameter_file() {
        let params = parse_params(
            r#"{"name": "x", "count": 3, "ids": [1, 2], "missing_value": null}"#,
        )
        .unwrap();
        assert_eq!(params.get("name"), Some(&json!("x")));
        assert_eq!(params.get("count"), Some(&json!(3)));
        assert_eq!(params.get("ids"), Some(&json!([1, 2])));
        assert_eq!(params.get("missing_value"), Some(&Value::Null));
    }

    #[test]
    fn rejects_non_object_parameter_file() {
        assert!(parse_params("[1, 2, 3]").is_err());
    }
}
