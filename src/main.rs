use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use figma_simplify::extract::{simplify_response, TraversalOptions};

#[derive(Parser)]
#[command(name = "figma-simplify")]
#[command(version, about = "Simplify a raw Figma API response into a compact document")]
#[command(long_about = "Simplify a raw Figma API response into a compact document\n\n\
    Reads a saved `GET /v1/files/:key` or `GET /v1/files/:key/nodes` response\n\
    and emits the simplified document, YAML by default:\n  \
    figma-simplify response.json [-o design.yml] [--json] [--max-depth N]")]
struct Cli {
    /// Saved raw API response (JSON file)
    input: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit JSON instead of YAML
    #[arg(long)]
    json: bool,

    /// Compact JSON output (requires --json)
    #[arg(long, requires = "json")]
    compact: bool,

    /// Prune the tree below this depth (root nodes are depth 0)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Verbose output for debugging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    if cli.verbose {
        eprintln!("Reading input file: {}", cli.input.display());
    }

    let raw = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read input file: {}", cli.input.display()))?;
    let raw: serde_json::Value =
        serde_json::from_str(&raw).context("Input is not valid JSON")?;

    let mut options = TraversalOptions::default();
    if let Some(max_depth) = cli.max_depth {
        options = options.with_max_depth(max_depth);
    }

    let design = simplify_response(&raw, &options).context("Failed to simplify response")?;

    if cli.verbose {
        eprintln!(
            "Simplified {} root node(s), {} shared style(s)",
            design.nodes.len(),
            design.global_vars.styles.len()
        );
    }

    let output = if cli.json {
        if cli.compact {
            design.to_json()?
        } else {
            design.to_json_pretty()?
        }
    } else {
        design.to_yaml()?
    };

    match cli.output.as_ref() {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            if cli.verbose {
                eprintln!("Wrote {}", path.display());
            }
        }
        None => {
            println!("{output}");
        }
    }

    Ok(())
}
