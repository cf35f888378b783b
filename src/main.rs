/*!
 * snc-tables - Table Generator Entry Point
 *
 * Reads a resolved program graph (JSON), validates it and emits the static
 * sequencer tables either as C source or as JSON.
 */

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use seq_core::compiler::{render_c, ProgramGraph, ProgramTables};
use seq_core::monitoring::{init_tracing, span_operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// C source with the table definitions
    C,
    /// Generated tables as pretty-printed JSON
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Generate sequencer program tables", long_about = None)]
struct Args {
    /// Program graph in JSON form
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "c")]
    format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let graph: ProgramGraph = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse program graph {}", args.input.display()))?;

    graph
        .validate()
        .with_context(|| format!("invalid program graph '{}'", graph.name))?;

    let tables = {
        let _span = span_operation("generate");
        ProgramTables::generate(&graph)
    };

    let rendered = {
        let _span = span_operation("render");
        match args.format {
            OutputFormat::C => render_c(&tables),
            OutputFormat::Json => {
                serde_json::to_string_pretty(&tables).context("failed to serialize tables")?
            }
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(program = %graph.name, output = %path.display(), "tables written");
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(rendered.as_bytes())
                .context("failed to write to stdout")?;
            lock.flush().context("failed to flush stdout")?;
        }
    }

    Ok(())
}
