use clap::Parser;
use henkan::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Inspect and convert blueprint graph documents.
///
/// Loads a graph JSON document, reconstructs its program AST and prints it
/// as a tree (or as JSON). With `--emit`, the AST is laid back out as a
/// fresh graph document, which exercises the full round trip.
#[derive(Parser)]
#[command(name = "henkan-cli", version)]
struct Cli {
    /// Path to the blueprint graph JSON document
    graph: PathBuf,

    /// Print the reconstructed AST as JSON instead of a tree
    #[arg(long)]
    json: bool,

    /// Re-emit the AST as a graph document at this path
    #[arg(long)]
    emit: Option<PathBuf>,

    /// Keep source positions at (0,0) instead of deriving them from
    /// canvas coordinates
    #[arg(long)]
    no_positions: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let graph = Graph::load(&cli.graph)?;
    println!(
        "Loaded '{}' ({} nodes, {} connections) in {:.2?}",
        graph.name,
        graph.nodes.len(),
        graph.connections.len(),
        start.elapsed()
    );

    let config = CompilerConfig {
        generate_positions: !cli.no_positions,
        ..CompilerConfig::default()
    };
    let start = Instant::now();
    let program = convert_blueprint_to_ast(&graph, &config);
    println!(
        "Reconstructed {} function(s), {} variable(s) in {:.2?}",
        program.functions.len(),
        program.variables.len(),
        start.elapsed()
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&program)?);
    } else {
        println!("{}", program);
    }

    if let Some(path) = cli.emit {
        let emitted = convert_ast_to_blueprint(&program, &EmitterConfig::default());
        emitted.save(&path)?;
        println!("Emitted graph document to '{}'", path.display());
    }

    Ok(())
}
