//! btc - behavior tree surface compiler.
//!
//! - `btc compile <surface>` - load a surface and print the compiled layout
//! - `btc types` - list the built-in node types

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use ai_bt::{BehaviorTreeGraph, CompilerConfig, LoadContext, NodeTypeRegistry, TreeLayout};
use ai_tools::TraceLog;

#[derive(Parser)]
#[command(name = "btc")]
#[command(about = "Compile behavior tree surfaces", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a surface file and print the compiled tree
    Compile {
        /// Surface document (JSON)
        surface: PathBuf,

        /// Compiler config (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the layout as JSON
        #[arg(long)]
        json: bool,

        /// Ignore layout metadata (children ordered by node id)
        #[arg(long)]
        no_meta: bool,

        /// Include the compile trace in JSON output
        #[arg(long, requires = "json")]
        trace: bool,

        /// Also list asset ids referenced from node parameters
        #[arg(long)]
        references: bool,
    },

    /// List the built-in node types
    Types,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compile {
            surface,
            config,
            json,
            no_meta,
            trace,
            references,
        } => compile(&surface, config.as_deref(), json, no_meta, trace, references),
        Commands::Types => list_types(),
    }
}

fn compile(
    surface: &Path,
    config_path: Option<&Path>,
    json: bool,
    no_meta: bool,
    trace: bool,
    references: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => CompilerConfig::load(path)?,
        None => CompilerConfig::default(),
    };
    if no_meta {
        config.load_meta = false;
    }

    let bytes = std::fs::read(surface)
        .with_context(|| format!("Failed to read surface from {}", surface.display()))?;

    let registry = NodeTypeRegistry::with_builtin_nodes();
    let mut log = TraceLog::default();
    let mut graph = BehaviorTreeGraph::new();
    {
        let mut ctx = LoadContext::new(&registry)
            .with_config(config)
            .with_trace(&mut log);
        graph
            .load(&bytes, &mut ctx)
            .with_context(|| format!("Failed to compile {}", surface.display()))?;
    }
    tracing::info!(
        surface = %surface.display(),
        nodes = graph.nodes_count(),
        states_size = graph.nodes_states_size(),
        "Compiled behavior tree"
    );

    let layout = graph.layout();
    let refs = if references {
        graph.asset_references()
    } else {
        Vec::new()
    };

    if json {
        let mut out = serde_json::to_value(&layout)?;
        if references {
            out["references"] = serde_json::to_value(&refs)?;
        }
        if trace {
            out["trace"] = serde_json::to_value(&log)?;
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_layout(&layout);
    if references {
        println!();
        println!("References: {}", refs.len());
        for r in &refs {
            println!("  - {}", r);
        }
    }
    Ok(())
}

fn print_layout(layout: &TreeLayout) {
    println!("Behavior Tree");
    println!("=============");
    println!();
    println!("Nodes: {}", layout.nodes_count);
    println!("State size: {} bytes", layout.nodes_states_size);
    if layout.nodes.is_empty() {
        println!();
        println!("(no root node)");
        return;
    }
    println!();
    println!("{:>5} {:>7} {:>5} {:>6}  {}", "index", "offset", "size", "node", "type");

    // Depth from parent links; parents always precede children in execution order.
    let mut depth = std::collections::HashMap::new();
    for node in &layout.nodes {
        let d = node
            .parent
            .and_then(|p| depth.get(&p).copied())
            .map_or(0, |d: usize| d + 1);
        depth.insert(node.id, d);

        let decorated = if node.kind.is_decorator() { "@" } else { "" };
        println!(
            "{:>5} {:>7} {:>5} {:>6}  {}{}{}",
            node.execution_index,
            node.memory_offset,
            node.state_size,
            node.id,
            "  ".repeat(d),
            decorated,
            node.type_name
        );
    }
}

fn list_types() -> Result<()> {
    let registry = NodeTypeRegistry::with_builtin_nodes();
    println!("Node types: {}", registry.len());
    for handle in registry.types() {
        println!("  - {} ({})", handle.name(), handle.kind());
    }
    Ok(())
}
