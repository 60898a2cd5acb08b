//! LS3 triangle counter
//!
//! Prints the triangle load of an LS3 file and every file it links to as an
//! indented tree.

#![forbid(unsafe_code)]

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tricount::{CounterConfig, GraphBuilder, TreePrinter};

/// Command-line arguments for the triangle counter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root LS3 file, absolute or relative to the working directory
    #[arg(value_name = "FILE")]
    file_path: PathBuf,

    /// Data root for references with directory components
    #[arg(long, value_name = "DIR", env = "TRICOUNT_DATA_ROOT")]
    data_root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "tricount=debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = CounterConfig::new();
    let mut printer = TreePrinter::new();
    if let Some(data_root) = &args.data_root {
        let data_root = dunce::canonicalize(data_root).unwrap_or_else(|_| data_root.clone());
        log::debug!("Data root: {}", data_root.display());
        config = config.with_data_root(data_root.clone());
        printer = printer.with_data_root(data_root);
    }

    let graph = match GraphBuilder::new(config).build(&args.file_path) {
        Ok(graph) => graph,
        Err(e) => {
            println!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    for diagnostic in graph.diagnostics() {
        println!("{}", diagnostic);
    }

    if let Some(root) = graph.root() {
        print!("{}", printer.render(&graph, root));
        log::info!(
            "{} distinct files, {} triangles",
            graph.len(),
            graph[root].total_triangle_count
        );
    }

    ExitCode::SUCCESS
}
