use clap::{Parser, Subcommand};
use nagare::prelude::*;
use std::time::Instant;

/// A deterministic flow-graph compiler CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a flow document into a full output bundle
    Compile {
        /// Path to the flow document JSON file
        flow_document: String,
        /// Directory to write the bundle to
        #[arg(default_value = "output")]
        output_dir: String,
        /// Sample input the emitted entry stub passes to the main pipeline
        #[arg(short, long)]
        sample_input: Option<String>,
    },
    /// Compile a flow document and print the program to stdout
    Emit {
        /// Path to the flow document JSON file
        flow_document: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Compile {
            flow_document,
            output_dir,
            sample_input,
        } => run_compile(&flow_document, &output_dir, sample_input.as_deref()),
        Command::Emit { flow_document } => run_emit(&flow_document),
    }
}

fn run_compile(flow_path: &str, output_dir: &str, sample_input: Option<&str>) {
    let total_start = Instant::now();

    let document = FlowDocument::from_file(flow_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load '{}': {}", flow_path, e)));

    println!(
        "Compiling {} pipelines ({} nodes) from '{}'...",
        document.pipeline_count(),
        document.node_count(),
        flow_path
    );

    let mut builder = Compiler::builder(document);
    if let Some(input) = sample_input {
        builder = builder.with_sample_input(input);
    }
    let program = builder
        .build()
        .compile()
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));

    ArtifactBundle::new(&program)
        .save(output_dir)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to write bundle: {}", e)));

    println!(
        "Compilation successful! {} pipelines emitted in {:?}",
        program.summary.pipeline_count,
        total_start.elapsed()
    );
    println!("Output directory: {}", output_dir);
    println!("Run: cd {} && python flow_executor.py", output_dir);
}

fn run_emit(flow_path: &str) {
    let document = FlowDocument::from_file(flow_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load '{}': {}", flow_path, e)));

    let program = Compiler::builder(document)
        .build()
        .compile()
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));

    print!("{}", program.source);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
