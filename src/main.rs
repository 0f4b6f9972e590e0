use nagare::codegen::{ArtifactBundle, Compiler};
use nagare::flow::FlowDocument;
use std::env;

fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: cargo run -- <path/to/flow.json> [output-dir]");
        std::process::exit(1);
    }

    let flow_path = &args[1];
    let output_dir = args.get(2).map(String::as_str).unwrap_or("output");

    println!("Loading flow document from: {}", flow_path);
    let document = match FlowDocument::from_file(flow_path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Failed to load flow document: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Compiling {} pipelines ({} nodes)...",
        document.pipeline_count(),
        document.node_count()
    );
    let program = match Compiler::builder(document).build().compile() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Compilation failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = ArtifactBundle::new(&program).save(output_dir) {
        eprintln!("Failed to write output bundle: {}", e);
        std::process::exit(1);
    }

    println!("Compilation successful! Output written to '{}'", output_dir);
}
