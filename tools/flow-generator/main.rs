use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::{Value, json};
use std::fs;

/// A CLI tool to generate random flow documents for compiler testing
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// The minimum number of intermediate nodes per pipeline
    #[arg(long, default_value_t = 2)]
    min: usize,

    /// The maximum number of intermediate nodes per pipeline
    #[arg(long, default_value_t = 8)]
    max: usize,

    /// How many sub-pipelines to generate
    #[arg(long, default_value_t = 2)]
    flows: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) cannot be greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }

    println!(
        "Generating flow document ({} sub-pipelines, {} to {} intermediate nodes each)...",
        cli.flows, cli.min, cli.max
    );

    let flows: Vec<Value> = (0..cli.flows)
        .map(|i| generate_pipeline(&mut rng, &format!("sub_{}", i), cli.min, cli.max))
        .collect();
    let main = generate_pipeline(&mut rng, "main", cli.min, cli.max);

    let document = json!({ "main": main, "flows": flows });
    let json_output = serde_json::to_string_pretty(&document)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved flow document to '{}'",
        cli.output
    );
    Ok(())
}

/// Generates one linear pipeline: start, a random run of intermediate
/// nodes, end, chained by edges.
fn generate_pipeline(rng: &mut ThreadRng, id: &str, min: usize, max: usize) -> Value {
    let middle_count = rng.random_range(min..=max);

    let mut nodes = vec![json!({"id": "start", "type": "start", "config": {"name": "Start"}})];
    for i in 0..middle_count {
        nodes.push(generate_node(rng, &format!("n{}", i)));
    }
    nodes.push(json!({"id": "finish", "type": "end", "config": {"name": "End"}}));

    // Chain the nodes linearly, binding each node's natural input key.
    let mut edges = Vec::new();
    let endpoints: Vec<(String, &str)> = nodes
        .iter()
        .map(|n| {
            let id = n["id"].as_str().unwrap().to_string();
            let key = match n["type"].as_str().unwrap() {
                "llm" => "prompt",
                "python" => "value",
                _ => "input",
            };
            (id, key)
        })
        .collect();
    for pair in endpoints.windows(2) {
        edges.push(json!({
            "source": {"node": pair[0].0, "key": "output"},
            "target": {"node": pair[1].0, "key": pair[1].1},
        }));
    }

    json!({
        "id": id,
        "name": format!("Generated pipeline {}", id),
        "nodes": nodes,
        "edges": edges,
    })
}

fn generate_node(rng: &mut ThreadRng, id: &str) -> Value {
    match rng.random_range(0..4) {
        0 => json!({
            "id": id,
            "type": "text",
            "config": {"name": format!("Text {}", id), "text": format!("payload {}", rng.random_range(0..1000))},
        }),
        1 => json!({
            "id": id,
            "type": "display",
            "config": {"name": format!("Display {}", id)},
        }),
        2 => json!({
            "id": id,
            "type": "llm",
            "config": {
                "name": format!("Summarize {}", id),
                "model": "gpt-4o-mini",
                "systemPrompt": "Summarize the input in one sentence.",
            },
        }),
        _ => json!({
            "id": id,
            "type": "python",
            "config": {
                "name": format!("Transform {}", id),
                "params": [{"name": "value"}],
                "code": "processed = str(value).upper()\nprocessed",
            },
        }),
    }
}
