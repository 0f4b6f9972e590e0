//! Common test utilities for building flow documents in memory.
use nagare::prelude::*;

/// Creates a bare node of the given kind with no configuration.
#[allow(dead_code)]
pub fn node(id: &str, kind: NodeKind) -> NodeDefinition {
    NodeDefinition {
        id: id.to_string(),
        kind,
        config: NodeConfig::default(),
    }
}

/// Creates a node with a configuration.
#[allow(dead_code)]
pub fn node_with_config(id: &str, kind: NodeKind, config: NodeConfig) -> NodeDefinition {
    NodeDefinition {
        id: id.to_string(),
        kind,
        config,
    }
}

/// Creates an edge binding `target`'s `target_key` input to `source`'s result.
#[allow(dead_code)]
pub fn edge(source: &str, source_key: &str, target: &str, target_key: &str) -> EdgeDefinition {
    EdgeDefinition {
        source: Endpoint {
            node: source.to_string(),
            key: source_key.to_string(),
        },
        target: Endpoint {
            node: target.to_string(),
            key: target_key.to_string(),
        },
    }
}

#[allow(dead_code)]
pub fn pipeline(
    id: &str,
    name: &str,
    nodes: Vec<NodeDefinition>,
    edges: Vec<EdgeDefinition>,
) -> PipelineDefinition {
    PipelineDefinition {
        id: id.to_string(),
        name: name.to_string(),
        nodes,
        edges,
    }
}

/// The smallest meaningful pipeline: `start -> end`, one edge.
#[allow(dead_code)]
pub fn start_end_pipeline(id: &str, name: &str) -> PipelineDefinition {
    pipeline(
        id,
        name,
        vec![node("start", NodeKind::Start), node("finish", NodeKind::End)],
        vec![edge("start", "output", "finish", "input")],
    )
}

/// Wraps pipelines into a document; the first argument becomes main.
#[allow(dead_code)]
pub fn document(main: PipelineDefinition, flows: Vec<PipelineDefinition>) -> FlowDocument {
    FlowDocument { main, flows }
}

/// A diamond dependency: a and b both feed c, start feeds a and b.
#[allow(dead_code)]
pub fn diamond_pipeline() -> PipelineDefinition {
    pipeline(
        "main",
        "Diamond",
        vec![
            node("start", NodeKind::Start),
            node("c", NodeKind::End),
            node("b", NodeKind::Display),
            node("a", NodeKind::Display),
        ],
        vec![
            edge("a", "output", "c", "left"),
            edge("b", "output", "c", "right"),
            edge("start", "output", "a", "input"),
            edge("start", "output", "b", "input"),
        ],
    )
}
