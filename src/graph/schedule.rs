use super::deps::DependencyGraph;
use crate::error::CycleError;
use crate::flow::{NodeDefinition, PipelineDefinition};
use ahash::AHashMap;

/// A topologically valid linearization of one pipeline's nodes.
pub type ExecutionOrder<'a> = Vec<&'a NodeDefinition>;

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    InProgress,
    Done,
}

/// Linearizes a pipeline's nodes so every node appears after everything it
/// depends on.
///
/// The traversal is a depth-first walk with in-progress/done markers:
/// roots are taken in node-declaration order and each dependency list in
/// edge-declaration order, so the result is fully deterministic. Revisiting
/// an in-progress node means the pipeline has a cycle, which aborts its
/// compilation with [`CycleError`].
pub fn schedule<'a>(
    pipeline: &'a PipelineDefinition,
    graph: &DependencyGraph,
) -> Result<ExecutionOrder<'a>, CycleError> {
    let index: AHashMap<&str, &'a NodeDefinition> = pipeline
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n))
        .collect();

    let mut marks: AHashMap<&str, Mark> = AHashMap::with_capacity(pipeline.nodes.len());
    let mut order: ExecutionOrder<'a> = Vec::with_capacity(pipeline.nodes.len());

    for node in &pipeline.nodes {
        visit(node.id.as_str(), pipeline, graph, &index, &mut marks, &mut order)?;
    }

    tracing::debug!(
        pipeline = %pipeline.id,
        nodes = order.len(),
        "scheduled execution order"
    );
    Ok(order)
}

fn visit<'a>(
    node_id: &'a str,
    pipeline: &'a PipelineDefinition,
    graph: &DependencyGraph,
    index: &AHashMap<&str, &'a NodeDefinition>,
    marks: &mut AHashMap<&'a str, Mark>,
    order: &mut ExecutionOrder<'a>,
) -> Result<(), CycleError> {
    match marks.get(node_id) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            return Err(CycleError {
                pipeline_id: pipeline.id.clone(),
                node_id: node_id.to_string(),
            });
        }
        None => {}
    }

    marks.insert(node_id, Mark::InProgress);
    for dep in graph.dependencies_of(node_id) {
        // The analyzer has already validated every edge endpoint, so a
        // dependency always resolves to a known node here.
        if let Some(&dep_node) = index.get(dep.as_str()) {
            visit(dep_node.id.as_str(), pipeline, graph, index, marks, order)?;
        }
    }
    marks.insert(node_id, Mark::Done);

    if let Some(&node) = index.get(node_id) {
        order.push(node);
    }
    Ok(())
}
