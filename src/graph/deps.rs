use crate::error::ReferenceError;
use crate::flow::PipelineDefinition;
use ahash::AHashMap;

/// The producer/consumer graph of one pipeline: for every node, the nodes it
/// depends on, in edge-declaration order.
///
/// Declaration order is load-bearing: the scheduler walks dependency lists
/// in this order so identical documents always compile to identical output.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependencies: AHashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Derives the dependency graph from a pipeline's edges in O(nodes + edges).
    ///
    /// Every edge makes the target depend on the source; nodes with no
    /// incoming edge get an empty dependency list. Fails with
    /// [`ReferenceError`] if an edge endpoint names a node that does not
    /// exist in the pipeline.
    pub fn analyze(pipeline: &PipelineDefinition) -> Result<Self, ReferenceError> {
        let mut dependencies: AHashMap<String, Vec<String>> =
            AHashMap::with_capacity(pipeline.nodes.len());
        for node in &pipeline.nodes {
            dependencies.insert(node.id.clone(), Vec::new());
        }

        for edge in &pipeline.edges {
            if !dependencies.contains_key(&edge.source.node) {
                return Err(ReferenceError {
                    pipeline_id: pipeline.id.clone(),
                    missing_node_id: edge.source.node.clone(),
                    referenced_by: edge.target.node.clone(),
                });
            }
            let deps = dependencies.get_mut(&edge.target.node).ok_or_else(|| {
                ReferenceError {
                    pipeline_id: pipeline.id.clone(),
                    missing_node_id: edge.target.node.clone(),
                    referenced_by: edge.source.node.clone(),
                }
            })?;
            deps.push(edge.source.node.clone());
        }

        Ok(Self { dependencies })
    }

    /// The dependency list of one node, in edge-declaration order.
    pub fn dependencies_of(&self, node_id: &str) -> &[String] {
        self.dependencies
            .get(node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}
