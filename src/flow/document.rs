use super::definition::{
    EdgeDefinition, NodeConfig, NodeDefinition, NodeKind, PipelineDefinition,
};
use crate::error::LoadError;
use ahash::AHashSet;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The reserved id of the designated main pipeline.
pub const MAIN_PIPELINE_ID: &str = "main";

/// The in-memory pipeline table for one flow document: the designated main
/// pipeline plus its addressable sub-pipelines in load order.
///
/// The table is immutable once loaded; every derived structure (dependency
/// graphs, execution orders) is computed per compilation and discarded.
#[derive(Debug, Clone, Default)]
pub struct FlowDocument {
    pub main: PipelineDefinition,
    pub flows: Vec<PipelineDefinition>,
}

// --- Raw deserialization structs (input format specific) ---
// These match the wire shape of a flow document and are only used here.

#[derive(Deserialize)]
struct RawDocument {
    main: RawPipeline,
    #[serde(default)]
    flows: Vec<RawPipeline>,
}

#[derive(Deserialize)]
struct RawPipeline {
    id: Option<String>,
    name: Option<String>,
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<EdgeDefinition>,
}

#[derive(Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    config: NodeConfig,
}

impl FlowDocument {
    /// Parses a serialized flow document.
    ///
    /// Fails with [`LoadError`] on malformed JSON, a sub-pipeline id that
    /// collides with `"main"`, a duplicate sub-pipeline id, or duplicate
    /// node ids within one pipeline.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let raw: RawDocument =
            serde_json::from_str(json).map_err(|e| LoadError::JsonParse(e.to_string()))?;

        let main = convert_pipeline(raw.main, MAIN_PIPELINE_ID.to_string())?;

        let mut flows = Vec::with_capacity(raw.flows.len());
        let mut seen_ids: AHashSet<String> = AHashSet::new();
        for (index, raw_flow) in raw.flows.into_iter().enumerate() {
            let id = raw_flow
                .id
                .clone()
                .ok_or(LoadError::MissingPipelineId(index))?;
            if id == MAIN_PIPELINE_ID {
                return Err(LoadError::ReservedPipelineId(id));
            }
            if !seen_ids.insert(id.clone()) {
                return Err(LoadError::DuplicatePipelineId(id));
            }
            flows.push(convert_pipeline(raw_flow, id)?);
        }

        tracing::debug!(
            pipelines = flows.len() + 1,
            "loaded flow document"
        );
        Ok(Self { main, flows })
    }

    /// Reads and parses a flow document from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Looks up a pipeline by id, with `"main"` resolving to the main pipeline.
    pub fn get(&self, pipeline_id: &str) -> Option<&PipelineDefinition> {
        if pipeline_id == MAIN_PIPELINE_ID {
            Some(&self.main)
        } else {
            self.flows.iter().find(|f| f.id == pipeline_id)
        }
    }

    /// All pipelines in emission order: sub-pipelines in load order, main last.
    pub fn pipelines_in_emission_order(&self) -> impl Iterator<Item = &PipelineDefinition> {
        self.flows.iter().chain(std::iter::once(&self.main))
    }

    pub fn pipeline_count(&self) -> usize {
        self.flows.len() + 1
    }

    pub fn node_count(&self) -> usize {
        self.pipelines_in_emission_order()
            .map(|p| p.nodes.len())
            .sum()
    }
}

fn convert_pipeline(raw: RawPipeline, id: String) -> Result<PipelineDefinition, LoadError> {
    let mut nodes = Vec::with_capacity(raw.nodes.len());
    let mut seen_nodes: AHashSet<String> = AHashSet::new();
    for raw_node in raw.nodes {
        if !seen_nodes.insert(raw_node.id.clone()) {
            return Err(LoadError::DuplicateNodeId {
                pipeline_id: id.clone(),
                node_id: raw_node.id,
            });
        }
        let kind = parse_node_kind(&raw_node.kind, &raw_node.config).ok_or_else(|| {
            LoadError::MissingSubflowTarget {
                pipeline_id: id.clone(),
                node_id: raw_node.id.clone(),
            }
        })?;
        nodes.push(NodeDefinition {
            id: raw_node.id,
            kind,
            config: raw_node.config,
        });
    }

    Ok(PipelineDefinition {
        id,
        name: raw.name.unwrap_or_default(),
        nodes,
        edges: raw.edges,
    })
}

/// Maps a document-side `type` tag to a [`NodeKind`].
///
/// Returns `None` only for a `"flow"` node without a `flowId` in its config.
/// The legacy `flow_<id>` tag convention is still accepted and normalized:
/// the whole tag is the target pipeline id, matching how older documents
/// named their sub-pipelines.
fn parse_node_kind(tag: &str, config: &NodeConfig) -> Option<NodeKind> {
    let kind = match tag {
        "start" => NodeKind::Start,
        "text" => NodeKind::Text,
        "end" => NodeKind::End,
        "display" => NodeKind::Display,
        "llm" => NodeKind::Llm,
        "image" => NodeKind::Image,
        "branch" => NodeKind::Branch,
        "python" => NodeKind::Python,
        "javascript" => NodeKind::JavaScript,
        "flow" => NodeKind::Subflow {
            target: config.flow_id.clone()?,
        },
        other if other.starts_with("flow_") => NodeKind::Subflow {
            target: other.to_string(),
        },
        other => NodeKind::Unrecognized {
            tag: other.to_string(),
        },
    };
    Some(kind)
}
