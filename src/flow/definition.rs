use serde::{Deserialize, Serialize};

/// The canonical definition of one pipeline: a named DAG of nodes plus the
/// data-dependency edges between them. This is the unit the compiler
/// schedules and assembles into a single procedure.
#[derive(Debug, Clone, Default)]
pub struct PipelineDefinition {
    pub id: String,
    pub name: String,
    pub nodes: Vec<NodeDefinition>,
    pub edges: Vec<EdgeDefinition>,
}

impl PipelineDefinition {
    /// Display name falls back to the pipeline id when none was declared.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn find_node(&self, node_id: &str) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|n| n.id == node_id)
    }
}

/// One computation unit in a pipeline.
#[derive(Debug, Clone)]
pub struct NodeDefinition {
    pub id: String,
    pub kind: NodeKind,
    pub config: NodeConfig,
}

impl NodeDefinition {
    /// Declared name, falling back to the node id.
    pub fn display_name(&self) -> &str {
        match &self.config.name {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}

/// The closed set of node kinds the synthesizer understands, plus one open
/// fallback so future kinds degrade to a pass-through instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Produces the pipeline input.
    Start,
    /// Produces a configured literal text.
    Text,
    /// Marks the pipeline's terminal value.
    End,
    /// Pass-through that traces its input.
    Display,
    /// Text-generation capability call.
    Llm,
    /// Image-persistence capability call.
    Image,
    /// Embedded script selecting one or more declared branches.
    Branch,
    /// Scripted node inlined into the generated program.
    Python,
    /// Scripted node executed through the embedded-script capability.
    JavaScript,
    /// Invocation of another pipeline in the same document, identified by an
    /// explicit target id rather than a name convention.
    Subflow { target: String },
    /// Anything else. Compilation does not fail; the node becomes an
    /// annotated pass-through.
    Unrecognized { tag: String },
}

impl NodeKind {
    /// The document-side tag for this kind, used in summaries and traces.
    pub fn tag(&self) -> &str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Text => "text",
            NodeKind::End => "end",
            NodeKind::Display => "display",
            NodeKind::Llm => "llm",
            NodeKind::Image => "image",
            NodeKind::Branch => "branch",
            NodeKind::Python => "python",
            NodeKind::JavaScript => "javascript",
            NodeKind::Subflow { .. } => "flow",
            NodeKind::Unrecognized { tag } => tag,
        }
    }
}

/// Open configuration mapping for a node. Every field is optional; each kind
/// reads only the fields it cares about and ignores the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    pub text: Option<String>,
    pub code: Option<String>,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub params: Vec<ParamDefinition>,
    pub branches: Vec<BranchDefinition>,
    pub flow_id: Option<String>,
}

/// A parameter a scripted node declares. Parameters with no incoming edge
/// are bound to an explicit null sentinel at synthesis time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDefinition {
    pub name: String,
}

/// One selectable branch of a `branch` node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchDefinition {
    pub id: String,
    pub name: String,
}

/// Declares that `target`'s named input is bound to `source`'s result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDefinition {
    pub source: Endpoint,
    pub target: Endpoint,
}

/// One end of an edge: a node id and the output/input key on that node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub node: String,
    pub key: String,
}
