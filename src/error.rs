use thiserror::Error;

/// Errors that can occur while loading a flow document into the pipeline table.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    #[error("Failed to parse flow document JSON: {0}")]
    JsonParse(String),

    #[error("Failed to read flow document '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Sub-pipeline id '{0}' collides with the reserved id 'main'")]
    ReservedPipelineId(String),

    #[error("Duplicate sub-pipeline id '{0}'")]
    DuplicatePipelineId(String),

    #[error("Sub-pipeline at index {0} has no 'id' field")]
    MissingPipelineId(usize),

    #[error("Duplicate node id '{node_id}' in pipeline '{pipeline_id}'")]
    DuplicateNodeId {
        pipeline_id: String,
        node_id: String,
    },

    #[error("Sub-flow node '{node_id}' in pipeline '{pipeline_id}' has no 'flowId' in its config")]
    MissingSubflowTarget {
        pipeline_id: String,
        node_id: String,
    },
}

/// A dependency cycle was found while scheduling one pipeline.
#[derive(Error, Debug, Clone)]
#[error("Dependency cycle detected in pipeline '{pipeline_id}' at node '{node_id}'")]
pub struct CycleError {
    pub pipeline_id: String,
    pub node_id: String,
}

/// An edge references a node id that does not exist in its pipeline.
#[derive(Error, Debug, Clone)]
#[error(
    "Edge in pipeline '{pipeline_id}' references unknown node '{missing_node_id}' (connected to '{referenced_by}')"
)]
pub struct ReferenceError {
    pub pipeline_id: String,
    pub missing_node_id: String,
    pub referenced_by: String,
}

/// Umbrella error for a whole compilation run. Any variant aborts the run;
/// no partial output is ever written.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("Failed to write artifact '{path}': {message}")]
    ArtifactIo { path: String, message: String },
}
