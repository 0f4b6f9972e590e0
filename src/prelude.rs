//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the nagare crate so callers
//! can get the whole compile workflow from a single `use`.

// Core compilation
pub use crate::codegen::{ArtifactBundle, CompilationSummary, CompiledProgram, Compiler};

// Document model
pub use crate::flow::{
    BranchDefinition, EdgeDefinition, Endpoint, FlowDocument, IntoFlowDocument, NodeConfig,
    NodeDefinition, NodeKind, ParamDefinition, PipelineDefinition,
};

// Graph derivation
pub use crate::graph::{DependencyGraph, ExecutionOrder, schedule};

// Error types
pub use crate::error::{CompileError, CycleError, LoadError, ReferenceError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
