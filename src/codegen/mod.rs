use crate::error::CompileError;
use crate::flow::{FlowDocument, NodeKind};
use crate::graph::{DependencyGraph, schedule};
use itertools::Itertools;

pub mod artifact;
pub mod assembler;
pub mod emitter;
pub mod synth;

pub use artifact::{ArtifactBundle, CompilationSummary, CompiledProgram};

use assembler::assemble;
use emitter::emit_program;

/// Compiles one flow document into a linear program.
///
/// The compiler owns its document for the duration of the run; all derived
/// state (dependency graphs, execution orders) is local to `compile`, so
/// independent documents can be compiled in parallel without coordination.
pub struct Compiler {
    document: FlowDocument,
    sample_input: String,
}

pub struct CompilerBuilder {
    document: FlowDocument,
    sample_input: String,
}

impl CompilerBuilder {
    pub fn new(document: FlowDocument) -> Self {
        Self {
            document,
            sample_input: "Hello World".to_string(),
        }
    }

    /// Overrides the sample input the emitted entry stub passes to the main
    /// pipeline.
    pub fn with_sample_input(mut self, input: &str) -> Self {
        self.sample_input = input.to_string();
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            document: self.document,
            sample_input: self.sample_input,
        }
    }
}

impl Compiler {
    pub fn builder(document: FlowDocument) -> CompilerBuilder {
        CompilerBuilder::new(document)
    }

    /// Runs the full pipeline-by-pipeline compilation: dependency analysis,
    /// topological scheduling, per-node synthesis, and assembly, then emits
    /// the whole program with sub-pipelines first and main last.
    ///
    /// Any [`CompileError`] aborts the entire run; no partial program is
    /// ever produced.
    pub fn compile(self) -> Result<CompiledProgram, CompileError> {
        let mut procedures = Vec::with_capacity(self.document.pipeline_count());

        for pipeline in self.document.pipelines_in_emission_order() {
            let graph = DependencyGraph::analyze(pipeline)?;
            let order = schedule(pipeline, &graph)?;

            for node in &order {
                if let NodeKind::Subflow { target } = &node.kind
                    && self.document.get(target).is_none()
                {
                    tracing::warn!(
                        pipeline = %pipeline.id,
                        node = %node.id,
                        target = %target,
                        "sub-flow call targets a pipeline not present in this document"
                    );
                }
            }

            procedures.push(assemble(pipeline, &order));
        }

        let source = emit_program(&self.document, &procedures, &self.sample_input);
        let summary = summarize(&self.document);
        tracing::info!(
            pipelines = summary.pipeline_count,
            nodes = summary.node_count,
            "compilation finished"
        );
        Ok(CompiledProgram { source, summary })
    }
}

fn summarize(document: &FlowDocument) -> CompilationSummary {
    let node_kinds = document
        .pipelines_in_emission_order()
        .flat_map(|p| p.nodes.iter().map(|n| n.kind.tag().to_string()))
        .sorted()
        .dedup()
        .collect();
    CompilationSummary {
        pipeline_count: document.pipeline_count(),
        node_count: document.node_count(),
        node_kinds,
    }
}
