//! # Nagare - Flow-Graph Compiler
//!
//! **Nagare** compiles declarative flow graphs (typed nodes plus directed
//! data-dependency edges) into linear, deterministic asyncio programs. Each
//! pipeline in a document becomes one procedure whose statements execute the
//! graph in dependency order; the graph itself disappears from the output.
//!
//! ## Core Workflow
//!
//! 1. **Load**: parse a flow document into a [`flow::FlowDocument`] - a
//!    table of one main pipeline plus addressable sub-pipelines. Custom
//!    front-end formats plug in through [`flow::IntoFlowDocument`].
//! 2. **Compile**: [`codegen::Compiler::builder`] wraps the document; the
//!    compiler analyzes dependencies, schedules every pipeline
//!    topologically (rejecting cycles), synthesizes a code fragment per
//!    node, and assembles one procedure per pipeline.
//! 3. **Emit**: the result is a [`codegen::CompiledProgram`] - a complete
//!    program module that calls into a small external capability interface
//!    (text generation, embedded scripts, image persistence, tracing).
//!    [`codegen::ArtifactBundle`] writes it to disk together with the
//!    capability module, a dependency manifest, and a README.
//!
//! Compiling the same document twice always produces byte-identical output:
//! scheduling visits nodes in declaration order and dependencies in
//! edge-declaration order, and nothing downstream depends on map iteration.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nagare::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let document = FlowDocument::from_file("flow.json")?;
//!
//!     let compiler = Compiler::builder(document).build();
//!     let program = compiler.compile()?;
//!
//!     println!(
//!         "compiled {} pipelines / {} nodes",
//!         program.summary.pipeline_count, program.summary.node_count
//!     );
//!
//!     ArtifactBundle::new(&program).save("output")?;
//!     Ok(())
//! }
//! ```
//!
//! ## What the compiler does not do
//!
//! It never executes a pipeline, enforces no runtime limits, and implements
//! none of the capabilities the generated program calls. Unknown node kinds
//! and unbound declared parameters degrade (annotated pass-through, null
//! binding) instead of failing, so documents from newer editors keep
//! compiling.

pub mod codegen;
pub mod error;
pub mod flow;
pub mod graph;
pub mod prelude;
