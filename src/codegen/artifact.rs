use crate::error::CompileError;
use std::fs;
use std::path::Path;

/// The fixed capability module copied into every output bundle. The
/// generated program imports `generate_text`, `run_embedded_script`,
/// `persist_image`, and `trace` from it.
pub const CAPABILITY_MODULE: &str = include_str!("../../runtime/flow_sdk.py");

const REQUIREMENTS: &[&str] = &["aiohttp>=3.8.0", "aiofiles>=0.8.0"];

/// Aggregate statistics for one compiled document, used by the emitted
/// header and the bundle README.
#[derive(Debug, Clone)]
pub struct CompilationSummary {
    pub pipeline_count: usize,
    pub node_count: usize,
    /// Sorted, deduplicated node-kind tags seen across all pipelines.
    pub node_kinds: Vec<String>,
}

/// The result of one compilation run: the emitted program module plus its
/// summary.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    pub source: String,
    pub summary: CompilationSummary,
}

/// Writes the full output bundle for a compiled program: the program module,
/// the copied capability module, the dependency manifest, and a
/// human-readable summary.
pub struct ArtifactBundle<'a> {
    program: &'a CompiledProgram,
}

impl<'a> ArtifactBundle<'a> {
    pub fn new(program: &'a CompiledProgram) -> Self {
        Self { program }
    }

    /// Writes all four artifacts under `dir`, creating it if needed.
    /// Compilation errors abort before this is ever reached, so a bundle is
    /// only written for a fully compiled document.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<(), CompileError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| CompileError::ArtifactIo {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;

        self.write(dir, "flow_executor.py", &self.program.source)?;
        self.write(dir, "flow_sdk.py", CAPABILITY_MODULE)?;
        self.write(dir, "requirements.txt", &(REQUIREMENTS.join("\n") + "\n"))?;
        self.write(dir, "README.md", &self.render_readme())?;

        tracing::info!(dir = %dir.display(), "wrote artifact bundle");
        Ok(())
    }

    fn write(&self, dir: &Path, file: &str, content: &str) -> Result<(), CompileError> {
        let path = dir.join(file);
        fs::write(&path, content).map_err(|e| CompileError::ArtifactIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn render_readme(&self) -> String {
        let summary = &self.program.summary;
        format!(
            "# Generated flow program\n\
             \n\
             This directory was produced by the nagare flow compiler. The pipeline\n\
             graph has been flattened into plain Python function calls; there are no\n\
             nodes or edges left at runtime.\n\
             \n\
             - Pipelines: {}\n\
             - Nodes: {}\n\
             - Node kinds: {}\n\
             \n\
             ## Files\n\
             \n\
             - `flow_executor.py` - the generated program, one async function per pipeline\n\
             - `flow_sdk.py` - the fixed capability module (text generation, embedded\n\
               scripts, image persistence, tracing)\n\
             - `requirements.txt` - Python dependencies of the capability module\n\
             \n\
             ## Running\n\
             \n\
             ```bash\n\
             pip install -r requirements.txt\n\
             export OPENAI_API_KEY=\"your-api-key\"\n\
             python flow_executor.py\n\
             ```\n",
            summary.pipeline_count,
            summary.node_count,
            summary.node_kinds.join(", "),
        )
    }
}
