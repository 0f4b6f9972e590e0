//! Pipeline assembly: ordered fragments become one suspension-capable
//! procedure wrapped in a uniform trace/re-raise template.

use super::synth::{Bindings, INDENT, escape_double_quotes, proc_name, synthesize};
use crate::flow::{MAIN_PIPELINE_ID, NodeKind, PipelineDefinition};
use crate::graph::ExecutionOrder;

/// Concatenates a pipeline's fragments in execution order into one
/// procedure.
///
/// The template is identical for every pipeline: trace entry, execute the
/// body, trace success and return the terminal node's result, and on any
/// failure trace it and re-raise unmodified. The main pipeline differs only
/// in its fixed external name and docstring role. A pipeline without an
/// `end` node returns `None`.
pub fn assemble(pipeline: &PipelineDefinition, order: &ExecutionOrder) -> String {
    let proc = proc_name(&pipeline.id);
    let name = pipeline.display_name();
    let traced_name = escape_double_quotes(name);
    let role = if pipeline.id == MAIN_PIPELINE_ID {
        "Main pipeline"
    } else {
        "Sub-pipeline"
    };

    let mut out = String::new();
    out.push_str(&format!("async def {proc}(input_data=None):\n"));
    out.push_str(&format!("    \"\"\"{role}: {name}\"\"\"\n"));
    out.push_str("    try:\n");
    out.push_str(&format!(
        "{INDENT}trace(\"Entering pipeline '{traced_name}'\")\n\n"
    ));

    let mut terminal: Option<String> = None;
    for node in order {
        let bindings = Bindings::resolve(&pipeline.edges, &node.id);
        let fragment = synthesize(node, &bindings);
        if terminal.is_none() && matches!(node.kind, NodeKind::End) {
            terminal = Some(fragment.result.clone());
        }
        for line in &fragment.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    let result = terminal.unwrap_or_else(|| "None".to_string());
    out.push_str(&format!(
        "{INDENT}trace(\"Pipeline '{traced_name}' completed\")\n"
    ));
    out.push_str(&format!("{INDENT}return {result}\n"));
    out.push_str("    except Exception as exc:\n");
    out.push_str(&format!(
        "{INDENT}trace(f\"Pipeline '{traced_name}' failed: {{exc}}\")\n"
    ));
    out.push_str(&format!("{INDENT}raise\n"));
    out
}
