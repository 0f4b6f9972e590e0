//! Whole-program emission: a fixed preamble, the sub-pipeline procedures in
//! load order, the main procedure last, and a fixed entry stub. Pure text
//! assembly with no further semantic validation.

use super::synth::escape_double_quotes;
use crate::flow::FlowDocument;
use itertools::Itertools;

/// Assembles the final program module from the assembled procedures.
///
/// `procedures` must already be in emission order (sub-pipelines in load
/// order, main last) so every sub-pipeline reference resolves before the
/// main procedure runs.
pub fn emit_program(document: &FlowDocument, procedures: &[String], sample_input: &str) -> String {
    let node_kinds = document
        .pipelines_in_emission_order()
        .flat_map(|p| p.nodes.iter().map(|n| n.kind.tag()))
        .sorted()
        .dedup()
        .join(", ");

    let mut out = String::new();
    out.push_str("#!/usr/bin/env python3\n");
    out.push_str("\"\"\"Generated flow program.\n");
    out.push('\n');
    out.push_str(&format!("Pipelines: {}\n", document.pipeline_count()));
    out.push_str(&format!("Nodes: {}\n", document.node_count()));
    out.push_str(&format!("Node kinds: {node_kinds}\n"));
    out.push_str("\"\"\"\n");
    out.push('\n');
    out.push_str("import asyncio\n");
    out.push_str("import sys\n");
    out.push_str("from pathlib import Path\n");
    out.push('\n');
    out.push_str("sys.path.insert(0, str(Path(__file__).parent))\n");
    out.push('\n');
    out.push_str("from flow_sdk import generate_text, persist_image, run_embedded_script, trace\n");
    out.push('\n');

    for procedure in procedures {
        out.push('\n');
        out.push_str(procedure);
    }

    let sample = escape_double_quotes(sample_input);
    out.push('\n');
    out.push_str("if __name__ == \"__main__\":\n");
    out.push_str("    async def _run():\n");
    out.push_str("        try:\n");
    out.push_str(&format!(
        "            result = await execute_flow(\"{sample}\")\n"
    ));
    out.push_str("            trace(f\"Flow result: {result}\")\n");
    out.push_str("        except Exception as exc:\n");
    out.push_str("            trace(f\"Flow execution failed: {exc}\")\n");
    out.push_str("            sys.exit(1)\n");
    out.push('\n');
    out.push_str("    asyncio.run(_run())\n");
    out
}
