//! Per-node code synthesis.
//!
//! Every node kind maps to one pure synthesis function. A node, together
//! with its resolved input bindings, becomes a [`Fragment`]: a descriptive
//! comment, zero or more Python statements, and the symbol the rest of the
//! pipeline uses to refer to the node's result.

use crate::flow::{EdgeDefinition, NodeDefinition, NodeKind, ParamDefinition};
use itertools::Itertools;

/// Statement indentation inside a pipeline procedure (`async def` + `try`).
pub const INDENT: &str = "        ";

/// Continuation indentation for multi-line capability calls.
const CONT: &str = "            ";

/// The symbol every pipeline procedure receives its input under.
pub const PIPELINE_INPUT: &str = "input_data";

/// The fixed external name of the main pipeline's procedure.
pub const MAIN_PROC_NAME: &str = "execute_flow";

/// The synthesized operations for one node plus its result-binding symbol.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Fully indented statement lines, ready for concatenation.
    pub lines: Vec<String>,
    /// The `result_<node-id>` symbol later nodes bind against.
    pub result: String,
}

/// The resolved input bindings of one node: input key to the producing
/// node's result symbol, in edge-declaration order. A key bound twice keeps
/// its first position but takes the later producer, mirroring how the
/// bindings behave as an insertion-ordered mapping.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    entries: Vec<(String, String)>,
}

impl Bindings {
    /// Indexes a pipeline's edges on one target node.
    pub fn resolve(edges: &[EdgeDefinition], node_id: &str) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        for edge in edges.iter().filter(|e| e.target.node == node_id) {
            let symbol = result_symbol(&edge.source.node);
            match entries.iter_mut().find(|(key, _)| *key == edge.target.key) {
                Some(entry) => entry.1 = symbol,
                None => entries.push((edge.target.key.clone(), symbol)),
            }
        }
        Self { entries }
    }

    /// The symbol bound to a named input key, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, symbol)| symbol.as_str())
    }

    /// The first bound input in edge-declaration order.
    pub fn first(&self) -> Option<&str> {
        self.entries.first().map(|(_, symbol)| symbol.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rewrites an arbitrary id into a valid Python identifier.
pub fn sanitize_ident(raw: &str) -> String {
    let mut ident: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() {
        ident.push('_');
    }
    if ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// The result-binding symbol for a node.
pub fn result_symbol(node_id: &str) -> String {
    format!("result_{}", sanitize_ident(node_id))
}

/// The procedure name a pipeline is emitted (and called) under. The main
/// pipeline always gets the fixed external name; sub-pipelines are named by
/// their sanitized id so definition and call sites can never disagree.
pub fn proc_name(pipeline_id: &str) -> String {
    if pipeline_id == crate::flow::MAIN_PIPELINE_ID {
        MAIN_PROC_NAME.to_string()
    } else {
        sanitize_ident(pipeline_id)
    }
}

pub(crate) fn escape_double_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

pub(crate) fn escape_triple_quotes(text: &str) -> String {
    text.replace("\"\"\"", "\\\"\\\"\\\"")
}

/// Synthesizes the code fragment for one node given its resolved bindings.
pub fn synthesize(node: &NodeDefinition, bindings: &Bindings) -> Fragment {
    let result = result_symbol(&node.id);
    let mut lines = Vec::new();

    let mut comment = format!("{INDENT}# {}", node.display_name());
    if let Some(description) = &node.config.description
        && !description.is_empty()
    {
        comment.push_str(&format!(" - {description}"));
    }
    lines.push(comment);

    match &node.kind {
        NodeKind::Start => {
            lines.push(format!("{INDENT}{result} = {PIPELINE_INPUT}"));
        }
        NodeKind::Text => synth_text(node, &result, &mut lines),
        NodeKind::End => {
            let input = bindings.first().unwrap_or(PIPELINE_INPUT);
            lines.push(format!("{INDENT}{result} = {input}"));
        }
        NodeKind::Display => synth_display(node, bindings, &result, &mut lines),
        NodeKind::Llm => synth_llm(node, bindings, &result, &mut lines),
        NodeKind::Image => synth_image(node, bindings, &result, &mut lines),
        NodeKind::Branch => synth_branch(node, bindings, &result, &mut lines),
        NodeKind::Python => synth_python(node, bindings, &result, &mut lines),
        NodeKind::JavaScript => synth_javascript(node, bindings, &result, &mut lines),
        NodeKind::Subflow { target } => {
            let input = bindings.first().unwrap_or(PIPELINE_INPUT);
            let callee = proc_name(target);
            lines.push(format!("{INDENT}{result} = await {callee}({input})"));
        }
        NodeKind::Unrecognized { tag } => {
            let input = bindings.first().unwrap_or(PIPELINE_INPUT);
            lines.push(format!(
                "{INDENT}{result} = {input}  # unrecognized node kind: {tag}"
            ));
        }
    }

    Fragment { lines, result }
}

fn synth_text(node: &NodeDefinition, result: &str, lines: &mut Vec<String>) {
    let text = escape_double_quotes(node.config.text.as_deref().unwrap_or(""));
    lines.push(format!("{INDENT}{result} = \"{text}\""));
}

fn synth_display(node: &NodeDefinition, bindings: &Bindings, result: &str, lines: &mut Vec<String>) {
    let input = bindings.first().unwrap_or(PIPELINE_INPUT);
    let name = escape_double_quotes(node.display_name());
    lines.push(format!("{INDENT}{result} = {input}"));
    lines.push(format!("{INDENT}trace(f\"[{name}] {{{result}}}\")"));
}

fn synth_llm(node: &NodeDefinition, bindings: &Bindings, result: &str, lines: &mut Vec<String>) {
    let model = escape_double_quotes(node.config.model.as_deref().unwrap_or("gpt-3.5-turbo"));
    let system_prompt = escape_double_quotes(node.config.system_prompt.as_deref().unwrap_or(""));
    let prompt = bindings.get("prompt").unwrap_or(PIPELINE_INPUT);
    lines.push(format!("{INDENT}{result} = await generate_text("));
    lines.push(format!("{CONT}model=\"{model}\","));
    lines.push(format!("{CONT}system_prompt=\"\"\"{system_prompt}\"\"\","));
    lines.push(format!("{CONT}user_prompt={prompt}"));
    lines.push(format!("{INDENT})"));
}

fn synth_image(node: &NodeDefinition, bindings: &Bindings, result: &str, lines: &mut Vec<String>) {
    let src = bindings.get("src").unwrap_or(PIPELINE_INPUT);
    let name = escape_double_quotes(node.display_name());
    lines.push(format!("{INDENT}{result} = await persist_image("));
    lines.push(format!("{CONT}src={src},"));
    lines.push(format!("{CONT}id=\"{}\"", node.id));
    lines.push(format!("{INDENT})"));
    lines.push(format!(
        "{INDENT}trace(f\"[{name}] image stored at {{{result}}}\")"
    ));
}

/// Branch nodes run their script through the embedded-script capability with
/// a synthesized preamble: the bound input as a variable plus one constant
/// per declared branch binding the branch name to its id. The script's value
/// is interpreted by the caller as a branch id, an ordered sequence of
/// branch ids, or a mapping from branch id to associated data.
fn synth_branch(node: &NodeDefinition, bindings: &Bindings, result: &str, lines: &mut Vec<String>) {
    let input = bindings.first().unwrap_or(PIPELINE_INPUT);
    let code = escape_triple_quotes(node.config.code.as_deref().unwrap_or(""));

    let mut script = String::from("const input = arguments[0];\n");
    for branch in &node.config.branches {
        script.push_str(&format!("const {} = \"{}\";\n", branch.name, branch.id));
    }
    script.push('\n');
    script.push_str(&code);

    lines.push(format!("{INDENT}{result} = await run_embedded_script("));
    lines.push(format!("{CONT}code=\"\"\"{script}\"\"\","));
    lines.push(format!("{CONT}params={{\"input\": {input}}}"));
    lines.push(format!("{INDENT})"));
}

/// Native scripted nodes are inlined into the generated program. A body
/// containing a return statement is restructured into a nested callable
/// invoked immediately; otherwise the body runs inline and its last
/// non-control-flow, non-side-effecting line is taken as the result
/// expression. Both checks are textual heuristics, not parses.
fn synth_python(node: &NodeDefinition, bindings: &Bindings, result: &str, lines: &mut Vec<String>) {
    let code = unwrap_main_def(node.config.code.as_deref().unwrap_or(""));

    push_param_preamble(&node.config.params, bindings, lines);

    if code.contains("return ") {
        let names = node.config.params.iter().map(|p| p.name.as_str()).join(", ");
        lines.push(format!("{INDENT}def _inline_fn({names}):"));
        for line in code.lines() {
            if line.trim().is_empty() {
                lines.push(String::new());
            } else {
                lines.push(format!("{INDENT}    {line}"));
            }
        }
        lines.push(format!("{INDENT}{result} = _inline_fn({names})"));
    } else {
        for line in code.lines() {
            if line.trim().is_empty() {
                lines.push(String::new());
            } else {
                lines.push(format!("{INDENT}{line}"));
            }
        }
        match result_expression(&code) {
            Some(expr) => lines.push(format!("{INDENT}{result} = {expr}")),
            None => lines.push(format!("{INDENT}{result} = None")),
        }
    }
}

/// Foreign scripted nodes always execute through the embedded-script
/// capability; the parameter bindings travel as the structured `params`
/// mapping, with declared-but-unbound parameters passed as `None`.
fn synth_javascript(
    node: &NodeDefinition,
    bindings: &Bindings,
    result: &str,
    lines: &mut Vec<String>,
) {
    let code = wrap_async_unit(node.config.code.as_deref().unwrap_or(""));

    let params = if node.config.params.is_empty() {
        "{}".to_string()
    } else {
        let body = node
            .config
            .params
            .iter()
            .map(|p| match bindings.get(&p.name) {
                Some(symbol) => format!("\"{}\": {}", p.name, symbol),
                None => format!("\"{}\": None", p.name),
            })
            .join(", ");
        format!("{{{body}}}")
    };

    lines.push(format!("{INDENT}{result} = await run_embedded_script("));
    lines.push(format!("{CONT}code=r\"\"\"{code}\"\"\","));
    lines.push(format!("{CONT}params={params}"));
    lines.push(format!("{INDENT})"));
}

/// Binds each declared parameter to its input symbol, or an explicit `None`
/// sentinel when nothing is mapped. Undeclared parameter references inside
/// the body simply never get a binding; compilation does not fail.
fn push_param_preamble(params: &[ParamDefinition], bindings: &Bindings, lines: &mut Vec<String>) {
    for param in params {
        match bindings.get(&param.name) {
            Some(symbol) => lines.push(format!("{INDENT}{} = {}", param.name, symbol)),
            None => lines.push(format!("{INDENT}{} = None", param.name)),
        }
    }
}

/// Strips a `def main(...)` header and one level of indentation, leaving
/// just the body. Editors commonly wrap scripted-node bodies this way.
pub(crate) fn unwrap_main_def(code: &str) -> String {
    let clean = code.trim();
    if !clean.starts_with("def main(") {
        return clean.to_string();
    }
    clean
        .lines()
        .skip(1)
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix("    ").unwrap_or(line)
            }
        })
        .join("\n")
}

/// Line prefixes that disqualify a trailing line from being treated as the
/// inline result expression.
const RESULT_STOP_PREFIXES: &[&str] = &[
    "print(", "plt.", "import ", "from ", "if ", "for ", "while ", "def ", "class ", "try:",
    "except", "with ",
];

/// Heuristic: the last non-empty line of an inline body is its result,
/// unless it looks like control flow or a side effect.
pub(crate) fn result_expression(code: &str) -> Option<String> {
    let last = code.trim().lines().last()?.trim();
    if last.is_empty() || RESULT_STOP_PREFIXES.iter().any(|p| last.starts_with(p)) {
        return None;
    }
    Some(last.to_string())
}

/// Heuristic: a body that awaits but is not already a self-invoking async
/// unit gets wrapped into one, so the embedded-script capability can run it
/// to completion.
pub(crate) fn wrap_async_unit(code: &str) -> String {
    if code.contains("await ") && !code.trim_start().starts_with("(async") {
        format!("(async () => {{\n{code}\n}})()")
    } else {
        code.to_string()
    }
}
