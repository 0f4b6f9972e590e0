//! Tests for per-node code synthesis and pipeline assembly.
mod common;
use common::*;
use nagare::codegen::synth::{Bindings, proc_name, result_symbol, sanitize_ident, synthesize};
use nagare::prelude::*;

fn synth_lines(node: &NodeDefinition, edges: &[EdgeDefinition]) -> String {
    let bindings = Bindings::resolve(edges, &node.id);
    synthesize(node, &bindings).lines.join("\n")
}

#[test]
fn test_symbols_are_valid_python_identifiers() {
    assert_eq!(sanitize_ident("llmKeywords"), "llmKeywords");
    assert_eq!(sanitize_ident("node-1"), "node_1");
    assert_eq!(sanitize_ident("1st"), "_1st");
    assert_eq!(result_symbol("my-node"), "result_my_node");
    assert_eq!(proc_name("main"), "execute_flow");
    assert_eq!(proc_name("flow-summarize"), "flow_summarize");
}

#[test]
fn test_text_node_escapes_quotes() {
    let config = NodeConfig {
        text: Some("hi \"there\"".to_string()),
        ..Default::default()
    };
    let n = node_with_config("t", NodeKind::Text, config);

    let lines = synth_lines(&n, &[]);
    assert!(lines.contains(r#"result_t = "hi \"there\"""#));
}

#[test]
fn test_start_and_end_nodes_pass_data_through() {
    let start = node("start", NodeKind::Start);
    assert!(synth_lines(&start, &[]).contains("result_start = input_data"));

    let finish = node("finish", NodeKind::End);
    let edges = vec![edge("start", "output", "finish", "input")];
    assert!(synth_lines(&finish, &edges).contains("result_finish = result_start"));

    // An end node without a bound input falls back to the pipeline input.
    assert!(synth_lines(&finish, &[]).contains("result_finish = input_data"));
}

#[test]
fn test_branch_node_binds_names_before_user_script() {
    let config = NodeConfig {
        code: Some("return input > 0 ? Yes : No;".to_string()),
        branches: vec![
            BranchDefinition {
                id: "b1".to_string(),
                name: "Yes".to_string(),
            },
            BranchDefinition {
                id: "b2".to_string(),
                name: "No".to_string(),
            },
        ],
        ..Default::default()
    };
    let n = node_with_config("decide", NodeKind::Branch, config);

    let lines = synth_lines(&n, &[]);
    let preamble =
        "const input = arguments[0];\nconst Yes = \"b1\";\nconst No = \"b2\";\n\nreturn input";
    assert!(lines.contains(preamble), "preamble order wrong:\n{lines}");
    assert!(lines.contains("await run_embedded_script("));
    assert!(lines.contains(r#"params={"input": input_data}"#));
}

#[test]
fn test_llm_node_binds_prompt_key() {
    let config = NodeConfig {
        model: Some("gpt-4o".to_string()),
        system_prompt: Some("Be terse.".to_string()),
        ..Default::default()
    };
    let n = node_with_config("gen", NodeKind::Llm, config);

    // Unbound prompt defaults to the pipeline input.
    let lines = synth_lines(&n, &[]);
    assert!(lines.contains("await generate_text("));
    assert!(lines.contains("model=\"gpt-4o\""));
    assert!(lines.contains("system_prompt=\"\"\"Be terse.\"\"\""));
    assert!(lines.contains("user_prompt=input_data"));

    // A bound `prompt` input takes over.
    let edges = vec![edge("question", "output", "gen", "prompt")];
    assert!(synth_lines(&n, &edges).contains("user_prompt=result_question"));
}

#[test]
fn test_python_node_with_return_wraps_into_callable() {
    let config = NodeConfig {
        params: vec![ParamDefinition {
            name: "value".to_string(),
        }],
        code: Some("return value * 2".to_string()),
        ..Default::default()
    };
    let n = node_with_config("calc", NodeKind::Python, config);
    let edges = vec![edge("source", "output", "calc", "value")];

    let lines = synth_lines(&n, &edges);
    assert!(lines.contains("value = result_source"));
    assert!(lines.contains("def _inline_fn(value):"));
    assert!(lines.contains("return value * 2"));
    assert!(lines.contains("result_calc = _inline_fn(value)"));
}

#[test]
fn test_python_node_unbound_param_degrades_to_none() {
    let config = NodeConfig {
        params: vec![ParamDefinition {
            name: "missing".to_string(),
        }],
        code: Some("return missing".to_string()),
        ..Default::default()
    };
    let n = node_with_config("calc", NodeKind::Python, config);

    assert!(synth_lines(&n, &[]).contains("missing = None"));
}

#[test]
fn test_python_node_inline_takes_last_line_as_result() {
    let config = NodeConfig {
        code: Some("doubled = value * 2\ndoubled".to_string()),
        params: vec![ParamDefinition {
            name: "value".to_string(),
        }],
        ..Default::default()
    };
    let n = node_with_config("calc", NodeKind::Python, config);

    let lines = synth_lines(&n, &[]);
    assert!(lines.contains("result_calc = doubled"));
}

#[test]
fn test_python_node_inline_side_effect_tail_yields_none() {
    let config = NodeConfig {
        code: Some("doubled = 2\nprint(doubled)".to_string()),
        ..Default::default()
    };
    let n = node_with_config("calc", NodeKind::Python, config);

    assert!(synth_lines(&n, &[]).contains("result_calc = None"));
}

#[test]
fn test_python_node_unwraps_def_main_header() {
    let config = NodeConfig {
        code: Some("def main(value):\n    return value + 1".to_string()),
        params: vec![ParamDefinition {
            name: "value".to_string(),
        }],
        ..Default::default()
    };
    let n = node_with_config("calc", NodeKind::Python, config);

    let lines = synth_lines(&n, &[]);
    assert!(!lines.contains("def main("));
    assert!(lines.contains("def _inline_fn(value):"));
    assert!(lines.contains("return value + 1"));
}

#[test]
fn test_javascript_node_wraps_awaiting_body() {
    let config = NodeConfig {
        code: Some("const r = await fetch(url);\nreturn r;".to_string()),
        params: vec![ParamDefinition {
            name: "url".to_string(),
        }],
        ..Default::default()
    };
    let n = node_with_config("search", NodeKind::JavaScript, config);
    let edges = vec![edge("q", "output", "search", "url")];

    let lines = synth_lines(&n, &edges);
    assert!(lines.contains("(async () => {"));
    assert!(lines.contains("})()"));
    assert!(lines.contains(r#"params={"url": result_q}"#));
}

#[test]
fn test_javascript_node_leaves_async_unit_alone() {
    let config = NodeConfig {
        code: Some("(async () => { return await work(); })()".to_string()),
        ..Default::default()
    };
    let n = node_with_config("search", NodeKind::JavaScript, config);

    let lines = synth_lines(&n, &[]);
    assert_eq!(lines.matches("(async").count(), 1, "must not double-wrap");
}

#[test]
fn test_javascript_node_passes_unbound_params_as_none() {
    let config = NodeConfig {
        code: Some("return a;".to_string()),
        params: vec![
            ParamDefinition {
                name: "a".to_string(),
            },
            ParamDefinition {
                name: "b".to_string(),
            },
        ],
        ..Default::default()
    };
    let n = node_with_config("js", NodeKind::JavaScript, config);
    let edges = vec![edge("x", "output", "js", "a")];

    let lines = synth_lines(&n, &edges);
    assert!(lines.contains(r#"params={"a": result_x, "b": None}"#));
}

#[test]
fn test_subflow_node_calls_sanitized_procedure() {
    let n = node(
        "call",
        NodeKind::Subflow {
            target: "sub-search".to_string(),
        },
    );
    let edges = vec![edge("start", "output", "call", "input")];

    let lines = synth_lines(&n, &edges);
    assert!(lines.contains("result_call = await sub_search(result_start)"));

    // Without a bound input the sub-pipeline receives the pipeline input.
    assert!(synth_lines(&n, &[]).contains("await sub_search(input_data)"));
}

#[test]
fn test_unrecognized_kind_degrades_to_annotated_passthrough() {
    let n = node(
        "mystery",
        NodeKind::Unrecognized {
            tag: "quantum".to_string(),
        },
    );
    let edges = vec![edge("start", "output", "mystery", "input")];

    let lines = synth_lines(&n, &edges);
    assert!(lines.contains("result_mystery = result_start  # unrecognized node kind: quantum"));
}

#[test]
fn test_display_and_image_nodes_emit_traces() {
    let display_config = NodeConfig {
        name: Some("Preview".to_string()),
        ..Default::default()
    };
    let d = node_with_config("show", NodeKind::Display, display_config);
    let lines = synth_lines(&d, &[]);
    assert!(lines.contains("trace(f\"[Preview] {result_show}\")"));

    let i = node("img", NodeKind::Image);
    let edges = vec![edge("render", "output", "img", "src")];
    let lines = synth_lines(&i, &edges);
    assert!(lines.contains("await persist_image("));
    assert!(lines.contains("src=result_render,"));
    assert!(lines.contains("id=\"img\""));
    assert!(lines.contains("image stored at {result_img}"));
}

#[test]
fn test_fragment_carries_descriptive_comment() {
    let config = NodeConfig {
        name: Some("Generate keywords".to_string()),
        description: Some("derives search terms".to_string()),
        ..Default::default()
    };
    let n = node_with_config("kw", NodeKind::Llm, config);

    let lines = synth_lines(&n, &[]);
    assert!(lines.contains("# Generate keywords - derives search terms"));
}

#[test]
fn test_bindings_keep_first_position_last_producer() {
    let edges = vec![
        edge("a", "output", "sink", "input"),
        edge("b", "output", "sink", "other"),
        edge("c", "output", "sink", "input"),
    ];
    let bindings = Bindings::resolve(&edges, "sink");

    // Re-binding a key keeps its slot but takes the later producer.
    assert_eq!(bindings.get("input"), Some("result_c"));
    assert_eq!(bindings.first(), Some("result_c"));
    assert_eq!(bindings.get("other"), Some("result_b"));
    assert_eq!(bindings.get("absent"), None);
}
