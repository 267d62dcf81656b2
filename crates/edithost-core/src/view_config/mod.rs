//! Dynamic values inside inspector view configuration.
//!
//! A string of the form `ClientEval:<expr>` is replaced by the result of
//! evaluating `<expr>` against the focused node. Expressions are parsed into
//! a small AST; nothing is ever executed as code.

mod expr;

pub use expr::{parse, truthy, BinaryOp, Expr};

use serde_json::{Map, Value};
use tracing::warn;

use edithost_protocols::error::ExprError;

/// Marks a configuration string as an expression.
pub const CLIENT_EVAL_PREFIX: &str = "ClientEval:";

/// The expression source of `value`, if it is a `ClientEval:` string.
pub fn expression_source(value: &Value) -> Option<&str> {
    value.as_str()?.strip_prefix(CLIENT_EVAL_PREFIX)
}

/// Parse and evaluate one `ClientEval:` string.
pub fn evaluate_str(source: &str, node: &Value) -> Result<Value, ExprError> {
    let src = source.strip_prefix(CLIENT_EVAL_PREFIX).unwrap_or(source);
    Ok(parse(src)?.evaluate(node))
}

/// Resolve the expressions of `original` into `view`.
///
/// `original` is the configuration as registered; `view` is the currently
/// displayed copy, which may already hold results from an earlier node.
/// Expression positions are always re-evaluated from `original`, so the same
/// view can be preprocessed again when focus moves. A failing expression
/// keeps the current value at that position.
pub fn preprocess(view: &Value, original: &Value, node: &Value) -> Value {
    walk(view, original, node, &mut Vec::new())
}

fn walk(view: &Value, original: &Value, node: &Value, path: &mut Vec<String>) -> Value {
    if let Some(source) = expression_source(original) {
        return match parse(source) {
            Ok(expr) => expr.evaluate(node),
            Err(e) => {
                warn!(path = %path.join("."), error = %e, "Keeping unevaluated view configuration value");
                view.clone()
            }
        };
    }

    match original {
        Value::Object(original_map) => {
            let mut out = match view {
                Value::Object(view_map) => view_map.clone(),
                _ => Map::new(),
            };
            for (key, original_child) in original_map {
                let current = view
                    .get(key.as_str())
                    .unwrap_or(original_child);
                path.push(key.clone());
                let resolved = walk(current, original_child, node, path);
                path.pop();
                out.insert(key.clone(), resolved);
            }
            Value::Object(out)
        }
        Value::Array(original_items) => {
            let view_items = view.as_array();
            let items = original_items
                .iter()
                .enumerate()
                .map(|(i, original_child)| {
                    let current = view_items
                        .and_then(|items| items.get(i))
                        .unwrap_or(original_child);
                    path.push(i.to_string());
                    let resolved = walk(current, original_child, node, path);
                    path.pop();
                    resolved
                })
                .collect();
            Value::Array(items)
        }
        _ => view.clone(),
    }
}
