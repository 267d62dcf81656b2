//! `dispatch` subcommand: run server feedback through the handler table.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use edithost_core::{BatchReport, FeedbackContext, FeedbackPump, MemoryStore};
use edithost_protocols::{Action, Feedback, FeedbackEnvelope};

use crate::host::Host;

/// Read the input file, or stdin for `-`.
fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        std::fs::read_to_string(input)
    }
}

/// Split input into envelopes.
///
/// Accepts one envelope (`{"feedbacks": [...]}`), an array of envelopes, or
/// a bare array of feedback (treated as one envelope).
pub(crate) fn parse_envelopes(content: &str) -> Result<Vec<FeedbackEnvelope>, serde_json::Error> {
    let value: Value = serde_json::from_str(content)?;
    match value {
        Value::Array(items) if items.iter().all(|item| item.get("feedbacks").is_some()) && !items.is_empty() => {
            items.into_iter().map(serde_json::from_value).collect()
        }
        Value::Array(items) => {
            let feedbacks = items
                .into_iter()
                .map(serde_json::from_value::<Feedback>)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(vec![FeedbackEnvelope::new(feedbacks)])
        }
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}

/// JSON summary of a dispatch run.
pub(crate) fn summary(actions: &[Action], report: &BatchReport) -> Value {
    json!({
        "actions": actions,
        "report": {
            "handled": report.handled,
            "unhandled": report.unhandled,
            "failures": report.failures.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        }
    })
}

/// Dispatch every envelope in order and print the resulting actions.
pub(crate) async fn dispatch(
    host: &Host,
    input: &str,
    state: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let envelopes = parse_envelopes(&read_input(input)?)?;
    let initial_state = match state {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => json!({}),
    };

    let store = Arc::new(MemoryStore::new(initial_state));
    let ctx = FeedbackContext::new(store.clone(), host.registry.clone());
    let pump = FeedbackPump::spawn(host.feedback_handlers()?, ctx);

    info!(envelopes = envelopes.len(), "Dispatching server feedback");
    for envelope in envelopes {
        pump.submit(envelope)?;
    }
    let report = pump.finish().await?;

    if !report.is_clean() {
        warn!(
            unhandled = report.unhandled.len(),
            failures = report.failures.len(),
            "Some feedback was not applied"
        );
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&summary(&store.dispatched(), &report))?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edithost_config::Config;
    use edithost_protocols::Store;

    #[test]
    fn test_parse_single_envelope() {
        let envelopes = parse_envelopes(r#"{"feedbacks": [{"type": "A"}, {"type": "B"}]}"#).unwrap();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].len(), 2);
    }

    #[test]
    fn test_parse_envelope_array() {
        let envelopes =
            parse_envelopes(r#"[{"feedbacks": [{"type": "A"}]}, {"feedbacks": []}]"#).unwrap();
        assert_eq!(envelopes.len(), 2);
        assert!(envelopes[1].is_empty());
    }

    #[test]
    fn test_parse_bare_feedback_array() {
        let envelopes = parse_envelopes(r#"[{"type": "A", "message": "x"}]"#).unwrap();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].feedbacks[0].str_field("message"), Some("x"));

        let empty = parse_envelopes("[]").unwrap();
        assert_eq!(empty.len(), 1);
        assert!(empty[0].is_empty());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_envelopes("{").is_err());
        assert!(parse_envelopes(r#"[{"message": "no type"}]"#).is_err());
    }

    #[tokio::test]
    async fn test_builtin_handlers_through_pump() {
        let host = Host::bootstrap(Config::default()).unwrap();
        let store = Arc::new(MemoryStore::new(json!({})));
        let ctx = FeedbackContext::new(store.clone(), host.registry.clone());
        let pump = FeedbackPump::spawn(host.feedback_handlers().unwrap(), ctx);

        let envelopes = parse_envelopes(
            r#"{"feedbacks": [
                {"type": "Neos.Neos.Ui:Success", "message": "Saved", "severity": "Success"},
                {"type": "Neos.Neos.Ui:DocumentNodeCreated", "contextPath": "/sites/demo/new@user-admin"},
                {"type": "Example:Unknown"}
            ]}"#,
        )
        .unwrap();
        for envelope in envelopes {
            pump.submit(envelope).unwrap();
        }
        let report = pump.finish().await.unwrap();

        let summary = summary(&store.dispatched(), &report);
        assert_eq!(summary["report"]["handled"], 2);
        assert_eq!(summary["report"]["unhandled"], json!(["Example:Unknown"]));
        assert_eq!(summary["actions"][0]["type"], "UI.FlashMessages.ADD");
        assert_eq!(summary["actions"][0]["payload"]["timeout"], 5000);
        assert_eq!(summary["actions"][1]["type"], "UI.Remote.DOCUMENT_NODE_CREATED");
        assert_eq!(store.state(), json!({}));
    }
}
