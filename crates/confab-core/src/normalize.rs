//! Message normalization.
//!
//! Converts heterogeneous inbound turn shapes into canonical
//! [`ConversationTurn`]s and handles idempotent system-prompt injection.
//! Normalization never fails: unrecognized shapes degrade to a user turn
//! with best-effort stringified content.

use serde_json::Value;

use crate::turns::{ConversationTurn, InboundTurn, Role};

/// Normalize a client-supplied turn list into canonical turns.
///
/// Well-formed turns pass through verbatim. Bare strings and arbitrary
/// JSON become user turns with stringified content.
#[must_use]
pub fn normalize(turns: Vec<InboundTurn>) -> Vec<ConversationTurn> {
    turns.into_iter().map(into_canonical).collect()
}

/// Prepend a system turn with the given prompt iff the list has none.
///
/// Idempotent: calling twice never duplicates the system turn.
pub fn ensure_system_prompt(turns: &mut Vec<ConversationTurn>, prompt: &str) {
    if turns.iter().any(|t| t.role == Role::System) {
        return;
    }
    turns.insert(0, ConversationTurn::system(prompt));
}

fn into_canonical(turn: InboundTurn) -> ConversationTurn {
    match turn {
        InboundTurn::Turn {
            role,
            content,
            name,
            tool_call_id,
        } => ConversationTurn {
            role,
            content,
            name,
            tool_call_id,
        },
        InboundTurn::Text(text) => ConversationTurn::user(text),
        InboundTurn::Opaque(value) => ConversationTurn::user(stringify(value)),
    }
}

/// Best-effort text extraction from an arbitrary JSON value.
///
/// String values are unwrapped (no surrounding quotes); everything else
/// is rendered as compact JSON.
fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn well_formed_turn_passes_through() {
        let turns = normalize(vec![InboundTurn::Turn {
            role: Role::Assistant,
            content: "hi".into(),
            name: Some("bot".into()),
            tool_call_id: None,
        }]);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::Assistant);
        assert_eq!(turns[0].content, "hi");
        assert_eq!(turns[0].name.as_deref(), Some("bot"));
    }

    #[test]
    fn bare_string_becomes_user_turn() {
        let turns = normalize(vec![InboundTurn::Text("hello".into())]);
        assert_eq!(turns, vec![ConversationTurn::user("hello")]);
    }

    #[test]
    fn opaque_string_value_is_unquoted() {
        let turns = normalize(vec![InboundTurn::Opaque(json!("plain"))]);
        assert_eq!(turns[0].content, "plain");
    }

    #[test]
    fn opaque_object_is_compact_json() {
        let turns = normalize(vec![InboundTurn::Opaque(json!({"a": 1}))]);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].content, r#"{"a":1}"#);
    }

    #[test]
    fn opaque_number_is_stringified() {
        let turns = normalize(vec![InboundTurn::Opaque(json!(42))]);
        assert_eq!(turns[0].content, "42");
    }

    #[test]
    fn normalize_preserves_order() {
        let turns = normalize(vec![
            InboundTurn::Text("first".into()),
            InboundTurn::Turn {
                role: Role::Assistant,
                content: "second".into(),
                name: None,
                tool_call_id: None,
            },
            InboundTurn::Text("third".into()),
        ]);
        let contents: Vec<&str> = turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn normalize_empty_list() {
        assert!(normalize(vec![]).is_empty());
    }

    // ── ensure_system_prompt ─────────────────────────────────────────────

    #[test]
    fn system_prompt_injected_at_front() {
        let mut turns = vec![ConversationTurn::user("hi")];
        ensure_system_prompt(&mut turns, "You are helpful.");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::System);
        assert_eq!(turns[0].content, "You are helpful.");
    }

    #[test]
    fn system_prompt_not_duplicated() {
        let mut turns = vec![
            ConversationTurn::system("existing"),
            ConversationTurn::user("hi"),
        ];
        ensure_system_prompt(&mut turns, "new prompt");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "existing");
    }

    #[test]
    fn system_prompt_injection_is_idempotent() {
        let mut turns = vec![ConversationTurn::user("hi")];
        ensure_system_prompt(&mut turns, "prompt");
        ensure_system_prompt(&mut turns, "prompt");
        let system_count = turns.iter().filter(|t| t.role == Role::System).count();
        assert_eq!(system_count, 1);
    }

    #[test]
    fn system_prompt_detected_anywhere_in_list() {
        // A system turn mid-list still counts as present.
        let mut turns = vec![
            ConversationTurn::user("hi"),
            ConversationTurn::system("late system"),
        ];
        ensure_system_prompt(&mut turns, "prompt");
        assert_eq!(turns.len(), 2);
    }

    #[test]
    fn system_prompt_injected_into_empty_list() {
        let mut turns = Vec::new();
        ensure_system_prompt(&mut turns, "prompt");
        assert_eq!(turns, vec![ConversationTurn::system("prompt")]);
    }
}
