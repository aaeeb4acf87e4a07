//! Task-result payload boundary.
//!
//! The automation service returns loosely-typed JSON: any of a dozen optional
//! fields, each a string, an object, or a list depending on which upstream
//! model produced the run. Shapes are resolved once here into [`FieldValue`]
//! so the strategies downstream can pattern-match exhaustively instead of
//! re-probing `serde_json::Value` at every step.

use serde_json::{Map, Value};

/// Result-envelope fields checked for structured or free-text output,
/// in priority order. The first acceptable field wins.
pub const RESULT_FIELDS: &[&str] = &["result", "output", "data", "response", "content"];

/// Fields that may carry an execution transcript for log recovery.
pub const TRANSCRIPT_FIELDS: &[&str] = &[
    "logs",
    "execution_logs",
    "steps",
    "actions",
    "history",
    "trace",
];

/// Shape of a single payload field after one-time resolution.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Absent,
    Text(&'a str),
    Object(&'a Map<String, Value>),
    List(&'a [Value]),
}

/// Borrowed view over one task-result payload.
#[derive(Debug, Clone, Copy)]
pub struct TaskPayload<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> TaskPayload<'a> {
    /// Wraps a raw payload. Non-object payloads resolve every field to
    /// [`FieldValue::Absent`]; the pipeline then degrades normally instead
    /// of erroring.
    #[must_use]
    pub fn new(payload: &'a Value) -> Self {
        Self {
            fields: payload.as_object(),
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> FieldValue<'a> {
        let Some(value) = self.fields.and_then(|m| m.get(name)) else {
            return FieldValue::Absent;
        };
        match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Object(m) => FieldValue::Object(m),
            Value::Array(items) => FieldValue::List(items),
            // Numbers, bools and nulls carry no extractable content.
            _ => FieldValue::Absent,
        }
    }

    /// First result field holding free text, if any. Used as the last-resort
    /// source for transcript segmentation.
    #[must_use]
    pub fn first_text(&self) -> Option<&'a str> {
        RESULT_FIELDS.iter().find_map(|name| match self.field(name) {
            FieldValue::Text(s) => Some(s),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_resolves_each_shape_once() {
        let payload = json!({
            "result": "plain text",
            "data": {"products": []},
            "logs": ["a", "b"],
            "count": 3,
        });
        let payload = TaskPayload::new(&payload);
        assert!(matches!(payload.field("result"), FieldValue::Text("plain text")));
        assert!(matches!(payload.field("data"), FieldValue::Object(_)));
        assert!(matches!(payload.field("logs"), FieldValue::List(items) if items.len() == 2));
        // Scalars other than strings have no extractable content.
        assert!(matches!(payload.field("count"), FieldValue::Absent));
        assert!(matches!(payload.field("missing"), FieldValue::Absent));
    }

    #[test]
    fn non_object_payload_resolves_to_absent() {
        let payload = json!("just a string");
        let payload = TaskPayload::new(&payload);
        assert!(matches!(payload.field("result"), FieldValue::Absent));
        assert!(payload.first_text().is_none());
    }

    #[test]
    fn first_text_respects_priority_order() {
        let payload = json!({
            "output": "from output",
            "content": "from content",
        });
        let payload = TaskPayload::new(&payload);
        assert_eq!(payload.first_text(), Some("from output"));
    }
}
