//! FILENAME: csv-export/src/value.rs
//! Answer value formatting - one answer node to one display string.
//!
//! Answers prefer their `displayedValue` (present when label substitution is
//! enabled upstream) over the raw `value`. Multi-valued answers are joined
//! with `;`. Two node types get special treatment: pedigree drawings are too
//! large to inline and collapse to a marker, and vocabulary answers store a
//! full term path of which only the final segment is meaningful in a table.

use serde_json::Value;

use crate::{PEDIGREE_ANSWER_TYPE, VOCABULARY_ANSWER_TYPE};

/// Formats the value of one answer node as its display string.
pub(crate) fn answer_value(node: &serde_json::Map<String, Value>, node_type: &str) -> String {
    let value = match node.get("displayedValue").or_else(|| node.get("value")) {
        Some(value) => value,
        None => return String::new(),
    };
    if node_type == PEDIGREE_ANSWER_TYPE {
        // The pedigree SVG itself is not tabular data, only its presence is
        return "yes".to_string();
    }
    match value {
        Value::Array(values) => values
            .iter()
            .map(|v| scalar_value(v, node_type))
            .collect::<Vec<_>>()
            .join(";"),
        other => scalar_value(other, node_type),
    }
}

/// Formats a single scalar answer value.
fn scalar_value(value: &Value, node_type: &str) -> String {
    match value {
        Value::String(text) if node_type == VOCABULARY_ANSWER_TYPE => {
            // Vocabulary values are term paths; keep only the term identifier
            match text.rsplit_once('/') {
                Some((_, identifier)) => identifier.to_string(),
                None => String::new(),
            }
        }
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> serde_json::Map<String, Value> {
        json!({ "value": value }).as_object().unwrap().clone()
    }

    #[test]
    fn plain_string_passes_through() {
        assert_eq!(answer_value(&node(json!("hello")), "cards:TextAnswer"), "hello");
    }

    #[test]
    fn displayed_value_wins_over_raw_value() {
        let node = json!({ "value": "M", "displayedValue": "Male" })
            .as_object()
            .unwrap()
            .clone();
        assert_eq!(answer_value(&node, "cards:TextAnswer"), "Male");
    }

    #[test]
    fn missing_value_is_blank() {
        let node = json!({}).as_object().unwrap().clone();
        assert_eq!(answer_value(&node, "cards:TextAnswer"), "");
    }

    #[test]
    fn numbers_and_booleans_use_their_json_text() {
        assert_eq!(answer_value(&node(json!(42)), "cards:LongAnswer"), "42");
        assert_eq!(answer_value(&node(json!(2.5)), "cards:DecimalAnswer"), "2.5");
        assert_eq!(answer_value(&node(json!(true)), "cards:BooleanAnswer"), "true");
    }

    #[test]
    fn multiple_values_join_with_semicolons() {
        assert_eq!(
            answer_value(&node(json!(["a", "b", "c"])), "cards:TextAnswer"),
            "a;b;c"
        );
    }

    #[test]
    fn vocabulary_answers_keep_the_term_identifier() {
        assert_eq!(
            answer_value(&node(json!("/Vocabularies/NCIT/C17998")), VOCABULARY_ANSWER_TYPE),
            "C17998"
        );
        assert_eq!(
            answer_value(
                &node(json!(["/Vocabularies/NCIT/C12345", "/Vocabularies/NCIT/C67890"])),
                VOCABULARY_ANSWER_TYPE
            ),
            "C12345;C67890"
        );
    }

    #[test]
    fn pedigree_answers_collapse_to_a_marker() {
        assert_eq!(
            answer_value(&node(json!("<svg>...</svg>")), PEDIGREE_ANSWER_TYPE),
            "yes"
        );
    }
}
