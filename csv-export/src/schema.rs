//! FILENAME: csv-export/src/schema.rs
//! Column derivation - from the questionnaire definition to the export
//! columns.
//!
//! The column list is fixed per questionnaire and shared by every exported
//! form: the form identifier, one column per subject type in the hierarchy,
//! the creation/modification timestamps, then one column per question in
//! document order (sections flattened recursively). Each data-bearing column
//! carries a stable key (the definition's UUID, or the raw property name for
//! the timestamp columns) that answers are matched against during
//! tabulation.

use serde::Serialize;
use serde_json::Value;

use crate::{
    CREATED_PROP, LAST_MODIFIED_PROP, NAME_PROP, PATH_PROP, PRIMARY_TYPE_PROP, QUESTION_TYPE,
    SECTION_TYPE, UUID_PROP,
};
use crate::ExportError;

const IDENTIFIER_HEADER: &str = "Identifier";
const CREATED_HEADER: &str = "Created";
const LAST_MODIFIED_HEADER: &str = "Last modified";

/// The ordered export columns of one questionnaire.
///
/// `labels` and `raw_names` are the two header variants and include the
/// leading identifier column; `keys` excludes it, because the identifier is
/// not tabulated data but is prefixed onto every materialized row by the
/// exporter. So `labels.len() == keys.len() + 1`.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSet {
    /// Stable keys of the data-bearing columns, registered with the grid.
    pub keys: Vec<String>,

    /// Human-readable header labels, starting with `Identifier`.
    pub labels: Vec<String>,

    /// Raw machine names, starting with `@name`.
    pub raw_names: Vec<String>,
}

impl ColumnSet {
    fn new() -> Self {
        ColumnSet {
            keys: Vec::new(),
            labels: vec![IDENTIFIER_HEADER.to_string()],
            raw_names: vec![NAME_PROP.to_string()],
        }
    }

    fn push(&mut self, key: &str, label: &str, raw_name: &str) {
        self.keys.push(key.to_string());
        self.labels.push(label.to_string());
        self.raw_names.push(raw_name.to_string());
    }
}

/// Derives the export columns from a questionnaire definition.
pub fn derive_columns(questionnaire: &Value) -> Result<ColumnSet, ExportError> {
    let definition = questionnaire.as_object().ok_or_else(|| {
        ExportError::InvalidDocument("questionnaire is not a JSON object".to_string())
    })?;
    let mut columns = ColumnSet::new();

    if let Some(subject_types) = definition
        .get("requiredSubjectTypes")
        .and_then(Value::as_array)
    {
        add_subject_type_columns(subject_types, &mut columns);
    }

    columns.push(CREATED_PROP, CREATED_HEADER, CREATED_PROP);
    columns.push(LAST_MODIFIED_PROP, LAST_MODIFIED_HEADER, LAST_MODIFIED_PROP);

    add_section_columns(definition, &mut columns);
    Ok(columns)
}

/// Adds one `<label> ID` column per subject type, covering the declared
/// types and all their ancestors, ordered by their declared default order.
fn add_subject_type_columns(subject_types: &[Value], columns: &mut ColumnSet) {
    let mut gathered: Vec<&serde_json::Map<String, Value>> = Vec::new();
    for subject_type in subject_types {
        if let Some(subject_type) = subject_type.as_object() {
            gather_subject_types(subject_type, &mut gathered);
        }
    }
    gathered.sort_by_key(|t| t.get("cards:defaultOrder").and_then(Value::as_i64).unwrap_or(0));
    for subject_type in gathered {
        match (
            subject_type.get(UUID_PROP).and_then(Value::as_str),
            subject_type.get("label").and_then(Value::as_str),
        ) {
            (Some(uuid), Some(label)) => {
                let path = subject_type
                    .get(PATH_PROP)
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                columns.push(uuid, &format!("{} ID", label), path);
            }
            _ => log::warn!("skipping subject type without uuid/label"),
        }
    }
}

/// Collects a subject type and its ancestors, de-duplicated by UUID.
fn gather_subject_types<'a>(
    subject_type: &'a serde_json::Map<String, Value>,
    gathered: &mut Vec<&'a serde_json::Map<String, Value>>,
) {
    let uuid = subject_type.get(UUID_PROP).and_then(Value::as_str);
    let already_known = gathered
        .iter()
        .any(|t| t.get(UUID_PROP).and_then(Value::as_str) == uuid);
    if already_known {
        return;
    }
    gathered.push(subject_type);
    if let Some(parent) = subject_type.get("parents").and_then(Value::as_object) {
        gather_subject_types(parent, gathered);
    }
}

/// Walks a section (or the questionnaire root) and appends one column per
/// question, recursing into subsections, in document order. Anything that is
/// not a section or a question is ignored.
fn add_section_columns(section: &serde_json::Map<String, Value>, columns: &mut ColumnSet) {
    for element in section.values().filter_map(Value::as_object) {
        let node_type = match element.get(PRIMARY_TYPE_PROP).and_then(Value::as_str) {
            Some(node_type) => node_type,
            None => continue,
        };
        if node_type == SECTION_TYPE {
            add_section_columns(element, columns);
        } else if node_type == QUESTION_TYPE {
            let name = element.get(NAME_PROP).and_then(Value::as_str);
            let uuid = element.get(UUID_PROP).and_then(Value::as_str);
            match (name, uuid) {
                (Some(name), Some(uuid)) => {
                    let label = element
                        .get("text")
                        .and_then(Value::as_str)
                        .unwrap_or(name);
                    columns.push(uuid, label, name);
                }
                _ => log::warn!("skipping question without name/uuid"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn questions_follow_document_order_through_sections() {
        let questionnaire = json!({
            "@name": "test",
            "q1": {
                "jcr:primaryType": "cards:Question",
                "jcr:uuid": "u-q1",
                "@name": "q1",
                "text": "First question"
            },
            "s1": {
                "jcr:primaryType": "cards:Section",
                "jcr:uuid": "u-s1",
                "q2": {
                    "jcr:primaryType": "cards:Question",
                    "jcr:uuid": "u-q2",
                    "@name": "q2",
                    "text": "Nested question"
                }
            },
            "q3": {
                "jcr:primaryType": "cards:Question",
                "jcr:uuid": "u-q3",
                "@name": "q3"
            }
        });

        let columns = derive_columns(&questionnaire).unwrap();
        assert_eq!(
            columns.keys,
            vec!["jcr:created", "jcr:lastModified", "u-q1", "u-q2", "u-q3"]
        );
        assert_eq!(
            columns.labels,
            vec![
                "Identifier",
                "Created",
                "Last modified",
                "First question",
                "Nested question",
                "q3"
            ]
        );
        assert_eq!(
            columns.raw_names,
            vec!["@name", "jcr:created", "jcr:lastModified", "q1", "q2", "q3"]
        );
    }

    #[test]
    fn label_falls_back_to_the_question_name() {
        let questionnaire = json!({
            "q1": {
                "jcr:primaryType": "cards:Question",
                "jcr:uuid": "u-q1",
                "@name": "q1"
            }
        });
        let columns = derive_columns(&questionnaire).unwrap();
        assert_eq!(columns.labels.last().unwrap(), "q1");
    }

    #[test]
    fn subject_types_include_ancestors_in_default_order() {
        let questionnaire = json!({
            "requiredSubjectTypes": [
                {
                    "jcr:uuid": "u-leaf",
                    "label": "Leaf",
                    "@path": "/SubjectTypes/Root/Branch/Leaf",
                    "cards:defaultOrder": 2,
                    "parents": {
                        "jcr:uuid": "u-root",
                        "label": "Root",
                        "@path": "/SubjectTypes/Root",
                        "cards:defaultOrder": 0
                    }
                },
                {
                    "jcr:uuid": "u-branch",
                    "label": "Branch",
                    "@path": "/SubjectTypes/Root/Branch",
                    "cards:defaultOrder": 1,
                    "parents": {
                        "jcr:uuid": "u-root",
                        "label": "Root",
                        "@path": "/SubjectTypes/Root",
                        "cards:defaultOrder": 0
                    }
                }
            ]
        });

        let columns = derive_columns(&questionnaire).unwrap();
        assert_eq!(
            columns.labels,
            vec![
                "Identifier",
                "Root ID",
                "Branch ID",
                "Leaf ID",
                "Created",
                "Last modified"
            ]
        );
        assert_eq!(
            columns.keys,
            vec!["u-root", "u-branch", "u-leaf", "jcr:created", "jcr:lastModified"]
        );
    }

    #[test]
    fn non_object_questionnaire_is_rejected() {
        assert!(matches!(
            derive_columns(&json!("not an object")),
            Err(ExportError::InvalidDocument(_))
        ));
    }
}
