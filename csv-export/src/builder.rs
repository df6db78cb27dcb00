//! FILENAME: csv-export/src/builder.rs
//! Tree building - from a form document to a `LayoutTree`.
//!
//! A form is a nested JSON document mixing answer content with repository
//! metadata. Only answer sections and answers are extracted; each is keyed
//! by the UUID of the definition it answers (the section or question node of
//! the questionnaire), which is what ties it to an export column. Everything
//! else in the document is ignored.

use layout_engine::LayoutTree;
use serde_json::Value;

use crate::value::answer_value;
use crate::{is_answer_type, ANSWER_SECTION_TYPE, PRIMARY_TYPE_PROP, UUID_PROP};

/// Extracts the answer tree of one form. The returned tree is ready for the
/// layout passes; its root is synthetic and carries no element id.
pub fn build_tree(form: &Value) -> LayoutTree {
    let mut root = LayoutTree::root();
    if let Some(form) = form.as_object() {
        copy_section(form, &mut root);
    }
    root
}

/// Adds all the answer sections and answers found in `section` as children
/// of `parent`, in document order.
fn copy_section(section: &serde_json::Map<String, Value>, parent: &mut LayoutTree) {
    for element in section.values().filter_map(Value::as_object) {
        let node_type = match element.get(PRIMARY_TYPE_PROP).and_then(Value::as_str) {
            Some(node_type) => node_type,
            None => continue,
        };
        if node_type == ANSWER_SECTION_TYPE {
            match answered_element_id(element, "section") {
                Some(section_id) => {
                    let mut node = LayoutTree::section(section_id);
                    copy_section(element, &mut node);
                    parent.add_child(node);
                }
                None => log::warn!("answer section without a section reference, skipped"),
            }
        } else if is_answer_type(node_type) {
            match answered_element_id(element, "question") {
                Some(question_id) => {
                    let value = answer_value(element, node_type);
                    parent.add_child(LayoutTree::answer(question_id, value));
                }
                None => log::warn!("{} without a question reference, skipped", node_type),
            }
        } else {
            log::debug!("ignoring node of type {}", node_type);
        }
    }
}

/// The UUID of the definition a form element answers, read from its
/// dereferenced `section`/`question` property.
fn answered_element_id(
    element: &serde_json::Map<String, Value>,
    reference: &str,
) -> Option<String> {
    element
        .get(reference)?
        .as_object()?
        .get(UUID_PROP)?
        .as_str()
        .map(str::to_string)
}
