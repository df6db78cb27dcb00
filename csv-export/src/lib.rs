//! FILENAME: csv-export/src/lib.rs
//! CSV/TSV export of questionnaire responses.
//!
//! Turns a serialized questionnaire document (the questionnaire definition
//! plus its filled-in forms under `@data`) into flat tabular text. The hard
//! part, deciding which output row each answer of a repeatable/nested
//! section lands on, lives in the `layout-engine` crate; this crate supplies
//! everything around it:
//!
//! - `schema`: derives the ordered export columns from the questionnaire
//! - `builder`: extracts a form's answer tree into a `LayoutTree`
//! - `value`: formats individual answer values as display strings
//! - `export`: orchestration and CSV/TSV encoding
//!
//! The input documents use the questionnaire platform's JSON vocabulary
//! (`jcr:`-prefixed metadata, `cards:`-prefixed node types); the property
//! names below are that wire format, not ours to rename.

mod builder;
mod error;
mod export;
mod schema;
mod value;

pub use builder::build_tree;
pub use error::ExportError;
pub use export::{export_questionnaire, ExportOptions, OutputFormat};
pub use schema::{derive_columns, ColumnSet};

// ============================================================================
// DOCUMENT VOCABULARY (property names and node types of the input JSON)
// ============================================================================

pub(crate) const PRIMARY_TYPE_PROP: &str = "jcr:primaryType";
pub(crate) const UUID_PROP: &str = "jcr:uuid";
pub(crate) const NAME_PROP: &str = "@name";
pub(crate) const PATH_PROP: &str = "@path";
pub(crate) const DATA_PROP: &str = "@data";
pub(crate) const CREATED_PROP: &str = "jcr:created";
pub(crate) const LAST_MODIFIED_PROP: &str = "jcr:lastModified";

pub(crate) const SECTION_TYPE: &str = "cards:Section";
pub(crate) const QUESTION_TYPE: &str = "cards:Question";
pub(crate) const ANSWER_SECTION_TYPE: &str = "cards:AnswerSection";
pub(crate) const ANSWER_TYPE_PREFIX: &str = "cards:";
pub(crate) const ANSWER_TYPE_SUFFIX: &str = "Answer";
pub(crate) const PEDIGREE_ANSWER_TYPE: &str = "cards:PedigreeAnswer";
pub(crate) const VOCABULARY_ANSWER_TYPE: &str = "cards:VocabularyAnswer";

/// Whether a node type names an answer (`cards:TextAnswer`,
/// `cards:BooleanAnswer`, ...). Answer sections do not match.
pub(crate) fn is_answer_type(node_type: &str) -> bool {
    node_type.starts_with(ANSWER_TYPE_PREFIX) && node_type.ends_with(ANSWER_TYPE_SUFFIX)
}
