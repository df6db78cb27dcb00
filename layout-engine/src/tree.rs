//! FILENAME: layout-engine/src/tree.rs
//! Layout Tree - the in-memory model of one questionnaire response.
//!
//! Each node represents either an answered section (which holds children) or
//! a single answer (which holds a pre-formatted display value). Two sibling
//! nodes answering the same definition are two instances of a repeatable
//! element and will be laid out on separate rows.
//!
//! Nodes are built once per export through the constructors below, then
//! mutated in place by the layout passes in `engine` (height, level buckets,
//! starting row), and finally discarded. Trees are never shared between
//! exports.

use serde::Serialize;
use smallvec::SmallVec;

/// The children assigned to one level, as indices into the parent's child
/// list. Repeat counts are small in practice, so the buckets stay inline.
pub type LevelBucket = SmallVec<[usize; 4]>;

/// One element of a flattened response: a section instance or an answer.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutTree {
    /// Identifier of the questionnaire definition (section or question) this
    /// node answers. `None` only for the synthetic root.
    pub(crate) answered_element_id: Option<String>,

    /// The pre-formatted answer value, if this is an answer.
    pub(crate) value: Option<String>,

    /// Whether this is a section (`true`) or a single answer (`false`).
    pub(crate) is_section: bool,

    /// Child nodes, in document order. Always empty for answers.
    pub(crate) children: Vec<LayoutTree>,

    /// Children grouped by level: bucket `i` holds the indices of all
    /// children that are the `i`-th instance of their own definition.
    /// Computed by [`compute_height`](Self::compute_height).
    #[serde(skip)]
    pub(crate) children_by_level: Vec<LevelBucket>,

    /// The number of output rows this subtree needs.
    /// Computed by [`compute_height`](Self::compute_height).
    pub(crate) height: u32,

    /// The first output row this node's data appears on, 0-based.
    /// Computed by [`assign_starting_row`](Self::assign_starting_row).
    pub(crate) starting_row: u32,
}

impl LayoutTree {
    /// Creates the synthetic root of a response. The root is the only node
    /// without an answered element id.
    pub fn root() -> Self {
        LayoutTree::new(None, None, true)
    }

    /// Creates a section instance answering the given section definition.
    pub fn section(answered_element_id: impl Into<String>) -> Self {
        LayoutTree::new(Some(answered_element_id.into()), None, true)
    }

    /// Creates an answer to the given question definition, carrying its
    /// display value. Answers never have children.
    pub fn answer(answered_element_id: impl Into<String>, value: impl Into<String>) -> Self {
        LayoutTree::new(Some(answered_element_id.into()), Some(value.into()), false)
    }

    fn new(answered_element_id: Option<String>, value: Option<String>, is_section: bool) -> Self {
        LayoutTree {
            answered_element_id,
            value,
            is_section,
            children: Vec::new(),
            children_by_level: Vec::new(),
            height: 0,
            starting_row: 0,
        }
    }

    /// Adds a child node under this section, in document order.
    ///
    /// # Panics
    ///
    /// Panics if called on an answer node. An answer with children is a
    /// malformed tree and indicates a defect in the tree builder, not
    /// recoverable input.
    pub fn add_child(&mut self, child: LayoutTree) {
        assert!(self.is_section, "answers cannot have children");
        self.children.push(child);
    }

    /// The definition this node answers, `None` for the root.
    pub fn answered_element_id(&self) -> Option<&str> {
        self.answered_element_id.as_deref()
    }

    /// The display value, `None` for sections.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether this node is a section.
    pub fn is_section(&self) -> bool {
        self.is_section
    }

    /// The child nodes, in document order.
    pub fn children(&self) -> &[LayoutTree] {
        &self.children
    }

    /// The number of output rows this subtree needs. Zero until
    /// [`compute_height`](Self::compute_height) has run, and zero afterwards
    /// for sections with no content.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The first output row this node occupies. Meaningful only after
    /// [`assign_starting_row`](Self::assign_starting_row) has run.
    pub fn starting_row(&self) -> u32 {
        self.starting_row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_answered_element() {
        let root = LayoutTree::root();
        assert!(root.is_section());
        assert!(root.answered_element_id().is_none());
        assert!(root.value().is_none());
    }

    #[test]
    fn answer_carries_its_value() {
        let answer = LayoutTree::answer("q1", "42");
        assert!(!answer.is_section());
        assert_eq!(answer.answered_element_id(), Some("q1"));
        assert_eq!(answer.value(), Some("42"));
    }

    #[test]
    fn children_keep_document_order() {
        let mut section = LayoutTree::section("s1");
        section.add_child(LayoutTree::answer("q1", "a"));
        section.add_child(LayoutTree::answer("q2", "b"));
        let ids: Vec<_> = section
            .children()
            .iter()
            .map(|c| c.answered_element_id().unwrap())
            .collect();
        assert_eq!(ids, vec!["q1", "q2"]);
    }

    #[test]
    #[should_panic(expected = "answers cannot have children")]
    fn answer_rejects_children() {
        let mut answer = LayoutTree::answer("q1", "a");
        answer.add_child(LayoutTree::answer("q2", "b"));
    }
}
