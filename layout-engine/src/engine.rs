//! FILENAME: layout-engine/src/engine.rs
//! Layout passes - the calculation core that turns a tree into row numbers.
//!
//! Without repeatable sections every answer of a flat response would share
//! row 0. Repeats need extra rows, and nested repeats need a number of rows
//! that can differ between sibling and cousin subtrees. The layout is
//! computed in three strictly ordered passes over one [`LayoutTree`]:
//!
//! 1. [`compute_height`](LayoutTree::compute_height) - bottom-up: group each
//!    section's children into levels (the i-th instance of every repeated
//!    definition lands on level i) and size the subtree.
//! 2. [`assign_starting_row`](LayoutTree::assign_starting_row) - top-down:
//!    place each level in its own row band, sized to the tallest member.
//! 3. [`tabulate`](LayoutTree::tabulate) - copy every answer into the
//!    [`Grid`] at its column and assigned row.
//!
//! All three are pure tree walks; repeating them on the same tree is
//! idempotent.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::grid::Grid;
use crate::tree::LayoutTree;

impl LayoutTree {
    /// Computes the height of this element and, for sections, the grouping
    /// of its children into levels. Must run after all children have been
    /// added and before [`assign_starting_row`](Self::assign_starting_row).
    ///
    /// An answer always has height 1. A section's children are bucketed by
    /// level in a single document-order walk: a child's level is the number
    /// of earlier siblings answering the same definition, so the first
    /// instance of every definition shares level 0, the second instances
    /// share level 1, and so on, regardless of how the definitions
    /// interleave. The section's height is the sum over levels of the
    /// tallest member on each level; a section with no content has height 0
    /// and takes up no rows.
    pub fn compute_height(&mut self) {
        if !self.is_section {
            self.height = 1;
            return;
        }
        for child in &mut self.children {
            child.compute_height();
        }

        let children = &self.children;
        let buckets = &mut self.children_by_level;
        buckets.clear();
        let mut instances_seen: FxHashMap<&str, usize> = FxHashMap::default();
        for (index, child) in children.iter().enumerate() {
            let key = child.answered_element_id.as_deref().unwrap_or_default();
            let seen = instances_seen.entry(key).or_insert(0);
            let level = *seen;
            *seen += 1;
            if buckets.len() == level {
                buckets.push(SmallVec::new());
            }
            buckets[level].push(index);
        }

        self.height = buckets
            .iter()
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|&index| children[index].height)
                    .max()
                    .unwrap_or(0)
            })
            .sum();
    }

    /// Assigns the starting row of this element and, recursively, of all its
    /// children. Must run after [`compute_height`](Self::compute_height) and
    /// before [`tabulate`](Self::tabulate).
    ///
    /// Every child on a level starts on the same row; the next level starts
    /// one band further down, where a band is as tall as the level's tallest
    /// member. Sibling repeats therefore stack vertically while unrelated
    /// definitions on the same level share rows.
    pub fn assign_starting_row(&mut self, row_number: u32) {
        self.starting_row = row_number;
        let buckets = &self.children_by_level;
        let children = &mut self.children;
        let mut level_row = row_number;
        for bucket in buckets {
            let mut level_height = 0;
            for &index in bucket {
                let child = &mut children[index];
                child.assign_starting_row(level_row);
                level_height = level_height.max(child.height);
            }
            level_row += level_height;
        }
    }

    /// Copies the data from this subtree into the grid. Must run last.
    ///
    /// Answers targeting a column the grid does not know about are dropped:
    /// questionnaires may contain elements that are not exported, and those
    /// still shape the layout without contributing cells.
    pub fn tabulate(&self, grid: &mut Grid) {
        if self.is_section {
            for child in &self.children {
                child.tabulate(grid);
            }
        } else if let Some(id) = self.answered_element_id.as_deref() {
            if grid.has_column(id) {
                grid.record(id, self.starting_row, self.value.clone().unwrap_or_default());
            }
        }
    }

    /// Runs the three layout passes in order and fills the grid.
    pub fn layout_into(&mut self, grid: &mut Grid) {
        self.compute_height();
        self.assign_starting_row(0);
        self.tabulate(grid);
    }
}
