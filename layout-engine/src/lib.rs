//! FILENAME: layout-engine/src/lib.rs
//! Layout engine for flattening hierarchical questionnaire responses.
//!
//! A filled-in questionnaire is a tree: sections (which may repeat any number
//! of times, nested arbitrarily deep) containing further sections and answer
//! values. Exporting such a response as tabular data requires deciding, for
//! every answer, exactly which output row it lands on, so that repeated
//! sections occupy distinct rows while unrelated repeats do not inflate each
//! other's row usage.
//!
//! Layers:
//! - `tree`: The `LayoutTree` data model (what the response LOOKS like)
//! - `engine`: The three layout passes (HOW rows are assigned)
//! - `grid`: The tabulated output and row materialization (WHAT we emit)
//!
//! The engine is pure and synchronous: it performs no I/O, holds no state
//! between invocations, and processes one fully materialized tree at a time.

pub mod engine;
pub mod grid;
pub mod tree;

pub use grid::Grid;
pub use tree::LayoutTree;
