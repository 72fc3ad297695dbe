//! Die graph: faces as nodes, "borders" as directed edges.
//!
//! Purpose
//! - Hold the immutable topology a search runs against: face identifiers in first-seen
//!   order, each face's ordered set of neighbours, and the auxiliary vertex → face map.
//! - Values are deliberately absent here. A trial writes its numbers into its own
//!   `Labeling`, so the same graph can back any number of trials at once.
//!
//! Edges are stored exactly as the input lists them. `asymmetric_edges` and
//! `symmetrize` exist for callers that want to check or repair one-way adjacency.
//!
//! Layout: `types.rs` (data types and read access), `build.rs` (construction and
//! maintenance).

mod build;
mod types;

pub use types::{DieGraph, Face, FaceId};
