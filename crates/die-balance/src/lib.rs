//! Balanced face numbering for polyhedral dice.
//!
//! A die is a graph of faces; a labeling numbers the faces `1..=N`. A labeling is
//! well balanced when every face's neighbours average close to `(N + 1) / 2`. The crate
//! builds the graph, scores labelings, and runs a seeded best-of-K random search.
//!
//! Modules
//! - `graph`: immutable face topology plus the vertex → face map.
//! - `labeling`: per-trial value assignments (sequential, random, explicit).
//! - `metric`: neighbour sums/means, expected value, imbalance score.
//! - `search`: best-of-K with exact-tie retention and replayable trial tokens.
//! - `report`: read-only facts for renderers.
//! - `shapes`: bundled d4/d6/d8/d20 topologies.
//!
//! Parsing input files and printing results are left to callers (see the `cli` crate).

pub mod error;
pub mod graph;
pub mod labeling;
pub mod metric;
pub mod report;
pub mod search;
pub mod shapes;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::DieError;
pub use graph::{DieGraph, Face, FaceId};
pub use labeling::Labeling;
pub use metric::Evaluator;
pub use report::{DieReport, EdgeFact, FaceFact};
pub use search::{best_of_k, run_trial, SearchCfg, SearchOutcome, Trial, TrialToken};
pub use shapes::Shape;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::DieError;
    pub use crate::graph::{DieGraph, FaceId};
    pub use crate::labeling::Labeling;
    pub use crate::metric::Evaluator;
    pub use crate::report::DieReport;
    pub use crate::search::{best_of_k, SearchCfg, SearchOutcome, DEFAULT_TRIALS};
    pub use crate::shapes::Shape;
}
