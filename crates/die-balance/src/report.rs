//! Read-only projection of a labeled die into plain facts for rendering.
//!
//! Nothing here mutates the graph or the labeling; callers decide how to print.

use serde::Serialize;

use crate::error::DieError;
use crate::labeling::Labeling;
use crate::metric::Evaluator;

/// One directed adjacency with the values on both ends.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeFact {
    pub source: String,
    pub source_value: u32,
    pub target: String,
    pub target_value: u32,
}

/// Per-face neighbour aggregates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FaceFact {
    pub face: String,
    pub value: u32,
    pub adjacent_sum: u64,
    pub adjacent_mean: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DieReport {
    pub edges: Vec<EdgeFact>,
    pub faces: Vec<FaceFact>,
    pub expected_value: f64,
    pub graph_error: f64,
}

impl DieReport {
    /// Project `labeling` (which must be a full permutation) over the evaluator's graph.
    pub fn project(evaluator: &Evaluator<'_>, labeling: &Labeling) -> Result<Self, DieError> {
        let graph = evaluator.graph();
        let expected_value = evaluator.expected_value(labeling)?;
        let graph_error = evaluator.graph_error(labeling)?;

        let edges = graph
            .edges()
            .map(|(from, to)| {
                Ok(EdgeFact {
                    source: graph.face(from).name.clone(),
                    source_value: labeling.require(from)?,
                    target: graph.face(to).name.clone(),
                    target_value: labeling.require(to)?,
                })
            })
            .collect::<Result<Vec<_>, DieError>>()?;

        let faces = graph
            .ids()
            .map(|id| {
                Ok(FaceFact {
                    face: graph.face(id).name.clone(),
                    value: labeling.require(id)?,
                    adjacent_sum: evaluator.adjacent_sum(id, labeling)?,
                    adjacent_mean: evaluator.adjacent_mean(id, labeling)?,
                })
            })
            .collect::<Result<Vec<_>, DieError>>()?;

        Ok(Self {
            edges,
            faces,
            expected_value,
            graph_error,
        })
    }
}
