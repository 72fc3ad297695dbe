//! Error type shared by graph construction, labeling, scoring and search.

use std::fmt;

/// Errors surfaced by the die-balance core.
///
/// Every variant is fatal for the operation that raised it; the search aborts on the
/// first error instead of skipping the offending trial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DieError {
    /// A vertex row names a face that the adjacency data never mentioned.
    MissingFaceReference {
        face: String,
        vertex: String,
        row: usize,
    },
    /// A face has no recorded neighbours, so its neighbour mean is undefined.
    DivisionUndefined { face: String },
    /// The labeling is not exactly a permutation of `1..=N`.
    AssignmentInvariantViolation { reason: String },
    /// A face value of zero was requested; values are positive.
    NonPositiveValue { face: usize },
    /// An explicit labeling order does not visit every face exactly once.
    InvalidOrder { reason: String },
    /// A search was configured with zero trials.
    InvalidTrialCount,
    /// A face identifier that the graph does not contain.
    UnknownFace { face: String },
}

impl DieError {
    pub(crate) fn assignment(reason: impl Into<String>) -> Self {
        Self::AssignmentInvariantViolation {
            reason: reason.into(),
        }
    }

    pub(crate) fn order(reason: impl Into<String>) -> Self {
        Self::InvalidOrder {
            reason: reason.into(),
        }
    }

    /// A dense face index past the end of the graph or labeling.
    pub(crate) fn unknown_index(index: usize) -> Self {
        Self::UnknownFace {
            face: format!("#{index}"),
        }
    }
}

impl fmt::Display for DieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFaceReference { face, vertex, row } => write!(
                f,
                "missing die face {face:?} referenced by vertex {vertex:?} (vertex row {row})"
            ),
            Self::DivisionUndefined { face } => write!(
                f,
                "face {face:?} has no adjacent faces; its adjacent mean is undefined"
            ),
            Self::AssignmentInvariantViolation { reason } => write!(
                f,
                "face values are not a permutation of 1..N: {reason}"
            ),
            Self::NonPositiveValue { face } => {
                write!(f, "face #{face} cannot take value 0; values start at 1")
            }
            Self::InvalidOrder { reason } => write!(f, "invalid labeling order: {reason}"),
            Self::InvalidTrialCount => write!(f, "search needs at least one trial"),
            Self::UnknownFace { face } => write!(f, "unknown die face {face:?}"),
        }
    }
}

impl std::error::Error for DieError {}
