//! Data types for the die graph and read-only accessors.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::DieError;

/// Dense face index: position of the face in first-seen order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FaceId(pub usize);

/// One die face and the faces it borders.
///
/// Invariants:
/// - `adjacent` holds no duplicates and keeps insertion order.
/// - A self-loop is representable (input is not validated for it); see
///   `DieGraph::self_loops`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Face {
    pub name: String,
    pub(super) adjacent: Vec<FaceId>,
}

impl Face {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            adjacent: Vec::new(),
        }
    }

    #[inline]
    pub fn adjacent(&self) -> &[FaceId] {
        &self.adjacent
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.adjacent.len()
    }

    #[inline]
    pub fn borders(&self, other: FaceId) -> bool {
        self.adjacent.contains(&other)
    }
}

/// Face-adjacency graph of a die.
///
/// The graph owns every face. `index` maps identifiers back to dense ids and
/// `vertex_to_face` is populated only by `with_vertices`.
#[derive(Clone, Debug, Default)]
pub struct DieGraph {
    pub(super) faces: Vec<Face>,
    pub(super) index: HashMap<String, FaceId>,
    pub(super) vertex_to_face: BTreeMap<String, FaceId>,
}

impl DieGraph {
    /// Number of faces (N).
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Faces in iteration (first-seen) order.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Face for a dense id.
    ///
    /// # Panics
    /// If `id` is out of range, i.e. it came from another graph. Use [`DieGraph::get`]
    /// for ids of unknown origin.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }

    #[inline]
    pub fn get(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0)
    }

    /// Like `get`, but an out-of-range id is an `UnknownFace` error.
    pub fn require_id(&self, id: FaceId) -> Result<&Face, DieError> {
        self.get(id).ok_or_else(|| DieError::unknown_index(id.0))
    }

    pub fn ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId)
    }

    pub fn face_id(&self, name: &str) -> Option<FaceId> {
        self.index.get(name).copied()
    }

    /// Like `face_id`, but an unknown identifier is an error.
    pub fn require_face(&self, name: &str) -> Result<FaceId, DieError> {
        self.face_id(name).ok_or_else(|| DieError::UnknownFace {
            face: name.to_string(),
        })
    }

    pub fn adjacent_count(&self, id: FaceId) -> usize {
        self.face(id).degree()
    }

    /// All directed edges, grouped by source face in iteration order.
    pub fn edges(&self) -> impl Iterator<Item = (FaceId, FaceId)> + '_ {
        self.ids()
            .flat_map(move |from| self.face(from).adjacent.iter().map(move |&to| (from, to)))
    }

    pub fn edge_count(&self) -> usize {
        self.faces.iter().map(Face::degree).sum()
    }

    pub fn face_for_vertex(&self, vertex: &str) -> Option<FaceId> {
        self.vertex_to_face.get(vertex).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_to_face.len()
    }

    /// Faces listed as their own neighbour.
    pub fn self_loops(&self) -> Vec<FaceId> {
        self.ids().filter(|&id| self.face(id).borders(id)).collect()
    }

    /// Directed edges `a → b` without the matching `b → a`.
    pub fn asymmetric_edges(&self) -> Vec<(FaceId, FaceId)> {
        self.edges()
            .filter(|&(from, to)| !self.face(to).borders(from))
            .collect()
    }

    #[inline]
    pub fn is_symmetric(&self) -> bool {
        self.asymmetric_edges().is_empty()
    }
}
