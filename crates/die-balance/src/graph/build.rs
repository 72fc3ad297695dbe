//! Graph construction from adjacency/vertex rows and in-place maintenance.

use crate::error::DieError;

use super::types::{DieGraph, Face, FaceId};

impl DieGraph {
    /// Build a graph from `(from, to)` adjacency rows.
    ///
    /// Faces are created on first sight (`from` before `to`), so iteration order is
    /// first-seen order. Repeated rows add nothing.
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut graph = Self::default();
        for (from, to) in edges {
            let from = graph.intern(from.as_ref());
            let to = graph.intern(to.as_ref());
            graph.link(from, to);
        }
        graph
    }

    /// Attach `(face, vertex)` rows, validating each face against the adjacency-derived
    /// face set.
    ///
    /// Consumes the graph: on `MissingFaceReference` nothing half-built survives.
    /// A vertex listed more than once maps to the face of its last row.
    pub fn with_vertices<I, S>(mut self, rows: I) -> Result<Self, DieError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        for (row, (face, vertex)) in rows.into_iter().enumerate() {
            let (face, vertex) = (face.as_ref(), vertex.as_ref());
            let Some(id) = self.face_id(face) else {
                return Err(DieError::MissingFaceReference {
                    face: face.to_string(),
                    vertex: vertex.to_string(),
                    row,
                });
            };
            self.vertex_to_face.insert(vertex.to_string(), id);
        }
        Ok(self)
    }

    /// `from_edges` followed by `with_vertices`.
    pub fn load<E, V, S, T>(edges: E, vertices: V) -> Result<Self, DieError>
    where
        E: IntoIterator<Item = (S, S)>,
        V: IntoIterator<Item = (T, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self::from_edges(edges).with_vertices(vertices)
    }

    /// Add `from → to` between existing faces. Returns whether the edge is new.
    pub fn add_adjacency(&mut self, from: &str, to: &str) -> Result<bool, DieError> {
        let from = self.require_face(from)?;
        let to = self.require_face(to)?;
        Ok(self.link(from, to))
    }

    /// Remove `from → to`. Returns whether an edge was removed.
    pub fn remove_adjacency(&mut self, from: &str, to: &str) -> Result<bool, DieError> {
        let from = self.require_face(from)?;
        let to = self.require_face(to)?;
        let adjacent = &mut self.faces[from.0].adjacent;
        match adjacent.iter().position(|&id| id == to) {
            Some(pos) => {
                adjacent.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Add every missing reverse edge. Returns how many edges were added.
    pub fn symmetrize(&mut self) -> usize {
        let missing = self.asymmetric_edges();
        for &(from, to) in &missing {
            self.link(to, from);
        }
        missing.len()
    }

    fn intern(&mut self, name: &str) -> FaceId {
        if let Some(id) = self.face_id(name) {
            return id;
        }
        let id = FaceId(self.faces.len());
        self.faces.push(Face::new(name));
        self.index.insert(name.to_string(), id);
        id
    }

    fn link(&mut self, from: FaceId, to: FaceId) -> bool {
        let adjacent = &mut self.faces[from.0].adjacent;
        if adjacent.contains(&to) {
            return false;
        }
        adjacent.push(to);
        true
    }
}
