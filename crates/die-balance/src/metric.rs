//! Imbalance metric: how far each face's neighbour mean sits from the expected value.
//!
//! Model
//! - `A` is the 0/1 adjacency matrix (`A[i, j] = 1` iff face `j` borders face `i`),
//!   `v` the value vector of a labeling. Neighbour sums are `A v`, neighbour means
//!   divide by the out-degree.
//! - Expected value of a fair labeling `1..=N` is `(N + 1) / 2`.
//! - `graph_error = (1/N) Σ_i |mean_i − (N + 1)/2|`, summed in face order.
//!
//! Sums are small integers, so the f64 product is exact and equal labelings score
//! bit-for-bit equal. The search relies on that for tie detection.
//!
//! The adjacency matrix is dense: `N²` entries and an `O(N²)` product per trial. That
//! is nothing for dice (N ≤ 120 or so) but not meant for graphs with thousands of faces.

use nalgebra::{DMatrix, DVector};

use crate::error::DieError;
use crate::graph::{DieGraph, FaceId};
use crate::labeling::Labeling;

/// Scores labelings against one graph. Cheap to share across threads.
#[derive(Clone, Debug)]
pub struct Evaluator<'g> {
    graph: &'g DieGraph,
    adjacency: DMatrix<f64>,
    degree: DVector<f64>,
}

impl<'g> Evaluator<'g> {
    pub fn new(graph: &'g DieGraph) -> Self {
        let n = graph.len();
        let mut adjacency = DMatrix::zeros(n, n);
        for (from, to) in graph.edges() {
            adjacency[(from.0, to.0)] = 1.0;
        }
        let degree = DVector::from_iterator(n, graph.faces().iter().map(|f| f.degree() as f64));
        Self {
            graph,
            adjacency,
            degree,
        }
    }

    #[inline]
    pub fn graph(&self) -> &'g DieGraph {
        self.graph
    }

    /// Sum of the values of the faces bordering `id`.
    ///
    /// An `id` outside this graph is `UnknownFace`, not a panic.
    pub fn adjacent_sum(&self, id: FaceId, labeling: &Labeling) -> Result<u64, DieError> {
        let face = self.graph.require_id(id)?;
        self.check_len(labeling)?;
        face.adjacent()
            .iter()
            .try_fold(0u64, |acc, &n| Ok(acc + u64::from(self.neighbour(id, n, labeling)?)))
    }

    /// Mean value of the faces bordering `id`; a face without neighbours has none.
    pub fn adjacent_mean(&self, id: FaceId, labeling: &Labeling) -> Result<f64, DieError> {
        let k = self.graph.require_id(id)?.degree();
        if k == 0 {
            return Err(self.undefined(id));
        }
        let sum = self.adjacent_sum(id, labeling)?;
        Ok(sum as f64 / k as f64)
    }

    /// All neighbour sums at once (`A v`). Every face must be labeled.
    pub fn adjacent_sums(&self, labeling: &Labeling) -> Result<DVector<f64>, DieError> {
        self.check_len(labeling)?;
        let v = labeling.to_vector()?;
        Ok(&self.adjacency * v)
    }

    /// `(N + 1) / 2`, valid only for a labeling that is exactly `1..=N`.
    pub fn expected_value(&self, labeling: &Labeling) -> Result<f64, DieError> {
        self.check_len(labeling)?;
        labeling.check_permutation()?;
        Ok((self.graph.len() as f64 + 1.0) / 2.0)
    }

    /// Mean absolute deviation of the neighbour means from the expected value.
    pub fn graph_error(&self, labeling: &Labeling) -> Result<f64, DieError> {
        if self.graph.is_empty() {
            return Err(DieError::assignment("die has no faces"));
        }
        let expected = self.expected_value(labeling)?;
        let sums = self.adjacent_sums(labeling)?;
        let mut total = 0.0;
        for (i, (&sum, &k)) in sums.iter().zip(self.degree.iter()).enumerate() {
            if k == 0.0 {
                return Err(self.undefined(FaceId(i)));
            }
            total += (sum / k - expected).abs();
        }
        Ok(total / self.graph.len() as f64)
    }

    fn neighbour(&self, id: FaceId, n: FaceId, labeling: &Labeling) -> Result<u32, DieError> {
        labeling.get(n).ok_or_else(|| {
            DieError::assignment(format!(
                "face {:?} borders unset face {:?}",
                self.graph.face(id).name,
                self.graph.face(n).name
            ))
        })
    }

    fn check_len(&self, labeling: &Labeling) -> Result<(), DieError> {
        if labeling.len() != self.graph.len() {
            return Err(DieError::assignment(format!(
                "labeling covers {} faces, die has {}",
                labeling.len(),
                self.graph.len()
            )));
        }
        Ok(())
    }

    fn undefined(&self, id: FaceId) -> DieError {
        DieError::DivisionUndefined {
            face: self.graph.face(id).name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;

    fn complete4() -> DieGraph {
        let ids = ["1", "2", "3", "4"];
        let mut rows = Vec::new();
        for a in ids {
            for b in ids {
                if a != b {
                    rows.push((a, b));
                }
            }
        }
        DieGraph::from_edges(rows)
    }

    #[test]
    fn complete_four_face_means_and_error() {
        let g = complete4();
        let eval = Evaluator::new(&g);
        let l = Labeling::sequential(&g);
        for id in g.ids() {
            let v = f64::from(l.get(id).unwrap());
            let mean = eval.adjacent_mean(id, &l).unwrap();
            assert!((mean - (10.0 - v) / 3.0).abs() < 1e-12);
            assert_eq!(eval.adjacent_sum(id, &l).unwrap(), 10 - l.get(id).unwrap() as u64);
        }
        assert_eq!(eval.expected_value(&l).unwrap(), 2.5);
        // deviations 1/2, 1/6, 1/6, 1/2 average to 1/3
        let err = eval.graph_error(&l).unwrap();
        assert!((err - 1.0 / 3.0).abs() < 1e-12, "{err}");
    }

    #[test]
    fn foreign_face_id_is_an_error() {
        let g = Shape::D4.graph().unwrap();
        let eval = Evaluator::new(&g);
        let l = Labeling::sequential(&g);
        let unknown = Err(DieError::UnknownFace { face: "#99".into() });
        assert_eq!(eval.adjacent_mean(FaceId(99), &l), unknown);
        assert_eq!(
            eval.adjacent_sum(FaceId(99), &l),
            Err(DieError::UnknownFace { face: "#99".into() })
        );
    }

    #[test]
    fn twenty_faces_expect_ten_and_a_half() {
        let g = Shape::D20.graph().unwrap();
        let eval = Evaluator::new(&g);
        let l = Labeling::sequential(&g);
        assert_eq!(eval.expected_value(&l).unwrap(), 10.5);
        assert!(eval.graph_error(&l).unwrap() >= 0.0);
    }

    #[test]
    fn isolated_face_has_no_mean() {
        // "3" only ever appears as a target, so it has no outgoing adjacency.
        let g = DieGraph::from_edges([("1", "2"), ("2", "1"), ("1", "3")]);
        let eval = Evaluator::new(&g);
        let l = Labeling::sequential(&g);
        let id = g.face_id("3").unwrap();
        assert_eq!(
            eval.adjacent_mean(id, &l),
            Err(DieError::DivisionUndefined { face: "3".into() })
        );
        assert_eq!(
            eval.graph_error(&l),
            Err(DieError::DivisionUndefined { face: "3".into() })
        );
    }

    #[test]
    fn error_requires_a_full_permutation() {
        let g = complete4();
        let eval = Evaluator::new(&g);
        let mut l = Labeling::sequential(&g);
        l.clear(FaceId(3)).unwrap();
        assert!(matches!(
            eval.expected_value(&l),
            Err(DieError::AssignmentInvariantViolation { .. })
        ));
        assert!(matches!(
            eval.graph_error(&l),
            Err(DieError::AssignmentInvariantViolation { .. })
        ));
        // a single sum only needs its own neighbours
        let cut = DieGraph::from_edges([("a", "b"), ("b", "a"), ("c", "a")]);
        let eval = Evaluator::new(&cut);
        let mut partial = Labeling::sequential(&cut);
        partial.clear(FaceId(2)).unwrap();
        assert_eq!(eval.adjacent_sum(FaceId(0), &partial).unwrap(), 2);
        assert!(eval.adjacent_sum(FaceId(2), &partial).is_ok());
        assert!(eval.adjacent_sum(FaceId(1), &partial).is_ok());

        let doubled = Labeling::from_values([1, 1, 3, 4]).unwrap();
        assert!(Evaluator::new(&g).graph_error(&doubled).is_err());
        let short = Labeling::from_values([1, 2, 3]).unwrap();
        assert!(Evaluator::new(&g).graph_error(&short).is_err());
    }

    #[test]
    fn matrix_sums_agree_with_per_face_sums() {
        let g = Shape::D20.graph().unwrap();
        let eval = Evaluator::new(&g);
        let l = Labeling::sequential(&g);
        let sums = eval.adjacent_sums(&l).unwrap();
        for id in g.ids() {
            assert_eq!(sums[id.0], eval.adjacent_sum(id, &l).unwrap() as f64);
        }
    }

    #[test]
    fn empty_die_has_no_error() {
        let g = DieGraph::default();
        let eval = Evaluator::new(&g);
        assert!(eval.graph_error(&Labeling::unset(0)).is_err());
    }
}
