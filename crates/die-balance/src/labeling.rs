//! Face labelings: one value slot per face, owned by a single trial.
//!
//! A `Labeling` is indexed by `FaceId` and never shares storage with the graph or with
//! another labeling. Cloning one is a full, independent copy.

use std::num::NonZeroU32;

use nalgebra::DVector;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::DieError;
use crate::graph::{DieGraph, FaceId};

/// Value assignment for the faces of one graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Labeling {
    values: Vec<Option<NonZeroU32>>,
}

impl Labeling {
    /// `n` faces, all unset.
    pub fn unset(n: usize) -> Self {
        Self {
            values: vec![None; n],
        }
    }

    /// Values `1..=N` in the graph's iteration order.
    pub fn sequential(graph: &DieGraph) -> Self {
        let order: Vec<FaceId> = graph.ids().collect();
        Self::along(&order)
    }

    /// A uniformly random permutation of the faces labeled `1..=N` along the shuffle.
    pub fn randomized<R: Rng + ?Sized>(graph: &DieGraph, rng: &mut R) -> Self {
        let mut order: Vec<FaceId> = graph.ids().collect();
        order.shuffle(rng);
        Self::along(&order)
    }

    /// Label `order[k]` with `k + 1`. The order must visit every face of `graph` once.
    pub fn from_order(graph: &DieGraph, order: &[FaceId]) -> Result<Self, DieError> {
        let n = graph.len();
        if order.len() != n {
            return Err(DieError::order(format!(
                "expected {n} faces, got {}",
                order.len()
            )));
        }
        let mut seen = vec![false; n];
        for &id in order {
            match seen.get_mut(id.0) {
                None => {
                    return Err(DieError::order(format!(
                        "face #{} is not part of the die",
                        id.0
                    )))
                }
                Some(true) => {
                    return Err(DieError::order(format!("face #{} listed twice", id.0)))
                }
                Some(slot) => *slot = true,
            }
        }
        Ok(Self::along(order))
    }

    /// Explicit values in face order. Zero is rejected; other checks are left to
    /// `check_permutation`.
    pub fn from_values<I>(values: I) -> Result<Self, DieError>
    where
        I: IntoIterator<Item = u32>,
    {
        let values = values
            .into_iter()
            .enumerate()
            .map(|(face, v)| {
                NonZeroU32::new(v)
                    .map(Some)
                    .ok_or(DieError::NonPositiveValue { face })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }

    fn along(order: &[FaceId]) -> Self {
        let mut labeling = Self::unset(order.len());
        for (value, &id) in (1u32..).zip(order) {
            labeling.values[id.0] = NonZeroU32::new(value);
        }
        labeling
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, id: FaceId) -> Option<u32> {
        self.values.get(id.0).copied().flatten().map(NonZeroU32::get)
    }

    /// Set one face; returns its previous value.
    pub fn set(&mut self, id: FaceId, value: NonZeroU32) -> Result<Option<NonZeroU32>, DieError> {
        Ok(self.slot(id)?.replace(value))
    }

    /// Unset one face; returns its previous value. Other faces are untouched.
    pub fn clear(&mut self, id: FaceId) -> Result<Option<NonZeroU32>, DieError> {
        Ok(self.slot(id)?.take())
    }

    fn slot(&mut self, id: FaceId) -> Result<&mut Option<NonZeroU32>, DieError> {
        self.values
            .get_mut(id.0)
            .ok_or_else(|| DieError::unknown_index(id.0))
    }

    /// Values in face order, `None` for unset faces.
    pub fn values(&self) -> impl Iterator<Item = Option<u32>> + '_ {
        self.values.iter().map(|v| v.map(NonZeroU32::get))
    }

    /// Value of `id`, failing if it is unset.
    pub fn require(&self, id: FaceId) -> Result<u32, DieError> {
        self.get(id)
            .ok_or_else(|| DieError::assignment(format!("face #{} is unset", id.0)))
    }

    /// Check that the values are exactly `1..=N`, each once.
    pub fn check_permutation(&self) -> Result<(), DieError> {
        let n = self.values.len();
        let mut seen = vec![false; n];
        for (face, value) in self.values.iter().enumerate() {
            let Some(value) = value else {
                return Err(DieError::assignment(format!("face #{face} is unset")));
            };
            let slot = usize::try_from(value.get() - 1)
                .ok()
                .and_then(|k| seen.get_mut(k))
                .ok_or_else(|| {
                    DieError::assignment(format!(
                        "face #{face} has value {value}, outside 1..={n}"
                    ))
                })?;
            if *slot {
                return Err(DieError::assignment(format!(
                    "value {value} is assigned more than once"
                )));
            }
            *slot = true;
        }
        Ok(())
    }

    /// Dense value vector for matrix evaluation. Every face must be set.
    pub(crate) fn to_vector(&self) -> Result<DVector<f64>, DieError> {
        let mut v = DVector::zeros(self.values.len());
        for (face, value) in self.values.iter().enumerate() {
            let value =
                value.ok_or_else(|| DieError::assignment(format!("face #{face} is unset")))?;
            v[face] = f64::from(value.get());
        }
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn ring(n: usize) -> DieGraph {
        let names: Vec<String> = (1..=n).map(|k| k.to_string()).collect();
        DieGraph::from_edges(
            (0..n).map(|k| (names[k].clone(), names[(k + 1) % n].clone())),
        )
    }

    #[test]
    fn sequential_numbers_faces_in_iteration_order() {
        let g = DieGraph::from_edges([("c", "a"), ("a", "b"), ("b", "c")]);
        let l = Labeling::sequential(&g);
        assert_eq!(l.values().collect::<Vec<_>>(), [Some(1), Some(2), Some(3)]);
        assert_eq!(l.get(g.face_id("c").unwrap()), Some(1));
        assert!(l.check_permutation().is_ok());
    }

    #[test]
    fn sequential_on_twenty_faces_is_one_to_twenty() {
        let l = Labeling::sequential(&ring(20));
        let mut values: Vec<u32> = l.values().flatten().collect();
        values.sort_unstable();
        assert_eq!(values, (1..=20).collect::<Vec<u32>>());
    }

    #[test]
    fn clear_only_touches_one_face() {
        let g = ring(4);
        let mut l = Labeling::sequential(&g);
        assert_eq!(l.clear(FaceId(2)).unwrap().map(NonZeroU32::get), Some(3));
        assert_eq!(l.values().collect::<Vec<_>>(), [Some(1), Some(2), None, Some(4)]);
        assert!(l.check_permutation().is_err());
        assert_eq!(l.clear(FaceId(2)), Ok(None));
        l.set(FaceId(2), NonZeroU32::new(3).unwrap()).unwrap();
        assert!(l.check_permutation().is_ok());
    }

    #[test]
    fn out_of_range_face_is_an_error() {
        let mut l = Labeling::sequential(&ring(4));
        let unknown = Err(DieError::UnknownFace { face: "#9".into() });
        assert_eq!(l.clear(FaceId(9)), unknown.clone());
        assert_eq!(l.set(FaceId(9), NonZeroU32::new(1).unwrap()), unknown);
        assert_eq!(l.get(FaceId(9)), None);
        assert!(l.check_permutation().is_ok());
    }

    #[test]
    fn from_order_rejects_partial_or_repeated_orders() {
        let g = ring(3);
        let ok = Labeling::from_order(&g, &[FaceId(2), FaceId(0), FaceId(1)]).unwrap();
        assert_eq!(ok.values().collect::<Vec<_>>(), [Some(2), Some(3), Some(1)]);
        assert!(matches!(
            Labeling::from_order(&g, &[FaceId(0), FaceId(1)]),
            Err(DieError::InvalidOrder { .. })
        ));
        assert!(matches!(
            Labeling::from_order(&g, &[FaceId(0), FaceId(0), FaceId(1)]),
            Err(DieError::InvalidOrder { .. })
        ));
        assert!(matches!(
            Labeling::from_order(&g, &[FaceId(0), FaceId(1), FaceId(7)]),
            Err(DieError::InvalidOrder { .. })
        ));
    }

    #[test]
    fn permutation_check_names_the_problem() {
        assert_eq!(
            Labeling::from_values([1, 0, 2]),
            Err(DieError::NonPositiveValue { face: 1 })
        );
        let dup = Labeling::from_values([1, 2, 2]).unwrap();
        let out_of_range = Labeling::from_values([1, 2, 4]).unwrap();
        for (labeling, needle) in [(dup, "more than once"), (out_of_range, "outside 1..=3")] {
            match labeling.check_permutation() {
                Err(DieError::AssignmentInvariantViolation { reason }) => {
                    assert!(reason.contains(needle), "{reason}")
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(Labeling::unset(2).check_permutation().is_err());
        assert!(Labeling::unset(0).check_permutation().is_ok());
    }

    #[test]
    fn clones_are_independent() {
        let g = ring(5);
        let a = Labeling::sequential(&g);
        let mut b = a.clone();
        b.clear(FaceId(0)).unwrap();
        assert_eq!(a.get(FaceId(0)), Some(1));
        assert_eq!(b.get(FaceId(0)), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn randomized_is_always_a_permutation(seed in any::<u64>(), n in 1usize..40) {
            let g = ring(n);
            let mut rng = StdRng::seed_from_u64(seed);
            let l = Labeling::randomized(&g, &mut rng);
            prop_assert_eq!(l.len(), n);
            prop_assert!(l.check_permutation().is_ok());
        }
    }
}
