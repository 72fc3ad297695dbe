//! Bundled platonic dice used in tests, benchmarks, and as CLI input.
//!
//! Purpose
//! - Provide face-adjacency and face/vertex incidence for the d4, d6, d8 and d20 so
//!   callers can search without a CSV pair.
//! - Faces are named `"1"..="N"` and vertices `"v1"..`, matching `data/d20_*.csv`.
//!
//! Tables list each undirected adjacency once; `edge_rows` emits both directions.
//!
//! Face degrees: d4 3, d6 4, d8 3, d20 3.

use crate::error::DieError;
use crate::graph::DieGraph;

#[rustfmt::skip]
const D4_ADJ: &[(u8, u8)] = &[(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)];
#[rustfmt::skip]
const D4_VERTS: &[(u8, u8)] = &[
    (1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 4),
    (3, 1), (3, 3), (3, 4), (4, 2), (4, 3), (4, 4),
];

// Faces 1/2, 3/4 and 5/6 are opposite.
#[rustfmt::skip]
const D6_ADJ: &[(u8, u8)] = &[
    (1, 3), (1, 4), (1, 5), (1, 6), (2, 3), (2, 4),
    (2, 5), (2, 6), (3, 5), (3, 6), (4, 5), (4, 6),
];
#[rustfmt::skip]
const D6_VERTS: &[(u8, u8)] = &[
    (1, 1), (1, 2), (1, 3), (1, 4), (2, 5), (2, 6), (2, 7), (2, 8),
    (3, 1), (3, 2), (3, 5), (3, 6), (4, 3), (4, 4), (4, 7), (4, 8),
    (5, 1), (5, 3), (5, 5), (5, 7), (6, 2), (6, 4), (6, 6), (6, 8),
];

#[rustfmt::skip]
const D8_ADJ: &[(u8, u8)] = &[
    (1, 2), (1, 3), (1, 5), (2, 4), (2, 6), (3, 4),
    (3, 7), (4, 8), (5, 6), (5, 7), (6, 8), (7, 8),
];
#[rustfmt::skip]
const D8_VERTS: &[(u8, u8)] = &[
    (1, 1), (1, 3), (1, 5), (2, 1), (2, 3), (2, 6), (3, 1), (3, 4),
    (3, 5), (4, 1), (4, 4), (4, 6), (5, 2), (5, 3), (5, 5), (6, 2),
    (6, 3), (6, 6), (7, 2), (7, 4), (7, 5), (8, 2), (8, 4), (8, 6),
];

#[rustfmt::skip]
const D20_ADJ: &[(u8, u8)] = &[
    (1, 2), (1, 3), (1, 6), (2, 5), (2, 7), (3, 4), (3, 9), (4, 5),
    (4, 17), (5, 18), (6, 8), (6, 10), (7, 8), (7, 11), (8, 12), (9, 10),
    (9, 14), (10, 15), (11, 13), (11, 18), (12, 13), (12, 15), (13, 20), (14, 16),
    (14, 17), (15, 16), (16, 20), (17, 19), (18, 19), (19, 20),
];
#[rustfmt::skip]
const D20_VERTS: &[(u8, u8)] = &[
    (1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 8), (3, 1), (3, 3),
    (3, 7), (4, 1), (4, 6), (4, 7), (5, 1), (5, 6), (5, 8), (6, 2),
    (6, 3), (6, 9), (7, 2), (7, 4), (7, 8), (8, 2), (8, 4), (8, 9),
    (9, 3), (9, 5), (9, 7), (10, 3), (10, 5), (10, 9), (11, 4), (11, 8),
    (11, 12), (12, 4), (12, 9), (12, 10), (13, 4), (13, 10), (13, 12), (14, 5),
    (14, 7), (14, 11), (15, 5), (15, 9), (15, 10), (16, 5), (16, 10), (16, 11),
    (17, 6), (17, 7), (17, 11), (18, 6), (18, 8), (18, 12), (19, 6), (19, 11),
    (19, 12), (20, 10), (20, 11), (20, 12),
];

/// A bundled die.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    D4,
    D6,
    D8,
    D20,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::D4, Shape::D6, Shape::D8, Shape::D20];

    pub fn name(self) -> &'static str {
        match self {
            Shape::D4 => "d4",
            Shape::D6 => "d6",
            Shape::D8 => "d8",
            Shape::D20 => "d20",
        }
    }

    pub fn faces(self) -> usize {
        match self {
            Shape::D4 => 4,
            Shape::D6 => 6,
            Shape::D8 => 8,
            Shape::D20 => 20,
        }
    }

    fn tables(self) -> (&'static [(u8, u8)], &'static [(u8, u8)]) {
        match self {
            Shape::D4 => (D4_ADJ, D4_VERTS),
            Shape::D6 => (D6_ADJ, D6_VERTS),
            Shape::D8 => (D8_ADJ, D8_VERTS),
            Shape::D20 => (D20_ADJ, D20_VERTS),
        }
    }

    /// Adjacency rows in both directions: all forward rows first, then the reverses.
    pub fn edge_rows(self) -> Vec<(String, String)> {
        let (adj, _) = self.tables();
        let forward = adj.iter().map(|&(a, b)| (a.to_string(), b.to_string()));
        let backward = adj.iter().map(|&(a, b)| (b.to_string(), a.to_string()));
        forward.chain(backward).collect()
    }

    /// `(face, vertex)` incidence rows.
    pub fn vertex_rows(self) -> Vec<(String, String)> {
        let (_, verts) = self.tables();
        verts
            .iter()
            .map(|&(face, vertex)| (face.to_string(), format!("v{vertex}")))
            .collect()
    }

    pub fn graph(self) -> Result<DieGraph, DieError> {
        DieGraph::load(self.edge_rows(), self.vertex_rows())
    }
}
