use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use die_balance::{DieGraph, Shape};
use polars::prelude::*;

pub const FROM_COLUMN: &str = "from_die_face_id";
pub const TO_COLUMN: &str = "to_die_face_id";
pub const FACE_COLUMN: &str = "die_face_id";
pub const VERTEX_COLUMN: &str = "die_vertex_id";

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ShapeArg {
    D4,
    D6,
    D8,
    D20,
}

impl From<ShapeArg> for Shape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::D4 => Shape::D4,
            ShapeArg::D6 => Shape::D6,
            ShapeArg::D8 => Shape::D8,
            ShapeArg::D20 => Shape::D20,
        }
    }
}

/// Where the die topology comes from.
#[derive(Args, Clone, Debug)]
pub struct InputArgs {
    /// Face adjacency CSV (from_die_face_id,to_die_face_id)
    #[arg(long)]
    pub faces: Option<PathBuf>,

    /// Face/vertex CSV (die_face_id,die_vertex_id), validated against the faces
    #[arg(long, requires = "faces")]
    pub vertices: Option<PathBuf>,

    /// Use a bundled die instead of CSV input
    #[arg(long, value_enum, conflicts_with_all = ["faces", "vertices"])]
    pub shape: Option<ShapeArg>,

    /// Add the reverse of every one-way adjacency before scoring
    #[arg(long)]
    pub symmetrize: bool,
}

impl InputArgs {
    /// Short human label for logs and provenance.
    pub fn describe(&self) -> String {
        match (self.shape, &self.faces) {
            (Some(shape), _) => format!("shape:{}", Shape::from(shape).name()),
            (None, Some(faces)) => faces.display().to_string(),
            (None, None) => "none".to_string(),
        }
    }
}

/// Build the die graph, log data-quality findings, and optionally symmetrize.
pub fn load_die(args: &InputArgs) -> Result<DieGraph> {
    let mut graph = match (args.shape, &args.faces) {
        (Some(shape), _) => Shape::from(shape).graph()?,
        (None, Some(faces)) => {
            let edges = read_pairs(faces, FROM_COLUMN, TO_COLUMN)?;
            let graph = DieGraph::from_edges(edges);
            match &args.vertices {
                Some(vertices) => {
                    let rows = read_pairs(vertices, FACE_COLUMN, VERTEX_COLUMN)?;
                    graph
                        .with_vertices(rows)
                        .with_context(|| format!("loading {}", vertices.display()))?
                }
                None => graph,
            }
        }
        (None, None) => bail!("no die given: pass --faces <csv> or --shape <die>"),
    };
    tracing::info!(
        source = %args.describe(),
        faces = graph.len(),
        edges = graph.edge_count(),
        vertices = graph.vertex_count(),
        "die loaded"
    );

    for id in graph.self_loops() {
        tracing::warn!(face = %graph.face(id).name, "face lists itself as adjacent");
    }
    let one_way = graph.asymmetric_edges().len();
    if one_way > 0 {
        if args.symmetrize {
            let added = graph.symmetrize();
            tracing::info!(added, "added reverse edges");
        } else {
            tracing::warn!(
                one_way,
                "adjacency is not symmetric; pass --symmetrize to add reverse edges"
            );
        }
    }
    Ok(graph)
}

/// Read two string columns of a headed CSV as row pairs.
pub fn read_pairs(path: &Path, left: &str, right: &str) -> Result<Vec<(String, String)>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading {}", path.display()))?;
    let lhs = string_column(&df, path, left)?;
    let rhs = string_column(&df, path, right)?;
    lhs.into_iter()
        .zip(rhs)
        .enumerate()
        .map(|(row, pair)| match pair {
            (Some(a), Some(b)) => Ok((a, b)),
            (a, _) => {
                let column = if a.is_none() { left } else { right };
                bail!("{}: empty {column} in data row {row}", path.display())
            }
        })
        .collect()
}

fn string_column(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(name)
        .with_context(|| format!("{}: missing column {name}", path.display()))?
        .cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use die_balance::DieError;
    use std::fs;
    use tempfile::tempdir;

    fn csv_args(faces: PathBuf, vertices: Option<PathBuf>) -> InputArgs {
        InputArgs {
            faces: Some(faces),
            vertices,
            shape: None,
            symmetrize: false,
        }
    }

    #[test]
    fn reads_pairs_as_strings_in_file_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("faces.csv");
        fs::write(&path, "from_die_face_id,to_die_face_id\n1,2\n2,1\n10,2\n").unwrap();
        let rows = read_pairs(&path, FROM_COLUMN, TO_COLUMN).unwrap();
        assert_eq!(
            rows,
            vec![
                ("1".to_string(), "2".to_string()),
                ("2".to_string(), "1".to_string()),
                ("10".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn missing_column_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "from,to\n1,2\n").unwrap();
        let err = read_pairs(&path, FROM_COLUMN, TO_COLUMN).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("from_die_face_id"), "{msg}");
        assert!(msg.contains("bad.csv"), "{msg}");
    }

    #[test]
    fn unknown_vertex_face_aborts_loading() {
        let dir = tempdir().unwrap();
        let faces = dir.path().join("faces.csv");
        let vertices = dir.path().join("vertices.csv");
        fs::write(&faces, "from_die_face_id,to_die_face_id\na,b\nb,a\n").unwrap();
        fs::write(&vertices, "die_face_id,die_vertex_id\na,v1\nc,v2\n").unwrap();
        let err = load_die(&csv_args(faces, Some(vertices))).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DieError>(),
            Some(&DieError::MissingFaceReference {
                face: "c".into(),
                vertex: "v2".into(),
                row: 1,
            })
        );
    }

    #[test]
    fn symmetrize_flag_repairs_one_way_rows() {
        let dir = tempdir().unwrap();
        let faces = dir.path().join("faces.csv");
        fs::write(&faces, "from_die_face_id,to_die_face_id\na,b\nb,c\nc,a\n").unwrap();
        let mut args = csv_args(faces, None);
        assert!(!load_die(&args).unwrap().is_symmetric());
        args.symmetrize = true;
        let graph = load_die(&args).unwrap();
        assert!(graph.is_symmetric());
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn shipped_d20_csvs_match_the_bundled_d20() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
        let args = csv_args(
            data.join("d20_faces.csv"),
            Some(data.join("d20_vertices.csv")),
        );
        let from_csv = load_die(&args).unwrap();
        let bundled = Shape::D20.graph().unwrap();
        assert_eq!(from_csv.len(), 20);
        assert_eq!(from_csv.vertex_count(), 12);
        assert_eq!(
            from_csv.edges().collect::<Vec<_>>(),
            bundled.edges().collect::<Vec<_>>()
        );
    }

    #[test]
    fn bundled_shape_needs_no_files() {
        let args = InputArgs {
            faces: None,
            vertices: None,
            shape: Some(ShapeArg::D8),
            symmetrize: false,
        };
        assert_eq!(load_die(&args).unwrap().len(), 8);
        assert_eq!(args.describe(), "shape:d8");
    }
}
