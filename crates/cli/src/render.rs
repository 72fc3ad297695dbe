use std::io::{self, Write};

use die_balance::{DieError, DieGraph, DieReport, Evaluator, SearchCfg, SearchOutcome, TrialToken};
use serde::Serialize;

/// One winning labeling with its full projection.
#[derive(Debug, Serialize)]
pub struct WinnerDoc {
    pub trial: TrialToken,
    pub report: DieReport,
}

/// Everything a search run prints or writes.
#[derive(Debug, Serialize)]
pub struct SearchDoc {
    pub die: String,
    pub faces: usize,
    pub trials: usize,
    pub seed: u64,
    pub min_error: f64,
    pub winners: Vec<WinnerDoc>,
}

impl SearchDoc {
    pub fn build(
        die: String,
        graph: &DieGraph,
        cfg: &SearchCfg,
        outcome: &SearchOutcome,
    ) -> Result<Self, DieError> {
        let evaluator = Evaluator::new(graph);
        let winners = outcome
            .winners
            .iter()
            .map(|w| {
                Ok(WinnerDoc {
                    trial: w.token,
                    report: DieReport::project(&evaluator, &w.labeling)?,
                })
            })
            .collect::<Result<Vec<_>, DieError>>()?;
        Ok(Self {
            die,
            faces: graph.len(),
            trials: cfg.trials,
            seed: cfg.seed,
            min_error: outcome.min_error,
            winners,
        })
    }
}

pub fn write_search_text<W: Write>(doc: &SearchDoc, w: &mut W) -> io::Result<()> {
    writeln!(
        w,
        "die {} ({} faces): {} trials, seed {}",
        doc.die, doc.faces, doc.trials, doc.seed
    )?;
    writeln!(
        w,
        "best error {} reached by {} labeling(s)",
        doc.min_error,
        doc.winners.len()
    )?;
    for (k, winner) in doc.winners.iter().enumerate() {
        writeln!(w)?;
        writeln!(w, "winner {} (trial {})", k + 1, winner.trial.index)?;
        write_report_text(&winner.report, w)?;
    }
    Ok(())
}

pub fn write_report_text<W: Write>(report: &DieReport, w: &mut W) -> io::Result<()> {
    let mut edges = report.edges.iter().peekable();
    for face in &report.faces {
        while let Some(e) = edges.next_if(|e| e.source == face.face) {
            writeln!(
                w,
                "face {} ( {} ) -> face {} ( {} )",
                e.source, e.source_value, e.target, e.target_value
            )?;
        }
        writeln!(w, "face id {} -> face sum = {}", face.face, face.adjacent_sum)?;
    }
    writeln!(w)?;
    for face in &report.faces {
        writeln!(w, "face id {} -> face mean = {}", face.face, face.adjacent_mean)?;
    }
    writeln!(w, "expected face value: {}", report.expected_value)?;
    writeln!(w, "error for faces {}", report.graph_error)?;
    Ok(())
}
