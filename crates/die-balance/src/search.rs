//! Best-of-K random search for the best-balanced labeling.
//!
//! Model
//! - Trial `i` labels the faces with a random permutation drawn from its own RNG,
//!   derived from `TrialToken { seed, index: i }`. A trial's labeling depends on
//!   `(seed, i)` only, so runs replay exactly and trials can run on any thread.
//! - Outcomes reduce in trial order: a strictly smaller error replaces the winner set,
//!   an exactly equal error joins it, anything else is dropped.
//! - The parallel path reduces per-trial outcomes with `SearchOutcome::merge`, which is
//!   associative and keeps left-before-right order, so it returns exactly what the
//!   sequential path returns.
//!
//! The winner set is not capped: every exact tie is kept.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::DieError;
use crate::graph::DieGraph;
use crate::labeling::Labeling;
use crate::metric::Evaluator;

/// Trial count used when the caller does not pick one.
pub const DEFAULT_TRIALS: usize = 10_000;

/// Search configuration.
#[derive(Clone, Copy, Debug)]
pub struct SearchCfg {
    pub trials: usize,
    /// Base seed; every trial stream is derived from it.
    pub seed: u64,
    /// Evaluate trials on the rayon pool. Results are identical either way.
    pub parallel: bool,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: 0,
            parallel: true,
        }
    }
}

/// Replay token identifying one trial's random stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TrialToken {
    pub seed: u64,
    pub index: u64,
}

impl TrialToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer; neighbouring indices land far apart.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }

    /// The labeling this trial draws for `graph`.
    pub fn replay(self, graph: &DieGraph) -> Labeling {
        Labeling::randomized(graph, &mut self.to_std_rng())
    }
}

/// One scored trial.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trial {
    pub token: TrialToken,
    pub labeling: Labeling,
    pub error: f64,
}

/// Minimum error and every trial that reached it, in trial order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub min_error: f64,
    pub winners: Vec<Trial>,
}

impl SearchOutcome {
    pub fn single(trial: Trial) -> Self {
        Self {
            min_error: trial.error,
            winners: vec![trial],
        }
    }

    /// Feed the next trial in order.
    pub fn offer(&mut self, trial: Trial) {
        if trial.error < self.min_error {
            tracing::debug!(
                index = trial.token.index,
                error = trial.error,
                "new minimum"
            );
            self.min_error = trial.error;
            self.winners.clear();
            self.winners.push(trial);
        } else if trial.error == self.min_error {
            tracing::debug!(
                index = trial.token.index,
                ties = self.winners.len() + 1,
                "tie"
            );
            self.winners.push(trial);
        }
    }

    /// Combine with the outcome of the trials that come after `self`.
    pub fn merge(mut self, later: Self) -> Self {
        if later.min_error < self.min_error {
            later
        } else {
            if later.min_error == self.min_error {
                self.winners.extend(later.winners);
            }
            self
        }
    }
}

/// Draw and score a single trial.
pub fn run_trial(evaluator: &Evaluator<'_>, token: TrialToken) -> Result<Trial, DieError> {
    let labeling = token.replay(evaluator.graph());
    let error = evaluator.graph_error(&labeling)?;
    Ok(Trial {
        token,
        labeling,
        error,
    })
}

/// Run `cfg.trials` independent trials and keep the best-balanced labelings.
///
/// The first trial error (e.g. a face with no neighbours) aborts the search.
pub fn best_of_k(graph: &DieGraph, cfg: &SearchCfg) -> Result<SearchOutcome, DieError> {
    if cfg.trials == 0 {
        return Err(DieError::InvalidTrialCount);
    }
    let evaluator = Evaluator::new(graph);
    let token = |index: u64| TrialToken {
        seed: cfg.seed,
        index,
    };
    let trials = cfg.trials as u64;

    let outcome = if cfg.parallel {
        (0..trials)
            .into_par_iter()
            .map(|i| run_trial(&evaluator, token(i)).map(SearchOutcome::single))
            .try_reduce_with(|a, b| Ok(a.merge(b)))
            .ok_or(DieError::InvalidTrialCount)??
    } else {
        let mut outcome = SearchOutcome::single(run_trial(&evaluator, token(0))?);
        for i in 1..trials {
            outcome.offer(run_trial(&evaluator, token(i))?);
        }
        outcome
    };

    tracing::info!(
        faces = graph.len(),
        trials = cfg.trials,
        seed = cfg.seed,
        parallel = cfg.parallel,
        min_error = outcome.min_error,
        winners = outcome.winners.len(),
        "search finished"
    );
    Ok(outcome)
}
