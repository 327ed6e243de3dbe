use chess_core::{Board, Move};
use log::trace;

use crate::error::SearchError;
use crate::evaluation::{Evaluator, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: Score,
}

/// One-ply search: plays each candidate, scores the result and keeps the
/// highest score. Ties keep the earlier candidate.
///
/// `board` is identical to its input state when this returns, whether it
/// returns an error or unwinds out of the evaluator.
pub fn search_best_move(
    board: &mut Board,
    candidates: &[Move],
    evaluator: &mut dyn Evaluator,
) -> Result<Option<ScoredMove>, SearchError> {
    let mut best: Option<ScoredMove> = None;

    for &mv in candidates {
        let score = {
            let child = board.scoped(mv)?;
            evaluator.score(&child)?
        };
        trace!("{} scores {}", mv, score);

        if best.map_or(true, |incumbent| score > incumbent.score) {
            best = Some(ScoredMove { mv, score });
        }
    }

    Ok(best)
}
