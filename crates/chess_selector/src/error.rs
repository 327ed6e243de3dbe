use chess_core::ChessError;
use thiserror::Error;

/// The only failure a caller of the selector ever sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no legal moves to choose from")]
    NoLegalMoves,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("evaluator unavailable: {0}")]
    Unavailable(String),
    #[error("evaluation failed: {0}")]
    Failed(String),
}

/// Failures inside the evaluation tier. The selector recovers from all of
/// them by falling back to a random legal move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Rules(#[from] ChessError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
