use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("no piece at {0}")]
    EmptySquare(Position),
    #[error("piece on {0} does not belong to the side to move")]
    WrongTurn(Position),
    #[error("illegal move {0}")]
    IllegalMove(String),
    #[error("invalid UCI move `{0}`")]
    InvalidUci(String),
    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: &'static str },
}
