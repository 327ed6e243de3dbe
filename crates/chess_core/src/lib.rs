// Chess rules: board state, move generation and notation
pub mod board;
pub mod error;
pub mod moves;
pub mod piece;
pub mod position;
pub mod scoped;

// Re-export main types for convenience
pub use board::{Board, CastlingRights, STARTING_FEN};
pub use error::ChessError;
pub use moves::{Move, MoveType};
pub use piece::{Color, Piece, PieceType};
pub use position::Position;
pub use scoped::ScopedMove;
