use std::time::Duration;

use chess_core::{PieceType, Position};

/// A piece type that must never be moved onto a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForbiddenLanding {
    pub piece: PieceType,
    pub square: Position,
}

/// Static preferences applied to the legal moves before evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRules {
    pub forbidden_landings: Vec<ForbiddenLanding>,
    /// Piece type that is never evaluated once committed. Only the piece
    /// type of the candidate is checked, no game history is kept.
    pub locked_piece: Option<PieceType>,
}

impl FilterRules {
    /// Rules that keep every move.
    pub fn none() -> Self {
        Self {
            forbidden_landings: Vec::new(),
            locked_piece: None,
        }
    }
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            // never play rook a4
            forbidden_landings: vec![ForbiddenLanding {
                piece: PieceType::Rook,
                square: Position { file: 1, rank: 4 },
            }],
            locked_piece: Some(PieceType::King),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Play an en passant capture whenever one is legal.
    pub forced_en_passant: bool,
    pub use_book: bool,
    /// SAN strings played as soon as any of them is legal.
    pub ritual_moves: Vec<String>,
    pub filter: FilterRules,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            forced_en_passant: true,
            use_book: true,
            ritual_moves: ["Ke2", "Ke7", "Kxe2", "Kxe7"]
                .iter()
                .map(|san| san.to_string())
                .collect(),
            filter: FilterRules::default(),
        }
    }
}

impl SelectorConfig {
    /// Only the evaluation tier and the random fallback remain.
    pub fn evaluation_only() -> Self {
        Self {
            forced_en_passant: false,
            use_book: false,
            ritual_moves: Vec::new(),
            filter: FilterRules::none(),
        }
    }
}

/// Clock state handed over by the harness. Advisory only: selection never
/// runs long enough to need it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeBudget {
    pub remaining: Option<Duration>,
    pub increment: Option<Duration>,
}

impl TimeBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn from_clock(remaining: Duration, increment: Duration) -> Self {
        Self {
            remaining: Some(remaining),
            increment: Some(increment),
        }
    }
}
