use chess_core::{Board, Move, PieceType, Position};
use log::debug;

use crate::config::FilterRules;

/// What the filter reads out of a SAN string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notation {
    /// `None` for castling, which names no piece.
    pub piece: Option<PieceType>,
    pub destination: Option<Position>,
}

impl Notation {
    pub fn parse(san: &str) -> Self {
        let body = san.trim_end_matches(|c: char| c == '+' || c == '#');
        let body = match body.find('=') {
            Some(promotion) => &body[..promotion],
            None => body,
        };

        let piece = match body.chars().next() {
            Some('a'..='h') => Some(PieceType::Pawn),
            Some(c @ ('K' | 'Q' | 'R' | 'B' | 'N')) => PieceType::from_char(c),
            _ => None,
        };
        let destination = body
            .len()
            .checked_sub(2)
            .and_then(|start| body.get(start..))
            .and_then(Position::from_algebraic);

        Self { piece, destination }
    }
}

impl FilterRules {
    /// Returns the rule that excludes `san`, if any.
    pub fn exclusion(&self, san: &str) -> Option<&'static str> {
        let notation = Notation::parse(san);
        let piece = notation.piece?;

        let forbidden = self.forbidden_landings.iter().any(|landing| {
            landing.piece == piece && notation.destination == Some(landing.square)
        });
        if forbidden {
            return Some("forbidden landing square");
        }
        if self.locked_piece == Some(piece) {
            return Some("locked piece");
        }
        None
    }
}

/// Legal moves left for evaluation, in their original order.
pub fn filter_candidates(board: &Board, legal_moves: &[Move], rules: &FilterRules) -> Vec<Move> {
    if rules.forbidden_landings.is_empty() && rules.locked_piece.is_none() {
        return legal_moves.to_vec();
    }

    legal_moves
        .iter()
        .copied()
        .filter(|&mv| {
            let san = board.san_among(mv, legal_moves);
            match rules.exclusion(&san) {
                Some(reason) => {
                    debug!("I saw {}, I just didn't like it ({})", san, reason);
                    false
                }
                None => true,
            }
        })
        .collect()
}
