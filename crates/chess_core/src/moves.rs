use std::fmt;

use crate::{piece::{Color, PieceType}, Board, ChessError, Piece, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub move_type: MoveType,
    pub promotion: Option<PieceType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    Normal,
    Capture,
    EnPassant,
    Castle,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
            move_type: MoveType::Normal,
        }
    }

    pub fn with_promotion(from: Position, to: Position, promotion: PieceType) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
            move_type: MoveType::Normal,
        }
    }

    pub fn castle(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
            move_type: MoveType::Castle,
        }
    }

    pub(crate) fn tagged(mut self, move_type: MoveType) -> Self {
        self.move_type = move_type;
        self
    }

    /// Parses coordinate notation such as `e2e4` or `e7e8q`.
    pub fn from_uci(uci: &str) -> Result<Self, ChessError> {
        let invalid = || ChessError::InvalidUci(uci.to_string());
        if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
            return Err(invalid());
        }

        let from = Position::from_algebraic(&uci[0..2]).ok_or_else(invalid)?;
        let to = Position::from_algebraic(&uci[2..4]).ok_or_else(invalid)?;
        match uci[4..].chars().next() {
            None => Ok(Self::new(from, to)),
            Some(c) => match PieceType::from_char(c) {
                Some(promotion) if PieceType::PROMOTIONS.contains(&promotion) => {
                    Ok(Self::with_promotion(from, to, promotion))
                }
                _ => Err(invalid()),
            },
        }
    }

    /// True when both moves name the same squares and promotion, whatever
    /// their move type tag says.
    pub fn same_squares(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }

    pub fn is_valid(&self, board: &Board) -> bool {
        let piece = match board.get_piece(self.from) {
            Some(p) => p,
            None => return false,
        };

        // Basic position validation
        if !board.is_position_valid(self.from) || !board.is_position_valid(self.to) {
            return false;
        }

        // Check if destination has a piece of the same color
        if let Some(dest_piece) = board.get_piece(self.to) {
            if dest_piece.color == piece.color {
                return false;
            }
        }

        self.is_valid_piece_movement(piece, board)
    }

    fn is_valid_piece_movement(&self, piece: &Piece, board: &Board) -> bool {
        match piece.piece_type {
            PieceType::Pawn => self.is_valid_pawn_move(piece.color, board),
            PieceType::Knight => self.is_valid_knight_move(),
            PieceType::Bishop => self.is_valid_diagonal_move(board),
            PieceType::Rook => self.is_valid_straight_move(board),
            PieceType::Queen => {
                self.is_valid_diagonal_move(board) || self.is_valid_straight_move(board)
            }
            PieceType::King => self.is_valid_king_move(),
        }
    }

    fn is_valid_pawn_move(&self, color: Color, board: &Board) -> bool {
        let direction = color.pawn_direction();
        let rank_diff = (self.to.rank as i8) - (self.from.rank as i8);
        let file_diff = (self.to.file as i8) - (self.from.file as i8);

        if file_diff == 0 {
            if rank_diff == direction {
                return board.get_piece(self.to).is_none();
            }
            // Initial two-square move
            let start_rank = if color == Color::White { 2 } else { 7 };
            if self.from.rank == start_rank && rank_diff == 2 * direction {
                let intermediate = Position {
                    file: self.from.file,
                    rank: (self.from.rank as i8 + direction) as u8,
                };
                return board.get_piece(intermediate).is_none()
                    && board.get_piece(self.to).is_none();
            }
            return false;
        }

        if file_diff.abs() != 1 || rank_diff != direction {
            return false;
        }

        if let Some(captured_piece) = board.get_piece(self.to) {
            return captured_piece.color != color;
        }

        self.is_en_passant_capture(color, board)
    }

    // The previous move must be an enemy pawn's double step past our target square.
    fn is_en_passant_capture(&self, color: Color, board: &Board) -> bool {
        let last_move = match board.last_move() {
            Some(mv) => mv,
            None => return false,
        };
        let expected_rank = if color == Color::White { 5 } else { 4 };
        if self.from.rank != expected_rank || last_move.to.file != self.to.file {
            return false;
        }
        let double_step = (last_move.to.rank as i8 - last_move.from.rank as i8).abs() == 2
            && last_move.from.file == last_move.to.file
            && last_move.to.rank == self.from.rank;

        double_step
            && board.get_piece(last_move.to).map_or(false, |last_piece| {
                last_piece.piece_type == PieceType::Pawn && last_piece.color != color
            })
    }

    fn is_valid_knight_move(&self) -> bool {
        let rank_diff = (self.to.rank as i8 - self.from.rank as i8).abs();
        let file_diff = (self.to.file as i8 - self.from.file as i8).abs();

        (rank_diff == 2 && file_diff == 1) || (rank_diff == 1 && file_diff == 2)
    }

    fn is_valid_diagonal_move(&self, board: &Board) -> bool {
        let rank_diff = (self.to.rank as i8 - self.from.rank as i8).abs();
        let file_diff = (self.to.file as i8 - self.from.file as i8).abs();

        if rank_diff != file_diff || rank_diff == 0 {
            return false;
        }

        self.is_path_clear(board)
    }

    fn is_valid_straight_move(&self, board: &Board) -> bool {
        let rank_diff = self.to.rank as i8 - self.from.rank as i8;
        let file_diff = self.to.file as i8 - self.from.file as i8;

        if (rank_diff != 0 && file_diff != 0) || (rank_diff == 0 && file_diff == 0) {
            return false;
        }

        self.is_path_clear(board)
    }

    fn is_valid_king_move(&self) -> bool {
        let rank_diff = (self.to.rank as i8 - self.from.rank as i8).abs();
        let file_diff = (self.to.file as i8 - self.from.file as i8).abs();

        rank_diff <= 1 && file_diff <= 1 && (rank_diff, file_diff) != (0, 0)
    }

    /// Whether a piece standing on `from` attacks `to`. Unlike [`Move::is_valid`],
    /// pawns attack diagonally whether or not the square is occupied.
    pub(crate) fn attacks(&self, piece: &Piece, board: &Board) -> bool {
        match piece.piece_type {
            PieceType::Pawn => {
                let rank_diff = self.to.rank as i8 - self.from.rank as i8;
                let file_diff = (self.to.file as i8 - self.from.file as i8).abs();
                file_diff == 1 && rank_diff == piece.color.pawn_direction()
            }
            _ => self.is_valid_piece_movement(piece, board),
        }
    }

    fn is_path_clear(&self, board: &Board) -> bool {
        let rank_step = (self.to.rank as i8 - self.from.rank as i8).signum();
        let file_step = (self.to.file as i8 - self.from.file as i8).signum();

        let mut current = self.from.offset(file_step, rank_step);
        while let Some(pos) = current {
            if pos == self.to {
                return true;
            }
            if board.get_piece(pos).is_some() {
                return false;
            }
            current = pos.offset(file_step, rank_step);
        }

        true
    }
}

/// Coordinate (UCI) notation.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.to_char())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Position {
        Position::from_algebraic(name).unwrap()
    }

    #[test]
    fn parses_uci_with_and_without_promotion() {
        let e2e4 = Move::from_uci("e2e4").unwrap();
        assert_eq!(e2e4, Move::new(sq("e2"), sq("e4")));
        assert_eq!(e2e4.to_string(), "e2e4");

        let promo = Move::from_uci("a7a8q").unwrap();
        assert_eq!(promo.promotion, Some(PieceType::Queen));
        assert_eq!(promo.to_string(), "a7a8q");
    }

    #[test]
    fn rejects_malformed_uci() {
        for bad in ["", "e2", "q1f3", "e2e9", "a7a8k", "e2e4qq"] {
            assert!(Move::from_uci(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn same_squares_ignores_move_type() {
        let plain = Move::new(sq("d4"), sq("e5"));
        let capture = plain.tagged(MoveType::Capture);
        assert_ne!(plain, capture);
        assert!(plain.same_squares(&capture));
    }

    #[test]
    fn sliding_pieces_are_blocked() {
        let board = Board::new();
        assert!(!Move::new(sq("a1"), sq("a3")).is_valid(&board));
        assert!(!Move::new(sq("c1"), sq("e3")).is_valid(&board));
        assert!(Move::new(sq("g1"), sq("f3")).is_valid(&board));
        assert!(Move::new(sq("e2"), sq("e4")).is_valid(&board));
    }
}
