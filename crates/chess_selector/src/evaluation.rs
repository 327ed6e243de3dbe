use chess_core::{piece::{Color, PieceType}, Board, Position};

use crate::error::EvaluationError;

/// Centipawn score of a position.
pub type Score = i32;

/// Scores a position for the side that just moved: higher is better for the
/// player whose move produced `board`.
pub trait Evaluator {
    fn score(&mut self, board: &Board) -> Result<Score, EvaluationError>;
}

impl<F> Evaluator for F
where
    F: FnMut(&Board) -> Result<Score, EvaluationError>,
{
    fn score(&mut self, board: &Board) -> Result<Score, EvaluationError> {
        self(board)
    }
}

/// Material, piece-square tables, mobility and check status.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

impl Evaluator for MaterialEvaluator {
    fn score(&mut self, board: &Board) -> Result<Score, EvaluationError> {
        // evaluate_position is relative to the side to move, i.e. the opponent
        // of whoever just moved.
        Ok(-evaluate_position(board))
    }
}

const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 320;
const BISHOP_VALUE: i32 = 330;
const ROOK_VALUE: i32 = 500;
const QUEEN_VALUE: i32 = 900;
const KING_VALUE: i32 = 20000;

const MOBILITY_WEIGHT: i32 = 5;
const CHECK_PENALTY: i32 = 50;

// Piece-square tables from White's point of view, 8th rank first.
const PAWN_TABLE: [[i32; 8]; 8] = [
    [0,  0,  0,  0,  0,  0,  0,  0],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [5,  5, 10, 25, 25, 10,  5,  5],
    [0,  0,  0, 20, 20,  0,  0,  0],
    [5, -5,-10,  0,  0,-10, -5,  5],
    [5, 10, 10,-20,-20, 10, 10,  5],
    [0,  0,  0,  0,  0,  0,  0,  0]
];

const KNIGHT_TABLE: [[i32; 8]; 8] = [
    [-50,-40,-30,-30,-30,-30,-40,-50],
    [-40,-20,  0,  0,  0,  0,-20,-40],
    [-30,  0, 10, 15, 15, 10,  0,-30],
    [-30,  5, 15, 20, 20, 15,  5,-30],
    [-30,  0, 15, 20, 20, 15,  0,-30],
    [-30,  5, 10, 15, 15, 10,  5,-30],
    [-40,-20,  0,  5,  5,  0,-20,-40],
    [-50,-40,-30,-30,-30,-30,-40,-50]
];

const BISHOP_TABLE: [[i32; 8]; 8] = [
    [-20,-10,-10,-10,-10,-10,-10,-20],
    [-10,  0,  0,  0,  0,  0,  0,-10],
    [-10,  0,  5, 10, 10,  5,  0,-10],
    [-10,  5,  5, 10, 10,  5,  5,-10],
    [-10,  0, 10, 10, 10, 10,  0,-10],
    [-10, 10, 10, 10, 10, 10, 10,-10],
    [-10,  5,  0,  0,  0,  0,  5,-10],
    [-20,-10,-10,-10,-10,-10,-10,-20]
];

const ROOK_TABLE: [[i32; 8]; 8] = [
    [0,  0,  0,  0,  0,  0,  0,  0],
    [5, 10, 10, 10, 10, 10, 10,  5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [0,  0,  0,  5,  5,  0,  0,  0]
];

const QUEEN_TABLE: [[i32; 8]; 8] = [
    [-20,-10,-10, -5, -5,-10,-10,-20],
    [-10,  0,  0,  0,  0,  0,  0,-10],
    [-10,  0,  5,  5,  5,  5,  0,-10],
    [-5,  0,  5,  5,  5,  5,  0, -5],
    [0,  0,  5,  5,  5,  5,  0, -5],
    [-10,  5,  5,  5,  5,  5,  0,-10],
    [-10,  0,  5,  0,  0,  0,  0,-10],
    [-20,-10,-10, -5, -5,-10,-10,-20]
];

const KING_MIDDLE_GAME_TABLE: [[i32; 8]; 8] = [
    [-30,-40,-40,-50,-50,-40,-40,-30],
    [-30,-40,-40,-50,-50,-40,-40,-30],
    [-30,-40,-40,-50,-50,-40,-40,-30],
    [-30,-40,-40,-50,-50,-40,-40,-30],
    [-20,-30,-30,-40,-40,-30,-30,-20],
    [-10,-20,-20,-20,-20,-20,-20,-10],
    [20, 20,  0,  0,  0,  0, 20, 20],
    [20, 30, 10,  0,  0, 10, 30, 20]
];

/// Score from the side to move's perspective. Positive favours the player
/// about to move.
pub fn evaluate_position(board: &Board) -> i32 {
    let mut score = 0;

    for (pos, piece) in board.get_all_pieces() {
        let value = get_piece_value(piece.piece_type)
            + get_position_bonus(piece.piece_type, *pos, piece.color);
        if piece.color == Color::White {
            score += value;
        } else {
            score -= value;
        }
    }

    let white_mobility = board.pseudo_legal_moves(Color::White).len() as i32;
    let black_mobility = board.pseudo_legal_moves(Color::Black).len() as i32;
    score += (white_mobility - black_mobility) * MOBILITY_WEIGHT;

    if board.is_in_check(Color::White) {
        score -= CHECK_PENALTY;
    }
    if board.is_in_check(Color::Black) {
        score += CHECK_PENALTY;
    }

    if board.current_turn() == Color::White {
        score
    } else {
        -score
    }
}

fn get_piece_value(piece_type: PieceType) -> i32 {
    match piece_type {
        PieceType::Pawn => PAWN_VALUE,
        PieceType::Knight => KNIGHT_VALUE,
        PieceType::Bishop => BISHOP_VALUE,
        PieceType::Rook => ROOK_VALUE,
        PieceType::Queen => QUEEN_VALUE,
        PieceType::King => KING_VALUE,
    }
}

// Black reads the tables mirrored top to bottom.
fn get_position_bonus(piece_type: PieceType, pos: Position, color: Color) -> i32 {
    let file_idx = pos.file as usize - 1;
    let rank_idx = match color {
        Color::White => 8 - pos.rank as usize,
        Color::Black => pos.rank as usize - 1,
    };

    let table = match piece_type {
        PieceType::Pawn => &PAWN_TABLE,
        PieceType::Knight => &KNIGHT_TABLE,
        PieceType::Bishop => &BISHOP_TABLE,
        PieceType::Rook => &ROOK_TABLE,
        PieceType::Queen => &QUEEN_TABLE,
        PieceType::King => &KING_MIDDLE_GAME_TABLE,
    };
    table[rank_idx][file_idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(evaluate_position(&Board::new()), 0);
    }

    #[test]
    fn extra_queen_is_good_for_its_owner() {
        let white_up = Board::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        assert!(evaluate_position(&white_up) > QUEEN_VALUE / 2);

        let black_to_move = Board::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap();
        assert!(evaluate_position(&black_to_move) < -QUEEN_VALUE / 2);
    }

    #[test]
    fn material_evaluator_scores_for_the_mover() {
        // White just moved; Black is to move and a queen down.
        let board = Board::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap();
        assert!(MaterialEvaluator.score(&board).unwrap() > 0);
    }

    #[test]
    fn closures_are_evaluators() {
        let mut calls = 0;
        let mut counting = |_: &Board| -> Result<Score, EvaluationError> {
            calls += 1;
            Ok(7)
        };
        assert_eq!(counting.score(&Board::new()), Ok(7));
        assert_eq!(calls, 1);
    }
}
