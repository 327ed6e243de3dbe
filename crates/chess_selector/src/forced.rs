use chess_core::{Board, Move};

/// First legal move that must be played, if any.
///
/// En passant is forced: when the capture is available it is taken, and if
/// there are two, the one listed first wins.
pub fn find_forced_move(board: &Board, legal_moves: &[Move]) -> Option<Move> {
    legal_moves.iter().copied().find(|&mv| board.is_en_passant(mv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_forced_move_in_the_opening() {
        let board = Board::new();
        assert_eq!(find_forced_move(&board, &board.legal_moves()), None);
    }

    #[test]
    fn first_en_passant_in_list_order_wins() {
        // Both the d5 and the f5 pawn can take on e6.
        let fen = "rnbqkbnr/pppp1ppp/8/3PpP2/8/8/PPP1P1PP/RNBQKBNR w KQkq e6 0 4";
        let board = Board::from_fen(fen).unwrap();
        let legal = board.legal_moves();
        let forced = find_forced_move(&board, &legal).unwrap();
        assert_eq!(forced.to_string(), "d5e6");

        let reversed: Vec<Move> = legal.iter().rev().copied().collect();
        assert_eq!(find_forced_move(&board, &reversed).unwrap().to_string(), "f5e6");
    }
}
