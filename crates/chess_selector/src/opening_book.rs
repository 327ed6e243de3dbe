use std::collections::HashMap;
use std::sync::Arc;

use chess_core::{moves::Move, position::Position, Board};
use log::trace;
use once_cell::sync::Lazy;

static STANDARD_BOOK: Lazy<Arc<OpeningBook>> = Lazy::new(|| Arc::new(OpeningBook::new()));

/// Exact-position replies keyed by piece placement only.
///
/// Replies are stored as bare origin/destination squares. A hit says
/// nothing about legality; callers check the reply against the legal moves.
#[derive(Debug, Clone)]
pub struct OpeningBook {
    positions: HashMap<String, Move>,
}

impl OpeningBook {
    pub fn new() -> Self {
        let mut book = Self::empty();
        book.initialize_common_openings();
        book
    }

    pub fn empty() -> Self {
        Self {
            positions: HashMap::new(),
        }
    }

    /// The process-wide book, built on first use and never mutated.
    pub fn standard() -> Arc<OpeningBook> {
        Arc::clone(&STANDARD_BOOK)
    }

    fn initialize_common_openings(&mut self) {
        // 1. e4, best by test
        self.insert(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            Move::new(Position { rank: 2, file: 5 }, Position { rank: 4, file: 5 }),
        );

        // 1. e4 e5 2. Qf3
        self.insert(
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR",
            Move::new(Position { rank: 1, file: 4 }, Position { rank: 3, file: 6 }),
        );

        // 1. e4 e5 2. Nf3 Nc6 3. Bb5 (Ruy Lopez)
        self.insert(
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R",
            Move::new(Position { rank: 1, file: 6 }, Position { rank: 5, file: 2 }),
        );
    }

    /// Adds or replaces the reply for a piece placement.
    pub fn insert(&mut self, placement: impl Into<String>, reply: Move) {
        self.positions.insert(placement.into(), reply);
    }

    pub fn add_line(&mut self, board: &Board, reply: Move) {
        self.insert(board.placement_fen(), reply);
    }

    pub fn get_book_move(&self, board: &Board) -> Option<Move> {
        let placement = board.placement_fen();
        let reply = self.positions.get(&placement).copied();
        trace!("book lookup {} -> {:?}", placement, reply);
        reply
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
