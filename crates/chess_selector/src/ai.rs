use std::sync::Arc;
use std::time::Duration;

use chess_core::{Board, Move};
use log::{debug, info, warn};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::config::{SelectorConfig, TimeBudget};
use crate::error::SelectionError;
use crate::evaluation::{Evaluator, Score};
use crate::filter::filter_candidates;
use crate::forced::find_forced_move;
use crate::opening_book::OpeningBook;
use crate::search::search_best_move;

/// Which rule produced the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Forced,
    Book,
    Ritual,
    Evaluated,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionResult {
    pub chosen: Move,
    pub decided_by: Decision,
    /// Present when the evaluation tier chose the move.
    pub score: Option<Score>,
    /// Reserved for harnesses that report a clock hint with the move.
    pub time_hint: Option<Duration>,
}

impl SelectionResult {
    fn new(chosen: Move, decided_by: Decision) -> Self {
        Self {
            chosen,
            decided_by,
            score: None,
            time_hint: None,
        }
    }
}

/// Picks one move per turn.
pub trait MoveSelector {
    /// `legal_moves` must be the legal moves of `board`. The board is
    /// borrowed mutably for scoped look-ahead and is returned unchanged.
    fn select_move(
        &mut self,
        board: &mut Board,
        legal_moves: &[Move],
        budget: &TimeBudget,
        evaluator: Option<&mut dyn Evaluator>,
    ) -> Result<SelectionResult, SelectionError>;
}

/// The anarchy bot: forced en passant, a tiny book, the bongcloud ritual,
/// then a one-ply evaluation over the moves it tolerates.
pub struct Anarchy<R = StdRng> {
    config: SelectorConfig,
    book: Arc<OpeningBook>,
    rng: R,
}

impl Anarchy<StdRng> {
    pub fn new(config: SelectorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn seeded(config: SelectorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl Default for Anarchy<StdRng> {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

impl<R: Rng> Anarchy<R> {
    pub fn with_rng(config: SelectorConfig, rng: R) -> Self {
        Self {
            config,
            book: OpeningBook::standard(),
            rng,
        }
    }

    pub fn with_book(mut self, book: Arc<OpeningBook>) -> Self {
        self.book = book;
        self
    }

    fn book_move(&self, board: &Board, legal_moves: &[Move]) -> Option<Move> {
        if !self.config.use_book {
            return None;
        }
        let reply = self.book.get_book_move(board)?;
        let legal = legal_moves.iter().copied().find(|mv| mv.same_squares(&reply));
        if legal.is_none() {
            warn!("book reply {} is not legal here, ignoring it", reply);
        }
        legal
    }

    fn ritual_move(&self, board: &Board, legal_moves: &[Move]) -> Option<Move> {
        if self.config.ritual_moves.is_empty() {
            return None;
        }
        legal_moves.iter().copied().find(|&mv| {
            let san = board.san_among(mv, legal_moves);
            self.config.ritual_moves.iter().any(|ritual| *ritual == san)
        })
    }

    fn random_move(&mut self, legal_moves: &[Move]) -> Result<SelectionResult, SelectionError> {
        let chosen = legal_moves
            .choose(&mut self.rng)
            .copied()
            .ok_or(SelectionError::NoLegalMoves)?;
        info!("random move {}", chosen);
        Ok(SelectionResult::new(chosen, Decision::Random))
    }
}

impl<R: Rng> MoveSelector for Anarchy<R> {
    fn select_move(
        &mut self,
        board: &mut Board,
        legal_moves: &[Move],
        budget: &TimeBudget,
        evaluator: Option<&mut dyn Evaluator>,
    ) -> Result<SelectionResult, SelectionError> {
        if legal_moves.is_empty() {
            return Err(SelectionError::NoLegalMoves);
        }
        debug!(
            "selecting among {} moves in {} (budget {:?})",
            legal_moves.len(),
            board.placement_fen(),
            budget
        );

        if self.config.forced_en_passant {
            if let Some(mv) = find_forced_move(board, legal_moves) {
                info!("en passant is forced: {}", mv);
                return Ok(SelectionResult::new(mv, Decision::Forced));
            }
        }

        if let Some(mv) = self.book_move(board, legal_moves) {
            info!("book move {}", mv);
            return Ok(SelectionResult::new(mv, Decision::Book));
        }

        if let Some(mv) = self.ritual_move(board, legal_moves) {
            info!("ritual move {}", board.san(mv));
            return Ok(SelectionResult::new(mv, Decision::Ritual));
        }

        let evaluator = match evaluator {
            Some(evaluator) => evaluator,
            None => {
                debug!("no evaluator, falling back to a random move");
                return self.random_move(legal_moves);
            }
        };

        let candidates = filter_candidates(board, legal_moves, &self.config.filter);
        match search_best_move(board, &candidates, evaluator) {
            Ok(Some(best)) => {
                info!("evaluated move {} ({})", best.mv, best.score);
                Ok(SelectionResult {
                    score: Some(best.score),
                    ..SelectionResult::new(best.mv, Decision::Evaluated)
                })
            }
            Ok(None) => {
                debug!("every move was filtered out");
                self.random_move(legal_moves)
            }
            Err(err) => {
                warn!("evaluation failed, playing a random move: {}", err);
                self.random_move(legal_moves)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluationError;
    use crate::evaluation::MaterialEvaluator;

    fn select(
        selector: &mut Anarchy,
        board: &mut Board,
        evaluator: Option<&mut dyn Evaluator>,
    ) -> SelectionResult {
        let legal = board.legal_moves();
        selector
            .select_move(board, &legal, &TimeBudget::unlimited(), evaluator)
            .unwrap()
    }

    #[test]
    fn opens_with_e4_from_the_book() {
        let mut selector = Anarchy::seeded(SelectorConfig::default(), 1);
        let mut board = Board::new();
        let result = select(&mut selector, &mut board, Some(&mut MaterialEvaluator));
        assert_eq!(result.chosen.to_string(), "e2e4");
        assert_eq!(result.decided_by, Decision::Book);
        assert_eq!(result.score, None);
    }

    #[test]
    fn book_can_be_switched_off() {
        let config = SelectorConfig {
            use_book: false,
            ..SelectorConfig::default()
        };
        let mut selector = Anarchy::seeded(config, 1);
        let result = select(&mut selector, &mut Board::new(), Some(&mut MaterialEvaluator));
        assert_eq!(result.decided_by, Decision::Evaluated);
        assert!(result.score.is_some());
    }

    #[test]
    fn plays_the_bongcloud_when_possible() {
        let fen = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";
        let mut board = Board::from_fen(fen).unwrap();
        let mut selector =
            Anarchy::seeded(SelectorConfig::default(), 1).with_book(Arc::new(OpeningBook::empty()));
        let result = select(&mut selector, &mut board, Some(&mut MaterialEvaluator));
        assert_eq!(board.san(result.chosen), "Ke2");
        assert_eq!(result.decided_by, Decision::Ritual);
    }

    #[test]
    fn custom_book_overrides_standard() {
        let mut board = Board::new();
        let mut book = OpeningBook::empty();
        let reply = Move::from_uci("g1f3").unwrap();
        book.add_line(&board, reply);

        let mut selector = Anarchy::seeded(SelectorConfig::default(), 1).with_book(Arc::new(book));
        let result = select(&mut selector, &mut board, None);
        assert!(result.chosen.same_squares(&reply));
        assert_eq!(result.decided_by, Decision::Book);
    }

    #[test]
    fn failing_evaluator_degrades_to_random() {
        let mut board = Board::from_fen("7k/8/8/8/8/8/8/R6K w - - 0 1").unwrap();
        let legal = board.legal_moves();
        let mut broken = |_: &Board| -> Result<Score, EvaluationError> {
            Err(EvaluationError::Unavailable("no engine".into()))
        };
        let mut selector = Anarchy::seeded(SelectorConfig::default(), 3);
        let result = selector
            .select_move(&mut board, &legal, &TimeBudget::unlimited(), Some(&mut broken))
            .unwrap();
        assert_eq!(result.decided_by, Decision::Random);
        assert!(legal.contains(&result.chosen));
    }

    #[test]
    fn empty_move_list_is_an_error() {
        let mut selector = Anarchy::seeded(SelectorConfig::default(), 1);
        let mut board = Board::from_fen("R6k/6pp/8/8/8/8/8/7K b - - 0 1").unwrap();
        let result = selector.select_move(&mut board, &[], &TimeBudget::unlimited(), None);
        assert_eq!(result, Err(SelectionError::NoLegalMoves));
    }
}
