use std::collections::HashSet;
use std::sync::Arc;

use chess_core::{Board, Move, PieceType, Position};
use chess_selector::{
    Anarchy, Decision, EvaluationError, Evaluator, MaterialEvaluator, MoveSelector, OpeningBook,
    Score, SelectionResult, SelectorConfig, TimeBudget,
};

const LONE_ROOK: &str = "7k/8/8/8/8/8/8/R6K w - - 0 1";
const DOUBLE_EN_PASSANT: &str = "rnbqkbnr/pppp1ppp/8/3PpP2/8/8/PPP1P1PP/RNBQKBNR w KQkq e6 0 4";
const EN_PASSANT_AND_BONGCLOUD: &str =
    "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";

fn sq(name: &str) -> Position {
    Position::from_algebraic(name).unwrap()
}

fn run(
    selector: &mut Anarchy,
    board: &mut Board,
    legal: &[Move],
    evaluator: Option<&mut dyn Evaluator>,
) -> SelectionResult {
    selector
        .select_move(board, legal, &TimeBudget::unlimited(), evaluator)
        .unwrap()
}

fn square_index(pos: Position) -> Score {
    (pos.rank as Score - 1) * 8 + (pos.file as Score - 1)
}

#[test]
fn self_play_only_returns_legal_moves() {
    let mut selector = Anarchy::seeded(SelectorConfig::default(), 7);
    let mut board = Board::new();

    for _ in 0..30 {
        let legal = board.legal_moves();
        if legal.is_empty() {
            break;
        }
        let result = run(&mut selector, &mut board, &legal, Some(&mut MaterialEvaluator));
        assert!(legal.contains(&result.chosen), "{} is not legal", result.chosen);
        board.push(result.chosen).unwrap();
    }
}

#[test]
fn forced_capture_beats_book_and_ritual() {
    let mut board = Board::from_fen(EN_PASSANT_AND_BONGCLOUD).unwrap();
    let legal = board.legal_moves();

    let mut book = OpeningBook::empty();
    book.add_line(&board, Move::from_uci("g1f3").unwrap());
    let mut selector = Anarchy::seeded(SelectorConfig::default(), 1).with_book(Arc::new(book));

    let result = run(&mut selector, &mut board, &legal, Some(&mut MaterialEvaluator));
    assert_eq!(result.chosen.to_string(), "e5f6");
    assert_eq!(result.decided_by, Decision::Forced);
}

#[test]
fn forced_capture_is_first_in_list_order() {
    let mut board = Board::from_fen(DOUBLE_EN_PASSANT).unwrap();
    let legal = board.legal_moves();
    let mut selector = Anarchy::seeded(SelectorConfig::default(), 1);

    let first = legal.iter().copied().find(|&mv| board.is_en_passant(mv)).unwrap();
    let result = run(&mut selector, &mut board, &legal, None);
    assert_eq!(result.chosen, first);

    let reversed: Vec<Move> = legal.iter().rev().copied().collect();
    let last = reversed.iter().copied().find(|&mv| board.is_en_passant(mv)).unwrap();
    assert_ne!(first, last);
    let result = run(&mut selector, &mut board, &reversed, None);
    assert_eq!(result.chosen, last);
}

#[test]
fn starting_position_plays_the_book_reply() {
    let mut board = Board::new();
    let legal = board.legal_moves();
    let mut selector = Anarchy::seeded(SelectorConfig::default(), 1);

    let result = run(&mut selector, &mut board, &legal, Some(&mut MaterialEvaluator));
    assert_eq!(result.chosen, Move::new(sq("e2"), sq("e4")));
    assert_eq!(result.decided_by, Decision::Book);
}

#[test]
fn illegal_book_reply_is_skipped() {
    let e2e4 = Move::new(sq("e2"), sq("e4"));
    let mut board = Board::new();
    let legal: Vec<Move> = board
        .legal_moves()
        .into_iter()
        .filter(|mv| !mv.same_squares(&e2e4))
        .collect();
    let mut selector = Anarchy::seeded(SelectorConfig::default(), 5);

    for _ in 0..20 {
        let result = run(&mut selector, &mut board, &legal, None);
        assert!(!result.chosen.same_squares(&e2e4));
        assert_ne!(result.decided_by, Decision::Book);
        assert!(legal.contains(&result.chosen));
    }
}

#[test]
fn book_reply_for_the_wrong_side_is_skipped() {
    let mut board =
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1").unwrap();
    let legal = board.legal_moves();
    let mut selector = Anarchy::seeded(SelectorConfig::default(), 5);

    let result = run(&mut selector, &mut board, &legal, Some(&mut MaterialEvaluator));
    assert_eq!(result.decided_by, Decision::Evaluated);
    assert!(legal.contains(&result.chosen));
}

#[test]
fn excluded_moves_are_never_evaluated_winners() {
    let mut board = Board::from_fen(LONE_ROOK).unwrap();
    let legal = board.legal_moves();
    // Loves Ra4 and king walks, the filter must not let it have them.
    let mut tempter = |b: &Board| -> Result<Score, EvaluationError> {
        let mv = b.last_move().ok_or_else(|| EvaluationError::Failed("no move".into()))?;
        let moved = b.get_piece(mv.to).map(|p| p.piece_type);
        Ok(match (moved, mv.to) {
            (Some(PieceType::Rook), to) if to == sq("a4") => 1000,
            (Some(PieceType::King), _) => 500,
            _ => 0,
        })
    };
    let mut selector = Anarchy::seeded(SelectorConfig::default(), 1);

    let result = run(&mut selector, &mut board, &legal, Some(&mut tempter));
    assert_eq!(result.decided_by, Decision::Evaluated);
    assert_eq!(result.chosen.from, sq("a1"));
    assert_ne!(result.chosen.to, sq("a4"));
}

#[test]
fn excluded_move_survives_as_the_only_fallback() {
    let mut board = Board::from_fen(LONE_ROOK).unwrap();
    let ra4 = board
        .legal_moves()
        .into_iter()
        .find(|mv| mv.same_squares(&Move::new(sq("a1"), sq("a4"))))
        .unwrap();
    let mut selector = Anarchy::seeded(SelectorConfig::default(), 1);

    let result = run(&mut selector, &mut board, &[ra4], Some(&mut MaterialEvaluator));
    assert_eq!(result.chosen, ra4);
    assert_eq!(result.decided_by, Decision::Random);
}

#[test]
fn evaluation_picks_the_best_distinct_score() {
    let mut board = Board::from_fen(LONE_ROOK).unwrap();
    let legal = board.legal_moves();
    let score_of = |mv: Move| square_index(mv.from) * 64 + square_index(mv.to);
    let mut by_squares = |b: &Board| -> Result<Score, EvaluationError> {
        b.last_move()
            .map(score_of)
            .ok_or_else(|| EvaluationError::Failed("no move".into()))
    };
    let expected = legal.iter().copied().max_by_key(|&mv| score_of(mv)).unwrap();
    let mut selector = Anarchy::seeded(SelectorConfig::evaluation_only(), 1);

    let result = run(&mut selector, &mut board, &legal, Some(&mut by_squares));
    assert_eq!(result.chosen, expected);
    assert_eq!(result.score, Some(score_of(expected)));
}

#[test]
fn evaluation_ties_go_to_the_earliest_candidate() {
    let mut board = Board::from_fen(LONE_ROOK).unwrap();
    let legal = board.legal_moves();
    let mut flat = |_: &Board| -> Result<Score, EvaluationError> { Ok(3) };
    let mut selector = Anarchy::seeded(SelectorConfig::evaluation_only(), 1);

    let result = run(&mut selector, &mut board, &legal, Some(&mut flat));
    assert_eq!(result.chosen, legal[0]);
    assert_eq!(result.decided_by, Decision::Evaluated);
}

#[test]
fn random_fallback_reaches_every_legal_move() {
    let mut board = Board::new();
    let legal = board.legal_moves();
    let mut selector = Anarchy::seeded(SelectorConfig::evaluation_only(), 42);

    let seen: HashSet<Move> = (0..1000)
        .map(|_| run(&mut selector, &mut board, &legal, None).chosen)
        .collect();
    assert_eq!(seen.len(), legal.len());
}

#[test]
fn random_fallback_ignores_the_filter() {
    let mut board = Board::from_fen(LONE_ROOK).unwrap();
    let legal = board.legal_moves();
    let mut selector = Anarchy::seeded(SelectorConfig::default(), 9);

    let seen: HashSet<Move> = (0..1000)
        .map(|_| run(&mut selector, &mut board, &legal, None).chosen)
        .collect();
    assert_eq!(seen.len(), legal.len());
    assert!(seen.iter().any(|mv| mv.to == sq("a4")));
    assert!(seen.iter().any(|mv| mv.from == sq("h1")));
}

#[test]
fn selection_leaves_the_board_as_it_found_it() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let mut board = Board::from_fen(fen).unwrap();
    board.push(Move::from_uci("b1c3").unwrap()).unwrap();
    board.push(Move::from_uci("g8f6").unwrap()).unwrap();
    let before = board.clone();
    let legal = board.legal_moves();
    // Ke2 is legal here; keep the ritual out of the way.
    let config = SelectorConfig {
        ritual_moves: Vec::new(),
        ..SelectorConfig::default()
    };
    let mut selector = Anarchy::seeded(config, 1);

    let result = run(&mut selector, &mut board, &legal, Some(&mut MaterialEvaluator));
    assert_eq!(result.decided_by, Decision::Evaluated);
    assert_eq!(board, before);
    assert_eq!(board.ply_count(), 2);
}
