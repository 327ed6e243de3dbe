use std::collections::HashMap;

use log::debug;

use crate::{
    piece::{Color, PieceType},
    scoped::ScopedMove,
    ChessError, Move, MoveType, Piece, Position,
};

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

impl CastlingRights {
    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    fn revoke(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    // A rook leaving or being captured on its home corner.
    fn revoke_corner(&mut self, pos: Position) {
        match (pos.file, pos.rank) {
            (1, 1) => self.white_queenside = false,
            (8, 1) => self.white_kingside = false,
            (1, 8) => self.black_queenside = false,
            (8, 8) => self.black_kingside = false,
            _ => {}
        }
    }
}

/// Everything `pop` needs to restore the board exactly.
#[derive(Debug, Clone, PartialEq)]
struct Undo {
    mv: Move,
    moved: Piece,
    captured: Option<(Position, Piece)>,
    castling_rights: CastlingRights,
    last_move: Option<Move>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pieces: HashMap<Position, Piece>,
    current_turn: Color,
    castling_rights: CastlingRights,
    last_move: Option<Move>,
    history: Vec<Undo>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        let mut board = Self::empty(Color::White);
        board.castling_rights = CastlingRights::default();
        board.setup_initial_position();
        board
    }

    fn empty(current_turn: Color) -> Self {
        Self {
            pieces: HashMap::new(),
            current_turn,
            castling_rights: CastlingRights::none(),
            last_move: None,
            history: Vec::new(),
        }
    }

    pub fn setup_initial_position(&mut self) {
        for file in 1..=8 {
            self.pieces
                .insert(Position { file, rank: 2 }, Piece::new(PieceType::Pawn, Color::White));
            self.pieces
                .insert(Position { file, rank: 7 }, Piece::new(PieceType::Pawn, Color::Black));
        }

        let piece_order = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (file, &piece_type) in (1..=8).zip(piece_order.iter()) {
            self.pieces.insert(Position { file, rank: 1 }, Piece::new(piece_type, Color::White));
            self.pieces.insert(Position { file, rank: 8 }, Piece::new(piece_type, Color::Black));
        }
    }

    /// Parses a FEN string. The halfmove and fullmove counters may be omitted
    /// and are not tracked. An en passant target square is recorded as the
    /// double pawn step that produced it.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let invalid = |reason| ChessError::InvalidFen { fen: fen.to_string(), reason };
        let mut fields = fen.split_whitespace();

        let placement = fields.next().ok_or_else(|| invalid("missing piece placement"))?;
        let turn = match fields.next() {
            Some("w") => Color::White,
            Some("b") => Color::Black,
            _ => return Err(invalid("side to move must be `w` or `b`")),
        };
        let mut board = Self::empty(turn);

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(invalid("placement must have eight ranks"));
        }
        for (row, rank) in rows.iter().zip((1..=8u8).rev()) {
            let mut file = 1u8;
            let mut after_digit = false;
            for c in row.chars() {
                if c.is_ascii_digit() {
                    if after_digit || !('1'..='8').contains(&c) {
                        return Err(invalid("empty-square count must be a single digit 1-8"));
                    }
                    after_digit = true;
                    file += c as u8 - b'0';
                } else {
                    after_digit = false;
                    let piece =
                        Piece::from_fen_char(c).ok_or_else(|| invalid("unknown piece letter"))?;
                    let pos = Position::new(file, rank)
                        .ok_or_else(|| invalid("rank overflows eight files"))?;
                    board.pieces.insert(pos, piece);
                    file += 1;
                }
                if file > 9 {
                    return Err(invalid("rank overflows eight files"));
                }
            }
            if file != 9 {
                return Err(invalid("rank does not cover eight files"));
            }
        }

        match fields.next() {
            Some("-") | None => {}
            Some(rights) => {
                for c in rights.chars() {
                    match c {
                        'K' => board.castling_rights.white_kingside = true,
                        'Q' => board.castling_rights.white_queenside = true,
                        'k' => board.castling_rights.black_kingside = true,
                        'q' => board.castling_rights.black_queenside = true,
                        _ => return Err(invalid("unknown castling flag")),
                    }
                }
            }
        }

        match fields.next() {
            Some("-") | None => {}
            Some(square) => {
                let target = Position::from_algebraic(square)
                    .ok_or_else(|| invalid("bad en passant square"))?;
                let mover = turn.opposite();
                let (from_rank, to_rank) = match (mover, target.rank) {
                    (Color::White, 3) => (2, 4),
                    (Color::Black, 6) => (7, 5),
                    _ => return Err(invalid("en passant square on the wrong rank")),
                };
                board.last_move = Some(Move::new(
                    Position { file: target.file, rank: from_rank },
                    Position { file: target.file, rank: to_rank },
                ));
            }
        }

        Ok(board)
    }

    /// Piece placement field of the FEN, e.g.
    /// `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`. Side to move, rights
    /// and history are not part of it.
    pub fn placement_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (1..=8).rev() {
            let mut empty = 0;
            for file in 1..=8 {
                match self.pieces.get(&Position { file, rank }) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 1 {
                fen.push('/');
            }
        }
        fen
    }

    pub fn get_piece(&self, pos: Position) -> Option<&Piece> {
        self.pieces.get(&pos)
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Number of moves that `pop` can take back.
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    /// Plays `chess_move` if it is legal. The stored move carries the move
    /// type the generator assigned, whatever tag the argument had.
    pub fn make_move(&mut self, chess_move: Move) -> Result<(), ChessError> {
        let legal = match self.legal_moves().into_iter().find(|mv| mv.same_squares(&chess_move)) {
            Some(mv) => mv,
            None => {
                debug!("rejected {} in {}", chess_move, self.placement_fen());
                return Err(ChessError::IllegalMove(chess_move.to_string()));
            }
        };
        self.push(legal)
    }

    /// Applies a move without checking legality and records how to undo it.
    pub fn push(&mut self, chess_move: Move) -> Result<(), ChessError> {
        let piece = *self
            .pieces
            .get(&chess_move.from)
            .ok_or(ChessError::EmptySquare(chess_move.from))?;
        if piece.color != self.current_turn {
            return Err(ChessError::WrongTurn(chess_move.from));
        }

        let captured_at = if self.is_en_passant(chess_move) {
            Position { file: chess_move.to.file, rank: chess_move.from.rank }
        } else {
            chess_move.to
        };
        let captured = self.pieces.get(&captured_at).map(|p| (captured_at, *p));

        self.history.push(Undo {
            mv: chess_move,
            moved: piece,
            captured,
            castling_rights: self.castling_rights,
            last_move: self.last_move,
        });

        if let Some((pos, _)) = captured {
            self.pieces.remove(&pos);
            self.castling_rights.revoke_corner(pos);
        }
        self.pieces.remove(&chess_move.from);

        if let Some((rook_from, rook_to)) = Self::castling_rook(piece, chess_move) {
            if let Some(rook) = self.pieces.remove(&rook_from) {
                self.pieces.insert(rook_to, rook);
            }
        }

        let final_piece = match chess_move.promotion {
            Some(promotion_type) => Piece::new(promotion_type, piece.color),
            None => piece,
        };
        self.pieces.insert(chess_move.to, final_piece);

        self.update_castling_rights(&piece, chess_move);
        self.last_move = Some(chess_move);
        self.current_turn = self.current_turn.opposite();

        Ok(())
    }

    /// Takes back the last pushed move.
    pub fn pop(&mut self) -> Option<Move> {
        let undo = self.history.pop()?;
        let chess_move = undo.mv;

        self.pieces.remove(&chess_move.to);
        if let Some((rook_from, rook_to)) = Self::castling_rook(undo.moved, chess_move) {
            if let Some(rook) = self.pieces.remove(&rook_to) {
                self.pieces.insert(rook_from, rook);
            }
        }
        self.pieces.insert(chess_move.from, undo.moved);
        if let Some((pos, piece)) = undo.captured {
            self.pieces.insert(pos, piece);
        }

        self.castling_rights = undo.castling_rights;
        self.last_move = undo.last_move;
        self.current_turn = undo.moved.color;

        Some(chess_move)
    }

    /// Pushes `chess_move` and returns a guard that pops it again when dropped.
    pub fn scoped(&mut self, chess_move: Move) -> Result<ScopedMove<'_>, ChessError> {
        self.push(chess_move)?;
        Ok(ScopedMove::new(self))
    }

    fn castling_rook(piece: Piece, chess_move: Move) -> Option<(Position, Position)> {
        if piece.piece_type != PieceType::King {
            return None;
        }
        let rank = chess_move.from.rank;
        match chess_move.to.file as i8 - chess_move.from.file as i8 {
            2 => Some((Position { file: 8, rank }, Position { file: 6, rank })),
            -2 => Some((Position { file: 1, rank }, Position { file: 4, rank })),
            _ => None,
        }
    }

    fn update_castling_rights(&mut self, piece: &Piece, chess_move: Move) {
        match piece.piece_type {
            PieceType::King => self.castling_rights.revoke(piece.color),
            PieceType::Rook => self.castling_rights.revoke_corner(chess_move.from),
            _ => {}
        }
    }

    /// A pawn moving diagonally onto an empty square.
    pub fn is_en_passant(&self, chess_move: Move) -> bool {
        self.get_piece(chess_move.from)
            .map_or(false, |piece| piece.piece_type == PieceType::Pawn)
            && chess_move.from.file != chess_move.to.file
            && self.get_piece(chess_move.to).is_none()
    }

    pub fn is_capture(&self, chess_move: Move) -> bool {
        self.get_piece(chess_move.to).is_some() || self.is_en_passant(chess_move)
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        Position::all().find(|pos| {
            self.pieces
                .get(pos)
                .map_or(false, |piece| piece.piece_type == PieceType::King && piece.color == color)
        })
    }

    /// A side without a king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_position(color)
            .map_or(false, |king_pos| self.is_position_under_attack(king_pos, color))
    }

    pub fn is_position_under_attack(&self, pos: Position, defending_color: Color) -> bool {
        self.pieces.iter().any(|(&attacker_pos, attacker)| {
            attacker.color != defending_color
                && Move::new(attacker_pos, pos).attacks(attacker, self)
        })
    }

    pub fn is_position_valid(&self, pos: Position) -> bool {
        pos.file >= 1 && pos.file <= 8 && pos.rank >= 1 && pos.rank <= 8
    }

    pub fn get_all_pieces(&self) -> &HashMap<Position, Piece> {
        &self.pieces
    }

    /// Moves of the piece on `pos` that obey its movement pattern, ignoring
    /// whether they leave the own king in check. Castling is not included.
    pub fn get_valid_moves(&self, pos: Position) -> Vec<Move> {
        let mut valid_moves = Vec::new();
        let piece = match self.get_piece(pos) {
            Some(piece) => *piece,
            None => return valid_moves,
        };

        for target_pos in Position::all() {
            let chess_move = Move::new(pos, target_pos);
            if !chess_move.is_valid(self) {
                continue;
            }

            let move_type = if self.get_piece(target_pos).is_some() {
                MoveType::Capture
            } else if self.is_en_passant(chess_move) {
                MoveType::EnPassant
            } else {
                MoveType::Normal
            };

            let last_rank = piece.color.opposite().back_rank();
            if piece.piece_type == PieceType::Pawn && target_pos.rank == last_rank {
                for promotion_type in PieceType::PROMOTIONS {
                    let promotion = Move::with_promotion(pos, target_pos, promotion_type);
                    valid_moves.push(promotion.tagged(move_type));
                }
            } else {
                valid_moves.push(chess_move.tagged(move_type));
            }
        }

        valid_moves
    }

    fn castling_moves(&self, color: Color) -> Vec<Move> {
        let rank = color.back_rank();
        let king_from = Position { file: 5, rank };
        let king_here = self.get_piece(king_from) == Some(&Piece::new(PieceType::King, color));
        if !king_here || self.is_in_check(color) {
            return Vec::new();
        }

        let rook = Piece::new(PieceType::Rook, color);
        let empty = |files: &[u8]| {
            files.iter().all(|&file| self.get_piece(Position { file, rank }).is_none())
        };
        let safe = |files: &[u8]| {
            files.iter().all(|&file| !self.is_position_under_attack(Position { file, rank }, color))
        };

        let mut moves = Vec::new();
        if self.castling_rights.kingside(color)
            && self.get_piece(Position { file: 8, rank }) == Some(&rook)
            && empty(&[6, 7])
            && safe(&[6, 7])
        {
            moves.push(Move::castle(king_from, Position { file: 7, rank }));
        }
        if self.castling_rights.queenside(color)
            && self.get_piece(Position { file: 1, rank }) == Some(&rook)
            && empty(&[2, 3, 4])
            && safe(&[3, 4])
        {
            moves.push(Move::castle(king_from, Position { file: 3, rank }));
        }
        moves
    }

    /// Moves for `color` that obey piece movement and castling rules, without
    /// the check test. Ordered by origin square a1..h8.
    pub fn pseudo_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for pos in Position::all() {
            match self.get_piece(pos) {
                Some(piece) if piece.color == color => {
                    moves.extend(self.get_valid_moves(pos));
                    if piece.piece_type == PieceType::King {
                        moves.extend(self.castling_moves(color));
                    }
                }
                _ => {}
            }
        }
        moves
    }

    /// All legal moves for the side to move, in a deterministic order.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mover = self.current_turn;
        let mut scratch = self.clone();
        self.pseudo_legal_moves(mover)
            .into_iter()
            .filter(|&mv| {
                if scratch.push(mv).is_err() {
                    return false;
                }
                let safe = !scratch.is_in_check(mover);
                scratch.pop();
                safe
            })
            .collect()
    }

    /// Standard algebraic notation for a move legal in this position.
    pub fn san(&self, chess_move: Move) -> String {
        self.san_among(chess_move, &self.legal_moves())
    }

    /// Like [`Board::san`], but disambiguates against `legal_moves`, which
    /// must be the legal moves of this position. Lets callers naming every
    /// move of a turn generate the move list once.
    pub fn san_among(&self, chess_move: Move, legal_moves: &[Move]) -> String {
        let piece = match self.get_piece(chess_move.from) {
            Some(piece) => *piece,
            None => return chess_move.to_string(),
        };

        let mut san = String::new();
        match Self::castling_rook(piece, chess_move) {
            Some((rook_from, _)) if rook_from.file == 8 => san.push_str("O-O"),
            Some(_) => san.push_str("O-O-O"),
            None if piece.piece_type == PieceType::Pawn => {
                if self.is_capture(chess_move) {
                    san.push(chess_move.from.file_char());
                    san.push('x');
                }
                san.push_str(&chess_move.to.to_string());
                if let Some(promotion) = chess_move.promotion {
                    san.push('=');
                    san.push(promotion.to_char().to_ascii_uppercase());
                }
            }
            None => {
                san.extend(piece.piece_type.san_letter());
                san.push_str(&self.disambiguation(piece, chess_move, legal_moves));
                if self.is_capture(chess_move) {
                    san.push('x');
                }
                san.push_str(&chess_move.to.to_string());
            }
        }

        let mut after = self.clone();
        if after.push(chess_move).is_ok() && after.is_in_check(after.current_turn) {
            san.push(if after.legal_moves().is_empty() { '#' } else { '+' });
        }
        san
    }

    fn disambiguation(&self, piece: Piece, chess_move: Move, legal_moves: &[Move]) -> String {
        if piece.piece_type == PieceType::King {
            return String::new();
        }
        let twins: Vec<Position> = legal_moves
            .iter()
            .filter(|mv| mv.to == chess_move.to && mv.from != chess_move.from)
            .filter(|mv| self.get_piece(mv.from) == Some(&piece))
            .map(|mv| mv.from)
            .collect();

        if twins.is_empty() {
            String::new()
        } else if twins.iter().all(|pos| pos.file != chess_move.from.file) {
            chess_move.from.file_char().to_string()
        } else if twins.iter().all(|pos| pos.rank != chess_move.from.rank) {
            chess_move.from.rank_char().to_string()
        } else {
            chess_move.from.to_string()
        }
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_in_check(self.current_turn) && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check(self.current_turn) && self.legal_moves().is_empty()
    }

    pub fn has_insufficient_material(&self) -> bool {
        let mut white_pieces = Vec::new();
        let mut black_pieces = Vec::new();

        for (pos, piece) in self.pieces.iter() {
            if piece.piece_type == PieceType::King {
                continue;
            }
            match piece.color {
                Color::White => white_pieces.push((*pos, piece.piece_type)),
                Color::Black => black_pieces.push((*pos, piece.piece_type)),
            }
        }

        let minor = |pt: PieceType| matches!(pt, PieceType::Bishop | PieceType::Knight);
        match (white_pieces.as_slice(), black_pieces.as_slice()) {
            // King vs King
            ([], []) => true,
            // King and Bishop/Knight vs King
            ([(_, pt)], []) | ([], [(_, pt)]) => minor(*pt),
            // King and Bishop vs King and Bishop (same color bishops)
            ([(wp, PieceType::Bishop)], [(bp, PieceType::Bishop)]) => {
                (wp.file + wp.rank) % 2 == (bp.file + bp.rank) % 2
            }
            _ => false,
        }
    }
}
