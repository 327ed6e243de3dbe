#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank the pieces of this color start on.
    pub fn back_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 8,
        }
    }

    /// Direction pawns of this color advance in.
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// Lowercase letter used by FEN and UCI promotions.
    pub fn to_char(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Letter prefix in standard algebraic notation. Pawns have none.
    pub fn san_letter(self) -> Option<char> {
        match self {
            PieceType::Pawn => None,
            other => Some(other.to_char().to_ascii_uppercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Self {
        Self { piece_type, color }
    }

    /// FEN character: uppercase for White, lowercase for Black.
    pub fn to_fen_char(self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_fen_char(c: char) -> Option<Self> {
        let piece_type = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Self::new(piece_type, color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_chars_carry_color() {
        let knight = Piece::from_fen_char('N').unwrap();
        assert_eq!(knight, Piece::new(PieceType::Knight, Color::White));
        assert_eq!(Piece::new(PieceType::Queen, Color::Black).to_fen_char(), 'q');
        assert!(Piece::from_fen_char('x').is_none());
    }

    #[test]
    fn pawns_have_no_san_letter() {
        assert_eq!(PieceType::Pawn.san_letter(), None);
        assert_eq!(PieceType::Rook.san_letter(), Some('R'));
    }
}
