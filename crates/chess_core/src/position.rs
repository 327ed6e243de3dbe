use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub rank: u8,  // 1-8
    pub file: u8,  // a-h (1-8)
}

impl Position {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// Offsets the square, returning `None` when it leaves the board.
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file as i8 + file_delta;
        let rank = self.rank as i8 + rank_delta;
        if file < 1 || rank < 1 {
            return None;
        }
        Self::new(file as u8, rank as u8)
    }

    pub fn from_algebraic(notation: &str) -> Option<Self> {
        let mut chars = notation.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return None,
        };

        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }

        Some(Self {
            file: (file as u8) - b'a' + 1,
            rank: (rank as u8) - b'0',
        })
    }

    pub fn file_char(self) -> char {
        (b'a' + self.file - 1) as char
    }

    pub fn rank_char(self) -> char {
        (b'0' + self.rank) as char
    }

    /// Iterates a1, b1, .., h1, a2, .., h8.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8).flat_map(|rank| (1..=8).map(move |file| Position { rank, file }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}
