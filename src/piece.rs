use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// +1 for White, -1 for Black: the rank direction this color's pawns move in.
    pub fn forward(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The back rank where this color's king and rooks start.
    pub fn home_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    pub fn promotion_row(self) -> u8 {
        self.opposite().home_row()
    }

    pub fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

/// The ways a non-pawn piece moves: unit step vectors, plus whether a step
/// may be repeated along the same line.
#[derive(Clone, Copy, Debug)]
pub struct Movement {
    pub vectors: &'static [(i32, i32)],
    pub can_repeat: bool,
}

const KNIGHT_VECTORS: [(i32, i32); 8] = [
    (1, 2), (1, -2), (-1, 2), (-1, -2),
    (2, 1), (2, -1), (-2, 1), (-2, -1),
];
const DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const STRAIGHTS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const ALL_DIRECTIONS: [(i32, i32); 8] = [
    (1, 1), (1, -1), (-1, 1), (-1, -1),
    (0, 1), (0, -1), (1, 0), (-1, 0),
];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Pieces a pawn may promote to, in the order they are offered.
    pub const PROMOTIONS: [PieceType; 4] =
        [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];

    /// Movement descriptor for this piece type. Pawns move by their own rules
    /// and get an empty vector list.
    pub fn movement(self) -> Movement {
        match self {
            PieceType::Pawn => Movement { vectors: &[], can_repeat: false },
            PieceType::Knight => Movement { vectors: &KNIGHT_VECTORS, can_repeat: false },
            PieceType::Bishop => Movement { vectors: &DIAGONALS, can_repeat: true },
            PieceType::Rook => Movement { vectors: &STRAIGHTS, can_repeat: true },
            PieceType::Queen => Movement { vectors: &ALL_DIRECTIONS, can_repeat: true },
            PieceType::King => Movement { vectors: &ALL_DIRECTIONS, can_repeat: false },
        }
    }

    pub fn is_promotion_choice(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }

    /// Lowercase letter used in FEN and UCI notation.
    pub fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    pub fn from_letter(c: char) -> Option<PieceType> {
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
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Self {
        Piece { piece_type, color }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn fen_char(self) -> char {
        let c = self.piece_type.letter();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let piece_type = PieceType::from_letter(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(piece_type, color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_geometry() {
        assert_eq!(Color::White.pawn_start_row(), 1);
        assert_eq!(Color::Black.pawn_start_row(), 6);
        assert_eq!(Color::White.promotion_row(), 7);
        assert_eq!(Color::Black.promotion_row(), 0);
        for color in [Color::White, Color::Black] {
            let start = color.home_row() as i32 + color.forward();
            assert_eq!(start, color.pawn_start_row() as i32);
        }
    }

    #[test]
    fn sliders_repeat_and_steppers_do_not() {
        assert!(PieceType::Bishop.movement().can_repeat);
        assert!(PieceType::Rook.movement().can_repeat);
        assert!(PieceType::Queen.movement().can_repeat);
        assert!(!PieceType::Knight.movement().can_repeat);
        assert!(!PieceType::King.movement().can_repeat);
        assert!(PieceType::Pawn.movement().vectors.is_empty());
    }

    #[test]
    fn fen_chars_map_both_ways() {
        for c in "PNBRQKpnbrqk".chars() {
            let piece = Piece::from_fen_char(c).expect("valid fen letter");
            assert_eq!(piece.fen_char(), c);
        }
        assert_eq!(Piece::from_fen_char('x'), None);
    }
}
