use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotationError;

/// A square on the board. `x` is the file (0 = a), `y` the rank (0 = rank 1).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    x: u8,
    y: u8,
}

impl Square {
    /// Panics if either coordinate is off the board.
    pub fn new(x: u8, y: u8) -> Square {
        assert!(x < 8 && y < 8, "square ({x}, {y}) out of range");
        Square { x, y }
    }

    /// Like `new`, but returns `None` for coordinates off the board.
    pub fn try_new(x: i32, y: i32) -> Option<Square> {
        if (0..8).contains(&x) && (0..8).contains(&y) {
            Some(Square { x: x as u8, y: y as u8 })
        } else {
            None
        }
    }

    pub fn x(self) -> u8 {
        self.x
    }

    pub fn y(self) -> u8 {
        self.y
    }

    pub fn offset(self, dx: i32, dy: i32) -> Option<Square> {
        Square::try_new(self.x as i32 + dx, self.y as i32 + dy)
    }

    /// All 64 squares, rank by rank starting from a1.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|y| (0..8u8).map(move |x| Square { x, y }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.x) as char;
        let rank = (b'1' + self.y) as char;
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Square, NotationError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(NotationError::InvalidSquare(s.to_string()));
        }
        let x = bytes[0].wrapping_sub(b'a');
        let y = bytes[1].wrapping_sub(b'1');
        if x < 8 && y < 8 {
            Ok(Square { x, y })
        } else {
            Err(NotationError::InvalidSquare(s.to_string()))
        }
    }
}

impl TryFrom<String> for Square {
    type Error = NotationError;

    fn try_from(s: String) -> Result<Square, NotationError> {
        s.parse()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> String {
        sq.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_algebraic() {
        let sq: Square = "e4".parse().unwrap();
        assert_eq!((sq.x(), sq.y()), (4, 3));
        assert_eq!(sq.to_string(), "e4");
        assert_eq!("h8".parse::<Square>().unwrap(), Square::new(7, 7));
    }

    #[test]
    fn rejects_off_board_names() {
        for bad in ["i1", "a9", "a0", "e", "e44", ""] {
            assert!(bad.parse::<Square>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn offset_stays_on_board() {
        let a1 = Square::new(0, 0);
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(1, 2), Some(Square::new(1, 2)));
        assert_eq!(Square::new(7, 7).offset(0, 1), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn new_asserts_range() {
        Square::new(8, 0);
    }

    #[test]
    fn serializes_as_algebraic_name() {
        let json = serde_json::to_string(&Square::new(3, 4)).unwrap();
        assert_eq!(json, "\"d5\"");
        let back: Square = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Square::new(3, 4));
        assert!(serde_json::from_str::<Square>("\"z9\"").is_err());
    }

    #[test]
    fn all_covers_every_square_once() {
        let squares: Vec<Square> = Square::all().collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0].to_string(), "a1");
        assert_eq!(squares[63].to_string(), "h8");
    }
}
