use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NotationError;
use crate::piece::PieceType;
use crate::square::Square;

/// What a move does beyond relocating one piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum MoveType {
    Plain,
    PawnTwoSquareAdvance,
    CaptureEnPassant,
    Promotion(PieceType),
    CastleKingSide,
    CastleQueenSide,
}

impl MoveType {
    pub fn promotion(self) -> Option<PieceType> {
        match self {
            MoveType::Promotion(pt) => Some(pt),
            _ => None,
        }
    }

    pub fn is_castle(self) -> bool {
        matches!(self, MoveType::CastleKingSide | MoveType::CastleQueenSide)
    }
}

/// A move that has been classified against a position. Only the validator and
/// the generator create these; anything coming from outside is a `MoveRequest`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Move {
    start: Square,
    end: Square,
    kind: MoveType,
}

impl Move {
    pub(crate) fn new(start: Square, end: Square, kind: MoveType) -> Move {
        Move { start, end, kind }
    }

    pub fn start(&self) -> Square {
        self.start
    }

    pub fn end(&self) -> Square {
        self.end
    }

    pub fn kind(&self) -> MoveType {
        self.kind
    }

    /// Convert to UCI notation, e.g. "e2e4", "a7a8q"
    pub fn to_uci(&self) -> String {
        self.request().to_uci()
    }

    /// The proposal that would reproduce this move.
    pub fn request(&self) -> MoveRequest {
        MoveRequest {
            from: self.start,
            to: self.end,
            promotion: self.kind.promotion(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

/// An unclassified "move from A to B" proposal, as produced by a human or an
/// external engine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl MoveRequest {
    pub fn new(from: Square, to: Square, promotion: Option<PieceType>) -> MoveRequest {
        MoveRequest { from, to, promotion }
    }

    pub fn to_uci(&self) -> String {
        match self.promotion {
            Some(pt) => format!("{}{}{}", self.from, self.to, pt.letter()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Parse from UCI notation. Surrounding whitespace is ignored, so raw
    /// lines read from an engine can be passed straight in.
    pub fn from_uci(s: &str) -> Result<MoveRequest, NotationError> {
        let s = s.trim();
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(NotationError::InvalidMove(s.to_string()));
        }
        let from: Square = s[0..2].parse()?;
        let to: Square = s[2..4].parse()?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceType::from_letter(c) {
                Some(pt) if pt.is_promotion_choice() => Some(pt),
                _ => return Err(NotationError::InvalidPromotion(c)),
            },
        };
        Ok(MoveRequest { from, to, promotion })
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}
