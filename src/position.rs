use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::MoveError;
use crate::movegen::MoveGenerator;
use crate::moves::{Move, MoveType};
use crate::piece::{Color, PieceType};
use crate::square::Square;
use crate::validator::MoveValidator;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    /// File of the rook that takes part in this castle.
    pub fn rook_file(self) -> u8 {
        match self {
            CastleSide::KingSide => 7,
            CastleSide::QueenSide => 0,
        }
    }

    /// File the king lands on.
    pub fn king_destination_file(self) -> u8 {
        match self {
            CastleSide::KingSide => 6,
            CastleSide::QueenSide => 2,
        }
    }

    /// Direction the king travels along the home row.
    pub fn direction(self) -> i32 {
        match self {
            CastleSide::KingSide => 1,
            CastleSide::QueenSide => -1,
        }
    }

    pub fn move_type(self) -> MoveType {
        match self {
            CastleSide::KingSide => MoveType::CastleKingSide,
            CastleSide::QueenSide => MoveType::CastleQueenSide,
        }
    }
}

/// Flags are only ever cleared, never set again, once a game is under way.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    pub const NONE: CastlingRights = CastlingRights {
        white_kingside: false,
        white_queenside: false,
        black_kingside: false,
        black_queenside: false,
    };

    pub fn get(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => self.white_kingside,
            (Color::White, CastleSide::QueenSide) => self.white_queenside,
            (Color::Black, CastleSide::KingSide) => self.black_kingside,
            (Color::Black, CastleSide::QueenSide) => self.black_queenside,
        }
    }

    pub fn clear(&mut self, color: Color, side: CastleSide) {
        let flag = match (color, side) {
            (Color::White, CastleSide::KingSide) => &mut self.white_kingside,
            (Color::White, CastleSide::QueenSide) => &mut self.white_queenside,
            (Color::Black, CastleSide::KingSide) => &mut self.black_kingside,
            (Color::Black, CastleSide::QueenSide) => &mut self.black_queenside,
        };
        *flag = false;
    }

    pub fn clear_both(&mut self, color: Color) {
        self.clear(color, CastleSide::KingSide);
        self.clear(color, CastleSide::QueenSide);
    }

    /// True if every flag set here is also set in `earlier`.
    pub fn is_subset_of(&self, earlier: &CastlingRights) -> bool {
        (!self.white_kingside || earlier.white_kingside)
            && (!self.white_queenside || earlier.white_queenside)
            && (!self.black_kingside || earlier.black_kingside)
            && (!self.black_queenside || earlier.black_queenside)
    }

    /// Forget the flag tied to a rook corner, if `sq` is one.
    fn clear_for_corner(&mut self, sq: Square) {
        for color in [Color::White, Color::Black] {
            if sq.y() != color.home_row() {
                continue;
            }
            for side in [CastleSide::KingSide, CastleSide::QueenSide] {
                if sq.x() == side.rook_file() {
                    self.clear(color, side);
                }
            }
        }
    }
}

/// Everything needed to decide whether a proposed move is legal.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Position {
    pub board: Board,
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    /// The square a pawn skipped over on the immediately preceding move.
    pub en_passant_target: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The standard starting position.
    pub fn new() -> Self {
        Position {
            board: Board::new(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::ALL,
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// An arbitrary arrangement with no castling rights and no en passant target.
    pub fn with_board(board: Board, side_to_move: Color) -> Self {
        Position {
            board,
            side_to_move,
            castling_rights: CastlingRights::NONE,
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn can_castle(&self, side: CastleSide) -> bool {
        self.castling_rights.get(self.side_to_move, side)
    }

    pub fn is_in_check(&self) -> bool {
        self.board.is_in_check(self.side_to_move)
    }

    /// All legal moves for the side to move, computed fresh on every call.
    pub fn legal_moves(&self) -> Vec<Move> {
        MoveGenerator::new(self).all_legal_moves()
    }

    /// Classify `start` -> `end` for the side to move.
    pub fn validate(&self, start: Square, end: Square, promotion: Option<PieceType>) -> Result<Move, MoveError> {
        let kind = MoveValidator::new(self, start, end)
            .with_promotion(promotion)
            .validate()?;
        Ok(Move::new(start, end, kind))
    }

    /// Apply a move produced by validation or generation against this
    /// position, then update en passant, castling rights, counters and turn
    /// together.
    pub fn make_move_and_advance_turn(&mut self, mv: &Move) {
        let mover = self.side_to_move;
        let (start, end) = (mv.start(), mv.end());
        let moved = self.board.get(start);
        debug_assert!(
            matches!(moved, Some(p) if p.color == mover),
            "{mv} does not move a {mover:?} piece"
        );
        let is_pawn_move = matches!(moved, Some(p) if p.piece_type == PieceType::Pawn);
        let is_capture = self.board.get(end).is_some() || mv.kind() == MoveType::CaptureEnPassant;

        self.board.apply_move_assuming_valid(start, end, mv.kind());

        self.en_passant_target = match mv.kind() {
            MoveType::PawnTwoSquareAdvance => start.offset(0, mover.forward()),
            _ => None,
        };

        if matches!(moved, Some(p) if p.piece_type == PieceType::King) {
            self.castling_rights.clear_both(mover);
        }
        // A rook leaving its corner, or being captured on it.
        self.castling_rights.clear_for_corner(start);
        self.castling_rights.clear_for_corner(end);

        if is_pawn_move || is_capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if mover == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = mover.opposite();
        debug!("applied {mv} ({:?}), {:?} to move", mv.kind(), self.side_to_move);
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn play(pos: &mut Position, from: &str, to: &str) -> Move {
        let mv = pos.validate(sq(from), sq(to), None).expect("legal move");
        pos.make_move_and_advance_turn(&mv);
        mv
    }

    #[test]
    fn two_square_advance_sets_en_passant_target() {
        let mut pos = Position::new();
        play(&mut pos, "e2", "e4");
        assert_eq!(pos.en_passant_target, Some(sq("e3")));
        assert_eq!(pos.side_to_move, Color::Black);
        assert_eq!(pos.halfmove_clock, 0);
        assert_eq!(pos.fullmove_number, 1);

        play(&mut pos, "g8", "f6");
        assert_eq!(pos.en_passant_target, None);
        assert_eq!(pos.halfmove_clock, 1);
        assert_eq!(pos.fullmove_number, 2);
    }

    #[test]
    fn king_move_clears_both_flags() {
        let mut pos = Position::new();
        play(&mut pos, "e2", "e4");
        play(&mut pos, "e7", "e5");
        play(&mut pos, "e1", "e2");
        assert!(!pos.castling_rights.white_kingside);
        assert!(!pos.castling_rights.white_queenside);
        assert!(pos.castling_rights.black_kingside);
        assert!(pos.castling_rights.black_queenside);
    }

    #[test]
    fn rook_move_clears_one_flag() {
        let mut pos = Position::new();
        play(&mut pos, "h2", "h4");
        play(&mut pos, "a7", "a5");
        play(&mut pos, "h1", "h3");
        assert!(!pos.castling_rights.white_kingside);
        assert!(pos.castling_rights.white_queenside);
        play(&mut pos, "a8", "a6");
        assert!(!pos.castling_rights.black_queenside);
        assert!(pos.castling_rights.black_kingside);
    }

    #[test]
    fn capturing_a_corner_rook_clears_its_flag() {
        let mut board = Board::empty();
        board.set(sq("e1"), Some(Piece::new(PieceType::King, Color::White)));
        board.set(sq("e8"), Some(Piece::new(PieceType::King, Color::Black)));
        board.set(sq("h8"), Some(Piece::new(PieceType::Rook, Color::Black)));
        board.set(sq("b2"), Some(Piece::new(PieceType::Bishop, Color::White)));
        let mut pos = Position::with_board(board, Color::White);
        pos.castling_rights = CastlingRights::ALL;

        play(&mut pos, "b2", "h8");
        assert!(!pos.castling_rights.black_kingside);
        assert!(pos.castling_rights.black_queenside);
    }

    #[test]
    fn castle_moves_rook_and_clears_flags() {
        let mut board = Board::empty();
        board.set(sq("e1"), Some(Piece::new(PieceType::King, Color::White)));
        board.set(sq("a1"), Some(Piece::new(PieceType::Rook, Color::White)));
        board.set(sq("h8"), Some(Piece::new(PieceType::King, Color::Black)));
        let mut pos = Position::with_board(board, Color::White);
        pos.castling_rights.white_queenside = true;
        assert!(pos.can_castle(CastleSide::QueenSide));
        assert!(!pos.can_castle(CastleSide::KingSide));

        let mv = play(&mut pos, "e1", "c1");
        assert_eq!(mv.kind(), MoveType::CastleQueenSide);
        assert_eq!(pos.board.get(sq("d1")), Some(Piece::new(PieceType::Rook, Color::White)));
        assert_eq!(pos.castling_rights, CastlingRights::NONE);
    }

    #[test]
    fn subset_check() {
        let mut later = CastlingRights::ALL;
        later.clear(Color::Black, CastleSide::QueenSide);
        assert!(later.is_subset_of(&CastlingRights::ALL));
        assert!(!CastlingRights::ALL.is_subset_of(&later));
        assert!(CastlingRights::NONE.is_subset_of(&later));
    }
}
