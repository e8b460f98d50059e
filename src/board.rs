use std::fmt;

use serde::{Deserialize, Serialize};

use crate::moves::MoveType;
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;

/// An 8x8 grid of optional pieces, indexed `squares[y][x]`.
///
/// The board does not insist on one king per side; test and setup positions
/// may place pieces however they like.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board { squares: [[None; 8]; 8] }
    }

    /// The standard starting layout.
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            PieceType::Rook, PieceType::Knight, PieceType::Bishop, PieceType::Queen,
            PieceType::King, PieceType::Bishop, PieceType::Knight, PieceType::Rook,
        ];
        for (x, &pt) in back_rank.iter().enumerate() {
            board.squares[0][x] = Some(Piece::new(pt, Color::White));
            board.squares[1][x] = Some(Piece::new(PieceType::Pawn, Color::White));
            board.squares[6][x] = Some(Piece::new(PieceType::Pawn, Color::Black));
            board.squares[7][x] = Some(Piece::new(pt, Color::Black));
        }
        board
    }

    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.y() as usize][sq.x() as usize]
    }

    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.y() as usize][sq.x() as usize] = piece;
    }

    /// Every occupied square with its piece, rank by rank from a1.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|&(_, p)| p.piece_type == PieceType::King && p.color == color)
            .map(|(sq, _)| sq)
    }

    /// Walk from `from` in steps of `vector`. True as soon as the walk reaches
    /// `to`; false if it leaves the board, runs into an occupied square first,
    /// or (when `can_repeat` is false) the single step misses `to`.
    ///
    /// Whether `to` itself may be occupied is the caller's business.
    pub fn path_is_clear(&self, from: Square, to: Square, vector: (i32, i32), can_repeat: bool) -> bool {
        debug_assert!(vector != (0, 0), "zero-length movement vector");
        let mut current = from;
        while let Some(next) = current.offset(vector.0, vector.1) {
            if next == to {
                return true;
            }
            if self.get(next).is_some() || !can_repeat {
                return false;
            }
            current = next;
        }
        false
    }

    /// Does any piece of color `attacker` attack `target`?
    pub fn is_attacked_by(&self, target: Square, attacker: Color) -> bool {
        self.pieces()
            .filter(|&(_, p)| p.color == attacker)
            .any(|(sq, p)| self.piece_attacks(sq, p, target))
    }

    fn piece_attacks(&self, from: Square, piece: Piece, target: Square) -> bool {
        if from == target {
            return false;
        }
        if piece.piece_type == PieceType::Pawn {
            // Pawns only attack the two squares diagonally ahead.
            let dy = target.y() as i32 - from.y() as i32;
            let dx = target.x() as i32 - from.x() as i32;
            return dy == piece.color.forward() && dx.abs() == 1;
        }
        let movement = piece.piece_type.movement();
        movement
            .vectors
            .iter()
            .any(|&v| self.path_is_clear(from, target, v, movement.can_repeat))
    }

    /// Is `color`'s king attacked? A board without that king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king) => self.is_attacked_by(king, color.opposite()),
            None => false,
        }
    }

    /// Relocate whatever is on `from` to `to`, ignoring every rule. Used to ask
    /// "would the king be attacked on that square?" during castling.
    pub fn blind_move(&mut self, from: Square, to: Square) {
        let piece = self.get(from);
        self.set(to, piece);
        self.set(from, None);
    }

    /// Carry out a move that validation has already classified as `kind` against
    /// this exact board. Nothing is re-checked here.
    pub fn apply_move_assuming_valid(&mut self, from: Square, to: Square, kind: MoveType) {
        let piece = self.get(from);
        debug_assert!(piece.is_some(), "no piece to move on {from}");
        self.blind_move(from, to);

        match kind {
            MoveType::Plain | MoveType::PawnTwoSquareAdvance => {}
            MoveType::CaptureEnPassant => {
                let captured = Square::new(to.x(), from.y());
                debug_assert!(
                    matches!(self.get(captured), Some(p) if p.piece_type == PieceType::Pawn),
                    "en passant with no pawn on {captured}"
                );
                self.set(captured, None);
            }
            MoveType::Promotion(promote_to) => {
                if let Some(p) = piece {
                    self.set(to, Some(Piece::new(promote_to, p.color)));
                }
            }
            MoveType::CastleKingSide => {
                self.blind_move(Square::new(7, from.y()), Square::new(5, from.y()));
            }
            MoveType::CastleQueenSide => {
                self.blind_move(Square::new(0, from.y()), Square::new(3, from.y()));
            }
        }
    }

    /// FEN piece placement field, rank 8 first.
    pub fn placement_fen(&self) -> String {
        let mut out = String::with_capacity(72);
        for y in (0..8).rev() {
            let mut empty = 0;
            for x in 0..8 {
                match self.squares[y][x] {
                    Some(p) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(p.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if y > 0 {
                out.push('/');
            }
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..8).rev() {
            write!(f, "{} ", y + 1)?;
            for x in 0..8 {
                let c = self.squares[y][x].map(|p| p.fen_char()).unwrap_or('.');
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  abcdefgh")
    }
}
