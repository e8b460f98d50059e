use log::debug;

use crate::error::MoveError;
use crate::moves::MoveType;
use crate::piece::{Color, Piece, PieceType};
use crate::position::{CastleSide, Position};
use crate::square::Square;

/// Decides whether moving the piece on `start` to `end` is legal for the side
/// to move, and if so what kind of move it is.
///
/// Checks run in a fixed order and stop at the first failure: ownership of
/// the start square, the destination, the piece's own movement rules (pawn and
/// castling special cases included), and finally whether the mover's king
/// would be left in check.
pub struct MoveValidator<'a> {
    position: &'a Position,
    start: Square,
    end: Square,
    promotion: Option<PieceType>,
}

impl<'a> MoveValidator<'a> {
    pub fn new(position: &'a Position, start: Square, end: Square) -> Self {
        MoveValidator { position, start, end, promotion: None }
    }

    /// The piece a pawn should become if the move turns out to be a promotion.
    pub fn with_promotion(mut self, promotion: Option<PieceType>) -> Self {
        self.promotion = promotion;
        self
    }

    pub fn validate(&self) -> Result<MoveType, MoveError> {
        let result = self
            .classify()
            .and_then(|kind| {
                if move_keeps_king_safe(self.position, self.start, self.end, kind) {
                    Ok(kind)
                } else {
                    Err(MoveError::WouldLeaveKingInCheck)
                }
            })
            .and_then(|kind| self.resolve_promotion(kind));
        if let Err(reason) = &result {
            debug!("rejected {}{}: {reason}", self.start, self.end);
        }
        result
    }

    /// Everything except the king-safety test.
    fn classify(&self) -> Result<MoveType, MoveError> {
        let board = &self.position.board;
        let mover = self.position.side_to_move;

        let piece = board.get(self.start).ok_or(MoveError::StartSquareEmpty)?;
        if piece.color != mover {
            return Err(MoveError::WrongPlayersPiece);
        }
        if matches!(board.get(self.end), Some(p) if p.color == mover) {
            return Err(MoveError::BlockedByOwnPiece);
        }

        if piece.piece_type == PieceType::Pawn {
            return self.classify_pawn_move(mover);
        }

        if let Some(side) = self.castle_attempt(piece) {
            if board.is_in_check(mover) {
                return Err(MoveError::CannotCastleWhileInCheck);
            }
            castling_preconditions(self.position, side)?;
            return Ok(side.move_type());
        }

        let movement = piece.piece_type.movement();
        let reachable = movement
            .vectors
            .iter()
            .any(|&v| board.path_is_clear(self.start, self.end, v, movement.can_repeat));
        if reachable {
            Ok(MoveType::Plain)
        } else {
            Err(MoveError::IllegalPieceMovement)
        }
    }

    /// A king jumping two files along its home row from its home square.
    fn castle_attempt(&self, piece: Piece) -> Option<CastleSide> {
        if piece.piece_type != PieceType::King {
            return None;
        }
        let home = piece.color.home_row();
        if self.start != Square::new(4, home) || self.end.y() != home {
            return None;
        }
        match self.end.x() {
            6 => Some(CastleSide::KingSide),
            2 => Some(CastleSide::QueenSide),
            _ => None,
        }
    }

    fn classify_pawn_move(&self, mover: Color) -> Result<MoveType, MoveError> {
        let board = &self.position.board;
        let dx = self.end.x() as i32 - self.start.x() as i32;
        let dy = self.end.y() as i32 - self.start.y() as i32;
        let forward = mover.forward();
        let target = board.get(self.end);
        let promotes = self.end.y() == mover.promotion_row();

        if dx == 0 && target.is_none() {
            if dy == forward {
                return Ok(if promotes { self.provisional_promotion() } else { MoveType::Plain });
            }
            if dy == 2 * forward && self.start.y() == mover.pawn_start_row() {
                let skipped = Square::new(self.start.x(), (self.start.y() as i32 + forward) as u8);
                if board.get(skipped).is_none() {
                    return Ok(MoveType::PawnTwoSquareAdvance);
                }
            }
        } else if dx.abs() == 1 && dy == forward {
            match target {
                Some(p) if p.color != mover => {
                    return Ok(if promotes { self.provisional_promotion() } else { MoveType::Plain });
                }
                None if en_passant_available(self.position, self.start, self.end) => {
                    return Ok(MoveType::CaptureEnPassant);
                }
                _ => {}
            }
        }
        Err(MoveError::IllegalPieceMovement)
    }

    /// Any promotion piece will do for the king-safety test; the real choice
    /// is settled in `resolve_promotion`.
    fn provisional_promotion(&self) -> MoveType {
        MoveType::Promotion(PieceType::Queen)
    }

    fn resolve_promotion(&self, kind: MoveType) -> Result<MoveType, MoveError> {
        match (kind, self.promotion) {
            (MoveType::Promotion(_), None) => Err(MoveError::PromotionChoiceRequired),
            (MoveType::Promotion(_), Some(pt)) if !pt.is_promotion_choice() => {
                Err(MoveError::InvalidPromotionChoice(pt))
            }
            (MoveType::Promotion(_), Some(pt)) => Ok(MoveType::Promotion(pt)),
            (_, Some(_)) => Err(MoveError::UnexpectedPromotionChoice),
            (kind, None) => Ok(kind),
        }
    }
}

/// The one test for "does this move keep my king safe", shared by the
/// validator and the generator: play it on a scratch board and look.
pub(crate) fn move_keeps_king_safe(position: &Position, start: Square, end: Square, kind: MoveType) -> bool {
    let mut scratch = position.board.clone();
    scratch.apply_move_assuming_valid(start, end, kind);
    !scratch.is_in_check(position.side_to_move)
}

/// Can the pawn on `start` capture en passant by moving to `end`? The empty
/// destination must be the recorded target and the enemy pawn that just
/// advanced must be beside the capturing pawn.
pub(crate) fn en_passant_available(position: &Position, start: Square, end: Square) -> bool {
    let mover = position.side_to_move;
    if position.en_passant_target != Some(end) || position.board.get(end).is_some() {
        return false;
    }
    let victim = Square::new(end.x(), start.y());
    position.board.get(victim) == Some(Piece::new(PieceType::Pawn, mover.opposite()))
}

/// Castling checks other than "not currently in check": rights, pieces on
/// their home squares, an empty path, and no attacked square on the king's way.
pub(crate) fn castling_preconditions(position: &Position, side: CastleSide) -> Result<(), MoveError> {
    let mover = position.side_to_move;
    let board = &position.board;
    let home = mover.home_row();
    let king_home = Square::new(4, home);
    let rook_home = Square::new(side.rook_file(), home);

    if !position.can_castle(side) {
        return Err(MoveError::CastlingRightsLost);
    }
    if board.get(king_home) != Some(Piece::new(PieceType::King, mover))
        || board.get(rook_home) != Some(Piece::new(PieceType::Rook, mover))
    {
        return Err(MoveError::CastlingRightsLost);
    }

    let (low, high) = if side.rook_file() < 4 { (side.rook_file() + 1, 4) } else { (5, side.rook_file()) };
    if (low..high).any(|x| board.get(Square::new(x, home)).is_some()) {
        return Err(MoveError::CastlingPathBlocked);
    }

    for step in 1..=2 {
        let crossed = Square::new((4 + side.direction() * step) as u8, home);
        let mut scratch = board.clone();
        scratch.blind_move(king_home, crossed);
        if scratch.is_in_check(mover) {
            return Err(MoveError::CastlingPathAttacked);
        }
    }
    Ok(())
}
