use crate::moves::{Move, MoveType};
use crate::piece::{Movement, Piece, PieceType};
use crate::position::{CastleSide, Position};
use crate::square::Square;
use crate::validator::{castling_preconditions, en_passant_available, move_keeps_king_safe};

/// Enumerates every legal move for the side to move.
///
/// Candidates are produced from each piece's movement rules and then run
/// through the same king-safety test the validator uses, so the two always
/// agree on what is legal. The order of the result carries no meaning.
pub struct MoveGenerator<'a> {
    position: &'a Position,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(position: &'a Position) -> Self {
        MoveGenerator { position }
    }

    pub fn all_legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        let mover = self.position.side_to_move;

        for (sq, piece) in self.position.board.pieces() {
            if piece.color != mover {
                continue;
            }
            match piece.piece_type {
                PieceType::Pawn => self.generate_pawn_moves(sq, piece, &mut moves),
                pt => self.generate_vector_moves(sq, pt.movement(), &mut moves),
            }
        }
        self.generate_castling_moves(&mut moves);

        moves
    }

    /// Legal moves starting on `from`.
    pub fn moves_from(&self, from: Square) -> Vec<Move> {
        self.all_legal_moves()
            .into_iter()
            .filter(|m| m.start() == from)
            .collect()
    }

    fn push_if_safe(&self, start: Square, end: Square, kind: MoveType, moves: &mut Vec<Move>) {
        if move_keeps_king_safe(self.position, start, end, kind) {
            moves.push(Move::new(start, end, kind));
        }
    }

    /// One king-safety test covers all four choices: the promoted piece
    /// stands on the same square whatever it is.
    fn push_promotions_if_safe(&self, start: Square, end: Square, moves: &mut Vec<Move>) {
        if move_keeps_king_safe(self.position, start, end, MoveType::Promotion(PieceType::Queen)) {
            for pt in PieceType::PROMOTIONS {
                moves.push(Move::new(start, end, MoveType::Promotion(pt)));
            }
        }
    }

    fn generate_pawn_moves(&self, from: Square, pawn: Piece, moves: &mut Vec<Move>) {
        let board = &self.position.board;
        let color = pawn.color;
        let forward = color.forward();

        // Single push, then double push from the start row.
        if let Some(one) = from.offset(0, forward) {
            if board.get(one).is_none() {
                if one.y() == color.promotion_row() {
                    self.push_promotions_if_safe(from, one, moves);
                } else {
                    self.push_if_safe(from, one, MoveType::Plain, moves);
                    if from.y() == color.pawn_start_row() {
                        if let Some(two) = one.offset(0, forward) {
                            if board.get(two).is_none() {
                                self.push_if_safe(from, two, MoveType::PawnTwoSquareAdvance, moves);
                            }
                        }
                    }
                }
            }
        }

        // Captures, including en passant.
        for dx in [-1, 1] {
            let Some(to) = from.offset(dx, forward) else {
                continue;
            };
            match board.get(to) {
                Some(target) if target.color != color => {
                    if to.y() == color.promotion_row() {
                        self.push_promotions_if_safe(from, to, moves);
                    } else {
                        self.push_if_safe(from, to, MoveType::Plain, moves);
                    }
                }
                None if en_passant_available(self.position, from, to) => {
                    self.push_if_safe(from, to, MoveType::CaptureEnPassant, moves);
                }
                _ => {}
            }
        }
    }

    /// Walk each vector, continuing past empty squares for sliders, stopping
    /// at the edge, at an own piece, or just after an enemy capture.
    fn generate_vector_moves(&self, from: Square, movement: Movement, moves: &mut Vec<Move>) {
        let board = &self.position.board;
        let mover = self.position.side_to_move;
        for &(dx, dy) in movement.vectors {
            let mut current = from;
            while let Some(to) = current.offset(dx, dy) {
                match board.get(to) {
                    Some(p) => {
                        if p.color != mover {
                            self.push_if_safe(from, to, MoveType::Plain, moves);
                        }
                        break;
                    }
                    None => self.push_if_safe(from, to, MoveType::Plain, moves),
                }
                if !movement.can_repeat {
                    break;
                }
                current = to;
            }
        }
    }

    fn generate_castling_moves(&self, moves: &mut Vec<Move>) {
        if self.position.is_in_check() {
            return;
        }
        let home = self.position.side_to_move.home_row();
        let king_home = Square::new(4, home);
        for side in [CastleSide::KingSide, CastleSide::QueenSide] {
            if castling_preconditions(self.position, side).is_ok() {
                let to = Square::new(side.king_destination_file(), home);
                self.push_if_safe(king_home, to, side.move_type(), moves);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::piece::Color;
    use crate::position::CastlingRights;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn setup(pieces: &[(&str, PieceType, Color)], side: Color) -> Position {
        let mut board = Board::empty();
        for &(name, pt, color) in pieces {
            board.set(sq(name), Some(Piece::new(pt, color)));
        }
        Position::with_board(board, side)
    }

    #[test]
    fn twenty_moves_from_the_start() {
        let moves = MoveGenerator::new(&Position::new()).all_legal_moves();
        assert_eq!(moves.len(), 20);
        let pawn_doubles = moves
            .iter()
            .filter(|m| m.kind() == MoveType::PawnTwoSquareAdvance)
            .count();
        assert_eq!(pawn_doubles, 8);
    }

    #[test]
    fn promotions_expand_to_four_choices() {
        let pos = setup(
            &[
                ("e1", PieceType::King, Color::White),
                ("h8", PieceType::King, Color::Black),
                ("b7", PieceType::Pawn, Color::White),
                ("a8", PieceType::Rook, Color::Black),
            ],
            Color::White,
        );
        let moves = MoveGenerator::new(&pos).moves_from(sq("b7"));
        // Push to b8 and capture on a8, four choices each.
        assert_eq!(moves.len(), 8);
        for pt in PieceType::PROMOTIONS {
            assert!(moves.contains(&Move::new(sq("b7"), sq("a8"), MoveType::Promotion(pt))));
        }
    }

    #[test]
    fn castling_skipped_while_in_check() {
        let mut pos = setup(
            &[
                ("e1", PieceType::King, Color::White),
                ("a1", PieceType::Rook, Color::White),
                ("h1", PieceType::Rook, Color::White),
                ("e8", PieceType::Rook, Color::Black),
                ("a8", PieceType::King, Color::Black),
            ],
            Color::White,
        );
        pos.castling_rights = CastlingRights::ALL;
        let moves = MoveGenerator::new(&pos).all_legal_moves();
        assert!(moves.iter().all(|m| !m.kind().is_castle()));

        pos.board.set(sq("e8"), None);
        let moves = MoveGenerator::new(&pos).all_legal_moves();
        assert_eq!(moves.iter().filter(|m| m.kind().is_castle()).count(), 2);
    }

    #[test]
    fn only_check_evasions_when_in_check() {
        // Black queen on e2 checks the white king on e1; the king may only take it.
        let pos = setup(
            &[
                ("e1", PieceType::King, Color::White),
                ("e2", PieceType::Queen, Color::Black),
                ("e3", PieceType::King, Color::Black),
                ("a2", PieceType::Pawn, Color::White),
            ],
            Color::White,
        );
        let moves = MoveGenerator::new(&pos).all_legal_moves();
        assert!(moves.is_empty(), "expected checkmate, got {moves:?}");
    }

    #[test]
    fn en_passant_is_generated() {
        let mut pos = setup(
            &[
                ("e1", PieceType::King, Color::White),
                ("e8", PieceType::King, Color::Black),
                ("d4", PieceType::Pawn, Color::Black),
                ("e4", PieceType::Pawn, Color::White),
            ],
            Color::Black,
        );
        pos.en_passant_target = Some(sq("e3"));
        let moves = MoveGenerator::new(&pos).moves_from(sq("d4"));
        assert!(moves.contains(&Move::new(sq("d4"), sq("e3"), MoveType::CaptureEnPassant)));
        assert!(moves.contains(&Move::new(sq("d4"), sq("d3"), MoveType::Plain)));
        assert_eq!(moves.len(), 2);
    }
}
