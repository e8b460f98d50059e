//! Property-based tests over positions reached by random legal play.

use fidget_chess::{Color, MoveError, MoveType, PieceType, Position, Square};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Random legal playouts from the starting position. Each index picks a
/// move from whatever is legal at that point; the playout stops early at
/// checkmate or stalemate.
fn arb_playout() -> impl Strategy<Value = Vec<Position>> {
    proptest::collection::vec(0usize..256, 0..60).prop_map(|indices| {
        let mut pos = Position::new();
        let mut seen = vec![pos.clone()];
        for idx in indices {
            let moves = pos.legal_moves();
            if moves.is_empty() {
                break;
            }
            pos.make_move_and_advance_turn(&moves[idx % moves.len()]);
            seen.push(pos.clone());
        }
        seen
    })
}

fn arb_valid_position() -> impl Strategy<Value = Position> {
    arb_playout().prop_map(|mut positions| positions.pop().unwrap_or_default())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_legal_moves_never_leave_king_in_check(pos in arb_valid_position()) {
        let mover = pos.side_to_move;
        for mv in pos.legal_moves() {
            let mut next = pos.clone();
            next.make_move_and_advance_turn(&mv);
            prop_assert!(!next.board.is_in_check(mover), "{} leaves {:?} in check in {}", mv, mover, pos);
        }
    }

    #[test]
    fn prop_validator_agrees_with_generator(pos in arb_valid_position()) {
        let legal = pos.legal_moves();
        for from in Square::all() {
            for to in Square::all() {
                let generated: Vec<_> = legal.iter().filter(|m| m.start() == from && m.end() == to).collect();
                let verdict = pos.validate(from, to, None);
                match generated.first() {
                    None => prop_assert!(
                        matches!(verdict, Err(e) if e != MoveError::PromotionChoiceRequired),
                        "{}{} validated as {:?} but was not generated in {}", from, to, verdict, pos
                    ),
                    Some(mv) if mv.kind().promotion().is_some() => {
                        prop_assert_eq!(generated.len(), 4);
                        prop_assert_eq!(verdict, Err(MoveError::PromotionChoiceRequired));
                        let queen = pos.validate(from, to, Some(PieceType::Queen));
                        prop_assert_eq!(queen.map(|m| m.kind()), Ok(MoveType::Promotion(PieceType::Queen)));
                    }
                    Some(mv) => {
                        prop_assert_eq!(generated.len(), 1);
                        prop_assert_eq!(verdict, Ok(**mv));
                    }
                }
            }
        }
    }

    #[test]
    fn prop_turns_alternate(positions in arb_playout()) {
        for pair in positions.windows(2) {
            prop_assert_eq!(pair[1].side_to_move, pair[0].side_to_move.opposite());
        }
    }

    #[test]
    fn prop_fen_round_trip(pos in arb_valid_position()) {
        let fen = pos.to_fen();
        let parsed = Position::from_fen(&fen);
        prop_assert_eq!(parsed.as_ref(), Ok(&pos), "FEN {}", fen);
    }

    #[test]
    fn prop_castling_rights_only_shrink(positions in arb_playout()) {
        for pair in positions.windows(2) {
            prop_assert!(pair[1].castling_rights.is_subset_of(&pair[0].castling_rights));
        }
    }

    #[test]
    fn prop_one_king_each(pos in arb_valid_position()) {
        prop_assert!(pos.board.find_king(Color::White).is_some());
        prop_assert!(pos.board.find_king(Color::Black).is_some());
        prop_assert_eq!(pos.board.pieces().filter(|(_, p)| p.piece_type == PieceType::King).count(), 2);
    }
}
