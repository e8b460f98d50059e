//! Textual position format: piece placement, side to move, castling rights,
//! en passant target, half-move clock and full-move number.

use crate::board::Board;
use crate::error::FenError;
use crate::piece::{Color, Piece};
use crate::position::{CastlingRights, Position};
use crate::square::Square;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl CastlingRights {
    pub fn to_fen(&self) -> String {
        let mut s = String::new();
        if self.white_kingside { s.push('K'); }
        if self.white_queenside { s.push('Q'); }
        if self.black_kingside { s.push('k'); }
        if self.black_queenside { s.push('q'); }
        if s.is_empty() {
            s.push('-');
        }
        s
    }

    pub fn from_fen(s: &str) -> Result<CastlingRights, FenError> {
        let mut rights = CastlingRights::NONE;
        if s == "-" {
            return Ok(rights);
        }
        for c in s.chars() {
            let flag = match c {
                'K' => &mut rights.white_kingside,
                'Q' => &mut rights.white_queenside,
                'k' => &mut rights.black_kingside,
                'q' => &mut rights.black_queenside,
                _ => return Err(FenError::InvalidCastling(s.to_string())),
            };
            if *flag {
                return Err(FenError::InvalidCastling(s.to_string()));
            }
            *flag = true;
        }
        Ok(rights)
    }
}

fn parse_placement(field: &str) -> Result<Board, FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount(ranks.len()));
    }
    let mut board = Board::empty();
    for (i, rank) in ranks.iter().enumerate() {
        let y = 7 - i as u8;
        let mut x = 0u8;
        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                if skip == 0 || skip > 8 {
                    return Err(FenError::WrongFileCount { rank: y as usize + 1 });
                }
                x += skip as u8;
            } else {
                let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPiece(c))?;
                if x >= 8 {
                    return Err(FenError::WrongFileCount { rank: y as usize + 1 });
                }
                board.set(Square::new(x, y), Some(piece));
                x += 1;
            }
            if x > 8 {
                return Err(FenError::WrongFileCount { rank: y as usize + 1 });
            }
        }
        if x != 8 {
            return Err(FenError::WrongFileCount { rank: y as usize + 1 });
        }
    }
    Ok(board)
}

fn parse_counter(field: Option<&str>, default: u32) -> Result<u32, FenError> {
    match field {
        None => Ok(default),
        Some(s) => s.parse().map_err(|_| FenError::InvalidCounter(s.to_string())),
    }
}

impl Position {
    /// Parse a position from FEN. The two move counters are optional and
    /// default to `0 1`.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::MissingFields(parts.len()));
        }

        let board = parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSideToMove(other.to_string())),
        };

        let castling_rights = CastlingRights::from_fen(parts[2])?;

        let en_passant_target = if parts[3] == "-" {
            None
        } else {
            let sq: Square = parts[3]
                .parse()
                .map_err(|_| FenError::InvalidEnPassant(parts[3].to_string()))?;
            // The skipped square is always on the mover's opponent's third rank.
            let expected_row = side_to_move.opposite().pawn_start_row() as i32 + side_to_move.opposite().forward();
            if sq.y() as i32 != expected_row {
                return Err(FenError::InvalidEnPassant(parts[3].to_string()));
            }
            Some(sq)
        };

        let halfmove_clock = parse_counter(parts.get(4).copied(), 0)?;
        let fullmove_number = parse_counter(parts.get(5).copied(), 1)?;

        Ok(Position {
            board,
            side_to_move,
            castling_rights,
            en_passant_target,
            halfmove_clock,
            fullmove_number,
        })
    }

    pub fn to_fen(&self) -> String {
        let en_passant = self
            .en_passant_target
            .map(|sq| sq.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {} {} {}",
            self.board.placement_fen(),
            self.side_to_move.fen_char(),
            self.castling_rights.to_fen(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}
