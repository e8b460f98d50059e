use thiserror::Error;

use crate::game::GameOverReason;
use crate::moves::MoveType;
use crate::piece::PieceType;

/// Why a proposed (start, end) pair is not a legal move in the current position.
#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveError {
    #[error("there is no piece on the start square")]
    StartSquareEmpty,

    #[error("the piece on the start square belongs to the other player")]
    WrongPlayersPiece,

    #[error("the destination is occupied by one of the mover's own pieces")]
    BlockedByOwnPiece,

    #[error("the piece does not move that way")]
    IllegalPieceMovement,

    #[error("cannot castle while in check")]
    CannotCastleWhileInCheck,

    #[error("cannot castle because the king or rook has moved")]
    CastlingRightsLost,

    #[error("cannot castle across an occupied square")]
    CastlingPathBlocked,

    #[error("cannot castle across an attacked square")]
    CastlingPathAttacked,

    #[error("the move would leave the king in check")]
    WouldLeaveKingInCheck,

    #[error("a promotion piece must be chosen")]
    PromotionChoiceRequired,

    #[error("cannot promote to {0:?}")]
    InvalidPromotionChoice(PieceType),

    #[error("a promotion piece was given for a move that does not promote")]
    UnexpectedPromotionChoice,
}

/// Why the game refused a move, beyond the move simply being illegal.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum GameError {
    #[error(transparent)]
    Illegal(#[from] MoveError),

    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error("the game is over: {0}")]
    GameOver(GameOverReason),

    #[error("move is tagged {found:?} but validates as {expected:?}")]
    MoveMismatch { expected: MoveType, found: MoveType },
}

#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum FenError {
    #[error("FEN must have at least 4 fields, found {0}")]
    MissingFields(usize),

    #[error("expected 8 ranks in piece placement, found {0}")]
    WrongRankCount(usize),

    #[error("rank {rank} does not describe exactly 8 files")]
    WrongFileCount { rank: usize },

    #[error("invalid piece letter {0:?}")]
    InvalidPiece(char),

    #[error("invalid side to move {0:?}")]
    InvalidSideToMove(String),

    #[error("invalid castling rights {0:?}")]
    InvalidCastling(String),

    #[error("invalid en passant square {0:?}")]
    InvalidEnPassant(String),

    #[error("invalid move counter {0:?}")]
    InvalidCounter(String),
}

#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum NotationError {
    #[error("invalid square {0:?}")]
    InvalidSquare(String),

    #[error("invalid move string {0:?}")]
    InvalidMove(String),

    #[error("invalid promotion letter {0:?}")]
    InvalidPromotion(char),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid starting position: {0}")]
    StartingPosition(#[from] FenError),
}
