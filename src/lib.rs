pub mod board;
pub mod config;
pub mod error;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod player;
pub mod position;
pub mod square;
pub mod validator;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use board::Board;
pub use config::{GameConfig, PlayerKind, PromotionPolicy};
pub use error::{ConfigError, FenError, GameError, MoveError, NotationError};
pub use fen::STARTING_FEN;
pub use game::{Game, GameCompletionState, GameEvent, GameObserver, GameOverReason, GameSnapshot};
pub use movegen::MoveGenerator;
pub use moves::{Move, MoveRequest, MoveType};
pub use piece::{Color, Piece, PieceType};
pub use player::{EngineLink, EnginePlayer, HumanPlayer, Player, RandomMover};
pub use position::{CastleSide, CastlingRights, Position};
pub use square::Square;
pub use validator::MoveValidator;

/// When this library was built, as `YYYY-MM-DD HH:MM`.
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
