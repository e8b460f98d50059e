use std::fmt;
use std::sync::mpsc::Sender;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, PromotionPolicy};
use crate::error::{ConfigError, GameError, MoveError};
use crate::moves::{Move, MoveRequest};
use crate::piece::{Color, Piece, PieceType};
use crate::player::{HumanPlayer, Player};
use crate::position::Position;
use crate::square::Square;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum GameOverReason {
    WhiteWinsByCheckmate,
    BlackWinsByCheckmate,
    DrawByStalemate,
}

impl GameOverReason {
    pub fn winner(self) -> Option<Color> {
        match self {
            GameOverReason::WhiteWinsByCheckmate => Some(Color::White),
            GameOverReason::BlackWinsByCheckmate => Some(Color::Black),
            GameOverReason::DrawByStalemate => None,
        }
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameOverReason::WhiteWinsByCheckmate => "White wins by checkmate",
            GameOverReason::BlackWinsByCheckmate => "Black wins by checkmate",
            GameOverReason::DrawByStalemate => "Draw by stalemate",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum GameCompletionState {
    AwaitingMove,
    GameOver(GameOverReason),
}

impl GameCompletionState {
    /// Work out whether the side to move in `position` has anything to play.
    pub fn of(position: &Position) -> GameCompletionState {
        if !position.legal_moves().is_empty() {
            return GameCompletionState::AwaitingMove;
        }
        let reason = if position.is_in_check() {
            // The side that just moved delivered mate.
            match position.side_to_move.opposite() {
                Color::White => GameOverReason::WhiteWinsByCheckmate,
                Color::Black => GameOverReason::BlackWinsByCheckmate,
            }
        } else {
            GameOverReason::DrawByStalemate
        };
        GameCompletionState::GameOver(reason)
    }

    pub fn is_over(self) -> bool {
        matches!(self, GameCompletionState::GameOver(_))
    }
}

/// What observers hear about.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum GameEvent {
    MoveApplied {
        mv: Move,
        fen: String,
        state: GameCompletionState,
    },
    GameOver(GameOverReason),
}

/// Receives game events synchronously, on whichever thread applied the move.
pub trait GameObserver: Send {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> GameObserver for F
where
    F: FnMut(&GameEvent) + Send,
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

impl GameObserver for Sender<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.send(event.clone());
    }
}

/// A serialisable view of the game for hosts and debugging.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct GameSnapshot {
    pub fen: String,
    /// `squares[y][x]`, rank 1 first.
    pub squares: Vec<Vec<Option<Piece>>>,
    pub side_to_move: Color,
    pub in_check: bool,
    pub state: GameCompletionState,
    pub legal_moves: Vec<String>,
    pub history: Vec<String>,
    pub white_player: String,
    pub black_player: String,
}

/// One game from start to finish: the current position, the moves that led
/// to it, both players, and whether it is over.
pub struct Game {
    position: Position,
    history: Vec<Move>,
    state: GameCompletionState,
    white: Box<dyn Player>,
    black: Box<dyn Player>,
    promotion_policy: PromotionPolicy,
    observers: Vec<Box<dyn GameObserver>>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new(Box::new(HumanPlayer), Box::new(HumanPlayer))
    }
}

impl Game {
    pub fn new(white: Box<dyn Player>, black: Box<dyn Player>) -> Self {
        Game::with_position(Position::new(), white, black)
    }

    /// Start from an arbitrary position. The position may already be
    /// checkmate or stalemate, in which case the game starts out over.
    pub fn with_position(position: Position, white: Box<dyn Player>, black: Box<dyn Player>) -> Self {
        let state = GameCompletionState::of(&position);
        if let GameCompletionState::GameOver(reason) = state {
            info!("game starts in a finished position: {reason}");
        }
        Game {
            position,
            history: Vec::new(),
            state,
            white,
            black,
            promotion_policy: PromotionPolicy::default(),
            observers: Vec::new(),
        }
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        let position = match &config.starting_fen {
            Some(fen) => Position::from_fen(fen)?,
            None => Position::new(),
        };
        let mut game = Game::with_position(position, config.white.build(), config.black.build());
        game.promotion_policy = config.promotion;
        info!(
            "new game: {} (white) vs {} (black), promotion {:?}",
            game.white.name(),
            game.black.name(),
            game.promotion_policy
        );
        Ok(game)
    }

    pub fn set_promotion_policy(&mut self, policy: PromotionPolicy) {
        self.promotion_policy = policy;
    }

    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    pub fn completion_state(&self) -> GameCompletionState {
        self.state
    }

    pub fn move_history(&self) -> &[Move] {
        &self.history
    }

    pub fn player(&self, color: Color) -> &dyn Player {
        match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.state.is_over() {
            return Vec::new();
        }
        self.position.legal_moves()
    }

    /// Squares the piece on `from` may move to. Each destination appears
    /// once even when several promotion choices lead there.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        let mut destinations: Vec<Square> = Vec::new();
        for mv in self.legal_moves() {
            if mv.start() == from && !destinations.contains(&mv.end()) {
                destinations.push(mv.end());
            }
        }
        destinations
    }

    /// The one way to change the game: propose moving the piece on `from` to
    /// `to`. A rejected proposal leaves the game untouched.
    pub fn propose_move(&mut self, from: Square, to: Square, promotion: Option<PieceType>) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        let mv = match self.position.validate(from, to, promotion) {
            Err(MoveError::PromotionChoiceRequired) if self.promotion_policy == PromotionPolicy::AutoQueen => {
                self.position.validate(from, to, Some(PieceType::Queen))?
            }
            result => result?,
        };
        self.commit(mv);
        Ok(())
    }

    pub fn propose_request(&mut self, request: MoveRequest) -> Result<(), GameError> {
        self.propose_move(request.from, request.to, request.promotion)
    }

    /// Propose a move written in UCI form, such as an engine's reply.
    pub fn propose_uci(&mut self, uci: &str) -> Result<(), GameError> {
        let request = MoveRequest::from_uci(uci)?;
        self.propose_request(request)
    }

    /// Apply an already-classified move, after checking that it still
    /// classifies the same way in the current position.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        let checked = self.position.validate(mv.start(), mv.end(), mv.kind().promotion())?;
        if checked.kind() != mv.kind() {
            return Err(GameError::MoveMismatch { expected: checked.kind(), found: mv.kind() });
        }
        self.commit(checked);
        Ok(())
    }

    /// Ask the player whose turn it is for a move. Returns `Ok(false)` when
    /// the player has nothing yet (a human, or an engine still thinking).
    pub fn play_turn(&mut self) -> Result<bool, GameError> {
        self.ensure_in_progress()?;
        let player = match self.position.side_to_move {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        let Some(request) = player.begin_turn(&self.position) else {
            return Ok(false);
        };
        let name = player.name().to_string();
        if let Err(err) = self.propose_request(request) {
            warn!("{name} proposed {request}, rejected: {err}");
            return Err(err);
        }
        Ok(true)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let squares = (0..8u8)
            .map(|y| (0..8u8).map(|x| self.position.board.get(Square::new(x, y))).collect())
            .collect();
        GameSnapshot {
            fen: self.position.to_fen(),
            squares,
            side_to_move: self.position.side_to_move,
            in_check: self.position.is_in_check(),
            state: self.state,
            legal_moves: self.legal_moves().iter().map(Move::to_uci).collect(),
            history: self.history.iter().map(Move::to_uci).collect(),
            white_player: self.white.name().to_string(),
            black_player: self.black.name().to_string(),
        }
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        match self.state {
            GameCompletionState::GameOver(reason) => Err(GameError::GameOver(reason)),
            GameCompletionState::AwaitingMove => Ok(()),
        }
    }

    fn commit(&mut self, mv: Move) {
        self.position.make_move_and_advance_turn(&mv);
        self.history.push(mv);
        self.state = GameCompletionState::of(&self.position);
        debug!("move {}: {mv}, now {}", self.history.len(), self.position);

        // The side now to move is the one that has just been moved against.
        match self.position.side_to_move {
            Color::White => self.white.opponent_did_move(&mv),
            Color::Black => self.black.opponent_did_move(&mv),
        }

        let applied = GameEvent::MoveApplied {
            mv,
            fen: self.position.to_fen(),
            state: self.state,
        };
        self.notify(&applied);
        if let GameCompletionState::GameOver(reason) = self.state {
            info!("game over after {} moves: {reason}", self.history.len());
            self.notify(&GameEvent::GameOver(reason));
        }
    }

    fn notify(&mut self, event: &GameEvent) {
        for observer in &mut self.observers {
            observer.on_event(event);
        }
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("position", &self.position.to_fen())
            .field("history", &self.history.len())
            .field("state", &self.state)
            .field("white", &self.white.name())
            .field("black", &self.black.name())
            .finish()
    }
}
