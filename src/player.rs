use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use log::warn;

use crate::moves::{Move, MoveRequest};
use crate::position::Position;

#[cfg(not(target_arch = "wasm32"))]
use rand::{rngs::StdRng, Rng, SeedableRng};

/// One side of a game. The game owns its players and hands them the current
/// position when it is their turn; a player never holds on to the game.
pub trait Player: Send {
    fn name(&self) -> &str;

    fn is_human(&self) -> bool;

    /// Called when it is this player's turn. Return a proposal now, or `None`
    /// if the move will arrive later (a human clicking, an engine thinking).
    fn begin_turn(&mut self, position: &Position) -> Option<MoveRequest>;

    /// Called after the opponent's move has been applied.
    fn opponent_did_move(&mut self, _mv: &Move) {}
}

/// Moves come from the host UI through `Game::propose_move`.
#[derive(Debug, Default)]
pub struct HumanPlayer;

impl Player for HumanPlayer {
    fn name(&self) -> &str {
        "Human"
    }

    fn is_human(&self) -> bool {
        true
    }

    fn begin_turn(&mut self, _position: &Position) -> Option<MoveRequest> {
        None
    }
}

/// Plays a uniformly random legal move.
pub struct RandomMover {
    #[cfg(not(target_arch = "wasm32"))]
    rng: StdRng,
}

impl Default for RandomMover {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomMover {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        RandomMover { rng: StdRng::from_entropy() }
    }

    /// Reproducible sequence of choices for a given seed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn seeded(seed: u64) -> Self {
        RandomMover { rng: StdRng::seed_from_u64(seed) }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        RandomMover {}
    }

    /// The browser has no seedable source here; the seed is ignored.
    #[cfg(target_arch = "wasm32")]
    pub fn seeded(_seed: u64) -> Self {
        RandomMover {}
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn random_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    #[cfg(target_arch = "wasm32")]
    fn random_index(&mut self, len: usize) -> usize {
        let index = (js_sys::Math::random() * len as f64) as usize;
        index.min(len - 1)
    }
}

impl Player for RandomMover {
    fn name(&self) -> &str {
        "Random Mover"
    }

    fn is_human(&self) -> bool {
        false
    }

    fn begin_turn(&mut self, position: &Position) -> Option<MoveRequest> {
        let moves = position.legal_moves();
        if moves.is_empty() {
            return None;
        }
        let index = self.random_index(moves.len());
        Some(moves[index].request())
    }
}

/// The host's end of an engine connection: commands the engine should
/// receive, and a place to push the lines it prints.
pub struct EngineLink {
    pub commands: Receiver<String>,
    pub replies: Sender<String>,
}

/// An out-of-process engine, seen through a pair of channels. The host runs
/// the engine and shuttles text; this player turns opponent moves into UCI
/// strings and engine output back into proposals. Proposals are validated by
/// the game exactly like a human's.
pub struct EnginePlayer {
    name: String,
    to_engine: Sender<String>,
    from_engine: Receiver<String>,
    started: bool,
}

impl EnginePlayer {
    pub fn new(name: impl Into<String>, to_engine: Sender<String>, from_engine: Receiver<String>) -> Self {
        EnginePlayer {
            name: name.into(),
            to_engine,
            from_engine,
            started: false,
        }
    }

    /// Build a player together with the host-side ends of its channels.
    pub fn connect(name: impl Into<String>) -> (EnginePlayer, EngineLink) {
        let (command_tx, command_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        let player = EnginePlayer::new(name, command_tx, reply_rx);
        (player, EngineLink { commands: command_rx, replies: reply_tx })
    }

    fn send(&self, command: String) {
        if self.to_engine.send(command).is_err() {
            warn!("{}: engine connection closed", self.name);
        }
    }
}

impl Player for EnginePlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_human(&self) -> bool {
        false
    }

    fn begin_turn(&mut self, _position: &Position) -> Option<MoveRequest> {
        if !self.started {
            // Engine plays the first move of the game.
            self.started = true;
            self.send("go".to_string());
        }
        loop {
            match self.from_engine.try_recv() {
                Ok(line) => match MoveRequest::from_uci(&line) {
                    Ok(request) => return Some(request),
                    Err(err) => {
                        if !line.trim().is_empty() {
                            warn!("{}: ignoring engine output {line:?}: {err}", self.name);
                        }
                    }
                },
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    warn!("{}: engine connection closed", self.name);
                    return None;
                }
            }
        }
    }

    fn opponent_did_move(&mut self, mv: &Move) {
        self.started = true;
        self.send(mv.to_uci());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_waits_for_input() {
        let mut human = HumanPlayer;
        assert!(human.is_human());
        assert_eq!(human.begin_turn(&Position::new()), None);
    }

    #[test]
    fn random_mover_picks_a_legal_move() {
        let pos = Position::new();
        let mut mover = RandomMover::seeded(7);
        let request = mover.begin_turn(&pos).expect("start position has moves");
        let legal: Vec<MoveRequest> = pos.legal_moves().iter().map(|m| m.request()).collect();
        assert!(legal.contains(&request));
    }

    #[test]
    fn seeded_movers_agree() {
        let pos = Position::new();
        let a = RandomMover::seeded(42).begin_turn(&pos);
        let b = RandomMover::seeded(42).begin_turn(&pos);
        assert_eq!(a, b);
    }

    #[test]
    fn engine_player_skips_noise_and_reports_moves() {
        let (mut engine, link) = EnginePlayer::connect("Test Engine");
        let pos = Position::new();
        assert_eq!(engine.begin_turn(&pos), None);
        assert_eq!(link.commands.try_recv().as_deref(), Ok("go"));

        link.replies.send("thinking...".to_string()).unwrap();
        link.replies.send("e2e4\n".to_string()).unwrap();
        let request = engine.begin_turn(&pos).expect("engine replied");
        assert_eq!(request.to_uci(), "e2e4");
    }

    #[test]
    fn engine_player_forwards_opponent_moves() {
        let (mut engine, link) = EnginePlayer::connect("Test Engine");
        let pos = Position::new();
        let mv = pos.validate("d2".parse().unwrap(), "d4".parse().unwrap(), None).unwrap();
        engine.opponent_did_move(&mv);
        assert_eq!(link.commands.try_recv().as_deref(), Ok("d2d4"));
        // Having heard a move, it does not ask to move first.
        assert_eq!(engine.begin_turn(&pos), None);
        assert!(link.commands.try_recv().is_err());
    }
}
