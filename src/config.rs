use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::player::{HumanPlayer, Player, RandomMover};

/// What to do when a pawn move reaches the last rank without a chosen piece.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromotionPolicy {
    /// Reject with `PromotionChoiceRequired`; the host asks the user and resubmits.
    #[default]
    Prompt,
    /// Promote to a queen.
    AutoQueen,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerKind {
    #[default]
    Human,
    RandomMover {
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl PlayerKind {
    pub fn build(&self) -> Box<dyn Player> {
        match self {
            PlayerKind::Human => Box::new(HumanPlayer),
            PlayerKind::RandomMover { seed: Some(seed) } => Box::new(RandomMover::seeded(*seed)),
            PlayerKind::RandomMover { seed: None } => Box::new(RandomMover::new()),
        }
    }
}

/// How to set up a game. Every field has a default, so `{}` is a valid
/// config: human vs human from the standard position, prompting on promotion.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct GameConfig {
    pub white: PlayerKind,
    pub black: PlayerKind,
    pub promotion: PromotionPolicy,
    /// FEN of the starting position; the standard one when absent.
    pub starting_fen: Option<String>,
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<GameConfig, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.promotion, PromotionPolicy::Prompt);
        assert!(config.white.build().is_human());
    }

    #[test]
    fn parses_players_and_policy() {
        let config = GameConfig::from_json(
            r#"{
                "white": { "kind": "human" },
                "black": { "kind": "random_mover", "seed": 3 },
                "promotion": "auto_queen",
                "starting_fen": "8/8/8/8/8/8/8/K6k w - - 0 1"
            }"#,
        )
        .unwrap();
        assert_eq!(config.black, PlayerKind::RandomMover { seed: Some(3) });
        assert_eq!(config.promotion, PromotionPolicy::AutoQueen);
        assert!(!config.black.build().is_human());
        assert!(config.starting_fen.is_some());
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "promotion": "sometimes" }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
