use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::game::{Game, GameSnapshot};
use crate::piece::PieceType;
use crate::square::Square;

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    snapshot: Option<GameSnapshot>,
    error: Option<String>,
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn string_to_piece_type(s: &str) -> Option<PieceType> {
    match s {
        "Queen" | "q" => Some(PieceType::Queen),
        "Rook" | "r" => Some(PieceType::Rook),
        "Bishop" | "b" => Some(PieceType::Bishop),
        "Knight" | "n" => Some(PieceType::Knight),
        _ => None,
    }
}

fn square(x: u8, y: u8) -> Option<Square> {
    Square::try_new(i32::from(x), i32::from(y))
}

#[wasm_bindgen]
pub struct WasmGame {
    game: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Human vs human from the standard position.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { game: Game::default() }
    }

    /// Build from a JSON `GameConfig`. Returns an error string on bad input.
    pub fn from_config(json: &str) -> Result<WasmGame, JsValue> {
        let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let game = Game::from_config(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmGame { game })
    }

    pub fn snapshot(&self) -> JsValue {
        to_js(&self.game.snapshot())
    }

    pub fn legal_destinations(&self, x: u8, y: u8) -> JsValue {
        let destinations: Vec<String> = match square(x, y) {
            Some(from) => self.game.legal_destinations(from).iter().map(Square::to_string).collect(),
            None => Vec::new(),
        };
        to_js(&destinations)
    }

    pub fn propose_move(&mut self, from_x: u8, from_y: u8, to_x: u8, to_y: u8, promotion: Option<String>) -> JsValue {
        let (Some(from), Some(to)) = (square(from_x, from_y), square(to_x, to_y)) else {
            return to_js(&MoveResult { snapshot: None, error: Some("Square out of range".to_string()) });
        };
        let promotion = promotion.as_deref().and_then(string_to_piece_type);
        let result = match self.game.propose_move(from, to, promotion) {
            Ok(()) => MoveResult { snapshot: Some(self.game.snapshot()), error: None },
            Err(err) => MoveResult { snapshot: None, error: Some(err.to_string()) },
        };
        to_js(&result)
    }

    /// Let a non-human side move. The snapshot is returned either way.
    pub fn play_turn(&mut self) -> JsValue {
        let error = self.game.play_turn().err().map(|e| e.to_string());
        to_js(&MoveResult { snapshot: Some(self.game.snapshot()), error })
    }

    pub fn version() -> String {
        crate::BUILD_TIMESTAMP.to_string()
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
