//! WebAssembly bindings for the settlers rules engine.
//!
//! This module exposes the game engine to JavaScript through wasm-bindgen. Everything
//! crosses the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::actions::Move;
use crate::board::Resource;
use crate::building::StructureKind;
use crate::config::GameConfig;
use crate::game::GameState;
use crate::random::RngRandomness;
use rand::rngs::StdRng;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{context}: {err}"))
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
    rng: RngRandomness<StdRng>,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game from a JSON `GameConfig`
    #[wasm_bindgen(js_name = newGame)]
    pub fn new_game(config_json: &str) -> Result<WasmGame, JsValue> {
        let config: GameConfig = serde_json::from_str(config_json).map_err(|e| js_error("Invalid config", e))?;
        let seed = config.seed;
        let state = GameState::new(config).map_err(|e| js_error("Invalid config", e))?;

        Ok(WasmGame {
            state,
            rng: RngRandomness::seeded(seed),
        })
    }

    /// Restore a game from a snapshot produced by `getState`
    pub fn restore(snapshot: &str) -> Result<WasmGame, JsValue> {
        let state = GameState::from_snapshot(snapshot).map_err(|e| js_error("Invalid snapshot", e))?;
        let seed = state.progress_seed();

        Ok(WasmGame {
            state,
            rng: RngRandomness::seeded(seed),
        })
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<String, JsValue> {
        self.state.to_snapshot().map_err(|e| js_error("Snapshot failed", e))
    }

    /// Apply a move from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, player: u8, move_json: &str) -> Result<String, JsValue> {
        let mv: Move = serde_json::from_str(move_json).map_err(|e| js_error("Invalid move JSON", e))?;

        let events = self
            .state
            .apply_in_place(player, mv, &mut self.rng)
            .map_err(|e| js_error("Move failed", e))?;
        serde_json::to_string(&events).map_err(|e| js_error("Encoding events failed", e))
    }

    /// Cards of `resource` (by name, e.g. "Ore") the player gives per bank card
    #[wasm_bindgen(js_name = tradingRatio)]
    pub fn trading_ratio(&self, player: u8, resource: &str) -> Result<u32, JsValue> {
        let resource: Resource = serde_json::from_value(serde_json::Value::String(resource.to_string()))
            .map_err(|e| js_error("Unknown resource", e))?;
        Ok(self.state.trading_ratio(player, resource))
    }

    /// Legal sites for `kind` ("Settlement", "City" or "Road") as a JSON array
    #[wasm_bindgen(js_name = legalBuildLocations)]
    pub fn legal_build_locations(&self, player: u8, kind: &str) -> Result<String, JsValue> {
        let kind: StructureKind = serde_json::from_value(serde_json::Value::String(kind.to_string()))
            .map_err(|e| js_error("Unknown structure kind", e))?;
        let sites = self.state.legal_build_locations(player, kind);
        serde_json::to_string(&sites).map_err(|e| js_error("Encoding sites failed", e))
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> Option<u8> {
        self.state.winner()
    }
}
