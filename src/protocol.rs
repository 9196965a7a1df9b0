//! JSON move request / response
//!
//! ```text
//! request:  {"board": [[0, 1, 2, ...], ...], "mode": "hard"}
//! response: {"move": [row, col]}  or  {"move": null}
//! ```
//!
//! Cell codes: 0 empty, 1 opponent (the human), 2 engine. The board is
//! validated here, before the engine sees it.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos};
use crate::config::Difficulty;
use crate::engine::Engine;
use crate::error::ProtocolError;

fn d_mode() -> String {
    Difficulty::default().label().into()
}

/// Incoming move request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub board: Vec<Vec<u8>>,
    #[serde(default = "d_mode")]
    pub mode: String,
}

/// Outgoing move response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    #[serde(rename = "move")]
    pub mv: Option<[usize; 2]>,
}

impl From<Option<Pos>> for MoveResponse {
    fn from(pos: Option<Pos>) -> Self {
        Self {
            mv: pos.map(|p| [usize::from(p.row), usize::from(p.col)]),
        }
    }
}

/// Validate a parsed request and run it through the engine.
pub fn respond(engine: &mut Engine, request: &MoveRequest) -> Result<MoveResponse, ProtocolError> {
    let mode: Difficulty = request.mode.parse()?;
    let board = Board::from_codes(&request.board)?;
    engine.check_board(&board)?;
    Ok(engine.select_move(&board, mode).into())
}

/// Serve one JSON request, returning the JSON response.
///
/// # Example
/// ```
/// use caro::{Engine, EngineConfig};
/// use caro::protocol::handle_request;
///
/// let mut engine = Engine::with_seed(EngineConfig::default(), 1);
/// let board = vec![vec![0u8; 12]; 12];
/// let request = serde_json::json!({ "board": board, "mode": "easy" }).to_string();
///
/// assert_eq!(handle_request(&mut engine, &request).unwrap(), r#"{"move":[6,6]}"#);
/// ```
pub fn handle_request(engine: &mut Engine, json: &str) -> Result<String, ProtocolError> {
    let request: MoveRequest = serde_json::from_str(json)?;
    let response = respond(engine, &request)?;
    Ok(serde_json::to_string(&response)?)
}
