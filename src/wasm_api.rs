use crate::{Exposed, Hand, TileError, scoring, search};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Result of scoring a hand
#[derive(Serialize, Deserialize)]
pub struct ScoreResult {
    pub success: bool,
    pub winning: bool,
    /// Matched pattern names
    pub patterns: Vec<String>,
    /// Situational bonus names
    pub bonuses: Vec<String>,
    pub total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of checking a concealed hand
#[derive(Serialize, Deserialize)]
pub struct CheckResult {
    pub success: bool,
    pub winning: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<search::WinShape>,
    /// Tiles that would complete the hand if it is one short
    pub waiting: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Score a hand given in the string protocol
///
/// # Arguments
/// * `exposed` - Groups separated by ';', tiles by ',' (e.g. "e,e,e;two,three,four")
/// * `concealed` - Tiles separated by ',' (e.g. "one,one,five,six,seven")
/// * `self_drawn` - Whether the winning tile was the player's own draw
/// * `remaining` - Tiles left in the draw pile
///
/// # Returns
/// JSON string with ScoreResult
#[wasm_bindgen]
pub fn score_hand(exposed: &str, concealed: &str, self_drawn: bool, remaining: usize) -> String {
    let result = match scoring::score_encoded(exposed, concealed, self_drawn, remaining) {
        Ok(record) => ScoreResult {
            success: true,
            winning: record.is_winning(),
            patterns: record.names().iter().map(|n| n.to_string()).collect(),
            bonuses: record.bonuses.iter().map(json_name).collect(),
            total: record.total,
            error: None,
        },
        Err(e) => ScoreResult {
            success: false,
            winning: false,
            patterns: Vec::new(),
            bonuses: Vec::new(),
            total: 0,
            error: Some(e.to_string()),
        },
    };
    to_json(&result)
}

/// Check whether concealed tiles complete a hand beside the exposed melds
///
/// # Arguments
/// * `exposed` - Groups separated by ';', tiles by ','
/// * `concealed` - Tiles separated by ','
///
/// # Returns
/// JSON string with CheckResult
#[wasm_bindgen]
pub fn check_hand(exposed: &str, concealed: &str) -> String {
    let result = match check_internal(exposed, concealed) {
        Ok(result) => result,
        Err(e) => CheckResult {
            success: false,
            winning: false,
            shape: None,
            waiting: Vec::new(),
            error: Some(e.to_string()),
        },
    };
    to_json(&result)
}

fn check_internal(exposed: &str, concealed: &str) -> Result<CheckResult, TileError> {
    let exposed = Exposed::from_string(exposed)?;
    let hand = Hand::from_string(concealed)?;
    let shape = search::winning_shape(&hand, exposed.meld_count());
    let waiting = search::winning_tiles(&hand, &exposed)
        .iter()
        .map(|t| t.to_string())
        .collect();
    Ok(CheckResult {
        success: true,
        winning: shape.is_some(),
        shape,
        waiting,
        error: None,
    })
}

/// Tile tokens that would complete the hand, as a JS array of strings
#[wasm_bindgen]
pub fn waiting_tiles(exposed: &str, concealed: &str) -> Result<js_sys::Array, JsValue> {
    let exposed = Exposed::from_string(exposed).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let hand = Hand::from_string(concealed).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(search::winning_tiles(&hand, &exposed)
        .iter()
        .map(|t| JsValue::from_str(&t.to_string()))
        .collect())
}

/// Count exposed melds in the string protocol
#[wasm_bindgen]
pub fn exposed_meld_count(exposed: &str) -> Result<usize, JsValue> {
    Exposed::from_string(exposed)
        .map(|e| e.meld_count())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the git commit hash that this WASM module was built from
///
/// Returns the first 8 characters of the commit hash, or "unknown" if not available
#[wasm_bindgen]
pub fn get_build_commit() -> String {
    env!("BUILD_COMMIT").to_string()
}

/// Serialized snake_case name of a unit enum variant
fn json_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| format!(r#"{{"success":false,"error":"Serialization error: {}"}}"#, e))
}
