use crate::models::domain::PlayerDto;
use crate::models::requests::{MatchupRequest, SaveRequest};
use serde::{Deserialize, Serialize};

/// Successful prediction decoded from the upstream API
///
/// Created only on a 200 response and never mutated afterwards. The two
/// probabilities summing to ~1.0 is an upstream guarantee, not re-checked
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    #[serde(alias = "player1_name", rename = "player1Name")]
    pub player1_name: String,
    #[serde(alias = "player2_name", rename = "player2Name")]
    pub player2_name: String,
    #[serde(alias = "player1_win_probability", rename = "player1WinProbability")]
    pub player1_win_probability: f32,
    #[serde(alias = "player2_win_probability", rename = "player2WinProbability")]
    pub player2_win_probability: f32,
    #[serde(alias = "winner_name", rename = "winnerName")]
    pub winner_name: String,
    #[serde(alias = "winner_id", rename = "winnerId")]
    pub winner_id: i64,
    pub confidence: f32,
}

/// Body of the submission step: an empty form, or the echoed input and
/// error message from a failed attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionFormView {
    #[serde(rename = "predictionRequest", skip_serializing_if = "Option::is_none")]
    pub prediction_request: Option<MatchupRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of the result step: the computed prediction, the prefilled save
/// projection, and any save-step markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResultView {
    #[serde(rename = "predictionRequest")]
    pub prediction_request: MatchupRequest,
    #[serde(rename = "predictionResponse")]
    pub prediction_response: PredictionOutcome,
    #[serde(rename = "predictionSaveRequest")]
    pub prediction_save_request: SaveRequest,
    #[serde(rename = "saveSuccess", skip_serializing_if = "Option::is_none")]
    pub save_success: Option<String>,
    #[serde(rename = "saveError", skip_serializing_if = "Option::is_none")]
    pub save_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Players listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayersResponse {
    pub players: Vec<PlayerDto>,
    pub count: usize,
    #[serde(rename = "fetchedAt")]
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
