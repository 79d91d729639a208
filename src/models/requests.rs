use crate::models::responses::PredictionOutcome;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A hypothetical matchup submitted for prediction
///
/// Immutable once validated; the gateway serializes it to the upstream
/// wire shape, it is never persisted directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_distinct_players))]
pub struct MatchupRequest {
    #[validate(range(min = 1, message = "Player IDs must be positive"))]
    #[serde(alias = "player1_id", rename = "player1Id")]
    pub player1_id: i64,
    #[validate(range(min = 1, message = "Player IDs must be positive"))]
    #[serde(alias = "player2_id", rename = "player2Id")]
    pub player2_id: i64,
    #[validate(length(min = 1, message = "Surface is required"))]
    pub surface: String,
    #[validate(length(min = 1, message = "Tournament level is required"))]
    #[serde(alias = "tourney_level", rename = "tourneyLevel")]
    pub tourney_level: String,
    #[validate(range(min = 1, message = "Best of must be positive"))]
    #[serde(alias = "best_of", rename = "bestOf")]
    pub best_of: i32,
    #[validate(length(min = 1, message = "Round is required"))]
    pub round: String,
}

fn validate_distinct_players(request: &MatchupRequest) -> Result<(), ValidationError> {
    if request.player1_id == request.player2_id {
        return Err(ValidationError::new("distinct_players")
            .with_message("Player IDs must differ".into()));
    }
    Ok(())
}

/// User-editable projection of a prediction, shaped for persistence
///
/// Denormalized merge of the matchup and its outcome. The username is
/// stamped by the save guard from the authenticated actor, never taken
/// from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SaveRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[validate(range(min = 1, message = "Player 1 ID is required"))]
    #[serde(alias = "player1_id", rename = "player1Id")]
    pub player1_id: i64,
    #[validate(length(min = 1, message = "Player 1 Name is required"))]
    #[serde(alias = "player1_name", rename = "player1Name")]
    pub player1_name: String,
    #[validate(range(min = 1, message = "Player 2 ID is required"))]
    #[serde(alias = "player2_id", rename = "player2Id")]
    pub player2_id: i64,
    #[validate(length(min = 1, message = "Player 2 Name is required"))]
    #[serde(alias = "player2_name", rename = "player2Name")]
    pub player2_name: String,
    #[validate(range(min = 0.0, max = 1.0, message = "Player 1 probability must be in [0, 1]"))]
    #[serde(alias = "player1_win_probability", rename = "player1WinProbability")]
    pub player1_win_probability: f32,
    #[validate(range(min = 0.0, max = 1.0, message = "Player 2 probability must be in [0, 1]"))]
    #[serde(alias = "player2_win_probability", rename = "player2WinProbability")]
    pub player2_win_probability: f32,
    #[validate(length(min = 1, message = "Winner Name is required"))]
    #[serde(alias = "winner_name", rename = "winnerName")]
    pub winner_name: String,
    #[validate(range(min = 0.0, max = 1.0, message = "Confidence must be in [0, 1]"))]
    pub confidence: f32,
    #[validate(length(min = 1, message = "Tournament level is required"))]
    #[serde(alias = "tourney_level", rename = "tourneyLevel")]
    pub tourney_level: String,
    #[validate(length(min = 1, message = "Surface is required"))]
    pub surface: String,
    #[validate(range(min = 1, message = "Best of must be positive"))]
    #[serde(alias = "best_of", rename = "bestOf")]
    pub best_of: i32,
    #[validate(length(min = 1, message = "Round is required"))]
    pub round: String,
}

impl SaveRequest {
    /// Prefill a save projection from a submitted matchup and its outcome.
    ///
    /// Field-for-field copy; the username is left unset until the save
    /// guard stamps the authenticated actor.
    pub fn from_parts(request: &MatchupRequest, outcome: &PredictionOutcome) -> Self {
        Self {
            username: None,
            player1_id: request.player1_id,
            player1_name: outcome.player1_name.clone(),
            player2_id: request.player2_id,
            player2_name: outcome.player2_name.clone(),
            player1_win_probability: outcome.player1_win_probability,
            player2_win_probability: outcome.player2_win_probability,
            winner_name: outcome.winner_name.clone(),
            confidence: outcome.confidence,
            tourney_level: request.tourney_level.clone(),
            surface: request.surface.clone(),
            best_of: request.best_of,
            round: request.round.clone(),
        }
    }

    /// Rebuild the original matchup from this projection, for re-display
    /// after the save step.
    pub fn reconstruct_request(&self) -> MatchupRequest {
        MatchupRequest {
            player1_id: self.player1_id,
            player2_id: self.player2_id,
            surface: self.surface.clone(),
            tourney_level: self.tourney_level.clone(),
            best_of: self.best_of,
            round: self.round.clone(),
        }
    }

    /// Rebuild the prediction outcome from this projection.
    ///
    /// The projection does not carry the winner id, so it is re-derived as
    /// the id of the player with the higher carried probability; every
    /// other field is copied verbatim.
    pub fn reconstruct_outcome(&self) -> PredictionOutcome {
        let winner_id = if self.player1_win_probability > self.player2_win_probability {
            self.player1_id
        } else {
            self.player2_id
        };
        PredictionOutcome {
            player1_name: self.player1_name.clone(),
            player2_name: self.player2_name.clone(),
            player1_win_probability: self.player1_win_probability,
            player2_win_probability: self.player2_win_probability,
            winner_name: self.winner_name.clone(),
            winner_id,
            confidence: self.confidence,
        }
    }
}
