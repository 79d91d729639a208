use crate::config::PredictorSettings;
use crate::models::{MatchupRequest, PredictionOutcome};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Typed outcomes of a failed gateway call
///
/// Closed taxonomy translating the upstream protocol into the statuses and
/// messages this service surfaces. Callers branch on the kind and never
/// reinterpret raw upstream bodies themselves. One error is produced per
/// failed call; nothing is retried here.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("Invalid prediction request: {0}")]
    BadRequest(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Invalid content type: {0}")]
    UnsupportedMediaType(String),

    #[error("Prediction service temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("Prediction service internal server error: {detail}")]
    InternalUpstream {
        detail: String,
        upstream_status: Option<u16>,
    },
}

impl GatewayError {
    /// Upstream HTTP status that produced this error, when one was observed.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            GatewayError::BadRequest(_) => Some(400),
            GatewayError::PlayerNotFound(_) => Some(404),
            GatewayError::UnsupportedMediaType(_) => Some(415),
            GatewayError::Unavailable(_) => Some(503),
            GatewayError::InternalUpstream {
                upstream_status, ..
            } => *upstream_status,
        }
    }

    /// Status this service surfaces to its own callers.
    ///
    /// Player-not-found maps to 404, the other known kinds mirror the
    /// upstream code, everything else falls back to 500.
    pub fn surfaced_status(&self) -> u16 {
        match self {
            GatewayError::BadRequest(_) => 400,
            GatewayError::PlayerNotFound(_) => 404,
            GatewayError::UnsupportedMediaType(_) => 415,
            GatewayError::Unavailable(_) => 503,
            GatewayError::InternalUpstream { .. } => 500,
        }
    }

    /// Expected kinds carry a message safe to show the submitter verbatim.
    /// Internal upstream failures get a generic message instead so upstream
    /// internals never leak.
    pub fn is_expected(&self) -> bool {
        !matches!(self, GatewayError::InternalUpstream { .. })
    }
}

/// Client for the external prediction API
///
/// Owns the single outbound POST per matchup and the translation of its
/// outcome into the [`GatewayError`] taxonomy. Holds no per-call state and
/// never retries; retry policy, if any, belongs to the caller.
pub struct PredictionGateway {
    base_url: String,
    predict_path: String,
    api_key: String,
    client: Client,
}

impl PredictionGateway {
    /// Create a new gateway from validated predictor settings.
    ///
    /// Settings are checked at startup (`Settings::validate`); by the time
    /// this runs the base URL, predict path, and API key are known non-empty.
    pub fn new(settings: &PredictorSettings) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: settings.base_url.clone(),
            predict_path: settings.predict_path.clone(),
            api_key: settings.api_key.clone(),
            client,
        }
    }

    /// Request a win-probability prediction for the given matchup
    ///
    /// Issues one POST to `base_url + predict_path` and blocks the calling
    /// flow until a response or transport failure is observed. Every
    /// non-success outcome becomes exactly one taxonomy error.
    pub async fn predict(
        &self,
        request: &MatchupRequest,
    ) -> Result<PredictionOutcome, GatewayError> {
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.predict_path
        );

        // Fixed upstream wire shape, snake_case keys.
        let body = serde_json::json!({
            "player1_id": request.player1_id,
            "player2_id": request.player2_id,
            "surface": request.surface,
            "tourney_level": request.tourney_level,
            "best_of": request.best_of,
            "round": request.round,
        });

        tracing::debug!("Sending prediction request to {} with body: {}", url, body);

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Transport failure calling prediction API: {}", e);
                GatewayError::InternalUpstream {
                    detail: e.to_string(),
                    upstream_status: None,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Prediction API error: {} - {}", status, body);
            return Err(match status.as_u16() {
                400 => GatewayError::BadRequest(body),
                404 => GatewayError::PlayerNotFound(body),
                415 => GatewayError::UnsupportedMediaType(body),
                503 => GatewayError::Unavailable(body),
                code => GatewayError::InternalUpstream {
                    detail: body,
                    upstream_status: Some(code),
                },
            });
        }

        let outcome: PredictionOutcome = response.json().await.map_err(|e| {
            tracing::error!("Failed to decode prediction response: {}", e);
            GatewayError::InternalUpstream {
                detail: e.to_string(),
                upstream_status: None,
            }
        })?;

        tracing::info!(
            "Prediction response: winner {} ({}) with confidence {}",
            outcome.winner_name,
            outcome.winner_id,
            outcome.confidence
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PredictorSettings;

    fn test_settings() -> PredictorSettings {
        PredictorSettings {
            base_url: "http://localhost:8000".to_string(),
            api_key: "test_key".to_string(),
            predict_path: "/predict".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
        }
    }

    #[test]
    fn test_gateway_creation() {
        let gateway = PredictionGateway::new(&test_settings());
        assert_eq!(gateway.base_url, "http://localhost:8000");
        assert_eq!(gateway.api_key, "test_key");
        assert_eq!(gateway.predict_path, "/predict");
    }

    #[test]
    fn test_surfaced_status_mirrors_known_kinds() {
        assert_eq!(GatewayError::BadRequest("x".into()).surfaced_status(), 400);
        assert_eq!(
            GatewayError::PlayerNotFound("x".into()).surfaced_status(),
            404
        );
        assert_eq!(
            GatewayError::UnsupportedMediaType("x".into()).surfaced_status(),
            415
        );
        assert_eq!(GatewayError::Unavailable("x".into()).surfaced_status(), 503);
        assert_eq!(
            GatewayError::InternalUpstream {
                detail: "x".into(),
                upstream_status: Some(502),
            }
            .surfaced_status(),
            500
        );
    }

    #[test]
    fn test_upstream_status_preserved() {
        let err = GatewayError::InternalUpstream {
            detail: "bad gateway".into(),
            upstream_status: Some(502),
        };
        assert_eq!(err.upstream_status(), Some(502));

        let transport = GatewayError::InternalUpstream {
            detail: "connection refused".into(),
            upstream_status: None,
        };
        assert_eq!(transport.upstream_status(), None);
    }

    #[test]
    fn test_expected_kinds() {
        assert!(GatewayError::BadRequest("x".into()).is_expected());
        assert!(GatewayError::PlayerNotFound("x".into()).is_expected());
        assert!(GatewayError::UnsupportedMediaType("x".into()).is_expected());
        assert!(GatewayError::Unavailable("x".into()).is_expected());
        assert!(!GatewayError::InternalUpstream {
            detail: "x".into(),
            upstream_status: None,
        }
        .is_expected());
    }

    #[test]
    fn test_message_templates_preserve_body() {
        let body = r#"{"error":"Player not found"}"#;
        let err = GatewayError::PlayerNotFound(body.to_string());
        let message = err.to_string();
        assert!(message.contains("Player not found"));
        assert!(message.contains(body));
    }
}
