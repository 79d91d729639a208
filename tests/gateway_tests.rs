// Protocol tests for the prediction gateway, against a mock upstream.

use mockito::{Matcher, ServerGuard};
use serde_json::json;
use tennis_predictor::config::PredictorSettings;
use tennis_predictor::models::MatchupRequest;
use tennis_predictor::services::{GatewayError, PredictionGateway};

const TEST_API_KEY: &str = "test-api-key";
const TEST_PREDICT_PATH: &str = "/predict";

fn gateway_for(server: &ServerGuard) -> PredictionGateway {
    PredictionGateway::new(&PredictorSettings {
        base_url: server.url(),
        api_key: TEST_API_KEY.to_string(),
        predict_path: TEST_PREDICT_PATH.to_string(),
        connect_timeout_secs: 2,
        request_timeout_secs: 5,
    })
}

fn test_request() -> MatchupRequest {
    MatchupRequest {
        player1_id: 104745,
        player2_id: 126774,
        surface: "Hard".to_string(),
        tourney_level: "G".to_string(),
        best_of: 5,
        round: "F".to_string(),
    }
}

#[tokio::test]
async fn predict_returns_outcome_on_200() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", TEST_PREDICT_PATH)
        .match_header("x-api-key", TEST_API_KEY)
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "player1_id": 104745,
            "player2_id": 126774,
            "surface": "Hard",
            "tourney_level": "G",
            "best_of": 5,
            "round": "F",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "player1Name": "Novak Djokovic",
                "player2Name": "Jannik Sinner",
                "player1WinProbability": 0.65,
                "player2WinProbability": 0.35,
                "winnerName": "Novak Djokovic",
                "winnerId": 104745,
                "confidence": 0.8,
            })
            .to_string(),
        )
        .create_async()
        .await;

    let gateway = gateway_for(&server);
    let outcome = gateway
        .predict(&test_request())
        .await
        .expect("200 response should decode");

    assert_eq!(outcome.player1_name, "Novak Djokovic");
    assert_eq!(outcome.player2_name, "Jannik Sinner");
    assert_eq!(outcome.player1_win_probability, 0.65);
    assert_eq!(outcome.player2_win_probability, 0.35);
    assert_eq!(outcome.winner_name, "Novak Djokovic");
    assert_eq!(outcome.winner_id, 104745);
    assert_eq!(outcome.confidence, 0.8);

    mock.assert_async().await;
}

#[tokio::test]
async fn predict_maps_400_to_bad_request() {
    let mut server = mockito::Server::new_async().await;
    let error_body = r#"{"error":"Invalid input"}"#;
    let mock = server
        .mock("POST", TEST_PREDICT_PATH)
        .match_header("x-api-key", TEST_API_KEY)
        .with_status(400)
        .with_body(error_body)
        .create_async()
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.predict(&test_request()).await.unwrap_err();

    assert!(matches!(err, GatewayError::BadRequest(_)));
    assert_eq!(err.upstream_status(), Some(400));
    assert_eq!(err.surfaced_status(), 400);
    let message = err.to_string();
    assert!(message.contains("Invalid prediction request"));
    assert!(message.contains(error_body));

    mock.assert_async().await;
}

#[tokio::test]
async fn predict_maps_404_to_player_not_found() {
    let mut server = mockito::Server::new_async().await;
    let error_body = r#"{"error":"Player not found"}"#;
    let mock = server
        .mock("POST", TEST_PREDICT_PATH)
        .match_header("x-api-key", TEST_API_KEY)
        .with_status(404)
        .with_body(error_body)
        .create_async()
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.predict(&test_request()).await.unwrap_err();

    assert!(matches!(err, GatewayError::PlayerNotFound(_)));
    assert_eq!(err.surfaced_status(), 404);
    let message = err.to_string();
    assert!(message.contains("Player not found"));
    assert!(message.contains(error_body));

    mock.assert_async().await;
}

#[tokio::test]
async fn predict_maps_415_to_unsupported_media_type() {
    let mut server = mockito::Server::new_async().await;
    let error_body = "unsupported media type";
    let mock = server
        .mock("POST", TEST_PREDICT_PATH)
        .with_status(415)
        .with_body(error_body)
        .create_async()
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.predict(&test_request()).await.unwrap_err();

    assert!(matches!(err, GatewayError::UnsupportedMediaType(_)));
    assert_eq!(err.surfaced_status(), 415);
    let message = err.to_string();
    assert!(message.contains("Invalid content type"));
    assert!(message.contains(error_body));

    mock.assert_async().await;
}

#[tokio::test]
async fn predict_maps_503_to_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let error_body = "maintenance window";
    let mock = server
        .mock("POST", TEST_PREDICT_PATH)
        .with_status(503)
        .with_body(error_body)
        .create_async()
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.predict(&test_request()).await.unwrap_err();

    assert!(matches!(err, GatewayError::Unavailable(_)));
    assert_eq!(err.surfaced_status(), 503);
    let message = err.to_string();
    assert!(message.contains("temporarily unavailable"));
    assert!(message.contains(error_body));

    mock.assert_async().await;
}

#[tokio::test]
async fn predict_maps_other_non_2xx_to_internal_upstream() {
    for status in [401, 418, 500, 502] {
        let mut server = mockito::Server::new_async().await;
        let error_body = "upstream exploded";
        server
            .mock("POST", TEST_PREDICT_PATH)
            .with_status(status)
            .with_body(error_body)
            .create_async()
            .await;

        let gateway = gateway_for(&server);
        let err = gateway.predict(&test_request()).await.unwrap_err();

        assert!(
            matches!(err, GatewayError::InternalUpstream { .. }),
            "status {} should map to InternalUpstream",
            status
        );
        assert_eq!(err.upstream_status(), Some(status as u16));
        assert_eq!(err.surfaced_status(), 500);
        let message = err.to_string();
        assert!(message.contains("Prediction service internal server error"));
        assert!(message.contains(error_body));
    }
}

#[tokio::test]
async fn predict_maps_undecodable_200_to_internal_upstream() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", TEST_PREDICT_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json at all")
        .create_async()
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.predict(&test_request()).await.unwrap_err();

    assert!(matches!(err, GatewayError::InternalUpstream { .. }));
    assert_eq!(err.upstream_status(), None);
    assert!(err
        .to_string()
        .contains("Prediction service internal server error"));
}

#[tokio::test]
async fn predict_maps_transport_failure_to_internal_upstream() {
    // Nothing listens on this port; the connection is refused.
    let gateway = PredictionGateway::new(&PredictorSettings {
        base_url: "http://127.0.0.1:1".to_string(),
        api_key: TEST_API_KEY.to_string(),
        predict_path: TEST_PREDICT_PATH.to_string(),
        connect_timeout_secs: 2,
        request_timeout_secs: 5,
    });

    let err = gateway.predict(&test_request()).await.unwrap_err();

    assert!(matches!(err, GatewayError::InternalUpstream { .. }));
    assert_eq!(err.upstream_status(), None);
    assert!(err
        .to_string()
        .contains("Prediction service internal server error"));
}
