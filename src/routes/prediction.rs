use crate::models::{
    HealthResponse, Identity, MatchupRequest, PredictionFormView, PredictionResultView,
    SaveRequest,
};
use crate::services::{
    FlashPayload, FlashStore, PlayerCache, PostgresClient, PredictionGateway, SaveError,
    SaveGuard,
};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<PredictionGateway>,
    pub flash: Arc<FlashStore>,
    pub cache: Arc<PlayerCache<PostgresClient>>,
    pub save_guard: Arc<SaveGuard<PostgresClient>>,
    pub postgres: Arc<PostgresClient>,
}

/// Configure all prediction-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/prediction", web::get().to(get_prediction_form))
        .route("/prediction", web::post().to(make_prediction))
        .route("/prediction/result", web::get().to(get_prediction_result))
        .route("/prediction/save", web::post().to(save_prediction_result));
}

#[derive(Debug, Deserialize)]
pub struct FlashQuery {
    flash: Option<Uuid>,
}

/// Identity collaborator: the authenticated actor, or anonymous.
///
/// The header stands in for the session-auth middleware in front of this
/// service; an absent or empty header means anonymous.
fn current_actor(req: &HttpRequest) -> Option<Identity> {
    req.headers()
        .get("X-Auth-User")
        .and_then(|value| value.to_str().ok())
        .filter(|username| !username.is_empty())
        .map(Identity::new)
}

fn redirect_to_form(token: Uuid) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", format!("/api/v1/prediction?flash={}", token)))
        .finish()
}

fn redirect_to_result(token: Uuid) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((
            "Location",
            format!("/api/v1/prediction/result?flash={}", token),
        ))
        .finish()
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Submission step
///
/// GET /api/v1/prediction?flash={token}
///
/// Returns an empty form descriptor, or the echoed input and error message
/// of a failed attempt when the flash token is still claimable.
async fn get_prediction_form(
    state: web::Data<AppState>,
    query: web::Query<FlashQuery>,
) -> impl Responder {
    let mut view = PredictionFormView {
        prediction_request: None,
        error: None,
    };

    if let Some(token) = query.flash {
        match state.flash.take_once(&token) {
            Some(FlashPayload::SubmitRetry { request, error }) => {
                view.prediction_request = Some(request);
                view.error = Some(error);
            }
            Some(FlashPayload::ResultView(_)) => {
                tracing::warn!("Result payload claimed at the submission step; dropping it");
            }
            None => {}
        }
    }

    HttpResponse::Ok().json(view)
}

/// Submit a matchup for prediction
///
/// POST /api/v1/prediction
///
/// Every outcome redirects: a successful prediction is flashed to the
/// result step, a validation or gateway error is flashed back to the
/// submission step with the original input preserved for correction.
async fn make_prediction(
    state: web::Data<AppState>,
    request: web::Json<MatchupRequest>,
) -> impl Responder {
    let request = request.into_inner();
    tracing::info!(
        "Received prediction request: {} vs {} on {}",
        request.player1_id,
        request.player2_id,
        request.surface
    );

    if let Err(errors) = request.validate() {
        tracing::warn!("Validation errors in prediction request: {}", errors);
        let token = state.flash.place(FlashPayload::SubmitRetry {
            request,
            error: errors.to_string(),
        });
        return redirect_to_form(token);
    }

    match state.gateway.predict(&request).await {
        Ok(outcome) => {
            let projection = SaveRequest::from_parts(&request, &outcome);
            let token = state
                .flash
                .place(FlashPayload::ResultView(Box::new(PredictionResultView {
                    prediction_request: request,
                    prediction_response: outcome,
                    prediction_save_request: projection,
                    save_success: None,
                    save_error: None,
                    error: None,
                })));
            redirect_to_result(token)
        }
        Err(e) => {
            tracing::error!(
                "Prediction gateway error (status {}): {}",
                e.surfaced_status(),
                e
            );
            // Expected kinds carry a safe, actionable message; everything
            // else is collapsed into a generic one.
            let error = if e.is_expected() {
                e.to_string()
            } else {
                "An unexpected error occurred during prediction.".to_string()
            };
            let token = state.flash.place(FlashPayload::SubmitRetry { request, error });
            redirect_to_form(token)
        }
    }
}

/// Result step
///
/// GET /api/v1/prediction/result?flash={token}
///
/// Consumes the flash token. Entering this step without a live result
/// payload (direct navigation, refresh, double-claim) always redirects
/// back to the submission step; no placeholder outcome is fabricated.
async fn get_prediction_result(
    state: web::Data<AppState>,
    query: web::Query<FlashQuery>,
) -> impl Responder {
    let payload = query.flash.and_then(|token| state.flash.take_once(&token));

    match payload {
        Some(FlashPayload::ResultView(view)) => HttpResponse::Ok().json(*view),
        Some(FlashPayload::SubmitRetry { request, error }) => {
            tracing::warn!("Retry payload claimed at the result step; bouncing back");
            let token = state.flash.place(FlashPayload::SubmitRetry { request, error });
            redirect_to_form(token)
        }
        None => {
            tracing::warn!("Result step entered without a prediction. Redirecting.");
            HttpResponse::SeeOther()
                .insert_header(("Location", "/api/v1/prediction"))
                .finish()
        }
    }
}

/// Save an accepted prediction
///
/// POST /api/v1/prediction/save
///
/// Runs the save guard and redirects back to the result step with the
/// appropriate marker. The computed prediction is reconstructed from the
/// projection and re-flashed, so no outcome ever loses it.
async fn save_prediction_result(
    state: web::Data<AppState>,
    projection: web::Json<SaveRequest>,
    req: HttpRequest,
) -> impl Responder {
    let mut projection = projection.into_inner();
    let actor = current_actor(&req);

    let reconstructed_request = projection.reconstruct_request();
    let reconstructed_outcome = projection.reconstruct_outcome();

    let mut view = PredictionResultView {
        prediction_request: reconstructed_request,
        prediction_response: reconstructed_outcome,
        prediction_save_request: projection.clone(),
        save_success: None,
        save_error: None,
        error: None,
    };

    match state.save_guard.save(&projection, actor.as_ref()).await {
        Ok(ack) => {
            projection.username = Some(ack.username);
            view.prediction_save_request = projection;
            view.save_success = Some("Prediction saved successfully.".to_string());
        }
        Err(e @ SaveError::Unauthorized) => {
            view.save_error = Some(e.to_string());
        }
        Err(e @ SaveError::Validation(_)) => {
            view.save_error = Some(e.to_string());
        }
        Err(SaveError::Storage(detail)) => {
            tracing::error!("Error during saving prediction result: {}", detail);
            view.error =
                Some("An unexpected error occurred during saving prediction result.".to_string());
        }
    }

    let token = state.flash.place(FlashPayload::ResultView(Box::new(view)));
    redirect_to_result(token)
}
