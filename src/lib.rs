//! Tennis Predictor - win-probability prediction service for tennis matchups
//!
//! This library wraps an external prediction API behind a typed gateway,
//! carries results through a redirect-driven submit/display/save flow with
//! single-use flash tokens, and serves the player directory through a
//! periodically evicted read-through cache.

pub mod config;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use models::{MatchupRequest, PredictionOutcome, SaveRequest};
pub use services::{
    FlashPayload, FlashStore, GatewayError, PlayerCache, PredictionGateway, SaveError, SaveGuard,
};
