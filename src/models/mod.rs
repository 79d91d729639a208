// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Identity, PlayerDto, PlayerRecord};
pub use requests::{MatchupRequest, SaveRequest};
pub use responses::{
    ErrorResponse, HealthResponse, PlayersResponse, PredictionFormView, PredictionOutcome,
    PredictionResultView,
};
