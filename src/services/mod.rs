// Service exports
pub mod cache;
pub mod flash;
pub mod gateway;
pub mod postgres;
pub mod save_guard;

pub use cache::{spawn_eviction_task, PlayerCache, PlayerDirectory, PlayerSnapshot};
pub use flash::{FlashPayload, FlashStore};
pub use gateway::{GatewayError, PredictionGateway};
pub use postgres::{PostgresClient, PostgresError};
pub use save_guard::{PredictionStore, SaveError, SaveGuard, SavedAck};
