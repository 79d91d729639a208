use crate::models::{Identity, SaveRequest};
use std::future::Future;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Persistence collaborator for accepted predictions
pub trait PredictionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn insert_prediction(
        &self,
        record: &SaveRequest,
    ) -> impl Future<Output = Result<i64, Self::Error>> + Send;
}

/// Failures of the save step
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("You must be logged in to save prediction.")]
    Unauthorized,

    #[error("Could not save prediction due to invalid data.")]
    Validation(#[source] ValidationErrors),

    #[error("{0}")]
    Storage(String),
}

/// Receipt for a persisted prediction
#[derive(Debug, Clone, PartialEq)]
pub struct SavedAck {
    pub prediction_id: i64,
    pub username: String,
}

/// Authorization and revalidation gate in front of persistence
///
/// Checks the actor, revalidates the projection, and forwards a normalized
/// record (with the actor's username stamped) to the store exactly once.
/// Persistence is never invoked on an unauthorized or invalid request.
/// Saving is not idempotent: replaying the save step creates a duplicate
/// row, a documented limitation of the flow.
pub struct SaveGuard<S> {
    store: S,
}

impl<S: PredictionStore> SaveGuard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn save(
        &self,
        projection: &SaveRequest,
        actor: Option<&Identity>,
    ) -> Result<SavedAck, SaveError> {
        let actor = match actor {
            Some(actor) => actor,
            None => {
                tracing::warn!("User not authenticated. Cannot save prediction.");
                return Err(SaveError::Unauthorized);
            }
        };

        if let Err(errors) = projection.validate() {
            tracing::warn!("Validation errors while saving prediction: {}", errors);
            return Err(SaveError::Validation(errors));
        }

        let mut record = projection.clone();
        record.username = Some(actor.username.clone());

        tracing::info!("Attempting to save prediction for user: {}", actor.username);
        let prediction_id = self
            .store
            .insert_prediction(&record)
            .await
            .map_err(|e| SaveError::Storage(e.to_string()))?;
        tracing::info!(
            "Prediction {} saved successfully for user: {}",
            prediction_id,
            actor.username
        );

        Ok(SavedAck {
            prediction_id,
            username: actor.username.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("storage unavailable")]
    struct StubStoreError;

    struct StubStore {
        inserts: AtomicUsize,
        fail: bool,
        last_record: Mutex<Option<SaveRequest>>,
    }

    impl StubStore {
        fn new() -> Self {
            Self {
                inserts: AtomicUsize::new(0),
                fail: false,
                last_record: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn insert_count(&self) -> usize {
            self.inserts.load(Ordering::SeqCst)
        }
    }

    impl PredictionStore for StubStore {
        type Error = StubStoreError;

        async fn insert_prediction(&self, record: &SaveRequest) -> Result<i64, StubStoreError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StubStoreError);
            }
            *self.last_record.lock().unwrap() = Some(record.clone());
            Ok(42)
        }
    }

    fn valid_projection() -> SaveRequest {
        SaveRequest {
            username: None,
            player1_id: 104745,
            player1_name: "Novak Djokovic".to_string(),
            player2_id: 126774,
            player2_name: "Jannik Sinner".to_string(),
            player1_win_probability: 0.65,
            player2_win_probability: 0.35,
            winner_name: "Novak Djokovic".to_string(),
            confidence: 0.8,
            tourney_level: "G".to_string(),
            surface: "Hard".to_string(),
            best_of: 5,
            round: "F".to_string(),
        }
    }

    #[tokio::test]
    async fn test_anonymous_actor_is_unauthorized_and_store_untouched() {
        let guard = SaveGuard::new(StubStore::new());

        let result = guard.save(&valid_projection(), None).await;

        assert!(matches!(result, Err(SaveError::Unauthorized)));
        assert_eq!(guard.store.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_projection_never_reaches_store() {
        let guard = SaveGuard::new(StubStore::new());
        let actor = Identity::new("karol");

        let mut projection = valid_projection();
        projection.player1_win_probability = 1.5;

        let result = guard.save(&projection, Some(&actor)).await;

        assert!(matches!(result, Err(SaveError::Validation(_))));
        assert_eq!(guard.store.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_save_stamps_username_and_inserts_once() {
        let guard = SaveGuard::new(StubStore::new());
        let actor = Identity::new("karol");

        let ack = guard
            .save(&valid_projection(), Some(&actor))
            .await
            .expect("save should succeed");

        assert_eq!(ack.prediction_id, 42);
        assert_eq!(ack.username, "karol");
        assert_eq!(guard.store.insert_count(), 1);

        let stored = guard.store.last_record.lock().unwrap().clone().unwrap();
        assert_eq!(stored.username.as_deref(), Some("karol"));
        assert_eq!(stored.player1_id, 104745);
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_without_retry() {
        let guard = SaveGuard::new(StubStore::failing());
        let actor = Identity::new("karol");

        let result = guard.save(&valid_projection(), Some(&actor)).await;

        assert!(matches!(result, Err(SaveError::Storage(_))));
        assert_eq!(guard.store.insert_count(), 1);
    }
}
