use crate::config::SessionConfig;
use crate::error::{CallError, StoreError};
use crate::store::{DocPath, RoomStore};
use debate_core::utils::now_millis;
use debate_core::{Collection, RoomCode, RoomInfo, RoomRecord};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Creates, looks up and purges rooms in the shared store.
#[derive(Clone)]
pub struct RoomLifecycle {
    store: Arc<dyn RoomStore>,
    config: SessionConfig,
}

impl RoomLifecycle {
    pub fn new(store: Arc<dyn RoomStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Picks an unused code and writes `{name, createdAt}` under it.
    pub async fn create_room(&self, name: &str) -> Result<RoomInfo, CallError> {
        let name = name.trim();
        for attempt in 1..=self.config.room_code_attempts {
            let code = RoomCode::generate(self.config.room_code_length);
            let existing = self
                .store
                .get_room(&code)
                .await
                .map_err(CallError::StoreUnavailable)?;
            if existing.is_some() {
                warn!("Room code {} already taken (attempt {})", code, attempt);
                continue;
            }

            let record = RoomRecord::new(name, now_millis());
            self.store
                .set_room(&code, record.clone())
                .await
                .map_err(CallError::StoreUnavailable)?;
            info!("Room {} created: {}", code, name);
            return Ok(RoomInfo::from_record(code, &record));
        }

        error!(
            "No free room code after {} attempts",
            self.config.room_code_attempts
        );
        Err(CallError::StoreUnavailable(StoreError::Unavailable(
            "no free room code".into(),
        )))
    }

    pub async fn join_room(&self, code: &RoomCode) -> Result<RoomInfo, CallError> {
        let record = self
            .store
            .get_room(code)
            .await
            .map_err(CallError::StoreUnavailable)?
            .ok_or_else(|| CallError::RoomNotFound(code.clone()))?;
        info!("Room {} found: {}", code, record.name);
        Ok(RoomInfo::from_record(code.clone(), &record))
    }

    /// Deletes every subcollection document and then the record. Best effort:
    /// failures are logged and the purge moves on.
    pub async fn purge_room(&self, code: &RoomCode) {
        let limit = self.config.purge_batch_limit.max(1);
        for collection in Collection::ALL {
            loop {
                let ids = match self.store.list(code, collection, limit).await {
                    Ok(ids) => ids,
                    Err(e) => {
                        error!("Failed to list {} of room {}: {}", collection.as_str(), code, e);
                        break;
                    }
                };
                if ids.is_empty() {
                    break;
                }

                let count = ids.len();
                let paths = ids
                    .into_iter()
                    .map(|id| DocPath::Child {
                        room: code.clone(),
                        collection,
                        id,
                    })
                    .collect();
                if let Err(e) = self.store.delete_batch(paths).await {
                    error!("Failed to delete {} of room {}: {}", collection.as_str(), code, e);
                    break;
                }
                debug!("Deleted {} documents from {}", count, collection.as_str());
                if count < limit {
                    break;
                }
            }
        }

        match self.store.delete_batch(vec![DocPath::Room(code.clone())]).await {
            Ok(()) => info!("Room {} purged", code),
            Err(e) => error!("Failed to delete room {}: {}", code, e),
        }
    }
}
