use crate::error::StoreError;
use crate::store::{
    ChangeKind, DocChange, DocHandler, DocId, DocPath, RoomChange, RoomHandler, RoomStore,
    Subscription,
};
use async_trait::async_trait;
use dashmap::DashMap;
use debate_core::{Collection, RoomCode, RoomPatch, RoomRecord};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::debug;
use uuid::Uuid;

/// Largest batch `delete_batch` accepts.
pub const MAX_BATCH_WRITES: usize = 500;

#[derive(Default)]
struct RoomEntry {
    record: Option<RoomRecord>,
    children: HashMap<Collection, Vec<(DocId, Value)>>,
    room_watchers: HashMap<Uuid, Arc<RoomHandler>>,
    doc_watchers: HashMap<Uuid, (Collection, Arc<DocHandler>)>,
}

impl RoomEntry {
    fn doc_handlers(&self, collection: Collection) -> Vec<Arc<DocHandler>> {
        self.doc_watchers
            .values()
            .filter(|(c, _)| *c == collection)
            .map(|(_, h)| h.clone())
            .collect()
    }

    fn room_handlers(&self) -> Vec<Arc<RoomHandler>> {
        self.room_watchers.values().cloned().collect()
    }

    /// No record, no documents and nobody watching.
    fn is_vacant(&self) -> bool {
        self.record.is_none()
            && self.children.values().all(Vec::is_empty)
            && self.room_watchers.is_empty()
            && self.doc_watchers.is_empty()
    }
}

#[derive(Default)]
struct MemoryInner {
    rooms: DashMap<RoomCode, RoomEntry>,
}

impl MemoryInner {
    /// Drops the entry of `code` once it holds nothing. Must be called with no
    /// guard on `rooms` held.
    fn prune(&self, code: &RoomCode) {
        self.rooms.remove_if(code, |_, entry| entry.is_vacant());
    }
}

/// In-process [`RoomStore`]. Cloning shares the same data, so two calls in one
/// process can negotiate through it.
#[derive(Clone, Default)]
pub struct MemoryRoomStore {
    inner: Arc<MemoryInner>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_room(&self, code: &RoomCode) -> bool {
        self.inner
            .rooms
            .get(code)
            .is_some_and(|e| e.record.is_some())
    }

    pub fn document_count(&self, code: &RoomCode, collection: Collection) -> usize {
        self.inner
            .rooms
            .get(code)
            .and_then(|e| e.children.get(&collection).map(Vec::len))
            .unwrap_or(0)
    }

    pub fn documents(&self, code: &RoomCode, collection: Collection) -> Vec<Value> {
        self.inner
            .rooms
            .get(code)
            .and_then(|e| {
                e.children
                    .get(&collection)
                    .map(|docs| docs.iter().map(|(_, v)| v.clone()).collect())
            })
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.inner
            .rooms
            .iter()
            .filter(|e| e.value().record.is_some())
            .count()
    }

    fn delete_one(&self, path: DocPath) {
        match path {
            DocPath::Room(code) => {
                let handlers = {
                    let Some(mut entry) = self.inner.rooms.get_mut(&code) else {
                        return;
                    };
                    if entry.record.take().is_none() {
                        return;
                    }
                    entry.room_handlers()
                };
                for handler in handlers {
                    handler(RoomChange {
                        kind: ChangeKind::Removed,
                        record: None,
                    });
                }
            }
            DocPath::Child {
                room,
                collection,
                id,
            } => {
                let (removed, handlers) = {
                    let Some(mut entry) = self.inner.rooms.get_mut(&room) else {
                        return;
                    };
                    let Some(docs) = entry.children.get_mut(&collection) else {
                        return;
                    };
                    let Some(pos) = docs.iter().position(|(doc_id, _)| *doc_id == id) else {
                        return;
                    };
                    let (_, data) = docs.remove(pos);
                    (data, entry.doc_handlers(collection))
                };
                for handler in handlers {
                    handler(DocChange {
                        kind: ChangeKind::Removed,
                        id: id.clone(),
                        data: removed.clone(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn set_room(&self, code: &RoomCode, record: RoomRecord) -> Result<(), StoreError> {
        let (kind, handlers) = {
            let mut entry = self.inner.rooms.entry(code.clone()).or_default();
            let kind = if entry.record.is_some() {
                ChangeKind::Modified
            } else {
                ChangeKind::Added
            };
            entry.record = Some(record.clone());
            (kind, entry.room_handlers())
        };
        debug!("Room {} written ({:?})", code, kind);

        for handler in handlers {
            handler(RoomChange {
                kind,
                record: Some(record.clone()),
            });
        }
        Ok(())
    }

    async fn merge_room(&self, code: &RoomCode, patch: RoomPatch) -> Result<(), StoreError> {
        let (updated, handlers) = {
            let Some(mut entry) = self.inner.rooms.get_mut(code) else {
                return Err(StoreError::NotFound(code.to_string()));
            };
            let Some(record) = entry.record.as_mut() else {
                return Err(StoreError::NotFound(code.to_string()));
            };
            patch.apply(record);
            let updated = record.clone();
            (updated, entry.room_handlers())
        };

        for handler in handlers {
            handler(RoomChange {
                kind: ChangeKind::Modified,
                record: Some(updated.clone()),
            });
        }
        Ok(())
    }

    async fn get_room(&self, code: &RoomCode) -> Result<Option<RoomRecord>, StoreError> {
        Ok(self.inner.rooms.get(code).and_then(|e| e.record.clone()))
    }

    async fn append(
        &self,
        code: &RoomCode,
        collection: Collection,
        data: Value,
    ) -> Result<DocId, StoreError> {
        let id = Uuid::new_v4().to_string();
        let handlers = {
            let mut entry = self.inner.rooms.entry(code.clone()).or_default();
            entry
                .children
                .entry(collection)
                .or_default()
                .push((id.clone(), data.clone()));
            entry.doc_handlers(collection)
        };

        for handler in handlers {
            handler(DocChange {
                kind: ChangeKind::Added,
                id: id.clone(),
                data: data.clone(),
            });
        }
        Ok(id)
    }

    async fn list(
        &self,
        code: &RoomCode,
        collection: Collection,
        limit: usize,
    ) -> Result<Vec<DocId>, StoreError> {
        Ok(self
            .inner
            .rooms
            .get(code)
            .and_then(|e| {
                e.children
                    .get(&collection)
                    .map(|docs| docs.iter().take(limit).map(|(id, _)| id.clone()).collect())
            })
            .unwrap_or_default())
    }

    async fn delete_batch(&self, paths: Vec<DocPath>) -> Result<(), StoreError> {
        if paths.len() > MAX_BATCH_WRITES {
            return Err(StoreError::WriteFailed(format!(
                "batch of {} exceeds {} writes",
                paths.len(),
                MAX_BATCH_WRITES
            )));
        }
        let mut touched = Vec::new();
        for path in paths {
            let code = match &path {
                DocPath::Room(code) => code.clone(),
                DocPath::Child { room, .. } => room.clone(),
            };
            self.delete_one(path);
            if !touched.contains(&code) {
                touched.push(code);
            }
        }
        for code in &touched {
            self.inner.prune(code);
        }
        Ok(())
    }

    fn watch_room(&self, code: &RoomCode, handler: RoomHandler) -> Subscription {
        let id = Uuid::new_v4();
        let handler = Arc::new(handler);
        let current = {
            let mut entry = self.inner.rooms.entry(code.clone()).or_default();
            entry.room_watchers.insert(id, handler.clone());
            entry.record.clone()
        };

        if let Some(record) = current {
            handler(RoomChange {
                kind: ChangeKind::Added,
                record: Some(record),
            });
        }

        let inner: Weak<MemoryInner> = Arc::downgrade(&self.inner);
        let code = code.clone();
        Subscription::new(move || {
            let Some(inner) = inner.upgrade() else { return };
            if let Some(mut entry) = inner.rooms.get_mut(&code) {
                entry.room_watchers.remove(&id);
            }
            inner.prune(&code);
        })
    }

    fn watch_collection(
        &self,
        code: &RoomCode,
        collection: Collection,
        handler: DocHandler,
    ) -> Subscription {
        let id = Uuid::new_v4();
        let handler = Arc::new(handler);
        let existing = {
            let mut entry = self.inner.rooms.entry(code.clone()).or_default();
            entry.doc_watchers.insert(id, (collection, handler.clone()));
            entry.children.get(&collection).cloned().unwrap_or_default()
        };

        for (doc_id, data) in existing {
            handler(DocChange {
                kind: ChangeKind::Added,
                id: doc_id,
                data,
            });
        }

        let inner: Weak<MemoryInner> = Arc::downgrade(&self.inner);
        let code = code.clone();
        Subscription::new(move || {
            let Some(inner) = inner.upgrade() else { return };
            if let Some(mut entry) = inner.rooms.get_mut(&code) {
                entry.doc_watchers.remove(&id);
            }
            inner.prune(&code);
        })
    }
}
