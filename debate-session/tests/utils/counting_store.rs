use async_trait::async_trait;
use debate_core::{Collection, RoomCode, RoomPatch, RoomRecord};
use debate_session::{
    DocHandler, DocId, DocPath, MemoryRoomStore, RoomHandler, RoomStore, StoreError, Subscription,
};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct Counters {
    set_room: AtomicUsize,
    merge_room: AtomicUsize,
    room_deletes: AtomicUsize,
}

/// MemoryRoomStore that counts record writes and record deletions.
#[derive(Clone, Default)]
pub struct CountingStore {
    inner: MemoryRoomStore,
    counters: Arc<Counters>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory(&self) -> &MemoryRoomStore {
        &self.inner
    }

    pub fn set_room_calls(&self) -> usize {
        self.counters.set_room.load(Ordering::SeqCst)
    }

    pub fn merge_room_calls(&self) -> usize {
        self.counters.merge_room.load(Ordering::SeqCst)
    }

    pub fn room_deletes(&self) -> usize {
        self.counters.room_deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoomStore for CountingStore {
    async fn set_room(&self, code: &RoomCode, record: RoomRecord) -> Result<(), StoreError> {
        self.counters.set_room.fetch_add(1, Ordering::SeqCst);
        self.inner.set_room(code, record).await
    }

    async fn merge_room(&self, code: &RoomCode, patch: RoomPatch) -> Result<(), StoreError> {
        self.counters.merge_room.fetch_add(1, Ordering::SeqCst);
        self.inner.merge_room(code, patch).await
    }

    async fn get_room(&self, code: &RoomCode) -> Result<Option<RoomRecord>, StoreError> {
        self.inner.get_room(code).await
    }

    async fn append(
        &self,
        code: &RoomCode,
        collection: Collection,
        data: Value,
    ) -> Result<DocId, StoreError> {
        self.inner.append(code, collection, data).await
    }

    async fn list(
        &self,
        code: &RoomCode,
        collection: Collection,
        limit: usize,
    ) -> Result<Vec<DocId>, StoreError> {
        self.inner.list(code, collection, limit).await
    }

    async fn delete_batch(&self, paths: Vec<DocPath>) -> Result<(), StoreError> {
        let rooms = paths
            .iter()
            .filter(|p| matches!(p, DocPath::Room(_)))
            .count();
        self.counters.room_deletes.fetch_add(rooms, Ordering::SeqCst);
        self.inner.delete_batch(paths).await
    }

    fn watch_room(&self, code: &RoomCode, handler: RoomHandler) -> Subscription {
        self.inner.watch_room(code, handler)
    }

    fn watch_collection(
        &self,
        code: &RoomCode,
        collection: Collection,
        handler: DocHandler,
    ) -> Subscription {
        self.inner.watch_collection(code, collection, handler)
    }
}
