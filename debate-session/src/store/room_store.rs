use crate::error::StoreError;
use crate::store::Subscription;
use async_trait::async_trait;
use debate_core::{Collection, RoomCode, RoomPatch, RoomRecord};
use serde_json::Value;

pub type DocId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// One change in a room subcollection.
#[derive(Debug, Clone)]
pub struct DocChange {
    pub kind: ChangeKind,
    pub id: DocId,
    pub data: Value,
}

/// A change of the room record itself. `record` is `None` once removed.
#[derive(Debug, Clone)]
pub struct RoomChange {
    pub kind: ChangeKind,
    pub record: Option<RoomRecord>,
}

pub type RoomHandler = Box<dyn Fn(RoomChange) + Send + Sync>;
pub type DocHandler = Box<dyn Fn(DocChange) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocPath {
    Room(RoomCode),
    Child {
        room: RoomCode,
        collection: Collection,
        id: DocId,
    },
}

/// Document store holding room records and their append-only subcollections.
///
/// Handlers passed to the `watch_*` methods run on whatever task performed the
/// write; they must only enqueue work and never call back into the store.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Create-or-replace write of the room record.
    async fn set_room(&self, code: &RoomCode, record: RoomRecord) -> Result<(), StoreError>;

    /// Field-merge update. Fails with `NotFound` when the record does not exist.
    async fn merge_room(&self, code: &RoomCode, patch: RoomPatch) -> Result<(), StoreError>;

    async fn get_room(&self, code: &RoomCode) -> Result<Option<RoomRecord>, StoreError>;

    async fn append(
        &self,
        code: &RoomCode,
        collection: Collection,
        data: Value,
    ) -> Result<DocId, StoreError>;

    /// Ids of at most `limit` documents of a subcollection, in append order.
    async fn list(
        &self,
        code: &RoomCode,
        collection: Collection,
        limit: usize,
    ) -> Result<Vec<DocId>, StoreError>;

    /// Deletes all `paths` as one batch.
    async fn delete_batch(&self, paths: Vec<DocPath>) -> Result<(), StoreError>;

    /// Live updates of the room record. The current record, if any, is
    /// delivered first as `Added`.
    fn watch_room(&self, code: &RoomCode, handler: RoomHandler) -> Subscription;

    /// Live updates of a subcollection. Existing documents are delivered first
    /// as `Added`, in append order.
    fn watch_collection(
        &self,
        code: &RoomCode,
        collection: Collection,
        handler: DocHandler,
    ) -> Subscription;
}
