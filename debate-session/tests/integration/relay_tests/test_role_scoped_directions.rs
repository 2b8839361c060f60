use debate_core::{Collection, Role, RoomCode};
use debate_session::{CandidateRelay, MemoryRoomStore, RoomStore, SignalEvent};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::integration::init_tracing;

#[tokio::test]
async fn test_relays_read_the_opposite_direction() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let code = RoomCode::from("ABC234");

    let initiator = CandidateRelay::new(Arc::new(store.clone()), code.clone(), Role::Initiator);
    let joiner = CandidateRelay::new(Arc::new(store.clone()), code.clone(), Role::Joiner);
    assert_eq!(initiator.outbound(), Collection::InitiatorCandidates);
    assert_eq!(joiner.outbound(), Collection::JoinerCandidates);
    assert_eq!(initiator.inbound(), joiner.outbound());

    store
        .append(&code, Collection::InitiatorCandidates, json!({ "from": "initiator" }))
        .await
        .unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sub = joiner.watch_remote(tx);

    store
        .append(&code, Collection::JoinerCandidates, json!({ "from": "joiner" }))
        .await
        .unwrap();
    store
        .append(&code, Collection::InitiatorCandidates, json!({ "from": "initiator", "n": 2 }))
        .await
        .unwrap();

    let mut seen = Vec::new();
    while let Ok(SignalEvent::RemoteCandidate(c)) = rx.try_recv() {
        seen.push(c.0);
    }
    assert_eq!(
        seen,
        vec![
            json!({ "from": "initiator" }),
            json!({ "from": "initiator", "n": 2 })
        ]
    );

    sub.cancel();
    store
        .append(&code, Collection::InitiatorCandidates, json!({ "n": 3 }))
        .await
        .unwrap();
    assert!(rx.try_recv().is_err());
}
