use debate_core::ConnectionPhase;
use std::time::Duration;

use crate::integration::call_tests::connect_pair;
use crate::integration::init_tracing;
use crate::utils::{CountingStore, Participant, StubFactChecker, wait_until};

#[tokio::test]
async fn test_mic_toggle_before_connect_defers_transcription() {
    init_tracing();

    let store = CountingStore::new();
    let host = Participant::new(&store, StubFactChecker::unreachable());
    let alice = debate_session::DebateCall::create(&host.ctx, "Deferred", "alice")
        .await
        .unwrap();

    let status = alice.status();
    assert!(!status.mic_enabled);
    assert!(status.camera_enabled);

    assert!(alice.toggle_mic().await.unwrap());
    assert!(!alice.status().transcribing);

    host.transport().await.emit_phase(ConnectionPhase::Connected).await;
    assert!(
        alice
            .wait_for_phase(ConnectionPhase::Connected, Duration::from_secs(2))
            .await
    );
    assert!(alice.status().transcribing);
    assert!(host.transcriber.is_running());

    assert!(!alice.toggle_mic().await.unwrap());
    assert!(!alice.status().transcribing);
    assert!(!host.transcriber.is_running());

    alice.hang_up(true).await.unwrap();
}

#[tokio::test]
async fn test_disconnect_stops_transcription_but_keeps_room() {
    init_tracing();

    let store = CountingStore::new();
    let host = Participant::new(&store, StubFactChecker::unreachable());
    let guest = Participant::new(&store, StubFactChecker::unreachable());
    let (alice, bob) = connect_pair(&host, &guest, "Flaky").await;

    assert!(alice.toggle_mic().await.unwrap());
    assert!(host.transcriber.is_running());

    let transport = host.transport().await;
    transport.emit_phase(ConnectionPhase::Disconnected).await;
    transport.emit_phase(ConnectionPhase::Disconnected).await;
    assert!(
        alice
            .wait_for_phase(ConnectionPhase::Disconnected, Duration::from_secs(2))
            .await
    );

    let stopped = wait_until(1000, || {
        let transcriber = host.transcriber.clone();
        async move { !transcriber.is_running() }
    })
    .await;
    assert!(stopped);
    assert!(alice.status().mic_enabled);
    assert!(store.memory().contains_room(&alice.room().code));
    assert_eq!(store.room_deletes(), 0);
    assert_eq!(host.transcriber.starts(), 1);

    // Camera toggles never touch transcription.
    assert!(!bob.toggle_camera().await.unwrap());
    assert!(!guest.transcriber.is_running());
    assert_eq!(guest.transcriber.starts(), 0);

    alice.hang_up(true).await.unwrap();
    bob.hang_up(false).await.unwrap();
}
