use crate::call::{CallCommand, CallContext, CallEnd, CallHandle, CallStatus};
use crate::error::{CallError, NegotiationError};
use crate::media::{LocalMediaController, LocalTrack};
use crate::negotiation::{SessionNegotiator, SignalEvent};
use crate::room::RoomLifecycle;
use crate::store::Subscription;
use crate::transcript::TranscriptPublisher;
use crate::transport::TransportEvent;
use debate_core::{Role, RoomCode, RoomInfo, TranscriptMessage};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// One side of a two-party call. Owns the connection, the local media and the
/// store subscriptions, and mutates them from a single task.
pub struct DebateCall {
    room: RoomInfo,
    negotiator: SessionNegotiator,
    media: LocalMediaController,
    publisher: TranscriptPublisher,
    lifecycle: RoomLifecycle,
    command_rx: mpsc::Receiver<CallCommand>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    // Held so the channels stay open after the transport drops its callbacks.
    _transport_tx: mpsc::Sender<TransportEvent>,
    signal_rx: mpsc::UnboundedReceiver<SignalEvent>,
    signal_tx: mpsc::UnboundedSender<SignalEvent>,
    room_sub: Option<Subscription>,
    candidate_sub: Option<Subscription>,
    message_sub: Option<Subscription>,
    status_tx: watch::Sender<CallStatus>,
    messages_tx: broadcast::Sender<TranscriptMessage>,
    // In-flight utterance checks; they write into the room and must not
    // outlive teardown.
    publishing: JoinSet<()>,
    torn_down: bool,
}

impl DebateCall {
    /// Acquires media, creates a room named after `topic` and publishes the
    /// offer. The room is removed again if anything after its creation fails.
    pub async fn create(
        ctx: &CallContext,
        topic: &str,
        speaker: &str,
    ) -> Result<CallHandle, CallError> {
        let tracks = ctx.media.acquire().await?;
        let lifecycle = ctx.lifecycle();
        let room = match lifecycle.create_room(topic).await {
            Ok(room) => room,
            Err(e) => {
                stop_tracks(&tracks);
                return Err(e);
            }
        };
        Self::start(ctx, Role::Initiator, room, tracks, speaker).await
    }

    /// Looks the room up before touching any device, then answers its offer.
    pub async fn join(
        ctx: &CallContext,
        code: &RoomCode,
        speaker: &str,
    ) -> Result<CallHandle, CallError> {
        let lifecycle = ctx.lifecycle();
        let room = lifecycle.join_room(code).await?;
        let tracks = ctx.media.acquire().await?;
        Self::start(ctx, Role::Joiner, room, tracks, speaker).await
    }

    async fn start(
        ctx: &CallContext,
        role: Role,
        room: RoomInfo,
        tracks: Vec<LocalTrack>,
        speaker: &str,
    ) -> Result<CallHandle, CallError> {
        let lifecycle = ctx.lifecycle();
        let (transport_tx, transport_rx) = mpsc::channel(256);

        let transport = match ctx.transports.connect(transport_tx.clone()).await {
            Ok(transport) => transport,
            Err(e) => {
                error!("Failed to create peer connection: {}", e);
                stop_tracks(&tracks);
                if role == Role::Initiator {
                    lifecycle.purge_room(&room.code).await;
                }
                return Err(CallError::NegotiationFailed(e.into()));
            }
        };

        let (command_tx, command_rx) = mpsc::channel(100);
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (messages_tx, _) = broadcast::channel(64);

        let media = LocalMediaController::new(tracks, ctx.transcriber.clone());
        let (status_tx, status_rx) = watch::channel(CallStatus {
            camera_enabled: media.camera_enabled(),
            ..CallStatus::default()
        });

        let mut call = Self {
            negotiator: SessionNegotiator::new(
                role,
                room.code.clone(),
                transport,
                ctx.store.clone(),
                &ctx.config,
            ),
            publisher: TranscriptPublisher::new(
                ctx.store.clone(),
                ctx.fact_checker.clone(),
                room.code.clone(),
                room.name.clone(),
                speaker,
            ),
            media,
            lifecycle,
            room: room.clone(),
            command_rx,
            transport_rx,
            _transport_tx: transport_tx,
            signal_rx,
            signal_tx,
            room_sub: None,
            candidate_sub: None,
            message_sub: None,
            status_tx,
            messages_tx: messages_tx.clone(),
            publishing: JoinSet::new(),
            torn_down: false,
        };

        if let Err(e) = call.negotiate().await {
            error!("Negotiation for room {} failed: {}", room.code, e);
            call.teardown(role == Role::Initiator).await;
            return Err(CallError::negotiation(&room.code, e));
        }

        tokio::spawn(call.run());
        Ok(CallHandle::new(room, role, command_tx, status_rx, messages_tx))
    }

    async fn negotiate(&mut self) -> Result<(), NegotiationError> {
        self.negotiator.attach_tracks(self.media.tracks()).await?;

        match self.negotiator.role() {
            Role::Initiator => {
                self.negotiator.start_initiator(&self.room).await?;
                self.room_sub = Some(self.negotiator.watch_room(self.signal_tx.clone()));
            }
            Role::Joiner => self.negotiator.start_joiner().await?,
        }

        self.candidate_sub = Some(
            self.negotiator
                .relay()
                .watch_remote(self.signal_tx.clone()),
        );
        self.message_sub = Some(self.publisher.watch(self.signal_tx.clone()));
        Ok(())
    }

    async fn run(mut self) {
        info!(
            "Call loop started for room {} as {:?}",
            self.room.code,
            self.negotiator.role()
        );

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => {
                            if self.handle_command(c).await {
                                break;
                            }
                        }
                        None => {
                            info!("All call handles dropped. Leaving room {}", self.room.code);
                            self.teardown(false).await;
                            self.end(CallEnd::HandleDropped);
                            break;
                        }
                    }
                }

                Some(evt) = self.transport_rx.recv() => {
                    self.handle_transport_event(evt).await;
                }

                Some(res) = self.publishing.join_next() => {
                    if let Err(e) = res {
                        error!("Utterance task failed: {}", e);
                    }
                }

                Some(evt) = self.signal_rx.recv() => {
                    if let Err(e) = self.handle_signal_event(evt).await {
                        error!("Negotiation for room {} failed: {}", self.room.code, e);
                        let delete = self.negotiator.role() == Role::Initiator;
                        self.teardown(delete).await;
                        self.end(CallEnd::NegotiationFailed(e.to_string()));
                        break;
                    }
                }
            }
        }

        info!("Call loop finished for room {}", self.room.code);
    }

    /// Returns `true` once the call is over.
    async fn handle_command(&mut self, cmd: CallCommand) -> bool {
        match cmd {
            CallCommand::ToggleMic { reply } => {
                let enabled = self.media.toggle_mic(self.negotiator.state().phase());
                self.publish_status();
                let _ = reply.send(enabled);
            }

            CallCommand::ToggleCamera { reply } => {
                let enabled = self.media.toggle_camera();
                self.publish_status();
                let _ = reply.send(enabled);
            }

            CallCommand::Utterance { text, reply } => {
                // Checking can take seconds; keep the loop free meanwhile.
                let publisher = self.publisher.clone();
                self.publishing.spawn(async move {
                    let result = publisher
                        .publish_utterance(&text)
                        .await
                        .map_err(CallError::StoreUnavailable);
                    let _ = reply.send(result);
                });
            }

            CallCommand::Chat { text, reply } => {
                let result = self
                    .publisher
                    .publish_chat(&text)
                    .await
                    .map_err(CallError::StoreUnavailable);
                let _ = reply.send(result);
            }

            CallCommand::HangUp {
                delete_room_data,
                reply,
            } => {
                info!("Hanging up room {}", self.room.code);
                self.teardown(delete_room_data).await;
                self.end(CallEnd::HungUp);
                let _ = reply.send(());
                return true;
            }
        }
        false
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::CandidateGenerated(candidate) => {
                self.negotiator.local_candidate(candidate).await;
            }

            TransportEvent::PhaseChanged(phase) => {
                if !self.negotiator.set_phase(phase) {
                    return;
                }
                info!("Room {} connection is {}", self.room.code, phase);

                self.media.on_phase(phase);
                if phase.is_interrupted() {
                    if let Some(mut sub) = self.candidate_sub.take() {
                        sub.cancel();
                    }
                }
                self.publish_status();
            }

            TransportEvent::RemoteTrack(kind) => {
                info!("Remote {:?} track arrived in room {}", kind, self.room.code);
            }
        }
    }

    async fn handle_signal_event(&mut self, event: SignalEvent) -> Result<(), NegotiationError> {
        match event {
            SignalEvent::RoomChanged(None) => {
                warn!("Room {} was removed", self.room.code);
            }

            SignalEvent::RoomChanged(record) => {
                self.negotiator.on_room_change(record).await?;
            }

            SignalEvent::RemoteCandidate(candidate) => {
                if self.candidate_sub.is_none() {
                    debug!("Candidate listener stopped, ignoring remote candidate");
                    return Ok(());
                }
                self.negotiator.remote_candidate(candidate).await;
            }

            SignalEvent::Message(message) => {
                let _ = self.messages_tx.send(message);
            }
        }
        Ok(())
    }

    /// Cancels every subscription and pending utterance, releases the local
    /// media and closes the connection. The initiator also purges the room when `delete_room_data`
    /// is set. Runs at most once.
    async fn teardown(&mut self, delete_room_data: bool) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        for mut sub in [
            self.room_sub.take(),
            self.candidate_sub.take(),
            self.message_sub.take(),
        ]
        .into_iter()
        .flatten()
        {
            sub.cancel();
        }

        self.media.release();

        if !self.publishing.is_empty() {
            debug!("Cancelling {} pending utterances", self.publishing.len());
            self.publishing.abort_all();
            while self.publishing.join_next().await.is_some() {}
        }

        if let Err(e) = self.negotiator.transport().close().await {
            warn!("Failed to close connection for room {}: {}", self.room.code, e);
        }

        if delete_room_data && self.negotiator.role() == Role::Initiator {
            self.lifecycle.purge_room(&self.room.code).await;
        }
        info!("Room {} torn down", self.room.code);
    }

    fn end(&self, reason: CallEnd) {
        self.publish_status();
        self.status_tx.send_modify(|status| status.ended = Some(reason));
    }

    fn publish_status(&self) {
        let ended = self.status_tx.borrow().ended.clone();
        self.status_tx.send_replace(CallStatus {
            phase: self.negotiator.state().phase(),
            mic_enabled: self.media.mic_enabled(),
            camera_enabled: self.media.camera_enabled(),
            transcribing: self.media.is_transcribing(),
            ended,
        });
    }
}

fn stop_tracks(tracks: &[LocalTrack]) {
    for track in tracks {
        track.stop();
    }
}
