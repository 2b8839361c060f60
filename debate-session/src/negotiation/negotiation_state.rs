use crate::error::{NegotiationError, SignalField};
use debate_core::{Candidate, ConnectionPhase, Role};
use std::collections::VecDeque;

/// Bounded FIFO of candidates that cannot be used yet.
#[derive(Debug)]
pub struct PendingCandidates {
    queue: VecDeque<Candidate>,
    capacity: usize,
}

impl PendingCandidates {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            capacity,
        }
    }

    /// Queues a candidate. Returns `false`, leaving the queue untouched, when
    /// it is full.
    pub fn push(&mut self, candidate: Candidate) -> bool {
        if self.queue.len() >= self.capacity {
            return false;
        }
        self.queue.push_back(candidate);
        true
    }

    pub fn drain(&mut self) -> Vec<Candidate> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Per-call negotiation state. Never persisted.
#[derive(Debug)]
pub struct NegotiationState {
    role: Role,
    phase: ConnectionPhase,
    has_local_description: bool,
    has_remote_description: bool,
    description_written: bool,
    pub(crate) pending_remote: PendingCandidates,
    pub(crate) pending_local: PendingCandidates,
}

impl NegotiationState {
    pub fn new(role: Role, max_pending: usize) -> Self {
        Self {
            role,
            phase: ConnectionPhase::New,
            has_local_description: false,
            has_remote_description: false,
            description_written: false,
            pending_remote: PendingCandidates::new(max_pending),
            pending_local: PendingCandidates::new(max_pending),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    /// Records a phase. Returns `false` if it was already the current one.
    pub fn set_phase(&mut self, phase: ConnectionPhase) -> bool {
        if self.phase == phase {
            return false;
        }
        self.phase = phase;
        true
    }

    pub fn has_local_description(&self) -> bool {
        self.has_local_description
    }

    pub(crate) fn mark_local_description(&mut self) {
        self.has_local_description = true;
    }

    pub fn has_remote_description(&self) -> bool {
        self.has_remote_description
    }

    pub(crate) fn mark_remote_description(&mut self) {
        self.has_remote_description = true;
    }

    /// The room field this role owns.
    pub fn own_field(&self) -> SignalField {
        match self.role {
            Role::Initiator => SignalField::Offer,
            Role::Joiner => SignalField::Answer,
        }
    }

    /// True once this side's offer or answer is in the room record.
    pub fn description_written(&self) -> bool {
        self.description_written
    }

    pub(crate) fn ensure_writable(&self) -> Result<(), NegotiationError> {
        if self.description_written {
            return Err(NegotiationError::AlreadyWritten(self.own_field()));
        }
        Ok(())
    }

    pub(crate) fn mark_description_written(&mut self) {
        self.description_written = true;
    }

    pub fn pending_remote(&self) -> usize {
        self.pending_remote.len()
    }

    pub fn pending_local(&self) -> usize {
        self.pending_local.len()
    }
}
