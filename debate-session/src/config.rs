use debate_core::IceServerConfig;
use debate_core::utils::{DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2};

/// Per-process settings shared by every call.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ice_servers: Vec<IceServerConfig>,
    pub room_code_length: usize,
    /// Upper bound of each negotiation queue (remote and local candidates).
    pub max_pending_candidates: usize,
    /// Documents deleted per batch when a room is purged.
    pub purge_batch_limit: usize,
    /// Attempts at finding an unused room code before giving up.
    pub room_code_attempts: usize,
    pub fact_check_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec![DEFAULT_STUN_ADDR.to_owned(), DEFAULT_STUN_ADDR_2.to_owned()],
                username: None,
                credential: None,
            }],
            room_code_length: 6,
            max_pending_candidates: 256,
            purge_batch_limit: 50,
            room_code_attempts: 5,
            fact_check_url: "http://localhost:3000/api/fact-check".to_owned(),
        }
    }
}

impl SessionConfig {
    /// Host candidates only. Used for loopback calls and tests.
    pub fn local() -> Self {
        Self {
            ice_servers: Vec::new(),
            ..Self::default()
        }
    }
}
