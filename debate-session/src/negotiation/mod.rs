mod candidate_relay;
mod negotiation_state;
mod negotiator;
mod signal_event;

pub use candidate_relay::*;
pub use negotiation_state::*;
pub use negotiator::*;
pub use signal_event::*;
