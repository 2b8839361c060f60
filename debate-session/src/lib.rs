mod call;
mod config;
mod error;
mod media;
mod negotiation;
mod room;
mod store;
mod transcript;
mod transport;

pub use call::*;
pub use config::*;
pub use error::*;
pub use media::*;
pub use negotiation::*;
pub use room::*;
pub use store::*;
pub use transcript::*;
pub use transport::*;
