mod config;
mod error;
mod gemini;
mod handlers;
mod verdict;

pub use config::*;
pub use error::*;
pub use gemini::*;
pub use handlers::*;
pub use verdict::*;
