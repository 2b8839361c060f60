mod fact_checker;
mod transcript_publisher;

pub use fact_checker::*;
pub use transcript_publisher::*;
