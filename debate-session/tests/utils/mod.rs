pub mod counting_store;
pub mod mock_fact_checker;
pub mod mock_transport;
pub mod wait;

pub use counting_store::*;
pub use failing_store::*;
pub use mock_fact_checker::*;
pub use mock_media::*;
pub use mock_transport::*;
pub use participant::*;
pub use wait::*;
