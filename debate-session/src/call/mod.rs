mod call_command;
mod call_context;
mod call_handle;
mod call_status;
mod debate_call;

pub use call_command::*;
pub use call_context::*;
pub use call_handle::*;
pub use call_status::*;
pub use debate_call::*;
