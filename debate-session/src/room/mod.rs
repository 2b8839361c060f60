mod room_lifecycle;

pub use room_lifecycle::*;
