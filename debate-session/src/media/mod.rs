mod local_track;
mod media_controller;
mod media_source;
mod transcriber;

pub use local_track::*;
pub use media_controller::*;
pub use media_source::*;
pub use transcriber::*;
