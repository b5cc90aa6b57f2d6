mod host;
mod segment;
mod strategy;

pub use host::{HostCall, SimulatedVideo, VideoHost};
pub use segment::SegmentPlayer;
pub use strategy::{PollStrategy, StopStrategy, TimerStrategy, build_strategy};
