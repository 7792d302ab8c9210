//! Timeline reconstruction: the second pass over the capture.

mod event;
mod reconstruct;

pub use event::TimelineEvent;
pub use reconstruct::reconstruct_timeline;
