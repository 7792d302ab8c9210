//! Decoded-segment model shared by every analysis pass.

mod options;
mod segment;

pub use options::parse_timestamp_option;
pub use segment::{Segment, TcpFlags, TcpTimestamp};
