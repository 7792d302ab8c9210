//! The output unit consumed by a renderer.

use serde::{Deserialize, Serialize};

use crate::analyze::Direction;

/// One reconstructed segment: best-estimate absolute send and receive
/// times, both in seconds relative to the first captured segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub direction: Direction,
    pub send_time: f64,
    pub receive_time: f64,
    /// Ordered names of the set TCP flags, e.g. `"SYN,ACK"`.
    pub flags_label: String,
    /// Sequence/ack numbers normalized to each side's ISN; zero until both
    /// ISNs are known.
    pub relative_seq: u32,
    pub relative_ack: u32,
    pub payload_len: u32,
}
