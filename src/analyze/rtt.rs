//! Round-trip estimation from handshake timing and sequence/ack pairing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{AnalysisError, Direction};
use crate::capture::{Segment, TcpFlags};

/// Final round-trip estimate with its component samples, in microseconds.
///
/// The estimate is the minimum over every observed component: queuing delay
/// only ever inflates a measured sample, so the smallest one seen is the
/// best approximation of the true propagation RTT.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RttEstimate {
    pub rtt_us: u64,
    /// First SYN to SYN|ACK, when a handshake was captured.
    pub handshake_us: Option<u64>,
    /// Smallest sample measured by the client acknowledging server data.
    pub client_min_us: Option<u64>,
    /// Smallest sample measured by the server acknowledging client data.
    pub server_min_us: Option<u64>,
}

impl RttEstimate {
    pub fn secs(&self) -> f64 {
        self.rtt_us as f64 / 1e6
    }
}

/// Accumulates round-trip samples across one pass of the capture.
///
/// Per direction it keeps a pending-ack ledger mapping the sequence number
/// a future ack will carry to the capture time that range was sent. The
/// ledger only grows; a recurring key (retransmission) overwrites the
/// earlier entry, so the most recent send wins.
#[derive(Debug, Default)]
pub struct RttEstimator {
    latest_syn_time: Option<u64>,
    handshake: Option<u64>,
    pending: [HashMap<u32, u64>; 2],
    min_by_acker: [Option<u64>; 2],
}

impl RttEstimator {
    pub fn observe(&mut self, dir: Direction, seg: &Segment) {
        if seg.flags.is_exactly(TcpFlags::SYN) {
            self.latest_syn_time = Some(seg.capture_time);
        } else if seg.flags.is_exactly(TcpFlags::SYN | TcpFlags::ACK) {
            if let Some(syn_at) = self.latest_syn_time {
                self.handshake = Some(seg.capture_time.saturating_sub(syn_at));
            }
        }

        let advance = seg.seq_space_len();
        if advance > 0 {
            self.pending[dir.index()].insert(seg.seq.wrapping_add(advance), seg.capture_time);
        }

        if seg.flags.contains(TcpFlags::ACK) {
            if let Some(&sent_at) = self.pending[dir.opposite().index()].get(&seg.ack) {
                let sample = seg.capture_time.saturating_sub(sent_at);
                trace!(?dir, sample_us = sample, "ack-paired rtt sample");
                let min = &mut self.min_by_acker[dir.index()];
                *min = Some(min.map_or(sample, |m| m.min(sample)));
            }
        }
    }

    /// The minimum over whichever components were observed. A capture with
    /// no handshake and no acknowledged data yields no estimate at all.
    pub fn finish(self) -> Result<RttEstimate, AnalysisError> {
        let client_min = self.min_by_acker[Direction::ClientToServer.index()];
        let server_min = self.min_by_acker[Direction::ServerToClient.index()];
        let rtt_us = [self.handshake, client_min, server_min]
            .into_iter()
            .flatten()
            .min()
            .ok_or(AnalysisError::NoRttSample)?;
        Ok(RttEstimate {
            rtt_us,
            handshake_us: self.handshake,
            client_min_us: client_min,
            server_min_us: server_min,
        })
    }
}
