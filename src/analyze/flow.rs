//! Client/server role assignment from the segment stream.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capture::{Segment, TcpFlags};

/// Which endpoint sent a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ClientToServer,
    ServerToClient,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::ClientToServer => Direction::ServerToClient,
            Direction::ServerToClient => Direction::ClientToServer,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Direction::ClientToServer => 0,
            Direction::ServerToClient => 1,
        }
    }
}

/// The classified connection. Frozen before the reconstruction pass starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub client_addr: Ipv4Addr,
    pub client_port: u16,
    pub server_addr: Ipv4Addr,
    pub server_port: u16,
    /// First sequence number seen from each side, once roles are fixed.
    pub client_isn: Option<u32>,
    pub server_isn: Option<u32>,
    /// False when no SYN was seen and the first segment's direction was
    /// used as a permanent fallback (degraded confidence).
    pub syn_observed: bool,
}

impl Flow {
    pub fn direction_of(&self, seg: &Segment) -> Direction {
        if seg.src_addr == self.client_addr && seg.src_port == self.client_port {
            Direction::ClientToServer
        } else {
            Direction::ServerToClient
        }
    }
}

/// Incremental role assignment over capture order.
///
/// The first segment provisionally makes its source the client; the first
/// segment whose flags are exactly SYN reassigns the roles to its source
/// and destination, after which they never change. Segments processed
/// before a reassignment are not revisited.
#[derive(Debug, Default)]
pub struct FlowClassifier {
    flow: Option<Flow>,
}

impl FlowClassifier {
    /// Feeds one segment; reports its direction under the roles as
    /// assigned after this segment.
    pub fn observe(&mut self, seg: &Segment) -> Direction {
        let Some(flow) = self.flow.as_mut() else {
            let syn = seg.flags.is_exactly(TcpFlags::SYN);
            self.flow = Some(Flow {
                client_addr: seg.src_addr,
                client_port: seg.src_port,
                server_addr: seg.dst_addr,
                server_port: seg.dst_port,
                client_isn: Some(seg.seq),
                server_isn: None,
                syn_observed: syn,
            });
            return Direction::ClientToServer;
        };

        if seg.flags.is_exactly(TcpFlags::SYN) {
            if !flow.syn_observed
                && (seg.src_addr != flow.client_addr || seg.src_port != flow.client_port)
            {
                // The first SYN overrides the provisional first-segment
                // guess; ISNs recorded under the old roles are stale.
                // Once a SYN has fixed the roles, later SYNs cannot move
                // them.
                debug!(
                    old_client = %flow.client_addr,
                    new_client = %seg.src_addr,
                    "SYN reassigns client role"
                );
                flow.client_addr = seg.src_addr;
                flow.client_port = seg.src_port;
                flow.server_addr = seg.dst_addr;
                flow.server_port = seg.dst_port;
                flow.client_isn = Some(seg.seq);
                flow.server_isn = None;
            }
            flow.syn_observed = true;
        }

        let dir = flow.direction_of(seg);
        match dir {
            Direction::ClientToServer if flow.client_isn.is_none() => {
                flow.client_isn = Some(seg.seq);
            }
            Direction::ServerToClient if flow.server_isn.is_none() => {
                flow.server_isn = Some(seg.seq);
            }
            _ => {}
        }
        dir
    }

    /// The classified flow, or `None` when no segment was observed.
    pub fn finish(self) -> Option<Flow> {
        self.flow
    }
}
