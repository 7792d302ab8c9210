//! The normalized view of one captured TCP frame.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// TCP header flag bits, in wire bit order (FIN is bit 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TcpFlags(pub u8);

impl TcpFlags {
    pub const FIN: u8 = 0x01;
    pub const SYN: u8 = 0x02;
    pub const RST: u8 = 0x04;
    pub const PSH: u8 = 0x08;
    pub const ACK: u8 = 0x10;
    pub const URG: u8 = 0x20;
    pub const ECE: u8 = 0x40;
    pub const CWR: u8 = 0x80;

    const NAMES: [&'static str; 8] = ["FIN", "SYN", "RST", "PSH", "ACK", "URG", "ECE", "CWR"];

    pub fn contains(self, mask: u8) -> bool {
        self.0 & mask == mask
    }

    /// True when the flag byte is exactly `mask`, nothing else set.
    pub fn is_exactly(self, mask: u8) -> bool {
        self.0 == mask
    }

    /// Comma-joined names of the set flags, lowest bit first.
    pub fn label(self) -> String {
        let mut out = String::new();
        for (bit, name) in Self::NAMES.iter().enumerate() {
            if self.0 & (1 << bit) != 0 {
                if !out.is_empty() {
                    out.push(',');
                }
                out.push_str(name);
            }
        }
        out
    }
}

/// TCP timestamp option payload: the sender's clock value plus an echo of
/// the peer's last-seen value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpTimestamp {
    pub value: u32,
    pub echo: u32,
}

/// One decoded TCP frame. Produced once by the capture decoder, immutable
/// from then on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Microseconds since the capture epoch. Accepted as monotonically
    /// non-decreasing across the stream; not enforced.
    pub capture_time: u64,
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
    pub src_port: u16,
    pub dst_port: u16,
    pub flags: TcpFlags,
    pub seq: u32,
    pub ack: u32,
    /// Bytes of TCP payload, header excluded.
    pub payload_len: u32,
    /// Absent when the frame carries no TCP timestamp option.
    pub tcp_timestamp: Option<TcpTimestamp>,
}

impl Segment {
    /// How far this segment advances its direction's sequence space.
    /// SYN and FIN each consume one sequence number on top of the payload.
    pub fn seq_space_len(&self) -> u32 {
        let ctl = if self.flags.contains(TcpFlags::SYN) || self.flags.contains(TcpFlags::FIN) {
            1
        } else {
            0
        };
        self.payload_len + ctl
    }
}
