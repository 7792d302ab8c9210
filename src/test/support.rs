//! Shared builders for synthetic captures.

use std::net::Ipv4Addr;

use crate::capture::{Segment, TcpFlags, TcpTimestamp};

pub const CLIENT: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
pub const SERVER: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);
pub const CLIENT_PORT: u16 = 40000;
pub const SERVER_PORT: u16 = 80;

pub struct SegBuilder {
    seg: Segment,
}

impl SegBuilder {
    /// A segment sent by the client at `at_us` microseconds.
    pub fn client(at_us: u64) -> Self {
        Self::between(at_us, CLIENT, CLIENT_PORT, SERVER, SERVER_PORT)
    }

    /// A segment sent by the server at `at_us` microseconds.
    pub fn server(at_us: u64) -> Self {
        Self::between(at_us, SERVER, SERVER_PORT, CLIENT, CLIENT_PORT)
    }

    pub fn between(
        at_us: u64,
        src_addr: Ipv4Addr,
        src_port: u16,
        dst_addr: Ipv4Addr,
        dst_port: u16,
    ) -> Self {
        SegBuilder {
            seg: Segment {
                capture_time: at_us,
                src_addr,
                dst_addr,
                src_port,
                dst_port,
                flags: TcpFlags(0),
                seq: 0,
                ack: 0,
                payload_len: 0,
                tcp_timestamp: None,
            },
        }
    }

    pub fn flags(mut self, bits: u8) -> Self {
        self.seg.flags = TcpFlags(bits);
        self
    }

    pub fn seq(mut self, seq: u32) -> Self {
        self.seg.seq = seq;
        self
    }

    pub fn ack(mut self, ack: u32) -> Self {
        self.seg.ack = ack;
        self
    }

    pub fn payload(mut self, len: u32) -> Self {
        self.seg.payload_len = len;
        self
    }

    pub fn ts(mut self, value: u32) -> Self {
        self.seg.tcp_timestamp = Some(TcpTimestamp { value, echo: 0 });
        self
    }

    pub fn build(self) -> Segment {
        self.seg
    }
}

/// The three-segment handshake every connection-shaped test starts from:
/// SYN at t=0, SYN|ACK at `rtt_us`, final ACK shortly after.
pub fn handshake(client_isn: u32, server_isn: u32, rtt_us: u64) -> Vec<Segment> {
    vec![
        SegBuilder::client(0).flags(TcpFlags::SYN).seq(client_isn).build(),
        SegBuilder::server(rtt_us)
            .flags(TcpFlags::SYN | TcpFlags::ACK)
            .seq(server_isn)
            .ack(client_isn.wrapping_add(1))
            .build(),
        SegBuilder::client(rtt_us + 500)
            .flags(TcpFlags::ACK)
            .seq(client_isn.wrapping_add(1))
            .ack(server_isn.wrapping_add(1))
            .build(),
    ]
}
