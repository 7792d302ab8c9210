//! Just enough Ethernet/IPv4/TCP decoding to populate a Segment.

use std::net::Ipv4Addr;

use crate::capture::{Segment, TcpFlags, parse_timestamp_option};

const ETH_HEADER_LEN: usize = 14;
const ETHERTYPE_IPV4: u16 = 0x0800;
const IP_MIN_HEADER_LEN: usize = 20;
const IP_PROTO_TCP: u8 = 6;
const TCP_MIN_HEADER_LEN: usize = 20;

/// Decodes one captured frame into a Segment. `None` means the frame is
/// not IPv4/TCP or too mangled to use; the reader skips such frames.
pub fn decode_frame(capture_time: u64, data: &[u8]) -> Option<Segment> {
    if data.len() < ETH_HEADER_LEN {
        return None;
    }
    let ethertype = u16::from_be_bytes([data[12], data[13]]);
    if ethertype != ETHERTYPE_IPV4 {
        return None;
    }

    let ip = &data[ETH_HEADER_LEN..];
    if ip.len() < IP_MIN_HEADER_LEN || ip[0] >> 4 != 4 {
        return None;
    }
    let ip_header_len = ((ip[0] & 0x0f) as usize) * 4;
    let total_len = u16::from_be_bytes([ip[2], ip[3]]) as usize;
    if ip_header_len < IP_MIN_HEADER_LEN || total_len < ip_header_len || ip.len() < ip_header_len {
        return None;
    }
    // A non-first fragment carries payload bytes where a TCP header would
    // be expected.
    let fragment_offset = u16::from_be_bytes([ip[6], ip[7]]) & 0x1fff;
    if fragment_offset != 0 {
        return None;
    }
    if ip[9] != IP_PROTO_TCP {
        return None;
    }
    let src_addr = Ipv4Addr::new(ip[12], ip[13], ip[14], ip[15]);
    let dst_addr = Ipv4Addr::new(ip[16], ip[17], ip[18], ip[19]);

    // The snaplen may have cut the frame short of the IP total length;
    // payload_len still comes from the headers, options parsing copes with
    // a truncated slice.
    let tcp = &ip[ip_header_len..total_len.min(ip.len())];
    if tcp.len() < TCP_MIN_HEADER_LEN {
        return None;
    }
    let tcp_header_len = ((tcp[12] >> 4) as usize) * 4;
    if tcp_header_len < TCP_MIN_HEADER_LEN {
        return None;
    }
    let payload_len = ((total_len - ip_header_len).saturating_sub(tcp_header_len)) as u32;

    let options = &tcp[TCP_MIN_HEADER_LEN..tcp_header_len.min(tcp.len())];

    Some(Segment {
        capture_time,
        src_addr,
        dst_addr,
        src_port: u16::from_be_bytes([tcp[0], tcp[1]]),
        dst_port: u16::from_be_bytes([tcp[2], tcp[3]]),
        flags: TcpFlags(tcp[13]),
        seq: u32::from_be_bytes([tcp[4], tcp[5], tcp[6], tcp[7]]),
        ack: u32::from_be_bytes([tcp[8], tcp[9], tcp[10], tcp[11]]),
        payload_len,
        tcp_timestamp: parse_timestamp_option(options),
    })
}
