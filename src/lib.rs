//! Passive latency and clock-skew estimation for a single TCP connection.
//!
//! A capture taken at one observation point only records arrival times at
//! that point; it cannot directly say when the other endpoint sent or
//! received a segment. This crate reconstructs a unified timeline by
//! combining three signals: the handshake round-trip time, a running
//! minimum RTT from sequence/ack pairing over the whole capture, and a
//! linear fit of each endpoint's TCP timestamp clock against capture time.
//!
//! Stated precondition: the capture point is assumed colocated with the
//! client, so client-sent segments' capture time approximates their send
//! time and server-sent segments' capture time approximates their receive
//! time. This is inherent to single-vantage-point capture, not inferred.

pub mod analyze;
pub mod capture;
pub mod pcap;
pub mod timeline;

#[cfg(test)]
mod test;
