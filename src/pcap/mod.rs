//! Classic-pcap reading, down to exactly the Segment fields the analysis
//! passes need.

mod decode;
mod reader;

pub use decode::decode_frame;
pub use reader::read_segments;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PcapError {
    #[error("io error reading capture: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a pcap capture (magic {0:#010x})")]
    BadMagic(u32),
    #[error("unsupported link type {0}, only Ethernet (1) is handled")]
    UnsupportedLinkType(u32),
    #[error("capture ends mid-record")]
    Truncated,
    #[error("record claims {0} captured bytes, past any plausible snapshot length")]
    OversizedRecord(u32),
}
