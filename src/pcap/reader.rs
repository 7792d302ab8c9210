//! Classic-pcap record walking.

use std::io::Read;

use tracing::debug;

use super::{PcapError, decode_frame};
use crate::capture::Segment;

const MAGIC_NATIVE: u32 = 0xa1b2_c3d4;
const MAGIC_SWAPPED: u32 = 0xd4c3_b2a1;
const GLOBAL_HEADER_LEN: usize = 24;
const RECORD_HEADER_LEN: usize = 16;
const LINKTYPE_ETHERNET: u32 = 1;
// Well above any Ethernet frame; a record claiming more is corrupt, not a
// reason to allocate gigabytes.
const MAX_RECORD_BYTES: usize = 256 * 1024;

/// Reads a whole classic-pcap stream into the replayable segment sequence
/// both analysis passes share.
///
/// Validates the global header (magic in either byte order, Ethernet link
/// type), then yields one record per fixed-size header plus payload.
/// Frames that do not decode to IPv4/TCP are skipped, not errors.
pub fn read_segments<R: Read>(mut input: R) -> Result<Vec<Segment>, PcapError> {
    let mut header = [0u8; GLOBAL_HEADER_LEN];
    input.read_exact(&mut header)?;

    let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let swapped = match magic {
        MAGIC_NATIVE => false,
        MAGIC_SWAPPED => true,
        other => return Err(PcapError::BadMagic(other)),
    };

    let linktype = read_u32(&header, 20, swapped);
    if linktype != LINKTYPE_ETHERNET {
        return Err(PcapError::UnsupportedLinkType(linktype));
    }

    let mut segments = Vec::new();
    let mut frame = 0u64;
    while let Some(record) = read_record_header(&mut input)? {
        let ts_sec = read_u32(&record, 0, swapped) as u64;
        let ts_usec = read_u32(&record, 4, swapped) as u64;
        let caplen = read_u32(&record, 8, swapped) as usize;
        if caplen > MAX_RECORD_BYTES {
            return Err(PcapError::OversizedRecord(caplen as u32));
        }

        let mut data = vec![0u8; caplen];
        input
            .read_exact(&mut data)
            .map_err(|_| PcapError::Truncated)?;

        let capture_time = ts_sec * 1_000_000 + ts_usec;
        match decode_frame(capture_time, &data) {
            Some(seg) => segments.push(seg),
            None => debug!(frame, caplen, "skipping non-TCP frame"),
        }
        frame += 1;
    }

    debug!(frames = frame, segments = segments.len(), "capture read");
    Ok(segments)
}

/// Clean end of stream between records is `Ok(None)`; a partial record
/// header is a truncation error.
fn read_record_header<R: Read>(input: &mut R) -> Result<Option<[u8; RECORD_HEADER_LEN]>, PcapError> {
    let mut buf = [0u8; RECORD_HEADER_LEN];
    let mut filled = 0usize;
    while filled < buf.len() {
        let n = input.read(&mut buf[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(PcapError::Truncated);
        }
        filled += n;
    }
    Ok(Some(buf))
}

fn read_u32(buf: &[u8], at: usize, swapped: bool) -> u32 {
    let bytes = [buf[at], buf[at + 1], buf[at + 2], buf[at + 3]];
    if swapped {
        u32::from_be_bytes(bytes)
    } else {
        u32::from_le_bytes(bytes)
    }
}
