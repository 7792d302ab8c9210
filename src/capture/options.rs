//! TCP option walking, only as far as the timestamp option.

use super::TcpTimestamp;

const KIND_EOL: u8 = 0;
const KIND_NOP: u8 = 1;
const KIND_TIMESTAMP: u8 = 8;
const TIMESTAMP_OPT_LEN: usize = 10;

/// Extracts the first TCP timestamp option from an options slice.
///
/// Walks type-length-value records: kind 0 ends the options, kind 1 has an
/// implicit length of one, everything else carries a length byte. A record
/// that is truncated or declares a length shorter than two stops the walk;
/// the timestamp is then reported as absent rather than failing the segment.
pub fn parse_timestamp_option(opts: &[u8]) -> Option<TcpTimestamp> {
    let mut i = 0usize;
    while i < opts.len() {
        match opts[i] {
            KIND_EOL => return None,
            KIND_NOP => i += 1,
            kind => {
                let len = *opts.get(i + 1)? as usize;
                if len < 2 || i + len > opts.len() {
                    return None;
                }
                if kind == KIND_TIMESTAMP && len == TIMESTAMP_OPT_LEN {
                    return Some(TcpTimestamp {
                        value: read_u32_be(opts, i + 2),
                        echo: read_u32_be(opts, i + 6),
                    });
                }
                i += len;
            }
        }
    }
    None
}

// Caller has bounds-checked `at + 4 <= buf.len()`.
fn read_u32_be(buf: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}
