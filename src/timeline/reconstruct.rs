//! Second pass: assigns every segment an adjusted send/receive time.

use crate::analyze::{ClockModel, Direction, Flow, RttEstimate};
use crate::capture::Segment;

use super::TimelineEvent;

/// Walks the segment sequence again and computes one event per segment,
/// in capture order.
///
/// The capture point is assumed colocated with the client: a client
/// segment's capture time is taken as its send time and the server is
/// assumed to receive it half an RTT later; a server segment's capture
/// time is its receive time and its send time comes from the server's
/// timestamp clock model, falling back to the symmetric rtt/2 offset when
/// no model applies. Reconstructed times may be locally non-monotonic
/// after skew correction; they are deliberately not re-sorted.
#[tracing::instrument(skip_all, fields(segments = segments.len()))]
pub fn reconstruct_timeline(
    segments: &[Segment],
    flow: &Flow,
    rtt: &RttEstimate,
    clock: &ClockModel,
) -> Vec<TimelineEvent> {
    let Some(first) = segments.first() else {
        return Vec::new();
    };
    let start_time = first.capture_time;
    let half_rtt = rtt.secs() / 2.0;

    segments
        .iter()
        .map(|seg| {
            let dir = flow.direction_of(seg);
            let recv_ts = seg.capture_time.saturating_sub(start_time) as f64 / 1e6;

            let (send_time, receive_time) = match dir {
                Direction::ClientToServer => (recv_ts, recv_ts + half_rtt),
                Direction::ServerToClient => {
                    let send = server_send_time(seg, clock, start_time, half_rtt)
                        .unwrap_or(recv_ts - half_rtt);
                    (send, recv_ts)
                }
            };

            let (relative_seq, relative_ack) = relative_numbers(seg, dir, flow);

            TimelineEvent {
                direction: dir,
                send_time,
                receive_time,
                flags_label: seg.flags.label(),
                relative_seq,
                relative_ack,
                payload_len: seg.payload_len,
            }
        })
        .collect()
}

/// Timestamp-based send time for a server segment; `None` selects the
/// symmetric rtt/2 fallback (no flow-wide timestamp support, no fitted
/// server clock, or this segment lacks the option).
fn server_send_time(
    seg: &Segment,
    clock: &ClockModel,
    start_time: u64,
    half_rtt: f64,
) -> Option<f64> {
    if !clock.has_timestamp_support {
        return None;
    }
    let model = clock.server?;
    let ts = seg.tcp_timestamp?;
    let elapsed = ts.value.wrapping_sub(model.origin_ts_value) as f64 / model.ts_per_sec;
    let origin_offset = model.origin_real_time.saturating_sub(start_time) as f64 / 1e6;
    Some(elapsed + origin_offset - half_rtt)
}

fn relative_numbers(seg: &Segment, dir: Direction, flow: &Flow) -> (u32, u32) {
    let (Some(client_isn), Some(server_isn)) = (flow.client_isn, flow.server_isn) else {
        return (0, 0);
    };
    let (own_isn, peer_isn) = match dir {
        Direction::ClientToServer => (client_isn, server_isn),
        Direction::ServerToClient => (server_isn, client_isn),
    };
    (seg.seq.wrapping_sub(own_isn), seg.ack.wrapping_sub(peer_isn))
}
