//! Per-endpoint linear fit of the TCP timestamp clock against capture time.

use serde::{Deserialize, Serialize};

use super::Direction;
use crate::capture::Segment;

/// Linear mapping from one endpoint's timestamp clock to capture time,
/// fitted between its first and last timestamped segment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EndpointClock {
    /// Timestamp value of the endpoint's first timestamped segment.
    pub origin_ts_value: u32,
    /// Capture time of that segment, microseconds.
    pub origin_real_time: u64,
    /// Rate of the endpoint's timestamp clock, units per real second.
    pub ts_per_sec: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockModel {
    pub client: Option<EndpointClock>,
    pub server: Option<EndpointClock>,
    /// False when either endpoint never carried the timestamp option; the
    /// whole flow then degrades to the symmetric rtt/2 model. Partial
    /// support is not modeled.
    pub has_timestamp_support: bool,
}

#[derive(Debug, Default)]
struct EndpointSamples {
    first: Option<(u32, u64)>,
    last: Option<(u32, u64)>,
}

impl EndpointSamples {
    fn observe(&mut self, ts_value: u32, at: u64) {
        if self.first.is_none() {
            self.first = Some((ts_value, at));
        } else {
            self.last = Some((ts_value, at));
        }
    }

    /// Needs two timestamped segments at distinct capture times; a single
    /// instant fits no rate.
    fn fit(&self) -> Option<EndpointClock> {
        let (origin_ts, origin_at) = self.first?;
        let (last_ts, last_at) = self.last?;
        if last_at == origin_at {
            return None;
        }
        let elapsed_secs = (last_at - origin_at) as f64 / 1e6;
        Some(EndpointClock {
            origin_ts_value: origin_ts,
            origin_real_time: origin_at,
            ts_per_sec: last_ts.wrapping_sub(origin_ts) as f64 / elapsed_secs,
        })
    }
}

/// Gathers each endpoint's first and last timestamped segment during the
/// estimation pass.
#[derive(Debug, Default)]
pub struct ClockModelBuilder {
    endpoints: [EndpointSamples; 2],
}

impl ClockModelBuilder {
    pub fn observe(&mut self, dir: Direction, seg: &Segment) {
        if let Some(ts) = seg.tcp_timestamp {
            self.endpoints[dir.index()].observe(ts.value, seg.capture_time);
        }
    }

    pub fn finish(self) -> ClockModel {
        let client = &self.endpoints[Direction::ClientToServer.index()];
        let server = &self.endpoints[Direction::ServerToClient.index()];
        ClockModel {
            has_timestamp_support: client.first.is_some() && server.first.is_some(),
            client: client.fit(),
            server: server.fit(),
        }
    }
}
