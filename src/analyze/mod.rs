//! First pass over the capture: flow classification, RTT estimation and
//! clock fitting, fused into a single ordered walk.

mod clock;
mod flow;
mod rtt;

pub use clock::{ClockModel, ClockModelBuilder, EndpointClock};
pub use flow::{Direction, Flow, FlowClassifier};
pub use rtt::{RttEstimate, RttEstimator};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::capture::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The capture holds no segments at all.
    #[error("capture contains no TCP segments")]
    NoFlowIdentified,
    /// Neither a handshake nor any acknowledged data was observed, so the
    /// timeline math has no RTT to work with.
    #[error("no round-trip sample in capture (no handshake, no acknowledged data)")]
    NoRttSample,
}

/// One-time summary handed to the consumer before any timeline event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub flow: Flow,
    pub rtt: RttEstimate,
    pub clock: ClockModel,
}

/// Walks the segment sequence once, producing the frozen flow, the RTT
/// estimate and the per-endpoint clock models.
///
/// Roles are assigned incrementally, so segments before a late SYN are
/// attributed under the provisional roles; they are not revisited. The
/// pending-ack ledgers live only inside this pass and are dropped with it.
#[tracing::instrument(skip(segments), fields(segments = segments.len()))]
pub fn classify_and_estimate(segments: &[Segment]) -> Result<Analysis, AnalysisError> {
    let mut classifier = FlowClassifier::default();
    let mut rtt = RttEstimator::default();
    let mut clock = ClockModelBuilder::default();

    for seg in segments {
        let dir = classifier.observe(seg);
        rtt.observe(dir, seg);
        clock.observe(dir, seg);
    }

    let flow = classifier.finish().ok_or(AnalysisError::NoFlowIdentified)?;
    let rtt = rtt.finish()?;
    let clock = clock.finish();

    info!(
        client = %flow.client_addr,
        client_port = flow.client_port,
        server = %flow.server_addr,
        server_port = flow.server_port,
        rtt_us = rtt.rtt_us,
        timestamp_support = clock.has_timestamp_support,
        "flow classified"
    );

    Ok(Analysis { flow, rtt, clock })
}
