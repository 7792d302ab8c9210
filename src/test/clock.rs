use crate::analyze::{ClockModelBuilder, Direction, classify_and_estimate};
use crate::capture::TcpFlags;

use super::support::SegBuilder;

fn relative_error(got: f64, want: f64) -> f64 {
    ((got - want) / want).abs()
}

/// An endpoint ticking at exactly 1000 units/sec must fit back to that
/// rate within floating-point tolerance.
#[test]
fn linear_clock_recovers_injected_rate() {
    let rate = 1000.0_f64;
    let mut builder = ClockModelBuilder::default();
    for i in 0..10u64 {
        let at = i * 250_000; // 0.25s steps
        let value = 7_000 + (at as f64 / 1e6 * rate) as u32;
        builder.observe(
            Direction::ClientToServer,
            &SegBuilder::client(at).flags(TcpFlags::ACK).ts(value).build(),
        );
        builder.observe(
            Direction::ServerToClient,
            &SegBuilder::server(at + 100).flags(TcpFlags::ACK).ts(90_000 + i as u32 * 250).build(),
        );
    }

    let model = builder.finish();
    assert!(model.has_timestamp_support);

    let client = model.client.expect("client fit");
    assert_eq!(client.origin_ts_value, 7_000);
    assert_eq!(client.origin_real_time, 0);
    assert!(relative_error(client.ts_per_sec, rate) < 1e-9, "client rate {}", client.ts_per_sec);

    let server = model.server.expect("server fit");
    assert!(relative_error(server.ts_per_sec, rate) < 1e-9, "server rate {}", server.ts_per_sec);
}

#[test]
fn fit_uses_first_and_last_sample() {
    let mut builder = ClockModelBuilder::default();
    // A noisy middle sample must not matter: only first and last count.
    for (at, value) in [(0u64, 100u32), (500_000, 9_999), (1_000_000, 1_100)] {
        builder.observe(
            Direction::ServerToClient,
            &SegBuilder::server(at).flags(TcpFlags::ACK).ts(value).build(),
        );
        builder.observe(
            Direction::ClientToServer,
            &SegBuilder::client(at).flags(TcpFlags::ACK).ts(value).build(),
        );
    }

    let server = builder.finish().server.expect("server fit");
    assert!(relative_error(server.ts_per_sec, 1000.0) < 1e-9);
}

#[test]
fn missing_option_on_one_side_disables_support_flow_wide() {
    let mut builder = ClockModelBuilder::default();
    builder.observe(
        Direction::ClientToServer,
        &SegBuilder::client(0).flags(TcpFlags::ACK).ts(1).build(),
    );
    builder.observe(
        Direction::ClientToServer,
        &SegBuilder::client(1_000_000).flags(TcpFlags::ACK).ts(1001).build(),
    );
    // The server never carries the option.
    builder.observe(
        Direction::ServerToClient,
        &SegBuilder::server(500_000).flags(TcpFlags::ACK).build(),
    );

    let model = builder.finish();
    assert!(!model.has_timestamp_support);
    // The client fit itself still exists; support is what gates its use.
    assert!(model.client.is_some());
    assert!(model.server.is_none());
}

#[test]
fn single_timestamped_segment_fits_no_rate() {
    let mut builder = ClockModelBuilder::default();
    builder.observe(
        Direction::ServerToClient,
        &SegBuilder::server(0).flags(TcpFlags::ACK).ts(42).build(),
    );
    builder.observe(
        Direction::ClientToServer,
        &SegBuilder::client(0).flags(TcpFlags::ACK).ts(1).build(),
    );
    builder.observe(
        Direction::ClientToServer,
        &SegBuilder::client(1_000_000).flags(TcpFlags::ACK).ts(1001).build(),
    );

    let model = builder.finish();
    // Both sides carried the option, so support holds; the server side just
    // could not be fitted.
    assert!(model.has_timestamp_support);
    assert!(model.server.is_none());
    assert!(model.client.is_some());
}

#[test]
fn identical_capture_times_fit_no_rate() {
    let mut builder = ClockModelBuilder::default();
    builder.observe(
        Direction::ServerToClient,
        &SegBuilder::server(5_000).flags(TcpFlags::ACK).ts(10).build(),
    );
    builder.observe(
        Direction::ServerToClient,
        &SegBuilder::server(5_000).flags(TcpFlags::ACK).ts(11).build(),
    );

    assert!(builder.finish().server.is_none());
}

#[test]
fn clock_model_flows_out_of_the_estimation_pass() {
    let rtt_us = 30_000u64;
    let segments = [
        SegBuilder::client(0).flags(TcpFlags::SYN).seq(100).ts(1_000).build(),
        SegBuilder::server(rtt_us)
            .flags(TcpFlags::SYN | TcpFlags::ACK)
            .seq(500)
            .ack(101)
            .ts(50_000)
            .build(),
        SegBuilder::client(2_000_000).flags(TcpFlags::ACK).seq(101).ack(501).ts(3_000).build(),
        SegBuilder::server(2_030_000).flags(TcpFlags::ACK).seq(501).ack(101).ts(52_000).build(),
    ];

    let analysis = classify_and_estimate(&segments).expect("analysis");
    assert!(analysis.clock.has_timestamp_support);
    let client = analysis.clock.client.expect("client fit");
    let server = analysis.clock.server.expect("server fit");
    assert!(relative_error(client.ts_per_sec, 1000.0) < 1e-9);
    assert!(relative_error(server.ts_per_sec, 1000.0) < 1e-9);
    assert_eq!(server.origin_ts_value, 50_000);
    assert_eq!(server.origin_real_time, rtt_us);
}
