use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;
use tcp_timeline::analyze::{Analysis, Direction, EndpointClock, classify_and_estimate};
use tcp_timeline::pcap::read_segments;
use tcp_timeline::timeline::{TimelineEvent, reconstruct_timeline};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "tcp-timeline",
    about = "Reconstruct per-endpoint send/receive timing of one TCP connection from a pcap capture"
)]
struct Args {
    /// Path to the capture file (classic pcap, one TCP connection)
    capture: PathBuf,

    /// Emit the summary and events as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Output<'a> {
    summary: &'a Analysis,
    events: &'a [TimelineEvent],
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(&args.capture)?;
    let segments = read_segments(BufReader::new(file))?;
    info!(segments = segments.len(), "capture loaded");

    let analysis = classify_and_estimate(&segments)?;
    let events = reconstruct_timeline(&segments, &analysis.flow, &analysis.rtt, &analysis.clock);

    if args.json {
        let out = Output {
            summary: &analysis,
            events: &events,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let flow = &analysis.flow;
    println!(
        "client {}:{} server {}:{} rtt {:.6}s client_clock {} server_clock {}",
        flow.client_addr,
        flow.client_port,
        flow.server_addr,
        flow.server_port,
        analysis.rtt.secs(),
        clock_label(analysis.clock.client),
        clock_label(analysis.clock.server),
    );
    for ev in &events {
        let arrow = match ev.direction {
            Direction::ClientToServer => "->",
            Direction::ServerToClient => "<-",
        };
        println!(
            "{:>12.6} {:>12.6} {} {:<16} seq={} ack={} len={}",
            ev.send_time,
            ev.receive_time,
            arrow,
            ev.flags_label,
            ev.relative_seq,
            ev.relative_ack,
            ev.payload_len
        );
    }
    Ok(())
}

fn clock_label(clock: Option<EndpointClock>) -> String {
    match clock {
        Some(c) => format!("{:.1} ts/s", c.ts_per_sec),
        None => "n/a".to_string(),
    }
}
