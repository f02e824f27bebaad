use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use batch_ledger::engine::core::id::{BatchId, BatchIdGenerator, EventId, RetryPolicy};
use batch_ledger::logging;
use batch_ledger::shared::clock::SystemClock;
use batch_ledger::shared::config::load_settings;
use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "event-id-tool")]
#[command(about = "Inspect, build and stress-test packed event ids", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a packed 64-bit event id
    Decode { raw: u64 },
    /// Pack an event id from its parts
    Encode {
        /// RFC 3339 timestamp, truncated to 10ms
        #[arg(long)]
        at: DateTime<Utc>,
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..=511))]
        batch: u16,
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
        seq: u16,
    },
    /// Allocate batch ids from many tasks and check they never collide
    Stress {
        #[arg(long, default_value = "8")]
        tasks: usize,
        #[arg(long, default_value = "1000")]
        batches: usize,
    },
}

#[derive(Serialize)]
struct IdReport {
    raw: u64,
    hex: String,
    timestamp: String,
    batch_sequence: u16,
    event_sequence: u16,
}

impl From<EventId> for IdReport {
    fn from(id: EventId) -> Self {
        Self {
            raw: id.raw(),
            hex: format!("{:#018x}", id.raw()),
            timestamp: id.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true),
            batch_sequence: id.batch_id().sequence(),
            event_sequence: id.sequence(),
        }
    }
}

#[derive(Serialize)]
struct StressReport {
    tasks: usize,
    allocated: usize,
    unique: usize,
    first: Option<String>,
    last: Option<String>,
    elapsed_ms: u128,
}

fn print_report<T: Serialize>(report: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

async fn stress(
    tasks: usize,
    batches: usize,
    policy: RetryPolicy,
) -> anyhow::Result<StressReport> {
    let generator = Arc::new(BatchIdGenerator::with_policy(
        None,
        Arc::new(SystemClock),
        policy,
    ));
    let started = Instant::now();

    let mut handles = Vec::with_capacity(tasks);
    for _ in 0..tasks {
        let generator = Arc::clone(&generator);
        handles.push(tokio::spawn(async move {
            let mut issued = Vec::with_capacity(batches);
            for _ in 0..batches {
                issued.push(generator.get_batch().await?.batch_id());
            }
            Ok::<_, anyhow::Error>(issued)
        }));
    }

    let mut all: Vec<BatchId> = Vec::with_capacity(tasks * batches);
    for handle in handles {
        all.extend(handle.await??);
    }
    let unique: HashSet<BatchId> = all.iter().copied().collect();

    Ok(StressReport {
        tasks,
        allocated: all.len(),
        unique: unique.len(),
        first: unique.iter().min().map(ToString::to_string),
        last: unique.iter().max().map(ToString::to_string),
        elapsed_ms: started.elapsed().as_millis(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings()?;

    match cli.command {
        Command::Decode { raw } => {
            let id = EventId::from_raw(raw)?;
            print_report(&IdReport::from(id))?;
        }
        Command::Encode { at, batch, seq } => {
            let batch = BatchId::from_parts(at, batch)?;
            let id = EventId::with_sequence(batch, seq)?;
            print_report(&IdReport::from(id))?;
        }
        Command::Stress { tasks, batches } => {
            logging::init(&settings.logging)?;
            let policy = RetryPolicy::from(&settings.generator);
            info!(tasks, batches, "Starting batch id stress run");

            let report = stress(tasks, batches, policy).await?;
            print_report(&report)?;
            if report.unique != report.allocated {
                anyhow::bail!("{} duplicate batch ids", report.allocated - report.unique);
            }
        }
    }

    Ok(())
}
