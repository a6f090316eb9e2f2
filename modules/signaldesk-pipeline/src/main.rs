use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use oracle_client::GeminiOracle;
use signaldesk_common::Config;
use signaldesk_pipeline::{Desk, IngestOutcome, JsonFileStore, StdoutChannel};

#[derive(Parser)]
#[command(name = "signaldesk", about = "Signal intelligence desk")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one raw input through the pipeline.
    Ingest {
        /// Raw text or a URL-bearing snippet.
        text: Vec<String>,
    },
    /// Approve a draft for publication.
    Approve { draft_id: String },
    /// Reject a draft.
    Reject {
        draft_id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Regenerate a draft with optional feedback.
    Regenerate {
        draft_id: String,
        #[arg(long)]
        feedback: Option<String>,
    },
    /// List drafts awaiting review.
    Drafts,
    /// List story clusters.
    Stories,
    /// Show the periodic ingestion tasks.
    Tasks,
    /// Move the impact threshold.
    Calibrate {
        #[arg(long, allow_hyphen_values = true)]
        delta: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("signaldesk=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let needs_oracle = matches!(
        cli.command,
        Command::Ingest { .. } | Command::Regenerate { .. }
    );
    let config = if needs_oracle {
        Config::from_env()
    } else {
        Config::read_only_from_env()
    };

    let oracle = Arc::new(GeminiOracle::new(
        &config.oracle_api_key,
        &config.oracle_model,
    ));
    let store = Arc::new(JsonFileStore::new(config.state_path.clone()));
    let channel = Arc::new(StdoutChannel);

    let mut desk = Desk::open(oracle, channel, store).await?;

    match cli.command {
        Command::Ingest { text } => {
            let raw = text.join(" ");
            match desk.ingest(&raw).await? {
                IngestOutcome::Committed {
                    signal_id,
                    draft_id,
                    gated,
                } => {
                    if gated {
                        println!("{signal_id} committed; {draft_id} auto-filtered below threshold");
                    } else {
                        println!("{signal_id} committed; {draft_id} awaiting review");
                    }
                }
                IngestOutcome::Busy => println!("busy: an ingest run is already in flight"),
            }
            if let Some(metric) = desk.metrics.last() {
                for node in &metric.node_breakdown {
                    println!("  {:<12} {}ms", node.node, node.latency_ms);
                }
            }
        }
        Command::Approve { draft_id } => {
            if desk.approve(&draft_id).await {
                println!("{draft_id} published");
            } else {
                println!("{draft_id} not transitioned (unknown or terminal)");
            }
        }
        Command::Reject { draft_id, reason } => {
            if desk.reject(&draft_id, reason).await {
                println!("{draft_id} rejected");
            } else {
                println!("{draft_id} not transitioned (unknown or terminal)");
            }
        }
        Command::Regenerate { draft_id, feedback } => {
            if desk.regenerate(&draft_id, feedback.as_deref()).await? {
                let count = desk
                    .state
                    .draft(&draft_id)
                    .map(|d| d.regeneration_count)
                    .unwrap_or_default();
                println!("{draft_id} regenerated (attempt {count})");
            } else {
                println!("{draft_id} not regenerated (unknown or published)");
            }
        }
        Command::Drafts => {
            for draft in &desk.state.drafts {
                println!(
                    "{:<22} {:<20} regen {}  {}",
                    draft.draft_id,
                    draft.status.to_string(),
                    draft.regeneration_count,
                    truncate(&draft.content, 60),
                );
            }
        }
        Command::Stories => {
            for story in &desk.state.stories {
                println!(
                    "{:<24} {:>2} signals  {}",
                    story.story_id,
                    story.signals.len(),
                    story.title,
                );
            }
        }
        Command::Tasks => {
            for task in &desk.tasks {
                println!(
                    "{:<16} every {:>2}min  next {}",
                    task.label,
                    task.interval_minutes,
                    task.next_run.format("%H:%M"),
                );
            }
        }
        Command::Calibrate { delta } => {
            let threshold = desk.adjust_calibration(delta, "manual");
            println!("impact threshold now {threshold}");
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}…")
    }
}
