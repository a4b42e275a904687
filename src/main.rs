use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;

use noobs::aggregation::aggregate_series;
use noobs::aggregation::slugs::series_slugs;
use noobs::classification::classify_tournament;
use noobs::classification::CLASSIFICATION_SLUG;
use noobs::fetching::rate_gate::RateGate;
use noobs::fetching::transport::ReqwestTransport;
use noobs::graphql::ClientConfig;
use noobs::graphql::GraphQlClient;
use noobs::graphql::DEFAULT_ENDPOINT;
use noobs::storage::archive_previous;
use noobs::storage::load_reference;
use noobs::storage::persist_aggregate;
use noobs::storage::SnapshotPaths;

#[derive(Debug, Parser)]
#[command(name = "noobs", version)]
#[command(about = "Vet only-noobs entrants against the series' history")]
struct Args {
  /// start.gg API key
  #[arg(long)]
  api_key: String,

  /// Directory holding the snapshot files
  #[arg(long, default_value = ".")]
  data_dir: PathBuf,

  /// GraphQL endpoint
  #[arg(long, default_value = DEFAULT_ENDPOINT)]
  endpoint: String,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Walk the whole series and write the snapshot files
  Aggregate {
    /// Keep existing snapshots under a timestamped name instead of
    /// overwriting them
    #[arg(long)]
    archive_previous: bool,
  },
  /// Split a tournament's participants into valid and invalid noobs
  Classify {
    #[arg(long, default_value = CLASSIFICATION_SLUG)]
    slug: String,
  },
  /// Print a tournament's name and participant total
  Total {
    #[arg(long)]
    slug: String,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or("info"),
  )
  .init();
  let args = Args::parse();

  let client = GraphQlClient::new(
    ReqwestTransport::new()?,
    ClientConfig {
      endpoint: args.endpoint,
      ..ClientConfig::new(&args.api_key)
    },
  )?;
  let paths = SnapshotPaths::in_dir(&args.data_dir);

  match args.command {
    Command::Aggregate { archive_previous: archive } => {
      let slugs = series_slugs();
      log::info!("aggregating {} tournaments", slugs.len());
      let aggregate = aggregate_series(&client, &RateGate::default(), &slugs)
        .await
        .context("aggregation aborted, nothing was written")?;

      if archive {
        archive_previous(&paths).context("unable to archive snapshots")?;
      }
      persist_aggregate(&paths, &aggregate)
        .context("unable to write snapshots")?;
    }
    Command::Classify { slug } => {
      let reference = load_reference(&paths).with_context(|| {
        format!(
          "unable to load snapshots from {:?}, run `aggregate` first",
          args.data_dir
        )
      })?;
      let classification = classify_tournament(&client, &reference, &slug)
        .await
        .with_context(|| format!("unable to classify {slug}"))?;

      println!("{classification}");
    }
    Command::Total { slug } => {
      let summary = client
        .fetch_tournament_summary(&slug)
        .await
        .with_context(|| format!("unable to fetch {slug}"))?;

      match summary.participants_total {
        Some(total) => println!("{}: {total}", summary.name),
        None => println!("{}: unknown", summary.name),
      }
    }
  }

  Ok(())
}
