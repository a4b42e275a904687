use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use chrono::prelude::Utc;
use serde::de::DeserializeOwned;

use crate::aggregation::Aggregate;
use crate::common::Discriminator;
use crate::common::ReferenceTable;
use crate::error::Error;
use crate::error::Result;

pub const FREQUENCIES_FILE: &str = "discriminators.json";
pub const WINNERS_FILE: &str = "winnerDiscriminators.json";
pub const ENTRANTS_FILE: &str = "entrants.csv";

#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SnapshotPaths {
  pub frequencies: PathBuf,
  pub winners: PathBuf,
  pub entrants: PathBuf,
}
impl SnapshotPaths {
  pub fn in_dir(dir: &Path) -> Self {
    Self {
      frequencies: dir.join(FREQUENCIES_FILE),
      winners: dir.join(WINNERS_FILE),
      entrants: dir.join(ENTRANTS_FILE),
    }
  }

  fn all(&self) -> [&PathBuf; 3] {
    [&self.frequencies, &self.winners, &self.entrants]
  }
}

/// Writes the three snapshot files, replacing any previous ones.
///
/// # Errors
/// On any filesystem failure. Files written before the failure are kept.
pub fn persist_aggregate(
  paths: &SnapshotPaths,
  aggregate: &Aggregate,
) -> Result<()> {
  let frequencies: Vec<(&Discriminator, &usize)> =
    aggregate.frequencies().iter().collect();
  let winners: Vec<&Discriminator> = aggregate.winners().iter().collect();
  write_json(&paths.frequencies, &frequencies)?;
  write_json(&paths.winners, &winners)?;
  write_entrants(&paths.entrants, aggregate)?;

  log::info!(
    "wrote {:?}, {:?} and {:?}",
    paths.frequencies,
    paths.winners,
    paths.entrants,
  );

  Ok(())
}

/// Moves existing snapshots aside as `{stem}-{timestamp}.{extension}`.
///
/// # Errors
/// When a rename fails.
pub fn archive_previous(paths: &SnapshotPaths) -> Result<Vec<PathBuf>> {
  let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string();

  let mut archived = vec![];
  for path in paths.all() {
    if !path.exists() {
      continue;
    }

    let target = timestamped(path, &timestamp);
    fs::rename(path, &target).map_err(|e| Error::io(path, e))?;
    log::info!("archived {path:?} as {target:?}");
    archived.push(target);
  }

  Ok(archived)
}

/// Reads back the frequency and winner snapshots.
///
/// # Errors
/// When either file is missing or doesn't hold the expected JSON shape.
pub fn load_reference(paths: &SnapshotPaths) -> Result<ReferenceTable> {
  let frequencies: Vec<(Discriminator, usize)> = read_json(&paths.frequencies)?;
  let winners: Vec<Discriminator> = read_json(&paths.winners)?;

  Ok(ReferenceTable {
    frequencies: frequencies.into_iter().collect::<BTreeMap<_, _>>(),
    winners: winners.into_iter().collect::<BTreeSet<_>>(),
  })
}

fn write_json<T: serde::Serialize + ?Sized>(
  path: &Path,
  value: &T,
) -> Result<()> {
  let json = serde_json::to_string(value)?;
  fs::write(path, json).map_err(|e| Error::io(path, e))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
  let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
  serde_json::from_str(&json).map_err(|source| Error::Snapshot {
    path: path.to_path_buf(),
    source,
  })
}

/// One `name,count` line per discriminator, with no newline after the last.
fn write_entrants(path: &Path, aggregate: &Aggregate) -> Result<()> {
  // SEE: https://docs.rs/csv/1.3.1/csv/struct.WriterBuilder.html
  let mut writer = csv::WriterBuilder::new()
    .has_headers(false)
    .from_writer(vec![]);

  for (discriminator, display_name) in aggregate.display_names() {
    let count = aggregate
      .frequencies()
      .get(discriminator)
      .copied()
      .unwrap_or(0);
    writer.write_record([display_name.as_str(), count.to_string().as_str()])?;
  }

  let mut csv = writer
    .into_inner()
    .map_err(|e| Error::io(path, e.into_error()))?;
  if csv.last() == Some(&b'\n') {
    csv.pop();
  }

  fs::write(path, csv).map_err(|e| Error::io(path, e))
}

fn timestamped(path: &Path, timestamp: &str) -> PathBuf {
  let stem = path
    .file_stem()
    .map(|stem| stem.to_string_lossy().into_owned())
    .unwrap_or_default();
  let name = match path.extension() {
    Some(extension) => {
      format!("{stem}-{timestamp}.{}", extension.to_string_lossy())
    }
    None => format!("{stem}-{timestamp}"),
  };

  path.with_file_name(name)
}
