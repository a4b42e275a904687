pub mod slugs;

use std::marker::PhantomData;

use indexmap::IndexMap;
use indexmap::IndexSet;

use crate::common::Discriminator;
use crate::common::TournamentEntrants;
use crate::error::Result;
use crate::fetching::rate_gate::RateGate;
use crate::fetching::transport::Transport;
use crate::graphql::GraphQlClient;

/// Running totals over the series.
///
/// Only `record_tournament` mutates it, which keeps `frequencies` and
/// `display_names` on the same key set, in the order discriminators were
/// first seen.
#[must_use]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Aggregate {
  frequencies: IndexMap<Discriminator, usize>,
  display_names: IndexMap<Discriminator, String>,
  winners: IndexSet<Discriminator>,
  constructor_guard: PhantomData<()>,
}
impl Aggregate {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of tournaments each discriminator entered.
  #[must_use]
  pub fn frequencies(&self) -> &IndexMap<Discriminator, usize> {
    &self.frequencies
  }

  /// Latest gamer tag seen for each discriminator.
  #[must_use]
  pub fn display_names(&self) -> &IndexMap<Discriminator, String> {
    &self.display_names
  }

  #[must_use]
  pub fn winners(&self) -> &IndexSet<Discriminator> {
    &self.winners
  }

  pub fn record_tournament(
    &mut self,
    slug: &str,
    entrants: &TournamentEntrants,
  ) {
    for participant in &entrants.participants {
      let Some(discriminator) = &participant.discriminator else {
        continue;
      };
      if participant.display_name.is_empty() {
        continue;
      }

      *self
        .frequencies
        .entry(String::clone(discriminator))
        .or_insert(0) += 1;
      self.display_names.insert(
        String::clone(discriminator),
        String::clone(&participant.display_name),
      );
    }

    for discriminator in entrants.leaders.iter().filter_map(|l| l.winner()) {
      self.winners.insert(String::clone(discriminator));
      log::info!("{slug}: {discriminator}");
    }
  }
}

/// Fetches every slug in order, one request at a time through `gate`.
///
/// # Errors
/// The first failure aborts the whole pass and drops what was gathered.
pub async fn aggregate_series<T: Transport>(
  client: &GraphQlClient<T>,
  gate: &RateGate,
  slugs: &[String],
) -> Result<Aggregate> {
  let mut aggregate = Aggregate::new();

  for (i, slug) in slugs.iter().enumerate() {
    log::debug!("fetching {slug} ({}/{})", i + 1, slugs.len());
    let entrants = gate
      .schedule(|| client.fetch_tournament_entrants(slug))
      .await?;
    aggregate.record_tournament(slug, &entrants);
  }

  log::info!(
    "aggregated {} tournaments: {} entrants, {} winners",
    slugs.len(),
    aggregate.frequencies.len(),
    aggregate.winners.len(),
  );

  Ok(aggregate)
}
