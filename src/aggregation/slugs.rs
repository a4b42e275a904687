/// Last edition of the series that gets aggregated.
pub const SERIES_LAST: u32 = 199;

const SERIES_PREFIX: &str = "only-noobs";

// NOTE: The organizer registered these editions by hand, so their slugs don't
// follow the pattern. Must match start.gg exactly or the query comes back
// empty.
const SLUG_OVERRIDES: [(u32, &str); 6] = [
  (4, "onlynoobs-4"),
  (11, "onlynoobs-11"),
  (34, "onlynoobs-34-1"),
  (49, "onlynoobs-49"),
  (102, "only-noobs-102-1"),
  (171, "only-noobs-171-1"),
];

#[must_use]
pub fn slug_for(edition: u32) -> String {
  if edition == 1 {
    return String::from(SERIES_PREFIX);
  }

  SLUG_OVERRIDES
    .iter()
    .find(|(overridden, _)| *overridden == edition)
    .map_or_else(
      || format!("{SERIES_PREFIX}-{edition}"),
      |(_, slug)| String::from(*slug),
    )
}

/// Slugs of editions 1 through `SERIES_LAST`, in order.
#[must_use]
pub fn series_slugs() -> Vec<String> {
  (1..=SERIES_LAST).map(slug_for).collect()
}
