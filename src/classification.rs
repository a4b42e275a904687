use std::cmp::Ordering;
use std::fmt;

use feruca::Collator;
use feruca::Tailoring;
use itertools::Itertools;

use crate::common::Participant;
use crate::common::ReferenceTable;
use crate::error::Result;
use crate::fetching::transport::Transport;
use crate::graphql::GraphQlClient;

/// The edition being vetted.
pub const CLASSIFICATION_SLUG: &str = "only-noobs-200";

#[must_use]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Classification {
  /// Gamer tag and number of past editions entered, most frequent first.
  pub valid: Vec<(String, usize)>,
  pub invalid: Vec<String>,
}

/// A participant is valid when they never won an event and have entered the
/// series before. Participants without a discriminator are left out.
pub fn classify(
  reference: &ReferenceTable,
  participants: &[Participant],
) -> Classification {
  let mut valid = vec![];
  let mut invalid = vec![];

  for participant in participants {
    let Some(discriminator) = &participant.discriminator else {
      continue;
    };

    // NOTE: Winners are checked first, so a past winner stays invalid however
    // often they entered.
    match reference.frequencies.get(discriminator) {
      Some(&count) if !reference.winners.contains(discriminator) => {
        valid.push((String::clone(&participant.display_name), count));
      }
      _ => invalid.push(String::clone(&participant.display_name)),
    }
  }

  let mut collator = collator();
  let valid = valid
    .into_iter()
    .sorted_by(|(a_name, a_count), (b_name, b_count)| {
      b_count
        .cmp(a_count)
        .then_with(|| collator.collate(a_name, b_name))
    })
    .collect();
  let invalid = invalid
    .into_iter()
    .sorted_by(|a, b| collator.collate(a, b))
    .collect();

  Classification { valid, invalid }
}

/// Fetches `slug`'s participants and classifies them against `reference`.
///
/// # Errors
/// Anything `GraphQlClient::fetch_tournament_entrants` returns.
pub async fn classify_tournament<T: Transport>(
  client: &GraphQlClient<T>,
  reference: &ReferenceTable,
  slug: &str,
) -> Result<Classification> {
  let entrants = client.fetch_tournament_entrants(slug).await?;
  let classification = classify(reference, &entrants.participants);

  log::info!(
    "{slug}: {} valid, {} invalid",
    classification.valid.len(),
    classification.invalid.len(),
  );

  Ok(classification)
}

/// Orders gamer tags by the CLDR root collation: accents and case only
/// matter once the base letters tie, and lowercase sorts first.
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
  collator().collate(a, b)
}

// NOTE: Punctuation and symbols are non-ignorable, so `~Zed` sorts before
// any letter instead of next to `Zed`.
fn collator() -> Collator {
  Collator::new(Tailoring::default(), false, true)
}

impl fmt::Display for Classification {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "valid ({}):", self.valid.len())?;
    writeln!(
      f,
      "{}",
      self
        .valid
        .iter()
        .map(|(name, count)| format!("{name},{count}"))
        .join("\n")
    )?;
    writeln!(f)?;
    writeln!(f, "invalid ({}):", self.invalid.len())?;
    write!(f, "{}", self.invalid.iter().join("\n"))
  }
}

#[cfg(test)]
mod tests {
  use std::cmp::Ordering;

  use pretty_assertions::assert_eq;
  use serde_json::json;

  use super::classify;
  use super::classify_tournament;
  use super::locale_cmp;
  use super::Classification;
  use crate::common::Participant;
  use crate::common::ReferenceTable;
  use crate::graphql::tests::answering;
  use crate::graphql::tests::client;

  fn reference(
    frequencies: &[(&str, usize)],
    winners: &[&str],
  ) -> ReferenceTable {
    ReferenceTable {
      frequencies: frequencies
        .iter()
        .map(|(d, count)| (String::from(*d), *count))
        .collect(),
      winners: winners.iter().map(|d| String::from(*d)).collect(),
    }
  }

  fn valid(entries: &[(&str, usize)]) -> Vec<(String, usize)> {
    entries
      .iter()
      .map(|(name, count)| (String::from(*name), *count))
      .collect()
  }

  fn invalid(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| String::from(*name)).collect()
  }

  #[test]
  fn returning_entrant_is_valid_with_their_count() {
    let classification = classify(
      &reference(&[("abc#1234", 3)], &[]),
      &[Participant::new("abc", Some("abc#1234"))],
    );

    assert_eq!(classification.valid, valid(&[("abc", 3)]));
    assert!(classification.invalid.is_empty());
  }

  #[test]
  fn past_winner_is_invalid_even_when_frequent() {
    let classification = classify(
      &reference(&[("champ", 40)], &["champ"]),
      &[Participant::new("Champ", Some("champ"))],
    );

    assert!(classification.valid.is_empty());
    assert_eq!(classification.invalid, invalid(&["Champ"]));
  }

  #[test]
  fn newcomer_is_invalid_and_anonymous_is_skipped() {
    let classification = classify(
      &reference(&[("d1", 1)], &[]),
      &[
        Participant::new("Fresh", Some("new")),
        Participant::new("Guest", None),
      ],
    );

    assert_eq!(
      classification,
      Classification {
        valid: vec![],
        invalid: invalid(&["Fresh"]),
      }
    );
  }

  #[test]
  fn valid_sorted_by_count_then_name() {
    let classification = classify(
      &reference(&[("d1", 2), ("d2", 5), ("d3", 2), ("d4", 2)], &[]),
      &[
        Participant::new("bravo", Some("d1")),
        Participant::new("Zulu", Some("d2")),
        Participant::new("Alpha", Some("d3")),
        Participant::new("charlie", Some("d4")),
      ],
    );

    assert_eq!(
      classification.valid,
      valid(&[("Zulu", 5), ("Alpha", 2), ("bravo", 2), ("charlie", 2)])
    );
  }

  #[test]
  fn invalid_sorted_by_name() {
    let classification = classify(
      &reference(&[], &[]),
      &[
        Participant::new("delta", Some("d1")),
        Participant::new("Bravo", Some("d2")),
        Participant::new("alpha", Some("d3")),
      ],
    );

    assert_eq!(classification.invalid, invalid(&["alpha", "Bravo", "delta"]));
  }

  #[test]
  fn locale_order_ignores_case_first() {
    assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
    assert_eq!(locale_cmp("a", "A"), Ordering::Less);
    assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
  }

  #[test]
  fn locale_order_uses_base_letters_before_accents() {
    assert_eq!(locale_cmp("Émile", "Fred"), Ordering::Less);
    assert_eq!(locale_cmp("Zoë", "Émile"), Ordering::Greater);
    assert_eq!(locale_cmp("cote", "côte"), Ordering::Less);
  }

  #[test]
  fn locale_order_puts_punctuation_before_letters() {
    assert_eq!(locale_cmp("~Zed", "abc"), Ordering::Less);
    assert_eq!(locale_cmp("_x", "0day"), Ordering::Less);
    assert_eq!(locale_cmp("0day", "abc"), Ordering::Less);
  }

  #[test]
  fn accented_and_symbol_tags_sort_like_a_collator() {
    let classification = classify(
      &reference(&[("d1", 2), ("d2", 2), ("d3", 2)], &[]),
      &[
        Participant::new("Fred", Some("d1")),
        Participant::new("~Zed", Some("d2")),
        Participant::new("Émile", Some("d3")),
        Participant::new("Zoë", Some("n1")),
        Participant::new("éclair", Some("n2")),
        Participant::new("Ace", Some("n3")),
      ],
    );

    assert_eq!(
      classification.valid,
      valid(&[("~Zed", 2), ("Émile", 2), ("Fred", 2)])
    );
    assert_eq!(classification.invalid, invalid(&["Ace", "éclair", "Zoë"]));
  }

  #[test]
  fn report_layout() {
    let classification = Classification {
      valid: valid(&[("Zulu", 5), ("Alpha", 2)]),
      invalid: invalid(&["Champ", "Fresh"]),
    };

    assert_eq!(
      classification.to_string(),
      "valid (2):\nZulu,5\nAlpha,2\n\ninvalid (2):\nChamp\nFresh"
    );
  }

  #[tokio::test]
  async fn live_participants_are_classified() {
    let client = client(answering(json!({"data": {"tournament": {
      "participants": {"nodes": [
        {"gamerTag": "Regular", "user": {"discriminator": "r1"}},
        {"gamerTag": "Champ", "user": {"discriminator": "c1"}},
        {"gamerTag": "Guest", "user": null}
      ]},
      "events": []
    }}})));

    let classification = classify_tournament(
      &client,
      &reference(&[("r1", 4), ("c1", 9)], &["c1"]),
      "only-noobs-200",
    )
    .await
    .unwrap();

    assert_eq!(
      classification,
      Classification {
        valid: valid(&[("Regular", 4)]),
        invalid: invalid(&["Champ"]),
      }
    );
  }
}
