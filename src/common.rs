use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// start.gg's persistent per-user token. Unlike gamer tags, it never changes.
pub type Discriminator = String;

#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Participant {
  pub display_name: String,
  pub discriminator: Option<Discriminator>,
}
impl Participant {
  pub fn new(display_name: &str, discriminator: Option<&str>) -> Self {
    Self {
      display_name: String::from(display_name),
      // NOTE: start.gg sometimes sends an empty discriminator for users
      // without an account, which is as good as none.
      discriminator: discriminator
        .filter(|d| !d.is_empty())
        .map(String::from),
    }
  }
}

/// Top entry of an event's first standings page.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Standing {
  pub placement: Option<u32>,
  pub discriminator: Option<Discriminator>,
}
impl Standing {
  #[must_use]
  pub fn winner(&self) -> Option<&Discriminator> {
    match self.placement {
      Some(1) => self.discriminator.as_ref(),
      _ => None,
    }
  }
}

#[must_use]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TournamentEntrants {
  pub participants: Vec<Participant>,
  /// One per event that has any standings.
  pub leaders: Vec<Standing>,
}

#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TournamentSummary {
  pub name: String,
  pub participants_total: Option<u64>,
}

/// Persisted aggregate as read back for classification. Never written to.
#[must_use]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReferenceTable {
  pub frequencies: BTreeMap<Discriminator, usize>,
  /// Discriminators that already won an event, hence no longer noobs.
  pub winners: BTreeSet<Discriminator>,
}
