use serde::Deserialize;

use crate::common::Participant;
use crate::common::Standing;
use crate::common::TournamentEntrants;
use crate::common::TournamentSummary;

pub const TOURNAMENT_QUERY: &str = r"
  query TournamentQuery($slug: String) {
    tournament(slug: $slug) {
      name
      participants(query: {}) {
        pageInfo {
          total
        }
      }
    }
  }
";

// NOTE: 499 is just under start.gg's page-size cap, and the series never gets
// close to it, so a single page covers everyone.
pub const DISCRIMINATORS_QUERY: &str = r"
  query DiscriminatorsQuery($slug: String) {
    tournament(slug: $slug) {
      participants(query: {perPage: 499}) {
        nodes {
          gamerTag
          user {
            discriminator
          }
        }
      }
      events {
        standings(query: {perPage: 1}) {
          nodes {
            player {
              user {
                discriminator
              }
            }
            placement
          }
        }
      }
    }
  }
";

// NOTE: Nearly everything in start.gg's schema is nullable, hence all the
// options below.

#[derive(Deserialize)]
pub(super) struct TournamentData {
  pub(super) tournament: Option<TournamentNode>,
}

#[derive(Deserialize)]
pub(super) struct TournamentNode {
  name: Option<String>,
  participants: Option<Connection<ParticipantNode>>,
}
impl TournamentNode {
  pub(super) fn into_summary(self) -> TournamentSummary {
    TournamentSummary {
      name: self.name.unwrap_or_default(),
      participants_total: self
        .participants
        .and_then(|participants| participants.page_info)
        .and_then(|page_info| page_info.total),
    }
  }
}

#[derive(Deserialize)]
pub(super) struct DiscriminatorsData {
  pub(super) tournament: Option<DiscriminatorsNode>,
}

#[derive(Deserialize)]
pub(super) struct DiscriminatorsNode {
  participants: Option<Connection<ParticipantNode>>,
  events: Option<Vec<Option<EventNode>>>,
}
impl DiscriminatorsNode {
  pub(super) fn into_entrants(self) -> TournamentEntrants {
    let participants = self
      .participants
      .and_then(|participants| participants.nodes)
      .unwrap_or_default()
      .into_iter()
      .flatten()
      .map(|node| {
        Participant::new(
          node.gamer_tag.as_deref().unwrap_or(""),
          node.user.as_ref().and_then(User::discriminator),
        )
      })
      .collect();

    let leaders = self
      .events
      .unwrap_or_default()
      .into_iter()
      .flatten()
      .filter_map(|event| {
        event
          .standings?
          .nodes?
          .into_iter()
          .next()
          .flatten()
          .map(StandingNode::into_standing)
      })
      .collect();

    TournamentEntrants {
      participants,
      leaders,
    }
  }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection<N> {
  nodes: Option<Vec<Option<N>>>,
  page_info: Option<PageInfo>,
}

#[derive(Deserialize)]
struct PageInfo {
  total: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantNode {
  gamer_tag: Option<String>,
  user: Option<User>,
}

#[derive(Deserialize)]
struct User {
  discriminator: Option<String>,
}
impl User {
  fn discriminator(&self) -> Option<&str> {
    self.discriminator.as_deref()
  }
}

#[derive(Deserialize)]
struct EventNode {
  standings: Option<Connection<StandingNode>>,
}

#[derive(Deserialize)]
struct StandingNode {
  player: Option<Player>,
  placement: Option<u32>,
}
impl StandingNode {
  fn into_standing(self) -> Standing {
    Standing {
      placement: self.placement,
      discriminator: self
        .player
        .and_then(|player| player.user)
        .and_then(|user| user.discriminator)
        .filter(|discriminator| !discriminator.is_empty()),
    }
  }
}

#[derive(Deserialize)]
struct Player {
  user: Option<User>,
}
