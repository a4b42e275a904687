pub mod queries;

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::common::TournamentEntrants;
use crate::common::TournamentSummary;
use crate::error::Error;
use crate::error::Result;
use crate::fetching::transport::HttpRequest;
use crate::fetching::transport::Transport;
use crate::fetching::ResilientFetcher;
use crate::fetching::RETRY_DELAY;
use crate::graphql::queries::DiscriminatorsData;
use crate::graphql::queries::TournamentData;
use crate::graphql::queries::DISCRIMINATORS_QUERY;
use crate::graphql::queries::TOURNAMENT_QUERY;

pub const DEFAULT_ENDPOINT: &str = "https://api.start.gg/gql/alpha";

#[must_use]
#[derive(Clone, Debug)]
pub struct ClientConfig {
  pub endpoint: String,
  pub api_key: String,
  pub retry_delay: Duration,
}
impl ClientConfig {
  /// The API key has no default on purpose: it has to come from the operator.
  pub fn new(api_key: &str) -> Self {
    Self {
      endpoint: String::from(DEFAULT_ENDPOINT),
      api_key: String::from(api_key),
      retry_delay: RETRY_DELAY,
    }
  }
}

#[derive(Serialize)]
struct RequestBody<'a, V> {
  query: &'a str,
  variables: &'a V,
}

#[derive(Deserialize)]
struct ResponseEnvelope<D> {
  data: Option<D>,
  errors: Option<Vec<ResponseError>>,
}

#[derive(Deserialize)]
struct ResponseError {
  #[serde(default)]
  message: String,
}

#[derive(Serialize)]
struct SlugVariables<'a> {
  slug: &'a str,
}

#[must_use]
pub struct GraphQlClient<T> {
  fetcher: ResilientFetcher<T>,
  endpoint: String,
  headers: HeaderMap,
}
impl<T: Transport> GraphQlClient<T> {
  /// # Errors
  /// When the API key can't be sent as a header value.
  pub fn new(transport: T, config: ClientConfig) -> Result<Self> {
    let mut authorization =
      HeaderValue::from_str(&format!("Bearer {}", config.api_key))
        .map_err(|_| Error::InvalidApiKey)?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(Self {
      fetcher: ResilientFetcher::new(transport, config.retry_delay),
      endpoint: config.endpoint,
      headers,
    })
  }

  /// Runs `document` and returns its `data` payload.
  ///
  /// # Errors
  /// Anything from `ResilientFetcher::fetch`, plus `Error::GraphQl` with the
  /// first reported error when the envelope carries any.
  pub async fn query<V, D>(&self, document: &str, variables: &V) -> Result<D>
  where
    V: Serialize + Sync,
    D: DeserializeOwned,
  {
    let request = HttpRequest {
      method: Method::POST,
      url: self.endpoint.clone(),
      headers: self.headers.clone(),
      body: serde_json::to_string(&RequestBody {
        query: document,
        variables,
      })?,
    };

    let response = self.fetcher.fetch(&request).await?;
    let envelope: ResponseEnvelope<D> = serde_json::from_str(&response.body)?;

    // NOTE: Only the first error is surfaced, the rest are usually knock-on
    // effects of it.
    let first_error = envelope
      .errors
      .and_then(|errors| errors.into_iter().next());
    if let Some(first) = first_error {
      return Err(Error::GraphQl {
        message: first.message,
      });
    }

    envelope.data.ok_or(Error::MissingData)
  }

  /// # Errors
  /// See `query`, plus `Error::TournamentNotFound` for unknown slugs.
  pub async fn fetch_tournament_entrants(
    &self,
    slug: &str,
  ) -> Result<TournamentEntrants> {
    let data: DiscriminatorsData = self
      .query(DISCRIMINATORS_QUERY, &SlugVariables { slug })
      .await?;

    data
      .tournament
      .map(queries::DiscriminatorsNode::into_entrants)
      .ok_or_else(|| Error::TournamentNotFound {
        slug: String::from(slug),
      })
  }

  /// # Errors
  /// See `fetch_tournament_entrants`.
  pub async fn fetch_tournament_summary(
    &self,
    slug: &str,
  ) -> Result<TournamentSummary> {
    let data: TournamentData =
      self.query(TOURNAMENT_QUERY, &SlugVariables { slug }).await?;

    data
      .tournament
      .map(queries::TournamentNode::into_summary)
      .ok_or_else(|| Error::TournamentNotFound {
        slug: String::from(slug),
      })
  }

  #[cfg(test)]
  pub(crate) fn transport(&self) -> &T {
    self.fetcher.transport()
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use pretty_assertions::assert_eq;
  use reqwest::header::AUTHORIZATION;
  use reqwest::header::CONTENT_TYPE;
  use reqwest::Method;
  use serde_json::json;
  use serde_json::Value;

  use super::ClientConfig;
  use super::GraphQlClient;
  use crate::common::Participant;
  use crate::common::Standing;
  use crate::common::TournamentEntrants;
  use crate::common::TournamentSummary;
  use crate::error::Error;
  use crate::fetching::transport::testing::reply;
  use crate::fetching::transport::testing::ScriptedTransport;
  use crate::graphql::queries::DISCRIMINATORS_QUERY;

  pub(crate) fn client(
    transport: ScriptedTransport,
  ) -> GraphQlClient<ScriptedTransport> {
    GraphQlClient::new(transport, ClientConfig::new("secret")).unwrap()
  }

  pub(crate) fn answering(body: Value) -> ScriptedTransport {
    let body = body.to_string();
    ScriptedTransport::from_fn(move |_| Ok(reply(200, "OK", &body)))
  }

  #[tokio::test]
  async fn request_carries_bearer_key_and_json_body() {
    let client = client(answering(json!({"data": {"tournament": null}})));

    let _ = client.fetch_tournament_entrants("only-noobs-7").await;

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url, "https://api.start.gg/gql/alpha");
    assert_eq!(request.headers[AUTHORIZATION], "Bearer secret");
    assert_eq!(request.headers[CONTENT_TYPE], "application/json");
    assert_eq!(
      serde_json::from_str::<Value>(&request.body).unwrap(),
      json!({
        "query": DISCRIMINATORS_QUERY,
        "variables": {"slug": "only-noobs-7"}
      })
    );
  }

  #[tokio::test]
  async fn first_graphql_error_is_surfaced() {
    let client = client(answering(json!({
      "errors": [{"message": "first"}, {"message": "second"}],
      "data": null
    })));

    let error = client.fetch_tournament_entrants("x").await.unwrap_err();

    assert!(matches!(error, Error::GraphQl { .. }));
    assert_eq!(error.to_string(), "first");
  }

  #[tokio::test]
  async fn empty_error_list_is_not_an_error() {
    let client = client(answering(json!({
      "errors": [],
      "data": {"tournament": {"participants": {"nodes": []}, "events": []}}
    })));

    let entrants = client.fetch_tournament_entrants("x").await.unwrap();

    assert_eq!(entrants, TournamentEntrants::default());
  }

  #[tokio::test]
  async fn unknown_slug_is_reported() {
    let client = client(answering(json!({"data": {"tournament": null}})));

    let error = client.fetch_tournament_entrants("nope").await.unwrap_err();

    assert!(
      matches!(error, Error::TournamentNotFound { ref slug } if slug == "nope")
    );
  }

  #[tokio::test]
  async fn malformed_body_is_a_decode_error() {
    let client = client(ScriptedTransport::from_fn(|_| {
      Ok(reply(200, "OK", "<html>maintenance</html>"))
    }));

    let error = client.fetch_tournament_entrants("x").await.unwrap_err();

    assert!(matches!(error, Error::Decode(_)));
  }

  #[tokio::test]
  async fn entrants_are_extracted_from_nullable_schema() {
    let client = client(answering(json!({"data": {"tournament": {
      "participants": {"nodes": [
        {"gamerTag": "Alpha", "user": {"discriminator": "a1"}},
        {"gamerTag": "Guest", "user": null},
        {"gamerTag": "Blank", "user": {"discriminator": ""}},
        {"gamerTag": null, "user": {"discriminator": "n1"}},
        null
      ]},
      "events": [
        {"standings": {"nodes": [
          {"placement": 1, "player": {"user": {"discriminator": "a1"}}}
        ]}},
        {"standings": {"nodes": []}},
        {"standings": null},
        {"standings": {"nodes": [{"placement": 2, "player": null}]}}
      ]
    }}})));

    let entrants = client.fetch_tournament_entrants("x").await.unwrap();

    assert_eq!(
      entrants,
      TournamentEntrants {
        participants: vec![
          Participant::new("Alpha", Some("a1")),
          Participant::new("Guest", None),
          Participant::new("Blank", None),
          Participant::new("", Some("n1")),
        ],
        leaders: vec![
          Standing {
            placement: Some(1),
            discriminator: Some(String::from("a1")),
          },
          Standing {
            placement: Some(2),
            discriminator: None,
          },
        ],
      }
    );
  }

  #[tokio::test]
  async fn summary_reads_participant_total() {
    let client = client(answering(json!({"data": {"tournament": {
      "name": "Only Noobs #12",
      "participants": {"pageInfo": {"total": 57}}
    }}})));

    let summary = client.fetch_tournament_summary("only-noobs-12").await;

    assert_eq!(
      summary.unwrap(),
      TournamentSummary {
        name: String::from("Only Noobs #12"),
        participants_total: Some(57),
      }
    );
  }
}
