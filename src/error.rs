use std::path::PathBuf;

use thiserror::Error;

use crate::fetching::transport::TransportError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("***You may not be connected to the internet***")]
  Connectivity(#[source] TransportError),

  #[error("{status} - {status_text}")]
  RetryExhausted { status: u16, status_text: String },

  #[error("{status} - {status_text}.{hint}")]
  Api {
    status: u16,
    status_text: String,
    hint: &'static str,
  },

  #[error("API key can't be sent as a header")]
  InvalidApiKey,

  #[error("{message}")]
  GraphQl { message: String },

  #[error("response body is not valid JSON")]
  Decode(#[from] serde_json::Error),

  #[error("response has neither `data` nor `errors`")]
  MissingData,

  #[error("no tournament found for slug {slug:?}")]
  TournamentNotFound { slug: String },

  #[error("unable to build the HTTP client")]
  HttpClient(#[source] reqwest::Error),

  #[error("unable to access {path:?}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed snapshot {path:?}")]
  Snapshot {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("unable to write entrants report")]
  Csv(#[from] csv::Error),
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  /// Non-success statuses outside the transient set.
  #[must_use]
  pub(crate) fn api(status: u16, status_text: String) -> Self {
    // NOTE: start.gg answers 400 for malformed keys and 401 for expired ones.
    let hint = match status {
      400 => " ***start.gg API key invalid!***",
      401 => " ***start.gg API key expired!***",
      _ => "",
    };

    Self::Api {
      status,
      status_text,
      hint,
    }
  }
}
