pub mod rate_gate;
pub mod transport;

use std::time::Duration;

use crate::error::Error;
use crate::error::Result;
use crate::fetching::transport::HttpRequest;
use crate::fetching::transport::HttpResponse;
use crate::fetching::transport::Transport;

pub const RETRY_DELAY: Duration = Duration::from_secs(1);

const TRANSIENT_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Single-retry wrapper around a `Transport`.
///
/// Only the transient 5xx statuses get a second attempt, after a fixed delay.
/// Everything else (including transport failures) is final.
#[must_use]
pub struct ResilientFetcher<T> {
  transport: T,
  retry_delay: Duration,
}
impl<T: Transport> ResilientFetcher<T> {
  pub fn new(transport: T, retry_delay: Duration) -> Self {
    Self {
      transport,
      retry_delay,
    }
  }

  /// # Errors
  /// - `Error::Connectivity` when no response came back.
  /// - `Error::RetryExhausted` when the retry of a transient status failed.
  /// - `Error::Api` for any other non-success status.
  pub async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse> {
    let response = self.send(request).await?;
    if response.is_success() {
      return Ok(response);
    }

    if !TRANSIENT_STATUSES.contains(&response.status) {
      return Err(Error::api(response.status, response.status_text));
    }

    log::warn!(
      "{} answered {} - {}, retrying in {:?}",
      request.url,
      response.status,
      response.status_text,
      self.retry_delay,
    );
    tokio::time::sleep(self.retry_delay).await;

    let retry_response = self.send(request).await?;
    if !retry_response.is_success() {
      return Err(Error::RetryExhausted {
        status: retry_response.status,
        status_text: retry_response.status_text,
      });
    }

    Ok(retry_response)
  }

  async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
    self
      .transport
      .send(request)
      .await
      .map_err(Error::Connectivity)
  }

  #[cfg(test)]
  pub(crate) fn transport(&self) -> &T {
    &self.transport
  }
}
