use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::Client;
use reqwest::Method;

use crate::error::Error;
use crate::error::Result;

pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

#[must_use]
#[derive(Clone, Debug)]
pub struct HttpRequest {
  pub method: Method,
  pub url: String,
  pub headers: HeaderMap,
  pub body: String,
}

#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpResponse {
  pub status: u16,
  pub status_text: String,
  pub body: String,
}
impl HttpResponse {
  #[must_use]
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Sends a single request. Implementations never retry and never classify
/// statuses; a returned `Err` means no response came back at all.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn send(
    &self,
    request: &HttpRequest,
  ) -> std::result::Result<HttpResponse, TransportError>;
}

#[must_use]
pub struct ReqwestTransport {
  client: Client,
}
impl ReqwestTransport {
  /// # Errors
  /// When the TLS backend can't be initialized.
  pub fn new() -> Result<Self> {
    Ok(Self {
      client: get_client()?,
    })
  }
}

#[async_trait]
impl Transport for ReqwestTransport {
  async fn send(
    &self,
    request: &HttpRequest,
  ) -> std::result::Result<HttpResponse, TransportError> {
    // SEE: https://docs.rs/reqwest/0.11.13/reqwest/struct.RequestBuilder.html#method.send
    let response = self
      .client
      .request(request.method.clone(), &request.url)
      .headers(request.headers.clone())
      .body(request.body.clone())
      .send()
      .await?;

    let status = response.status();
    let body = response.text().await?;

    Ok(HttpResponse {
      status: status.as_u16(),
      status_text: String::from(status.canonical_reason().unwrap_or("")),
      body,
    })
  }
}

fn get_client() -> Result<Client> {
  // SEE: https://docs.rs/reqwest/0.11.13/reqwest/struct.ClientBuilder.html
  let client = Client::builder()
    .user_agent(concat!(
      env!("CARGO_PKG_NAME"),
      "/",
      env!("CARGO_PKG_VERSION")
    ))
    .https_only(true)
    .gzip(true)
    .deflate(true)
    .brotli(true);

  // SEE: https://docs.rs/reqwest/0.11.13/reqwest/struct.ClientBuilder.html#method.default_headers
  let mut headers = HeaderMap::new();
  headers.insert("Accept", HeaderValue::from_static("application/json"));

  client.default_headers(headers).build().map_err(Error::HttpClient)
}
