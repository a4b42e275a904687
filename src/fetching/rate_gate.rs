use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Keeps start.gg's abuse protection quiet during the long series loop.
pub const MIN_REQUEST_SPACING: Duration = Duration::from_millis(800);

/// Admits units of work one at a time, in submission order, with at least
/// `min_spacing` between consecutive start times.
#[must_use]
#[derive(Debug)]
pub struct RateGate {
  min_spacing: Duration,
  // NOTE: Tokio's mutex is fair, so waiters are admitted in FIFO order.
  // SEE: https://docs.rs/tokio/1.35.1/tokio/sync/struct.Mutex.html
  last_start: Mutex<Option<Instant>>,
}
impl RateGate {
  pub fn new(min_spacing: Duration) -> Self {
    Self {
      min_spacing,
      last_start: Mutex::new(None),
    }
  }

  pub async fn schedule<F, Fut, T>(&self, work: F) -> T
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
  {
    {
      let mut last_start = self.last_start.lock().await;
      if let Some(previous) = *last_start {
        tokio::time::sleep_until(previous + self.min_spacing).await;
      }
      *last_start = Some(Instant::now());
    }

    // NOTE: The lock is released before running so spacing applies to start
    // times only, not to completion times.
    work().await
  }
}
impl Default for RateGate {
  fn default() -> Self {
    Self::new(MIN_REQUEST_SPACING)
  }
}
