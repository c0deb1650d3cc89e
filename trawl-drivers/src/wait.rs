//! Condition polling with a fixed budget.
//!
//! Every wait in the driver layer goes through [`poll_until`]: probe, and if
//! the condition does not hold yet, sleep with exponential backoff until the
//! budget runs out. The probe always runs at least once.
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::trace;
use trawl_common::Locator;

use crate::DriverError;

const INITIAL_INTERVAL: Duration = Duration::from_millis(100);
const MAX_INTERVAL: Duration = Duration::from_secs(1);

/// Doubling poll interval, capped.
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            next: INITIAL_INTERVAL,
            max: MAX_INTERVAL,
        }
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        self.next = (self.next * 2).min(self.max);
        Some(current)
    }
}

/// Run `probe` until it yields `Some`, an error, or `timeout` elapses.
///
/// `locator` only labels the [`DriverError::Timeout`] returned on expiry.
pub async fn poll_until<T, F, Fut>(
    locator: &Locator,
    timeout: Duration,
    mut probe: F,
) -> Result<T, DriverError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, DriverError>>,
{
    let deadline = Instant::now() + timeout;
    let mut backoff = Backoff::default();

    loop {
        if let Some(value) = probe().await? {
            return Ok(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(DriverError::Timeout {
                locator: locator.clone(),
                timeout,
            });
        }

        let pause = backoff.next().unwrap_or(MAX_INTERVAL).min(deadline - now);
        trace!(target: "browser.wait", %locator, ?pause, "condition not met yet");
        sleep(pause).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn backoff_doubles_up_to_cap() {
        let steps: Vec<_> = Backoff::default().take(6).map(|d| d.as_millis()).collect();
        assert_eq!(steps, vec![100, 200, 400, 800, 1000, 1000]);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_as_soon_as_condition_holds() {
        let calls = AtomicUsize::new(0);
        let started = Instant::now();

        let got = poll_until(&Locator::id("modal"), Duration::from_secs(10), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok((n == 2).then_some("ready")) }
        })
        .await
        .unwrap();

        assert_eq!(got, "ready");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_budget() {
        let started = Instant::now();
        let err = poll_until(&Locator::id("never"), Duration::from_secs(2), || async {
            Ok::<Option<()>, DriverError>(None)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, DriverError::Timeout { timeout, .. } if timeout == Duration::from_secs(2)));
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn probe_errors_stop_polling() {
        let err = poll_until(&Locator::css("a"), Duration::from_secs(5), || async {
            Err::<Option<()>, _>(DriverError::Session("gone".into()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, DriverError::Session(_)));
    }
}
