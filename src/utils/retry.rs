//! Retry with exponential backoff around a single fetch.
//!
//! Only transient failures are retried (see [`FetchError::is_transient`]).
//! Delays follow `base × 2^attempt` with up to 10% jitter, are capped per delay,
//! never undercut a server's `Retry-After`, and all retries of one fetch share
//! a wall-clock budget.

use std::future::Future;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::Instant;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_util::sync::CancellationToken;

use crate::config::{ScanConfig, RETRY_JITTER_FRACTION, RETRY_MAX_DELAY_SECS};
use crate::error_handling::FetchError;
use crate::policy::DomainPermit;

/// Result of a retried operation.
#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub result: Result<T, FetchError>,
    /// Attempts made, including the first
    pub attempts: u32,
    /// Backoff delays slept between attempts, in order
    pub delays: Vec<Duration>,
}

/// Retry settings for one fetch.
#[derive(Debug, Clone)]
pub struct RetryController {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    budget: Duration,
}

impl RetryController {
    pub fn new(max_retries: u32, base_delay: Duration, budget: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(RETRY_MAX_DELAY_SECS),
            budget,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_base_delay_ms),
            Duration::from_secs(config.retry_budget_seconds),
        )
    }

    /// Backoff schedule before jitter: `2·base`, `4·base`, ... capped.
    fn schedule(&self) -> impl Iterator<Item = Duration> {
        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        ExponentialBackoff::from_millis(2)
            .factor(base_ms.max(1))
            .max_delay(self.max_delay)
    }

    /// Final delay before the next attempt: scheduled delay plus jitter, capped,
    /// raised to the server's `Retry-After` when that is longer.
    fn delay_after(&self, scheduled: Duration, error: &FetchError) -> Duration {
        let jittered = scheduled + jitter(scheduled.mul_f64(RETRY_JITTER_FRACTION));
        let capped = jittered.min(self.max_delay);
        match error.retry_after() {
            Some(retry_after) if retry_after > capped => retry_after,
            _ => capped,
        }
    }

    /// Runs `attempt` until it succeeds, fails permanently, or retries run out.
    ///
    /// `attempt` receives the 1-based attempt number. The permit's backoff level
    /// rises on every transient failure and resets on success; every attempt
    /// after the first is recorded as a new request to the domain.
    pub async fn run<T, F, Fut>(
        &self,
        permit: &mut DomainPermit,
        cancel: &CancellationToken,
        mut attempt: F,
    ) -> RetryOutcome<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let started = Instant::now();
        let mut schedule = self.schedule();
        let mut attempts = 0u32;
        let mut delays = Vec::new();

        loop {
            attempts += 1;
            if attempts > 1 {
                permit.record_request();
            }
            debug!(
                "Fetch attempt {attempts}/{} for {}",
                self.max_retries + 1,
                permit.domain()
            );

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(FetchError::Cancelled),
                result = attempt(attempts) => result,
            };

            let error = match result {
                Ok(value) => {
                    permit.record_success();
                    return RetryOutcome {
                        result: Ok(value),
                        attempts,
                        delays,
                    };
                }
                Err(error) => error,
            };

            if !error.is_transient() {
                debug!("Attempt {attempts} failed permanently: {error}");
                return RetryOutcome {
                    result: Err(error),
                    attempts,
                    delays,
                };
            }
            permit.record_failure();

            if attempts > self.max_retries {
                warn!("Giving up after {attempts} attempt(s): {error}");
                return RetryOutcome {
                    result: Err(error),
                    attempts,
                    delays,
                };
            }

            let scheduled = schedule.next().unwrap_or(self.max_delay);
            let delay = self.delay_after(scheduled, &error);
            if started.elapsed() + delay > self.budget {
                warn!(
                    "Retry budget of {:?} exhausted after {attempts} attempt(s): {error}",
                    self.budget
                );
                return RetryOutcome {
                    result: Err(error),
                    attempts,
                    delays,
                };
            }

            info!(
                "Attempt {attempts} failed ({error}), retrying in {:.1}s",
                delay.as_secs_f64()
            );
            delays.push(delay);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return RetryOutcome {
                        result: Err(FetchError::Cancelled),
                        attempts,
                        delays,
                    };
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::RateLimiter;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn unavailable() -> FetchError {
        FetchError::Http {
            status: 503,
            retry_after: None,
        }
    }

    async fn permit(limiter: &RateLimiter) -> DomainPermit {
        limiter
            .acquire("example.com", &CancellationToken::new())
            .await
            .unwrap()
    }

    #[test]
    fn test_schedule_doubles_and_caps() {
        let controller =
            RetryController::new(10, Duration::from_secs(2), Duration::from_secs(600));
        let delays: Vec<Duration> = controller.schedule().take(6).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(4),
                Duration::from_secs(8),
                Duration::from_secs(16),
                Duration::from_secs(32),
                Duration::from_secs(60),
                Duration::from_secs(60),
            ]
        );
    }

    #[test]
    fn test_delay_after_jitter_bounds() {
        let controller =
            RetryController::new(3, Duration::from_secs(1), Duration::from_secs(600));
        for _ in 0..100 {
            let d = controller.delay_after(Duration::from_secs(10), &unavailable());
            assert!(d >= Duration::from_secs(10));
            assert!(d <= Duration::from_secs(11));
        }
        // never above the cap
        let d = controller.delay_after(Duration::from_secs(60), &unavailable());
        assert_eq!(d, Duration::from_secs(60));
    }

    #[test]
    fn test_delay_after_honors_retry_after() {
        let controller =
            RetryController::new(3, Duration::from_millis(100), Duration::from_secs(600));
        let error = FetchError::Http {
            status: 429,
            retry_after: Some(Duration::from_secs(30)),
        };
        assert_eq!(
            controller.delay_after(Duration::from_millis(200), &error),
            Duration::from_secs(30)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let limiter = RateLimiter::new();
        let mut permit = permit(&limiter).await;
        let controller =
            RetryController::new(5, Duration::from_millis(100), Duration::from_secs(120));
        let calls = AtomicU32::new(0);

        let outcome = controller
            .run(&mut permit, &CancellationToken::new(), |_| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 3 {
                        Err(unavailable())
                    } else {
                        Ok("page")
                    }
                }
            })
            .await;

        assert_eq!(outcome.result, Ok("page"));
        assert_eq!(outcome.attempts, 4);
        assert_eq!(outcome.delays.len(), 3);
        assert!(outcome.delays.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(permit.state().backoff_level, 0, "success resets backoff");
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_is_not_retried() {
        let limiter = RateLimiter::new();
        let mut permit = permit(&limiter).await;
        let controller =
            RetryController::new(5, Duration::from_millis(100), Duration::from_secs(120));

        let outcome: RetryOutcome<()> = controller
            .run(&mut permit, &CancellationToken::new(), |_| async {
                Err(FetchError::Ssl("unknown issuer".into()))
            })
            .await;

        assert_eq!(outcome.attempts, 1);
        assert!(matches!(outcome.result, Err(FetchError::Ssl(_))));
        assert!(outcome.delays.is_empty());
        assert_eq!(permit.state().backoff_level, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_reports_last_error_and_attempts() {
        let limiter = RateLimiter::new();
        let mut permit = permit(&limiter).await;
        let controller =
            RetryController::new(2, Duration::from_millis(100), Duration::from_secs(120));

        let outcome: RetryOutcome<()> = controller
            .run(&mut permit, &CancellationToken::new(), |n| async move {
                Err(FetchError::Connection(format!("reset #{n}")))
            })
            .await;

        assert_eq!(outcome.attempts, 3);
        assert_eq!(
            outcome.result,
            Err(FetchError::Connection("reset #3".into()))
        );
        assert_eq!(permit.state().backoff_level, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_stops_retries() {
        let limiter = RateLimiter::new();
        let mut permit = permit(&limiter).await;
        // first backoff is 2 × 10s = 20s, beyond the 15s budget
        let controller =
            RetryController::new(5, Duration::from_secs(10), Duration::from_secs(15));

        let outcome: RetryOutcome<()> = controller
            .run(&mut permit, &CancellationToken::new(), |_| async {
                Err(FetchError::Timeout(Duration::from_secs(1)))
            })
            .await;

        assert_eq!(outcome.attempts, 1);
        assert!(outcome.delays.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff() {
        let limiter = RateLimiter::new();
        let mut permit = permit(&limiter).await;
        let controller =
            RetryController::new(5, Duration::from_secs(5), Duration::from_secs(120));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let outcome: RetryOutcome<()> = controller
            .run(&mut permit, &cancel, |_| async { Err(unavailable()) })
            .await;

        assert_eq!(outcome.result, Err(FetchError::Cancelled));
        assert_eq!(outcome.attempts, 1);
    }
}
