//! Bounded retry with exponential backoff and jitter.
//!
//! The pipeline itself never retries. Callers that want to ride out transient
//! network failures wrap their source in [`RetryingSource`].

use std::time::Duration;

use tracing::warn;

use crate::data_source::{PriceFuture, PriceRequest, PriceSource, ProviderId};

/// Backoff strategy for retrying failed requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Uses a fixed delay between retries.
    Fixed {
        /// Delay between retries.
        delay: Duration,
    },
    /// Uses an exponential delay between retries.
    ///
    /// The delay is calculated as `base * (factor ^ attempt)`.
    Exponential {
        /// The initial backoff duration.
        base: Duration,
        /// The multiplicative factor for each subsequent retry.
        factor: f64,
        /// The maximum duration to wait between retries.
        max: Duration,
        /// Whether to apply random jitter (+/- 50%) to the delay.
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(250),
            factor: 2.0,
            max: Duration::from_secs(4),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scale = factor.powi(attempt.min(i32::MAX as u32) as i32);
                let seconds = (base.as_secs_f64() * scale).min(max.as_secs_f64());
                let delay = Duration::from_secs_f64(seconds);

                if !jitter {
                    return delay;
                }

                let millis = delay.as_millis() as u64;
                let half = millis / 2;
                let offset = fastrand::u64(0..=half * 2);
                Duration::from_millis((millis - half).saturating_add(offset))
            }
        }
    }
}

/// Configuration for the retry wrapper.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    pub backoff: Backoff,
    /// HTTP statuses an adapter should classify as transient.
    pub retry_on_status: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Backoff::default(),
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    pub fn exponential(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed { delay },
            ..Self::default()
        }
    }

    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

/// Wraps a source and retries retryable errors with backoff.
#[derive(Debug, Clone)]
pub struct RetryingSource<S> {
    inner: S,
    config: RetryConfig,
}

impl<S> RetryingSource<S> {
    pub fn new(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S> PriceSource for RetryingSource<S>
where
    S: PriceSource,
{
    fn id(&self) -> ProviderId {
        self.inner.id()
    }

    fn adjusted_closes<'a>(&'a self, req: PriceRequest) -> PriceFuture<'a> {
        Box::pin(async move {
            let mut attempt = 0;
            loop {
                match self.inner.adjusted_closes(req.clone()).await {
                    Ok(series) => return Ok(series),
                    Err(error) if error.retryable() && attempt < self.config.max_retries => {
                        let delay = self.config.delay_for_attempt(attempt);
                        warn!(
                            symbol = %req.symbol,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            %error,
                            "retrying price fetch"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    Err(error) => return Err(error),
                }
            }
        })
    }
}
