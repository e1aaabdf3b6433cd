use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Linear retry schedule: up to `max_attempts` tries, `delay` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Result of a retried operation.
#[derive(Debug)]
pub enum Attempted<T, E> {
    Succeeded { value: T, attempts: u32 },
    Exhausted { last_error: E, attempts: u32 },
}

/// Run `op` until it returns `Ok` or the policy runs out.
///
/// Sleeps between attempts but never after the last one.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Attempted<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => {
                return Attempted::Succeeded {
                    value,
                    attempts: attempt,
                }
            }
            Err(e) if attempt >= policy.max_attempts => {
                return Attempted::Exhausted {
                    last_error: e,
                    attempts: attempt,
                }
            }
            Err(e) => {
                debug!(attempt, max = policy.max_attempts, error = %e, "attempt failed, retrying");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
