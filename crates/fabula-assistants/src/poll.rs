//! Poll-to-completion for long-running provider jobs.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::{AssistantsError, Result};

/// How often a pending job is re-fetched and how long to wait overall.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_wait: Duration::from_secs(120),
        }
    }
}

/// Re-fetches a job until `is_terminal` accepts its state.
///
/// Fetches once immediately, then sleeps `interval` between attempts. Gives
/// up with [`AssistantsError::PollTimeout`] once `max_wait` has elapsed
/// without the job settling.
pub async fn poll_until_terminal<T, F, Fut, P>(
    config: &PollConfig,
    operation: &'static str,
    mut fetch: F,
    is_terminal: P,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&T) -> bool,
{
    let started = Instant::now();
    loop {
        let state = fetch().await?;
        if is_terminal(&state) {
            return Ok(state);
        }
        if started.elapsed() >= config.max_wait {
            return Err(AssistantsError::PollTimeout {
                operation,
                waited: started.elapsed(),
            });
        }
        tokio::time::sleep(config.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(1),
            max_wait: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn returns_first_terminal_state() {
        let calls = AtomicU32::new(0);
        let result = poll_until_terminal(
            &quick(),
            "job",
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok(n) }
            },
            |n| *n >= 3,
        )
        .await
        .unwrap();
        assert_eq!(result, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn terminal_on_first_fetch_returns_without_sleeping() {
        let result = poll_until_terminal(&quick(), "job", || async { Ok(7u32) }, |_| true)
            .await
            .unwrap();
        assert_eq!(result, 7);
    }

    #[tokio::test]
    async fn times_out_when_job_never_settles() {
        let err = poll_until_terminal(&quick(), "job", || async { Ok(0u32) }, |_| false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AssistantsError::PollTimeout { operation: "job", .. }
        ));
    }

    #[tokio::test]
    async fn fetch_errors_propagate_immediately() {
        let err = poll_until_terminal::<u32, _, _, _>(
            &quick(),
            "job",
            || async { Err(AssistantsError::InvalidApiKey) },
            |_| false,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AssistantsError::InvalidApiKey));
    }
}
