//! Bounded retry loop for one address, as an explicit state machine.
//!
//! ```text
//! Attempting(n) --ok-------------------------> Success
//! Attempting(n) --NotFound-------------------> ExhaustedFailure
//! Attempting(n) --other error, n < max-------> Attempting(n + 1)
//! Attempting(n) --other error, n == max------> ExhaustedFailure
//! Attempting(n) --interrupt------------------> (abort, Err(Interrupted))
//! ```

use crate::error::{Result, ScrapeError};
use crate::shutdown::Shutdown;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// How many times to run the scrape cycle for one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 6 }
    }
}

/// A unit of work the retry loop can run repeatedly.
#[async_trait]
pub trait Attempt: Send {
    type Output: Send;

    /// Run attempt number `attempt` (1-based).
    async fn run(&mut self, attempt: u32) -> Result<Self::Output>;
}

/// Terminal state of the retry loop.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    Success { value: T, attempts: u32 },
    ExhaustedFailure { error: ScrapeError, attempts: u32 },
}

impl<T> RetryOutcome<T> {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } | Self::ExhaustedFailure { attempts, .. } => *attempts,
        }
    }
}

enum AttemptState<T> {
    Attempting(u32),
    Done(RetryOutcome<T>),
}

/// Run `task` until it succeeds, hits a non-retryable error, or uses up
/// `policy.max_attempts`.
///
/// Only an interrupt escapes as `Err`; every other failure is reported through
/// [`RetryOutcome::ExhaustedFailure`].
pub async fn run_attempts<A: Attempt>(
    policy: &RetryPolicy,
    shutdown: &Shutdown,
    task: &mut A,
) -> Result<RetryOutcome<A::Output>> {
    let max = policy.max_attempts.max(1);
    let mut state = AttemptState::Attempting(1);

    loop {
        let attempt = match state {
            AttemptState::Done(outcome) => return Ok(outcome),
            AttemptState::Attempting(n) => n,
        };

        let mut interrupt = shutdown.clone();
        let result = tokio::select! {
            biased;
            _ = interrupt.wait() => Err(ScrapeError::Interrupted),
            r = task.run(attempt) => r,
        };

        state = match result {
            Ok(value) => AttemptState::Done(RetryOutcome::Success {
                value,
                attempts: attempt,
            }),
            Err(ScrapeError::Interrupted) => return Err(ScrapeError::Interrupted),
            Err(e) if !e.is_retryable() => {
                error!("attempt {attempt}/{max}: {e}");
                AttemptState::Done(RetryOutcome::ExhaustedFailure {
                    error: e,
                    attempts: attempt,
                })
            }
            Err(e) => {
                warn!("attempt {attempt}/{max}: {}: {e}", e.label());
                if attempt < max {
                    info!("starting next attempt");
                    AttemptState::Attempting(attempt + 1)
                } else {
                    AttemptState::Done(RetryOutcome::ExhaustedFailure {
                        error: e,
                        attempts: attempt,
                    })
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown;
    use std::time::Duration;

    #[derive(Debug, Clone, Copy)]
    enum Fail {
        NotReady,
        NotFound,
        Missing,
        Unknown,
        Interrupt,
    }

    impl Fail {
        fn error(self) -> ScrapeError {
            match self {
                Fail::NotReady => ScrapeError::NotReady { url: "u".into() },
                Fail::NotFound => ScrapeError::NotFound {
                    address: "a".into(),
                },
                Fail::Missing => ScrapeError::missing("period_30d"),
                Fail::Unknown => ScrapeError::Unknown(anyhow::anyhow!("socket closed")),
                Fail::Interrupt => ScrapeError::Interrupted,
            }
        }
    }

    /// Fails with a scripted error on each listed attempt, succeeds otherwise.
    struct Scripted {
        failures: Vec<Fail>,
        calls: u32,
    }

    impl Scripted {
        fn new(failures: Vec<Fail>) -> Self {
            Self { failures, calls: 0 }
        }
    }

    #[async_trait]
    impl Attempt for Scripted {
        type Output = &'static str;

        async fn run(&mut self, attempt: u32) -> Result<&'static str> {
            self.calls += 1;
            assert_eq!(attempt, self.calls);
            match self.failures.get(attempt as usize - 1) {
                Some(fail) => Err(fail.error()),
                None => Ok("done"),
            }
        }
    }

    #[tokio::test]
    async fn test_success_on_sixth_attempt() {
        let mut task = Scripted::new(vec![Fail::NotReady; 5]);
        let outcome = run_attempts(&RetryPolicy::default(), &Shutdown::never(), &mut task)
            .await
            .unwrap();
        match outcome {
            RetryOutcome::Success { value, attempts } => {
                assert_eq!(value, "done");
                assert_eq!(attempts, 6);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exhausted_after_six_not_ready() {
        let mut task = Scripted::new(vec![Fail::NotReady; 6]);
        let outcome = run_attempts(&RetryPolicy::default(), &Shutdown::never(), &mut task)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            RetryOutcome::ExhaustedFailure {
                error: ScrapeError::NotReady { .. },
                attempts: 6
            }
        ));
        assert_eq!(task.calls, 6);
    }

    #[tokio::test]
    async fn test_not_found_short_circuits() {
        let mut task = Scripted::new(vec![Fail::Missing, Fail::NotFound, Fail::NotReady, Fail::NotReady]);
        let outcome = run_attempts(&RetryPolicy::default(), &Shutdown::never(), &mut task)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            RetryOutcome::ExhaustedFailure {
                error: ScrapeError::NotFound { .. },
                attempts: 2
            }
        ));
        assert_eq!(task.calls, 2);
    }

    #[tokio::test]
    async fn test_mixed_retryable_errors_consume_attempts() {
        let mut task = Scripted::new(vec![Fail::Unknown, Fail::Missing, Fail::Unknown]);
        let outcome = run_attempts(&RetryPolicy::default(), &Shutdown::never(), &mut task)
            .await
            .unwrap();
        assert_eq!(outcome.attempts(), 4);
        assert!(matches!(outcome, RetryOutcome::Success { .. }));
    }

    #[tokio::test]
    async fn test_zero_max_attempts_still_runs_once() {
        let mut task = Scripted::new(vec![Fail::Unknown]);
        let policy = RetryPolicy { max_attempts: 0 };
        let outcome = run_attempts(&policy, &Shutdown::never(), &mut task)
            .await
            .unwrap();
        assert_eq!(outcome.attempts(), 1);
        assert_eq!(task.calls, 1);
    }

    struct Hangs;

    #[async_trait]
    impl Attempt for Hangs {
        type Output = ();

        async fn run(&mut self, _attempt: u32) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_interrupt_aborts_running_attempt() {
        let (trigger, shutdown) = shutdown::channel();
        let handle = tokio::spawn(async move {
            run_attempts(&RetryPolicy::default(), &shutdown, &mut Hangs).await
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.trigger();

        let result = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(ScrapeError::Interrupted)));
    }

    #[tokio::test]
    async fn test_interrupted_error_from_task_is_not_retried() {
        let mut task = Scripted::new(vec![Fail::Interrupt]);
        let result = run_attempts(&RetryPolicy::default(), &Shutdown::never(), &mut task).await;
        assert!(matches!(result, Err(ScrapeError::Interrupted)));
        assert_eq!(task.calls, 1);
    }
}
