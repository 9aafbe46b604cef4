use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::upstream::episode::{AttemptFailure, Resolution, StreamCandidate};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            // zero attempts makes no sense, always run at least one
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// run `attempt` until it hands back a stream or the budget runs out
///
/// there's a fixed `delay` between attempts and none after the last one. the first success ends
/// the loop. cancelling the token stops both a running attempt and the wait between attempts, in
/// which case the outcome is `NotFound` with `Cancelled`
pub async fn retry_attempts<F, Fut>(
    policy: RetryPolicy,
    cancel: &CancellationToken,
    mut attempt: F,
) -> Resolution
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<StreamCandidate, AttemptFailure>>,
{
    let mut last_failure = AttemptFailure::NoCandidates;

    for n in 1..=policy.max_attempts {
        debug!("attempt {}/{}", n, policy.max_attempts);

        let outcome = tokio::select! {
            outcome = attempt(n) => outcome,
            _ = cancel.cancelled() => {
                warn!("resolution cancelled during attempt {}", n);
                return Resolution::NotFound { reason: AttemptFailure::Cancelled, attempts: n };
            }
        };

        match outcome {
            Ok(stream) => {
                if n > 1 {
                    info!("resolved after {} attempts", n);
                }
                return Resolution::Resolved {
                    stream,
                    attempts: n,
                };
            }
            Err(failure) => {
                warn!(
                    "attempt {}/{} failed: {}",
                    n, policy.max_attempts, failure
                );
                last_failure = failure;
            }
        }

        if n == policy.max_attempts {
            break;
        }

        debug!("retrying in {:?}", policy.delay);
        tokio::select! {
            _ = tokio::time::sleep(policy.delay) => {}
            _ = cancel.cancelled() => {
                warn!("resolution cancelled while waiting to retry");
                return Resolution::NotFound { reason: AttemptFailure::Cancelled, attempts: n };
            }
        }
    }

    warn!(
        "giving up after {} attempts, last failure: {}",
        policy.max_attempts, last_failure
    );
    Resolution::NotFound {
        reason: last_failure,
        attempts: policy.max_attempts,
    }
}
