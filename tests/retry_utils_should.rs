use std::time::Duration;

use resolver::server::utils::retry_utils::{RetryPolicy, retry_attempts};
use resolver::upstream::episode::{AttemptFailure, Resolution, StreamCandidate};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const DELAY: Duration = Duration::from_secs(2);

// the paused clock jumps straight to each deadline, a little slack covers timer rounding
fn assert_waited(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(50),
        "expected to wait {:?}, waited {:?}",
        expected,
        elapsed
    );
}

fn stream() -> StreamCandidate {
    StreamCandidate::new("Mp4", "https://cdn.example/ep1.mp4")
}

#[tokio::test(start_paused = true)]
async fn stop_retrying_after_the_first_success() {
    let cancel = CancellationToken::new();
    let start = Instant::now();
    let mut calls = 0;

    let resolution = retry_attempts(RetryPolicy::new(5, DELAY), &cancel, |n| {
        calls += 1;
        async move {
            if n < 3 {
                Err(AttemptFailure::NoCandidates)
            } else {
                Ok(stream())
            }
        }
    })
    .await;

    assert_eq!(
        resolution,
        Resolution::Resolved {
            stream: stream(),
            attempts: 3
        }
    );
    assert_eq!(calls, 3);
    // two waits, one after each failure
    assert_waited(start, DELAY * 2);
}

#[tokio::test(start_paused = true)]
async fn return_not_found_once_attempts_are_exhausted() {
    let cancel = CancellationToken::new();
    let start = Instant::now();
    let mut calls = 0;

    let resolution = retry_attempts(RetryPolicy::new(3, DELAY), &cancel, |_| {
        calls += 1;
        async { Err(AttemptFailure::NoProviders) }
    })
    .await;

    assert_eq!(
        resolution,
        Resolution::NotFound {
            reason: AttemptFailure::NoProviders,
            attempts: 3
        }
    );
    assert_eq!(calls, 3);
    // no wait after the last attempt
    assert_waited(start, DELAY * 2);
}

#[tokio::test(start_paused = true)]
async fn succeed_first_time_without_waiting() {
    let cancel = CancellationToken::new();
    let start = Instant::now();

    let resolution =
        retry_attempts(RetryPolicy::new(10, DELAY), &cancel, |_| async { Ok(stream()) }).await;

    assert!(matches!(resolution, Resolution::Resolved { attempts: 1, .. }));
    assert_waited(start, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn run_at_least_one_attempt() {
    let cancel = CancellationToken::new();
    let mut calls = 0;

    let resolution = retry_attempts(RetryPolicy::new(0, DELAY), &cancel, |_| {
        calls += 1;
        async { Err(AttemptFailure::NoCandidates) }
    })
    .await;

    assert_eq!(calls, 1);
    assert!(matches!(resolution, Resolution::NotFound { attempts: 1, .. }));
}

#[tokio::test(start_paused = true)]
async fn stop_waiting_when_cancelled() {
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let mut calls = 0;

    let resolution = retry_attempts(RetryPolicy::new(10, DELAY), &cancel, |_| {
        calls += 1;
        async { Err(AttemptFailure::NoCandidates) }
    })
    .await;

    // attempt 1, wait, attempt 2, cancelled halfway through the second wait
    assert_eq!(calls, 2);
    assert_eq!(
        resolution,
        Resolution::NotFound {
            reason: AttemptFailure::Cancelled,
            attempts: 2
        }
    );
    assert_waited(start, Duration::from_secs(3));
}

#[tokio::test]
async fn not_start_when_already_cancelled() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let resolution = retry_attempts(RetryPolicy::new(3, DELAY), &cancel, |_| {
        std::future::pending::<Result<StreamCandidate, AttemptFailure>>()
    })
    .await;

    assert_eq!(
        resolution,
        Resolution::NotFound {
            reason: AttemptFailure::Cancelled,
            attempts: 1
        }
    );
}
