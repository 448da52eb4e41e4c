//! Tests for the retry executor's attempt accounting, backoff and timeouts.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use lifebook_error::{
    GenerationErrorKind, LifebookError, LifebookErrorKind, ProviderError, ProviderErrorKind,
};
use lifebook_retry::{RetryConfig, RetryExecutor, RetryOutcome};
use tokio::time::Instant;

fn provider_failure() -> LifebookError {
    ProviderError::new(ProviderErrorKind::ApiStatus {
        status: 503,
        message: "overloaded".into(),
    })
    .into()
}

#[tokio::test(start_paused = true)]
async fn succeeds_on_third_attempt_after_backoff() {
    let executor = RetryExecutor::new(&RetryConfig::default());
    let attempts_at = Arc::new(Mutex::new(Vec::<Instant>::new()));

    let outcome = executor
        .run(|| {
            let attempts_at = attempts_at.clone();
            async move {
                let n = {
                    let mut at = attempts_at.lock().unwrap();
                    at.push(Instant::now());
                    at.len() - 1
                };
                if n < 2 {
                    Err(provider_failure())
                } else {
                    Ok("narrative")
                }
            }
        })
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.ok(), Some("narrative"));

    let at = attempts_at.lock().unwrap();
    assert_eq!(at.len(), 3);
    let first_gap = at[1] - at[0];
    let second_gap = at[2] - at[1];
    // 1s after the first failure, 2s after the second.
    assert!(first_gap >= Duration::from_secs(1) && first_gap < Duration::from_millis(1500));
    assert!(second_gap >= Duration::from_secs(2) && second_gap < Duration::from_millis(2500));
}

#[tokio::test(start_paused = true)]
async fn always_failing_operation_runs_exactly_max_retries_times() {
    let config = RetryConfig {
        max_retries: 4,
        ..Default::default()
    };
    let executor = RetryExecutor::new(&config);
    let calls = Arc::new(AtomicUsize::new(0));

    let outcome: RetryOutcome<String> = executor
        .run(|| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(provider_failure())
            }
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    match outcome {
        RetryOutcome::ProviderError { attempts, error } => {
            assert_eq!(attempts, 4);
            assert!(matches!(error.kind(), LifebookErrorKind::Provider(_)));
            assert!(error.to_string().contains("503"));
        }
        other => panic!("expected ProviderError outcome, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn slow_attempts_time_out() {
    let executor = RetryExecutor::new(&RetryConfig::default())
        .with_max_retries(2)
        .with_timeout(Duration::from_secs(5));
    let calls = Arc::new(AtomicUsize::new(0));

    let outcome: RetryOutcome<()> = executor
        .run(|| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    match outcome {
        RetryOutcome::Timeout { attempts, after } => {
            assert_eq!(attempts, 2);
            assert_eq!(after, Duration::from_secs(5));
        }
        other => panic!("expected Timeout outcome, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn timeout_then_success_recovers() {
    let executor = RetryExecutor::default().with_timeout(Duration::from_secs(1));
    let calls = Arc::new(AtomicUsize::new(0));

    let value = executor
        .execute(|| {
            let calls = calls.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    tokio::time::sleep(Duration::from_secs(10)).await;
                }
                Ok(42)
            }
        })
        .await
        .unwrap();

    assert_eq!(value, 42);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn zero_attempts_is_exhausted_without_calling() {
    let executor = RetryExecutor::default().with_max_retries(0);
    let calls = Arc::new(AtomicUsize::new(0));

    let outcome: RetryOutcome<()> = executor
        .run(|| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

    assert!(matches!(outcome, RetryOutcome::Exhausted));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn execute_maps_failure_to_generation_failed() {
    let executor = RetryExecutor::default().with_max_retries(2);

    let err = executor
        .execute(|| async { Err::<(), _>(provider_failure()) })
        .await
        .unwrap_err();

    assert!(err.is_generation_failed());
    match err.generation_kind() {
        Some(GenerationErrorKind::GenerationFailed { attempts, message }) => {
            assert_eq!(*attempts, 2);
            assert!(message.contains("overloaded"));
        }
        other => panic!("unexpected kind {:?}", other),
    }
}
