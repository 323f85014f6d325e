use super::*;
use loadgen_core::ActionError;
use std::time::Duration;

fn ok_action() -> Arc<dyn Action> {
    Arc::new(|_session: &mut Session| -> Result<(), ActionError> { Ok(()) })
}

fn failing_action() -> Arc<dyn Action> {
    Arc::new(|_session: &mut Session| -> Result<(), ActionError> {
        Err(ActionError::new("boom"))
    })
}

#[tokio::test]
async fn submit_runs_the_action_and_reports_success() {
    let pool = ActionPool::new("login", 4, WorkerMode::Lightweight);
    let rx = pool.submit(ok_action(), Session::new()).unwrap();
    let outcome = rx.await.unwrap();
    assert!(outcome.result.is_ok());
    assert_eq!(pool.completed_count(), 1);
    assert_eq!(pool.failed_count(), 0);
}

#[tokio::test]
async fn submit_records_failures_without_inflating_completed() {
    let pool = ActionPool::new("login", 4, WorkerMode::Lightweight);
    let rx = pool.submit(failing_action(), Session::new()).unwrap();
    let outcome = rx.await.unwrap();
    assert!(outcome.result.is_err());
    assert_eq!(pool.completed_count(), 0);
    assert_eq!(pool.failed_count(), 1);
}

#[tokio::test]
async fn active_count_never_exceeds_max_size() {
    let max_size = 2;
    let pool = ActionPool::new("slow", max_size, WorkerMode::Lightweight);

    let mut receivers = Vec::new();
    for _ in 0..8 {
        receivers.push(pool.submit(ok_action(), Session::new()).unwrap());
    }
    for rx in receivers {
        let outcome = rx.await.unwrap();
        assert!(outcome.result.is_ok());
    }
    assert!(pool.active_count() <= max_size);
    assert_eq!(pool.completed_count(), 8);
}

#[tokio::test]
async fn bounded_mode_runs_jobs_beyond_core_worker_count() {
    let pool = ActionPool::new("bounded", 3, WorkerMode::Bounded { core: 1 });
    let mut receivers = Vec::new();
    for _ in 0..6 {
        receivers.push(pool.submit(ok_action(), Session::new()).unwrap());
    }
    for rx in receivers {
        assert!(rx.await.unwrap().result.is_ok());
    }
    assert_eq!(pool.completed_count(), 6);
}

#[tokio::test]
async fn shutdown_is_idempotent_and_refuses_new_submissions() {
    let pool = ActionPool::new("login", 2, WorkerMode::Lightweight);
    pool.shutdown().await;
    pool.shutdown().await;
    assert!(pool.submit(ok_action(), Session::new()).is_err());
}

#[tokio::test]
async fn shutdown_waits_for_inflight_work_to_drain() {
    let pool = ActionPool::new("login", 1, WorkerMode::Lightweight);
    let slow: Arc<dyn Action> = Arc::new(|_session: &mut Session| Ok(()));
    let rx = pool.submit(slow, Session::new()).unwrap();
    tokio::time::timeout(Duration::from_secs(1), pool.shutdown())
        .await
        .expect("shutdown should not hang waiting on a fast action");
    assert!(rx.await.is_ok());
}

#[tokio::test]
async fn a_job_dropped_while_still_waiting_for_a_permit_counts_as_failed() {
    let failed = Arc::new(AtomicU64::new(0));
    let (tx, rx) = oneshot::channel();
    {
        let _guard = CancelGuard {
            failed: Arc::clone(&failed),
            reply: Some(tx),
        };
        // dropped here without ever reaching a normal completion, as
        // happens when shutdown() aborts a task still parked on the gate
    }
    let outcome = rx.await.unwrap();
    assert!(outcome.result.is_err());
    assert_eq!(failed.load(Ordering::SeqCst), 1);
}
