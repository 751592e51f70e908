mod common;

use std::sync::Arc;
use std::time::Duration;

use cheers_worker::dispatcher::TickSummary;
use cheers_worker::{CelebrationDispatcher, CelebrationScheduler};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use common::{seed_birthday, seed_channel, seed_workspace, utc, RecordingMessenger};

fn scheduler(pool: &PgPool, messenger: &Arc<RecordingMessenger>, every: Duration) -> CelebrationScheduler {
    CelebrationScheduler::new(CelebrationDispatcher::new(pool.clone(), messenger.clone()), every)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn run_tick_dispatches_due_channels(pool: PgPool) {
    let ws = seed_workspace(&pool, "T1").await;
    seed_channel(&pool, ws.id, "C1", "UTC", "09:00").await;
    seed_birthday(&pool, ws.id, "U1", "Amy", (1, 6)).await;

    let messenger = Arc::new(RecordingMessenger::default());
    let scheduler = scheduler(&pool, &messenger, Duration::from_secs(60));

    let summary = scheduler.run_tick(utc(2024, 6, 1, 9, 0)).await;
    assert_eq!(summary, Some(TickSummary { due: 1, dispatched: 1, failed: 0 }));
    assert_eq!(messenger.posts().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn run_tick_swallows_database_errors(pool: PgPool) {
    let messenger = Arc::new(RecordingMessenger::default());
    let scheduler = scheduler(&pool, &messenger, Duration::from_secs(60));

    pool.close().await;

    assert_eq!(scheduler.run_tick(utc(2024, 6, 1, 9, 0)).await, None);
    assert!(messenger.posts().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn run_stops_promptly_after_cancellation(pool: PgPool) {
    let ws = seed_workspace(&pool, "T1").await;
    seed_channel(&pool, ws.id, "C1", "UTC", "09:00").await;

    let messenger = Arc::new(RecordingMessenger::default());
    let scheduler = scheduler(&pool, &messenger, Duration::from_millis(10));

    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { scheduler.run(cancel).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("scheduler did not stop after cancellation")
        .unwrap();

    let posts_at_cancel = messenger.posts().len();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(messenger.posts().len(), posts_at_cancel);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn run_returns_immediately_when_already_cancelled(pool: PgPool) {
    let messenger = Arc::new(RecordingMessenger::default());
    let scheduler = scheduler(&pool, &messenger, Duration::from_secs(3600));

    let cancel = CancellationToken::new();
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(1), scheduler.run(cancel))
        .await
        .expect("cancelled scheduler kept running");
    assert!(messenger.posts().is_empty());
}
