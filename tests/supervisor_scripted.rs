// tests/supervisor_scripted.rs

use procpool_test_utils::fake_factory::{Script, ScriptedFactory};
use procpool_test_utils::{init_tracing, with_timeout};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use procpool::engine::{self, PoolOptions, Shutdown, Supervisor};

#[tokio::test]
async fn three_instances_without_repeat_each_run_once() {
    init_tracing();

    let shutdown = Shutdown::new();
    let factory = Arc::new(ScriptedFactory::always(Script::Succeed));
    let stats = factory.stats();

    with_timeout(engine::run(&shutdown, factory, 3, false)).await;

    assert_eq!(stats.created(), 3);
    assert_eq!(stats.started(), 3);
    assert_eq!(stats.succeeded(), 3);
    assert_eq!(stats.failed(), 0);
}

#[tokio::test]
async fn zero_instances_is_a_no_op() {
    init_tracing();

    let shutdown = Shutdown::new();
    let factory = Arc::new(ScriptedFactory::always(Script::Succeed));
    let stats = factory.stats();

    with_timeout(engine::run(&shutdown, factory, 0, true)).await;

    assert_eq!(stats.created(), 0);
    assert_eq!(stats.started(), 0);
}

#[tokio::test]
async fn failures_retire_workers_even_with_repeat() {
    init_tracing();

    let shutdown = Shutdown::new();
    let factory = Arc::new(ScriptedFactory::always(Script::Fail(1)));
    let stats = factory.stats();

    with_timeout(engine::run(&shutdown, factory, 3, true)).await;

    assert_eq!(stats.started(), 3);
    assert_eq!(stats.failed(), 3);
    // No replacements were ever built.
    assert_eq!(stats.created(), 3);
    assert!(!shutdown.is_triggered());
}

#[tokio::test]
async fn start_failures_retire_workers() {
    init_tracing();

    let shutdown = Shutdown::new();
    let factory = Arc::new(ScriptedFactory::always(Script::StartFail));
    let stats = factory.stats();

    with_timeout(engine::run(&shutdown, factory, 2, true)).await;

    assert_eq!(stats.failed(), 2);
    assert_eq!(stats.created(), 2);
}

#[tokio::test]
async fn mixed_outcomes_without_repeat_run_each_seed_once() {
    init_tracing();

    let shutdown = Shutdown::new();
    let factory = Arc::new(ScriptedFactory::new(|i| {
        if i % 2 == 0 {
            Script::Succeed
        } else {
            Script::Fail(2)
        }
    }));
    let stats = factory.stats();

    with_timeout(engine::run(&shutdown, factory, 4, false)).await;

    assert_eq!(stats.started(), 4);
    assert_eq!(stats.succeeded(), 2);
    assert_eq!(stats.failed(), 2);
    assert_eq!(stats.created(), 4);
}

/// One seed always fails, everything else succeeds: the failing slot retires
/// after its first run while the healthy slot keeps restarting until shutdown.
#[tokio::test]
async fn failing_sibling_does_not_stop_healthy_worker() {
    init_tracing();

    let shutdown = Shutdown::new();
    let factory = Arc::new(
        ScriptedFactory::new(|i| if i == 0 { Script::Fail(1) } else { Script::Succeed })
            .run_time(Duration::from_millis(5)),
    );
    let stats = factory.stats();

    let supervisor = Supervisor::new(
        factory,
        PoolOptions {
            instances: 2,
            repeat: true,
        },
    );
    let handle = tokio::spawn(supervisor.run(shutdown.clone()));

    // Let the healthy slot cycle a few times.
    with_timeout(async {
        while stats.succeeded() < 5 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(!handle.is_finished());

    shutdown.trigger();
    with_timeout(handle).await.unwrap();

    assert_eq!(stats.failed(), 1);
    assert!(stats.succeeded() >= 5);
    // Every success queued exactly one replacement.
    assert_eq!(stats.created(), 2 + stats.succeeded());

    // No instance was ever run twice.
    let ids = stats.started_ids();
    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
}
