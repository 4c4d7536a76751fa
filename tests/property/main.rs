// tests/property/main.rs

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use proptest::prelude::*;

use procpool::engine::{self, Shutdown};
use procpool_test_utils::fake_factory::{Script, ScriptedFactory};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("build tokio runtime")
}

/// Seeds (ids below `n`) listed in `failing` fail; every other instance,
/// including every replacement, succeeds.
fn factory(n: usize, failing: BTreeSet<usize>) -> ScriptedFactory {
    ScriptedFactory::new(move |i| {
        if i < n && failing.contains(&i) {
            Script::Fail(1)
        } else {
            Script::Succeed
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Without repeat, every seed runs exactly once and nothing else is built.
    #[test]
    fn no_repeat_runs_each_seed_once(
        n in 0usize..8,
        failing in proptest::collection::btree_set(0usize..8, 0..8),
    ) {
        let shutdown = Shutdown::new();
        let factory = Arc::new(factory(n, failing.clone()));
        let stats = factory.stats();

        runtime().block_on(engine::run(&shutdown, factory, n, false));

        let expected_failures = failing.iter().filter(|&&i| i < n).count();
        prop_assert_eq!(stats.created(), n);
        prop_assert_eq!(stats.started(), n);
        prop_assert_eq!(stats.failed(), expected_failures);
        prop_assert_eq!(stats.succeeded(), n - expected_failures);
    }

    /// With repeat, the pool ends either because every seed failed or because
    /// shutdown fired after `stop_after` successes; each success built exactly
    /// one replacement and no instance ran twice.
    #[test]
    fn repeat_terminates_and_never_reuses_instances(
        n in 1usize..6,
        failing in proptest::collection::btree_set(0usize..6, 0..6),
        stop_after in 1usize..12,
    ) {
        let shutdown = Shutdown::new();
        let all_seeds_fail = (0..n).all(|i| failing.contains(&i));
        let factory = factory(n, failing).stop_after_successes(stop_after, shutdown.clone());
        let factory = Arc::new(factory);
        let stats = factory.stats();

        runtime().block_on(engine::run(&shutdown, factory, n, true));

        if all_seeds_fail {
            prop_assert_eq!(stats.succeeded(), 0);
            prop_assert_eq!(stats.failed(), n);
            prop_assert!(!shutdown.is_triggered());
        } else {
            prop_assert!(stats.succeeded() >= stop_after);
            prop_assert!(shutdown.is_triggered());
        }

        prop_assert_eq!(stats.created(), n + stats.succeeded());

        let ids = stats.started_ids();
        let unique: HashSet<_> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }
}
