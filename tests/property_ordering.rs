// tests/property_ordering.rs

mod common;

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use builddag::config::ConfigFile;
use builddag_test_utils::builders::{ConfigFileBuilder, ContextBuilder, TargetConfigBuilder};
use builddag_test_utils::fake_runner::{FakeRunner, RecordingSink};
use common::executor_for;
use proptest::prelude::*;

fn target_name(i: usize) -> String {
    format!("t{i}")
}

// Strategy to generate a valid DAG configuration together with its
// dependency lists. Acyclic because target N only depends on targets 0..N-1.
fn dag_strategy(max_targets: usize) -> impl Strategy<Value = (ConfigFile, Vec<Vec<usize>>)> {
    (1..=max_targets).prop_flat_map(|count| {
        proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..4), count).prop_map(
            move |raw| {
                let deps: Vec<Vec<usize>> = raw
                    .into_iter()
                    .enumerate()
                    .map(|(i, candidates)| {
                        let set: BTreeSet<usize> = if i == 0 {
                            BTreeSet::new()
                        } else {
                            candidates.into_iter().map(|c| c % i).collect()
                        };
                        set.into_iter().collect()
                    })
                    .collect();

                let mut builder = ConfigFileBuilder::new().primary(&target_name(count - 1));
                for (i, ds) in deps.iter().enumerate() {
                    let name = target_name(i);
                    let mut t = TargetConfigBuilder::cmd(&format!("run {name}"));
                    for d in ds {
                        t = t.depends_on(&target_name(*d));
                    }
                    builder = builder.with_target(&name, t.build());
                }
                (builder.build(), deps)
            },
        )
    })
}

/// Every target reachable from `requested` through dependencies.
fn closure(deps: &[Vec<usize>], requested: &[usize]) -> HashSet<usize> {
    let mut seen = HashSet::new();
    let mut stack: Vec<usize> = requested.to_vec();
    while let Some(i) = stack.pop() {
        if seen.insert(i) {
            stack.extend(deps[i].iter().copied());
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn requested_targets_run_once_after_their_predecessors(
        (cfg, deps) in dag_strategy(10),
        picks in proptest::collection::vec(any::<usize>(), 1..4),
    ) {
        let requested: Vec<usize> = picks.iter().map(|p| p % deps.len()).collect();
        let request: Vec<String> = requested.iter().map(|i| target_name(*i)).collect();

        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRunner::new());
        let ctx = ContextBuilder::new(dir.path()).build(runner.clone(), Arc::new(RecordingSink::new()));
        let mut exec = executor_for(&cfg, ctx);

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(exec.run(&request)).unwrap();
        // A repeated request runs nothing new.
        rt.block_on(exec.run(&request)).unwrap();

        let labels = runner.labels();
        let expected = closure(&deps, &requested);

        prop_assert_eq!(labels.len(), expected.len());
        let unique: HashSet<&String> = labels.iter().collect();
        prop_assert_eq!(unique.len(), labels.len());

        for (position, label) in labels.iter().enumerate() {
            let i: usize = label[1..].parse().unwrap();
            prop_assert!(expected.contains(&i));
            for d in &deps[i] {
                let dep_pos = labels.iter().position(|l| *l == target_name(*d));
                prop_assert!(matches!(dep_pos, Some(p) if p < position));
            }
        }
    }
}
