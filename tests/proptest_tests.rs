//! Property-based tests for triangle aggregation
//!
//! Random acyclic scene graphs are generated in memory and the builder's
//! totals are checked against a direct recursive sum.

mod common;

use common::{MemoryLoader, ls3};
use proptest::prelude::*;
use std::collections::BTreeSet;
use tricount::{CounterConfig, GraphBuilder, TreePrinter};

/// Subset counts and outgoing links (to higher indices only) per node
type SceneDag = Vec<(Vec<u64>, Vec<usize>)>;

fn scene_dag_strategy() -> impl Strategy<Value = SceneDag> {
    (1usize..8)
        .prop_flat_map(|n| {
            prop::collection::vec(
                (
                    prop::collection::vec(0u64..500, 0..4),
                    prop::collection::vec(any::<usize>(), 0..4),
                ),
                n,
            )
        })
        .prop_map(|nodes| {
            let n = nodes.len();
            nodes
                .into_iter()
                .enumerate()
                .map(|(i, (subsets, raw_links))| {
                    let links = if i + 1 < n {
                        raw_links
                            .into_iter()
                            .map(|r| i + 1 + r % (n - i - 1))
                            .collect()
                    } else {
                        Vec::new()
                    };
                    (subsets, links)
                })
                .collect()
        })
}

fn node_path(i: usize) -> String {
    format!("/scene/n{}.ls3", i)
}

fn loader_for(dag: &SceneDag) -> MemoryLoader {
    let loader = MemoryLoader::new();
    for (i, (subsets, links)) in dag.iter().enumerate() {
        let refs: Vec<String> = links.iter().map(|j| format!("n{}.ls3", j)).collect();
        let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
        loader.insert(node_path(i), ls3(subsets, &refs));
    }
    loader
}

fn expected_total(dag: &SceneDag, i: usize) -> u64 {
    let (subsets, links) = &dag[i];
    subsets.iter().sum::<u64>() + links.iter().map(|&j| expected_total(dag, j)).sum::<u64>()
}

fn reachable(dag: &SceneDag, i: usize, seen: &mut BTreeSet<usize>) {
    if seen.insert(i) {
        for &j in &dag[i].1 {
            reachable(dag, j, seen);
        }
    }
}

proptest! {
    #[test]
    fn prop_totals_match_recursive_sum(dag in scene_dag_strategy()) {
        let loader = loader_for(&dag);
        let graph = GraphBuilder::new(CounterConfig::new())
            .with_loader(loader.clone())
            .build(node_path(0))
            .unwrap();
        let root = graph.root().unwrap();

        prop_assert_eq!(graph[root].total_triangle_count, expected_total(&dag, 0));

        for (_, file) in graph.iter() {
            let linked: u64 = file
                .linked_files
                .iter()
                .map(|link| graph[link.file].total_triangle_count)
                .sum();
            prop_assert_eq!(file.total_triangle_count, file.own_triangle_count + linked);
        }
    }

    #[test]
    fn prop_each_file_loaded_once(dag in scene_dag_strategy()) {
        let loader = loader_for(&dag);
        let graph = GraphBuilder::new(CounterConfig::new())
            .with_loader(loader.clone())
            .build(node_path(0))
            .unwrap();

        let mut seen = BTreeSet::new();
        reachable(&dag, 0, &mut seen);

        prop_assert_eq!(graph.len(), seen.len());
        prop_assert_eq!(loader.total_loads(), seen.len());
        prop_assert!(graph.diagnostics().is_empty());
    }

    #[test]
    fn prop_subset_detail_printed_once_per_file(dag in scene_dag_strategy()) {
        let loader = loader_for(&dag);
        let graph = GraphBuilder::new(CounterConfig::new())
            .with_loader(loader)
            .build(node_path(0))
            .unwrap();
        let report = TreePrinter::new()
            .with_data_root("/scene")
            .render(&graph, graph.root().unwrap());

        let mut seen = BTreeSet::new();
        reachable(&dag, 0, &mut seen);
        let expected_detail_lines: usize = seen
            .iter()
            .map(|&i| dag[i].0.iter().filter(|&&count| count > 0).count())
            .sum();

        let detail_lines = report.lines().filter(|line| line.contains("- %")).count();
        prop_assert_eq!(detail_lines, expected_detail_lines);
    }
}
