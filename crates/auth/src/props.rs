//! Property tests for the resolver and the access evaluator.

use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::access::{AccessMap, check_access, check_access_all};
use crate::role::Role;
use crate::testing::MemoryRoleStore;

/// Random acyclic role graph: role `i` may only have parents with a smaller
/// index, so cycles are impossible by construction.
fn acyclic_graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0usize..12, 0..4), 1..12).prop_map(|raw| {
        raw.iter()
            .enumerate()
            .map(|(i, parents)| {
                let mut ps: Vec<usize> =
                    parents.iter().map(|p| p % (i + 1)).filter(|p| *p < i).collect();
                ps.sort_unstable();
                ps.dedup();
                ps
            })
            .collect()
    })
}

fn role_name(i: usize) -> String {
    format!("role{i}")
}

fn seed_graph(graph: &[Vec<usize>]) -> MemoryRoleStore {
    let store = MemoryRoleStore::new();
    for (i, parents) in graph.iter().enumerate() {
        store.seed(Role::new(
            "demo",
            role_name(i),
            "",
            parents.iter().map(|p| role_name(*p)).collect(),
        ));
    }
    store
}

/// Reference reachability: iterate to a fixed point over parent links.
fn reference_closure(graph: &[Vec<usize>], start: usize) -> BTreeSet<usize> {
    let mut reached = BTreeSet::from([start]);
    loop {
        let next: BTreeSet<usize> = reached
            .iter()
            .flat_map(|i| graph[*i].iter().copied())
            .chain(reached.iter().copied())
            .collect();
        if next == reached {
            return reached;
        }
        reached = next;
    }
}

proptest! {
    #[test]
    fn closure_equals_transitive_closure(graph in acyclic_graph(), start_raw in 0usize..12) {
        let start = start_raw % graph.len();
        let store = seed_graph(&graph);
        let role = Role::from_db(&store, "demo", &role_name(start)).unwrap();

        let access = role.all_access(&store).unwrap();

        // Duplicate-free.
        let as_set: BTreeSet<&String> = access.iter().collect();
        prop_assert_eq!(as_set.len(), access.len());

        // Self included.
        prop_assert!(access.contains(&role_name(start)));

        // Equal to the mathematical transitive closure over parents.
        let expected: BTreeSet<String> = reference_closure(&graph, start)
            .into_iter()
            .map(role_name)
            .collect();
        let actual: BTreeSet<String> = access.into_iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn padding_behaves_like_explicit_repetition(
        roles in prop::collection::vec("[a-c]{1}", 1..5),
        countries in prop::collection::vec("[x-z]{1}", 1..5),
        acc_raw in prop::collection::btree_map("[x-z]{1}", prop::collection::vec("[a-c]{1}", 0..4), 0..4),
    ) {
        let acc: AccessMap = acc_raw;
        let roles_ref: Vec<&str> = roles.iter().map(String::as_str).collect();
        let countries_ref: Vec<&str> = countries.iter().map(String::as_str).collect();

        let mut padded = countries.clone();
        while padded.len() < roles.len() {
            padded.push(countries.last().cloned().unwrap_or_default());
        }
        let padded_ref: Vec<&str> = padded.iter().map(String::as_str).collect();

        prop_assert_eq!(
            check_access(&roles_ref, &countries_ref, &acc),
            check_access(&roles_ref, &padded_ref, &acc)
        );
        prop_assert_eq!(
            check_access_all(&roles_ref, &countries_ref, &acc),
            check_access_all(&roles_ref, &padded_ref, &acc)
        );
    }

    #[test]
    fn or_and_agree_on_single_requirements(
        role in "[a-c]{1}",
        country in "[x-z]{1}",
        acc_raw in prop::collection::btree_map("[x-z]{1}", prop::collection::vec("[a-c]{1}", 0..4), 0..4),
    ) {
        let acc: AccessMap = acc_raw;
        prop_assert_eq!(
            check_access(&[role.as_str()], &[country.as_str()], &acc),
            check_access_all(&[role.as_str()], &[country.as_str()], &acc)
        );
    }

    #[test]
    fn any_match_grants_and_mode_subsumes(
        roles in prop::collection::vec("[a-c]{1}", 1..4),
        countries in prop::collection::vec("[x-z]{1}", 1..4),
        acc_raw in prop::collection::btree_map("[x-z]{1}", prop::collection::vec("[a-c]{1}", 0..4), 0..4),
    ) {
        let acc: AccessMap = acc_raw;
        let roles_ref: Vec<&str> = roles.iter().map(String::as_str).collect();
        let countries_ref: Vec<&str> = countries.iter().map(String::as_str).collect();

        // AND is at least as strict as OR.
        if check_access_all(&roles_ref, &countries_ref, &acc) {
            prop_assert!(check_access(&roles_ref, &countries_ref, &acc));
        }
    }
}
