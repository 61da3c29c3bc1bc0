use std::{collections::HashMap, hash::Hash};

use super::*;
use itertools::Itertools;
use num_traits::{One, PrimInt};

type Trie = RadixTrie<TestPrefix, i32>;

/// Properties shared by both widths are written once and instantiated per prefix type.
trait TestKey: Prefix + Arbitrary + Copy + Eq + Ord + Hash + Debug {}

impl TestKey for TestPrefix {}
impl TestKey for WideTestPrefix {}

fn build<P: TestKey>(list: &[(P, i32)]) -> (RadixTrie<P, i32>, HashMap<P, i32>) {
    let mut trie = RadixTrie::new();
    let mut hmap = HashMap::new();
    for (p, t) in list {
        trie.insert(*p, *t);
        hmap.insert(*p, *t);
    }
    (trie, hmap)
}

fn iter_matches_reference<P: TestKey>(list: Vec<(P, i32)>) -> bool {
    let (trie, hmap) = build(&list);

    // assert that the iterator of both is the same
    trie.len() == hmap.len() && trie.iter().eq(hmap.iter().sorted())
}

fn valid_after_every_insert<P: TestKey>(list: Vec<(P, i32)>) -> bool {
    let mut trie = RadixTrie::new();
    list.into_iter().all(|(p, t)| {
        trie.insert(p, t);
        trie.validate().is_ok()
    })
}

fn lpm_matches_reference<P: TestKey>((list, queries): (Vec<(P, i32)>, Vec<P>)) -> bool {
    let (trie, hmap) = build(&list);
    // query the inserted prefixes themselves and their extensions, not only random prefixes
    let extended = list
        .iter()
        .map(|(p, _)| P::from_repr_len(!p.repr(), P::width()))
        .chain(list.iter().map(|(p, _)| P::from_repr_len(p.repr(), P::width())));
    queries
        .iter()
        .copied()
        .chain(extended)
        .all(|q| trie.get_lpm(&q) == brute_force_lpm(&hmap, &q))
}

fn order_independent<P: TestKey>(list: Vec<(P, i32)>) -> bool {
    // only the first value of each prefix, so that the order of insertion does not matter
    let list: Vec<_> = list.into_iter().unique_by(|(p, _)| *p).collect();
    let forward: RadixTrie<P, i32> = list.iter().copied().collect();
    let backward: RadixTrie<P, i32> = list.iter().rev().copied().collect();
    let step = (P::width() / 16) as usize;
    forward.iter().eq(backward.iter())
        && forward.node_count() == backward.node_count()
        && (0..=P::width()).step_by(step).all(|len| {
            list.iter()
                .flat_map(|(p, _)| {
                    // the prefix, its complement, and the prefix with bit `len` flipped
                    let flip = P::R::one().rotate_right(len as u32 + 1);
                    [p.repr(), !p.repr(), p.repr() ^ flip]
                })
                .map(|x| P::from_repr_len(x, len))
                .all(|q| forward.get_lpm(&q) == backward.get_lpm(&q))
        })
}

qc!(new, _new);
fn _new(list: Vec<(TestPrefix, i32)>) -> bool {
    iter_matches_reference(list)
}

qc!(new_wide, _new_wide);
fn _new_wide(list: Vec<(WideTestPrefix, i32)>) -> bool {
    iter_matches_reference(list)
}

qc!(structure_is_valid, _structure_is_valid);
fn _structure_is_valid(list: Vec<(TestPrefix, i32)>) -> bool {
    valid_after_every_insert(list)
}

qc!(structure_is_valid_wide, _structure_is_valid_wide);
fn _structure_is_valid_wide(list: Vec<(WideTestPrefix, i32)>) -> bool {
    valid_after_every_insert(list)
}

qc!(longest_prefix_match, _longest_prefix_match);
fn _longest_prefix_match(input: (Vec<(TestPrefix, i32)>, Vec<TestPrefix>)) -> bool {
    lpm_matches_reference(input)
}

qc!(longest_prefix_match_wide, _longest_prefix_match_wide);
fn _longest_prefix_match_wide(input: (Vec<(WideTestPrefix, i32)>, Vec<WideTestPrefix>)) -> bool {
    lpm_matches_reference(input)
}

qc!(insertion_order, _insertion_order);
fn _insertion_order(list: Vec<(TestPrefix, i32)>) -> bool {
    order_independent(list)
}

qc!(insertion_order_wide, _insertion_order_wide);
fn _insertion_order_wide(list: Vec<(WideTestPrefix, i32)>) -> bool {
    order_independent(list)
}

qc!(host_lookup, _host_lookup);
fn _host_lookup((list, addrs): (Vec<(TestPrefix, i32)>, Vec<u32>)) -> bool {
    let (trie, hmap) = build(&list);
    addrs.into_iter().map(TestPrefix::host).all(|q| {
        let node = &trie[trie.lookup(&q)];
        match brute_force_lpm(&hmap, &q) {
            Some((p, t)) => node.prefix() == p && node.value() == Some(t),
            None => node.value().is_none(),
        }
    })
}

qc!(lookup_with_default, _lookup_with_default);
fn _lookup_with_default((list, addrs): (Vec<(TestPrefix, i32)>, Vec<u32>)) -> bool {
    let mut trie = Trie::with_default(i32::MIN);
    trie.extend(list.iter().copied());
    let hmap: HashMap<_, _> = list.into_iter().collect();
    addrs.into_iter().map(TestPrefix::host).all(|q| {
        let want = brute_force_lpm(&hmap, &q).map(|(_, t)| *t);
        trie.get_lpm(&q).map(|(_, t)| *t) == Some(want.unwrap_or(i32::MIN))
    })
}

qc!(exact_get, _exact_get);
fn _exact_get((list, queries): (Vec<(TestPrefix, i32)>, Vec<TestPrefix>)) -> bool {
    let (trie, hmap) = build(&list);
    queries
        .iter()
        .chain(hmap.keys())
        .all(|q| trie.get(q) == hmap.get(q))
}

qc!(node_count, _node_count);
fn _node_count(list: Vec<(WideTestPrefix, i32)>) -> bool {
    let (trie, hmap) = build(&list);
    // every inserted prefix creates at most one leaf and one branch point
    trie.node_count() <= 2 * hmap.len() + 1
}

qc!(handles_are_stable, _handles_are_stable);
fn _handles_are_stable(list: Vec<(TestPrefix, i32)>) -> bool {
    let mut trie = Trie::new();
    let mut handles = HashMap::new();
    for (p, t) in list {
        let (node, _) = trie.insert(p, t);
        handles.insert(p, node);
    }
    handles
        .into_iter()
        .all(|(p, node)| trie[node].prefix() == &p && trie.lookup(&p) == node)
}
