//! Iteration over the registered prefixes of a trie.

use super::*;

/// An iterator over all entries of a [`RadixTrie`] in lexicographic order.
pub struct Iter<'a, P, T> {
    table: &'a [Node<P, T>],
    nodes: Vec<NodeId>,
}

impl<'a, P, T> Iter<'a, P, T> {
    pub(super) fn new(trie: &'a RadixTrie<P, T>) -> Self {
        Self {
            table: &trie.table,
            nodes: vec![NodeId::ROOT],
        }
    }
}

impl<P, T> Clone for Iter<'_, P, T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            nodes: self.nodes.clone(),
        }
    }
}

impl<'a, P, T> Iterator for Iter<'a, P, T> {
    type Item = (&'a P, &'a T);

    fn next(&mut self) -> Option<(&'a P, &'a T)> {
        while let Some(cur) = self.nodes.pop() {
            let node = &self.table[cur.0];
            // visit the zero branch first
            self.nodes.extend(node.subs[1]);
            self.nodes.extend(node.subs[0]);
            if let Some(value) = node.value.as_ref() {
                return Some((&node.prefix, value));
            }
        }
        None
    }
}

impl<'a, P, T> IntoIterator for &'a RadixTrie<P, T>
where
    P: Prefix,
{
    type Item = (&'a P, &'a T);
    type IntoIter = Iter<'a, P, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
