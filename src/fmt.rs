//! Formatting implementation for the RadixTrie

use std::fmt::{Debug, Formatter, Result};

use super::*;

impl<P: Debug, T: Debug> Debug for RadixTrie<P, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugNode(self, NodeId::ROOT).fmt(f)
    }
}

struct DebugNode<'a, P, T>(&'a RadixTrie<P, T>, NodeId);

/// A node's prefix together with the bit range it covers, e.g. `10.0.0.0/8 [0..7]`.
struct Span<'a, P>(&'a P, u8, u8);

impl<P: Debug> Debug for Span<'_, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{:?} [{}..{}]", self.0, self.1, self.2)
    }
}

impl<P: Debug, T: Debug> Debug for DebugNode<'_, P, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let trie = self.0;
        let node = &trie[self.1];
        let span = Span(node.prefix(), node.begin(), node.end());
        match (node.value(), node.child(false), node.child(true)) {
            (None, None, None) => span.fmt(f),
            (None, None, Some(child)) | (None, Some(child), None) => {
                f.debug_map().entry(&span, &Self(trie, child)).finish()
            }
            (None, Some(left), Some(right)) => f
                .debug_map()
                .entry(&span, &(Self(trie, left), Self(trie, right)))
                .finish(),
            (Some(v), None, None) => f.debug_map().entry(&span, v).finish(),
            (Some(v), None, Some(child)) | (Some(v), Some(child), None) => f
                .debug_map()
                .entry(&span, &(v, Self(trie, child)))
                .finish(),
            (Some(v), Some(left), Some(right)) => f
                .debug_map()
                .entry(&span, &(v, Self(trie, left), Self(trie, right)))
                .finish(),
        }
    }
}
