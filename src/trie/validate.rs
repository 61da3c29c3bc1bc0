//! Structural self check of the trie.

use super::*;
use crate::error::InvariantViolation;

impl<P, T> RadixTrie<P, T>
where
    P: Prefix,
{
    /// Walk the whole trie and check every structural invariant: node ranges are non-empty and
    /// chained, children sit in the slot selected by their branching bit and agree with their
    /// parent on all bits the parent covers, branch points have two children, and every node of
    /// the arena is reachable exactly once.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let fail = |node: NodeId, reason: &'static str| -> Result<(), InvariantViolation> {
            Err(InvariantViolation { node, reason })
        };

        let root = &self.table[NodeId::ROOT.0];
        if root.begin != 0 || root.end != 0 || root.prefix.prefix_len() != 0 {
            return fail(NodeId::ROOT, "the root must cover the empty range");
        }

        let mut seen = 0;
        let mut values = 0;
        let mut nodes = vec![NodeId::ROOT];
        while let Some(id) = nodes.pop() {
            seen += 1;
            if seen > self.table.len() {
                return fail(id, "node is reachable more than once");
            }
            let node = &self.table[id.0];
            if node.value.is_some() {
                values += 1;
            }

            if id != NodeId::ROOT {
                if node.begin >= node.end {
                    return fail(id, "empty bit range");
                }
                if node.end > node.prefix.prefix_len() {
                    return fail(id, "bit range ends beyond the stored prefix");
                }
                if node.is_registered() != node.value.is_some() {
                    return fail(id, "payload present on a branch point or missing on a prefix");
                }
                if !node.is_registered() && node.subs.iter().any(Option::is_none) {
                    return fail(id, "branch point with less than two children");
                }
            }

            for (slot, child_id) in node.subs.iter().enumerate() {
                let Some(child_id) = *child_id else {
                    continue;
                };
                let child = &self.table[child_id.0];
                if child.begin != node.end {
                    return fail(child_id, "range does not start where the parent ends");
                }
                if child.prefix.first_differing_bit(&node.prefix) < node.end {
                    return fail(child_id, "disagrees with the parent on a shared bit");
                }
                if child_slot(&child.prefix, node.end) != slot {
                    return fail(child_id, "stored in the wrong child slot");
                }
                nodes.push(child_id);
            }
        }

        if seen != self.table.len() {
            return fail(NodeId::ROOT, "arena holds unreachable nodes");
        }
        if values != self.count {
            return fail(NodeId::ROOT, "payload count out of sync");
        }
        Ok(())
    }
}
