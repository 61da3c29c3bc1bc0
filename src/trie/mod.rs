//! Implementation of the compressed radix trie.
//!
//! Every node covers a range `[begin, end)` of bit positions. The prefix stored in a node may be
//! longer than `end`; only the bits below `end` take part in matching, the rest is padding left
//! over from a split. A node whose stored prefix ends exactly at `end` is *registered*: it stands
//! for a prefix that was inserted and carries that prefix's payload. All other nodes are branch
//! points and always have two children.
//!
//! Nodes live in an arena (`Vec`) and refer to each other by [`NodeId`]. Nodes are never removed,
//! so a `NodeId` handed out by [`RadixTrie::insert`] stays valid for the lifetime of the trie.

use std::ops::Index;

use crate::{child_slot, Prefix};

mod iter;
mod validate;

pub use iter::Iter;

/// Stable handle of a node in a [`RadixTrie`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node. It covers the empty range and matches every address.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A single node of the trie.
#[derive(Clone)]
pub struct Node<P, T> {
    pub(crate) prefix: P,
    pub(crate) begin: u8,
    pub(crate) end: u8,
    pub(crate) subs: [Option<NodeId>; 2],
    pub(crate) value: Option<T>,
}

impl<P, T> Node<P, T> {
    fn new(prefix: P, begin: u8, end: u8, value: Option<T>) -> Self {
        Self {
            prefix,
            begin,
            end,
            subs: [None, None],
            value,
        }
    }

    /// The stored prefix. Only the bits before [`Node::end`] are meaningful unless the node is
    /// registered.
    pub fn prefix(&self) -> &P {
        &self.prefix
    }

    /// First bit position covered by this node.
    pub fn begin(&self) -> u8 {
        self.begin
    }

    /// One past the last bit position covered by this node.
    pub fn end(&self) -> u8 {
        self.end
    }

    /// The payload attached to this node, if the node is registered.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Child selected by the bit at position [`Node::end`].
    pub fn child(&self, bit: bool) -> Option<NodeId> {
        self.subs[bit as usize]
    }
}

impl<P: Prefix, T> Node<P, T> {
    /// Whether the node stands for an inserted prefix, rather than being a pure branch point.
    pub fn is_registered(&self) -> bool {
        self.end == self.prefix.prefix_len()
    }

    /// Number of leading bits of `prefix` that agree with this node, capped at [`Node::end`] and
    /// at the length of `prefix`.
    fn matched(&self, prefix: &P) -> u8 {
        self.end
            .min(prefix.prefix_len())
            .min(self.prefix.first_differing_bit(prefix))
    }
}

/// Compressed binary trie mapping prefixes to values, answering longest-prefix-match queries.
#[derive(Clone)]
pub struct RadixTrie<P, T> {
    pub(crate) table: Vec<Node<P, T>>,
    count: usize,
}

impl<P, T> Default for RadixTrie<P, T>
where
    P: Prefix,
{
    fn default() -> Self {
        Self {
            table: vec![Node::new(P::zero(), 0, 0, None)],
            count: 0,
        }
    }
}

impl<P, T> RadixTrie<P, T>
where
    P: Prefix,
{
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trie whose root carries `value`. Every lookup that matches no inserted prefix
    /// resolves to this value.
    ///
    /// ```
    /// # use ip_summary::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let trie: RadixTrie<Ipv4Net, _> = RadixTrie::with_default("unknown");
    /// assert_eq!(trie.get_lpm(&"8.8.8.8/32".parse()?).map(|(_, v)| *v), Some("unknown"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_default(value: T) -> Self {
        let mut trie = Self::new();
        trie.table[NodeId::ROOT.0].value = Some(value);
        trie.count = 1;
        trie
    }

    /// Number of prefixes with a value, including the root if it carries one.
    pub fn len(&self) -> usize {
        self.count
    }

    /// True if no prefix carries a value.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of nodes in the arena, branch points included.
    pub fn node_count(&self) -> usize {
        self.table.len()
    }

    /// Insert `prefix` with `value`, returning the node that now represents `prefix` and the
    /// value that was registered for the exact same prefix before, if any.
    ///
    /// ```
    /// # use ip_summary::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: RadixTrie<Ipv4Net, _> = RadixTrie::new();
    /// let (node, old) = trie.insert("10.0.0.0/8".parse()?, 1);
    /// assert_eq!(old, None);
    /// assert_eq!(trie.insert("10.0.0.0/8".parse()?, 2), (node, Some(1)));
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert(&mut self, prefix: P, value: T) -> (NodeId, Option<T>)
    where
        P: Clone,
    {
        let len = prefix.prefix_len();
        debug_assert!(len <= P::width());

        let mut cur = NodeId::ROOT;
        // parent of `cur` and the slot through which it was entered
        let mut link: Option<(NodeId, usize)> = None;

        loop {
            let node = &self.table[cur.0];
            let (begin, end) = (node.begin, node.end);
            let matched = node.matched(&prefix);
            debug_assert!(matched > begin || cur == NodeId::ROOT);

            if matched == len {
                if len == end {
                    // ends right at the boundary of this node: register it here
                    let node = &mut self.table[cur.0];
                    node.prefix = prefix;
                    let old = node.value.replace(value);
                    if old.is_none() {
                        self.count += 1;
                    }
                    return (cur, old);
                }

                // `prefix` is a super-prefix of `cur`: splice a new node in front of it
                let Some((parent, slot)) = link else {
                    unreachable!("the root covers no bits and is never spliced")
                };
                let tail_slot = child_slot(&node.prefix, len);
                let new = self.push(Node::new(prefix, begin, len, Some(value)));
                self.table[cur.0].begin = len;
                self.table[new.0].subs[tail_slot] = Some(cur);
                self.table[parent.0].subs[slot] = Some(new);
                self.count += 1;
                return (new, None);
            }

            if matched < end {
                // diverges inside the range of `cur`: split it at `matched`
                let Some((parent, slot)) = link else {
                    unreachable!("the root covers no bits and is never split")
                };
                let tail_slot = child_slot(&node.prefix, matched);
                let new_slot = child_slot(&prefix, matched);
                debug_assert_ne!(tail_slot, new_slot);

                let head = Node::new(node.prefix.clone(), begin, matched, None);
                let head = self.push(head);
                let new = self.push(Node::new(prefix, matched, len, Some(value)));
                self.table[cur.0].begin = matched;
                self.table[head.0].subs[tail_slot] = Some(cur);
                self.table[head.0].subs[new_slot] = Some(new);
                self.table[parent.0].subs[slot] = Some(head);
                self.count += 1;
                return (new, None);
            }

            // the whole range of `cur` matches: descend
            debug_assert!(matched == end && end < len);
            let slot = child_slot(&prefix, end);
            let next = node.subs[slot];
            match next {
                Some(next) => {
                    link = Some((cur, slot));
                    cur = next;
                }
                None => {
                    let new = self.push(Node::new(prefix, end, len, Some(value)));
                    self.table[cur.0].subs[slot] = Some(new);
                    self.count += 1;
                    return (new, None);
                }
            }
        }
    }

    /// Longest-prefix match: the node of the most specific registered prefix that contains
    /// `prefix`. Falls back to [`NodeId::ROOT`], so the lookup never fails.
    ///
    /// ```
    /// # use ip_summary::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: RadixTrie<Ipv4Net, _> = RadixTrie::new();
    /// let (wide, _) = trie.insert("10.0.0.0/8".parse()?, 1);
    /// let (narrow, _) = trie.insert("10.1.0.0/16".parse()?, 2);
    /// assert_eq!(trie.lookup(&"10.1.2.3/32".parse()?), narrow);
    /// assert_eq!(trie.lookup(&"10.2.2.3/32".parse()?), wide);
    /// assert_eq!(trie.lookup(&"8.8.8.8/32".parse()?), NodeId::ROOT);
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup(&self, prefix: &P) -> NodeId {
        let len = prefix.prefix_len();
        let mut cur = NodeId::ROOT;
        let mut best = NodeId::ROOT;
        loop {
            let node = &self.table[cur.0];
            if node.matched(prefix) < node.end {
                return best;
            }
            if node.is_registered() {
                debug_assert!(node.value.is_some() || cur == NodeId::ROOT);
                best = cur;
            }
            if node.end == len {
                return best;
            }
            match node.subs[child_slot(prefix, node.end)] {
                Some(next) => cur = next,
                None => return best,
            }
        }
    }

    /// Get the value of the longest registered prefix containing `prefix`, together with that
    /// prefix. Returns `None` only if nothing matches and the root carries no value.
    ///
    /// ```
    /// # use ip_summary::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let (narrow, wide): (Ipv4Net, Ipv4Net) = ("192.168.1.0/24".parse()?, "192.168.0.0/23".parse()?);
    /// let mut trie = RadixTrie::new();
    /// trie.insert(narrow, 1);
    /// trie.insert(wide, 2);
    /// assert_eq!(trie.get_lpm(&"192.168.1.1/32".parse()?), Some((&narrow, &1)));
    /// assert_eq!(trie.get_lpm(&"192.168.0.0/24".parse()?), Some((&wide, &2)));
    /// assert_eq!(trie.get_lpm(&"192.168.2.0/24".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_lpm(&self, prefix: &P) -> Option<(&P, &T)> {
        let node = &self[self.lookup(prefix)];
        node.value.as_ref().map(|v| (&node.prefix, v))
    }

    /// Get the value registered for exactly `prefix`.
    pub fn get(&self, prefix: &P) -> Option<&T> {
        let node = &self[self.lookup(prefix)];
        if node.prefix.eq(prefix) {
            node.value.as_ref()
        } else {
            None
        }
    }

    /// Mutable access to the value attached to `node`.
    pub fn value_mut(&mut self, node: NodeId) -> Option<&mut T> {
        self.table.get_mut(node.0).and_then(|n| n.value.as_mut())
    }

    /// Iterate over all prefixes with a value in lexicographic order.
    pub fn iter(&self) -> Iter<'_, P, T> {
        Iter::new(self)
    }

    fn push(&mut self, node: Node<P, T>) -> NodeId {
        let id = NodeId(self.table.len());
        self.table.push(node);
        id
    }
}

impl<P, T> Index<NodeId> for RadixTrie<P, T> {
    type Output = Node<P, T>;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.table[index.0]
    }
}

impl<P, T> FromIterator<(P, T)> for RadixTrie<P, T>
where
    P: Prefix + Clone,
{
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl<P, T> Extend<(P, T)> for RadixTrie<P, T>
where
    P: Prefix + Clone,
{
    fn extend<I: IntoIterator<Item = (P, T)>>(&mut self, iter: I) {
        for (prefix, value) in iter {
            self.insert(prefix, value);
        }
    }
}
