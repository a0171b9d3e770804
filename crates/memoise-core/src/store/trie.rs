//! Trie store: one level per argument position.
//!
//! A node carries an optional leaf next to its children, so a sequence can be
//! both a cached key and the prefix of a longer one. The root's leaf holds the
//! zero-argument result.

use std::collections::HashMap;
use std::hash::Hash;

use super::KeyStore;

#[derive(Debug, Clone)]
struct TrieNode<A, R> {
    leaf: Option<R>,
    children: HashMap<A, TrieNode<A, R>>,
}

impl<A, R> TrieNode<A, R> {
    fn new() -> Self {
        Self {
            leaf: None,
            children: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrieStore<A, R> {
    root: TrieNode<A, R>,
    entries: usize,
}

impl<A, R> TrieStore<A, R> {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            entries: 0,
        }
    }
}

impl<A, R> Default for TrieStore<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> TrieStore<A, R>
where
    A: Eq + Hash + Clone,
{
    /// Total nodes below the root, counting shared prefixes once.
    pub fn node_count(&self) -> usize {
        fn count<A, R>(node: &TrieNode<A, R>) -> usize {
            node.children.values().map(|c| 1 + count(c)).sum()
        }
        count(&self.root)
    }

    fn visit_node(
        node: &TrieNode<A, R>,
        path: &mut Vec<A>,
        visit: &mut dyn FnMut(&[A], &R),
    ) {
        if let Some(value) = &node.leaf {
            visit(path, value);
        }
        for (arg, child) in &node.children {
            path.push(arg.clone());
            Self::visit_node(child, path, visit);
            path.pop();
        }
    }
}

impl<A, R> KeyStore<A, R> for TrieStore<A, R>
where
    A: Eq + Hash + Clone,
{
    fn lookup(&self, args: &[A]) -> Option<&R> {
        let mut node = &self.root;
        for arg in args {
            node = node.children.get(arg)?;
        }
        node.leaf.as_ref()
    }

    fn install(&mut self, args: &[A], value: R) {
        let mut node = &mut self.root;
        for arg in args {
            node = node
                .children
                .entry(arg.clone())
                .or_insert_with(TrieNode::new);
        }
        if node.leaf.replace(value).is_none() {
            self.entries += 1;
        }
    }

    fn len(&self) -> usize {
        self.entries
    }

    fn for_each_entry(&self, visit: &mut dyn FnMut(&[A], &R)) {
        let mut path = Vec::new();
        Self::visit_node(&self.root, &mut path, visit);
    }
}
