//! Flattened store: the whole argument sequence is one composite key.

use std::collections::HashMap;
use std::hash::Hash;

use super::KeyStore;

#[derive(Debug, Clone)]
pub struct FlatStore<A, R> {
    map: HashMap<Vec<A>, R>,
}

impl<A, R> FlatStore<A, R> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<A, R> Default for FlatStore<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> KeyStore<A, R> for FlatStore<A, R>
where
    A: Eq + Hash + Clone,
{
    fn lookup(&self, args: &[A]) -> Option<&R> {
        self.map.get(args)
    }

    fn install(&mut self, args: &[A], value: R) {
        self.map.insert(args.to_vec(), value);
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn for_each_entry(&self, visit: &mut dyn FnMut(&[A], &R)) {
        for (args, value) in &self.map {
            visit(args, value);
        }
    }
}
