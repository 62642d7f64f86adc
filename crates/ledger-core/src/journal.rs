// ledger-core/src/journal.rs

use std::collections::HashMap;
use std::hash::Hash;

/// Collaborators whose effects can be undone when an enclosing operation fails.
///
/// Checkpoints nest: `commit` folds the changes since the innermost
/// checkpoint into the enclosing one, `rollback` reverts them.
pub trait Journaled {
    /// Begin a unit of work
    fn checkpoint(&mut self);

    /// Keep every change made since the innermost checkpoint
    fn commit(&mut self);

    /// Revert every change made since the innermost checkpoint
    fn rollback(&mut self);
}

/// Map with checkpoint/rollback support
#[derive(Debug, Clone)]
pub struct JournaledMap<K: Eq + Hash, V> {
    entries: HashMap<K, V>,
    /// Modifications since the oldest open checkpoint
    modifications: Vec<Modification<K, V>>,
}

#[derive(Debug, Clone)]
enum Modification<K, V> {
    Checkpoint,
    Set { key: K, old: Option<V> },
}

impl<K: Eq + Hash + Clone, V: Clone> JournaledMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            modifications: Vec::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.record(&key);
        self.entries.insert(key, value);
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.record(key);
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a checkpoint is open
    pub fn in_checkpoint(&self) -> bool {
        self.modifications
            .iter()
            .any(|m| matches!(m, Modification::Checkpoint))
    }

    /// Record the pre-checkpoint value of `key` unless it is already recorded
    fn record(&mut self, key: &K) {
        if !self.in_checkpoint() {
            return;
        }

        for entry in self.modifications.iter().rev() {
            match entry {
                Modification::Checkpoint => break,
                Modification::Set { key: k, .. } if k == key => return,
                _ => {}
            }
        }

        let old = self.entries.get(key).cloned();
        self.modifications.push(Modification::Set {
            key: key.clone(),
            old,
        });
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Journaled for JournaledMap<K, V> {
    fn checkpoint(&mut self) {
        self.modifications.push(Modification::Checkpoint);
    }

    fn commit(&mut self) {
        let last = self
            .modifications
            .iter()
            .rposition(|m| matches!(m, Modification::Checkpoint));

        match last {
            Some(0) => self.modifications.clear(),
            // Outer checkpoint still needs the recorded originals
            Some(index) => {
                self.modifications.remove(index);
            }
            None => {}
        }
    }

    fn rollback(&mut self) {
        while let Some(entry) = self.modifications.pop() {
            match entry {
                Modification::Checkpoint => break,
                Modification::Set { key, old } => {
                    if let Some(old) = old {
                        self.entries.insert(key, old);
                    } else {
                        self.entries.remove(&key);
                    }
                }
            }
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for JournaledMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
