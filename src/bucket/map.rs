//! Insertion-ordered class map.

use std::collections::HashMap;
use std::hash::Hash;

/// Mapping from class identifier to a value, iterated in first-insertion order.
///
/// Class order follows the order in which class ids first appear in the
/// detection input, so results are reproducible across runs.
#[derive(Clone, Debug)]
pub struct ClassMap<C, V> {
    entries: Vec<(C, V)>,
    index: HashMap<C, usize>,
}

impl<C, V> ClassMap<C, V>
where
    C: Eq + Hash + Clone,
{
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no class is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value stored for `class_id`.
    pub fn get(&self, class_id: &C) -> Option<&V> {
        self.index.get(class_id).map(|&idx| &self.entries[idx].1)
    }

    /// Inserts or replaces the value for `class_id`, keeping its original position.
    pub fn insert(&mut self, class_id: C, value: V) -> Option<V> {
        match self.index.get(&class_id) {
            Some(&idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.index.insert(class_id.clone(), self.entries.len());
                self.entries.push((class_id, value));
                None
            }
        }
    }

    /// Returns the value for `class_id`, inserting `V::default()` first if absent.
    pub fn entry_or_default(&mut self, class_id: C) -> &mut V
    where
        V: Default,
    {
        let idx = match self.index.get(&class_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.index.insert(class_id.clone(), idx);
                self.entries.push((class_id, V::default()));
                idx
            }
        };
        &mut self.entries[idx].1
    }

    /// Iterates class ids in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &C> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Iterates values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Iterates `(class_id, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&C, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<C, V> Default for ClassMap<C, V>
where
    C: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, V> PartialEq for ClassMap<C, V>
where
    C: Eq + Hash + Clone,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<C, V> FromIterator<(C, V)> for ClassMap<C, V>
where
    C: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (class_id, value) in iter {
            map.insert(class_id, value);
        }
        map
    }
}

impl<C, V> IntoIterator for ClassMap<C, V> {
    type Item = (C, V);
    type IntoIter = std::vec::IntoIter<(C, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
