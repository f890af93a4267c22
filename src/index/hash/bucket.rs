//! Fixed-capacity bucket of the extendible hash index.

/// Holds up to `capacity` key/value pairs in insertion order, plus the
/// bucket's local depth.
#[derive(Debug, Clone)]
pub(crate) struct Bucket<K, V> {
    items: Vec<(K, V)>,
    capacity: usize,
    depth: u32,
}

impl<K, V> Bucket<K, V> {
    pub(crate) fn new(capacity: usize, depth: u32) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            depth,
        }
    }

    pub(crate) fn depth(&self) -> u32 {
        self.depth
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub(crate) fn items(&self) -> &[(K, V)] {
        &self.items
    }

    /// Append a new entry, ignoring capacity. Callers check `is_full`.
    pub(crate) fn push(&mut self, key: K, value: V) {
        self.items.push((key, value));
    }

    /// Take all entries out, leaving the bucket empty.
    pub(crate) fn drain(&mut self) -> Vec<(K, V)> {
        std::mem::take(&mut self.items)
    }
}

impl<K: Eq, V> Bucket<K, V> {
    pub(crate) fn find(&self, key: &K) -> Option<&V> {
        self.items.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Remove the entry for `key`. Returns false if absent.
    pub(crate) fn remove(&mut self, key: &K) -> bool {
        match self.items.iter().position(|(k, _)| k == key) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Overwrite the value of an existing key in place.
    ///
    /// Returns the value back if the key is not present.
    pub(crate) fn update(&mut self, key: &K, value: V) -> Option<V> {
        match self.items.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => {
                *slot = value;
                None
            }
            None => Some(value),
        }
    }
}
