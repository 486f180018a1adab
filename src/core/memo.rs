//! # Memoization Boundary
//!
//! A single-slot cache keyed on an explicit dependency value. The value is
//! rebuilt only when the key differs from the one it was built with, so
//! callers state exactly which inputs matter and nothing else triggers a
//! rebuild.
//!
//! ```rust,ignore
//! let rules = memo.get_or_compute(RulesKey { default_language, unavailable }, build_rules);
//! // Same key on the next frame → same Rc, no rebuild.
//! ```

use std::rc::Rc;

pub struct Memo<K, V> {
    entry: Option<(K, Rc<V>)>,
    computations: usize,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Memo<K, V> {
    pub fn new() -> Self {
        Self {
            entry: None,
            computations: 0,
        }
    }

    /// How many times the value has been built. Used by tests to prove that
    /// unrelated state changes don't trigger rebuilds.
    pub fn computations(&self) -> usize {
        self.computations
    }

    /// Drop the cached value so the next lookup rebuilds it.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn peek(&self) -> Option<&Rc<V>> {
        self.entry.as_ref().map(|(_, v)| v)
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    /// Return the cached value if `key` matches, otherwise build and cache a new one.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> Rc<V> {
        if let Some((cached_key, value)) = &self.entry
            && *cached_key == key
        {
            return Rc::clone(value);
        }
        let value = Rc::new(compute(&key));
        self.computations += 1;
        self.entry = Some((key, Rc::clone(&value)));
        value
    }
}
