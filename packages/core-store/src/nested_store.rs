//! Dotted-key addressed store over a nested map.
//!
//! `NestedStore` owns a root map and resolves [`Key`]s against it segment by
//! segment. Reads treat a non-map intermediate as "not found"; writes replace
//! it with a fresh map, so the last writer wins when types conflict.

use std::collections::BTreeSet;

use indexmap::map::Entry;

use crate::{Error, Key, Map, Value};

/// An in-memory tree of values addressed by dotted keys.
///
/// # Example
///
/// ```rust
/// use flatstore_core_store::{key, NestedStore, Value};
///
/// let mut store = NestedStore::new();
/// store.set(&key!("server.port"), Value::from(8080i64));
///
/// assert_eq!(store.get(&key!("server.port")), Some(&Value::from(8080i64)));
/// assert!(store.contains(&key!("server")));
/// assert!(!store.contains(&key!("server.port.number")));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NestedStore {
    root: Map,
}

impl NestedStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            root: Map::new(),
        }
    }

    /// Create a store with initial data.
    pub fn with_data(root: Map) -> Self {
        Self { root }
    }

    /// Create a store from a decoded document.
    ///
    /// A `Null` document (e.g. an empty YAML file) becomes an empty store.
    /// Any other non-map root is rejected.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Map(root) => Ok(Self { root }),
            Value::Null => Ok(Self::new()),
            other => Err(Error::RootNotMap { found: other.kind() }),
        }
    }

    /// The whole store as a map value.
    pub fn into_value(self) -> Value {
        Value::Map(self.root)
    }

    pub fn into_map(self) -> Map {
        self.root
    }

    /// Borrow the root map.
    pub fn to_map(&self) -> &Map {
        &self.root
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Map that directly holds the final segment of `key`, if every
    /// intermediate segment resolves to a map.
    fn parent_map(&self, key: &Key) -> Option<&Map> {
        let mut cursor = &self.root;
        for segment in key.parent_segments() {
            cursor = cursor.get(segment)?.as_map()?;
        }
        Some(cursor)
    }

    fn parent_map_mut(&mut self, key: &Key) -> Option<&mut Map> {
        let mut cursor = &mut self.root;
        for segment in key.parent_segments() {
            cursor = cursor.get_mut(segment)?.as_map_mut()?;
        }
        Some(cursor)
    }

    /// Look up the value stored at `key`.
    ///
    /// Returns `None` if any intermediate segment is missing or is not a map,
    /// or if the final segment is not present. An explicitly stored `Null` is
    /// returned as `Some(&Value::Null)`.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.parent_map(key)?.get(key.last())
    }

    /// Get a mutable reference to the value stored at `key`.
    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        self.parent_map_mut(key)?.get_mut(key.last())
    }

    /// Check whether `key` resolves to a stored value.
    pub fn contains(&self, key: &Key) -> bool {
        self.parent_map(key)
            .is_some_and(|map| map.contains_key(key.last()))
    }

    /// Store `value` at `key`, creating intermediate maps as needed.
    ///
    /// Intermediate segments that are missing, or hold anything other than a
    /// map, are replaced with a new empty map. The previous content of such a
    /// segment is discarded. The final segment is overwritten
    /// unconditionally.
    ///
    /// NaN and infinite floats are stored as `Null`, see
    /// [`Value::into_finite`].
    ///
    /// Returns `true` if the tree changed. Writing a value equal to the one
    /// already stored, along an existing chain of maps, returns `false`.
    pub fn set(&mut self, key: &Key, value: Value) -> bool {
        let value = value.into_finite();
        let mut changed = false;
        let mut cursor = &mut self.root;

        for segment in key.parent_segments() {
            let slot = match cursor.entry(segment.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    changed = true;
                    entry.insert(Value::map())
                }
            };
            if !slot.is_map() {
                changed = true;
                *slot = Value::map();
            }
            cursor = match slot {
                Value::Map(map) => map,
                _ => unreachable!("intermediate slot was just made a map"),
            };
        }

        if !changed && cursor.get(key.last()) == Some(&value) {
            return false;
        }
        cursor.insert(key.last().to_string(), value);
        true
    }

    /// Remove the value at `key`, returning it if it existed.
    ///
    /// Only the addressed entry is removed; ancestors are kept even when they
    /// become empty. If the parent chain doesn't resolve this is a no-op.
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        self.parent_map_mut(key)?.shift_remove(key.last())
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.root.clear();
    }

    /// All dotted keys that lead to leaf (non-map) values.
    ///
    /// Empty maps have no leaves and therefore contribute nothing.
    pub fn key_set(&self) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        collect_leaf_keys(&self.root, None, &mut keys);
        keys
    }

    /// Leaf keys of the subtree at `key`, relative to `key`.
    ///
    /// Empty if `key` doesn't resolve to a map.
    pub fn key_set_at(&self, key: &Key) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        if let Some(Value::Map(map)) = self.get(key) {
            collect_leaf_keys(map, None, &mut keys);
        }
        keys
    }

    /// Immediate child keys of the root.
    pub fn single_layer_key_set(&self) -> BTreeSet<String> {
        self.root.keys().cloned().collect()
    }

    /// Immediate child keys of the map at `key`.
    ///
    /// Empty if `key` is absent or not a map.
    pub fn single_layer_key_set_at(&self, key: &Key) -> BTreeSet<String> {
        match self.get(key) {
            Some(Value::Map(map)) => map.keys().cloned().collect(),
            _ => BTreeSet::new(),
        }
    }
}

fn collect_leaf_keys(
    map: &Map,
    prefix: Option<&str>,
    out: &mut BTreeSet<String>,
) {
    for (name, value) in map {
        let full = match prefix {
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name.clone(),
        };
        match value {
            Value::Map(child) => collect_leaf_keys(child, Some(&full), out),
            _ => {
                out.insert(full);
            }
        }
    }
}

impl From<Map> for NestedStore {
    fn from(root: Map) -> Self {
        Self::with_data(root)
    }
}
