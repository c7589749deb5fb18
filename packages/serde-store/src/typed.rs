//! Typed access extension trait for `NestedStore`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use flatstore_core_store::{Error, Key, NestedStore};

use crate::convert::{from_value, to_value};

/// Extension trait for typed reads and writes.
///
/// Implemented for `NestedStore`. It provides convenience methods for reading
/// data directly into Rust types and storing Rust types under a key.
///
/// # Example
///
/// ```rust
/// use flatstore_core_store::{key, NestedStore};
/// use flatstore_serde_store::TypedStore;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Pool {
///     min: u32,
///     max: u32,
/// }
///
/// let mut store = NestedStore::new();
/// store.set_as(&key!("db.pool"), &Pool { min: 1, max: 8 }).unwrap();
///
/// let pool: Pool = store.get_as(&key!("db.pool")).unwrap().unwrap();
/// assert_eq!(pool, Pool { min: 1, max: 8 });
/// ```
pub trait TypedStore {
    /// Read the value at `key` and deserialize it into a Rust type.
    ///
    /// Returns `Ok(None)` when the key is absent and a decode error when the
    /// stored value doesn't match `T`.
    fn get_as<T: DeserializeOwned>(&self, key: &Key) -> Result<Option<T>, Error>;

    /// Serialize a Rust type and store it under `key`.
    ///
    /// Returns whether the store changed.
    fn set_as<T: Serialize + ?Sized>(&mut self, key: &Key, data: &T) -> Result<bool, Error>;
}

impl TypedStore for NestedStore {
    fn get_as<T: DeserializeOwned>(&self, key: &Key) -> Result<Option<T>, Error> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };

        let typed = from_value(value.clone())?;
        Ok(Some(typed))
    }

    fn set_as<T: Serialize + ?Sized>(&mut self, key: &Key, data: &T) -> Result<bool, Error> {
        let value = to_value(data)?;
        Ok(self.set(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatstore_core_store::{key, Value};
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Listener {
        host: String,
        port: u16,
    }

    #[test]
    fn typed_roundtrip() {
        let mut store = NestedStore::new();
        let listener = Listener {
            host: "0.0.0.0".to_string(),
            port: 9000,
        };

        assert!(store.set_as(&key!("http.listener"), &listener).unwrap());
        assert_eq!(
            store.get(&key!("http.listener.port")),
            Some(&Value::Integer(9000))
        );

        let recovered: Listener = store.get_as(&key!("http.listener")).unwrap().unwrap();
        assert_eq!(listener, recovered);
    }

    #[test]
    fn set_as_same_value_reports_no_change() {
        let mut store = NestedStore::new();
        store.set_as(&key!("n"), &5u8).unwrap();
        assert!(!store.set_as(&key!("n"), &5u8).unwrap());
    }

    #[test]
    fn read_nonexistent_returns_none() {
        let store = NestedStore::new();
        let result: Option<Listener> = store.get_as(&key!("missing")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn type_mismatch_is_an_error() {
        let mut store = NestedStore::new();
        store.set(&key!("port"), Value::from("eighty"));
        let result: Result<Option<u16>, _> = store.get_as(&key!("port"));
        assert!(matches!(result, Err(Error::Decode { .. })));
    }
}
