//! flatstore core: values, dotted keys and the nested store
//!
//! This layer is format-agnostic and never touches the file system:
//! - `Key`: Validated dotted key (`server.http.port`)
//! - `Value`: Parsed tree structure
//! - `NestedStore`: Key-addressed get/set/contains/remove over a root map
//! - `Format` + `Codec`: The seam to concrete file formats
//!
//! # Example
//!
//! ```rust
//! use flatstore_core_store::{key, NestedStore, Value};
//!
//! let mut store = NestedStore::new();
//! store.set(&key!("a.b"), Value::from(1i64));
//! store.set(&key!("a.c"), Value::from(2i64));
//! store.set(&key!("d"), Value::from(3i64));
//!
//! let keys: Vec<String> = store.key_set().into_iter().collect();
//! assert_eq!(keys, ["a.b", "a.c", "d"]);
//! ```

pub use bytes::Bytes;

mod error;
mod format;
mod key;
mod nested_store;
mod traits;
mod value;

pub use error::Error;
pub use format::Format;
pub use key::{Key, KeyError, SEPARATOR};
pub use nested_store::NestedStore;
pub use traits::Codec;
pub use value::{Map, Value};
