//! File-backed nested key-value stores for flatstore
//!
//! A [`FileStore`] binds a `NestedStore` to a JSON or YAML file:
//! - Reads re-load the file according to a [`ReloadPolicy`]
//! - Writes that change the store are written through immediately
//! - All file access goes through [`FileIo`], [`LocalFile`] for the disk
//!
//! # Example
//!
//! ```rust
//! use flatstore_file_store::{FileStore, FileStoreOptions, ReloadPolicy};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("settings.json");
//!
//! let options = FileStoreOptions::new().with_reload(ReloadPolicy::IfModified);
//! let store = FileStore::open(&path, options).unwrap();
//!
//! store.set("ui.theme", "dark").unwrap();
//! let port = store.get_or_set_default("server.port", 8080).unwrap();
//! assert_eq!(port.as_i64(), Some(8080));
//!
//! let keys: Vec<String> = store.key_set().unwrap().into_iter().collect();
//! assert_eq!(keys, ["server.port", "ui.theme"]);
//! ```

mod file_io;
mod file_store;
mod options;
mod policy;

pub use file_io::{FileIo, LocalFile};
pub use file_store::FileStore;
pub use options::{FileStoreOptions, KeyOrder};
pub use policy::ReloadPolicy;

// Re-export core types for convenience
pub use flatstore_core_store::{Error, Format, Key, KeyError, Map, NestedStore, Value};
pub use flatstore_serde_store::{Codec, JsonCodec, MultiCodec, YamlCodec};
