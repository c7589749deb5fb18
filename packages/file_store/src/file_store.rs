//! A `NestedStore` bound to a file on disk.
//!
//! Reads consult the [`ReloadPolicy`] and re-read the file when it is stale;
//! writes that change the tree are encoded and written through immediately.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use flatstore_core_store::{Codec, Error, Format, Key, Map, NestedStore, Value};
use flatstore_serde_store::{to_value, MultiCodec, TypedStore};

use crate::file_io::{FileIo, LocalFile};
use crate::options::{FileStoreOptions, KeyOrder};
use crate::policy::ReloadPolicy;

struct State {
    store: NestedStore,
    /// Modification time of the file when the store was last loaded or
    /// written. `None` until the first load.
    synced: Option<SystemTime>,
    policy: ReloadPolicy,
}

/// A nested key-value store persisted as a JSON or YAML file.
///
/// Keys are dotted strings (`"server.http.port"`). Every operation takes
/// `&self`; the store, the reload decision and the write-through happen under
/// one lock, so a `FileStore` can be shared between threads with `Arc`.
///
/// # Example
///
/// ```rust
/// use flatstore_file_store::{FileStore, FileStoreOptions};
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = FileStore::open(dir.path().join("app.yml"), FileStoreOptions::default()).unwrap();
///
/// assert!(store.set("server.port", 8080).unwrap());
/// assert_eq!(store.get_i64("server.port").unwrap(), Some(8080));
///
/// let on_disk = std::fs::read_to_string(store.path()).unwrap();
/// assert_eq!(on_disk, "server:\n  port: 8080\n");
/// ```
pub struct FileStore<F: FileIo = LocalFile> {
    file: F,
    codec: Box<dyn Codec>,
    format: Format,
    prefix: Option<Key>,
    key_order: KeyOrder,
    state: Mutex<State>,
}

impl FileStore<LocalFile> {
    /// Open the file at `path`, creating it if it doesn't exist.
    ///
    /// The format comes from `options.format`, or else from the file
    /// extension (`.json`, `.yml`, `.yaml`).
    pub fn open(path: impl Into<PathBuf>, options: FileStoreOptions) -> Result<Self, Error> {
        let file = LocalFile::new(path);
        let format = match &options.format {
            Some(format) => format.clone(),
            None => Format::from_extension(file.path())
                .ok_or_else(|| Error::UnsupportedFormat(Format::new(file.path().display().to_string())))?,
        };

        Self::open_with(file, MultiCodec::standard(), format, options)
    }
}

impl<F: FileIo> FileStore<F> {
    /// Bind to any [`FileIo`] with an explicit codec and format.
    pub fn open_with(
        file: F,
        codec: impl Codec + 'static,
        format: Format,
        options: FileStoreOptions,
    ) -> Result<Self, Error> {
        if !codec.supports(&format) {
            return Err(Error::UnsupportedFormat(format));
        }

        let prefix = options
            .key_prefix
            .as_deref()
            .map(Key::parse)
            .transpose()?;

        if !file.exists()? {
            file.create()?;
            if let Some(content) = &options.initial_content {
                file.write(content.as_bytes())?;
            }
        }

        let binding = Self {
            file,
            codec: Box::new(codec),
            format,
            prefix,
            key_order: options.key_order,
            state: Mutex::new(State {
                store: NestedStore::new(),
                synced: None,
                policy: options.reload,
            }),
        };

        {
            let mut state = binding.lock();
            binding.load_locked(&mut state)?;
        }

        Ok(binding)
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// File name of the backing file.
    pub fn name(&self) -> &str {
        self.file
            .path()
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    pub fn key_prefix(&self) -> Option<&Key> {
        self.prefix.as_ref()
    }

    pub fn key_order(&self) -> KeyOrder {
        self.key_order
    }

    pub fn policy(&self) -> ReloadPolicy {
        self.lock().policy
    }

    pub fn set_policy(&self, policy: ReloadPolicy) {
        self.lock().policy = policy;
    }

    /// Re-read the file and replace the store, discarding unsaved changes.
    pub fn reload(&self) -> Result<(), Error> {
        let mut state = self.lock();
        self.load_locked(&mut state)
    }

    /// Whether the next read will reload, according to the current policy.
    pub fn should_reload(&self) -> Result<bool, Error> {
        let state = self.lock();
        self.should_reload_locked(&state)
    }

    /// Whether the file was modified after the store was last synchronized.
    pub fn has_changed(&self) -> Result<bool, Error> {
        let state = self.lock();
        self.is_newer_locked(&state)
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        let key = self.resolve(key)?;
        let state = self.fresh()?;
        Ok(state.store.get(&key).cloned())
    }

    pub fn contains(&self, key: &str) -> Result<bool, Error> {
        let key = self.resolve(key)?;
        let state = self.fresh()?;
        Ok(state.store.contains(&key))
    }

    /// Store `value` at `key` and write the file if anything changed.
    ///
    /// Returns whether the store changed. NaN and infinite floats are stored
    /// as null. If the write fails the in-memory change is kept and the error
    /// is returned. A file deleted behind the store's back is recreated.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<bool, Error> {
        let key = self.resolve(key)?;
        self.set_resolved(&key, value.into())
    }

    /// Serialize `data` and store it at `key`.
    pub fn set_as<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<bool, Error> {
        let key = self.resolve(key)?;
        let value = to_value(data)?;
        self.set_resolved(&key, value)
    }

    /// Remove `key`, writing the file if it was present.
    pub fn remove(&self, key: &str) -> Result<Option<Value>, Error> {
        let key = self.resolve(key)?;
        let mut state = self.fresh()?;

        let Some(removed) = state.store.remove(&key) else {
            log::trace!("{} not present in {}, nothing to remove", key, self.path().display());
            return Ok(None);
        };

        self.persist_locked(&mut state)?;
        Ok(Some(removed))
    }

    /// Remove several keys with at most one write.
    ///
    /// Every key is validated before anything is removed. Returns the number
    /// of keys that were present.
    pub fn remove_all<I, S>(&self, keys: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = keys
            .into_iter()
            .map(|key| self.resolve(key.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = self.fresh()?;
        let removed = keys
            .iter()
            .filter(|key| state.store.remove(key).is_some())
            .count();

        if removed > 0 {
            self.persist_locked(&mut state)?;
        }
        Ok(removed)
    }

    /// Return the value at `key`, storing `default` first if it is absent.
    pub fn get_or_set_default(&self, key: &str, default: impl Into<Value>) -> Result<Value, Error> {
        let key = self.resolve(key)?;
        let mut state = self.fresh()?;

        if let Some(existing) = state.store.get(&key) {
            return Ok(existing.clone());
        }

        let default = default.into().into_finite();
        state.store.set(&key, default.clone());
        self.persist_locked(&mut state)?;
        Ok(default)
    }

    pub fn set_default(&self, key: &str, value: impl Into<Value>) -> Result<(), Error> {
        self.get_or_set_default(key, value).map(|_| ())
    }

    /// Deserialize the value at `key` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        let key = self.resolve(key)?;
        let state = self.fresh()?;
        state.store.get_as(&key)
    }

    pub fn get_string(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.get(key)?.and_then(|v| v.as_str().map(str::to_owned)))
    }

    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, Error> {
        Ok(self.get(key)?.and_then(|v| v.as_i64()))
    }

    /// Integers are widened to `f64`.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, Error> {
        Ok(self.get(key)?.and_then(|v| v.as_f64()))
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, Error> {
        Ok(self.get(key)?.and_then(|v| v.as_bool()))
    }

    pub fn get_list(&self, key: &str) -> Result<Option<Vec<Value>>, Error> {
        Ok(self.get(key)?.and_then(|v| match v {
            Value::Array(items) => Some(items),
            _ => None,
        }))
    }

    /// Dotted paths of every leaf, relative to the key prefix if one is set.
    pub fn key_set(&self) -> Result<BTreeSet<String>, Error> {
        let state = self.fresh()?;
        Ok(match &self.prefix {
            Some(prefix) => state.store.key_set_at(prefix),
            None => state.store.key_set(),
        })
    }

    pub fn key_set_at(&self, key: &str) -> Result<BTreeSet<String>, Error> {
        let key = self.resolve(key)?;
        let state = self.fresh()?;
        Ok(state.store.key_set_at(&key))
    }

    pub fn single_layer_key_set(&self) -> Result<BTreeSet<String>, Error> {
        let state = self.fresh()?;
        Ok(match &self.prefix {
            Some(prefix) => state.store.single_layer_key_set_at(prefix),
            None => state.store.single_layer_key_set(),
        })
    }

    pub fn single_layer_key_set_at(&self, key: &str) -> Result<BTreeSet<String>, Error> {
        let key = self.resolve(key)?;
        let state = self.fresh()?;
        Ok(state.store.single_layer_key_set_at(&key))
    }

    /// Snapshot of the store, or of the subtree under the key prefix.
    pub fn to_map(&self) -> Result<Map, Error> {
        let state = self.fresh()?;
        Ok(match &self.prefix {
            Some(prefix) => match state.store.get(prefix) {
                Some(Value::Map(map)) => map.clone(),
                _ => Map::new(),
            },
            None => state.store.to_map().clone(),
        })
    }

    /// Delete the backing file, keeping the in-memory store.
    ///
    /// Fails if the file can't be deleted, including when it is already gone.
    /// The next write creates the file again.
    pub fn delete_file(&self) -> Result<(), Error> {
        let _state = self.lock();
        self.file.delete()
    }

    /// Empty the in-memory store without touching the file.
    pub fn clear_data(&self) {
        self.lock().store.clear();
    }

    /// Truncate the file and load the resulting empty store.
    pub fn clear_file(&self) -> Result<(), Error> {
        let mut state = self.lock();
        self.file.write(&[])?;
        self.load_locked(&mut state)
    }

    /// Replace the file content with `content` and load it.
    ///
    /// The content is decoded first; if that fails neither the file nor the
    /// store is modified.
    pub fn set_content(&self, content: impl AsRef<[u8]>) -> Result<(), Error> {
        let bytes = Bytes::copy_from_slice(content.as_ref());
        let mut state = self.lock();
        self.replace_locked(&mut state, bytes)
    }

    /// Copy the content of another file into this one and load it.
    pub fn set_content_from_file(&self, source: impl AsRef<Path>) -> Result<(), Error> {
        let bytes = LocalFile::new(source.as_ref()).read()?;
        let mut state = self.lock();
        self.replace_locked(&mut state, bytes)
    }

    /// Replace every occurrence of `target` in the file text and reload.
    ///
    /// Returns `false` without writing if `target` doesn't occur. A
    /// replacement that leaves the file undecodable is rejected.
    pub fn replace_in_file(&self, target: &str, replacement: &str) -> Result<bool, Error> {
        let mut state = self.lock();
        let bytes = self.file.read()?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| Error::decode(self.format.clone(), e.to_string()))?;

        if target.is_empty() || !text.contains(target) {
            return Ok(false);
        }

        let replaced = Bytes::from(text.replace(target, replacement));
        self.replace_locked(&mut state, replaced)?;
        Ok(true)
    }

    fn set_resolved(&self, key: &Key, value: Value) -> Result<bool, Error> {
        let mut state = self.fresh()?;

        if !state.store.set(key, value) {
            log::trace!("{} unchanged in {}, skipping write", key, self.path().display());
            return Ok(false);
        }

        self.persist_locked(&mut state)?;
        Ok(true)
    }

    fn resolve(&self, key: &str) -> Result<Key, Error> {
        let key = Key::parse(key)?;
        Ok(match &self.prefix {
            Some(prefix) => prefix.join(&key),
            None => key,
        })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Every mutation of State is a single assignment or a single store
        // call, so a poisoned lock still guards a consistent value.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the state, reloading first if the policy says it is stale.
    fn fresh(&self) -> Result<MutexGuard<'_, State>, Error> {
        let mut state = self.lock();
        if self.should_reload_locked(&state)? {
            log::trace!("{} is stale, reloading", self.path().display());
            self.load_locked(&mut state)?;
        }
        Ok(state)
    }

    fn should_reload_locked(&self, state: &State) -> Result<bool, Error> {
        match state.policy {
            // Nothing to reload from until the next write recreates the file.
            ReloadPolicy::Always => self.file.exists(),
            ReloadPolicy::Never => Ok(false),
            ReloadPolicy::IfModified => self.is_newer_locked(state),
        }
    }

    fn is_newer_locked(&self, state: &State) -> Result<bool, Error> {
        let modified = match self.file.modified() {
            Ok(modified) => modified,
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(e),
        };
        Ok(state.synced.map_or(true, |synced| modified > synced))
    }

    fn load_locked(&self, state: &mut State) -> Result<(), Error> {
        // Taken before reading so a write racing the read is seen as newer.
        let modified = self.file.modified()?;
        let bytes = self.file.read()?;
        let store = self.decode_store(&bytes)?;

        log::debug!(
            "Loaded {} top-level keys from {}",
            store.len(),
            self.path().display()
        );
        state.store = store;
        state.synced = Some(modified);
        Ok(())
    }

    fn replace_locked(&self, state: &mut State, bytes: Bytes) -> Result<(), Error> {
        let store = self.decode_store(&bytes)?;
        self.file.write(&bytes)?;
        state.store = store;
        state.synced = Some(self.file.modified()?);
        Ok(())
    }

    fn persist_locked(&self, state: &mut State) -> Result<(), Error> {
        let result = self.write_store(&state.store);
        match result {
            Ok(modified) => {
                state.synced = Some(modified);
                Ok(())
            }
            Err(e) => {
                log::warn!(
                    "Failed to persist {}, keeping in-memory change: {}",
                    self.path().display(),
                    e
                );
                Err(e)
            }
        }
    }

    fn write_store(&self, store: &NestedStore) -> Result<SystemTime, Error> {
        let mut value = Value::Map(store.to_map().clone());
        if self.key_order == KeyOrder::Sorted {
            value.sort_keys();
        }
        let bytes = self.codec.encode(&value, &self.format)?;

        if !self.file.exists()? {
            log::debug!("{} is missing, recreating it", self.path().display());
            self.file.create()?;
        }
        self.file.write(&bytes)?;
        self.file.modified()
    }

    fn decode_store(&self, bytes: &Bytes) -> Result<NestedStore, Error> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(NestedStore::new());
        }
        let value = self.codec.decode(bytes, &self.format)?;
        NestedStore::from_value(value)
    }
}

impl<F: FileIo> fmt::Debug for FileStore<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path())
            .field("format", &self.format)
            .field("prefix", &self.prefix)
            .field("key_order", &self.key_order)
            .finish_non_exhaustive()
    }
}
