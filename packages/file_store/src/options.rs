//! Options controlling how a `FileStore` is opened.

use std::fmt;

use serde::{Deserialize, Serialize};

use flatstore_core_store::Format;

use crate::ReloadPolicy;

/// Order of map keys when the store is written back to the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyOrder {
    /// Keys keep the order they were read in; new keys go last.
    #[default]
    Insertion,
    /// Keys are sorted at every level on each write.
    Sorted,
}

impl fmt::Display for KeyOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyOrder::Insertion => write!(f, "insertion"),
            KeyOrder::Sorted => write!(f, "sorted"),
        }
    }
}

/// Settings for [`FileStore::open`](crate::FileStore::open).
///
/// Every field has a default, so the struct can be embedded in a caller's own
/// configuration and only the interesting parts spelled out:
///
/// ```rust
/// use flatstore_file_store::{FileStoreOptions, ReloadPolicy};
///
/// let options: FileStoreOptions =
///     serde_json::from_str(r#"{"reload": "never", "key_prefix": "plugins.audit"}"#).unwrap();
/// assert_eq!(options.reload, ReloadPolicy::Never);
/// assert_eq!(options.format, None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreOptions {
    pub reload: ReloadPolicy,
    /// Overrides the format derived from the file extension.
    pub format: Option<Format>,
    /// Prepended to every key passed to the store.
    pub key_prefix: Option<String>,
    /// Written to the file when `open` has to create it.
    pub initial_content: Option<String>,
    pub key_order: KeyOrder,
}

impl FileStoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_reload(mut self, reload: ReloadPolicy) -> Self {
        self.reload = reload;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_initial_content(mut self, content: impl Into<String>) -> Self {
        self.initial_content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_key_order(mut self, order: KeyOrder) -> Self {
        self.key_order = order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let options = FileStoreOptions::new()
            .with_reload(ReloadPolicy::Always)
            .with_format(Format::YAML)
            .with_key_prefix("app")
            .with_initial_content("a: 1\n")
            .with_key_order(KeyOrder::Sorted);

        assert_eq!(options.reload, ReloadPolicy::Always);
        assert_eq!(options.format, Some(Format::YAML));
        assert_eq!(options.key_prefix.as_deref(), Some("app"));
        assert_eq!(options.initial_content.as_deref(), Some("a: 1\n"));
        assert_eq!(options.key_order, KeyOrder::Sorted);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let options: FileStoreOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, FileStoreOptions::default());
        assert_eq!(options.key_order, KeyOrder::Insertion);
    }

    #[test]
    fn key_order_names() {
        let options: FileStoreOptions = serde_json::from_str(r#"{"key_order": "sorted"}"#).unwrap();
        assert_eq!(options.key_order, KeyOrder::Sorted);
        assert_eq!(KeyOrder::Insertion.to_string(), "insertion");
        assert!(serde_json::from_str::<KeyOrder>(r#""random""#).is_err());
    }

    #[test]
    fn format_accepts_short_names() {
        let options: FileStoreOptions = serde_yaml::from_str("format: yaml\n").unwrap();
        assert_eq!(options.format, Some(Format::YAML));
    }
}
