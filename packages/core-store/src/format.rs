//! Format hints for file encoding.

use std::borrow::Cow;
use std::fmt;
use std::path::Path as FsPath;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A hint about the encoding of a backing file.
///
/// Format is used to pick a codec when decoding file bytes into a `Value`,
/// or when encoding a `Value` back to bytes.
///
/// This uses MIME-type-like strings for familiarity, but you can use
/// any string that your codecs understand.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Format(pub Cow<'static, str>);

impl Format {
    /// JSON format (`application/json`)
    pub const JSON: Format = Format(Cow::Borrowed("application/json"));

    /// YAML format (`application/yaml`)
    pub const YAML: Format = Format(Cow::Borrowed("application/yaml"));

    /// A parsed Value that was never serialized.
    pub const VALUE: Format = Format(Cow::Borrowed("application/x-flatstore-value"));

    /// Create a format from a static string.
    pub const fn from_static(s: &'static str) -> Self {
        Format(Cow::Borrowed(s))
    }

    /// Create a format from an owned string.
    pub fn new(s: impl Into<String>) -> Self {
        Format(Cow::Owned(s.into()))
    }

    /// Get the format string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_json(&self) -> bool {
        self == &Self::JSON
    }

    pub fn is_yaml(&self) -> bool {
        self == &Self::YAML
    }

    /// Pick a format from a file extension (`json`, `yml`, `yaml`).
    ///
    /// The comparison ignores ASCII case.
    pub fn from_extension(path: &FsPath) -> Option<Format> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::JSON),
            "yml" | "yaml" => Some(Self::YAML),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&'static str> for Format {
    fn from(s: &'static str) -> Self {
        Format(Cow::Borrowed(s))
    }
}

impl From<String> for Format {
    fn from(s: String) -> Self {
        Format(Cow::Owned(s))
    }
}

impl AsRef<str> for Format {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Format {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Format {
    fn deserialize<D>(deserializer: D) -> Result<Format, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        Ok(match s.as_str() {
            // Short names are accepted for convenience in config files.
            "json" => Format::JSON,
            "yaml" | "yml" => Format::YAML,
            _ => Format::from(s),
        })
    }
}
