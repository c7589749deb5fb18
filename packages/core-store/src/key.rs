//! Dotted key type addressing values inside a nested map.

use std::fmt;
use std::str::FromStr;

/// Errors related to key parsing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The key string was empty.
    #[error("invalid key: key is empty")]
    Empty,
    /// A segment between separators was empty (leading, trailing or doubled dot).
    #[error("invalid key '{key}': empty segment at position {position}")]
    EmptySegment { key: String, position: usize },
}

/// A validated dotted key such as `server.http.port`.
///
/// A key is a non-empty sequence of non-empty segments. Segments are taken
/// verbatim from the string split on `.`; there is no escaping, so a key
/// segment can never itself contain a dot.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Key {
    segments: Vec<String>,
}

pub const SEPARATOR: char = '.';

impl Key {
    /// Parse a dotted key string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatstore_core_store::Key;
    ///
    /// let key = Key::parse("database.pool.size").unwrap();
    /// assert_eq!(key.len(), 3);
    ///
    /// assert!(Key::parse("database..size").is_err());
    /// assert!(Key::parse(".database").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, KeyError> {
        if s.is_empty() {
            return Err(KeyError::Empty);
        }

        let segments: Vec<String> = s.split(SEPARATOR).map(str::to_string).collect();
        if let Some(position) = segments.iter().position(String::is_empty) {
            return Err(KeyError::EmptySegment {
                key: s.to_string(),
                position,
            });
        }

        Ok(Key { segments })
    }

    /// Build a key from already split segments.
    pub fn try_from_segments(segments: Vec<String>) -> Result<Self, KeyError> {
        if segments.is_empty() {
            return Err(KeyError::Empty);
        }
        if let Some(position) = segments.iter().position(String::is_empty) {
            return Err(KeyError::EmptySegment {
                key: segments.join("."),
                position,
            });
        }
        Ok(Key { segments })
    }

    /// Number of segments. Always at least one.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Keys are never empty; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.segments.iter()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment.
    pub fn last(&self) -> &str {
        // Non-empty by construction.
        &self.segments[self.segments.len() - 1]
    }

    /// Segments leading up to the final one.
    pub fn parent_segments(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The key of the enclosing map, or `None` for a top-level key.
    pub fn parent(&self) -> Option<Key> {
        if self.segments.len() == 1 {
            None
        } else {
            Some(Key {
                segments: self.parent_segments().to_vec(),
            })
        }
    }

    /// Join this key with another.
    #[must_use]
    pub fn join(&self, other: &Key) -> Key {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Key { segments }
    }

    /// Check if this key starts with all segments of `prefix`.
    pub fn has_prefix(&self, prefix: &Key) -> bool {
        prefix.segments.len() <= self.segments.len()
            && prefix.segments == self.segments[..prefix.segments.len()]
    }

    /// Strip a prefix from this key.
    ///
    /// Returns `None` if the prefix doesn't match or nothing would remain.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Key) -> Option<Key> {
        if self.has_prefix(prefix) && prefix.len() < self.len() {
            Some(Key {
                segments: self.segments[prefix.segments.len()..].to_vec(),
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::parse(s)
    }
}

impl TryFrom<&str> for Key {
    type Error = KeyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Key::parse(s)
    }
}

impl std::ops::Index<usize> for Key {
    type Output = String;

    fn index(&self, i: usize) -> &Self::Output {
        &self.segments[i]
    }
}

/// Macro for creating keys from literals.
///
/// # Example
///
/// ```rust
/// use flatstore_core_store::key;
///
/// let k = key!("server.http.port");
/// assert_eq!(k.len(), 3);
/// ```
#[macro_export]
macro_rules! key {
    ($s:expr) => {
        $crate::Key::parse($s).expect("invalid key literal")
    };
}
