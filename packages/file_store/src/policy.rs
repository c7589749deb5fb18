//! Staleness policy deciding when cached data is re-read from disk.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// When a `FileStore` re-reads its file before serving a read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadPolicy {
    /// Reload before every read.
    Always,
    /// Reload when the file's modification time is newer than the last sync.
    #[default]
    IfModified,
    /// Only reload when asked to.
    Never,
}

impl fmt::Display for ReloadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReloadPolicy::Always => "always",
            ReloadPolicy::IfModified => "if_modified",
            ReloadPolicy::Never => "never",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ReloadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(ReloadPolicy::Always),
            "if_modified" => Ok(ReloadPolicy::IfModified),
            "never" => Ok(ReloadPolicy::Never),
            other => Err(format!("unknown reload policy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_if_modified() {
        assert_eq!(ReloadPolicy::default(), ReloadPolicy::IfModified);
    }

    #[test]
    fn display_and_parse_agree() {
        for policy in [
            ReloadPolicy::Always,
            ReloadPolicy::IfModified,
            ReloadPolicy::Never,
        ] {
            assert_eq!(policy.to_string().parse::<ReloadPolicy>(), Ok(policy));
        }
        assert!("sometimes".parse::<ReloadPolicy>().is_err());
    }

    #[test]
    fn serde_names() {
        assert_eq!(
            serde_json::to_string(&ReloadPolicy::IfModified).unwrap(),
            r#""if_modified""#
        );
        let parsed: ReloadPolicy = serde_json::from_str(r#""never""#).unwrap();
        assert_eq!(parsed, ReloadPolicy::Never);
    }
}
