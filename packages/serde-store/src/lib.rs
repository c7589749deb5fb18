//! Serde integration for flatstore
//!
//! This layer connects `Value` trees to the serde ecosystem. It adds:
//! - `JsonCodec` / `YamlCodec`: Codecs for the supported file formats
//! - `MultiCodec`: Format-routed codec set
//! - `TypedStore`: Read and write Rust types under dotted keys
//! - Value <-> serde conversions
//!
//! # Example
//!
//! ```rust
//! use flatstore_serde_store::{Codec, Format, MultiCodec};
//!
//! let codec = MultiCodec::standard();
//! let value = codec
//!     .decode(&"retries: 3\n".into(), &Format::YAML)
//!     .unwrap();
//!
//! let json = codec.encode(&value, &Format::JSON).unwrap();
//! assert_eq!(&json[..], b"{\n  \"retries\": 3\n}\n");
//! ```

pub use bytes::Bytes;

mod codec;
mod convert;
mod typed;

pub use codec::{JsonCodec, MultiCodec, YamlCodec};
pub use convert::{from_value, json_to_value, to_value, value_to_json};
pub use typed::TypedStore;

// Re-export core types for convenience
pub use flatstore_core_store::{Codec, Error, Format, Key, KeyError, NestedStore, Value};
