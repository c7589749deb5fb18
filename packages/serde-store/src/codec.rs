//! JSON and YAML codec implementations.

use bytes::Bytes;
use flatstore_core_store::{Codec, Error, Format, Value};

use crate::convert::{json_to_value, value_to_json};

/// A codec that handles JSON encoding/decoding.
///
/// Output is pretty-printed and newline-terminated so files stay readable
/// and diff cleanly.
///
/// # Example
///
/// ```rust
/// use flatstore_serde_store::JsonCodec;
/// use flatstore_core_store::{Codec, Format, Value};
///
/// let codec = JsonCodec;
/// let value = Value::from("hello");
///
/// let bytes = codec.encode(&value, &Format::JSON).unwrap();
/// let decoded = codec.decode(&bytes, &Format::JSON).unwrap();
///
/// assert_eq!(decoded, value);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<Value, Error> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(format.clone()));
        }

        let json: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| Error::decode(format.clone(), e.to_string()))?;

        Ok(json_to_value(json))
    }

    fn encode(&self, value: &Value, format: &Format) -> Result<Bytes, Error> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(format.clone()));
        }

        let json = value_to_json(value.clone());
        let mut bytes = serde_json::to_vec_pretty(&json)
            .map_err(|e| Error::encode(format.clone(), e.to_string()))?;
        bytes.push(b'\n');

        Ok(Bytes::from(bytes))
    }

    fn supports(&self, format: &Format) -> bool {
        format == &Format::JSON
    }
}

/// A codec that handles YAML encoding/decoding.
///
/// Documents go through the same `serde_json::Value` bridge as JSON, so map
/// keys must be strings. A document holding only comments or whitespace
/// decodes to `Null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<Value, Error> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(format.clone()));
        }

        let text =
            std::str::from_utf8(bytes).map_err(|e| Error::decode(format.clone(), e.to_string()))?;
        if is_blank_yaml(text) {
            return Ok(Value::Null);
        }

        let json: serde_json::Value =
            serde_yaml::from_str(text).map_err(|e| Error::decode(format.clone(), e.to_string()))?;

        Ok(json_to_value(json))
    }

    fn encode(&self, value: &Value, format: &Format) -> Result<Bytes, Error> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(format.clone()));
        }

        let json = value_to_json(value.clone());
        let text =
            serde_yaml::to_string(&json).map_err(|e| Error::encode(format.clone(), e.to_string()))?;

        Ok(Bytes::from(text))
    }

    fn supports(&self, format: &Format) -> bool {
        format == &Format::YAML
    }
}

/// True if the text holds no YAML node: only whitespace, comments and
/// document markers.
fn is_blank_yaml(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// A codec that combines multiple codecs.
///
/// Routes encode/decode to the appropriate codec based on format.
pub struct MultiCodec {
    codecs: Vec<Box<dyn Codec>>,
}

impl MultiCodec {
    /// Create an empty multi-codec.
    pub fn new() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Add a codec.
    pub fn add(&mut self, codec: impl Codec + 'static) {
        self.codecs.push(Box::new(codec));
    }

    /// Create a multi-codec with the JSON codec included.
    pub fn with_json() -> Self {
        let mut mc = Self::new();
        mc.add(JsonCodec);
        mc
    }

    /// JSON and YAML: every format a file can be opened with by extension.
    pub fn standard() -> Self {
        let mut mc = Self::with_json();
        mc.add(YamlCodec);
        mc
    }
}

impl Default for MultiCodec {
    fn default() -> Self {
        Self::standard()
    }
}

impl Codec for MultiCodec {
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<Value, Error> {
        for codec in &self.codecs {
            if codec.supports(format) {
                return codec.decode(bytes, format);
            }
        }
        Err(Error::UnsupportedFormat(format.clone()))
    }

    fn encode(&self, value: &Value, format: &Format) -> Result<Bytes, Error> {
        for codec in &self.codecs {
            if codec.supports(format) {
                return codec.encode(value, format);
            }
        }
        Err(Error::UnsupportedFormat(format.clone()))
    }

    fn supports(&self, format: &Format) -> bool {
        self.codecs.iter().any(|c| c.supports(format))
    }
}
