//! Codec trait: the seam between stores and concrete file formats.

use bytes::Bytes;

use crate::{Error, Format, Value};

/// Codec for converting between Value and bytes.
///
/// Codecs handle the parsing (decode) and serialization (encode) of data.
/// Stores don't care about specific formats - that's the codec's job.
///
/// # Implementing Custom Codecs
///
/// ```rust
/// use flatstore_core_store::{Codec, Value, Format, Error};
/// use bytes::Bytes;
///
/// const LINES: Format = Format::from_static("text/x-lines");
///
/// /// One `key=value` string entry per line.
/// struct LinesCodec;
///
/// impl Codec for LinesCodec {
///     fn decode(&self, bytes: &Bytes, format: &Format) -> Result<Value, Error> {
///         if !self.supports(format) {
///             return Err(Error::UnsupportedFormat(format.clone()));
///         }
///         let text = std::str::from_utf8(bytes)
///             .map_err(|e| Error::decode(format.clone(), e.to_string()))?;
///         let mut map = flatstore_core_store::Map::new();
///         for line in text.lines().filter(|l| !l.is_empty()) {
///             let (k, v) = line
///                 .split_once('=')
///                 .ok_or_else(|| Error::decode(format.clone(), "missing '='"))?;
///             map.insert(k.to_string(), Value::from(v));
///         }
///         Ok(Value::Map(map))
///     }
///
///     fn encode(&self, value: &Value, format: &Format) -> Result<Bytes, Error> {
///         let map = value
///             .as_map()
///             .ok_or_else(|| Error::encode(format.clone(), "expected a map"))?;
///         let mut out = String::new();
///         for (k, v) in map {
///             out.push_str(&format!("{}={}\n", k, v.as_str().unwrap_or_default()));
///         }
///         Ok(Bytes::from(out))
///     }
///
///     fn supports(&self, format: &Format) -> bool {
///         format == &LINES
///     }
/// }
///
/// let bytes = Bytes::from_static(b"a=1\nb=2\n");
/// let value = LinesCodec.decode(&bytes, &LINES).unwrap();
/// assert_eq!(LinesCodec.encode(&value, &LINES).unwrap(), bytes);
/// ```
pub trait Codec: Send + Sync {
    /// Decode raw bytes into a Value.
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<Value, Error>;

    /// Encode a Value into raw bytes.
    fn encode(&self, value: &Value, format: &Format) -> Result<Bytes, Error>;

    /// Check if this codec supports a format.
    fn supports(&self, format: &Format) -> bool;
}

impl<T: Codec + ?Sized> Codec for Box<T> {
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<Value, Error> {
        (**self).decode(bytes, format)
    }

    fn encode(&self, value: &Value, format: &Format) -> Result<Bytes, Error> {
        (**self).encode(value, format)
    }

    fn supports(&self, format: &Format) -> bool {
        (**self).supports(format)
    }
}
