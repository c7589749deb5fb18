//! Bridging `Value` trees and serde.
//!
//! Every codec and the typed accessors go through `serde_json::Value`; these
//! functions are the only place the two trees meet. Map order is kept in both
//! directions (serde_json is built with `preserve_order`).

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Number;

use flatstore_core_store::{Error, Format, Map, Value};

/// Deserialize a Rust type out of a `Value`.
///
/// Mismatches are reported as decode errors against [`Format::VALUE`].
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(value_to_json(value))
        .map_err(|e| Error::decode(Format::VALUE, e.to_string()))
}

/// Serialize a Rust type into a `Value`.
pub fn to_value<T: Serialize + ?Sized>(data: &T) -> Result<Value, Error> {
    serde_json::to_value(data)
        .map(json_to_value)
        .map_err(|e| Error::encode(Format::VALUE, e.to_string()))
}

/// `Value` to `serde_json::Value`.
///
/// NaN and infinities have no JSON form and come out as `null`.
pub fn value_to_json(value: Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(b),
        Value::Integer(i) => Json::Number(i.into()),
        Value::Unsigned(u) => Json::Number(u.into()),
        Value::Float(f) => Number::from_f64(f).map_or(Json::Null, Json::Number),
        Value::String(s) => Json::String(s),
        Value::Array(items) => items.into_iter().map(value_to_json).collect(),
        Value::Map(map) => Json::Object(
            map.into_iter()
                .map(|(key, child)| (key, value_to_json(child)))
                .collect(),
        ),
    }
}

/// `serde_json::Value` to `Value`.
pub fn json_to_value(json: serde_json::Value) -> Value {
    use serde_json::Value as Json;

    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => number_to_value(&n),
        Json::String(s) => Value::String(s),
        Json::Array(items) => Value::Array(items.into_iter().map(json_to_value).collect()),
        Json::Object(object) => Value::Map(
            object
                .into_iter()
                .map(|(key, child)| (key, json_to_value(child)))
                .collect::<Map>(),
        ),
    }
}

/// Integers stay integers at full `u64` width; only numbers written with a
/// fraction or exponent become floats.
fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Integer(i)
    } else if let Some(u) = n.as_u64() {
        Value::Unsigned(u)
    } else {
        n.as_f64().map_or(Value::Null, Value::Float)
    }
}
