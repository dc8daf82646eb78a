//! Value codecs.
//!
//! A codec turns one logical type into the string stored by an adapter and
//! back. Codecs are stateless; a schema shares each one between fields
//! through an `Arc`.
//!
//! Built-in codecs:
//!
//! | Codec | encode | decode |
//! |---|---|---|
//! | [`StringCodec`] | identity | raw as-is |
//! | [`BoolCodec`] | `"1"` / `"0"` | `"1"`, `"0"`, anything else is `None` |
//! | [`NumberCodec`] | decimal form | numeric parse, `NaN` when unparseable |
//! | [`JsonCodec`] | `serde_json` | `serde_json`, malformed input is an error |

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// Encode/decode strategy for one logical value type.
///
/// Implementations must satisfy the round-trip law: `decode(Some(&encode(v)?))`
/// yields a value observably equal to `v`, and `decode(None)` is `Ok(None)`.
pub trait Codec: Send + Sync + 'static {
    /// The logical value type handled by this codec.
    type Value: Send + 'static;

    /// Short name used in diagnostics and CLI output.
    fn name(&self) -> &'static str;

    /// Encode a value into its stored string form.
    fn encode(&self, value: &Self::Value) -> Result<String>;

    /// Decode a stored string. `None` means nothing is stored.
    fn decode(&self, raw: Option<&str>) -> Result<Option<Self::Value>>;
}

/// Identity codec for `String` values.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringCodec;

impl Codec for StringCodec {
    type Value = String;

    fn name(&self) -> &'static str {
        "string"
    }

    fn encode(&self, value: &String) -> Result<String> {
        Ok(value.clone())
    }

    fn decode(&self, raw: Option<&str>) -> Result<Option<String>> {
        Ok(raw.map(str::to_string))
    }
}

/// Boolean codec storing `"1"` for true and `"0"` for false.
///
/// Any other stored text decodes to `None` rather than an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoolCodec;

impl Codec for BoolCodec {
    type Value = bool;

    fn name(&self) -> &'static str {
        "boolean"
    }

    fn encode(&self, value: &bool) -> Result<String> {
        Ok(if *value { "1" } else { "0" }.to_string())
    }

    fn decode(&self, raw: Option<&str>) -> Result<Option<bool>> {
        Ok(match raw {
            Some("1") => Some(true),
            Some("0") => Some(false),
            _ => None,
        })
    }
}

/// Numeric codec for `f64` values.
///
/// Whole numbers are written without a fractional part (`7.0` is stored as
/// `"7"`). Stored text that does not parse as a number decodes to `NaN`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberCodec;

impl Codec for NumberCodec {
    type Value = f64;

    fn name(&self) -> &'static str {
        "number"
    }

    fn encode(&self, value: &f64) -> Result<String> {
        Ok(value.to_string())
    }

    fn decode(&self, raw: Option<&str>) -> Result<Option<f64>> {
        Ok(raw.map(|text| text.trim().parse::<f64>().unwrap_or(f64::NAN)))
    }
}

/// JSON codec for any serde-compatible type.
pub struct JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonCodec<{}>", type_name::<T>())
    }
}

impl<T> Codec for JsonCodec<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    type Value = T;

    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| StoreError::Encode {
            key: String::new(),
            message: e.to_string(),
        })
    }

    fn decode(&self, raw: Option<&str>) -> Result<Option<T>> {
        match raw {
            Some(text) => serde_json::from_str(text)
                .map(Some)
                .map_err(|source| StoreError::Decode {
                    key: String::new(),
                    source,
                }),
            None => Ok(None),
        }
    }
}

/// Type-erased view of a codec, so one schema can hold fields of different
/// value types.
pub(crate) trait ErasedCodec: Send + Sync {
    fn name(&self) -> &'static str;

    fn value_type(&self) -> &'static str;

    fn encode_any(&self, value: &dyn Any) -> Result<String>;

    fn decode_any(&self, raw: Option<&str>) -> Result<Option<Box<dyn Any + Send>>>;
}

impl<C: Codec> ErasedCodec for C {
    fn name(&self) -> &'static str {
        Codec::name(self)
    }

    fn value_type(&self) -> &'static str {
        type_name::<C::Value>()
    }

    fn encode_any(&self, value: &dyn Any) -> Result<String> {
        let value = value
            .downcast_ref::<C::Value>()
            .ok_or_else(|| StoreError::TypeMismatch {
                key: String::new(),
                expected: type_name::<C::Value>(),
            })?;
        self.encode(value)
    }

    fn decode_any(&self, raw: Option<&str>) -> Result<Option<Box<dyn Any + Send>>> {
        Ok(self
            .decode(raw)?
            .map(|value| Box::new(value) as Box<dyn Any + Send>))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_string_codec_is_identity() {
        let codec = StringCodec;
        let encoded = codec.encode(&"hello world".to_string()).unwrap();
        assert_eq!(encoded, "hello world");
        assert_eq!(
            codec.decode(Some(&encoded)).unwrap(),
            Some("hello world".to_string())
        );
        assert_eq!(codec.decode(None).unwrap(), None);
    }

    #[test]
    fn test_bool_codec_wire_form() {
        let codec = BoolCodec;
        assert_eq!(codec.encode(&true).unwrap(), "1");
        assert_eq!(codec.encode(&false).unwrap(), "0");
        assert_eq!(codec.decode(Some("1")).unwrap(), Some(true));
        assert_eq!(codec.decode(Some("0")).unwrap(), Some(false));
        assert_eq!(codec.decode(None).unwrap(), None);
    }

    #[test]
    fn test_bool_codec_malformed_is_none() {
        let codec = BoolCodec;
        assert_eq!(codec.decode(Some("true")).unwrap(), None);
        assert_eq!(codec.decode(Some("")).unwrap(), None);
        assert_eq!(codec.decode(Some("yes")).unwrap(), None);
    }

    #[test]
    fn test_number_codec() {
        let codec = NumberCodec;
        assert_eq!(codec.encode(&7.0).unwrap(), "7");
        assert_eq!(codec.encode(&-1.5).unwrap(), "-1.5");
        assert_eq!(codec.decode(Some("7")).unwrap(), Some(7.0));
        assert_eq!(codec.decode(Some("0.25")).unwrap(), Some(0.25));
        assert_eq!(codec.decode(None).unwrap(), None);
    }

    #[test]
    fn test_number_codec_non_numeric_is_nan() {
        let value = NumberCodec.decode(Some("abc")).unwrap().unwrap();
        assert!(value.is_nan());
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        tags: Vec<String>,
        nested: Option<Box<Profile>>,
    }

    #[test]
    fn test_json_codec_nested_round_trip() {
        let codec = JsonCodec::<Profile>::new();
        let profile = Profile {
            name: "outer".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
            nested: Some(Box::new(Profile {
                name: "inner".to_string(),
                tags: Vec::new(),
                nested: None,
            })),
        };
        let encoded = codec.encode(&profile).unwrap();
        assert_eq!(codec.decode(Some(&encoded)).unwrap(), Some(profile));
    }

    #[test]
    fn test_json_codec_malformed_is_error() {
        let codec = JsonCodec::<serde_json::Value>::new();
        let err = codec.decode(Some("{not json")).unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
        assert_eq!(codec.decode(None).unwrap(), None);
    }

    #[test]
    fn test_erased_codec_rejects_wrong_type() {
        let codec: &dyn ErasedCodec = &NumberCodec;
        let err = codec.encode_any(&"seven".to_string()).unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { expected: "f64", .. }));
        assert_eq!(codec.encode_any(&7.0f64).unwrap(), "7");
    }
}
