//! Typed wire values carried by updates.
//!
//! A [`TypedValue`] is a tagged union: exactly one variant is populated per
//! instance. Decoding a value to display text never fails — an unrecognized
//! wire tag decodes to [`TypedValue::Unknown`] and renders as a visible
//! placeholder, so one forward-incompatible value cannot abort an otherwise
//! good response.

use std::fmt;

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed-point decimal: a scaled integer plus a fractional digit count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decimal64 {
    /// Scaled integer value.
    pub digits: u64,
    /// Number of fractional digits.
    pub precision: u8,
}

impl fmt::Display for Decimal64 {
    /// Renders `digits / 10^precision` as `integer.fraction`.
    ///
    /// The fractional part is printed without left-padding to `precision`
    /// digits, and precision 0 renders a literal `.0` fraction. Both quirks
    /// are compatibility behavior and must not be "corrected".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (int, frac) = if self.precision > 0 {
            let divisor = 10u64.pow(u32::from(self.precision));
            (self.digits / divisor, self.digits % divisor)
        } else {
            (self.digits, 0)
        };
        write!(f, "{int}.{frac}")
    }
}

/// A single typed value from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    /// UTF-8 string value.
    String(String),
    /// RFC 7951 JSON payload, kept as text.
    JsonIetf(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Boolean.
    Bool(bool),
    /// Opaque byte sequence.
    Bytes(Vec<u8>),
    /// Fixed-point decimal.
    Decimal(Decimal64),
    /// A value kind this client does not know. Kept so newer devices can
    /// stream values we merely display as a placeholder.
    Unknown {
        /// The wire tag that was not recognized.
        tag: String,
    },
}

impl TypedValue {
    /// Build a JSON value from raw payload bytes.
    #[must_use]
    pub fn json(payload: impl AsRef<[u8]>) -> Self {
        Self::JsonIetf(String::from_utf8_lossy(payload.as_ref()).into_owned())
    }

    /// The wire tag for this variant.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::String(_) => "string",
            Self::JsonIetf(_) => "json_ietf",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Decimal(_) => "decimal",
            Self::Unknown { tag } => tag,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) | Self::JsonIetf(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Bytes(v) => write!(f, "{}", String::from_utf8_lossy(v)),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Unknown { tag } => write!(f, "[unsupported type {tag:?}]"),
        }
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("TypedValue", 2)?;
        st.serialize_field("type", self.tag())?;
        match self {
            Self::String(v) | Self::JsonIetf(v) => st.serialize_field("value", v)?,
            Self::Int(v) => st.serialize_field("value", v)?,
            Self::Uint(v) => st.serialize_field("value", v)?,
            Self::Bool(v) => st.serialize_field("value", v)?,
            Self::Bytes(v) => st.serialize_field("value", v)?,
            Self::Decimal(v) => st.serialize_field("value", v)?,
            Self::Unknown { .. } => st.serialize_field("value", &())?,
        }
        st.end()
    }
}

// Hand-written so an unknown tag becomes `Unknown` instead of a hard
// deserialization failure for the whole enclosing response.
impl<'de> Deserialize<'de> for TypedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct WireValue {
            #[serde(rename = "type")]
            tag: String,
            #[serde(default)]
            value: serde_json::Value,
        }

        fn field<'de, D: Deserializer<'de>, T: serde::de::DeserializeOwned>(
            tag: &str,
            value: serde_json::Value,
        ) -> Result<T, D::Error> {
            serde_json::from_value(value)
                .map_err(|e| D::Error::custom(format!("bad {tag} value: {e}")))
        }

        let wire = WireValue::deserialize(deserializer)?;
        Ok(match wire.tag.as_str() {
            "string" => Self::String(field::<D, _>("string", wire.value)?),
            "json_ietf" => Self::JsonIetf(field::<D, _>("json_ietf", wire.value)?),
            "int" => Self::Int(field::<D, _>("int", wire.value)?),
            "uint" => Self::Uint(field::<D, _>("uint", wire.value)?),
            "bool" => Self::Bool(field::<D, _>("bool", wire.value)?),
            "bytes" => Self::Bytes(field::<D, _>("bytes", wire.value)?),
            "decimal" => Self::Decimal(field::<D, _>("decimal", wire.value)?),
            other => Self::Unknown { tag: other.to_string() },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(0, 0 => "0.0")]
    #[test_case(123, 0 => "123.0"; "precision zero keeps integer digits")]
    #[test_case(2207, 2 => "22.7"; "trailing zero of remainder collapses")]
    #[test_case(105, 3 => "0.105")]
    #[test_case(1005, 3 => "1.5"; "no left padding of small remainders")]
    fn decimal_rendering(digits: u64, precision: u8) -> String {
        Decimal64 { digits, precision }.to_string()
    }

    proptest! {
        #[test]
        fn decimal_precision_zero_is_integer_dot_zero(digits: u64) {
            let rendered = Decimal64 { digits, precision: 0 }.to_string();
            prop_assert_eq!(rendered, format!("{digits}.0"));
        }

        #[test]
        fn decimal_parts_recover_digits(digits: u64, precision in 0u8..=18) {
            let rendered = Decimal64 { digits, precision }.to_string();
            let (int, frac) = rendered.split_once('.').unwrap();
            let int: u64 = int.parse().unwrap();
            let frac: u64 = frac.parse().unwrap();
            let divisor = if precision > 0 { 10u64.pow(u32::from(precision)) } else { 1 };
            prop_assert_eq!(int * divisor + frac, digits);
        }
    }

    #[test]
    fn typed_value_serde_round_trips() {
        let values = [
            TypedValue::String("up".into()),
            TypedValue::JsonIetf(r#"{"mtu":1500}"#.into()),
            TypedValue::Int(-42),
            TypedValue::Uint(42),
            TypedValue::Bool(true),
            TypedValue::Bytes(vec![1, 2, 3]),
            TypedValue::Decimal(Decimal64 { digits: 1234, precision: 2 }),
        ];
        for value in values {
            let json = serde_json::to_string(&value).unwrap();
            assert!(json.contains(value.tag()), "{json}");
            let parsed: TypedValue = serde_json::from_str(&json).unwrap();
            assert_eq!(value, parsed);
        }
    }

    #[test]
    fn unknown_tag_decodes_instead_of_failing() {
        let parsed: TypedValue =
            serde_json::from_str(r#"{"type":"proto_bytes","value":"AAE="}"#).unwrap();
        assert_eq!(
            parsed,
            TypedValue::Unknown { tag: "proto_bytes".into() }
        );
        assert_eq!(parsed.to_string(), "[unsupported type \"proto_bytes\"]");
    }

    #[test]
    fn unknown_tag_without_value_field() {
        let parsed: TypedValue = serde_json::from_str(r#"{"type":"anytype"}"#).unwrap();
        assert!(matches!(parsed, TypedValue::Unknown { .. }));
    }

    #[test]
    fn display_formats() {
        assert_eq!(TypedValue::String("x".into()).to_string(), "x");
        assert_eq!(TypedValue::Int(-7).to_string(), "-7");
        assert_eq!(TypedValue::Bool(false).to_string(), "false");
        assert_eq!(TypedValue::Bytes(b"raw".to_vec()).to_string(), "raw");
        assert_eq!(
            TypedValue::Decimal(Decimal64 { digits: 1005, precision: 3 }).to_string(),
            "1.5"
        );
    }
}
