//! Lenient scalar handling for router-reported values.
//!
//! The router agent converts the AHA XML device list to JSON, so numbers and
//! flags usually arrive as strings (`"215"`, `"1"`), but hand-written or newer
//! agent output may use real JSON numbers and booleans. Every scalar is kept as
//! its textual form and parsed on access, so a malformed value only ever
//! affects the single field it belongs to.

use serde::de;

/// Deserialize any JSON scalar into its textual form.
///
/// Strings are kept as-is, numbers and booleans are stringified and null
/// becomes `None`. Objects and arrays in a scalar position are consumed and
/// treated as absent instead of failing the whole document.
pub fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Scalar;

    impl<'de> de::Visitor<'de> for Scalar {
        type Value = Option<String>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("string, number, boolean, or null")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: de::MapAccess<'de>,
        {
            while map
                .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
                .is_some()
            {}
            Ok(None)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            while seq.next_element::<de::IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    deserializer.deserialize_any(Scalar)
}

/// Parse a floating point value, `None` when absent or malformed.
pub fn parse_f64(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse an integer value. Fractional input is truncated toward zero.
pub fn parse_i64(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| parse_f64(Some(raw)).map(|v| v.trunc() as i64))
}

/// Parse a boolean-like flag: `"1"`, `"true"` and any non-zero number are set.
pub fn parse_flag(raw: Option<&str>) -> Option<bool> {
    let raw = raw?.trim();
    match raw.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => parse_i64(Some(raw)).map(|v| v != 0),
    }
}
