//! Request header normalization
//!
//! The native transport accepts only string-valued headers. Richer values
//! are serialized up front instead of being rejected:
//!
//! | value              | native form                    |
//! |--------------------|--------------------------------|
//! | text               | unchanged                      |
//! | number / bool      | textual form (`1.5`, `true`)   |
//! | date               | ISO-8601, millisecond, `Z`     |
//! | object/array/null  | JSON                           |
//! | undefined          | empty string                   |

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A header value as supplied by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Text(String),
    Bool(bool),
    Number(f64),
    #[serde(skip)]
    Date(DateTime<Utc>),
    #[serde(skip)]
    Undefined,
    Json(serde_json::Value),
}

impl HeaderValue {
    /// Serialize the value into the string form the native layer accepts
    pub fn to_type_string(&self) -> String {
        match self {
            HeaderValue::Text(s) => s.clone(),
            HeaderValue::Bool(b) => b.to_string(),
            HeaderValue::Number(n) => number_to_string(*n),
            HeaderValue::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
            HeaderValue::Undefined => String::new(),
            HeaderValue::Json(v) => match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Number(n) => match n.as_f64() {
                    Some(f) if n.is_f64() => number_to_string(f),
                    _ => n.to_string(),
                },
                other => other.to_string(),
            },
        }
    }
}

/// Shortest round-trip text of a number, in the notation hosts expect:
/// plain decimals for exponents -7 < e < 21, otherwise `1e+21` or `1e-7`
fn number_to_string(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let text = format!("{n:e}");
    let Some((mantissa, exp)) = text.split_once('e') else {
        return n.to_string();
    };
    match exp.parse::<i32>() {
        Ok(e) if (-6..21).contains(&e) => n.to_string(),
        Ok(e) if e >= 21 => format!("{mantissa}e+{e}"),
        _ => text,
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        HeaderValue::Text(s.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        HeaderValue::Text(s)
    }
}

impl From<bool> for HeaderValue {
    fn from(b: bool) -> Self {
        HeaderValue::Bool(b)
    }
}

impl From<f64> for HeaderValue {
    fn from(n: f64) -> Self {
        HeaderValue::Number(n)
    }
}

impl From<i64> for HeaderValue {
    fn from(n: i64) -> Self {
        HeaderValue::Number(n as f64)
    }
}

impl From<DateTime<Utc>> for HeaderValue {
    fn from(d: DateTime<Utc>) -> Self {
        HeaderValue::Date(d)
    }
}

impl From<serde_json::Value> for HeaderValue {
    fn from(v: serde_json::Value) -> Self {
        HeaderValue::Json(v)
    }
}

impl<T: Into<HeaderValue>> From<Option<T>> for HeaderValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(HeaderValue::Undefined)
    }
}

/// Reduce a header map to string-only values
pub fn strings_only(headers: &HashMap<String, HeaderValue>) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| (name.clone(), value.to_type_string()))
        .collect()
}
