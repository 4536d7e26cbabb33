//! Typed property values produced by configuration.
//!
//! Design goals:
//! - Component properties hold a [`Value`], never a raw config node
//! - Percentages and colors written as strings become typed values
//! - Conversions from config only via [`Value::from_config`] and [`coerce`]

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::config::{Callback, ConfigNode};
use crate::errors::ParseValueError;

static PERCENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\-]?[0-9.]+%$").expect("valid percent pattern"));

static COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#([0-9a-f]{3}|[0-9a-f]{6})$").expect("valid color pattern")
});

/// Percentage as written: `"50%"` is `Percent(50.0)`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Percent(pub f64);

impl Percent {
    /// The number in front of the `%` sign
    #[inline]
    pub fn percent(self) -> f64 {
        self.0
    }

    /// Fraction of one (`50%` is `0.5`)
    #[inline]
    pub fn value(self) -> f64 {
        self.0 / 100.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl FromStr for Percent {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !PERCENT_PATTERN.is_match(s) {
            return Err(ParseValueError::Percent(s.to_string()));
        }
        s[..s.len() - 1]
            .parse::<f64>()
            .map(Percent)
            .map_err(|_| ParseValueError::Percent(s.to_string()))
    }
}

/// Opaque RGB color parsed from `#rgb` or `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Lowercase `#rrggbb` form
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !COLOR_PATTERN.is_match(s) {
            return Err(ParseValueError::Color(s.to_string()));
        }
        let hex = &s[1..];
        let channel = |digits: &str| {
            u8::from_str_radix(digits, 16).map_err(|_| ParseValueError::Color(s.to_string()))
        };
        if hex.len() == 3 {
            // #f80 is shorthand for #ff8800
            let expand = |i: usize| channel(&hex[i..=i].repeat(2));
            Ok(Color::rgb(expand(0)?, expand(1)?, expand(2)?))
        } else {
            Ok(Color::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ))
        }
    }
}

/// A property value held by a component.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Percent(Percent),
    Color(Color),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Callback(Callback),
}

impl Value {
    /// Structural conversion, no string coercion.
    ///
    /// Returns `None` for component instances, which cannot live in a value.
    pub fn from_config(node: ConfigNode) -> Option<Value> {
        Some(match node {
            ConfigNode::Null => Value::Null,
            ConfigNode::Bool(b) => Value::Bool(b),
            ConfigNode::Number(n) => Value::Number(n),
            ConfigNode::String(s) => Value::String(s),
            ConfigNode::Array(items) => {
                Value::Array(items.into_iter().filter_map(Value::from_config).collect())
            }
            ConfigNode::Object(map) => Value::Object(
                map.into_iter()
                    .filter_map(|(k, v)| Value::from_config(v).map(|v| (k, v)))
                    .collect(),
            ),
            ConfigNode::Callback(cb) => Value::Callback(cb),
            ConfigNode::Instance(_) => return None,
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_percent(&self) -> Option<Percent> {
        match self {
            Value::Percent(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Field lookup on object values
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|fields| fields.get(key))
    }

    /// An empty object, the starting point for untyped collection entries
    pub fn empty_object() -> Self {
        Value::Object(BTreeMap::new())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Percent> for Value {
    fn from(p: Percent) -> Self {
        Value::Percent(p)
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Value::Color(c)
    }
}

/// Convert a config node into a value, turning percentage and hex color
/// strings into typed values.
///
/// Only a top-level string is inspected; nested arrays and objects convert
/// structurally.
pub fn coerce(node: ConfigNode) -> Option<Value> {
    match node {
        ConfigNode::String(s) => Some(coerce_str(s)),
        other => Value::from_config(other),
    }
}

fn coerce_str(s: String) -> Value {
    if PERCENT_PATTERN.is_match(&s) {
        if let Ok(p) = s.parse::<Percent>() {
            return Value::Percent(p);
        }
    }
    if COLOR_PATTERN.is_match(&s) {
        if let Ok(c) = s.parse::<Color>() {
            return Value::Color(c);
        }
    }
    Value::String(s)
}
