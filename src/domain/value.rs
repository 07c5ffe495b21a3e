// Datapoint value model
use super::error::{Error, Result};
use std::fmt;

/// Concrete kind of a [`RawValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Number,
    Integer,
    Text,
    Bool,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Number => "number",
            Kind::Integer => "integer",
            Kind::Text => "text",
            Kind::Bool => "bool",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Integer(i64),
    Text(String),
    Bool(bool),
}

impl RawValue {
    pub fn kind(&self) -> Kind {
        match self {
            RawValue::Number(_) => Kind::Number,
            RawValue::Integer(_) => Kind::Integer,
            RawValue::Text(_) => Kind::Text,
            RawValue::Bool(_) => Kind::Bool,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, RawValue::Number(_) | RawValue::Integer(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Parse `text` as the given kind.
    pub fn parse_as(kind: Kind, text: &str) -> Result<RawValue> {
        let trimmed = text.trim();
        let parsed = match kind {
            Kind::Number => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(RawValue::Number),
            Kind::Integer => trimmed.parse::<i64>().ok().map(RawValue::Integer),
            Kind::Text => Some(RawValue::Text(text.to_string())),
            Kind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" | "on" | "ein" => Some(RawValue::Bool(true)),
                "false" | "0" | "off" | "aus" => Some(RawValue::Bool(false)),
                _ => None,
            },
        };

        parsed.ok_or(Error::TypeMismatch {
            expected: kind,
            actual: Kind::Text,
        })
    }

    /// Number if `text` parses as one, text otherwise.
    pub fn coerce(text: &str) -> RawValue {
        RawValue::parse_as(Kind::Number, text).unwrap_or_else(|_| RawValue::Text(text.to_string()))
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Integer(i) => write!(f, "{}", i),
            RawValue::Text(s) => f.write_str(s),
            RawValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A datapoint payload together with its display unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    raw: RawValue,
    unit: String,
    mutable: bool,
}

impl Value {
    pub fn new(raw: RawValue) -> Self {
        Self {
            raw,
            unit: String::new(),
            mutable: false,
        }
    }

    pub fn with_unit(raw: RawValue, unit: impl Into<String>) -> Self {
        Self {
            raw,
            unit: unit.into(),
            mutable: false,
        }
    }

    pub fn mutable(mut self) -> Self {
        self.mutable = true;
        self
    }

    pub fn number(value: f64) -> Self {
        Self::new(RawValue::Number(value))
    }

    pub fn integer(value: i64) -> Self {
        Self::new(RawValue::Integer(value))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(RawValue::Text(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Self::new(RawValue::Bool(value))
    }

    pub fn get(&self) -> &RawValue {
        &self.raw
    }

    pub fn kind(&self) -> Kind {
        self.raw.kind()
    }

    pub fn is_numeric(&self) -> bool {
        self.raw.is_numeric()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.raw.as_f64()
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Replace the payload. The kind is fixed at construction.
    pub fn set(&mut self, raw: RawValue) -> Result<()> {
        if !self.mutable {
            return Err(Error::InvalidOperation(format!(
                "value {} is read-only",
                self.raw
            )));
        }
        if raw.kind() != self.raw.kind() {
            return Err(Error::TypeMismatch {
                expected: self.raw.kind(),
                actual: raw.kind(),
            });
        }
        self.raw = raw;
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.raw)
        } else {
            write!(f, "{} {}", self.raw, self.unit)
        }
    }
}
