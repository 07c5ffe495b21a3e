// Interpretation of the 32-bit words answered on the controller's TCP port
use crate::domain::reduction::format_epoch;
use crate::domain::value::{RawValue, Value};
use std::net::Ipv4Addr;

const TIMESTAMP_FORMAT: &str = "%H:%M %d.%m.%Y";
/// The only error code the controller reports with a fixed text.
const MAX_OUTSIDE_TEMPERATURE: i32 = 718;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Datatype {
    /// Plain integer, `unit` may be empty.
    Integer(&'static str),
    /// Tenths of `unit`.
    Tenths(&'static str),
    Bool,
    /// Index into a list of codes.
    Selection(&'static [&'static str]),
    Character,
    Ipv4,
    /// Epoch seconds, rendered in local time.
    Timestamp,
    ErrorCode,
    /// `major * 100 + minor`.
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub kind: Datatype,
}

impl Field {
    pub const fn new(name: &'static str, kind: Datatype) -> Self {
        Self { name, kind }
    }
}

impl Datatype {
    pub fn read(self, raw: i32) -> Value {
        match self {
            Datatype::Integer(unit) => Value::with_unit(RawValue::Integer(raw as i64), unit),
            Datatype::Tenths(unit) => Value::with_unit(RawValue::Number(raw as f64 / 10.0), unit),
            Datatype::Bool => Value::bool(raw != 0),
            Datatype::Selection(codes) => match usize::try_from(raw).ok().and_then(|i| codes.get(i)) {
                Some(code) => Value::text(*code),
                None => {
                    tracing::debug!("Code {} outside of a {} entry selection", raw, codes.len());
                    Value::integer(raw as i64)
                }
            },
            Datatype::Character => Value::text(
                u32::try_from(raw)
                    .ok()
                    .and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_default(),
            ),
            Datatype::Ipv4 => Value::text(Ipv4Addr::from(raw as u32).to_string()),
            Datatype::Timestamp => match format_epoch(raw as i64, TIMESTAMP_FORMAT) {
                Some(text) => Value::text(text),
                None => Value::integer(raw as i64),
            },
            Datatype::ErrorCode if raw == MAX_OUTSIDE_TEMPERATURE => {
                Value::text(format!("Max. Aussentemp. ({})", raw))
            }
            Datatype::ErrorCode => Value::integer(raw as i64),
            Datatype::Version if raw > 0 => Value::text(format!("{}.{}", raw / 100, raw % 100)),
            Datatype::Version => Value::text("0"),
        }
    }
}
