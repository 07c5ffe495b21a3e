// Static field dictionary entries and the record decoder shared by the fixed-layout versions
use super::lut::LookUpTable;
use super::reader::ByteReader;
use crate::domain::error::{Error, Result};
use crate::domain::frame::{Frame, TIME_COLUMN};
use crate::domain::value::{RawValue, Value};

pub const CELSIUS: &str = "°C";
pub const KELVIN: &str = "K";
pub const VOLT: &str = "V";
pub const LITRES_PER_HOUR: &str = "l/h";

/// One named bit of a digital status word.
#[derive(Debug, Clone, Copy)]
pub struct Bit {
    pub name: &'static str,
    pub bit: u8,
    pub inverted: bool,
}

pub const fn bit(name: &'static str, bit: u8) -> Bit {
    Bit {
        name,
        bit,
        inverted: false,
    }
}

pub const fn inverted(name: &'static str, bit: u8) -> Bit {
    Bit {
        name,
        bit,
        inverted: true,
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Width {
    I16,
    I32,
}

#[derive(Debug, Clone, Copy)]
pub enum Field {
    /// `i32` epoch seconds.
    Time,
    /// Bytes with no known meaning.
    Skip(usize),
    /// Raw integer divided by `factor`.
    Analogue {
        name: &'static str,
        factor: f64,
        width: Width,
        unit: &'static str,
    },
    /// `i16` sensor reading mapped through a lookup table.
    Lut {
        name: &'static str,
        table: &'static LookUpTable,
        unit: &'static str,
    },
    /// Tag byte followed by a one or two byte magnitude, in tenths.
    Tagged {
        name: &'static str,
        unit: &'static str,
    },
    /// `i16` status word split into booleans.
    Digital(&'static [Bit]),
}

pub const fn analogue(name: &'static str, factor: f64, unit: &'static str) -> Field {
    Field::Analogue {
        name,
        factor,
        width: Width::I16,
        unit,
    }
}

pub const fn analogue_wide(name: &'static str, factor: f64, unit: &'static str) -> Field {
    Field::Analogue {
        name,
        factor,
        width: Width::I32,
        unit,
    }
}

pub const fn lut(name: &'static str, table: &'static LookUpTable) -> Field {
    Field::Lut {
        name,
        table,
        unit: CELSIUS,
    }
}

pub const fn tagged(name: &'static str, unit: &'static str) -> Field {
    Field::Tagged { name, unit }
}

/// Decode one record laid out as `fields`.
pub fn read_record(reader: &mut ByteReader<'_>, fields: &[Field]) -> Result<Frame> {
    let mut frame = Frame::new();
    for field in fields {
        read_field(reader, field, &mut frame)?;
    }
    Ok(frame)
}

fn read_field(reader: &mut ByteReader<'_>, field: &Field, frame: &mut Frame) -> Result<()> {
    match *field {
        Field::Time => {
            let time = reader.i32()?;
            frame.insert(TIME_COLUMN, Value::integer(time as i64));
        }
        Field::Skip(count) => reader.skip(count)?,
        Field::Analogue {
            name,
            factor,
            width,
            unit,
        } => {
            let raw = match width {
                Width::I16 => reader.i16()? as f64,
                Width::I32 => reader.i32()? as f64,
            };
            frame.insert(name, Value::with_unit(RawValue::Number(raw / factor), unit));
        }
        Field::Lut { name, table, unit } => {
            let raw = reader.i16()?;
            frame.insert(name, Value::with_unit(RawValue::Number(table.lookup(raw)), unit));
        }
        Field::Tagged { name, unit } => {
            let value = read_tagged(reader)?;
            frame.insert(name, Value::with_unit(RawValue::Number(value as f64 / 10.0), unit));
        }
        Field::Digital(bits) => read_digital(reader, bits, 0, frame)?,
    }
    Ok(())
}

/// Status word with each bit's inversion taken from `bits`, additionally inverted where
/// `invert_mask` has the bit set.
pub fn read_digital(
    reader: &mut ByteReader<'_>,
    bits: &[Bit],
    invert_mask: u16,
    frame: &mut Frame,
) -> Result<()> {
    let word = reader.i16()? as u16;
    for b in bits {
        let set = (word >> b.bit) & 1 == 1;
        let inverted = b.inverted ^ ((invert_mask >> b.bit) & 1 == 1);
        frame.insert(b.name, Value::bool(set != inverted));
    }
    Ok(())
}

fn read_tagged(reader: &mut ByteReader<'_>) -> Result<i32> {
    let offset = reader.position();
    match reader.u8()? {
        0 => Ok(reader.i8()? as i32),
        1 => Ok(reader.i16()? as i32),
        4 => Ok(-(reader.i8()? as i32)),
        5 => Ok(-(reader.i16()? as i32)),
        tag => Err(Error::parse(offset, format!("unknown field type 0x{:02X}", tag))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &[Bit] = &[bit("HUP", 0), bit("VD1", 7), inverted("HD", 1)];

    #[test]
    fn test_read_record() {
        let fields = [
            Field::Time,
            analogue("TVL", 10.0, CELSIUS),
            Field::Skip(2),
            analogue_wide("TRLsoll", 10.0, CELSIUS),
            Field::Digital(STATUS),
        ];
        let mut data = Vec::new();
        data.extend_from_slice(&1_700_000_000i32.to_le_bytes());
        data.extend_from_slice(&312i16.to_le_bytes());
        data.extend_from_slice(&[0xAA, 0xBB]);
        data.extend_from_slice(&285i32.to_le_bytes());
        data.extend_from_slice(&0b1000_0001u16.to_le_bytes());

        let frame = read_record(&mut ByteReader::new(&data), &fields).unwrap();

        assert_eq!(frame.time(), Some(1_700_000_000));
        assert_eq!(frame.numeric("TVL"), Some(31.2));
        assert_eq!(frame.get("TVL").unwrap().unit(), CELSIUS);
        assert_eq!(frame.numeric("TRLsoll"), Some(28.5));
        assert_eq!(frame.get("HUP").unwrap().get(), &RawValue::Bool(true));
        assert_eq!(frame.get("VD1").unwrap().get(), &RawValue::Bool(true));
        // inverted bit 1 is clear -> true
        assert_eq!(frame.get("HD").unwrap().get(), &RawValue::Bool(true));
    }

    #[test]
    fn test_tagged_values() {
        let fields = [tagged("A", CELSIUS), tagged("B", CELSIUS), tagged("C", CELSIUS)];
        let data = [0x00, 25, 0x05, 0x2C, 0x01, 0x04, 7];

        let frame = read_record(&mut ByteReader::new(&data), &fields).unwrap();

        assert_eq!(frame.numeric("A"), Some(2.5));
        assert_eq!(frame.numeric("B"), Some(-30.0));
        assert_eq!(frame.numeric("C"), Some(-0.7));
    }

    #[test]
    fn test_unknown_tag_fails_at_tag_offset() {
        let data = [0x00, 1, 0x09, 1];
        let result = read_record(
            &mut ByteReader::new(&data),
            &[tagged("A", CELSIUS), tagged("B", CELSIUS)],
        );
        assert!(matches!(result, Err(Error::Parse { offset: 2, .. })));
    }

    #[test]
    fn test_invert_mask() {
        let mut frame = Frame::new();
        let data = 0b01u16.to_le_bytes();
        read_digital(
            &mut ByteReader::new(&data),
            &[bit("A", 0), bit("B", 1)],
            0b10,
            &mut frame,
        )
        .unwrap();

        assert_eq!(frame.get("A").unwrap().get(), &RawValue::Bool(true));
        assert_eq!(frame.get("B").unwrap().get(), &RawValue::Bool(true));
    }
}
