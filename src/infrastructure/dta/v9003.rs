// DTA 9003: self-describing files, a field definition block precedes the records
use super::reader::ByteReader;
use crate::domain::error::{Error, Result};
use crate::domain::frame::Frame;
use crate::domain::value::{RawValue, Value};

pub const VERSION: u32 = 9003;

const DEFINITIONS_START: usize = 12;
const DEFAULT_FACTOR: i16 = 10;
const NAME_PREFIX: &str = "Text_";

const FLAG_FACTOR: u8 = 0x80;
const FLAG_VISIBILITY: u8 = 0x40;
const FLAG_FACTORY_ONLY: u8 = 0x20;
const FLAG_IO: u8 = 0x04;

#[derive(Debug, Clone, PartialEq)]
enum Definition {
    Category(String),
    Analogue { name: String, factor: f64 },
    /// Bits whose `io` flag is clear are stored inverted.
    Digital { bits: Vec<String>, io: u16 },
    Enum { name: String, items: Vec<String> },
}

impl Definition {
    /// Categories and enums occupy no bytes in a record.
    fn is_stored(&self) -> bool {
        matches!(self, Definition::Analogue { .. } | Definition::Digital { .. })
    }
}

fn read_name(reader: &mut ByteReader<'_>) -> Result<String> {
    Ok(reader.c_string()?.replace(NAME_PREFIX, ""))
}

fn skip_color(reader: &mut ByteReader<'_>) -> Result<()> {
    reader.skip(3)
}

fn read_definition(reader: &mut ByteReader<'_>) -> Result<Definition> {
    let offset = reader.position();
    let id = reader.u8()?;
    let definition = match id & 0x0F {
        0 => Definition::Category(read_name(reader)?),
        1 => {
            let name = read_name(reader)?;
            skip_color(reader)?;
            let factor_offset = reader.position();
            let factor = if id & FLAG_FACTOR != 0 {
                reader.i16()?
            } else {
                DEFAULT_FACTOR
            };
            if factor == 0 {
                return Err(Error::parse(
                    factor_offset,
                    format!("analogue field {} has a zero factor", name),
                ));
            }
            Definition::Analogue {
                name,
                factor: factor as f64,
            }
        }
        2 | 4 => {
            let count = reader.u8()?;
            if id & FLAG_VISIBILITY != 0 {
                reader.skip(2)?;
            }
            if id & FLAG_FACTORY_ONLY != 0 {
                reader.skip(2)?;
            }
            let io = if id & FLAG_IO != 0 {
                reader.i16()? as u16
            } else if id & FLAG_FACTOR != 0 {
                0xFFFF
            } else {
                0
            };
            let mut bits = Vec::with_capacity(count as usize);
            for _ in 0..count {
                bits.push(read_name(reader)?);
                skip_color(reader)?;
            }
            Definition::Digital { bits, io }
        }
        3 => {
            let name = read_name(reader)?;
            let count = reader.u8()?;
            let items = (0..count)
                .map(|_| read_name(reader))
                .collect::<Result<Vec<_>>>()?;
            Definition::Enum { name, items }
        }
        other => {
            return Err(Error::parse(
                offset,
                format!("unknown field definition type 0x{:02X}", other),
            ));
        }
    };
    Ok(definition)
}

fn read_definitions(reader: &mut ByteReader<'_>, end: usize) -> Result<Vec<Definition>> {
    let mut definitions = Vec::new();
    while reader.position() < end {
        definitions.push(read_definition(reader)?);
    }
    Ok(definitions)
}

fn read_entry(reader: &mut ByteReader<'_>, definitions: &[Definition]) -> Result<Frame> {
    let mut frame = Frame::with_time(reader.i32()? as i64);
    for definition in definitions.iter().filter(|d| d.is_stored()) {
        match definition {
            Definition::Analogue { name, factor } => {
                let raw = reader.i16()? as f64;
                frame.insert(name.as_str(), Value::new(RawValue::Number(raw / factor)));
            }
            Definition::Digital { bits, io } => {
                let word = reader.i16()? as u16;
                for (i, name) in bits.iter().enumerate().take(16) {
                    let set = (word >> i) & 1 == 1;
                    let inverted = (io >> i) & 1 == 0;
                    frame.insert(name.as_str(), Value::bool(set != inverted));
                }
            }
            _ => {}
        }
    }
    Ok(frame)
}

pub fn parse(data: &[u8]) -> Result<Vec<Frame>> {
    let mut header = ByteReader::at(data, 4);
    let definitions_size = header.i32()?.max(0) as usize;
    let count = header.i16()?.max(0) as usize;
    // per-record length, implied by the definitions
    let _record_length = header.i16()?;

    let mut reader = ByteReader::at(data, DEFINITIONS_START);
    // the size covers the count and length fields as well
    let end = DEFINITIONS_START + definitions_size.saturating_sub(4);
    let definitions = read_definitions(&mut reader, end)?;
    tracing::debug!("DTA 9003: {} field definitions", definitions.len());

    let mut frames = Vec::with_capacity(count);
    for _ in 0..count {
        let frame = read_entry(&mut reader, &definitions)?;
        if frame.len() > 1 {
            frames.push(frame);
        }
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(out: &mut Vec<u8>, text: &str) {
        out.extend_from_slice(text.as_bytes());
        out.push(0);
    }

    fn definitions() -> Vec<u8> {
        let mut defs = Vec::new();
        defs.push(0x00);
        name(&mut defs, "Temperaturen");
        defs.push(0x01);
        name(&mut defs, "Text_TVL");
        defs.extend_from_slice(&[0xFF, 0x00, 0x00]);
        defs.push(0x81);
        name(&mut defs, "AI1");
        defs.extend_from_slice(&[0x00, 0xFF, 0x00]);
        defs.extend_from_slice(&100i16.to_le_bytes());
        defs.push(0x03);
        name(&mut defs, "Modus");
        defs.push(2);
        name(&mut defs, "Heizen");
        name(&mut defs, "Kuehlen");
        defs.push(0x04);
        defs.push(2);
        defs.extend_from_slice(&0b01u16.to_le_bytes());
        name(&mut defs, "HUP");
        defs.extend_from_slice(&[0, 0, 0]);
        name(&mut defs, "EVU");
        defs.extend_from_slice(&[0, 0, 0]);
        defs
    }

    fn file(count: i16, records: &[(i32, i16, i16, u16)]) -> Vec<u8> {
        let defs = definitions();
        let mut data = Vec::new();
        data.extend_from_slice(&VERSION.to_le_bytes());
        data.extend_from_slice(&(defs.len() as i32 + 4).to_le_bytes());
        data.extend_from_slice(&count.to_le_bytes());
        data.extend_from_slice(&10i16.to_le_bytes());
        data.extend(defs);
        for (time, tvl, ai, status) in records {
            data.extend_from_slice(&time.to_le_bytes());
            data.extend_from_slice(&tvl.to_le_bytes());
            data.extend_from_slice(&ai.to_le_bytes());
            data.extend_from_slice(&status.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_read_definitions() {
        let defs = definitions();
        let mut reader = ByteReader::new(&defs);
        let parsed = read_definitions(&mut reader, defs.len()).unwrap();

        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed[0], Definition::Category("Temperaturen".to_string()));
        assert_eq!(
            parsed[1],
            Definition::Analogue {
                name: "TVL".to_string(),
                factor: 10.0
            }
        );
        assert_eq!(
            parsed[4],
            Definition::Digital {
                bits: vec!["HUP".to_string(), "EVU".to_string()],
                io: 0b01
            }
        );
    }

    #[test]
    fn test_parse_records() {
        let data = file(2, &[(500, 312, 250, 0b00), (620, 305, 260, 0b11)]);

        let frames = parse(&data).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].time(), Some(500));
        assert_eq!(frames[0].numeric("TVL"), Some(31.2));
        assert_eq!(frames[0].numeric("AI1"), Some(2.5));
        assert!(!frames[0].contains("Modus"));
        // HUP is an output, EVU an inverted input
        assert_eq!(frames[0].get("HUP").unwrap().get(), &RawValue::Bool(false));
        assert_eq!(frames[0].get("EVU").unwrap().get(), &RawValue::Bool(true));
        assert_eq!(frames[1].get("HUP").unwrap().get(), &RawValue::Bool(true));
        assert_eq!(frames[1].get("EVU").unwrap().get(), &RawValue::Bool(false));
    }

    #[test]
    fn test_missing_records_fail() {
        let data = file(3, &[(500, 312, 250, 0)]);
        assert!(matches!(parse(&data), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_unknown_definition_type_fails() {
        let mut data = file(0, &[]);
        data[DEFINITIONS_START] = 0x07;
        assert!(matches!(
            parse(&data),
            Err(Error::Parse {
                offset: DEFINITIONS_START,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_factor_fails() {
        let mut data = file(1, &[(500, 312, 250, 0)]);
        // category (14 bytes), TVL (13 bytes), then id, name and color of AI1
        let factor = DEFINITIONS_START + 14 + 13 + 8;
        assert_eq!(&data[factor..factor + 2], &100i16.to_le_bytes());
        data[factor..factor + 2].copy_from_slice(&0i16.to_le_bytes());

        assert!(matches!(
            parse(&data),
            Err(Error::Parse { offset, .. }) if offset == factor
        ));
    }
}
