// DTA 9000: type-tagged analogue fields, layout varies with the sub-version
use super::fields::{bit, inverted, read_record, tagged, Bit, Field, CELSIUS, KELVIN, LITRES_PER_HOUR};
use super::reader::ByteReader;
use super::HEADER_SIZE;
use crate::domain::error::{Error, Result};
use crate::domain::frame::Frame;

pub const VERSION: u32 = 9000;

/// Sub-versions from this one on no longer carry the compressor fields.
const SHORT_LAYOUT_FROM: i32 = 676;

const OUTPUTS: &[Bit] = &[
    bit("HUP", 0),
    bit("ZUP", 1),
    bit("BUP", 2),
    bit("ZW2", 3),
    bit("MA1", 4),
    bit("MZ1", 5),
    bit("ZIP", 6),
    bit("VD1", 7),
    bit("VD2", 8),
    bit("VENT", 9),
    bit("AV", 10),
    bit("VBS", 11),
    bit("ZW1", 12),
];

const INPUTS: &[Bit] = &[
    inverted("HD", 0),
    inverted("ND", 1),
    inverted("MOT", 2),
    inverted("ASD", 3),
    inverted("EVU", 4),
];

const BASE: &[Field] = &[
    Field::Time,
    tagged("TVL", CELSIUS),     // [ 0]
    tagged("TRL", CELSIUS),     // [ 1]
    tagged("TWQein", CELSIUS),  // [ 2]
    tagged("TWQaus", CELSIUS),  // [ 3]
    tagged("THG", CELSIUS),     // [ 4]
    tagged("TBW", CELSIUS),     // [ 5]
    tagged("TFB1", CELSIUS),    // [ 6]
    tagged("TA", CELSIUS),      // [ 7]
    tagged("TRLext", CELSIUS),  // [ 8]
    tagged("TRLsoll", CELSIUS), // [ 9]
    Field::Skip(2),             // [10..11]
    Field::Digital(OUTPUTS),    // [12]
    Field::Digital(INPUTS),     // [13]
    Field::Skip(9),             // [14..22]
    tagged("Durchfluss", LITRES_PER_HOUR), // [23]
    Field::Skip(1),             // [24]
];

const COMPRESSOR: &[Field] = &[
    Field::Skip(2),               // [25..26]
    tagged("Asg.VDi", CELSIUS),   // [27] compressor suction
    tagged("Asg.VDa", CELSIUS),   // [28] evaporator suction
    tagged("VDHz", CELSIUS),      // [29] compressor heating
    Field::Skip(5),               // [30..34]
    tagged("UeHz", KELVIN),       // [35] superheat
    tagged("UeHzsoll", KELVIN),   // [36] superheat target
    Field::Skip(1),               // [37]
];

fn layout(sub_version: i32) -> Vec<Field> {
    let mut fields = BASE.to_vec();
    if sub_version < SHORT_LAYOUT_FROM {
        fields.extend_from_slice(COMPRESSOR);
    }
    fields
}

pub fn parse(data: &[u8]) -> Result<Vec<Frame>> {
    let mut header = ByteReader::at(data, 4);
    let sub_version = header.i32()?;
    let fields = layout(sub_version);

    let mut reader = ByteReader::at(data, HEADER_SIZE);
    let mut frames = Vec::new();
    while reader.remaining() > 0 {
        let start = reader.position();
        match read_record(&mut reader, &fields) {
            Ok(frame) => frames.push(frame),
            // short reads fail at the cursor, bad tags fail behind it
            Err(Error::Parse { offset, .. }) if offset == reader.position() => {
                tracing::debug!(
                    "DTA 9000: ignoring {} trailing bytes",
                    data.len() - start
                );
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::RawValue;

    fn header(sub_version: i32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&VERSION.to_le_bytes());
        data.extend_from_slice(&sub_version.to_le_bytes());
        data
    }

    fn short_record(time: i32, tvl: i16) -> Vec<u8> {
        let mut record = Vec::new();
        record.extend_from_slice(&time.to_le_bytes());
        // TVL as two-byte positive value
        record.push(1);
        record.extend_from_slice(&tvl.to_le_bytes());
        // TRL .. TRLsoll as one-byte negative values
        for _ in 0..9 {
            record.extend_from_slice(&[4, 5]);
        }
        record.extend_from_slice(&[0, 0]);
        record.extend_from_slice(&0b1u16.to_le_bytes());
        record.extend_from_slice(&0b1_0000u16.to_le_bytes());
        record.extend_from_slice(&[0; 9]);
        record.extend_from_slice(&[0, 120]);
        record.push(0);
        record
    }

    #[test]
    fn test_parse_short_layout() {
        let mut data = header(700);
        data.extend(short_record(5_000, 312));
        data.extend(short_record(5_120, 305));

        let frames = parse(&data).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].time(), Some(5_000));
        assert_eq!(frames[0].numeric("TVL"), Some(31.2));
        assert_eq!(frames[1].numeric("TVL"), Some(30.5));
        assert_eq!(frames[0].numeric("TA"), Some(-0.5));
        assert_eq!(frames[0].numeric("Durchfluss"), Some(12.0));
        assert_eq!(frames[0].get("HUP").unwrap().get(), &RawValue::Bool(true));
        // every input is inverted in this format
        assert_eq!(frames[0].get("EVU").unwrap().get(), &RawValue::Bool(false));
        assert!(!frames[0].contains("UeHz"));
    }

    #[test]
    fn test_truncated_last_record_is_ignored() {
        let mut data = header(700);
        data.extend(short_record(5_000, 312));
        let second = short_record(5_120, 305);
        data.extend_from_slice(&second[..10]);

        let frames = parse(&data).unwrap();
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_unknown_tag_fails() {
        let mut data = header(700);
        let mut record = short_record(5_000, 312);
        record[4] = 9;
        data.extend(record);

        assert!(matches!(parse(&data), Err(Error::Parse { offset: 12, .. })));
    }
}
