// DTA 9001: counted fixed-size records, optional blocks selected by the sub-version
use super::fields::{analogue, bit, inverted, read_record, Bit, Field, CELSIUS, KELVIN, VOLT};
use super::reader::ByteReader;
use crate::domain::error::Result;
use crate::domain::frame::Frame;

pub const VERSION: u32 = 9001;

const RECORDS_START: usize = 10;

// Stored values carry one more decimal than the 8209 scale factors suggest.
const TEMPERATURE: f64 = 100.0;
const VOLTAGE: f64 = 10_000.0;

const INPUTS: &[Bit] = &[
    bit("HD", 0),
    bit("ND", 1),
    bit("MOT", 2),
    bit("ASD", 3),
    inverted("EVU", 4),
];

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

const BASE: &[Field] = &[
    Field::Time,                                  // [0 :3 ]
    analogue("TVL", TEMPERATURE, CELSIUS),        // [4 :5 ]
    analogue("TRL", TEMPERATURE, CELSIUS),        // [6 :7 ]
    analogue("TWQein", TEMPERATURE, CELSIUS),     // [8 :9 ]
    analogue("TWQaus", TEMPERATURE, CELSIUS),     // [10:11]
    analogue("THG", TEMPERATURE, CELSIUS),        // [12:13]
    analogue("TBW", TEMPERATURE, CELSIUS),        // [14:15]
    analogue("TFB1", TEMPERATURE, CELSIUS),       // [16:17]
    analogue("TA", TEMPERATURE, CELSIUS),         // [18:19]
    analogue("TRLext", TEMPERATURE, CELSIUS),     // [20:21]
    analogue("TRLsoll", TEMPERATURE, CELSIUS),    // [22:23]
    analogue("TMK1soll", TEMPERATURE, CELSIUS),   // [24:25]
    Field::Digital(INPUTS),                       // [26:27]
    Field::Digital(OUTPUTS),                      // [28:29]
    Field::Skip(2),                               // [30:31]
    analogue("TSS", TEMPERATURE, CELSIUS),        // [32:33]
    analogue("TSK", TEMPERATURE, CELSIUS),        // [34:35]
    analogue("TFB2", TEMPERATURE, CELSIUS),       // [36:37]
    analogue("TFB3", TEMPERATURE, CELSIUS),       // [38:39]
    analogue("TEE", TEMPERATURE, CELSIUS),        // [40:41]
    Field::Skip(4),                               // [42:45]
    analogue("TMK2soll", TEMPERATURE, CELSIUS),   // [46:47]
    analogue("TMK3soll", TEMPERATURE, CELSIUS),   // [48:49]
    analogue("AI1", VOLTAGE, VOLT),               // [50:51]
    analogue("AO1", VOLTAGE, VOLT),               // [52:53]
];

const COMPRESSOR: &[Field] = &[
    analogue("AO2", VOLTAGE, VOLT),               // [54:55]
    Field::Skip(2),                               // [56:57]
    analogue("Asg.VDi", TEMPERATURE, CELSIUS),    // [58:59]
    analogue("Asg.VDa", TEMPERATURE, CELSIUS),    // [60:61]
    analogue("VDHz", TEMPERATURE, CELSIUS),       // [62:63]
    Field::Skip(8),                               // [64:71]
];

const SUPERHEAT: &[Field] = &[
    Field::Skip(2),                               // [72:73]
    analogue("UeHz", TEMPERATURE, KELVIN),        // [74:75]
    analogue("UeHzsoll", TEMPERATURE, KELVIN),    // [76:77]
    Field::Skip(2),                               // [78:79]
];

fn layout(sub_version: i32) -> Vec<Field> {
    let mut fields = BASE.to_vec();
    if (1..=3).contains(&sub_version) {
        fields.extend_from_slice(COMPRESSOR);
    }
    if sub_version == 1 || sub_version == 3 {
        fields.extend_from_slice(SUPERHEAT);
    }
    if sub_version == 3 {
        fields.push(Field::Skip(18));
    }
    fields
}

pub fn parse(data: &[u8]) -> Result<Vec<Frame>> {
    let mut header = ByteReader::at(data, 4);
    let sub_version = header.i32()?;
    let count = header.i16()?.max(0) as usize;
    let fields = layout(sub_version);

    let mut reader = ByteReader::at(data, RECORDS_START);
    let mut frames = Vec::with_capacity(count);
    for _ in 0..count {
        frames.push(read_record(&mut reader, &fields)?);
    }
    if reader.remaining() > 0 {
        tracing::debug!("DTA 9001: {} bytes after the last record", reader.remaining());
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::Error;
    use crate::domain::value::RawValue;

    fn file(sub_version: i32, count: i16, record_size: usize, records: &[(i32, i16)]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&VERSION.to_le_bytes());
        data.extend_from_slice(&sub_version.to_le_bytes());
        data.extend_from_slice(&count.to_le_bytes());
        for (time, tvl) in records {
            let mut record = vec![0u8; record_size];
            record[0..4].copy_from_slice(&time.to_le_bytes());
            record[4..6].copy_from_slice(&tvl.to_le_bytes());
            // EVU clear, inverted -> true
            record[26..28].copy_from_slice(&0b0001u16.to_le_bytes());
            data.extend(record);
        }
        data
    }

    #[test]
    fn test_parse_base_layout() {
        let data = file(0, 2, 54, &[(100, 3125), (220, 3010)]);

        let frames = parse(&data).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].time(), Some(220));
        assert_eq!(frames[0].numeric("TVL"), Some(31.25));
        assert_eq!(frames[0].get("HD").unwrap().get(), &RawValue::Bool(true));
        assert_eq!(frames[0].get("EVU").unwrap().get(), &RawValue::Bool(true));
        assert!(!frames[0].contains("AO2"));
    }

    #[test]
    fn test_sub_version_three_layout() {
        // 54 base + 18 compressor + 8 superheat + 18 reserved
        let data = file(3, 2, 98, &[(100, 3125), (220, 3010)]);

        let frames = parse(&data).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].numeric("TVL"), Some(30.1));
        assert!(frames[0].contains("UeHzsoll"));
    }

    #[test]
    fn test_declared_count_exceeding_data_fails() {
        let data = file(0, 3, 54, &[(100, 3125), (220, 3010)]);
        assert!(matches!(parse(&data), Err(Error::Parse { .. })));
    }
}
