// DTA 8208/8209: fixed-size records with lookup-table temperatures
use super::fields::{
    analogue, analogue_wide, bit, inverted, lut, read_record, Bit, Field, CELSIUS, VOLT,
};
use super::lut::{FLOW, HOT_GAS, MIXER, SOLAR, SOURCE};
use super::reader::ByteReader;
use super::HEADER_SIZE;
use crate::domain::error::Result;
use crate::domain::frame::Frame;

pub const VERSION_8208: u32 = 8208;
pub const VERSION_8209: u32 = 8209;

const RECORD_SIZE_8209: usize = 168;
/// 8208 carries 20 extra bytes at the end of each record.
const RECORD_SIZE_8208: usize = 188;

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
    bit("EVU", 4),
];

const COMFORT_OUTPUTS: &[Bit] = &[
    bit("AI1DIV", 6),
    bit("SUP", 7),
    bit("FUP2", 8),
    bit("MA2", 9),
    bit("MZ2", 10),
    bit("MA3", 11),
    bit("MZ3", 11),
    bit("FUP3", 12),
    bit("ZW3", 14),
    bit("SLP", 15),
];

const COMFORT_INPUTS: &[Bit] = &[inverted("SWT", 4)];

const RECORD: &[Field] = &[
    Field::Time,                              // [0  :3  ]
    Field::Skip(4),                           // [4  :7  ]
    Field::Digital(OUTPUTS),                  // [8  :9  ]
    Field::Skip(34),                          // [10 :43 ]
    Field::Digital(INPUTS),                   // [44 :45 ]
    Field::Skip(6),                           // [46 :51 ]
    lut("TFB1", &FLOW),                       // [52 :53 ]
    lut("TBW", &FLOW),                        // [54 :55 ]
    lut("TA", &SOURCE),                       // [56 :57 ]
    lut("TRLext", &FLOW),                     // [58 :59 ]
    lut("TRL", &FLOW),                        // [60 :61 ]
    lut("TVL", &FLOW),                        // [62 :63 ]
    lut("THG", &HOT_GAS),                     // [64 :65 ]
    lut("TWQaus", &SOURCE),                   // [66 :67 ]
    Field::Skip(2),                           // [68 :69 ]
    lut("TWQein", &SOURCE),                   // [70 :71 ]
    Field::Skip(8),                           // [72 :79 ]
    analogue_wide("TRLsoll", 10.0, CELSIUS),  // [80 :83 ]
    analogue_wide("TMK1soll", 10.0, CELSIUS), // [84 :87 ]
    Field::Skip(44),                          // [88 :131]
    Field::Digital(COMFORT_OUTPUTS),          // [132:133]
    Field::Skip(2),                           // [134:135]
    analogue("AO1", 381.825, VOLT),           // [136:137]
    analogue("AO2", 381.825, VOLT),           // [138:139]
    Field::Digital(COMFORT_INPUTS),           // [140:141]
    Field::Skip(2),                           // [142:143]
    lut("TSS", &SOLAR),                       // [144:145]
    lut("TSK", &SOLAR),                       // [146:147]
    lut("TFB2", &MIXER),                      // [148:149]
    lut("TFB3", &MIXER),                      // [150:151]
    lut("TEE", &MIXER),                       // [152:153]
    Field::Skip(4),                           // [154:157]
    analogue("AI1", 275.406, VOLT),           // [158:159]
    analogue_wide("TMK2soll", 10.0, CELSIUS), // [160:163]
    analogue_wide("TMK3soll", 10.0, CELSIUS), // [164:167]
];

pub fn parse(data: &[u8], version: u32) -> Result<Vec<Frame>> {
    let record_size = if version == VERSION_8208 {
        RECORD_SIZE_8208
    } else {
        RECORD_SIZE_8209
    };

    let count = (data.len() - HEADER_SIZE) / record_size;
    let trailing = (data.len() - HEADER_SIZE) % record_size;
    if trailing > 0 {
        tracing::debug!("DTA {}: ignoring {} trailing bytes", version, trailing);
    }

    let mut frames = Vec::with_capacity(count);
    for i in 0..count {
        let start = HEADER_SIZE + i * record_size;
        let mut reader = ByteReader::at(data, start);
        frames.push(read_record(&mut reader, RECORD)?);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::RawValue;
    use crate::infrastructure::dta::fields::Width;

    fn put_i16(record: &mut [u8], offset: usize, value: i16) {
        record[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn put_i32(record: &mut [u8], offset: usize, value: i32) {
        record[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn record(time: i32, tvl_raw: i16) -> Vec<u8> {
        let mut record = vec![0u8; RECORD_SIZE_8209];
        put_i32(&mut record, 0, time);
        put_i16(&mut record, 8, 0b1000_0001);
        put_i16(&mut record, 44, 0b1_0000);
        put_i16(&mut record, 62, tvl_raw);
        put_i32(&mut record, 80, 285);
        record
    }

    #[test]
    fn test_record_layout_is_168_bytes() {
        let decoded: usize = RECORD
            .iter()
            .map(|f| match f {
                Field::Time => 4,
                Field::Skip(n) => *n,
                Field::Analogue { width, .. } => match width {
                    Width::I16 => 2,
                    Width::I32 => 4,
                },
                Field::Lut { .. } | Field::Digital(_) => 2,
                Field::Tagged { .. } => unreachable!(),
            })
            .sum();
        assert_eq!(decoded, RECORD_SIZE_8209);
    }

    #[test]
    fn test_parse_records() {
        let mut data = Vec::new();
        data.extend_from_slice(&VERSION_8209.to_le_bytes());
        data.extend_from_slice(&[0; 4]);
        data.extend(record(1_000, 190));
        data.extend(record(1_120, 200));
        // partial trailing record
        data.extend_from_slice(&[0; 10]);

        let frames = parse(&data, VERSION_8209).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].time(), Some(1_000));
        assert!((frames[0].numeric("TVL").unwrap() - 66.4).abs() < 1e-9);
        assert!((frames[1].numeric("TVL").unwrap() - 64.7).abs() < 1e-9);
        assert_eq!(frames[0].numeric("TRLsoll"), Some(28.5));
        assert_eq!(frames[0].get("HUP").unwrap().get(), &RawValue::Bool(true));
        assert_eq!(frames[0].get("ZUP").unwrap().get(), &RawValue::Bool(false));
        // inverted inputs: clear bit means active
        assert_eq!(frames[0].get("HD").unwrap().get(), &RawValue::Bool(true));
        assert_eq!(frames[0].get("EVU").unwrap().get(), &RawValue::Bool(true));
    }
}
