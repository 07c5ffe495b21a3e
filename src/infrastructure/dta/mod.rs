// Decoder for the heat pump's binary datapoint snapshots (DTA files)
pub mod fields;
pub mod lut;
pub mod reader;
pub mod v8209;
pub mod v9000;
pub mod v9001;
pub mod v9003;

use crate::domain::error::{Error, Result};
use crate::domain::frame::Frame;
use reader::ByteReader;

/// Version word plus the format-specific header word.
pub const HEADER_SIZE: usize = 8;

/// Decode a whole snapshot buffer into frames.
///
/// Either every record decodes or the call fails; no partial result is returned.
pub fn parse(data: &[u8]) -> Result<Vec<Frame>> {
    if data.len() < HEADER_SIZE {
        return Err(Error::parse(
            data.len(),
            format!("buffer of {} bytes is shorter than the header", data.len()),
        ));
    }

    let version = ByteReader::new(data).u32()?;
    let frames = match version {
        v8209::VERSION_8208 | v8209::VERSION_8209 => v8209::parse(data, version)?,
        v9000::VERSION => v9000::parse(data)?,
        v9001::VERSION => v9001::parse(data)?,
        v9003::VERSION => v9003::parse(data)?,
        other => {
            return Err(Error::parse(0, format!("unsupported DTA version {}", other)));
        }
    };

    tracing::info!("Decoded DTA {} snapshot: {} frames", version, frames.len());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_buffer_fails() {
        let result = parse(&[0x11, 0x20, 0x00]);
        assert!(matches!(result, Err(Error::Parse { offset: 3, .. })));
    }

    #[test]
    fn test_unsupported_version_fails() {
        let mut data = 1234u32.to_le_bytes().to_vec();
        data.extend_from_slice(&[0; 12]);
        assert!(matches!(parse(&data), Err(Error::Parse { offset: 0, .. })));
    }

    #[test]
    fn test_header_only_yields_no_frames() {
        let mut data = v8209::VERSION_8209.to_le_bytes().to_vec();
        data.extend_from_slice(&[0; 4]);
        assert!(parse(&data).unwrap().is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let mut data = v9000::VERSION.to_le_bytes().to_vec();
        data.extend_from_slice(&700i32.to_le_bytes());
        data.extend_from_slice(&42i32.to_le_bytes());
        data.extend_from_slice(&[0x00, 200]);
        for _ in 0..9 {
            data.extend_from_slice(&[0x01, 0x10, 0x01]);
        }
        data.extend_from_slice(&[0; 19]);

        let first = parse(&data).unwrap();
        let second = parse(&data).unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
    }
}
