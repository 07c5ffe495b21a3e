// Little-endian cursor over a DTA buffer
use crate::domain::error::{Error, Result};

pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn at(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::parse(
                self.position,
                format!(
                    "need {} bytes, {} left of {}",
                    count,
                    self.remaining(),
                    self.data.len()
                ),
            ));
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn i8(&mut self) -> Result<i8> {
        Ok(self.u8()? as i8)
    }

    pub fn i16(&mut self) -> Result<i16> {
        let bytes = self.take(2)?;
        Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn i32(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// NUL-terminated string; bytes map to Latin-1 characters.
    pub fn c_string(&mut self) -> Result<String> {
        let start = self.position;
        let rest = &self.data[start.min(self.data.len())..];
        let end = rest
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| Error::parse(start, "unterminated string"))?;
        let text = rest[..end].iter().map(|b| *b as char).collect();
        self.position += end + 1;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_reads() {
        let data = [0x29, 0x23, 0x00, 0x00, 0xF6, 0xFF, 0x85];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.i32().unwrap(), 9001);
        assert_eq!(reader.i16().unwrap(), -10);
        assert_eq!(reader.i8().unwrap(), -123);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_short_read_reports_offset() {
        let data = [1, 2, 3];
        let mut reader = ByteReader::new(&data);
        reader.skip(2).unwrap();

        match reader.i16() {
            Err(Error::Parse { offset, .. }) => assert_eq!(offset, 2),
            other => panic!("unexpected {:?}", other),
        }
        // a failed read does not advance
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_c_string() {
        let data = b"Text_TVL\0\xB0C\0rest";
        let mut reader = ByteReader::new(data);

        assert_eq!(reader.c_string().unwrap(), "Text_TVL");
        assert_eq!(reader.c_string().unwrap(), "°C");
        assert!(reader.c_string().is_err());
    }
}
