//! Fixed-width wire primitives.
//!
//! All multi-byte integers on the wire are big-endian. Truncated input
//! surfaces as the underlying `UnexpectedEof` from `read_exact`;
//! semantic violations are reported as `InvalidData` by the codec.

use std::io::{self, Read, Write};

/// Read a signed 8-bit integer.
pub fn read_int8<R: Read>(reader: &mut R) -> io::Result<i8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0] as i8)
}

/// Read a signed 32-bit integer.
pub fn read_int32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

/// Read a signed 64-bit integer.
pub fn read_int64<R: Read>(reader: &mut R) -> io::Result<i64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(i64::from_be_bytes(buf))
}

/// Write a signed 8-bit integer.
pub fn write_int8<W: Write>(writer: &mut W, value: i8) -> io::Result<()> {
    writer.write_all(&[value as u8])
}

/// Write a signed 32-bit integer.
pub fn write_int32<W: Write>(writer: &mut W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

/// Write a signed 64-bit integer.
pub fn write_int64<W: Write>(writer: &mut W, value: i64) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn int32_round_trip() {
        let mut buf = Vec::new();
        write_int32(&mut buf, -7).unwrap();
        write_int32(&mut buf, i32::MAX).unwrap();

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_int32(&mut cursor).unwrap(), -7);
        assert_eq!(read_int32(&mut cursor).unwrap(), i32::MAX);
    }

    #[test]
    fn int64_round_trip() {
        let mut buf = Vec::new();
        write_int64(&mut buf, i64::MIN).unwrap();

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_int64(&mut cursor).unwrap(), i64::MIN);
    }

    #[test]
    fn truncated_input_is_an_error() {
        let mut cursor = Cursor::new(vec![0u8, 1, 2]);
        assert!(read_int32(&mut cursor).is_err());
    }
}
