use byteorder::{ByteOrder, LittleEndian};

use super::error::CodecError;

/// A `u16` length prefix followed by that many bytes, no terminator. Invalid
/// UTF-8 is rejected by the caller's choice (`read_string`), never silently
/// replaced.
pub fn write_string(out: &mut Vec<u8>, s: &str) -> Result<(), CodecError> {
    if s.len() > u16::MAX as usize {
        return Err(CodecError::StringTooLong(s.len(), u16::MAX as usize));
    }
    let mut len_buf = [0u8; 2];
    LittleEndian::write_u16(&mut len_buf, s.len() as u16);
    out.extend_from_slice(&len_buf);
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

pub fn read_string(buf: &[u8]) -> Result<(String, &[u8]), CodecError> {
    if buf.len() < 2 {
        return Err(CodecError::UnexpectedEof);
    }
    let len = LittleEndian::read_u16(&buf[0..2]) as usize;
    let buf = &buf[2..];
    if buf.len() < len {
        return Err(CodecError::UnexpectedEof);
    }
    let s = std::str::from_utf8(&buf[..len])
        .map_err(|_| CodecError::Utf8)?
        .to_string();
    Ok((s, &buf[len..]))
}
