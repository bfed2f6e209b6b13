use byteorder::{ByteOrder, LittleEndian};

use super::error::CodecError;

pub const HEADER_SIZE: usize = 8;

/// Every packet is this fixed 8-byte header followed by a message-specific
/// payload. Deviating from 8 bytes breaks the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub message_type: u8,
    /// Bit 0: payload is compressed (reserved; unused by the core).
    pub flags: u8,
    pub sequence: u16,
    /// Server tick at emission (S2C) or zero (C2S).
    pub timestamp: u32,
}

impl PacketHeader {
    pub fn new(message_type: u8, sequence: u16, timestamp: u32) -> Self {
        PacketHeader {
            message_type,
            flags: 0,
            sequence,
            timestamp,
        }
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.message_type);
        out.push(self.flags);
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, self.sequence);
        out.extend_from_slice(&buf);
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, self.timestamp);
        out.extend_from_slice(&buf);
    }

    pub fn read_from(buf: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        if buf.len() < HEADER_SIZE {
            return Err(CodecError::UnexpectedEof);
        }
        let header = PacketHeader {
            message_type: buf[0],
            flags: buf[1],
            sequence: LittleEndian::read_u16(&buf[2..4]),
            timestamp: LittleEndian::read_u32(&buf[4..8]),
        };
        Ok((header, &buf[HEADER_SIZE..]))
    }
}

/// Per-sender sequence wraparound comparator: is `s1` strictly newer than `s2`?
pub fn sequence_greater_than(s1: u16, s2: u16) -> bool {
    let half = u16::MAX / 2;
    (s1 > s2 && s1 - s2 <= half) || (s1 < s2 && s2 - s1 > half)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let header = PacketHeader::new(0x30, 42, 1234);
        let mut out = Vec::new();
        header.write_to(&mut out);
        assert_eq!(out.len(), HEADER_SIZE);
        let (decoded, rest) = PacketHeader::read_from(&out).unwrap();
        assert_eq!(decoded, header);
        assert!(rest.is_empty());
    }

    #[test]
    fn rejects_short_buffer() {
        assert!(matches!(
            PacketHeader::read_from(&[1, 2, 3]),
            Err(CodecError::UnexpectedEof)
        ));
    }

    #[test]
    fn sequence_wraparound() {
        assert!(sequence_greater_than(10, 5));
        assert!(!sequence_greater_than(5, 10));
        assert!(sequence_greater_than(1, u16::MAX - 1));
        assert!(!sequence_greater_than(u16::MAX - 1, 1));
    }
}
