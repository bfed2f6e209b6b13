#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("unexpected end of buffer")]
    UnexpectedEof,
    #[error("unknown message type: 0x{0:02x}")]
    UnknownMessageType(u8),
    #[error("string length {0} exceeds maximum of {1}")]
    StringTooLong(usize, usize),
    #[error("invalid utf-8 in string field")]
    Utf8,
}
