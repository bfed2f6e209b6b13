use std::io;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("packet of {0} bytes exceeds the {1}-byte MTU budget")]
    PacketTooLarge(usize, usize),
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("io error writing save file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize world state: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to parse save file: {0}")]
    Parse(serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error reading config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(serde_json::Error),
}
