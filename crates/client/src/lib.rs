pub mod external;
pub mod registry;
pub mod replication;
pub mod snapshot;
pub mod transport;

pub use external::{GameClock, LocalCharacterSample, LocalCharacterSource};
pub use registry::{EntityInfo, EntityRegistry, RegistryError};
pub use replication::ClientReplicator;
pub use snapshot::{InterpolatorSample, Snapshot, SnapshotBuffer, MAX_SNAPSHOTS};
pub use transport::{ClientTransport, TransportError};
