pub mod codec;
pub mod combat;
pub mod entity;
pub mod protocol;
pub mod zone;

pub use entity::{BodyPart, EntityId, EntityType, EquipSlot, PlayerId, TickNumber};
pub use zone::ZoneCoord;
