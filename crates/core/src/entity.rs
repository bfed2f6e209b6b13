//! Shared identifiers and closed enums used on both sides of the wire.

/// `0` denotes "none / server-owned / system" wherever this appears.
pub type EntityId = u32;
pub type PlayerId = u32;
/// Monotonically increasing server tick counter.
pub type TickNumber = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum EntityType {
    PlayerCharacter = 0,
    Npc = 1,
    Animal = 2,
    Building = 3,
    WorldBuilding = 4,
    Item = 5,
    Turret = 6,
}

impl EntityType {
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::PlayerCharacter,
            1 => Self::Npc,
            2 => Self::Animal,
            3 => Self::Building,
            4 => Self::WorldBuilding,
            5 => Self::Item,
            6 => Self::Turret,
            _ => return None,
        })
    }
}

/// Fixed ordinal, Head=0 .. RightLeg=6. Order backs `ServerEntity::health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum BodyPart {
    Head = 0,
    Chest = 1,
    Stomach = 2,
    LeftArm = 3,
    RightArm = 4,
    LeftLeg = 5,
    RightLeg = 6,
}

impl BodyPart {
    pub const COUNT: usize = 7;
    pub const ALL: [BodyPart; 7] = [
        BodyPart::Head,
        BodyPart::Chest,
        BodyPart::Stomach,
        BodyPart::LeftArm,
        BodyPart::RightArm,
        BodyPart::LeftLeg,
        BodyPart::RightLeg,
    ];

    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| *p as u8 == v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum EquipSlot {
    Head = 0,
    Torso = 1,
    Legs = 2,
    Hands = 3,
    Feet = 4,
    Backpack = 5,
    MainHand = 6,
    OffHand = 7,
    Belt = 8,
    Cloak = 9,
    Ring1 = 10,
    Ring2 = 11,
    Accessory1 = 12,
    Accessory2 = 13,
}
