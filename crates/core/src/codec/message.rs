use byteorder::{ByteOrder, LittleEndian};

use super::error::CodecError;
#[allow(unused_imports)]
use super::primitives::{read_string, write_string};
use super::quat::{compress_quat, decompress_quat};

macro_rules! message_types {
    ($($name:ident = $value:expr),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum MessageType {
            $($name = $value),+
        }

        impl MessageType {
            pub fn from_u8(v: u8) -> Result<Self, CodecError> {
                match v {
                    $($value => Ok(Self::$name),)+
                    other => Err(CodecError::UnknownMessageType(other)),
                }
            }
        }
    };
}

message_types! {
    C2sHandshake = 0x01,
    S2cHandshakeAck = 0x02,
    S2cHandshakeReject = 0x03,
    C2sDisconnect = 0x04,
    S2cPlayerJoined = 0x05,
    S2cPlayerLeft = 0x06,
    C2sKeepalive = 0x07,
    S2cKeepaliveAck = 0x08,
    S2cWorldSnapshot = 0x10,
    S2cTimeSync = 0x11,
    S2cZoneData = 0x12,
    // Not in the spec's published byte table (§6): the prose handler list
    // names C2S_ZoneRequest but the enumeration has no code for it. Assigned
    // the next free slot in the 0x10 (zone/time-sync) group.
    C2sZoneRequest = 0x13,
    S2cEntitySpawn = 0x20,
    S2cEntityDespawn = 0x21,
    C2sEntitySpawnReq = 0x22,
    // Same gap as above: C2S_EntityDespawnReq is named in §4.6 but absent
    // from §6's table. Assigned the next free slot in the 0x20 group.
    C2sEntityDespawnReq = 0x23,
    C2sPositionUpdate = 0x30,
    S2cPositionUpdate = 0x31,
    C2sMoveCommand = 0x32,
    S2cMoveCommand = 0x33,
    C2sAttackIntent = 0x40,
    S2cCombatHit = 0x41,
    S2cCombatBlock = 0x42,
    S2cCombatDeath = 0x43,
    S2cCombatKo = 0x44,
    C2sCombatStance = 0x45,
    S2cStatUpdate = 0x50,
    S2cHealthUpdate = 0x51,
    S2cEquipmentUpdate = 0x52,
    C2sItemPickup = 0x60,
    C2sItemDrop = 0x61,
    C2sItemTransfer = 0x62,
    S2cInventoryUpdate = 0x63,
    C2sBuildRequest = 0x70,
    S2cBuildPlaced = 0x71,
    S2cBuildProgress = 0x72,
    S2cBuildDestroyed = 0x73,
    C2sDoorInteract = 0x74,
    S2cDoorState = 0x75,
    C2sChatMessage = 0x80,
    S2cChatMessage = 0x81,
    S2cSystemMessage = 0x82,
    C2sAdminCommand = 0x90,
    S2cAdminResponse = 0x91,
}

/// Used inside `C2S/S2C_PositionUpdate`, little-endian, no padding.
///
/// The field list (`entity_id:u32, pos:[f32;3], compressedQuat:u32,
/// animStateId:u8, moveSpeed:u8, flags:u16`) sums to 24 bytes; the 20-byte
/// figure elsewhere is the count absent the trailing `anim/speed/flags` byte
/// triplet. Fields are the authority here since they're explicit and
/// unambiguous; `ENCODED_SIZE` reflects their literal sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterPosition {
    pub entity_id: u32,
    pub pos: [f32; 3],
    pub compressed_quat: u32,
    pub anim_state_id: u8,
    pub move_speed: u8,
    pub flags: u16,
}

impl CharacterPosition {
    pub const ENCODED_SIZE: usize = 24;

    pub fn rotation(&self) -> [f32; 4] {
        decompress_quat(self.compressed_quat)
    }

    pub fn with_rotation(mut self, quat: [f32; 4]) -> Self {
        self.compressed_quat = compress_quat(quat);
        self
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, self.entity_id);
        out.extend_from_slice(&buf);
        for component in self.pos {
            let mut buf = [0u8; 4];
            LittleEndian::write_f32(&mut buf, component);
            out.extend_from_slice(&buf);
        }
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, self.compressed_quat);
        out.extend_from_slice(&buf);
        out.push(self.anim_state_id);
        out.push(self.move_speed);
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, self.flags);
        out.extend_from_slice(&buf);
    }

    pub fn read_from(buf: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        if buf.len() < Self::ENCODED_SIZE {
            return Err(CodecError::UnexpectedEof);
        }
        let entity_id = LittleEndian::read_u32(&buf[0..4]);
        let pos = [
            LittleEndian::read_f32(&buf[4..8]),
            LittleEndian::read_f32(&buf[8..12]),
            LittleEndian::read_f32(&buf[12..16]),
        ];
        let compressed_quat = LittleEndian::read_u32(&buf[16..20]);
        let anim_state_id = buf[20];
        let move_speed = buf[21];
        let flags = LittleEndian::read_u16(&buf[22..24]);
        let record = CharacterPosition {
            entity_id,
            pos,
            compressed_quat,
            anim_state_id,
            move_speed,
            flags,
        };
        Ok((record, &buf[Self::ENCODED_SIZE..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_position_round_trip() {
        let record = CharacterPosition {
            entity_id: 7,
            pos: [1.5, -2.0, 3.25],
            compressed_quat: 0,
            anim_state_id: 0,
            move_speed: 0,
            flags: 0,
        }
        .with_rotation([1.0, 0.0, 0.0, 0.0]);
        let mut anim_buf = record;
        anim_buf.anim_state_id = 4;
        anim_buf.move_speed = 200;
        anim_buf.flags = 0x8421;

        let mut out = Vec::new();
        anim_buf.write_to(&mut out);
        assert_eq!(out.len(), CharacterPosition::ENCODED_SIZE);

        let (decoded, rest) = CharacterPosition::read_from(&out).unwrap();
        assert!(rest.is_empty());
        assert_eq!(decoded.entity_id, anim_buf.entity_id);
        assert_eq!(decoded.pos, anim_buf.pos);
        assert_eq!(decoded.compressed_quat, anim_buf.compressed_quat);
        assert_eq!(decoded.anim_state_id, 4);
        assert_eq!(decoded.move_speed, 200);
        assert_eq!(decoded.flags, 0x8421);
    }

    #[test]
    fn truncated_character_position_is_recoverable() {
        let record = CharacterPosition {
            entity_id: 1,
            pos: [0.0, 0.0, 0.0],
            compressed_quat: 0,
            anim_state_id: 0,
            move_speed: 0,
            flags: 0,
        };
        let mut out = Vec::new();
        record.write_to(&mut out);
        out.truncate(out.len() - 1);
        assert!(matches!(
            CharacterPosition::read_from(&out),
            Err(CodecError::UnexpectedEof)
        ));
    }

    #[test]
    fn message_type_round_trip() {
        assert_eq!(MessageType::from_u8(0x30).unwrap(), MessageType::C2sPositionUpdate);
        assert!(matches!(
            MessageType::from_u8(0xff),
            Err(CodecError::UnknownMessageType(0xff))
        ));
    }
}
