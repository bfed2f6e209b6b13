//! Server-side entity and player records (§3).

use glam::{Quat, Vec3};
use mp_core::{BodyPart, EntityId, EntityType, PlayerId, ZoneCoord};

#[derive(Debug, Clone)]
pub struct ServerEntity {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub owner: PlayerId,
    pub zone: ZoneCoord,
    pub position: Vec3,
    pub rotation: Quat,
    pub template_id: u32,
    pub faction_id: u32,
    pub template_name: String,
    pub health: [f32; BodyPart::COUNT],
    pub anim_state: u8,
    pub move_speed: u8,
    pub flags: u16,
    pub alive: bool,
}

impl ServerEntity {
    pub fn new(id: EntityId, entity_type: EntityType, owner: PlayerId, position: Vec3) -> Self {
        ServerEntity {
            id,
            entity_type,
            owner,
            zone: ZoneCoord::from_world_pos(position.x, position.z),
            position,
            rotation: Quat::IDENTITY,
            template_id: 0,
            faction_id: 0,
            template_name: String::new(),
            health: [100.0; BodyPart::COUNT],
            anim_state: 0,
            move_speed: 0,
            flags: 0,
            alive: true,
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.zone = ZoneCoord::from_world_pos(position.x, position.z);
    }
}

#[derive(Debug, Clone)]
pub struct ConnectedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub peer_addr: std::net::SocketAddr,
    pub position: Vec3,
    pub zone: ZoneCoord,
    pub ping_ms: u32,
    pub last_update_time: std::time::Instant,
    pub owned_entities: Vec<EntityId>,
}

impl ConnectedPlayer {
    pub fn new(id: PlayerId, name: String, peer_addr: std::net::SocketAddr) -> Self {
        ConnectedPlayer {
            id,
            name,
            peer_addr,
            position: Vec3::ZERO,
            zone: ZoneCoord::from_world_pos(0.0, 0.0),
            ping_ms: 0,
            last_update_time: std::time::Instant::now(),
            owned_entities: Vec::new(),
        }
    }
}
