//! Entity registry (C3): a bidirectional map between a 32-bit network entity
//! id and a local game-object handle, guarded by a reader-writer lock.

use std::collections::HashMap;
use std::sync::RwLock;

use glam::{Quat, Vec3};

use mp_core::{EntityId, EntityType, PlayerId, TickNumber, ZoneCoord};

use crate::external::GameObjectHandle;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown net_id {0}")]
    UnknownNetId(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityInfo {
    pub net_id: EntityId,
    pub game_object: Option<GameObjectHandle>,
    pub entity_type: EntityType,
    pub owner_player_id: PlayerId,
    pub zone: ZoneCoord,
    pub last_position: Vec3,
    pub last_rotation: Quat,
    pub last_update_tick: TickNumber,
    pub is_remote: bool,
}

struct Inner {
    by_net_id: HashMap<EntityId, EntityInfo>,
    by_game_object: HashMap<GameObjectHandle, EntityId>,
    next_local_id: EntityId,
}

/// Guards both maps with one lock (I2: at most one `EntityInfo` per
/// `game_object`/`net_id`).
pub struct EntityRegistry {
    inner: RwLock<Inner>,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        EntityRegistry {
            inner: RwLock::new(Inner {
                by_net_id: HashMap::new(),
                by_game_object: HashMap::new(),
                next_local_id: 1, // I1: net_id 0 never appears as a key
            }),
        }
    }

    /// Idempotent on repeat registrations of the same handle.
    pub fn register(&self, game_object: GameObjectHandle, entity_type: EntityType) -> EntityId {
        let mut inner = self.inner.write().unwrap();
        if let Some(&existing) = inner.by_game_object.get(&game_object) {
            return existing;
        }
        let net_id = inner.next_local_id;
        inner.next_local_id += 1;
        inner.by_game_object.insert(game_object, net_id);
        inner.by_net_id.insert(
            net_id,
            EntityInfo {
                net_id,
                game_object: Some(game_object),
                entity_type,
                owner_player_id: 0,
                zone: ZoneCoord::default(),
                last_position: Vec3::ZERO,
                last_rotation: Quat::IDENTITY,
                last_update_tick: 0,
                is_remote: false,
            },
        );
        net_id
    }

    /// Records a remote entity whose `game_object` is initially null;
    /// advances the local id counter past `net_id + 1` (I4).
    pub fn register_remote(
        &self,
        net_id: EntityId,
        entity_type: EntityType,
        owner: PlayerId,
        position: Vec3,
    ) {
        let mut inner = self.inner.write().unwrap();
        inner.by_net_id.insert(
            net_id,
            EntityInfo {
                net_id,
                game_object: None,
                entity_type,
                owner_player_id: owner,
                zone: ZoneCoord::from_world_pos(position.x, position.z),
                last_position: position,
                last_rotation: Quat::IDENTITY,
                last_update_tick: 0,
                is_remote: true,
            },
        );
        if inner.next_local_id <= net_id {
            inner.next_local_id = net_id + 1;
        }
    }

    pub fn set_game_object(&self, net_id: EntityId, handle: GameObjectHandle) -> Result<(), RegistryError> {
        let mut inner = self.inner.write().unwrap();
        let info = inner
            .by_net_id
            .get_mut(&net_id)
            .ok_or(RegistryError::UnknownNetId(net_id))?;
        info.game_object = Some(handle);
        inner.by_game_object.insert(handle, net_id);
        Ok(())
    }

    pub fn update_position(&self, net_id: EntityId, position: Vec3) -> Result<(), RegistryError> {
        let mut inner = self.inner.write().unwrap();
        let info = inner
            .by_net_id
            .get_mut(&net_id)
            .ok_or(RegistryError::UnknownNetId(net_id))?;
        info.last_position = position;
        info.zone = ZoneCoord::from_world_pos(position.x, position.z);
        Ok(())
    }

    pub fn update_rotation(&self, net_id: EntityId, rotation: Quat) -> Result<(), RegistryError> {
        let mut inner = self.inner.write().unwrap();
        let info = inner
            .by_net_id
            .get_mut(&net_id)
            .ok_or(RegistryError::UnknownNetId(net_id))?;
        info.last_rotation = rotation;
        Ok(())
    }

    pub fn unregister(&self, net_id: EntityId) {
        let mut inner = self.inner.write().unwrap();
        if let Some(info) = inner.by_net_id.remove(&net_id) {
            if let Some(handle) = info.game_object {
                inner.by_game_object.remove(&handle);
            }
        }
    }

    /// Unregisters all remote entities whose zone matches; used when the
    /// local client unloads an area.
    pub fn remove_entities_in_zone(&self, zone: ZoneCoord) {
        let mut inner = self.inner.write().unwrap();
        let dead: Vec<EntityId> = inner
            .by_net_id
            .values()
            .filter(|info| info.is_remote && info.zone == zone)
            .map(|info| info.net_id)
            .collect();
        for net_id in dead {
            if let Some(info) = inner.by_net_id.remove(&net_id) {
                if let Some(handle) = info.game_object {
                    inner.by_game_object.remove(&handle);
                }
            }
        }
    }

    pub fn get_info(&self, net_id: EntityId) -> Option<EntityInfo> {
        self.inner.read().unwrap().by_net_id.get(&net_id).copied()
    }

    pub fn get_net_id(&self, handle: GameObjectHandle) -> Option<EntityId> {
        self.inner.read().unwrap().by_game_object.get(&handle).copied()
    }

    pub fn get_game_object(&self, net_id: EntityId) -> Option<GameObjectHandle> {
        self.inner
            .read()
            .unwrap()
            .by_net_id
            .get(&net_id)
            .and_then(|info| info.game_object)
    }

    pub fn get_remote_entities(&self) -> Vec<EntityInfo> {
        self.inner
            .read()
            .unwrap()
            .by_net_id
            .values()
            .filter(|info| info.is_remote)
            .copied()
            .collect()
    }

    pub fn get_entities_in_zone(&self, zone: ZoneCoord) -> Vec<EntityInfo> {
        self.inner
            .read()
            .unwrap()
            .by_net_id
            .values()
            .filter(|info| info.zone == zone)
            .copied()
            .collect()
    }

    pub fn get_player_entities(&self, player_id: PlayerId) -> Vec<EntityInfo> {
        self.inner
            .read()
            .unwrap()
            .by_net_id
            .values()
            .filter(|info| info.owner_player_id == player_id)
            .copied()
            .collect()
    }

    /// I1-I4 checked in one pass, for tests (P5).
    #[cfg(test)]
    fn check_invariants(&self) {
        let inner = self.inner.read().unwrap();
        assert!(!inner.by_net_id.contains_key(&0), "I1 violated");
        for info in inner.by_net_id.values() {
            if let Some(handle) = info.game_object {
                assert_eq!(
                    inner.by_game_object.get(&handle),
                    Some(&info.net_id),
                    "I2 violated for handle {handle}"
                );
            }
            assert_eq!(
                info.zone,
                ZoneCoord::from_world_pos(info.last_position.x, info.last_position.z),
                "I3 violated for net_id {}",
                info.net_id
            );
        }
        if let Some(highest_remote) = inner
            .by_net_id
            .iter()
            .filter(|(_, info)| info.is_remote)
            .map(|(id, _)| *id)
            .max()
        {
            assert!(inner.next_local_id > highest_remote, "I4 violated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent() {
        let registry = EntityRegistry::new();
        let a = registry.register(1, EntityType::PlayerCharacter);
        let b = registry.register(1, EntityType::PlayerCharacter);
        assert_eq!(a, b);
        registry.check_invariants();
    }

    #[test]
    fn register_never_assigns_zero() {
        let registry = EntityRegistry::new();
        let id = registry.register(1, EntityType::PlayerCharacter);
        assert_ne!(id, 0);
    }

    #[test]
    fn remote_registration_advances_local_counter_past_net_id() {
        let registry = EntityRegistry::new();
        registry.register_remote(500, EntityType::Npc, 0, Vec3::ZERO);
        let local = registry.register(99, EntityType::PlayerCharacter);
        assert!(local > 500);
        registry.check_invariants();
    }

    #[test]
    fn update_position_recomputes_zone() {
        let registry = EntityRegistry::new();
        let id = registry.register(1, EntityType::PlayerCharacter);
        registry.update_position(id, Vec3::new(1000.0, 0.0, 0.0)).unwrap();
        let info = registry.get_info(id).unwrap();
        assert_eq!(info.zone, ZoneCoord::from_world_pos(1000.0, 0.0));
        registry.check_invariants();
    }

    #[test]
    fn unregister_removes_both_maps() {
        let registry = EntityRegistry::new();
        let id = registry.register(1, EntityType::PlayerCharacter);
        registry.unregister(id);
        assert!(registry.get_info(id).is_none());
        assert!(registry.get_net_id(1).is_none());
    }

    #[test]
    fn remove_entities_in_zone_only_affects_remotes() {
        let registry = EntityRegistry::new();
        let local = registry.register(1, EntityType::PlayerCharacter);
        registry.register_remote(900, EntityType::Npc, 0, Vec3::ZERO);
        registry.remove_entities_in_zone(ZoneCoord::from_world_pos(0.0, 0.0));
        assert!(registry.get_info(900).is_none());
        assert!(registry.get_info(local).is_some());
    }

    #[test]
    fn fuzzed_sequence_preserves_invariants() {
        let registry = EntityRegistry::new();
        let mut handle = 0u64;
        for i in 0..200u32 {
            match i % 5 {
                0 => {
                    handle += 1;
                    registry.register(handle, EntityType::PlayerCharacter);
                }
                1 => {
                    registry.register_remote(1000 + i, EntityType::Npc, 0, Vec3::new(i as f32, 0.0, 0.0));
                }
                2 => {
                    if let Some(info) = registry.get_info(1000 + i.saturating_sub(4)) {
                        registry
                            .update_position(info.net_id, Vec3::new(-(i as f32), 0.0, 5.0))
                            .ok();
                    }
                }
                3 => {
                    registry.unregister(1000 + i.saturating_sub(2));
                }
                _ => {
                    registry.remove_entities_in_zone(ZoneCoord::from_world_pos(i as f32, 0.0));
                }
            }
            registry.check_invariants();
        }
    }
}
