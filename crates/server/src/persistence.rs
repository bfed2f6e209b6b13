//! World persistence (C10): JSON save/load of the entity set plus world-
//! clock state, atomic save via temp-file-then-rename.

use std::path::Path;

use glam::{Quat, Vec3};
use mp_core::{BodyPart, EntityId, EntityType, PlayerId};
use serde::{Deserialize, Serialize};

use crate::entity::ServerEntity;
use crate::error::PersistenceError;

const SAVE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SavedEntity {
    id: EntityId,
    #[serde(rename = "type")]
    entity_type: EntityType,
    owner: PlayerId,
    #[serde(rename = "templateId")]
    template_id: u32,
    #[serde(rename = "factionId")]
    faction_id: u32,
    #[serde(default, rename = "templateName")]
    template_name: String,
    position: [f32; 3],
    rotation: [f32; 4],
    alive: bool,
    health: [f32; BodyPart::COUNT],
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    version: u32,
    #[serde(rename = "timeOfDay")]
    time_of_day: f32,
    weather: i32,
    entities: Vec<SavedEntity>,
}

pub struct LoadedWorld {
    pub entities: Vec<ServerEntity>,
    pub time_of_day: f32,
    pub weather: i32,
}

/// Serializes `entities` to `path` atomically: writes to `path.tmp` in the
/// same directory, then renames over the target so a crash mid-write never
/// leaves a corrupt file at `path`.
pub fn save(
    path: &Path,
    entities: &[ServerEntity],
    time_of_day: f32,
    weather: i32,
) -> Result<(), PersistenceError> {
    let file = SaveFile {
        version: SAVE_VERSION,
        time_of_day,
        weather,
        entities: entities
            .iter()
            .map(|e| SavedEntity {
                id: e.id,
                entity_type: e.entity_type,
                owner: e.owner,
                template_id: e.template_id,
                faction_id: e.faction_id,
                template_name: e.template_name.clone(),
                position: [e.position.x, e.position.y, e.position.z],
                rotation: [e.rotation.w, e.rotation.x, e.rotation.y, e.rotation.z],
                alive: e.alive,
                health: e.health,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&file).map_err(PersistenceError::Serialize)?;
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Loads `path`; a missing file is not an error (empty world, caller decides
/// the `next_entity_id` seed). A present-but-unparseable file logs a warning
/// and is treated as an empty world rather than a fatal error (§4.10).
pub fn load(path: &Path) -> Option<LoadedWorld> {
    if !path.exists() {
        return None;
    }
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            log::warn!("failed to read save file {}: {e}", path.display());
            return None;
        }
    };
    let file: SaveFile = match serde_json::from_str(&text) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("failed to parse save file {}: {e}", path.display());
            return None;
        }
    };

    let entities = file
        .entities
        .into_iter()
        .map(|s| ServerEntity {
            id: s.id,
            entity_type: s.entity_type,
            owner: s.owner,
            zone: mp_core::ZoneCoord::from_world_pos(s.position[0], s.position[2]),
            position: Vec3::new(s.position[0], s.position[1], s.position[2]),
            rotation: Quat::from_xyzw(s.rotation[1], s.rotation[2], s.rotation[3], s.rotation[0]),
            template_id: s.template_id,
            faction_id: s.faction_id,
            template_name: s.template_name,
            health: s.health,
            anim_state: 0,
            move_speed: 0,
            flags: 0,
            alive: s.alive,
        })
        .collect();

    Some(LoadedWorld {
        entities,
        time_of_day: file.time_of_day,
        weather: file.weather,
    })
}
