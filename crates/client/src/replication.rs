//! Client replication loop (C5): three ordered phases driven by the
//! external `GameClock`, one call per frame via `on_game_tick`.

use std::collections::HashMap;

use mp_core::codec::{quat_to_wire, vec3_to_wire, wire_to_quat, wire_to_vec3, CharacterPosition, MessageType, PacketHeader};
use mp_core::{EntityId, EntityType, ZoneCoord};

use crate::external::{GameClock, LocalCharacterSource};
use crate::registry::EntityRegistry;
use crate::snapshot::{Snapshot, SnapshotBuffer};

pub const POS_CHANGE_THRESHOLD: f32 = 0.1;
pub const TICK_INTERVAL_MS: f64 = 50.0;
const MAX_ENTRIES_PER_BATCH: usize = 255;

/// Drives the three-phase client loop and owns the registry/snapshot buffer
/// it mutates. Does not own a transport: `on_game_tick` returns outbound
/// packet bytes for the caller to hand to its `ClientTransport`.
pub struct ClientReplicator {
    pub registry: EntityRegistry,
    pub snapshots: SnapshotBuffer,
    last_sent_at: HashMap<EntityId, f64>,
    sequence: u16,
    local_zone: Option<ZoneCoord>,
}

impl Default for ClientReplicator {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientReplicator {
    pub fn new() -> Self {
        ClientReplicator {
            registry: EntityRegistry::new(),
            snapshots: SnapshotBuffer::new(),
            last_sent_at: HashMap::new(),
            sequence: 0,
            local_zone: None,
        }
    }

    /// Phase A: diff-threshold, batch, and return zero or more
    /// `C2S_PositionUpdate` packets ready for channel 2.
    pub fn phase_a_local_outbound(
        &mut self,
        source: &impl LocalCharacterSource,
        clock: &impl GameClock,
    ) -> Vec<Vec<u8>> {
        let now = clock.now();
        let mut entries = Vec::new();

        for (handle, entity_type) in source.local_entities() {
            if entity_type != EntityType::PlayerCharacter {
                continue; // auto-registering local player characters only
            }
            let net_id = match self.registry.get_net_id(handle) {
                Some(id) => id,
                None => self.registry.register(handle, entity_type),
            };
            let Some(sample) = source.read_sample(handle) else {
                continue;
            };
            let info = self.registry.get_info(net_id).expect("just registered");
            let moved = info.last_position.distance(sample.position) >= POS_CHANGE_THRESHOLD;
            if !moved {
                continue;
            }
            let last_sent = self.last_sent_at.get(&net_id).copied().unwrap_or(f64::NEG_INFINITY);
            if (now - last_sent) * 1000.0 < TICK_INTERVAL_MS {
                continue;
            }

            let record = CharacterPosition {
                entity_id: net_id,
                pos: vec3_to_wire(sample.position),
                compressed_quat: 0,
                anim_state_id: sample.anim_state,
                move_speed: sample.move_speed,
                flags: 0,
            }
            .with_rotation(quat_to_wire(sample.rotation));

            self.registry.update_position(net_id, sample.position).ok();
            self.registry.update_rotation(net_id, sample.rotation).ok();
            self.last_sent_at.insert(net_id, now);
            entries.push(record);
        }

        batch_position_packets(&entries, self.next_sequence())
    }

    /// Phase B: apply interpolated remote values to the game world.
    pub fn phase_b_remote_inbound(&mut self, source: &impl LocalCharacterSource, clock: &impl GameClock) {
        let now = clock.now();
        for info in self.registry.get_remote_entities() {
            let Some(handle) = info.game_object else {
                continue;
            };
            if let Some(sample) = self.snapshots.get_interpolated(info.net_id, now) {
                source.write_remote(handle, sample.position, sample.rotation);
                self.registry.update_position(info.net_id, sample.position).ok();
                self.registry.update_rotation(info.net_id, sample.rotation).ok();
            }
        }
    }

    /// Phase C: recompute the local player's zone; returns `Some` only when
    /// it changed, so the caller knows to emit a `C2S_ZoneRequest`.
    pub fn phase_c_zone_tracking(&mut self, local_position: glam::Vec3) -> Option<ZoneCoord> {
        let zone = ZoneCoord::from_world_pos(local_position.x, local_position.z);
        if self.local_zone != Some(zone) {
            self.local_zone = Some(zone);
            Some(zone)
        } else {
            None
        }
    }

    pub fn handle_inbound_position_update(&mut self, records: &[CharacterPosition], now: f64) {
        for record in records {
            self.snapshots.add_snapshot(
                record.entity_id,
                Snapshot {
                    t: now,
                    position: wire_to_vec3(record.pos),
                    rotation: wire_to_quat(record.rotation()),
                    move_speed: record.move_speed,
                    anim_state: record.anim_state_id,
                },
            );
        }
    }

    fn next_sequence(&mut self) -> u16 {
        self.sequence = self.sequence.wrapping_add(1);
        self.sequence
    }
}

/// Splits `entries` into MTU- and count-bounded batches and serializes each
/// as a full `C2S_PositionUpdate` packet (header + `u8 count` + records).
fn batch_position_packets(entries: &[CharacterPosition], sequence: u16) -> Vec<Vec<u8>> {
    use mp_core::codec::{HEADER_SIZE};

    if entries.is_empty() {
        return Vec::new();
    }

    const MTU: usize = 1200;
    let mut packets = Vec::new();
    let mut chunk: Vec<&CharacterPosition> = Vec::new();
    let mut chunk_bytes = HEADER_SIZE + 1; // header + u8 count

    for entry in entries {
        let would_be = chunk_bytes + CharacterPosition::ENCODED_SIZE;
        if !chunk.is_empty() && (chunk.len() >= MAX_ENTRIES_PER_BATCH || would_be > MTU) {
            packets.push(encode_batch(&chunk, sequence));
            chunk.clear();
            chunk_bytes = HEADER_SIZE + 1;
        }
        chunk.push(entry);
        chunk_bytes += CharacterPosition::ENCODED_SIZE;
    }
    if !chunk.is_empty() {
        packets.push(encode_batch(&chunk, sequence));
    }
    packets
}

fn encode_batch(chunk: &[&CharacterPosition], sequence: u16) -> Vec<u8> {
    let header = PacketHeader::new(MessageType::C2sPositionUpdate as u8, sequence, 0);
    let mut out = Vec::new();
    header.write_to(&mut out);
    out.push(chunk.len() as u8);
    for entry in chunk {
        entry.write_to(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use std::cell::RefCell;
    use std::collections::HashMap as StdHashMap;
    use crate::external::GameObjectHandle;

    struct FixedClock(std::cell::Cell<f64>);
    impl GameClock for FixedClock {
        fn now(&self) -> f64 {
            self.0.get()
        }
    }

    struct StubSource {
        samples: RefCell<StdHashMap<GameObjectHandle, crate::external::LocalCharacterSample>>,
        written: RefCell<Vec<(GameObjectHandle, Vec3, Quat)>>,
        entities: Vec<(GameObjectHandle, EntityType)>,
    }

    impl LocalCharacterSource for StubSource {
        fn local_entities(&self) -> Vec<(GameObjectHandle, EntityType)> {
            self.entities.clone()
        }
        fn read_sample(&self, handle: GameObjectHandle) -> Option<crate::external::LocalCharacterSample> {
            self.samples.borrow().get(&handle).copied()
        }
        fn write_remote(&self, handle: GameObjectHandle, position: Vec3, rotation: Quat) {
            self.written.borrow_mut().push((handle, position, rotation));
        }
        fn spawn_template(&self, _handle: GameObjectHandle) -> Option<(u32, u32, String)> {
            None
        }
    }

    fn sample(pos: Vec3) -> crate::external::LocalCharacterSample {
        crate::external::LocalCharacterSample {
            position: pos,
            rotation: Quat::IDENTITY,
            move_speed: 0,
            anim_state: 0,
        }
    }

    #[test]
    fn phase_a_skips_entities_below_threshold() {
        let mut replicator = ClientReplicator::new();
        let mut samples = StdHashMap::new();
        samples.insert(1u64, sample(Vec3::new(0.01, 0.0, 0.0)));
        let source = StubSource {
            samples: RefCell::new(samples),
            written: RefCell::new(Vec::new()),
            entities: vec![(1, EntityType::PlayerCharacter)],
        };
        let clock = FixedClock(std::cell::Cell::new(1.0));
        // movement of 0.01 from the (0,0,0) default last_position is below threshold
        let packets = replicator.phase_a_local_outbound(&source, &clock);
        assert!(packets.is_empty());

        // a later sample that does clear the threshold must be sent
        source.samples.borrow_mut().insert(1u64, sample(Vec3::new(5.0, 0.0, 0.0)));
        let packets2 = replicator.phase_a_local_outbound(&source, &clock);
        assert!(!packets2.is_empty());
    }

    #[test]
    fn phase_a_batches_many_entries() {
        let mut replicator = ClientReplicator::new();
        let mut samples = StdHashMap::new();
        let mut entities = Vec::new();
        for i in 0..300u64 {
            samples.insert(i, sample(Vec3::new(i as f32 * 10.0, 0.0, 0.0)));
            entities.push((i, EntityType::PlayerCharacter));
        }
        let source = StubSource {
            samples: RefCell::new(samples),
            written: RefCell::new(Vec::new()),
            entities,
        };
        let clock = FixedClock(std::cell::Cell::new(1.0));
        let packets = replicator.phase_a_local_outbound(&source, &clock);
        assert!(packets.len() >= 2, "300 entries must split across multiple batches");
    }

    #[test]
    fn phase_b_applies_interpolated_remote_to_source() {
        let mut replicator = ClientReplicator::new();
        replicator.registry.register_remote(42, EntityType::Npc, 0, Vec3::ZERO);
        replicator.registry.set_game_object(42, 7).unwrap();
        replicator.snapshots.add_snapshot(
            42,
            Snapshot {
                t: 1.0,
                position: Vec3::new(5.0, 0.0, 0.0),
                rotation: Quat::IDENTITY,
                move_speed: 0,
                anim_state: 0,
            },
        );
        let source = StubSource {
            samples: RefCell::new(StdHashMap::new()),
            written: RefCell::new(Vec::new()),
            entities: Vec::new(),
        };
        let clock = FixedClock(std::cell::Cell::new(1.2));
        replicator.phase_b_remote_inbound(&source, &clock);
        assert_eq!(source.written.borrow().len(), 1);
    }

    #[test]
    fn phase_c_reports_only_on_zone_change() {
        let mut replicator = ClientReplicator::new();
        let first = replicator.phase_c_zone_tracking(Vec3::new(0.0, 0.0, 0.0));
        assert!(first.is_some());
        let second = replicator.phase_c_zone_tracking(Vec3::new(1.0, 0.0, 1.0));
        assert!(second.is_none());
        let third = replicator.phase_c_zone_tracking(Vec3::new(1000.0, 0.0, 0.0));
        assert!(third.is_some());
    }
}
