//! Server tick loop (C6) plus the message handlers it dispatches to (§4.6),
//! ownership validation (C8), combat integration (C9), and persistence hooks
//! (C10). Single-threaded: the tick loop runs to completion between event
//! drains, per §5's concurrency model.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use byteorder::{ByteOrder, LittleEndian};
use glam::Vec3;
use mp_core::codec::{
    read_string, wire_to_quat, wire_to_vec3, CharacterPosition, CodecError, MessageType, PacketHeader,
};
use mp_core::combat::resolve_hit;
use mp_core::protocol::{
    CHANNEL_RELIABLE_ORDERED, CHANNEL_RELIABLE_UNORDERED, CHANNEL_UNRELIABLE_SEQUENCED, MAX_PLAYERS,
    PROTOCOL_VERSION,
};
use mp_core::zone::visible;
use mp_core::{EntityId, EntityType, PlayerId};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::admin::{AdminCommand, AdminQueue};
use crate::config::ServerConfig;
use crate::entity::{ConnectedPlayer, ServerEntity};
use crate::persistence;
use crate::transport::{ServerEvent, ServerTransport};

const TIME_SYNC_INTERVAL_SEC: f32 = 5.0;
const MAX_BATCH_ENTRIES: usize = 255;

pub struct GameServer {
    pub config: ServerConfig,
    pub transport: ServerTransport,
    pub entities: HashMap<EntityId, ServerEntity>,
    pub players: HashMap<PlayerId, ConnectedPlayer>,
    addr_to_player: HashMap<SocketAddr, PlayerId>,
    next_entity_id: EntityId,
    next_player_id: PlayerId,
    pub server_tick: u32,
    pub time_of_day: f32,
    pub weather: i32,
    time_since_sync: f32,
    rng: StdRng,
    pub running: bool,
    admin_queue: Option<AdminQueue>,
}

impl GameServer {
    pub fn new(config: ServerConfig) -> Result<Self, crate::error::TransportError> {
        let transport = ServerTransport::bind(config.port)?;

        let (entities, time_of_day, weather, next_entity_id) =
            match persistence::load(&PathBuf::from(&config.save_path)) {
                Some(world) => {
                    let next_id = world.entities.iter().map(|e| e.id).max().unwrap_or(0) + 1;
                    let map = world.entities.into_iter().map(|e| (e.id, e)).collect();
                    (map, world.time_of_day, world.weather, next_id)
                }
                None => (HashMap::new(), 0.0, 0, 1),
            };

        Ok(GameServer {
            config,
            transport,
            entities,
            players: HashMap::new(),
            addr_to_player: HashMap::new(),
            next_entity_id,
            next_player_id: 1,
            server_tick: 0,
            time_of_day,
            weather,
            time_since_sync: 0.0,
            rng: StdRng::from_entropy(),
            running: true,
            admin_queue: None,
        })
    }

    pub fn with_admin_queue(mut self, queue: AdminQueue) -> Self {
        self.admin_queue = Some(queue);
        self
    }

    /// Blocking run loop at the configured tick rate; returns once `stop` is
    /// issued via the admin console.
    pub fn run(&mut self) {
        let tick_interval = Duration::from_secs_f32(1.0 / self.config.tick_rate as f32);
        let mut last = Instant::now();
        while self.running {
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;
            self.tick(dt);
            let elapsed = Instant::now().duration_since(now);
            if elapsed < tick_interval {
                std::thread::sleep(tick_interval - elapsed);
            }
        }
        self.shutdown();
    }

    /// One fixed-rate tick (§4.6): drain transport, advance clock, broadcast,
    /// periodic time-sync, ping refresh, admin command drain.
    pub fn tick(&mut self, dt: f32) {
        let events = self.transport.update();
        for event in events {
            self.handle_event(event);
        }

        self.server_tick = self.server_tick.wrapping_add(1);
        self.time_of_day = (self.time_of_day + dt * self.config.game_speed / 86400.0) % 1.0;

        self.broadcast_position_snapshots();

        self.time_since_sync += dt;
        if self.time_since_sync >= TIME_SYNC_INTERVAL_SEC {
            self.time_since_sync = 0.0;
            self.broadcast_time_sync();
        }

        self.refresh_pings();
        self.drain_admin_commands();
    }

    fn refresh_pings(&mut self) {
        for player in self.players.values_mut() {
            player.ping_ms = player.last_update_time.elapsed().as_millis().min(u32::MAX as u128) as u32;
        }
    }

    fn drain_admin_commands(&mut self) {
        let Some(queue) = self.admin_queue.clone() else {
            return;
        };
        let commands: Vec<AdminCommand> = std::mem::take(&mut *queue.lock().unwrap());
        for command in commands {
            self.apply_admin_command(command);
        }
    }

    fn apply_admin_command(&mut self, command: AdminCommand) {
        match command {
            AdminCommand::Help => log::info!("commands: help, status, players, kick <id>, say <msg>, save, stop"),
            AdminCommand::Status => log::info!(
                "tick={} players={} entities={}",
                self.server_tick,
                self.players.len(),
                self.entities.len()
            ),
            AdminCommand::Players => {
                for player in self.players.values() {
                    log::info!("player {} ({})", player.id, player.name);
                }
            }
            AdminCommand::Kick(id) => self.kick_player(id),
            AdminCommand::Say(text) => self.broadcast_chat(0, &text),
            AdminCommand::Save => self.save(),
            AdminCommand::Stop => {
                self.running = false;
            }
        }
    }

    pub fn save(&self) {
        if let Err(e) = persistence::save(
            &PathBuf::from(&self.config.save_path),
            &self.entities.values().cloned().collect::<Vec<_>>(),
            self.time_of_day,
            self.weather,
        ) {
            log::error!("save failed: {e}");
        }
    }

    fn shutdown(&mut self) {
        self.save();
        let addrs: Vec<SocketAddr> = self.players.values().map(|p| p.peer_addr).collect();
        for addr in addrs {
            self.transport.disconnect(addr);
        }
    }

    fn kick_player(&mut self, player_id: PlayerId) {
        if let Some(player) = self.players.get(&player_id) {
            let addr = player.peer_addr;
            self.disconnect_addr(addr);
        }
    }

    // -- event dispatch --------------------------------------------------

    fn handle_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Connect(_addr) => {
                // Admission happens on successful handshake, not on raw connect.
            }
            ServerEvent::Receive(received) => self.handle_packet(received.from, &received.bytes),
            ServerEvent::Disconnect(addr) => self.disconnect_addr(addr),
        }
    }

    fn disconnect_addr(&mut self, addr: SocketAddr) {
        let Some(&player_id) = self.addr_to_player.get(&addr) else {
            return;
        };
        self.addr_to_player.remove(&addr);
        if let Some(player) = self.players.remove(&player_id) {
            for entity_id in &player.owned_entities {
                if let Some(entity) = self.entities.get_mut(entity_id) {
                    entity.owner = 0;
                }
            }
            log::info!("player {} ({}) disconnected", player.id, player.name);
            self.broadcast_to_all(encode_player_left(player_id), CHANNEL_RELIABLE_ORDERED);
        }
        self.transport.disconnect(addr);
    }

    fn handle_packet(&mut self, from: SocketAddr, bytes: &[u8]) {
        let (header, payload) = match PacketHeader::read_from(bytes) {
            Ok(pair) => pair,
            Err(e) => {
                log::debug!("dropping packet from {from}: {e}");
                return;
            }
        };
        let message_type = match MessageType::from_u8(header.message_type) {
            Ok(t) => t,
            Err(e) => {
                log::debug!("dropping packet from {from}: {e}");
                return;
            }
        };

        let result = match message_type {
            MessageType::C2sHandshake => self.handle_handshake(from, payload),
            MessageType::C2sPositionUpdate => self.handle_position_update(from, payload),
            MessageType::C2sMoveCommand => self.handle_move_command(from, payload),
            MessageType::C2sAttackIntent => self.handle_attack_intent(from, payload),
            MessageType::C2sEntitySpawnReq => self.handle_entity_spawn_req(from, payload),
            MessageType::C2sEntityDespawnReq => self.handle_entity_despawn_req(from, payload),
            MessageType::C2sBuildRequest => self.handle_build_request(from, payload),
            MessageType::C2sZoneRequest => self.handle_zone_request(from, payload),
            MessageType::C2sChatMessage => self.handle_chat_message(from, payload),
            _ => Ok(()),
        };
        if let Err(e) = result {
            log::debug!("dropping malformed {message_type:?} from {from}: {e}");
        }
    }

    fn player_for_addr(&self, addr: SocketAddr) -> Option<PlayerId> {
        self.addr_to_player.get(&addr).copied()
    }

    // -- handshake --------------------------------------------------------

    fn handle_handshake(&mut self, from: SocketAddr, payload: &[u8]) -> Result<(), CodecError> {
        if payload.len() < 4 {
            return Err(CodecError::UnexpectedEof);
        }
        let client_version = LittleEndian::read_u32(&payload[0..4]);
        let (name, _rest) = read_string(&payload[4..])?;

        if client_version != PROTOCOL_VERSION {
            let text = format!("Version mismatch: server={PROTOCOL_VERSION}, client={client_version}");
            self.send(from, encode_handshake_reject(1, &text), CHANNEL_RELIABLE_ORDERED);
            self.transport.disconnect(from);
            return Ok(());
        }

        if self.players.len() >= self.config.max_players as usize
            || self.players.len() >= MAX_PLAYERS as usize
        {
            self.transport.disconnect(from);
            return Ok(());
        }

        let player_id = self.next_player_id;
        self.next_player_id += 1;
        let name = if name.is_empty() { format!("Player{player_id}") } else { name };

        let player = ConnectedPlayer::new(player_id, name.clone(), from);
        self.players.insert(player_id, player);
        self.addr_to_player.insert(from, player_id);

        self.send(
            from,
            encode_handshake_ack(
                player_id,
                self.server_tick,
                self.time_of_day,
                self.weather,
                self.config.max_players.min(MAX_PLAYERS as u32) as u8,
                self.players.len() as u8,
            ),
            CHANNEL_RELIABLE_ORDERED,
        );

        self.broadcast_to_all(encode_player_joined(player_id, &name), CHANNEL_RELIABLE_ORDERED);

        let spawns: Vec<Vec<u8>> = self.entities.values().map(encode_entity_spawn).collect();
        for spawn in spawns {
            self.send(from, spawn, CHANNEL_RELIABLE_ORDERED);
        }

        log::info!("player {player_id} ({name}) joined from {from}");
        Ok(())
    }

    // -- position update ----------------------------------------------------

    fn handle_position_update(&mut self, from: SocketAddr, payload: &[u8]) -> Result<(), CodecError> {
        let Some(sender) = self.player_for_addr(from) else {
            return Ok(());
        };
        if payload.is_empty() {
            return Err(CodecError::UnexpectedEof);
        }
        let count = payload[0] as usize;
        let mut rest = &payload[1..];
        let mut first_pos = None;

        for _ in 0..count {
            let (record, remaining) = CharacterPosition::read_from(rest)?;
            rest = remaining;

            let Some(entity) = self.entities.get_mut(&record.entity_id) else {
                continue;
            };
            if entity.owner != sender {
                continue; // ownership gate (C8): silent discard
            }
            let position = wire_to_vec3(record.pos);
            entity.set_position(position);
            entity.rotation = wire_to_quat(record.rotation());
            entity.anim_state = record.anim_state_id;
            entity.move_speed = record.move_speed;
            entity.flags = record.flags;
            if first_pos.is_none() {
                first_pos = Some((position, entity.zone));
            }
        }

        if let Some((position, zone)) = first_pos
            && let Some(player) = self.players.get_mut(&sender)
        {
            player.position = position;
            player.zone = zone;
            player.last_update_time = Instant::now();
        }
        Ok(())
    }

    // -- move command (ownership-gated passthrough broadcast) -------------

    fn handle_move_command(&mut self, from: SocketAddr, payload: &[u8]) -> Result<(), CodecError> {
        let Some(sender) = self.player_for_addr(from) else {
            return Ok(());
        };
        if payload.len() < 4 {
            return Err(CodecError::UnexpectedEof);
        }
        let entity_id = LittleEndian::read_u32(&payload[0..4]);
        if !self.owner_matches(entity_id, sender) {
            return Ok(()); // C8: silent discard
        }
        let targets = self.addrs_for_all_players();
        self.transport_broadcast(&targets, payload_with_header(MessageType::S2cMoveCommand, payload), CHANNEL_RELIABLE_UNORDERED);
        Ok(())
    }

    fn owner_matches(&self, entity_id: EntityId, sender: PlayerId) -> bool {
        self.entities
            .get(&entity_id)
            .map(|e| e.owner == sender)
            .unwrap_or(false)
    }

    // -- attack intent / combat (C9) ---------------------------------------

    fn handle_attack_intent(&mut self, from: SocketAddr, payload: &[u8]) -> Result<(), CodecError> {
        let Some(sender) = self.player_for_addr(from) else {
            return Ok(());
        };
        if payload.len() < 8 {
            return Err(CodecError::UnexpectedEof);
        }
        let attacker_id = LittleEndian::read_u32(&payload[0..4]);
        let target_id = LittleEndian::read_u32(&payload[4..8]);

        if !self.owner_matches(attacker_id, sender) {
            return Ok(());
        }
        let Some(target) = self.entities.get(&target_id) else {
            return Ok(());
        };
        if !target.alive {
            return Ok(());
        }

        let hit = resolve_hit(
            &mut self.rng,
            &mut self.entities.get_mut(&target_id).unwrap().health,
            mp_core::combat::DEFAULT_ATTACK,
            mp_core::combat::DEFAULT_DEFENSE,
        );

        let all_addrs = self.addrs_for_all_players();
        self.transport_broadcast(
            &all_addrs,
            encode_combat_hit(attacker_id, target_id, &hit),
            CHANNEL_RELIABLE_UNORDERED,
        );

        if hit.death {
            if let Some(entity) = self.entities.get_mut(&target_id) {
                entity.alive = false;
            }
            self.transport_broadcast(&all_addrs, encode_combat_outcome(MessageType::S2cCombatDeath, target_id, attacker_id), CHANNEL_RELIABLE_ORDERED);
        } else if hit.ko {
            self.transport_broadcast(&all_addrs, encode_combat_outcome(MessageType::S2cCombatKo, target_id, attacker_id), CHANNEL_RELIABLE_ORDERED);
        }
        Ok(())
    }

    // -- entity lifecycle ---------------------------------------------------

    fn handle_entity_spawn_req(&mut self, from: SocketAddr, payload: &[u8]) -> Result<(), CodecError> {
        let Some(sender) = self.player_for_addr(from) else {
            return Ok(());
        };
        if payload.len() < 4 + 4 + 12 {
            return Err(CodecError::UnexpectedEof);
        }
        let entity_type = EntityType::from_u8(payload[0]).unwrap_or(EntityType::PlayerCharacter);
        let template_id = LittleEndian::read_u32(&payload[4..8]);
        let position = Vec3::new(
            LittleEndian::read_f32(&payload[8..12]),
            LittleEndian::read_f32(&payload[12..16]),
            LittleEndian::read_f32(&payload[16..20]),
        );

        let id = self.next_entity_id;
        self.next_entity_id += 1;
        let mut entity = ServerEntity::new(id, entity_type, sender, position);
        entity.template_id = template_id;
        self.entities.insert(id, entity.clone());
        if let Some(player) = self.players.get_mut(&sender) {
            player.owned_entities.push(id);
        }

        self.send(from, encode_entity_spawn(&entity), CHANNEL_RELIABLE_ORDERED);
        Ok(())
    }

    fn handle_entity_despawn_req(&mut self, from: SocketAddr, payload: &[u8]) -> Result<(), CodecError> {
        let Some(sender) = self.player_for_addr(from) else {
            return Ok(());
        };
        if payload.len() < 4 {
            return Err(CodecError::UnexpectedEof);
        }
        let entity_id = LittleEndian::read_u32(&payload[0..4]);
        if !self.owner_matches(entity_id, sender) {
            return Ok(()); // C8: silent discard
        }
        self.entities.remove(&entity_id);
        if let Some(player) = self.players.get_mut(&sender) {
            player.owned_entities.retain(|&id| id != entity_id);
        }
        let targets = self.addrs_for_all_players();
        self.transport_broadcast(&targets, encode_entity_despawn(entity_id), CHANNEL_RELIABLE_ORDERED);
        Ok(())
    }

    /// §4.7: a client entering a new zone may ask the server to replay
    /// spawn events for entities it's about to need, filtered to the
    /// requested zone's adjacency window.
    fn handle_zone_request(&mut self, from: SocketAddr, payload: &[u8]) -> Result<(), CodecError> {
        if payload.len() < 8 {
            return Err(CodecError::UnexpectedEof);
        }
        let zone = mp_core::ZoneCoord {
            x: LittleEndian::read_i32(&payload[0..4]),
            z: LittleEndian::read_i32(&payload[4..8]),
        };
        let spawns: Vec<Vec<u8>> = self
            .entities
            .values()
            .filter(|e| visible(zone, e.zone))
            .map(encode_entity_spawn)
            .collect();
        for spawn in spawns {
            self.send(from, spawn, CHANNEL_RELIABLE_ORDERED);
        }
        Ok(())
    }

    fn handle_build_request(&mut self, from: SocketAddr, payload: &[u8]) -> Result<(), CodecError> {
        let Some(sender) = self.player_for_addr(from) else {
            return Ok(());
        };
        if payload.len() < 12 {
            return Err(CodecError::UnexpectedEof);
        }
        let position = Vec3::new(
            LittleEndian::read_f32(&payload[0..4]),
            LittleEndian::read_f32(&payload[4..8]),
            LittleEndian::read_f32(&payload[8..12]),
        );
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        let entity = ServerEntity::new(id, EntityType::Building, sender, position);
        self.entities.insert(id, entity.clone());
        if let Some(player) = self.players.get_mut(&sender) {
            player.owned_entities.push(id);
        }
        let targets = self.addrs_for_all_players();
        self.transport_broadcast(&targets, encode_build_placed(&entity), CHANNEL_RELIABLE_ORDERED);
        Ok(())
    }

    // -- chat ---------------------------------------------------------------

    fn handle_chat_message(&mut self, from: SocketAddr, payload: &[u8]) -> Result<(), CodecError> {
        let Some(sender) = self.player_for_addr(from) else {
            return Ok(());
        };
        let (text, _) = read_string(payload)?;
        self.broadcast_chat(sender, &text);
        Ok(())
    }

    fn broadcast_chat(&mut self, sender: PlayerId, text: &str) {
        self.broadcast_to_all(encode_chat_message(sender, text), CHANNEL_RELIABLE_ORDERED);
    }

    // -- broadcasts -----------------------------------------------------------

    fn addrs_for_all_players(&self) -> Vec<SocketAddr> {
        self.players.values().map(|p| p.peer_addr).collect()
    }

    fn broadcast_to_all(&mut self, payload: Vec<u8>, channel: u8) {
        let targets = self.addrs_for_all_players();
        self.transport_broadcast(&targets, payload, channel);
    }

    fn transport_broadcast(&mut self, targets: &[SocketAddr], payload: Vec<u8>, _channel: u8) {
        if let Err(e) = self.transport.broadcast(targets, &payload) {
            log::warn!("broadcast failed: {e}");
        }
    }

    fn send(&mut self, to: SocketAddr, payload: Vec<u8>, _channel: u8) {
        if let Err(e) = self.transport.send(to, &payload) {
            log::warn!("send to {to} failed: {e}");
        }
    }

    fn broadcast_time_sync(&mut self) {
        let payload = encode_time_sync(self.server_tick, self.time_of_day, self.weather, self.config.game_speed);
        self.broadcast_to_all(payload, CHANNEL_RELIABLE_ORDERED);
    }

    /// Interest-filtered position broadcast (§4.6): one batch per player,
    /// containing every entity not owned by that player whose zone is
    /// adjacent to the player's own zone.
    fn broadcast_position_snapshots(&mut self) {
        let player_list: Vec<(PlayerId, SocketAddr, mp_core::ZoneCoord)> = self
            .players
            .values()
            .map(|p| (p.id, p.peer_addr, p.zone))
            .collect();

        for (player_id, addr, zone) in player_list {
            let entries: Vec<CharacterPosition> = self
                .entities
                .values()
                .filter(|e| e.owner != player_id && visible(zone, e.zone))
                .take(MAX_BATCH_ENTRIES)
                .map(entity_to_character_position)
                .collect();
            if entries.is_empty() {
                continue;
            }
            self.send(addr, encode_position_batch(&entries), CHANNEL_UNRELIABLE_SEQUENCED);
        }
    }
}

fn entity_to_character_position(e: &ServerEntity) -> CharacterPosition {
    CharacterPosition {
        entity_id: e.id,
        pos: mp_core::codec::vec3_to_wire(e.position),
        compressed_quat: 0,
        anim_state_id: e.anim_state,
        move_speed: e.move_speed,
        flags: e.flags,
    }
    .with_rotation(mp_core::codec::quat_to_wire(e.rotation))
}

fn payload_with_header(message_type: MessageType, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(message_type as u8, 0, 0).write_to(&mut out);
    out.extend_from_slice(payload);
    out
}

fn encode_position_batch(entries: &[CharacterPosition]) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(MessageType::S2cPositionUpdate as u8, 0, 0).write_to(&mut out);
    out.push(entries.len() as u8);
    for entry in entries {
        entry.write_to(&mut out);
    }
    out
}

fn encode_handshake_ack(
    player_id: PlayerId,
    server_tick: u32,
    time_of_day: f32,
    weather: i32,
    max_players: u8,
    current_players: u8,
) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(MessageType::S2cHandshakeAck as u8, 0, server_tick).write_to(&mut out);
    write_u32(&mut out, player_id);
    write_u32(&mut out, server_tick);
    write_f32(&mut out, time_of_day);
    write_i32(&mut out, weather);
    out.push(max_players);
    out.push(current_players);
    write_u16(&mut out, 0);
    out
}

fn encode_handshake_reject(code: u8, text: &str) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(MessageType::S2cHandshakeReject as u8, 0, 0).write_to(&mut out);
    out.push(code);
    let _ = mp_core::codec::write_string(&mut out, text);
    out
}

fn encode_player_joined(player_id: PlayerId, name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(MessageType::S2cPlayerJoined as u8, 0, 0).write_to(&mut out);
    write_u32(&mut out, player_id);
    let _ = mp_core::codec::write_string(&mut out, name);
    out
}

fn encode_player_left(player_id: PlayerId) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(MessageType::S2cPlayerLeft as u8, 0, 0).write_to(&mut out);
    write_u32(&mut out, player_id);
    out
}

fn encode_entity_spawn(entity: &ServerEntity) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(MessageType::S2cEntitySpawn as u8, 0, 0).write_to(&mut out);
    write_u32(&mut out, entity.id);
    out.push(entity.entity_type as u8);
    write_u32(&mut out, entity.owner);
    write_u32(&mut out, entity.template_id);
    for component in mp_core::codec::vec3_to_wire(entity.position) {
        write_f32(&mut out, component);
    }
    write_u32(&mut out, mp_core::codec::compress_quat(mp_core::codec::quat_to_wire(entity.rotation)));
    write_u32(&mut out, entity.faction_id);
    let _ = mp_core::codec::write_string(&mut out, &entity.template_name);
    out
}

fn encode_entity_despawn(entity_id: EntityId) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(MessageType::S2cEntityDespawn as u8, 0, 0).write_to(&mut out);
    write_u32(&mut out, entity_id);
    out
}

fn encode_build_placed(entity: &ServerEntity) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(MessageType::S2cBuildPlaced as u8, 0, 0).write_to(&mut out);
    write_u32(&mut out, entity.id);
    write_u32(&mut out, entity.owner);
    for component in mp_core::codec::vec3_to_wire(entity.position) {
        write_f32(&mut out, component);
    }
    out
}

fn encode_combat_hit(attacker: EntityId, target: EntityId, hit: &mp_core::combat::HitResult) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(MessageType::S2cCombatHit as u8, 0, 0).write_to(&mut out);
    write_u32(&mut out, attacker);
    write_u32(&mut out, target);
    out.push(hit.body_part as u8);
    write_f32(&mut out, hit.cut);
    write_f32(&mut out, hit.blunt);
    write_f32(&mut out, hit.pierce);
    write_f32(&mut out, hit.result_health);
    out.push(hit.blocked as u8);
    out.push(hit.ko as u8);
    out
}

fn encode_combat_outcome(message_type: MessageType, entity_id: EntityId, killer_id: EntityId) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(message_type as u8, 0, 0).write_to(&mut out);
    write_u32(&mut out, entity_id);
    write_u32(&mut out, killer_id);
    out
}

fn encode_chat_message(sender_id: PlayerId, text: &str) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(MessageType::S2cChatMessage as u8, 0, 0).write_to(&mut out);
    write_u32(&mut out, sender_id);
    let _ = mp_core::codec::write_string(&mut out, text);
    out
}

fn encode_time_sync(server_tick: u32, time_of_day: f32, weather: i32, game_speed: f32) -> Vec<u8> {
    let mut out = Vec::new();
    PacketHeader::new(MessageType::S2cTimeSync as u8, 0, server_tick).write_to(&mut out);
    write_u32(&mut out, server_tick);
    write_f32(&mut out, time_of_day);
    write_i32(&mut out, weather);
    write_f32(&mut out, game_speed);
    out
}

fn write_u32(out: &mut Vec<u8>, v: u32) {
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, v);
    out.extend_from_slice(&buf);
}
fn write_i32(out: &mut Vec<u8>, v: i32) {
    let mut buf = [0u8; 4];
    LittleEndian::write_i32(&mut buf, v);
    out.extend_from_slice(&buf);
}
fn write_f32(out: &mut Vec<u8>, v: f32) {
    let mut buf = [0u8; 4];
    LittleEndian::write_f32(&mut buf, v);
    out.extend_from_slice(&buf);
}
fn write_u16(out: &mut Vec<u8>, v: u16) {
    let mut buf = [0u8; 2];
    LittleEndian::write_u16(&mut buf, v);
    out.extend_from_slice(&buf);
}
