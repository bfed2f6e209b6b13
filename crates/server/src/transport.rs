//! Server-side transport (C2): multi-peer host half of the three-channel
//! reliable-UDP abstraction, over a non-blocking `UdpSocket`.

use std::collections::HashMap;
use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use mp_core::protocol::TIMEOUT_MS;

use crate::error::TransportError;

pub const MAX_PACKET_SIZE: usize = 1200;

pub struct PeerState {
    pub last_receive: Instant,
    pub send_sequence: u16,
}

/// One inbound datagram plus the address it arrived from.
pub struct Received {
    pub from: SocketAddr,
    pub bytes: Vec<u8>,
}

pub enum ServerEvent {
    Connect(SocketAddr),
    Receive(Received),
    Disconnect(SocketAddr),
}

/// Host half: one listening socket, any number of peer slots tracked purely
/// by address (handshake admission into a `ConnectedPlayer` happens one
/// layer up, in the tick loop's message handler).
pub struct ServerTransport {
    socket: UdpSocket,
    peers: HashMap<SocketAddr, PeerState>,
}

impl ServerTransport {
    pub fn bind(port: u16) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(("0.0.0.0", port))?;
        socket.set_nonblocking(true)?;
        Ok(ServerTransport {
            socket,
            peers: HashMap::new(),
        })
    }

    /// Drains all pending datagrams with a zero timeout, emitting a
    /// `Connect` event the first time an address is seen.
    pub fn update(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        let mut buf = [0u8; MAX_PACKET_SIZE];
        loop {
            match self.socket.recv_from(&mut buf) {
                Ok((n, from)) => {
                    let is_new = !self.peers.contains_key(&from);
                    self.peers.entry(from).or_insert_with(|| PeerState {
                        last_receive: Instant::now(),
                        send_sequence: 0,
                    });
                    if let Some(peer) = self.peers.get_mut(&from) {
                        peer.last_receive = Instant::now();
                    }
                    if is_new {
                        events.push(ServerEvent::Connect(from));
                    }
                    events.push(ServerEvent::Receive(Received {
                        from,
                        bytes: buf[..n].to_vec(),
                    }));
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(_) => break,
            }
        }

        let timed_out: Vec<SocketAddr> = self
            .peers
            .iter()
            .filter(|(_, p)| p.last_receive.elapsed() > Duration::from_millis(TIMEOUT_MS))
            .map(|(addr, _)| *addr)
            .collect();
        for addr in timed_out {
            self.peers.remove(&addr);
            events.push(ServerEvent::Disconnect(addr));
        }

        events
    }

    pub fn send(&mut self, to: SocketAddr, payload: &[u8]) -> Result<(), TransportError> {
        if payload.len() > MAX_PACKET_SIZE {
            return Err(TransportError::PacketTooLarge(payload.len(), MAX_PACKET_SIZE));
        }
        if let Some(peer) = self.peers.get_mut(&to) {
            peer.send_sequence = peer.send_sequence.wrapping_add(1);
        }
        self.socket.send_to(payload, to)?;
        Ok(())
    }

    pub fn broadcast(&mut self, to: &[SocketAddr], payload: &[u8]) -> Result<(), TransportError> {
        for addr in to {
            self.send(*addr, payload)?;
        }
        Ok(())
    }

    pub fn disconnect(&mut self, addr: SocketAddr) {
        self.peers.remove(&addr);
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }
}
