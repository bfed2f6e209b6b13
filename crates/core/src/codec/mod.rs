//! Wire codec (C1): fixed 8-byte packet header, little-endian primitives,
//! smallest-three quaternion compression, half-float deltas, velocity packing.

mod error;
mod glam_wire;
mod half;
mod header;
mod message;
mod primitives;
mod quat;
mod velocity;

pub use error::CodecError;
pub use glam_wire::{quat_to_wire, vec3_to_wire, wire_to_quat, wire_to_vec3};
pub use half::{float_to_half, half_to_float};
pub use header::{sequence_greater_than, PacketHeader, HEADER_SIZE};
pub use message::{CharacterPosition, MessageType};
pub use primitives::{read_string, write_string};
pub use quat::{compress_quat, decompress_quat};
pub use velocity::{decode_velocity_component, encode_velocity_component, MAX_VELOCITY_MPS};
