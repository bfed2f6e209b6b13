//! The two abstractions the core consumes from the injection layer (out of
//! scope here): a source of locally-owned entities, and a per-frame clock.

use glam::{Quat, Vec3};

use mp_core::EntityType;

/// One locally-owned entity's current replicated-relevant state, as read
/// from the external game world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalCharacterSample {
    pub position: Vec3,
    pub rotation: Quat,
    pub move_speed: u8,
    pub anim_state: u8,
}

/// A non-owning handle into the external game world. Opaque to this crate;
/// equality/hash identify the same game object across calls.
pub type GameObjectHandle = u64;

/// Enumerates locally-owned entities and exposes per-entity read/write of
/// position, rotation, and movement attributes. Implemented by the
/// injection-layer shim in the real deployment, and by a stub in tests.
pub trait LocalCharacterSource {
    /// All locally-owned entities that should be replicated, newest
    /// creations included. Only player characters auto-register (§4.5).
    fn local_entities(&self) -> Vec<(GameObjectHandle, EntityType)>;

    fn read_sample(&self, handle: GameObjectHandle) -> Option<LocalCharacterSample>;

    /// Applies an interpolated remote value to a (non locally-owned) replica.
    fn write_remote(&self, handle: GameObjectHandle, position: Vec3, rotation: Quat);

    /// `(template_id, faction_id, template_name)` for a freshly created local
    /// character, used for the spawn-request auto-report.
    fn spawn_template(&self, handle: GameObjectHandle) -> Option<(u32, u32, String)>;
}

/// Delivers per-frame ticks; `now()` is a monotonic clock reading in seconds
/// used both for interpolation timing and send-rate throttling.
pub trait GameClock {
    fn now(&self) -> f64;
}
