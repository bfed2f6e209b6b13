//! `glam` <-> wire-array conversions. The wire quaternion order is
//! `(w, x, y, z)`; `glam::Quat`'s own array layout is `(x, y, z, w)`, so this
//! is a real reordering, not a bit-for-bit reinterpretation.

use glam::{Quat, Vec3};

pub fn vec3_to_wire(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

pub fn wire_to_vec3(w: [f32; 3]) -> Vec3 {
    Vec3::new(w[0], w[1], w[2])
}

pub fn quat_to_wire(q: Quat) -> [f32; 4] {
    [q.w, q.x, q.y, q.z]
}

pub fn wire_to_quat(w: [f32; 4]) -> Quat {
    Quat::from_xyzw(w[1], w[2], w[3], w[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quat_order_round_trips() {
        let q = Quat::from_xyzw(0.1, 0.2, 0.3, 0.9).normalize();
        let wire = quat_to_wire(q);
        let back = wire_to_quat(wire);
        assert!((q.x - back.x).abs() < 1e-6);
        assert!((q.w - back.w).abs() < 1e-6);
    }
}
