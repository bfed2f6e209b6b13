//! Snapshot buffer & interpolator (C4): a per-entity bounded deque of
//! timestamped snapshots, rendered at `now - INTERP_DELAY_SEC`.

use std::collections::{HashMap, VecDeque};

use glam::{Quat, Vec3};

use mp_core::EntityId;

pub const MAX_SNAPSHOTS: usize = 20;
pub const INTERP_DELAY_SEC: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub t: f64,
    pub position: Vec3,
    pub rotation: Quat,
    pub move_speed: u8,
    pub anim_state: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatorSample {
    pub position: Vec3,
    pub rotation: Quat,
    pub move_speed: u8,
    pub anim_state: u8,
}

#[derive(Default)]
pub struct SnapshotBuffer {
    per_entity: HashMap<EntityId, VecDeque<Snapshot>>,
}

impl SnapshotBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends and evicts from the front when length exceeds `MAX_SNAPSHOTS`.
    pub fn add_snapshot(&mut self, id: EntityId, snapshot: Snapshot) {
        let deque = self.per_entity.entry(id).or_default();
        deque.push_back(snapshot);
        while deque.len() > MAX_SNAPSHOTS {
            deque.pop_front();
        }
    }

    pub fn clear(&mut self, id: EntityId) {
        self.per_entity.remove(&id);
    }

    pub fn get_interpolated(&self, id: EntityId, render_time: f64) -> Option<InterpolatorSample> {
        let deque = self.per_entity.get(&id)?;
        if deque.is_empty() {
            return None;
        }
        let interp_time = render_time - INTERP_DELAY_SEC;

        // never extrapolate past the most recent snapshot
        let last = deque.back().unwrap();
        if interp_time > last.t {
            return Some(sample_of(last));
        }

        let before = deque.iter().rev().find(|s| s.t <= interp_time);
        let after = deque.iter().find(|s| s.t >= interp_time);

        match (before, after) {
            (None, None) => None,
            (Some(s), None) | (None, Some(s)) => Some(sample_of(s)),
            (Some(before), Some(after)) if before.t == after.t => Some(sample_of(before)),
            (Some(before), Some(after)) => {
                let u = ((interp_time - before.t) / (after.t - before.t)).clamp(0.0, 1.0) as f32;
                let position = before.position + u * (after.position - before.position);
                let rotation = slerp(before.rotation, after.rotation, u);
                let (discrete_speed, discrete_anim) = if u <= 0.5 {
                    (before.move_speed, before.anim_state)
                } else {
                    (after.move_speed, after.anim_state)
                };
                Some(InterpolatorSample {
                    position,
                    rotation,
                    move_speed: discrete_speed,
                    anim_state: discrete_anim,
                })
            }
        }
    }
}

fn sample_of(s: &Snapshot) -> InterpolatorSample {
    InterpolatorSample {
        position: s.position,
        rotation: s.rotation,
        move_speed: s.move_speed,
        anim_state: s.anim_state,
    }
}

/// Given `a, b, u`: short-arc correction, then a linear-blend fallback near
/// parallel, else the standard spherical formula. Works in raw `[f32; 4]`
/// components since the un-normalized linear-blend branch is intentionally
/// not renormalized by the spec.
fn slerp(a: Quat, b: Quat, u: f32) -> Quat {
    let av = [a.x, a.y, a.z, a.w];
    let mut bv = [b.x, b.y, b.z, b.w];
    let mut d = a.dot(b);
    if d < 0.0 {
        bv = bv.map(|c| -c);
        d = -d;
    }
    let out: [f32; 4] = if d > 0.9995 {
        std::array::from_fn(|i| av[i] + u * (bv[i] - av[i]))
    } else {
        let theta = d.acos();
        let sin_theta = theta.sin();
        let wa = ((1.0 - u) * theta).sin() / sin_theta;
        let wb = (u * theta).sin() / sin_theta;
        std::array::from_fn(|i| wa * av[i] + wb * bv[i])
    };
    Quat::from_xyzw(out[0], out[1], out[2], out[3])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(t: f64, x: f32) -> Snapshot {
        Snapshot {
            t,
            position: Vec3::new(x, 0.0, 0.0),
            rotation: Quat::IDENTITY,
            move_speed: 0,
            anim_state: 0,
        }
    }

    #[test]
    fn empty_buffer_returns_none() {
        let buf = SnapshotBuffer::new();
        assert!(buf.get_interpolated(1, 0.0).is_none());
    }

    #[test]
    fn single_snapshot_returned_verbatim() {
        let mut buf = SnapshotBuffer::new();
        buf.add_snapshot(1, snap(1.0, 5.0));
        let sample = buf.get_interpolated(1, 1.5).unwrap();
        assert_eq!(sample.position.x, 5.0);
    }

    #[test]
    fn interpolates_between_bracketing_snapshots() {
        let mut buf = SnapshotBuffer::new();
        buf.add_snapshot(1, snap(1.0, 0.0));
        buf.add_snapshot(1, snap(2.0, 10.0));
        // render_time 1.6 -> interp_time 1.5 -> halfway
        let sample = buf.get_interpolated(1, 1.6).unwrap();
        assert!((sample.position.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn never_extrapolates_past_latest() {
        let mut buf = SnapshotBuffer::new();
        buf.add_snapshot(1, snap(1.0, 0.0));
        buf.add_snapshot(1, snap(2.0, 10.0));
        let sample = buf.get_interpolated(1, 100.0).unwrap();
        assert_eq!(sample.position.x, 10.0);
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut buf = SnapshotBuffer::new();
        for i in 0..(MAX_SNAPSHOTS as i32 + 10) {
            buf.add_snapshot(1, snap(i as f64, i as f32));
        }
        assert_eq!(buf.per_entity.get(&1).unwrap().len(), MAX_SNAPSHOTS);
        assert_eq!(buf.per_entity.get(&1).unwrap().front().unwrap().t, 10.0);
    }

    #[test]
    fn interpolation_stays_within_convex_hull() {
        let mut buf = SnapshotBuffer::new();
        buf.add_snapshot(1, snap(0.0, -3.0));
        buf.add_snapshot(1, snap(1.0, 7.0));
        for i in 0..=10 {
            let render_time = i as f64 * 0.1 + 0.1; // interp_time in [0,1]
            if let Some(sample) = buf.get_interpolated(1, render_time) {
                assert!(sample.position.x >= -3.0 - 1e-4 && sample.position.x <= 7.0 + 1e-4);
            }
        }
    }

    #[test]
    fn discrete_fields_never_blended() {
        let mut buf = SnapshotBuffer::new();
        let mut before = snap(1.0, 0.0);
        before.anim_state = 1;
        let mut after = snap(2.0, 10.0);
        after.anim_state = 2;
        buf.add_snapshot(1, before);
        buf.add_snapshot(1, after);
        let early = buf.get_interpolated(1, 1.3).unwrap(); // u=0.2
        assert_eq!(early.anim_state, 1);
        let late = buf.get_interpolated(1, 1.8).unwrap(); // u=0.7
        assert_eq!(late.anim_state, 2);
    }

    #[test]
    fn slerp_short_arc_and_linear_fallback() {
        let a = Quat::IDENTITY;
        let b = Quat::from_xyzw(0.0, 0.0, 0.0, -1.0); // same rotation, opposite sign
        let mid = slerp(a, b, 0.5);
        assert!(mid.dot(a) > 0.99);

        let c = Quat::from_xyzw(0.001, 0.0, 0.0, 1.0).normalize();
        let near = slerp(a, c, 0.5);
        assert!(near.is_finite());
    }
}
