//! Zone grid for interest management (C7): a conceptual 2D integer grid of
//! `ZONE_SIZE`-unit square cells over world x/z coordinates.

pub const ZONE_SIZE: f32 = 750.0;
pub const INTEREST_RADIUS: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct ZoneCoord {
    pub x: i32,
    pub z: i32,
}

impl ZoneCoord {
    pub fn from_world_pos(x: f32, z: f32) -> Self {
        ZoneCoord {
            x: (x / ZONE_SIZE).floor() as i32,
            z: (z / ZONE_SIZE).floor() as i32,
        }
    }

    /// True iff both axis differences are within `INTEREST_RADIUS` (a 3x3 window).
    pub fn is_adjacent(&self, other: &ZoneCoord) -> bool {
        (self.x - other.x).abs() <= INTEREST_RADIUS && (self.z - other.z).abs() <= INTEREST_RADIUS
    }
}

/// Pure visibility predicate used by both the client (zone requests) and the
/// server (broadcast filtering).
pub fn visible(player_zone: ZoneCoord, entity_zone: ZoneCoord) -> bool {
    player_zone.is_adjacent(&entity_zone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_disjoint_cells() {
        assert_eq!(ZoneCoord::from_world_pos(0.0, 0.0), ZoneCoord { x: 0, z: 0 });
        assert_eq!(
            ZoneCoord::from_world_pos(749.9, 0.0),
            ZoneCoord { x: 0, z: 0 }
        );
        assert_eq!(
            ZoneCoord::from_world_pos(750.0, 0.0),
            ZoneCoord { x: 1, z: 0 }
        );
        assert_eq!(
            ZoneCoord::from_world_pos(-0.1, 0.0),
            ZoneCoord { x: -1, z: 0 }
        );
    }

    #[test]
    fn adjacency_reflexive_and_symmetric() {
        let a = ZoneCoord { x: 3, z: -2 };
        let b = ZoneCoord { x: 4, z: -1 };
        let c = ZoneCoord { x: 10, z: 10 };
        assert!(a.is_adjacent(&a));
        assert_eq!(a.is_adjacent(&b), b.is_adjacent(&a));
        assert!(a.is_adjacent(&b));
        assert!(!a.is_adjacent(&c));
    }

    #[test]
    fn adjacency_matches_chebyshev_radius() {
        let origin = ZoneCoord { x: 0, z: 0 };
        for dx in -3..=3 {
            for dz in -3..=3 {
                let z = ZoneCoord { x: dx, z: dz };
                let expected = dx.abs().max(dz.abs()) <= INTEREST_RADIUS;
                assert_eq!(origin.is_adjacent(&z), expected, "dx={dx} dz={dz}");
            }
        }
    }
}
