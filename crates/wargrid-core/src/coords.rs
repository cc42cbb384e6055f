//! Grid coordinate system for the game map.
//!
//! The map is a plain rectangular grid and all ranges (movement, attack,
//! defense, sighting) are measured in Manhattan distance.

use serde::{Deserialize, Serialize};

/// A position on the rectangular map.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Coord {
    /// Column coordinate.
    pub x: i32,
    /// Row coordinate.
    pub y: i32,
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Column-major ordering for deterministic iteration
        (self.x, self.y).cmp(&(other.x, other.y))
    }
}

impl Coord {
    /// Create a new coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another coordinate.
    pub const fn distance(&self, other: &Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Check if this coordinate is within bounds of a rectangular map.
    pub fn in_bounds(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < width && (self.y as u32) < height
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_new() {
        let coord = Coord::new(3, 5);
        assert_eq!(coord.x, 3);
        assert_eq!(coord.y, 5);
    }

    #[test]
    fn test_distance_same_coord() {
        let coord = Coord::new(5, 5);
        assert_eq!(coord.distance(&coord), 0);
    }

    #[test]
    fn test_distance_diagonal() {
        assert_eq!(Coord::new(1, 1).distance(&Coord::new(2, 2)), 2);
        assert_eq!(Coord::new(2, 4).distance(&Coord::new(3, 4)), 1);
        assert_eq!(Coord::new(2, 4).distance(&Coord::new(2, 5)), 1);
    }

    #[test]
    fn test_distance_symmetry() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let a = Coord::new(rng.gen_range(-50..50), rng.gen_range(-50..50));
            let b = Coord::new(rng.gen_range(-50..50), rng.gen_range(-50..50));
            assert_eq!(a.distance(&b), b.distance(&a));
        }
    }

    #[test]
    fn test_in_bounds() {
        let coord = Coord::new(5, 5);
        assert!(coord.in_bounds(10, 10));
        assert!(!coord.in_bounds(5, 5));
        assert!(!Coord::new(-1, 0).in_bounds(10, 10));
    }

    #[test]
    fn test_display() {
        let coord = Coord::new(3, 7);
        assert_eq!(format!("{}", coord), "(3, 7)");
    }

    #[test]
    fn test_serialization() {
        let coord = Coord::new(2, 4);
        let json = serde_json::to_string(&coord).unwrap();
        assert_eq!(json, r#"{"x":2,"y":4}"#);
        let restored: Coord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, coord);
    }
}
