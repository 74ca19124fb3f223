use serde::{Deserialize, Serialize};

/// Width of a chunk along x and z
const CHUNK_SIZE: i32 = 16;

/// Integer block position in world space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Box proximity test: true iff every axis delta is within `range`
    /// (inclusive). Chebyshev-style, not Euclidean.
    #[inline]
    pub fn is_in_range(&self, other: BlockPos, range: i32) -> bool {
        (self.x - other.x).abs() <= range
            && (self.y - other.y).abs() <= range
            && (self.z - other.z).abs() <= range
    }

    /// Squared horizontal (x,z) distance; y is ignored.
    /// Widened to i64 so arena-scale coordinates cannot overflow.
    #[inline]
    pub fn horizontal_dist_sq(&self, other: BlockPos) -> i64 {
        let dx = self.x as i64 - other.x as i64;
        let dz = self.z as i64 - other.z as i64;
        dx * dx + dz * dz
    }

    /// Chunk coordinates containing this position (floor division, so
    /// negative coordinates land in the correct chunk).
    #[inline]
    pub fn chunk(&self) -> (i32, i32) {
        (self.x.div_euclid(CHUNK_SIZE), self.z.div_euclid(CHUNK_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_inclusive_boundary() {
        let a = BlockPos::new(0, 0, 0);
        assert!(a.is_in_range(BlockPos::new(8, 0, 0), 8));
        assert!(a.is_in_range(BlockPos::new(-8, 8, -8), 8));
        assert!(!a.is_in_range(BlockPos::new(9, 0, 0), 8));
        assert!(!a.is_in_range(BlockPos::new(0, -9, 0), 8));
    }

    #[test]
    fn test_in_range_requires_all_axes() {
        let a = BlockPos::new(10, 10, 10);
        // Two axes inside, one outside
        assert!(!a.is_in_range(BlockPos::new(11, 12, 30), 8));
    }

    #[test]
    fn test_horizontal_dist_ignores_y() {
        let a = BlockPos::new(0, 0, 0);
        let b = BlockPos::new(3, 500, 4);
        assert_eq!(a.horizontal_dist_sq(b), 25);
    }

    #[test]
    fn test_horizontal_dist_symmetric() {
        let a = BlockPos::new(-10000, 96, -10000);
        let b = BlockPos::new(-9700, 64, -9600);
        assert_eq!(a.horizontal_dist_sq(b), b.horizontal_dist_sq(a));
    }

    #[test]
    fn test_horizontal_dist_reflection_symmetry() {
        let center = BlockPos::new(0, 0, 0);
        let p = BlockPos::new(120, 0, -340);
        let reflected = BlockPos::new(-120, 0, 340);
        assert_eq!(
            center.horizontal_dist_sq(p),
            center.horizontal_dist_sq(reflected)
        );
    }

    #[test]
    fn test_chunk_positive() {
        assert_eq!(BlockPos::new(0, 64, 0).chunk(), (0, 0));
        assert_eq!(BlockPos::new(15, 64, 31).chunk(), (0, 1));
        assert_eq!(BlockPos::new(16, 64, 16).chunk(), (1, 1));
    }

    #[test]
    fn test_chunk_negative_floors() {
        assert_eq!(BlockPos::new(-1, 64, -16).chunk(), (-1, -1));
        assert_eq!(BlockPos::new(-17, 64, -1).chunk(), (-2, -1));
        assert_eq!(BlockPos::new(-10000, 96, -10000).chunk(), (-625, -625));
    }

    #[test]
    fn test_no_overflow_at_arena_scale() {
        let a = BlockPos::new(i32::MAX / 2, 0, i32::MAX / 2);
        let b = BlockPos::new(i32::MIN / 2, 0, i32::MIN / 2);
        // Must not panic in debug builds
        let _ = a.horizontal_dist_sq(b);
    }
}
