//! Static arena and waystone registry
//!
//! Arenas mark where the guardian spawns; waystones are the blocks players
//! right-click to travel there. Both sets are fixed at world load.

use hashbrown::HashMap;

use crate::util::pos::BlockPos;

/// Arena identifier (compass direction in the shipped layout)
pub type ArenaId = String;

/// Center of a guardian arena
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    pub id: ArenaId,
    pub center: BlockPos,
}

/// A waystone block and the arena it feeds into.
/// `dest: None` marks an exit-only waystone with no entry semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct Waystone {
    pub pos: BlockPos,
    pub dest: Option<ArenaId>,
}

/// Immutable lookup tables for arenas and waystones
#[derive(Debug, Clone)]
pub struct ArenaRegistry {
    arenas: HashMap<ArenaId, Arena>,
    waystones: Vec<Waystone>,
}

impl ArenaRegistry {
    pub fn new(arenas: Vec<Arena>, waystones: Vec<Waystone>) -> Self {
        Self {
            arenas: arenas.into_iter().map(|a| (a.id.clone(), a)).collect(),
            waystones,
        }
    }

    /// The shipped end-dimension layout: eight compass arenas at ±10000 and
    /// a waystone roughly halfway out toward each one.
    pub fn default_layout() -> Self {
        let arenas = vec![
            Arena { id: "n".into(), center: BlockPos::new(0, 110, -10000) },
            Arena { id: "ne".into(), center: BlockPos::new(10000, 96, -10000) },
            Arena { id: "e".into(), center: BlockPos::new(10000, 95, 0) },
            Arena { id: "se".into(), center: BlockPos::new(10000, 95, 10000) },
            Arena { id: "s".into(), center: BlockPos::new(0, 96, 10000) },
            Arena { id: "sw".into(), center: BlockPos::new(-10000, 96, 10000) },
            Arena { id: "w".into(), center: BlockPos::new(-10000, 96, 0) },
            Arena { id: "nw".into(), center: BlockPos::new(-10000, 96, -10000) },
        ];
        let waystones = vec![
            Waystone { pos: BlockPos::new(-25, 110, -4969), dest: Some("n".into()) },
            Waystone { pos: BlockPos::new(4983, 110, -4984), dest: Some("ne".into()) },
            Waystone { pos: BlockPos::new(4983, 110, 7), dest: Some("e".into()) },
            Waystone { pos: BlockPos::new(4983, 110, 4984), dest: Some("se".into()) },
            Waystone { pos: BlockPos::new(7, 110, 4984), dest: Some("s".into()) },
            Waystone { pos: BlockPos::new(-4983, 64, 4983), dest: Some("sw".into()) },
            Waystone { pos: BlockPos::new(-4968, 110, 7), dest: Some("w".into()) },
            Waystone { pos: BlockPos::new(-4984, 110, -4985), dest: Some("nw".into()) },
        ];
        Self::new(arenas, waystones)
    }

    /// Look up an arena by id
    pub fn arena(&self, id: &str) -> Option<&Arena> {
        self.arenas.get(id)
    }

    /// All registered arena ids
    pub fn arena_ids(&self) -> impl Iterator<Item = &str> {
        self.arenas.keys().map(String::as_str)
    }

    /// The waystone feeding a given arena, if any
    pub fn waystone_for(&self, dest: &str) -> Option<&Waystone> {
        self.waystones
            .iter()
            .find(|w| w.dest.as_deref() == Some(dest))
    }

    /// First waystone within box range of a position
    pub fn nearby_waystone(&self, pos: BlockPos, range: i32) -> Option<&Waystone> {
        self.waystones.iter().find(|w| w.pos.is_in_range(pos, range))
    }

    /// Circular arena containment test; y is ignored, unknown arenas fail
    pub fn contains(&self, pos: BlockPos, arena_id: &str, radius: i32) -> bool {
        let Some(arena) = self.arenas.get(arena_id) else {
            return false;
        };
        let radius = radius as i64;
        pos.horizontal_dist_sq(arena.center) <= radius * radius
    }

    pub fn arena_count(&self) -> usize {
        self.arenas.len()
    }
}
