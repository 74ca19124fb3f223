//! Per-arena activation cooldowns
//!
//! Each arena remembers the epoch day it was last activated, persisted in the
//! world-scoped key/value store under `chaos_arena_cooldown_<id>`. An arena
//! that has never been used reads as day 0, so its first activation is always
//! permitted for any realistic epoch day count.

use crate::arena::registry::ArenaRegistry;
use crate::config::SECONDS_PER_DAY;
use crate::host::HostPort;

/// Namespace prefix for persisted cooldown entries
pub const COOLDOWN_KEY_PREFIX: &str = "chaos_arena_cooldown";

/// Read/write access to the persisted per-arena cooldown counters
#[derive(Debug, Clone)]
pub struct CooldownStore {
    cooldown_days: i64,
}

impl CooldownStore {
    pub fn new(cooldown_days: i64) -> Self {
        Self { cooldown_days }
    }

    /// Epoch day number for a wall-clock timestamp
    pub fn day_of(epoch_secs: u64) -> i64 {
        (epoch_secs / SECONDS_PER_DAY) as i64
    }

    fn key(arena: &str) -> String {
        format!("{}_{}", COOLDOWN_KEY_PREFIX, arena)
    }

    /// Day the arena was last activated, 0 if never
    pub fn last_used_day(&self, host: &dyn HostPort, arena: &str) -> i64 {
        host.get_world_int(&Self::key(arena)).unwrap_or(0)
    }

    /// Record an activation on the given day
    pub fn mark_used(&self, host: &mut dyn HostPort, arena: &str, day: i64) {
        host.put_world_int(&Self::key(arena), day);
    }

    /// Days left before the arena unlocks; activation permitted iff `<= 0`
    pub fn days_remaining(&self, host: &dyn HostPort, arena: &str, today: i64) -> i64 {
        self.cooldown_days - (today - self.last_used_day(host, arena))
    }

    /// Clear the cooldown for one arena
    pub fn clear(&self, host: &mut dyn HostPort, arena: &str) {
        host.remove_world_key(&Self::key(arena));
    }

    /// Clear the cooldowns of every registered arena
    pub fn clear_all(&self, host: &mut dyn HostPort, registry: &ArenaRegistry) {
        let ids: Vec<String> = registry.arena_ids().map(str::to_string).collect();
        for id in ids {
            self.clear(host, &id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryHost;

    #[test]
    fn test_day_of() {
        assert_eq!(CooldownStore::day_of(0), 0);
        assert_eq!(CooldownStore::day_of(86399), 0);
        assert_eq!(CooldownStore::day_of(86400), 1);
        assert_eq!(CooldownStore::day_of(100 * 86400 + 12345), 100);
    }

    #[test]
    fn test_unset_reads_as_day_zero() {
        let host = MemoryHost::new();
        let store = CooldownStore::new(7);
        assert_eq!(store.last_used_day(&host, "nw"), 0);
        // Any realistic epoch day count exceeds the window
        assert!(store.days_remaining(&host, "nw", 20000) <= 0);
    }

    #[test]
    fn test_same_day_retrigger_blocked() {
        let mut host = MemoryHost::new();
        let store = CooldownStore::new(7);

        store.mark_used(&mut host, "nw", 20000);
        assert_eq!(store.days_remaining(&host, "nw", 20000), 7);
        assert!(store.days_remaining(&host, "nw", 20000) > 0);
    }

    #[test]
    fn test_unlocks_exactly_after_window() {
        let mut host = MemoryHost::new();
        let store = CooldownStore::new(7);

        store.mark_used(&mut host, "e", 20000);
        assert_eq!(store.days_remaining(&host, "e", 20006), 1);
        assert_eq!(store.days_remaining(&host, "e", 20007), 0);
        assert!(store.days_remaining(&host, "e", 20007) <= 0);
    }

    #[test]
    fn test_clear_reopens_arena() {
        let mut host = MemoryHost::new();
        let store = CooldownStore::new(7);

        store.mark_used(&mut host, "nw", 100);
        store.clear(&mut host, "nw");
        assert_eq!(store.last_used_day(&host, "nw"), 0);
        assert!(store.days_remaining(&host, "nw", 101) <= 0);
    }

    #[test]
    fn test_clear_all_covers_registry() {
        let mut host = MemoryHost::new();
        let store = CooldownStore::new(7);
        let registry = ArenaRegistry::default_layout();

        for id in ["n", "s", "e", "w"] {
            store.mark_used(&mut host, id, 555);
        }
        store.clear_all(&mut host, &registry);
        for id in ["n", "s", "e", "w"] {
            assert_eq!(store.last_used_day(&host, id), 0);
        }
    }

    #[test]
    fn test_key_namespacing() {
        let mut host = MemoryHost::new();
        let store = CooldownStore::new(7);

        store.mark_used(&mut host, "nw", 42);
        assert_eq!(host.get_world_int("chaos_arena_cooldown_nw"), Some(42));
        assert_eq!(host.get_world_int("chaos_arena_cooldown_n"), None);
    }
}
