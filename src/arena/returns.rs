//! Per-player return tracking
//!
//! A player teleported into an arena gets a persisted [`ReturnRecord`] with
//! the arena id and their pre-teleport position. Its presence is the sole
//! signal that the player is "in an arena" and must be monitored; it is
//! cleared exactly once, by the exit waystone or by the tick monitor.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::arena::registry::ArenaId;
use crate::host::{HostPort, PlayerId};
use crate::util::pos::BlockPos;

/// Per-player persisted key for the return record
pub const RETURN_KEY: &str = "chaos_arena_return";

/// Where a player came from and which arena they are in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRecord {
    pub arena: ArenaId,
    pub pos: BlockPos,
}

/// Read/write access to the persisted per-player return records
#[derive(Debug, Clone, Default)]
pub struct ReturnTracker;

impl ReturnTracker {
    pub fn set(&self, host: &mut dyn HostPort, player: PlayerId, record: ReturnRecord) {
        match serde_json::to_value(&record) {
            Ok(value) => host.put_player_data(player, RETURN_KEY, value),
            Err(err) => warn!(%player, %err, "failed to serialize return record"),
        }
    }

    pub fn get(&self, host: &dyn HostPort, player: PlayerId) -> Option<ReturnRecord> {
        let value = host.get_player_data(player, RETURN_KEY)?;
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(%player, %err, "discarding malformed return record");
                None
            }
        }
    }

    pub fn clear(&self, host: &mut dyn HostPort, player: PlayerId) {
        host.remove_player_data(player, RETURN_KEY);
    }
}
