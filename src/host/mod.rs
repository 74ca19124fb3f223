//! Host-facing surface
//!
//! The engine never talks to the game server directly; everything it needs
//! from the host environment (world mutation, chat, scheduling, persistence,
//! identity lookups) goes through the [`HostPort`] trait, and everything the
//! host feeds in arrives as an explicit event record.

pub mod memory;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::pos::BlockPos;

/// Unique player identifier
pub type PlayerId = Uuid;

/// A player currently connected to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnlinePlayer {
    pub id: PlayerId,
    pub name: String,
    pub pos: BlockPos,
    pub dimension: String,
}

/// Block right-click event delivered by the host adapter
#[derive(Debug, Clone)]
pub struct WaystoneClickEvent {
    /// Position of the clicked block
    pub block_pos: BlockPos,
    /// Player who clicked
    pub player: OnlinePlayer,
    /// Dimension the clicked block is in
    pub dimension: String,
}

/// Server tick event delivered by the host adapter
#[derive(Debug, Clone)]
pub struct TickEvent {
    /// Monotonic server tick counter
    pub tick: u64,
    /// All currently online players
    pub players: Vec<OnlinePlayer>,
}

/// Handle for a scheduled callback; minted by the engine, passed back by the
/// host when the delay elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Chat colors used for player-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatColor {
    Red,
    Green,
    Gold,
    Yellow,
    Gray,
}

/// A colored chat/system message
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub color: ChatColor,
    pub text: String,
}

impl ChatMessage {
    pub fn red(text: impl Into<String>) -> Self {
        Self { color: ChatColor::Red, text: text.into() }
    }

    pub fn green(text: impl Into<String>) -> Self {
        Self { color: ChatColor::Green, text: text.into() }
    }

    pub fn gold(text: impl Into<String>) -> Self {
        Self { color: ChatColor::Gold, text: text.into() }
    }

    pub fn yellow(text: impl Into<String>) -> Self {
        Self { color: ChatColor::Yellow, text: text.into() }
    }
}

/// Failure from a host-side lookup (e.g. the external identity service)
#[derive(Debug, Clone, thiserror::Error)]
#[error("host lookup failed: {0}")]
pub struct HostError(pub String);

/// Everything the engine needs from the host environment.
///
/// All calls run on the host's single simulation thread; a scheduled timer is
/// delivered back through the engine's `on_timer_fired` on that same thread.
pub trait HostPort {
    /// Current wall-clock time, seconds since epoch
    fn now_epoch_secs(&self) -> u64;

    /// Snapshot of all online players
    fn online_players(&self) -> Vec<OnlinePlayer>;

    /// Execute a raw server command (opaque to the engine)
    fn run_command(&mut self, command: &str);

    /// Send a colored chat message to one player
    fn send_message(&mut self, player: PlayerId, message: ChatMessage);

    /// Invoke the engine's timer entry point after `delay` ticks
    fn schedule_ticks(&mut self, delay: u32, timer: TimerId);

    /// World-scoped persisted integer, `None` if unset
    fn get_world_int(&self, key: &str) -> Option<i64>;

    /// Store a world-scoped persisted integer
    fn put_world_int(&mut self, key: &str, value: i64);

    /// Remove a world-scoped persisted entry
    fn remove_world_key(&mut self, key: &str);

    /// Per-player persisted structured record, `None` if unset
    fn get_player_data(&self, player: PlayerId, key: &str) -> Option<serde_json::Value>;

    /// Store a per-player persisted structured record
    fn put_player_data(&mut self, player: PlayerId, key: &str, value: serde_json::Value);

    /// Remove a per-player persisted entry
    fn remove_player_data(&mut self, player: PlayerId, key: &str);

    /// Ask the external identity service whether a player is an admin
    fn check_admin(&mut self, player: PlayerId) -> Result<bool, HostError>;
}
