//! In-memory host implementation
//!
//! Backs the demo binary and the integration-style tests. Records every
//! command and message the engine emits, keeps the persisted stores in plain
//! maps and hands scheduled timers back on demand.

use hashbrown::{HashMap, HashSet};

use crate::host::{
    ChatMessage, HostError, HostPort, OnlinePlayer, PlayerId, TimerId,
};
use crate::util::pos::BlockPos;

/// In-memory [`HostPort`] with a settable clock and tick cursor
#[derive(Debug, Default)]
pub struct MemoryHost {
    /// Current server tick
    pub tick: u64,
    /// Current wall-clock time, seconds since epoch
    pub epoch_secs: u64,
    /// Online players
    pub players: Vec<OnlinePlayer>,
    /// Every command executed, in order
    pub commands: Vec<String>,
    /// Every chat message sent, in order
    pub messages: Vec<(PlayerId, ChatMessage)>,
    /// Players the identity service reports as admins
    pub admins: HashSet<PlayerId>,
    /// Simulate an identity-service outage
    pub fail_admin_lookup: bool,
    timers: Vec<(u64, TimerId)>,
    world_ints: HashMap<String, i64>,
    player_data: HashMap<(PlayerId, String), serde_json::Value>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an online player and return its id
    pub fn add_player(&mut self, name: &str, pos: BlockPos, dimension: &str) -> PlayerId {
        let id = PlayerId::new_v4();
        self.players.push(OnlinePlayer {
            id,
            name: name.to_string(),
            pos,
            dimension: dimension.to_string(),
        });
        id
    }

    /// Mutable access to an online player by id
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut OnlinePlayer> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Advance the tick cursor and drain every timer due at or before it,
    /// in scheduling order
    pub fn advance_to(&mut self, tick: u64) -> Vec<TimerId> {
        self.tick = tick;
        let mut due: Vec<(u64, TimerId)> = Vec::new();
        self.timers.retain(|&(at, timer)| {
            if at <= tick {
                due.push((at, timer));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(at, _)| at);
        due.into_iter().map(|(_, timer)| timer).collect()
    }

    /// Number of timers still scheduled
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Messages sent to one player, text only
    pub fn messages_for(&self, player: PlayerId) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(id, _)| *id == player)
            .map(|(_, msg)| msg.text.as_str())
            .collect()
    }

    /// Commands containing `needle`
    pub fn commands_containing(&self, needle: &str) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|cmd| cmd.contains(needle))
            .map(String::as_str)
            .collect()
    }
}

impl HostPort for MemoryHost {
    fn now_epoch_secs(&self) -> u64 {
        self.epoch_secs
    }

    fn online_players(&self) -> Vec<OnlinePlayer> {
        self.players.clone()
    }

    fn run_command(&mut self, command: &str) {
        self.commands.push(command.to_string());
    }

    fn send_message(&mut self, player: PlayerId, message: ChatMessage) {
        self.messages.push((player, message));
    }

    fn schedule_ticks(&mut self, delay: u32, timer: TimerId) {
        self.timers.push((self.tick + delay as u64, timer));
    }

    fn get_world_int(&self, key: &str) -> Option<i64> {
        self.world_ints.get(key).copied()
    }

    fn put_world_int(&mut self, key: &str, value: i64) {
        self.world_ints.insert(key.to_string(), value);
    }

    fn remove_world_key(&mut self, key: &str) {
        self.world_ints.remove(key);
    }

    fn get_player_data(&self, player: PlayerId, key: &str) -> Option<serde_json::Value> {
        self.player_data.get(&(player, key.to_string())).cloned()
    }

    fn put_player_data(&mut self, player: PlayerId, key: &str, value: serde_json::Value) {
        self.player_data.insert((player, key.to_string()), value);
    }

    fn remove_player_data(&mut self, player: PlayerId, key: &str) {
        self.player_data.remove(&(player, key.to_string()));
    }

    fn check_admin(&mut self, player: PlayerId) -> Result<bool, HostError> {
        if self.fail_admin_lookup {
            return Err(HostError("identity service unavailable".to_string()));
        }
        Ok(self.admins.contains(&player))
    }
}
