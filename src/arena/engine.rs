//! Waystone interaction state machine and tick monitor
//!
//! Right-clicking a waystone validates the attempt (dimension, proximity,
//! debounce, cooldown), then runs a multi-step sequence: lock the cooldown,
//! forceload the destination chunk, respawn the guardian, sample the players
//! standing at the waystone, count down, teleport the sampled set and record
//! where each player came from. Delayed steps go through the host scheduler
//! as explicit timers; `on_timer_fired` is the single re-entry point.
//!
//! The tick monitor reconciles return records against live positions every
//! 20 ticks and force-exits anyone who left the arena by other means.

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::arena::cooldown::CooldownStore;
use crate::arena::registry::{Arena, ArenaId, ArenaRegistry, Waystone};
use crate::arena::returns::{ReturnRecord, ReturnTracker};
use crate::config::{ArenaConfig, WaystoneMode, TICKS_PER_SECOND};
use crate::host::{
    ChatMessage, HostPort, OnlinePlayer, PlayerId, TickEvent, TimerId, WaystoneClickEvent,
};
use crate::util::pos::BlockPos;

/// Movement/placement override permissions granted for the arena visit
pub const BYPASS_PERMISSIONS: [&str; 2] =
    ["chunkyborder.bypass.move", "chunkyborder.bypass.place"];

/// Duration of the temporary permission grant (one-way mode)
const BYPASS_DURATION: &str = "1h";

/// Toggle command for the override in bidirectional mode
const BYPASS_TOGGLE_COMMAND: &str = "chunkyborder bypass";

/// Delay between teleport and the return-record write (one-way mode)
const RETURN_RECORD_DELAY_TICKS: u32 = 100;

/// Trailing delay before the forceloaded chunk is released (seconds)
const CHUNK_RELEASE_DELAY_SECS: u32 = 30;

/// Minimum ticks between monitor sweeps
const SWEEP_INTERVAL_TICKS: u64 = 20;

/// Why a waystone interaction was rejected. The first three variants are
/// reported to the player in red chat; the rest abort silently.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("This waystone only works in The End dimension!")]
    WrongDimension,
    #[error("No waystone found nearby!")]
    NoWaystoneNearby,
    #[error("This arena is on cooldown for {0} more day(s)!")]
    OnCooldown(i64),
    #[error("retriggered within the debounce window")]
    Debounced,
    #[error("waystone has no destination arena")]
    NotAnEntry,
    #[error("waystone points at unknown arena {0}")]
    UnknownArena(ArenaId),
}

impl Rejection {
    /// Whether the player should see this rejection in chat
    fn player_visible(&self) -> bool {
        matches!(
            self,
            Rejection::WrongDimension | Rejection::NoWaystoneNearby | Rejection::OnCooldown(_)
        )
    }
}

/// Handle for one in-flight activation sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ActivationId(u64);

/// Next step of an in-flight activation, keyed by pending timer
#[derive(Debug, Clone)]
enum TimerAction {
    /// Notify the sampled players of the remaining countdown seconds
    Countdown { remaining: u32 },
    /// Teleport the sampled players and grant overrides
    Teleport,
    /// Write the delayed return records (one-way mode)
    RecordReturns,
    /// Release the forceloaded destination chunk and retire the activation
    ReleaseChunk,
}

/// One activation sequence in flight
#[derive(Debug)]
struct Activation {
    arena: ArenaId,
    center: BlockPos,
    chunk: (i32, i32),
    /// Players sampled at activation time; fixed before the countdown starts
    players: SmallVec<[OnlinePlayer; 4]>,
    /// Pre-teleport origins, captured at the teleport step
    origins: Vec<(PlayerId, BlockPos)>,
}

/// The arena automation engine: one instance per world load
pub struct CoreEngine {
    config: ArenaConfig,
    registry: ArenaRegistry,
    cooldowns: CooldownStore,
    returns: ReturnTracker,
    /// Player -> debounce expiry (epoch seconds); in-memory only
    debounce: HashMap<PlayerId, u64>,
    activations: HashMap<ActivationId, Activation>,
    pending: HashMap<TimerId, (ActivationId, TimerAction)>,
    next_timer: u64,
    next_activation: u64,
    next_sweep_tick: u64,
}

impl CoreEngine {
    pub fn new(config: ArenaConfig, registry: ArenaRegistry) -> Self {
        let cooldowns = CooldownStore::new(config.cooldown_days);
        Self {
            config,
            registry,
            cooldowns,
            returns: ReturnTracker,
            debounce: HashMap::new(),
            activations: HashMap::new(),
            pending: HashMap::new(),
            next_timer: 0,
            next_activation: 0,
            next_sweep_tick: 0,
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn registry(&self) -> &ArenaRegistry {
        &self.registry
    }

    pub fn cooldowns(&self) -> &CooldownStore {
        &self.cooldowns
    }

    pub fn returns(&self) -> &ReturnTracker {
        &self.returns
    }

    /// Number of activation sequences currently in flight
    pub fn in_flight(&self) -> usize {
        self.activations.len()
    }

    /// Block right-click entry point
    pub fn on_waystone_clicked(&mut self, host: &mut dyn HostPort, event: &WaystoneClickEvent) {
        if let Err(rejection) = self.try_activate(host, event) {
            debug!(
                player = %event.player.name,
                %rejection,
                "waystone interaction rejected"
            );
            if rejection.player_visible() {
                host.send_message(event.player.id, ChatMessage::red(rejection.to_string()));
            }
        }
    }

    /// Validation order: dimension, proximity, debounce (one-way), cooldown.
    /// Nothing but the debounce map mutates on rejection.
    fn try_activate(
        &mut self,
        host: &mut dyn HostPort,
        event: &WaystoneClickEvent,
    ) -> Result<(), Rejection> {
        if event.dimension != self.config.dimension {
            return Err(Rejection::WrongDimension);
        }

        let waystone = self
            .registry
            .nearby_waystone(event.block_pos, self.config.waystone_range)
            .cloned()
            .ok_or(Rejection::NoWaystoneNearby)?;

        // Bidirectional mode: a tracked player clicking any waystone is
        // leaving, not entering.
        if self.config.mode == WaystoneMode::Bidirectional {
            if let Some(record) = self.returns.get(host, event.player.id) {
                self.exit_via_waystone(host, &event.player, &record);
                return Ok(());
            }
        }

        if self.config.mode == WaystoneMode::OneWay {
            let now = host.now_epoch_secs();
            let expiry = self
                .debounce
                .insert(event.player.id, now + self.config.debounce_secs)
                .unwrap_or(0);
            if now < expiry {
                return Err(Rejection::Debounced);
            }
        }

        let dest = waystone.dest.clone().ok_or(Rejection::NotAnEntry)?;
        let arena = self
            .registry
            .arena(&dest)
            .cloned()
            .ok_or_else(|| Rejection::UnknownArena(dest.clone()))?;

        let today = CooldownStore::day_of(host.now_epoch_secs());
        let days_left = self.cooldowns.days_remaining(host, &dest, today);
        if days_left > 0 {
            return Err(Rejection::OnCooldown(days_left));
        }

        self.begin_activation(host, &waystone, &arena, today);
        Ok(())
    }

    fn begin_activation(
        &mut self,
        host: &mut dyn HostPort,
        waystone: &Waystone,
        arena: &Arena,
        today: i64,
    ) {
        info!(arena = %arena.id, "activating arena waystone");

        // Locking the cooldown first blocks concurrent re-triggering while
        // the countdown is in flight.
        self.cooldowns.mark_used(host, &arena.id, today);

        let chunk = arena.center.chunk();
        host.run_command(&format!(
            "execute in {} run forceload add {} {}",
            self.config.dimension, chunk.0, chunk.1
        ));
        host.run_command(&format!(
            "execute positioned {} {} {} in {} run respawn_draconic_guardian",
            arena.center.x, arena.center.y, arena.center.z, self.config.dimension
        ));

        // Point-in-time sample: players arriving during the countdown are
        // not included.
        let players: SmallVec<[OnlinePlayer; 4]> = host
            .online_players()
            .into_iter()
            .filter(|p| {
                p.dimension == self.config.dimension
                    && waystone.pos.is_in_range(p.pos, self.config.waystone_range)
            })
            .collect();

        let seconds = self.config.countdown_secs;
        for player in &players {
            host.send_message(player.id, ChatMessage::gold("The Chaos Guardian stirs..."));
            host.send_message(
                player.id,
                ChatMessage::yellow(format!("Teleporting to the arena in {} second(s)!", seconds)),
            );
        }

        let id = ActivationId(self.next_activation);
        self.next_activation += 1;
        self.activations.insert(
            id,
            Activation {
                arena: arena.id.clone(),
                center: arena.center,
                chunk,
                players,
                origins: Vec::new(),
            },
        );

        for elapsed in 1..seconds {
            self.schedule(
                host,
                elapsed * TICKS_PER_SECOND,
                id,
                TimerAction::Countdown { remaining: seconds - elapsed },
            );
        }
        self.schedule(host, seconds * TICKS_PER_SECOND, id, TimerAction::Teleport);
        self.schedule(
            host,
            (seconds + CHUNK_RELEASE_DELAY_SECS) * TICKS_PER_SECOND,
            id,
            TimerAction::ReleaseChunk,
        );
    }

    fn schedule(
        &mut self,
        host: &mut dyn HostPort,
        delay_ticks: u32,
        activation: ActivationId,
        action: TimerAction,
    ) {
        let timer = TimerId(self.next_timer);
        self.next_timer += 1;
        self.pending.insert(timer, (activation, action));
        host.schedule_ticks(delay_ticks, timer);
    }

    /// Scheduler callback entry point. Timers are never cancelled; firing
    /// against a retired activation is a no-op.
    pub fn on_timer_fired(&mut self, host: &mut dyn HostPort, timer: TimerId) {
        let Some((activation_id, action)) = self.pending.remove(&timer) else {
            debug!(?timer, "ignoring unknown timer");
            return;
        };

        match action {
            TimerAction::Countdown { remaining } => {
                if let Some(activation) = self.activations.get(&activation_id) {
                    for player in &activation.players {
                        host.send_message(
                            player.id,
                            ChatMessage::yellow(format!(
                                "Teleporting to the arena in {} second(s)!",
                                remaining
                            )),
                        );
                    }
                }
            }
            TimerAction::Teleport => self.teleport_sampled(host, activation_id),
            TimerAction::RecordReturns => {
                if let Some(activation) = self.activations.get(&activation_id) {
                    for (player, origin) in &activation.origins {
                        self.returns.set(
                            host,
                            *player,
                            ReturnRecord { arena: activation.arena.clone(), pos: *origin },
                        );
                    }
                }
            }
            TimerAction::ReleaseChunk => {
                if let Some(activation) = self.activations.remove(&activation_id) {
                    host.run_command(&format!(
                        "execute in {} run forceload remove {} {}",
                        self.config.dimension, activation.chunk.0, activation.chunk.1
                    ));
                }
            }
        }
    }

    fn teleport_sampled(&mut self, host: &mut dyn HostPort, activation_id: ActivationId) {
        let (arena, center, sampled) = {
            let Some(activation) = self.activations.get(&activation_id) else {
                return;
            };
            (activation.arena.clone(), activation.center, activation.players.clone())
        };

        let online = host.online_players();
        let mut origins: Vec<(PlayerId, BlockPos)> = Vec::with_capacity(sampled.len());

        for player in &sampled {
            // Pre-teleport position comes from the live list; the sample
            // only fixes membership.
            let Some(current) = online.iter().find(|p| p.id == player.id) else {
                debug!(player = %player.name, "sampled player went offline before teleport");
                continue;
            };

            info!(arena = %arena, player = %current.name, "entering arena");
            match self.config.mode {
                WaystoneMode::OneWay => {
                    for permission in BYPASS_PERMISSIONS {
                        host.run_command(&format!(
                            "lp user {} permission settemp {} true {} replace",
                            current.name, permission, BYPASS_DURATION
                        ));
                    }
                }
                WaystoneMode::Bidirectional => {
                    host.run_command(&format!("{} {}", BYPASS_TOGGLE_COMMAND, current.name));
                }
            }
            host.run_command(&format!(
                "execute in {} run tp {} {} {} {}",
                self.config.dimension, current.name, center.x, center.y, center.z
            ));
            origins.push((current.id, current.pos));
        }

        match self.config.mode {
            WaystoneMode::OneWay => {
                if let Some(activation) = self.activations.get_mut(&activation_id) {
                    activation.origins = origins;
                }
                self.schedule(host, RETURN_RECORD_DELAY_TICKS, activation_id, TimerAction::RecordReturns);
            }
            WaystoneMode::Bidirectional => {
                for (player, origin) in origins {
                    self.returns.set(
                        host,
                        player,
                        ReturnRecord { arena: arena.clone(), pos: origin },
                    );
                }
            }
        }
    }

    /// Manual exit path (bidirectional mode): send the player back to their
    /// recorded origin and drop the tracking state.
    fn exit_via_waystone(
        &mut self,
        host: &mut dyn HostPort,
        player: &OnlinePlayer,
        record: &ReturnRecord,
    ) {
        info!(arena = %record.arena, player = %player.name, "leaving arena via waystone");
        host.run_command(&format!(
            "execute in {} run tp {} {} {} {}",
            self.config.dimension, player.name, record.pos.x, record.pos.y, record.pos.z
        ));
        self.revoke_bypass(host, &player.name);
        self.returns.clear(host, player.id);
        host.send_message(player.id, ChatMessage::green("Returned to where you came from."));
    }

    fn revoke_bypass(&self, host: &mut dyn HostPort, name: &str) {
        match self.config.mode {
            WaystoneMode::OneWay => {
                for permission in BYPASS_PERMISSIONS {
                    host.run_command(&format!(
                        "lp user {} permission unsettemp {}",
                        name, permission
                    ));
                }
            }
            WaystoneMode::Bidirectional => {
                host.run_command(&format!("{} {}", BYPASS_TOGGLE_COMMAND, name));
            }
        }
    }

    /// Server tick entry point: at most one sweep every 20 ticks. Any tracked
    /// player found outside their arena (or its dimension) is force-exited:
    /// tracking cleared and override revoked, no teleport back.
    pub fn on_tick(&mut self, host: &mut dyn HostPort, event: &TickEvent) {
        if event.tick < self.next_sweep_tick {
            return;
        }
        self.next_sweep_tick = event.tick + SWEEP_INTERVAL_TICKS;

        for player in &event.players {
            let Some(record) = self.returns.get(host, player.id) else {
                continue;
            };
            if self.registry.arena(&record.arena).is_none() {
                warn!(arena = %record.arena, player = %player.name, "return record for unknown arena, dropping");
                self.returns.clear(host, player.id);
                continue;
            }
            let inside = player.dimension == self.config.dimension
                && self
                    .registry
                    .contains(player.pos, &record.arena, self.config.arena_radius);
            if !inside {
                info!(arena = %record.arena, player = %player.name, "exiting arena");
                self.returns.clear(host, player.id);
                self.revoke_bypass(host, &player.name);
            }
        }
    }
}
