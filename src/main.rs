//! Demo driver: runs the arena engine against the in-memory host,
//! simulating a waystone activation and a player wandering out of bounds.

use tracing::{info, Level};

use chaos_arena::arena::engine::CoreEngine;
use chaos_arena::arena::registry::ArenaRegistry;
use chaos_arena::commands::{self, CommandSource};
use chaos_arena::config::ArenaConfig;
use chaos_arena::host::memory::MemoryHost;
use chaos_arena::host::{HostPort, TickEvent, WaystoneClickEvent};
use chaos_arena::util::pos::BlockPos;

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Chaos Arena core v{}", env!("CARGO_PKG_VERSION"));

    let config = ArenaConfig::load_or_default();
    config.validate().map_err(|e| anyhow::anyhow!("invalid config: {e}"))?;
    info!(
        dimension = %config.dimension,
        arena_radius = config.arena_radius,
        cooldown_days = config.cooldown_days,
        "configuration loaded"
    );

    let registry = ArenaRegistry::default_layout();
    let waystone = registry
        .waystone_for("nw")
        .map(|w| w.pos)
        .ok_or_else(|| anyhow::anyhow!("default layout is missing the nw waystone"))?;
    let mut engine = CoreEngine::new(config.clone(), registry);

    let mut host = MemoryHost::new();
    host.epoch_secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let alice = host.add_player("Alice", waystone, &config.dimension);
    host.add_player("Bob", BlockPos::new(waystone.x + 3, waystone.y, waystone.z), &config.dimension);
    host.admins.insert(alice);

    // Alice right-clicks the nw waystone
    let event = WaystoneClickEvent {
        block_pos: waystone,
        player: host.players[0].clone(),
        dimension: config.dimension.clone(),
    };
    engine.on_waystone_clicked(&mut host, &event);

    // Countdown and teleport play out over the first three seconds
    for tick in [20u64, 40, 60] {
        for timer in host.advance_to(tick) {
            engine.on_timer_fired(&mut host, timer);
        }
    }

    // The host would have moved the players; mirror that in the simulation
    let center = BlockPos::new(-10000, 96, -10000);
    for player in &mut host.players {
        player.pos = center;
    }

    // Return-record write and chunk release, with the monitor sweeping along
    for tick in (80u64..=700).step_by(20) {
        for timer in host.advance_to(tick) {
            engine.on_timer_fired(&mut host, timer);
        }
        let tick_event = TickEvent { tick, players: host.online_players() };
        engine.on_tick(&mut host, &tick_event);
    }

    // Alice flies out of the arena; the monitor untracks her
    if let Some(player) = host.player_mut(alice) {
        player.pos = BlockPos::new(0, 110, 0);
    }
    let tick_event = TickEvent { tick: 720, players: host.online_players() };
    engine.on_tick(&mut host, &tick_event);

    // Admin resets the cooldown again through the command surface
    let source = CommandSource { id: alice, name: "Alice".to_string() };
    commands::dispatch(&mut engine, &mut host, &source, &["chaos_arena", "reset", "nw"]);

    info!(
        commands = host.commands.len(),
        messages = host.messages.len(),
        "simulation finished"
    );
    Ok(())
}
