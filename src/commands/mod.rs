//! Admin command surface
//!
//! Thin handlers behind the host's command framework. The host registers the
//! `chaos_arena {reset_all|reset|create|tp}` tree (privilege level 2) and the
//! `sudo {start|stop|spark}` tree, parses arguments, and calls in here; each
//! handler returns the framework's 1/0 success signal.

pub mod sudo;

use tracing::info;

use crate::arena::engine::CoreEngine;
use crate::arena::island;
use crate::host::{ChatMessage, HostPort, PlayerId};

/// Invoker of a command
#[derive(Debug, Clone)]
pub struct CommandSource {
    pub id: PlayerId,
    pub name: String,
}

/// `chaos_arena reset_all`
pub fn reset_all(engine: &CoreEngine, host: &mut dyn HostPort, source: &CommandSource) -> i32 {
    engine.cooldowns().clear_all(host, engine.registry());
    host.send_message(source.id, ChatMessage::green("Reset cooldowns for all arenas"));
    1
}

/// `chaos_arena reset <arena>`
pub fn reset(
    engine: &CoreEngine,
    host: &mut dyn HostPort,
    source: &CommandSource,
    arena: &str,
) -> i32 {
    engine.cooldowns().clear(host, arena);
    host.send_message(
        source.id,
        ChatMessage::green(format!("Reset cooldown for arena: {}", arena)),
    );
    1
}

/// `chaos_arena create <arena>`: generate the island around the arena's
/// waystone
pub fn create(
    engine: &CoreEngine,
    host: &mut dyn HostPort,
    source: &CommandSource,
    arena: &str,
) -> i32 {
    let Some(waystone) = engine.registry().waystone_for(arena) else {
        host.send_message(
            source.id,
            ChatMessage::red(format!("Waystone not found for arena: {}", arena)),
        );
        return 0;
    };
    info!(arena, "creating island for waystone");
    let pos = waystone.pos;
    island::generate(host, engine.config(), pos);
    host.send_message(
        source.id,
        ChatMessage::green(format!("Generated island for waystone: {}", arena)),
    );
    1
}

/// `chaos_arena tp <arena>`: teleport the invoker to the arena's waystone
pub fn teleport(
    engine: &CoreEngine,
    host: &mut dyn HostPort,
    source: &CommandSource,
    arena: &str,
) -> i32 {
    let Some(waystone) = engine.registry().waystone_for(arena) else {
        host.send_message(
            source.id,
            ChatMessage::red(format!("Waystone not found for arena: {}", arena)),
        );
        return 0;
    };
    let pos = waystone.pos;
    host.run_command(&format!(
        "execute in {} run tp {} {} {} {}",
        engine.config().dimension,
        source.name,
        pos.x,
        pos.y,
        pos.z
    ));
    host.send_message(
        source.id,
        ChatMessage::green(format!("Teleported to waystone for arena: {}", arena)),
    );
    1
}

/// Dispatch a parsed command line against the registered trees. Mirrors the
/// command layout the host adapter registers; unknown shapes return 0.
pub fn dispatch(
    engine: &mut CoreEngine,
    host: &mut dyn HostPort,
    source: &CommandSource,
    args: &[&str],
) -> i32 {
    match args {
        ["chaos_arena", "reset_all"] => reset_all(engine, host, source),
        ["chaos_arena", "reset", arena] => reset(engine, host, source, arena),
        ["chaos_arena", "create", arena] => create(engine, host, source, arena),
        ["chaos_arena", "tp", arena] => teleport(engine, host, source, arena),
        ["sudo", "start"] => sudo::start(host, source),
        ["sudo", "stop"] => sudo::stop(host, source),
        ["sudo", "spark"] => sudo::spark(host, source, sudo::DEFAULT_SPARK_THRESHOLD_TICKS),
        ["sudo", "spark", ticks] => match ticks.parse::<i32>() {
            Ok(ticks) => sudo::spark(host, source, ticks),
            Err(_) => 0,
        },
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::cooldown::CooldownStore;
    use crate::arena::registry::ArenaRegistry;
    use crate::config::ArenaConfig;
    use crate::host::memory::MemoryHost;
    use crate::host::WaystoneClickEvent;
    use crate::util::pos::BlockPos;

    const END: &str = "minecraft:the_end";

    fn setup() -> (CoreEngine, MemoryHost, CommandSource) {
        let engine = CoreEngine::new(ArenaConfig::default(), ArenaRegistry::default_layout());
        let mut host = MemoryHost::new();
        let id = host.add_player("Admin", BlockPos::new(0, 64, 0), "minecraft:overworld");
        let source = CommandSource { id, name: "Admin".to_string() };
        (engine, host, source)
    }

    #[test]
    fn test_reset_all_clears_every_arena() {
        let (engine, mut host, source) = setup();
        let store = CooldownStore::new(7);
        for id in ["n", "ne", "e", "se", "s", "sw", "w", "nw"] {
            store.mark_used(&mut host, id, 500);
        }

        assert_eq!(reset_all(&engine, &mut host, &source), 1);

        for id in ["n", "ne", "e", "se", "s", "sw", "w", "nw"] {
            assert_eq!(store.last_used_day(&host, id), 0);
        }
        assert!(host
            .messages_for(source.id)
            .contains(&"Reset cooldowns for all arenas"));
    }

    #[test]
    fn test_reset_then_next_day_interaction_succeeds() {
        // Arena `nw` on cooldown since day 100; reset reopens it on day 101
        let (mut engine, mut host, source) = setup();
        engine.cooldowns().mark_used(&mut host, "nw", 100);
        host.epoch_secs = 101 * 86400;

        assert_eq!(reset(&engine, &mut host, &source, "nw"), 1);
        assert!(host
            .messages_for(source.id)
            .contains(&"Reset cooldown for arena: nw"));

        let waystone = engine.registry().waystone_for("nw").unwrap().pos;
        let alice = host.add_player("Alice", waystone, END);
        let event = WaystoneClickEvent {
            block_pos: waystone,
            player: host.player_mut(alice).unwrap().clone(),
            dimension: END.to_string(),
        };
        engine.on_waystone_clicked(&mut host, &event);

        assert_eq!(engine.cooldowns().last_used_day(&host, "nw"), 101);
        assert_eq!(engine.in_flight(), 1);
    }

    #[test]
    fn test_create_unknown_arena_fails() {
        let (engine, mut host, source) = setup();

        assert_eq!(create(&engine, &mut host, &source, "center"), 0);
        assert!(host
            .messages_for(source.id)
            .contains(&"Waystone not found for arena: center"));
        assert!(host.commands.is_empty());
    }

    #[test]
    fn test_create_generates_island_at_waystone() {
        let (engine, mut host, source) = setup();

        assert_eq!(create(&engine, &mut host, &source, "nw"), 1);

        assert!(!host.commands_containing("setblock").is_empty());
        assert_eq!(
            host.commands_containing("setblock -4984 111 -4985 chaos_arena:waystone").len(),
            1
        );
        assert!(host
            .messages_for(source.id)
            .contains(&"Generated island for waystone: nw"));
    }

    #[test]
    fn test_teleport_to_waystone() {
        let (engine, mut host, source) = setup();

        assert_eq!(teleport(&engine, &mut host, &source, "e"), 1);
        assert_eq!(
            host.commands,
            vec!["execute in minecraft:the_end run tp Admin 4983 110 7".to_string()]
        );
    }

    #[test]
    fn test_teleport_unknown_arena_fails() {
        let (engine, mut host, source) = setup();
        assert_eq!(teleport(&engine, &mut host, &source, "nope"), 0);
        assert!(host.commands.is_empty());
    }

    #[test]
    fn test_dispatch_tree() {
        let (mut engine, mut host, source) = setup();
        host.admins.insert(source.id);

        assert_eq!(dispatch(&mut engine, &mut host, &source, &["chaos_arena", "reset_all"]), 1);
        assert_eq!(dispatch(&mut engine, &mut host, &source, &["chaos_arena", "tp", "n"]), 1);
        assert_eq!(dispatch(&mut engine, &mut host, &source, &["sudo", "spark", "100"]), 1);
        assert_eq!(dispatch(&mut engine, &mut host, &source, &["sudo", "spark", "lots"]), 0);
        assert_eq!(dispatch(&mut engine, &mut host, &source, &["chaos_arena"]), 0);
        assert_eq!(dispatch(&mut engine, &mut host, &source, &["unknown"]), 0);
    }
}
