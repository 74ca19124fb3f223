//! Waystone island generation
//!
//! Builds a small floating obsidian island around a waystone position: four
//! tapering layers, a netherite beacon base, a regeneration beacon, the
//! waystone block itself and edge lighting. Everything is emitted as opaque
//! setblock commands through the host.

use rand::Rng;
use tracing::info;

use crate::config::ArenaConfig;
use crate::host::HostPort;
use crate::util::pos::BlockPos;

const MATERIALS: [&str; 2] = ["minecraft:obsidian", "minecraft:crying_obsidian"];
const LAYERS: i32 = 4;
const BEACON: &str =
    "minecraft:beacon{primary_effect:\"minecraft:regeneration\",secondary_effect:\"minecraft:regeneration\"}";
const WAYSTONE_BLOCK: &str = "chaos_arena:waystone";
const LIGHT_BLOCK: &str = "minecraft:light[level=15]";

/// Generate an island centered on `pos` (the waystone position)
pub fn generate(host: &mut dyn HostPort, config: &ArenaConfig, pos: BlockPos) {
    info!(x = pos.x, y = pos.y, z = pos.z, "generating island");
    let mut rng = rand::thread_rng();

    for layer in 0..LAYERS {
        let y = pos.y - layer;
        let radius = (config.island_radius - layer).max(1);
        let radius_sq = radius * radius;
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let dist_sq = dx * dx + dz * dz;
                let material = if dist_sq >= radius_sq {
                    "minecraft:air"
                } else {
                    MATERIALS[rng.gen_range(0..MATERIALS.len())]
                };
                set_block(host, config, pos.x + dx, y, pos.z + dz, material);
            }
        }
    }

    // Beacon base
    for dx in -1..=1 {
        for dz in -1..=1 {
            set_block(host, config, pos.x + dx, pos.y - 1, pos.z + dz, "minecraft:netherite_block");
        }
    }

    // Beacon and the waystone above it
    set_block(host, config, pos.x, pos.y, pos.z, BEACON);
    set_block(host, config, pos.x, pos.y + 1, pos.z, WAYSTONE_BLOCK);

    // Edge lighting on the four compass points of the island
    let r = config.island_radius;
    set_block(host, config, pos.x + r, pos.y + 1, pos.z, LIGHT_BLOCK);
    set_block(host, config, pos.x - r, pos.y + 1, pos.z, LIGHT_BLOCK);
    set_block(host, config, pos.x, pos.y + 1, pos.z + r, LIGHT_BLOCK);
    set_block(host, config, pos.x, pos.y + 1, pos.z - r, LIGHT_BLOCK);
}

fn set_block(host: &mut dyn HostPort, config: &ArenaConfig, x: i32, y: i32, z: i32, block: &str) {
    host.run_command(&format!(
        "execute in {} run setblock {} {} {} {}",
        config.dimension, x, y, z, block
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryHost;

    fn generated_commands(pos: BlockPos) -> MemoryHost {
        let mut host = MemoryHost::new();
        let config = ArenaConfig::default();
        generate(&mut host, &config, pos);
        host
    }

    #[test]
    fn test_places_waystone_above_beacon() {
        let pos = BlockPos::new(100, 64, -200);
        let host = generated_commands(pos);

        assert_eq!(host.commands_containing("setblock 100 64 -200 minecraft:beacon").len(), 1);
        assert_eq!(host.commands_containing("setblock 100 65 -200 chaos_arena:waystone").len(), 1);
    }

    #[test]
    fn test_beacon_base_is_three_by_three() {
        let pos = BlockPos::new(0, 64, 0);
        let host = generated_commands(pos);
        assert_eq!(host.commands_containing("minecraft:netherite_block").len(), 9);
    }

    #[test]
    fn test_four_edge_lights_relative_to_island() {
        let pos = BlockPos::new(4983, 110, 4984);
        let host = generated_commands(pos);

        let lights = host.commands_containing("minecraft:light[level=15]");
        assert_eq!(lights.len(), 4);
        // All lights sit on the island ring, not at the world origin
        assert!(lights.iter().all(|cmd| !cmd.contains("setblock 0 ")));
        assert_eq!(host.commands_containing("setblock 4989 111 4984").len(), 1);
        assert_eq!(host.commands_containing("setblock 4983 111 4990").len(), 1);
    }

    #[test]
    fn test_layer_materials_in_palette() {
        let pos = BlockPos::new(0, 64, 0);
        let host = generated_commands(pos);

        for cmd in &host.commands {
            assert!(
                cmd.contains("minecraft:obsidian")
                    || cmd.contains("minecraft:crying_obsidian")
                    || cmd.contains("minecraft:air")
                    || cmd.contains("minecraft:netherite_block")
                    || cmd.contains("minecraft:beacon")
                    || cmd.contains("chaos_arena:waystone")
                    || cmd.contains("minecraft:light"),
                "unexpected block in {}",
                cmd
            );
        }
    }

    #[test]
    fn test_runs_in_configured_dimension() {
        let pos = BlockPos::new(0, 64, 0);
        let host = generated_commands(pos);
        assert!(host
            .commands
            .iter()
            .all(|cmd| cmd.starts_with("execute in minecraft:the_end run setblock")));
    }
}
