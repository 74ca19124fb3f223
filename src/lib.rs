//! Chaos Arena automation core
//!
//! Embeddable gameplay-automation module for an arena-teleportation
//! minigame: players right-click waystone blocks to travel to remote
//! guardian arenas, trigger a boss respawn, and are auto-returned when they
//! leave the arena region. An admin `sudo` command set is layered on top.
//!
//! The crate never touches the game server directly: a host adapter feeds
//! events in ([`host::WaystoneClickEvent`], [`host::TickEvent`], timer
//! callbacks) and the engine drives all world mutation, chat, scheduling and
//! persistence through the injected [`host::HostPort`].

pub mod arena;
pub mod commands;
pub mod config;
pub mod host;
pub mod util;
