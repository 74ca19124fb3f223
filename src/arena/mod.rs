//! Arena domain: registry, persistence wrappers and the waystone engine

pub mod cooldown;
pub mod engine;
pub mod island;
pub mod registry;
pub mod returns;
