//! Arena configuration
//!
//! Tunables for the waystone/arena state machine. Loaded from the
//! environment with sane defaults matching the shipped arena layout.

/// Game ticks per real second at nominal tick rate
pub const TICKS_PER_SECOND: u32 = 20;

/// Seconds per cooldown "day"
pub const SECONDS_PER_DAY: u64 = 86400;

/// How a waystone behaves once activated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaystoneMode {
    /// Waystones only carry players into their destination arena; the tick
    /// monitor is the sole exit path.
    OneWay,
    /// Every waystone doubles as its own arena's entry and exit point; a
    /// tracked player clicking any waystone is returned to their origin.
    Bidirectional,
}

/// Arena engine configuration
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    /// Dimension the waystones operate in
    pub dimension: String,
    /// Circular arena radius (horizontal, blocks)
    pub arena_radius: i32,
    /// Days an arena stays locked after activation
    pub cooldown_days: i64,
    /// Box range for waystone proximity checks (blocks, per axis)
    pub waystone_range: i32,
    /// Radius of generated waystone islands
    pub island_radius: i32,
    /// Countdown length before teleport (seconds)
    pub countdown_secs: u32,
    /// Re-trigger suppression window (seconds, one-way mode only)
    pub debounce_secs: u64,
    /// Entry/exit behavior of waystones
    pub mode: WaystoneMode,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            dimension: "minecraft:the_end".to_string(),
            arena_radius: 500,
            cooldown_days: 7,
            waystone_range: 8,
            island_radius: 6,
            countdown_secs: 3,
            debounce_secs: 2,
            mode: WaystoneMode::OneWay,
        }
    }
}

impl ArenaConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(dimension) = std::env::var("ARENA_DIMENSION") {
            if dimension.is_empty() {
                tracing::warn!("ARENA_DIMENSION is empty, using default");
            } else {
                config.dimension = dimension;
            }
        }

        if let Ok(radius) = std::env::var("ARENA_RADIUS") {
            if let Ok(parsed) = radius.parse::<i32>() {
                if parsed > 0 {
                    config.arena_radius = parsed;
                } else {
                    tracing::warn!("ARENA_RADIUS must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid ARENA_RADIUS '{}', using default", radius);
            }
        }

        if let Ok(days) = std::env::var("ARENA_COOLDOWN_DAYS") {
            if let Ok(parsed) = days.parse::<i64>() {
                if parsed >= 0 {
                    config.cooldown_days = parsed;
                } else {
                    tracing::warn!("ARENA_COOLDOWN_DAYS must be >= 0, using default");
                }
            } else {
                tracing::warn!("Invalid ARENA_COOLDOWN_DAYS '{}', using default", days);
            }
        }

        if let Ok(range) = std::env::var("WAYSTONE_RANGE") {
            if let Ok(parsed) = range.parse::<i32>() {
                if parsed > 0 {
                    config.waystone_range = parsed;
                } else {
                    tracing::warn!("WAYSTONE_RANGE must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid WAYSTONE_RANGE '{}', using default", range);
            }
        }

        if let Ok(mode) = std::env::var("ARENA_MODE") {
            match mode.to_ascii_lowercase().as_str() {
                "oneway" | "one-way" => config.mode = WaystoneMode::OneWay,
                "bidirectional" => config.mode = WaystoneMode::Bidirectional,
                other => tracing::warn!("Unknown ARENA_MODE '{}', using default", other),
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if self.dimension.is_empty() {
            return Err("dimension cannot be empty".to_string());
        }
        if self.arena_radius <= 0 {
            return Err("arena_radius must be at least 1".to_string());
        }
        if self.waystone_range <= 0 {
            return Err("waystone_range must be at least 1".to_string());
        }
        if self.island_radius <= 0 {
            return Err("island_radius must be at least 1".to_string());
        }
        if self.countdown_secs == 0 {
            return Err("countdown_secs must be at least 1".to_string());
        }
        if self.cooldown_days < 0 {
            return Err("cooldown_days cannot be negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ArenaConfig::default();
        assert_eq!(config.dimension, "minecraft:the_end");
        assert_eq!(config.arena_radius, 500);
        assert_eq!(config.cooldown_days, 7);
        assert_eq!(config.waystone_range, 8);
        assert_eq!(config.countdown_secs, 3);
        assert_eq!(config.mode, WaystoneMode::OneWay);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ArenaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_radius() {
        let mut config = ArenaConfig::default();
        config.arena_radius = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_countdown() {
        let mut config = ArenaConfig::default();
        config.countdown_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_dimension() {
        let mut config = ArenaConfig::default();
        config.dimension = String::new();
        assert!(config.validate().is_err());
    }
}
