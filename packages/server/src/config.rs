//! Server configuration shared by the use cases.

use std::{ops::RangeInclusive, time::Duration};

/// Runtime settings for the room server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Range of cells the generator clears from a solved grid.
    pub removed_cells: RangeInclusive<usize>,
    /// The countdown is cancelled when a room drops below this many participants.
    pub min_players: usize,
    /// Check the room board against the solution before declaring a winner.
    pub verify_submissions: bool,
    /// Period of one countdown tick.
    pub tick_period: Duration,
    /// Empty rooms idle for this long are evicted.
    pub idle_timeout: Duration,
    /// How often the idle-room sweep runs.
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            removed_cells: 50..=60,
            min_players: 2,
            verify_submissions: false,
            tick_period: Duration::from_secs(1),
            idle_timeout: Duration::from_secs(600),
            sweep_interval: Duration::from_secs(60),
        }
    }
}
