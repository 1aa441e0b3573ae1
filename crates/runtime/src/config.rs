//! Simulation configuration and environment overrides.
use std::env;
use std::time::Duration;

/// Tunables of the host loop.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Simulated time that passes per [`Simulation::step`](crate::Simulation::step).
    pub tick: Duration,
    /// Capacity of each event-bus topic channel.
    pub bus_capacity: usize,
    /// How far an actor may be from an envelope and still be offered its verb.
    pub interaction_range: f32,
}

impl RuntimeConfig {
    pub const DEFAULT_TICK: Duration = Duration::from_millis(100);
    pub const DEFAULT_BUS_CAPACITY: usize = 100;
    pub const DEFAULT_INTERACTION_RANGE: f32 = 1.5;
    /// Shortest tick the simulation will advance by.
    pub const MIN_TICK: Duration = Duration::from_millis(1);

    /// A zero `tick` is raised to [`Self::MIN_TICK`].
    pub const fn new(tick: Duration, bus_capacity: usize) -> Self {
        Self {
            tick: if tick.is_zero() { Self::MIN_TICK } else { tick },
            bus_capacity,
            interaction_range: Self::DEFAULT_INTERACTION_RANGE,
        }
    }

    #[must_use]
    pub const fn with_interaction_range(mut self, range: f32) -> Self {
        self.interaction_range = range;
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ENVELOPE_TICK_MS` - Simulated milliseconds per tick (default: 100)
    /// - `ENVELOPE_BUS_CAPACITY` - Event channel capacity per topic (default: 100)
    /// - `ENVELOPE_INTERACTION_RANGE` - Reach in world units (default: 1.5)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(millis) = read_env::<u64>("ENVELOPE_TICK_MS") {
            config.tick = Duration::from_millis(millis.max(1));
        }

        if let Some(capacity) = read_env::<usize>("ENVELOPE_BUS_CAPACITY") {
            config.bus_capacity = capacity.max(1);
        }

        if let Some(range) = read_env::<f32>("ENVELOPE_INTERACTION_RANGE")
            && range.is_finite()
            && range >= 0.0
        {
            config.interaction_range = range;
        }

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TICK, Self::DEFAULT_BUS_CAPACITY)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
