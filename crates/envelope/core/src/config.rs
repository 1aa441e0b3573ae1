use core::time::Duration;

use bitflags::bitflags;

bitflags! {
    /// Conditions under which the scheduler must break a timed action.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct InterruptFlags: u8 {
        /// Cancel when the user takes damage.
        const BREAK_ON_DAMAGE      = 1 << 0;
        /// The user must have a hand; losing it cancels the action.
        const NEED_HAND            = 1 << 1;
        /// Cancel when the user's held item changes or the hand empties.
        const BREAK_ON_HAND_CHANGE = 1 << 2;
    }
}

impl Default for InterruptFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Cancellation policy handed to the scheduler with every timed action.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterruptPolicy {
    pub flags: InterruptFlags,
    /// Maximum displacement of the user from where the action started.
    pub movement_threshold: f32,
    /// Maximum distance between the user and the target.
    pub distance_threshold: f32,
}

impl InterruptPolicy {
    pub const DEFAULT_MOVEMENT_THRESHOLD: f32 = 0.01;
    pub const DEFAULT_DISTANCE_THRESHOLD: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            flags: InterruptFlags::default(),
            movement_threshold: Self::DEFAULT_MOVEMENT_THRESHOLD,
            distance_threshold: Self::DEFAULT_DISTANCE_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: InterruptFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_movement_threshold(mut self, threshold: f32) -> Self {
        self.movement_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_distance_threshold(mut self, threshold: f32) -> Self {
        self.distance_threshold = threshold;
        self
    }

    pub fn breaks_on_damage(&self) -> bool {
        self.flags.contains(InterruptFlags::BREAK_ON_DAMAGE)
    }

    pub fn needs_hand(&self) -> bool {
        self.flags.contains(InterruptFlags::NEED_HAND)
    }

    pub fn breaks_on_hand_change(&self) -> bool {
        self.flags.contains(InterruptFlags::BREAK_ON_HAND_CHANGE)
    }
}

impl Default for InterruptPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-envelope tunables, supplied when the entity is defined.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvelopeConfig {
    /// Time to seal an open envelope. Also used to unseal one.
    pub seal_delay: Duration,
    /// Time to tear a sealed envelope.
    pub tear_delay: Duration,
    pub interrupts: InterruptPolicy,
}

impl EnvelopeConfig {
    pub const DEFAULT_SEAL_DELAY: Duration = Duration::from_secs(1);
    pub const DEFAULT_TEAR_DELAY: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            seal_delay: Self::DEFAULT_SEAL_DELAY,
            tear_delay: Self::DEFAULT_TEAR_DELAY,
            interrupts: InterruptPolicy::default(),
        }
    }

    pub fn with_delays(seal_delay: Duration, tear_delay: Duration) -> Self {
        Self {
            seal_delay,
            tear_delay,
            interrupts: InterruptPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_interrupts(mut self, interrupts: InterruptPolicy) -> Self {
        self.interrupts = interrupts;
        self
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self::new()
    }
}
