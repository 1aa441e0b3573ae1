//! Envelope prototype definitions.

use std::time::Duration;

use envelope_core::{EnvelopeConfig, EnvelopeState, InterruptFlags, InterruptPolicy};

/// Interrupt settings as written in content files.
///
/// Missing fields fall back to the standard envelope policy.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InterruptSpec {
    pub break_on_damage: bool,
    pub need_hand: bool,
    pub break_on_hand_change: bool,
    pub movement_threshold: f32,
    pub distance_threshold: f32,
}

impl Default for InterruptSpec {
    fn default() -> Self {
        Self {
            break_on_damage: true,
            need_hand: true,
            break_on_hand_change: true,
            movement_threshold: InterruptPolicy::DEFAULT_MOVEMENT_THRESHOLD,
            distance_threshold: InterruptPolicy::DEFAULT_DISTANCE_THRESHOLD,
        }
    }
}

impl From<InterruptSpec> for InterruptPolicy {
    fn from(spec: InterruptSpec) -> Self {
        let mut flags = InterruptFlags::empty();
        flags.set(InterruptFlags::BREAK_ON_DAMAGE, spec.break_on_damage);
        flags.set(InterruptFlags::NEED_HAND, spec.need_hand);
        flags.set(InterruptFlags::BREAK_ON_HAND_CHANGE, spec.break_on_hand_change);

        InterruptPolicy::new()
            .with_flags(flags)
            .with_movement_threshold(spec.movement_threshold)
            .with_distance_threshold(spec.distance_threshold)
    }
}

/// How an envelope entity is defined in content.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnvelopePrototype {
    pub seal_delay_ms: u64,
    pub tear_delay_ms: u64,
    /// State the envelope spawns in.
    pub initial_state: EnvelopeState,
    /// Whether the entity carries a lock component.
    pub lockable: bool,
    pub interrupts: InterruptSpec,
}

impl Default for EnvelopePrototype {
    fn default() -> Self {
        Self {
            seal_delay_ms: EnvelopeConfig::DEFAULT_SEAL_DELAY.as_millis() as u64,
            tear_delay_ms: EnvelopeConfig::DEFAULT_TEAR_DELAY.as_millis() as u64,
            initial_state: EnvelopeState::Open,
            lockable: true,
            interrupts: InterruptSpec::default(),
        }
    }
}

impl EnvelopePrototype {
    pub fn config(&self) -> EnvelopeConfig {
        EnvelopeConfig::with_delays(
            Duration::from_millis(self.seal_delay_ms),
            Duration::from_millis(self.tear_delay_ms),
        )
        .with_interrupts(self.interrupts.into())
    }
}
