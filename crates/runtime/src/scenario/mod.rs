//! Scenario system for scripted simulation runs.
//!
//! A scenario places actors and envelopes, then schedules commands at fixed
//! points of simulated time. Envelopes refer to prototypes by name; the
//! scenario's own `prototypes` table is consulted first, then any catalog
//! merged in with [`Scenario::with_prototypes`].

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use envelope_content::EnvelopePrototype;
use envelope_core::{EntityId, EnvelopeAction, EnvelopeState};
use serde::{Deserialize, Serialize};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::runtime::{EnvelopeSpawn, HostEvent, Resolved, Simulation};
use crate::world::{ActorBody, Point};

/// Actor placement for scenario setup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorPlacement {
    pub id: u32,
    #[serde(default)]
    pub position: Point,
    #[serde(default = "default_true")]
    pub has_hands: bool,
    /// Entity in the active hand at start, usually one of the envelopes.
    #[serde(default)]
    pub holding: Option<u32>,
}

/// Envelope placement for scenario setup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePlacement {
    pub id: u32,
    #[serde(default)]
    pub position: Point,
    /// Prototype name; the default prototype when absent.
    #[serde(default)]
    pub prototype: Option<String>,
}

/// Something that happens to the simulation at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Activate {
        envelope: u32,
        user: u32,
    },
    Request {
        envelope: u32,
        user: u32,
        action: EnvelopeAction,
    },
    Move {
        actor: u32,
        to: Point,
    },
    Damage {
        actor: u32,
        amount: u32,
    },
    Hold {
        actor: u32,
        item: Option<u32>,
    },
    SetHands {
        actor: u32,
        has_hands: bool,
    },
    SetInteract {
        actor: u32,
        can_interact: bool,
    },
    Despawn {
        envelope: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Simulated milliseconds after start.
    pub at_ms: u64,
    pub command: Command,
}

/// Scenario configuration for a scripted run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Overrides the runtime tick length.
    #[serde(default)]
    pub tick_ms: Option<u64>,

    #[serde(default)]
    pub prototypes: BTreeMap<String, EnvelopePrototype>,

    #[serde(default)]
    pub actors: Vec<ActorPlacement>,

    pub envelopes: Vec<EnvelopePlacement>,

    #[serde(default)]
    pub steps: Vec<ScenarioStep>,

    /// Simulated milliseconds to run for.
    pub run_until_ms: u64,
}

/// Final state of one envelope after a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnvelopeReport {
    pub id: EntityId,
    pub state: EnvelopeState,
    /// `None` when the envelope has no lock component.
    pub locked: Option<bool>,
    pub dirty_marks: usize,
}

/// What a scenario run produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub elapsed_ms: u64,
    pub envelopes: Vec<EnvelopeReport>,
    pub resolutions: Vec<Resolved>,
}

impl ScenarioReport {
    pub fn capture(simulation: &Simulation, resolutions: Vec<Resolved>) -> Self {
        let envelopes = simulation
            .envelopes()
            .map(|envelope| EnvelopeReport {
                id: envelope.id(),
                state: envelope.state(),
                locked: simulation
                    .locks()
                    .get(envelope.id())
                    .map(|lock| lock.locked),
                dirty_marks: simulation.replication().marks_for(envelope.id()),
            })
            .collect();

        Self {
            elapsed_ms: simulation.clock().as_millis() as u64,
            envelopes,
            resolutions,
        }
    }

    pub fn envelope(&self, id: EntityId) -> Option<&EnvelopeReport> {
        self.envelopes.iter().find(|report| report.id == id)
    }
}

impl Scenario {
    /// Load scenario from RON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::ScenarioIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron(&content)
    }

    pub fn from_ron(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(RuntimeError::ScenarioParse)
    }

    /// Adds prototypes the scenario does not define itself.
    #[must_use]
    pub fn with_prototypes(
        mut self,
        prototypes: impl IntoIterator<Item = (String, EnvelopePrototype)>,
    ) -> Self {
        for (name, prototype) in prototypes {
            self.prototypes.entry(name).or_insert(prototype);
        }
        self
    }

    fn prototype(&self, name: Option<&str>) -> Result<EnvelopePrototype> {
        match name {
            None => Ok(EnvelopePrototype::default()),
            Some(name) => self
                .prototypes
                .get(name)
                .copied()
                .ok_or_else(|| RuntimeError::UnknownPrototype(name.to_string())),
        }
    }

    /// Creates a simulation with every placement applied.
    pub fn build(&self, mut config: RuntimeConfig) -> Result<Simulation> {
        if let Some(tick_ms) = self.tick_ms {
            config.tick = Duration::from_millis(tick_ms.max(1));
        }

        tracing::info!(
            actors = self.actors.len(),
            envelopes = self.envelopes.len(),
            steps = self.steps.len(),
            "building scenario"
        );

        let mut simulation = Simulation::new(config);

        for placement in &self.envelopes {
            let prototype = self.prototype(placement.prototype.as_deref())?;
            let spawn = EnvelopeSpawn::from_prototype(EntityId(placement.id), &prototype)
                .at(placement.position);
            simulation.spawn(spawn)?;
        }

        for placement in &self.actors {
            let body = ActorBody {
                has_hands: placement.has_hands,
                held: placement.holding.map(EntityId),
                ..ActorBody::new(placement.position)
            };
            simulation.add_actor(EntityId(placement.id), body)?;
        }

        Ok(simulation)
    }

    /// Drives `simulation` through the scripted steps until `run_until_ms`.
    ///
    /// Steps due at or before the current clock are applied before each tick.
    pub fn play(&self, simulation: &mut Simulation) -> Result<Vec<Resolved>> {
        let mut steps: Vec<&ScenarioStep> = self.steps.iter().collect();
        steps.sort_by_key(|step| step.at_ms);
        let mut pending = steps.into_iter().peekable();

        let until = Duration::from_millis(self.run_until_ms);
        let mut resolved = Vec::new();

        while simulation.clock() < until {
            while let Some(step) =
                pending.next_if(|step| Duration::from_millis(step.at_ms) <= simulation.clock())
            {
                apply(simulation, &step.command)?;
            }
            resolved.extend(simulation.step());
        }

        let skipped = pending.count();
        if skipped > 0 {
            tracing::warn!(skipped, "scenario steps scheduled after the end of the run");
        }

        Ok(resolved)
    }

    /// Builds and plays the scenario, reporting final envelope states.
    pub fn run(&self, config: RuntimeConfig) -> Result<ScenarioReport> {
        let mut simulation = self.build(config)?;
        let resolutions = self.play(&mut simulation)?;
        Ok(ScenarioReport::capture(&simulation, resolutions))
    }
}

fn apply(simulation: &mut Simulation, command: &Command) -> Result<()> {
    tracing::debug!(?command, clock = ?simulation.clock(), "scenario step");

    match *command {
        Command::Activate { envelope, user } => simulation.submit(HostEvent::Activate {
            envelope: EntityId(envelope),
            user: EntityId(user),
        }),
        Command::Request {
            envelope,
            user,
            action,
        } => simulation.submit(HostEvent::Request {
            envelope: EntityId(envelope),
            user: EntityId(user),
            action,
        }),
        Command::Move { actor, to } => simulation.world_mut().move_actor(EntityId(actor), to),
        Command::Damage { actor, amount } => {
            simulation.world_mut().damage(EntityId(actor), amount)
        }
        Command::Hold { actor, item } => simulation
            .world_mut()
            .set_held(EntityId(actor), item.map(EntityId)),
        Command::SetHands { actor, has_hands } => simulation
            .world_mut()
            .set_hands(EntityId(actor), has_hands),
        Command::SetInteract {
            actor,
            can_interact,
        } => simulation
            .world_mut()
            .set_can_interact(EntityId(actor), can_interact),
        Command::Despawn { envelope } => simulation.despawn(EntityId(envelope)).map(|_| ()),
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEAL_RUN: &str = r#"(
        prototypes: {
            "slow": (seal_delay_ms: 3000),
        },
        actors: [
            (id: 1, position: (x: 0.0, y: 0.0)),
        ],
        envelopes: [
            (id: 10, position: (x: 0.5, y: 0.0), prototype: Some("slow")),
        ],
        steps: [
            (at_ms: 0, command: Activate(envelope: 10, user: 1)),
        ],
        run_until_ms: 4000,
    )"#;

    #[test]
    fn parses_and_runs_a_seal() {
        let scenario = Scenario::from_ron(SEAL_RUN).unwrap();
        assert_eq!(scenario.prototypes["slow"].seal_delay_ms, 3000);

        let report = scenario.run(RuntimeConfig::default()).unwrap();
        let envelope = report.envelope(EntityId(10)).unwrap();

        assert_eq!(envelope.state, EnvelopeState::Sealed);
        assert_eq!(envelope.locked, Some(true));
        assert_eq!(envelope.dirty_marks, 1);
        assert_eq!(report.resolutions.len(), 1);
        assert_eq!(report.elapsed_ms, 4000);
    }

    #[test]
    fn restrained_actor_cannot_start_anything() {
        let scenario = Scenario::from_ron(
            r#"(
                actors: [(id: 1)],
                envelopes: [(id: 10, position: (x: 0.5, y: 0.0))],
                steps: [
                    (at_ms: 0, command: SetInteract(actor: 1, can_interact: false)),
                    (at_ms: 0, command: Activate(envelope: 10, user: 1)),
                ],
                run_until_ms: 2000,
            )"#,
        )
        .unwrap();

        let report = scenario.run(RuntimeConfig::default()).unwrap();

        assert!(report.resolutions.is_empty());
        assert_eq!(
            report.envelope(EntityId(10)).unwrap().state,
            EnvelopeState::Open
        );
    }

    #[test]
    fn unknown_prototype_fails_the_build() {
        let scenario = Scenario::from_ron(
            r#"(envelopes: [(id: 10, prototype: Some("parcel"))], run_until_ms: 100)"#,
        )
        .unwrap();

        assert!(matches!(
            scenario.build(RuntimeConfig::default()),
            Err(RuntimeError::UnknownPrototype(name)) if name == "parcel"
        ));
    }

    #[test]
    fn scenario_prototypes_win_over_merged_ones() {
        let scenario = Scenario::from_ron(SEAL_RUN).unwrap().with_prototypes([
            (
                "slow".to_string(),
                EnvelopePrototype {
                    seal_delay_ms: 10,
                    ..EnvelopePrototype::default()
                },
            ),
            ("sealed".to_string(), EnvelopePrototype::default()),
        ]);

        assert_eq!(scenario.prototypes["slow"].seal_delay_ms, 3000);
        assert!(scenario.prototypes.contains_key("sealed"));
    }
}
