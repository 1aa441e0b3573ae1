//! Unified error type surfaced by the simulation host.
//!
//! Envelope-level refusals are not errors here; they are logged and dropped
//! inside the tick loop. These variants cover misuse of the host itself.
use envelope_core::EntityId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no envelope {0} in the simulation")]
    UnknownEnvelope(EntityId),

    #[error("no actor {0} in the world")]
    UnknownActor(EntityId),

    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),

    #[error("failed to read scenario {path}")]
    ScenarioIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario")]
    ScenarioParse(#[source] ron::error::SpannedError),

    #[error("scenario refers to unknown prototype '{0}'")]
    UnknownPrototype(String),
}
