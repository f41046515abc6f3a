use thiserror::Error;

use crate::entity::{Connections, EntityId, EntityKind};

/// Top-level error type for the scene registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeosceneError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised while constructing an entity from its inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("straight line {id} cannot start and end at the same node")]
    InvalidEndpoints { id: EntityId },

    #[error("shell {id} has no boundary edges")]
    EmptyBoundary { id: EntityId },
}

/// Errors related to the connectivity between entities.
///
/// `SelfConnection` and `AlreadyConnected` together make up the family of
/// rejected connections; neither mutates the ledger.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    #[error("{kind} entities do not track connections to their own kind")]
    SelfConnection { kind: EntityKind },

    #[error("{foreign_kind} {foreign_id} already connected to {kind} {id}")]
    AlreadyConnected {
        kind: EntityKind,
        id: EntityId,
        foreign_kind: EntityKind,
        foreign_id: EntityId,
    },

    #[error("{foreign_kind} {foreign_id} not connected to {kind} {id}")]
    NotConnected {
        kind: EntityKind,
        id: EntityId,
        foreign_kind: EntityKind,
        foreign_id: EntityId,
    },

    #[error("{kind} {id} does not exist")]
    NotFound { kind: EntityKind, id: EntityId },

    #[error("{kind} {id} connected to other elements, cannot delete")]
    DeleteBlocked {
        kind: EntityKind,
        id: EntityId,
        /// Snapshot of the ledger that blocked the deletion.
        connections: Connections,
    },
}

/// Errors caused by malformed calls into the registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperationError {
    #[error("{argument} has {found} entries, expected {expected}")]
    LengthMismatch {
        argument: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("no {kind} ID left past the largest one in use")]
    IdSpaceExhausted { kind: EntityKind },

    #[error("unknown entity kind: {0}")]
    UnknownKind(String),
}

/// Convenience type alias for results using [`GeosceneError`].
pub type Result<T> = std::result::Result<T, GeosceneError>;
