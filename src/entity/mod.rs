mod connections;
mod shell;
mod straight_line;

pub use connections::{ConnectionReport, Connections};
pub use shell::Shell;
pub use straight_line::{LineLength, StraightLine};

use std::fmt;
use std::str::FromStr;

use crate::error::{OperationError, TopologyError};
use crate::math::{Point3, Vector4};

/// Identifier of an entity, unique within the collection of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The category an entity belongs to.
///
/// `Arc` names a registry collection but no arc can be constructed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Node,
    StraightLine,
    Arc,
    Shell,
}

impl EntityKind {
    /// Every kind, in registry order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Node,
        EntityKind::StraightLine,
        EntityKind::Arc,
        EntityKind::Shell,
    ];

    /// Lower-case singular name, e.g. `straight line`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::StraightLine => "straight line",
            Self::Arc => "arc",
            Self::Shell => "shell",
        }
    }

    /// Lower-case plural name, e.g. `straight lines`.
    #[must_use]
    pub fn plural(self) -> &'static str {
        match self {
            Self::Node => "nodes",
            Self::StraightLine => "straight lines",
            Self::Arc => "arcs",
            Self::Shell => "shells",
        }
    }

    /// Capitalized singular name, used as a report header.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Node => "Node",
            Self::StraightLine => "Straight line",
            Self::Arc => "Arc",
            Self::Shell => "Shell",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = OperationError;

    /// Accepts the camel-case names callers use (`node`, `straightLine`,
    /// `arc`, `shell`) in singular or plural form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" | "nodes" => Ok(Self::Node),
            "straightLine" | "straightLines" | "straight line" | "straight lines" => {
                Ok(Self::StraightLine)
            }
            "arc" | "arcs" => Ok(Self::Arc),
            "shell" | "shells" => Ok(Self::Shell),
            other => Err(OperationError::UnknownKind(other.to_owned())),
        }
    }
}

/// Kind-specific payload of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A point entity; its position is all it carries.
    Node,
    /// A segment between two nodes.
    StraightLine(StraightLine),
    /// A surface bounded by straight lines.
    Shell(Shell),
}

impl Shape {
    /// Returns the kind tag of this payload.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Node => EntityKind::Node,
            Self::StraightLine(_) => EntityKind::StraightLine,
            Self::Shell(_) => EntityKind::Shell,
        }
    }
}

/// A geometric entity owned by the [`Registry`](crate::registry::Registry).
///
/// The connection ledger records the entities that depend on this one.
/// What this entity itself depends on is held in its [`Shape`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    position: Point3,
    connections: Connections,
    shape: Shape,
}

impl Entity {
    pub(crate) fn new(id: EntityId, position: Point3, shape: Shape) -> Self {
        Self {
            id,
            position,
            connections: Connections::new(shape.kind(), id),
            shape,
        }
    }

    pub(crate) fn node(id: EntityId, position: Point3) -> Self {
        Self::new(id, position, Shape::Node)
    }

    /// Returns the current ID.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the kind, fixed at construction.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.shape.kind()
    }

    /// Returns the position in world coordinates.
    #[must_use]
    pub fn position(&self) -> &Point3 {
        &self.position
    }

    /// Returns the position as a homogeneous vector with `w = 1`.
    #[must_use]
    pub fn homogeneous(&self) -> Vector4 {
        self.position.to_homogeneous()
    }

    /// Returns the kind-specific payload.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the straight-line payload, if this is a straight line.
    #[must_use]
    pub fn as_straight_line(&self) -> Option<&StraightLine> {
        match &self.shape {
            Shape::StraightLine(line) => Some(line),
            _ => None,
        }
    }

    /// Returns the shell payload, if this is a shell.
    #[must_use]
    pub fn as_shell(&self) -> Option<&Shell> {
        match &self.shape {
            Shape::Shell(shell) => Some(shell),
            _ => None,
        }
    }

    /// Returns the length report of a straight line.
    #[must_use]
    pub fn line_length(&self) -> Option<LineLength> {
        self.as_straight_line().map(|line| LineLength {
            id: self.id,
            length: line.length(),
        })
    }

    /// Returns a read-only view of the connection ledger.
    #[must_use]
    pub fn connections(&self) -> &Connections {
        &self.connections
    }

    /// Returns a printable report of every non-empty connection group.
    #[must_use]
    pub fn describe_connections(&self) -> ConnectionReport<'_> {
        self.connections.report()
    }

    /// Returns the entities this one was built from, as `(kind, id)` pairs.
    ///
    /// Each pair appears once, even if a shell lists an edge twice.
    #[must_use]
    pub fn dependencies(&self) -> Vec<(EntityKind, EntityId)> {
        match &self.shape {
            Shape::Node => Vec::new(),
            Shape::StraightLine(line) => vec![
                (EntityKind::Node, line.start()),
                (EntityKind::Node, line.end()),
            ],
            Shape::Shell(shell) => {
                let mut deps: Vec<_> = Vec::with_capacity(shell.edges().len());
                for &edge in shell.edges() {
                    let dep = (EntityKind::StraightLine, edge);
                    if !deps.contains(&dep) {
                        deps.push(dep);
                    }
                }
                deps
            }
        }
    }

    pub(crate) fn reassign_id(&mut self, id: EntityId) {
        self.id = id;
        self.connections.reassign(id);
    }

    pub(crate) fn connect(
        &mut self,
        foreign_id: EntityId,
        foreign_kind: EntityKind,
    ) -> Result<(), TopologyError> {
        self.connections.connect(foreign_id, foreign_kind)
    }

    pub(crate) fn disconnect(
        &mut self,
        foreign_id: EntityId,
        foreign_kind: EntityKind,
    ) -> Result<(), TopologyError> {
        self.connections.disconnect(foreign_id, foreign_kind)
    }
}
