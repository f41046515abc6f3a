use std::collections::BTreeSet;

use tracing::warn;

use super::{check_len, Registration, Registry};
use crate::entity::{Entity, EntityId, EntityKind, Shell, StraightLine};
use crate::error::{GeometryError, GeosceneError, Result};
use crate::math::Point3;

/// A request that was skipped during a batch create, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub requested: EntityId,
    pub error: GeosceneError,
}

/// Outcome of creating a batch of composite entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    /// Entities that were created, in input order.
    pub created: Vec<Registration>,
    /// Requests that were skipped, in input order.
    pub skipped: Vec<Skipped>,
}

impl Batch {
    fn record(&mut self, kind: EntityKind, requested: EntityId, outcome: Result<Registration>) {
        match outcome {
            Ok(registration) => self.created.push(registration),
            Err(err) => self.skip(kind, requested, err),
        }
    }

    fn skip(&mut self, kind: EntityKind, requested: EntityId, error: GeosceneError) {
        warn!("skipped {kind} {requested}: {error}");
        self.skipped.push(Skipped { requested, error });
    }
}

impl Registry {
    /// Creates one node per `(id, position)` pair, in input order.
    ///
    /// Colliding IDs are rewritten as described on [`Registration`]. A node
    /// whose ID cannot be rewritten is skipped and reported.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::LengthMismatch`](crate::error::OperationError::LengthMismatch)
    /// if the slices differ in length. Nothing is created in that case.
    pub fn create_nodes(&mut self, ids: &[EntityId], positions: &[Point3]) -> Result<Batch> {
        check_len("positions", ids.len(), positions.len())?;

        let mut batch = Batch::default();
        for (&id, &position) in ids.iter().zip(positions) {
            batch.record(EntityKind::Node, id, self.register(Entity::node(id, position), &[]));
        }
        Ok(batch)
    }

    /// Creates one straight line per `(id, start, end)` triple.
    ///
    /// Each created line is recorded in the ledgers of both endpoint nodes.
    /// A line whose endpoints are the same node, or whose endpoint does not
    /// exist, is skipped and reported in [`Batch::skipped`].
    ///
    /// # Errors
    ///
    /// Returns an error if the slices differ in length.
    pub fn create_straight_lines(
        &mut self,
        ids: &[EntityId],
        starts: &[EntityId],
        ends: &[EntityId],
    ) -> Result<Batch> {
        check_len("starts", ids.len(), starts.len())?;
        check_len("ends", ids.len(), ends.len())?;

        let mut batch = Batch::default();
        for ((&id, &start), &end) in ids.iter().zip(starts).zip(ends) {
            let line = match self.build_straight_line(id, start, end) {
                Ok(line) => line,
                Err(err) => {
                    batch.skip(EntityKind::StraightLine, id, err);
                    continue;
                }
            };
            let endpoints = [(EntityKind::Node, start), (EntityKind::Node, end)];
            batch.record(EntityKind::StraightLine, id, self.register(line, &endpoints));
        }
        Ok(batch)
    }

    /// Creates one shell per `(id, boundary)` pair.
    ///
    /// A boundary is a list of straight-line IDs. Each distinct edge records
    /// the shell in its ledger, so an edge cannot be deleted while a shell
    /// uses it. Empty boundaries and missing edges are skipped and reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the slices differ in length.
    pub fn create_shells(
        &mut self,
        ids: &[EntityId],
        boundaries: &[Vec<EntityId>],
    ) -> Result<Batch> {
        check_len("boundaries", ids.len(), boundaries.len())?;

        let mut batch = Batch::default();
        for (&id, boundary) in ids.iter().zip(boundaries) {
            let shell = match self.build_shell(id, boundary) {
                Ok(shell) => shell,
                Err(err) => {
                    batch.skip(EntityKind::Shell, id, err);
                    continue;
                }
            };
            let edges: Vec<_> = boundary
                .iter()
                .copied()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(|edge| (EntityKind::StraightLine, edge))
                .collect();
            batch.record(EntityKind::Shell, id, self.register(shell, &edges));
        }
        Ok(batch)
    }

    fn build_straight_line(&self, id: EntityId, start: EntityId, end: EntityId) -> Result<Entity> {
        if start == end {
            return Err(GeometryError::InvalidEndpoints { id }.into());
        }
        StraightLine::between(id, self.node(start)?, self.node(end)?)
    }

    fn build_shell(&self, id: EntityId, boundary: &[EntityId]) -> Result<Entity> {
        if boundary.is_empty() {
            return Err(GeometryError::EmptyBoundary { id }.into());
        }
        let edges = boundary
            .iter()
            .map(|&edge| self.straight_line(edge))
            .collect::<Result<Vec<_>>>()?;
        Shell::bounded_by(id, &edges)
    }
}
