mod create;
mod delete;
mod listing;

pub use create::{Batch, Skipped};
pub use delete::Deletion;
pub use listing::ElementListing;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::entity::{Entity, EntityId, EntityKind};
use crate::error::{OperationError, Result, TopologyError};

/// Outcome of registering one entity.
///
/// When the requested ID was already taken, `assigned` holds the rewritten ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub kind: EntityKind,
    pub requested: EntityId,
    pub assigned: EntityId,
}

impl Registration {
    /// Returns `true` if the requested ID collided and was rewritten.
    #[must_use]
    pub fn renamed(&self) -> bool {
        self.requested != self.assigned
    }
}

/// Owner of every entity in a scene, one collection per kind.
///
/// Entities refer to each other by `(kind, id)` only. The registry keeps
/// both sides of each relation in step: a composite entity stores what it
/// was built from, and each of those records the composite in its ledger.
#[derive(Debug, Default)]
pub struct Registry {
    nodes: BTreeMap<EntityId, Entity>,
    straight_lines: BTreeMap<EntityId, Entity>,
    arcs: BTreeMap<EntityId, Entity>,
    shells: BTreeMap<EntityId, Entity>,
}

impl Registry {
    /// Creates a new, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a read-only view of every entity of `kind`, keyed by ID.
    #[must_use]
    pub fn list_elements(&self, kind: EntityKind) -> &BTreeMap<EntityId, Entity> {
        match kind {
            EntityKind::Node => &self.nodes,
            EntityKind::StraightLine => &self.straight_lines,
            EntityKind::Arc => &self.arcs,
            EntityKind::Shell => &self.shells,
        }
    }

    /// Returns the number of entities of `kind`.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.list_elements(kind).len()
    }

    /// Returns a printable listing of every entity of `kind` and its position.
    #[must_use]
    pub fn element_listing(&self, kind: EntityKind) -> ElementListing<'_> {
        ElementListing::new(kind, self.list_elements(kind))
    }

    /// Returns the entity `kind` `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NotFound`] if there is no such entity.
    pub fn get(&self, kind: EntityKind, id: EntityId) -> Result<&Entity> {
        self.list_elements(kind)
            .get(&id)
            .ok_or_else(|| TopologyError::NotFound { kind, id }.into())
    }

    /// Returns the node `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not found.
    pub fn node(&self, id: EntityId) -> Result<&Entity> {
        self.get(EntityKind::Node, id)
    }

    /// Returns the straight line `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the straight line is not found.
    pub fn straight_line(&self, id: EntityId) -> Result<&Entity> {
        self.get(EntityKind::StraightLine, id)
    }

    /// Returns the shell `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell is not found.
    pub fn shell(&self, id: EntityId) -> Result<&Entity> {
        self.get(EntityKind::Shell, id)
    }

    fn collection_mut(&mut self, kind: EntityKind) -> &mut BTreeMap<EntityId, Entity> {
        match kind {
            EntityKind::Node => &mut self.nodes,
            EntityKind::StraightLine => &mut self.straight_lines,
            EntityKind::Arc => &mut self.arcs,
            EntityKind::Shell => &mut self.shells,
        }
    }

    /// Returns the ID `requested` will be stored under in `kind`'s collection.
    ///
    /// A taken ID is rewritten to one past the largest key in that
    /// collection. Free IDs below the maximum are never reused.
    fn assign_id(&self, kind: EntityKind, requested: EntityId) -> Result<EntityId> {
        let collection = self.list_elements(kind);
        if !collection.contains_key(&requested) {
            return Ok(requested);
        }
        let max = collection
            .last_key_value()
            .map_or(requested, |(&key, _)| key);
        max.0
            .checked_add(1)
            .map(EntityId)
            .ok_or_else(|| OperationError::IdSpaceExhausted { kind }.into())
    }

    /// Stores `entity` in the collection of its kind and records it in the
    /// ledger of each of its `dependencies`.
    ///
    /// The dependencies are wired before the entity is stored. If any of
    /// them cannot be wired, the ones already wired are released and
    /// nothing is stored.
    fn register(
        &mut self,
        mut entity: Entity,
        dependencies: &[(EntityKind, EntityId)],
    ) -> Result<Registration> {
        let kind = entity.kind();
        let requested = entity.id();
        let assigned = self.assign_id(kind, requested)?;
        self.attach(kind, assigned, dependencies)?;

        if assigned != requested {
            warn!("{kind} {requested} already exists, added as {kind} {assigned}");
            entity.reassign_id(assigned);
        }
        self.collection_mut(kind).insert(assigned, entity);
        debug!("registered {kind} {assigned}");
        Ok(Registration {
            kind,
            requested,
            assigned,
        })
    }

    fn attach(
        &mut self,
        kind: EntityKind,
        id: EntityId,
        dependencies: &[(EntityKind, EntityId)],
    ) -> Result<()> {
        for (wired, &(dep_kind, dep_id)) in dependencies.iter().enumerate() {
            let outcome = match self.collection_mut(dep_kind).get_mut(&dep_id) {
                Some(dependency) => dependency.connect(id, kind),
                None => Err(TopologyError::NotFound {
                    kind: dep_kind,
                    id: dep_id,
                }),
            };
            if let Err(err) = outcome {
                for &(dep_kind, dep_id) in &dependencies[..wired] {
                    if let Some(dependency) = self.collection_mut(dep_kind).get_mut(&dep_id) {
                        let _ = dependency.disconnect(id, kind);
                    }
                }
                return Err(err.into());
            }
        }
        Ok(())
    }
}

/// Checks that a parallel argument has as many entries as the IDs.
fn check_len(argument: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(OperationError::LengthMismatch {
            argument,
            expected,
            found,
        }
        .into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::error::GeosceneError;
    use crate::math::Point3;

    /// Installs a test-writer subscriber once; honours `RUST_LOG`.
    pub(crate) fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    pub(crate) fn ids(raw: &[u64]) -> Vec<EntityId> {
        raw.iter().copied().map(EntityId::from).collect()
    }

    #[test]
    fn free_id_is_kept() {
        init_tracing();
        let mut registry = Registry::new();
        let reg = registry
            .register(Entity::node(EntityId(4), Point3::origin()), &[])
            .unwrap();
        assert_eq!(reg.assigned, EntityId(4));
        assert!(!reg.renamed());
        assert_eq!(registry.count(EntityKind::Node), 1);
    }

    #[test]
    fn collision_extends_past_max_key() {
        init_tracing();
        let mut registry = Registry::new();
        for raw in [1, 5, 3] {
            registry
                .register(Entity::node(EntityId(raw), Point3::origin()), &[])
                .unwrap();
        }
        let reg = registry
            .register(Entity::node(EntityId(1), Point3::new(9.0, 0.0, 0.0)), &[])
            .unwrap();

        // 2 and 4 are free but only the space past the maximum is used
        assert_eq!(reg.assigned, EntityId(6));
        assert!(reg.renamed());
        assert_eq!(registry.node(EntityId(1)).unwrap().position(), &Point3::origin());
        assert_eq!(
            registry.node(EntityId(6)).unwrap().position(),
            &Point3::new(9.0, 0.0, 0.0)
        );
        assert_eq!(registry.node(EntityId(6)).unwrap().connections().owner_id(), EntityId(6));
    }

    #[test]
    fn collision_at_the_top_of_the_id_space_is_refused() {
        init_tracing();
        let mut registry = Registry::new();
        registry
            .create_nodes(&ids(&[0]), &[Point3::new(5.0, 0.0, 0.0)])
            .unwrap();
        registry
            .register(Entity::node(EntityId(u64::MAX), Point3::origin()), &[])
            .unwrap();

        let err = registry
            .register(Entity::node(EntityId(u64::MAX), Point3::new(1.0, 0.0, 0.0)), &[])
            .unwrap_err();
        assert_eq!(
            err,
            GeosceneError::Operation(OperationError::IdSpaceExhausted {
                kind: EntityKind::Node,
            })
        );
        // node 0 is not overwritten by a wrapped ID
        assert_eq!(registry.count(EntityKind::Node), 2);
        assert_eq!(
            registry.node(EntityId(0)).unwrap().position(),
            &Point3::new(5.0, 0.0, 0.0)
        );
        assert_eq!(
            registry.node(EntityId(u64::MAX)).unwrap().position(),
            &Point3::origin()
        );
    }

    #[test]
    fn ids_are_unique_per_kind_not_globally() {
        init_tracing();
        let mut registry = Registry::new();
        registry
            .create_nodes(&ids(&[1, 2]), &[Point3::origin(), Point3::new(1.0, 0.0, 0.0)])
            .unwrap();
        let batch = registry
            .create_straight_lines(&ids(&[1]), &ids(&[1]), &ids(&[2]))
            .unwrap();
        assert_eq!(batch.created[0].assigned, EntityId(1));
        assert!(registry.node(EntityId(1)).is_ok());
        assert!(registry.straight_line(EntityId(1)).is_ok());
    }

    #[test]
    fn get_reports_missing_entity() {
        let registry = Registry::new();
        assert_eq!(
            registry.shell(EntityId(2)).unwrap_err(),
            GeosceneError::Topology(TopologyError::NotFound {
                kind: EntityKind::Shell,
                id: EntityId(2),
            })
        );
        assert!(registry.list_elements(EntityKind::Arc).is_empty());
    }
}
