use std::collections::VecDeque;

use tracing::{info, warn};

use super::{check_len, Registry};
use crate::entity::{Entity, EntityId, EntityKind};
use crate::error::{Result, TopologyError};

/// Outcome of deleting one entity: the removed entity, or why it stayed.
pub type Deletion = std::result::Result<Entity, TopologyError>;

impl Registry {
    /// Deletes each `(id, kind)` pair, where `kinds` is matched positionally
    /// to `ids`. A single kind applies to every ID.
    ///
    /// Each pair is handled on its own: a missing entity yields
    /// [`TopologyError::NotFound`], an entity something still depends on
    /// yields [`TopologyError::DeleteBlocked`] and is kept. A deleted
    /// composite is removed from the ledgers of the entities it was built from.
    ///
    /// # Errors
    ///
    /// Returns an error if `kinds` has neither one entry nor one per ID.
    pub fn delete(&mut self, ids: &[EntityId], kinds: &[EntityKind]) -> Result<Vec<Deletion>> {
        let kinds = match kinds {
            [kind] => vec![*kind; ids.len()],
            _ => {
                check_len("kinds", ids.len(), kinds.len())?;
                kinds.to_vec()
            }
        };
        Ok(ids
            .iter()
            .zip(kinds)
            .map(|(&id, kind)| self.delete_one(kind, id))
            .collect())
    }

    /// Deletes `kind` `id`, then every entity it was built from that is no
    /// longer referenced by anything, recursively.
    ///
    /// Returns the removed entities as `(kind, id)` pairs, starting with the
    /// requested one.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested entity is missing or still referenced.
    pub fn delete_cascading(
        &mut self,
        kind: EntityKind,
        id: EntityId,
    ) -> Result<Vec<(EntityKind, EntityId)>> {
        let root = self.delete_one(kind, id)?;
        let mut removed = vec![(kind, id)];
        let mut pending: VecDeque<_> = root.dependencies().into();

        while let Some((kind, id)) = pending.pop_front() {
            let unreferenced = self
                .list_elements(kind)
                .get(&id)
                .is_some_and(|entity| entity.connections().is_empty());
            if !unreferenced {
                continue;
            }
            if let Ok(entity) = self.delete_one(kind, id) {
                removed.push((kind, id));
                pending.extend(entity.dependencies());
            }
        }
        Ok(removed)
    }

    fn delete_one(&mut self, kind: EntityKind, id: EntityId) -> Deletion {
        let Some(entity) = self.list_elements(kind).get(&id) else {
            warn!("{kind} {id} does not exist");
            return Err(TopologyError::NotFound { kind, id });
        };
        if !entity.connections().is_empty() {
            let connections = entity.connections().clone();
            warn!(
                "{kind} {id} connected to other elements, cannot delete\n{}",
                connections.report()
            );
            return Err(TopologyError::DeleteBlocked {
                kind,
                id,
                connections,
            });
        }

        let entity = self
            .collection_mut(kind)
            .remove(&id)
            .ok_or(TopologyError::NotFound { kind, id })?;
        self.detach(&entity);
        info!("deleted {kind} {id}");
        Ok(entity)
    }

    /// Removes a deleted entity from the ledgers of its dependencies.
    fn detach(&mut self, entity: &Entity) {
        for (kind, id) in entity.dependencies() {
            let Some(dependency) = self.collection_mut(kind).get_mut(&id) else {
                continue;
            };
            if let Err(err) = dependency.disconnect(entity.id(), entity.kind()) {
                warn!("stale connection while deleting {} {}: {err}", entity.kind(), entity.id());
            }
        }
    }
}
