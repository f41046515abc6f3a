use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use super::{EntityId, EntityKind};
use crate::error::TopologyError;

/// Per-entity ledger of the entities that reference it, grouped by kind.
///
/// The owner's own kind never appears as a group. Mutation goes through
/// [`connect`](Self::connect) and [`disconnect`](Self::disconnect) only, so
/// that rule and the no-duplicate rule hold for every ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connections {
    kind: EntityKind,
    id: EntityId,
    groups: BTreeMap<EntityKind, BTreeSet<EntityId>>,
}

impl Connections {
    /// Creates an empty ledger for the entity `kind` `id`.
    #[must_use]
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self {
            kind,
            id,
            groups: BTreeMap::new(),
        }
    }

    /// Returns the kind of the entity owning this ledger.
    #[must_use]
    pub fn owner_kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the ID of the entity owning this ledger.
    #[must_use]
    pub fn owner_id(&self) -> EntityId {
        self.id
    }

    /// Records that `foreign_kind` `foreign_id` references the owner.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::SelfConnection`] if `foreign_kind` is the
    /// owner's kind, or [`TopologyError::AlreadyConnected`] if the entry
    /// exists. The ledger is unchanged in both cases.
    pub fn connect(
        &mut self,
        foreign_id: EntityId,
        foreign_kind: EntityKind,
    ) -> Result<(), TopologyError> {
        if foreign_kind == self.kind {
            return Err(TopologyError::SelfConnection { kind: self.kind });
        }
        if !self.groups.entry(foreign_kind).or_default().insert(foreign_id) {
            return Err(TopologyError::AlreadyConnected {
                kind: self.kind,
                id: self.id,
                foreign_kind,
                foreign_id,
            });
        }
        debug!("connected {foreign_kind} {foreign_id} to {} {}", self.kind, self.id);
        Ok(())
    }

    /// Removes the entry for `foreign_kind` `foreign_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NotConnected`] if there is no such entry.
    pub fn disconnect(
        &mut self,
        foreign_id: EntityId,
        foreign_kind: EntityKind,
    ) -> Result<(), TopologyError> {
        let removed = match self.groups.get_mut(&foreign_kind) {
            Some(group) => {
                let removed = group.remove(&foreign_id);
                if group.is_empty() {
                    self.groups.remove(&foreign_kind);
                }
                removed
            }
            None => false,
        };
        if !removed {
            return Err(TopologyError::NotConnected {
                kind: self.kind,
                id: self.id,
                foreign_kind,
                foreign_id,
            });
        }
        debug!("disconnected {foreign_kind} {foreign_id} from {} {}", self.kind, self.id);
        Ok(())
    }

    /// Returns the IDs connected under `kind`, in ascending order.
    pub fn group(&self, kind: EntityKind) -> impl Iterator<Item = EntityId> + '_ {
        self.groups.get(&kind).into_iter().flatten().copied()
    }

    /// Returns whether `kind` `id` is connected.
    #[must_use]
    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        self.groups.get(&kind).is_some_and(|group| group.contains(&id))
    }

    /// Returns every connection as a `(kind, id)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, EntityId)> + '_ {
        self.groups
            .iter()
            .flat_map(|(&kind, ids)| ids.iter().map(move |&id| (kind, id)))
    }

    /// Returns the total number of connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(BTreeSet::len).sum()
    }

    /// Returns `true` if nothing references the owner.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(BTreeSet::is_empty)
    }

    /// Returns a printable report of the non-empty groups.
    #[must_use]
    pub fn report(&self) -> ConnectionReport<'_> {
        ConnectionReport(self)
    }

    pub(crate) fn reassign(&mut self, id: EntityId) {
        self.id = id;
    }
}

/// Human-readable listing of a [`Connections`] ledger.
///
/// ```text
/// Node 1
/// -------------------------
/// Connections to straight lines:
///     --> straight line 1
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConnectionReport<'a>(&'a Connections);

impl fmt::Display for ConnectionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ledger = self.0;
        writeln!(f, "{} {}", ledger.kind.title(), ledger.id)?;
        writeln!(f, "{}", "-".repeat(25))?;
        for (&kind, ids) in &ledger.groups {
            if kind == ledger.kind || ids.is_empty() {
                continue;
            }
            writeln!(f, "Connections to {}:", kind.plural())?;
            for id in ids {
                writeln!(f, "\t--> {kind} {id}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ledger() -> Connections {
        Connections::new(EntityKind::Node, EntityId(1))
    }

    #[test]
    fn connect_records_foreign_entity() {
        let mut c = ledger();
        c.connect(EntityId(7), EntityKind::StraightLine).unwrap();
        assert!(c.contains(EntityKind::StraightLine, EntityId(7)));
        assert_eq!(c.len(), 1);
        assert!(!c.is_empty());
    }

    #[test]
    fn duplicate_connect_is_rejected_without_change() {
        let mut c = ledger();
        c.connect(EntityId(7), EntityKind::StraightLine).unwrap();
        let err = c.connect(EntityId(7), EntityKind::StraightLine).unwrap_err();
        assert!(matches!(err, TopologyError::AlreadyConnected { .. }));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn same_kind_connect_is_rejected() {
        let mut c = ledger();
        let err = c.connect(EntityId(2), EntityKind::Node).unwrap_err();
        assert!(matches!(err, TopologyError::SelfConnection { .. }));
        assert!(c.is_empty());
        assert_eq!(c.group(EntityKind::Node).count(), 0);
    }

    #[test]
    fn disconnect_absent_entry_is_idempotent() {
        let mut c = ledger();
        c.connect(EntityId(3), EntityKind::Shell).unwrap();
        c.disconnect(EntityId(3), EntityKind::Shell).unwrap();
        let snapshot = c.clone();

        let err = c.disconnect(EntityId(3), EntityKind::Shell).unwrap_err();
        assert_eq!(
            err,
            TopologyError::NotConnected {
                kind: EntityKind::Node,
                id: EntityId(1),
                foreign_kind: EntityKind::Shell,
                foreign_id: EntityId(3),
            }
        );
        assert_eq!(c, snapshot);
        assert!(c.is_empty());
    }

    #[test]
    fn iter_walks_groups_in_kind_order() {
        let mut c = ledger();
        c.connect(EntityId(5), EntityKind::Shell).unwrap();
        c.connect(EntityId(2), EntityKind::StraightLine).unwrap();
        c.connect(EntityId(1), EntityKind::StraightLine).unwrap();
        let all: Vec<_> = c.iter().collect();
        assert_eq!(
            all,
            vec![
                (EntityKind::StraightLine, EntityId(1)),
                (EntityKind::StraightLine, EntityId(2)),
                (EntityKind::Shell, EntityId(5)),
            ]
        );
    }

    #[test]
    fn report_lists_only_non_empty_groups() {
        let mut c = ledger();
        c.connect(EntityId(1), EntityKind::StraightLine).unwrap();
        c.connect(EntityId(4), EntityKind::StraightLine).unwrap();
        let text = c.report().to_string();
        assert_eq!(
            text,
            "Node 1\n\
             -------------------------\n\
             Connections to straight lines:\n\
             \t--> straight line 1\n\
             \t--> straight line 4\n"
        );
        assert!(!text.contains("shells"));
    }
}
