use std::collections::BTreeMap;
use std::fmt;

use crate::entity::{Entity, EntityId, EntityKind};

/// Human-readable listing of one kind's collection.
///
/// ```text
/// -------------------------
/// Listing defined nodes:
/// -------------------------
/// Node 1 - center (1, 0, 0)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ElementListing<'a> {
    kind: EntityKind,
    elements: &'a BTreeMap<EntityId, Entity>,
}

impl<'a> ElementListing<'a> {
    pub(super) fn new(kind: EntityKind, elements: &'a BTreeMap<EntityId, Entity>) -> Self {
        Self { kind, elements }
    }
}

impl fmt::Display for ElementListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(25);
        writeln!(f, "{rule}")?;
        writeln!(f, "Listing defined {}:", self.kind.plural())?;
        writeln!(f, "{rule}")?;
        for (id, entity) in self.elements {
            let p = entity.position();
            writeln!(
                f,
                "{} {id} - center ({}, {}, {})",
                self.kind.title(),
                p.x,
                p.y,
                p.z
            )?;
        }
        Ok(())
    }
}
