use super::{Entity, EntityId, Shape};
use crate::error::{GeometryError, Result};
use crate::math;

/// Payload of a shell bounded by straight-line edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    /// Boundary edges in the order they were supplied.
    edges: Vec<EntityId>,
}

impl Shell {
    /// Builds the shell entity `id` from its boundary edges.
    ///
    /// The entity sits at the mean of the edge positions.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::EmptyBoundary`] if `edges` is empty.
    pub fn bounded_by(id: EntityId, edges: &[&Entity]) -> Result<Entity> {
        let center = math::centroid(edges.iter().map(|edge| edge.position()))
            .ok_or(GeometryError::EmptyBoundary { id })?;
        let shell = Self {
            edges: edges.iter().map(|edge| edge.id()).collect(),
        };
        Ok(Entity::new(id, center, Shape::Shell(shell)))
    }

    /// Returns the boundary edge IDs.
    #[must_use]
    pub fn edges(&self) -> &[EntityId] {
        &self.edges
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entity::{EntityKind, StraightLine};
    use crate::error::GeosceneError;
    use crate::math::{Point3, TOLERANCE};
    use approx::assert_relative_eq;

    fn line(id: u64, from: [f64; 3], to: [f64; 3]) -> Entity {
        let a = Entity::node(EntityId(100), Point3::from(from));
        let b = Entity::node(EntityId(101), Point3::from(to));
        StraightLine::between(EntityId(id), &a, &b).unwrap()
    }

    #[test]
    fn centre_is_mean_of_edge_midpoints() {
        let e1 = line(1, [0.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        let e2 = line(2, [2.0, 0.0, 0.0], [2.0, 2.0, 0.0]);
        let e3 = line(3, [2.0, 2.0, 0.0], [0.0, 0.0, 0.0]);
        let shell = Shell::bounded_by(EntityId(1), &[&e1, &e2, &e3]).unwrap();

        assert_eq!(shell.kind(), EntityKind::Shell);
        assert_relative_eq!(
            *shell.position(),
            Point3::new(4.0 / 3.0, 2.0 / 3.0, 0.0),
            epsilon = TOLERANCE
        );
        assert_eq!(
            shell.as_shell().unwrap().edges(),
            &[EntityId(1), EntityId(2), EntityId(3)]
        );
    }

    #[test]
    fn empty_boundary_is_an_error_not_nan() {
        let err = Shell::bounded_by(EntityId(5), &[]).unwrap_err();
        assert_eq!(
            err,
            GeosceneError::Geometry(GeometryError::EmptyBoundary { id: EntityId(5) })
        );
    }

    #[test]
    fn repeated_edge_is_one_dependency() {
        let e1 = line(1, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let shell = Shell::bounded_by(EntityId(1), &[&e1, &e1]).unwrap();
        assert_eq!(
            shell.dependencies(),
            vec![(EntityKind::StraightLine, EntityId(1))]
        );
    }
}
