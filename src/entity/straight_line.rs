use std::fmt;

use super::{Entity, EntityId, Shape};
use crate::error::{GeometryError, Result};
use crate::math;

/// Payload of a straight line between two distinct nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct StraightLine {
    start: EntityId,
    end: EntityId,
    length: f64,
}

impl StraightLine {
    /// Builds the line entity `id` running from `start` to `end`.
    ///
    /// The entity sits at the midpoint of the endpoints. Its length is
    /// computed here once and never updated.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidEndpoints`] if both endpoints share an ID.
    pub fn between(id: EntityId, start: &Entity, end: &Entity) -> Result<Entity> {
        if start.id() == end.id() {
            return Err(GeometryError::InvalidEndpoints { id }.into());
        }
        let line = Self {
            start: start.id(),
            end: end.id(),
            length: nalgebra::distance(start.position(), end.position()),
        };
        let center = math::midpoint(start.position(), end.position());
        Ok(Entity::new(id, center, Shape::StraightLine(line)))
    }

    /// Returns the ID of the start node.
    #[must_use]
    pub fn start(&self) -> EntityId {
        self.start
    }

    /// Returns the ID of the end node.
    #[must_use]
    pub fn end(&self) -> EntityId {
        self.end
    }

    /// Returns the Euclidean distance between the endpoints.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }
}

/// Printable length of one straight line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLength {
    pub id: EntityId,
    pub length: f64,
}

impl fmt::Display for LineLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "straight line {} length = {:.5}", self.id, self.length)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::error::GeosceneError;
    use crate::math::{Point3, TOLERANCE};
    use approx::assert_relative_eq;

    fn node(id: u64, x: f64, y: f64, z: f64) -> Entity {
        Entity::node(EntityId(id), Point3::new(x, y, z))
    }

    #[test]
    fn line_3_4_5() {
        let a = node(1, 0.0, 0.0, 0.0);
        let b = node(2, 3.0, 4.0, 0.0);
        let line = StraightLine::between(EntityId(1), &a, &b).unwrap();

        assert_eq!(line.kind(), EntityKind::StraightLine);
        assert_relative_eq!(*line.position(), Point3::new(1.5, 2.0, 0.0), epsilon = TOLERANCE);
        let payload = line.as_straight_line().unwrap();
        assert_relative_eq!(payload.length(), 5.0, epsilon = TOLERANCE);
        assert_eq!((payload.start(), payload.end()), (EntityId(1), EntityId(2)));
    }

    #[test]
    fn same_endpoint_is_rejected() {
        let a = node(1, 1.0, 0.0, 0.0);
        let err = StraightLine::between(EntityId(3), &a, &a).unwrap_err();
        assert_eq!(
            err,
            GeosceneError::Geometry(GeometryError::InvalidEndpoints { id: EntityId(3) })
        );
    }

    #[test]
    fn length_report_uses_five_decimals() {
        let a = node(1, 1.0, 0.0, 0.0);
        let b = node(3, 5.0, 2.0, 0.0);
        let line = StraightLine::between(EntityId(1), &a, &b).unwrap();
        assert_eq!(
            line.line_length().unwrap().to_string(),
            "straight line 1 length = 4.47214"
        );
        assert!(a.line_length().is_none());
    }
}
