//! Entity registry and connectivity model for small geometric scenes.
//!
//! A [`Registry`] owns nodes, straight lines and shells in one collection
//! per kind. Composite entities record the entities they were built from,
//! and each of those records the composite in its connection ledger, which
//! keeps referenced entities from being deleted.
//!
//! ```
//! use geoscene::prelude::*;
//!
//! let mut scene = Registry::new();
//! scene
//!     .create_nodes(
//!         &[EntityId(1), EntityId(3)],
//!         &[Point3::new(1.0, 0.0, 0.0), Point3::new(5.0, 2.0, 0.0)],
//!     )
//!     .unwrap();
//! scene
//!     .create_straight_lines(&[EntityId(1)], &[EntityId(1)], &[EntityId(3)])
//!     .unwrap();
//!
//! let outcome = scene.delete(&[EntityId(1)], &[EntityKind::Node]).unwrap();
//! assert!(outcome[0].is_err());
//! ```

pub mod entity;
pub mod error;
pub mod math;
pub mod registry;

pub use error::{GeosceneError, Result};

pub mod prelude {
    //! Common imports.
    pub use crate::entity::{Entity, EntityId, EntityKind, Shape};
    pub use crate::error::{GeometryError, GeosceneError, OperationError, TopologyError};
    pub use crate::math::Point3;
    pub use crate::registry::{Batch, Registration, Registry};
}

pub use registry::Registry;
