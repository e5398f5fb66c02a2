//! Network elements and their connectors.

mod connector;
mod element;

pub use connector::{Connector, ConnectorKind, ConnectorRef, LocalFrame};
pub use element::{Element, ElementGeometry, ElementKind};

use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Unique identifier for connectors.
pub type ConnectorId = Uuid;
