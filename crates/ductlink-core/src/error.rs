//! Error types for connector realignment.

use crate::model::{ConnectorId, ElementId, ElementKind};
use thiserror::Error;

/// Errors raised while resolving or applying a realignment.
///
/// User cancellation is not an error; it is reported through
/// [`Outcome::Cancelled`](crate::realign::Outcome::Cancelled).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RealignError {
    #[error("Element {element} has no connectors")]
    NoConnectors { element: ElementId },
    #[error("Connector {connector} on element {element} is not connected to another element")]
    NoNeighbor {
        element: ElementId,
        connector: ConnectorId,
    },
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),
    #[error("Connector {connector} not found on element {element}")]
    ConnectorNotFound {
        element: ElementId,
        connector: ConnectorId,
    },
    #[error(
        "Local frame of connector {connector} on element {element} is {offset} away from its origin"
    )]
    FrameMismatch {
        element: ElementId,
        connector: ConnectorId,
        offset: f64,
    },
    #[error("Element {element} ({kind:?}) cannot be picked here")]
    SelectionRejected {
        element: ElementId,
        kind: ElementKind,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for realignment operations.
pub type RealignResult<T> = Result<T, RealignError>;

impl From<serde_json::Error> for RealignError {
    fn from(err: serde_json::Error) -> Self {
        RealignError::Serialization(err.to_string())
    }
}
