//! Read access to the connector graph.
//!
//! Elements are nodes; pairs of linked terminal connectors are edges. Links
//! are plain references, so a link may outlive the geometric coincidence it
//! once described, or even the connector it points at.

use crate::error::RealignResult;
use crate::model::{Connector, ConnectorRef, ElementId, ElementKind};

/// Host model read interface.
pub trait ConnectorGraph {
    /// Kind of an element, or `ElementNotFound`.
    fn element_kind(&self, element: ElementId) -> RealignResult<ElementKind>;

    /// All connectors owned by `element`, in host order.
    ///
    /// Fails with `ElementNotFound` when the handle is stale.
    fn connectors_of(&self, element: ElementId) -> RealignResult<Vec<Connector>>;

    /// Resolve a single connector reference.
    fn connector(&self, reference: ConnectorRef) -> RealignResult<Connector>;

    /// All connectors referenced by `connector`, in link order.
    ///
    /// May include connectors on the same element. Links to connectors that
    /// no longer exist are skipped.
    fn linked_connectors_of(&self, connector: &Connector) -> RealignResult<Vec<Connector>> {
        let mut linked = Vec::with_capacity(connector.links.len());
        for &reference in &connector.links {
            match self.connector(reference) {
                Ok(con) => linked.push(con),
                Err(e) => {
                    log::warn!(
                        "Skipping stale link from connector {} to {}: {}",
                        connector.id(),
                        reference.connector,
                        e
                    );
                }
            }
        }
        Ok(linked)
    }
}
