//! Connector resolvers: nearest connector on an element, and its network neighbor.

use crate::error::{RealignError, RealignResult};
use crate::geometry::{Point3, distance};
use crate::graph::ConnectorGraph;
use crate::model::{Connector, ElementId};

/// The connector on `element` closest to `reference`.
///
/// Ties go to the first connector in host order.
pub fn nearest<G>(graph: &G, element: ElementId, reference: Point3) -> RealignResult<Connector>
where
    G: ConnectorGraph + ?Sized,
{
    let mut best: Option<(Connector, f64)> = None;

    for connector in graph.connectors_of(element)? {
        let dist = distance(reference, connector.origin);
        if best.as_ref().is_none_or(|(_, best_dist)| dist < *best_dist) {
            best = Some((connector, dist));
        }
    }

    let (connector, dist) = best.ok_or(RealignError::NoConnectors { element })?;
    log::debug!(
        "Nearest connector to {} on element {} is {} at distance {}",
        reference,
        element,
        connector.id(),
        dist
    );
    Ok(connector)
}

/// Every terminal connector linked to `connector` that belongs to another element.
pub fn connected_neighbors<G>(graph: &G, connector: &Connector) -> RealignResult<Vec<Connector>>
where
    G: ConnectorGraph + ?Sized,
{
    Ok(graph
        .linked_connectors_of(connector)?
        .into_iter()
        .filter(|linked| linked.is_terminal() && linked.owner() != connector.owner())
        .collect())
}

/// The first terminal connector linked to `connector` on a different element.
///
/// Internal references (curve connectors, links back to the same element)
/// are ignored. Returns `None` when the connector is not joined to anything.
pub fn connected_neighbor<G>(graph: &G, connector: &Connector) -> RealignResult<Option<Connector>>
where
    G: ConnectorGraph + ?Sized,
{
    let mut neighbors = connected_neighbors(graph, connector)?;
    if neighbors.len() > 1 {
        log::warn!(
            "Connector {} has {} external neighbors; using the first one",
            connector.id(),
            neighbors.len()
        );
    }
    if neighbors.is_empty() {
        return Ok(None);
    }
    Ok(Some(neighbors.swap_remove(0)))
}
