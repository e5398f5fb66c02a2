//! Realignment engine: Disconnect and Reconnect.
//!
//! Both operations resolve the connector nearest to a reference point,
//! project a target point onto that connector's local axis, and then either
//! move the connector there (Disconnect) or translate the neighboring element
//! so the joint follows (Reconnect). Planning never mutates the model; the
//! resulting [`ChangeSet`] is committed in one step.

use crate::config::RealignConfig;
use crate::error::{RealignError, RealignResult};
use crate::geometry::{Line, Point3, Vec3, project_point_onto_line};
use crate::graph::ConnectorGraph;
use crate::host::{Pick, PickFilter, PointPicker, Transactional, any_element};
use crate::model::{Connector, ElementId};
use crate::resolve::{connected_neighbor, nearest};
use crate::transaction::{Change, ChangeSet, CommitSummary};

/// Transaction label for Disconnect.
pub const DISCONNECT_LABEL: &str = "Disconnect connector";
/// Transaction label for Reconnect.
pub const RECONNECT_LABEL: &str = "Reconnect connector";

/// Which realignment to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Move the connector and leave the neighbor behind.
    Disconnect,
    /// Keep the connector and drag the neighbor along.
    Reconnect,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::Disconnect => DISCONNECT_LABEL,
            Operation::Reconnect => RECONNECT_LABEL,
        }
    }
}

/// Result of a realignment that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Committed(CommitSummary),
    /// Point acquisition was aborted; nothing was read or changed.
    Cancelled,
}

/// A resolved realignment, ready to commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub operation: Operation,
    /// Connector nearest to the reference point, as it was before the change.
    pub connector: Connector,
    /// Target point projected onto the connector axis.
    pub projected: Point3,
    /// Neighbor connector (Reconnect only).
    pub neighbor: Option<Connector>,
    /// Translation applied to the neighbor's element (Reconnect only).
    pub offset: Option<Vec3>,
    pub changes: ChangeSet,
}

/// Plans and applies connector realignments.
#[derive(Debug, Clone, Default)]
pub struct RealignEngine {
    config: RealignConfig,
}

impl RealignEngine {
    pub fn new(config: RealignConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RealignConfig {
        &self.config
    }

    /// Resolve the nearest connector and the projected target shared by both operations.
    fn resolve<G>(
        &self,
        graph: &G,
        element: ElementId,
        reference: Point3,
        target: Point3,
    ) -> RealignResult<(Connector, Point3)>
    where
        G: ConnectorGraph + ?Sized,
    {
        for (name, point) in [("reference", reference), ("target", target)] {
            if !point.is_finite() {
                return Err(RealignError::InvalidGeometry(format!(
                    "{} point {} is not finite",
                    name, point
                )));
            }
        }

        let con = nearest(graph, element, reference)?;
        con.check_frame(self.config.frame_tolerance)?;

        let axis = Line::new(con.frame.origin, con.frame.axis).map_err(|e| match e {
            RealignError::InvalidGeometry(msg) => RealignError::InvalidGeometry(format!(
                "connector {} on element {}: {}",
                con.id(),
                element,
                msg
            )),
            other => other,
        })?;
        let projected = project_point_onto_line(target, &axis);

        // Relative to coordinate magnitude, floored at one model unit.
        let residual = axis.distance_to(projected);
        let scale = [projected, axis.origin()]
            .iter()
            .map(|p| (*p - Point3::ORIGIN).length())
            .fold(1.0, f64::max);
        if residual > self.config.tolerance * scale {
            return Err(RealignError::InvalidGeometry(format!(
                "projection of {} is {} off the axis of connector {}",
                target,
                residual,
                con.id()
            )));
        }

        log::debug!(
            "Projected target {} onto connector {} axis at {}",
            target,
            con.id(),
            projected
        );
        Ok((con, projected))
    }

    /// Plan moving the nearest connector to the projected target.
    pub fn plan_disconnect<G>(
        &self,
        graph: &G,
        element: ElementId,
        reference: Point3,
        target: Point3,
    ) -> RealignResult<Plan>
    where
        G: ConnectorGraph + ?Sized,
    {
        let (connector, projected) = self.resolve(graph, element, reference, target)?;

        let mut changes = ChangeSet::new(DISCONNECT_LABEL);
        changes.push(Change::SetConnectorOrigin {
            element: connector.owner(),
            connector: connector.id(),
            origin: projected,
        });

        Ok(Plan {
            operation: Operation::Disconnect,
            connector,
            projected,
            neighbor: None,
            offset: None,
            changes,
        })
    }

    /// Plan translating the neighbor of the nearest connector.
    ///
    /// The offset is measured from `reference`, not from the connector
    /// origin, so the drag distance is the one the user saw.
    pub fn plan_reconnect<G>(
        &self,
        graph: &G,
        element: ElementId,
        reference: Point3,
        target: Point3,
    ) -> RealignResult<Plan>
    where
        G: ConnectorGraph + ?Sized,
    {
        let (connector, projected) = self.resolve(graph, element, reference, target)?;
        let offset = projected - reference;

        let neighbor = connected_neighbor(graph, &connector)?.ok_or(RealignError::NoNeighbor {
            element: connector.owner(),
            connector: connector.id(),
        })?;
        log::debug!(
            "Translating element {} by ({}, {}, {})",
            neighbor.owner(),
            offset.x,
            offset.y,
            offset.z
        );

        let mut changes = ChangeSet::new(RECONNECT_LABEL);
        changes.push(Change::TranslateElement {
            element: neighbor.owner(),
            offset,
        });

        Ok(Plan {
            operation: Operation::Reconnect,
            connector,
            projected,
            neighbor: Some(neighbor),
            offset: Some(offset),
            changes,
        })
    }

    pub fn plan<G>(
        &self,
        graph: &G,
        operation: Operation,
        element: ElementId,
        reference: Point3,
        target: Point3,
    ) -> RealignResult<Plan>
    where
        G: ConnectorGraph + ?Sized,
    {
        match operation {
            Operation::Disconnect => self.plan_disconnect(graph, element, reference, target),
            Operation::Reconnect => self.plan_reconnect(graph, element, reference, target),
        }
    }

    /// Plan and commit an operation on already-resolved inputs.
    pub fn apply<M>(
        &self,
        model: &mut M,
        operation: Operation,
        element: ElementId,
        reference: Point3,
        target: Point3,
    ) -> RealignResult<Outcome>
    where
        M: ConnectorGraph + Transactional + ?Sized,
    {
        let plan = self.plan(&*model, operation, element, reference, target)?;
        let summary = model.commit(plan.changes)?;
        Ok(Outcome::Committed(summary))
    }

    /// Move the connector nearest `reference` onto its axis at `target`.
    pub fn disconnect<M>(
        &self,
        model: &mut M,
        element: ElementId,
        reference: Point3,
        target: Point3,
    ) -> RealignResult<Outcome>
    where
        M: ConnectorGraph + Transactional + ?Sized,
    {
        self.apply(model, Operation::Disconnect, element, reference, target)
    }

    /// Translate the neighbor of the connector nearest `reference` so the joint follows `target`.
    pub fn reconnect<M>(
        &self,
        model: &mut M,
        element: ElementId,
        reference: Point3,
        target: Point3,
    ) -> RealignResult<Outcome>
    where
        M: ConnectorGraph + Transactional + ?Sized,
    {
        self.apply(model, Operation::Reconnect, element, reference, target)
    }

    /// Interactive flow: pick a reference point on a duct, pick a target point, then apply.
    ///
    /// A cancelled pick ends the operation with [`Outcome::Cancelled`] before
    /// anything is read from or written to the model.
    pub fn run<M, P>(
        &self,
        model: &mut M,
        picker: &mut P,
        operation: Operation,
    ) -> RealignResult<Outcome>
    where
        M: ConnectorGraph + Transactional + ?Sized,
        P: PointPicker + ?Sized,
    {
        let filter = self.config.pick_filter();
        let reference_pick = picker.pick_point(filter, "Pick a point near the connector")?;
        let (element, reference) = match reference_pick {
            Pick::Picked { element, point } => (element, point),
            Pick::Cancelled => {
                log::debug!("{} cancelled at reference pick", operation.label());
                return Ok(Outcome::Cancelled);
            }
        };
        let target = match picker.pick_point(any_element, "Pick the new connector location")? {
            Pick::Picked { point, .. } => point,
            Pick::Cancelled => {
                log::debug!("{} cancelled at target pick", operation.label());
                return Ok(Outcome::Cancelled);
            }
        };

        check_pick(&*model, filter, element)?;
        self.apply(model, operation, element, reference, target)
    }
}

fn check_pick<G>(graph: &G, filter: PickFilter, element: ElementId) -> RealignResult<()>
where
    G: ConnectorGraph + ?Sized,
{
    let kind = graph.element_kind(element)?;
    if !filter(kind) {
        return Err(RealignError::SelectionRejected { element, kind });
    }
    Ok(())
}
