//! Connection points.

use super::{ConnectorId, ElementId};
use crate::error::{RealignError, RealignResult};
use crate::geometry::{Point3, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind tag of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectorKind {
    /// Terminal connector: an external network joint.
    #[default]
    End,
    /// Internal reference to curve geometry on the owning element.
    Curve,
    /// Physical attachment that does not take part in the network.
    Physical,
}

/// Non-owning reference to a connector on some element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectorRef {
    pub element: ElementId,
    pub connector: ConnectorId,
}

impl ConnectorRef {
    pub fn new(element: ElementId, connector: ConnectorId) -> Self {
        Self { element, connector }
    }
}

/// Local coordinate system at a connector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    /// Must coincide with the connector origin.
    pub origin: Point3,
    /// Local centerline direction.
    pub axis: Vec3,
}

impl LocalFrame {
    pub fn new(origin: Point3, axis: Vec3) -> Self {
        Self { origin, axis }
    }
}

/// An attachment point on an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub(crate) id: ConnectorId,
    pub(crate) owner: ElementId,
    /// Position in world coordinates.
    pub origin: Point3,
    /// Local frame; its origin tracks `origin`.
    pub frame: LocalFrame,
    pub kind: ConnectorKind,
    /// Connectors this one references. Links are not cleared when the
    /// connector moves; connectivity is defined by coincidence.
    #[serde(default)]
    pub links: Vec<ConnectorRef>,
}

impl Connector {
    /// Create an unlinked connector whose frame sits at `origin`.
    pub fn new(owner: ElementId, origin: Point3, axis: Vec3, kind: ConnectorKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            origin,
            frame: LocalFrame::new(origin, axis),
            kind,
            links: Vec::new(),
        }
    }

    pub fn id(&self) -> ConnectorId {
        self.id
    }

    pub fn owner(&self) -> ElementId {
        self.owner
    }

    pub fn reference(&self) -> ConnectorRef {
        ConnectorRef::new(self.owner, self.id)
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == ConnectorKind::End
    }

    /// Verify that the frame origin coincides with the connector origin.
    pub fn check_frame(&self, tolerance: f64) -> RealignResult<()> {
        let offset = self.frame.origin.distance_to(self.origin);
        if offset > tolerance || !offset.is_finite() {
            return Err(RealignError::FrameMismatch {
                element: self.owner,
                connector: self.id,
                offset,
            });
        }
        Ok(())
    }

    /// Relocate the connector; the frame moves with it and links are kept.
    pub fn set_origin(&mut self, origin: Point3) {
        self.origin = origin;
        self.frame.origin = origin;
    }

    pub(crate) fn translate(&mut self, offset: Vec3) {
        self.set_origin(self.origin + offset);
    }

    pub(crate) fn add_link(&mut self, target: ConnectorRef) {
        if !self.links.contains(&target) {
            self.links.push(target);
        }
    }

    pub(crate) fn remove_link(&mut self, target: ConnectorRef) -> bool {
        let before = self.links.len();
        self.links.retain(|&r| r != target);
        self.links.len() != before
    }

    pub fn is_linked_to(&self, target: ConnectorRef) -> bool {
        self.links.contains(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_origin_moves_frame_and_keeps_links() {
        let owner = Uuid::new_v4();
        let mut con = Connector::new(owner, Point3::ORIGIN, Vec3::Z, ConnectorKind::End);
        let other = ConnectorRef::new(Uuid::new_v4(), Uuid::new_v4());
        con.add_link(other);

        con.set_origin(Point3::new(0.0, 0.0, 3.0));

        assert_eq!(con.frame.origin, Point3::new(0.0, 0.0, 3.0));
        assert_eq!(con.frame.axis, Vec3::Z);
        assert!(con.is_linked_to(other));
        assert!(con.check_frame(1e-9).is_ok());
    }

    #[test]
    fn test_frame_mismatch_detected() {
        let owner = Uuid::new_v4();
        let mut con = Connector::new(owner, Point3::ORIGIN, Vec3::Z, ConnectorKind::End);
        con.frame.origin = Point3::new(0.5, 0.0, 0.0);

        match con.check_frame(1e-6) {
            Err(RealignError::FrameMismatch { element, connector, offset }) => {
                assert_eq!(element, owner);
                assert_eq!(connector, con.id());
                assert!((offset - 0.5).abs() < 1e-12);
            }
            other => panic!("expected FrameMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_links_are_deduplicated() {
        let mut con = Connector::new(Uuid::new_v4(), Point3::ORIGIN, Vec3::X, ConnectorKind::End);
        let target = ConnectorRef::new(Uuid::new_v4(), Uuid::new_v4());
        con.add_link(target);
        con.add_link(target);
        assert_eq!(con.links.len(), 1);
        assert!(con.remove_link(target));
        assert!(!con.remove_link(target));
    }

    #[test]
    fn test_terminal_kind() {
        let owner = Uuid::new_v4();
        let of_kind = |kind| Connector::new(owner, Point3::ORIGIN, Vec3::X, kind);
        assert!(of_kind(ConnectorKind::End).is_terminal());
        assert!(!of_kind(ConnectorKind::Curve).is_terminal());
        assert!(!of_kind(ConnectorKind::Physical).is_terminal());
    }
}
