//! Ducts, fittings and other network elements.

use super::{Connector, ConnectorId, ConnectorKind, ElementId};
use crate::geometry::{Point3, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a network element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Straight duct segment (the linear element kind).
    Duct,
    /// Elbow, tee, transition, cap...
    Fitting,
    /// Damper, grille and similar in-line accessories.
    Accessory,
    /// Air handlers, fans, terminals.
    Equipment,
}

/// Placement geometry of an element, apart from its connectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ElementGeometry {
    /// Straight centerline from `start` to `end`.
    Segment { start: Point3, end: Point3 },
    /// Point-placed family instance.
    Point { location: Point3 },
}

impl ElementGeometry {
    fn translate(&mut self, offset: Vec3) {
        match self {
            ElementGeometry::Segment { start, end } => {
                *start = *start + offset;
                *end = *end + offset;
            }
            ElementGeometry::Point { location } => {
                *location = *location + offset;
            }
        }
    }
}

/// A network element owning zero or more connectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub(crate) id: ElementId,
    pub kind: ElementKind,
    /// Display name.
    #[serde(default)]
    pub name: String,
    pub geometry: ElementGeometry,
    #[serde(default)]
    pub(crate) connectors: Vec<Connector>,
}

impl Element {
    /// Create an element without connectors.
    pub fn new(kind: ElementKind, geometry: ElementGeometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: String::new(),
            geometry,
            connectors: Vec::new(),
        }
    }

    /// A straight duct with an `End` connector at each end.
    ///
    /// Both connector frames use the `start -> end` centerline direction.
    pub fn duct(start: Point3, end: Point3) -> Self {
        let mut duct = Self::new(ElementKind::Duct, ElementGeometry::Segment { start, end });
        let axis = end - start;
        duct.add_connector(start, axis, ConnectorKind::End);
        duct.add_connector(end, axis, ConnectorKind::End);
        duct
    }

    /// A fitting placed at `location` with one `End` connector per `(origin, axis)` pair.
    pub fn fitting(location: Point3, ports: &[(Point3, Vec3)]) -> Self {
        let mut fitting = Self::new(ElementKind::Fitting, ElementGeometry::Point { location });
        for &(origin, axis) in ports {
            fitting.add_connector(origin, axis, ConnectorKind::End);
        }
        fitting
    }

    /// Set the display name (builder style).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Add a connector owned by this element and return its ID.
    pub fn add_connector(
        &mut self,
        origin: Point3,
        axis: Vec3,
        kind: ConnectorKind,
    ) -> ConnectorId {
        let connector = Connector::new(self.id, origin, axis, kind);
        let id = connector.id();
        self.connectors.push(connector);
        id
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == id)
    }

    pub fn connector_mut(&mut self, id: ConnectorId) -> Option<&mut Connector> {
        self.connectors.iter_mut().find(|c| c.id == id)
    }

    /// Rigidly shift the element: placement geometry and every connector.
    pub fn translate(&mut self, offset: Vec3) {
        self.geometry.translate(offset);
        for connector in &mut self.connectors {
            connector.translate(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duct_connectors() {
        let duct = Element::duct(Point3::ORIGIN, Point3::new(0.0, 0.0, 10.0));
        assert_eq!(duct.kind, ElementKind::Duct);
        assert_eq!(duct.connectors().len(), 2);
        for con in duct.connectors() {
            assert_eq!(con.owner(), duct.id());
            assert_eq!(con.frame.axis, Vec3::new(0.0, 0.0, 10.0));
            assert!(con.is_terminal());
        }
        assert_eq!(duct.connectors()[1].origin, Point3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn test_translate_moves_everything() {
        let mut fitting = Element::fitting(
            Point3::new(1.0, 0.0, 0.0),
            &[(Point3::ORIGIN, Vec3::Z), (Point3::new(2.0, 0.0, 0.0), Vec3::X)],
        );
        let offset = Vec3::new(-0.1, 0.0, 2.8);
        fitting.translate(offset);

        assert_eq!(
            fitting.geometry,
            ElementGeometry::Point { location: Point3::new(1.0, 0.0, 0.0) + offset }
        );
        assert!(fitting.connectors()[0].origin.approx_eq(Point3::new(-0.1, 0.0, 2.8), 1e-12));
        assert!(fitting.connectors()[1].origin.approx_eq(Point3::new(1.9, 0.0, 2.8), 1e-12));
        for con in fitting.connectors() {
            assert!(con.check_frame(1e-12).is_ok());
        }
    }

    #[test]
    fn test_connector_lookup() {
        let mut duct = Element::duct(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0));
        let id = duct.connectors()[1].id();
        assert!(duct.connector(id).is_some());
        duct.connector_mut(id).unwrap().set_origin(Point3::new(0.5, 0.0, 0.0));
        assert_eq!(duct.connector(id).unwrap().origin, Point3::new(0.5, 0.0, 0.0));
        assert!(duct.connector(Uuid::new_v4()).is_none());
    }
}
