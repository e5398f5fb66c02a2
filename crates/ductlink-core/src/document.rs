//! Model document: the element store with commit and undo/redo.

use crate::error::{RealignError, RealignResult};
use crate::graph::ConnectorGraph;
use crate::host::Transactional;
use crate::model::{Connector, ConnectorRef, Element, ElementId, ElementKind};
use crate::transaction::{ChangeSet, CommitSummary};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// A snapshot of document state for undo/redo.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentSnapshot {
    label: String,
    elements: HashMap<ElementId, Element>,
    order: Vec<ElementId>,
}

/// A model document containing all elements of a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// All elements, keyed by ID.
    pub elements: HashMap<ElementId, Element>,
    /// Insertion order of elements.
    pub order: Vec<ElementId>,
    #[serde(skip)]
    undo_stack: Vec<DocumentSnapshot>,
    #[serde(skip)]
    redo_stack: Vec<DocumentSnapshot>,
}

impl Default for ModelDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            elements: HashMap::new(),
            order: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    fn snapshot(&self, label: &str) -> DocumentSnapshot {
        DocumentSnapshot {
            label: label.to_string(),
            elements: self.elements.clone(),
            order: self.order.clone(),
        }
    }

    fn push_undo(&mut self, label: &str) {
        let snapshot = self.snapshot(label);
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last committed change set.
    /// Returns the label of the undone step, or None if there is nothing to undo.
    pub fn undo(&mut self) -> Option<String> {
        let snapshot = self.undo_stack.pop()?;
        let current = self.snapshot(&snapshot.label);
        self.redo_stack.push(current);

        self.elements = snapshot.elements;
        self.order = snapshot.order;
        Some(snapshot.label)
    }

    /// Redo the last undone change set.
    pub fn redo(&mut self) -> Option<String> {
        let snapshot = self.redo_stack.pop()?;
        let current = self.snapshot(&snapshot.label);
        self.undo_stack.push(current);

        self.elements = snapshot.elements;
        self.order = snapshot.order;
        Some(snapshot.label)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Add an element and return its ID.
    ///
    /// An element with an ID already in the document replaces the old one in place.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id();
        if self.elements.insert(id, element).is_none() {
            self.order.push(id);
        }
        id
    }

    /// Remove an element. Links pointing at it are left dangling.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        self.order.retain(|&element_id| element_id != id);
        self.elements.remove(&id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    /// Elements in insertion order.
    pub fn elements_ordered(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    fn connector_mut(&mut self, reference: ConnectorRef) -> RealignResult<&mut Connector> {
        self.elements
            .get_mut(&reference.element)
            .ok_or(RealignError::ElementNotFound(reference.element))?
            .connector_mut(reference.connector)
            .ok_or(RealignError::ConnectorNotFound {
                element: reference.element,
                connector: reference.connector,
            })
    }

    /// Cross-reference two connectors.
    pub fn link(&mut self, a: ConnectorRef, b: ConnectorRef) -> RealignResult<()> {
        // Resolve both ends before touching either.
        self.connector(a)?;
        self.connector(b)?;
        self.connector_mut(a)?.add_link(b);
        self.connector_mut(b)?.add_link(a);
        Ok(())
    }

    /// Remove the cross-reference between two connectors.
    /// Returns true if either side was linked.
    pub fn unlink(&mut self, a: ConnectorRef, b: ConnectorRef) -> RealignResult<bool> {
        self.connector(a)?;
        self.connector(b)?;
        let removed_a = self.connector_mut(a)?.remove_link(b);
        let removed_b = self.connector_mut(b)?.remove_link(a);
        Ok(removed_a || removed_b)
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl ConnectorGraph for ModelDocument {
    fn element_kind(&self, element: ElementId) -> RealignResult<ElementKind> {
        self.element(element)
            .map(|e| e.kind)
            .ok_or(RealignError::ElementNotFound(element))
    }

    fn connectors_of(&self, element: ElementId) -> RealignResult<Vec<Connector>> {
        self.element(element)
            .map(|e| e.connectors().to_vec())
            .ok_or(RealignError::ElementNotFound(element))
    }

    fn connector(&self, reference: ConnectorRef) -> RealignResult<Connector> {
        self.element(reference.element)
            .ok_or(RealignError::ElementNotFound(reference.element))?
            .connector(reference.connector)
            .cloned()
            .ok_or(RealignError::ConnectorNotFound {
                element: reference.element,
                connector: reference.connector,
            })
    }
}

impl Transactional for ModelDocument {
    fn commit(&mut self, changes: ChangeSet) -> RealignResult<CommitSummary> {
        let mut scratch = self.elements.clone();
        let summary = changes.apply_to(&mut scratch).inspect_err(|e| {
            log::warn!("Rolled back '{}': {}", changes.label, e);
        })?;

        self.push_undo(&changes.label);
        self.elements = scratch;
        log::info!(
            "Committed '{}' ({} relocated, {} translated)",
            summary.label,
            summary.relocated,
            summary.translated
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point3, Vec3};
    use crate::model::ConnectorKind;
    use crate::transaction::Change;

    fn linked_pair() -> (ModelDocument, ElementId, ElementId) {
        let mut doc = ModelDocument::new();
        let duct = Element::duct(Point3::ORIGIN, Point3::new(0.0, 0.0, 10.0));
        let fitting = Element::fitting(Point3::ORIGIN, &[(Point3::ORIGIN, -Vec3::Z)]);
        let a = duct.connectors()[0].reference();
        let b = fitting.connectors()[0].reference();
        let duct_id = doc.add_element(duct);
        let fitting_id = doc.add_element(fitting);
        doc.link(a, b).unwrap();
        (doc, duct_id, fitting_id)
    }

    #[test]
    fn test_document_creation() {
        let doc = ModelDocument::new();
        assert!(doc.is_empty());
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_add_and_remove_element() {
        let mut doc = ModelDocument::new();
        let id = doc.add_element(Element::duct(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(doc.len(), 1);
        assert!(doc.element(id).is_some());
        assert!(doc.remove_element(id).is_some());
        assert!(doc.is_empty());
        assert!(doc.order.is_empty());
    }

    #[test]
    fn test_re_adding_element_replaces_in_place() {
        let mut doc = ModelDocument::new();
        let duct = Element::duct(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0));
        let id = doc.add_element(duct.clone());
        let other = doc.add_element(Element::fitting(Point3::ORIGIN, &[]));

        let renamed = duct.with_name("D2");
        assert_eq!(doc.add_element(renamed), id);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.order, vec![id, other]);
        let names: Vec<_> = doc.elements_ordered().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["D2", ""]);
    }

    #[test]
    fn test_link_is_symmetric() {
        let (doc, duct_id, fitting_id) = linked_pair();
        let duct_con = &doc.element(duct_id).unwrap().connectors()[0];
        let fitting_con = &doc.element(fitting_id).unwrap().connectors()[0];
        assert!(duct_con.is_linked_to(fitting_con.reference()));
        assert!(fitting_con.is_linked_to(duct_con.reference()));

        let linked = doc.linked_connectors_of(duct_con).unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].owner(), fitting_id);
    }

    #[test]
    fn test_unlink() {
        let (mut doc, duct_id, fitting_id) = linked_pair();
        let a = doc.element(duct_id).unwrap().connectors()[0].reference();
        let b = doc.element(fitting_id).unwrap().connectors()[0].reference();
        assert!(doc.unlink(a, b).unwrap());
        assert!(!doc.unlink(a, b).unwrap());
    }

    #[test]
    fn test_link_missing_connector_leaves_document_untouched() {
        let (mut doc, duct_id, _) = linked_pair();
        let a = doc.element(duct_id).unwrap().connectors()[1].reference();
        let ghost = ConnectorRef::new(Uuid::new_v4(), Uuid::new_v4());
        assert!(matches!(doc.link(a, ghost), Err(RealignError::ElementNotFound(_))));
        assert!(doc.element(duct_id).unwrap().connectors()[1].links.is_empty());
    }

    #[test]
    fn test_stale_links_are_skipped() {
        let (mut doc, duct_id, fitting_id) = linked_pair();
        doc.remove_element(fitting_id);
        let duct_con = doc.element(duct_id).unwrap().connectors()[0].clone();
        assert!(doc.linked_connectors_of(&duct_con).unwrap().is_empty());
    }

    #[test]
    fn test_graph_reads() {
        let (doc, duct_id, _) = linked_pair();
        assert_eq!(doc.element_kind(duct_id).unwrap(), ElementKind::Duct);
        assert_eq!(doc.connectors_of(duct_id).unwrap().len(), 2);

        let ghost = Uuid::new_v4();
        assert_eq!(doc.connectors_of(ghost), Err(RealignError::ElementNotFound(ghost)));
        assert_eq!(doc.element_kind(ghost), Err(RealignError::ElementNotFound(ghost)));
    }

    #[test]
    fn test_commit_and_undo_redo() {
        let (mut doc, duct_id, fitting_id) = linked_pair();
        let con_id = doc.element(duct_id).unwrap().connectors()[0].id();

        let mut set = ChangeSet::new("Disconnect connector");
        set.push(Change::SetConnectorOrigin {
            element: duct_id,
            connector: con_id,
            origin: Point3::new(0.0, 0.0, 3.0),
        });
        let summary = doc.commit(set).unwrap();
        assert_eq!(summary.relocated, 1);
        assert!(doc.can_undo());

        let moved = doc.element(duct_id).unwrap().connector(con_id).unwrap().origin;
        assert_eq!(moved, Point3::new(0.0, 0.0, 3.0));

        assert_eq!(doc.undo().as_deref(), Some("Disconnect connector"));
        let restored = doc.element(duct_id).unwrap().connector(con_id).unwrap().origin;
        assert_eq!(restored, Point3::ORIGIN);
        assert!(doc.can_redo());

        assert_eq!(doc.redo().as_deref(), Some("Disconnect connector"));
        let again = doc.element(duct_id).unwrap().connector(con_id).unwrap().origin;
        assert_eq!(again, Point3::new(0.0, 0.0, 3.0));
        assert!(doc.element(fitting_id).is_some());
    }

    #[test]
    fn test_failed_commit_is_all_or_nothing() {
        let (mut doc, duct_id, fitting_id) = linked_pair();
        let before = doc.elements.clone();

        let mut set = ChangeSet::new("Reconnect connector");
        set.push(Change::TranslateElement {
            element: fitting_id,
            offset: Vec3::new(0.0, 0.0, 2.0),
        });
        set.push(Change::SetConnectorOrigin {
            element: duct_id,
            connector: Uuid::new_v4(),
            origin: Point3::ORIGIN,
        });

        assert!(matches!(doc.commit(set), Err(RealignError::ConnectorNotFound { .. })));
        assert_eq!(doc.elements, before);
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let mut doc = ModelDocument::new();
        let id = doc.add_element(Element::fitting(Point3::ORIGIN, &[]));
        for _ in 0..(MAX_UNDO_HISTORY + 5) {
            let mut set = ChangeSet::new("Nudge");
            set.push(Change::TranslateElement { element: id, offset: Vec3::X });
            doc.commit(set).unwrap();
        }
        assert_eq!(doc.undo_stack.len(), MAX_UNDO_HISTORY);
    }

    #[test]
    fn test_json_roundtrip_keeps_links() {
        let (doc, duct_id, fitting_id) = linked_pair();
        let json = doc.to_json().unwrap();
        let loaded = ModelDocument::from_json(&json).unwrap();

        assert_eq!(loaded.id, doc.id);
        assert_eq!(loaded.order, vec![duct_id, fitting_id]);
        let con = &loaded.element(duct_id).unwrap().connectors()[0];
        assert_eq!(con.kind, ConnectorKind::End);
        assert_eq!(con.links.len(), 1);
        assert!(!loaded.can_undo());
    }
}
