//! Change sets: batched model mutations applied all-or-nothing.

use crate::error::{RealignError, RealignResult};
use crate::geometry::{Point3, Vec3};
use crate::model::{ConnectorId, Element, ElementId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single model mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Change {
    /// Move one connector (and its frame) in place.
    SetConnectorOrigin {
        element: ElementId,
        connector: ConnectorId,
        origin: Point3,
    },
    /// Rigidly shift a whole element.
    TranslateElement { element: ElementId, offset: Vec3 },
}

impl Change {
    fn apply(&self, elements: &mut HashMap<ElementId, Element>) -> RealignResult<()> {
        match *self {
            Change::SetConnectorOrigin {
                element,
                connector,
                origin,
            } => {
                let target = elements
                    .get_mut(&element)
                    .ok_or(RealignError::ElementNotFound(element))?;
                let con = target
                    .connector_mut(connector)
                    .ok_or(RealignError::ConnectorNotFound { element, connector })?;
                con.set_origin(origin);
            }
            Change::TranslateElement { element, offset } => {
                elements
                    .get_mut(&element)
                    .ok_or(RealignError::ElementNotFound(element))?
                    .translate(offset);
            }
        }
        Ok(())
    }
}

/// An ordered batch of changes committed under one label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    pub label: String,
    pub changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            changes: Vec::new(),
        }
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Apply every change to `elements` in order.
    ///
    /// Stops at the first failure, so callers must apply to a scratch copy
    /// when they need atomicity.
    pub fn apply_to(
        &self,
        elements: &mut HashMap<ElementId, Element>,
    ) -> RealignResult<CommitSummary> {
        let mut summary = CommitSummary {
            label: self.label.clone(),
            ..CommitSummary::default()
        };
        for change in &self.changes {
            change.apply(elements)?;
            match change {
                Change::SetConnectorOrigin { .. } => summary.relocated += 1,
                Change::TranslateElement { .. } => summary.translated += 1,
            }
        }
        Ok(summary)
    }
}

/// What a committed change set did.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommitSummary {
    pub label: String,
    /// Number of connectors relocated.
    pub relocated: usize,
    /// Number of elements translated.
    pub translated: usize,
}
