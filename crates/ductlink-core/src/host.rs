//! Host platform seams: committing changes and acquiring points.

use crate::error::RealignResult;
use crate::geometry::Point3;
use crate::model::{ElementId, ElementKind};
use crate::transaction::{ChangeSet, CommitSummary};
use std::collections::VecDeque;

/// Host model mutation interface.
pub trait Transactional {
    /// Apply every change in `changes`, or none of them.
    fn commit(&mut self, changes: ChangeSet) -> RealignResult<CommitSummary>;
}

/// Outcome of a point pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pick {
    Picked { element: ElementId, point: Point3 },
    /// The user aborted the pick.
    Cancelled,
}

/// Restricts which element kinds may be picked.
pub type PickFilter = fn(ElementKind) -> bool;

/// Only straight duct segments.
pub fn ducts_only(kind: ElementKind) -> bool {
    kind == ElementKind::Duct
}

/// Any element.
pub fn any_element(_kind: ElementKind) -> bool {
    true
}

/// Interactive point acquisition.
pub trait PointPicker {
    /// Ask the user for a point on an element accepted by `filter`.
    fn pick_point(&mut self, filter: PickFilter, prompt: &str) -> RealignResult<Pick>;
}

/// Picker that replays a fixed sequence of picks.
///
/// Returns [`Pick::Cancelled`] once the queue is exhausted. The filter is
/// not consulted; the engine re-checks every pick against the model.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPicker {
    picks: VecDeque<Pick>,
    prompts: Vec<String>,
}

impl ScriptedPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a pick on `element` at `point` (builder style).
    pub fn then_pick(mut self, element: ElementId, point: Point3) -> Self {
        self.picks.push_back(Pick::Picked { element, point });
        self
    }

    /// Queue a cancellation (builder style).
    pub fn then_cancel(mut self) -> Self {
        self.picks.push_back(Pick::Cancelled);
        self
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.picks.len()
    }
}

impl PointPicker for ScriptedPicker {
    fn pick_point(&mut self, _filter: PickFilter, prompt: &str) -> RealignResult<Pick> {
        self.prompts.push(prompt.to_string());
        Ok(self.picks.pop_front().unwrap_or(Pick::Cancelled))
    }
}
