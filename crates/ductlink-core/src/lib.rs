//! DuctLink Core Library
//!
//! Connector realignment for duct networks: move a duct connector along its
//! centerline, either breaking the joint (Disconnect) or dragging the
//! neighboring fitting along with it (Reconnect).

pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod host;
pub mod model;
pub mod realign;
pub mod resolve;
pub mod transaction;

pub use config::RealignConfig;
pub use document::ModelDocument;
pub use error::{RealignError, RealignResult};
pub use geometry::{Line, Point3, Vec3, distance, project_point_onto_line};
pub use graph::ConnectorGraph;
pub use host::{
    Pick, PickFilter, PointPicker, ScriptedPicker, Transactional, any_element, ducts_only,
};
pub use model::{
    Connector, ConnectorId, ConnectorKind, ConnectorRef, Element, ElementGeometry, ElementId,
    ElementKind, LocalFrame,
};
pub use realign::{Operation, Outcome, Plan, RealignEngine};
pub use resolve::{connected_neighbor, connected_neighbors, nearest};
pub use transaction::{Change, ChangeSet, CommitSummary};
