/// Docflow: lightweight document management core
///
/// This library provides an in-memory document management system: folder
/// trees, documents with tags and metadata, approval workflows with gated
/// steps, and per-user notifications, all held in a snapshot-swapping
/// store with a change feed.

// Core configuration and setup
pub mod config;

// Domain model - entities, creation specs, and update patches
pub mod domain;

// Typed errors for store and engine operations
pub mod error;

// Entity store - snapshot reads, identity-assigning mutations, change feed
pub mod store;

// Workflow engine - step transitions and derived workflow status
pub mod engine;

// Query layer - document filtering/sorting and folder-tree helpers
pub mod query;

// HTTP API layer - REST endpoints per resource
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use domain::{Document, Folder, Notification, User, Workflow, WorkflowStep};
pub use engine::WorkflowEngine;
pub use error::{Error, Result};
pub use server::start_server;
pub use store::{EntityStore, Snapshot, StoreEvent};
