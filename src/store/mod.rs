/// Entity Store Layer
///
/// This module owns all mutable domain collections. It provides:
/// - Immutable whole-store snapshots via lock-free ArcSwap reads
/// - Generated-identity creation and timestamp-stamped partial updates
/// - A broadcast change feed so consumers can re-render per mutation

// Snapshot and change-event definitions
pub mod snapshot;

// The snapshot-swapping store itself
pub mod entity_store;

// Re-export commonly used types
pub use entity_store::EntityStore;
pub use snapshot::{Snapshot, StoreEvent};
