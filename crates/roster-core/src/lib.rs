//! Roster Core
//!
//! Incremental grouping and windowing over record lists:
//! - Resolve a group key from a record by dotted path
//! - Group records in bounded chunks, off the caller's thread when possible
//! - Stamp every grouping pass with a generation so stale results are dropped
//! - Reveal grouped records a budget at a time as the viewport scrolls
//!
//! # Architecture
//!
//! ```text
//! records ─► GroupingEngine (chunked) ─► GroupedSnapshot ─► WindowingController ─► VisibleWindow
//!                                                                  ▲
//!                                         ScrollEdgeDetector ──────┘ (NearBottom)
//! ```
//!
//! # Example
//!
//! ```rust
//! use roster_core::prelude::*;
//! use serde_json::json;
//!
//! let records: Vec<Record> = ["alice", "Bob", "anna"]
//!     .iter()
//!     .map(|name| Record::new(json!({ "firstname": name })))
//!     .collect();
//!
//! let snapshot = group_now(
//!     Generation(1),
//!     &records,
//!     Category::FirstName.key_path(),
//!     GroupingOptions::default(),
//! );
//! assert_eq!(snapshot.get("A").map(<[Record]>::len), Some(2));
//!
//! let mut windowing = WindowingController::new(RevealBudget::default());
//! windowing.advance(&snapshot);
//! assert!(windowing.is_complete(&snapshot));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod category;
pub mod engine;
pub mod error;
pub mod generation;
pub mod key_path;
pub mod record;
pub mod scroll;
pub mod snapshot;
pub mod windowing;

// Re-exports for convenience
pub use category::{category_options, Category, CategoryOption};
pub use engine::{
    group_async, group_now, reply_channel, select_engine, EngineKind, GroupingEngine, GroupingJob,
    GroupingOptions, GroupingReply, InlineEngine, ReplyReceiver, ReplySender, TaskPoolEngine,
    DEFAULT_CHUNK_SIZE,
};
pub use error::{CoreResult, GroupingError};
pub use generation::{Generation, GenerationCounter};
pub use key_path::{count_matching, resolve_key, GroupKey, KeyPath, UNDEFINED_KEY};
pub use record::Record;
pub use scroll::{EdgeHits, EdgeThresholds, ScrollEdge, ScrollEdgeDetector, ScrollMetrics};
pub use snapshot::{GroupAccumulator, GroupedSnapshot, SortPolicy};
pub use windowing::{advance, RevealBudget, VisibleWindow, WindowingController, DEFAULT_REVEAL_BUDGET};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for grouping and windowing
    pub use crate::category::Category;
    pub use crate::engine::{group_now, GroupingEngine, GroupingJob, GroupingOptions, GroupingReply};
    pub use crate::generation::{Generation, GenerationCounter};
    pub use crate::key_path::{resolve_key, GroupKey, KeyPath};
    pub use crate::record::Record;
    pub use crate::scroll::{ScrollEdge, ScrollEdgeDetector, ScrollMetrics};
    pub use crate::snapshot::{GroupedSnapshot, SortPolicy};
    pub use crate::windowing::{RevealBudget, VisibleWindow, WindowingController};
}
