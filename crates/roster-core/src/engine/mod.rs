//! Grouping engines
//!
//! A [`GroupingEngine`] accepts a [`GroupingJob`] and answers with a
//! [`GroupingReply`] on a channel. Callers depend on that message contract
//! only; whether the work ran on a task pool or inline is invisible to them.
//!
//! ```text
//! submit(job) ──► TaskPoolEngine ── chunk, yield, chunk, yield ... ──┐
//!            └──► InlineEngine   ── group in one pass ───────────────┴─► reply channel
//! ```

mod inline;
mod task_pool;

pub use inline::{group_now, InlineEngine};
pub use task_pool::TaskPoolEngine;

use crate::error::{CoreResult, GroupingError};
use crate::generation::{Generation, GenerationCounter};
use crate::key_path::KeyPath;
use crate::record::Record;
use crate::snapshot::{GroupedSnapshot, SortPolicy};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Records processed per slice before yielding
pub const DEFAULT_CHUNK_SIZE: usize = 200;

/// Sending half of a reply channel
pub type ReplySender = mpsc::UnboundedSender<GroupingReply>;

/// Receiving half of a reply channel
pub type ReplyReceiver = mpsc::UnboundedReceiver<GroupingReply>;

/// Create a reply channel
#[inline]
#[must_use]
pub fn reply_channel() -> (ReplySender, ReplyReceiver) {
    mpsc::unbounded_channel()
}

/// Tuning for one grouping pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingOptions {
    chunk_size: usize,
    sort: SortPolicy,
}

impl GroupingOptions {
    /// Default chunking and [`SortPolicy::Auto`]
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With chunk length
    ///
    /// # Errors
    /// `GroupingError::ZeroChunkSize` when `chunk_size` is zero.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> CoreResult<Self> {
        if chunk_size == 0 {
            return Err(GroupingError::ZeroChunkSize);
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    /// With key sort policy
    #[inline]
    #[must_use]
    pub fn with_sort(mut self, sort: SortPolicy) -> Self {
        self.sort = sort;
        self
    }

    /// Records per slice
    #[inline]
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Key sort policy
    #[inline]
    #[must_use]
    pub fn sort(&self) -> SortPolicy {
        self.sort
    }
}

impl Default for GroupingOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            sort: SortPolicy::Auto,
        }
    }
}

/// One grouping request
#[derive(Debug, Clone)]
pub struct GroupingJob {
    /// Generation the result belongs to
    pub generation: Generation,
    /// Source records, in order
    pub records: Vec<Record>,
    /// Attribute path to group by
    pub key_path: KeyPath,
    /// Chunking and sorting
    pub options: GroupingOptions,
}

impl GroupingJob {
    /// Create job with default options
    #[inline]
    #[must_use]
    pub fn new(generation: Generation, records: Vec<Record>, key_path: KeyPath) -> Self {
        Self {
            generation,
            records,
            key_path,
            options: GroupingOptions::default(),
        }
    }

    /// With options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: GroupingOptions) -> Self {
        self.options = options;
        self
    }
}

/// Result message of a grouping job
#[derive(Debug, Clone)]
pub struct GroupingReply {
    /// Generation of the job that produced this reply
    pub generation: Generation,
    /// The finished snapshot
    pub snapshot: Arc<GroupedSnapshot>,
}

impl GroupingReply {
    /// Wrap a finished snapshot
    #[inline]
    #[must_use]
    pub fn new(snapshot: GroupedSnapshot) -> Self {
        Self {
            generation: snapshot.generation(),
            snapshot: Arc::new(snapshot),
        }
    }
}

/// Where grouping work executes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Spawned tokio task, yielding between chunks
    TaskPool,
    /// Synchronously on the caller's thread
    Inline,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TaskPool => f.write_str("task-pool"),
            Self::Inline => f.write_str("inline"),
        }
    }
}

/// Asynchronous grouping contract
///
/// `submit` never blocks on the grouping itself for the task-pool engine.
/// Exactly one reply is sent per job unless the job is abandoned because a
/// newer generation superseded it.
pub trait GroupingEngine: Send + Sync + fmt::Debug {
    /// Execution context of this engine
    fn kind(&self) -> EngineKind;

    /// Start grouping `job`; the result arrives on `reply`
    fn submit(&self, job: GroupingJob, reply: ReplySender);
}

/// Pick the isolated engine when a tokio runtime is available
///
/// Falls back to [`InlineEngine`] otherwise. Both produce identical
/// snapshots for the same job.
#[must_use]
pub fn select_engine(counter: Arc<GenerationCounter>) -> Arc<dyn GroupingEngine> {
    match TaskPoolEngine::try_current() {
        Some(engine) => {
            tracing::debug!("grouping on task pool");
            Arc::new(engine.with_counter(counter))
        }
        None => {
            tracing::debug!("no runtime available, grouping inline");
            Arc::new(InlineEngine)
        }
    }
}

/// Submit `job` and await its reply
///
/// Returns `None` when the job was abandoned as superseded.
pub async fn group_async(engine: &dyn GroupingEngine, job: GroupingJob) -> Option<GroupedSnapshot> {
    let (tx, mut rx) = reply_channel();
    engine.submit(job, tx);
    let reply = rx.recv().await?;
    Some(Arc::try_unwrap(reply.snapshot).unwrap_or_else(|shared| (*shared).clone()))
}
