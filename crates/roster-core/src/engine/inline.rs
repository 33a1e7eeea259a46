//! In-thread grouping fallback

use super::{EngineKind, GroupingEngine, GroupingJob, GroupingOptions, GroupingReply, ReplySender};
use crate::generation::Generation;
use crate::key_path::KeyPath;
use crate::record::Record;
use crate::snapshot::{GroupAccumulator, GroupedSnapshot};

/// Group `records` in a single synchronous pass
#[must_use]
pub fn group_now(
    generation: Generation,
    records: &[Record],
    key_path: KeyPath,
    options: GroupingOptions,
) -> GroupedSnapshot {
    let mut acc = GroupAccumulator::new(key_path);
    acc.push_chunk(records);
    acc.finish(generation, options.sort())
}

/// Engine that groups on the caller's thread
///
/// The reply is already queued when `submit` returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineEngine;

impl GroupingEngine for InlineEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Inline
    }

    fn submit(&self, job: GroupingJob, reply: ReplySender) {
        let snapshot = group_now(job.generation, &job.records, job.key_path, job.options);
        tracing::debug!(
            generation = %job.generation,
            groups = snapshot.group_count(),
            "inline grouping finished"
        );
        // A dropped receiver means nobody wants the result any more.
        let _ = reply.send(GroupingReply::new(snapshot));
    }
}
