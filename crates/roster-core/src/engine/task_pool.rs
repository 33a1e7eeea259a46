//! Task-pool grouping engine
//!
//! Runs each job on a spawned tokio task, processing one chunk per slice and
//! yielding to the scheduler in between. A job whose generation has been
//! superseded is abandoned at the next chunk boundary.

use super::{EngineKind, GroupingEngine, GroupingJob, GroupingReply, ReplySender};
use crate::generation::GenerationCounter;
use crate::snapshot::{GroupAccumulator, GroupedSnapshot};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Engine backed by a tokio runtime
#[derive(Debug, Clone)]
pub struct TaskPoolEngine {
    handle: Handle,
    counter: Option<Arc<GenerationCounter>>,
}

impl TaskPoolEngine {
    /// Spawn onto `handle`
    #[inline]
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            counter: None,
        }
    }

    /// Engine on the ambient runtime, if there is one
    #[inline]
    #[must_use]
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Abandon jobs that `counter` no longer considers current
    #[inline]
    #[must_use]
    pub fn with_counter(mut self, counter: Arc<GenerationCounter>) -> Self {
        self.counter = Some(counter);
        self
    }
}

impl GroupingEngine for TaskPoolEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::TaskPool
    }

    fn submit(&self, job: GroupingJob, reply: ReplySender) {
        if job.records.is_empty() {
            let snapshot = GroupedSnapshot::empty(job.generation);
            let _ = reply.send(GroupingReply::new(snapshot));
            return;
        }

        let counter = self.counter.clone();
        self.handle.spawn(async move {
            if let Some(snapshot) = run_chunked(job, counter.as_deref()).await {
                let _ = reply.send(GroupingReply::new(snapshot));
            }
        });
    }
}

async fn run_chunked(job: GroupingJob, counter: Option<&GenerationCounter>) -> Option<GroupedSnapshot> {
    let GroupingJob {
        generation,
        records,
        key_path,
        options,
    } = job;
    let total = records.len();
    let mut acc = GroupAccumulator::new(key_path);

    for chunk in records.chunks(options.chunk_size()) {
        if counter.is_some_and(|c| !c.is_current(generation)) {
            tracing::debug!(%generation, seen = acc.seen(), total, "grouping superseded, abandoning");
            return None;
        }
        acc.push_chunk(chunk);
        tracing::trace!(%generation, seen = acc.seen(), total, "chunk grouped");
        tokio::task::yield_now().await;
    }

    let snapshot = acc.finish(generation, options.sort());
    tracing::debug!(%generation, groups = snapshot.group_count(), total, "grouping finished");
    Some(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{group_async, group_now, reply_channel, GroupingOptions};
    use crate::generation::Generation;
    use crate::key_path::KeyPath;
    use crate::record::Record;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ages(count: usize) -> Vec<Record> {
        (0..count)
            .map(|i| Record::new(json!({"id": i, "dob": {"age": 20 + i % 7}})))
            .collect()
    }

    #[tokio::test]
    async fn matches_inline_result() {
        let records = ages(1_000);
        let path = KeyPath::parse("dob.age").unwrap();
        let options = GroupingOptions::new().with_chunk_size(64).unwrap();

        let engine = TaskPoolEngine::try_current().unwrap();
        let job = GroupingJob::new(Generation(1), records.clone(), path.clone()).with_options(options);
        let pooled = group_async(&engine, job).await.unwrap();
        let inline = group_now(Generation(1), &records, path, options);

        assert_eq!(pooled, inline);
    }

    #[tokio::test]
    async fn empty_input_replies_immediately() {
        let engine = TaskPoolEngine::try_current().unwrap();
        let (tx, mut rx) = reply_channel();
        engine.submit(
            GroupingJob::new(Generation(3), Vec::new(), KeyPath::parse("nat").unwrap()),
            tx,
        );

        let reply = rx.try_recv().unwrap();
        assert!(reply.snapshot.is_empty());
        assert_eq!(reply.generation, Generation(3));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn superseded_job_is_abandoned() {
        let counter = Arc::new(GenerationCounter::new());
        let engine = TaskPoolEngine::try_current()
            .unwrap()
            .with_counter(Arc::clone(&counter));
        let path = KeyPath::parse("dob.age").unwrap();
        let options = GroupingOptions::new().with_chunk_size(10).unwrap();
        let (tx, mut rx) = reply_channel();

        let stale = counter.advance();
        engine.submit(
            GroupingJob::new(stale, ages(100), path.clone()).with_options(options),
            tx.clone(),
        );
        let fresh = counter.advance();
        engine.submit(GroupingJob::new(fresh, ages(5), path).with_options(options), tx);

        let reply = rx.recv().await.unwrap();
        assert_eq!(reply.generation, fresh);
        assert_eq!(reply.snapshot.record_count(), 5);
        assert!(rx.try_recv().is_err());
    }
}
