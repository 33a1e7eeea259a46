//! User hub: the page coordinator
//!
//! Owns the current page of users, the active search term and category, the
//! current [`GroupedSnapshot`] and the visible window over it. State changes
//! are explicit transitions:
//!
//! ```text
//! load_page / search / set_category ─► regroup (new generation, state cleared)
//!                                          │
//!                         engine reply ─► apply (stale generations dropped)
//!                                          │
//!                            on_scroll ─► reveal_more (NearBottom only)
//! ```
//!
//! Grouping runs on the engine; replies come back through the hub's inbox
//! and are applied with [`UserHub::apply`], [`UserHub::poll_replies`] or
//! [`UserHub::settle`].

use crate::config::HubConfig;
use crate::error::HubResult;
use crate::filter::filter_by_name;
use roster_core::{
    count_matching, reply_channel, select_engine, Category, EdgeHits, EngineKind, Generation,
    GenerationCounter, GroupKey, GroupedSnapshot, GroupingEngine, GroupingJob, GroupingOptions,
    GroupingReply, Record, ReplyReceiver, ReplySender, ScrollEdge, ScrollEdgeDetector,
    ScrollMetrics, VisibleWindow, WindowingController,
};
use roster_source::{FetchError, PageCache, PageSource};
use std::sync::Arc;

/// Pages listed in the pager, starting at the current one
pub const DISPLAYED_PAGES: u32 = 3;

/// Coordinates page loads, grouping and windowing
#[derive(Debug)]
pub struct UserHub<S> {
    config: HubConfig,
    pages: PageCache<S>,
    engine: Arc<dyn GroupingEngine>,
    generations: Arc<GenerationCounter>,
    replies: ReplySender,
    inbox: ReplyReceiver,
    options: GroupingOptions,
    users: Vec<Record>,
    search: String,
    category: Category,
    current_page: u32,
    snapshot: Option<Arc<GroupedSnapshot>>,
    windowing: WindowingController,
    detector: ScrollEdgeDetector,
}

impl<S: PageSource> UserHub<S> {
    /// Create hub over `source`
    ///
    /// Uses the task-pool engine when called inside a tokio runtime and the
    /// inline engine otherwise.
    ///
    /// # Errors
    /// `HubError::Config` or `HubError::Grouping` for out-of-range settings.
    pub fn new(source: S, config: HubConfig) -> HubResult<Self> {
        config.validate()?;
        let options = config.grouping_options()?;
        let budget = config.budget()?;
        let generations = Arc::new(GenerationCounter::new());
        let engine = select_engine(Arc::clone(&generations));
        let (replies, inbox) = reply_channel();

        Ok(Self {
            pages: PageCache::new(source, config.cache_capacity),
            engine,
            generations,
            replies,
            inbox,
            options,
            users: Vec::new(),
            search: String::new(),
            category: config.default_category,
            current_page: 1,
            snapshot: None,
            windowing: WindowingController::new(budget),
            detector: ScrollEdgeDetector::new(config.thresholds()),
            config,
        })
    }

    /// Replace the grouping engine
    #[inline]
    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn GroupingEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Load `page` and regroup it
    ///
    /// On failure nothing changes: the previous users, snapshot and window
    /// stay in place until a later load succeeds.
    ///
    /// # Errors
    /// `HubError::Fetch` when the page cannot be loaded.
    pub async fn load_page(&mut self, page: u32) -> HubResult<Generation> {
        if page == 0 {
            return Err(FetchError::InvalidPage(page).into());
        }

        let records = match self.pages.get_page(page, self.config.page_size).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(page, error = %err, "page load failed, keeping current state");
                return Err(err.into());
            }
        };

        tracing::info!(page, users = records.len(), "page loaded");
        self.users = records.to_vec();
        self.current_page = page;
        Ok(self.regroup())
    }

    /// Switch grouping category and regroup
    pub fn set_category(&mut self, category: Category) -> Generation {
        tracing::info!(%category, "category changed");
        self.category = category;
        self.regroup()
    }

    /// Filter users by name and regroup; a blank term shows everyone
    pub fn search(&mut self, term: &str) -> Generation {
        tracing::info!(term, "search changed");
        self.search = term.to_string();
        self.regroup()
    }

    /// Discard snapshot and window, then group the filtered users again
    ///
    /// Any grouping still running for an earlier generation is superseded.
    pub fn regroup(&mut self) -> Generation {
        let generation = self.generations.advance();
        self.snapshot = None;
        self.windowing.reset();

        let records = filter_by_name(&self.users, &self.search);
        tracing::debug!(
            %generation,
            records = records.len(),
            category = %self.category,
            engine = %self.engine.kind(),
            "grouping submitted"
        );

        let job = GroupingJob::new(generation, records, self.category.key_path())
            .with_options(self.options);
        self.engine.submit(job, self.replies.clone());
        generation
    }

    /// Apply a grouping reply if it belongs to the current generation
    ///
    /// Stale replies are dropped silently. Applying a reply reveals the
    /// first increment of the new snapshot. Returns whether it was applied.
    pub fn apply(&mut self, reply: GroupingReply) -> bool {
        if !self.generations.is_current(reply.generation) {
            tracing::debug!(
                stale = %reply.generation,
                current = %self.generations.current(),
                "discarding superseded grouping"
            );
            return false;
        }

        self.windowing.reset();
        let revealed = self.windowing.advance(&reply.snapshot);
        tracing::info!(
            generation = %reply.generation,
            groups = reply.snapshot.group_count(),
            records = reply.snapshot.record_count(),
            revealed,
            "snapshot applied"
        );
        self.snapshot = Some(reply.snapshot);
        true
    }

    /// Apply every reply already waiting in the inbox
    ///
    /// Returns how many were applied (stale ones are not counted).
    pub fn poll_replies(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(reply) = self.inbox.try_recv() {
            if self.apply(reply) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until the current generation's snapshot is applied
    pub async fn settle(&mut self) {
        while !self.is_settled() {
            match self.inbox.recv().await {
                Some(reply) => {
                    self.apply(reply);
                }
                None => break,
            }
        }
    }

    /// Whether the latest grouping request has been applied
    #[must_use]
    pub fn is_settled(&self) -> bool {
        let current = self.generations.current();
        current == Generation::INITIAL
            || self
                .snapshot
                .as_ref()
                .is_some_and(|snapshot| snapshot.generation() == current)
    }

    /// Handle one scroll notification
    ///
    /// `NearBottom` reveals the next increment; `NearTop` needs no action
    /// because revealed records are never hidden again.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> EdgeHits {
        let hits = self.detector.evaluate(metrics);
        for edge in &hits {
            match edge {
                ScrollEdge::NearBottom => {
                    self.reveal_more();
                }
                ScrollEdge::NearTop => tracing::trace!("near top"),
            }
        }
        hits
    }

    /// Reveal the next increment of the current snapshot
    ///
    /// Returns how many records became visible; zero when there is no
    /// snapshot yet or everything is already shown.
    pub fn reveal_more(&mut self) -> usize {
        match &self.snapshot {
            Some(snapshot) if !self.windowing.is_complete(snapshot) => {
                let revealed = self.windowing.advance(snapshot);
                tracing::debug!(revealed, total = self.windowing.window().revealed_count(), "revealed more");
                revealed
            }
            _ => 0,
        }
    }

    /// Current visible window
    #[inline]
    #[must_use]
    pub fn window(&self) -> &VisibleWindow {
        self.windowing.window()
    }

    /// Current snapshot, if grouping has finished
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Option<&GroupedSnapshot> {
        self.snapshot.as_deref()
    }

    /// Groups with at least one visible record
    pub fn visible_groups(&self) -> impl Iterator<Item = (&GroupKey, &[Record])> {
        self.windowing.window().visible_groups()
    }

    /// Keys of groups with at least one visible record
    #[must_use]
    pub fn group_keys(&self) -> Vec<&GroupKey> {
        self.visible_groups().map(|(key, _)| key).collect()
    }

    /// Every record of the snapshot is visible
    #[must_use]
    pub fn is_fully_revealed(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|snapshot| self.windowing.is_complete(snapshot))
    }

    /// Users in the current page that share `record`'s nationality
    #[must_use]
    pub fn nationality_count(&self, record: &Record) -> usize {
        count_matching(&self.users, record, &Category::Nationality.key_path())
    }

    /// Page numbers shown in the pager
    ///
    /// Stops short near `u32::MAX` rather than wrapping.
    #[must_use]
    pub fn displayed_pages(&self) -> Vec<u32> {
        (0..DISPLAYED_PAGES)
            .filter_map(|i| self.current_page.checked_add(i))
            .collect()
    }

    /// Users of the current page, unfiltered
    #[inline]
    #[must_use]
    pub fn users(&self) -> &[Record] {
        &self.users
    }

    /// Active category
    #[inline]
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Active search term
    #[inline]
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search
    }

    /// Page currently shown
    #[inline]
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Latest issued generation
    #[inline]
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generations.current()
    }

    /// Engine execution context
    #[inline]
    #[must_use]
    pub fn engine_kind(&self) -> EngineKind {
        self.engine.kind()
    }

    /// Page cache in front of the source
    #[inline]
    #[must_use]
    pub fn pages(&self) -> &PageCache<S> {
        &self.pages
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &HubConfig {
        &self.config
    }
}
