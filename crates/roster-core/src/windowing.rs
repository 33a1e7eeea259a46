//! Scroll-driven windowing over a grouped snapshot
//!
//! The [`VisibleWindow`] holds, per group, a prefix of that group's records.
//! Each [`advance`] step tops groups up in snapshot order until the shared
//! [`RevealBudget`] is spent, so earlier groups fill before later ones.

use crate::error::{CoreResult, GroupingError};
use crate::generation::Generation;
use crate::key_path::GroupKey;
use crate::record::Record;
use crate::snapshot::GroupedSnapshot;
use indexmap::IndexMap;
use serde::Serialize;

/// Records revealed per step when nothing else is configured
pub const DEFAULT_REVEAL_BUDGET: usize = 20;

/// Maximum records revealed in one step, shared across groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevealBudget(usize);

impl RevealBudget {
    /// Create budget
    ///
    /// # Errors
    /// `GroupingError::ZeroRevealBudget` when `records` is zero.
    pub fn new(records: usize) -> CoreResult<Self> {
        if records == 0 {
            return Err(GroupingError::ZeroRevealBudget);
        }
        Ok(Self(records))
    }

    /// Records per step
    #[inline]
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for RevealBudget {
    fn default() -> Self {
        Self(DEFAULT_REVEAL_BUDGET)
    }
}

/// Revealed prefix of every group
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisibleWindow {
    generation: Generation,
    groups: IndexMap<GroupKey, Vec<Record>>,
}

impl VisibleWindow {
    /// Window with nothing revealed
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot generation the prefixes were taken from
    #[inline]
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Revealed records of one group
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[Record]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Revealed length of one group (zero when absent)
    #[inline]
    #[must_use]
    pub fn len_of(&self, key: &str) -> usize {
        self.groups.get(key).map_or(0, Vec::len)
    }

    /// Groups with at least one revealed record, in snapshot order
    pub fn visible_groups(&self) -> impl Iterator<Item = (&GroupKey, &[Record])> {
        self.groups
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(k, v)| (k, v.as_slice()))
    }

    /// Records revealed across all groups
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Nothing revealed yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revealed_count() == 0
    }

    /// Every record of `snapshot` is revealed
    #[must_use]
    pub fn covers(&self, snapshot: &GroupedSnapshot) -> bool {
        snapshot
            .iter()
            .all(|(key, records)| self.len_of(key.as_str()) >= records.len())
    }
}

/// Reveal up to `budget` more records of `snapshot` beyond `previous`
///
/// Groups are visited in snapshot order and topped up one after another.
/// The result contains every snapshot key, possibly with an empty prefix.
#[must_use]
pub fn advance(snapshot: &GroupedSnapshot, previous: &VisibleWindow, budget: RevealBudget) -> VisibleWindow {
    let mut next = previous.clone();
    next.extend_from(snapshot, budget);
    next
}

impl VisibleWindow {
    /// Top groups up in place; returns how many records became visible
    ///
    /// Only the newly revealed records are copied, so a step costs what it
    /// reveals rather than everything already shown.
    fn extend_from(&mut self, snapshot: &GroupedSnapshot, budget: RevealBudget) -> usize {
        let mut remaining = budget.get();
        self.generation = snapshot.generation();

        for (key, records) in snapshot.iter() {
            let shown = self.groups.entry(key.clone()).or_default();
            let already = shown.len().min(records.len());
            let take = (records.len() - already).min(remaining);
            shown.extend_from_slice(&records[already..already + take]);
            remaining -= take;
        }

        budget.get() - remaining
    }
}

/// Owns the visible window and its reveal budget
#[derive(Debug, Clone, Default)]
pub struct WindowingController {
    budget: RevealBudget,
    window: VisibleWindow,
}

impl WindowingController {
    /// Create controller with `budget` records per step
    #[inline]
    #[must_use]
    pub fn new(budget: RevealBudget) -> Self {
        Self {
            budget,
            window: VisibleWindow::empty(),
        }
    }

    /// Clear every group back to empty
    #[inline]
    pub fn reset(&mut self) {
        self.window = VisibleWindow::empty();
    }

    /// Reveal the next increment of `snapshot`
    ///
    /// Returns how many records became visible. Callers must [`reset`]
    /// before advancing against a different snapshot.
    ///
    /// [`reset`]: Self::reset
    pub fn advance(&mut self, snapshot: &GroupedSnapshot) -> usize {
        self.window.extend_from(snapshot, self.budget)
    }

    /// Whether `snapshot` is fully revealed
    #[inline]
    #[must_use]
    pub fn is_complete(&self, snapshot: &GroupedSnapshot) -> bool {
        self.window.covers(snapshot)
    }

    /// Current window
    #[inline]
    #[must_use]
    pub fn window(&self) -> &VisibleWindow {
        &self.window
    }

    /// Records per step
    #[inline]
    #[must_use]
    pub fn budget(&self) -> RevealBudget {
        self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{group_now, GroupingOptions};
    use crate::key_path::KeyPath;
    use serde_json::json;

    fn two_groups(a: usize, b: usize) -> GroupedSnapshot {
        let records: Vec<Record> = std::iter::repeat("A")
            .take(a)
            .chain(std::iter::repeat("B").take(b))
            .enumerate()
            .map(|(i, team)| Record::new(json!({"id": i, "team": team})))
            .collect();
        group_now(
            Generation(1),
            &records,
            KeyPath::parse("team").unwrap(),
            GroupingOptions::default(),
        )
    }

    fn lengths(window: &VisibleWindow) -> (usize, usize) {
        (window.len_of("A"), window.len_of("B"))
    }

    #[test]
    fn tops_up_groups_in_order() {
        let snapshot = two_groups(30, 15);
        let budget = RevealBudget::new(20).unwrap();

        let step1 = advance(&snapshot, &VisibleWindow::empty(), budget);
        assert_eq!(lengths(&step1), (20, 0));

        let step2 = advance(&snapshot, &step1, budget);
        assert_eq!(lengths(&step2), (30, 10));

        let step3 = advance(&snapshot, &step2, budget);
        assert_eq!(lengths(&step3), (30, 15));
        assert!(step3.covers(&snapshot));

        let step4 = advance(&snapshot, &step3, budget);
        assert_eq!(step4, step3);
    }

    #[test]
    fn every_key_present_even_if_empty() {
        let snapshot = two_groups(30, 15);
        let window = advance(&snapshot, &VisibleWindow::empty(), RevealBudget::new(5).unwrap());

        assert_eq!(window.get("B"), Some(&[][..]));
        let visible: Vec<&str> = window.visible_groups().map(|(k, _)| k.as_str()).collect();
        assert_eq!(visible, vec!["A"]);
    }

    #[test]
    fn prefixes_match_snapshot_records() {
        let snapshot = two_groups(3, 4);
        let window = advance(&snapshot, &VisibleWindow::empty(), RevealBudget::new(5).unwrap());

        assert_eq!(window.get("A").unwrap(), snapshot.get("A").unwrap());
        assert_eq!(window.get("B").unwrap(), &snapshot.get("B").unwrap()[..2]);
        assert_eq!(window.generation(), snapshot.generation());
    }

    #[test]
    fn controller_reports_revealed_and_resets() {
        let snapshot = two_groups(30, 15);
        let mut controller = WindowingController::new(RevealBudget::default());

        assert_eq!(controller.advance(&snapshot), 20);
        assert_eq!(controller.advance(&snapshot), 20);
        assert_eq!(controller.advance(&snapshot), 5);
        assert!(controller.is_complete(&snapshot));
        assert_eq!(controller.advance(&snapshot), 0);

        controller.reset();
        assert!(controller.window().is_empty());
        assert!(!controller.is_complete(&snapshot));
    }

    #[test]
    fn controller_appends_to_revealed_prefix() {
        let snapshot = two_groups(4_000, 1_000);
        let mut controller = WindowingController::new(RevealBudget::default());
        let mut pure = VisibleWindow::empty();

        let mut steps = 0;
        while !controller.is_complete(&snapshot) {
            let first_before = controller.window().get("A").and_then(|a| a.first().cloned());
            assert_eq!(controller.advance(&snapshot), 20);
            pure = advance(&snapshot, &pure, RevealBudget::default());
            steps += 1;

            if let Some(first) = first_before {
                assert!(first.ptr_eq(&controller.window().get("A").unwrap()[0]));
            }
        }

        assert_eq!(steps, 250);
        assert_eq!(controller.window(), &pure);
        assert_eq!(lengths(controller.window()), (4_000, 1_000));
    }

    #[test]
    fn zero_budget_rejected() {
        assert_eq!(RevealBudget::new(0), Err(GroupingError::ZeroRevealBudget));
    }

    #[test]
    fn empty_snapshot_is_complete() {
        let controller = WindowingController::default();
        assert!(controller.is_complete(&GroupedSnapshot::empty(Generation(2))));
    }
}
