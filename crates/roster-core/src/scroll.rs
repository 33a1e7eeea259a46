//! Scroll-edge detection
//!
//! Evaluated once per scroll notification. Detection is level-triggered:
//! every evaluation inside an edge zone emits again, so consumers must be
//! idempotent.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Default distance from the bottom that counts as near, in pixels
pub const DEFAULT_BOTTOM_THRESHOLD: f64 = 200.0;

/// Default offset from the top that counts as near, in pixels
pub const DEFAULT_TOP_THRESHOLD: f64 = 1000.0;

/// Which edge the viewport is close to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollEdge {
    /// Near the start of the content
    NearTop,
    /// Near the end of the content
    NearBottom,
}

impl ScrollEdge {
    /// `-1` for the top edge, `1` for the bottom edge
    #[inline]
    #[must_use]
    pub fn direction(self) -> i8 {
        match self {
            Self::NearTop => -1,
            Self::NearBottom => 1,
        }
    }
}

/// Viewport position at one scroll notification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top
    pub offset: f64,
    /// Height of the visible viewport
    pub viewport_height: f64,
    /// Total scrollable content height
    pub total_height: f64,
}

impl ScrollMetrics {
    /// Create metrics
    #[inline]
    #[must_use]
    pub fn new(offset: f64, viewport_height: f64, total_height: f64) -> Self {
        Self {
            offset,
            viewport_height,
            total_height,
        }
    }
}

/// Edge zone sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeThresholds {
    /// Distance from the bottom that counts as near
    pub bottom: f64,
    /// Offset from the top that counts as near
    pub top: f64,
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        Self {
            bottom: DEFAULT_BOTTOM_THRESHOLD,
            top: DEFAULT_TOP_THRESHOLD,
        }
    }
}

/// Edges hit by one evaluation; at most two
pub type EdgeHits = SmallVec<[ScrollEdge; 2]>;

/// Maps scroll metrics to edge signals
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollEdgeDetector {
    thresholds: EdgeThresholds,
}

impl ScrollEdgeDetector {
    /// Create detector
    #[inline]
    #[must_use]
    pub fn new(thresholds: EdgeThresholds) -> Self {
        Self { thresholds }
    }

    /// Configured thresholds
    #[inline]
    #[must_use]
    pub fn thresholds(&self) -> EdgeThresholds {
        self.thresholds
    }

    /// Edges the viewport is currently near, bottom first
    #[must_use]
    pub fn evaluate(&self, metrics: ScrollMetrics) -> EdgeHits {
        let mut hits = EdgeHits::new();
        if metrics.offset + metrics.viewport_height >= metrics.total_height - self.thresholds.bottom {
            hits.push(ScrollEdge::NearBottom);
        }
        if metrics.offset <= self.thresholds.top {
            hits.push(ScrollEdge::NearTop);
        }
        hits
    }
}
