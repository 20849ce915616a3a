//! Drag tracking.
//!
//! Input sources report drags either as the total translation since the drag
//! began ([`DragTracker::drag_changed`]) or as per-callback steps
//! ([`DragTracker::drag_by`]). Both are folded into one pending increment
//! that the next frame consumes with [`DragTracker::take_delta`], so rotation
//! speed does not depend on how often the source calls back.

use glam::Vec2;

/// Whether a drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Last cumulative translation reported since drag start.
        last_total: Vec2,
        /// Movement not yet consumed by a frame.
        pending: Vec2,
    },
}

/// Converts gesture callbacks into per-frame drag increments.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    state: DragState,
}

impl DragTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Idle to Dragging. Restarting an active drag discards its pending movement.
    pub fn begin(&mut self) {
        self.state = DragState::Dragging {
            last_total: Vec2::ZERO,
            pending: Vec2::ZERO,
        };
    }

    /// Records the cumulative translation since the drag began.
    ///
    /// Starts a drag implicitly when idle.
    pub fn drag_changed(&mut self, total: Vec2) {
        if !self.is_dragging() {
            self.begin();
        }
        if let DragState::Dragging { last_total, pending } = &mut self.state {
            *pending += total - *last_total;
            *last_total = total;
        }
    }

    /// Records an incremental step.
    ///
    /// Starts a drag implicitly when idle.
    pub fn drag_by(&mut self, delta: Vec2) {
        if !self.is_dragging() {
            self.begin();
        }
        if let DragState::Dragging { last_total, pending } = &mut self.state {
            *pending += delta;
            *last_total += delta;
        }
    }

    /// Dragging to Idle. Movement not yet consumed is dropped.
    pub fn end(&mut self) {
        self.state = DragState::Idle;
    }

    /// Returns and clears the movement accumulated since the last frame.
    ///
    /// `None` while idle.
    pub fn take_delta(&mut self) -> Option<Vec2> {
        match &mut self.state {
            DragState::Idle => None,
            DragState::Dragging { pending, .. } => Some(std::mem::take(pending)),
        }
    }
}
