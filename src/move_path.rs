//! Bounded sampling of controller state into move path elements.
//!
//! A recorder appends at most one element per flush interval and evicts the
//! oldest elements beyond its capacity. The consumer (typically a network
//! sync layer) drains it with [`MovePathRecorder::flush`].

use std::collections::VecDeque;

use serde::Serialize;

use crate::constants::{PATH_CAPACITY, PATH_FLUSH_INTERVAL_MS};
use crate::motion::MoveAction;

/// One sampled controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MovePathElement {
    /// X position truncated towards zero.
    pub x: i32,
    /// Y position truncated towards zero.
    pub y: i32,
    /// Horizontal velocity truncated towards zero.
    pub vx: i16,
    /// Vertical velocity truncated towards zero.
    pub vy: i16,
    /// Action label at sampling time.
    pub action: MoveAction,
    /// Supporting foothold id, or 0 when not grounded.
    pub foothold_id: i32,
    /// Caller-supplied timestamp in milliseconds.
    pub timestamp_ms: u64,
    /// Whether the entity faced right.
    pub facing_right: bool,
    /// Milliseconds until the next element, for interpolation. Zero until a
    /// successor is recorded while this element is still buffered.
    pub duration_ms: u16,
    /// Whether stats changed since the previous element.
    pub stat_changed: bool,
}

/// Ring-buffer sampler of move path elements.
#[derive(Debug, Clone)]
pub struct MovePathRecorder {
    elements: VecDeque<MovePathElement>,
    recording: bool,
    last_flush_ms: u64,
    interval_ms: u64,
    capacity: usize,
    stat_changed: bool,
}

impl Default for MovePathRecorder {
    fn default() -> Self {
        Self::with_limits(PATH_FLUSH_INTERVAL_MS, PATH_CAPACITY)
    }
}

impl MovePathRecorder {
    /// Creates a stopped recorder with a custom interval and capacity.
    #[must_use]
    pub fn with_limits(interval_ms: u64, capacity: usize) -> Self {
        Self {
            elements: VecDeque::with_capacity(capacity.saturating_add(1)),
            recording: false,
            last_flush_ms: 0,
            interval_ms,
            capacity,
            stat_changed: false,
        }
    }

    /// Starts recording, discarding any buffered elements.
    pub fn start(&mut self, now_ms: u64) {
        self.recording = true;
        self.elements.clear();
        self.last_flush_ms = now_ms;
    }

    /// Stops recording and discards buffered elements.
    pub fn stop(&mut self) {
        self.recording = false;
        self.elements.clear();
    }

    /// Whether recording is enabled.
    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.recording
    }

    /// Whether at least one interval has elapsed since the last sample.
    #[must_use]
    pub const fn is_time_for_flush(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_flush_ms) >= self.interval_ms
    }

    /// Flags the next recorded element as following a stat change.
    pub const fn mark_stat_changed(&mut self) {
        self.stat_changed = true;
    }

    /// Appends the element built by `snapshot` if recording and due.
    ///
    /// The previous buffered element gets its duration from the gap between
    /// the two timestamps. Returns whether an element was appended.
    ///
    /// # Examples
    /// ```
    /// use ledge::move_path::{MovePathElement, MovePathRecorder};
    /// use ledge::MoveAction;
    /// let element = MovePathElement {
    ///     x: 0, y: 0, vx: 0, vy: 0, action: MoveAction::Stand,
    ///     foothold_id: 0, timestamp_ms: 0, facing_right: true,
    ///     duration_ms: 0, stat_changed: false,
    /// };
    /// let mut recorder = MovePathRecorder::default();
    /// recorder.start(0);
    /// assert!(!recorder.record_if_due(50, || element));
    /// assert!(recorder.record_if_due(100, || element));
    /// assert_eq!(recorder.flush().len(), 1);
    /// ```
    pub fn record_if_due(
        &mut self,
        now_ms: u64,
        snapshot: impl FnOnce() -> MovePathElement,
    ) -> bool {
        if !self.recording || !self.is_time_for_flush(now_ms) {
            return false;
        }
        let mut element = snapshot();
        if let Some(previous) = self.elements.back_mut() {
            let gap = element.timestamp_ms.saturating_sub(previous.timestamp_ms);
            previous.duration_ms = u16::try_from(gap).unwrap_or(u16::MAX);
        }
        element.stat_changed |= self.stat_changed;
        self.stat_changed = false;
        self.elements.push_back(element);
        self.last_flush_ms = now_ms;
        while self.elements.len() > self.capacity {
            self.elements.pop_front();
        }
        true
    }

    /// Returns all buffered elements, oldest first, and clears the buffer.
    pub fn flush(&mut self) -> Vec<MovePathElement> {
        self.elements.drain(..).collect()
    }

    /// Number of buffered elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over buffered elements, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MovePathElement> {
        self.elements.iter()
    }

    /// Stops recording and forgets the last sample time.
    pub fn reset(&mut self) {
        self.stop();
        self.last_flush_ms = 0;
        self.stat_changed = false;
    }
}
