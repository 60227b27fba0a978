//! Vertical drag gesture for the weather card.
//!
//! Offsets are in device pixels; negative values raise the card. On release
//! the card snaps to one of two resting offsets.

/// Resting offset of the collapsed card.
pub const COLLAPSED_OFFSET: i32 = 0;

/// Resting offset of the raised card.
pub const EXPANDED_OFFSET: i32 = -400;

/// Drag distance past which a release raises the card.
pub const SNAP_THRESHOLD: i32 = 150;

/// Drag distances outside `(MIN_DRAG, MAX_DRAG)` are ignored.
const MIN_DRAG: i32 = -400;
const MAX_DRAG: i32 = 200;

/// Tracks one vertical drag on the card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardDrag {
    start_y: Option<i32>,
    offset: i32,
}

impl CardDrag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current vertical offset of the card.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.start_y.is_some()
    }

    /// Whether the card rests in its raised position.
    pub fn is_expanded(&self) -> bool {
        !self.is_dragging() && self.offset == EXPANDED_OFFSET
    }

    /// Start a drag at pointer height `y`.
    pub fn begin(&mut self, y: i32) {
        self.start_y = Some(y);
    }

    /// Follow the pointer; moves outside the allowed range are ignored.
    pub fn drag(&mut self, y: i32) {
        let Some(start) = self.start_y else {
            return;
        };
        let diff = y - start;
        if diff > MIN_DRAG && diff < MAX_DRAG {
            self.offset = diff;
        }
    }

    /// End the drag and snap to a resting offset.
    pub fn release(&mut self) {
        if self.start_y.take().is_none() {
            return;
        }
        self.offset = if self.offset < -SNAP_THRESHOLD {
            EXPANDED_OFFSET
        } else {
            COLLAPSED_OFFSET
        };
    }

    pub fn expand(&mut self) {
        self.start_y = None;
        self.offset = EXPANDED_OFFSET;
    }

    pub fn collapse(&mut self) {
        self.start_y = None;
        self.offset = COLLAPSED_OFFSET;
    }
}
