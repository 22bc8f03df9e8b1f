//! Touch swipe recognition.
//!
//! A gesture is a touch start, any number of moves, and a touch end. Only
//! the start point and the last move point matter:
//!
//! ```text
//! dx = start_x - end_x        dx > 0: finger moved left  → next slide
//! dy = start_y - end_y        dx < 0: finger moved right → previous slide
//!
//! horizontal  ⇔ |dx| > axis_ratio * |dy|
//! swipe       ⇔ horizontal ∧ |dx| > min_distance
//! ```
//!
//! A touch end without any recorded move is a tap and produces no
//! navigation, so the click that follows still reaches the slide.

use crate::config::GalleryConfig;

/// Direction of a recognized swipe, named by the slide it navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Next,
    Previous,
}

/// Classification of a finished touch interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Touch end without a touch start.
    NoGesture,
    /// No movement between start and end.
    Tap,
    /// Movement that was diagonal, vertical, or too short.
    Ignored,
    Swipe(SwipeDirection),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

/// Per-interaction touch state.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeTracker {
    start: Option<Point>,
    last: Option<Point>,
    min_distance: f64,
    axis_ratio: f64,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(&GalleryConfig::default())
    }
}

impl SwipeTracker {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            start: None,
            last: None,
            min_distance: config.swipe_min_distance,
            axis_ratio: config.swipe_axis_ratio,
        }
    }

    /// Begin a new interaction, discarding any previous end point.
    pub fn start(&mut self, x: f64, y: f64) {
        self.start = Some(Point { x, y });
        self.last = None;
    }

    /// Record the latest finger position.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.last = Some(Point { x, y });
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    /// Classify the interaction and clear all coordinates.
    pub fn end(&mut self) -> GestureOutcome {
        let start = self.start.take();
        let last = self.last.take();
        let Some(start) = start else {
            return GestureOutcome::NoGesture;
        };
        let Some(end) = last else {
            return GestureOutcome::Tap;
        };

        let dx = start.x - end.x;
        let dy = start.y - end.y;
        if dx.abs() <= dy.abs() * self.axis_ratio {
            return GestureOutcome::Ignored;
        }
        if dx > self.min_distance {
            GestureOutcome::Swipe(SwipeDirection::Next)
        } else if dx < -self.min_distance {
            GestureOutcome::Swipe(SwipeDirection::Previous)
        } else {
            GestureOutcome::Ignored
        }
    }
}
