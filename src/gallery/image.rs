//! Per-image load tracking.
//!
//! The inline slide and the fullscreen view each show a spinner until their
//! image reports a successful decode. State is keyed by source: pointing a
//! slot at a different URL starts over at [`LoadState::Loading`], and load
//! events for any other URL are dropped.

use serde::Deserialize;

/// Which displayed image a load event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSlot {
    Inline,
    Fullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Spinner.
    Loading,
    Loaded,
    /// Decode failed; a static placeholder replaces the spinner.
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLoad {
    src: Option<String>,
    state: LoadState,
}

impl Default for ImageLoad {
    fn default() -> Self {
        Self {
            src: None,
            state: LoadState::Loading,
        }
    }
}

impl ImageLoad {
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Point the slot at `src`. Resets to `Loading` only if the source changed.
    pub fn show(&mut self, src: Option<&str>) {
        if self.src.as_deref() != src {
            self.src = src.map(str::to_string);
            self.state = LoadState::Loading;
        }
    }

    /// Returns false when the event is for a different source.
    pub fn loaded(&mut self, src: &str) -> bool {
        self.settle(src, LoadState::Loaded)
    }

    /// Returns false when the event is for a different source.
    pub fn failed(&mut self, src: &str) -> bool {
        self.settle(src, LoadState::Errored)
    }

    fn settle(&mut self, src: &str, state: LoadState) -> bool {
        if self.src.as_deref() == Some(src) {
            self.state = state;
            true
        } else {
            false
        }
    }
}
