//! Host capability traits.
//!
//! The gallery viewer, reveal coordinator, and page context talk to their
//! environment only through these traits (plus [`Scheduler`](crate::clock::Scheduler)).
//! A browser binding implements them over the DOM; tests and `folio replay`
//! implement them with in-memory fakes and drive the state machines with
//! synthetic events.

use crate::types::Language;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard unavailable")]
    Unavailable,
    #[error("Clipboard write rejected: {0}")]
    Rejected(String),
}

/// System clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Handle for an attached document-level keyboard listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Document/window-level keyboard listener registry.
///
/// Every id returned by `attach_keyboard` must eventually be passed to
/// `detach_keyboard`.
pub trait KeyboardHub {
    fn attach_keyboard(&mut self) -> ListenerId;
    fn detach_keyboard(&mut self, id: ListenerId);
}

/// Opaque handle to a document element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Intersection watch configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    /// Fraction of the element's area that must be inside the viewport.
    pub threshold: f64,
    /// The viewport's bottom edge is pulled up by this many logical pixels.
    pub bottom_inset_px: f64,
}

impl WatchOptions {
    /// CSS `rootMargin` equivalent, e.g. `0px 0px -50px 0px`.
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_inset_px)
    }
}

/// Viewport intersection detection.
pub trait IntersectionWatch {
    fn connect_intersections(&mut self, options: &WatchOptions);
    fn observe(&mut self, element: ElementId);
    fn unobserve(&mut self, element: ElementId);
    fn disconnect_intersections(&mut self);
}

/// Structural change detection over a subtree (child-list, subtree-wide).
pub trait MutationWatch {
    fn connect_mutations(&mut self, root: ElementId);
    fn disconnect_mutations(&mut self);
}

/// Read access to the element tree plus the one write the reveal needs.
pub trait ElementTree {
    /// The body element: mutation watch root and container of last resort.
    fn body(&self) -> ElementId;
    fn parent(&self, element: ElementId) -> Option<ElementId>;
    /// Whether the element is a section-like container.
    fn is_section(&self, element: ElementId) -> bool;
    fn has_class(&self, element: ElementId, class: &str) -> bool;
    /// Descendants of `element` in document order, excluding `element`.
    fn descendants(&self, element: ElementId) -> Vec<ElementId>;
    fn add_class(&mut self, element: ElementId, class: &str);
}

/// Document-wide presentation flags.
pub trait DocumentStyle {
    fn set_scroll_locked(&mut self, locked: bool);
    fn set_dark_mode(&mut self, dark: bool);
    fn set_language(&mut self, lang: Language);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_margin_insets_bottom_edge() {
        let options = WatchOptions {
            threshold: 0.1,
            bottom_inset_px: 50.0,
        };
        assert_eq!(options.root_margin(), "0px 0px -50px 0px");
    }
}
