//! Shared test utilities: in-memory hosts for every port.
//!
//! - [`FakeHost`]: clipboard, keyboard registry, and virtual clock for the
//!   gallery viewer.
//! - [`FakeDom`]: element tree, intersection and mutation watches, and
//!   virtual clock for the reveal coordinator.
//! - [`FakeDocument`]: records document-wide style writes.
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let mut host = FakeHost::new();
//! let mut viewer = GalleryViewer::default();
//! viewer.open(Arc::new(project_with_images(3)), &mut host);
//! ```

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::clock::{Scheduler, TimerId, VirtualClock};
use crate::ports::{
    Clipboard, ClipboardError, DocumentStyle, ElementId, ElementTree, IntersectionWatch,
    KeyboardHub, ListenerId, MutationWatch, WatchOptions,
};
use crate::types::{ImageAsset, Language, Project};

// =========================================================================
// Fixtures
// =========================================================================

/// A project with `count` images named `image-1.png`, `image-2.png`, ...
pub fn project_with_images(count: usize) -> Project {
    Project {
        id: format!("p{count}"),
        title: format!("Project with {count} images"),
        description: "A **test** project.".to_string(),
        images: (1..=count)
            .map(|n| ImageAsset {
                url: format!("image-{n}.png"),
                caption: (n % 2 == 1).then(|| format!("Caption {n}")),
            })
            .collect(),
        cover_image: "cover.png".to_string(),
        client: Some("Nordic Tech Solutions".to_string()),
        project_type: Some("Branding & Identity".to_string()),
        tools: vec!["Illustrator".to_string(), "Photoshop".to_string()],
    }
}

// =========================================================================
// Gallery viewer host
// =========================================================================

#[derive(Debug, Default)]
pub struct FakeHost {
    pub clock: VirtualClock,
    pub clipboard: Option<String>,
    pub clipboard_fails: bool,
    next_listener: u64,
    listeners: HashSet<ListenerId>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listeners currently attached.
    pub fn attached_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners ever attached.
    pub fn total_attached(&self) -> u64 {
        self.next_listener
    }
}

impl Scheduler for FakeHost {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.clock.schedule(delay)
    }

    fn cancel(&mut self, id: TimerId) {
        self.clock.cancel(id);
    }
}

impl KeyboardHub for FakeHost {
    fn attach_keyboard(&mut self) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id);
        id
    }

    fn detach_keyboard(&mut self, id: ListenerId) {
        let attached = self.listeners.remove(&id);
        assert!(attached, "detached unknown listener {id:?}");
    }
}

impl Clipboard for FakeHost {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.clipboard_fails {
            return Err(ClipboardError::Rejected("permission denied".into()));
        }
        self.clipboard = Some(text.to_string());
        Ok(())
    }
}

// =========================================================================
// Reveal coordinator host
// =========================================================================

#[derive(Debug, Default)]
struct Node {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    section: bool,
    classes: Vec<String>,
}

#[derive(Debug)]
pub struct FakeDom {
    pub clock: VirtualClock,
    pub intersection_options: Option<WatchOptions>,
    pub mutation_root: Option<ElementId>,
    nodes: Vec<Node>,
    watched: HashSet<ElementId>,
    observe_calls: HashMap<ElementId, usize>,
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDom {
    /// A document containing only a body element.
    pub fn new() -> Self {
        Self {
            clock: VirtualClock::new(),
            intersection_options: None,
            mutation_root: None,
            nodes: vec![Node::default()],
            watched: HashSet::new(),
            observe_calls: HashMap::new(),
        }
    }

    pub fn add_element(&mut self, parent: ElementId, classes: &[&str]) -> ElementId {
        self.push(parent, false, classes)
    }

    pub fn add_section(&mut self, parent: ElementId) -> ElementId {
        self.push(parent, true, &[])
    }

    pub fn is_watched(&self, element: ElementId) -> bool {
        self.watched.contains(&element)
    }

    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    pub fn observe_calls(&self, element: ElementId) -> usize {
        self.observe_calls.get(&element).copied().unwrap_or(0)
    }

    fn push(&mut self, parent: ElementId, section: bool, classes: &[&str]) -> ElementId {
        let id = ElementId(self.nodes.len() as u64);
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            section,
            classes: classes.iter().map(|c| c.to_string()).collect(),
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    fn node(&self, element: ElementId) -> &Node {
        &self.nodes[element.0 as usize]
    }
}

impl ElementTree for FakeDom {
    fn body(&self) -> ElementId {
        ElementId(0)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element).parent
    }

    fn is_section(&self, element: ElementId) -> bool {
        self.node(element).section
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element).classes.iter().any(|c| c == class)
    }

    fn descendants(&self, element: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = self.node(element).children.clone();
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.node(next).children.iter().rev().copied());
        }
        out
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        let node = &mut self.nodes[element.0 as usize];
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }
}

impl IntersectionWatch for FakeDom {
    fn connect_intersections(&mut self, options: &WatchOptions) {
        self.intersection_options = Some(*options);
    }

    fn observe(&mut self, element: ElementId) {
        assert!(
            self.intersection_options.is_some(),
            "observe before connect_intersections"
        );
        self.watched.insert(element);
        *self.observe_calls.entry(element).or_default() += 1;
    }

    fn unobserve(&mut self, element: ElementId) {
        self.watched.remove(&element);
    }

    fn disconnect_intersections(&mut self) {
        self.intersection_options = None;
        self.watched.clear();
    }
}

impl MutationWatch for FakeDom {
    fn connect_mutations(&mut self, root: ElementId) {
        self.mutation_root = Some(root);
    }

    fn disconnect_mutations(&mut self) {
        self.mutation_root = None;
    }
}

impl Scheduler for FakeDom {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.clock.schedule(delay)
    }

    fn cancel(&mut self, id: TimerId) {
        self.clock.cancel(id);
    }
}

// =========================================================================
// Document style sink
// =========================================================================

#[derive(Debug, Default)]
pub struct FakeDocument {
    pub scroll_locked: bool,
    pub dark: bool,
    pub lang: Option<Language>,
    /// Every scroll-lock write, in order.
    pub lock_writes: Vec<bool>,
}

impl DocumentStyle for FakeDocument {
    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
        self.lock_writes.push(locked);
    }

    fn set_dark_mode(&mut self, dark: bool) {
        self.dark = dark;
    }

    fn set_language(&mut self, lang: Language) {
        self.lang = Some(lang);
    }
}
