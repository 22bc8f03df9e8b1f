//! Scripted replay of user interaction over virtual time.
//!
//! A script is a JSON array of steps. Each step is applied to a
//! [`GalleryViewer`], a [`ScrollRevealCoordinator`], and a [`PageContext`]
//! backed by a [`ReplayHost`], and one [`TraceEntry`] records the resulting
//! state:
//!
//! ```json
//! [
//!   { "step": "open", "project": "1" },
//!   { "step": "advance", "ms": 10 },
//!   { "step": "touch_start", "x": 200, "y": 300 },
//!   { "step": "touch_move", "x": 120, "y": 305 },
//!   { "step": "touch_end" },
//!   { "step": "click_slide" },
//!   { "step": "advance", "ms": 300 },
//!   { "step": "click_slide" },
//!   { "step": "key", "key": "ArrowRight" },
//!   { "step": "key", "key": "Escape" },
//!   { "step": "share" },
//!   { "step": "click_backdrop", "target": "backdrop" }
//! ]
//! ```
//!
//! The host also carries a small element tree whose body is element `0`.
//! `insert` adds an element (reported to the coordinator as a mutation),
//! `intersect` reports elements entering the viewport, and `unmount_reveal`
//! tears the coordinator down:
//!
//! ```json
//! [
//!   { "step": "insert", "section": true },
//!   { "step": "insert", "parent": 1, "marked": true },
//!   { "step": "insert", "parent": 1, "marked": true },
//!   { "step": "intersect", "targets": [3, 2] },
//!   { "step": "advance", "ms": 120 }
//! ]
//! ```
//!
//! Time only moves on `advance` steps; timers scheduled by a timer handler
//! fire within the same step if they fall due inside the window.

use crate::catalog::Catalog;
use crate::clock::{Scheduler, TimerId, VirtualClock};
use crate::config::FolioConfig;
use crate::context::PageContext;
use crate::gallery::{
    ClickTarget, GallerySession, GalleryViewer, GestureOutcome, ImageSlot, Key, ViewerState,
};
use crate::ports::{
    Clipboard, ClipboardError, DocumentStyle, ElementId, ElementTree, IntersectionWatch,
    KeyboardHub, ListenerId, MutationWatch, WatchOptions,
};
use crate::reveal::{IntersectionEntry, MutationRecord, ScrollRevealCoordinator};
use crate::types::{Language, Theme};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Step {step}: unknown project '{id}'")]
    UnknownProject { step: usize, id: String },
    #[error("Step {step}: unknown element {id}")]
    UnknownElement { step: usize, id: u64 },
    #[error("Slide {slide} is out of range: project '{project}' has {count} image(s)")]
    SlideOutOfRange {
        project: String,
        slide: usize,
        count: usize,
    },
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Open { project: String },
    Close,
    Next,
    Prev,
    GoTo { index: usize },
    ClickSlide,
    ClickBackdrop {
        #[serde(default)]
        target: ClickTarget,
    },
    CloseFullscreen,
    Key { key: String },
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchEnd,
    Share,
    ImageLoaded { slot: ImageSlot },
    ImageFailed { slot: ImageSlot },
    Advance { ms: u64 },
    ToggleMenu,
    MenuLink,
    ToggleTheme,
    SetLanguage { lang: Language },
    /// Append an element under `parent` (the body by default).
    Insert {
        #[serde(default)]
        parent: u64,
        /// Section-like container.
        #[serde(default)]
        section: bool,
        /// Carries the reveal marker class.
        #[serde(default)]
        marked: bool,
    },
    /// The listed elements entered the viewport.
    Intersect { targets: Vec<u64> },
    UnmountReveal,
}

impl Step {
    /// Short human-readable form for trace output.
    pub fn label(&self) -> String {
        match self {
            Step::Open { project } => format!("open {project}"),
            Step::Close => "close".into(),
            Step::Next => "next".into(),
            Step::Prev => "prev".into(),
            Step::GoTo { index } => format!("go_to {index}"),
            Step::ClickSlide => "click_slide".into(),
            Step::ClickBackdrop { target } => format!("click_backdrop {target:?}").to_lowercase(),
            Step::CloseFullscreen => "close_fullscreen".into(),
            Step::Key { key } => format!("key {key}"),
            Step::TouchStart { x, y } => format!("touch_start ({x}, {y})"),
            Step::TouchMove { x, y } => format!("touch_move ({x}, {y})"),
            Step::TouchEnd => "touch_end".into(),
            Step::Share => "share".into(),
            Step::ImageLoaded { slot } => format!("image_loaded {slot:?}").to_lowercase(),
            Step::ImageFailed { slot } => format!("image_failed {slot:?}").to_lowercase(),
            Step::Advance { ms } => format!("advance {ms}ms"),
            Step::ToggleMenu => "toggle_menu".into(),
            Step::MenuLink => "menu_link".into(),
            Step::ToggleTheme => "toggle_theme".into(),
            Step::SetLanguage { lang } => format!("set_language {lang}"),
            Step::Insert { parent, .. } => format!("insert under {parent}"),
            Step::Intersect { targets } => format!("intersect {targets:?}"),
            Step::UnmountReveal => "unmount_reveal".into(),
        }
    }
}

/// Parse a script from JSON.
pub fn parse_script(json: &str) -> Result<Vec<Step>, ReplayError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_script(path: &Path) -> Result<Vec<Step>, ReplayError> {
    let content = fs::read_to_string(path)?;
    parse_script(&content)
}

/// State after one step.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    pub step: usize,
    pub label: String,
    pub elapsed: Duration,
    pub state: ViewerState,
    /// `(current index, image count)` while open.
    pub slide: Option<(usize, usize)>,
    pub visible: bool,
    pub swiping: bool,
    pub copied: bool,
    pub scroll_locked: bool,
    pub menu_open: bool,
    pub theme: Theme,
    pub language: Language,
    /// Elements revealed so far.
    pub revealed: usize,
    pub note: Option<String>,
}

/// The gallery state a snapshot captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotTarget {
    pub project: String,
    /// 0-based slide index.
    pub slide: usize,
    pub fullscreen: bool,
}

#[derive(Debug, Default)]
struct ReplayNode {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    section: bool,
    classes: Vec<String>,
}

/// In-memory host for replay: virtual clock, clipboard, keyboard registry,
/// document flags, and an element tree with its two watches.
#[derive(Debug)]
pub struct ReplayHost {
    pub clock: VirtualClock,
    pub clipboard: Option<String>,
    pub clipboard_fails: bool,
    pub scroll_locked: bool,
    pub dark: bool,
    pub lang: Language,
    next_listener: u64,
    listeners: HashSet<ListenerId>,
    nodes: Vec<ReplayNode>,
    watched: HashSet<ElementId>,
    intersections: Option<WatchOptions>,
    mutation_root: Option<ElementId>,
}

impl Default for ReplayHost {
    fn default() -> Self {
        Self {
            clock: VirtualClock::new(),
            clipboard: None,
            clipboard_fails: false,
            scroll_locked: false,
            dark: false,
            lang: Language::default(),
            next_listener: 0,
            listeners: HashSet::new(),
            nodes: vec![ReplayNode::default()],
            watched: HashSet::new(),
            intersections: None,
            mutation_root: None,
        }
    }
}

impl ReplayHost {
    pub fn attached_listeners(&self) -> usize {
        self.listeners.len()
    }

    pub fn contains(&self, element: ElementId) -> bool {
        (element.0 as usize) < self.nodes.len()
    }

    pub fn is_watched(&self, element: ElementId) -> bool {
        self.watched.contains(&element)
    }

    /// Whether the intersection or the mutation watch is still connected.
    pub fn watches_connected(&self) -> bool {
        self.intersections.is_some() || self.mutation_root.is_some()
    }

    /// Append an element under `parent`, which must already exist.
    pub fn insert(&mut self, parent: ElementId, section: bool, classes: &[&str]) -> ElementId {
        let id = ElementId(self.nodes.len() as u64);
        self.nodes.push(ReplayNode {
            parent: Some(parent),
            children: Vec::new(),
            section,
            classes: classes.iter().map(|c| c.to_string()).collect(),
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    fn node(&self, element: ElementId) -> &ReplayNode {
        &self.nodes[element.0 as usize]
    }
}

impl Scheduler for ReplayHost {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.clock.schedule(delay)
    }

    fn cancel(&mut self, id: TimerId) {
        self.clock.cancel(id);
    }
}

impl KeyboardHub for ReplayHost {
    fn attach_keyboard(&mut self) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id);
        id
    }

    fn detach_keyboard(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

impl Clipboard for ReplayHost {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.clipboard_fails {
            return Err(ClipboardError::Unavailable);
        }
        self.clipboard = Some(text.to_string());
        Ok(())
    }
}

impl DocumentStyle for ReplayHost {
    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn set_dark_mode(&mut self, dark: bool) {
        self.dark = dark;
    }

    fn set_language(&mut self, lang: Language) {
        self.lang = lang;
    }
}

impl ElementTree for ReplayHost {
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
        let mut stack: Vec<ElementId> = self.node(element).children.clone();
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

impl IntersectionWatch for ReplayHost {
    fn connect_intersections(&mut self, options: &WatchOptions) {
        self.intersections = Some(*options);
    }

    fn observe(&mut self, element: ElementId) {
        self.watched.insert(element);
    }

    fn unobserve(&mut self, element: ElementId) {
        self.watched.remove(&element);
    }

    fn disconnect_intersections(&mut self) {
        self.intersections = None;
        self.watched.clear();
    }
}

impl MutationWatch for ReplayHost {
    fn connect_mutations(&mut self, root: ElementId) {
        self.mutation_root = Some(root);
    }

    fn disconnect_mutations(&mut self) {
        self.mutation_root = None;
    }
}

/// Viewer, reveal coordinator, page context, and host wired together.
pub struct Replay<'a> {
    catalog: &'a Catalog,
    page_url: String,
    entrance_delay_ms: u64,
    marker: String,
    pub viewer: GalleryViewer,
    pub reveal: ScrollRevealCoordinator,
    pub context: PageContext,
    pub host: ReplayHost,
}

impl<'a> Replay<'a> {
    pub fn new(catalog: &'a Catalog, config: &FolioConfig, theme: Theme) -> Self {
        let context = PageContext::new(theme, config.site.default_language);
        let mut host = ReplayHost::default();
        context.apply(&mut host);
        let mut reveal = ScrollRevealCoordinator::new(config.reveal.clone());
        reveal.mount(&mut host);
        Self {
            catalog,
            page_url: config.site.page_url.clone(),
            entrance_delay_ms: config.gallery.entrance_delay_ms,
            marker: config.reveal.marker.clone(),
            viewer: GalleryViewer::new(config.gallery.clone()),
            reveal,
            context,
            host,
        }
    }

    pub fn session(&self) -> Option<&GallerySession> {
        self.viewer.session()
    }

    /// Apply every step in order, returning one trace entry per step.
    pub fn run(&mut self, steps: &[Step]) -> Result<Vec<TraceEntry>, ReplayError> {
        let mut trace = Vec::with_capacity(steps.len());
        for (idx, step) in steps.iter().enumerate() {
            let note = self.apply(idx + 1, step)?;
            trace.push(self.snapshot(idx + 1, step, note));
        }
        Ok(trace)
    }

    /// Open `target.project` at `target.slide`, let the entrance transition
    /// finish, and enter fullscreen if asked.
    ///
    /// A slide past the last image is an error; slide 0 of a project with no
    /// images is allowed.
    pub fn settle(&mut self, target: &SnapshotTarget) -> Result<(), ReplayError> {
        let project = target.project.clone();
        self.apply(1, &Step::Open { project })?;
        let count = self.session().map_or(0, |s| s.image_count());
        if target.slide > 0 && target.slide >= count {
            return Err(ReplayError::SlideOutOfRange {
                project: target.project.clone(),
                slide: target.slide,
                count,
            });
        }
        let index = target.slide;
        self.apply(2, &Step::GoTo { index })?;
        let ms = self.entrance_delay_ms;
        self.apply(3, &Step::Advance { ms })?;
        if target.fullscreen {
            self.apply(4, &Step::ClickSlide)?;
        }
        Ok(())
    }

    /// Apply one step. Returns an optional note for the trace.
    pub fn apply(&mut self, number: usize, step: &Step) -> Result<Option<String>, ReplayError> {
        debug!(step = number, label = %step.label(), "replay step");
        let host = &mut self.host;
        let note = match step {
            Step::Open { project } => {
                let resolved = self
                    .catalog
                    .find(project, self.context.language())
                    .ok_or_else(|| ReplayError::UnknownProject {
                        step: number,
                        id: project.clone(),
                    })?;
                self.viewer.open(Arc::new(resolved), host);
                None
            }
            Step::Close => {
                self.viewer.close(host);
                None
            }
            Step::Next => {
                self.viewer.next();
                None
            }
            Step::Prev => {
                self.viewer.prev();
                None
            }
            Step::GoTo { index } => {
                self.viewer.go_to(*index);
                None
            }
            Step::ClickSlide => {
                let suppressed = self.viewer.session().is_some_and(|s| s.is_swiping());
                self.viewer.click_slide(host);
                suppressed.then(|| "suppressed by swipe cooldown".to_string())
            }
            Step::ClickBackdrop { target } => {
                self.viewer.click_backdrop(*target, host);
                None
            }
            Step::CloseFullscreen => {
                self.viewer.close_fullscreen(host);
                None
            }
            Step::Key { key } => {
                if !self.viewer.keyboard_attached() {
                    Some("no keyboard listener".to_string())
                } else {
                    self.viewer.key_down(Key::from_dom(key), host);
                    None
                }
            }
            Step::TouchStart { x, y } => {
                self.viewer.touch_start(*x, *y, host);
                None
            }
            Step::TouchMove { x, y } => {
                self.viewer.touch_move(*x, *y);
                None
            }
            Step::TouchEnd => match self.viewer.touch_end(host) {
                GestureOutcome::NoGesture => None,
                GestureOutcome::Tap => Some("tap".to_string()),
                GestureOutcome::Ignored => Some("gesture ignored".to_string()),
                GestureOutcome::Swipe(direction) => {
                    Some(format!("swipe {direction:?}").to_lowercase())
                }
            },
            Step::Share => {
                if self.viewer.share(&self.page_url, host) {
                    Some(format!("copied {}", self.page_url))
                } else {
                    Some("copy failed".to_string())
                }
            }
            Step::ImageLoaded { slot } | Step::ImageFailed { slot } => {
                let src = self
                    .viewer
                    .session()
                    .and_then(|s| s.image(*slot).src())
                    .map(str::to_string);
                match src {
                    None => Some("no image in slot".to_string()),
                    Some(src) => {
                        if matches!(step, Step::ImageLoaded { .. }) {
                            self.viewer.image_loaded(*slot, &src);
                        } else {
                            self.viewer.image_failed(*slot, &src);
                        }
                        None
                    }
                }
            }
            Step::Advance { ms } => {
                let fired = self.advance(Duration::from_millis(*ms));
                (fired > 0).then(|| format!("{fired} timer(s) fired"))
            }
            Step::ToggleMenu => {
                self.context.toggle_menu(host);
                None
            }
            Step::MenuLink => {
                self.context.menu_link_clicked(host);
                None
            }
            Step::ToggleTheme => {
                self.context.toggle_theme(host);
                None
            }
            Step::SetLanguage { lang } => {
                self.context.set_language(*lang, host);
                None
            }
            Step::Insert {
                parent,
                section,
                marked,
            } => {
                let parent = ElementId(*parent);
                if !host.contains(parent) {
                    return Err(ReplayError::UnknownElement {
                        step: number,
                        id: parent.0,
                    });
                }
                let marker = [self.marker.as_str()];
                let classes: &[&str] = if *marked { &marker } else { &[] };
                let element = host.insert(parent, *section, classes);
                if host.watches_connected() {
                    let record = MutationRecord {
                        added: vec![element],
                    };
                    self.reveal.on_mutations(&[record], host);
                }
                Some(format!("element {}", element.0))
            }
            Step::Intersect { targets } => {
                let mut entries = Vec::with_capacity(targets.len());
                for &id in targets {
                    let target = ElementId(id);
                    if !host.contains(target) {
                        return Err(ReplayError::UnknownElement { step: number, id });
                    }
                    // Only watched elements produce intersection callbacks.
                    if host.is_watched(target) {
                        entries.push(IntersectionEntry {
                            target,
                            is_intersecting: true,
                        });
                    }
                }
                if !self.reveal.is_mounted() {
                    Some("reveal unmounted".to_string())
                } else {
                    let scheduled = self.reveal.on_intersections(&entries, host);
                    Some(format!("{} reveal(s) scheduled", scheduled.len()))
                }
            }
            Step::UnmountReveal => {
                let cancelled = self.reveal.pending_count();
                self.reveal.unmount(host);
                Some(format!("{cancelled} pending reveal(s) cancelled"))
            }
        };
        if self.viewer.is_open() != self.context.modal_open() {
            self.context
                .set_modal_open(self.viewer.is_open(), &mut self.host);
        }
        Ok(note)
    }

    /// Advance virtual time, delivering each timer as it falls due.
    pub fn advance(&mut self, by: Duration) -> usize {
        let limit = self.host.clock.now() + by;
        let mut fired = 0;
        while let Some(id) = self.host.clock.advance_next(limit) {
            if self.viewer.on_timer(id) || self.reveal.on_timer(id, &mut self.host) {
                fired += 1;
            }
        }
        self.host.clock.catch_up(limit);
        fired
    }

    fn snapshot(&self, number: usize, step: &Step, note: Option<String>) -> TraceEntry {
        let session = self.viewer.session();
        TraceEntry {
            step: number,
            label: step.label(),
            elapsed: self.host.clock.now(),
            state: self.viewer.state(),
            slide: session.map(|s| (s.current_index(), s.image_count())),
            visible: session.is_some_and(|s| s.is_visible()),
            swiping: session.is_some_and(|s| s.is_swiping()),
            copied: session.is_some_and(|s| s.copy_feedback_active()),
            scroll_locked: self.host.scroll_locked,
            menu_open: self.context.menu_open(),
            theme: self.context.theme(),
            language: self.context.language(),
            revealed: self.reveal.revealed_count(),
            note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{"projects": [
                {
                    "id": "1",
                    "title": { "en": "Brand Identity Design", "fi": "Brändi-identiteetin Suunnittelu" },
                    "description": "Brand overhaul.",
                    "images": [
                        { "url": "a.png", "caption": "A" },
                        { "url": "b.png" },
                        { "url": "c.png" }
                    ],
                    "cover_image": "a.png"
                },
                { "id": "2", "title": "Empty", "description": "", "cover_image": "e.png" }
            ]}"#,
        )
        .unwrap()
    }

    fn run(script: &str) -> (Vec<TraceEntry>, ReplayHost) {
        let catalog = catalog();
        let mut replay = Replay::new(&catalog, &FolioConfig::default(), Theme::Light);
        let trace = replay.run(&parse_script(script).unwrap()).unwrap();
        (trace, replay.host)
    }

    #[test]
    fn parses_every_step_kind() {
        let steps = parse_script(
            r#"[
                {"step": "open", "project": "1"},
                {"step": "click_backdrop"},
                {"step": "click_backdrop", "target": "content"},
                {"step": "image_loaded", "slot": "fullscreen"},
                {"step": "set_language", "lang": "fi"},
                {"step": "advance", "ms": 5}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            steps[1],
            Step::ClickBackdrop {
                target: ClickTarget::Backdrop,
            }
        );
        assert_eq!(
            steps[2],
            Step::ClickBackdrop {
                target: ClickTarget::Content,
            }
        );
        assert_eq!(steps[4], Step::SetLanguage { lang: Language::Fi });
    }

    #[test]
    fn unknown_step_is_json_error() {
        assert!(matches!(
            parse_script(r#"[{"step": "dance"}]"#),
            Err(ReplayError::Json(_))
        ));
    }

    #[test]
    fn swipe_then_click_is_suppressed_until_cooldown_ends() {
        let (trace, _host) = run(
            r#"[
                {"step": "open", "project": "1"},
                {"step": "touch_start", "x": 200, "y": 300},
                {"step": "touch_move", "x": 120, "y": 305},
                {"step": "touch_end"},
                {"step": "click_slide"},
                {"step": "advance", "ms": 300},
                {"step": "click_slide"}
            ]"#,
        );
        assert_eq!(trace[3].slide, Some((1, 3)));
        assert_eq!(trace[3].note.as_deref(), Some("swipe next"));
        assert_eq!(trace[4].state, ViewerState::Inline);
        assert_eq!(
            trace[4].note.as_deref(),
            Some("suppressed by swipe cooldown")
        );
        assert_eq!(trace[6].state, ViewerState::Fullscreen);
    }

    #[test]
    fn scroll_lock_tracks_modal_and_menu() {
        let (trace, host) = run(
            r#"[
                {"step": "toggle_menu"},
                {"step": "open", "project": "1"},
                {"step": "menu_link"},
                {"step": "close"}
            ]"#,
        );
        assert!(trace[0].scroll_locked);
        assert!(trace[2].scroll_locked);
        assert!(!trace[3].scroll_locked);
        assert!(!host.scroll_locked);
    }

    #[test]
    fn share_expires_after_feedback_window() {
        let (trace, host) = run(
            r#"[
                {"step": "open", "project": "1"},
                {"step": "share"},
                {"step": "advance", "ms": 2000}
            ]"#,
        );
        assert!(trace[1].copied);
        assert!(!trace[2].copied);
        assert_eq!(host.clipboard.as_deref(), Some("http://localhost/"));
    }

    #[test]
    fn keyboard_steps_outside_fullscreen_are_noted() {
        let (trace, host) = run(
            r#"[
                {"step": "open", "project": "1"},
                {"step": "key", "key": "ArrowRight"},
                {"step": "click_slide"},
                {"step": "key", "key": "ArrowRight"},
                {"step": "key", "key": "Escape"}
            ]"#,
        );
        assert_eq!(trace[1].note.as_deref(), Some("no keyboard listener"));
        assert_eq!(trace[1].slide, Some((0, 3)));
        assert_eq!(trace[3].slide, Some((1, 3)));
        assert_eq!(trace[4].state, ViewerState::Inline);
        assert_eq!(host.attached_listeners(), 0);
    }

    #[test]
    fn open_uses_current_language() {
        let catalog = catalog();
        let mut replay = Replay::new(&catalog, &FolioConfig::default(), Theme::Light);
        let steps = parse_script(
            r#"[
                {"step": "set_language", "lang": "fi"},
                {"step": "open", "project": "1"}
            ]"#,
        )
        .unwrap();
        replay.run(&steps).unwrap();
        assert_eq!(
            replay.session().unwrap().project().title,
            "Brändi-identiteetin Suunnittelu"
        );
    }

    #[test]
    fn unknown_project_is_error() {
        let catalog = catalog();
        let mut replay = Replay::new(&catalog, &FolioConfig::default(), Theme::Light);
        let script = r#"[{"step": "open", "project": "404"}]"#;
        let err = replay.run(&parse_script(script).unwrap()).unwrap_err();
        assert!(matches!(err, ReplayError::UnknownProject { step: 1, .. }));
    }

    #[test]
    fn empty_project_survives_navigation() {
        let (trace, _host) = run(
            r#"[
                {"step": "open", "project": "2"},
                {"step": "next"},
                {"step": "prev"},
                {"step": "click_slide"},
                {"step": "image_loaded", "slot": "inline"}
            ]"#,
        );
        assert_eq!(trace[2].slide, Some((0, 0)));
        assert_eq!(trace[3].state, ViewerState::Inline);
        assert_eq!(trace[4].note.as_deref(), Some("no image in slot"));
    }

    #[test]
    fn inserted_marked_elements_reveal_with_stagger() {
        let catalog = catalog();
        let mut replay = Replay::new(&catalog, &FolioConfig::default(), Theme::Light);
        let steps = parse_script(
            r#"[
                {"step": "insert", "section": true},
                {"step": "insert", "parent": 1, "marked": true},
                {"step": "insert", "parent": 1, "marked": true},
                {"step": "insert", "parent": 1},
                {"step": "intersect", "targets": [3, 2, 4]},
                {"step": "advance", "ms": 0},
                {"step": "advance", "ms": 119},
                {"step": "advance", "ms": 1}
            ]"#,
        )
        .unwrap();
        let trace = replay.run(&steps).unwrap();

        assert_eq!(trace[1].note.as_deref(), Some("element 2"));
        assert_eq!(replay.reveal.observed_count(), 0);
        assert_eq!(trace[4].note.as_deref(), Some("2 reveal(s) scheduled"));
        assert_eq!(trace[5].revealed, 1);
        assert!(replay.host.has_class(ElementId(2), "is-visible"));
        assert_eq!(trace[6].revealed, 1);
        assert_eq!(trace[7].revealed, 2);
        assert!(replay.host.has_class(ElementId(3), "is-visible"));
        assert!(!replay.host.has_class(ElementId(4), "is-visible"));
    }

    #[test]
    fn reveal_and_gallery_timers_share_the_clock() {
        let (trace, _host) = run(
            r#"[
                {"step": "insert", "marked": true},
                {"step": "open", "project": "1"},
                {"step": "intersect", "targets": [1]},
                {"step": "advance", "ms": 10}
            ]"#,
        );
        assert_eq!(trace[3].note.as_deref(), Some("2 timer(s) fired"));
        assert!(trace[3].visible);
        assert_eq!(trace[3].revealed, 1);
    }

    #[test]
    fn unmount_reveal_cancels_pending_and_ignores_later_events() {
        let catalog = catalog();
        let mut replay = Replay::new(&catalog, &FolioConfig::default(), Theme::Light);
        let steps = parse_script(
            r#"[
                {"step": "insert", "section": true},
                {"step": "insert", "parent": 1, "marked": true},
                {"step": "insert", "parent": 1, "marked": true},
                {"step": "intersect", "targets": [2, 3]},
                {"step": "advance", "ms": 0},
                {"step": "unmount_reveal"},
                {"step": "advance", "ms": 500},
                {"step": "insert", "marked": true},
                {"step": "intersect", "targets": [4]}
            ]"#,
        )
        .unwrap();
        let trace = replay.run(&steps).unwrap();

        assert_eq!(
            trace[5].note.as_deref(),
            Some("1 pending reveal(s) cancelled")
        );
        assert_eq!(trace[6].revealed, 1);
        assert_eq!(trace[6].note, None);
        assert_eq!(trace[8].note.as_deref(), Some("reveal unmounted"));
        assert!(!replay.reveal.is_mounted());
        assert!(!replay.host.watches_connected());
        assert!(!replay.host.is_watched(ElementId(4)));
    }

    #[test]
    fn unknown_element_is_error() {
        let catalog = catalog();
        let mut replay = Replay::new(&catalog, &FolioConfig::default(), Theme::Light);
        let script = r#"[{"step": "intersect", "targets": [9]}]"#;
        let err = replay.run(&parse_script(script).unwrap()).unwrap_err();
        assert!(matches!(err, ReplayError::UnknownElement { step: 1, id: 9 }));
    }

    #[test]
    fn settle_opens_at_slide_after_entrance() {
        let catalog = catalog();
        let mut replay = Replay::new(&catalog, &FolioConfig::default(), Theme::Light);
        let target = SnapshotTarget {
            project: "1".to_string(),
            slide: 2,
            fullscreen: true,
        };
        replay.settle(&target).unwrap();

        let session = replay.session().unwrap();
        assert_eq!(session.current_index(), 2);
        assert!(session.is_visible());
        assert_eq!(replay.viewer.state(), ViewerState::Fullscreen);
        assert!(replay.context.scroll_locked());
    }

    #[test]
    fn settle_rejects_slide_past_last_image() {
        let catalog = catalog();
        let mut replay = Replay::new(&catalog, &FolioConfig::default(), Theme::Light);
        let target = SnapshotTarget {
            project: "1".to_string(),
            slide: 3,
            fullscreen: false,
        };
        let err = replay.settle(&target).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::SlideOutOfRange {
                slide: 3,
                count: 3,
                ..
            }
        ));
        assert!(err.to_string().contains("has 3 image(s)"));
    }

    #[test]
    fn settle_allows_first_slide_of_empty_project() {
        let catalog = catalog();
        let mut replay = Replay::new(&catalog, &FolioConfig::default(), Theme::Light);
        let target = SnapshotTarget {
            project: "2".to_string(),
            slide: 0,
            fullscreen: true,
        };
        replay.settle(&target).unwrap();
        assert_eq!(replay.viewer.state(), ViewerState::Inline);
    }
}
