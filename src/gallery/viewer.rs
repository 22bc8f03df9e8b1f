//! The gallery modal state machine.
//!
//! ```text
//!              open(project)
//!   Closed ─────────────────────▶ Open/Inline ◀──────────────┐
//!     ▲                            │    ▲                    │ close control,
//!     │  close control,            │    │ Escape,            │ Escape,
//!     │  backdrop click            │    │ close control,     │ overlay click
//!     └────────────────────────────┘    │ overlay click      │
//!                          click slide  │                    │
//!                       (not swiping)   ▼                    │
//!                                  Open/Fullscreen ──────────┘
//! ```
//!
//! One [`GallerySession`] exists while the modal is open. It owns the slide
//! index, display mode, entrance visibility, copy feedback, gesture state,
//! and per-image load state. The viewer owns the host resources the session
//! needs: up to three timers and, while fullscreen, one keyboard listener.
//! Every exit path ([`GalleryViewer::close`], re-`open`, [`GalleryViewer::destroy`])
//! releases all of them, so no callback can reach a torn-down session.

use crate::clock::{Scheduler, TimerId};
use crate::config::GalleryConfig;
use crate::gallery::gesture::{GestureOutcome, SwipeDirection, SwipeTracker};
use crate::gallery::image::{ImageLoad, ImageSlot};
use crate::ports::{Clipboard, KeyboardHub, ListenerId};
use crate::types::{ImageAsset, Project};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Everything the viewer needs from its host.
pub trait ViewerHost: Scheduler + KeyboardHub + Clipboard {}

impl<T: Scheduler + KeyboardHub + Clipboard> ViewerHost for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Inline,
    Fullscreen,
}

/// Externally observable viewer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Closed,
    Inline,
    Fullscreen,
}

/// Keys the fullscreen listener reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(name: &str) -> Key {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// Where a click on the modal landed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    /// The dimmed region itself.
    #[default]
    Backdrop,
    /// Any descendant of the backdrop.
    Content,
}

/// State of one open modal.
#[derive(Debug, Clone)]
pub struct GallerySession {
    project: Arc<Project>,
    current_index: usize,
    display_mode: DisplayMode,
    visible: bool,
    copy_feedback_active: bool,
    swiping: bool,
    gesture: SwipeTracker,
    inline_image: ImageLoad,
    fullscreen_image: ImageLoad,
}

impl GallerySession {
    fn new(project: Arc<Project>, config: &GalleryConfig) -> Self {
        let mut session = Self {
            project,
            current_index: 0,
            display_mode: DisplayMode::Inline,
            visible: false,
            copy_feedback_active: false,
            swiping: false,
            gesture: SwipeTracker::new(config),
            inline_image: ImageLoad::default(),
            fullscreen_image: ImageLoad::default(),
        };
        session.refresh_images();
        session
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_image(&self) -> Option<&ImageAsset> {
        self.project.images.get(self.current_index)
    }

    pub fn image_count(&self) -> usize {
        self.project.images.len()
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn copy_feedback_active(&self) -> bool {
        self.copy_feedback_active
    }

    /// True during the post-swipe cooldown.
    pub fn is_swiping(&self) -> bool {
        self.swiping
    }

    pub fn image(&self, slot: ImageSlot) -> &ImageLoad {
        match slot {
            ImageSlot::Inline => &self.inline_image,
            ImageSlot::Fullscreen => &self.fullscreen_image,
        }
    }

    fn next(&mut self) {
        let count = self.image_count();
        if count > 1 {
            self.current_index = (self.current_index + 1) % count;
            self.refresh_images();
        }
    }

    fn prev(&mut self) {
        let count = self.image_count();
        if count > 1 {
            self.current_index = (self.current_index + count - 1) % count;
            self.refresh_images();
        }
    }

    fn go_to(&mut self, index: usize) -> bool {
        if index >= self.image_count() {
            return false;
        }
        self.current_index = index;
        self.refresh_images();
        true
    }

    /// Point each mounted image slot at the current slide.
    fn refresh_images(&mut self) {
        let src = self.current_image().map(|i| i.url.clone());
        self.inline_image.show(src.as_deref());
        match self.display_mode {
            DisplayMode::Fullscreen => self.fullscreen_image.show(src.as_deref()),
            DisplayMode::Inline => self.fullscreen_image = ImageLoad::default(),
        }
    }
}

#[derive(Debug, Default)]
struct ViewerTimers {
    entrance: Option<TimerId>,
    copy_feedback: Option<TimerId>,
    swipe_cooldown: Option<TimerId>,
}

/// Gallery modal controller.
#[derive(Debug)]
pub struct GalleryViewer {
    config: GalleryConfig,
    session: Option<GallerySession>,
    timers: ViewerTimers,
    keyboard: Option<ListenerId>,
}

impl Default for GalleryViewer {
    fn default() -> Self {
        Self::new(GalleryConfig::default())
    }
}

impl GalleryViewer {
    pub fn new(config: GalleryConfig) -> Self {
        Self {
            config,
            session: None,
            timers: ViewerTimers::default(),
            keyboard: None,
        }
    }

    pub fn state(&self) -> ViewerState {
        match self.session.as_ref().map(|s| s.display_mode) {
            None => ViewerState::Closed,
            Some(DisplayMode::Inline) => ViewerState::Inline,
            Some(DisplayMode::Fullscreen) => ViewerState::Fullscreen,
        }
    }

    pub fn session(&self) -> Option<&GallerySession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Whether a document-level keyboard listener is currently attached.
    pub fn keyboard_attached(&self) -> bool {
        self.keyboard.is_some()
    }

    /// Open `project` at its first slide, inline, with no copy feedback.
    ///
    /// Any previous session is torn down first. The session becomes visible
    /// after the configured entrance delay.
    pub fn open(&mut self, project: Arc<Project>, host: &mut impl ViewerHost) {
        self.release(host);
        debug!(project = %project.id, images = project.images.len(), "gallery opened");
        self.session = Some(GallerySession::new(project, &self.config));
        self.timers.entrance = Some(host.schedule(self.config.entrance_delay()));
    }

    /// Close the modal from any open state.
    pub fn close(&mut self, host: &mut impl ViewerHost) {
        if self.session.is_none() {
            return;
        }
        self.release(host);
        debug!("gallery closed");
    }

    /// Tear the viewer down, releasing every timer and listener it holds.
    pub fn destroy(mut self, host: &mut impl ViewerHost) {
        self.release(host);
    }

    pub fn next(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.next();
            trace!(index = session.current_index, "next slide");
        }
    }

    pub fn prev(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.prev();
            trace!(index = session.current_index, "previous slide");
        }
    }

    /// Jump to a slide from the dot or thumbnail strip. Out-of-range is ignored.
    pub fn go_to(&mut self, index: usize) {
        if let Some(session) = self.session.as_mut() {
            if !session.go_to(index) {
                trace!(index, "go_to out of range ignored");
            }
        }
    }

    /// Click on the current slide: enters fullscreen unless a swipe just ended.
    ///
    /// A click on the fullscreen image never reaches the overlay behind it, so
    /// in fullscreen this does nothing.
    pub fn click_slide(&mut self, host: &mut impl ViewerHost) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.swiping {
            trace!("slide click suppressed by swipe cooldown");
            return;
        }
        if session.image_count() == 0 {
            return;
        }
        if session.display_mode == DisplayMode::Fullscreen {
            trace!("fullscreen image click ignored");
            return;
        }
        self.enter_fullscreen(host);
    }

    /// The fullscreen overlay's close control.
    pub fn close_fullscreen(&mut self, host: &mut impl ViewerHost) {
        if self.session.as_ref().is_some_and(|s| s.swiping) {
            trace!("fullscreen close suppressed by swipe cooldown");
            return;
        }
        self.exit_fullscreen(host);
    }

    /// Click anywhere on the modal or the fullscreen overlay.
    ///
    /// Only clicks on the backdrop itself count: inline they close the modal,
    /// fullscreen they return to inline.
    pub fn click_backdrop(&mut self, target: ClickTarget, host: &mut impl ViewerHost) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.swiping {
            trace!("backdrop click suppressed by swipe cooldown");
            return;
        }
        match (session.display_mode, target) {
            (_, ClickTarget::Content) => {}
            (DisplayMode::Fullscreen, ClickTarget::Backdrop) => self.exit_fullscreen(host),
            (DisplayMode::Inline, ClickTarget::Backdrop) => self.close(host),
        }
    }

    /// Keyboard event delivered through the fullscreen listener.
    pub fn key_down(&mut self, key: Key, host: &mut impl ViewerHost) {
        if self.keyboard.is_none() || self.state() != ViewerState::Fullscreen {
            return;
        }
        match key {
            Key::Escape => self.exit_fullscreen(host),
            Key::ArrowLeft => self.prev(),
            Key::ArrowRight => self.next(),
            Key::Other => {}
        }
    }

    pub fn touch_start(&mut self, x: f64, y: f64, host: &mut impl ViewerHost) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.gesture.start(x, y);
        session.swiping = false;
        if let Some(id) = self.timers.swipe_cooldown.take() {
            host.cancel(id);
        }
    }

    pub fn touch_move(&mut self, x: f64, y: f64) {
        if let Some(session) = self.session.as_mut() {
            session.gesture.move_to(x, y);
        }
    }

    /// Finish a touch interaction, navigating on a recognized swipe.
    pub fn touch_end(&mut self, host: &mut impl ViewerHost) -> GestureOutcome {
        let Some(session) = self.session.as_mut() else {
            return GestureOutcome::NoGesture;
        };
        let outcome = session.gesture.end();
        if let GestureOutcome::Swipe(direction) = outcome {
            match direction {
                SwipeDirection::Next => session.next(),
                SwipeDirection::Previous => session.prev(),
            }
            session.swiping = true;
            debug!(?direction, index = session.current_index, "swipe");
            if let Some(id) = self.timers.swipe_cooldown.take() {
                host.cancel(id);
            }
            self.timers.swipe_cooldown = Some(host.schedule(self.config.swipe_cooldown()));
        }
        outcome
    }

    /// Copy `page_url` to the clipboard. Returns whether the copy succeeded.
    ///
    /// Failure is logged and otherwise invisible: the share button simply
    /// never shows its copied state.
    pub fn share(&mut self, page_url: &str, host: &mut impl ViewerHost) -> bool {
        if self.session.is_none() {
            return false;
        }
        if let Err(err) = host.write_text(page_url) {
            error!(%err, "failed to copy URL");
            return false;
        }
        if let Some(id) = self.timers.copy_feedback.take() {
            host.cancel(id);
        }
        self.timers.copy_feedback = Some(host.schedule(self.config.copy_feedback()));
        if let Some(session) = self.session.as_mut() {
            session.copy_feedback_active = true;
        }
        true
    }

    pub fn image_loaded(&mut self, slot: ImageSlot, src: &str) -> bool {
        let Some(image) = self.image_slot_mut(slot) else {
            return false;
        };
        image.loaded(src)
    }

    pub fn image_failed(&mut self, slot: ImageSlot, src: &str) -> bool {
        let Some(image) = self.image_slot_mut(slot) else {
            return false;
        };
        let handled = image.failed(src);
        if handled {
            debug!(src, ?slot, "image failed to load");
        }
        handled
    }

    /// Deliver a fired timer. Returns false if the id is not the viewer's.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if self.timers.entrance == Some(id) {
            self.timers.entrance = None;
            session.visible = true;
        } else if self.timers.copy_feedback == Some(id) {
            self.timers.copy_feedback = None;
            session.copy_feedback_active = false;
        } else if self.timers.swipe_cooldown == Some(id) {
            self.timers.swipe_cooldown = None;
            session.swiping = false;
        } else {
            return false;
        }
        true
    }

    fn image_slot_mut(&mut self, slot: ImageSlot) -> Option<&mut ImageLoad> {
        let session = self.session.as_mut()?;
        Some(match slot {
            ImageSlot::Inline => &mut session.inline_image,
            ImageSlot::Fullscreen => &mut session.fullscreen_image,
        })
    }

    fn enter_fullscreen(&mut self, host: &mut impl ViewerHost) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.display_mode = DisplayMode::Fullscreen;
        session.refresh_images();
        if self.keyboard.is_none() {
            self.keyboard = Some(host.attach_keyboard());
        }
        debug!(index = session.current_index, "fullscreen entered");
    }

    fn exit_fullscreen(&mut self, host: &mut impl ViewerHost) {
        if let Some(id) = self.keyboard.take() {
            host.detach_keyboard(id);
        }
        if let Some(session) = self.session.as_mut() {
            if session.display_mode == DisplayMode::Fullscreen {
                session.display_mode = DisplayMode::Inline;
                session.refresh_images();
                debug!("fullscreen exited");
            }
        }
    }

    /// Cancel timers, detach the listener, and drop the session.
    fn release(&mut self, host: &mut impl ViewerHost) {
        let timers = std::mem::take(&mut self.timers);
        for id in [timers.entrance, timers.copy_feedback, timers.swipe_cooldown]
            .into_iter()
            .flatten()
        {
            host.cancel(id);
        }
        if let Some(id) = self.keyboard.take() {
            host.detach_keyboard(id);
        }
        self.session = None;
    }
}
