//! Page-wide shared state: scroll lock, theme, language, off-canvas menu.
//!
//! The document has one scroll lock, wanted by both the gallery modal and the
//! off-canvas menu. Rather than letting each writer toggle it, the context
//! keeps the two open flags and re-derives the lock after every change:
//!
//! ```text
//! scroll_locked = modal_open || menu_open
//! ```
//!
//! Writes are idempotent, so the order in which the modal and menu open and
//! close never leaves the page stuck locked or unlocked.

use crate::ports::DocumentStyle;
use crate::types::{Language, Theme};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    theme: Theme,
    language: Language,
    menu_open: bool,
    modal_open: bool,
}

impl PageContext {
    pub fn new(theme: Theme, language: Language) -> Self {
        Self {
            theme,
            language,
            menu_open: false,
            modal_open: false,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn scroll_locked(&self) -> bool {
        self.modal_open || self.menu_open
    }

    /// Write every derived document flag.
    pub fn apply(&self, doc: &mut impl DocumentStyle) {
        doc.set_scroll_locked(self.scroll_locked());
        doc.set_dark_mode(self.theme.is_dark());
        doc.set_language(self.language);
    }

    pub fn open_menu(&mut self, doc: &mut impl DocumentStyle) {
        self.menu_open = true;
        self.sync_lock(doc);
    }

    pub fn close_menu(&mut self, doc: &mut impl DocumentStyle) {
        self.menu_open = false;
        self.sync_lock(doc);
    }

    pub fn toggle_menu(&mut self, doc: &mut impl DocumentStyle) {
        self.menu_open = !self.menu_open;
        self.sync_lock(doc);
    }

    /// A navigation link inside the menu was followed.
    pub fn menu_link_clicked(&mut self, doc: &mut impl DocumentStyle) {
        self.close_menu(doc);
    }

    pub fn set_modal_open(&mut self, open: bool, doc: &mut impl DocumentStyle) {
        self.modal_open = open;
        self.sync_lock(doc);
    }

    pub fn toggle_theme(&mut self, doc: &mut impl DocumentStyle) {
        self.theme = self.theme.toggled();
        debug!(theme = ?self.theme, "theme changed");
        doc.set_dark_mode(self.theme.is_dark());
    }

    pub fn set_language(&mut self, language: Language, doc: &mut impl DocumentStyle) {
        self.language = language;
        debug!(%language, "language changed");
        doc.set_language(language);
    }

    fn sync_lock(&self, doc: &mut impl DocumentStyle) {
        doc.set_scroll_locked(self.scroll_locked());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::FakeDocument;

    #[test]
    fn lock_follows_either_flag() {
        let mut doc = FakeDocument::default();
        let mut ctx = PageContext::new(Theme::Light, Language::En);

        ctx.open_menu(&mut doc);
        assert!(doc.scroll_locked);
        ctx.set_modal_open(true, &mut doc);
        ctx.close_menu(&mut doc);
        assert!(doc.scroll_locked, "modal still open");
        ctx.set_modal_open(false, &mut doc);
        assert!(!doc.scroll_locked);
    }

    #[test]
    fn repeated_writes_are_idempotent() {
        let mut doc = FakeDocument::default();
        let mut ctx = PageContext::new(Theme::Light, Language::En);
        ctx.set_modal_open(true, &mut doc);
        ctx.set_modal_open(true, &mut doc);
        ctx.set_modal_open(false, &mut doc);
        assert_eq!(doc.lock_writes, vec![true, true, false]);
    }

    #[test]
    fn menu_link_closes_menu() {
        let mut doc = FakeDocument::default();
        let mut ctx = PageContext::new(Theme::Light, Language::En);
        ctx.toggle_menu(&mut doc);
        assert!(ctx.menu_open());
        ctx.menu_link_clicked(&mut doc);
        assert!(!ctx.menu_open());
        assert!(!doc.scroll_locked);
    }

    #[test]
    fn theme_and_language_reach_document() {
        let mut doc = FakeDocument::default();
        let mut ctx = PageContext::new(Theme::Light, Language::En);
        ctx.apply(&mut doc);
        assert!(!doc.dark);
        assert_eq!(doc.lang, Some(Language::En));

        ctx.toggle_theme(&mut doc);
        assert!(doc.dark);
        ctx.set_language(Language::Fi, &mut doc);
        assert_eq!(doc.lang, Some(Language::Fi));
        assert_eq!(ctx.theme(), Theme::Dark);
    }
}
