//! # Folio
//!
//! The interactive core of a bilingual (English/Finnish) design portfolio,
//! without a browser. A project gallery viewer and a scroll-reveal
//! coordinator run as plain state machines; everything they need from the
//! page (timers, clipboard, keyboard, element observation, document styling)
//! comes in through small capability traits.
//!
//! # Architecture: State Machines Over Ports
//!
//! ```text
//! catalog.json ─→ Catalog ─→ Project (resolved per language)
//!                               │
//!   input events ─→ GalleryViewer ─→ Scheduler / KeyboardHub / Clipboard
//!   observations ─→ ScrollRevealCoordinator ─→ IntersectionWatch / MutationWatch / ElementTree
//!   menu, theme  ─→ PageContext ─→ DocumentStyle
//! ```
//!
//! Each machine owns every timer and listener it creates and releases them
//! on close, unmount, or destroy. Time is logical: a [`clock::VirtualClock`]
//! fires timers only when advanced, so every sequence of events is
//! reproducible in tests and in `folio replay`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Shared data: `Project`, `ImageAsset`, `Language`, `Theme`, `LocalizedText` |
//! | [`catalog`] | Loads the project catalog and resolves it per language |
//! | [`i18n`] | Gallery and menu labels, built-in en/fi with TOML overrides |
//! | [`clock`] | `Scheduler` port and the deterministic `VirtualClock` |
//! | [`ports`] | Capability traits the state machines are driven through |
//! | [`gallery`] | The project viewer: carousel, fullscreen, swipe, share |
//! | [`reveal`] | Staggered reveal of marked elements as they scroll into view |
//! | [`context`] | Page-wide scroll lock, theme, language, off-canvas menu |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`render`] | Maud rendering of a gallery snapshot in dots or thumbnails skin |
//! | [`replay`] | Drives viewer, context, and reveal from a JSON interaction script |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing-subscriber` initialization |
//!
//! # Design Decisions
//!
//! ## One Scroll Lock, Derived
//!
//! The gallery modal and the off-canvas menu both want the page scroll
//! locked. Neither writes the lock directly: [`context::PageContext`] holds
//! both flags and rewrites `modal_open || menu_open` after every change, so
//! closing one never unlocks the page under the other.
//!
//! ## Infallible Inputs
//!
//! Every viewer and coordinator operation is a no-op when it does not apply
//! (navigation with no images, keys outside fullscreen, clicks during the
//! swipe cooldown, timers that were already cancelled). Only I/O at the edges
//! (catalog, config, labels, scripts) returns errors.
//!
//! ## Maud For Snapshots
//!
//! [`render`] uses [Maud](https://maud.lambda.xyz/) so gallery markup is
//! checked at compile time and auto-escaped.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod context;
pub mod gallery;
pub mod i18n;
pub mod logging;
pub mod output;
pub mod ports;
pub mod render;
pub mod replay;
pub mod reveal;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
