//! Project gallery modal: carousel, fullscreen lightbox, swipe and keyboard
//! navigation, and the share affordance.
//!
//! | Module | Role |
//! |--------|------|
//! | [`viewer`] | [`GalleryViewer`] state machine and its [`GallerySession`] |
//! | [`gesture`] | [`SwipeTracker`]: tap / swipe / ignored classification |
//! | [`image`] | [`ImageLoad`]: per-slot spinner, loaded, and error state |
//!
//! The dot-indicator and thumbnail-strip carousels are rendering skins over
//! this one state machine; see [`crate::render::Skin`].

pub mod gesture;
pub mod image;
pub mod viewer;

pub use gesture::{GestureOutcome, SwipeDirection, SwipeTracker};
pub use image::{ImageLoad, ImageSlot, LoadState};
pub use viewer::{
    ClickTarget, DisplayMode, GallerySession, GalleryViewer, Key, ViewerHost, ViewerState,
};
