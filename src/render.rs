//! HTML rendering of gallery snapshots.
//!
//! Renders the modal for a [`GallerySession`] exactly as the state machine
//! sees it: current slide, display mode, load state of each image, copy
//! feedback. Two skins share the same session and differ only in the slide
//! picker:
//!
//! - [`Skin::Dots`]: one dot button per slide.
//! - [`Skin::Thumbnails`]: a strip of thumbnail buttons.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating;
//! project descriptions are markdown rendered with `pulldown-cmark`.

use crate::context::PageContext;
use crate::gallery::{DisplayMode, GallerySession, ImageLoad, ImageSlot, LoadState};
use crate::i18n::Labels;
use crate::types::ImageAsset;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fmt;
use std::str::FromStr;

/// Slide picker style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Skin {
    #[default]
    Dots,
    Thumbnails,
}

impl FromStr for Skin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dots" => Ok(Skin::Dots),
            "thumbnails" | "thumbs" => Ok(Skin::Thumbnails),
            other => Err(format!("unknown skin '{other}' (expected dots or thumbnails)")),
        }
    }
}

impl fmt::Display for Skin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skin::Dots => f.write_str("dots"),
            Skin::Thumbnails => f.write_str("thumbnails"),
        }
    }
}

/// Convert markdown to HTML.
pub fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new(source);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

fn alt_text(image: &ImageAsset, index: usize, labels: &Labels) -> String {
    image
        .caption
        .clone()
        .unwrap_or_else(|| labels.slide_alt(index))
}

/// Spinner until loaded, placeholder on failure.
fn image_view(load: &ImageLoad, image: &ImageAsset, alt: &str, labels: &Labels) -> Markup {
    html! {
        @match load.state() {
            LoadState::Loading => {
                div.image-spinner aria-hidden="true" {}
                img.image-loading src=(image.url) alt=(alt) loading="lazy";
            }
            LoadState::Loaded => {
                img.image-loaded src=(image.url) alt=(alt);
            }
            LoadState::Errored => {
                div.image-placeholder role="img" aria-label=(alt) { (labels.image_unavailable) }
            }
        }
    }
}

fn slide_picker(session: &GallerySession, labels: &Labels, skin: Skin) -> Markup {
    let current = session.current_index();
    html! {
        @match skin {
            Skin::Dots => {
                div.carousel-dots {
                    @for idx in 0..session.image_count() {
                        button.dot.active[idx == current]
                            aria-label=(labels.slide_button(idx))
                            aria-current=[(idx == current).then_some("true")]
                            data-slide=(idx) {}
                    }
                }
            }
            Skin::Thumbnails => {
                div.carousel-thumbnails {
                    @for (idx, image) in session.project().images.iter().enumerate() {
                        button.thumbnail.active[idx == current]
                            aria-label=(labels.slide_button(idx))
                            aria-current=[(idx == current).then_some("true")]
                            data-slide=(idx) {
                            img src=(image.url) alt="" loading="lazy";
                        }
                    }
                }
            }
        }
    }
}

fn project_meta(session: &GallerySession, labels: &Labels) -> Markup {
    let project = session.project();
    html! {
        dl.project-meta {
            @if let Some(client) = &project.client {
                dt { (labels.client) }
                dd { (client) }
            }
            @if let Some(kind) = &project.project_type {
                dt { (labels.project_type) }
                dd { (kind) }
            }
            @if !project.tools.is_empty() {
                dt { (labels.tools) }
                dd {
                    ul.tools {
                        @for tool in &project.tools {
                            li.tool { (tool) }
                        }
                    }
                }
            }
        }
    }
}

fn fullscreen_overlay(session: &GallerySession, image: &ImageAsset, labels: &Labels) -> Markup {
    let index = session.current_index();
    let alt = image.caption.clone().unwrap_or_default();
    html! {
        div.fullscreen-overlay role="dialog" aria-modal="true" {
            button.fullscreen-close aria-label=(labels.close_fullscreen) { "×" }
            (image_view(session.image(ImageSlot::Fullscreen), image, &alt, labels))
            @if session.image_count() > 1 {
                button.fullscreen-prev aria-label=(labels.previous_image) { "‹" }
                button.fullscreen-next aria-label=(labels.next_image) { "›" }
            }
            @if let Some(caption) = &image.caption {
                div.fullscreen-caption { (caption) }
            }
            span.slide-counter { (index + 1) " / " (session.image_count()) }
        }
    }
}

/// Render the gallery modal for an open session.
pub fn render_gallery(session: &GallerySession, labels: &Labels, skin: Skin) -> Markup {
    let project = session.project();
    let current = session.current_image();
    let index = session.current_index();
    let description = markdown_to_html(&project.description);
    let inline = session.image(ImageSlot::Inline);
    let inline_alt = current
        .map(|image| alt_text(image, index, labels))
        .unwrap_or_default();

    html! {
        div #project-details-modal .modal-backdrop .is-visible[session.is_visible()]
            role="dialog" aria-modal="true" aria-labelledby="project-details-title"
            data-skin=(skin.to_string()) {
            div.modal-content tabindex="-1" {
                header.modal-header {
                    h2 #project-details-title { (project.title) }
                    button.share-button aria-label=(labels.share) {
                        @if session.copy_feedback_active() {
                            span.copied title=(labels.copied) { "✓" }
                        } @else {
                            span.share-icon { "⤴" }
                        }
                    }
                    button.close-button aria-label=(labels.close) { "×" }
                }
                button.back-to-projects { "← " (labels.back_to_projects) }
                div.carousel {
                    @match current {
                        Some(image) => {
                            div.slide.zoomable {
                                (image_view(inline, image, &inline_alt, labels))
                            }
                        }
                        None => {
                            div.carousel-empty { (labels.no_images) }
                        }
                    }
                    @if session.image_count() > 1 {
                        button.carousel-prev aria-label=(labels.previous_image) { "‹" }
                        button.carousel-next aria-label=(labels.next_image) { "›" }
                        (slide_picker(session, labels, skin))
                    }
                }
                @if let Some(caption) = current.and_then(|i| i.caption.as_ref()) {
                    p.slide-caption { (caption) }
                }
                div.project-description { (PreEscaped(description)) }
                (project_meta(session, labels))
            }
            @if let (DisplayMode::Fullscreen, Some(image)) = (session.display_mode(), current) {
                (fullscreen_overlay(session, image, labels))
            }
        }
    }
}

/// Menu toggle, theme toggle, and the off-canvas menu panel.
fn site_header(ctx: &PageContext, labels: &Labels) -> Markup {
    let menu_open = ctx.menu_open();
    let menu_label = if menu_open {
        &labels.menu_close
    } else {
        &labels.menu_open
    };
    html! {
        header.site-header {
            button.menu-toggle aria-label=(menu_label) aria-expanded=(menu_open.to_string()) {
                @if menu_open { "×" } @else { "☰" }
            }
            button.theme-toggle aria-label=(labels.theme_toggle)
                aria-pressed=(ctx.theme().is_dark().to_string()) {
                @if ctx.theme().is_dark() { "☀" } @else { "☾" }
            }
        }
        nav.off-canvas-menu.open[menu_open] aria-hidden=((!menu_open).to_string()) {}
    }
}

/// Render a complete document: theme class, language, scroll lock, the site
/// header, and the modal when one is open.
pub fn render_page(
    ctx: &PageContext,
    session: Option<&GallerySession>,
    labels: &Labels,
    skin: Skin,
) -> Markup {
    let title = session
        .map(|s| s.project().title.clone())
        .unwrap_or_else(|| "Portfolio".to_string());
    html! {
        (DOCTYPE)
        html lang=(ctx.language().code()) class=[ctx.theme().is_dark().then_some("dark")] {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body class=[ctx.scroll_locked().then_some("scroll-locked")] {
                (site_header(ctx, labels))
                @if let Some(session) = session {
                    (render_gallery(session, labels, skin))
                }
            }
        }
    }
}
