//! CLI output formatting.
//!
//! Output is **information-first**: each entity leads with its positional
//! index and title, with secondary facts as indented context lines.
//!
//! # Output Format
//!
//! ## Projects
//!
//! ```text
//! Projects (en): All
//! 001 Brand Identity Design (3 images)
//!     Id: 1
//!     Type: Branding & Identity
//!     Client: Nordic Tech Solutions
//!     Tools: Illustrator, Photoshop
//!     A complete brand overhaul for a Nordic technology...
//! ```
//!
//! ## Replay
//!
//! ```text
//! 001 [    0ms] open 1 → inline 1/3
//! 002 [   10ms] advance 10ms → inline 1/3 visible locked
//!     1 timer(s) fired
//! 003 [  250ms] advance 240ms → inline 1/3 visible locked revealed 3
//! ```
//!
//! ## Check
//!
//! ```text
//! Catalog
//!     3 projects, 9 images
//!     Types: Branding & Identity, Web Design
//! Config
//!     config.toml
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::catalog::Catalog;
use crate::gallery::ViewerState;
use crate::i18n::Labels;
use crate::replay::TraceEntry;
use crate::types::{Language, Project};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Drop the emphasis and heading markers a one-line preview has no use for.
fn strip_markdown(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '*' | '_' | '#' | '`'))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}

// ============================================================================
// Projects
// ============================================================================

/// Listing of `projects`, headed by the active type filter (`filter_all`
/// when none).
pub fn format_projects(
    projects: &[&Project],
    lang: Language,
    filter: Option<&str>,
    labels: &Labels,
) -> Vec<String> {
    let filter = filter.unwrap_or(&labels.filter_all);
    let mut lines = vec![format!("Projects ({lang}): {filter}")];
    if projects.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
        return lines;
    }

    for (i, project) in projects.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            project.title,
            plural(project.image_count(), "image")
        ));
        let ctx = indent(1);
        lines.push(format!("{ctx}Id: {}", project.id));
        if let Some(ref project_type) = project.project_type {
            lines.push(format!("{ctx}Type: {project_type}"));
        }
        if let Some(ref client) = project.client {
            lines.push(format!("{ctx}Client: {client}"));
        }
        if !project.tools.is_empty() {
            lines.push(format!("{ctx}Tools: {}", project.tools.join(", ")));
        }
        let preview = truncate_desc(&strip_markdown(&project.description), 60);
        if !preview.is_empty() {
            lines.push(format!("{ctx}{preview}"));
        }
    }
    lines
}

pub fn print_projects(
    projects: &[&Project],
    lang: Language,
    filter: Option<&str>,
    labels: &Labels,
) {
    for line in format_projects(projects, lang, filter, labels) {
        println!("{}", line);
    }
}

// ============================================================================
// Replay
// ============================================================================

fn state_name(state: ViewerState) -> &'static str {
    match state {
        ViewerState::Closed => "closed",
        ViewerState::Inline => "inline",
        ViewerState::Fullscreen => "fullscreen",
    }
}

/// One summary line per step, with the step's note (if any) indented below.
pub fn format_trace(trace: &[TraceEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in trace {
        let mut summary = state_name(entry.state).to_string();
        if let Some((index, count)) = entry.slide {
            if count > 0 {
                summary.push_str(&format!(" {}/{}", index + 1, count));
            } else {
                summary.push_str(" (no images)");
            }
        }
        let flags = [
            (entry.visible, "visible"),
            (entry.swiping, "swiping"),
            (entry.copied, "copied"),
            (entry.menu_open, "menu"),
            (entry.scroll_locked, "locked"),
        ];
        for (on, name) in flags {
            if on {
                summary.push(' ');
                summary.push_str(name);
            }
        }
        if entry.revealed > 0 {
            summary.push_str(&format!(" revealed {}", entry.revealed));
        }
        lines.push(format!(
            "{} [{:>5}ms] {} → {}",
            format_index(entry.step),
            entry.elapsed.as_millis(),
            entry.label,
            summary
        ));
        if let Some(ref note) = entry.note {
            lines.push(format!("{}{}", indent(1), note));
        }
    }
    lines
}

pub fn print_trace(trace: &[TraceEntry]) {
    for line in format_trace(trace) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Summary of a validated catalog and the config it was checked against.
///
/// `config_path` is `None` when only stock defaults apply.
pub fn format_check(catalog: &Catalog, lang: Language, config_path: Option<&Path>) -> Vec<String> {
    let projects = catalog.projects(lang);
    let images: usize = projects.iter().map(Project::image_count).sum();

    let mut lines = vec!["Catalog".to_string()];
    lines.push(format!(
        "{}{}, {}",
        indent(1),
        plural(projects.len(), "project"),
        plural(images, "image")
    ));
    let types = catalog.project_types(lang);
    if !types.is_empty() {
        lines.push(format!("{}Types: {}", indent(1), types.join(", ")));
    }
    for (i, project) in projects.iter().enumerate() {
        if project.images.is_empty() {
            lines.push(format!(
                "{}{} {} has no images",
                indent(1),
                format_index(i + 1),
                project.title
            ));
        }
    }

    lines.push("Config".to_string());
    match config_path {
        Some(path) => lines.push(format!("{}{}", indent(1), path.display())),
        None => lines.push(format!("{}(stock defaults)", indent(1))),
    }
    lines
}

pub fn print_check(catalog: &Catalog, lang: Language, config_path: Option<&Path>) {
    for line in format_check(catalog, lang, config_path) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::project_with_images;
    use crate::types::Theme;
    use std::time::Duration;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn truncate_desc_respects_char_boundaries() {
        assert_eq!(truncate_desc("short", 10), "short");
        assert_eq!(truncate_desc("Brändäys ja identiteetti", 6), "Brändä...");
    }

    #[test]
    fn strip_markdown_flattens_emphasis() {
        assert_eq!(strip_markdown("A **bold**\n\n_move_"), "A bold move");
    }

    // =========================================================================
    // Projects
    // =========================================================================

    fn en() -> Labels {
        Labels::builtin(Language::En)
    }

    #[test]
    fn projects_show_metadata_lines() {
        let project = project_with_images(3);
        let lines = format_projects(&[&project], Language::En, None, &en());
        let has = |line: &str| lines.iter().any(|l| l == line);
        assert_eq!(lines[0], "Projects (en): All");
        assert_eq!(lines[1], "001 Project with 3 images (3 images)");
        assert!(has("    Id: p3"));
        assert!(has("    Client: Nordic Tech Solutions"));
        assert!(has("    Tools: Illustrator, Photoshop"));
        assert_eq!(lines.last().unwrap(), "    A test project.");
    }

    #[test]
    fn single_image_is_singular() {
        let project = project_with_images(1);
        let fi = Labels::builtin(Language::Fi);
        let lines = format_projects(&[&project], Language::Fi, None, &fi);
        assert_eq!(lines[0], "Projects (fi): Kaikki");
        assert_eq!(lines[1], "001 Project with 1 images (1 image)");
    }

    #[test]
    fn type_filter_names_the_listing() {
        let project = project_with_images(2);
        let filter = Some("Branding & Identity");
        let lines = format_projects(&[&project], Language::En, filter, &en());
        assert_eq!(lines[0], "Projects (en): Branding & Identity");
    }

    #[test]
    fn empty_listing() {
        let lines = format_projects(&[], Language::En, None, &en());
        assert_eq!(lines, vec!["Projects (en): All", "    (none)"]);
    }

    // =========================================================================
    // Replay
    // =========================================================================

    fn entry(step: usize) -> TraceEntry {
        TraceEntry {
            step,
            label: "open 1".to_string(),
            elapsed: Duration::from_millis(10),
            state: ViewerState::Inline,
            slide: Some((0, 3)),
            visible: true,
            swiping: false,
            copied: false,
            scroll_locked: true,
            menu_open: false,
            theme: Theme::Light,
            language: Language::En,
            revealed: 0,
            note: None,
        }
    }

    #[test]
    fn trace_line_lists_active_flags() {
        let lines = format_trace(&[entry(1)]);
        assert_eq!(
            lines,
            vec!["001 [   10ms] open 1 → inline 1/3 visible locked"]
        );
    }

    #[test]
    fn trace_line_counts_reveals() {
        let mut e = entry(3);
        e.revealed = 2;
        let lines = format_trace(&[e]);
        assert!(lines[0].ends_with("visible locked revealed 2"));
    }

    #[test]
    fn trace_note_is_indented() {
        let mut e = entry(2);
        e.note = Some("swipe next".to_string());
        let lines = format_trace(&[e]);
        assert_eq!(lines[1], "    swipe next");
    }

    #[test]
    fn trace_empty_project() {
        let mut e = entry(1);
        e.slide = Some((0, 0));
        e.visible = false;
        e.scroll_locked = false;
        assert!(format_trace(&[e])[0].ends_with("inline (no images)"));
    }

    // =========================================================================
    // Check
    // =========================================================================

    #[test]
    fn check_summarizes_catalog() {
        let catalog = Catalog::from_json(
            r#"{"projects": [
                {"id": "1", "title": "One", "description": "", "cover_image": "a.png",
                 "images": [{"url": "a.png"}], "project_type": "Web Design"},
                {"id": "2", "title": "Two", "description": "", "cover_image": "b.png"}
            ]}"#,
        )
        .unwrap();
        let lines = format_check(&catalog, Language::En, None);
        assert_eq!(lines[1], "    2 projects, 1 image");
        assert_eq!(lines[2], "    Types: Web Design");
        assert_eq!(lines[3], "    002 Two has no images");
        assert_eq!(lines[5], "    (stock defaults)");
    }
}
