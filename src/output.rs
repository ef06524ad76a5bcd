//! CLI output formatting for every subcommand.
//!
//! # Information-First Display
//!
//! Each slide is shown by its position and alt text, with the file name as
//! indented `Source:` context. Traces list one delivered event per line with
//! the controller state right after it.
//!
//! # Output Format
//!
//! ## Slides
//!
//! ```text
//! Slides (3)
//! 001 harbour
//!     Source: 010-harbour.jpg
//! 002 old town
//!     Source: 020-old-town.webp
//! 003 (030.avif)
//!     Source: 030.avif
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Render
//!
//! ```text
//! 3 slides → carousel.html
//! ```
//!
//! ## Simulate
//!
//! ```text
//!      0ms  init                  track 1  slide 001  settled  playing
//!      0ms  click next            track 2  slide 002  locked   playing  (1 → 2)
//!    300ms  click next            track 2  slide 002  locked   playing  (locked)
//!    600ms  transitionend         track 2  slide 002  settled  playing
//! ```
//!
//! # Architecture
//!
//! Each subcommand has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. The one exception is the
//! config presence check in [`format_slides`], which only stats a file.

use crate::carousel::Navigation;
use crate::sim::TraceEntry;
use crate::slides::Slide;
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

/// Format a slide line: numbered alt text, or the filename in parens when the
/// alt text is just the stem.
///
/// ```text
/// 001 harbour          // titled
/// 003 (030.avif)       // number only
/// ```
fn slide_line(index: usize, slide: &Slide) -> String {
    let stem = Path::new(&slide.filename)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    if slide.alt.is_empty() || slide.alt == stem {
        format!("{} ({})", format_index(index), slide.filename)
    } else {
        format!("{} {}", format_index(index), slide.alt)
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

// ============================================================================
// slides
// ============================================================================

/// Format the discovered slides of `source_root` in display order.
pub fn format_slides(slides: &[Slide], source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("Slides ({})", slides.len()));
    for (i, slide) in slides.iter().enumerate() {
        lines.push(slide_line(i + 1, slide));
        lines.push(format!("{}Source: {}", indent(1), slide.filename));
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    } else {
        lines.push(format!("{}(stock defaults)", indent(1)));
    }
    lines
}

/// Print slide listing to stdout.
pub fn print_slides(slides: &[Slide], source_root: &Path) {
    for line in format_slides(slides, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// render
// ============================================================================

/// Format the summary line of a rendered page.
pub fn format_render_output(slide_count: usize, output: &Path) -> Vec<String> {
    vec![format!(
        "{} \u{2192} {}",
        plural(slide_count, "slide"),
        output.display()
    )]
}

/// Print render summary to stdout.
pub fn print_render_output(slide_count: usize, output: &Path) {
    for line in format_render_output(slide_count, output) {
        println!("{}", line);
    }
}

// ============================================================================
// simulate
// ============================================================================

fn navigation_note(navigation: Option<Navigation>) -> String {
    match navigation {
        None => String::new(),
        Some(Navigation::Started { from, to }) => format!("  ({} \u{2192} {})", from, to),
        Some(Navigation::Locked) => "  (locked)".to_string(),
        Some(Navigation::AlreadyShown) => "  (already shown)".to_string(),
        Some(Navigation::OutOfRange) => "  (out of range)".to_string(),
    }
}

/// Format a single trace row.
pub fn format_trace_entry(entry: &TraceEntry) -> String {
    format!(
        "{:>6}ms  {:<20}  track {}  slide {}  {:<7}  {}{}",
        entry.at_ms,
        entry.event,
        entry.index,
        format_index(entry.real_index + 1),
        if entry.locked { "locked" } else { "settled" },
        if entry.autoplay { "playing" } else { "paused" },
        navigation_note(entry.navigation),
    )
}

/// Format a full simulation trace, one row per delivered event.
pub fn format_trace(trace: &[TraceEntry]) -> Vec<String> {
    trace.iter().map(format_trace_entry).collect()
}

/// Print a simulation trace to stdout.
pub fn print_trace(trace: &[TraceEntry]) {
    for line in format_trace(trace) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CarouselConfig;
    use crate::input::Control;
    use crate::sim::{Step, simulate};
    use crate::test_helpers::{slide_dir, slides, write_config};

    fn entry(event: &str, navigation: Option<Navigation>) -> TraceEntry {
        TraceEntry {
            at_ms: 600,
            event: event.to_string(),
            navigation,
            index: 2,
            real_index: 1,
            locked: true,
            autoplay: false,
            offset: 1600.0,
        }
    }

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn slides_listed_with_source_lines() {
        let tmp = slide_dir(&[]);
        let lines = format_slides(&slides(&["010-harbour.jpg", "030.avif"]), tmp.path());
        assert_eq!(lines[0], "Slides (2)");
        assert_eq!(lines[1], "001 harbour");
        assert_eq!(lines[2], "    Source: 010-harbour.jpg");
        assert_eq!(lines[3], "002 (030.avif)");
        assert_eq!(lines[4], "    Source: 030.avif");
    }

    #[test]
    fn config_section_shows_stock_defaults_without_file() {
        let tmp = slide_dir(&[]);
        let lines = format_slides(&slides(&["010-a.jpg"]), tmp.path());
        assert_eq!(lines.last().unwrap(), "    (stock defaults)");
    }

    #[test]
    fn config_section_lists_config_file() {
        let tmp = slide_dir(&[]);
        write_config(tmp.path(), "[autoplay]\nenabled = false\n");
        let lines = format_slides(&slides(&["010-a.jpg"]), tmp.path());
        assert_eq!(lines.last().unwrap(), "    config.toml");
    }

    #[test]
    fn render_summary_pluralizes() {
        let out = Path::new("carousel.html");
        assert_eq!(format_render_output(1, out), vec!["1 slide \u{2192} carousel.html"]);
        assert_eq!(format_render_output(3, out), vec!["3 slides \u{2192} carousel.html"]);
    }

    #[test]
    fn trace_row_shows_state_and_move() {
        let started = Some(Navigation::Started { from: 1, to: 2 });
        let line = format_trace_entry(&entry("click next", started));
        assert!(line.starts_with("   600ms  click next"));
        assert!(line.contains("track 2  slide 002  locked"));
        assert!(line.contains("paused"));
        assert!(line.ends_with("(1 \u{2192} 2)"));
    }

    #[test]
    fn trace_row_notes_dropped_navigation() {
        let line = format_trace_entry(&entry("key ArrowRight", Some(Navigation::Locked)));
        assert!(line.ends_with("(locked)"));
        let line = format_trace_entry(&entry("transitionend", None));
        assert!(line.ends_with("paused"));
    }

    #[test]
    fn trace_has_one_line_per_entry() {
        let trace = vec![entry("init", None), entry("resize", None)];
        assert_eq!(format_trace(&trace).len(), 2);
    }

    #[test]
    fn click_during_animation_is_reported_locked() {
        let steps = [
            Step::Click(Control::Next),
            Step::Wait(300),
            Step::Click(Control::Next),
            Step::Wait(300),
        ];
        let trace = simulate(3, 800.0, &CarouselConfig::default(), &steps).unwrap();
        assert_eq!(
            format_trace(&trace),
            vec![
                "     0ms  init                  track 1  slide 001  settled  playing",
                "     0ms  click next            track 2  slide 002  locked   playing  (1 \u{2192} 2)",
                "   300ms  click next            track 2  slide 002  locked   playing  (locked)",
                "   600ms  transitionend         track 2  slide 002  settled  playing",
            ]
        );
    }
}
