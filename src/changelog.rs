//! Release-notes rendering into constrained safe HTML.
//!
//! The notes body is untrusted free text. Everything is HTML-escaped
//! first, then a small fixed set of markdown-like constructs is
//! recognized: headings, bullet lists, line breaks, bold and italic.
//! Anything else stays escaped plain text; this is deliberately not
//! full CommonMark.

use regex::Regex;
use std::sync::OnceLock;

/// Fragment returned for empty or whitespace-only notes.
const NO_CHANGELOG: &str = "<p><em>No changelog available.</em></p>";

static BOLD_REGEX: OnceLock<Regex> = OnceLock::new();
static ITALIC_REGEX: OnceLock<Regex> = OnceLock::new();

fn bold_regex() -> &'static Regex {
    BOLD_REGEX.get_or_init(|| {
        Regex::new(r"\*\*([^*]+)\*\*").expect("Failed to compile bold regex")
    })
}

fn italic_regex() -> &'static Regex {
    ITALIC_REGEX.get_or_init(|| {
        Regex::new(r"\*([^*\n]+)\*").expect("Failed to compile italic regex")
    })
}

/// One source line after structural classification.
enum Line {
    /// Heading with its HTML tag name (`h2`..`h4`) and text.
    Heading(&'static str, String),
    /// Bullet list item text.
    Item(String),
    /// Ordinary text line.
    Text(String),
}

/// Render raw release notes into safe HTML.
///
/// Pass order matters: escaping precedes all structural substitution so
/// injected markup never survives as live HTML; bullet conversion and
/// list wrapping precede the inline emphasis passes.
pub fn format_release_notes(raw: &str) -> String {
    if raw.trim().is_empty() {
        return NO_CHANGELOG.to_string();
    }

    let escaped = escape_html(raw);

    let lines: Vec<Line> = escaped
        .lines()
        .map(|line| {
            let line = line.trim_end_matches('\r');
            if let Some(rest) = line.strip_prefix("### ") {
                Line::Heading("h4", rest.to_string())
            } else if let Some(rest) = line.strip_prefix("## ") {
                Line::Heading("h3", rest.to_string())
            } else if let Some(rest) = line.strip_prefix("# ") {
                Line::Heading("h2", rest.to_string())
            } else if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
                Line::Item(rest.to_string())
            } else {
                Line::Text(line.to_string())
            }
        })
        .collect();

    let html = assemble(&lines);

    // Inline emphasis runs last, over the already-structured output.
    let html = bold_regex().replace_all(&html, "<strong>$1</strong>");
    let html = italic_regex().replace_all(&html, "<em>$1</em>");
    html.into_owned()
}

/// Join classified lines, wrapping each run of consecutive list items in
/// a single `<ul>` and turning breaks between text lines into `<br />`.
fn assemble(lines: &[Line]) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut items: Vec<&str> = Vec::new();
    let mut text_run: Vec<&str> = Vec::new();

    let flush_items = |items: &mut Vec<&str>, blocks: &mut Vec<String>| {
        if !items.is_empty() {
            let lis: Vec<String> = items.iter().map(|i| format!("<li>{i}</li>")).collect();
            blocks.push(format!("<ul>{}</ul>", lis.join("")));
            items.clear();
        }
    };
    let flush_text = |text_run: &mut Vec<&str>, blocks: &mut Vec<String>| {
        // Drop blank lines at the run edges; interior breaks survive.
        while text_run.first().is_some_and(|l| l.is_empty()) {
            text_run.remove(0);
        }
        while text_run.last().is_some_and(|l| l.is_empty()) {
            text_run.pop();
        }
        if !text_run.is_empty() {
            blocks.push(text_run.join("<br />"));
            text_run.clear();
        }
    };

    for line in lines {
        match line {
            Line::Heading(tag, text) => {
                flush_items(&mut items, &mut blocks);
                flush_text(&mut text_run, &mut blocks);
                blocks.push(format!("<{tag}>{text}</{tag}>"));
            }
            Line::Item(text) => {
                flush_text(&mut text_run, &mut blocks);
                items.push(text.as_str());
            }
            Line::Text(text) => {
                flush_items(&mut items, &mut blocks);
                text_run.push(text.as_str());
            }
        }
    }
    flush_items(&mut items, &mut blocks);
    flush_text(&mut text_run, &mut blocks);

    blocks.join("\n")
}

/// Escape the five HTML-significant characters.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gets_canned_fragment() {
        assert_eq!(format_release_notes(""), NO_CHANGELOG);
        assert_eq!(format_release_notes("   \n  "), NO_CHANGELOG);
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(format_release_notes("# Top"), "<h2>Top</h2>");
        assert_eq!(format_release_notes("## Mid"), "<h3>Mid</h3>");
        assert_eq!(format_release_notes("### Low"), "<h4>Low</h4>");
    }

    #[test]
    fn test_heading_list_and_bold_in_order() {
        let html = format_release_notes("## Title\n- item one\n**bold**");

        let heading = html.find("<h3>Title</h3>").expect("heading missing");
        let list = html
            .find("<ul><li>item one</li></ul>")
            .expect("list missing");
        let bold = html.find("<strong>bold</strong>").expect("bold missing");
        assert!(heading < list && list < bold, "wrong order: {html}");
    }

    #[test]
    fn test_consecutive_items_share_one_list() {
        let html = format_release_notes("- one\n- two\n* three");
        assert_eq!(html, "<ul><li>one</li><li>two</li><li>three</li></ul>");
    }

    #[test]
    fn test_separate_runs_get_separate_lists() {
        let html = format_release_notes("- one\ntext\n- two");
        assert_eq!(html.matches("<ul>").count(), 2, "got: {html}");
    }

    #[test]
    fn test_line_breaks_between_text_lines() {
        let html = format_release_notes("first line\nsecond line");
        assert_eq!(html, "first line<br />second line");
    }

    #[test]
    fn test_bold_and_italic() {
        let html = format_release_notes("**important** and *subtle*");
        assert_eq!(html, "<strong>important</strong> and <em>subtle</em>");
    }

    #[test]
    fn test_script_tag_is_escaped() {
        let html = format_release_notes("fix <script>alert('x')</script> bug");
        assert!(!html.contains("<script>"), "live markup survived: {html}");
        assert!(html.contains("&lt;script&gt;"), "escape missing: {html}");
        assert!(html.contains("&#39;x&#39;"), "quote escape missing: {html}");
    }

    #[test]
    fn test_injected_markup_in_bullet_is_escaped() {
        let html = format_release_notes("- <img src=x onerror=alert(1)>");
        assert!(html.starts_with("<ul><li>&lt;img"), "got: {html}");
    }

    #[test]
    fn test_unrecognized_markdown_passes_through() {
        // Links and code spans are not part of the recognized set.
        let html = format_release_notes("see [docs](https://example.com) and `code`");
        assert!(html.contains("[docs](https://example.com)"));
        assert!(html.contains("`code`"));
    }

    #[test]
    fn test_emphasis_inside_list_item() {
        let html = format_release_notes("- fixed **crash** on start");
        assert_eq!(
            html,
            "<ul><li>fixed <strong>crash</strong> on start</li></ul>"
        );
    }

    #[test]
    fn test_blank_lines_between_paragraphs() {
        let html = format_release_notes("para one\n\npara two");
        // The blank line survives as an interior break.
        assert_eq!(html, "para one<br /><br />para two");
    }
}
