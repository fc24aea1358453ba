//! Terminal presentation for the CLI.
//!
//! Result pages and rendered documents are laid out here. Colors are only
//! used when stdout is a terminal.

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use unicode_width::UnicodeWidthChar;

use crate::models::{DisplayDocument, Page, StructuredDocument};

/// Default width when terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

/// Get the current terminal width.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status icons for different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Search,
}

/// Print a status line to stderr.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    if !std::io::stderr().is_terminal() {
        eprintln!("{} {}", icon, msg);
        return;
    }
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg),
        Status::Info => eprintln!("{} {}", icon.cyan().bold(), msg),
        Status::Search => eprintln!("{} {}", icon.yellow(), msg),
    }
}

/// Truncate `s` to at most `max_width` display columns, adding an ellipsis.
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    let total: usize = s.chars().filter_map(|c| c.width()).sum();
    if total <= max_width {
        return s.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// "Page X of Y" footer text.
pub fn page_label(page: &Page) -> String {
    format!("Page {} of {}", page.page_number, page.total_pages)
}

/// Print a page of results, numbering entries by their global index.
pub fn print_page(page: &Page) {
    let color = is_terminal();
    let width = terminal_width().saturating_sub(8).max(20);

    if page.entries.is_empty() {
        println!("No results.");
    }

    for (i, entry) in page.entries.iter().enumerate() {
        let number = format!("{:>5}.", page.offset + i + 1);
        let text = truncate_with_ellipsis(entry.as_str(), width);
        if color {
            println!("{} {}", number.dimmed(), text);
        } else {
            println!("{} {}", number, text);
        }
    }

    let mut footer = page_label(page);
    if page.has_prev {
        footer.push_str("  [p]rev");
    }
    if page.has_next {
        footer.push_str("  [n]ext");
    }
    if color {
        println!("{}", footer.bold().cyan());
    } else {
        println!("{}", footer);
    }
}

/// Plain-text layout of a rendered document.
pub fn format_document(doc: &DisplayDocument) -> String {
    match doc {
        DisplayDocument::Structured(doc) => format_structured(doc),
        DisplayDocument::Text { content } => content.clone(),
    }
}

fn format_structured(doc: &StructuredDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", doc.title));
    out.push_str(&format!("Author: {}\n", doc.author));
    out.push_str(&format!("Published: {}\n", doc.published));
    out.push_str(&format!("URL: {}\n\n", doc.url));
    out.push_str(&format!("{}\n", doc.text));
    out.push_str(&format_entities("Persons", &doc.persons));
    out.push_str(&format_entities("Locations", &doc.locations));
    out.push_str(&format_entities("Organizations", &doc.organizations));
    out
}

fn format_entities(label: &str, names: &[String]) -> String {
    let mut out = format!("\n{}:\n", label);
    for name in names {
        out.push_str(&format!("  - {}\n", name));
    }
    out
}

/// Print a rendered document.
pub fn print_document(doc: &DisplayDocument) {
    let DisplayDocument::Structured(structured) = doc else {
        println!("{}", format_document(doc));
        return;
    };
    if !is_terminal() {
        print!("{}", format_document(doc));
        return;
    }

    let rule = "─".repeat(terminal_width().min(80));
    println!("{}", structured.title.bold().blue());
    println!("{}", rule.dimmed());
    println!("{} {}", "Author:".bold(), structured.author);
    println!("{} {}", "Published:".bold(), structured.published.yellow());
    if structured.has_url() {
        println!("{} {}", "URL:".bold(), structured.url.underline().cyan());
    } else {
        println!("{} {}", "URL:".bold(), structured.url.dimmed());
    }
    println!();
    println!("{}", structured.text);
    for (label, names) in [
        ("Persons", &structured.persons),
        ("Locations", &structured.locations),
        ("Organizations", &structured.organizations),
    ] {
        println!();
        println!("{}", format!("{}:", label).bold().green());
        for name in names {
            println!("  • {}", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResultEntry;

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_page_label() {
        let page = Page {
            entries: vec![ResultEntry::new("a")],
            offset: 0,
            page_number: 1,
            total_pages: 1,
            has_prev: false,
            has_next: false,
        };
        assert_eq!(page_label(&page), "Page 1 of 1");
    }

    #[test]
    fn test_format_structured_field_order() {
        let doc = DisplayDocument::Structured(StructuredDocument {
            persons: vec!["Ada".to_string()],
            organizations: vec!["ACME".to_string()],
            ..Default::default()
        });
        let text = format_document(&doc);

        let order = [
            "No Title",
            "Author: Unknown",
            "Published: Unknown",
            "URL: No URL",
            "No Text",
            "Persons:",
            "Ada",
            "Locations:",
            "Organizations:",
            "ACME",
        ];
        let mut last = 0;
        for needle in order {
            let pos = text[last..].find(needle).map(|p| p + last);
            assert!(pos.is_some(), "missing or out of order: {}", needle);
            last = pos.unwrap();
        }
    }

    #[test]
    fn test_format_text_document() {
        let doc = DisplayDocument::Text {
            content: "raw".to_string(),
        };
        assert_eq!(format_document(&doc), "raw");
    }
}
