//! Terminal rendering of transcript entries.
//!
//! The same trust boundary as the HTML panel applies here: user text is
//! printed literally with control characters neutralised, assistant text is
//! markdown and is turned into ANSI styles.

use std::io::{self, Stdout, Write};

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::transcript::{Entry, Origin};

/// ANSI escape code for bold text (used for strong text and headings).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for code blocks).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for italic text (used for emphasis).
const ANSI_ITALIC: &str = "\x1b[3m";

/// ANSI escape code for struck-through text.
const ANSI_STRIKE: &str = "\x1b[9m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for inline code and the user label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for the assistant label).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for blue text (used for link targets).
const ANSI_BLUE: &str = "\x1b[34m";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print a transcript entry.
    fn print_entry(&mut self, entry: &Entry);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Show that a request is in flight.
    fn print_waiting(&mut self);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn label(&self, origin: Origin) -> String {
        let (name, color) = match origin {
            Origin::User => ("You", ANSI_CYAN),
            Origin::Assistant => ("Assistant", ANSI_GREEN),
        };
        if self.use_color {
            format!("{ANSI_BOLD}{color}{name}:{ANSI_RESET}")
        } else {
            format!("{name}:")
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_entry(&mut self, entry: &Entry) {
        let label = self.label(entry.origin());
        let body = match entry.origin() {
            Origin::User => literal_text(entry.text()),
            Origin::Assistant => markdown_to_ansi(entry.text(), self.use_color),
        };
        println!("{label} {}", body.trim_end());
        println!();
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        eprintln!("Error: {error}");
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
    }

    fn print_waiting(&mut self) {
        if self.use_color {
            print!("{ANSI_DIM}...{ANSI_RESET}\r");
        } else {
            print!("...\r");
        }
        self.flush();
    }
}

/// Make text safe to print verbatim.
///
/// Control characters other than newline and tab are replaced by their
/// escaped form so that user input cannot drive the terminal.
pub fn literal_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() && c != '\n' && c != '\t' {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}

/// Render markdown for a terminal.
pub fn markdown_to_ansi(markdown: &str, use_color: bool) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::with_capacity(markdown.len());
    // One entry per open list: the next ordinal, or None for bullets.
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut links: Vec<String> = Vec::new();
    let style = |out: &mut String, code: &str| {
        if use_color {
            out.push_str(code);
        }
    };

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                style(&mut out, ANSI_BOLD);
                if !use_color {
                    out.push_str(heading_marker(level));
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                style(&mut out, ANSI_RESET);
                out.push_str("\n\n");
            }
            Event::End(TagEnd::Paragraph) => {
                if lists.is_empty() {
                    out.push_str("\n\n");
                } else {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Strong) => style(&mut out, ANSI_BOLD),
            Event::Start(Tag::Emphasis) => style(&mut out, ANSI_ITALIC),
            Event::Start(Tag::Strikethrough) => style(&mut out, ANSI_STRIKE),
            Event::End(TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough) => {
                style(&mut out, ANSI_RESET)
            }
            Event::Start(Tag::List(start)) => {
                if !lists.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                if lists.is_empty() {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                let depth = lists.len().saturating_sub(1);
                out.push_str(&"  ".repeat(depth));
                match lists.last_mut() {
                    Some(Some(n)) => {
                        out.push_str(&format!("{n}. "));
                        *n += 1;
                    }
                    _ => out.push_str("- "),
                }
            }
            Event::End(TagEnd::Item) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::Start(Tag::CodeBlock(_)) => style(&mut out, ANSI_DIM),
            Event::End(TagEnd::CodeBlock) => {
                style(&mut out, ANSI_RESET);
                out.push('\n');
            }
            Event::Start(Tag::Link { dest_url, .. }) => links.push(dest_url.to_string()),
            Event::End(TagEnd::Link) => {
                if let Some(url) = links.pop() {
                    style(&mut out, ANSI_BLUE);
                    out.push_str(&format!(" <{url}>"));
                    style(&mut out, ANSI_RESET);
                }
            }
            Event::Start(Tag::TableCell) => out.push_str("| "),
            Event::End(TagEnd::TableCell) => out.push(' '),
            Event::End(TagEnd::TableHead | TagEnd::TableRow) => out.push_str("|\n"),
            Event::End(TagEnd::Table) => out.push('\n'),
            Event::Code(code) => {
                style(&mut out, ANSI_CYAN);
                if !use_color {
                    out.push('`');
                }
                out.push_str(&code);
                if !use_color {
                    out.push('`');
                }
                style(&mut out, ANSI_RESET);
            }
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                out.push_str(&text)
            }
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Rule => out.push_str("----\n\n"),
            Event::TaskListMarker(done) => out.push_str(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }
    out
}

fn heading_marker(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "# ",
        HeadingLevel::H2 => "## ",
        HeadingLevel::H3 => "### ",
        HeadingLevel::H4 => "#### ",
        HeadingLevel::H5 => "##### ",
        HeadingLevel::H6 => "###### ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
        assert_eq!(renderer.label(Origin::User), "You:");
        assert_eq!(renderer.label(Origin::Assistant), "Assistant:");
    }

    #[test]
    fn literal_text_neutralises_escapes() {
        assert_eq!(literal_text("<b>hi</b>"), "<b>hi</b>");
        assert_eq!(literal_text("**hi**"), "**hi**");
        assert_eq!(literal_text("\x1b[31mred"), "\\u{1b}[31mred");
        assert_eq!(literal_text("a\nb\tc"), "a\nb\tc");
    }

    #[test]
    fn bold_with_color() {
        assert_eq!(
            markdown_to_ansi("**hello**", true),
            format!("{ANSI_BOLD}hello{ANSI_RESET}\n\n")
        );
    }

    #[test]
    fn bold_without_color() {
        assert_eq!(markdown_to_ansi("**hello**", false), "hello\n\n");
    }

    #[test]
    fn headings_and_lists_without_color() {
        let rendered = markdown_to_ansi(
            "## Step-by-Step Procedure\n\n1. Chock the wheels\n2. Jack the axle\n\n- Mechanic\n- Inspector\n",
            false,
        );
        assert_eq!(
            rendered,
            "## Step-by-Step Procedure\n\n1. Chock the wheels\n2. Jack the axle\n\n- Mechanic\n- Inspector\n\n"
        );
    }

    #[test]
    fn nested_list_is_indented() {
        let rendered = markdown_to_ansi("- outer\n  - inner\n", false);
        assert_eq!(rendered, "- outer\n  - inner\n\n");
    }

    #[test]
    fn code_and_links_without_color() {
        let rendered = markdown_to_ansi("Run `torque` per [AMM](/docs/AMM.pdf#page=3).", false);
        assert_eq!(rendered, "Run `torque` per AMM </docs/AMM.pdf#page=3>.\n\n");
    }
}
