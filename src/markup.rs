//! The trust boundary between message text and HTML.
//!
//! User text is always escaped.  Assistant text is markdown from the server
//! and is rendered to HTML as-is; the server is trusted to send content that
//! is meant to be formatted.

use std::fmt;

use pulldown_cmark::{Options, Parser, html};

/// An HTML fragment ready to be placed into the transcript panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Escape plain text so that no part of it is interpreted as markup.
    pub fn escape(text: &str) -> Self {
        Markup(html_escape::encode_text(text).into_owned())
    }

    /// Render markdown to HTML.
    pub fn from_markdown(markdown: &str) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        let parser = Parser::new_ext(markdown, options);
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        Markup(html_output)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_does_not_interpret_tags() {
        let markup = Markup::escape("<b>hi</b>");
        assert_eq!(markup.as_str(), "&lt;b&gt;hi&lt;/b&gt;");
        assert!(!markup.as_str().contains("<b>"));
    }

    #[test]
    fn escape_leaves_markdown_alone() {
        assert_eq!(Markup::escape("**hello**").as_str(), "**hello**");
        assert_eq!(Markup::escape("fish & chips").as_str(), "fish &amp; chips");
    }

    #[test]
    fn markdown_bold() {
        assert_eq!(
            Markup::from_markdown("**hello**").as_str(),
            "<p><strong>hello</strong></p>\n"
        );
    }

    #[test]
    fn markdown_sections_and_lists() {
        let markup = Markup::from_markdown("## Short Overview\n\n1. Jack the aircraft\n2. Remove the wheel\n");
        assert!(markup.as_str().contains("<h2>Short Overview</h2>"));
        assert!(markup.as_str().contains("<ol>"));
        assert!(markup.as_str().contains("<li>Remove the wheel</li>"));
    }

    #[test]
    fn markdown_tables_and_strikethrough() {
        let markup = Markup::from_markdown("| Tool | Qty |\n|---|---|\n| Jack | 1 |\n\n~~old~~\n");
        assert!(markup.as_str().contains("<table>"));
        assert!(markup.as_str().contains("<del>old</del>"));
    }

    #[test]
    fn empty_markdown() {
        assert_eq!(Markup::from_markdown("").as_str(), "");
    }
}
