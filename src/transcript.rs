//! The chat transcript: an append-only log of rendered messages.
//!
//! The transcript also owns the scroll position of the panel that shows it.
//! Every append pins the view to the bottom so the newest entry is visible.

use std::fmt;

use crate::markup::Markup;
use crate::observability::TRANSCRIPT_APPENDS;

/// Rows shown by a panel that never told us its size.
pub const DEFAULT_VIEWPORT_ROWS: usize = 24;

/// Who a message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    User,
    Assistant,
}

impl Origin {
    /// The name used in CSS classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::User => "user",
            Origin::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub origin: Origin,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: Origin::User,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: Origin::Assistant,
        }
    }

    /// Render according to origin: user text is escaped, assistant text is
    /// markdown.
    pub fn render(&self) -> Markup {
        match self.origin {
            Origin::User => Markup::escape(&self.text),
            Origin::Assistant => Markup::from_markdown(&self.text),
        }
    }

    fn rows(&self) -> usize {
        self.text.lines().count().max(1)
    }
}

/// A message as it appears in the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    message: Message,
    markup: Markup,
    rows: usize,
}

impl Entry {
    fn new(message: Message) -> Self {
        let markup = message.render();
        let rows = message.rows();
        Self {
            message,
            markup,
            rows,
        }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn origin(&self) -> Origin {
        self.message.origin
    }

    pub fn text(&self) -> &str {
        &self.message.text
    }

    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    /// Height of this entry in panel rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The row/bubble pair the hosting page styles.
    pub fn to_html(&self) -> String {
        let origin = self.origin();
        format!(
            "<div class=\"message-row message-row--{origin}\"><div class=\"message-bubble message-bubble--{origin}\">{}</div></div>",
            self.markup
        )
    }
}

/// Ordered, append-only sequence of rendered messages.
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<Entry>,
    viewport_rows: usize,
    scroll_height: usize,
    scroll_top: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::with_viewport_rows(DEFAULT_VIEWPORT_ROWS)
    }

    /// Create a transcript shown in a panel `rows` high.
    pub fn with_viewport_rows(rows: usize) -> Self {
        Self {
            entries: Vec::new(),
            viewport_rows: rows,
            scroll_height: 0,
            scroll_top: 0,
        }
    }

    /// Append a message and scroll to the bottom.
    pub fn push(&mut self, message: Message) -> &Entry {
        let entry = Entry::new(message);
        self.scroll_height += entry.rows();
        self.entries.push(entry);
        self.scroll_top = self.max_scroll_top();
        TRANSCRIPT_APPENDS.click();
        let last = self.entries.len() - 1;
        &self.entries[last]
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll_height = 0;
        self.scroll_top = 0;
    }

    /// Total height of the rendered entries.
    pub fn scroll_height(&self) -> usize {
        self.scroll_height
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    /// The furthest the view can scroll.
    pub fn max_scroll_top(&self) -> usize {
        self.scroll_height.saturating_sub(self.viewport_rows)
    }

    /// True when the newest row is in view.
    pub fn is_at_bottom(&self) -> bool {
        self.scroll_top == self.max_scroll_top()
    }

    /// Scroll to `offset`, clamped to the scrollable range.
    pub fn scroll_to(&mut self, offset: usize) {
        self.scroll_top = offset.min(self.max_scroll_top());
    }

    /// Resize the panel.
    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows;
        self.scroll_top = self.scroll_top.min(self.max_scroll_top());
    }

    /// Entries that overlap the current view, top to bottom.
    pub fn visible(&self) -> impl Iterator<Item = &Entry> {
        let top = self.scroll_top;
        let bottom = self.scroll_top + self.viewport_rows;
        let mut offset = 0;
        self.entries.iter().filter(move |entry| {
            let start = offset;
            offset += entry.rows();
            start < bottom && offset > top
        })
    }

    /// The whole panel as HTML.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div id=\"chat-window\" class=\"chat-window\">");
        for entry in &self.entries {
            html.push_str(&entry.to_html());
        }
        html.push_str("</div>");
        html
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_text_is_literal() {
        let mut transcript = Transcript::new();
        let entry = transcript.push(Message::user("<b>hi</b>"));
        assert_eq!(entry.origin(), Origin::User);
        assert_eq!(entry.text(), "<b>hi</b>");
        assert_eq!(entry.markup().as_str(), "&lt;b&gt;hi&lt;/b&gt;");
    }

    #[test]
    fn assistant_text_is_markdown() {
        let mut transcript = Transcript::new();
        let entry = transcript.push(Message::assistant("**hello**"));
        assert_eq!(entry.origin(), Origin::Assistant);
        assert!(entry.markup().as_str().contains("<strong>hello</strong>"));
    }

    #[test]
    fn entries_keep_append_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("one"));
        transcript.push(Message::assistant("two"));
        transcript.push(Message::user("three"));
        let texts: Vec<_> = transcript.entries().iter().map(Entry::text).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(transcript.last().map(Entry::text), Some("three"));
    }

    #[test]
    fn append_scrolls_to_bottom() {
        let mut transcript = Transcript::with_viewport_rows(3);
        for i in 0..10 {
            transcript.push(Message::user(format!("line {i}\nsecond")));
            assert_eq!(transcript.scroll_top(), transcript.max_scroll_top());
        }
        assert_eq!(transcript.scroll_height(), 20);
        assert_eq!(transcript.max_scroll_top(), 17);
    }

    #[test]
    fn append_after_scrolling_up_returns_to_bottom() {
        let mut transcript = Transcript::with_viewport_rows(2);
        for i in 0..5 {
            transcript.push(Message::user(format!("{i}")));
        }
        transcript.scroll_to(0);
        assert!(!transcript.is_at_bottom());
        transcript.push(Message::assistant("latest"));
        assert!(transcript.is_at_bottom());
        assert_eq!(transcript.scroll_top(), 4);
    }

    #[test]
    fn scroll_is_clamped() {
        let mut transcript = Transcript::with_viewport_rows(2);
        transcript.push(Message::user("a\nb\nc"));
        transcript.scroll_to(100);
        assert_eq!(transcript.scroll_top(), 1);

        transcript.set_viewport_rows(10);
        assert_eq!(transcript.scroll_top(), 0);
        assert_eq!(transcript.max_scroll_top(), 0);
    }

    #[test]
    fn short_transcript_never_scrolls() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("hi"));
        assert_eq!(transcript.scroll_top(), 0);
        assert!(transcript.is_at_bottom());
    }

    #[test]
    fn visible_entries() {
        let mut transcript = Transcript::with_viewport_rows(2);
        transcript.push(Message::user("first"));
        transcript.push(Message::assistant("second"));
        transcript.push(Message::user("third"));
        let visible: Vec<_> = transcript.visible().map(Entry::text).collect();
        assert_eq!(visible, vec!["second", "third"]);

        transcript.scroll_to(0);
        let visible: Vec<_> = transcript.visible().map(Entry::text).collect();
        assert_eq!(visible, vec!["first", "second"]);
    }

    #[test]
    fn panel_html() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("<i>q</i>"));
        transcript.push(Message::assistant("*a*"));
        assert_eq!(
            transcript.to_html(),
            "<div id=\"chat-window\" class=\"chat-window\">\
             <div class=\"message-row message-row--user\"><div class=\"message-bubble message-bubble--user\">&lt;i&gt;q&lt;/i&gt;</div></div>\
             <div class=\"message-row message-row--assistant\"><div class=\"message-bubble message-bubble--assistant\"><p><em>a</em></p>\n</div></div>\
             </div>"
        );
    }

    #[test]
    fn clear_resets_scroll() {
        let mut transcript = Transcript::with_viewport_rows(1);
        transcript.push(Message::user("a"));
        transcript.push(Message::user("b"));
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.scroll_height(), 0);
        assert_eq!(transcript.scroll_top(), 0);
    }
}
