//! Code block highlighting.
//!
//! A [`Highlighter`] decorates one code block at a time. Hosts own the
//! enumeration of blocks: a DOM host walks its `pre code` elements, a string
//! host uses [`highlight_html`].

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::util::{escape_html, unescape_html};

/// Class marking a block as processed by a highlighter.
const HIGHLIGHTED_CLASS: &str = "hljs";

/// Language assumed for fences without an info string.
const PLAINTEXT: &str = "plaintext";

/// `<pre><code>` blocks as emitted by the Markdown renderer.
static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<pre><code(?: class="([^"]*)")?>(.*?)</code></pre>"#)
        .expect("code block pattern is valid")
});

/// A code-bearing element, detached from any particular document model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language from a `language-*` class, if any.
    pub language: Option<String>,
    /// Raw (unescaped) source text.
    pub source: String,
    /// Class list of the `<code>` element.
    pub classes: Vec<String>,
    /// Inner HTML of the `<code>` element.
    pub html: String,
}

impl CodeBlock {
    /// Create a block from its source text and class list.
    ///
    /// The inner HTML starts out as the escaped source.
    #[must_use]
    pub fn new(source: impl Into<String>, classes: Vec<String>) -> Self {
        let source = source.into();
        let language = classes
            .iter()
            .find_map(|c| c.strip_prefix("language-"))
            .map(str::to_owned);
        let html = escape_html(&source);
        Self {
            language,
            source,
            classes,
            html,
        }
    }

    /// Add a class unless already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Whether the class list contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Whether a highlighter already processed this block.
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.has_class(HIGHLIGHTED_CLASS)
    }

    /// Render the block back to `<pre><code>` markup.
    #[must_use]
    pub fn to_html(&self) -> String {
        if self.classes.is_empty() {
            format!("<pre><code>{}</code></pre>", self.html)
        } else {
            format!(
                r#"<pre><code class="{}">{}</code></pre>"#,
                escape_html(&self.classes.join(" ")),
                self.html
            )
        }
    }
}

/// Syntax highlighter for a single code block.
///
/// Decorates the block in place; nothing is returned.
pub trait Highlighter {
    /// Highlight `block`.
    fn highlight(&self, block: &mut CodeBlock);
}

/// Highlighter that only tags blocks.
///
/// Adds the `hljs` marker and a `language-*` class (`language-plaintext` for
/// bare fences), leaving the markup of the source untouched. Already
/// highlighted blocks are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassHighlighter;

impl Highlighter for ClassHighlighter {
    fn highlight(&self, block: &mut CodeBlock) {
        if block.is_highlighted() {
            return;
        }
        if block.language.is_none() {
            block.language = Some(PLAINTEXT.to_owned());
            block.add_class(&format!("language-{PLAINTEXT}"));
        }
        block.add_class(HIGHLIGHTED_CLASS);
    }
}

/// Run `highlighter` over every `<pre><code>` block in `html`.
///
/// Returns the rewritten HTML and the number of blocks visited.
pub fn highlight_html(html: &str, highlighter: &dyn Highlighter) -> (String, usize) {
    let mut count = 0;
    let rewritten = CODE_BLOCK_RE.replace_all(html, |caps: &Captures<'_>| {
        count += 1;
        let classes = caps
            .get(1)
            .map(|m| {
                unescape_html(m.as_str())
                    .split_whitespace()
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let inner = caps.get(2).map_or("", |m| m.as_str());

        let mut block = CodeBlock::new(unescape_html(inner), classes);
        block.html = inner.to_owned();
        highlighter.highlight(&mut block);
        block.to_html()
    });
    (rewritten.into_owned(), count)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Uppercase;

    impl Highlighter for Uppercase {
        fn highlight(&self, block: &mut CodeBlock) {
            block.html = escape_html(&block.source.to_uppercase());
            block.add_class("upper");
        }
    }

    #[test]
    fn test_code_block_language_from_class() {
        let block = CodeBlock::new("x", vec!["language-rust".to_owned()]);

        assert_eq!(block.language.as_deref(), Some("rust"));
        assert!(!block.is_highlighted());
    }

    #[test]
    fn test_code_block_to_html_escapes_source() {
        let block = CodeBlock::new("a < b", Vec::new());

        assert_eq!(block.to_html(), "<pre><code>a &lt; b</code></pre>");
    }

    #[test]
    fn test_class_highlighter_tags_language() {
        let mut block = CodeBlock::new("fn main() {}", vec!["language-rust".to_owned()]);

        ClassHighlighter.highlight(&mut block);

        assert_eq!(block.classes, vec!["language-rust", "hljs"]);
    }

    #[test]
    fn test_class_highlighter_defaults_to_plaintext() {
        let mut block = CodeBlock::new("plain", Vec::new());

        ClassHighlighter.highlight(&mut block);

        assert_eq!(block.language.as_deref(), Some("plaintext"));
        assert_eq!(block.classes, vec!["language-plaintext", "hljs"]);
    }

    #[test]
    fn test_class_highlighter_is_idempotent() {
        let mut block = CodeBlock::new("x", vec!["language-rust".to_owned()]);

        ClassHighlighter.highlight(&mut block);
        ClassHighlighter.highlight(&mut block);

        assert_eq!(block.classes, vec!["language-rust", "hljs"]);
    }

    #[test]
    fn test_highlight_html_visits_every_block() {
        let html = "<p>a</p>\n<pre><code class=\"language-sh\">ls &amp;&amp; pwd\n</code></pre>\n\
                    <pre><code>two\n</code></pre>\n";

        let (out, count) = highlight_html(html, &Uppercase);

        assert_eq!(count, 2);
        assert_eq!(
            out,
            "<p>a</p>\n<pre><code class=\"language-sh upper\">LS &amp;&amp; PWD\n</code></pre>\n\
             <pre><code class=\"upper\">TWO\n</code></pre>\n"
        );
    }

    #[test]
    fn test_highlight_html_without_blocks() {
        let (out, count) = highlight_html("<p>no code</p>", &ClassHighlighter);

        assert_eq!(count, 0);
        assert_eq!(out, "<p>no code</p>");
    }

    #[test]
    fn test_highlight_html_ignores_inline_code() {
        let (out, count) = highlight_html("<p><code>x</code></p>", &ClassHighlighter);

        assert_eq!(count, 0);
        assert_eq!(out, "<p><code>x</code></p>");
    }
}
