//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser, html};

/// Markdown to HTML conversion.
///
/// Implementations are pure: the same text always produces the same HTML,
/// and fenced code blocks come out as `<pre><code class="language-…">`.
pub trait Render {
    /// Convert Markdown text to an HTML fragment.
    fn render(&self, markdown: &str) -> String;
}

/// pulldown-cmark backed renderer.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    gfm: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self { gfm: true }
    }
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    /// - Alerts (`> [!NOTE]`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }
}

impl Render for MarkdownRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.parser_options());
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_heading_and_paragraph() {
        let html = MarkdownRenderer::new().render("# Intro\n\nHello **world**.");

        assert_eq!(html, "<h1>Intro</h1>\n<p>Hello <strong>world</strong>.</p>\n");
    }

    #[test]
    fn test_render_fenced_code_block_with_language() {
        let html = MarkdownRenderer::new().render("```rust\nlet x = 1 < 2;\n```\n");

        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">let x = 1 &lt; 2;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_render_table_with_gfm() {
        let html = MarkdownRenderer::new().render("| a | b |\n|---|---|\n| 1 | 2 |\n");

        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_render_table_without_gfm() {
        let html = MarkdownRenderer::new()
            .with_gfm(false)
            .render("| a | b |\n|---|---|\n| 1 | 2 |\n");

        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_render_empty_document() {
        assert_eq!(MarkdownRenderer::new().render(""), "");
    }
}
