//! Markdown rendering and code highlighting for the dv viewer.
//!
//! Both concerns are collaborators of the content loader rather than part of
//! it, so this crate exposes them behind small traits:
//!
//! - [`Render`]: Markdown text in, HTML string out. [`MarkdownRenderer`] is the
//!   pulldown-cmark implementation with GitHub Flavored Markdown enabled.
//! - [`Highlighter`]: decorates one [`CodeBlock`] in place.
//!   [`ClassHighlighter`] tags blocks the way highlight.js marks the elements
//!   it has processed; browser builds can bridge to the real library instead.
//!
//! [`highlight_html`] applies a highlighter to every `<pre><code>` block of
//! an HTML fragment, for hosts that keep the content region as a string.
//!
//! # Example
//!
//! ```
//! use dv_renderer::{ClassHighlighter, MarkdownRenderer, Render, highlight_html};
//!
//! let html = MarkdownRenderer::new().render("```rust\nfn main() {}\n```");
//! let (html, count) = highlight_html(&html, &ClassHighlighter);
//! assert_eq!(count, 1);
//! assert!(html.contains(r#"class="language-rust hljs""#));
//! ```

mod highlight;
mod markdown;
mod util;

pub use highlight::{ClassHighlighter, CodeBlock, Highlighter, highlight_html};
pub use markdown::{MarkdownRenderer, Render};
pub use util::{escape_html, unescape_html};
