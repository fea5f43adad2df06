//! Bridge to a page-provided highlight.js.

use dv_renderer::{ClassHighlighter, CodeBlock, Highlighter};
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = hljs, js_name = highlight)]
    fn hljs_highlight(code: &str, options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = hljs, js_name = highlightAuto)]
    fn hljs_highlight_auto(code: &str) -> Result<JsValue, JsValue>;
}

/// Highlights with the global `hljs` when the page loads it.
///
/// Unknown languages and pages without highlight.js degrade to
/// [`ClassHighlighter`], which only tags the block.
#[derive(Debug, Clone, Copy, Default)]
pub struct HljsHighlighter;

impl HljsHighlighter {
    fn run(block: &CodeBlock) -> Result<JsValue, JsValue> {
        match block.language.as_deref() {
            Some(language) => {
                let options = Object::new();
                Reflect::set(&options, &"language".into(), &language.into())?;
                Reflect::set(&options, &"ignoreIllegals".into(), &JsValue::TRUE)?;
                hljs_highlight(&block.source, &options)
            }
            None => hljs_highlight_auto(&block.source),
        }
    }
}

impl Highlighter for HljsHighlighter {
    fn highlight(&self, block: &mut CodeBlock) {
        if block.is_highlighted() {
            return;
        }

        match Self::run(block) {
            Ok(result) => {
                if let Some(html) = string_field(&result, "value") {
                    block.html = html;
                }
                if block.language.is_none()
                    && let Some(language) = string_field(&result, "language")
                {
                    block.add_class(&format!("language-{language}"));
                    block.language = Some(language);
                }
            }
            Err(e) => {
                tracing::debug!(language = ?block.language, error = ?e, "highlight.js unavailable");
            }
        }
        ClassHighlighter.highlight(block);
    }
}

fn string_field(object: &JsValue, name: &str) -> Option<String> {
    Reflect::get(object, &name.into()).ok()?.as_string()
}
