//! Document display with a fade transition.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use dv_renderer::escape_html;

use crate::error::Error;
use crate::host::{LocalTask, Services};

/// Class applied while the old content fades out.
pub const FADE_OUT_CLASS: &str = "content-fade-out";

/// Class applied while the new content fades in.
pub const FADE_IN_CLASS: &str = "content-fade-in";

/// Inline message shown in place of a document that failed to load.
#[must_use]
pub fn error_html(message: &str) -> String {
    format!(
        r#"<p class="content-error">Error: {}</p>"#,
        escape_html(message)
    )
}

/// Inline message shown when no page can be displayed for a slug.
#[must_use]
pub fn not_found_html(slug: Option<&str>) -> String {
    match slug {
        Some(slug) => format!(
            r#"<p class="content-error">Page not found: {}</p>"#,
            escape_html(slug)
        ),
        None => r#"<p class="content-error">No pages available</p>"#.to_owned(),
    }
}

/// Swaps documents into the content region.
///
/// Each [`display`](Self::display) call supersedes the previous one: a load
/// that is overtaken by a newer call stops at its next suspension point and
/// leaves the region alone.
pub struct ContentLoader {
    services: Services,
    fade_delay: Duration,
    generation: Rc<Cell<u64>>,
}

impl ContentLoader {
    /// Create a loader fading out for `fade_delay` before each swap.
    #[must_use]
    pub fn new(services: Services, fade_delay: Duration) -> Self {
        Self {
            services,
            fade_delay,
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Number of loads started (or invalidated) so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Cancel any in-flight load without starting a new one.
    ///
    /// Used before writing a message into the region directly.
    pub fn invalidate(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    /// Build the task that fades out, fetches `path`, renders and fades in.
    ///
    /// The fade-out class is applied before this returns, so the transition
    /// starts even if the task is spawned late.
    #[must_use]
    pub fn display(&self, path: String) -> LocalTask {
        self.invalidate();
        let generation = self.generation.get();
        let current = Rc::clone(&self.generation);
        let services = self.services.clone();
        let fade_delay = self.fade_delay;

        services.surface.add_class(FADE_OUT_CLASS);

        Box::pin(async move {
            services.timer.sleep(fade_delay).await;
            if current.get() != generation {
                tracing::debug!(path = %path, "Content load superseded before fetch");
                return;
            }
            services.surface.scroll_to_top();

            let result = services.fetcher.fetch(&path).await;
            if current.get() != generation {
                tracing::debug!(path = %path, "Content load superseded after fetch");
                return;
            }

            let surface = &services.surface;
            match result {
                Ok(markdown) => {
                    surface.remove_class(FADE_OUT_CLASS);
                    surface.set_html(&services.renderer.render(&markdown));
                    let blocks = surface.highlight_code_blocks(services.highlighter.as_ref());
                    surface.add_class(FADE_IN_CLASS);

                    let weak = Rc::downgrade(surface);
                    surface.on_animation_end_once(Box::new(move || {
                        if let Some(surface) = weak.upgrade() {
                            surface.remove_class(FADE_IN_CLASS);
                        }
                    }));

                    tracing::debug!(path = %path, code_blocks = blocks, "Content displayed");
                }
                Err(source) => {
                    let error = Error::DocumentFetch { path, source };
                    tracing::error!(error = %error, "Error loading content");
                    surface.set_html(&error_html(&error.to_string()));
                    surface.remove_class(FADE_OUT_CLASS);
                    surface.remove_class(FADE_IN_CLASS);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use dv_fetch::MockFetcher;
    use tokio::task::LocalSet;

    use super::*;
    use crate::headless::HeadlessHost;
    use crate::host::Spawn;

    fn loader(host: &HeadlessHost, fetcher: MockFetcher) -> ContentLoader {
        ContentLoader::new(host.services(Rc::new(fetcher)), Duration::from_millis(250))
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_sequence() {
        LocalSet::new()
            .run_until(async {
                let host = HeadlessHost::new();
                let fetcher = MockFetcher::new()
                    .with_resource("docs/intro.md", "# Intro\n\n```rust\nfn main() {}\n```\n");
                let loader = loader(&host, fetcher);

                let task = loader.display("docs/intro.md".to_owned());
                assert!(host.surface.has_class(FADE_OUT_CLASS));

                host.spawner.spawn(task);
                host.spawner.settle().await;

                assert!(!host.surface.has_class(FADE_OUT_CLASS));
                assert!(host.surface.has_class(FADE_IN_CLASS));
                assert!(host.surface.html().contains("<h1>Intro</h1>"));
                assert!(host.surface.html().contains("hljs"));
                assert_eq!(host.surface.scroll_resets(), 1);
                assert_eq!(host.surface.pending_animation_callbacks(), 1);

                assert_eq!(host.surface.finish_animation(), 1);
                assert!(!host.surface.has_class(FADE_IN_CLASS));
                assert_eq!(host.surface.pending_animation_callbacks(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fade_delay_precedes_fetch() {
        LocalSet::new()
            .run_until(async {
                let host = HeadlessHost::new();
                let fetcher = Rc::new(MockFetcher::new().with_resource("docs/a.md", "A"));
                let loader = ContentLoader::new(
                    host.services(Rc::clone(&fetcher) as Rc<dyn dv_fetch::Fetcher>),
                    Duration::from_millis(250),
                );

                host.spawner.spawn(loader.display("docs/a.md".to_owned()));
                tokio::time::sleep(Duration::from_millis(200)).await;
                assert_eq!(fetcher.request_count("docs/a.md"), 0);

                tokio::time::sleep(Duration::from_millis(100)).await;
                assert_eq!(fetcher.request_count("docs/a.md"), 1);
                host.spawner.settle().await;
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_shows_inline_error() {
        LocalSet::new()
            .run_until(async {
                let host = HeadlessHost::new();
                let fetcher = MockFetcher::new().with_status("docs/gone.md", 404);
                let loader = loader(&host, fetcher);

                host.spawner.spawn(loader.display("docs/gone.md".to_owned()));
                host.spawner.settle().await;

                let html = host.surface.html();
                assert!(html.contains("Could not load file: docs/gone.md"));
                assert!(!host.surface.has_class(FADE_OUT_CLASS));
                assert!(!host.surface.has_class(FADE_IN_CLASS));
                assert_eq!(host.surface.pending_animation_callbacks(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_display_wins() {
        LocalSet::new()
            .run_until(async {
                let host = HeadlessHost::new();
                let fetcher = MockFetcher::new()
                    .with_resource("docs/slow.md", "Slow")
                    .with_delay("docs/slow.md", Duration::from_secs(2))
                    .with_resource("docs/fast.md", "Fast");
                let loader = loader(&host, fetcher);

                host.spawner.spawn(loader.display("docs/slow.md".to_owned()));
                tokio::time::sleep(Duration::from_millis(300)).await;
                host.spawner.spawn(loader.display("docs/fast.md".to_owned()));
                host.spawner.settle().await;

                assert!(host.surface.html().contains("Fast"));
                assert!(!host.surface.html().contains("Slow"));
                assert_eq!(host.surface.pending_animation_callbacks(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_cancels_pending_load() {
        LocalSet::new()
            .run_until(async {
                let host = HeadlessHost::new();
                let loader = loader(&host, MockFetcher::new().with_resource("docs/a.md", "A"));

                host.spawner.spawn(loader.display("docs/a.md".to_owned()));
                loader.invalidate();
                host.spawner.settle().await;

                assert_eq!(host.surface.html(), "");
            })
            .await;
    }

    #[test]
    fn test_messages_are_escaped() {
        assert_eq!(
            error_html("<script>"),
            r#"<p class="content-error">Error: &lt;script&gt;</p>"#
        );
        assert!(not_found_html(Some("a&b")).contains("a&amp;b"));
        assert!(not_found_html(None).contains("No pages"));
    }
}
