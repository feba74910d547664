//! Font loading and caching
//!
//! Font resources are fetched asynchronously, parsed once and cached
//! process-wide keyed by font name. Entries are written once and never
//! evicted; the font set is bounded in practice. Concurrent requests
//! for the same uncached name share a single in-flight fetch, and each
//! fetch runs under a deadline.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::banner::{self, FontDef, TextBlock};
use crate::error::{CoreError, Result};

/// Default deadline for a single font fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Supplies raw font definition text by name
#[async_trait]
pub trait FontSource: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<String>;
}

/// Font source reading `<dir>/<name>.flf`
pub struct DirFontSource {
    dir: PathBuf,
}

impl DirFontSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FontSource for DirFontSource {
    async fn fetch(&self, name: &str) -> Result<String> {
        let path = self.dir.join(format!("{name}.flf"));
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CoreError::FontLoad {
                name: name.to_string(),
                reason: format!("{}: {e}", path.display()),
            })
    }
}

/// Process-wide font cache over a `FontSource`
pub struct FontStore {
    source: Box<dyn FontSource>,
    timeout: Duration,
    fonts: Mutex<HashMap<String, Arc<OnceCell<Arc<FontDef>>>>>,
}

impl FontStore {
    pub fn new(source: impl FontSource + 'static) -> Self {
        Self::with_timeout(source, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(source: impl FontSource + 'static, timeout: Duration) -> Self {
        Self {
            source: Box::new(source),
            timeout,
            fonts: Mutex::new(HashMap::new()),
        }
    }

    /// Load a font, fetching and parsing it on first use.
    ///
    /// A cache hit returns immediately; a miss triggers exactly one
    /// fetch even under concurrent callers, who all await the same
    /// load. Fetch failures propagate to every waiting caller.
    pub async fn load(&self, name: &str) -> Result<Arc<FontDef>> {
        let cell = {
            let mut fonts = self.fonts.lock();
            fonts
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        let font = cell
            .get_or_try_init(|| async {
                tracing::debug!(name, "fetching font");
                let text = tokio::time::timeout(self.timeout, self.source.fetch(name))
                    .await
                    .map_err(|_| CoreError::FontTimeout {
                        name: name.to_string(),
                    })??;
                Ok::<_, CoreError>(Arc::new(FontDef::parse(name, &text)?))
            })
            .await?;
        Ok(font.clone())
    }

    /// Whether a font is already parsed and cached
    pub fn is_cached(&self, name: &str) -> bool {
        self.fonts
            .lock()
            .get(name)
            .is_some_and(|cell| cell.initialized())
    }

    /// Render a banner with a named font, loading it if needed
    pub async fn write(&self, text: &str, font: &str) -> Result<TextBlock> {
        let font = self.load(font).await?;
        Ok(banner::render(text, &font))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// One-glyph font: space renders as a single 'X' line
    const TINY_FONT: &str = "$ 1 1 4 0 0\nX@\n";

    struct CountingSource {
        fetches: AtomicUsize,
        delay: Duration,
    }

    impl CountingSource {
        fn new(delay: Duration) -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                delay,
            }
        }
    }

    #[async_trait]
    impl FontSource for CountingSource {
        async fn fetch(&self, _name: &str) -> Result<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(TINY_FONT.to_string())
        }
    }

    /// Lets a test keep a handle on the source it hands to the store
    struct Shared(Arc<CountingSource>);

    #[async_trait]
    impl FontSource for Shared {
        async fn fetch(&self, name: &str) -> Result<String> {
            self.0.fetch(name).await
        }
    }

    #[tokio::test]
    async fn test_dir_source_loads_flf() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tiny.flf"), TINY_FONT).unwrap();

        let store = FontStore::new(DirFontSource::new(dir.path()));
        let font = store.load("tiny").await.unwrap();
        assert_eq!(font.height(), 1);
        assert!(store.is_cached("tiny"));
    }

    #[tokio::test]
    async fn test_missing_font_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let store = FontStore::new(DirFontSource::new(dir.path()));
        match store.load("absent").await {
            Err(CoreError::FontLoad { name, .. }) => assert_eq!(name, "absent"),
            other => panic!("expected FontLoad error, got {other:?}"),
        }
        assert!(!store.is_cached("absent"));
    }

    #[tokio::test]
    async fn test_cached_font_fetched_once() {
        let source = Arc::new(CountingSource::new(Duration::ZERO));
        let store = FontStore::new(Shared(source.clone()));
        let first = store.load("tiny").await.unwrap();
        let second = store.load("tiny").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);

        let block = store.write(" ", "tiny").await.unwrap();
        assert_eq!(block.to_text(), "X\n");
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let source = Arc::new(CountingSource::new(Duration::from_millis(50)));
        let store = Arc::new(FontStore::new(Shared(source.clone())));
        let a = tokio::spawn({
            let store = store.clone();
            async move { store.load("tiny").await }
        });
        let b = tokio::spawn({
            let store = store.clone();
            async move { store.load("tiny").await }
        });
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        struct StalledSource;

        #[async_trait]
        impl FontSource for StalledSource {
            async fn fetch(&self, _name: &str) -> Result<String> {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!()
            }
        }

        let store = FontStore::with_timeout(StalledSource, Duration::from_millis(20));
        match store.load("slow").await {
            Err(CoreError::FontTimeout { name }) => assert_eq!(name, "slow"),
            other => panic!("expected FontTimeout, got {other:?}"),
        }
    }
}
