//! Viewer-side reading session.
//!
//! Two presentation modes render the same document: a page-flip spread on wide
//! viewports and a continuous scroll on narrow ones. Neither mode owns any
//! progress logic; both consume one [`ReaderSession`], which loads the saved
//! page exactly once, validates it against the document length, and records
//! every page change through the shared [`ReadingProgressStore`] using the
//! same 1-indexed convention. The page-flip collaborator counts pages from 0;
//! that conversion happens here at the boundary and never leaks into storage.

use crate::progress::ReadingProgressStore;

/// Tailwind's `md` breakpoint; below it the scroll reader takes over.
pub const SCROLL_BREAKPOINT_PX: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    /// Paginated, spread-based flip view for wide viewports.
    Flip,
    /// Continuous vertical scroll for narrow viewports.
    Scroll,
}

impl PresentationMode {
    pub fn for_viewport_width(width_px: u32) -> Self {
        if width_px < SCROLL_BREAKPOINT_PX {
            PresentationMode::Scroll
        } else {
            PresentationMode::Flip
        }
    }
}

/// Document rendering collaborator. Owns all PDF/text parsing and pagination;
/// the session only asks for the page count, the shell also renders pages.
#[async_trait::async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Total number of pages in the document at `url`.
    async fn page_count(&self, url: &str) -> anyhow::Result<u32>;

    /// Rasterize a single 1-indexed page at the requested width.
    async fn render_page(&self, url: &str, page: u32, width_px: u32) -> anyhow::Result<Vec<u8>>;
}

/// One open book in one viewer. Created per mount; the saved page is loaded
/// once here, so switching between modes (or re-opening after a viewport
/// rotation) resumes at the same logical page.
pub struct ReaderSession {
    store: ReadingProgressStore,
    book_id: String,
    total_pages: u32,
    mode: PresentationMode,
    resume: Option<u32>,
}

impl ReaderSession {
    /// Open a session for `book_id`, asking the renderer for the document
    /// length and loading saved progress once. A stored page outside
    /// `1..=total_pages` is stale or foreign and is ignored.
    pub async fn open(
        store: ReadingProgressStore,
        renderer: &dyn DocumentRenderer,
        book_id: impl Into<String>,
        document_url: &str,
        mode: PresentationMode,
    ) -> anyhow::Result<Self> {
        let book_id = book_id.into();
        let total_pages = renderer.page_count(document_url).await?;
        let resume = store
            .load_page(&book_id)
            .filter(|page| (1..=total_pages).contains(page));
        tracing::debug!(%book_id, total_pages, resume, ?mode, "opened reader session");
        Ok(Self {
            store,
            book_id,
            total_pages,
            mode,
            resume,
        })
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// The page to move the initial view to, 1-indexed, without an animated
    /// transition. `None` means start from the beginning.
    pub fn resume_page(&self) -> Option<u32> {
        self.resume
    }

    /// The resume position as the 0-indexed value the page-flip collaborator
    /// expects. Only this accessor converts; storage stays 1-indexed.
    pub fn resume_flip_index(&self) -> Option<u32> {
        self.resume.map(|page| page - 1)
    }

    /// Record that the current page is now `page` (1-indexed). Out-of-range
    /// values are dropped rather than stored.
    pub fn page_changed(&self, page: u32) {
        if page < 1 || page > self.total_pages {
            return;
        }
        self.store.save_page(&self.book_id, page);
    }

    /// Flip-mode variant of [`Self::page_changed`]: the flip collaborator
    /// reports 0-indexed page indices in its turn events.
    pub fn flip_index_changed(&self, index: u32) {
        self.page_changed(index + 1);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::progress::MemoryKeyValue;

    struct FixedLengthRenderer {
        pages: u32,
    }

    #[async_trait::async_trait]
    impl DocumentRenderer for FixedLengthRenderer {
        async fn page_count(&self, _url: &str) -> anyhow::Result<u32> {
            Ok(self.pages)
        }

        async fn render_page(
            &self,
            _url: &str,
            _page: u32,
            _width_px: u32,
        ) -> anyhow::Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    fn shared_store() -> (Arc<MemoryKeyValue>, ReadingProgressStore) {
        let kv = Arc::new(MemoryKeyValue::new());
        (kv.clone(), ReadingProgressStore::new(kv))
    }

    #[test]
    fn mode_selection_splits_at_breakpoint() {
        assert_eq!(
            PresentationMode::for_viewport_width(767),
            PresentationMode::Scroll
        );
        assert_eq!(
            PresentationMode::for_viewport_width(768),
            PresentationMode::Flip
        );
        assert_eq!(
            PresentationMode::for_viewport_width(1440),
            PresentationMode::Flip
        );
    }

    #[tokio::test]
    async fn both_modes_resume_at_the_same_page() {
        let (_, store) = shared_store();
        let renderer = FixedLengthRenderer { pages: 120 };

        let flip = ReaderSession::open(
            store.clone(),
            &renderer,
            "book1",
            "books/book1.pdf",
            PresentationMode::Flip,
        )
        .await
        .unwrap();
        flip.flip_index_changed(41); // flip reports 0-indexed; logical page 42

        let scroll = ReaderSession::open(
            store,
            &renderer,
            "book1",
            "books/book1.pdf",
            PresentationMode::Scroll,
        )
        .await
        .unwrap();
        assert_eq!(scroll.resume_page(), Some(42));
    }

    #[tokio::test]
    async fn flip_index_conversion_stays_at_the_boundary() {
        let (kv, store) = shared_store();
        let renderer = FixedLengthRenderer { pages: 10 };

        let session = ReaderSession::open(
            store.clone(),
            &renderer,
            "book1",
            "books/book1.pdf",
            PresentationMode::Flip,
        )
        .await
        .unwrap();
        session.flip_index_changed(0);

        // Stored as the 1-indexed page, not the raw index.
        use crate::progress::KeyValue;
        assert_eq!(kv.get("progress_book1").as_deref(), Some("1"));

        let reopened = ReaderSession::open(
            store,
            &renderer,
            "book1",
            "books/book1.pdf",
            PresentationMode::Flip,
        )
        .await
        .unwrap();
        assert_eq!(reopened.resume_page(), Some(1));
        assert_eq!(reopened.resume_flip_index(), Some(0));
    }

    #[tokio::test]
    async fn out_of_range_saved_page_is_ignored() {
        let (_, store) = shared_store();
        store.save_page("book1", 500);

        let renderer = FixedLengthRenderer { pages: 120 };
        let session = ReaderSession::open(
            store,
            &renderer,
            "book1",
            "books/book1.pdf",
            PresentationMode::Scroll,
        )
        .await
        .unwrap();
        assert_eq!(session.resume_page(), None);
    }

    #[tokio::test]
    async fn out_of_range_page_change_is_dropped() {
        let (_, store) = shared_store();
        let renderer = FixedLengthRenderer { pages: 10 };
        let session = ReaderSession::open(
            store.clone(),
            &renderer,
            "book1",
            "books/book1.pdf",
            PresentationMode::Scroll,
        )
        .await
        .unwrap();

        session.page_changed(0);
        session.page_changed(11);
        assert_eq!(store.load_page("book1"), None);

        session.page_changed(10);
        assert_eq!(store.load_page("book1"), Some(10));
    }
}
