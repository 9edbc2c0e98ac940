//! Cursor-driven retrieval of a complete listing
//!
//! Slack's listing endpoints hand out results one page at a time together with an opaque
//! continuation cursor. [`fetch_all`] drives any such endpoint to completion through the
//! [`PageFetch`] trait, so the channel listing and the time-bounded history share one loop
//! and differ only in how a single page is requested.
//!
//! There is no partial success: the first failing page ends the call and everything
//! accumulated so far is dropped. No retries are attempted.

use std::error::Error as StdError;
use std::future::Future;

/// Cursor sent for the first page.
pub const FIRST_PAGE: &str = "";

/// One page of a listing as reported by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub ok: bool,
    pub error: Option<String>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// A successful page. An empty or absent cursor marks the last page.
    pub fn ok(items: Vec<T>, next_cursor: Option<String>) -> Self {
        let has_more = next_cursor.as_deref().is_some_and(|c| !c.trim().is_empty());
        Self {
            items,
            ok: true,
            error: None,
            has_more,
            next_cursor,
        }
    }

    /// A page the server refused.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            ok: false,
            error: Some(error.into()),
            has_more: false,
            next_cursor: None,
        }
    }

    /// Cursor for the following page, if the server reported one worth following.
    fn continuation(&self) -> Option<&str> {
        if !self.has_more {
            return None;
        }
        self.next_cursor
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Error type for retrieval operations
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The server answered but reported a failure (`ok = false`).
    #[error("Slack Web API failure: {0}")]
    Remote(String),

    /// The request never produced a usable answer.
    #[error("Transport failure: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),
}

impl FetchError {
    pub fn transport(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        FetchError::Transport(err.into())
    }
}

/// Fetches a single page of some listing.
///
/// Implementors carry the per-endpoint request parameters (page size, channel, time range).
/// `cursor` is [`FIRST_PAGE`] on the first call and the previous page's continuation after.
pub trait PageFetch {
    type Item;

    fn fetch_page(
        &mut self,
        cursor: &str,
    ) -> impl Future<Output = Result<Page<Self::Item>, FetchError>>;
}

/// Fetches every page of a listing, in order.
///
/// Pages are requested strictly one after another. The loop ends successfully on the first
/// page that has no continuation; a page with `ok = false` ends it with
/// [`FetchError::Remote`] and a transport fault is returned as is.
pub async fn fetch_all<F: PageFetch>(fetcher: &mut F) -> Result<Vec<F::Item>, FetchError> {
    fetch_all_with(fetcher, |_, _| {}).await
}

/// Like [`fetch_all`], calling `on_page(page_number, items_so_far)` after each page.
pub async fn fetch_all_with<F, P>(
    fetcher: &mut F,
    mut on_page: P,
) -> Result<Vec<F::Item>, FetchError>
where
    F: PageFetch,
    P: FnMut(usize, usize),
{
    let mut items = Vec::new();
    let mut cursor = FIRST_PAGE.to_string();
    let mut page_number = 0;

    loop {
        let page = fetcher.fetch_page(&cursor).await?;
        page_number += 1;

        if !page.ok {
            return Err(FetchError::Remote(
                page.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        let next = page.continuation().map(str::to_string);
        items.extend(page.items);
        on_page(page_number, items.len());

        match next {
            Some(next_cursor) => cursor = next_cursor,
            None => break,
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::collections::VecDeque;

    /// Serves canned pages and records every cursor it was asked for.
    struct FakeListing {
        pages: VecDeque<Result<Page<u32>, FetchError>>,
        cursors: Vec<String>,
    }

    impl FakeListing {
        fn new(pages: Vec<Result<Page<u32>, FetchError>>) -> Self {
            Self {
                pages: pages.into(),
                cursors: Vec::new(),
            }
        }
    }

    impl PageFetch for FakeListing {
        type Item = u32;

        async fn fetch_page(&mut self, cursor: &str) -> Result<Page<u32>, FetchError> {
            self.cursors.push(cursor.to_string());
            self.pages
                .pop_front()
                .expect("fetched more pages than the listing has")
        }
    }

    fn page(items: &[u32], next: &str) -> Result<Page<u32>, FetchError> {
        Ok(Page::ok(items.to_vec(), Some(next.to_string())))
    }

    #[test]
    fn test_fetch_all_concatenates_pages_in_order() {
        let mut listing = FakeListing::new(vec![
            page(&[1, 2], "c1"),
            page(&[3, 4], "c2"),
            page(&[5, 6], ""),
        ]);

        let items = block_on(fetch_all(&mut listing)).unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(listing.cursors, vec!["", "c1", "c2"]);
    }

    #[test]
    fn test_fetch_all_single_page() {
        let mut listing = FakeListing::new(vec![Ok(Page::ok(vec![7], None))]);

        let items = block_on(fetch_all(&mut listing)).unwrap();

        assert_eq!(items, vec![7]);
        assert_eq!(listing.cursors.len(), 1);
    }

    #[test]
    fn test_fetch_all_empty_listing() {
        let mut listing = FakeListing::new(vec![page(&[], "")]);
        let items = block_on(fetch_all(&mut listing)).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_fetch_all_stops_on_remote_failure() {
        let mut listing = FakeListing::new(vec![
            page(&[1, 2], "c1"),
            Ok(Page::failed("rate_limited")),
            page(&[5, 6], ""),
        ]);

        let err = block_on(fetch_all(&mut listing)).unwrap_err();

        match err {
            FetchError::Remote(message) => assert_eq!(message, "rate_limited"),
            other => panic!("expected remote failure, got {other:?}"),
        }
        assert_eq!(listing.cursors.len(), 2);
    }

    #[test]
    fn test_fetch_all_stops_on_transport_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let mut listing = FakeListing::new(vec![
            page(&[1], "c1"),
            Err(FetchError::transport(io)),
            page(&[2], ""),
        ]);

        let err = block_on(fetch_all(&mut listing)).unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(listing.cursors.len(), 2);
    }

    #[test]
    fn test_fetch_all_failed_page_without_message() {
        let mut failed = Page::failed("ignored");
        failed.error = None;
        let mut listing = FakeListing::new(vec![Ok(failed)]);

        let err = block_on(fetch_all(&mut listing)).unwrap_err();

        assert_eq!(err.to_string(), "Slack Web API failure: unknown_error");
    }

    #[test]
    fn test_fetch_all_has_more_without_cursor_ends_listing() {
        let mut dangling = Page::ok(vec![1], None);
        dangling.has_more = true;
        let mut listing = FakeListing::new(vec![Ok(dangling)]);

        let items = block_on(fetch_all(&mut listing)).unwrap();

        assert_eq!(items, vec![1]);
        assert_eq!(listing.cursors.len(), 1);
    }

    #[test]
    fn test_fetch_all_cursor_without_has_more_ends_listing() {
        let mut last = Page::ok(vec![1], Some("stale".to_string()));
        last.has_more = false;
        let mut listing = FakeListing::new(vec![Ok(last)]);

        let items = block_on(fetch_all(&mut listing)).unwrap();

        assert_eq!(items, vec![1]);
        assert_eq!(listing.cursors.len(), 1);
    }

    #[test]
    fn test_fetch_all_with_reports_progress() {
        let mut listing = FakeListing::new(vec![page(&[1, 2], "c1"), page(&[3], "")]);
        let mut progress = Vec::new();

        block_on(fetch_all_with(&mut listing, |page, count| {
            progress.push((page, count))
        }))
        .unwrap();

        assert_eq!(progress, vec![(1, 2), (2, 3)]);
    }

    #[test]
    fn test_page_ok_blank_cursor_is_last_page() {
        assert!(!Page::<u32>::ok(vec![], Some("  ".to_string())).has_more);
        assert!(Page::<u32>::ok(vec![], Some("dXNlcjpVMDYx".to_string())).has_more);
    }
}
