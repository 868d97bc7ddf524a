// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page-by-page search over a paginated listing.
//!
//! Strava signals the end of a collection with a short (or empty) page, so
//! the scan stops on the first match, the first short page, or the page cap.

use crate::error::AppError;
use async_trait::async_trait;

/// Why a page could not be produced.
#[derive(Debug)]
pub enum PageError {
    /// The listing request itself failed.
    Request(AppError),
    /// Something the request depends on failed first (e.g. credentials).
    Setup(AppError),
}

impl PageError {
    pub fn into_inner(self) -> AppError {
        match self {
            PageError::Request(e) | PageError::Setup(e) => e,
        }
    }
}

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError::Request(err)
    }
}

/// One page of a paginated listing (pages are 1-based).
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<T>, PageError>;
}

/// Scan state. `Scanning` is the only non-terminal state.
#[derive(Debug)]
pub enum ScanState<T> {
    /// About to request this page.
    Scanning(u32),
    Found(T),
    /// Listing ended (or the page cap was hit) without a match.
    Exhausted,
    Failed(PageError),
}

/// Finds the first listing entry matching a predicate.
#[derive(Debug, Clone, Copy)]
pub struct PagedScanner {
    page_size: u32,
    max_pages: u32,
}

impl PagedScanner {
    pub fn new(page_size: u32, max_pages: u32) -> Self {
        Self {
            page_size,
            max_pages,
        }
    }

    /// First matching item, `None` when the listing ends without one.
    ///
    /// A connection-level failure of the page request also ends the search
    /// with `None`. HTTP failures (401, 403, 429, ...) and setup failures
    /// such as a failed token refresh are returned as errors.
    pub async fn find_first<T, S, P>(&self, source: &S, predicate: P) -> Result<Option<T>, AppError>
    where
        T: Send,
        S: PageSource<T> + ?Sized,
        P: FnMut(&T) -> bool + Send,
    {
        match self.scan(source, predicate).await {
            ScanState::Found(item) => Ok(Some(item)),
            ScanState::Exhausted | ScanState::Scanning(_) => Ok(None),
            ScanState::Failed(PageError::Request(AppError::Transport(cause))) => {
                tracing::warn!(error = %cause, "Page request failed, ending scan");
                Ok(None)
            }
            ScanState::Failed(e) => Err(e.into_inner()),
        }
    }

    /// Run the state machine to a terminal state.
    pub async fn scan<T, S, P>(&self, source: &S, mut predicate: P) -> ScanState<T>
    where
        T: Send,
        S: PageSource<T> + ?Sized,
        P: FnMut(&T) -> bool + Send,
    {
        let mut state = ScanState::Scanning(1);
        while let ScanState::Scanning(page) = state {
            state = self.step(source, &mut predicate, page).await;
        }
        state
    }

    async fn step<T, S, P>(&self, source: &S, predicate: &mut P, page: u32) -> ScanState<T>
    where
        T: Send,
        S: PageSource<T> + ?Sized,
        P: FnMut(&T) -> bool + Send,
    {
        if self.page_size == 0 {
            return ScanState::Failed(PageError::Setup(AppError::BadRequest(
                "page size must be greater than zero".to_string(),
            )));
        }
        if page > self.max_pages {
            tracing::warn!(max_pages = self.max_pages, "Page limit reached, ending scan");
            return ScanState::Exhausted;
        }

        tracing::debug!(page, per_page = self.page_size, "Checking page");
        let items = match source.fetch_page(page, self.page_size).await {
            Ok(items) => items,
            Err(e) => return ScanState::Failed(e),
        };

        if items.is_empty() {
            tracing::debug!(page, "Empty page, no more items");
            return ScanState::Exhausted;
        }

        let count = items.len();
        if let Some(found) = items.into_iter().find(|item| predicate(item)) {
            tracing::info!(page, "Found matching item");
            return ScanState::Found(found);
        }

        if count < self.page_size as usize {
            tracing::debug!(page, count, "Short page, end of listing");
            return ScanState::Exhausted;
        }

        ScanState::Scanning(page + 1)
    }
}
