use serde::Serialize;
use tracing::{debug, warn};

use super::pagination::{PageSize, PageStrip};
use super::source::PageEnvelope;
use crate::error::ClientError;

/// What the next fetch asks the backend for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page_index: usize,
    pub page_size: PageSize,
    pub filter_text: String,
}

impl PageRequest {
    pub fn first(page_size: PageSize) -> Self {
        Self {
            page_index: 0,
            page_size,
            filter_text: String::new(),
        }
    }
}

/// A fetch in flight. Only the ticket with the latest generation may land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: PageRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// Request failed; the grid now shows the empty state
    Failed,
    /// A newer request was issued meanwhile; the response was dropped
    Stale,
}

/// What the rows area should show
#[derive(Debug, PartialEq, Eq)]
pub enum BodyState<'a, R> {
    Loading,
    Empty,
    Rows(&'a [R]),
}

/// Local grid state, independent of how pages are fetched
#[derive(Debug)]
pub struct GridState<R> {
    request: PageRequest,
    items: Vec<R>,
    total_pages: usize,
    is_loading: bool,
    invalidated: bool,
    generation: u64,
    last_error: Option<String>,
}

impl<R> GridState<R> {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            request: PageRequest::first(page_size),
            items: Vec::new(),
            total_pages: 0,
            is_loading: false,
            invalidated: false,
            generation: 0,
            last_error: None,
        }
    }

    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn page_index(&self) -> usize {
        self.request.page_index
    }

    pub fn page_size(&self) -> PageSize {
        self.request.page_size
    }

    pub fn filter_text(&self) -> &str {
        &self.request.filter_text
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<R> {
        &mut self.items
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// Why the latest landed fetch failed, if it did
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn body(&self) -> BodyState<'_, R> {
        if self.is_loading {
            BodyState::Loading
        } else if self.items.is_empty() {
            BodyState::Empty
        } else {
            BodyState::Rows(&self.items)
        }
    }

    pub fn strip(&self) -> PageStrip {
        PageStrip::build(self.total_pages, self.request.page_index)
    }

    /// Issue a fetch for the current request; supersedes any fetch in flight
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.is_loading = true;
        debug!(
            "Fetch #{} page={} size={} filter={:?}",
            self.generation, self.request.page_index, self.request.page_size, self.request.filter_text
        );
        FetchTicket {
            generation: self.generation,
            request: self.request.clone(),
        }
    }

    /// Land a response. Page content and total are replaced wholesale.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<PageEnvelope<R>, ClientError>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            warn!("Dropping stale response #{} (latest is #{})", ticket.generation, self.generation);
            return FetchOutcome::Stale;
        }

        self.is_loading = false;
        match result {
            Ok(envelope) => {
                self.items = envelope.content;
                self.total_pages = envelope.page.total_pages;
                self.last_error = None;
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!("Page fetch failed, showing empty page: {}", e);
                self.items = Vec::new();
                self.total_pages = 0;
                self.last_error = Some(e.to_string());
                FetchOutcome::Failed
            }
        }
    }

    pub fn set_page_index(&mut self, page_index: usize) -> Result<FetchTicket, ClientError> {
        let in_range = if self.total_pages > 0 {
            page_index < self.total_pages
        } else {
            page_index == 0
        };
        if !in_range {
            return Err(ClientError::PageOutOfRange {
                requested: page_index,
                total: self.total_pages,
            });
        }

        self.request.page_index = page_index;
        Ok(self.begin_fetch())
    }

    /// Always returns to the first page
    pub fn set_page_size(&mut self, page_size: PageSize) -> FetchTicket {
        self.request.page_size = page_size;
        self.request.page_index = 0;
        self.begin_fetch()
    }

    /// Choose size and filter before the first fetch; nothing is requested
    pub fn preset(&mut self, page_size: PageSize, filter_text: impl Into<String>) {
        self.request = PageRequest {
            page_index: 0,
            page_size,
            filter_text: filter_text.into(),
        };
    }

    /// Filtering is server-side; a new filter starts over at the first page
    pub fn set_filter_text(&mut self, filter_text: impl Into<String>) -> FetchTicket {
        self.request.filter_text = filter_text.into();
        self.request.page_index = 0;
        self.begin_fetch()
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if !self.strip().can_next {
            return None;
        }
        self.request.page_index += 1;
        Some(self.begin_fetch())
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        if !self.strip().can_previous {
            return None;
        }
        self.request.page_index -= 1;
        Some(self.begin_fetch())
    }

    pub fn mark_invalidated(&mut self) {
        self.invalidated = true;
    }

    pub fn clear_invalidated(&mut self) {
        self.invalidated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::source::PageMetadata;

    fn envelope(items: Vec<u32>, total_pages: usize) -> PageEnvelope<u32> {
        PageEnvelope {
            content: items,
            page: PageMetadata {
                total_pages,
                ..Default::default()
            },
        }
    }

    #[test]
    fn loading_and_empty_are_distinct() {
        let mut state: GridState<u32> = GridState::new(PageSize::Ten);
        assert_eq!(state.body(), BodyState::Empty);

        let ticket = state.begin_fetch();
        assert_eq!(state.body(), BodyState::Loading);

        state.complete_fetch(&ticket, Ok(envelope(vec![], 0)));
        assert_eq!(state.body(), BodyState::Empty);
    }

    #[test]
    fn loading_hides_previous_rows() {
        let mut state = GridState::new(PageSize::Ten);
        let ticket = state.begin_fetch();
        state.complete_fetch(&ticket, Ok(envelope(vec![1, 2], 3)));
        assert_eq!(state.body(), BodyState::Rows(&[1, 2][..]));

        state.next_page().unwrap();
        assert_eq!(state.body(), BodyState::Loading);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state = GridState::new(PageSize::Ten);
        let first = state.begin_fetch();
        state.complete_fetch(&first, Ok(envelope(vec![1], 5)));

        let slow = state.set_page_index(1).unwrap();
        let fast = state.set_page_index(2).unwrap();

        assert_eq!(state.complete_fetch(&fast, Ok(envelope(vec![3], 5))), FetchOutcome::Applied);
        assert_eq!(state.complete_fetch(&slow, Ok(envelope(vec![2], 5))), FetchOutcome::Stale);
        assert_eq!(state.items(), &[3]);
        assert_eq!(state.page_index(), 2);
    }

    #[test]
    fn failure_leaves_empty_page_and_stops_loading() {
        let mut state = GridState::new(PageSize::Ten);
        let ticket = state.begin_fetch();
        state.complete_fetch(&ticket, Ok(envelope(vec![1, 2], 4)));

        let ticket = state.begin_fetch();
        let outcome = state.complete_fetch(&ticket, Err(ClientError::Network("refused".into())));

        assert_eq!(outcome, FetchOutcome::Failed);
        assert!(state.items().is_empty());
        assert!(!state.is_loading());
        assert_eq!(state.total_pages(), 0);
    }

    #[test]
    fn page_index_range_is_checked() {
        let mut state: GridState<u32> = GridState::new(PageSize::Ten);
        assert!(state.set_page_index(0).is_ok());
        assert!(matches!(
            state.set_page_index(1),
            Err(ClientError::PageOutOfRange { requested: 1, total: 0 })
        ));

        let ticket = state.begin_fetch();
        state.complete_fetch(&ticket, Ok(envelope(vec![], 3)));
        assert!(state.set_page_index(2).is_ok());
        assert!(state.set_page_index(3).is_err());
        // same index again is fine
        assert!(state.set_page_index(2).is_ok());
    }

    #[test]
    fn page_size_and_filter_reset_to_first_page() {
        let mut state: GridState<u32> = GridState::new(PageSize::Ten);
        let ticket = state.begin_fetch();
        state.complete_fetch(&ticket, Ok(envelope(vec![], 8)));
        state.set_page_index(5).unwrap();

        let ticket = state.set_page_size(PageSize::Fifty);
        assert_eq!(ticket.request.page_index, 0);
        assert_eq!(ticket.request.page_size, PageSize::Fifty);

        state.set_page_index(3).unwrap();
        let ticket = state.set_filter_text("anna");
        assert_eq!(ticket.request.page_index, 0);
        assert_eq!(ticket.request.filter_text, "anna");
    }

    #[test]
    fn preset_issues_no_fetch() {
        let mut state: GridState<u32> = GridState::new(PageSize::Ten);
        state.preset(PageSize::TwentyFive, "odd");
        assert_eq!(state.generation(), 0);
        assert!(!state.is_loading());

        let ticket = state.begin_fetch();
        assert_eq!(ticket.request.page_size, PageSize::TwentyFive);
        assert_eq!(ticket.request.filter_text, "odd");
        assert_eq!(ticket.request.page_index, 0);
    }

    #[test]
    fn previous_and_next_stop_at_bounds() {
        let mut state: GridState<u32> = GridState::new(PageSize::Ten);
        assert!(state.previous_page().is_none());
        assert!(state.next_page().is_none());

        let ticket = state.begin_fetch();
        state.complete_fetch(&ticket, Ok(envelope(vec![], 2)));
        assert!(state.next_page().is_some());
        assert_eq!(state.page_index(), 1);
        assert!(state.next_page().is_none());
        assert!(state.previous_page().is_some());
        assert_eq!(state.page_index(), 0);
    }
}
