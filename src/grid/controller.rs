use std::collections::HashSet;

use super::columns::{ActionDescriptor, ColumnDescriptor};
use super::pagination::{PageSize, PageStrip};
use super::source::{PageEnvelope, PageSource};
use super::state::{BodyState, FetchOutcome, FetchTicket, GridState};
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Paged, filterable table over a remote collection.
///
/// Every state change that needs new data issues exactly one fetch and
/// awaits it before returning.
pub struct PagedGrid<R, S> {
    source: S,
    state: GridState<R>,
    columns: Vec<ColumnDescriptor<R>>,
    actions: Vec<ActionDescriptor<R>>,
    hidden: HashSet<&'static str>,
}

impl<R, S> PagedGrid<R, S>
where
    R: Send,
    S: PageSource<R>,
{
    pub fn new(
        source: S,
        columns: Vec<ColumnDescriptor<R>>,
        actions: Vec<ActionDescriptor<R>>,
        page_size: PageSize,
    ) -> Self {
        Self {
            source,
            state: GridState::new(page_size),
            columns,
            actions,
            hidden: HashSet::new(),
        }
    }

    pub fn state(&self) -> &GridState<R> {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn body(&self) -> BodyState<'_, R> {
        self.state.body()
    }

    pub fn strip(&self) -> PageStrip {
        self.state.strip()
    }

    pub fn actions(&self) -> &[ActionDescriptor<R>] {
        &self.actions
    }

    pub fn all_columns(&self) -> &[ColumnDescriptor<R>] {
        &self.columns
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDescriptor<R>> {
        self.columns.iter().filter(|c| !self.hidden.contains(c.key))
    }

    /// Initial load: first page at the current page size
    pub async fn load(&mut self) -> FetchOutcome {
        let ticket = self.state.begin_fetch();
        self.run(ticket).await
    }

    /// Set size and filter ahead of `load` without fetching
    pub fn preset(&mut self, page_size: PageSize, filter_text: impl Into<String>) {
        self.state.preset(page_size, filter_text);
    }

    pub async fn refresh(&mut self) -> FetchOutcome {
        let ticket = self.state.begin_fetch();
        self.run(ticket).await
    }

    pub async fn set_page_index(&mut self, page_index: usize) -> Result<FetchOutcome, ClientError> {
        let ticket = self.state.set_page_index(page_index)?;
        Ok(self.run(ticket).await)
    }

    pub async fn set_page_size(&mut self, page_size: PageSize) -> FetchOutcome {
        let ticket = self.state.set_page_size(page_size);
        self.run(ticket).await
    }

    pub async fn set_filter_text(&mut self, filter_text: impl Into<String>) -> FetchOutcome {
        let ticket = self.state.set_filter_text(filter_text);
        self.run(ticket).await
    }

    /// None when already on the last page
    pub async fn next_page(&mut self) -> Option<FetchOutcome> {
        let ticket = self.state.next_page()?;
        Some(self.run(ticket).await)
    }

    /// None when already on the first page
    pub async fn previous_page(&mut self) -> Option<FetchOutcome> {
        let ticket = self.state.previous_page()?;
        Some(self.run(ticket).await)
    }

    /// Record that the remote collection changed; the refetch happens on the next reconcile
    pub fn mark_invalidated(&mut self) {
        self.state.mark_invalidated();
    }

    /// Run the pending refetch, if any, then clear the flag.
    ///
    /// When the collection shrank below the current page, the view moves
    /// to the new last page.
    pub async fn refresh_if_invalidated(&mut self) -> Option<FetchOutcome> {
        if !self.state.is_invalidated() {
            return None;
        }
        let ticket = self.state.begin_fetch();
        let mut outcome = self.run(ticket).await;
        let total_pages = self.state.total_pages();
        if outcome == FetchOutcome::Applied && total_pages > 0 && self.state.page_index() >= total_pages {
            if let Ok(ticket) = self.state.set_page_index(total_pages - 1) {
                outcome = self.run(ticket).await;
            }
        }
        self.state.clear_invalidated();
        Some(outcome)
    }

    /// Invalidate and refetch with the current page, size and filter
    pub async fn invalidate(&mut self) -> FetchOutcome {
        self.mark_invalidated();
        self.refresh_if_invalidated()
            .await
            .unwrap_or(FetchOutcome::Stale)
    }

    /// Show or hide a column; pinned columns always stay visible
    pub fn set_column_visible(&mut self, key: &str, visible: bool) -> Result<(), ClientError> {
        let column = self
            .columns
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| ClientError::Validation(format!("unknown column '{}'", key)))?;

        if visible {
            self.hidden.remove(column.key);
        } else if column.hideable {
            self.hidden.insert(column.key);
        } else {
            return Err(ClientError::Validation(format!("column '{}' cannot be hidden", key)));
        }
        Ok(())
    }

    /// Order the rows already on screen by one sortable column
    pub fn sort_current_page(&mut self, key: &str, direction: SortDirection) -> Result<(), ClientError> {
        let column = self
            .columns
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| ClientError::Validation(format!("unknown column '{}'", key)))?;
        if !column.sortable {
            return Err(ClientError::Validation(format!("column '{}' is not sortable", key)));
        }

        let key = column.sort_key;
        self.state.items_mut().sort_by(|a, b| {
            let ord = key(a).cmp(&key(b));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        Ok(())
    }

    /// Start a fetch whose response is delivered later through `complete_fetch`
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.state.begin_fetch()
    }

    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<PageEnvelope<R>, ClientError>,
    ) -> FetchOutcome {
        self.state.complete_fetch(ticket, result)
    }

    async fn run(&mut self, ticket: FetchTicket) -> FetchOutcome {
        let result = self.source.fetch_page(&ticket.request).await;
        self.state.complete_fetch(&ticket, result)
    }
}
