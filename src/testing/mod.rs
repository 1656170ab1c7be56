use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::ClientError;
use crate::grid::{PageEnvelope, PageMetadata, PageRequest, PageSource, Row};

const OWNERS: [&str; 5] = ["Bogdan", "Alicja", "Tomasz", "Zofia", "Kuba"];

/// Minimal row type for grid tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plate {
    pub id: String,
    pub owner: String,
}

impl Row for Plate {
    fn id(&self) -> &str {
        &self.id
    }
}

/// In-memory page source that records every request it serves.
///
/// The filter matches owners by substring, like a server-side `owner` query parameter.
pub struct ScriptedSource {
    rows: Mutex<Vec<Plate>>,
    fail: bool,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedSource {
    /// `count` rows: plate-0, plate-1, ... with rotating owners
    pub fn with_pages(count: usize) -> Self {
        let rows = (0..count)
            .map(|i| Plate {
                id: format!("plate-{}", i),
                owner: OWNERS[i % OWNERS.len()].to_string(),
            })
            .collect();
        Self {
            rows: Mutex::new(rows),
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Drop a row, as if another request deleted it on the backend
    pub fn remove(&self, id: &str) {
        if let Ok(mut rows) = self.rows.lock() {
            rows.retain(|p| p.id != id);
        }
    }
}

#[async_trait]
impl PageSource<Plate> for ScriptedSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageEnvelope<Plate>, ClientError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if self.fail {
            return Err(ClientError::Network("connection refused".to_string()));
        }

        let rows = self
            .rows
            .lock()
            .map_err(|_| ClientError::Storage("rows lock poisoned".to_string()))?;
        let matching: Vec<&Plate> = rows
            .iter()
            .filter(|p| request.filter_text.is_empty() || p.owner.contains(&request.filter_text))
            .collect();
        let size = request.page_size.get();
        let total_pages = matching.len().div_ceil(size);
        let content = matching
            .into_iter()
            .skip(request.page_index * size)
            .take(size)
            .cloned()
            .collect();

        Ok(PageEnvelope {
            content,
            page: PageMetadata {
                size,
                number: request.page_index,
                total_elements: rows.len() as u64,
                total_pages,
            },
        })
    }
}

/// Serves the same rows as a single page, whatever is asked
pub struct FixedSource<R> {
    rows: Vec<R>,
}

impl<R: Clone> FixedSource<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl<R: Clone + Send + Sync> PageSource<R> for FixedSource<R> {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageEnvelope<R>, ClientError> {
        Ok(PageEnvelope {
            content: self.rows.clone(),
            page: PageMetadata {
                size: request.page_size.get(),
                number: 0,
                total_elements: self.rows.len() as u64,
                total_pages: 1,
            },
        })
    }
}
