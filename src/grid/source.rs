use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::state::PageRequest;
use crate::error::ClientError;

/// One page of a remote collection: `{ content: [...], page: { totalPages, ... } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope<R> {
    pub content: Vec<R>,
    pub page: PageMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub number: usize,
    #[serde(default)]
    pub total_elements: u64,
    pub total_pages: usize,
}

/// Anything that can serve one page for a request
#[async_trait]
pub trait PageSource<R>: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageEnvelope<R>, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_spring_style_envelope() {
        let raw = r#"{
            "content": [{"id": "a"}, {"id": "b"}],
            "page": {"size": 10, "number": 0, "totalElements": 2, "totalPages": 1}
        }"#;
        let envelope: PageEnvelope<serde_json::Value> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.content.len(), 2);
        assert_eq!(envelope.page.total_pages, 1);
        assert_eq!(envelope.page.total_elements, 2);
    }

    #[test]
    fn bare_array_is_rejected() {
        let raw = r#"[{"id": "a"}]"#;
        assert!(serde_json::from_str::<PageEnvelope<serde_json::Value>>(raw).is_err());
    }
}
