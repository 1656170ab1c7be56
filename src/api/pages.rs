use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::debug;

use super::{check, ApiClient};
use crate::error::ClientError;
use crate::grid::{PageEnvelope, PageRequest, PageSource};

/// `GET <collection>/?page=N&size=M[&<filter_param>=TEXT]`
pub struct HttpPageSource<R> {
    client: ApiClient,
    path: &'static str,
    filter_param: &'static str,
    _row: PhantomData<fn() -> R>,
}

impl<R> HttpPageSource<R> {
    pub fn new(client: ApiClient, path: &'static str, filter_param: &'static str) -> Self {
        Self {
            client,
            path,
            filter_param,
            _row: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn path(&self) -> &'static str {
        self.path
    }
}

#[async_trait]
impl<R> PageSource<R> for HttpPageSource<R>
where
    R: DeserializeOwned + Send,
{
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageEnvelope<R>, ClientError> {
        let mut url = self.client.collection_url(self.path)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &request.page_index.to_string());
            query.append_pair("size", &request.page_size.get().to_string());
            if !request.filter_text.is_empty() {
                query.append_pair(self.filter_param, &request.filter_text);
            }
        }
        debug!("Fetching page from {}", url);

        let response = self
            .client
            .http()
            .get(url)
            .bearer_auth(self.client.session().bearer()?)
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.json::<PageEnvelope<R>>().await?)
    }
}
