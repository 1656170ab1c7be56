//! HTTP client for the rental backend

pub mod auth;
pub mod catalog;
pub mod pages;

pub use auth::login;
pub use pages::HttpPageSource;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::AppConfig;
use crate::error::ClientError;
use crate::session::Session;

/// Bearer-authenticated client bound to one backend and one session
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    prefix: String,
    token_cookie: String,
    session: Session,
    log_requests: bool,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, prefix: impl Into<String>, session: Session) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        // fail early on a malformed base
        Url::parse(&base_url)?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            prefix: prefix.into().trim_end_matches('/').to_string(),
            token_cookie: "administrator-token".to_string(),
            session,
            log_requests: false,
        })
    }

    pub fn from_config(config: &AppConfig, session: Session) -> Result<Self, ClientError> {
        let mut client = Self::new(&config.api.base_url, &config.api.prefix, session)?;
        client.token_cookie = config.session.token_cookie.clone();
        client.log_requests = config.api.enable_request_logging;
        Ok(client)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token_cookie(&self) -> &str {
        &self.token_cookie
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// URL outside the resource prefix, e.g. `/session`
    pub fn root_url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    /// Collection URL, always with a trailing slash: `/api/cars/`
    pub fn collection_url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(Url::parse(&format!("{}{}{}/", self.base_url, self.prefix, path))?)
    }

    pub fn item_url(&self, path: &str, id: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(&format!("{}{}{}", self.base_url, self.prefix, path))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Validation(format!("cannot address '{}' under {}", id, path)))?
            .push(id);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        self.trace("GET", &url);
        let response = self
            .http
            .get(url)
            .bearer_auth(self.session.bearer()?)
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn fetch_one<T: DeserializeOwned>(&self, path: &str, id: &str) -> Result<T, ClientError> {
        let url = self.item_url(path, id)?;
        self.get_json(url).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ClientError> {
        let url = self.collection_url(path)?;
        self.trace("POST", &url);
        let response = self
            .http
            .post(url)
            .bearer_auth(self.session.bearer()?)
            .json(body)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    pub async fn update<B: Serialize + ?Sized>(&self, path: &str, id: &str, body: &B) -> Result<(), ClientError> {
        let url = self.item_url(path, id)?;
        self.trace("PUT", &url);
        let response = self
            .http
            .put(url)
            .bearer_auth(self.session.bearer()?)
            .json(body)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str, id: &str) -> Result<(), ClientError> {
        let url = self.item_url(path, id)?;
        self.trace("DELETE", &url);
        let response = self
            .http
            .delete(url)
            .bearer_auth(self.session.bearer()?)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    fn trace(&self, method: &str, url: &Url) {
        if self.log_requests {
            debug!("{} {}", method, url);
        }
    }
}

/// Turn a non-success status into the matching error, keeping the body for context
pub(crate) async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::from_status(status, body))
}

pub(crate) fn is_no_content(status: StatusCode) -> bool {
    status == StatusCode::NO_CONTENT
}
