//! Resource screens: one paged grid per backend collection, plus its mutations

pub mod administrators;
pub mod cars;
pub mod catalog;
pub mod customers;
pub mod models;
pub mod rentals;

pub use administrators::Administrator;
pub use cars::Car;
pub use customers::Customer;
pub use models::Model;
pub use rentals::Rental;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{ApiClient, HttpPageSource};
use crate::error::ClientError;
use crate::grid::{ActionDescriptor, ActionKind, ColumnDescriptor, FetchOutcome, PageSize, PagedGrid, Row};
use crate::session::Route;

/// Request body for a create or edit form
pub trait Draft: Serialize + DeserializeOwned + Send + Sync {
    fn validate(&self) -> Result<(), ClientError>;

    /// Short human label used in notifications
    fn label(&self) -> String;
}

/// Marker for operations a resource does not offer
#[derive(Debug, Serialize, Deserialize)]
pub enum Unsupported {}

impl Draft for Unsupported {
    fn validate(&self) -> Result<(), ClientError> {
        match *self {}
    }

    fn label(&self) -> String {
        match *self {}
    }
}

pub trait Resource: Row + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Display name, singular ("Car")
    const SINGULAR: &'static str;
    /// Collection path under the API prefix ("/cars")
    const PATH: &'static str;
    /// Query parameter the backend filters on
    const FILTER_PARAM: &'static str;
    const ROUTE: Route;
    const SUPPORTS_CREATE: bool = true;
    const SUPPORTS_UPDATE: bool = true;

    type Create: Draft;
    type Update: Draft;

    fn columns() -> Vec<ColumnDescriptor<Self>>;

    fn actions() -> Vec<ActionDescriptor<Self>>;

    /// Description for a 409 on delete
    fn conflict_description(id: &str) -> String {
        format!("{} {} was not removed because other records still refer to it.", Self::SINGULAR, id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Failure,
}

/// Transient message shown after a mutation settles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn failure(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

/// Notification text for a settled mutation
pub fn describe<R: Resource>(mutation: Mutation, subject: &str, result: &Result<(), ClientError>) -> Notification {
    let noun = R::SINGULAR;
    let lower = noun.to_lowercase();
    match (mutation, result) {
        (Mutation::Create, Ok(())) => {
            Notification::success(format!("{} created", noun), format!("Created {} {} successfully.", lower, subject))
        }
        (Mutation::Create, Err(ClientError::Validation(msg))) => {
            Notification::failure(format!("{} creation failed", noun), msg.clone())
        }
        (Mutation::Create, Err(_)) => {
            Notification::failure(format!("{} creation failed", noun), format!("Failed to create {} {}.", lower, subject))
        }
        (Mutation::Update, Ok(())) => Notification::success(
            format!("{} information edited", noun),
            format!("{} {} has been updated successfully.", noun, subject),
        ),
        (Mutation::Update, Err(ClientError::Validation(msg))) => {
            Notification::failure(format!("{} edit failed", noun), msg.clone())
        }
        (Mutation::Update, Err(_)) => {
            Notification::failure(format!("{} edit failed", noun), format!("Failed to edit {} {}.", lower, subject))
        }
        (Mutation::Delete, Ok(())) => {
            Notification::success(format!("{} removed", noun), format!("{} {} removed.", noun, subject))
        }
        (Mutation::Delete, Err(ClientError::Conflict(_))) => {
            Notification::failure(format!("Could not remove {}", lower), R::conflict_description(subject))
        }
        (Mutation::Delete, Err(ClientError::Validation(msg))) => {
            Notification::failure(format!("Could not remove {}", lower), msg.clone())
        }
        (Mutation::Delete, Err(err)) => Notification::failure(
            "Unknown error",
            match err.status_code() {
                Some(status) => format!("Error is not defined in code: status {}", status),
                None => format!("Error is not defined in code: {}", err),
            },
        ),
    }
}

/// One resource screen: its grid plus the mutations that invalidate it
pub struct Screen<R: Resource> {
    client: ApiClient,
    grid: PagedGrid<R, HttpPageSource<R>>,
}

impl<R: Resource> Screen<R> {
    pub fn new(client: ApiClient, page_size: PageSize) -> Self {
        let source = HttpPageSource::new(client.clone(), R::PATH, R::FILTER_PARAM);
        Self {
            client,
            grid: PagedGrid::new(source, R::columns(), R::actions(), page_size),
        }
    }

    pub fn grid(&self) -> &PagedGrid<R, HttpPageSource<R>> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut PagedGrid<R, HttpPageSource<R>> {
        &mut self.grid
    }

    pub async fn mount(&mut self) -> FetchOutcome {
        self.grid.load().await
    }

    pub async fn details(&self, id: &str) -> Result<R, ClientError> {
        self.client.fetch_one(R::PATH, id).await
    }

    pub async fn create(&mut self, draft: &R::Create) -> Notification {
        let subject = draft.label();
        let result = if !R::SUPPORTS_CREATE {
            Err(ClientError::Validation(format!("{} records cannot be created here.", R::SINGULAR)))
        } else {
            match draft.validate() {
                Ok(()) => self.client.create(R::PATH, draft).await,
                Err(e) => Err(e),
            }
        };
        self.settle(Mutation::Create, &subject, result).await
    }

    pub async fn update(&mut self, id: &str, draft: &R::Update) -> Notification {
        let result = if !R::SUPPORTS_UPDATE {
            Err(ClientError::Validation(format!("{} records cannot be edited here.", R::SINGULAR)))
        } else {
            match draft.validate() {
                Ok(()) => self.client.update(R::PATH, id, draft).await,
                Err(e) => Err(e),
            }
        };
        self.settle(Mutation::Update, id, result).await
    }

    /// Delete (or cancel) a row. Rows on the current page whose action is disabled are refused locally.
    pub async fn delete(&mut self, id: &str) -> Notification {
        let refused = self
            .grid
            .state()
            .items()
            .iter()
            .find(|row| row.id() == id)
            .and_then(|row| {
                self.grid
                    .actions()
                    .iter()
                    .find(|a| matches!(a.kind, ActionKind::Delete | ActionKind::Cancel))
                    .filter(|a| !a.is_enabled(row))
                    .map(|a| a.label)
            });

        let result = match refused {
            Some(label) => Err(ClientError::Validation(format!("'{}' is not available for {} {}.", label, R::SINGULAR, id))),
            None => self.client.delete(R::PATH, id).await,
        };
        self.settle(Mutation::Delete, id, result).await
    }

    /// Invalidate only on confirmed success, then refetch once
    async fn settle(&mut self, mutation: Mutation, subject: &str, result: Result<(), ClientError>) -> Notification {
        let notification = describe::<R>(mutation, subject, &result);
        if result.is_ok() {
            info!("{:?} on {} {} succeeded", mutation, R::SINGULAR, subject);
            self.grid.mark_invalidated();
            self.grid.refresh_if_invalidated().await;
        }
        notification
    }
}
