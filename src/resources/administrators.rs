use serde::{Deserialize, Serialize};

use super::{Draft, Resource, Unsupported};
use crate::api::auth::validate_login;
use crate::error::ClientError;
use crate::grid::{ActionDescriptor, ActionKind, ColumnDescriptor, Row};
use crate::session::Route;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Administrator {
    pub id: String,
    pub username: String,
}

impl Row for Administrator {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAdministrator {
    pub username: String,
    pub password: String,
}

impl Draft for NewAdministrator {
    fn validate(&self) -> Result<(), ClientError> {
        validate_login(&self.username, &self.password)
    }

    fn label(&self) -> String {
        self.username.clone()
    }
}

impl Resource for Administrator {
    const SINGULAR: &'static str = "Administrator";
    const PATH: &'static str = "/administrators";
    const FILTER_PARAM: &'static str = "username";
    const ROUTE: Route = Route::Administrators;
    const SUPPORTS_UPDATE: bool = false;

    type Create = NewAdministrator;
    type Update = Unsupported;

    fn columns() -> Vec<ColumnDescriptor<Self>> {
        vec![
            ColumnDescriptor::new("id", "ID", |a: &Administrator| a.id.clone()).pinned(),
            ColumnDescriptor::new("username", "Username", |a: &Administrator| a.username.clone()).sortable(),
        ]
    }

    fn actions() -> Vec<ActionDescriptor<Self>> {
        vec![ActionDescriptor::new(ActionKind::Delete, "Delete")]
    }
}
