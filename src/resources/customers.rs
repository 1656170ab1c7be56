use serde::{Deserialize, Serialize};

use super::{Draft, Resource};
use crate::error::ClientError;
use crate::grid::{ActionDescriptor, ActionKind, ColumnDescriptor, Row};
use crate::session::Route;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
}

impl Row for Customer {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create and edit both only carry the email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub email: String,
}

impl Draft for CustomerDraft {
    fn validate(&self) -> Result<(), ClientError> {
        validate_email(&self.email)
    }

    fn label(&self) -> String {
        self.email.clone()
    }
}

pub fn validate_email(email: &str) -> Result<(), ClientError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !email.chars().any(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ClientError::Validation(format!("'{}' is not a valid email address.", email)))
    }
}

impl Resource for Customer {
    const SINGULAR: &'static str = "Customer";
    const PATH: &'static str = "/customers";
    const FILTER_PARAM: &'static str = "email";
    const ROUTE: Route = Route::Customers;

    type Create = CustomerDraft;
    type Update = CustomerDraft;

    fn columns() -> Vec<ColumnDescriptor<Self>> {
        vec![
            ColumnDescriptor::new("id", "ID", |c: &Customer| c.id.clone()).pinned(),
            ColumnDescriptor::new("username", "Username", |c: &Customer| c.username.clone()),
            ColumnDescriptor::new("email", "Email", |c: &Customer| c.email.clone()).sortable(),
        ]
    }

    fn actions() -> Vec<ActionDescriptor<Self>> {
        vec![
            ActionDescriptor::new(ActionKind::Edit, "Edit"),
            ActionDescriptor::new(ActionKind::Delete, "Delete"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(validate_email("anna@example.com").is_ok());
        assert!(validate_email("anna@example").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("anna example@x.pl").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn decodes_row_without_username() {
        let c: Customer = serde_json::from_str(r#"{"id":"1","email":"a@b.pl"}"#).unwrap();
        assert_eq!(c.username, "");
    }
}
