use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::Model;
use super::{Draft, Resource};
use crate::error::ClientError;
use crate::grid::{ActionDescriptor, ActionKind, ColumnDescriptor, Row};
use crate::session::Route;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub full_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// City part of "street, city, country"
    pub fn city(&self) -> &str {
        self.full_address
            .split(',')
            .nth(1)
            .map(str::trim)
            .unwrap_or_else(|| self.full_address.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: String,
    pub model: Model,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

impl Row for Car {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDraft {
    pub model_id: String,
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

fn require_uuid(field: &str, value: &str) -> Result<(), ClientError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| ClientError::Validation(format!("{} '{}' is not a valid identifier.", field, value)))
}

impl Draft for CarDraft {
    fn validate(&self) -> Result<(), ClientError> {
        require_uuid("Model", &self.model_id)?;
        require_uuid("Location", &self.location_id)?;
        if let Some(image) = &self.image_id {
            require_uuid("Image", image)?;
        }
        Ok(())
    }

    fn label(&self) -> String {
        format!("of model {}", self.model_id)
    }
}

impl Resource for Car {
    const SINGULAR: &'static str = "Car";
    const PATH: &'static str = "/cars";
    const FILTER_PARAM: &'static str = "id";
    const ROUTE: Route = Route::Cars;

    type Create = CarDraft;
    type Update = CarDraft;

    fn columns() -> Vec<ColumnDescriptor<Self>> {
        vec![
            ColumnDescriptor::new("id", "ID", |c: &Car| c.id.clone()).pinned(),
            ColumnDescriptor::new("brand", "Brand", |c: &Car| c.model.brand_name.clone()).sortable(),
            ColumnDescriptor::new("model", "Model", |c: &Car| c.model.name.clone()).sortable(),
            ColumnDescriptor::new("city", "City", |c: &Car| c.location.city().to_string()).sortable(),
            ColumnDescriptor::new("image", "Image", |c: &Car| c.image_url.clone().unwrap_or_default()),
        ]
    }

    fn actions() -> Vec<ActionDescriptor<Self>> {
        vec![
            ActionDescriptor::new(ActionKind::Edit, "Edit"),
            ActionDescriptor::new(ActionKind::Delete, "Delete"),
        ]
    }

    fn conflict_description(id: &str) -> String {
        format!("Car {} was not removed due to it being currently rented.", id)
    }
}
