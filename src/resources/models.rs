use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Draft, Resource, Unsupported};
use crate::error::ClientError;
use crate::grid::{ActionDescriptor, ActionKind, ColumnDescriptor, Row};
use crate::session::Route;

/// Rental model: the bookable car type with its daily rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub brand_name: String,
    pub name: String,
    pub production_year: i32,
    pub fuel_type: String,
    pub fuel_capacity: f64,
    pub seat_count: u32,
    pub door_count: u32,
    pub daily_rate: Decimal,
}

impl Row for Model {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Edit form body; brand and fuel type are picked by id from the catalog lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDraft {
    pub brand_id: i64,
    pub name: String,
    pub production_year: i32,
    pub fuel_type_id: i64,
    pub fuel_capacity: u32,
    pub seat_count: u32,
    pub door_count: u32,
    pub daily_rate: Decimal,
}

impl Draft for ModelDraft {
    fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty() {
            return Err(ClientError::Validation("Model name is required.".to_string()));
        }
        if self.production_year < 1900 {
            return Err(ClientError::Validation(format!(
                "Production year {} is before 1900.",
                self.production_year
            )));
        }
        if self.seat_count == 0 || self.door_count == 0 || self.fuel_capacity == 0 {
            return Err(ClientError::Validation(
                "Seats, doors and fuel capacity must be positive.".to_string(),
            ));
        }
        if self.daily_rate <= Decimal::ZERO {
            return Err(ClientError::Validation("Daily rate must be positive.".to_string()));
        }
        // whole grosze only
        if self.daily_rate.normalize().scale() > 2 {
            return Err(ClientError::Validation(format!(
                "Daily rate {} has more than two decimal places.",
                self.daily_rate
            )));
        }
        Ok(())
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

/// `149,00 zł`
pub fn format_pln(amount: Decimal) -> String {
    format!("{:.2} zł", amount.round_dp(2)).replace('.', ",")
}

impl Resource for Model {
    const SINGULAR: &'static str = "Model";
    const PATH: &'static str = "/models";
    const FILTER_PARAM: &'static str = "name";
    const ROUTE: Route = Route::Models;
    const SUPPORTS_CREATE: bool = false;

    type Create = Unsupported;
    type Update = ModelDraft;

    fn columns() -> Vec<ColumnDescriptor<Self>> {
        vec![
            ColumnDescriptor::new("id", "ID", |m: &Model| m.id.clone()).pinned(),
            ColumnDescriptor::new("name", "Name", |m: &Model| m.name.clone()).sortable(),
            ColumnDescriptor::new("brandName", "Brand Name", |m: &Model| m.brand_name.clone()).sortable(),
            ColumnDescriptor::new("productionYear", "Production Year", |m: &Model| m.production_year.to_string()),
            ColumnDescriptor::new("fuelType", "Fuel Type", |m: &Model| m.fuel_type.clone()),
            ColumnDescriptor::new("fuelCapacity", "Fuel Capacity", |m: &Model| m.fuel_capacity.to_string()),
            ColumnDescriptor::new("seatCount", "Seat Count", |m: &Model| m.seat_count.to_string()),
            ColumnDescriptor::new("doorCount", "Door Count", |m: &Model| m.door_count.to_string()),
            ColumnDescriptor::new("dailyRate", "Daily Rate", |m: &Model| format_pln(m.daily_rate)),
        ]
    }

    fn actions() -> Vec<ActionDescriptor<Self>> {
        vec![
            ActionDescriptor::new(ActionKind::Edit, "Edit"),
            ActionDescriptor::new(ActionKind::Delete, "Delete"),
        ]
    }

    fn conflict_description(id: &str) -> String {
        format!("Model {} was not removed because cars of this model still exist.", id)
    }
}
