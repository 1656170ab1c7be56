use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cars::Car;
use super::{Resource, Unsupported};
use crate::grid::{ActionDescriptor, ActionKind, ColumnDescriptor, Row};
use crate::session::Route;

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalCustomer {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: String,
    pub car: Car,
    pub customer: RentalCustomer,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub is_cancelled: bool,
}

impl Row for Rental {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Dates are shown in UTC
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format(DATE_FORMAT).to_string()
}

impl Resource for Rental {
    const SINGULAR: &'static str = "Rental";
    const PATH: &'static str = "/rentals";
    const FILTER_PARAM: &'static str = "id";
    const ROUTE: Route = Route::Rentals;
    const SUPPORTS_CREATE: bool = false;
    const SUPPORTS_UPDATE: bool = false;

    type Create = Unsupported;
    type Update = Unsupported;

    fn columns() -> Vec<ColumnDescriptor<Self>> {
        vec![
            ColumnDescriptor::new("id", "ID", |r: &Rental| r.id.clone()).pinned(),
            ColumnDescriptor::new("car", "Car", |r: &Rental| r.car.id.clone()),
            ColumnDescriptor::new("customer", "Customer", |r: &Rental| r.customer.email.clone()).sortable(),
            ColumnDescriptor::new("from", "From", |r: &Rental| format_date(&r.start_at))
                .sorted_by(|r: &Rental| r.start_at.to_rfc3339()),
            ColumnDescriptor::new("to", "To", |r: &Rental| format_date(&r.end_at))
                .sorted_by(|r: &Rental| r.end_at.to_rfc3339()),
            ColumnDescriptor::new("status", "Status", |r: &Rental| {
                if r.is_cancelled { "Cancelled".to_string() } else { "Active".to_string() }
            }),
        ]
    }

    fn actions() -> Vec<ActionDescriptor<Self>> {
        vec![
            ActionDescriptor::new(ActionKind::Cancel, "Cancel").enabled_when(|r: &Rental| !r.is_cancelled),
            ActionDescriptor::new(ActionKind::Details, "Details"),
        ]
    }

    fn conflict_description(id: &str) -> String {
        format!("Rental {} could not be cancelled because it has already started.", id)
    }
}
