//! Paged, filterable data grid over a remote paginated collection

pub mod columns;
pub mod controller;
pub mod pagination;
pub mod render;
pub mod source;
pub mod state;

pub use columns::{ActionDescriptor, ActionKind, ColumnDescriptor};
pub use controller::{PagedGrid, SortDirection};
pub use pagination::{PageSize, PageStrip};
pub use render::render_grid;
pub use source::{PageEnvelope, PageMetadata, PageSource};
pub use state::{BodyState, FetchOutcome, FetchTicket, GridState, PageRequest};

/// Rows shown in a grid carry a unique id
pub trait Row {
    fn id(&self) -> &str;
}
