//! Filtering, search and pagination of patient tables
//!
//! Filters are pure functions over an in-memory table. A dashboard request
//! builds a [`DashboardFilters`] value, turns it into a [`PatientFilter`]
//! and slices the result with [`paginate`].

pub mod criteria;
pub mod dashboard;
pub mod pagination;

pub use criteria::{CleanFilter, FilterCriteria, PatientFilter};
pub use dashboard::DashboardFilters;
pub use pagination::{Page, paginate};
