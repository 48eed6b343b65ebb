//! Filter-and-aggregate engine behind the NTD partners and disease
//! occurrence dashboard.
//!
//! Load the two tables once with [`Dashboard::load`], then call
//! [`Dashboard::render`] with a fresh [`FilterSelection`] on every
//! interaction. Rendering to HTML or JSON lives in [`visualization`].

pub mod aggregation;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
pub mod selection;
pub mod summary;
pub mod tables;
pub mod visualization;

#[cfg(feature = "python")]
mod python;

#[cfg(test)]
mod fixtures;

pub use config::Config;
pub use error::DashboardError;
pub use model::{Dashboard, DashboardView, Summaries};
pub use selection::{FilterOptions, FilterSelection, YearRange};
pub use tables::{DiseaseOccurrence, DiseaseTable, Partner, PartnerTable};
