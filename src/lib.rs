//! Year and county aggregation of animal-shelter intake and outcome data.
//!
//! Rows from the shelter CSV are normalized into [`types::ShelterRecord`]s,
//! summed per year for each population group, and split by county through a
//! facility lookup. The [`reports`] module exposes one statewide and one
//! county operation per dashboard question; [`series`] turns the results
//! into chart-ready rows.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod county;
pub mod dashboard;
pub mod loader;
pub mod output;
pub mod reports;
pub mod series;
pub mod sources;
pub mod types;
pub mod util;
