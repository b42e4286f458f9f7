//! Satellite pass prediction for a fixed ground observer.
//!
//! The [`predict`] module finds rise / culmination / set events and reports
//! pass geometry; [`sweep`] runs it over a whole [`catalog::Catalog`].

pub mod catalog;
pub mod config;
pub mod geo;
pub mod orbit;
pub mod predict;
pub mod sweep;
