//! Shared domain types for the Via Varejo base treatment.

pub mod domain;

pub use domain::*;
