//! # Campanile Models
//!
//! Shared domain vocabulary for the Campanile API:
//!
//! - [`ids`]: strongly-typed UUID newtypes for every entity
//! - [`status`]: lifecycle status enums mapped to Postgres enum types
//! - [`transitions`]: the status-transition registry shared by all
//!   lifecycle entities

pub mod ids;
pub mod status;
pub mod transitions;
