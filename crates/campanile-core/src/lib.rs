//! # Campanile Core
//!
//! Core types, errors, and utilities for the Campanile API.
//!
//! This crate provides foundational types used throughout the Campanile
//! application:
//!
//! - [`errors`]: Application error types with HTTP response conversion
//! - [`pagination`]: Pagination utilities for API responses
//! - [`receipts`]: Structured request-log values returned by registrar actions

pub mod errors;
pub mod pagination;
pub mod receipts;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use receipts::ActionReceipt;
