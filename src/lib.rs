//! # Campanile API
//!
//! Backend for a university school-information system: registrar-managed
//! academic structure (terms, curricula, course offerings, class sections),
//! schedule assignment with double-booking prevention, and the enrollment
//! admission path.
//!
//! ## Architecture
//!
//! The codebase follows a modular layout:
//!
//! ```text
//! src/
//! ├── config/           # Server and CORS configuration from env
//! ├── middleware/       # Acting-identity extractor (auth lives upstream)
//! ├── modules/          # Feature modules
//! │   ├── users/        # Users with role profiles (students, professors, ...)
//! │   ├── terms/        # Academic terms and their lifecycle
//! │   ├── curricula/    # Programs, courses, curricula, curriculum courses
//! │   ├── offerings/    # Course offerings and class sections
//! │   ├── schedules/    # Class schedules, conflict detection, professor assignment
//! │   └── enrollments/  # Eligibility chain, capacity ledger, admission
//! └── ...
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: Data models, DTOs, database structs
//! - `router.rs`: Axum router configuration
//!
//! ## Scheduling and enrollment integrity
//!
//! The interesting parts of this system are the lifecycle rules, not the
//! CRUD around them:
//!
//! - status transitions for every lifecycle entity go through a single
//!   permissive registry ([`campanile_models::transitions`]); requesting the
//!   current status is a reported no-op
//! - room and professor schedules are kept overlap-free per day of week;
//!   the conflict check and the insert share one transaction
//! - a student joins a class section only when the whole upstream chain
//!   (section, offering, term, curriculum/program) is in an
//!   enrollment-compatible state and a seat is won through an atomic
//!   conditional update, never a read-then-write
//!
//! ## Identity
//!
//! Authentication and authorization run in an upstream gateway. The API
//! trusts the forwarded `x-acting-user` / `x-acting-role` headers, exposed
//! to handlers through [`middleware::actor::Actor`].

pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

// Re-export workspace crates for convenience
pub use campanile_core;
pub use campanile_db;
pub use campanile_models;
