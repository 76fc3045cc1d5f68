//! service-core: Shared infrastructure for the platform services.
pub mod config;
pub mod error;
pub mod observability;

pub use mongodb;
pub use serde;
pub use tracing;
pub use validator;
