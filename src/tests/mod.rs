//! Integration and unit tests for the Leseregal backend.
//!
//! ## Test Modules
//!
//! - **config_tests**: Configuration defaults and helpers
//! - **db_tests**: Database schema initialization and migrations
//! - **store_tests**: Library store upsert/delete reconciliation
//! - **sync_tests**: Refresh coordinator (single-flight, interval, failures)
//! - **library_api_tests**: Library endpoint behavior over HTTP
//! - **writing_api_tests**: Writing gate endpoints
//! - **admin_api_tests**: Admin export authentication and formats
//! - **health_api_tests**: Health and metrics endpoints

pub mod admin_api_tests;
pub mod sync_tests;

pub mod support;
