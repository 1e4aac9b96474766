//! # Leseregal Backend Library
//!
//! Core library for Leseregal, the backend of a personal site whose central
//! piece is a Google Drive library mirror: a folder of PDFs is synchronized
//! into a local SQLite table and served as the reading list.
//!
//! ## Architecture
//!
//! The application is built using:
//! - **Axum**: HTTP server and routing
//! - **SQLx**: Asynchronous database operations with SQLite
//! - **Tokio**: Async runtime for concurrent operations
//! - **Reqwest**: Google Drive listing fetch
//!
//! ## Core Components
//!
//! - [`config`]: Application configuration management
//! - [`db`]: Database schema initialization and migrations
//! - [`error`]: Centralized error handling and HTTP error responses
//! - [`library`]: The library synchronization engine (lister, overrides,
//!   normalizer, reconciler, refresh coordinator)
//! - [`metrics`]: Operational counters
//! - [`middleware`]: Security headers and client IP extraction
//! - [`routes`]: HTTP endpoint handlers
//! - [`state`]: Shared application state
//! - [`types`]: Data transfer objects and shared type definitions

pub mod config;
pub mod db;
pub mod error;
pub mod library;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
