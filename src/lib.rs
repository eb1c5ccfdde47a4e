//! # Docman
//!
//! A server for publishing and editing partner API documentation, usable
//! both as a standalone binary and as a library.
//!
//! Each API endpoint is documented by one nested document (schemas, sample
//! payloads, ordered note lists, header tables). The [`sync::SyncEngine`]
//! projects documents into normalized SQLite tables on write and
//! reassembles them on read, preserving declared order and round-trip
//! fidelity.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! docman = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docman::server::{AppState, create_router};
//! use docman::store::SqliteStore;
//! use docman::sync::SyncEngine;
//!
//! let store = SqliteStore::new("./data/docman.db").unwrap();
//! let engine = SyncEngine::new(Arc::new(store));
//! engine.initialize().unwrap();
//!
//! let router = create_router(Arc::new(AppState { engine }));
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the CLI binary's dependencies. Disable with
//!   `default-features = false`.

pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod sync;
pub mod types;
