//! # calplan
//!
//! A plan/config sharing server: users compose reusable config fragments
//! into plans and expose the merged content to an external document
//! generator through revocable access tokens or durable share links.
//! Usable both as a standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::PathBuf;
//! use calplan::auth::PasswordHasher;
//! use calplan::rpc::RendererClient;
//! use calplan::server::{AppState, create_router};
//! use calplan::store::SqliteStore;
//!
//! let store = SqliteStore::new(&PathBuf::from("./data/calplan.db")).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState {
//!     store: Arc::new(store),
//!     hasher: PasswordHasher::new(),
//!     renderer: RendererClient::new("http://127.0.0.1:8081").unwrap(),
//! });
//! let router = create_router(state);
//! // Serve with axum...
//! ```

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod rpc;
pub mod server;
pub mod store;
pub mod types;
