//! zerodigit - Marketing site backend with a public waitlist and an admin file manager
//!
//! This crate provides:
//! - Public waitlist signups with input validation
//! - Cookie-based admin sessions with a fixed expiry window
//! - A hierarchical folder/file registry (metadata) over swappable object storage
//! - REST API with multipart upload support

pub mod api;
pub mod auth;
pub mod config;
pub mod object_store;
pub mod session;
pub mod store;

use std::sync::Arc;

use config::Config;
use session::SessionStore;
use store::Store;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub sessions: SessionStore,
    pub object_store: Arc<dyn object_store::ObjectStore>,
}
